use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TeachingService, ensure_assigned, ensure_teaches_class};
use crate::models::grades::requests::{CreateAbsenceRequest, JustifyAbsenceRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, not_found, read_error, storage_error};
use crate::utils::validate::{parse_date, parse_time, validate_time_range};

/// 检查缺勤的起止时间，只给出一端时单独校验格式
fn check_times(start: Option<&str>, end: Option<&str>) -> Result<(), String> {
    match (start, end) {
        (Some(start), Some(end)) => validate_time_range(start, end),
        (Some(t), None) | (None, Some(t)) => parse_time(t).map(|_| ()),
        (None, None) => Ok(()),
    }
}

pub async fn create_absence(
    service: &TeachingService,
    request: &HttpRequest,
    req: CreateAbsenceRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let absence_date = match parse_date(&req.absence_date) {
        Ok(date) => date,
        Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
    };
    if let Err(msg) = check_times(req.start_time.as_deref(), req.end_time.as_deref()) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let access = match req.subject_id {
        Some(subject_id) => {
            ensure_assigned(storage.as_ref(), &user, req.class_id, subject_id).await
        }
        None => ensure_teaches_class(storage.as_ref(), &user, req.class_id).await,
    };
    if let Err(resp) = access {
        return Ok(resp);
    }

    match storage.get_student_by_id(req.student_id).await {
        Ok(Some(student)) if student.class_id == Some(req.class_id) => {}
        Ok(Some(_)) => {
            return Ok(bad_request(
                ErrorCode::StudentNotInClass,
                "Student does not belong to this class",
            ));
        }
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(read_error(&e)),
    }

    match storage.create_absence(user.id, req, absence_date).await {
        Ok(absence) => {
            tracing::info!(
                "Absence {} recorded for student {}",
                absence.id,
                absence.student_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                absence,
                "Absence recorded successfully",
            )))
        }
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}

pub async fn justify_absence(
    service: &TeachingService,
    request: &HttpRequest,
    absence_id: i64,
    req: JustifyAbsenceRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let justification = req.justification.trim();
    if justification.is_empty() {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "justification is required",
        ));
    }

    let absence = match storage.get_absence(absence_id).await {
        Ok(Some(absence)) => absence,
        Ok(None) => return Ok(not_found(ErrorCode::AbsenceNotFound, "Absence not found")),
        Err(e) => return Ok(read_error(&e)),
    };
    if let Err(resp) = ensure_teaches_class(storage.as_ref(), &user, absence.class_id).await {
        return Ok(resp);
    }

    match storage.justify_absence(absence_id, justification).await {
        Ok(Some(absence)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            absence,
            "Absence justified successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::AbsenceNotFound, "Absence not found")),
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_times() {
        assert!(check_times(None, None).is_ok());
        assert!(check_times(Some("08:00"), Some("10:00")).is_ok());
        assert!(check_times(Some("10:00"), Some("08:00")).is_err());
        assert!(check_times(Some("25:00"), None).is_err());
    }
}
