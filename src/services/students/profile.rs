use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentPortalService, current_student};
use crate::errors::Result;
use crate::models::academics::entities::sort_timetable;
use crate::models::users::entities::{StudentProfile, User};
use crate::models::users::responses::StudentProfileResponse;
use crate::models::{ApiResponse, ErrorCode, ItemsResponse};
use crate::services::{not_found, read_error};
use crate::storage::Storage;

async fn build_profile(
    storage: &dyn Storage,
    user: User,
    profile: StudentProfile,
) -> Result<StudentProfileResponse> {
    let class_label = match profile.class_id {
        Some(class_id) => storage.get_class(class_id).await?.map(|c| c.class.label),
        None => None,
    };
    let academic_year_label = match profile.academic_year_id {
        Some(year_id) => storage.get_academic_year(year_id).await?.map(|y| y.label),
        None => None,
    };

    Ok(StudentProfileResponse {
        user,
        profile,
        class_label,
        academic_year_label,
    })
}

pub async fn get_profile(
    service: &StudentPortalService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let (user, student) = match current_student(storage.as_ref(), request).await {
        Ok(found) => found,
        Err(resp) => return Ok(resp),
    };

    match build_profile(storage.as_ref(), user, student).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            profile,
            "Profile retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

/// 课表按星期一到星期六、再按开始时间排序
pub async fn get_timetable(
    service: &StudentPortalService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let (_, student) = match current_student(storage.as_ref(), request).await {
        Ok(found) => found,
        Err(resp) => return Ok(resp),
    };

    let Some(class_id) = student.class_id else {
        return Ok(not_found(
            ErrorCode::ClassNotFound,
            "You are not assigned to a class",
        ));
    };

    match storage.list_class_timetable(class_id).await {
        Ok(mut slots) => {
            sort_timetable(&mut slots);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ItemsResponse::new(slots),
                "Timetable retrieved successfully",
            )))
        }
        Err(e) => Ok(read_error(&e)),
    }
}
