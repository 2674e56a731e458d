//! 数据导出：学生名单、成绩、缴费记录，以及每个用户的导出记录

pub mod render;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::Result;
use crate::models::exports::entities::NewExportLog;
use crate::models::exports::requests::{
    ExportFormat, GradeExportParams, PaymentExportParams, StudentExportParams,
};
use crate::models::finance::requests::PaymentQuery;
use crate::models::{ApiResponse, ErrorCode, ItemsResponse};
use crate::services::finance::payments::parse_optional_date;
use crate::services::{bad_request, current_user, read_error, storage_error};
use crate::storage::Storage;
use render::{Cell, Table};

/// 导出记录最多返回的条数
const HISTORY_LIMIT: u64 = 50;

pub struct ExportService {
    storage: Option<Arc<dyn Storage>>,
}

impl ExportService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn students(
        &self,
        request: &HttpRequest,
        params: StudentExportParams,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let table = students_table(storage.as_ref(), params.class_id).await;
        let parameters = serde_json::json!({ "class_id": params.class_id });
        Ok(finish(storage.as_ref(), request, "students", params.format, parameters, table).await)
    }

    pub async fn grades(
        &self,
        request: &HttpRequest,
        params: GradeExportParams,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let table = grades_table(storage.as_ref(), params.class_id, params.subject_id).await;
        let parameters = serde_json::json!({
            "class_id": params.class_id,
            "subject_id": params.subject_id,
        });
        Ok(finish(storage.as_ref(), request, "grades", params.format, parameters, table).await)
    }

    pub async fn payments(
        &self,
        request: &HttpRequest,
        params: PaymentExportParams,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let (date_from, date_to) = match (
            parse_optional_date(params.date_from.as_deref()),
            parse_optional_date(params.date_to.as_deref()),
        ) {
            (Ok(from), Ok(to)) => (from, to),
            (Err(msg), _) | (_, Err(msg)) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
        };

        let parameters = serde_json::json!({
            "status": params.status.as_ref().map(|s| s.as_str()),
            "date_from": date_from,
            "date_to": date_to,
        });
        let query = PaymentQuery {
            status: params.status,
            date_from,
            date_to,
            ..Default::default()
        };
        let table = payments_table(storage.as_ref(), query).await;
        Ok(finish(storage.as_ref(), request, "payments", params.format, parameters, table).await)
    }

    /// 当前用户最近的导出记录
    pub async fn history(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let user = match current_user(request) {
            Ok(user) => user,
            Err(resp) => return Ok(resp),
        };

        match storage.list_export_logs(user.id, HISTORY_LIMIT).await {
            Ok(logs) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                ItemsResponse::new(logs),
                "Export history retrieved successfully",
            ))),
            Err(e) => Ok(read_error(&e)),
        }
    }
}

/// 渲染并组装下载响应，成功后写入导出记录
async fn finish(
    storage: &dyn Storage,
    request: &HttpRequest,
    kind: &'static str,
    format: ExportFormat,
    parameters: serde_json::Value,
    table: Result<Table>,
) -> HttpResponse {
    let (body, rows) = match table.and_then(|t| render::render(format, &t).map(|b| (b, t.rows.len()))) {
        Ok(rendered) => rendered,
        Err(e) => return storage_error(&e, ErrorCode::ExportFailed),
    };

    let filename = format!(
        "{}_{}.{}",
        kind,
        chrono::Local::now().format("%Y%m%d_%H%M%S"),
        format.extension()
    );
    if let Ok(user) = current_user(request) {
        tracing::info!(
            "User {} exported {} rows to {}",
            user.username,
            rows,
            filename
        );

        let log = NewExportLog {
            user_id: user.id,
            kind,
            format: format.extension(),
            filename: filename.clone(),
            parameters: Some(parameters.to_string()),
            row_count: rows as i64,
            size_bytes: body.len() as i64,
        };
        // 导出记录失败不影响下载
        if let Err(e) = storage.record_export(log).await {
            tracing::warn!("Failed to record export log: {}", e);
        }
    }

    HttpResponse::Ok()
        .content_type(format.content_type())
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(body)
}

async fn students_table(storage: &dyn Storage, class_id: Option<i64>) -> Result<Table> {
    let mut table = Table::new(
        "Students",
        vec!["Student number", "Last name", "First name", "Email", "Class"],
    );
    for s in storage.list_student_summaries(class_id).await? {
        table.push(vec![
            s.student_number.into(),
            s.last_name.into(),
            s.first_name.into(),
            s.email.into(),
            s.class_label.into(),
        ]);
    }
    Ok(table)
}

async fn grades_table(
    storage: &dyn Storage,
    class_id: Option<i64>,
    subject_id: Option<i64>,
) -> Result<Table> {
    let names = student_names(storage, class_id).await?;
    let subjects: HashMap<i64, String> = storage
        .list_subjects()
        .await?
        .into_iter()
        .map(|s| (s.id, s.label))
        .collect();

    let mut table = Table::new(
        "Grades",
        vec![
            "Student number",
            "Student",
            "Subject",
            "Type",
            "Value",
            "Coefficient",
            "Date",
            "Validated",
        ],
    );
    for g in storage.list_grades_for_export(class_id, subject_id).await? {
        let (number, name) = names
            .get(&g.student_id)
            .cloned()
            .unwrap_or_else(|| (String::new(), format!("#{}", g.student_id)));
        table.push(vec![
            number.into(),
            name.into(),
            subjects.get(&g.subject_id).map(String::as_str).into(),
            g.grade_type.into(),
            g.value.into(),
            g.coefficient.into(),
            g.graded_on.to_string().into(),
            if g.is_validated { "yes" } else { "no" }.into(),
        ]);
    }
    Ok(table)
}

async fn payments_table(storage: &dyn Storage, query: PaymentQuery) -> Result<Table> {
    let names = student_names(storage, None).await?;
    let fee_types: HashMap<i64, String> = storage
        .list_fee_types()
        .await?
        .into_iter()
        .map(|f| (f.id, f.label))
        .collect();

    let mut table = Table::new(
        "Payments",
        vec![
            "Id",
            "Student number",
            "Student",
            "Fee type",
            "Amount",
            "Method",
            "Reference",
            "Paid on",
            "Status",
        ],
    );
    for p in storage.list_payments_for_export(query).await? {
        let (number, name) = names
            .get(&p.student_id)
            .cloned()
            .unwrap_or_else(|| (String::new(), format!("#{}", p.student_id)));
        table.push(vec![
            (p.id as f64).into(),
            number.into(),
            name.into(),
            fee_types.get(&p.fee_type_id).map(String::as_str).into(),
            p.amount.into(),
            p.method.as_str().into(),
            p.reference.into(),
            p.paid_on.to_string().into(),
            p.status.as_str().into(),
        ]);
    }
    Ok(table)
}

/// 学生 id -> (学号, 姓名)
async fn student_names(
    storage: &dyn Storage,
    class_id: Option<i64>,
) -> Result<HashMap<i64, (String, String)>> {
    Ok(storage
        .list_student_summaries(class_id)
        .await?
        .into_iter()
        .map(|s| {
            let name = format!("{} {}", s.first_name, s.last_name);
            (s.student_id, (s.student_number, name))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::{HttpMessage, http::StatusCode, test};

    #[actix_web::test]
    async fn test_export_is_recorded_in_history() {
        let storage = fixtures::memory_storage().await;
        let admin = fixtures::user(&storage, "secretaire", UserRole::Admin).await;
        fixtures::student(&storage, "inscrit", None, None).await;

        let service = ExportService {
            storage: Some(Arc::new(storage)),
        };
        let request = test::TestRequest::default().to_http_request();
        request.extensions_mut().insert(admin.clone());

        let resp = service
            .students(&request, StudentExportParams::default())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let logs = service
            .get_storage(&request)
            .list_export_logs(admin.id, HISTORY_LIMIT)
            .await
            .unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].kind, "students");
        assert_eq!(logs[0].format, "csv");
        assert_eq!(logs[0].row_count, 1);
        assert!(logs[0].size_bytes > 0);
        assert!(logs[0].filename.ends_with(".csv"));

        let resp = service.history(&request).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_history_is_per_user() {
        let storage = fixtures::memory_storage().await;
        let admin = fixtures::user(&storage, "secretaire", UserRole::Admin).await;
        let accountant = fixtures::user(&storage, "comptable", UserRole::Accountant).await;

        let service = ExportService {
            storage: Some(Arc::new(storage)),
        };
        let request = test::TestRequest::default().to_http_request();
        request.extensions_mut().insert(admin.clone());
        service
            .payments(&request, PaymentExportParams::default())
            .await
            .unwrap();

        let storage = service.get_storage(&request);
        assert_eq!(storage.list_export_logs(admin.id, HISTORY_LIMIT).await.unwrap().len(), 1);
        assert!(
            storage
                .list_export_logs(accountant.id, HISTORY_LIMIT)
                .await
                .unwrap()
                .is_empty()
        );
    }
}
