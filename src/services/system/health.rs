use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::models::{ApiResponse, AppStartTime, system::responses::HealthResponse};

pub async fn handle_health(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let uptime_seconds = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|start| {
            chrono::Utc::now()
                .signed_duration_since(start.start_datetime)
                .num_seconds()
        })
        .unwrap_or(0);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        HealthResponse {
            status: "ok".to_string(),
            message: format!("{} is running", env!("CARGO_PKG_NAME")),
            uptime_seconds,
        },
        "Service is healthy",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_health_reports_uptime() {
        let start = AppStartTime {
            start_datetime: chrono::Utc::now() - chrono::Duration::seconds(90),
        };
        let req = TestRequest::default()
            .app_data(web::Data::new(start))
            .to_http_request();

        let resp = handle_health(&req).await.unwrap();
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"]["status"], "ok");
        assert!(json["data"]["uptime_seconds"].as_i64().unwrap() >= 90);
    }
}
