use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{DynamicConfig, SystemService};
use crate::models::{
    ApiResponse, ErrorCode,
    system::{
        entities::{KnownSettingKey, TypedSetting},
        requests::{SettingAuditParams, UpdateSettingRequest},
        responses::SettingsListResponse,
    },
};
use crate::services::{bad_request, client_ip, current_user, not_found, read_error, storage_error};

/// 获取所有配置（带类型值）
pub async fn list_settings(
    service: &SystemService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_all_settings().await {
        Ok(settings) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SettingsListResponse {
                settings: settings.into_iter().map(TypedSetting::from).collect(),
            },
            "Settings retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}

/// 可以公开的学校配置
pub async fn list_public_settings(
    service: &SystemService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_all_settings().await {
        Ok(settings) => {
            let settings = settings
                .into_iter()
                .filter(|s| {
                    s.key
                        .parse::<KnownSettingKey>()
                        .is_ok_and(|key| key.is_public())
                })
                .map(TypedSetting::from)
                .collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SettingsListResponse { settings },
                "Settings retrieved successfully",
            )))
        }
        Err(e) => Ok(read_error(&e)),
    }
}

/// 更新单个配置，值必须符合该配置项的类型
pub async fn update_setting(
    service: &SystemService,
    request: &HttpRequest,
    key: String,
    req: UpdateSettingRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let existing = match storage.get_setting_by_key(&key).await {
        Ok(Some(setting)) => setting,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::SettingNotFound,
                format!("Setting '{key}' not found"),
            ));
        }
        Err(e) => return Ok(read_error(&e)),
    };

    // 已知键以代码中的类型为准
    let value_type = key
        .parse::<KnownSettingKey>()
        .map(|k| k.value_type())
        .unwrap_or(existing.value_type);

    let raw = req.raw_value();
    let normalized = match value_type.parse_value(&raw) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(value) => value.to_string(),
        Err(msg) => return Ok(bad_request(ErrorCode::SettingValueInvalid, msg)),
    };

    match storage
        .update_setting(&key, &normalized, user.id, client_ip(request))
        .await
    {
        Ok(setting) => {
            DynamicConfig::update(&key, &setting.value).await;
            tracing::info!("Setting {} updated by user {}", key, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                TypedSetting::from(setting),
                "Setting updated successfully",
            )))
        }
        Err(e) => Ok(storage_error(&e, ErrorCode::Conflict)),
    }
}

/// 配置修改记录
pub async fn list_setting_audits(
    service: &SystemService,
    request: &HttpRequest,
    params: SettingAuditParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_setting_audits(params).await {
        Ok(audits) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            audits,
            "Setting audits retrieved successfully",
        ))),
        Err(e) => Ok(read_error(&e)),
    }
}
