pub mod health;
pub mod settings;
pub mod settings_cache;

pub use settings_cache::DynamicConfig;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::system::requests::{SettingAuditParams, UpdateSettingRequest};
use crate::storage::Storage;

pub struct SystemService {
    storage: Option<Arc<dyn Storage>>,
}

impl SystemService {
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

    pub async fn health(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        health::handle_health(request).await
    }

    // 全部配置（管理员）
    pub async fn list_settings(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        settings::list_settings(self, request).await
    }

    // 公开配置（所有登录用户）
    pub async fn list_public_settings(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        settings::list_public_settings(self, request).await
    }

    pub async fn update_setting(
        &self,
        request: &HttpRequest,
        key: String,
        req: UpdateSettingRequest,
    ) -> ActixResult<HttpResponse> {
        settings::update_setting(self, request, key, req).await
    }

    pub async fn list_setting_audits(
        &self,
        request: &HttpRequest,
        params: SettingAuditParams,
    ) -> ActixResult<HttpResponse> {
        settings::list_setting_audits(self, request, params).await
    }
}
