//! 动态配置缓存
//!
//! 启动时从 `system_settings` 表加载，管理员修改配置后热更新。
//! 数据库中没有的键回退到 `AppConfig`。

use std::collections::HashMap;
use std::sync::OnceLock;
use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::models::system::entities::KnownSettingKey;

/// 动态配置缓存
static DYNAMIC_CONFIG: OnceLock<RwLock<DynamicConfigCache>> = OnceLock::new();

#[derive(Debug, Default)]
struct DynamicConfigCache {
    settings: HashMap<String, String>,
    initialized: bool,
}

/// 动态配置访问接口
pub struct DynamicConfig;

impl DynamicConfig {
    /// 初始化动态配置缓存
    pub async fn init(settings: Vec<(String, String)>) {
        let cache = DYNAMIC_CONFIG.get_or_init(|| RwLock::new(DynamicConfigCache::default()));

        let mut guard = cache.write().await;
        guard.settings.clear();
        for (key, value) in settings {
            guard.settings.insert(key, value);
        }
        guard.initialized = true;

        tracing::info!(
            "动态配置缓存初始化完成，加载了 {} 个配置项",
            guard.settings.len()
        );
    }

    /// 更新单个配置项
    pub async fn update(key: &str, value: &str) {
        if let Some(cache) = DYNAMIC_CONFIG.get() {
            let mut guard = cache.write().await;
            guard.settings.insert(key.to_string(), value.to_string());
            tracing::debug!("动态配置更新: {} = {}", key, value);
        }
    }

    async fn get_string(key: KnownSettingKey) -> Option<String> {
        if let Some(cache) = DYNAMIC_CONFIG.get() {
            let guard = cache.read().await;
            return guard
                .settings
                .get(key.as_str())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
        }
        None
    }

    async fn get_i64(key: KnownSettingKey) -> Option<i64> {
        Self::get_string(key).await.and_then(|v| v.parse().ok())
    }

    async fn get_f64(key: KnownSettingKey) -> Option<f64> {
        Self::get_string(key)
            .await
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }

    async fn get_json_array(key: KnownSettingKey) -> Option<Vec<String>> {
        Self::get_string(key)
            .await
            .and_then(|v| serde_json::from_str(&v).ok())
    }

    // ============================================
    // 学校
    // ============================================

    pub async fn school_name() -> String {
        Self::get_string(KnownSettingKey::SchoolName)
            .await
            .unwrap_or_else(|| AppConfig::get().school.name.clone())
    }

    /// 及格线（满分 20）
    pub async fn pass_threshold() -> f64 {
        Self::get_f64(KnownSettingKey::PassThreshold)
            .await
            .unwrap_or(AppConfig::get().school.pass_threshold)
    }

    // ============================================
    // 财务
    // ============================================

    /// 逾期缴费罚金比例（%）
    pub async fn late_payment_penalty() -> f64 {
        Self::get_f64(KnownSettingKey::LatePaymentPenalty)
            .await
            .unwrap_or(AppConfig::get().school.late_payment_penalty)
    }

    /// 最后一次缴费超过该天数且仍欠费时锁定成绩查询
    pub async fn unpaid_lock_days() -> i64 {
        Self::get_i64(KnownSettingKey::UnpaidLockDays)
            .await
            .unwrap_or(AppConfig::get().school.unpaid_lock_days)
    }

    // ============================================
    // 图书馆
    // ============================================

    pub async fn loan_limit() -> i64 {
        Self::get_i64(KnownSettingKey::LoanLimit)
            .await
            .unwrap_or(AppConfig::get().school.loan_limit)
    }

    pub async fn loan_days() -> i64 {
        Self::get_i64(KnownSettingKey::LoanDays)
            .await
            .unwrap_or(AppConfig::get().school.loan_days)
    }

    pub async fn daily_fine() -> f64 {
        Self::get_f64(KnownSettingKey::DailyFine)
            .await
            .unwrap_or(AppConfig::get().school.daily_fine as f64)
    }

    pub async fn reservation_days() -> i64 {
        Self::get_i64(KnownSettingKey::ReservationDays)
            .await
            .unwrap_or(AppConfig::get().school.reservation_days)
    }

    // ============================================
    // 认证与跨域
    // ============================================

    /// Access Token 有效期（分钟）
    pub async fn access_token_expiry() -> i64 {
        Self::get_i64(KnownSettingKey::AccessTokenExpiry)
            .await
            .unwrap_or(AppConfig::get().jwt.access_token_expiry)
    }

    /// Refresh Token 有效期（天）
    pub async fn refresh_token_expiry() -> i64 {
        Self::get_i64(KnownSettingKey::RefreshTokenExpiry)
            .await
            .unwrap_or(AppConfig::get().jwt.refresh_token_expiry)
    }

    /// 勾选“记住我”时使用更长的配置
    pub async fn refresh_token_lifetime(remember_me: bool) -> chrono::Duration {
        if remember_me {
            chrono::Duration::days(AppConfig::get().jwt.refresh_token_remember_me_expiry)
        } else {
            chrono::Duration::days(Self::refresh_token_expiry().await)
        }
    }

    pub async fn cors_allowed_origins() -> Vec<String> {
        Self::get_json_array(KnownSettingKey::CorsAllowedOrigins)
            .await
            .unwrap_or_else(|| AppConfig::get().cors.allowed_origins.clone())
    }

    /// CORS 预检请求缓存时间（秒）
    pub async fn cors_max_age() -> usize {
        Self::get_i64(KnownSettingKey::CorsMaxAge)
            .await
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(AppConfig::get().cors.max_age)
    }

    pub async fn is_initialized() -> bool {
        if let Some(cache) = DYNAMIC_CONFIG.get() {
            let guard = cache.read().await;
            return guard.initialized;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 全局缓存在测试间共享，所以放在同一个测试里按顺序断言
    #[tokio::test]
    async fn test_overrides_and_fallbacks() {
        DynamicConfig::init(vec![
            ("library.loan_limit".to_string(), "3".to_string()),
            ("grading.pass_threshold".to_string(), "12.5".to_string()),
            ("library.daily_fine".to_string(), "not-a-number".to_string()),
        ])
        .await;

        assert!(DynamicConfig::is_initialized().await);
        assert_eq!(DynamicConfig::loan_limit().await, 3);
        assert_eq!(DynamicConfig::pass_threshold().await, 12.5);
        // 无法解析时回退到配置文件
        assert_eq!(
            DynamicConfig::daily_fine().await,
            AppConfig::get().school.daily_fine as f64
        );

        DynamicConfig::update("library.loan_limit", "7").await;
        assert_eq!(DynamicConfig::loan_limit().await, 7);

        assert!(
            DynamicConfig::refresh_token_lifetime(true).await
                >= DynamicConfig::refresh_token_lifetime(false).await
        );
    }
}
