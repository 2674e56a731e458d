use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 登录日志
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/audit.ts")]
pub struct LoginLog {
    pub id: i64,
    pub user_id: Option<i64>,
    pub identifier: String,
    pub success: bool,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 操作日志
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/audit.ts")]
pub struct ActionLog {
    pub id: i64,
    pub user_id: i64,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub details: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 写入登录日志时使用
#[derive(Debug, Clone)]
pub struct NewLoginLog {
    pub user_id: Option<i64>,
    pub identifier: String,
    pub success: bool,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// 写入操作日志时使用
#[derive(Debug, Clone)]
pub struct NewActionLog {
    pub user_id: i64,
    pub action: &'static str,
    pub entity_type: Option<&'static str>,
    pub entity_id: Option<i64>,
    pub details: Option<String>,
    pub ip_address: Option<String>,
}

impl NewActionLog {
    pub fn new(user_id: i64, action: &'static str) -> Self {
        Self {
            user_id,
            action,
            entity_type: None,
            entity_id: None,
            details: None,
            ip_address: None,
        }
    }

    pub fn entity(mut self, entity_type: &'static str, entity_id: i64) -> Self {
        self.entity_type = Some(entity_type);
        self.entity_id = Some(entity_id);
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn ip(mut self, ip_address: Option<String>) -> Self {
        self.ip_address = ip_address;
        self
    }
}

/// 密码重置令牌
#[derive(Debug, Clone)]
pub struct PasswordReset {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub used: bool,
}

impl PasswordReset {
    pub fn is_usable(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        !self.used && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_password_reset_usable() {
        let now = Utc::now();
        let mut reset = PasswordReset {
            id: 1,
            user_id: 1,
            token: "t".into(),
            expires_at: now + Duration::hours(24),
            used: false,
        };
        assert!(reset.is_usable(now));
        assert!(!reset.is_usable(now + Duration::hours(25)));
        reset.used = true;
        assert!(!reset.is_usable(now));
    }

    #[test]
    fn test_action_log_builder() {
        let log = NewActionLog::new(3, "grade.validate")
            .entity("grade", 12)
            .details("value=15");
        assert_eq!(log.entity_type, Some("grade"));
        assert_eq!(log.entity_id, Some(12));
        assert_eq!(log.details.as_deref(), Some("value=15"));
    }
}
