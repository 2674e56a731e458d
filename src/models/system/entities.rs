use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 配置值类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub enum SettingValueType {
    String,
    Integer,
    Float,
    Boolean,
    JsonArray,
}

impl<'de> Deserialize<'de> for SettingValueType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<SettingValueType>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的配置值类型: '{s}'. 支持的类型: string, integer, float, boolean, json_array"
            ))
        })
    }
}

impl std::fmt::Display for SettingValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingValueType::String => write!(f, "string"),
            SettingValueType::Integer => write!(f, "integer"),
            SettingValueType::Float => write!(f, "float"),
            SettingValueType::Boolean => write!(f, "boolean"),
            SettingValueType::JsonArray => write!(f, "json_array"),
        }
    }
}

impl std::str::FromStr for SettingValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(SettingValueType::String),
            "integer" => Ok(SettingValueType::Integer),
            "float" => Ok(SettingValueType::Float),
            "boolean" => Ok(SettingValueType::Boolean),
            "json_array" => Ok(SettingValueType::JsonArray),
            _ => Err(format!("Invalid setting value type: {s}")),
        }
    }
}

impl SettingValueType {
    /// 把存储的字符串解析为带类型的 JSON 值
    pub fn parse_value(&self, raw: &str) -> Result<serde_json::Value, String> {
        let raw = raw.trim();
        match self {
            SettingValueType::String => Ok(serde_json::Value::String(raw.to_string())),
            SettingValueType::Integer => raw
                .parse::<i64>()
                .map(serde_json::Value::from)
                .map_err(|_| format!("'{raw}' is not a valid integer")),
            SettingValueType::Float => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(serde_json::Value::from)
                .ok_or_else(|| format!("'{raw}' is not a valid number")),
            SettingValueType::Boolean => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(serde_json::Value::Bool(true)),
                "false" | "0" => Ok(serde_json::Value::Bool(false)),
                _ => Err(format!("'{raw}' is not a valid boolean")),
            },
            SettingValueType::JsonArray => match serde_json::from_str::<serde_json::Value>(raw) {
                Ok(value @ serde_json::Value::Array(_)) => Ok(value),
                _ => Err(format!("'{raw}' is not a valid JSON array")),
            },
        }
    }
}

/// 已知配置键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownSettingKey {
    SchoolName,
    SchoolAddress,
    SchoolPhone,
    SchoolEmail,
    PassThreshold,
    LatePaymentPenalty,
    UnpaidLockDays,
    LoanLimit,
    LoanDays,
    DailyFine,
    ReservationDays,
    AccessTokenExpiry,
    RefreshTokenExpiry,
    CorsAllowedOrigins,
    CorsMaxAge,
}

impl KnownSettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownSettingKey::SchoolName => "school.name",
            KnownSettingKey::SchoolAddress => "school.address",
            KnownSettingKey::SchoolPhone => "school.phone",
            KnownSettingKey::SchoolEmail => "school.email",
            KnownSettingKey::PassThreshold => "grading.pass_threshold",
            KnownSettingKey::LatePaymentPenalty => "finance.late_payment_penalty",
            KnownSettingKey::UnpaidLockDays => "finance.unpaid_lock_days",
            KnownSettingKey::LoanLimit => "library.loan_limit",
            KnownSettingKey::LoanDays => "library.loan_days",
            KnownSettingKey::DailyFine => "library.daily_fine",
            KnownSettingKey::ReservationDays => "library.reservation_days",
            KnownSettingKey::AccessTokenExpiry => "jwt.access_token_expiry",
            KnownSettingKey::RefreshTokenExpiry => "jwt.refresh_token_expiry",
            KnownSettingKey::CorsAllowedOrigins => "cors.allowed_origins",
            KnownSettingKey::CorsMaxAge => "cors.max_age",
        }
    }

    pub fn value_type(&self) -> SettingValueType {
        match self {
            KnownSettingKey::SchoolName
            | KnownSettingKey::SchoolAddress
            | KnownSettingKey::SchoolPhone
            | KnownSettingKey::SchoolEmail => SettingValueType::String,
            KnownSettingKey::PassThreshold | KnownSettingKey::LatePaymentPenalty => {
                SettingValueType::Float
            }
            KnownSettingKey::CorsAllowedOrigins => SettingValueType::JsonArray,
            _ => SettingValueType::Integer,
        }
    }

    /// 是否可以对所有登录用户公开
    pub fn is_public(&self) -> bool {
        !matches!(
            self,
            KnownSettingKey::AccessTokenExpiry
                | KnownSettingKey::RefreshTokenExpiry
                | KnownSettingKey::CorsAllowedOrigins
                | KnownSettingKey::CorsMaxAge
        )
    }

    pub fn all() -> &'static [KnownSettingKey] {
        &[
            KnownSettingKey::SchoolName,
            KnownSettingKey::SchoolAddress,
            KnownSettingKey::SchoolPhone,
            KnownSettingKey::SchoolEmail,
            KnownSettingKey::PassThreshold,
            KnownSettingKey::LatePaymentPenalty,
            KnownSettingKey::UnpaidLockDays,
            KnownSettingKey::LoanLimit,
            KnownSettingKey::LoanDays,
            KnownSettingKey::DailyFine,
            KnownSettingKey::ReservationDays,
            KnownSettingKey::AccessTokenExpiry,
            KnownSettingKey::RefreshTokenExpiry,
            KnownSettingKey::CorsAllowedOrigins,
            KnownSettingKey::CorsMaxAge,
        ]
    }
}

impl std::str::FromStr for KnownSettingKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KnownSettingKey::all()
            .iter()
            .find(|key| key.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown setting key: {s}"))
    }
}

/// 系统设置实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SystemSetting {
    pub key: String,
    pub value: String,
    pub value_type: SettingValueType,
    pub description: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub updated_by: Option<i64>,
}

/// 带类型值的设置（对外输出）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct TypedSetting {
    pub key: String,
    pub value: serde_json::Value,
    pub value_type: SettingValueType,
    pub description: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<SystemSetting> for TypedSetting {
    fn from(setting: SystemSetting) -> Self {
        let value = setting
            .value_type
            .parse_value(&setting.value)
            .unwrap_or(serde_json::Value::String(setting.value.clone()));
        Self {
            key: setting.key,
            value,
            value_type: setting.value_type,
            description: setting.description,
            updated_at: setting.updated_at,
        }
    }
}

/// 设置审计日志实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SettingAudit {
    pub id: i64,
    pub setting_key: String,
    pub old_value: Option<String>,
    pub new_value: String,
    pub changed_by: i64,
    pub changed_at: chrono::DateTime<chrono::Utc>,
    pub ip_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_typed_values() {
        assert_eq!(
            SettingValueType::Integer.parse_value("30").unwrap(),
            serde_json::json!(30)
        );
        assert_eq!(
            SettingValueType::Float.parse_value("10.5").unwrap(),
            serde_json::json!(10.5)
        );
        assert_eq!(
            SettingValueType::Boolean.parse_value("TRUE").unwrap(),
            serde_json::json!(true)
        );
        assert!(SettingValueType::Integer.parse_value("3.5").is_err());
        assert!(SettingValueType::Float.parse_value("abc").is_err());
        assert!(SettingValueType::JsonArray.parse_value("{}").is_err());
    }

    #[test]
    fn test_known_keys() {
        let key: KnownSettingKey = "library.loan_limit".parse().unwrap();
        assert_eq!(key, KnownSettingKey::LoanLimit);
        assert_eq!(key.value_type(), SettingValueType::Integer);
        assert_eq!(
            KnownSettingKey::PassThreshold.value_type(),
            SettingValueType::Float
        );
        assert!("app.system_name".parse::<KnownSettingKey>().is_err());
        assert!(!KnownSettingKey::CorsMaxAge.is_public());
        assert!(KnownSettingKey::SchoolName.is_public());
    }

    #[test]
    fn test_typed_setting_falls_back_to_string() {
        let setting = SystemSetting {
            key: "library.loan_days".into(),
            value: "oops".into(),
            value_type: SettingValueType::Integer,
            description: None,
            updated_at: chrono::Utc::now(),
            updated_by: None,
        };
        let typed = TypedSetting::from(setting);
        assert_eq!(typed.value, serde_json::json!("oops"));
    }
}
