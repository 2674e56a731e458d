use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid code regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度校验：5 <= x <= 16
    if username.len() < 5 || username.len() > 16 {
        return Err("Username length must be between 5 and 16 characters");
    }
    // 用户名格式校验：只能包含字母、数字、下划线或连字符
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证密码是否符合安全策略
///
/// 策略要求：
/// - 最小长度：8 字符
/// - 必须包含：大写字母 + 小写字母 + 数字
/// - 可选：特殊字符（增强安全性）
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    // 1. 长度检查：至少 8 个字符
    if password.len() < 8 {
        errors.push("Password must be at least 8 characters long");
    }

    // 2. 大写字母检查
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }

    // 3. 小写字母检查
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }

    // 4. 数字检查
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    // 5. 常见弱密码检查
    let weak_passwords = [
        "password",
        "12345678",
        "123456789",
        "qwerty123",
        "admin123",
        "password1",
        "Password1",
        "Qwerty123",
        "Abcd1234",
    ];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// 简化的密码验证（返回 Result）
pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(result.error_message())
    }
}

/// 分数必须在 0 到 20 之间
pub fn validate_grade_value(value: f64) -> Result<(), &'static str> {
    if !value.is_finite() || !(0.0..=20.0).contains(&value) {
        return Err("Grade must be between 0 and 20");
    }
    Ok(())
}

/// 系数必须为正数
pub fn validate_coefficient(value: f64) -> Result<(), &'static str> {
    if !value.is_finite() || value <= 0.0 {
        return Err("Coefficient must be greater than 0");
    }
    Ok(())
}

/// 解析 `YYYY-MM-DD` 日期
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{value}', expected YYYY-MM-DD"))
}

/// 解析 `HH:MM` 时间
pub fn parse_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| format!("Invalid time '{value}', expected HH:MM"))
}

/// 校验开始时间早于结束时间
pub fn validate_time_range(start: &str, end: &str) -> Result<(), String> {
    let start_time = parse_time(start)?;
    let end_time = parse_time(end)?;
    if start_time >= end_time {
        return Err("Start time must be before end time".to_string());
    }
    Ok(())
}

/// 代码（学年、专业、班级、科目等）只允许字母数字、下划线和连字符
pub fn validate_code(code: &str) -> Result<(), &'static str> {
    if code.is_empty() || code.len() > 32 {
        return Err("Code length must be between 1 and 32 characters");
    }
    if !CODE_RE.is_match(code) {
        return Err("Code must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

/// 必填文本字段
pub fn validate_required(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecureP@ss1").is_valid);
        assert!(validate_password("MyP@ssw0rd").is_valid);
        assert!(validate_password("SecurePass123").is_valid);
    }

    #[test]
    fn test_short_password() {
        let result = validate_password("Ab1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must be at least 8 characters long")
        );
    }

    #[test]
    fn test_no_uppercase() {
        let result = validate_password("abcd1234");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one uppercase letter")
        );
    }

    #[test]
    fn test_no_lowercase() {
        let result = validate_password("ABCD1234");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one lowercase letter")
        );
    }

    #[test]
    fn test_no_digit() {
        let result = validate_password("AbcdEfgh");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one digit")
        );
    }

    #[test]
    fn test_common_password() {
        let result = validate_password("Password1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
    }

    #[test]
    fn test_grade_value_bounds() {
        assert!(validate_grade_value(0.0).is_ok());
        assert!(validate_grade_value(20.0).is_ok());
        assert!(validate_grade_value(12.5).is_ok());
        assert!(validate_grade_value(-0.5).is_err());
        assert!(validate_grade_value(20.01).is_err());
        assert!(validate_grade_value(f64::NAN).is_err());
    }

    #[test]
    fn test_coefficient() {
        assert!(validate_coefficient(1.0).is_ok());
        assert!(validate_coefficient(0.0).is_err());
        assert!(validate_coefficient(-2.0).is_err());
    }

    #[test]
    fn test_parse_date_and_time() {
        assert_eq!(
            parse_date("2025-02-28").unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        assert!(parse_date("2025-02-30").is_err());
        assert!(parse_date("28/02/2025").is_err());
        assert!(parse_time("08:30").is_ok());
        assert!(parse_time("25:00").is_err());
    }

    #[test]
    fn test_time_range() {
        assert!(validate_time_range("08:00", "10:00").is_ok());
        assert!(validate_time_range("10:00", "10:00").is_err());
        assert!(validate_time_range("11:00", "10:00").is_err());
    }

    #[test]
    fn test_code_and_username() {
        assert!(validate_code("L1-INFO").is_ok());
        assert!(validate_code("bad code").is_err());
        assert!(validate_code("").is_err());
        assert!(validate_username("admin").is_ok());
        assert!(validate_username("abc").is_err());
        assert!(validate_email("prof@campus.edu").is_ok());
        assert!(validate_email("prof@campus").is_err());
    }
}
