use rand::Rng;
use rand::distr::Alphanumeric;

/// 生成指定长度的字母数字随机串
pub fn generate_random_code(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// 生成满足密码策略的随机初始密码
pub fn generate_initial_password() -> String {
    let mut rng = rand::rng();
    let upper = rng.random_range(b'A'..=b'Z') as char;
    let lower = rng.random_range(b'a'..=b'z') as char;
    let digit = rng.random_range(b'0'..=b'9') as char;
    format!("{upper}{lower}{digit}{}", generate_random_code(13))
}

/// 学号
pub fn student_number(user_id: i64) -> String {
    format!("ESA{user_id:06}")
}

/// 教师工号
pub fn staff_number(user_id: i64) -> String {
    format!("ENS{user_id:04}")
}

/// 馆藏副本编号
pub fn copy_number(book_id: i64, index: i64) -> String {
    format!("EX{book_id:04}-{index:03}")
}

/// 缴费收据编号
pub fn receipt_number(payment_id: i64) -> String {
    format!("PAY{payment_id:06}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate::validate_password;

    #[test]
    fn test_random_code_length() {
        let code = generate_random_code(12);
        assert_eq!(code.len(), 12);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_initial_password_meets_policy() {
        for _ in 0..20 {
            assert!(validate_password(&generate_initial_password()).is_valid);
        }
    }

    #[test]
    fn test_number_formats() {
        assert_eq!(student_number(12), "ESA000012");
        assert_eq!(staff_number(7), "ENS0007");
        assert_eq!(copy_number(3, 12), "EX0003-012");
        assert_eq!(receipt_number(45), "PAY000045");
    }
}
