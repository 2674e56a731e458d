use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 费用类型
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct FeeType {
    pub id: i64,
    pub code: String,
    pub label: String,
    pub amount: f64,
    pub is_mandatory: bool,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 班级应缴费用
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct ClassFee {
    pub id: i64,
    pub class_id: i64,
    pub fee_type_id: i64,
    pub amount: f64,
    pub academic_year_id: i64,
    pub fee_type_label: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
        #[serde(rename_all = "snake_case")]
        #[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse::<$name>().map_err(serde::de::Error::custom)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(format!(
                        concat!("无效的", $label, ": '{}'. 支持: {}"),
                        s,
                        [$($text),+].join(", ")
                    )),
                }
            }
        }
    };
}

string_enum! {
    /// 缴费状态
    PaymentStatus, "缴费状态" {
        Pending => "pending",
        Validated => "validated",
        Rejected => "rejected",
    }
}

string_enum! {
    /// 缴费方式
    PaymentMethod, "缴费方式" {
        Cash => "cash",
        BankTransfer => "bank_transfer",
        Cheque => "cheque",
        Card => "card",
        MobileMoney => "mobile_money",
    }
}

string_enum! {
    /// 分期状态
    InstallmentStatus, "分期状态" {
        Pending => "pending",
        InProgress => "in_progress",
        Paid => "paid",
    }
}

impl InstallmentStatus {
    /// 根据已缴和应缴金额推导状态
    pub fn from_amounts(paid: f64, total: f64) -> Self {
        if paid >= total {
            InstallmentStatus::Paid
        } else if paid > 0.0 {
            InstallmentStatus::InProgress
        } else {
            InstallmentStatus::Pending
        }
    }
}

/// 缴费记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct Payment {
    pub id: i64,
    pub student_id: i64,
    pub fee_type_id: i64,
    pub amount: f64,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub paid_on: chrono::NaiveDate,
    pub status: PaymentStatus,
    pub note: Option<String>,
    pub rejection_reason: Option<String>,
    pub recorded_by: i64,
    pub validated_by: Option<i64>,
    pub validated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 分期付款计划
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct Installment {
    pub id: i64,
    pub student_id: i64,
    pub fee_type_id: i64,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub due_date: Option<chrono::NaiveDate>,
    pub status: InstallmentStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Installment {
    pub fn remaining(&self) -> f64 {
        (self.total_amount - self.paid_amount).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installment_status_from_amounts() {
        assert_eq!(
            InstallmentStatus::from_amounts(0.0, 100.0),
            InstallmentStatus::Pending
        );
        assert_eq!(
            InstallmentStatus::from_amounts(40.0, 100.0),
            InstallmentStatus::InProgress
        );
        assert_eq!(
            InstallmentStatus::from_amounts(100.0, 100.0),
            InstallmentStatus::Paid
        );
        assert_eq!(
            InstallmentStatus::from_amounts(120.0, 100.0),
            InstallmentStatus::Paid
        );
    }

    #[test]
    fn test_payment_enums_parse() {
        assert_eq!(
            "bank_transfer".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::BankTransfer
        );
        let err = "bitcoin".parse::<PaymentMethod>().unwrap_err();
        assert!(err.contains("cash"));
        assert_eq!(PaymentStatus::Validated.to_string(), "validated");
        assert!(serde_json::from_str::<PaymentStatus>("\"paid\"").is_err());
    }
}
