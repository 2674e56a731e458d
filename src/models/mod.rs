pub mod academics;
pub mod analytics;
pub mod audit;
pub mod auth;
pub mod common;
pub mod communication;
pub mod exports;
pub mod finance;
pub mod gamification;
pub mod grades;
pub mod library;
pub mod system;
pub mod users;

pub use common::{ApiResponse, ItemsResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

use serde::Serialize;
use ts_rs::TS;

/// 业务错误码
///
/// 0 表示成功；1xxx 通用，2xxx 认证，3xxx 用户，4xxx 教务，5xxx 成绩考勤，
/// 6xxx 财务，7xxx 通讯，8xxx 图书馆，9xxx 系统。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    InternalServerError = 1500,

    AuthFailed = 2000,
    AccountInactive = 2001,
    RefreshTokenInvalid = 2002,
    ResetTokenInvalid = 2003,
    OldPasswordIncorrect = 2004,

    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    UserNameInvalid = 3002,
    UserEmailInvalid = 3003,
    UserPasswordInvalid = 3004,
    UserCreationFailed = 3005,
    UserUpdateFailed = 3006,
    UserDeleteFailed = 3007,
    CanNotDeleteCurrentUser = 3008,
    UserRoleChangeNotAllowed = 3009,

    AcademicYearNotFound = 4000,
    ProgramNotFound = 4001,
    LevelNotFound = 4002,
    ClassNotFound = 4003,
    SubjectNotFound = 4004,
    ClassFull = 4005,
    ClassSubjectAlreadyAssigned = 4006,
    TimetableSlotNotFound = 4007,
    StudentNotFound = 4008,
    ParentNotFound = 4009,
    CodeAlreadyExists = 4010,
    ResourceInUse = 4011,
    TeacherNotFound = 4012,

    GradeNotFound = 5000,
    GradeValueInvalid = 5001,
    GradeAlreadyValidated = 5002,
    TeacherNotAssigned = 5003,
    AbsenceNotFound = 5004,
    UnpaidFeesLock = 5005,
    StudentNotInClass = 5006,

    FeeTypeNotFound = 6000,
    ClassFeeAlreadyExists = 6001,
    PaymentNotFound = 6002,
    PaymentAlreadyProcessed = 6003,
    InstallmentNotFound = 6004,
    ClassFeeNotFound = 6005,

    AnnouncementNotFound = 7000,
    MessageNotFound = 7001,
    NotificationNotFound = 7002,

    BookNotFound = 8000,
    CopyNotFound = 8001,
    CopyUnavailable = 8002,
    LoanLimitReached = 8003,
    LoanNotFound = 8004,
    LoanAlreadyReturned = 8005,
    ReservationNotAllowed = 8006,
    ReservationAlreadyExists = 8007,
    ReservationNotFound = 8008,
    FineNotFound = 8009,
    FineAlreadyPaid = 8010,

    SettingNotFound = 9000,
    SettingValueInvalid = 9001,
    ExportFailed = 9002,
    InsufficientData = 9003,
}

/// 应用启动时间，用于健康检查中的 uptime
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::Unauthorized as i32, 1001);
        assert_eq!(ErrorCode::UnpaidFeesLock as i32, 5005);
        assert_eq!(ErrorCode::FineAlreadyPaid as i32, 8010);
    }

    #[test]
    fn test_api_response_shape() {
        let body = serde_json::to_value(ApiResponse::success(3_i64, "ok")).unwrap();
        assert_eq!(body["code"], 0);
        assert_eq!(body["data"], 3);

        let body =
            serde_json::to_value(ApiResponse::error_empty(ErrorCode::NotFound, "missing")).unwrap();
        assert_eq!(body["code"], 1004);
        assert!(body.get("data").is_none());
    }
}
