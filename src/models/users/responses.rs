use super::entities::{RoleProfile, StudentProfile, StudentSummary, User};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 用户列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListResponse {
    pub items: Vec<User>,
    pub pagination: PaginationInfo,
}

/// 用户及其角色档案
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserDetailResponse {
    pub user: User,
    pub profile: Option<RoleProfile>,
}

/// 学生门户的个人信息
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct StudentProfileResponse {
    pub user: User,
    pub profile: StudentProfile,
    pub class_label: Option<String>,
    pub academic_year_label: Option<String>,
}

/// 家长的孩子列表
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct ChildrenResponse {
    pub items: Vec<StudentSummary>,
}

/// 搜索结果中的用户（不含敏感字段）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserSearchItem {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: super::entities::UserRole,
}

impl From<User> for UserSearchItem {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
        }
    }
}
