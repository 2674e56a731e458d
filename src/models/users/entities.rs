use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserRole {
    Admin,      // 管理员
    Accountant, // 财务
    Teacher,    // 教师
    Student,    // 学生
    Parent,     // 家长
}

impl UserRole {
    pub const ADMIN: &'static str = "admin";
    pub const ACCOUNTANT: &'static str = "accountant";
    pub const TEACHER: &'static str = "teacher";
    pub const STUDENT: &'static str = "student";
    pub const PARENT: &'static str = "parent";

    /// 学生、教师、家长各有一张档案表
    pub fn has_profile(&self) -> bool {
        matches!(self, Self::Student | Self::Teacher | Self::Parent)
    }

    /// 角色变更不能跨越档案：只允许保持不变，或在管理员与财务之间切换
    pub fn can_change_to(&self, target: UserRole) -> bool {
        *self == target || (!self.has_profile() && !target.has_profile())
    }

    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    pub fn finance_roles() -> &'static [&'static UserRole] {
        &[&Self::Accountant, &Self::Admin]
    }
    pub fn teacher_roles() -> &'static [&'static UserRole] {
        &[&Self::Teacher, &Self::Admin]
    }
    pub fn student_roles() -> &'static [&'static UserRole] {
        &[&Self::Student]
    }
    pub fn parent_roles() -> &'static [&'static UserRole] {
        &[&Self::Parent]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[
            &Self::Admin,
            &Self::Accountant,
            &Self::Teacher,
            &Self::Student,
            &Self::Parent,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => Self::ADMIN,
            UserRole::Accountant => Self::ACCOUNTANT,
            UserRole::Teacher => Self::TEACHER,
            UserRole::Student => Self::STUDENT,
            UserRole::Parent => Self::PARENT,
        }
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: admin, accountant, teacher, student, parent"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::ADMIN => Ok(UserRole::Admin),
            Self::ACCOUNTANT => Ok(UserRole::Accountant),
            Self::TEACHER => Ok(UserRole::Teacher),
            Self::STUDENT => Ok(UserRole::Student),
            Self::PARENT => Ok(UserRole::Parent),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserStatus {
    Active,    // 正常
    Inactive,  // 停用
    Suspended, // 暂停
}

impl<'de> Deserialize<'de> for UserStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户状态: '{s}'. 支持的状态: active, inactive, suspended"
            ))
        })
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Inactive => write!(f, "inactive"),
            UserStatus::Suspended => write!(f, "suspended"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "suspended" => Ok(UserStatus::Suspended),
            _ => Err(format!("Invalid user status: {s}")),
        }
    }
}

impl UserStatus {
    /// 启用/停用切换；暂停的账户切换后变为启用
    pub fn toggled(self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Inactive,
            UserStatus::Inactive | UserStatus::Suspended => UserStatus::Active,
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(
        &self,
        access_expiry_minutes: i64,
        refresh_lifetime: chrono::TimeDelta,
    ) -> Result<crate::utils::jwt::TokenPair, String> {
        crate::utils::jwt::JwtUtils::generate_token_pair(
            self.id,
            self.role.as_str(),
            access_expiry_minutes,
            refresh_lifetime,
        )
        .map_err(|e| format!("生成 token 对失败: {e}"))
    }
}

/// 学生档案
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct StudentProfile {
    pub id: i64,
    pub user_id: i64,
    pub student_number: String,
    pub birth_date: Option<chrono::NaiveDate>,
    pub gender: Option<String>,
    pub class_id: Option<i64>,
    pub academic_year_id: Option<i64>,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
    pub is_active: bool,
}

/// 教师档案
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct TeacherProfile {
    pub id: i64,
    pub user_id: i64,
    pub staff_number: String,
    pub specialty: Option<String>,
    pub hired_on: Option<chrono::NaiveDate>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 家长档案
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct ParentProfile {
    pub id: i64,
    pub user_id: i64,
    pub profession: Option<String>,
    pub relationship: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 按角色附带的档案
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum RoleProfile {
    Student(StudentProfile),
    Teacher(TeacherProfile),
    Parent(ParentProfile),
}

/// 学生及其账户信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct StudentSummary {
    pub student_id: i64,
    pub user_id: i64,
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub class_id: Option<i64>,
    pub class_label: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_and_groups() {
        for role in UserRole::all_roles() {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), **role);
        }
        assert!(UserRole::finance_roles().contains(&&UserRole::Accountant));
        assert!(!UserRole::teacher_roles().contains(&&UserRole::Student));
        assert!("user".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_deserialize_error_lists_roles() {
        let err = serde_json::from_str::<UserRole>("\"janitor\"").unwrap_err();
        assert!(err.to_string().contains("accountant"));
    }

    #[test]
    fn test_role_change_stays_within_profile() {
        assert!(UserRole::Admin.can_change_to(UserRole::Accountant));
        assert!(UserRole::Teacher.can_change_to(UserRole::Teacher));
        assert!(!UserRole::Teacher.can_change_to(UserRole::Admin));
        assert!(!UserRole::Admin.can_change_to(UserRole::Student));
        assert!(!UserRole::Parent.can_change_to(UserRole::Student));
    }

    #[test]
    fn test_status_toggle() {
        assert_eq!(UserStatus::Active.toggled(), UserStatus::Inactive);
        assert_eq!(UserStatus::Inactive.toggled(), UserStatus::Active);
        assert_eq!(UserStatus::Suspended.toggled(), UserStatus::Active);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let now = chrono::Utc::now();
        let user = User {
            id: 1,
            username: "admin".into(),
            email: "admin@campus.local".into(),
            password_hash: "secret".into(),
            role: UserRole::Admin,
            status: UserStatus::Active,
            first_name: "Ada".into(),
            last_name: "Admin".into(),
            phone: None,
            address: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert_eq!(user.full_name(), "Ada Admin");
    }
}
