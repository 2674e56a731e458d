//! 测试用内存数据库与基础数据

use super::SeaOrmStorage;
use crate::models::academics::requests::{
    CreateAcademicYearRequest, CreateClassRequest, CreateLevelRequest, CreateProgramRequest,
    CreateSubjectRequest,
};
use crate::models::users::entities::{StudentProfile, User, UserRole};
use crate::models::users::requests::{CreateUserRequest, StudentProfileInput};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database};

/// 内存库只存在于单个连接上，连接池必须固定为 1
pub(crate) async fn memory_storage() -> SeaOrmStorage {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opt).await.expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("run migrations");

    SeaOrmStorage { db }
}

/// 当前学年、一个专业和一个年级
pub(crate) struct School {
    pub year_id: i64,
    pub program_id: i64,
    pub level_id: i64,
}

pub(crate) async fn school(storage: &SeaOrmStorage) -> School {
    let year = storage
        .create_academic_year_impl(CreateAcademicYearRequest {
            code: "2025-2026".into(),
            label: "Année 2025-2026".into(),
            start_date: "2025-09-01".into(),
            end_date: "2026-07-15".into(),
            is_active: true,
        })
        .await
        .expect("create year");
    let program = storage
        .create_program_impl(CreateProgramRequest {
            code: "SCI".into(),
            label: "Sciences".into(),
            description: None,
        })
        .await
        .expect("create program");
    let level = storage
        .create_level_impl(CreateLevelRequest {
            code: "L1".into(),
            label: "Niveau 1".into(),
            rank: 1,
        })
        .await
        .expect("create level");

    School {
        year_id: year.id,
        program_id: program.id,
        level_id: level.id,
    }
}

pub(crate) async fn class(
    storage: &SeaOrmStorage,
    school: &School,
    code: &str,
    capacity: i32,
) -> i64 {
    storage
        .create_class_impl(CreateClassRequest {
            code: code.into(),
            label: format!("Classe {code}"),
            program_id: school.program_id,
            level_id: school.level_id,
            academic_year_id: school.year_id,
            capacity: Some(capacity),
        })
        .await
        .expect("create class")
        .id
}

pub(crate) async fn subject(storage: &SeaOrmStorage, code: &str, coefficient: f64) -> i64 {
    storage
        .create_subject_impl(CreateSubjectRequest {
            code: code.into(),
            label: format!("Matière {code}"),
            coefficient: Some(coefficient),
            hours: None,
        })
        .await
        .expect("create subject")
        .id
}

pub(crate) fn user_request(username: &str, role: UserRole) -> CreateUserRequest {
    CreateUserRequest {
        username: username.into(),
        email: format!("{username}@campus.local"),
        password: "$argon2id$test-hash".into(),
        role,
        first_name: "Test".into(),
        last_name: username.into(),
        phone: None,
        address: None,
        student: None,
        teacher: None,
        parent: None,
    }
}

pub(crate) async fn user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> User {
    storage
        .create_user_impl(user_request(username, role))
        .await
        .expect("create user")
}

/// 创建学生账号并返回其档案
pub(crate) async fn student(
    storage: &SeaOrmStorage,
    username: &str,
    class_id: Option<i64>,
    year_id: Option<i64>,
) -> StudentProfile {
    let mut req = user_request(username, UserRole::Student);
    req.student = Some(StudentProfileInput {
        class_id,
        academic_year_id: year_id,
        ..Default::default()
    });
    let user = storage.create_user_impl(req).await.expect("create student");

    storage
        .get_student_by_user_id_impl(user.id)
        .await
        .expect("load student")
        .expect("student profile exists")
}
