//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod academics;
mod audit;
mod communication;
mod finance;
mod grades;
mod library;
mod profiles;
mod stats;
mod system_settings;
mod users;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::config::AppConfig;
use crate::errors::{CampusError, Result};
use crate::models::PaginationInfo;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Select,
    SqlErr,
};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| CampusError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| CampusError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| CampusError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| CampusError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(CampusError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 写操作错误映射：唯一约束与外键约束冲突转为 Conflict
pub(crate) fn write_error(context: &str, e: DbErr) -> CampusError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            CampusError::conflict(format!("{context}: 记录已存在"))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            CampusError::conflict(format!("{context}: 存在关联数据"))
        }
        _ => CampusError::database_operation(format!("{context}: {e}")),
    }
}

impl SeaOrmStorage {
    /// 通用分页查询
    pub(crate) async fn fetch_page<E>(
        &self,
        select: Select<E>,
        pagination: &PaginationQuery,
        what: &str,
    ) -> Result<(Vec<E::Model>, PaginationInfo)>
    where
        E: EntityTrait,
        E::Model: Send + Sync + 'static,
    {
        let (page, size) = pagination.normalized();
        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            CampusError::database_operation(format!("查询{what}总数失败: {e}"))
        })?;
        let items = paginator.fetch_page(page - 1).await.map_err(|e| {
            CampusError::database_operation(format!("查询{what}列表失败: {e}"))
        })?;

        Ok((items, PaginationInfo::new(page, size, total)))
    }
}

// Storage trait 实现
use crate::models::{
    PaginatedResponse, PaginationQuery,
    academics::{
        entities::{
            AcademicYear, ClassDetail, ClassSubject, Level, Program, SchoolClass, Subject,
            TimetableSlot,
        },
        requests::{
            AssignSubjectRequest, ClassListParams, CreateAcademicYearRequest, CreateClassRequest,
            CreateLevelRequest, CreateProgramRequest, CreateSubjectRequest,
            CreateTimetableSlotRequest, UpdateAcademicYearRequest, UpdateClassRequest,
            UpdateLevelRequest, UpdateProgramRequest, UpdateSubjectRequest,
        },
        responses::ClassListResponse,
    },
    analytics::responses::ProgramHeadcount,
    audit::{
        entities::{ActionLog, LoginLog, NewActionLog, NewLoginLog, PasswordReset},
        requests::AuditLogParams,
    },
    communication::{
        entities::{Announcement, Message, NewNotification, Notification},
        requests::{CreateAnnouncementRequest, SendMessageRequest},
    },
    exports::entities::{ExportLog, NewExportLog},
    finance::{
        entities::{ClassFee, FeeType, Installment, Payment},
        requests::{
            ClassFeeListParams, CreateFeeTypeRequest, CreateInstallmentRequest,
            CreatePaymentRequest, PaymentQuery, UpdateFeeTypeRequest,
        },
        responses::{MethodSummary, PaymentListResponse},
    },
    grades::{
        entities::{Absence, Grade, GradeHistory, Ranking, SubjectAverage},
        requests::{CreateAbsenceRequest, CreateGradeRequest, GradeQuery},
        responses::GradeListResponse,
    },
    library::{
        entities::{Book, BookCopy, Fine, Loan, Reservation, ReturnOutcome},
        requests::{BookListParams, CreateBookRequest, FineListParams, LoanListParams},
    },
    system::{
        entities::{SettingAudit, SystemSetting},
        requests::SettingAuditParams,
    },
    users::{
        entities::{ParentProfile, RoleProfile, StudentProfile, StudentSummary, User, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::storage::Storage;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

#[async_trait]
impl Storage for SeaOrmStorage {
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn search_users(&self, keyword: &str, limit: u64) -> Result<Vec<User>> {
        self.search_users_impl(keyword, limit).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn get_role_profile(&self, user_id: i64, role: UserRole) -> Result<Option<RoleProfile>> {
        self.get_role_profile_impl(user_id, role).await
    }

    async fn get_student_by_id(&self, student_id: i64) -> Result<Option<StudentProfile>> {
        self.get_student_by_id_impl(student_id).await
    }

    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<StudentProfile>> {
        self.get_student_by_user_id_impl(user_id).await
    }

    async fn get_parent_by_user_id(&self, user_id: i64) -> Result<Option<ParentProfile>> {
        self.get_parent_by_user_id_impl(user_id).await
    }

    async fn get_student_summary(&self, student_id: i64) -> Result<Option<StudentSummary>> {
        self.get_student_summary_impl(student_id).await
    }

    async fn list_student_summaries(&self, class_id: Option<i64>) -> Result<Vec<StudentSummary>> {
        self.list_student_summaries_impl(class_id).await
    }

    async fn assign_student_class(
        &self,
        student_id: i64,
        class_id: i64,
        academic_year_id: i64,
    ) -> Result<Option<StudentProfile>> {
        self.assign_student_class_impl(student_id, class_id, academic_year_id).await
    }

    async fn link_parent_student(&self, parent_id: i64, student_id: i64) -> Result<bool> {
        self.link_parent_student_impl(parent_id, student_id).await
    }

    async fn unlink_parent_student(&self, parent_id: i64, student_id: i64) -> Result<bool> {
        self.unlink_parent_student_impl(parent_id, student_id).await
    }

    async fn is_parent_of(&self, parent_id: i64, student_id: i64) -> Result<bool> {
        self.is_parent_of_impl(parent_id, student_id).await
    }

    async fn list_parent_children(&self, parent_id: i64) -> Result<Vec<StudentSummary>> {
        self.list_parent_children_impl(parent_id).await
    }

    async fn list_student_parent_user_ids(&self, student_id: i64) -> Result<Vec<i64>> {
        self.list_student_parent_user_ids_impl(student_id).await
    }

    async fn record_login_attempt(&self, log: NewLoginLog) -> Result<()> {
        self.record_login_attempt_impl(log).await
    }

    async fn record_action(&self, log: NewActionLog) -> Result<()> {
        self.record_action_impl(log).await
    }

    async fn list_login_logs(&self, params: AuditLogParams) -> Result<PaginatedResponse<LoginLog>> {
        self.list_login_logs_impl(params).await
    }

    async fn list_action_logs(
        &self,
        params: AuditLogParams,
    ) -> Result<PaginatedResponse<ActionLog>> {
        self.list_action_logs_impl(params).await
    }

    async fn record_export(&self, log: NewExportLog) -> Result<ExportLog> {
        self.record_export_impl(log).await
    }

    async fn list_export_logs(&self, user_id: i64, limit: u64) -> Result<Vec<ExportLog>> {
        self.list_export_logs_impl(user_id, limit).await
    }

    async fn create_password_reset(
        &self,
        user_id: i64,
        token: &str,
        expires_at: i64,
    ) -> Result<PasswordReset> {
        self.create_password_reset_impl(user_id, token, expires_at).await
    }

    async fn get_password_reset(&self, token: &str) -> Result<Option<PasswordReset>> {
        self.get_password_reset_impl(token).await
    }

    async fn consume_password_reset(
        &self,
        reset_id: i64,
        user_id: i64,
        password_hash: &str,
    ) -> Result<bool> {
        self.consume_password_reset_impl(reset_id, user_id, password_hash).await
    }

    async fn list_academic_years(&self) -> Result<Vec<AcademicYear>> {
        self.list_academic_years_impl().await
    }

    async fn get_academic_year(&self, id: i64) -> Result<Option<AcademicYear>> {
        self.get_academic_year_impl(id).await
    }

    async fn get_active_academic_year(&self) -> Result<Option<AcademicYear>> {
        self.get_active_academic_year_impl().await
    }

    async fn create_academic_year(&self, req: CreateAcademicYearRequest) -> Result<AcademicYear> {
        self.create_academic_year_impl(req).await
    }

    async fn update_academic_year(
        &self,
        id: i64,
        update: UpdateAcademicYearRequest,
    ) -> Result<Option<AcademicYear>> {
        self.update_academic_year_impl(id, update).await
    }

    async fn activate_academic_year(&self, id: i64) -> Result<Option<AcademicYear>> {
        self.activate_academic_year_impl(id).await
    }

    async fn list_programs(&self) -> Result<Vec<Program>> {
        self.list_programs_impl().await
    }

    async fn get_program(&self, id: i64) -> Result<Option<Program>> {
        self.get_program_impl(id).await
    }

    async fn create_program(&self, req: CreateProgramRequest) -> Result<Program> {
        self.create_program_impl(req).await
    }

    async fn update_program(
        &self,
        id: i64,
        update: UpdateProgramRequest,
    ) -> Result<Option<Program>> {
        self.update_program_impl(id, update).await
    }

    async fn delete_program(&self, id: i64) -> Result<bool> {
        self.delete_program_impl(id).await
    }

    async fn list_levels(&self) -> Result<Vec<Level>> {
        self.list_levels_impl().await
    }

    async fn get_level(&self, id: i64) -> Result<Option<Level>> {
        self.get_level_impl(id).await
    }

    async fn create_level(&self, req: CreateLevelRequest) -> Result<Level> {
        self.create_level_impl(req).await
    }

    async fn update_level(&self, id: i64, update: UpdateLevelRequest) -> Result<Option<Level>> {
        self.update_level_impl(id, update).await
    }

    async fn delete_level(&self, id: i64) -> Result<bool> {
        self.delete_level_impl(id).await
    }

    async fn list_classes_with_pagination(
        &self,
        params: ClassListParams,
    ) -> Result<ClassListResponse> {
        self.list_classes_with_pagination_impl(params).await
    }

    async fn get_class(&self, id: i64) -> Result<Option<ClassDetail>> {
        self.get_class_impl(id).await
    }

    async fn create_class(&self, req: CreateClassRequest) -> Result<SchoolClass> {
        self.create_class_impl(req).await
    }

    async fn update_class(
        &self,
        id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<SchoolClass>> {
        self.update_class_impl(id, update).await
    }

    async fn delete_class(&self, id: i64) -> Result<bool> {
        self.delete_class_impl(id).await
    }

    async fn count_class_students(&self, class_id: i64) -> Result<u64> {
        self.count_class_students_impl(class_id).await
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>> {
        self.list_subjects_impl().await
    }

    async fn get_subject(&self, id: i64) -> Result<Option<Subject>> {
        self.get_subject_impl(id).await
    }

    async fn create_subject(&self, req: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(req).await
    }

    async fn update_subject(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        self.update_subject_impl(id, update).await
    }

    async fn delete_subject(&self, id: i64) -> Result<bool> {
        self.delete_subject_impl(id).await
    }

    async fn assign_class_subject(&self, req: AssignSubjectRequest) -> Result<ClassSubject> {
        self.assign_class_subject_impl(req).await
    }

    async fn list_class_subjects(&self, class_id: i64) -> Result<Vec<ClassSubject>> {
        self.list_class_subjects_impl(class_id).await
    }

    async fn remove_class_subject(&self, id: i64) -> Result<bool> {
        self.remove_class_subject_impl(id).await
    }

    async fn is_teacher_assigned(
        &self,
        teacher_id: i64,
        class_id: i64,
        subject_id: i64,
    ) -> Result<bool> {
        self.is_teacher_assigned_impl(teacher_id, class_id, subject_id).await
    }

    async fn list_teacher_subjects(
        &self,
        teacher_id: i64,
        class_id: Option<i64>,
    ) -> Result<Vec<ClassSubject>> {
        self.list_teacher_subjects_impl(teacher_id, class_id).await
    }

    async fn list_teacher_classes(&self, teacher_id: i64) -> Result<Vec<ClassDetail>> {
        self.list_teacher_classes_impl(teacher_id).await
    }

    async fn create_timetable_slot(
        &self,
        req: CreateTimetableSlotRequest,
    ) -> Result<TimetableSlot> {
        self.create_timetable_slot_impl(req).await
    }

    async fn list_class_timetable(&self, class_id: i64) -> Result<Vec<TimetableSlot>> {
        self.list_class_timetable_impl(class_id).await
    }

    async fn delete_timetable_slot(&self, id: i64) -> Result<bool> {
        self.delete_timetable_slot_impl(id).await
    }

    async fn create_grade(
        &self,
        teacher_id: i64,
        req: CreateGradeRequest,
        graded_on: NaiveDate,
    ) -> Result<Grade> {
        self.create_grade_impl(teacher_id, req, graded_on).await
    }

    async fn get_grade(&self, id: i64) -> Result<Option<Grade>> {
        self.get_grade_impl(id).await
    }

    async fn update_grade_value(
        &self,
        id: i64,
        value: f64,
        modified_by: i64,
        reason: Option<String>,
    ) -> Result<Option<Grade>> {
        self.update_grade_value_impl(id, value, modified_by, reason).await
    }

    async fn validate_grade(&self, id: i64) -> Result<Option<Grade>> {
        self.validate_grade_impl(id).await
    }

    async fn list_grade_history(&self, grade_id: i64) -> Result<Vec<GradeHistory>> {
        self.list_grade_history_impl(grade_id).await
    }

    async fn list_grades(&self, query: GradeQuery) -> Result<GradeListResponse> {
        self.list_grades_impl(query).await
    }

    async fn list_validated_grades(
        &self,
        student_id: i64,
        subject_id: Option<i64>,
        class_id: Option<i64>,
    ) -> Result<Vec<Grade>> {
        self.list_validated_grades_impl(student_id, subject_id, class_id).await
    }

    async fn list_grades_for_export(
        &self,
        class_id: Option<i64>,
        subject_id: Option<i64>,
    ) -> Result<Vec<Grade>> {
        self.list_grades_for_export_impl(class_id, subject_id).await
    }

    async fn upsert_average(
        &self,
        average: SubjectAverage,
        academic_year_id: Option<i64>,
    ) -> Result<()> {
        self.upsert_average_impl(average, academic_year_id).await
    }

    async fn list_student_averages(
        &self,
        student_id: i64,
        period: &str,
    ) -> Result<Vec<SubjectAverage>> {
        self.list_student_averages_impl(student_id, period).await
    }

    async fn list_student_averages_by_year(
        &self,
        student_id: i64,
        period: &str,
    ) -> Result<Vec<(Option<i64>, SubjectAverage)>> {
        self.list_student_averages_by_year_impl(student_id, period)
            .await
    }

    async fn list_class_averages(
        &self,
        class_id: i64,
        period: &str,
    ) -> Result<Vec<SubjectAverage>> {
        self.list_class_averages_impl(class_id, period).await
    }

    async fn save_class_rankings(
        &self,
        class_id: i64,
        period: &str,
        academic_year_id: Option<i64>,
        rankings: Vec<Ranking>,
    ) -> Result<()> {
        self.save_class_rankings_impl(class_id, period, academic_year_id, rankings).await
    }

    async fn get_student_ranking(&self, student_id: i64, period: &str) -> Result<Option<Ranking>> {
        self.get_student_ranking_impl(student_id, period).await
    }

    async fn count_class_rankings(&self, class_id: i64, period: &str) -> Result<u64> {
        self.count_class_rankings_impl(class_id, period).await
    }

    async fn list_top_rankings(&self, period: &str, limit: u64) -> Result<Vec<Ranking>> {
        self.list_top_rankings_impl(period, limit).await
    }

    async fn count_averages(&self, period: &str, min_value: Option<f64>) -> Result<u64> {
        self.count_averages_impl(period, min_value).await
    }

    async fn create_absence(
        &self,
        teacher_id: i64,
        req: CreateAbsenceRequest,
        absence_date: NaiveDate,
    ) -> Result<Absence> {
        self.create_absence_impl(teacher_id, req, absence_date).await
    }

    async fn get_absence(&self, id: i64) -> Result<Option<Absence>> {
        self.get_absence_impl(id).await
    }

    async fn justify_absence(&self, id: i64, justification: &str) -> Result<Option<Absence>> {
        self.justify_absence_impl(id, justification).await
    }

    async fn list_student_absences(
        &self,
        student_id: i64,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Absence>> {
        self.list_student_absences_impl(student_id, pagination).await
    }

    async fn count_student_absences_since(&self, student_id: i64, since: NaiveDate) -> Result<u64> {
        self.count_student_absences_since_impl(student_id, since).await
    }

    async fn count_absences_since(&self, since: NaiveDate) -> Result<u64> {
        self.count_absences_since_impl(since).await
    }

    async fn count_good_grades_per_student(&self, min_value: f64) -> Result<HashMap<i64, u64>> {
        self.count_good_grades_per_student_impl(min_value).await
    }

    async fn count_absences_per_student(&self, since: NaiveDate) -> Result<HashMap<i64, u64>> {
        self.count_absences_per_student_impl(since).await
    }

    async fn list_fee_types(&self) -> Result<Vec<FeeType>> {
        self.list_fee_types_impl().await
    }

    async fn get_fee_type(&self, id: i64) -> Result<Option<FeeType>> {
        self.get_fee_type_impl(id).await
    }

    async fn create_fee_type(&self, req: CreateFeeTypeRequest) -> Result<FeeType> {
        self.create_fee_type_impl(req).await
    }

    async fn update_fee_type(
        &self,
        id: i64,
        update: UpdateFeeTypeRequest,
    ) -> Result<Option<FeeType>> {
        self.update_fee_type_impl(id, update).await
    }

    async fn list_class_fees(&self, params: ClassFeeListParams) -> Result<Vec<ClassFee>> {
        self.list_class_fees_impl(params).await
    }

    async fn create_class_fee(
        &self,
        class_id: i64,
        fee_type_id: i64,
        amount: f64,
        academic_year_id: i64,
    ) -> Result<ClassFee> {
        self.create_class_fee_impl(class_id, fee_type_id, amount, academic_year_id).await
    }

    async fn delete_class_fee(&self, id: i64) -> Result<bool> {
        self.delete_class_fee_impl(id).await
    }

    async fn list_payments(&self, query: PaymentQuery) -> Result<PaymentListResponse> {
        self.list_payments_impl(query).await
    }

    async fn list_payments_for_export(&self, query: PaymentQuery) -> Result<Vec<Payment>> {
        self.list_payments_for_export_impl(query).await
    }

    async fn create_payment(
        &self,
        recorded_by: i64,
        req: CreatePaymentRequest,
        paid_on: NaiveDate,
    ) -> Result<Payment> {
        self.create_payment_impl(recorded_by, req, paid_on).await
    }

    async fn get_payment(&self, id: i64) -> Result<Option<Payment>> {
        self.get_payment_impl(id).await
    }

    async fn validate_payment(&self, id: i64, validated_by: i64) -> Result<Option<Payment>> {
        self.validate_payment_impl(id, validated_by).await
    }

    async fn reject_payment(&self, id: i64, reason: &str) -> Result<Option<Payment>> {
        self.reject_payment_impl(id, reason).await
    }

    async fn list_student_payments(&self, student_id: i64) -> Result<Vec<Payment>> {
        self.list_student_payments_impl(student_id).await
    }

    async fn create_installment(
        &self,
        req: CreateInstallmentRequest,
        due_date: Option<NaiveDate>,
    ) -> Result<Installment> {
        self.create_installment_impl(req, due_date).await
    }

    async fn list_student_installments(&self, student_id: i64) -> Result<Vec<Installment>> {
        self.list_student_installments_impl(student_id).await
    }

    async fn summarize_payments_by_method(
        &self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<MethodSummary>> {
        self.summarize_payments_by_method_impl(date_from, date_to).await
    }

    async fn sum_validated_payments(
        &self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<(f64, u64)> {
        self.sum_validated_payments_impl(date_from, date_to).await
    }

    async fn list_announcements(
        &self,
        role: UserRole,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Announcement>> {
        self.list_announcements_impl(role, pagination).await
    }

    async fn get_announcement(&self, id: i64) -> Result<Option<Announcement>> {
        self.get_announcement_impl(id).await
    }

    async fn create_announcement(
        &self,
        author_id: i64,
        req: CreateAnnouncementRequest,
    ) -> Result<Announcement> {
        self.create_announcement_impl(author_id, req).await
    }

    async fn delete_announcement(&self, id: i64) -> Result<bool> {
        self.delete_announcement_impl(id).await
    }

    async fn send_message(&self, sender_id: i64, req: SendMessageRequest) -> Result<Message> {
        self.send_message_impl(sender_id, req).await
    }

    async fn list_inbox(
        &self,
        user_id: i64,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Message>> {
        self.list_inbox_impl(user_id, pagination).await
    }

    async fn list_sent_messages(
        &self,
        user_id: i64,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Message>> {
        self.list_sent_messages_impl(user_id, pagination).await
    }

    async fn get_message(&self, id: i64) -> Result<Option<Message>> {
        self.get_message_impl(id).await
    }

    async fn mark_message_read(&self, id: i64) -> Result<Option<Message>> {
        self.mark_message_read_impl(id).await
    }

    async fn create_notification(&self, notification: NewNotification) -> Result<Notification> {
        self.create_notification_impl(notification).await
    }

    async fn list_notifications(
        &self,
        user_id: i64,
        unread_only: bool,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Notification>> {
        self.list_notifications_impl(user_id, unread_only, pagination).await
    }

    async fn count_unread_notifications(&self, user_id: i64) -> Result<u64> {
        self.count_unread_notifications_impl(user_id).await
    }

    async fn mark_notification_read(&self, id: i64, user_id: i64) -> Result<bool> {
        self.mark_notification_read_impl(id, user_id).await
    }

    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64> {
        self.mark_all_notifications_read_impl(user_id).await
    }

    async fn list_books(&self, params: BookListParams) -> Result<PaginatedResponse<Book>> {
        self.list_books_impl(params).await
    }

    async fn get_book(&self, id: i64) -> Result<Option<Book>> {
        self.get_book_impl(id).await
    }

    async fn create_book(&self, req: CreateBookRequest) -> Result<(Book, Vec<BookCopy>)> {
        self.create_book_impl(req).await
    }

    async fn list_book_copies(&self, book_id: i64) -> Result<Vec<BookCopy>> {
        self.list_book_copies_impl(book_id).await
    }

    async fn get_copy(&self, id: i64) -> Result<Option<BookCopy>> {
        self.get_copy_impl(id).await
    }

    async fn is_copy_on_loan(&self, copy_id: i64) -> Result<bool> {
        self.is_copy_on_loan_impl(copy_id).await
    }

    async fn count_active_loans(&self, borrower_id: i64) -> Result<u64> {
        self.count_active_loans_impl(borrower_id).await
    }

    async fn create_loan(
        &self,
        copy: &BookCopy,
        borrower_id: i64,
        borrowed_on: NaiveDate,
        due_on: NaiveDate,
    ) -> Result<Loan> {
        self.create_loan_impl(copy, borrower_id, borrowed_on, due_on).await
    }

    async fn get_loan(&self, id: i64) -> Result<Option<Loan>> {
        self.get_loan_impl(id).await
    }

    async fn return_loan(
        &self,
        id: i64,
        returned_on: NaiveDate,
        outcome: ReturnOutcome,
    ) -> Result<Option<Loan>> {
        self.return_loan_impl(id, returned_on, outcome).await
    }

    async fn list_loans(&self, params: LoanListParams) -> Result<PaginatedResponse<Loan>> {
        self.list_loans_impl(params).await
    }

    async fn list_borrower_loans(&self, borrower_id: i64) -> Result<Vec<Loan>> {
        self.list_borrower_loans_impl(borrower_id).await
    }

    async fn create_reservation(
        &self,
        book_id: i64,
        user_id: i64,
        expires_on: NaiveDate,
    ) -> Result<Reservation> {
        self.create_reservation_impl(book_id, user_id, expires_on).await
    }

    async fn has_active_reservation(&self, book_id: i64, user_id: i64) -> Result<bool> {
        self.has_active_reservation_impl(book_id, user_id).await
    }

    async fn list_user_reservations(&self, user_id: i64) -> Result<Vec<Reservation>> {
        self.list_user_reservations_impl(user_id).await
    }

    async fn get_reservation(&self, id: i64) -> Result<Option<Reservation>> {
        self.get_reservation_impl(id).await
    }

    async fn cancel_reservation(&self, id: i64) -> Result<bool> {
        self.cancel_reservation_impl(id).await
    }

    async fn list_fines(&self, params: FineListParams) -> Result<PaginatedResponse<Fine>> {
        self.list_fines_impl(params).await
    }

    async fn get_fine(&self, id: i64) -> Result<Option<Fine>> {
        self.get_fine_impl(id).await
    }

    async fn pay_fine(&self, id: i64) -> Result<Option<Fine>> {
        self.pay_fine_impl(id).await
    }

    async fn list_all_settings(&self) -> Result<Vec<SystemSetting>> {
        self.list_all_settings_impl().await
    }

    async fn get_setting_by_key(&self, key: &str) -> Result<Option<SystemSetting>> {
        self.get_setting_by_key_impl(key).await
    }

    async fn update_setting(
        &self,
        key: &str,
        value: &str,
        user_id: i64,
        ip_address: Option<String>,
    ) -> Result<SystemSetting> {
        self.update_setting_impl(key, value, user_id, ip_address).await
    }

    async fn list_setting_audits(
        &self,
        params: SettingAuditParams,
    ) -> Result<PaginatedResponse<SettingAudit>> {
        self.list_setting_audits_impl(params).await
    }

    async fn count_active_students(&self) -> Result<u64> {
        self.count_active_students_impl().await
    }

    async fn count_active_teachers(&self) -> Result<u64> {
        self.count_active_teachers_impl().await
    }

    async fn count_active_classes(&self) -> Result<u64> {
        self.count_active_classes_impl().await
    }

    async fn count_enrollments_between(&self, from_ts: i64, to_ts: i64) -> Result<u64> {
        self.count_enrollments_between_impl(from_ts, to_ts).await
    }

    async fn students_per_program(&self) -> Result<Vec<ProgramHeadcount>> {
        self.students_per_program_impl().await
    }
}
