use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（同时创建角色档案）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 按姓名/用户名搜索活跃用户
    async fn search_users(&self, keyword: &str, limit: u64) -> Result<Vec<User>>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 角色档案
    async fn get_role_profile(&self, user_id: i64, role: UserRole) -> Result<Option<RoleProfile>>;
    async fn get_student_by_id(&self, student_id: i64) -> Result<Option<StudentProfile>>;
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<StudentProfile>>;
    async fn get_parent_by_user_id(&self, user_id: i64) -> Result<Option<ParentProfile>>;
    async fn get_student_summary(&self, student_id: i64) -> Result<Option<StudentSummary>>;
    // 活跃学生列表，可按班级过滤
    async fn list_student_summaries(&self, class_id: Option<i64>) -> Result<Vec<StudentSummary>>;
    // 分班
    async fn assign_student_class(
        &self,
        student_id: i64,
        class_id: i64,
        academic_year_id: i64,
    ) -> Result<Option<StudentProfile>>;
    // 关联家长与学生，已关联时返回 false
    async fn link_parent_student(&self, parent_id: i64, student_id: i64) -> Result<bool>;
    async fn unlink_parent_student(&self, parent_id: i64, student_id: i64) -> Result<bool>;
    async fn is_parent_of(&self, parent_id: i64, student_id: i64) -> Result<bool>;
    async fn list_parent_children(&self, parent_id: i64) -> Result<Vec<StudentSummary>>;
    // 学生所有家长的用户 ID
    async fn list_student_parent_user_ids(&self, student_id: i64) -> Result<Vec<i64>>;

    /// 审计
    async fn record_login_attempt(&self, log: NewLoginLog) -> Result<()>;
    async fn record_action(&self, log: NewActionLog) -> Result<()>;
    async fn list_login_logs(&self, params: AuditLogParams) -> Result<PaginatedResponse<LoginLog>>;
    async fn list_action_logs(
        &self,
        params: AuditLogParams,
    ) -> Result<PaginatedResponse<ActionLog>>;
    async fn record_export(&self, log: NewExportLog) -> Result<ExportLog>;
    async fn list_export_logs(&self, user_id: i64, limit: u64) -> Result<Vec<ExportLog>>;
    async fn create_password_reset(
        &self,
        user_id: i64,
        token: &str,
        expires_at: i64,
    ) -> Result<PasswordReset>;
    async fn get_password_reset(&self, token: &str) -> Result<Option<PasswordReset>>;
    // 标记令牌已使用并写入新密码
    async fn consume_password_reset(
        &self,
        reset_id: i64,
        user_id: i64,
        password_hash: &str,
    ) -> Result<bool>;

    /// 学年
    async fn list_academic_years(&self) -> Result<Vec<AcademicYear>>;
    async fn get_academic_year(&self, id: i64) -> Result<Option<AcademicYear>>;
    async fn get_active_academic_year(&self) -> Result<Option<AcademicYear>>;
    async fn create_academic_year(&self, req: CreateAcademicYearRequest) -> Result<AcademicYear>;
    async fn update_academic_year(
        &self,
        id: i64,
        update: UpdateAcademicYearRequest,
    ) -> Result<Option<AcademicYear>>;
    // 激活学年（其他学年全部停用）
    async fn activate_academic_year(&self, id: i64) -> Result<Option<AcademicYear>>;

    /// 专业
    async fn list_programs(&self) -> Result<Vec<Program>>;
    async fn get_program(&self, id: i64) -> Result<Option<Program>>;
    async fn create_program(&self, req: CreateProgramRequest) -> Result<Program>;
    async fn update_program(&self, id: i64, update: UpdateProgramRequest)
    -> Result<Option<Program>>;
    async fn delete_program(&self, id: i64) -> Result<bool>;

    /// 年级
    async fn list_levels(&self) -> Result<Vec<Level>>;
    async fn get_level(&self, id: i64) -> Result<Option<Level>>;
    async fn create_level(&self, req: CreateLevelRequest) -> Result<Level>;
    async fn update_level(&self, id: i64, update: UpdateLevelRequest) -> Result<Option<Level>>;
    async fn delete_level(&self, id: i64) -> Result<bool>;

    /// 班级
    async fn list_classes_with_pagination(
        &self,
        params: ClassListParams,
    ) -> Result<ClassListResponse>;
    async fn get_class(&self, id: i64) -> Result<Option<ClassDetail>>;
    async fn create_class(&self, req: CreateClassRequest) -> Result<SchoolClass>;
    async fn update_class(
        &self,
        id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<SchoolClass>>;
    async fn delete_class(&self, id: i64) -> Result<bool>;
    async fn count_class_students(&self, class_id: i64) -> Result<u64>;

    /// 科目
    async fn list_subjects(&self) -> Result<Vec<Subject>>;
    async fn get_subject(&self, id: i64) -> Result<Option<Subject>>;
    async fn create_subject(&self, req: CreateSubjectRequest) -> Result<Subject>;
    async fn update_subject(&self, id: i64, update: UpdateSubjectRequest)
    -> Result<Option<Subject>>;
    async fn delete_subject(&self, id: i64) -> Result<bool>;

    /// 班级科目与课表
    async fn assign_class_subject(&self, req: AssignSubjectRequest) -> Result<ClassSubject>;
    async fn list_class_subjects(&self, class_id: i64) -> Result<Vec<ClassSubject>>;
    async fn remove_class_subject(&self, id: i64) -> Result<bool>;
    async fn is_teacher_assigned(
        &self,
        teacher_id: i64,
        class_id: i64,
        subject_id: i64,
    ) -> Result<bool>;
    async fn list_teacher_subjects(
        &self,
        teacher_id: i64,
        class_id: Option<i64>,
    ) -> Result<Vec<ClassSubject>>;
    async fn list_teacher_classes(&self, teacher_id: i64) -> Result<Vec<ClassDetail>>;
    async fn create_timetable_slot(&self, req: CreateTimetableSlotRequest) -> Result<TimetableSlot>;
    async fn list_class_timetable(&self, class_id: i64) -> Result<Vec<TimetableSlot>>;
    async fn delete_timetable_slot(&self, id: i64) -> Result<bool>;

    /// 成绩
    async fn create_grade(
        &self,
        teacher_id: i64,
        req: CreateGradeRequest,
        graded_on: NaiveDate,
    ) -> Result<Grade>;
    async fn get_grade(&self, id: i64) -> Result<Option<Grade>>;
    // 修改分数并写入历史
    async fn update_grade_value(
        &self,
        id: i64,
        value: f64,
        modified_by: i64,
        reason: Option<String>,
    ) -> Result<Option<Grade>>;
    async fn validate_grade(&self, id: i64) -> Result<Option<Grade>>;
    async fn list_grade_history(&self, grade_id: i64) -> Result<Vec<GradeHistory>>;
    async fn list_grades(&self, query: GradeQuery) -> Result<GradeListResponse>;
    // 已验证成绩，按日期倒序
    async fn list_validated_grades(
        &self,
        student_id: i64,
        subject_id: Option<i64>,
        class_id: Option<i64>,
    ) -> Result<Vec<Grade>>;
    async fn list_grades_for_export(
        &self,
        class_id: Option<i64>,
        subject_id: Option<i64>,
    ) -> Result<Vec<Grade>>;

    /// 平均分与排名
    async fn upsert_average(
        &self,
        average: SubjectAverage,
        academic_year_id: Option<i64>,
    ) -> Result<()>;
    async fn list_student_averages(
        &self,
        student_id: i64,
        period: &str,
    ) -> Result<Vec<SubjectAverage>>;
    // (学年, 平均分)，按学年排序
    async fn list_student_averages_by_year(
        &self,
        student_id: i64,
        period: &str,
    ) -> Result<Vec<(Option<i64>, SubjectAverage)>>;
    async fn list_class_averages(&self, class_id: i64, period: &str)
    -> Result<Vec<SubjectAverage>>;
    // 替换班级在该周期的全部排名
    async fn save_class_rankings(
        &self,
        class_id: i64,
        period: &str,
        academic_year_id: Option<i64>,
        rankings: Vec<Ranking>,
    ) -> Result<()>;
    async fn get_student_ranking(&self, student_id: i64, period: &str)
    -> Result<Option<Ranking>>;
    async fn count_class_rankings(&self, class_id: i64, period: &str) -> Result<u64>;
    async fn list_top_rankings(&self, period: &str, limit: u64) -> Result<Vec<Ranking>>;
    async fn count_averages(&self, period: &str, min_value: Option<f64>) -> Result<u64>;

    /// 考勤
    async fn create_absence(
        &self,
        teacher_id: i64,
        req: CreateAbsenceRequest,
        absence_date: NaiveDate,
    ) -> Result<Absence>;
    async fn get_absence(&self, id: i64) -> Result<Option<Absence>>;
    async fn justify_absence(&self, id: i64, justification: &str) -> Result<Option<Absence>>;
    async fn list_student_absences(
        &self,
        student_id: i64,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Absence>>;
    async fn count_student_absences_since(&self, student_id: i64, since: NaiveDate)
    -> Result<u64>;
    async fn count_absences_since(&self, since: NaiveDate) -> Result<u64>;
    // 按学生分组的统计
    async fn count_good_grades_per_student(&self, min_value: f64) -> Result<HashMap<i64, u64>>;
    async fn count_absences_per_student(&self, since: NaiveDate) -> Result<HashMap<i64, u64>>;

    /// 财务
    async fn list_fee_types(&self) -> Result<Vec<FeeType>>;
    async fn get_fee_type(&self, id: i64) -> Result<Option<FeeType>>;
    async fn create_fee_type(&self, req: CreateFeeTypeRequest) -> Result<FeeType>;
    async fn update_fee_type(
        &self,
        id: i64,
        update: UpdateFeeTypeRequest,
    ) -> Result<Option<FeeType>>;
    async fn list_class_fees(&self, params: ClassFeeListParams) -> Result<Vec<ClassFee>>;
    async fn create_class_fee(
        &self,
        class_id: i64,
        fee_type_id: i64,
        amount: f64,
        academic_year_id: i64,
    ) -> Result<ClassFee>;
    async fn delete_class_fee(&self, id: i64) -> Result<bool>;
    async fn list_payments(&self, query: PaymentQuery) -> Result<PaymentListResponse>;
    async fn list_payments_for_export(&self, query: PaymentQuery) -> Result<Vec<Payment>>;
    async fn create_payment(
        &self,
        recorded_by: i64,
        req: CreatePaymentRequest,
        paid_on: NaiveDate,
    ) -> Result<Payment>;
    async fn get_payment(&self, id: i64) -> Result<Option<Payment>>;
    // 验证缴费并计入分期计划
    async fn validate_payment(&self, id: i64, validated_by: i64) -> Result<Option<Payment>>;
    async fn reject_payment(&self, id: i64, reason: &str) -> Result<Option<Payment>>;
    async fn list_student_payments(&self, student_id: i64) -> Result<Vec<Payment>>;
    async fn create_installment(
        &self,
        req: CreateInstallmentRequest,
        due_date: Option<NaiveDate>,
    ) -> Result<Installment>;
    async fn list_student_installments(&self, student_id: i64) -> Result<Vec<Installment>>;
    async fn summarize_payments_by_method(
        &self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<MethodSummary>>;
    // 已验证缴费的（总额, 笔数）
    async fn sum_validated_payments(
        &self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<(f64, u64)>;

    /// 公告
    async fn list_announcements(
        &self,
        role: UserRole,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Announcement>>;
    async fn get_announcement(&self, id: i64) -> Result<Option<Announcement>>;
    async fn create_announcement(
        &self,
        author_id: i64,
        req: CreateAnnouncementRequest,
    ) -> Result<Announcement>;
    async fn delete_announcement(&self, id: i64) -> Result<bool>;

    /// 站内信
    async fn send_message(&self, sender_id: i64, req: SendMessageRequest) -> Result<Message>;
    async fn list_inbox(
        &self,
        user_id: i64,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Message>>;
    async fn list_sent_messages(
        &self,
        user_id: i64,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Message>>;
    async fn get_message(&self, id: i64) -> Result<Option<Message>>;
    async fn mark_message_read(&self, id: i64) -> Result<Option<Message>>;

    /// 通知
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification>;
    async fn list_notifications(
        &self,
        user_id: i64,
        unread_only: bool,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Notification>>;
    async fn count_unread_notifications(&self, user_id: i64) -> Result<u64>;
    async fn mark_notification_read(&self, id: i64, user_id: i64) -> Result<bool>;
    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64>;

    /// 图书馆
    async fn list_books(&self, params: BookListParams) -> Result<PaginatedResponse<Book>>;
    async fn get_book(&self, id: i64) -> Result<Option<Book>>;
    // 创建图书及其副本
    async fn create_book(&self, req: CreateBookRequest) -> Result<(Book, Vec<BookCopy>)>;
    async fn list_book_copies(&self, book_id: i64) -> Result<Vec<BookCopy>>;
    async fn get_copy(&self, id: i64) -> Result<Option<BookCopy>>;
    async fn is_copy_on_loan(&self, copy_id: i64) -> Result<bool>;
    async fn count_active_loans(&self, borrower_id: i64) -> Result<u64>;
    async fn create_loan(
        &self,
        copy: &BookCopy,
        borrower_id: i64,
        borrowed_on: NaiveDate,
        due_on: NaiveDate,
    ) -> Result<Loan>;
    async fn get_loan(&self, id: i64) -> Result<Option<Loan>>;
    // 归还并按需开具罚款
    async fn return_loan(
        &self,
        id: i64,
        returned_on: NaiveDate,
        outcome: ReturnOutcome,
    ) -> Result<Option<Loan>>;
    async fn list_loans(&self, params: LoanListParams) -> Result<PaginatedResponse<Loan>>;
    async fn list_borrower_loans(&self, borrower_id: i64) -> Result<Vec<Loan>>;
    async fn create_reservation(
        &self,
        book_id: i64,
        user_id: i64,
        expires_on: NaiveDate,
    ) -> Result<Reservation>;
    async fn has_active_reservation(&self, book_id: i64, user_id: i64) -> Result<bool>;
    async fn list_user_reservations(&self, user_id: i64) -> Result<Vec<Reservation>>;
    async fn get_reservation(&self, id: i64) -> Result<Option<Reservation>>;
    async fn cancel_reservation(&self, id: i64) -> Result<bool>;
    async fn list_fines(&self, params: FineListParams) -> Result<PaginatedResponse<Fine>>;
    async fn get_fine(&self, id: i64) -> Result<Option<Fine>>;
    async fn pay_fine(&self, id: i64) -> Result<Option<Fine>>;

    /// 系统设置
    async fn list_all_settings(&self) -> Result<Vec<SystemSetting>>;
    async fn get_setting_by_key(&self, key: &str) -> Result<Option<SystemSetting>>;
    async fn update_setting(
        &self,
        key: &str,
        value: &str,
        user_id: i64,
        ip_address: Option<String>,
    ) -> Result<SystemSetting>;
    async fn list_setting_audits(
        &self,
        params: SettingAuditParams,
    ) -> Result<PaginatedResponse<SettingAudit>>;

    /// 统计
    async fn count_active_students(&self) -> Result<u64>;
    async fn count_active_teachers(&self) -> Result<u64>;
    async fn count_active_classes(&self) -> Result<u64>;
    // 入学时间落在 [from, to) 内的学生数
    async fn count_enrollments_between(&self, from_ts: i64, to_ts: i64) -> Result<u64>;
    async fn students_per_program(&self) -> Result<Vec<ProgramHeadcount>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
