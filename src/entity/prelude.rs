//! 预导入模块，方便使用

pub use super::absences::{
    ActiveModel as AbsenceActiveModel, Entity as Absences, Model as AbsenceModel,
};
pub use super::academic_years::{
    ActiveModel as AcademicYearActiveModel, Entity as AcademicYears, Model as AcademicYearModel,
};
pub use super::action_logs::{
    ActiveModel as ActionLogActiveModel, Entity as ActionLogs, Model as ActionLogModel,
};
pub use super::announcements::{
    ActiveModel as AnnouncementActiveModel, Entity as Announcements, Model as AnnouncementModel,
};
pub use super::averages::{
    ActiveModel as AverageActiveModel, Entity as Averages, Model as AverageModel,
};
pub use super::book_copies::{
    ActiveModel as BookCopyActiveModel, Entity as BookCopies, Model as BookCopyModel,
};
pub use super::books::{ActiveModel as BookActiveModel, Entity as Books, Model as BookModel};
pub use super::class_fees::{
    ActiveModel as ClassFeeActiveModel, Entity as ClassFees, Model as ClassFeeModel,
};
pub use super::class_subjects::{
    ActiveModel as ClassSubjectActiveModel, Entity as ClassSubjects, Model as ClassSubjectModel,
};
pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::export_logs::{
    ActiveModel as ExportLogActiveModel, Entity as ExportLogs, Model as ExportLogModel,
};
pub use super::fee_types::{
    ActiveModel as FeeTypeActiveModel, Entity as FeeTypes, Model as FeeTypeModel,
};
pub use super::fines::{ActiveModel as FineActiveModel, Entity as Fines, Model as FineModel};
pub use super::grade_history::{
    ActiveModel as GradeHistoryActiveModel, Entity as GradeHistory, Model as GradeHistoryModel,
};
pub use super::grades::{ActiveModel as GradeActiveModel, Entity as Grades, Model as GradeModel};
pub use super::installments::{
    ActiveModel as InstallmentActiveModel, Entity as Installments, Model as InstallmentModel,
};
pub use super::levels::{ActiveModel as LevelActiveModel, Entity as Levels, Model as LevelModel};
pub use super::loans::{ActiveModel as LoanActiveModel, Entity as Loans, Model as LoanModel};
pub use super::login_logs::{
    ActiveModel as LoginLogActiveModel, Entity as LoginLogs, Model as LoginLogModel,
};
pub use super::messages::{
    ActiveModel as MessageActiveModel, Entity as Messages, Model as MessageModel,
};
pub use super::notifications::{
    ActiveModel as NotificationActiveModel, Entity as Notifications, Model as NotificationModel,
};
pub use super::parent_students::{
    ActiveModel as ParentStudentActiveModel, Entity as ParentStudents, Model as ParentStudentModel,
};
pub use super::parents::{
    ActiveModel as ParentActiveModel, Entity as Parents, Model as ParentModel,
};
pub use super::password_resets::{
    ActiveModel as PasswordResetActiveModel, Entity as PasswordResets, Model as PasswordResetModel,
};
pub use super::payments::{
    ActiveModel as PaymentActiveModel, Entity as Payments, Model as PaymentModel,
};
pub use super::programs::{
    ActiveModel as ProgramActiveModel, Entity as Programs, Model as ProgramModel,
};
pub use super::rankings::{
    ActiveModel as RankingActiveModel, Entity as Rankings, Model as RankingModel,
};
pub use super::reservations::{
    ActiveModel as ReservationActiveModel, Entity as Reservations, Model as ReservationModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
pub use super::system_settings::{
    ActiveModel as SystemSettingActiveModel, Entity as SystemSettings, Model as SystemSettingModel,
};
pub use super::system_settings_audit::{
    ActiveModel as SettingAuditActiveModel, Entity as SystemSettingsAudit,
    Model as SettingAuditModel,
};
pub use super::teachers::{
    ActiveModel as TeacherActiveModel, Entity as Teachers, Model as TeacherModel,
};
pub use super::timetable_slots::{
    ActiveModel as TimetableSlotActiveModel, Entity as TimetableSlots, Model as TimetableSlotModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
