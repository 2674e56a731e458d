//! 学年、专业、年级、班级、科目与课表

use std::collections::HashMap;

use super::{SeaOrmStorage, write_error};
use crate::entity::prelude::*;
use crate::errors::{CampusError, Result};
use crate::models::academics::{
    entities::{
        AcademicYear, ClassDetail, ClassSubject, Level, Program, SchoolClass, Subject,
        TimetableSlot, sort_timetable,
    },
    requests::{
        AssignSubjectRequest, ClassListParams, CreateAcademicYearRequest, CreateClassRequest,
        CreateLevelRequest, CreateProgramRequest, CreateSubjectRequest,
        CreateTimetableSlotRequest, UpdateAcademicYearRequest, UpdateClassRequest,
        UpdateLevelRequest, UpdateProgramRequest, UpdateSubjectRequest,
    },
    responses::ClassListResponse,
};
use crate::models::users::entities::User;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

/// 班级默认容量
const DEFAULT_CLASS_CAPACITY: i32 = 50;

impl SeaOrmStorage {
    // ==================== 学年 ====================

    pub async fn list_academic_years_impl(&self) -> Result<Vec<AcademicYear>> {
        use crate::entity::academic_years::Column;

        let years = AcademicYears::find()
            .order_by_desc(Column::StartDate)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学年列表失败: {e}")))?;

        Ok(years.into_iter().map(|m| m.into_academic_year()).collect())
    }

    pub async fn get_academic_year_impl(&self, id: i64) -> Result<Option<AcademicYear>> {
        let result = AcademicYears::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学年失败: {e}")))?;

        Ok(result.map(|m| m.into_academic_year()))
    }

    pub async fn get_active_academic_year_impl(&self) -> Result<Option<AcademicYear>> {
        use crate::entity::academic_years::Column;

        let result = AcademicYears::find()
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询当前学年失败: {e}")))?;

        Ok(result.map(|m| m.into_academic_year()))
    }

    /// 创建学年；若标记为当前学年，其余学年全部停用
    pub async fn create_academic_year_impl(
        &self,
        req: CreateAcademicYearRequest,
    ) -> Result<AcademicYear> {
        use crate::entity::academic_years::Column;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        if req.is_active {
            AcademicYears::update_many()
                .col_expr(Column::IsActive, sea_orm::sea_query::Expr::value(false))
                .exec(&txn)
                .await
                .map_err(|e| CampusError::database_operation(format!("停用学年失败: {e}")))?;
        }

        let year = AcademicYearActiveModel {
            code: Set(req.code),
            label: Set(req.label),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            is_active: Set(req.is_active),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| write_error("创建学年失败", e))?;

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(year.into_academic_year())
    }

    pub async fn update_academic_year_impl(
        &self,
        id: i64,
        update: UpdateAcademicYearRequest,
    ) -> Result<Option<AcademicYear>> {
        if self.get_academic_year_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = AcademicYearActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(label) = update.label {
            model.label = Set(label);
        }
        if let Some(start_date) = update.start_date {
            model.start_date = Set(start_date);
        }
        if let Some(end_date) = update.end_date {
            model.end_date = Set(end_date);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| write_error("更新学年失败", e))?;

        Ok(Some(updated.into_academic_year()))
    }

    /// 同一时间只有一个当前学年
    pub async fn activate_academic_year_impl(&self, id: i64) -> Result<Option<AcademicYear>> {
        use crate::entity::academic_years::Column;

        if self.get_academic_year_impl(id).await?.is_none() {
            return Ok(None);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        AcademicYears::update_many()
            .col_expr(Column::IsActive, sea_orm::sea_query::Expr::value(false))
            .filter(Column::Id.ne(id))
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("停用学年失败: {e}")))?;

        let year = AcademicYearActiveModel {
            id: Set(id),
            is_active: Set(true),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| CampusError::database_operation(format!("激活学年失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(year.into_academic_year()))
    }

    // ==================== 专业 ====================

    pub async fn list_programs_impl(&self) -> Result<Vec<Program>> {
        use crate::entity::programs::Column;

        let programs = Programs::find()
            .order_by_asc(Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询专业列表失败: {e}")))?;

        Ok(programs.into_iter().map(|m| m.into_program()).collect())
    }

    pub async fn get_program_impl(&self, id: i64) -> Result<Option<Program>> {
        let result = Programs::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询专业失败: {e}")))?;

        Ok(result.map(|m| m.into_program()))
    }

    pub async fn create_program_impl(&self, req: CreateProgramRequest) -> Result<Program> {
        let program = ProgramActiveModel {
            code: Set(req.code),
            label: Set(req.label),
            description: Set(req.description),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error("创建专业失败", e))?;

        Ok(program.into_program())
    }

    pub async fn update_program_impl(
        &self,
        id: i64,
        update: UpdateProgramRequest,
    ) -> Result<Option<Program>> {
        if self.get_program_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ProgramActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(label) = update.label {
            model.label = Set(label);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| write_error("更新专业失败", e))?;

        Ok(Some(updated.into_program()))
    }

    pub async fn delete_program_impl(&self, id: i64) -> Result<bool> {
        let result = Programs::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_error("删除专业失败", e))?;

        Ok(result.rows_affected > 0)
    }

    // ==================== 年级 ====================

    pub async fn list_levels_impl(&self) -> Result<Vec<Level>> {
        use crate::entity::levels::Column;

        let levels = Levels::find()
            .order_by_asc(Column::Rank)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询年级列表失败: {e}")))?;

        Ok(levels.into_iter().map(|m| m.into_level()).collect())
    }

    pub async fn get_level_impl(&self, id: i64) -> Result<Option<Level>> {
        let result = Levels::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询年级失败: {e}")))?;

        Ok(result.map(|m| m.into_level()))
    }

    pub async fn create_level_impl(&self, req: CreateLevelRequest) -> Result<Level> {
        let level = LevelActiveModel {
            code: Set(req.code),
            label: Set(req.label),
            rank: Set(req.rank),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error("创建年级失败", e))?;

        Ok(level.into_level())
    }

    pub async fn update_level_impl(
        &self,
        id: i64,
        update: UpdateLevelRequest,
    ) -> Result<Option<Level>> {
        if self.get_level_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = LevelActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(label) = update.label {
            model.label = Set(label);
        }
        if let Some(rank) = update.rank {
            model.rank = Set(rank);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| write_error("更新年级失败", e))?;

        Ok(Some(updated.into_level()))
    }

    pub async fn delete_level_impl(&self, id: i64) -> Result<bool> {
        let result = Levels::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_error("删除年级失败", e))?;

        Ok(result.rows_affected > 0)
    }

    // ==================== 班级 ====================

    pub async fn list_classes_with_pagination_impl(
        &self,
        params: ClassListParams,
    ) -> Result<ClassListResponse> {
        use crate::entity::classes::Column;

        let mut select = Classes::find();
        if let Some(program_id) = params.program_id {
            select = select.filter(Column::ProgramId.eq(program_id));
        }
        if let Some(level_id) = params.level_id {
            select = select.filter(Column::LevelId.eq(level_id));
        }
        if let Some(academic_year_id) = params.academic_year_id {
            select = select.filter(Column::AcademicYearId.eq(academic_year_id));
        }
        select = select.order_by_asc(Column::Code);

        let (classes, pagination) = self.fetch_page(select, &params.pagination, "班级").await?;

        Ok(ClassListResponse {
            items: self.detail_classes(classes).await?,
            pagination,
        })
    }

    pub async fn get_class_impl(&self, id: i64) -> Result<Option<ClassDetail>> {
        let Some(class) = Classes::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询班级失败: {e}")))?
        else {
            return Ok(None);
        };

        Ok(self.detail_classes(vec![class]).await?.pop())
    }

    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<SchoolClass> {
        let now = chrono::Utc::now().timestamp();

        let class = ClassActiveModel {
            code: Set(req.code),
            label: Set(req.label),
            program_id: Set(req.program_id),
            level_id: Set(req.level_id),
            academic_year_id: Set(req.academic_year_id),
            capacity: Set(req.capacity.unwrap_or(DEFAULT_CLASS_CAPACITY)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error("创建班级失败", e))?;

        Ok(class.into_class())
    }

    pub async fn update_class_impl(
        &self,
        id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<SchoolClass>> {
        let existing = Classes::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询班级失败: {e}")))?;
        if existing.is_none() {
            return Ok(None);
        }

        let mut model = ClassActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(label) = update.label {
            model.label = Set(label);
        }
        if let Some(program_id) = update.program_id {
            model.program_id = Set(program_id);
        }
        if let Some(level_id) = update.level_id {
            model.level_id = Set(level_id);
        }
        if let Some(academic_year_id) = update.academic_year_id {
            model.academic_year_id = Set(academic_year_id);
        }
        if let Some(capacity) = update.capacity {
            model.capacity = Set(capacity);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| write_error("更新班级失败", e))?;

        Ok(Some(updated.into_class()))
    }

    pub async fn delete_class_impl(&self, id: i64) -> Result<bool> {
        let result = Classes::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_error("删除班级失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 班级在读学生数
    pub async fn count_class_students_impl(&self, class_id: i64) -> Result<u64> {
        use crate::entity::students::Column;

        Students::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计班级人数失败: {e}")))
    }

    /// 为班级补全专业、年级、学年名称与在读人数
    async fn detail_classes(
        &self,
        classes: Vec<crate::entity::classes::Model>,
    ) -> Result<Vec<ClassDetail>> {
        if classes.is_empty() {
            return Ok(Vec::new());
        }

        let class_ids: Vec<i64> = classes.iter().map(|c| c.id).collect();

        let programs: HashMap<i64, String> = Programs::find()
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询专业列表失败: {e}")))?
            .into_iter()
            .map(|p| (p.id, p.label))
            .collect();
        let levels: HashMap<i64, String> = Levels::find()
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询年级列表失败: {e}")))?
            .into_iter()
            .map(|l| (l.id, l.label))
            .collect();
        let years: HashMap<i64, String> = AcademicYears::find()
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学年列表失败: {e}")))?
            .into_iter()
            .map(|y| (y.id, y.label))
            .collect();

        let headcounts: HashMap<i64, i64> = {
            use crate::entity::students::Column;

            Students::find()
                .select_only()
                .column(Column::ClassId)
                .column_as(Column::Id.count(), "headcount")
                .filter(Column::ClassId.is_in(class_ids))
                .filter(Column::IsActive.eq(true))
                .group_by(Column::ClassId)
                .into_tuple::<(Option<i64>, i64)>()
                .all(&self.db)
                .await
                .map_err(|e| CampusError::database_operation(format!("统计班级人数失败: {e}")))?
                .into_iter()
                .filter_map(|(class_id, count)| class_id.map(|id| (id, count)))
                .collect()
        };

        Ok(classes
            .into_iter()
            .map(|c| ClassDetail {
                program_label: programs.get(&c.program_id).cloned(),
                level_label: levels.get(&c.level_id).cloned(),
                academic_year_label: years.get(&c.academic_year_id).cloned(),
                headcount: headcounts.get(&c.id).copied().unwrap_or(0),
                class: c.into_class(),
            })
            .collect())
    }

    // ==================== 科目 ====================

    pub async fn list_subjects_impl(&self) -> Result<Vec<Subject>> {
        use crate::entity::subjects::Column;

        let subjects = Subjects::find()
            .order_by_asc(Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询科目列表失败: {e}")))?;

        Ok(subjects.into_iter().map(|m| m.into_subject()).collect())
    }

    pub async fn get_subject_impl(&self, id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询科目失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    pub async fn create_subject_impl(&self, req: CreateSubjectRequest) -> Result<Subject> {
        let subject = SubjectActiveModel {
            code: Set(req.code),
            label: Set(req.label),
            coefficient: Set(req.coefficient.unwrap_or(1.0)),
            hours: Set(req.hours),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error("创建科目失败", e))?;

        Ok(subject.into_subject())
    }

    pub async fn update_subject_impl(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        if self.get_subject_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = SubjectActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(label) = update.label {
            model.label = Set(label);
        }
        if let Some(coefficient) = update.coefficient {
            model.coefficient = Set(coefficient);
        }
        if let Some(hours) = update.hours {
            model.hours = Set(Some(hours));
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| write_error("更新科目失败", e))?;

        Ok(Some(updated.into_subject()))
    }

    pub async fn delete_subject_impl(&self, id: i64) -> Result<bool> {
        let result = Subjects::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_error("删除科目失败", e))?;

        Ok(result.rows_affected > 0)
    }

    // ==================== 班级科目与课表 ====================

    pub async fn assign_class_subject_impl(
        &self,
        req: AssignSubjectRequest,
    ) -> Result<ClassSubject> {
        let assignment = ClassSubjectActiveModel {
            class_id: Set(req.class_id),
            subject_id: Set(req.subject_id),
            teacher_id: Set(req.teacher_id),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error("分配科目失败", e))?;

        let subject = Subjects::find_by_id(assignment.subject_id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询科目失败: {e}")))?;
        let teacher_name = self
            .user_names(vec![assignment.teacher_id])
            .await?
            .remove(&assignment.teacher_id)
            .unwrap_or_default();

        Ok(assignment.into_class_subject(subject, teacher_name))
    }

    pub async fn list_class_subjects_impl(&self, class_id: i64) -> Result<Vec<ClassSubject>> {
        use crate::entity::class_subjects::Column;

        let assignments = ClassSubjects::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询班级科目失败: {e}")))?;

        self.detail_class_subjects(assignments).await
    }

    pub async fn remove_class_subject_impl(&self, id: i64) -> Result<bool> {
        let result = ClassSubjects::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_error("移除班级科目失败", e))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn is_teacher_assigned_impl(
        &self,
        teacher_id: i64,
        class_id: i64,
        subject_id: i64,
    ) -> Result<bool> {
        use crate::entity::class_subjects::Column;

        let count = ClassSubjects::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::SubjectId.eq(subject_id))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询任课关系失败: {e}")))?;

        Ok(count > 0)
    }

    pub async fn list_teacher_subjects_impl(
        &self,
        teacher_id: i64,
        class_id: Option<i64>,
    ) -> Result<Vec<ClassSubject>> {
        use crate::entity::class_subjects::Column;

        let mut select = ClassSubjects::find().filter(Column::TeacherId.eq(teacher_id));
        if let Some(class_id) = class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }

        let assignments = select
            .order_by_asc(Column::ClassId)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询教师科目失败: {e}")))?;

        self.detail_class_subjects(assignments).await
    }

    pub async fn list_teacher_classes_impl(&self, teacher_id: i64) -> Result<Vec<ClassDetail>> {
        use crate::entity::class_subjects::Column;

        let mut class_ids: Vec<i64> = ClassSubjects::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询教师班级失败: {e}")))?
            .into_iter()
            .map(|a| a.class_id)
            .collect();
        class_ids.sort_unstable();
        class_ids.dedup();

        if class_ids.is_empty() {
            return Ok(Vec::new());
        }

        let classes = Classes::find()
            .filter(crate::entity::classes::Column::Id.is_in(class_ids))
            .order_by_asc(crate::entity::classes::Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询班级失败: {e}")))?;

        self.detail_classes(classes).await
    }

    pub async fn create_timetable_slot_impl(
        &self,
        req: CreateTimetableSlotRequest,
    ) -> Result<TimetableSlot> {
        let slot = TimetableSlotActiveModel {
            class_id: Set(req.class_id),
            subject_id: Set(req.subject_id),
            teacher_id: Set(req.teacher_id),
            weekday: Set(req.weekday.to_string()),
            start_time: Set(req.start_time),
            end_time: Set(req.end_time),
            room: Set(req.room),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error("创建课表失败", e))?;

        let subject_label = Subjects::find_by_id(slot.subject_id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询科目失败: {e}")))?
            .map(|s| s.label);
        let teacher_name = self
            .user_names(vec![slot.teacher_id])
            .await?
            .remove(&slot.teacher_id);

        Ok(slot.into_slot(subject_label, teacher_name))
    }

    /// 按星期、开始时间排序
    pub async fn list_class_timetable_impl(&self, class_id: i64) -> Result<Vec<TimetableSlot>> {
        use crate::entity::timetable_slots::Column;

        let slots = TimetableSlots::find()
            .filter(Column::ClassId.eq(class_id))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询课表失败: {e}")))?;

        let subjects: HashMap<i64, String> = Subjects::find()
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询科目列表失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, s.label))
            .collect();
        let teachers = self
            .user_names(slots.iter().map(|s| s.teacher_id).collect())
            .await?;

        let mut slots: Vec<TimetableSlot> = slots
            .into_iter()
            .map(|s| {
                let subject_label = subjects.get(&s.subject_id).cloned();
                let teacher_name = teachers.get(&s.teacher_id).cloned();
                s.into_slot(subject_label, teacher_name)
            })
            .collect();
        sort_timetable(&mut slots);

        Ok(slots)
    }

    pub async fn delete_timetable_slot_impl(&self, id: i64) -> Result<bool> {
        let result = TimetableSlots::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_error("删除课表失败", e))?;

        Ok(result.rows_affected > 0)
    }

    async fn detail_class_subjects(
        &self,
        assignments: Vec<ClassSubjectModel>,
    ) -> Result<Vec<ClassSubject>> {
        if assignments.is_empty() {
            return Ok(Vec::new());
        }

        let subjects: HashMap<i64, SubjectModel> = Subjects::find()
            .filter(
                crate::entity::subjects::Column::Id
                    .is_in(assignments.iter().map(|a| a.subject_id).collect::<Vec<_>>()),
            )
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询科目失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();
        let teachers = self
            .user_names(assignments.iter().map(|a| a.teacher_id).collect())
            .await?;

        Ok(assignments
            .into_iter()
            .map(|a| {
                let subject = subjects.get(&a.subject_id).cloned();
                let teacher_name = teachers.get(&a.teacher_id).cloned().unwrap_or_default();
                a.into_class_subject(subject, teacher_name)
            })
            .collect())
    }

    /// 用户 ID 到姓名的映射
    pub(crate) async fn user_names(&self, ids: Vec<i64>) -> Result<HashMap<i64, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users = Users::find()
            .filter(crate::entity::users::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(users
            .into_iter()
            .map(|u| {
                let user: User = u.into_user();
                (user.id, user.full_name())
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;

    #[actix_web::test]
    async fn test_activating_year_deactivates_others() {
        let storage = fixtures::memory_storage().await;
        let school = fixtures::school(&storage).await;

        let next = storage
            .create_academic_year_impl(CreateAcademicYearRequest {
                code: "2026-2027".into(),
                label: "Année 2026-2027".into(),
                start_date: "2026-09-01".into(),
                end_date: "2027-07-15".into(),
                is_active: false,
            })
            .await
            .unwrap();

        storage.activate_academic_year_impl(next.id).await.unwrap();

        let active = storage.get_active_academic_year_impl().await.unwrap().unwrap();
        assert_eq!(active.id, next.id);
        let previous = storage
            .get_academic_year_impl(school.year_id)
            .await
            .unwrap()
            .unwrap();
        assert!(!previous.is_active);
    }

    #[actix_web::test]
    async fn test_duplicate_program_code_is_conflict() {
        let storage = fixtures::memory_storage().await;
        fixtures::school(&storage).await;

        let err = storage
            .create_program_impl(CreateProgramRequest {
                code: "SCI".into(),
                label: "Sciences bis".into(),
                description: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CampusError::Conflict(_)));
    }

    #[actix_web::test]
    async fn test_class_headcount_counts_active_students() {
        let storage = fixtures::memory_storage().await;
        let school = fixtures::school(&storage).await;
        let class_id = fixtures::class(&storage, &school, "6A", 30).await;

        fixtures::student(&storage, "eleve1", Some(class_id), Some(school.year_id)).await;
        fixtures::student(&storage, "eleve2", Some(class_id), Some(school.year_id)).await;
        fixtures::student(&storage, "eleve3", None, None).await;

        let class = storage.get_class_impl(class_id).await.unwrap().unwrap();
        assert_eq!(class.headcount, 2);
        assert!(!class.is_full());
    }
}
