//! 成绩、平均分、排名与考勤

use std::collections::HashMap;

use super::{SeaOrmStorage, write_error};
use crate::entity::date_to_string;
use crate::entity::prelude::*;
use crate::errors::{CampusError, Result};
use crate::models::{
    PaginatedResponse, PaginationQuery,
    grades::{
        entities::{
            Absence, AbsenceType, Grade, GradeHistory as GradeChange, Ranking, SubjectAverage,
        },
        requests::{CreateAbsenceRequest, CreateGradeRequest, GradeQuery},
        responses::GradeListResponse,
    },
};
use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    // ==================== 成绩 ====================

    pub async fn create_grade_impl(
        &self,
        teacher_id: i64,
        req: CreateGradeRequest,
        graded_on: NaiveDate,
    ) -> Result<Grade> {
        let now = chrono::Utc::now().timestamp();

        let grade = GradeActiveModel {
            student_id: Set(req.student_id),
            subject_id: Set(req.subject_id),
            class_id: Set(req.class_id),
            grade_type: Set(req.grade_type),
            value: Set(req.value),
            coefficient: Set(req.coefficient.unwrap_or(1.0)),
            graded_on: Set(date_to_string(graded_on)),
            teacher_id: Set(teacher_id),
            comment: Set(req.comment),
            is_validated: Set(false),
            validated_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error("创建成绩失败", e))?;

        Ok(grade.into_grade())
    }

    pub async fn get_grade_impl(&self, id: i64) -> Result<Option<Grade>> {
        let result = Grades::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    /// 修改分数，同一事务内写入修改历史
    pub async fn update_grade_value_impl(
        &self,
        id: i64,
        value: f64,
        modified_by: i64,
        reason: Option<String>,
    ) -> Result<Option<Grade>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = Grades::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询成绩失败: {e}")))?
        else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();

        GradeHistoryActiveModel {
            grade_id: Set(id),
            old_value: Set(existing.value),
            new_value: Set(value),
            modified_by: Set(modified_by),
            reason: Set(reason),
            modified_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| CampusError::database_operation(format!("写入成绩历史失败: {e}")))?;

        let updated = GradeActiveModel {
            id: Set(id),
            value: Set(value),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| CampusError::database_operation(format!("更新成绩失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(updated.into_grade()))
    }

    pub async fn validate_grade_impl(&self, id: i64) -> Result<Option<Grade>> {
        use crate::entity::grades::Column;

        if self.get_grade_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        let result = Grades::update_many()
            .col_expr(Column::IsValidated, Expr::value(true))
            .col_expr(Column::ValidatedAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::IsValidated.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("验证成绩失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(CampusError::conflict(format!("成绩 {id} 已验证")));
        }

        self.get_grade_impl(id).await
    }

    pub async fn list_grade_history_impl(&self, grade_id: i64) -> Result<Vec<GradeChange>> {
        use crate::entity::grade_history::Column;

        let history = GradeHistory::find()
            .filter(Column::GradeId.eq(grade_id))
            .order_by_desc(Column::ModifiedAt)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询成绩历史失败: {e}")))?;

        Ok(history.into_iter().map(|m| m.into_history()).collect())
    }

    pub async fn list_grades_impl(&self, query: GradeQuery) -> Result<GradeListResponse> {
        use crate::entity::grades::Column;

        let mut select = Grades::find();
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }
        if query.validated_only {
            select = select.filter(Column::IsValidated.eq(true));
        }
        select = select
            .order_by_desc(Column::GradedOn)
            .order_by_desc(Column::Id);

        let pagination = PaginationQuery {
            page: query.page as i64,
            size: query.size as i64,
        };
        let (grades, pagination) = self.fetch_page(select, &pagination, "成绩").await?;

        Ok(GradeListResponse {
            items: grades.into_iter().map(|m| m.into_grade()).collect(),
            pagination,
        })
    }

    pub async fn list_validated_grades_impl(
        &self,
        student_id: i64,
        subject_id: Option<i64>,
        class_id: Option<i64>,
    ) -> Result<Vec<Grade>> {
        use crate::entity::grades::Column;

        let mut select = Grades::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::IsValidated.eq(true));
        if let Some(subject_id) = subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }
        if let Some(class_id) = class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }

        let grades = select
            .order_by_desc(Column::GradedOn)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(grades.into_iter().map(|m| m.into_grade()).collect())
    }

    pub async fn list_grades_for_export_impl(
        &self,
        class_id: Option<i64>,
        subject_id: Option<i64>,
    ) -> Result<Vec<Grade>> {
        use crate::entity::grades::Column;

        let mut select = Grades::find();
        if let Some(class_id) = class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(subject_id) = subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }

        let grades = select
            .order_by_asc(Column::StudentId)
            .order_by_asc(Column::GradedOn)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("导出成绩失败: {e}")))?;

        Ok(grades.into_iter().map(|m| m.into_grade()).collect())
    }

    // ==================== 平均分与排名 ====================

    /// 每个 (学生, 科目, 周期) 只保留一条
    pub async fn upsert_average_impl(
        &self,
        average: SubjectAverage,
        academic_year_id: Option<i64>,
    ) -> Result<()> {
        use crate::entity::averages::Column;

        let now = chrono::Utc::now().timestamp();

        let existing = Averages::find()
            .filter(Column::StudentId.eq(average.student_id))
            .filter(Column::SubjectId.eq(average.subject_id))
            .filter(Column::Period.eq(average.period.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询平均分失败: {e}")))?;

        match existing {
            Some(row) => {
                AverageActiveModel {
                    id: Set(row.id),
                    class_id: Set(average.class_id),
                    value: Set(average.value),
                    academic_year_id: Set(academic_year_id),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .update(&self.db)
                .await
                .map_err(|e| CampusError::database_operation(format!("更新平均分失败: {e}")))?;
            }
            None => {
                AverageActiveModel {
                    student_id: Set(average.student_id),
                    subject_id: Set(average.subject_id),
                    class_id: Set(average.class_id),
                    value: Set(average.value),
                    period: Set(average.period),
                    academic_year_id: Set(academic_year_id),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
                .map_err(|e| write_error("写入平均分失败", e))?;
            }
        }

        Ok(())
    }

    pub async fn list_student_averages_impl(
        &self,
        student_id: i64,
        period: &str,
    ) -> Result<Vec<SubjectAverage>> {
        use crate::entity::averages::Column;

        let averages = Averages::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::Period.eq(period))
            .order_by_asc(Column::SubjectId)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询平均分失败: {e}")))?;

        self.attach_subjects(averages).await
    }

    /// 学生各学年的平均分，按学年分组返回
    pub async fn list_student_averages_by_year_impl(
        &self,
        student_id: i64,
        period: &str,
    ) -> Result<Vec<(Option<i64>, SubjectAverage)>> {
        use crate::entity::averages::Column;

        let averages = Averages::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::Period.eq(period))
            .order_by_asc(Column::AcademicYearId)
            .order_by_asc(Column::SubjectId)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询平均分失败: {e}")))?;

        let years: Vec<Option<i64>> = averages.iter().map(|a| a.academic_year_id).collect();
        let items = self.attach_subjects(averages).await?;
        Ok(years.into_iter().zip(items).collect())
    }

    pub async fn list_class_averages_impl(
        &self,
        class_id: i64,
        period: &str,
    ) -> Result<Vec<SubjectAverage>> {
        use crate::entity::averages::Column;

        let averages = Averages::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Period.eq(period))
            .order_by_asc(Column::StudentId)
            .order_by_asc(Column::SubjectId)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询班级平均分失败: {e}")))?;

        self.attach_subjects(averages).await
    }

    async fn attach_subjects(&self, averages: Vec<AverageModel>) -> Result<Vec<SubjectAverage>> {
        let subjects: HashMap<i64, SubjectModel> = Subjects::find()
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询科目列表失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok(averages
            .into_iter()
            .map(|a| {
                let subject = subjects.get(&a.subject_id).cloned();
                a.into_average(subject)
            })
            .collect())
    }

    /// 先删后写，整体替换班级在该周期的排名
    pub async fn save_class_rankings_impl(
        &self,
        class_id: i64,
        period: &str,
        academic_year_id: Option<i64>,
        rankings: Vec<Ranking>,
    ) -> Result<()> {
        use crate::entity::rankings::Column;

        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        Rankings::delete_many()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Period.eq(period))
            .exec(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("清理排名失败: {e}")))?;

        if !rankings.is_empty() {
            let models = rankings.into_iter().map(|r| RankingActiveModel {
                student_id: Set(r.student_id),
                class_id: Set(class_id),
                rank: Set(r.rank),
                general_average: Set(r.general_average),
                period: Set(period.to_string()),
                academic_year_id: Set(academic_year_id),
                updated_at: Set(now),
                ..Default::default()
            });

            Rankings::insert_many(models)
                .exec(&txn)
                .await
                .map_err(|e| CampusError::database_operation(format!("写入排名失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(())
    }

    pub async fn get_student_ranking_impl(
        &self,
        student_id: i64,
        period: &str,
    ) -> Result<Option<Ranking>> {
        use crate::entity::rankings::Column;

        let result = Rankings::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::Period.eq(period))
            .order_by_desc(Column::UpdatedAt)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询排名失败: {e}")))?;

        Ok(result.map(|m| m.into_ranking()))
    }

    pub async fn count_class_rankings_impl(&self, class_id: i64, period: &str) -> Result<u64> {
        use crate::entity::rankings::Column;

        Rankings::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Period.eq(period))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计排名失败: {e}")))
    }

    pub async fn list_top_rankings_impl(&self, period: &str, limit: u64) -> Result<Vec<Ranking>> {
        use crate::entity::rankings::Column;

        let rankings = Rankings::find()
            .filter(Column::Period.eq(period))
            .order_by_desc(Column::GeneralAverage)
            .order_by_asc(Column::StudentId)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询排行榜失败: {e}")))?;

        Ok(rankings.into_iter().map(|m| m.into_ranking()).collect())
    }

    pub async fn count_averages_impl(&self, period: &str, min_value: Option<f64>) -> Result<u64> {
        use crate::entity::averages::Column;

        let mut select = Averages::find().filter(Column::Period.eq(period));
        if let Some(min_value) = min_value {
            select = select.filter(Column::Value.gte(min_value));
        }

        select
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计平均分失败: {e}")))
    }

    // ==================== 考勤 ====================

    pub async fn create_absence_impl(
        &self,
        teacher_id: i64,
        req: CreateAbsenceRequest,
        absence_date: NaiveDate,
    ) -> Result<Absence> {
        let absence_type = match (&req.absence_type, &req.justification) {
            (Some(kind), _) => *kind,
            (None, Some(_)) => AbsenceType::Justified,
            (None, None) => AbsenceType::Unjustified,
        };

        let absence = AbsenceActiveModel {
            student_id: Set(req.student_id),
            class_id: Set(req.class_id),
            subject_id: Set(req.subject_id),
            absence_date: Set(date_to_string(absence_date)),
            start_time: Set(req.start_time),
            end_time: Set(req.end_time),
            absence_type: Set(absence_type.to_string()),
            justification: Set(req.justification),
            teacher_id: Set(teacher_id),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error("记录缺勤失败", e))?;

        Ok(absence.into_absence())
    }

    pub async fn get_absence_impl(&self, id: i64) -> Result<Option<Absence>> {
        let result = Absences::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询缺勤失败: {e}")))?;

        Ok(result.map(|m| m.into_absence()))
    }

    pub async fn justify_absence_impl(
        &self,
        id: i64,
        justification: &str,
    ) -> Result<Option<Absence>> {
        if self.get_absence_impl(id).await?.is_none() {
            return Ok(None);
        }

        let updated = AbsenceActiveModel {
            id: Set(id),
            absence_type: Set(AbsenceType::Justified.to_string()),
            justification: Set(Some(justification.to_string())),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| CampusError::database_operation(format!("更新缺勤失败: {e}")))?;

        Ok(Some(updated.into_absence()))
    }

    pub async fn list_student_absences_impl(
        &self,
        student_id: i64,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Absence>> {
        use crate::entity::absences::Column;

        let select = Absences::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::AbsenceDate)
            .order_by_desc(Column::Id);

        let (absences, pagination) = self.fetch_page(select, &pagination, "缺勤记录").await?;

        Ok(PaginatedResponse {
            items: absences.into_iter().map(|m| m.into_absence()).collect(),
            pagination,
        })
    }

    pub async fn count_student_absences_since_impl(
        &self,
        student_id: i64,
        since: NaiveDate,
    ) -> Result<u64> {
        use crate::entity::absences::Column;

        Absences::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::AbsenceDate.gte(date_to_string(since)))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计缺勤失败: {e}")))
    }

    pub async fn count_absences_since_impl(&self, since: NaiveDate) -> Result<u64> {
        use crate::entity::absences::Column;

        Absences::find()
            .filter(Column::AbsenceDate.gte(date_to_string(since)))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计缺勤失败: {e}")))
    }

    /// 每个学生不低于 min_value 的已验证成绩数
    pub async fn count_good_grades_per_student_impl(
        &self,
        min_value: f64,
    ) -> Result<HashMap<i64, u64>> {
        use crate::entity::grades::Column;

        let rows = Grades::find()
            .select_only()
            .column(Column::StudentId)
            .column_as(Column::Id.count(), "good_grades")
            .filter(Column::IsValidated.eq(true))
            .filter(Column::Value.gte(min_value))
            .group_by(Column::StudentId)
            .into_tuple::<(i64, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计优秀成绩失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(student_id, count)| (student_id, count.max(0) as u64))
            .collect())
    }

    /// 每个学生自 since 起的缺勤次数，没有缺勤的学生不出现
    pub async fn count_absences_per_student_impl(
        &self,
        since: NaiveDate,
    ) -> Result<HashMap<i64, u64>> {
        use crate::entity::absences::Column;

        let rows = Absences::find()
            .select_only()
            .column(Column::StudentId)
            .column_as(Column::Id.count(), "absences")
            .filter(Column::AbsenceDate.gte(date_to_string(since)))
            .group_by(Column::StudentId)
            .into_tuple::<(i64, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计缺勤失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(student_id, count)| (student_id, count.max(0) as u64))
            .collect())
    }
}
