//! 角色档案与家长关联

use std::collections::HashMap;

use super::{SeaOrmStorage, write_error};
use crate::entity::parent_students::{
    ActiveModel as LinkActiveModel, Column as LinkColumn, Entity as ParentStudents,
};
use crate::entity::parents::{Column as ParentColumn, Entity as Parents};
use crate::entity::prelude::{Classes, Teachers, Users};
use crate::entity::students::{
    ActiveModel as StudentActiveModel, Column as StudentColumn, Entity as Students,
    Model as StudentModel,
};
use crate::errors::{CampusError, Result};
use crate::models::users::entities::{
    ParentProfile, RoleProfile, StudentProfile, StudentSummary, UserRole,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

/// 班级必须存在且有空位；`student_id` 已在该班时不占新名额
pub(crate) async fn ensure_class_has_room<C: ConnectionTrait>(
    conn: &C,
    class_id: i64,
    student_id: Option<i64>,
) -> Result<()> {
    let class = Classes::find_by_id(class_id)
        .one(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("查询班级失败: {e}")))?
        .ok_or_else(|| CampusError::not_found(format!("班级 {class_id} 不存在")))?;

    let mut members = Students::find()
        .filter(StudentColumn::ClassId.eq(class_id))
        .filter(StudentColumn::IsActive.eq(true));
    if let Some(student_id) = student_id {
        members = members.filter(StudentColumn::Id.ne(student_id));
    }
    let headcount = members
        .count(conn)
        .await
        .map_err(|e| CampusError::database_operation(format!("统计班级人数失败: {e}")))?;

    if headcount >= class.capacity.max(0) as u64 {
        return Err(CampusError::class_full(format!(
            "班级 {} 已满 ({}/{})",
            class.code, headcount, class.capacity
        )));
    }

    Ok(())
}

impl SeaOrmStorage {
    pub async fn get_role_profile_impl(
        &self,
        user_id: i64,
        role: UserRole,
    ) -> Result<Option<RoleProfile>> {
        let profile = match role {
            UserRole::Student => self
                .get_student_by_user_id_impl(user_id)
                .await?
                .map(RoleProfile::Student),
            UserRole::Teacher => Teachers::find()
                .filter(crate::entity::teachers::Column::UserId.eq(user_id))
                .one(&self.db)
                .await
                .map_err(|e| CampusError::database_operation(format!("查询教师档案失败: {e}")))?
                .map(|m| RoleProfile::Teacher(m.into_profile())),
            UserRole::Parent => self
                .get_parent_by_user_id_impl(user_id)
                .await?
                .map(RoleProfile::Parent),
            UserRole::Admin | UserRole::Accountant => None,
        };

        Ok(profile)
    }

    pub async fn get_student_by_id_impl(&self, student_id: i64) -> Result<Option<StudentProfile>> {
        let result = Students::find_by_id(student_id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_profile()))
    }

    pub async fn get_student_by_user_id_impl(
        &self,
        user_id: i64,
    ) -> Result<Option<StudentProfile>> {
        let result = Students::find()
            .filter(StudentColumn::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_profile()))
    }

    pub async fn get_parent_by_user_id_impl(&self, user_id: i64) -> Result<Option<ParentProfile>> {
        let result = Parents::find()
            .filter(ParentColumn::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询家长失败: {e}")))?;

        Ok(result.map(|m| m.into_profile()))
    }

    pub async fn get_student_summary_impl(&self, student_id: i64) -> Result<Option<StudentSummary>> {
        let Some(student) = Students::find_by_id(student_id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学生失败: {e}")))?
        else {
            return Ok(None);
        };

        Ok(self.summarize_students(vec![student]).await?.pop())
    }

    pub async fn list_student_summaries_impl(
        &self,
        class_id: Option<i64>,
    ) -> Result<Vec<StudentSummary>> {
        let mut select = Students::find().filter(StudentColumn::IsActive.eq(true));
        if let Some(class_id) = class_id {
            select = select.filter(StudentColumn::ClassId.eq(class_id));
        }

        let students = select
            .order_by_asc(StudentColumn::StudentNumber)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学生列表失败: {e}")))?;

        self.summarize_students(students).await
    }

    pub async fn assign_student_class_impl(
        &self,
        student_id: i64,
        class_id: i64,
        academic_year_id: i64,
    ) -> Result<Option<StudentProfile>> {
        if self.get_student_by_id_impl(student_id).await?.is_none() {
            return Ok(None);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("开启事务失败: {e}")))?;

        ensure_class_has_room(&txn, class_id, Some(student_id)).await?;

        let updated = StudentActiveModel {
            id: Set(student_id),
            class_id: Set(Some(class_id)),
            academic_year_id: Set(Some(academic_year_id)),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| write_error("学生分班失败", e))?;

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(updated.into_profile()))
    }

    pub async fn link_parent_student_impl(&self, parent_id: i64, student_id: i64) -> Result<bool> {
        if self.is_parent_of_impl(parent_id, student_id).await? {
            return Ok(false);
        }

        LinkActiveModel {
            parent_id: Set(parent_id),
            student_id: Set(student_id),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error("关联家长失败", e))?;

        Ok(true)
    }

    pub async fn unlink_parent_student_impl(&self, parent_id: i64, student_id: i64) -> Result<bool> {
        let result = ParentStudents::delete_many()
            .filter(LinkColumn::ParentId.eq(parent_id))
            .filter(LinkColumn::StudentId.eq(student_id))
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("解除家长关联失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn is_parent_of_impl(&self, parent_id: i64, student_id: i64) -> Result<bool> {
        let count = ParentStudents::find()
            .filter(LinkColumn::ParentId.eq(parent_id))
            .filter(LinkColumn::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询家长关联失败: {e}")))?;

        Ok(count > 0)
    }

    pub async fn list_parent_children_impl(&self, parent_id: i64) -> Result<Vec<StudentSummary>> {
        let student_ids: Vec<i64> = ParentStudents::find()
            .filter(LinkColumn::ParentId.eq(parent_id))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询家长关联失败: {e}")))?
            .into_iter()
            .map(|link| link.student_id)
            .collect();

        if student_ids.is_empty() {
            return Ok(Vec::new());
        }

        let students = Students::find()
            .filter(StudentColumn::Id.is_in(student_ids))
            .order_by_asc(StudentColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询孩子列表失败: {e}")))?;

        self.summarize_students(students).await
    }

    pub async fn list_student_parent_user_ids_impl(&self, student_id: i64) -> Result<Vec<i64>> {
        let parents = Parents::find()
            .inner_join(ParentStudents)
            .filter(LinkColumn::StudentId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学生家长失败: {e}")))?;

        Ok(parents.into_iter().map(|p| p.user_id).collect())
    }

    /// 批量补全学生的账户与班级信息
    async fn summarize_students(&self, students: Vec<StudentModel>) -> Result<Vec<StudentSummary>> {
        if students.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<i64> = students.iter().map(|s| s.user_id).collect();
        let class_ids: Vec<i64> = students.iter().filter_map(|s| s.class_id).collect();

        let users: HashMap<i64, _> = Users::find()
            .filter(crate::entity::users::Column::Id.is_in(user_ids))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学生账户失败: {e}")))?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let classes: HashMap<i64, String> = if class_ids.is_empty() {
            HashMap::new()
        } else {
            Classes::find()
                .filter(crate::entity::classes::Column::Id.is_in(class_ids))
                .all(&self.db)
                .await
                .map_err(|e| CampusError::database_operation(format!("查询班级失败: {e}")))?
                .into_iter()
                .map(|c| (c.id, c.label))
                .collect()
        };

        Ok(students
            .into_iter()
            .filter_map(|s| {
                let user = users.get(&s.user_id)?;
                Some(StudentSummary {
                    student_id: s.id,
                    user_id: s.user_id,
                    student_number: s.student_number,
                    first_name: user.first_name.clone(),
                    last_name: user.last_name.clone(),
                    email: user.email.clone(),
                    class_id: s.class_id,
                    class_label: s.class_id.and_then(|id| classes.get(&id).cloned()),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;

    #[actix_web::test]
    async fn test_assign_class_respects_capacity() {
        let storage = fixtures::memory_storage().await;
        let school = fixtures::school(&storage).await;
        let full = fixtures::class(&storage, &school, "F1", 1).await;
        let other = fixtures::class(&storage, &school, "F2", 5).await;

        let seated = fixtures::student(&storage, "assis", Some(full), Some(school.year_id)).await;
        let moving = fixtures::student(&storage, "mobile", Some(other), Some(school.year_id)).await;

        let err = storage
            .assign_student_class_impl(moving.id, full, school.year_id)
            .await
            .unwrap_err();
        assert!(matches!(err, CampusError::ClassFull(_)));

        // 已在班内的学生重新分到本班不占新名额
        let again = storage
            .assign_student_class_impl(seated.id, full, school.year_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(again.class_id, Some(full));

        let unchanged = storage.get_student_by_id_impl(moving.id).await.unwrap().unwrap();
        assert_eq!(unchanged.class_id, Some(other));
    }

    #[actix_web::test]
    async fn test_parent_link_is_idempotent() {
        let storage = fixtures::memory_storage().await;
        let child = fixtures::student(&storage, "enfant", None, None).await;
        let parent_user = fixtures::user(&storage, "parent1", UserRole::Parent).await;
        let parent = storage
            .get_parent_by_user_id_impl(parent_user.id)
            .await
            .unwrap()
            .unwrap();

        assert!(storage.link_parent_student_impl(parent.id, child.id).await.unwrap());
        assert!(!storage.link_parent_student_impl(parent.id, child.id).await.unwrap());
        assert!(storage.is_parent_of_impl(parent.id, child.id).await.unwrap());
        assert_eq!(storage.list_parent_children_impl(parent.id).await.unwrap().len(), 1);
    }
}
