//! 统计查询

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::prelude::{Classes, Programs, Students, Teachers};
use crate::errors::{CampusError, Result};
use crate::models::analytics::responses::ProgramHeadcount;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    pub async fn count_active_students_impl(&self) -> Result<u64> {
        use crate::entity::students::Column;

        Students::find()
            .filter(Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计学生数量失败: {e}")))
    }

    pub async fn count_active_teachers_impl(&self) -> Result<u64> {
        use crate::entity::teachers::Column;

        Teachers::find()
            .filter(Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计教师数量失败: {e}")))
    }

    pub async fn count_active_classes_impl(&self) -> Result<u64> {
        use crate::entity::classes::Column;

        Classes::find()
            .filter(Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计班级数量失败: {e}")))
    }

    /// 入学时间落在 [from_ts, to_ts) 内
    pub async fn count_enrollments_between_impl(&self, from_ts: i64, to_ts: i64) -> Result<u64> {
        use crate::entity::students::Column;

        Students::find()
            .filter(Column::EnrolledAt.gte(from_ts))
            .filter(Column::EnrolledAt.lt(to_ts))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("统计入学人数失败: {e}")))
    }

    /// 各专业在读学生数（按班级所属专业归类），包含人数为 0 的专业
    pub async fn students_per_program_impl(&self) -> Result<Vec<ProgramHeadcount>> {
        let programs = Programs::find()
            .order_by_asc(crate::entity::programs::Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询专业列表失败: {e}")))?;

        let class_program: HashMap<i64, i64> = Classes::find()
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询班级失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c.program_id))
            .collect();

        let students = Students::find()
            .filter(crate::entity::students::Column::IsActive.eq(true))
            .filter(crate::entity::students::Column::ClassId.is_not_null())
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询学生失败: {e}")))?;

        let mut counts: HashMap<i64, i64> = HashMap::new();
        for student in students {
            if let Some(program_id) = student
                .class_id
                .and_then(|class_id| class_program.get(&class_id))
            {
                *counts.entry(*program_id).or_insert(0) += 1;
            }
        }

        Ok(programs
            .into_iter()
            .map(|p| ProgramHeadcount {
                program_id: p.id,
                students: counts.get(&p.id).copied().unwrap_or(0),
                program_label: p.label,
            })
            .collect())
    }
}
