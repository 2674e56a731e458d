use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 成绩表
        manager
            .create_table(
                Table::create()
                    .table(Grades::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Grades::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Grades::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Grades::SubjectId).big_integer().not_null())
                    .col(ColumnDef::new(Grades::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Grades::GradeType).string().not_null())
                    .col(ColumnDef::new(Grades::Value).double().not_null())
                    .col(
                        ColumnDef::new(Grades::Coefficient)
                            .double()
                            .not_null()
                            .default(1.0),
                    )
                    .col(ColumnDef::new(Grades::GradedOn).string().not_null())
                    .col(ColumnDef::new(Grades::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(Grades::Comment).text().null())
                    .col(
                        ColumnDef::new(Grades::IsValidated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Grades::ValidatedAt).big_integer().null())
                    .col(ColumnDef::new(Grades::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Grades::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Grades::Table, Grades::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 成绩修改历史表
        manager
            .create_table(
                Table::create()
                    .table(GradeHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GradeHistory::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GradeHistory::GradeId).big_integer().not_null())
                    .col(ColumnDef::new(GradeHistory::OldValue).double().not_null())
                    .col(ColumnDef::new(GradeHistory::NewValue).double().not_null())
                    .col(
                        ColumnDef::new(GradeHistory::ModifiedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GradeHistory::Reason).text().null())
                    .col(
                        ColumnDef::new(GradeHistory::ModifiedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GradeHistory::Table, GradeHistory::GradeId)
                            .to(Grades::Table, Grades::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 科目平均分表
        manager
            .create_table(
                Table::create()
                    .table(Averages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Averages::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Averages::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Averages::SubjectId).big_integer().not_null())
                    .col(ColumnDef::new(Averages::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Averages::Value).double().not_null())
                    .col(ColumnDef::new(Averages::Period).string().not_null())
                    .col(ColumnDef::new(Averages::AcademicYearId).big_integer().null())
                    .col(ColumnDef::new(Averages::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Averages::Table, Averages::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 班级排名表
        manager
            .create_table(
                Table::create()
                    .table(Rankings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rankings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rankings::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Rankings::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Rankings::Rank).integer().not_null())
                    .col(ColumnDef::new(Rankings::GeneralAverage).double().not_null())
                    .col(ColumnDef::new(Rankings::Period).string().not_null())
                    .col(ColumnDef::new(Rankings::AcademicYearId).big_integer().null())
                    .col(ColumnDef::new(Rankings::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Rankings::Table, Rankings::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 缺勤表
        manager
            .create_table(
                Table::create()
                    .table(Absences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Absences::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Absences::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Absences::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Absences::SubjectId).big_integer().null())
                    .col(ColumnDef::new(Absences::AbsenceDate).string().not_null())
                    .col(ColumnDef::new(Absences::StartTime).string().null())
                    .col(ColumnDef::new(Absences::EndTime).string().null())
                    .col(ColumnDef::new(Absences::AbsenceType).string().not_null())
                    .col(ColumnDef::new(Absences::Justification).text().null())
                    .col(ColumnDef::new(Absences::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(Absences::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Absences::Table, Absences::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_grades_student_subject")
                    .table(Grades::Table)
                    .col(Grades::StudentId)
                    .col(Grades::SubjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_grades_class_id")
                    .table(Grades::Table)
                    .col(Grades::ClassId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("idx_averages_unique")
                    .table(Averages::Table)
                    .col(Averages::StudentId)
                    .col(Averages::SubjectId)
                    .col(Averages::ClassId)
                    .col(Averages::Period)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("idx_rankings_unique")
                    .table(Rankings::Table)
                    .col(Rankings::StudentId)
                    .col(Rankings::ClassId)
                    .col(Rankings::Period)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_absences_student_date")
                    .table(Absences::Table)
                    .col(Absences::StudentId)
                    .col(Absences::AbsenceDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Absences::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rankings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Averages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GradeHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Grades::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Grades {
    #[sea_orm(iden = "grades")]
    Table,
    Id,
    StudentId,
    SubjectId,
    ClassId,
    GradeType,
    Value,
    Coefficient,
    GradedOn,
    TeacherId,
    Comment,
    IsValidated,
    ValidatedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum GradeHistory {
    #[sea_orm(iden = "grade_history")]
    Table,
    Id,
    GradeId,
    OldValue,
    NewValue,
    ModifiedBy,
    Reason,
    ModifiedAt,
}

#[derive(DeriveIden)]
enum Averages {
    #[sea_orm(iden = "averages")]
    Table,
    Id,
    StudentId,
    SubjectId,
    ClassId,
    Value,
    Period,
    AcademicYearId,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Rankings {
    #[sea_orm(iden = "rankings")]
    Table,
    Id,
    StudentId,
    ClassId,
    Rank,
    GeneralAverage,
    Period,
    AcademicYearId,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Absences {
    #[sea_orm(iden = "absences")]
    Table,
    Id,
    StudentId,
    ClassId,
    SubjectId,
    AbsenceDate,
    StartTime,
    EndTime,
    AbsenceType,
    Justification,
    TeacherId,
    CreatedAt,
}
