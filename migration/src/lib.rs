pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_academic_tables;
mod m20250301_000003_create_grade_tables;
mod m20250301_000004_create_finance_tables;
mod m20250301_000005_create_communication_tables;
mod m20250301_000006_create_library_tables;
mod m20250301_000007_create_system_settings;
mod m20250301_000008_add_active_loan_index;
mod m20250301_000009_create_export_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_academic_tables::Migration),
            Box::new(m20250301_000003_create_grade_tables::Migration),
            Box::new(m20250301_000004_create_finance_tables::Migration),
            Box::new(m20250301_000005_create_communication_tables::Migration),
            Box::new(m20250301_000006_create_library_tables::Migration),
            Box::new(m20250301_000007_create_system_settings::Migration),
            Box::new(m20250301_000008_add_active_loan_index::Migration),
            Box::new(m20250301_000009_create_export_logs::Migration),
        ]
    }
}
