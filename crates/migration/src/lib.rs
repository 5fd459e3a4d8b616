pub use sea_orm_migration::prelude::*;

mod m20251001_create_account_tables;
mod m20251001_create_academic_tables;
mod m20251002_add_unique_indexes;
mod m20251010_add_student_phone_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251001_create_account_tables::Migration),
            Box::new(m20251001_create_academic_tables::Migration),
            Box::new(m20251002_add_unique_indexes::Migration),
            Box::new(m20251010_add_student_phone_index::Migration),
        ]
    }
}
