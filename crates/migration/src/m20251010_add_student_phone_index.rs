use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// A phone number reaches one student only. Unbound students keep `NULL`,
/// which never collides.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("uq_students_phone")
                    .table(Students::Table)
                    .col(Students::Phone)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uq_students_phone").to_owned())
            .await
    }
}

#[derive(Iden)]
enum Students {
    Table,
    Phone,
}
