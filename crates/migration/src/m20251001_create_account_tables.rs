use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table, one row per login account
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Username).string_len(50).not_null())
                    .col(ColumnDef::new(Users::Email).string_len(100).not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Users::Status)
                            .string_len(20)
                            .not_null()
                            .default("aktif"),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create lecturers table (dosen)
        manager
            .create_table(
                Table::create()
                    .table(Lecturers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Lecturers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Lecturers::UserId).uuid().not_null())
                    .col(ColumnDef::new(Lecturers::Nidn).string_len(20).not_null())
                    .col(ColumnDef::new(Lecturers::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Lecturers::Email).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Lecturers::Department)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Lecturers::Phone).string_len(20))
                    .col(
                        ColumnDef::new(Lecturers::Status)
                            .string_len(20)
                            .not_null()
                            .default("aktif"),
                    )
                    .col(
                        ColumnDef::new(Lecturers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Lecturers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lecturers-user_id")
                            .from(Lecturers::Table, Lecturers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create students table (mahasiswa)
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Students::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Students::UserId).uuid().not_null())
                    .col(ColumnDef::new(Students::Nim).string_len(20).not_null())
                    .col(ColumnDef::new(Students::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Students::Department)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Students::Phone).string_len(20))
                    .col(
                        ColumnDef::new(Students::AcademicStatus)
                            .string_len(20)
                            .not_null()
                            .default("aktif"),
                    )
                    .col(
                        ColumnDef::new(Students::Semester)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Students::Gpa)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Students::AdvisorId).uuid())
                    .col(
                        ColumnDef::new(Students::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Students::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-students-user_id")
                            .from(Students::Table, Students::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-students-advisor_id")
                            .from(Students::Table, Students::AdvisorId)
                            .to(Lecturers::Table, Lecturers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create department_heads table (kajur)
        manager
            .create_table(
                Table::create()
                    .table(DepartmentHeads::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DepartmentHeads::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DepartmentHeads::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(DepartmentHeads::Nidn)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepartmentHeads::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepartmentHeads::Email)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepartmentHeads::Department)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepartmentHeads::Status)
                            .string_len(20)
                            .not_null()
                            .default("aktif"),
                    )
                    .col(
                        ColumnDef::new(DepartmentHeads::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepartmentHeads::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-department_heads-user_id")
                            .from(DepartmentHeads::Table, DepartmentHeads::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create rectors table
        manager
            .create_table(
                Table::create()
                    .table(Rectors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Rectors::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Rectors::UserId).uuid().not_null())
                    .col(ColumnDef::new(Rectors::Nidn).string_len(20).not_null())
                    .col(ColumnDef::new(Rectors::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Rectors::Email).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Rectors::Status)
                            .string_len(20)
                            .not_null()
                            .default("aktif"),
                    )
                    .col(
                        ColumnDef::new(Rectors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rectors::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-rectors-user_id")
                            .from(Rectors::Table, Rectors::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(Rectors::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(DepartmentHeads::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Lecturers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Lecturers {
    Table,
    Id,
    UserId,
    Nidn,
    Name,
    Email,
    Department,
    Phone,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
    UserId,
    Nim,
    Name,
    Department,
    Phone,
    AcademicStatus,
    Semester,
    Gpa,
    AdvisorId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum DepartmentHeads {
    Table,
    Id,
    UserId,
    Nidn,
    Name,
    Email,
    Department,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Rectors {
    Table,
    Id,
    UserId,
    Nidn,
    Name,
    Email,
    Status,
    CreatedAt,
    UpdatedAt,
}
