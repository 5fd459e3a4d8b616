use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create courses table
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Courses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Courses::Code).string_len(10).not_null())
                    .col(ColumnDef::new(Courses::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Courses::Credits).integer().not_null())
                    .col(
                        ColumnDef::new(Courses::Semester)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Courses::Prerequisites).text())
                    .col(ColumnDef::new(Courses::Description).text())
                    .col(ColumnDef::new(Courses::LecturerId).uuid())
                    .col(
                        ColumnDef::new(Courses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Courses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-courses-lecturer_id")
                            .from(Courses::Table, Courses::LecturerId)
                            .to(Lecturers::Table, Lecturers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create enrollments table (KRS)
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enrollments::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Enrollments::CourseId).uuid().not_null())
                    .col(ColumnDef::new(Enrollments::Semester).integer().not_null())
                    .col(
                        ColumnDef::new(Enrollments::AcademicYear)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Enrollments::ApprovalStatus)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Enrollments::ApprovedBy).uuid())
                    .col(ColumnDef::new(Enrollments::ApprovedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Enrollments::RejectionReason).text())
                    .col(
                        ColumnDef::new(Enrollments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-student_id")
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-course_id")
                            .from(Enrollments::Table, Enrollments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-approved_by")
                            .from(Enrollments::Table, Enrollments::ApprovedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create grades table (nilai)
        manager
            .create_table(
                Table::create()
                    .table(Grades::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Grades::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Grades::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Grades::CourseId).uuid().not_null())
                    .col(ColumnDef::new(Grades::Semester).integer().not_null())
                    .col(ColumnDef::new(Grades::AcademicYear).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Grades::TaskScore)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Grades::MidtermScore)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Grades::FinalExamScore)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Grades::FinalScore)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Grades::Letter).string_len(2).not_null())
                    .col(
                        ColumnDef::new(Grades::Point)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Grades::Status)
                            .string_len(20)
                            .not_null()
                            .default("belum_dinilai"),
                    )
                    .col(
                        ColumnDef::new(Grades::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Grades::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-grades-student_id")
                            .from(Grades::Table, Grades::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-grades-course_id")
                            .from(Grades::Table, Grades::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create attendances table (absensi)
        manager
            .create_table(
                Table::create()
                    .table(Attendances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendances::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendances::CourseId).uuid().not_null())
                    .col(ColumnDef::new(Attendances::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Attendances::Meeting).integer().not_null())
                    .col(ColumnDef::new(Attendances::Date).date().not_null())
                    .col(ColumnDef::new(Attendances::Status).string_len(10).not_null())
                    .col(ColumnDef::new(Attendances::Remark).text())
                    .col(
                        ColumnDef::new(Attendances::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Attendances::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-attendances-course_id")
                            .from(Attendances::Table, Attendances::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-attendances-student_id")
                            .from(Attendances::Table, Attendances::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create schedules table (jadwal)
        manager
            .create_table(
                Table::create()
                    .table(Schedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Schedules::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Schedules::CourseId).uuid().not_null())
                    .col(ColumnDef::new(Schedules::Day).string_len(20).not_null())
                    .col(ColumnDef::new(Schedules::StartTime).time().not_null())
                    .col(ColumnDef::new(Schedules::EndTime).time().not_null())
                    .col(ColumnDef::new(Schedules::Room).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Schedules::LecturerName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Schedules::ClassType)
                            .string_len(20)
                            .not_null()
                            .default("kuliah"),
                    )
                    .col(ColumnDef::new(Schedules::Semester).integer().not_null())
                    .col(
                        ColumnDef::new(Schedules::AcademicYear)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Schedules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Schedules::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-schedules-course_id")
                            .from(Schedules::Table, Schedules::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create materials table (materi)
        manager
            .create_table(
                Table::create()
                    .table(Materials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Materials::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Materials::CourseId).uuid().not_null())
                    .col(ColumnDef::new(Materials::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Materials::Description).text())
                    .col(ColumnDef::new(Materials::Meeting).integer().not_null())
                    .col(
                        ColumnDef::new(Materials::MaterialType)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Materials::FilePath).string_len(500))
                    .col(
                        ColumnDef::new(Materials::FileSize)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Materials::Url).string_len(500))
                    .col(
                        ColumnDef::new(Materials::Status)
                            .string_len(20)
                            .not_null()
                            .default("aktif"),
                    )
                    .col(
                        ColumnDef::new(Materials::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Materials::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-materials-course_id")
                            .from(Materials::Table, Materials::CourseId)
                            .to(Courses::Table, Courses::Id)
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
            .drop_table(Table::drop().table(Materials::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Schedules::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Attendances::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Grades::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Lecturers {
    Table,
    Id,
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
}

#[derive(Iden)]
enum Courses {
    Table,
    Id,
    Code,
    Name,
    Credits,
    Semester,
    Prerequisites,
    Description,
    LecturerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    Id,
    StudentId,
    CourseId,
    Semester,
    AcademicYear,
    Status,
    ApprovalStatus,
    ApprovedBy,
    ApprovedAt,
    RejectionReason,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Grades {
    Table,
    Id,
    StudentId,
    CourseId,
    Semester,
    AcademicYear,
    TaskScore,
    MidtermScore,
    FinalExamScore,
    FinalScore,
    Letter,
    Point,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Attendances {
    Table,
    Id,
    CourseId,
    StudentId,
    Meeting,
    Date,
    Status,
    Remark,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Schedules {
    Table,
    Id,
    CourseId,
    Day,
    StartTime,
    EndTime,
    Room,
    LecturerName,
    ClassType,
    Semester,
    AcademicYear,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Materials {
    Table,
    Id,
    CourseId,
    Title,
    Description,
    Meeting,
    MaterialType,
    FilePath,
    FileSize,
    Url,
    Status,
    CreatedAt,
    UpdatedAt,
}
