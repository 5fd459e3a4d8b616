use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Index names contain the table and column names; the database crate maps
/// unique violations back to conflict messages through them.
fn unique_index<T, C>(name: &str, table: T, columns: impl IntoIterator<Item = C>) -> IndexCreateStatement
where
    T: IntoIden + 'static,
    C: IntoIden,
{
    let mut index = Index::create();
    index.name(name).table(table).unique();
    for column in columns {
        index.col(column);
    }
    index.to_owned()
}

const INDEXES: [&str; 20] = [
    "uq_users_username",
    "uq_users_email",
    "uq_students_user_id",
    "uq_students_nim",
    "uq_lecturers_user_id",
    "uq_lecturers_nidn",
    "uq_lecturers_email",
    "uq_department_heads_user_id",
    "uq_department_heads_nidn",
    "uq_department_heads_email",
    "uq_rectors_user_id",
    "uq_rectors_nidn",
    "uq_rectors_email",
    "uq_courses_code",
    "uq_enrollments_student_course_semester_academic_year",
    "uq_grades_student_course_semester_academic_year",
    "uq_attendances_course_student_meeting",
    "uq_schedules_course_day_start_time_academic_year",
    "uq_materials_course_meeting_title",
    "idx_students_department",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Account identifiers
        manager
            .create_index(unique_index("uq_users_username", Users::Table, [Users::Username]))
            .await?;
        manager
            .create_index(unique_index("uq_users_email", Users::Table, [Users::Email]))
            .await?;

        manager
            .create_index(unique_index("uq_students_user_id", Students::Table, [Students::UserId]))
            .await?;
        manager
            .create_index(unique_index("uq_students_nim", Students::Table, [Students::Nim]))
            .await?;

        for (name, column) in [
            ("uq_lecturers_user_id", Lecturers::UserId),
            ("uq_lecturers_nidn", Lecturers::Nidn),
            ("uq_lecturers_email", Lecturers::Email),
        ] {
            manager
                .create_index(unique_index(name, Lecturers::Table, [column]))
                .await?;
        }

        for (name, column) in [
            ("uq_department_heads_user_id", DepartmentHeads::UserId),
            ("uq_department_heads_nidn", DepartmentHeads::Nidn),
            ("uq_department_heads_email", DepartmentHeads::Email),
        ] {
            manager
                .create_index(unique_index(name, DepartmentHeads::Table, [column]))
                .await?;
        }

        for (name, column) in [
            ("uq_rectors_user_id", Rectors::UserId),
            ("uq_rectors_nidn", Rectors::Nidn),
            ("uq_rectors_email", Rectors::Email),
        ] {
            manager
                .create_index(unique_index(name, Rectors::Table, [column]))
                .await?;
        }

        manager
            .create_index(unique_index("uq_courses_code", Courses::Table, [Courses::Code]))
            .await?;

        // Natural keys of the per-term records; upserts target these
        manager
            .create_index(unique_index(
                "uq_enrollments_student_course_semester_academic_year",
                Enrollments::Table,
                [
                    Enrollments::StudentId,
                    Enrollments::CourseId,
                    Enrollments::Semester,
                    Enrollments::AcademicYear,
                ],
            ))
            .await?;

        manager
            .create_index(unique_index(
                "uq_grades_student_course_semester_academic_year",
                Grades::Table,
                [
                    Grades::StudentId,
                    Grades::CourseId,
                    Grades::Semester,
                    Grades::AcademicYear,
                ],
            ))
            .await?;

        manager
            .create_index(unique_index(
                "uq_attendances_course_student_meeting",
                Attendances::Table,
                [
                    Attendances::CourseId,
                    Attendances::StudentId,
                    Attendances::Meeting,
                ],
            ))
            .await?;

        manager
            .create_index(unique_index(
                "uq_schedules_course_day_start_time_academic_year",
                Schedules::Table,
                [
                    Schedules::CourseId,
                    Schedules::Day,
                    Schedules::StartTime,
                    Schedules::AcademicYear,
                ],
            ))
            .await?;

        manager
            .create_index(unique_index(
                "uq_materials_course_meeting_title",
                Materials::Table,
                [Materials::CourseId, Materials::Meeting, Materials::Title],
            ))
            .await?;

        // Department-scoped listings
        manager
            .create_index(
                Index::create()
                    .name("idx_students_department")
                    .table(Students::Table)
                    .col(Students::Department)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in INDEXES.iter().rev() {
            manager
                .drop_index(Index::drop().name(*name).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Email,
}

#[derive(Iden)]
enum Students {
    Table,
    UserId,
    Nim,
    Department,
}

#[derive(Iden)]
enum Lecturers {
    Table,
    UserId,
    Nidn,
    Email,
}

#[derive(Iden)]
enum DepartmentHeads {
    Table,
    UserId,
    Nidn,
    Email,
}

#[derive(Iden)]
enum Rectors {
    Table,
    UserId,
    Nidn,
    Email,
}

#[derive(Iden)]
enum Courses {
    Table,
    Code,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    StudentId,
    CourseId,
    Semester,
    AcademicYear,
}

#[derive(Iden)]
enum Grades {
    Table,
    StudentId,
    CourseId,
    Semester,
    AcademicYear,
}

#[derive(Iden)]
enum Attendances {
    Table,
    CourseId,
    StudentId,
    Meeting,
}

#[derive(Iden)]
enum Schedules {
    Table,
    CourseId,
    Day,
    StartTime,
    AcademicYear,
}

#[derive(Iden)]
enum Materials {
    Table,
    CourseId,
    Meeting,
    Title,
}
