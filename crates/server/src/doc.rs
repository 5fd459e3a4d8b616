use crate::{
    dtos::{
        academic::{ApprovalRequest, EnrollmentRequest, GradeRequest},
        auth::{LoginRequest, RegisterRequest},
        classroom::{AttendanceEntryRequest, AttendanceRequest, MaterialRequest, NewMaterialRequest},
        course::{CourseRequest, CourseUpdateRequest},
        department::{AssignAdvisorRequest, ClassStatusRequest},
        student::{BindPhoneRequest, StudentUpdateRequest, UnbindPhoneRequest},
    },
    response::{Message, Pagination},
    routes::{
        attendance, auth, course, department, grade, health, krs, lecturer, material, root,
        schedule, student,
    },
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        root::root,
        health::health,
        auth::register,
        auth::login,
        auth::profile,
        student::list_students,
        student::get_student,
        student::update_student,
        student::deactivate_student,
        student::get_student_by_nim,
        student::bind_phone,
        student::unbind_phone,
        course::list_courses,
        course::get_course,
        course::create_course,
        course::update_course,
        course::delete_course,
        krs::list_krs,
        krs::add_krs,
        krs::withdraw_krs,
        krs::available_courses,
        grade::list_grades,
        grade::transcript,
        grade::statistics,
        schedule::my_schedule,
        schedule::schedule_by_day,
        schedule::weekly_schedule,
        lecturer::taught_courses,
        lecturer::class_students,
        lecturer::post_grade,
        lecturer::pending_krs,
        lecturer::approve_krs,
        attendance::record_attendance,
        attendance::course_attendance,
        attendance::attendance_recap,
        material::create_material,
        material::course_materials,
        material::update_material,
        material::delete_material,
        department::department_students,
        department::assign_advisor,
        department::department_lecturers,
        department::pending_krs,
        department::validate_krs,
        department::department_courses,
        department::class_status
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        StudentUpdateRequest,
        BindPhoneRequest,
        UnbindPhoneRequest,
        CourseRequest,
        CourseUpdateRequest,
        EnrollmentRequest,
        ApprovalRequest,
        GradeRequest,
        AttendanceRequest,
        AttendanceEntryRequest,
        MaterialRequest,
        NewMaterialRequest,
        ClassStatusRequest,
        AssignAdvisorRequest,
        Message,
        Pagination
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness endpoints"),
        (name = "Authentication", description = "Registration, login and the current account"),
        (name = "Mahasiswa", description = "Student records"),
        (name = "Courses", description = "Course catalog"),
        (name = "KRS", description = "Course enrollment of the current student"),
        (name = "Nilai", description = "Grades and transcript of the current student"),
        (name = "Jadwal", description = "Class schedule of the current student"),
        (name = "Dosen", description = "Lecturer endpoints"),
        (name = "Absensi", description = "Attendance recording"),
        (name = "Materi", description = "Course materials"),
        (name = "Kajur", description = "Department head endpoints"),
    ),
    info(
        title = "SIAku API",
        version = "1.0.0",
        description = "Academic information system API"
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_document_lists_routes_and_bearer_scheme() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/api/krs"));
        assert!(doc.paths.paths.contains_key("/api/kajur/krs/{id}/validation"));
        assert!(
            doc.components
                .as_ref()
                .is_some_and(|components| components.security_schemes.contains_key("jwt"))
        );
    }
}
