use crate::{
    dtos::{
        PageQuery,
        academic::ApprovalRequest,
        department::{
            AssignAdvisorRequest, ClassStatusRequest, DepartmentLecturerQuery,
            DepartmentStudentQuery, PendingQuery,
        },
    },
    extractors::{DepartmentHead, Json, Path, Query},
    response::{ApiJson, ApiResult},
    state::AppState,
};
use axum::{
    Router,
    extract::State,
    routing::{get, put},
};
use database::{
    ServiceError,
    entities::{enrollments, students},
    services::{
        course::{CourseService, DepartmentCourse},
        enrollment::{Approver, EnrollmentService, PendingEnrollment},
        lecturer::{DepartmentLecturer, LecturerService},
        schedule::{ClassStatus, ScheduleService},
        student::StudentService,
    },
};
use models::approval::ApprovalAction;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/kajur/mahasiswa", get(department_students))
        .route("/api/kajur/mahasiswa/{id}/dosen-wali", put(assign_advisor))
        .route("/api/kajur/dosen", get(department_lecturers))
        .route("/api/kajur/krs/pending", get(pending_krs))
        .route("/api/kajur/krs/{id}/validation", put(validate_krs))
        .route("/api/kajur/mata-kuliah", get(department_courses))
        .route("/api/kajur/mata-kuliah/{course_id}/status", put(class_status))
}

/// Students of the caller's department
#[utoipa::path(
    get,
    path = "/api/kajur/mahasiswa",
    params(DepartmentStudentQuery),
    responses(
        (status = 200, description = "One page of students"),
        (status = 403, description = "Caller is not a department head")
    ),
    security(("jwt" = [])),
    tag = "Kajur"
)]
pub async fn department_students(
    State(state): State<AppState>,
    DepartmentHead(head): DepartmentHead,
    Query(query): Query<DepartmentStudentQuery>,
) -> ApiResult<Vec<students::Model>> {
    let (filter, page) = query.split();
    let students = StudentService::in_department(&state.db, &head, filter, page.into()).await?;

    Ok(ApiJson::page(students))
}

/// Makes a lecturer of the department the student's dosen wali
#[utoipa::path(
    put,
    path = "/api/kajur/mahasiswa/{id}/dosen-wali",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = AssignAdvisorRequest,
    responses(
        (status = 200, description = "Advisor assigned"),
        (status = 403, description = "Student or lecturer outside the caller's department"),
        (status = 404, description = "Student or lecturer not found")
    ),
    security(("jwt" = [])),
    tag = "Kajur"
)]
pub async fn assign_advisor(
    State(state): State<AppState>,
    DepartmentHead(head): DepartmentHead,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignAdvisorRequest>,
) -> ApiResult<students::Model> {
    let student = StudentService::assign_advisor(&state.db, &head, id, request.lecturer_id).await?;
    Ok(ApiJson::ok(student))
}

/// Lecturers of the caller's department with their advisee counts
#[utoipa::path(
    get,
    path = "/api/kajur/dosen",
    params(DepartmentLecturerQuery),
    responses((status = 200, description = "One page of lecturers")),
    security(("jwt" = [])),
    tag = "Kajur"
)]
pub async fn department_lecturers(
    State(state): State<AppState>,
    DepartmentHead(head): DepartmentHead,
    Query(query): Query<DepartmentLecturerQuery>,
) -> ApiResult<Vec<DepartmentLecturer>> {
    let (filter, page) = query.split();
    let lecturers = LecturerService::in_department(&state.db, &head, filter, page.into()).await?;

    Ok(ApiJson::page(lecturers))
}

/// Pending KRS entries of the department's students
#[utoipa::path(
    get,
    path = "/api/kajur/krs/pending",
    params(PendingQuery),
    responses((status = 200, description = "One page of pending entries")),
    security(("jwt" = [])),
    tag = "Kajur"
)]
pub async fn pending_krs(
    State(state): State<AppState>,
    DepartmentHead(head): DepartmentHead,
    Query(query): Query<PendingQuery>,
) -> ApiResult<Vec<PendingEnrollment>> {
    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let pending = EnrollmentService::pending_for_department(
        &state.db,
        &head,
        query.semester,
        query.academic_year.as_deref(),
        page.into(),
    )
    .await?;

    Ok(ApiJson::page(pending))
}

/// Approves or rejects a pending KRS entry of a department student
#[utoipa::path(
    put,
    path = "/api/kajur/krs/{id}/validation",
    params(("id" = Uuid, Path, description = "KRS entry ID")),
    request_body = ApprovalRequest,
    responses(
        (status = 200, description = "Entry decided"),
        (status = 400, description = "Unknown action or missing rejection reason"),
        (status = 403, description = "Student outside the caller's department"),
        (status = 409, description = "Entry already decided")
    ),
    security(("jwt" = [])),
    tag = "Kajur"
)]
pub async fn validate_krs(
    State(state): State<AppState>,
    DepartmentHead(head): DepartmentHead,
    Path(id): Path<Uuid>,
    Json(request): Json<ApprovalRequest>,
) -> ApiResult<enrollments::Model> {
    let action: ApprovalAction = request.action.trim().parse().map_err(ServiceError::from)?;
    let decided = EnrollmentService::process_approval(
        &state.db,
        Approver::DepartmentHead(&head),
        id,
        action,
        request.rejection_reason.as_deref(),
    )
    .await?;
    state.notifier.enrollment_decided(&decided);

    Ok(ApiJson::ok(decided.enrollment))
}

/// Courses taught by the department's lecturers
#[utoipa::path(
    get,
    path = "/api/kajur/mata-kuliah",
    responses((status = 200, description = "Department courses with lecturer names")),
    security(("jwt" = [])),
    tag = "Kajur"
)]
pub async fn department_courses(
    State(state): State<AppState>,
    DepartmentHead(head): DepartmentHead,
) -> ApiResult<Vec<DepartmentCourse>> {
    Ok(ApiJson::ok(CourseService::in_department(&state.db, &head).await?))
}

/// Opens (`buka`) or closes (`tutup`) a class for the current academic year
#[utoipa::path(
    put,
    path = "/api/kajur/mata-kuliah/{course_id}/status",
    params(("course_id" = Uuid, Path, description = "Course ID")),
    request_body = ClassStatusRequest,
    responses(
        (status = 200, description = "Class status and its schedules"),
        (status = 403, description = "Course outside the caller's department"),
        (status = 404, description = "Course not found")
    ),
    security(("jwt" = [])),
    tag = "Kajur"
)]
pub async fn class_status(
    State(state): State<AppState>,
    DepartmentHead(head): DepartmentHead,
    Path(course_id): Path<Uuid>,
    Json(request): Json<ClassStatusRequest>,
) -> ApiResult<ClassStatus> {
    let status =
        ScheduleService::set_class_status(&state.db, &head, course_id, request.action).await?;
    Ok(ApiJson::ok(status))
}
