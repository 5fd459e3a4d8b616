use crate::{
    dtos::academic::{ApprovalRequest, GradeRequest},
    extractors::{Json, Lecturer, Path},
    response::{ApiJson, ApiResult},
    state::AppState,
};
use axum::{
    Router,
    extract::State,
    routing::{get, post, put},
};
use database::{
    ServiceError,
    entities::{enrollments, grades, students},
    services::{
        course::{CourseService, TaughtCourse},
        enrollment::{Approver, EnrollmentService, PendingEnrollment},
        grade::GradeService,
    },
};
use models::approval::ApprovalAction;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/dosen/courses", get(taught_courses))
        .route("/api/dosen/courses/{course_id}/students", get(class_students))
        .route(
            "/api/dosen/courses/{course_id}/students/{student_id}/nilai",
            post(post_grade),
        )
        .route("/api/dosen/krs/pending", get(pending_krs))
        .route("/api/dosen/krs/{id}/approval", put(approve_krs))
}

/// Courses the caller teaches with student and material counts
#[utoipa::path(
    get,
    path = "/api/dosen/courses",
    responses(
        (status = 200, description = "Taught courses"),
        (status = 403, description = "Caller is not a lecturer")
    ),
    security(("jwt" = [])),
    tag = "Dosen"
)]
pub async fn taught_courses(
    State(state): State<AppState>,
    Lecturer(lecturer): Lecturer,
) -> ApiResult<Vec<TaughtCourse>> {
    Ok(ApiJson::ok(CourseService::taught_by(&state.db, &lecturer).await?))
}

/// Students with an approved KRS entry for the course
#[utoipa::path(
    get,
    path = "/api/dosen/courses/{course_id}/students",
    params(("course_id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Class roster"),
        (status = 403, description = "Caller does not teach the course"),
        (status = 404, description = "Course not found")
    ),
    security(("jwt" = [])),
    tag = "Dosen"
)]
pub async fn class_students(
    State(state): State<AppState>,
    Lecturer(lecturer): Lecturer,
    Path(course_id): Path<Uuid>,
) -> ApiResult<Vec<students::Model>> {
    let students = EnrollmentService::class_students(&state.db, &lecturer, course_id).await?;
    Ok(ApiJson::ok(students))
}

/// Computes and stores a grade, then tells the student
#[utoipa::path(
    post,
    path = "/api/dosen/courses/{course_id}/students/{student_id}/nilai",
    params(
        ("course_id" = Uuid, Path, description = "Course ID"),
        ("student_id" = Uuid, Path, description = "Student ID")
    ),
    request_body = GradeRequest,
    responses(
        (status = 200, description = "Grade stored"),
        (status = 400, description = "Score outside 0 to 100"),
        (status = 403, description = "Caller does not teach the course"),
        (status = 404, description = "Student has no approved KRS entry for the course")
    ),
    security(("jwt" = [])),
    tag = "Dosen"
)]
pub async fn post_grade(
    State(state): State<AppState>,
    Lecturer(lecturer): Lecturer,
    Path((course_id, student_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<GradeRequest>,
) -> ApiResult<grades::Model> {
    let posted =
        GradeService::post(&state.db, &lecturer, course_id, student_id, request.into()).await?;
    state.notifier.grade_posted(&posted);

    Ok(ApiJson::ok(posted.grade))
}

/// Pending KRS entries of the caller's advisees
#[utoipa::path(
    get,
    path = "/api/dosen/krs/pending",
    responses((status = 200, description = "Entries awaiting the caller's decision")),
    security(("jwt" = [])),
    tag = "Dosen"
)]
pub async fn pending_krs(
    State(state): State<AppState>,
    Lecturer(lecturer): Lecturer,
) -> ApiResult<Vec<PendingEnrollment>> {
    Ok(ApiJson::ok(
        EnrollmentService::pending_for_advisor(&state.db, &lecturer).await?,
    ))
}

/// Approves or rejects an advisee's pending KRS entry
#[utoipa::path(
    put,
    path = "/api/dosen/krs/{id}/approval",
    params(("id" = Uuid, Path, description = "KRS entry ID")),
    request_body = ApprovalRequest,
    responses(
        (status = 200, description = "Entry decided"),
        (status = 400, description = "Unknown action or missing rejection reason"),
        (status = 403, description = "Caller is not the student's advisor"),
        (status = 409, description = "Entry already decided")
    ),
    security(("jwt" = [])),
    tag = "Dosen"
)]
pub async fn approve_krs(
    State(state): State<AppState>,
    Lecturer(lecturer): Lecturer,
    Path(id): Path<Uuid>,
    Json(request): Json<ApprovalRequest>,
) -> ApiResult<enrollments::Model> {
    let action: ApprovalAction = request.action.trim().parse().map_err(ServiceError::from)?;
    let decided = EnrollmentService::process_approval(
        &state.db,
        Approver::Advisor(&lecturer),
        id,
        action,
        request.rejection_reason.as_deref(),
    )
    .await?;
    state.notifier.enrollment_decided(&decided);

    Ok(ApiJson::ok(decided.enrollment))
}
