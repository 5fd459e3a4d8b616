use crate::{
    dtos::academic::{AvailableCoursesQuery, EnrollmentRequest, TermQuery},
    extractors::{Json, Path, Query, Student},
    response::{ApiJson, ApiResult, Message},
    state::AppState,
};
use axum::{
    Router,
    extract::State,
    routing::{delete, get},
};
use database::{
    entities::{courses, enrollments},
    services::enrollment::{EnrollmentEntry, EnrollmentService},
};
use models::academic_year::current_academic_year;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/krs", get(list_krs).post(add_krs))
        .route("/api/krs/{id}", delete(withdraw_krs))
        .route("/api/krs/available-courses", get(available_courses))
}

/// The caller's KRS entries, optionally for one term
#[utoipa::path(
    get,
    path = "/api/krs",
    params(TermQuery),
    responses(
        (status = 200, description = "KRS entries with course details"),
        (status = 403, description = "Caller is not a student")
    ),
    security(("jwt" = [])),
    tag = "KRS"
)]
pub async fn list_krs(
    State(state): State<AppState>,
    Student(student): Student,
    Query(query): Query<TermQuery>,
) -> ApiResult<Vec<EnrollmentEntry>> {
    let entries = EnrollmentService::list_mine(
        &state.db,
        &student,
        query.semester,
        query.academic_year.as_deref(),
    )
    .await?;

    Ok(ApiJson::ok(entries))
}

/// Adds a course to the caller's KRS as a pending entry
#[utoipa::path(
    post,
    path = "/api/krs",
    request_body = EnrollmentRequest,
    responses(
        (status = 201, description = "Entry created, awaiting approval"),
        (status = 400, description = "Invalid semester or academic year"),
        (status = 404, description = "Course not found"),
        (status = 409, description = "Course already in the KRS for this term")
    ),
    security(("jwt" = [])),
    tag = "KRS"
)]
pub async fn add_krs(
    State(state): State<AppState>,
    Student(student): Student,
    Json(request): Json<EnrollmentRequest>,
) -> ApiResult<enrollments::Model> {
    let enrollment = EnrollmentService::add(&state.db, &student, request.into()).await?;
    Ok(ApiJson::created(enrollment))
}

/// Removes an entry that has not been approved
#[utoipa::path(
    delete,
    path = "/api/krs/{id}",
    params(("id" = Uuid, Path, description = "KRS entry ID")),
    responses(
        (status = 200, description = "Entry removed"),
        (status = 403, description = "Entry belongs to another student"),
        (status = 404, description = "Entry not found"),
        (status = 409, description = "Entry already approved")
    ),
    security(("jwt" = [])),
    tag = "KRS"
)]
pub async fn withdraw_krs(
    State(state): State<AppState>,
    Student(student): Student,
    Path(id): Path<Uuid>,
) -> ApiResult<Message> {
    EnrollmentService::withdraw(&state.db, &student, id).await?;
    Ok(ApiJson::ok(Message::new("KRS entry removed")))
}

#[utoipa::path(
    get,
    path = "/api/krs/available-courses",
    params(AvailableCoursesQuery),
    responses((status = 200, description = "Courses the caller can still add")),
    security(("jwt" = [])),
    tag = "KRS"
)]
pub async fn available_courses(
    State(state): State<AppState>,
    Student(student): Student,
    Query(query): Query<AvailableCoursesQuery>,
) -> ApiResult<Vec<courses::Model>> {
    let semester = query.semester.unwrap_or(student.semester);
    let academic_year = query.academic_year.unwrap_or_else(current_academic_year);
    let courses =
        EnrollmentService::available_courses(&state.db, &student, semester, &academic_year).await?;

    Ok(ApiJson::ok(courses))
}
