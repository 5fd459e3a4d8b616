use crate::{
    dtos::classroom::{AttendanceRequest, MeetingQuery},
    extractors::{Json, Lecturer, Path, Query},
    response::{ApiJson, ApiResult},
    state::AppState,
};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use database::services::attendance::{
    AttendanceRecap, AttendanceRecord, AttendanceService, BatchOutcome,
};
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/absensi/input", post(record_attendance))
        .route("/api/absensi/courses/{course_id}", get(course_attendance))
        .route("/api/absensi/courses/{course_id}/rekap", get(attendance_recap))
}

/// Records one meeting for a class. Entries succeed or fail individually;
/// the request fails only when none was recorded.
#[utoipa::path(
    post,
    path = "/api/absensi/input",
    request_body = AttendanceRequest,
    responses(
        (status = 200, description = "Success count and per-student errors"),
        (status = 400, description = "Invalid meeting or date, or no entry was recorded"),
        (status = 403, description = "Caller does not teach the course")
    ),
    security(("jwt" = [])),
    tag = "Absensi"
)]
pub async fn record_attendance(
    State(state): State<AppState>,
    Lecturer(lecturer): Lecturer,
    Json(request): Json<AttendanceRequest>,
) -> ApiResult<BatchOutcome> {
    let outcome = AttendanceService::record(&state.db, &lecturer, request.into()).await?;

    if outcome.all_failed() {
        return Ok(ApiJson::rejected(
            StatusCode::BAD_REQUEST,
            outcome,
            "no attendance entry was recorded".to_string(),
        ));
    }

    Ok(ApiJson::ok(outcome))
}

#[utoipa::path(
    get,
    path = "/api/absensi/courses/{course_id}",
    params(("course_id" = Uuid, Path, description = "Course ID"), MeetingQuery),
    responses(
        (status = 200, description = "Attendance records ordered by meeting"),
        (status = 403, description = "Caller does not teach the course")
    ),
    security(("jwt" = [])),
    tag = "Absensi"
)]
pub async fn course_attendance(
    State(state): State<AppState>,
    Lecturer(lecturer): Lecturer,
    Path(course_id): Path<Uuid>,
    Query(query): Query<MeetingQuery>,
) -> ApiResult<Vec<AttendanceRecord>> {
    let records = AttendanceService::list(&state.db, &lecturer, course_id, query.meeting).await?;
    Ok(ApiJson::ok(records))
}

/// Per-student tally and attendance percentage
#[utoipa::path(
    get,
    path = "/api/absensi/courses/{course_id}/rekap",
    params(("course_id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Attendance recap per enrolled student"),
        (status = 403, description = "Caller does not teach the course")
    ),
    security(("jwt" = [])),
    tag = "Absensi"
)]
pub async fn attendance_recap(
    State(state): State<AppState>,
    Lecturer(lecturer): Lecturer,
    Path(course_id): Path<Uuid>,
) -> ApiResult<Vec<AttendanceRecap>> {
    Ok(ApiJson::ok(
        AttendanceService::recap(&state.db, &lecturer, course_id).await?,
    ))
}
