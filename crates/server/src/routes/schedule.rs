use crate::{
    dtos::academic::ScheduleQuery,
    extractors::{Path, Query, Student},
    response::{ApiJson, ApiResult},
    state::AppState,
};
use axum::{Router, extract::State, routing::get};
use database::services::schedule::{DaySchedule, ScheduleEntry, ScheduleService};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/jadwal", get(my_schedule))
        .route("/api/jadwal/hari/{day}", get(schedule_by_day))
        .route("/api/jadwal/minggu-ini", get(weekly_schedule))
}

/// Classes of every course in the caller's KRS that was not rejected
#[utoipa::path(
    get,
    path = "/api/jadwal",
    params(ScheduleQuery),
    responses(
        (status = 200, description = "Schedule entries ordered by day and start time"),
        (status = 400, description = "Unknown day name")
    ),
    security(("jwt" = [])),
    tag = "Jadwal"
)]
pub async fn my_schedule(
    State(state): State<AppState>,
    Student(student): Student,
    Query(query): Query<ScheduleQuery>,
) -> ApiResult<Vec<ScheduleEntry>> {
    Ok(ApiJson::ok(
        ScheduleService::mine(&state.db, &student, query.into()).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/jadwal/hari/{day}",
    params(("day" = String, Path, description = "Indonesian day name, e.g. senin")),
    responses(
        (status = 200, description = "Classes on that day ordered by start time"),
        (status = 400, description = "Unknown day name")
    ),
    security(("jwt" = [])),
    tag = "Jadwal"
)]
pub async fn schedule_by_day(
    State(state): State<AppState>,
    Student(student): Student,
    Path(day): Path<String>,
) -> ApiResult<Vec<ScheduleEntry>> {
    Ok(ApiJson::ok(
        ScheduleService::by_day(&state.db, &student, &day).await?,
    ))
}

/// Classes grouped by day, Monday first; days without classes are omitted
#[utoipa::path(
    get,
    path = "/api/jadwal/minggu-ini",
    responses((status = 200, description = "Weekly schedule")),
    security(("jwt" = [])),
    tag = "Jadwal"
)]
pub async fn weekly_schedule(
    State(state): State<AppState>,
    Student(student): Student,
) -> ApiResult<Vec<DaySchedule>> {
    Ok(ApiJson::ok(ScheduleService::weekly(&state.db, &student).await?))
}
