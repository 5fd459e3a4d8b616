use crate::{
    dtos::academic::TermQuery,
    extractors::{Query, Student},
    response::{ApiJson, ApiResult},
    state::AppState,
};
use axum::{Router, extract::State, routing::get};
use database::services::grade::{GradeEntry, GradeService, Transcript};
use models::grade::GradeStatistics;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/nilai", get(list_grades))
        .route("/api/nilai/transkrip", get(transcript))
        .route("/api/nilai/statistik", get(statistics))
}

#[utoipa::path(
    get,
    path = "/api/nilai",
    params(TermQuery),
    responses((status = 200, description = "The caller's grades")),
    security(("jwt" = [])),
    tag = "Nilai"
)]
pub async fn list_grades(
    State(state): State<AppState>,
    Student(student): Student,
    Query(query): Query<TermQuery>,
) -> ApiResult<Vec<GradeEntry>> {
    let grades = GradeService::list_mine(
        &state.db,
        &student,
        query.semester,
        query.academic_year.as_deref(),
    )
    .await?;

    Ok(ApiJson::ok(grades))
}

/// Every grade with credit totals and the cumulative GPA
#[utoipa::path(
    get,
    path = "/api/nilai/transkrip",
    responses((status = 200, description = "Academic transcript")),
    security(("jwt" = [])),
    tag = "Nilai"
)]
pub async fn transcript(
    State(state): State<AppState>,
    Student(student): Student,
) -> ApiResult<Transcript> {
    Ok(ApiJson::ok(GradeService::transcript(&state.db, &student).await?))
}

#[utoipa::path(
    get,
    path = "/api/nilai/statistik",
    responses((status = 200, description = "Grade distribution and averages")),
    security(("jwt" = [])),
    tag = "Nilai"
)]
pub async fn statistics(
    State(state): State<AppState>,
    Student(student): Student,
) -> ApiResult<GradeStatistics> {
    Ok(ApiJson::ok(GradeService::statistics(&state.db, &student).await?))
}
