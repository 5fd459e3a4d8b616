use crate::{
    dtos::classroom::{MaterialRequest, MeetingQuery, NewMaterialRequest},
    extractors::{Json, Lecturer, Path, Query},
    response::{ApiJson, ApiResult, Message},
    state::AppState,
};
use axum::{
    Router,
    extract::State,
    routing::{get, post, put},
};
use database::services::material::{CourseMaterials, MaterialEntry, MaterialService};
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/materi", post(create_material))
        .route("/api/materi/courses/{course_id}", get(course_materials))
        .route("/api/materi/{id}", put(update_material).delete(delete_material))
}

#[utoipa::path(
    post,
    path = "/api/materi",
    request_body = NewMaterialRequest,
    responses(
        (status = 201, description = "Material created"),
        (status = 403, description = "Caller does not teach the course"),
        (status = 409, description = "Title already used for this meeting")
    ),
    security(("jwt" = [])),
    tag = "Materi"
)]
pub async fn create_material(
    State(state): State<AppState>,
    Lecturer(lecturer): Lecturer,
    Json(request): Json<NewMaterialRequest>,
) -> ApiResult<MaterialEntry> {
    let material =
        MaterialService::create(&state.db, &lecturer, request.course_id, request.material.into())
            .await?;

    Ok(ApiJson::created(material))
}

/// Active materials of a course, ordered by meeting
#[utoipa::path(
    get,
    path = "/api/materi/courses/{course_id}",
    params(("course_id" = Uuid, Path, description = "Course ID"), MeetingQuery),
    responses(
        (status = 200, description = "Course materials"),
        (status = 403, description = "Caller does not teach the course")
    ),
    security(("jwt" = [])),
    tag = "Materi"
)]
pub async fn course_materials(
    State(state): State<AppState>,
    Lecturer(lecturer): Lecturer,
    Path(course_id): Path<Uuid>,
    Query(query): Query<MeetingQuery>,
) -> ApiResult<CourseMaterials> {
    let materials =
        MaterialService::list_by_course(&state.db, &lecturer, course_id, query.meeting).await?;
    Ok(ApiJson::ok(materials))
}

#[utoipa::path(
    put,
    path = "/api/materi/{id}",
    params(("id" = Uuid, Path, description = "Material ID")),
    request_body = MaterialRequest,
    responses(
        (status = 200, description = "Material updated"),
        (status = 403, description = "Caller does not teach the course"),
        (status = 404, description = "Material not found or deleted")
    ),
    security(("jwt" = [])),
    tag = "Materi"
)]
pub async fn update_material(
    State(state): State<AppState>,
    Lecturer(lecturer): Lecturer,
    Path(id): Path<Uuid>,
    Json(request): Json<MaterialRequest>,
) -> ApiResult<MaterialEntry> {
    let material = MaterialService::update(&state.db, &lecturer, id, request.into()).await?;
    Ok(ApiJson::ok(material))
}

/// Hides a material; the row is kept as inactive
#[utoipa::path(
    delete,
    path = "/api/materi/{id}",
    params(("id" = Uuid, Path, description = "Material ID")),
    responses(
        (status = 200, description = "Material deleted"),
        (status = 403, description = "Caller does not teach the course"),
        (status = 404, description = "Material not found or already deleted")
    ),
    security(("jwt" = [])),
    tag = "Materi"
)]
pub async fn delete_material(
    State(state): State<AppState>,
    Lecturer(lecturer): Lecturer,
    Path(id): Path<Uuid>,
) -> ApiResult<Message> {
    MaterialService::delete(&state.db, &lecturer, id).await?;
    Ok(ApiJson::ok(Message::new("material deleted")))
}
