use crate::{
    dtos::course::{CourseQuery, CourseRequest, CourseUpdateRequest},
    extractors::{AuthUser, Json, Path, Query},
    response::{ApiJson, ApiResult, Message},
    state::AppState,
};
use axum::{Router, extract::State, routing::get};
use database::{entities::courses, services::course::CourseService};
use models::pagination::PageRequest;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/courses", get(list_courses).post(create_course))
        .route(
            "/api/courses/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
}

/// Get paginated list of courses
#[utoipa::path(
    get,
    path = "/api/courses",
    params(CourseQuery),
    responses(
        (status = 200, description = "List of courses retrieved successfully"),
        (status = 400, description = "Invalid query parameters")
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn list_courses(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<CourseQuery>,
) -> ApiResult<Vec<courses::Model>> {
    let page = PageRequest::new(query.page, query.limit);
    let courses = CourseService::list(&state.db, page, query.search.as_deref()).await?;

    Ok(ApiJson::page(courses))
}

/// Get a specific course by ID
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course found"),
        (status = 404, description = "Course not found")
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn get_course(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<courses::Model> {
    Ok(ApiJson::ok(CourseService::get(&state.db, id).await?))
}

/// Adds a course to the catalog. Department heads and rectors only.
#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CourseRequest,
    responses(
        (status = 201, description = "Course created"),
        (status = 403, description = "Caller may not manage the catalog"),
        (status = 409, description = "Course code already exists")
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn create_course(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
    Json(request): Json<CourseRequest>,
) -> ApiResult<courses::Model> {
    let course = CourseService::create(&state.db, account.user.role, request.into()).await?;
    Ok(ApiJson::created(course))
}

#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = CourseUpdateRequest,
    responses(
        (status = 200, description = "Course updated"),
        (status = 403, description = "Caller may not manage the catalog"),
        (status = 404, description = "Course not found")
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn update_course(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<CourseUpdateRequest>,
) -> ApiResult<courses::Model> {
    let course = CourseService::update(&state.db, account.user.role, id, request.into()).await?;
    Ok(ApiJson::ok(course))
}

#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course deleted"),
        (status = 403, description = "Caller may not manage the catalog"),
        (status = 404, description = "Course not found")
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn delete_course(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Message> {
    CourseService::delete(&state.db, account.user.role, id).await?;
    Ok(ApiJson::ok(Message::new("course deleted")))
}
