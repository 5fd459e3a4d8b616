use crate::{
    dtos::{
        PageQuery,
        student::{BindPhoneRequest, StudentUpdateRequest, UnbindPhoneRequest},
    },
    extractors::{AuthUser, Json, Path, Query, Student},
    response::{ApiJson, ApiResult, Message},
    state::AppState,
};
use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use database::{entities::students, services::student::StudentService};
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/mahasiswa", get(list_students))
        .route(
            "/api/mahasiswa/{id}",
            get(get_student).put(update_student).delete(deactivate_student),
        )
        .route("/api/mahasiswa/nim/{nim}", get(get_student_by_nim))
        .route("/api/mahasiswa/bind-phone", post(bind_phone))
        .route("/api/mahasiswa/unbind-phone", post(unbind_phone))
}

/// Paginated list of students
#[utoipa::path(
    get,
    path = "/api/mahasiswa",
    params(PageQuery),
    responses((status = 200, description = "One page of students")),
    security(("jwt" = [])),
    tag = "Mahasiswa"
)]
pub async fn list_students(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<PageQuery>,
) -> ApiResult<Vec<students::Model>> {
    let page = StudentService::list(&state.db, query.into()).await?;
    Ok(ApiJson::page(page))
}

#[utoipa::path(
    get,
    path = "/api/mahasiswa/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student found"),
        (status = 404, description = "Student not found")
    ),
    security(("jwt" = [])),
    tag = "Mahasiswa"
)]
pub async fn get_student(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<students::Model> {
    Ok(ApiJson::ok(StudentService::get(&state.db, id).await?))
}

/// Students may only change their own name and department
#[utoipa::path(
    put,
    path = "/api/mahasiswa/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = StudentUpdateRequest,
    responses(
        (status = 200, description = "Student updated"),
        (status = 403, description = "Not the caller's own record")
    ),
    security(("jwt" = [])),
    tag = "Mahasiswa"
)]
pub async fn update_student(
    State(state): State<AppState>,
    Student(student): Student,
    Path(id): Path<Uuid>,
    Json(request): Json<StudentUpdateRequest>,
) -> ApiResult<students::Model> {
    let updated = StudentService::update_self(&state.db, &student, id, request.into()).await?;
    Ok(ApiJson::ok(updated))
}

/// Deactivates the caller's own account; the record is kept
#[utoipa::path(
    delete,
    path = "/api/mahasiswa/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Account deactivated"),
        (status = 403, description = "Not the caller's own record")
    ),
    security(("jwt" = [])),
    tag = "Mahasiswa"
)]
pub async fn deactivate_student(
    State(state): State<AppState>,
    Student(student): Student,
    Path(id): Path<Uuid>,
) -> ApiResult<Message> {
    StudentService::deactivate_self(&state.db, &student, id).await?;
    Ok(ApiJson::ok(Message::new("account deactivated")))
}

/// Public lookup used by the messaging bot
#[utoipa::path(
    get,
    path = "/api/mahasiswa/nim/{nim}",
    params(("nim" = String, Path, description = "Student registration number")),
    responses(
        (status = 200, description = "Student found"),
        (status = 404, description = "Unknown NIM")
    ),
    tag = "Mahasiswa"
)]
pub async fn get_student_by_nim(
    State(state): State<AppState>,
    Path(nim): Path<String>,
) -> ApiResult<students::Model> {
    Ok(ApiJson::ok(StudentService::by_nim(&state.db, &nim).await?))
}

#[utoipa::path(
    post,
    path = "/api/mahasiswa/bind-phone",
    request_body = BindPhoneRequest,
    responses(
        (status = 200, description = "Phone number bound"),
        (status = 400, description = "Malformed phone number"),
        (status = 409, description = "Number bound to another student")
    ),
    tag = "Mahasiswa"
)]
pub async fn bind_phone(
    State(state): State<AppState>,
    Json(request): Json<BindPhoneRequest>,
) -> ApiResult<students::Model> {
    let student = StudentService::bind_phone(&state.db, &request.nim, &request.phone_number).await?;
    Ok(ApiJson::ok(student))
}

#[utoipa::path(
    post,
    path = "/api/mahasiswa/unbind-phone",
    request_body = UnbindPhoneRequest,
    responses(
        (status = 200, description = "Phone number removed"),
        (status = 404, description = "Unknown NIM")
    ),
    tag = "Mahasiswa"
)]
pub async fn unbind_phone(
    State(state): State<AppState>,
    Json(request): Json<UnbindPhoneRequest>,
) -> ApiResult<students::Model> {
    Ok(ApiJson::ok(StudentService::unbind_phone(&state.db, &request.nim).await?))
}
