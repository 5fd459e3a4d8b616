use crate::{
    dtos::auth::{LoginRequest, LoginResponse, MIN_PASSWORD_LENGTH, RegisterRequest},
    error::ApiError,
    extractors::{AuthUser, Json},
    response::{ApiJson, ApiResult},
    security::{hash_password, verify_password},
    state::AppState,
};
use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use database::{
    ServiceError,
    services::account::{Account, AccountService},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/profile", get(profile))
}

/// Creates an account together with its role profile
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "Username, email, NIM or NIDN already taken")
    ),
    tag = "Authentication"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(mut request): Json<RegisterRequest>,
) -> ApiResult<Account> {
    if request.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let password = std::mem::take(&mut request.password);
    let password_hash = hash_password(password, state.config.bcrypt_cost).await?;
    let account = AccountService::register(&state.db, request.into_new_account(password_hash)).await?;

    Ok(ApiJson::created(account))
}

/// Exchanges a username, email, NIM or NIDN and a password for a bearer token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued"),
        (status = 401, description = "Invalid credentials or inactive account")
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let identifier = request.identifier.trim();
    if identifier.is_empty() || request.password.is_empty() {
        return Err(ApiError::BadRequest(
            "identifier and password are required".to_string(),
        ));
    }

    let user = AccountService::resolve_login(&state.db, identifier).await?;
    if !verify_password(request.password, user.password_hash.clone()).await? {
        log::info!("Rejected login for {}", user.username);
        return Err(ServiceError::Unauthenticated("invalid credentials".to_string()).into());
    }

    let token = state.tokens.issue(&user)?;
    let profile = AccountService::profile(&state.db, &user).await?;
    log::info!("{} logged in as {}", user.username, user.role);

    Ok(ApiJson::ok(LoginResponse {
        token,
        token_type: "Bearer",
        expires_in: state.tokens.ttl_seconds(),
        user,
        profile,
    }))
}

/// The authenticated account and its role profile
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Current account"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("jwt" = [])),
    tag = "Authentication"
)]
pub async fn profile(AuthUser(account): AuthUser) -> ApiResult<Account> {
    Ok(ApiJson::ok(account))
}
