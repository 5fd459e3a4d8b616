use crate::{error::ApiError, state::AppState};
use axum::{
    extract::{FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use database::{
    entities::{department_heads, lecturers, students},
    services::account::{Account, AccountService},
};

/// `axum::Json` with rejections rendered as envelopes
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

/// The account named by the request's bearer token
pub struct AuthUser(pub Account);

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim())
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;
        let claims = state.tokens.verify(token)?;
        let account = AccountService::account(&state.db, claims.sub).await?;

        Ok(Self(account))
    }
}

/// Authenticated student
pub struct Student(pub students::Model);

impl FromRequestParts<AppState> for Student {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(account) = AuthUser::from_request_parts(parts, state).await?;
        Ok(Self(account.profile.student()?.clone()))
    }
}

/// Authenticated lecturer
pub struct Lecturer(pub lecturers::Model);

impl FromRequestParts<AppState> for Lecturer {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(account) = AuthUser::from_request_parts(parts, state).await?;
        Ok(Self(account.profile.lecturer()?.clone()))
    }
}

/// Authenticated department head
pub struct DepartmentHead(pub department_heads::Model);

impl FromRequestParts<AppState> for DepartmentHead {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(account) = AuthUser::from_request_parts(parts, state).await?;
        Ok(Self(account.profile.department_head()?.clone()))
    }
}
