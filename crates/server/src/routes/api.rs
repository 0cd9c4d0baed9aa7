//! Token based JSON API under `/api/v1/auth`.
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::{Extension, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use service::auth::domain::{AuthUser, LoginInput, RegisterInput};
use service::auth::errors::AuthError;
use utoipa::ToSchema;

use crate::errors::JsonApiError;
use crate::session::{self, CurrentUser};
use crate::state::ServerState;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserView {
    pub id: uuid::Uuid,
    pub email: String,
}

impl From<AuthUser> for UserView {
    fn from(u: AuthUser) -> Self {
        Self { id: u.id.as_uuid(), email: u.email }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub data: UserView,
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidateResponse {
    pub success: bool,
    pub data: UserView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SignOutResponse {
    pub success: bool,
}

#[derive(utoipa::ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub password_confirmation: Option<String>,
}

#[derive(utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[utoipa::path(
    post, path = "/api/v1/auth", tag = "api",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered", body = SessionResponse),
        (status = 422, description = "Validation failed or email taken")
    )
)]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<Json<SessionResponse>, JsonApiError> {
    let user = state.auth.register(input).await?;
    let token = state.auth.tokens().issue(&user)?;
    Ok(Json(SessionResponse { data: user.into(), token }))
}

#[utoipa::path(
    post, path = "/api/v1/auth/sign_in", tag = "api",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionResponse),
        (status = 401, description = "Invalid Email or password.")
    )
)]
pub async fn sign_in(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<SessionResponse>), JsonApiError> {
    let session = state.auth.login(input).await?;
    let jar = jar.add(session::session_cookie(session.token.clone(), state.cookies));
    Ok((jar, Json(SessionResponse { data: session.user.into(), token: session.token })))
}

/// Revokes the presented token and drops the session cookie. The token is
/// rejected everywhere afterwards, bearer or cookie.
#[utoipa::path(
    delete, path = "/api/v1/auth/sign_out", tag = "api",
    responses(
        (status = 200, description = "Signed out", body = SignOutResponse),
        (status = 401, description = "No live session"),
        (status = 404, description = "User was not found or was not logged in.")
    )
)]
pub async fn sign_out(
    State(state): State<ServerState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, Json<SignOutResponse>), JsonApiError> {
    let ctx = session::request_context(&headers);
    match state.auth.sign_out(&ctx).await {
        Ok(_) => Ok((session::clear_session(jar), Json(SignOutResponse { success: true }))),
        Err(AuthError::NotFound) => Err(JsonApiError::new(
            StatusCode::NOT_FOUND,
            "User was not found or was not logged in.",
            None,
        )),
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    get, path = "/api/v1/auth/validate_token", tag = "api",
    responses(
        (status = 200, description = "Token is valid", body = ValidateResponse),
        (status = 401, description = "Missing, expired or foreign token")
    )
)]
pub async fn validate_token(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<ValidateResponse>, JsonApiError> {
    let user = match state.auth.find_user(user).await {
        Ok(user) => user,
        Err(AuthError::NotFound) => return Err(JsonApiError::unauthorized("Invalid login credentials")),
        Err(e) => return Err(e.into()),
    };
    Ok(Json(ValidateResponse { success: true, data: user.into() }))
}
