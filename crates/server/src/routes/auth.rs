//! Browser sign up, sign in and sign out.
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use service::auth::domain::{LoginInput, RegisterInput};
use service::auth::errors::AuthError;
use tracing::warn;
use utoipa::ToSchema;

use crate::errors::JsonApiError;
use crate::flash::{self, Notice};
use crate::form::{last_value, FormPairs};
use crate::session::{self, SIGN_IN_PATH};
use crate::state::ServerState;

/// Fields may also be sent nested as `user[...]`.
#[derive(Debug, ToSchema)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, ToSchema)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub password_confirmation: Option<String>,
}

impl SignInForm {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            email: last_value(pairs, &["email", "user[email]"]).unwrap_or_default(),
            password: last_value(pairs, &["password", "user[password]"]).unwrap_or_default(),
        }
    }
}

impl SignUpForm {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            email: last_value(pairs, &["email", "user[email]"]).unwrap_or_default(),
            password: last_value(pairs, &["password", "user[password]"]).unwrap_or_default(),
            password_confirmation: last_value(pairs, &["password_confirmation", "user[password_confirmation]"]),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthPage {
    #[schema(value_type = String)]
    pub title: &'static str,
    #[schema(value_type = String)]
    pub action: &'static str,
    #[schema(value_type = Option<String>)]
    pub notice: Option<&'static str>,
    pub errors: Vec<String>,
    pub email: String,
}

fn sign_in_page(notice: Option<&'static str>) -> AuthPage {
    AuthPage { title: "Log in", action: SIGN_IN_PATH, notice, errors: Vec::new(), email: String::new() }
}

fn sign_up_page(email: String, errors: Vec<String>) -> AuthPage {
    AuthPage { title: "Sign up", action: "/users", notice: None, errors, email }
}

#[utoipa::path(get, path = "/users/sign_in", tag = "auth", responses((status = 200, description = "Log in form", body = AuthPage)))]
pub async fn sign_in_form(jar: CookieJar) -> (CookieJar, Json<AuthPage>) {
    let (jar, notice) = flash::take(jar);
    (jar, Json(sign_in_page(notice)))
}

#[utoipa::path(
    post, path = "/users/sign_in", tag = "auth",
    request_body(content = SignInForm, content_type = "application/x-www-form-urlencoded"),
    responses((status = 302, description = "Signed in successfully., or back to the form"))
)]
pub async fn sign_in(
    State(state): State<ServerState>,
    jar: CookieJar,
    Form(pairs): Form<FormPairs>,
) -> Result<Response, JsonApiError> {
    let form = SignInForm::from_pairs(&pairs);
    let input = LoginInput { email: form.email, password: form.password };
    match state.auth.login(input).await {
        Ok(session) => {
            let jar = jar.add(session::session_cookie(session.token, state.cookies));
            Ok(flash::found(jar, "/", Notice::SignedIn, state.cookies))
        }
        Err(AuthError::Unauthorized) => Ok(flash::found(jar, SIGN_IN_PATH, Notice::InvalidCredentials, state.cookies)),
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(get, path = "/users/sign_up", tag = "auth", responses((status = 200, description = "Sign up form", body = AuthPage)))]
pub async fn sign_up_form() -> Json<AuthPage> {
    Json(sign_up_page(String::new(), Vec::new()))
}

#[utoipa::path(
    post, path = "/users", tag = "auth",
    request_body(content = SignUpForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Welcome! You have signed up successfully."),
        (status = 200, description = "Form with errors", body = AuthPage)
    )
)]
pub async fn sign_up(
    State(state): State<ServerState>,
    jar: CookieJar,
    Form(pairs): Form<FormPairs>,
) -> Result<Response, JsonApiError> {
    let form = SignUpForm::from_pairs(&pairs);
    let email = form.email.clone();
    let input = RegisterInput {
        email: form.email,
        password: form.password,
        password_confirmation: form.password_confirmation,
    };
    let user = match state.auth.register(input).await {
        Ok(user) => user,
        Err(e) if e.is_user_facing() => {
            warn!(code = e.code(), "sign_up_rejected");
            return Ok(Json(sign_up_page(email, vec![e.to_string()])).into_response());
        }
        Err(e) => return Err(e.into()),
    };
    let token = state.auth.tokens().issue(&user)?;
    let jar = jar.add(session::session_cookie(token, state.cookies));
    Ok(flash::found(jar, "/", Notice::SignedUp, state.cookies))
}

#[utoipa::path(delete, path = "/users/sign_out", tag = "auth", responses((status = 302, description = "Signed out successfully.")))]
pub async fn sign_out(State(state): State<ServerState>, headers: HeaderMap, jar: CookieJar) -> Response {
    match state.auth.sign_out(&session::request_context(&headers)).await {
        Ok(_) | Err(AuthError::NotFound) => {}
        Err(e) => warn!(err = %e, "sign_out_revocation_failed"),
    }
    let jar = session::clear_session(jar);
    flash::found(jar, SIGN_IN_PATH, Notice::SignedOut, state.cookies)
}
