//! Per-request authentication.
//!
//! The middleware copies the request's credentials into a [`RequestContext`],
//! asks the configured [`AuthProvider`] who is calling and stores the answer
//! as a [`CurrentUser`] extension for the handlers.

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use service::auth::{RequestContext, UserId};
use tracing::debug;

use crate::errors::JsonApiError;
use crate::flash::{self, Notice};
use crate::state::{CookieSettings, ServerState};

pub const SESSION_COOKIE: &str = "auth_token";
pub const SIGN_IN_PATH: &str = "/users/sign_in";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

pub fn request_context(headers: &HeaderMap) -> RequestContext {
    let authorization = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok());
    let jar = CookieJar::from_headers(headers);
    RequestContext::from_parts(authorization, jar.get(SESSION_COOKIE).map(|c| c.value()))
}

async fn resolve(state: &ServerState, ctx: RequestContext) -> Option<UserId> {
    state.provider.current_user(&ctx).await
}

/// Pages: anonymous visitors are sent to the sign-in form.
pub async fn require_user(State(state): State<ServerState>, mut req: Request, next: Next) -> Response {
    let ctx = request_context(req.headers());
    match resolve(&state, ctx).await {
        Some(user) => {
            req.extensions_mut().insert(CurrentUser(user));
            next.run(req).await
        }
        None => {
            debug!(path = %req.uri().path(), "anonymous page request");
            let jar = CookieJar::from_headers(req.headers());
            flash::found(jar, SIGN_IN_PATH, Notice::SignInRequired, state.cookies)
        }
    }
}

/// JSON API: anonymous callers get a 401.
pub async fn require_api_user(State(state): State<ServerState>, mut req: Request, next: Next) -> Response {
    let ctx = request_context(req.headers());
    match resolve(&state, ctx).await {
        Some(user) => {
            req.extensions_mut().insert(CurrentUser(user));
            next.run(req).await
        }
        None => JsonApiError::unauthorized("You need to sign in or sign up before continuing.").into_response(),
    }
}

pub fn session_cookie(token: String, settings: CookieSettings) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(settings.secure);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

pub fn clear_session(jar: CookieJar) -> CookieJar {
    let mut removal = Cookie::from(SESSION_COOKIE);
    removal.set_path("/");
    jar.remove(removal)
}
