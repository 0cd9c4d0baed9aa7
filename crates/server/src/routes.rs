pub mod api;
pub mod auth;
pub mod refuelings;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::session;
use crate::state::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn default_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Build the full application router: signed-in pages, account pages, the
/// token API and the public probes.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // Pages that need a signed-in user
    let pages = Router::new()
        .route("/", get(refuelings::index))
        .route("/refuelings", post(refuelings::create))
        .route("/refuelings/new", get(refuelings::new))
        .route(
            "/refuelings/:id",
            put(refuelings::update).patch(refuelings::update).delete(refuelings::destroy),
        )
        .route("/refuelings/:id/edit", get(refuelings::edit))
        .route_layer(middleware::from_fn_with_state(state.clone(), session::require_user));

    let accounts = Router::new()
        .route("/users/sign_in", get(auth::sign_in_form).post(auth::sign_in))
        .route("/users/sign_up", get(auth::sign_up_form))
        .route("/users", post(auth::sign_up))
        .route("/users/sign_out", delete(auth::sign_out));

    let api_public = Router::new()
        .route("/api/v1/auth", post(api::register))
        .route("/api/v1/auth/sign_in", post(api::sign_in));

    let api_private = Router::new()
        .route("/api/v1/auth/validate_token", get(api::validate_token))
        .route("/api/v1/auth/sign_out", delete(api::sign_out))
        .route_layer(middleware::from_fn_with_state(state.clone(), session::require_api_user));

    let probes = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json));

    pages
        .merge(accounts)
        .merge(api_public)
        .merge(api_private)
        .merge(probes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
