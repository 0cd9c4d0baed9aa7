use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Form, Json};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use service::auth::errors::AuthError;
use service::refueling::{Refueling, RefuelingError, RefuelingId, RefuelingParams};
use tracing::warn;
use utoipa::ToSchema;

use crate::errors::JsonApiError;
use crate::flash::{self, Notice};
use crate::form::{last_value, FormPairs};
use crate::session::{self, CurrentUser};
use crate::state::ServerState;

#[derive(Debug, Serialize, ToSchema)]
pub struct RefuelingView {
    pub id: RefuelingId,
    #[schema(value_type = String)]
    pub liters: Decimal,
    #[schema(value_type = String)]
    pub kilometers: Decimal,
    #[schema(value_type = String)]
    pub cost: Decimal,
    pub created_at: DateTime<Utc>,
    pub edit_path: String,
}

impl From<Refueling> for RefuelingView {
    fn from(r: Refueling) -> Self {
        Self {
            id: r.id,
            liters: r.liters,
            kilometers: r.kilometers,
            cost: r.cost,
            created_at: r.created_at,
            edit_path: format!("/refuelings/{}/edit", r.id),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Link {
    #[schema(value_type = String)]
    pub label: &'static str,
    #[schema(value_type = String)]
    pub href: &'static str,
    #[schema(value_type = String)]
    pub method: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IndexPage {
    #[schema(value_type = Option<String>)]
    pub notice: Option<&'static str>,
    pub current_user: String,
    pub refuelings: Vec<RefuelingView>,
    pub links: Vec<Link>,
}

/// Form rendering payload; `errors` is empty on a fresh form.
#[derive(Debug, Serialize, ToSchema)]
pub struct FormPage {
    #[schema(value_type = String)]
    pub title: &'static str,
    pub action: String,
    #[schema(value_type = String)]
    pub method: &'static str,
    #[schema(value_type = Option<String>)]
    pub notice: Option<&'static str>,
    pub errors: Vec<String>,
    pub refueling: RefuelingForm,
}

/// Submitted refueling fields; the nested `refueling[...]` names are accepted too.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct RefuelingForm {
    pub liters: Option<String>,
    pub kilometers: Option<String>,
    pub cost: Option<String>,
}

impl RefuelingForm {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            liters: last_value(pairs, &["liters", "refueling[liters]"]),
            kilometers: last_value(pairs, &["kilometers", "refueling[kilometers]"]),
            cost: last_value(pairs, &["cost", "refueling[cost]"]),
        }
    }
}

impl From<RefuelingForm> for RefuelingParams {
    fn from(f: RefuelingForm) -> Self {
        Self { liters: f.liters, kilometers: f.kilometers, cost: f.cost }
    }
}

impl From<RefuelingParams> for RefuelingForm {
    fn from(p: RefuelingParams) -> Self {
        Self { liters: p.liters, kilometers: p.kilometers, cost: p.cost }
    }
}

const NEW_TITLE: &str = "New refueling";
const EDIT_TITLE: &str = "Editing refueling";

fn new_form(params: RefuelingParams, errors: Vec<String>, notice: Option<&'static str>) -> FormPage {
    FormPage {
        title: NEW_TITLE,
        action: "/refuelings".into(),
        method: "post",
        notice,
        errors,
        refueling: params.into(),
    }
}

fn edit_form(id: RefuelingId, params: RefuelingParams, errors: Vec<String>) -> FormPage {
    FormPage {
        title: EDIT_TITLE,
        action: format!("/refuelings/{id}"),
        method: "put",
        notice: None,
        errors,
        refueling: params.into(),
    }
}

fn not_found(state: &ServerState, jar: CookieJar) -> Response {
    flash::found(jar, "/", Notice::NotFound, state.cookies)
}

/// Ids that do not parse are treated like any other unknown record.
fn parse_id(raw: &str) -> Option<RefuelingId> {
    raw.parse().ok()
}

#[utoipa::path(
    get, path = "/", tag = "refuelings",
    responses(
        (status = 200, description = "Refuelings of the current user, newest first", body = IndexPage),
        (status = 302, description = "Not signed in")
    )
)]
pub async fn index(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<Response, JsonApiError> {
    let account = match state.auth.find_user(user).await {
        Ok(account) => account,
        Err(AuthError::NotFound) => {
            warn!(user_id = %user, "session for unknown user");
            let jar = session::clear_session(jar);
            return Ok(flash::found(jar, session::SIGN_IN_PATH, Notice::SignInRequired, state.cookies));
        }
        Err(e) => return Err(e.into()),
    };
    let refuelings = state.refuelings.list(user).await?;
    let (jar, notice) = flash::take(jar);
    let page = IndexPage {
        notice,
        current_user: account.email,
        refuelings: refuelings.into_iter().map(RefuelingView::from).collect(),
        links: vec![
            Link { label: "New refueling", href: "/refuelings/new", method: "get" },
            Link { label: "Log out", href: "/users/sign_out", method: "delete" },
        ],
    };
    Ok((jar, Json(page)).into_response())
}

#[utoipa::path(
    get, path = "/refuelings/new", tag = "refuelings",
    responses((status = 200, description = "Empty form", body = FormPage))
)]
pub async fn new(jar: CookieJar) -> (CookieJar, Json<FormPage>) {
    let (jar, notice) = flash::take(jar);
    (jar, Json(new_form(RefuelingParams::default(), Vec::new(), notice)))
}

#[utoipa::path(
    get, path = "/refuelings/{id}/edit", tag = "refuelings",
    params(("id" = i64, Path, description = "Refueling id")),
    responses(
        (status = 200, description = "Form with stored values", body = FormPage),
        (status = 302, description = "Resource not found!")
    )
)]
pub async fn edit(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<Response, JsonApiError> {
    let Some(id) = parse_id(&id) else {
        return Ok(not_found(&state, jar));
    };
    match state.refuelings.get(user, id).await {
        Ok(record) => Ok(Json(edit_form(id, RefuelingParams::from(&record), Vec::new())).into_response()),
        Err(RefuelingError::NotFound) => Ok(not_found(&state, jar)),
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    post, path = "/refuelings", tag = "refuelings",
    request_body(content = RefuelingForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Refueling was created"),
        (status = 200, description = "Form with validation errors", body = FormPage)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    jar: CookieJar,
    Form(pairs): Form<FormPairs>,
) -> Result<Response, JsonApiError> {
    let params = RefuelingParams::from(RefuelingForm::from_pairs(&pairs));
    match state.refuelings.create(user, &params).await {
        Ok(_) => Ok(flash::found(jar, "/", Notice::RefuelingCreated, state.cookies)),
        Err(RefuelingError::Invalid(errors)) => {
            Ok(Json(new_form(params, errors.full_messages(), None)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    put, path = "/refuelings/{id}", tag = "refuelings",
    params(("id" = i64, Path, description = "Refueling id")),
    request_body(content = RefuelingForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Refueling was updated, or Resource not found!"),
        (status = 200, description = "Form with validation errors", body = FormPage)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    jar: CookieJar,
    Path(id): Path<String>,
    Form(pairs): Form<FormPairs>,
) -> Result<Response, JsonApiError> {
    let Some(id) = parse_id(&id) else {
        return Ok(not_found(&state, jar));
    };
    let params = RefuelingParams::from(RefuelingForm::from_pairs(&pairs));
    match state.refuelings.update(user, id, &params).await {
        Ok(_) => Ok(flash::found(jar, "/", Notice::RefuelingUpdated, state.cookies)),
        Err(RefuelingError::Invalid(errors)) => {
            Ok(Json(edit_form(id, params, errors.full_messages())).into_response())
        }
        Err(RefuelingError::NotFound) => Ok(not_found(&state, jar)),
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    delete, path = "/refuelings/{id}", tag = "refuelings",
    params(("id" = i64, Path, description = "Refueling id")),
    responses((status = 302, description = "Refueling was deleted, or Resource not found!"))
)]
pub async fn destroy(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<Response, JsonApiError> {
    let Some(id) = parse_id(&id) else {
        return Ok(not_found(&state, jar));
    };
    match state.refuelings.destroy(user, id).await {
        Ok(()) => Ok(flash::found(jar, "/", Notice::RefuelingDeleted, state.cookies)),
        Err(RefuelingError::NotFound) => Ok(not_found(&state, jar)),
        Err(e) => Err(e.into()),
    }
}
