//! One-shot notices carried across a redirect.
//!
//! The redirect sets a `flash` cookie holding a [`Notice`] key; the next page
//! that renders reads it and removes the cookie.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::state::CookieSettings;

pub const FLASH_COOKIE: &str = "flash";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    RefuelingCreated,
    RefuelingUpdated,
    RefuelingDeleted,
    NotFound,
    SignInRequired,
    SignedIn,
    SignedOut,
    SignedUp,
    InvalidCredentials,
}

const ALL: [Notice; 9] = [
    Notice::RefuelingCreated,
    Notice::RefuelingUpdated,
    Notice::RefuelingDeleted,
    Notice::NotFound,
    Notice::SignInRequired,
    Notice::SignedIn,
    Notice::SignedOut,
    Notice::SignedUp,
    Notice::InvalidCredentials,
];

impl Notice {
    pub fn key(self) -> &'static str {
        match self {
            Notice::RefuelingCreated => "refueling_created",
            Notice::RefuelingUpdated => "refueling_updated",
            Notice::RefuelingDeleted => "refueling_deleted",
            Notice::NotFound => "not_found",
            Notice::SignInRequired => "sign_in_required",
            Notice::SignedIn => "signed_in",
            Notice::SignedOut => "signed_out",
            Notice::SignedUp => "signed_up",
            Notice::InvalidCredentials => "invalid_credentials",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::RefuelingCreated => "Refueling was created",
            Notice::RefuelingUpdated => "Refueling was updated",
            Notice::RefuelingDeleted => "Refueling was deleted",
            Notice::NotFound => "Resource not found!",
            Notice::SignInRequired => "You need to sign in or sign up before continuing.",
            Notice::SignedIn => "Signed in successfully.",
            Notice::SignedOut => "Signed out successfully.",
            Notice::SignedUp => "Welcome! You have signed up successfully.",
            Notice::InvalidCredentials => "Invalid Email or password.",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        ALL.into_iter().find(|n| n.key() == key)
    }
}

/// 302 to `location` with a notice for the next page.
pub fn found(jar: CookieJar, location: &str, notice: Notice, settings: CookieSettings) -> Response {
    let mut cookie = Cookie::new(FLASH_COOKIE, notice.key());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(settings.secure);
    cookie.set_same_site(SameSite::Lax);
    redirect(jar.add(cookie), location)
}

/// Plain 302; axum's `Redirect::to` answers 303.
pub fn redirect(jar: CookieJar, location: &str) -> Response {
    (StatusCode::FOUND, jar, [(header::LOCATION, location.to_string())]).into_response()
}

/// Consume the pending notice, if any. Unknown keys are dropped silently.
pub fn take(jar: CookieJar) -> (CookieJar, Option<&'static str>) {
    let Some(key) = jar.get(FLASH_COOKIE).map(|c| c.value().to_string()) else {
        return (jar, None);
    };
    let mut removal = Cookie::from(FLASH_COOKIE);
    removal.set_path("/");
    (jar.remove(removal), Notice::from_key(&key).map(Notice::message))
}
