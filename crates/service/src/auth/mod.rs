//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login and session token handling live here; the web layer
//! only sees [`AuthProvider`] and [`AuthService`].

pub mod domain;
pub mod errors;
pub mod provider;
pub mod repo;
pub mod repository;
pub mod service;

pub use domain::UserId;
pub use provider::{AuthProvider, JwtAuthProvider, RequestContext, SessionClaims};
pub use service::AuthService;
