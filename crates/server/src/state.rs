use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::auth::repo::{memory::InMemoryAuthRepository, seaorm::SeaOrmAuthRepository};
use service::auth::repository::AuthRepository;
use service::auth::service::AuthConfig as PasswordPolicy;
use service::auth::{AuthProvider, AuthService, JwtAuthProvider};
use service::refueling::repo::{memory::InMemoryRefuelingRepository, seaorm::SeaOrmRefuelingRepository};
use service::refueling::repository::RefuelingRepository;
use service::refueling::RefuelingService;

/// Cookie attributes shared by the session and flash cookies.
#[derive(Clone, Copy, Debug, Default)]
pub struct CookieSettings {
    pub secure: bool,
}

#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<dyn AuthRepository>>,
    pub refuelings: Arc<RefuelingService<dyn RefuelingRepository>>,
    pub provider: Arc<dyn AuthProvider>,
    pub cookies: CookieSettings,
}

impl ServerState {
    pub fn from_repositories(
        auth_repo: Arc<dyn AuthRepository>,
        refueling_repo: Arc<dyn RefuelingRepository>,
        cfg: &configs::AuthConfig,
    ) -> Self {
        let tokens = Arc::new(JwtAuthProvider::new(
            &cfg.jwt_secret,
            chrono::Duration::hours(cfg.session_ttl_hours),
        ));
        let auth: Arc<AuthService<dyn AuthRepository>> =
            Arc::new(AuthService::new(auth_repo, tokens, PasswordPolicy::default()));
        let provider: Arc<dyn AuthProvider> = auth.clone();
        Self {
            auth,
            refuelings: Arc::new(RefuelingService::new(refueling_repo)),
            provider,
            cookies: CookieSettings { secure: cfg.secure_cookies },
        }
    }

    /// Postgres-backed state used by the binary.
    pub fn with_database(db: DatabaseConnection, cfg: &configs::AuthConfig) -> Self {
        Self::from_repositories(
            Arc::new(SeaOrmAuthRepository { db: db.clone() }),
            Arc::new(SeaOrmRefuelingRepository { db }),
            cfg,
        )
    }

    /// Process-local state; nothing survives a restart.
    pub fn in_memory(cfg: &configs::AuthConfig) -> Self {
        Self::from_repositories(
            Arc::new(InMemoryAuthRepository::new()),
            Arc::new(InMemoryRefuelingRepository::new()),
            cfg,
        )
    }
}
