use axum::Router;
use common::utils::logging::{init_logging, LogFormat};
use configs::AppConfig;
use migration::MigratorTrait;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

/// Configured log format; unknown names fall back to compact output.
pub fn log_format(cfg: &AppConfig) -> LogFormat {
    cfg.logging.format.parse::<LogFormat>().unwrap_or_else(|e| {
        eprintln!("{e}; falling back to compact logs");
        LogFormat::Compact
    })
}

/// Install the global tracing subscriber. Call once, before the runtime starts.
pub fn init_tracing(cfg: &AppConfig) {
    init_logging(log_format(cfg));
}

/// Connect, migrate and assemble the router for a loaded configuration.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.auto_migrate {
        migration::Migrator::up(&db, None)
            .await
            .map_err(|e| StartupError::Migration(e.to_string()))?;
        info!("migrations applied");
    }
    if cfg.auth.uses_dev_secret() {
        warn!("auth.jwt_secret not set; using the development secret");
    }
    let state = ServerState::with_database(db, &cfg.auth);
    Ok(routes::build_router(state, routes::default_cors()))
}

/// Build the app for an already loaded configuration and serve it.
/// Logging must be initialized by the caller.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "fuel log listening");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_format(format: &str) -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.logging.format = format.into();
        cfg
    }

    #[test]
    fn log_format_follows_config() {
        assert_eq!(log_format(&with_format("json")), LogFormat::Json);
        assert_eq!(log_format(&with_format("Compact")), LogFormat::Compact);
    }

    #[test]
    fn unknown_log_format_falls_back_to_compact() {
        assert_eq!(log_format(&with_format("xml")), LogFormat::Compact);
    }
}
