use std::{net::SocketAddr, path::Path, sync::Arc};

use axum::Router;
use configs::AppConfig;
use migration::{Migrator, MigratorTrait};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, auth::ServerState};
use service::auth::IdentityResolver;
use service::items::repo::seaorm::SeaOrmItemStore;
use service::items::service::CrudPolicy;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load `config.toml` (or `CONFIG_PATH`); without a file, fall back to environment variables.
/// A file that exists but fails to parse or validate is an error.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if Path::new(&path).exists() {
        AppConfig::load_and_validate()
    } else {
        warn!(%path, "config file not found, using environment");
        AppConfig::from_env_and_validate()
    }
}

/// Build shared state from config and an already-connected store.
pub fn build_state(cfg: &AppConfig, store: Arc<dyn service::items::ItemStore>) -> Result<ServerState, StartupError> {
    let identity = IdentityResolver::from_config(&cfg.auth).map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    Ok(ServerState { store, identity: Arc::new(identity), policy: CrudPolicy::from(&cfg.items) })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl_c");
        return;
    }
    info!("shutdown signal received");
}

/// Connect, migrate if configured, then serve until Ctrl+C.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.auto_migrate {
        Migrator::up(&db, None).await?;
        info!("migrations applied");
    }

    let state = build_state(&cfg, Arc::new(SeaOrmItemStore { db }))?;
    let app: Router = routes::build_router(state, build_cors());

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))?;
    info!(%addr, disclosure = ?cfg.items.disclosure, "starting item service");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}
