use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::AuthConfig;
use service::auth::AuthService;

use crate::errors::StartupError;
use crate::routes::{self, auth};

fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr() -> Result<SocketAddr, StartupError> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8081);
            (host, port)
        }
    };
    format!("{}:{}", host, port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {}", e)))
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let app_cfg = configs::load_default().unwrap_or_default();

    // DB connection; config pool settings when present
    let db = if app_cfg.database.url.trim().is_empty() {
        models::db::connect().await?
    } else {
        models::db::connect_with_config(&app_cfg.database).await?
    };

    // JWT secret: config first, then env, then a dev fallback
    let mut auth_cfg = app_cfg.auth.clone();
    auth_cfg.normalize_from_env();
    let jwt_secret = if auth_cfg.jwt_secret.trim().is_empty() {
        "dev-secret-change-me".to_string()
    } else {
        auth_cfg.jwt_secret.clone()
    };

    let svc = AuthService::new(
        Arc::new(SeaOrmAuthRepository { db: db.clone() }),
        AuthConfig {
            jwt_secret: Some(jwt_secret),
            password_algorithm: "argon2".into(),
            token_ttl_hours: auth_cfg.token_ttl_hours,
        },
    );
    let state = auth::ServerState {
        db,
        auth: Arc::new(svc),
        remember_days: auth_cfg.remember_days,
    };

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(cors, state);

    // Bind and serve
    let addr = load_bind_addr()?;
    info!(%addr, "starting server crate");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
