//! Airline booking API server

use airline_api::{
    auth::{PasswordHasher, TokenService},
    build_router,
    db::Database,
    AppState, Config,
};
use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so clap's env fallbacks see it
    let _ = dotenv();
    init_tracing();

    let config = Config::parse();
    config.validate()?;

    info!("Airline API starting");

    let db = Database::open(&config.database_path)
        .with_context(|| format!("Failed to open database at {}", config.database_path))?;
    let tokens = TokenService::new(&config.jwt_secret, config.access_token_ttl());
    let hasher = PasswordHasher::with_cost(config.bcrypt_cost);

    let state = AppState::new(db, tokens, hasher)
        .await
        .context("Failed to initialize stores")?;

    if let Some((email, password)) = config.bootstrap_admin() {
        if state.seed_bootstrap_admin(email, password).await? {
            warn!("Bootstrap admin seeded, rotate its password after first login");
        }
    }

    info!(
        db_path = %config.database_path,
        token_ttl_minutes = config.access_token_ttl_minutes,
        "Authentication initialized"
    );

    let app = build_router(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("API server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Initialize tracing with env-driven filtering
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "airline_api=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
