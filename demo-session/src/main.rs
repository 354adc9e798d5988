use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use token_session::{SessionConfig, SessionOrchestrator, revocation_store_from_env};

mod handlers;

use crate::handlers::{login, me, update};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    format!("{}=debug,token_session=debug", env!("CARGO_CRATE_NAME")).into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SessionConfig::from_env()?;
    let store = revocation_store_from_env(config.store_entry_ttl()).await?;
    let sessions = Arc::new(SessionOrchestrator::new(config, store)?);

    let app = Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/update", post(update))
        .with_state(sessions);

    let addr = SocketAddr::from(([0, 0, 0, 0], 3001));
    tracing::debug!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
