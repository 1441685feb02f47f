//! Zaitun - Main Entry Point

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use zaitun_backend::{
    api::{self, AppState},
    config::Config,
    db,
    error::Result,
    storage, telemetry,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    telemetry::init_tracing(&config.log_level);
    tracing::info!(?config, "Starting Zaitun backend");

    let db_pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Connected to database");

    db::migrate(&db_pool).await?;
    tracing::info!("Database migrations complete");

    let store = storage::build_store(&config).await?;

    let addr: SocketAddr = config.bind_address.parse()?;
    let state = Arc::new(AppState::new(config, db_pool, store));

    let app = Router::new()
        .merge(api::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT]),
        )
        .layer(TraceLayer::new_for_http());

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
