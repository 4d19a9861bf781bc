mod config;

use std::sync::Arc;

use tracing::{info, warn};

use civic_api::sessions::InMemorySessionStore;
use civic_api::uploads::PhotoStore;
use civic_api::{AppState, AppStateInner};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "civic_server=debug,civic_api=debug,civic_db=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = civic_db::Database::open(&config.db_path)?;
    if db.seed_authority(&config.authority_email, &config.authority_password)? {
        info!("Created default authority account {}", config.authority_email);
    }

    let photos = PhotoStore::new(config.upload_dir.clone()).await?;

    let state: AppState = Arc::new(AppStateInner {
        db,
        sessions: Arc::new(InMemorySessionStore::new()),
        photos,
        public_dir: config.public_dir.clone(),
    });

    let app = civic_api::router(state);

    let addr = config.addr()?;
    info!("Civic server listening on {}", addr);
    info!("Serving frontend from {}", config.public_dir.display());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
