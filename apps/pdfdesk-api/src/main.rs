//! pdfdesk API server - document transformation backend
//!
//! Provides REST endpoints for:
//! - Page operations: merge, split, compress, rotate, reorder
//! - Overlays: watermark, page numbers
//! - Format conversions: PDF to/from images, Word, Excel
//! - Time-limited artifact downloads

use anyhow::Result;
use pdfdesk_api::{app, error, AppState, Config};
use pdfdesk_store::spawn_sweeper;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

// Sweep period for the expiry safety net behind the deletion scheduler.
const SWEEP_EVERY: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pdfdesk_api=info".parse()?)
                .add_directive("pdfdesk_store=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    let config = Config::from_env();
    error::set_detail_visibility(!config.production);

    info!("Initializing pdfdesk API...");
    let port = config.port;
    let state = Arc::new(AppState::new(config).await?);

    // Catch artifacts whose scheduled deletion was lost to a restart.
    spawn_sweeper(Arc::clone(&state.store), SWEEP_EVERY);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting pdfdesk API on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
