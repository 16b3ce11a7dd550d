mod config;
mod db;
mod errors;
mod export;
mod models;
mod render;
mod resumes;
mod routes;
mod state;
mod store;
mod templates;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::export::chromium::ChromiumEngine;
use crate::export::engine::{PdfOptions, RenderEngine};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::memory::MemoryStore;
use crate::store::postgres::PgStore;
use crate::store::{ResumeStore, TemplateStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let crate_target = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{}={}", crate_target, &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResumeForge API v{}", env!("CARGO_PKG_VERSION"));

    // Pick the store backend: PostgreSQL when configured, in-memory otherwise.
    let (resumes, templates): (Arc<dyn ResumeStore>, Arc<dyn TemplateStore>) =
        match &config.database_url {
            Some(url) => {
                let pool = create_pool(url).await?;
                let store = Arc::new(PgStore::new(pool));
                info!("Store backend: PostgreSQL");
                (
                    store.clone() as Arc<dyn ResumeStore>,
                    store as Arc<dyn TemplateStore>,
                )
            }
            None => {
                let store = Arc::new(MemoryStore::new());
                info!("Store backend: in-memory (DATABASE_URL not set)");
                (
                    store.clone() as Arc<dyn ResumeStore>,
                    store as Arc<dyn TemplateStore>,
                )
            }
        };

    // Export engine: one Chromium instance per export call, A4 with 0.5in margins.
    let pdf_options = PdfOptions {
        load_timeout: Duration::from_secs(config.export_load_timeout_secs),
        ..Default::default()
    };
    let engine: Arc<dyn RenderEngine> = Arc::new(ChromiumEngine::new(
        pdf_options,
        config.chrome_path.clone().map(Into::into),
    ));
    info!(
        "Export engine initialized (load timeout {}s)",
        config.export_load_timeout_secs
    );

    let state = AppState {
        resumes,
        templates,
        engine,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
