//! AI Update Feed, binary entrypoint.
//! Boots the Axum HTTP server: rules load, pipeline handle, routes, metrics.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ai_update_feed::api::{self, AppState};
use ai_update_feed::feed::types::{ItemSource, StaticSource};
use ai_update_feed::metrics::Metrics;
use ai_update_feed::pipeline::{start_hot_reload_thread, Pipeline, PipelineHandle};
use ai_update_feed::rules::{rules_config_path, RulesRoot};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    // Rule tables compile eagerly: a malformed pattern fails the boot, not a
    // request.
    let rules = RulesRoot::load()?;
    let max_items = rules.feed.max_items;
    let pipeline = Pipeline::from_rules(&rules)?;
    let handle = PipelineHandle::new(pipeline);

    // If hot reload is enabled, spawn the background watcher.
    start_hot_reload_thread(handle.clone(), rules_config_path());

    // The fetch collaborator is external; by default serve a pre-fetched
    // batch from disk when FEED_ITEMS_PATH is set, else an empty feed.
    let mut sources: Vec<Box<dyn ItemSource>> = Vec::new();
    if let Ok(path) = std::env::var("FEED_ITEMS_PATH") {
        sources.push(Box::new(StaticSource::from_json_file(path.as_ref())?));
    }

    let metrics = Metrics::init(max_items as u64);
    let state = AppState {
        pipeline: handle,
        sources: Arc::new(sources),
    };
    let router = api::create_router(state).merge(metrics.router());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "ai-update-feed listening");
    axum::serve(listener, router).await?;
    Ok(())
}
