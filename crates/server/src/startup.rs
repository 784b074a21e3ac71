use std::sync::Arc;

use axum::Router;
use common::env::ensure_env;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, ServerState};
use service::{file::puppy_store::FilePuppyStore, puppies::store::PuppyStore, seed};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Resolve the seed collection and open the file-backed store.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    let seed = seed::resolve_seed(cfg.storage.seed_path.as_deref()).await?;
    let store: Arc<dyn PuppyStore> = FilePuppyStore::new(&cfg.storage.data_path, seed);
    Ok(ServerState { puppy_store: store })
}

pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let state = build_state(cfg).await?;
    Ok(routes::build_router(state, build_cors(), cfg.server.static_dir.as_deref()))
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    ensure_env(cfg.server.static_dir.as_deref(), &cfg.storage.data_path).await?;

    let app = build_app(&cfg).await?;

    let listener = tokio::net::TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, data_path = %cfg.storage.data_path, "starting puppy server");
    axum::serve(listener, app).await?;
    Ok(())
}
