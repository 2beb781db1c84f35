//! Ladle - Main Entry Point
//!
//! Composition root: configuration from the environment, tracing setup,
//! and wiring of the transport, session, and stores. Restores the
//! persisted session and reports its state.

use std::path::PathBuf;
use std::sync::Arc;

use ladle_application::{ApiClient, ListArgs, RecipeStore, SessionStore};
use ladle_domain::ClientConfig;
use ladle_infrastructure::{
    FileSessionRepository, InMemoryScratchStorage, ReqwestTransport, TokioFileSystem,
    default_data_dir,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::var("LADLE_BASE_URL") {
        Ok(base_url) => ClientConfig::for_base_url(&base_url)?,
        Err(_) => ClientConfig::default(),
    };

    let data_dir = std::env::var_os("LADLE_DATA_DIR")
        .map(PathBuf::from)
        .or_else(default_data_dir)
        .ok_or("no data directory available; set LADLE_DATA_DIR")?;

    let session = SessionStore::new(
        Arc::new(FileSessionRepository::new(TokioFileSystem::new(), &data_dir)),
        Arc::new(InMemoryScratchStorage::new()),
    );
    session.load().await?;

    let transport = ReqwestTransport::new(&config)?;
    let client = Arc::new(ApiClient::new(transport, session.clone(), config));
    let recipes = RecipeStore::new(Arc::clone(&client));

    if session.is_authenticated().await {
        tracing::info!(user = ?session.user().await, "session restored");
        recipes.fetch_list(ListArgs::default()).await;
        let state = recipes.state().await;
        if state.error.is_empty() {
            tracing::info!(
                count = state.items.len(),
                total = state.total,
                "fetched recipe list"
            );
        } else {
            tracing::warn!(error = %state.error, "recipe list fetch failed");
        }
    } else {
        tracing::info!("no persisted session; log in to begin");
    }

    Ok(())
}
