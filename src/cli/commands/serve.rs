use std::sync::Arc;

use crate::app::{self, AppState};
use crate::config::config;
use crate::database::{DatabaseManager, MemoryStore, PgStore, Store};
use crate::period::SystemClock;

pub async fn handle(memory: bool) -> anyhow::Result<()> {
    let config = config().clone();
    tracing::info!("Starting Tracklytic API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        tracing::warn!("SECURITY_JWT_SECRET is empty; every protected request will be rejected");
    }

    let store: Arc<dyn Store> = if memory || config.database.in_memory {
        tracing::info!("Using in-memory store; data is lost on shutdown");
        Arc::new(MemoryStore::new())
    } else {
        let pool = DatabaseManager::connect(&config.database).await?;
        Arc::new(PgStore::new(pool))
    };

    app::serve(AppState::new(store, Arc::new(SystemClock), config)).await
}
