mod memory;
mod sqlite;

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::StoreConfig;

pub use memory::InMemoryResponseStore;
pub use sqlite::SqliteResponseStore;

use super::repository::{ResponseStore, StoreError};

/// Picks the backend once at startup. Callers only ever see the trait object.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn ResponseStore>, StoreError> {
    match config.database_url.as_deref() {
        Some(url) => {
            let store = SqliteResponseStore::connect(url, config.max_connections).await?;
            info!(
                max_connections = config.max_connections,
                "using sqlite response store"
            );
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL not set; responses are kept in memory and lost on restart");
            Ok(Arc::new(InMemoryResponseStore::new()))
        }
    }
}
