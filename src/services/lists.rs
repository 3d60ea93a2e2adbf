//! Read-only seam to the external list store.

use crate::db::Store;
use crate::domain::ListId;
use crate::models::WatchList;
use thiserror::Error;

/// Supplies a list's identity and ordered show ids. Lists are created and
/// deleted elsewhere.
#[async_trait::async_trait]
pub trait ListStore: Send + Sync {
    async fn get_list(&self, list_id: ListId) -> anyhow::Result<Option<WatchList>>;
}

#[async_trait::async_trait]
impl ListStore for Store {
    async fn get_list(&self, list_id: ListId) -> anyhow::Result<Option<WatchList>> {
        Self::get_list(self, list_id).await
    }
}

/// Errors of the feed and dashboard read paths.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("List {0} not found")]
    ListNotFound(ListId),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for ViewError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<crate::services::SyncError> for ViewError {
    fn from(err: crate::services::SyncError) -> Self {
        match err {
            crate::services::SyncError::Database(msg) => Self::Database(msg),
        }
    }
}
