//! Cached show summaries and the staleness rule that decides when they are
//! refreshed from the catalog.

use crate::clients::{CatalogClient, CatalogError};
use crate::db::Store;
use crate::domain::{CachePolicy, ShowId};
use crate::models::Show;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ShowCacheError {
    /// The catalog could not be reached. `cached` holds the existing row, if
    /// any, which remains valid to serve.
    #[error("Catalog unavailable for show {show_id}: {source}")]
    UpstreamUnavailable {
        show_id: ShowId,
        cached: Option<Box<Show>>,
        source: CatalogError,
    },

    #[error("Database error: {0}")]
    Database(String),
}

impl ShowCacheError {
    /// Stale-but-present row to fall back on.
    #[must_use]
    pub fn cached(&self) -> Option<&Show> {
        match self {
            Self::UpstreamUnavailable { cached, .. } => cached.as_deref(),
            Self::Database(_) => None,
        }
    }
}

impl From<anyhow::Error> for ShowCacheError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// How `ensure_fresh` obtained the returned row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// First reference to this show; the row was just created.
    Created,
    /// The row was stale and has been refreshed from the catalog.
    Refreshed,
    /// The row was within the freshness window; no upstream call was made.
    Cached,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreshShow {
    pub show: Show,
    pub freshness: Freshness,
}

impl FreshShow {
    /// Episodes must be re-fetched when the show row was created or refreshed.
    #[must_use]
    pub const fn needs_episode_sync(&self) -> bool {
        matches!(self.freshness, Freshness::Created | Freshness::Refreshed)
    }
}

pub struct ShowCache {
    store: Store,
    catalog: Arc<dyn CatalogClient>,
    policy: CachePolicy,
}

impl ShowCache {
    #[must_use]
    pub fn new(store: Store, catalog: Arc<dyn CatalogClient>, policy: CachePolicy) -> Self {
        Self {
            store,
            catalog,
            policy,
        }
    }

    pub async fn ensure_fresh(&self, show_id: ShowId) -> Result<FreshShow, ShowCacheError> {
        self.ensure_fresh_at(show_id, Utc::now()).await
    }

    /// Returns the show row, creating it on first reference and refreshing it
    /// once it has outlived the freshness window.
    ///
    /// A refresh always restamps `last_refreshed_at`, even when the catalog
    /// reports nothing new, so the window restarts from this check.
    pub async fn ensure_fresh_at(
        &self,
        show_id: ShowId,
        now: DateTime<Utc>,
    ) -> Result<FreshShow, ShowCacheError> {
        let existing = self.store.get_show(show_id).await?.map(Show::from);

        let (previous, freshness) = match existing {
            None => (None, Freshness::Created),
            Some(show) if !self.policy.is_stale(show.last_refreshed_at, now) => {
                debug!(show_id = %show_id, "Show cache is fresh");
                return Ok(FreshShow {
                    show,
                    freshness: Freshness::Cached,
                });
            }
            Some(show) => (Some(show), Freshness::Refreshed),
        };

        let summary = match self.catalog.get_show(show_id).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(show_id = %show_id, error = %e, "Show refresh failed");
                return Err(ShowCacheError::UpstreamUnavailable {
                    show_id,
                    cached: previous.map(Box::new),
                    source: e,
                });
            }
        };

        if let Some(old) = &previous
            && old.differs_from(&summary)
        {
            info!(
                show_id = %show_id,
                seasons = summary.season_count,
                ended = summary.ended,
                "Show summary changed"
            );
        }

        let row = self.store.upsert_show(show_id, &summary, now).await?;

        match freshness {
            Freshness::Created => info!(show_id = %show_id, name = %row.name, "Cached new show"),
            _ => debug!(show_id = %show_id, "Refreshed stale show"),
        }

        Ok(FreshShow {
            show: Show::from(row),
            freshness,
        })
    }

    /// Cached rows only; never calls the catalog.
    pub async fn cached(&self, show_ids: &[ShowId]) -> Result<Vec<Show>, ShowCacheError> {
        let rows = self.store.get_shows(show_ids).await?;
        Ok(rows.into_iter().map(Show::from).collect())
    }
}
