//! Entry point for read paths: brings the requested shows up to date (or not,
//! for cache-only reads) and returns everything cached for them.
//!
//! Refresh is lazy. Whichever request first observes a stale show pays for
//! the upstream calls; there is no background scheduler.

use crate::clients::CatalogClient;
use crate::db::Store;
use crate::domain::{CachePolicy, ShowId};
use crate::models::{Episode, Show};
use crate::services::episode_store::{EpisodeStore, ReconcileStats};
use crate::services::show_cache::{Freshness, ShowCache, ShowCacheError};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{info, warn};

/// Only storage failures abort a sync. Catalog failures degrade to cached
/// data and are listed in [`SyncReport::unavailable`].
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for SyncError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub created: Vec<ShowId>,
    pub refreshed: Vec<ShowId>,
    /// Shows whose summary could not be fetched. Any cached row is still
    /// returned.
    pub unavailable: Vec<ShowId>,
    /// Shows where a season fetch failed part-way; earlier seasons were
    /// merged, the rest wait for the next refresh.
    pub incomplete: Vec<ShowId>,
    pub episodes: ReconcileStats,
}

#[derive(Debug, Default, Clone)]
pub struct SyncResult {
    /// Cached shows in request order. Ids never cached are absent.
    pub shows: Vec<Show>,
    pub episodes: Vec<Episode>,
    pub report: SyncReport,
}

pub struct SyncOrchestrator {
    catalog: Arc<dyn CatalogClient>,
    shows: ShowCache,
    episodes: EpisodeStore,
    refresh_locks: Mutex<HashMap<ShowId, Arc<tokio::sync::Mutex<()>>>>,
}

impl SyncOrchestrator {
    #[must_use]
    pub fn new(store: Store, catalog: Arc<dyn CatalogClient>, policy: CachePolicy) -> Self {
        Self {
            shows: ShowCache::new(store.clone(), catalog.clone(), policy),
            episodes: EpisodeStore::new(store),
            catalog,
            refresh_locks: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub const fn show_cache(&self) -> &ShowCache {
        &self.shows
    }

    #[must_use]
    pub const fn episode_store(&self) -> &EpisodeStore {
        &self.episodes
    }

    pub async fn sync(
        &self,
        show_ids: &[ShowId],
        force_refresh: bool,
    ) -> Result<SyncResult, SyncError> {
        self.sync_at(show_ids, force_refresh, Utc::now()).await
    }

    /// With `force_refresh` each show is passed through the cache's staleness
    /// check, and created or refreshed shows get every season re-fetched.
    /// Without it no upstream call is made.
    pub async fn sync_at(
        &self,
        show_ids: &[ShowId],
        force_refresh: bool,
        now: DateTime<Utc>,
    ) -> Result<SyncResult, SyncError> {
        let mut seen = HashSet::new();
        let ids: Vec<ShowId> = show_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        let mut report = SyncReport::default();

        if force_refresh {
            for &show_id in &ids {
                self.refresh_show(show_id, now, &mut report).await?;
            }
        }

        let mut by_id: HashMap<ShowId, Show> = self
            .shows
            .cached(&ids)
            .await
            .map_err(cache_to_sync_error)?
            .into_iter()
            .map(|show| (show.show_id, show))
            .collect();
        let shows: Vec<Show> = ids.iter().filter_map(|id| by_id.remove(id)).collect();

        let episodes = self.episodes.list_episodes(&ids).await?;

        if force_refresh {
            info!(
                shows = shows.len(),
                episodes = episodes.len(),
                created = report.created.len(),
                refreshed = report.refreshed.len(),
                unavailable = report.unavailable.len(),
                "Sync complete"
            );
        }

        Ok(SyncResult {
            shows,
            episodes,
            report,
        })
    }

    fn refresh_lock(&self, show_id: ShowId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .refresh_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.entry(show_id).or_default().clone()
    }

    /// Drops the map entry once no other request holds the show's lock.
    fn release_refresh_lock(&self, show_id: ShowId, lock: Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self
            .refresh_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        drop(lock);
        if locks
            .get(&show_id)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            locks.remove(&show_id);
        }
    }

    async fn refresh_show(
        &self,
        show_id: ShowId,
        now: DateTime<Utc>,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        // A request that waited here finds the row fresh and skips upstream.
        let lock = self.refresh_lock(show_id);
        let outcome = {
            let _guard = lock.lock().await;
            self.refresh_show_locked(show_id, now, report).await
        };
        self.release_refresh_lock(show_id, lock);
        outcome
    }

    async fn refresh_show_locked(
        &self,
        show_id: ShowId,
        now: DateTime<Utc>,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        let fresh = match self.shows.ensure_fresh_at(show_id, now).await {
            Ok(fresh) => fresh,
            Err(e @ ShowCacheError::UpstreamUnavailable { .. }) => {
                warn!(
                    show_id = %show_id,
                    has_cached = e.cached().is_some(),
                    error = %e,
                    "Serving cached show data"
                );
                report.unavailable.push(show_id);
                return Ok(());
            }
            Err(e) => return Err(cache_to_sync_error(e)),
        };

        match fresh.freshness {
            Freshness::Created => report.created.push(show_id),
            Freshness::Refreshed => report.refreshed.push(show_id),
            Freshness::Cached => {}
        }

        if fresh.needs_episode_sync() {
            self.sync_seasons(&fresh.show, report).await?;
        }

        Ok(())
    }

    async fn sync_seasons(&self, show: &Show, report: &mut SyncReport) -> Result<(), SyncError> {
        for season in 1..=show.season_count {
            let fetched = match self.catalog.get_season(show.show_id, season).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    warn!(
                        show_id = %show.show_id,
                        season,
                        error = %e,
                        "Season fetch failed, deferring remaining seasons"
                    );
                    report.incomplete.push(show.show_id);
                    return Ok(());
                }
            };

            let stats = self
                .episodes
                .reconcile_season(show.show_id, season, &fetched)
                .await?;
            report.episodes.absorb(stats);
        }

        Ok(())
    }
}

fn cache_to_sync_error(err: ShowCacheError) -> SyncError {
    SyncError::Database(err.to_string())
}
