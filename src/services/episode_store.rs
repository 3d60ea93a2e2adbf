//! Merges catalog season listings into the local episode table.

use crate::db::Store;
use crate::domain::ShowId;
use crate::entities::episodes;
use crate::models::{Episode, FetchedEpisode};
use anyhow::Result;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Outcome of one `reconcile_season` call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileStats {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Rows deleted because the catalog moved their episode id to another
    /// slot.
    pub removed: usize,
    /// Records rejected because they belong to another season, carry an
    /// invalid episode number, or repeat an earlier record.
    pub skipped: usize,
}

impl ReconcileStats {
    pub fn absorb(&mut self, other: Self) {
        self.created += other.created;
        self.updated += other.updated;
        self.unchanged += other.unchanged;
        self.removed += other.removed;
        self.skipped += other.skipped;
    }
}

fn occupies(row: &episodes::Model, show_id: ShowId, season: i32, episode: i32) -> bool {
    row.show_id == show_id.value() && row.season_number == season && row.episode_number == episode
}

#[derive(Clone)]
pub struct EpisodeStore {
    store: Store,
}

impl EpisodeStore {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Upserts every fetched record of one season by natural key. Safe to call
    /// repeatedly with the same input: rows whose fields already match are
    /// not written.
    ///
    /// An episode id identifies one row. When a record carries an id already
    /// stored at a different slot (the catalog renumbered the season), that
    /// stale row is deleted before the record is written.
    pub async fn reconcile_season(
        &self,
        show_id: ShowId,
        season_number: i32,
        fetched: &[FetchedEpisode],
    ) -> Result<ReconcileStats> {
        let mut existing: HashMap<i32, episodes::Model> = self
            .store
            .get_season_episodes(show_id, season_number)
            .await?
            .into_iter()
            .map(|row| (row.episode_number, row))
            .collect();

        let mut stats = ReconcileStats::default();
        let mut seen = HashSet::new();
        let mut seen_ids = HashSet::new();

        for episode in fetched {
            if episode.season_number != season_number || episode.episode_number < 1 {
                warn!(
                    show_id = %show_id,
                    season = season_number,
                    record_season = episode.season_number,
                    episode = episode.episode_number,
                    "Ignoring episode record outside the requested season"
                );
                stats.skipped += 1;
                continue;
            }

            if !seen.insert(episode.episode_number) || !seen_ids.insert(episode.episode_id) {
                debug!(
                    show_id = %show_id,
                    season = season_number,
                    episode = episode.episode_number,
                    "Duplicate episode record in season listing"
                );
                stats.skipped += 1;
                continue;
            }

            if let Some(holder) = self.store.get_episode_by_id(episode.episode_id).await?
                && !occupies(&holder, show_id, season_number, episode.episode_number)
            {
                debug!(
                    show_id = %show_id,
                    episode_id = %episode.episode_id,
                    from_season = holder.season_number,
                    from_episode = holder.episode_number,
                    to_episode = episode.episode_number,
                    "Episode id moved, dropping stale row"
                );
                if holder.show_id == show_id.value() && holder.season_number == season_number {
                    existing.remove(&holder.episode_number);
                }
                self.store.delete_episode(&holder).await?;
                stats.removed += 1;
            }

            match existing.remove(&episode.episode_number) {
                None => {
                    self.store.insert_episode(show_id, episode).await?;
                    stats.created += 1;
                }
                Some(row) if episode.differs_from(&row) => {
                    self.store.update_episode(row, episode).await?;
                    stats.updated += 1;
                }
                Some(_) => stats.unchanged += 1,
            }
        }

        debug!(
            show_id = %show_id,
            season = season_number,
            created = stats.created,
            updated = stats.updated,
            unchanged = stats.unchanged,
            removed = stats.removed,
            "Season reconciled"
        );

        Ok(stats)
    }

    /// All episodes of the given shows. Order is not part of the contract;
    /// read paths sort for themselves.
    pub async fn list_episodes(&self, show_ids: &[ShowId]) -> Result<Vec<Episode>> {
        let rows = self.store.get_episodes_for_shows(show_ids).await?;
        Ok(rows.into_iter().map(Episode::from).collect())
    }
}
