//! Per-list watched-episode marks.
//!
//! A mark's presence means watched; its absence means unwatched. Every
//! operation validates before writing, so a rejected call leaves the list's
//! marks untouched.

use crate::db::Store;
use crate::domain::{CachePolicy, EpisodeId, ListId, ShowId};
use crate::models::{Episode, WatchList, WatchMark};
use crate::services::lists::ListStore;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Episode {0} does not exist")]
    InvalidEpisodeState(EpisodeId),

    #[error("Cannot mark unaired episode {0} as watched")]
    EpisodeNotAired(EpisodeId),

    #[error("Show {show_id} is not part of list {list_id}")]
    ShowNotInList { list_id: ListId, show_id: ShowId },

    #[error("List {0} not found")]
    ListNotFound(ListId),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for WatchError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

pub struct WatchState {
    store: Store,
    lists: Arc<dyn ListStore>,
    policy: CachePolicy,
}

impl WatchState {
    #[must_use]
    pub fn new(store: Store, lists: Arc<dyn ListStore>, policy: CachePolicy) -> Self {
        Self {
            store,
            lists,
            policy,
        }
    }

    async fn require_list(&self, list_id: ListId) -> Result<WatchList, WatchError> {
        self.lists
            .get_list(list_id)
            .await?
            .ok_or(WatchError::ListNotFound(list_id))
    }

    pub async fn marks(&self, list_id: ListId) -> Result<Vec<WatchMark>, WatchError> {
        let rows = self.store.get_watch_marks(list_id).await?;
        Ok(rows.into_iter().map(WatchMark::from).collect())
    }

    pub async fn toggle(
        &self,
        list_id: ListId,
        episode_id: EpisodeId,
    ) -> Result<Vec<WatchMark>, WatchError> {
        self.toggle_at(list_id, episode_id, Utc::now()).await
    }

    /// Flips the watched state of an aired episode and returns the list's full
    /// updated mark set.
    pub async fn toggle_at(
        &self,
        list_id: ListId,
        episode_id: EpisodeId,
        now: DateTime<Utc>,
    ) -> Result<Vec<WatchMark>, WatchError> {
        self.require_list(list_id).await?;

        let episode = self
            .store
            .get_episode_by_id(episode_id)
            .await?
            .map(Episode::from)
            .ok_or(WatchError::InvalidEpisodeState(episode_id))?;

        if !episode.is_aired(&self.policy, now) {
            return Err(WatchError::EpisodeNotAired(episode_id));
        }

        if self.store.is_watched(list_id, episode_id).await? {
            self.store.remove_watch_mark(list_id, episode_id).await?;
            info!(list_id = %list_id, episode_id = %episode_id, "Marked episode unwatched");
        } else {
            self.store.add_watch_marks(list_id, &[episode_id]).await?;
            info!(list_id = %list_id, episode_id = %episode_id, "Marked episode watched");
        }

        self.marks(list_id).await
    }

    pub async fn mark_all_watched(
        &self,
        list_id: ListId,
        show_id: ShowId,
    ) -> Result<Vec<WatchMark>, WatchError> {
        self.mark_all_watched_at(list_id, show_id, Utc::now()).await
    }

    /// Marks every aired, not yet watched episode of `show_id`. Unaired
    /// episodes are skipped; re-running is a no-op.
    pub async fn mark_all_watched_at(
        &self,
        list_id: ListId,
        show_id: ShowId,
        now: DateTime<Utc>,
    ) -> Result<Vec<WatchMark>, WatchError> {
        let list = self.require_list(list_id).await?;
        if !list.contains_show(show_id) {
            return Err(WatchError::ShowNotInList { list_id, show_id });
        }

        let watched: HashSet<EpisodeId> = self
            .marks(list_id)
            .await?
            .into_iter()
            .map(|mark| mark.episode_id)
            .collect();

        let to_mark: Vec<EpisodeId> = self
            .store
            .get_episodes_for_show(show_id)
            .await?
            .into_iter()
            .map(Episode::from)
            .filter(|episode| episode.is_aired(&self.policy, now))
            .map(|episode| episode.episode_id)
            .filter(|episode_id| !watched.contains(episode_id))
            .collect();

        let inserted = self.store.add_watch_marks(list_id, &to_mark).await?;
        info!(
            list_id = %list_id,
            show_id = %show_id,
            marked = inserted,
            "Marked aired episodes watched"
        );

        self.marks(list_id).await
    }
}
