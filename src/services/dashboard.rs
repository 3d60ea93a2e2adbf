//! Per-list dashboard built from cached data only.

use crate::domain::{CachePolicy, EpisodeId, ListId, ShowId};
use crate::models::{Episode, Show, WatchList, WatchMark};
use crate::services::lists::{ListStore, ViewError};
use crate::services::sync::SyncOrchestrator;
use crate::services::watch_state::WatchState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardEpisode {
    pub episode: Episode,
    pub watched: bool,
    pub aired: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardShow {
    pub show: Show,
    pub unwatched_aired: usize,
    pub episodes: Vec<DashboardEpisode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub list: WatchList,
    pub shows: Vec<DashboardShow>,
    pub marks: Vec<WatchMark>,
}

/// Groups dated episodes under their show and orders both levels: episodes
/// unwatched first, then by season and number; shows by unwatched aired
/// count, descending. Shows with equal counts keep their input order.
#[must_use]
pub fn build_dashboard(
    shows: &[Show],
    episodes: &[Episode],
    marks: &[WatchMark],
    policy: &CachePolicy,
    now: DateTime<Utc>,
) -> Vec<DashboardShow> {
    let watched: HashSet<EpisodeId> = marks.iter().map(|mark| mark.episode_id).collect();

    let mut by_show: HashMap<ShowId, Vec<DashboardEpisode>> = HashMap::new();
    for episode in episodes.iter().filter(|e| e.air_date.is_some()) {
        by_show
            .entry(episode.show_id)
            .or_default()
            .push(DashboardEpisode {
                watched: watched.contains(&episode.episode_id),
                aired: episode.is_aired(policy, now),
                episode: episode.clone(),
            });
    }

    let mut rows: Vec<DashboardShow> = shows
        .iter()
        .map(|show| {
            let mut episodes = by_show.remove(&show.show_id).unwrap_or_default();
            episodes.sort_by_key(|e| {
                (
                    e.watched,
                    e.episode.season_number,
                    e.episode.episode_number,
                )
            });
            let unwatched_aired = episodes.iter().filter(|e| e.aired && !e.watched).count();

            DashboardShow {
                show: show.clone(),
                unwatched_aired,
                episodes,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.unwatched_aired.cmp(&a.unwatched_aired));
    rows
}

pub struct DashboardService {
    sync: Arc<SyncOrchestrator>,
    watch: Arc<WatchState>,
    lists: Arc<dyn ListStore>,
    policy: CachePolicy,
}

impl DashboardService {
    #[must_use]
    pub fn new(
        sync: Arc<SyncOrchestrator>,
        watch: Arc<WatchState>,
        lists: Arc<dyn ListStore>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            sync,
            watch,
            lists,
            policy,
        }
    }

    pub async fn dashboard(&self, list_id: ListId) -> Result<Dashboard, ViewError> {
        self.dashboard_at(list_id, Utc::now()).await
    }

    /// Never calls the catalog. Shows not yet cached are absent.
    pub async fn dashboard_at(
        &self,
        list_id: ListId,
        now: DateTime<Utc>,
    ) -> Result<Dashboard, ViewError> {
        let list = self
            .lists
            .get_list(list_id)
            .await?
            .ok_or(ViewError::ListNotFound(list_id))?;

        let result = self.sync.sync_at(&list.show_ids, false, now).await?;
        let marks = self
            .watch
            .marks(list_id)
            .await
            .map_err(|e| ViewError::Database(e.to_string()))?;

        let shows = build_dashboard(&result.shows, &result.episodes, &marks, &self.policy, now);

        Ok(Dashboard { list, shows, marks })
    }
}
