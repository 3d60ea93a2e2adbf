//! Calendar read path. Forces a refresh of stale shows before building
//! events, so a feed subscriber always pulls up-to-date air dates.

use crate::domain::{ListId, ShowId};
use crate::models::{Episode, Show};
use crate::services::lists::{ListStore, ViewError};
use crate::services::sync::SyncOrchestrator;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// One all-day calendar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub uid: String,
    pub date: NaiveDate,
    pub summary: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarFeed {
    pub name: String,
    pub events: Vec<CalendarEvent>,
}

/// Builds events for every dated episode. Undated episodes are skipped; an
/// episode whose show row is missing is labelled by id.
#[must_use]
pub fn build_calendar(shows: &[Show], episodes: &[Episode]) -> Vec<CalendarEvent> {
    let names: HashMap<ShowId, &str> = shows
        .iter()
        .map(|show| (show.show_id, show.name.as_str()))
        .collect();

    let mut dated: Vec<(&Episode, NaiveDate)> = episodes
        .iter()
        .filter_map(|episode| episode.air_date.map(|date| (episode, date)))
        .collect();
    dated.sort_by_key(|(episode, date)| {
        (
            *date,
            episode.show_id,
            episode.season_number,
            episode.episode_number,
        )
    });

    dated
        .into_iter()
        .map(|(episode, date)| {
            let show_name = names
                .get(&episode.show_id)
                .map_or_else(|| format!("Show {}", episode.show_id), |name| (*name).to_string());

            CalendarEvent {
                uid: format!("{}-{}", episode.show_id, episode.episode_id),
                date,
                summary: format!("{} - {}", show_name, episode.name),
                description: episode.code(),
            }
        })
        .collect()
}

pub struct FeedService {
    sync: Arc<SyncOrchestrator>,
    lists: Arc<dyn ListStore>,
}

impl FeedService {
    #[must_use]
    pub fn new(sync: Arc<SyncOrchestrator>, lists: Arc<dyn ListStore>) -> Self {
        Self { sync, lists }
    }

    pub async fn calendar(&self, list_id: ListId) -> Result<CalendarFeed, ViewError> {
        let list = self
            .lists
            .get_list(list_id)
            .await?
            .ok_or(ViewError::ListNotFound(list_id))?;

        let result = self.sync.sync(&list.show_ids, true).await?;
        let events = build_calendar(&result.shows, &result.episodes);

        debug!(list_id = %list_id, events = events.len(), "Built calendar feed");

        Ok(CalendarFeed {
            name: list.name,
            events,
        })
    }
}
