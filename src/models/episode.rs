use crate::domain::{CachePolicy, EpisodeId, ShowId};
use crate::entities::episodes;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Locally stored episode, unique on `(show_id, season_number, episode_number)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub episode_id: EpisodeId,
    pub show_id: ShowId,
    pub season_number: i32,
    pub episode_number: i32,
    pub name: String,
    pub air_date: Option<NaiveDate>,
}

impl Episode {
    #[must_use]
    pub fn is_aired(&self, policy: &CachePolicy, now: DateTime<Utc>) -> bool {
        policy.is_aired(self.air_date, now)
    }

    /// `s{season}e{episode}` label used by feeds and the CLI.
    #[must_use]
    pub fn code(&self) -> String {
        format!("s{}e{}", self.season_number, self.episode_number)
    }
}

impl From<episodes::Model> for Episode {
    fn from(m: episodes::Model) -> Self {
        Self {
            episode_id: EpisodeId::new(m.episode_id),
            show_id: ShowId::new(m.show_id),
            season_number: m.season_number,
            episode_number: m.episode_number,
            name: m.name,
            air_date: m.air_date,
        }
    }
}

/// One episode record from a catalog season listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedEpisode {
    pub episode_id: EpisodeId,
    pub name: String,
    pub season_number: i32,
    pub episode_number: i32,
    pub air_date: Option<NaiveDate>,
}

impl FetchedEpisode {
    /// Whether applying this record to `existing` would change anything.
    #[must_use]
    pub fn differs_from(&self, existing: &episodes::Model) -> bool {
        existing.name != self.name
            || existing.air_date != self.air_date
            || existing.episode_id != self.episode_id.value()
    }
}
