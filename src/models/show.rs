use crate::domain::ShowId;
use crate::entities::shows;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Cached show record, shared by every list that references the show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    pub show_id: ShowId,
    pub name: String,
    pub season_count: i32,
    pub ended: bool,
    pub last_refreshed_at: DateTime<Utc>,
}

impl From<shows::Model> for Show {
    fn from(m: shows::Model) -> Self {
        Self {
            show_id: ShowId::new(m.show_id),
            name: m.name,
            season_count: m.season_count.max(0),
            ended: m.ended,
            last_refreshed_at: m.last_refreshed_at,
        }
    }
}

/// Show summary as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowSummary {
    pub name: String,
    pub season_count: i32,
    pub ended: bool,
}

impl Show {
    /// True when the summary carries anything the cached row does not.
    #[must_use]
    pub fn differs_from(&self, summary: &ShowSummary) -> bool {
        self.name != summary.name
            || self.season_count != summary.season_count
            || self.ended != summary.ended
    }
}

/// A catalog search hit, used to pick the show ids a list refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowMatch {
    pub show_id: ShowId,
    pub name: String,
    pub first_air_date: Option<NaiveDate>,
    pub overview: String,
    pub vote_count: i64,
}
