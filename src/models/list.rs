use crate::domain::{EpisodeId, ListId, ShowId};
use crate::entities::{watch_lists, watched_episodes};
use serde::{Deserialize, Serialize};

/// Read-only view of a list as supplied by the list store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchList {
    pub id: ListId,
    pub name: String,
    /// Show ids in list order.
    pub show_ids: Vec<ShowId>,
}

impl WatchList {
    #[must_use]
    pub fn contains_show(&self, show_id: ShowId) -> bool {
        self.show_ids.contains(&show_id)
    }
}

/// One element of the stored show set. Lists written by the web front end
/// keep whole search results (`{"id": 1396, "name": ...}`), others store bare
/// ids.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredShow {
    Id(ShowId),
    Entry { id: ShowId },
}

impl From<StoredShow> for ShowId {
    fn from(stored: StoredShow) -> Self {
        match stored {
            StoredShow::Id(id) | StoredShow::Entry { id } => id,
        }
    }
}

impl TryFrom<watch_lists::Model> for WatchList {
    type Error = serde_json::Error;

    fn try_from(m: watch_lists::Model) -> Result<Self, Self::Error> {
        let stored: Vec<StoredShow> = serde_json::from_str(&m.shows)?;
        Ok(Self {
            id: ListId::new(m.id),
            name: m.name,
            show_ids: stored.into_iter().map(ShowId::from).collect(),
        })
    }
}

/// A list has watched an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WatchMark {
    pub list_id: ListId,
    pub episode_id: EpisodeId,
}

impl From<watched_episodes::Model> for WatchMark {
    fn from(m: watched_episodes::Model) -> Self {
        Self {
            list_id: ListId::new(m.list_id),
            episode_id: EpisodeId::new(m.episode_id),
        }
    }
}
