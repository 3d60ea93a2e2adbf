//! Domain primitives for the show/episode cache and watch tracking.
//!
//! Identifiers are newtypes so a catalog show id can never be passed where an
//! episode id or list id is expected.

pub mod airing;

pub use airing::{CachePolicy, is_aired, today_in};

use serde::{Deserialize, Serialize};
use std::fmt;

/// External catalog identifier of a show.
///
/// # Examples
///
/// ```rust
/// use tv2cal::domain::ShowId;
///
/// let id = ShowId::new(1396);
/// assert_eq!(id.value(), 1396);
/// assert_eq!(id.to_string(), "1396");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ShowId(i32);

impl ShowId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ShowId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl From<ShowId> for i32 {
    fn from(id: ShowId) -> Self {
        id.0
    }
}

/// Stable surrogate id the catalog assigns to an episode.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EpisodeId(i64);

impl EpisodeId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EpisodeId {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

impl From<EpisodeId> for i64 {
    fn from(id: EpisodeId) -> Self {
        id.0
    }
}

/// Identifier of a user's watch list. Lists themselves are owned by the
/// external list store; the core only reads them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ListId(i32);

impl ListId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ListId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}
