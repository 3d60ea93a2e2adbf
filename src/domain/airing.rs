//! Time rules shared by the cache and the watch tracker.
//!
//! "Aired" is never stored. It is derived on every read from the episode's air
//! date and the current instant in the catalog's home time zone, because it
//! changes as time passes without any write happening.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

/// Freshness window and reference zone used for every staleness and airing
/// decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub freshness_window: Duration,
    pub reference_tz: Tz,
}

impl CachePolicy {
    #[must_use]
    pub const fn new(freshness_window: Duration, reference_tz: Tz) -> Self {
        Self {
            freshness_window,
            reference_tz,
        }
    }

    /// A row refreshed at `last_refreshed_at` is stale once `now` is past
    /// `last_refreshed_at + freshness_window`, both observed in the reference
    /// zone.
    #[must_use]
    pub fn is_stale(&self, last_refreshed_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let deadline = last_refreshed_at.with_timezone(&self.reference_tz) + self.freshness_window;
        now.with_timezone(&self.reference_tz) > deadline
    }

    #[must_use]
    pub fn is_aired(&self, air_date: Option<NaiveDate>, now: DateTime<Utc>) -> bool {
        is_aired(air_date, now, self.reference_tz)
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new(Duration::hours(6), chrono_tz::America::Los_Angeles)
    }
}

/// Calendar date of `now` in `tz`.
#[must_use]
pub fn today_in(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// An episode has aired when its air date is known and not after today in the
/// reference zone.
#[must_use]
pub fn is_aired(air_date: Option<NaiveDate>, now: DateTime<Utc>, tz: Tz) -> bool {
    air_date.is_some_and(|date| date <= today_in(now, tz))
}
