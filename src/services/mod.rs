pub mod dashboard;
pub mod episode_store;
pub mod feed;
pub mod lists;
pub mod show_cache;
pub mod sync;
pub mod watch_state;

pub use dashboard::{Dashboard, DashboardEpisode, DashboardService, DashboardShow};
pub use episode_store::{EpisodeStore, ReconcileStats};
pub use feed::{CalendarEvent, CalendarFeed, FeedService};
pub use lists::{ListStore, ViewError};
pub use show_cache::{FreshShow, Freshness, ShowCache, ShowCacheError};
pub use sync::{SyncError, SyncOrchestrator, SyncReport, SyncResult};
pub use watch_state::{WatchError, WatchState};
