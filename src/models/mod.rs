pub mod episode;
pub mod list;
pub mod show;

pub use episode::{Episode, FetchedEpisode};
pub use list::{WatchList, WatchMark};
pub use show::{Show, ShowMatch, ShowSummary};
