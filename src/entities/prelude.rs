pub use super::episodes::Entity as Episodes;
pub use super::shows::Entity as Shows;
pub use super::watch_lists::Entity as WatchLists;
pub use super::watched_episodes::Entity as WatchedEpisodes;
