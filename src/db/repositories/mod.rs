pub mod episode;
pub mod list;
pub mod show;
pub mod watch;
