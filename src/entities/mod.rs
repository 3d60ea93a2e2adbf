pub mod prelude;

pub mod episodes;
pub mod shows;
pub mod watch_lists;
pub mod watched_episodes;
