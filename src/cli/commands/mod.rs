mod dashboard;
mod feed;
mod init;
mod refresh;
mod search;
mod sync;
mod watch;

pub use dashboard::cmd_dashboard;
pub use feed::cmd_feed;
pub use init::cmd_init;
pub use refresh::cmd_refresh_show;
pub use search::cmd_search;
pub use sync::cmd_sync;
pub use watch::{cmd_watch, cmd_watch_all};
