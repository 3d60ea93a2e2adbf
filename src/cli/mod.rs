//! Command-line interface for tv2cal.

mod commands;

use clap::{Parser, Subcommand};

/// tv2cal - TV episode calendar and watch tracker
#[derive(Parser)]
#[command(name = "tv2cal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Refresh the shows of a list and report what changed
    #[command(alias = "s")]
    Sync {
        /// List ID
        list_id: i32,
        /// Check every show against the catalog instead of reading the cache
        #[arg(long)]
        force: bool,
    },

    /// Print the calendar feed of a list
    #[command(alias = "cal")]
    Feed {
        /// List ID
        list_id: i32,
    },

    /// Show the watch dashboard of a list (cache only)
    #[command(alias = "d")]
    Dashboard {
        /// List ID
        list_id: i32,
    },

    /// Toggle the watched state of an aired episode
    #[command(alias = "w")]
    Watch {
        /// List ID
        list_id: i32,
        /// Catalog episode ID
        episode_id: i64,
    },

    /// Mark every aired episode of a show as watched
    WatchAll {
        /// List ID
        list_id: i32,
        /// Catalog show ID
        show_id: i32,
    },

    /// Search the catalog for shows to add to a list
    #[command(alias = "find")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Refresh one show if its cache entry is stale
    RefreshShow {
        /// Catalog show ID
        show_id: i32,
    },

    /// Create default config file
    Init,
}

pub use commands::*;
