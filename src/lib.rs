pub mod cli;
pub mod clients;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use clap::Parser;
use cli::{
    Cli, Commands, cmd_dashboard, cmd_feed, cmd_init, cmd_refresh_show, cmd_search, cmd_sync,
    cmd_watch, cmd_watch_all,
};
pub use config::Config;
use state::AppState;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Parses the command line and dispatches it against `config`.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let cli = Cli::parse();
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    if matches!(cli.command, Commands::Init) {
        return cmd_init();
    }

    if config.catalog.api_key.is_empty() {
        debug!("No catalog API key configured; upstream requests will be rejected");
    }

    let state = AppState::from_config(&config).await?;

    match cli.command {
        Commands::Sync { list_id, force } => cmd_sync(&state, list_id, force).await,
        Commands::Feed { list_id } => cmd_feed(&state, list_id).await,
        Commands::Dashboard { list_id } => cmd_dashboard(&state, list_id).await,
        Commands::Watch {
            list_id,
            episode_id,
        } => cmd_watch(&state, list_id, episode_id).await,
        Commands::WatchAll { list_id, show_id } => cmd_watch_all(&state, list_id, show_id).await,
        Commands::Search { query } => cmd_search(&state, &query.join(" ")).await,
        Commands::RefreshShow { show_id } => cmd_refresh_show(&state, show_id).await,
        Commands::Init => cmd_init(),
    }
}
