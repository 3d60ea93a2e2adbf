use crate::domain::{EpisodeId, ListId, ShowId};
use crate::entities::{episodes, shows, watched_episodes};
use crate::models::{FetchedEpisode, ShowSummary, WatchList};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        if is_memory_url(db_url) {
            // Every pooled connection to `:memory:` would see its own database.
            Self::with_pool_options(db_url, 1, 1).await
        } else {
            Self::with_pool_options(db_url, 5, 1).await
        }
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !is_memory_url(db_url) {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        if !is_memory_url(db_url) {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn show_repo(&self) -> repositories::show::ShowRepository {
        repositories::show::ShowRepository::new(self.conn.clone())
    }

    fn episode_repo(&self) -> repositories::episode::EpisodeRepository {
        repositories::episode::EpisodeRepository::new(self.conn.clone())
    }

    fn watch_repo(&self) -> repositories::watch::WatchRepository {
        repositories::watch::WatchRepository::new(self.conn.clone())
    }

    fn list_repo(&self) -> repositories::list::ListRepository {
        repositories::list::ListRepository::new(self.conn.clone())
    }

    // Shows

    pub async fn get_show(&self, show_id: ShowId) -> Result<Option<shows::Model>> {
        self.show_repo().get(show_id).await
    }

    pub async fn get_shows(&self, show_ids: &[ShowId]) -> Result<Vec<shows::Model>> {
        self.show_repo().get_many(show_ids).await
    }

    pub async fn upsert_show(
        &self,
        show_id: ShowId,
        summary: &ShowSummary,
        refreshed_at: DateTime<Utc>,
    ) -> Result<shows::Model> {
        self.show_repo().upsert(show_id, summary, refreshed_at).await
    }

    // Episodes

    pub async fn get_season_episodes(
        &self,
        show_id: ShowId,
        season_number: i32,
    ) -> Result<Vec<episodes::Model>> {
        self.episode_repo().get_season(show_id, season_number).await
    }

    pub async fn get_episode_by_id(&self, episode_id: EpisodeId) -> Result<Option<episodes::Model>> {
        self.episode_repo().get_by_episode_id(episode_id).await
    }

    pub async fn get_episodes_for_show(&self, show_id: ShowId) -> Result<Vec<episodes::Model>> {
        self.episode_repo().get_for_show(show_id).await
    }

    pub async fn get_episodes_for_shows(
        &self,
        show_ids: &[ShowId],
    ) -> Result<Vec<episodes::Model>> {
        self.episode_repo().get_for_shows(show_ids).await
    }

    pub async fn insert_episode(&self, show_id: ShowId, episode: &FetchedEpisode) -> Result<()> {
        self.episode_repo().insert(show_id, episode).await
    }

    pub async fn update_episode(
        &self,
        existing: episodes::Model,
        episode: &FetchedEpisode,
    ) -> Result<()> {
        self.episode_repo().update(existing, episode).await
    }

    pub async fn delete_episode(&self, existing: &episodes::Model) -> Result<bool> {
        self.episode_repo()
            .delete(
                ShowId::new(existing.show_id),
                existing.season_number,
                existing.episode_number,
            )
            .await
    }

    // Watch marks

    pub async fn get_watch_marks(&self, list_id: ListId) -> Result<Vec<watched_episodes::Model>> {
        self.watch_repo().list(list_id).await
    }

    pub async fn is_watched(&self, list_id: ListId, episode_id: EpisodeId) -> Result<bool> {
        self.watch_repo().exists(list_id, episode_id).await
    }

    pub async fn add_watch_marks(&self, list_id: ListId, episode_ids: &[EpisodeId]) -> Result<u64> {
        self.watch_repo().insert_many(list_id, episode_ids).await
    }

    pub async fn remove_watch_mark(&self, list_id: ListId, episode_id: EpisodeId) -> Result<bool> {
        self.watch_repo().delete(list_id, episode_id).await
    }

    // Lists

    pub async fn get_list(&self, list_id: ListId) -> Result<Option<WatchList>> {
        self.list_repo().get(list_id).await
    }
}

fn is_memory_url(db_url: &str) -> bool {
    db_url.contains(":memory:") || db_url.contains("mode=memory")
}
