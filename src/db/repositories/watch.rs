use crate::domain::{EpisodeId, ListId};
use crate::entities::{prelude::*, watched_episodes};
use anyhow::Result;
use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

/// Repository for per-list watch marks.
pub struct WatchRepository {
    conn: DatabaseConnection,
}

impl WatchRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, list_id: ListId) -> Result<Vec<watched_episodes::Model>> {
        let rows = WatchedEpisodes::find()
            .filter(watched_episodes::Column::ListId.eq(list_id.value()))
            .order_by_asc(watched_episodes::Column::EpisodeId)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn exists(&self, list_id: ListId, episode_id: EpisodeId) -> Result<bool> {
        let row = WatchedEpisodes::find_by_id((list_id.value(), episode_id.value()))
            .one(&self.conn)
            .await?;

        Ok(row.is_some())
    }

    /// Inserts marks, leaving existing ones untouched. Returns how many rows
    /// were actually created.
    pub async fn insert_many(&self, list_id: ListId, episode_ids: &[EpisodeId]) -> Result<u64> {
        if episode_ids.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        let mut inserted = 0;

        // Stay well under SQLite's bound-parameter limit.
        for chunk in episode_ids.chunks(200) {
            let models: Vec<watched_episodes::ActiveModel> = chunk
                .iter()
                .map(|episode_id| watched_episodes::ActiveModel {
                    list_id: Set(list_id.value()),
                    episode_id: Set(episode_id.value()),
                    created_at: Set(now),
                })
                .collect();

            inserted += WatchedEpisodes::insert_many(models)
                .on_conflict(
                    sea_orm::sea_query::OnConflict::columns([
                        watched_episodes::Column::ListId,
                        watched_episodes::Column::EpisodeId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&self.conn)
                .await?;
        }

        Ok(inserted)
    }

    /// Returns true when a mark was removed.
    pub async fn delete(&self, list_id: ListId, episode_id: EpisodeId) -> Result<bool> {
        let result = WatchedEpisodes::delete_by_id((list_id.value(), episode_id.value()))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
