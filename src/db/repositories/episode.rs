use crate::domain::{EpisodeId, ShowId};
use crate::entities::{episodes, prelude::*};
use crate::models::FetchedEpisode;
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

/// Repository for per-episode metadata keyed by `(show, season, episode)`.
pub struct EpisodeRepository {
    conn: DatabaseConnection,
}

impl EpisodeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_season(
        &self,
        show_id: ShowId,
        season_number: i32,
    ) -> Result<Vec<episodes::Model>> {
        let rows = Episodes::find()
            .filter(episodes::Column::ShowId.eq(show_id.value()))
            .filter(episodes::Column::SeasonNumber.eq(season_number))
            .order_by_asc(episodes::Column::EpisodeNumber)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn get_by_episode_id(&self, episode_id: EpisodeId) -> Result<Option<episodes::Model>> {
        let row = Episodes::find()
            .filter(episodes::Column::EpisodeId.eq(episode_id.value()))
            .one(&self.conn)
            .await?;

        Ok(row)
    }

    pub async fn get_for_show(&self, show_id: ShowId) -> Result<Vec<episodes::Model>> {
        self.get_for_shows(&[show_id]).await
    }

    pub async fn get_for_shows(&self, show_ids: &[ShowId]) -> Result<Vec<episodes::Model>> {
        if show_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = show_ids.iter().map(ShowId::value).collect();
        let rows = Episodes::find()
            .filter(episodes::Column::ShowId.is_in(ids))
            .order_by_asc(episodes::Column::ShowId)
            .order_by_asc(episodes::Column::SeasonNumber)
            .order_by_asc(episodes::Column::EpisodeNumber)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    /// Inserts a new row. If a concurrent writer created the same natural key
    /// first, its row is overwritten with this record instead of duplicated.
    pub async fn insert(&self, show_id: ShowId, episode: &FetchedEpisode) -> Result<()> {
        let active_model = episodes::ActiveModel {
            show_id: Set(show_id.value()),
            season_number: Set(episode.season_number),
            episode_number: Set(episode.episode_number),
            episode_id: Set(episode.episode_id.value()),
            name: Set(episode.name.clone()),
            air_date: Set(episode.air_date),
        };

        Episodes::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    episodes::Column::ShowId,
                    episodes::Column::SeasonNumber,
                    episodes::Column::EpisodeNumber,
                ])
                .update_columns([
                    episodes::Column::EpisodeId,
                    episodes::Column::Name,
                    episodes::Column::AirDate,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }

    /// Removes the row at a natural key. Returns true when a row was deleted.
    pub async fn delete(
        &self,
        show_id: ShowId,
        season_number: i32,
        episode_number: i32,
    ) -> Result<bool> {
        let result = Episodes::delete_by_id((show_id.value(), season_number, episode_number))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Overwrites the mutable fields of an existing row in place.
    pub async fn update(&self, existing: episodes::Model, episode: &FetchedEpisode) -> Result<()> {
        let mut active_model: episodes::ActiveModel = existing.into();
        active_model.episode_id = Set(episode.episode_id.value());
        active_model.name = Set(episode.name.clone());
        active_model.air_date = Set(episode.air_date);
        active_model.update(&self.conn).await?;

        Ok(())
    }
}
