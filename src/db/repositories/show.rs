use crate::domain::ShowId;
use crate::entities::{prelude::*, shows};
use crate::models::ShowSummary;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

/// Repository for cached show summaries.
pub struct ShowRepository {
    conn: DatabaseConnection,
}

impl ShowRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, show_id: ShowId) -> Result<Option<shows::Model>> {
        let row = Shows::find_by_id(show_id.value()).one(&self.conn).await?;
        Ok(row)
    }

    pub async fn get_many(&self, show_ids: &[ShowId]) -> Result<Vec<shows::Model>> {
        if show_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = show_ids.iter().map(ShowId::value).collect();
        let rows = Shows::find()
            .filter(shows::Column::ShowId.is_in(ids))
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    /// Writes the summary and stamps `last_refreshed_at`, creating the row if
    /// it does not exist yet. Two racing creators both land on the same row.
    pub async fn upsert(
        &self,
        show_id: ShowId,
        summary: &ShowSummary,
        refreshed_at: DateTime<Utc>,
    ) -> Result<shows::Model> {
        let model = shows::Model {
            show_id: show_id.value(),
            name: summary.name.clone(),
            season_count: summary.season_count,
            ended: summary.ended,
            last_refreshed_at: refreshed_at,
        };

        let active_model = shows::ActiveModel {
            show_id: Set(model.show_id),
            name: Set(model.name.clone()),
            season_count: Set(model.season_count),
            ended: Set(model.ended),
            last_refreshed_at: Set(model.last_refreshed_at),
        };

        Shows::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(shows::Column::ShowId)
                    .update_columns([
                        shows::Column::Name,
                        shows::Column::SeasonCount,
                        shows::Column::Ended,
                        shows::Column::LastRefreshedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(model)
    }
}
