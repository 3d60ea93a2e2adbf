use crate::domain::ListId;
use crate::entities::prelude::*;
use crate::models::WatchList;
use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, EntityTrait};

/// Read access to lists owned by the external list store.
pub struct ListRepository {
    conn: DatabaseConnection,
}

impl ListRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, list_id: ListId) -> Result<Option<WatchList>> {
        let Some(row) = WatchLists::find_by_id(list_id.value())
            .one(&self.conn)
            .await?
        else {
            return Ok(None);
        };

        let list = WatchList::try_from(row)
            .with_context(|| format!("List {list_id} has a malformed show set"))?;

        Ok(Some(list))
    }
}
