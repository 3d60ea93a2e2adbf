use sea_orm::entity::prelude::*;

/// Presence of a row means the list has watched the episode.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "watched_episodes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub list_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub episode_id: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::watch_lists::Entity",
        from = "Column::ListId",
        to = "super::watch_lists::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    WatchLists,
}

impl Related<super::watch_lists::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WatchLists.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
