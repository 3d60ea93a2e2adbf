use sea_orm::entity::prelude::*;

/// Lists are written by the external list store; the core only reads them.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "watch_lists")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// JSON array of catalog show ids, in list order.
    #[sea_orm(column_type = "Text")]
    pub shows: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::watched_episodes::Entity")]
    WatchedEpisodes,
}

impl Related<super::watched_episodes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WatchedEpisodes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
