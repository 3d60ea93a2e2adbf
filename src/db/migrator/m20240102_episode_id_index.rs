use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Watch marks and toggles look episodes up by catalog id, which must
        // identify exactly one row.
        manager
            .create_index(
                Index::create()
                    .name("idx_episodes_episode_id")
                    .table(Episodes::Table)
                    .col(Episodes::EpisodeId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_episodes_episode_id")
                    .table(Episodes::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Episodes {
    Table,
    EpisodeId,
}
