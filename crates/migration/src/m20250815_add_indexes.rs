use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Index on reservations.requester_id for the requester's own list
        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_requester_id")
                    .table(Reservations::Table)
                    .col(Reservations::RequesterId)
                    .to_owned(),
            )
            .await?;

        // Index on reservations.space_id for per-space queries
        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_space_id")
                    .table(Reservations::Table)
                    .col(Reservations::SpaceId)
                    .to_owned(),
            )
            .await?;

        // Index on reservations.status for the pending work queues
        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_status")
                    .table(Reservations::Table)
                    .col(Reservations::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_reservations_requester_id")
                    .table(Reservations::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_reservations_space_id")
                    .table(Reservations::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_reservations_status")
                    .table(Reservations::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Reservations {
    Table,
    RequesterId,
    SpaceId,
    Status,
}
