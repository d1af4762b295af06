use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Role).text().not_null())
                    .col(ColumnDef::new(Users::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // Create spaces table
        manager
            .create_table(
                Table::create()
                    .table(Spaces::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Spaces::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Spaces::Name).string().not_null())
                    .col(ColumnDef::new(Spaces::Description).text())
                    .col(ColumnDef::new(Spaces::Location).string().not_null())
                    .col(ColumnDef::new(Spaces::Capacity).integer().not_null())
                    .col(ColumnDef::new(Spaces::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Spaces::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // Create reservations table
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::RequesterId).uuid().not_null())
                    .col(ColumnDef::new(Reservations::SpaceId).uuid().not_null())
                    .col(
                        ColumnDef::new(Reservations::StartsAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reservations::EndsAt).date_time().not_null())
                    .col(ColumnDef::new(Reservations::Status).text().not_null())
                    .col(ColumnDef::new(Reservations::SecretariatNote).text())
                    .col(ColumnDef::new(Reservations::RejectionReason).text())
                    .col(ColumnDef::new(Reservations::CancelReason).text())
                    .col(ColumnDef::new(Reservations::LocationNote).text())
                    .col(ColumnDef::new(Reservations::ActivityNote).text())
                    .col(ColumnDef::new(Reservations::ForwardedAt).date_time())
                    .col(
                        ColumnDef::new(Reservations::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reservations-requester_id")
                            .from(Reservations::Table, Reservations::RequesterId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reservations-space_id")
                            .from(Reservations::Table, Reservations::SpaceId)
                            .to(Spaces::Table, Spaces::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Spaces::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Spaces {
    Table,
    Id,
    Name,
    Description,
    Location,
    Capacity,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Reservations {
    Table,
    Id,
    RequesterId,
    SpaceId,
    StartsAt,
    EndsAt,
    Status,
    SecretariatNote,
    RejectionReason,
    CancelReason,
    LocationNote,
    ActivityNote,
    ForwardedAt,
    CreatedAt,
    UpdatedAt,
}
