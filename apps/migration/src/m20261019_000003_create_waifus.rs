use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Waifus::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Waifus::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Waifus::Name).string().not_null())
                    .col(ColumnDef::new(Waifus::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Waifus::Image).text().not_null().default(""))
                    .col(ColumnDef::new(Waifus::UserId).string_len(128).not_null())
                    .col(ColumnDef::new(Waifus::Rating).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Waifus::Favorites).big_integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Waifus::Status)
                            .string_len(16)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(Waifus::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Waifus::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_waifus_status_created_at")
                    .table(Waifus::Table)
                    .col(Waifus::Status)
                    .col(Waifus::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Waifus::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Waifus {
    Table,
    Id,
    Name,
    Description,
    Image,
    UserId,
    Rating,
    Favorites,
    Status,
    CreatedAt,
    UpdatedAt,
}
