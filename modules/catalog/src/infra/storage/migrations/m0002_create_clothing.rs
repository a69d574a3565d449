use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClothingItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClothingItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClothingItems::Name).string().not_null())
                    .col(ColumnDef::new(ClothingItems::Price).double().not_null())
                    .col(ColumnDef::new(ClothingItems::Kind).string().not_null())
                    .col(
                        ColumnDef::new(ClothingItems::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(ClothingItems::Images).json().not_null())
                    .col(ColumnDef::new(ClothingItems::Reviews).json().not_null())
                    .col(
                        ColumnDef::new(ClothingItems::AverageRating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ClothingItems::Revision)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ClothingItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClothingItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_clothing_items_created_at")
                    .table(ClothingItems::Table)
                    .col(ClothingItems::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_clothing_items_kind")
                    .table(ClothingItems::Table)
                    .col(ClothingItems::Kind)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClothingItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ClothingItems {
    Table,
    Id,
    Name,
    Price,
    Kind,
    Description,
    Images,
    Reviews,
    AverageRating,
    Revision,
    CreatedAt,
    UpdatedAt,
}
