use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Books::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Books::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Books::Name).string().not_null())
                    .col(ColumnDef::new(Books::Price).double().not_null())
                    .col(ColumnDef::new(Books::Genre).string().not_null())
                    .col(ColumnDef::new(Books::Author).string().not_null())
                    .col(ColumnDef::new(Books::Publication).string().not_null())
                    .col(ColumnDef::new(Books::Isbn).string())
                    .col(
                        ColumnDef::new(Books::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Books::Images).json().not_null())
                    .col(ColumnDef::new(Books::Reviews).json().not_null())
                    .col(
                        ColumnDef::new(Books::AverageRating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Books::Revision)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Books::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Books::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_books_created_at")
                    .table(Books::Table)
                    .col(Books::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_books_genre")
                    .table(Books::Table)
                    .col(Books::Genre)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Books::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Books {
    Table,
    Id,
    Name,
    Price,
    Genre,
    Author,
    Publication,
    Isbn,
    Description,
    Images,
    Reviews,
    AverageRating,
    Revision,
    CreatedAt,
    UpdatedAt,
}
