//! Migration: Create the reviews table.

use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_users_table::Users;
use super::m20250301_000002_create_books_table::Books;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Reviews::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Reviews::BookId).uuid().not_null())
                    .col(ColumnDef::new(Reviews::ReviewerId).uuid().not_null())
                    .col(ColumnDef::new(Reviews::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Reviews::Content).text().not_null())
                    .col(ColumnDef::new(Reviews::Rating).small_integer().not_null())
                    .col(
                        ColumnDef::new(Reviews::IsTrusted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Reviews::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reviews::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_book")
                            .from(Reviews::Table, Reviews::BookId)
                            .to(Books::Table, Books::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_reviewer")
                            .from(Reviews::Table, Reviews::ReviewerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One review per reviewer per book
        manager
            .create_index(
                Index::create()
                    .name("uq_reviews_book_reviewer")
                    .table(Reviews::Table)
                    .col(Reviews::BookId)
                    .col(Reviews::ReviewerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_book_id")
                    .table(Reviews::Table)
                    .col(Reviews::BookId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_reviewer_id")
                    .table(Reviews::Table)
                    .col(Reviews::ReviewerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_rating")
                    .table(Reviews::Table)
                    .col(Reviews::Rating)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reviews::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reviews {
    Table,
    Id,
    BookId,
    ReviewerId,
    Title,
    Content,
    Rating,
    IsTrusted,
    CreatedAt,
    UpdatedAt,
}
