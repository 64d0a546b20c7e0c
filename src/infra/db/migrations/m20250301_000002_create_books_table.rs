//! Migration: Create the books table.

use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_users_table::Users;

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
                    .col(
                        ColumnDef::new(Books::Slug)
                            .string_len(250)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Books::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Books::AuthorId).uuid().not_null())
                    .col(ColumnDef::new(Books::Description).text().not_null())
                    .col(ColumnDef::new(Books::Content).text().not_null())
                    .col(ColumnDef::new(Books::Language).string_len(32).not_null())
                    .col(ColumnDef::new(Books::Pages).integer().null())
                    .col(ColumnDef::new(Books::PublicationDate).date().not_null())
                    .col(ColumnDef::new(Books::Publisher).string_len(200).null())
                    .col(
                        ColumnDef::new(Books::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
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
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_books_author")
                            .from(Books::Table, Books::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_books_title")
                    .table(Books::Table)
                    .col(Books::Title)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_books_author_id")
                    .table(Books::Table)
                    .col(Books::AuthorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_books_publication_date")
                    .table(Books::Table)
                    .col(Books::PublicationDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_books_is_available")
                    .table(Books::Table)
                    .col(Books::IsAvailable)
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

#[derive(Iden)]
pub enum Books {
    Table,
    Id,
    Slug,
    Title,
    AuthorId,
    Description,
    Content,
    Language,
    Pages,
    PublicationDate,
    Publisher,
    IsAvailable,
    CreatedAt,
    UpdatedAt,
}
