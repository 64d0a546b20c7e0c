//! Book database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Book, Language};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub slug: String,
    pub title: String,
    pub author_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub language: String,
    pub pages: Option<i32>,
    pub publication_date: Date,
    pub publisher: Option<String>,
    pub is_available: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id"
    )]
    Author,
    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
    #[sea_orm(has_many = "super::favorite::Entity")]
    Favorites,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::favorite::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favorites.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Book {
    fn from(model: Model) -> Self {
        Book {
            id: model.id,
            slug: model.slug,
            title: model.title,
            author_id: model.author_id,
            description: model.description,
            content: model.content,
            language: Language::from(model.language.as_str()),
            pages: model.pages,
            publication_date: model.publication_date,
            publisher: model.publisher,
            is_available: model.is_available,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
