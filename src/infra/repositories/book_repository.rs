//! Book repository - data access for the book catalog.

use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::{Book, BookChanges, BookFilter, NewBook};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

use super::entities::book::{self, Entity as BookEntity};

/// Book repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Find book by primary key
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>>;

    /// Find book by its unique slug
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Book>>;

    /// Find all books with the given ids
    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Book>>;

    /// List books matching the filter, newest first
    async fn list(
        &self,
        filter: &BookFilter,
        page: &PaginationParams,
    ) -> AppResult<(Vec<Book>, u64)>;

    /// All books written by the given authors (for expansion)
    async fn list_by_authors(&self, author_ids: Vec<Uuid>) -> AppResult<Vec<Book>>;

    /// Insert a new book owned by `author_id`
    async fn create(&self, new: NewBook, author_id: Uuid) -> AppResult<Book>;

    /// Apply field changes to a book
    async fn update(&self, id: Uuid, changes: BookChanges) -> AppResult<Book>;

    /// Delete a book (dependent reviews and favorites cascade)
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// SeaORM-backed implementation of [`BookRepository`].
pub struct BookStore {
    db: DatabaseConnection,
}

impl BookStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Translate the query-by-example filter into SQL conditions.
    fn conditions(filter: &BookFilter) -> Condition {
        let mut cond = Condition::all();

        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search);
            cond = cond.add(
                Condition::any()
                    .add(Expr::col(book::Column::Title).ilike(pattern.clone()))
                    .add(Expr::col(book::Column::Description).ilike(pattern.clone()))
                    .add(Expr::col(book::Column::Content).ilike(pattern)),
            );
        }
        if let Some(title) = &filter.title {
            cond = cond.add(book::Column::Title.eq(title.clone()));
        }
        if let Some(author) = filter.author {
            cond = cond.add(book::Column::AuthorId.eq(author));
        }
        if let Some(language) = filter.language {
            cond = cond.add(book::Column::Language.eq(language.as_str()));
        }
        if let Some(publisher) = &filter.publisher {
            cond = cond.add(book::Column::Publisher.eq(publisher.clone()));
        }
        if let Some(publication_date) = filter.publication_date {
            cond = cond.add(book::Column::PublicationDate.eq(publication_date));
        }
        if let Some(is_available) = filter.is_available {
            cond = cond.add(book::Column::IsAvailable.eq(is_available));
        }

        cond
    }
}

#[async_trait]
impl BookRepository for BookStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let model = BookEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Book::from))
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Book>> {
        let model = BookEntity::find()
            .filter(book::Column::Slug.eq(slug))
            .one(&self.db)
            .await?;

        Ok(model.map(Book::from))
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Book>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = BookEntity::find()
            .filter(book::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Book::from).collect())
    }

    async fn list(
        &self,
        filter: &BookFilter,
        page: &PaginationParams,
    ) -> AppResult<(Vec<Book>, u64)> {
        let paginator = BookEntity::find()
            .filter(Self::conditions(filter))
            .order_by_desc(book::Column::CreatedAt)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.zero_indexed_page()).await?;

        Ok((models.into_iter().map(Book::from).collect(), total))
    }

    async fn list_by_authors(&self, author_ids: Vec<Uuid>) -> AppResult<Vec<Book>> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = BookEntity::find()
            .filter(book::Column::AuthorId.is_in(author_ids))
            .order_by_desc(book::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Book::from).collect())
    }

    async fn create(&self, new: NewBook, author_id: Uuid) -> AppResult<Book> {
        let now = chrono::Utc::now();
        let active = book::ActiveModel {
            id: Set(Uuid::new_v4()),
            slug: Set(new.slug),
            title: Set(new.title),
            author_id: Set(author_id),
            description: Set(new.description),
            content: Set(new.content),
            language: Set(new.language.to_string()),
            pages: Set(new.pages),
            publication_date: Set(new.publication_date),
            publisher: Set(new.publisher),
            is_available: Set(new.is_available),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active.insert(&self.db).await?;
        Ok(Book::from(model))
    }

    async fn update(&self, id: Uuid, changes: BookChanges) -> AppResult<Book> {
        let model = BookEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: book::ActiveModel = model.into();

        if let Some(slug) = changes.slug {
            active.slug = Set(slug);
        }
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(language) = changes.language {
            active.language = Set(language.to_string());
        }
        if let Some(pages) = changes.pages {
            active.pages = Set(Some(pages));
        }
        if let Some(publication_date) = changes.publication_date {
            active.publication_date = Set(publication_date);
        }
        if let Some(publisher) = changes.publisher {
            active.publisher = Set(Some(publisher));
        }
        if let Some(is_available) = changes.is_available {
            active.is_available = Set(is_available);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Book::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = BookEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
