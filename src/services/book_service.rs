//! Book service - catalog management use cases.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    ensure_owner, ensure_role, Book, BookChanges, BookDetail, BookFilter, NewBook, Principal,
    Review, User, UserRole,
};
use crate::errors::{AppError, AppResult};
use crate::infra::Repositories;
use crate::types::{Expand, PaginationParams};

/// Book service trait for dependency injection.
#[async_trait]
pub trait BookService: Send + Sync {
    /// List books matching the filter, with optional expansion
    async fn list_books(
        &self,
        filter: &BookFilter,
        page: &PaginationParams,
        expand: &Expand,
    ) -> AppResult<(Vec<BookDetail>, u64)>;

    /// Get a book by slug, with optional expansion
    async fn get_book(&self, slug: &str, expand: &Expand) -> AppResult<BookDetail>;

    /// Create a book; the caller must hold the author role and becomes
    /// the book's author regardless of payload content
    async fn create_book(&self, principal: &Principal, new: NewBook) -> AppResult<Book>;

    /// Update a book (author of the book or admin)
    async fn update_book(
        &self,
        principal: &Principal,
        slug: &str,
        changes: BookChanges,
    ) -> AppResult<Book>;

    /// Delete a book (author of the book or admin)
    async fn delete_book(&self, principal: &Principal, slug: &str) -> AppResult<()>;
}

/// Concrete implementation of BookService.
pub struct BookManager<R: Repositories> {
    repos: Arc<R>,
}

impl<R: Repositories> BookManager<R> {
    /// Create new book service instance
    pub fn new(repos: Arc<R>) -> Self {
        Self { repos }
    }

    /// Attach expanded relations to a page of books.
    async fn expand_books(
        &self,
        books: Vec<Book>,
        expand: &Expand,
    ) -> AppResult<Vec<BookDetail>> {
        let authors: Option<HashMap<Uuid, User>> = if expand.wants("author") {
            let ids: Vec<Uuid> = books.iter().map(|book| book.author_id).collect();
            let users = self.repos.users().find_by_ids(ids).await?;
            Some(users.into_iter().map(|user| (user.id, user)).collect())
        } else {
            None
        };

        let mut reviews: Option<HashMap<Uuid, Vec<Review>>> = if expand.wants("reviews") {
            let ids: Vec<Uuid> = books.iter().map(|book| book.id).collect();
            let all = self.repos.reviews().list_by_books(ids).await?;
            let mut grouped: HashMap<Uuid, Vec<Review>> = HashMap::new();
            for review in all {
                grouped.entry(review.book_id).or_default().push(review);
            }
            Some(grouped)
        } else {
            None
        };

        Ok(books
            .into_iter()
            .map(|book| BookDetail {
                author: authors
                    .as_ref()
                    .and_then(|map| map.get(&book.author_id).cloned()),
                reviews: reviews
                    .as_mut()
                    .map(|map| map.remove(&book.id).unwrap_or_default()),
                book,
            })
            .collect())
    }

    /// Reject a slug already used by another book.
    async fn ensure_slug_free(&self, slug: &str, current: Option<Uuid>) -> AppResult<()> {
        if let Some(existing) = self.repos.books().find_by_slug(slug).await? {
            if current != Some(existing.id) {
                return Err(AppError::conflict("Book"));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<R: Repositories> BookService for BookManager<R> {
    async fn list_books(
        &self,
        filter: &BookFilter,
        page: &PaginationParams,
        expand: &Expand,
    ) -> AppResult<(Vec<BookDetail>, u64)> {
        let (books, total) = self.repos.books().list(filter, page).await?;
        let details = self.expand_books(books, expand).await?;
        Ok((details, total))
    }

    async fn get_book(&self, slug: &str, expand: &Expand) -> AppResult<BookDetail> {
        let book = self
            .repos
            .books()
            .find_by_slug(slug)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut details = self.expand_books(vec![book], expand).await?;
        Ok(details.remove(0))
    }

    async fn create_book(&self, principal: &Principal, new: NewBook) -> AppResult<Book> {
        ensure_role(principal, UserRole::Author)?;
        self.ensure_slug_free(&new.slug, None).await?;

        self.repos.books().create(new, principal.id).await
    }

    async fn update_book(
        &self,
        principal: &Principal,
        slug: &str,
        changes: BookChanges,
    ) -> AppResult<Book> {
        let book = self
            .repos
            .books()
            .find_by_slug(slug)
            .await?
            .ok_or(AppError::NotFound)?;

        ensure_owner(principal, book.author_id)?;

        if let Some(new_slug) = &changes.slug {
            if new_slug != &book.slug {
                self.ensure_slug_free(new_slug, Some(book.id)).await?;
            }
        }

        self.repos.books().update(book.id, changes).await
    }

    async fn delete_book(&self, principal: &Principal, slug: &str) -> AppResult<()> {
        let book = self
            .repos
            .books()
            .find_by_slug(slug)
            .await?
            .ok_or(AppError::NotFound)?;

        ensure_owner(principal, book.author_id)?;

        self.repos.books().delete(book.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockBookRepository;
    use crate::services::testing::{principal, sample_book, ReposWith};
    use mockall::predicate::eq;

    #[tokio::test]
    async fn only_authors_may_create_books() {
        let service = BookManager::new(Arc::new(ReposWith::new()));

        for role in [UserRole::Reviewer, UserRole::Other] {
            let caller = principal(role);
            let result = service
                .create_book(&caller, sample_book_draft("a-book"))
                .await;
            assert!(matches!(result, Err(AppError::Forbidden)));
        }
    }

    #[tokio::test]
    async fn author_creates_book_owned_by_themselves() {
        let caller = principal(UserRole::Author);
        let caller_id = caller.id;

        let mut books = MockBookRepository::new();
        books
            .expect_find_by_slug()
            .with(eq("a-book"))
            .returning(|_| Ok(None));
        books
            .expect_create()
            .withf(move |_, author_id| *author_id == caller_id)
            .returning(|new, author_id| {
                let mut book = sample_book(Uuid::new_v4(), author_id);
                book.slug = new.slug;
                Ok(book)
            });

        let service = BookManager::new(Arc::new(ReposWith::with_books(books)));
        let book = service
            .create_book(&caller, sample_book_draft("a-book"))
            .await
            .unwrap();

        assert_eq!(book.author_id, caller.id);
        assert_eq!(book.slug, "a-book");
    }

    #[tokio::test]
    async fn duplicate_slug_is_a_conflict() {
        let caller = principal(UserRole::Author);

        let mut books = MockBookRepository::new();
        books
            .expect_find_by_slug()
            .with(eq("a-book"))
            .returning(|_| Ok(Some(sample_book(Uuid::new_v4(), Uuid::new_v4()))));

        let service = BookManager::new(Arc::new(ReposWith::with_books(books)));
        let result = service
            .create_book(&caller, sample_book_draft("a-book"))
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn non_owner_cannot_delete_book() {
        let caller = principal(UserRole::Author);

        let mut books = MockBookRepository::new();
        books
            .expect_find_by_slug()
            .returning(|_| Ok(Some(sample_book(Uuid::new_v4(), Uuid::new_v4()))));

        let service = BookManager::new(Arc::new(ReposWith::with_books(books)));
        let result = service.delete_book(&caller, "a-book").await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn admin_may_delete_any_book() {
        let caller = principal(UserRole::Admin);
        let book_id = Uuid::new_v4();

        let mut books = MockBookRepository::new();
        books
            .expect_find_by_slug()
            .returning(move |_| Ok(Some(sample_book(book_id, Uuid::new_v4()))));
        books
            .expect_delete()
            .with(eq(book_id))
            .returning(|_| Ok(()));

        let service = BookManager::new(Arc::new(ReposWith::with_books(books)));
        assert!(service.delete_book(&caller, "a-book").await.is_ok());
    }

    #[tokio::test]
    async fn missing_book_is_not_found() {
        let caller = principal(UserRole::Author);

        let mut books = MockBookRepository::new();
        books.expect_find_by_slug().returning(|_| Ok(None));

        let service = BookManager::new(Arc::new(ReposWith::with_books(books)));
        let result = service.delete_book(&caller, "ghost").await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    fn sample_book_draft(slug: &str) -> NewBook {
        NewBook {
            slug: slug.to_string(),
            title: "A Book".into(),
            description: "About something".into(),
            content: "Contents".into(),
            language: crate::domain::Language::English,
            pages: Some(250),
            publication_date: chrono::NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            publisher: None,
            is_available: true,
        }
    }
}
