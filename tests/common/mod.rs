//! Shared test fixtures: in-memory repositories and service wiring.
//!
//! These fakes implement the repository traits over plain vectors so the
//! real service implementations can be exercised without a database.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use bookstore_api::domain::{
    Book, BookChanges, BookFilter, Favorite, FavoriteChanges, FavoriteFilter, NewBook,
    NewFavorite, NewReview, NewUser, Principal, Review, ReviewChanges, ReviewFilter, User,
    UserChanges, UserRole,
};
use bookstore_api::errors::{AppError, AppResult};
use bookstore_api::infra::{
    BookRepository, FavoriteRepository, Repositories, ReviewRepository, UserRepository,
};
use bookstore_api::types::PaginationParams;

fn paginate<T: Clone>(items: &[T], page: &PaginationParams) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let data = items
        .iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .cloned()
        .collect();
    (data, total)
}

#[derive(Default)]
pub struct MemoryUsers {
    rows: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == identifier || u.email == identifier)
            .cloned())
    }

    async fn identity_taken(&self, username: &str, email: &str) -> AppResult<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.username == username || u.email == email))
    }

    async fn list(&self, page: &PaginationParams) -> AppResult<(Vec<User>, u64)> {
        let rows = self.rows.lock().unwrap();
        Ok(paginate(&rows, page))
    }

    async fn create(&self, new: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        let mut rows = self.rows.lock().unwrap();
        let user = rows
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::NotFound)?;

        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(is_active) = changes.is_active {
            user.is_active = is_active;
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|u| u.id != id);
        if rows.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryBooks {
    rows: Mutex<Vec<Book>>,
}

impl MemoryBooks {
    fn matches(book: &Book, filter: &BookFilter) -> bool {
        if let Some(search) = &filter.search {
            let needle = search.to_lowercase();
            let haystack = format!(
                "{} {} {}",
                book.title.to_lowercase(),
                book.description.to_lowercase(),
                book.content.to_lowercase()
            );
            if !haystack.contains(&needle) {
                return false;
            }
        }
        if let Some(title) = &filter.title {
            if &book.title != title {
                return false;
            }
        }
        if let Some(author) = filter.author {
            if book.author_id != author {
                return false;
            }
        }
        if let Some(language) = filter.language {
            if book.language != language {
                return false;
            }
        }
        if let Some(publisher) = &filter.publisher {
            if book.publisher.as_deref() != Some(publisher.as_str()) {
                return false;
            }
        }
        if let Some(publication_date) = filter.publication_date {
            if book.publication_date != publication_date {
                return false;
            }
        }
        if let Some(is_available) = filter.is_available {
            if book.is_available != is_available {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl BookRepository for MemoryBooks {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self.rows.lock().unwrap().iter().find(|b| b.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Book>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.slug == slug)
            .cloned())
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Book>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|b| ids.contains(&b.id))
            .cloned()
            .collect())
    }

    async fn list(
        &self,
        filter: &BookFilter,
        page: &PaginationParams,
    ) -> AppResult<(Vec<Book>, u64)> {
        let rows = self.rows.lock().unwrap();
        let filtered: Vec<Book> = rows
            .iter()
            .filter(|b| Self::matches(b, filter))
            .cloned()
            .collect();
        Ok(paginate(&filtered, page))
    }

    async fn list_by_authors(&self, author_ids: Vec<Uuid>) -> AppResult<Vec<Book>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|b| author_ids.contains(&b.author_id))
            .cloned()
            .collect())
    }

    async fn create(&self, new: NewBook, author_id: Uuid) -> AppResult<Book> {
        let now = Utc::now();
        let book = Book {
            id: Uuid::new_v4(),
            slug: new.slug,
            title: new.title,
            author_id,
            description: new.description,
            content: new.content,
            language: new.language,
            pages: new.pages,
            publication_date: new.publication_date,
            publisher: new.publisher,
            is_available: new.is_available,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(book.clone());
        Ok(book)
    }

    async fn update(&self, id: Uuid, changes: BookChanges) -> AppResult<Book> {
        let mut rows = self.rows.lock().unwrap();
        let book = rows
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(AppError::NotFound)?;

        if let Some(slug) = changes.slug {
            book.slug = slug;
        }
        if let Some(title) = changes.title {
            book.title = title;
        }
        if let Some(description) = changes.description {
            book.description = description;
        }
        if let Some(content) = changes.content {
            book.content = content;
        }
        if let Some(language) = changes.language {
            book.language = language;
        }
        if let Some(pages) = changes.pages {
            book.pages = Some(pages);
        }
        if let Some(publication_date) = changes.publication_date {
            book.publication_date = publication_date;
        }
        if let Some(publisher) = changes.publisher {
            book.publisher = Some(publisher);
        }
        if let Some(is_available) = changes.is_available {
            book.is_available = is_available;
        }
        book.updated_at = Utc::now();

        Ok(book.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|b| b.id != id);
        if rows.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryReviews {
    rows: Mutex<Vec<Review>>,
}

#[async_trait]
impl ReviewRepository for MemoryReviews {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Review>> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn list(
        &self,
        filter: &ReviewFilter,
        page: &PaginationParams,
    ) -> AppResult<(Vec<Review>, u64)> {
        let rows = self.rows.lock().unwrap();
        let filtered: Vec<Review> = rows
            .iter()
            .filter(|r| {
                filter.book.map_or(true, |book| r.book_id == book)
                    && filter.reviewer.map_or(true, |reviewer| r.reviewer_id == reviewer)
                    && filter.rating.map_or(true, |rating| r.rating == rating)
                    && filter
                        .is_trusted
                        .map_or(true, |is_trusted| r.is_trusted == is_trusted)
            })
            .cloned()
            .collect();
        Ok(paginate(&filtered, page))
    }

    async fn list_by_books(&self, book_ids: Vec<Uuid>) -> AppResult<Vec<Review>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| book_ids.contains(&r.book_id))
            .cloned()
            .collect())
    }

    async fn list_by_reviewers(&self, reviewer_ids: Vec<Uuid>) -> AppResult<Vec<Review>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| reviewer_ids.contains(&r.reviewer_id))
            .cloned()
            .collect())
    }

    async fn exists_for(&self, book_id: Uuid, reviewer_id: Uuid) -> AppResult<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.book_id == book_id && r.reviewer_id == reviewer_id))
    }

    async fn create(&self, new: NewReview, reviewer_id: Uuid) -> AppResult<Review> {
        let now = Utc::now();
        let review = Review {
            id: Uuid::new_v4(),
            book_id: new.book_id,
            reviewer_id,
            title: new.title,
            content: new.content,
            rating: new.rating,
            is_trusted: new.is_trusted,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(review.clone());
        Ok(review)
    }

    async fn update(&self, id: Uuid, changes: ReviewChanges) -> AppResult<Review> {
        let mut rows = self.rows.lock().unwrap();
        let review = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(AppError::NotFound)?;

        if let Some(title) = changes.title {
            review.title = title;
        }
        if let Some(content) = changes.content {
            review.content = content;
        }
        if let Some(rating) = changes.rating {
            review.rating = rating;
        }
        if let Some(is_trusted) = changes.is_trusted {
            review.is_trusted = is_trusted;
        }
        review.updated_at = Utc::now();

        Ok(review.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        if rows.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryFavorites {
    rows: Mutex<Vec<Favorite>>,
}

#[async_trait]
impl FavoriteRepository for MemoryFavorites {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Favorite>> {
        Ok(self.rows.lock().unwrap().iter().find(|f| f.id == id).cloned())
    }

    async fn list(
        &self,
        filter: &FavoriteFilter,
        page: &PaginationParams,
    ) -> AppResult<(Vec<Favorite>, u64)> {
        let rows = self.rows.lock().unwrap();
        let filtered: Vec<Favorite> = rows
            .iter()
            .filter(|f| {
                filter.user.map_or(true, |user| f.user_id == user)
                    && filter.book.map_or(true, |book| f.book_id == book)
                    && filter.reason.map_or(true, |reason| f.reason == reason)
            })
            .cloned()
            .collect();
        Ok(paginate(&filtered, page))
    }

    async fn list_by_users(&self, user_ids: Vec<Uuid>) -> AppResult<Vec<Favorite>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|f| user_ids.contains(&f.user_id))
            .cloned()
            .collect())
    }

    async fn exists_for(&self, user_id: Uuid, book_id: Uuid) -> AppResult<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|f| f.user_id == user_id && f.book_id == book_id))
    }

    async fn create(&self, new: NewFavorite, user_id: Uuid) -> AppResult<Favorite> {
        let now = Utc::now();
        let favorite = Favorite {
            id: Uuid::new_v4(),
            user_id,
            book_id: new.book_id,
            reason: new.reason,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(favorite.clone());
        Ok(favorite)
    }

    async fn update(&self, id: Uuid, changes: FavoriteChanges) -> AppResult<Favorite> {
        let mut rows = self.rows.lock().unwrap();
        let favorite = rows
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(AppError::NotFound)?;

        if let Some(reason) = changes.reason {
            favorite.reason = reason;
        }
        if let Some(notes) = changes.notes {
            favorite.notes = Some(notes);
        }
        favorite.updated_at = Utc::now();

        Ok(favorite.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|f| f.id != id);
        if rows.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

/// Repository hub over the in-memory fakes.
#[derive(Default)]
pub struct MemoryRepos {
    pub users: Arc<MemoryUsers>,
    pub books: Arc<MemoryBooks>,
    pub reviews: Arc<MemoryReviews>,
    pub favorites: Arc<MemoryFavorites>,
}

impl MemoryRepos {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

impl Repositories for MemoryRepos {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn books(&self) -> Arc<dyn BookRepository> {
        self.books.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewRepository> {
        self.reviews.clone()
    }

    fn favorites(&self) -> Arc<dyn FavoriteRepository> {
        self.favorites.clone()
    }
}

/// An authenticated caller with the given role.
pub fn principal_with_role(id: Uuid, role: UserRole) -> Principal {
    Principal {
        id,
        username: format!("user-{}", &id.to_string()[..8]),
        role,
    }
}

/// Seed a user directly into the fake store and return its principal.
pub async fn seed_user(repos: &Arc<MemoryRepos>, role: UserRole) -> Principal {
    let unique = Uuid::new_v4();
    let user = repos
        .users
        .create(NewUser {
            username: format!("user-{}", unique),
            email: format!("{}@example.com", unique),
            password_hash: "hashed".into(),
            role,
        })
        .await
        .unwrap();

    principal_with_role(user.id, role)
}

/// A valid book draft with the given slug.
pub fn book_draft(slug: &str) -> NewBook {
    NewBook {
        slug: slug.to_string(),
        title: "Test Book".into(),
        description: "Description for test book".into(),
        content: "Content for test book".into(),
        language: bookstore_api::domain::Language::English,
        pages: Some(250),
        publication_date: chrono::NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        publisher: Some("Test Publisher".into()),
        is_available: true,
    }
}

/// A valid review draft for the given book.
pub fn review_draft(book_id: Uuid) -> NewReview {
    NewReview {
        book_id,
        title: "Great Book".into(),
        content: "This is an excellent book with great content.".into(),
        rating: 5,
        is_trusted: false,
    }
}

/// A valid favorite draft for the given book.
pub fn favorite_draft(book_id: Uuid) -> NewFavorite {
    NewFavorite {
        book_id,
        reason: bookstore_api::domain::FavoriteReason::Reading,
        notes: None,
    }
}
