//! Central repository access for the service layer.
//!
//! Services depend on this single trait instead of individual stores,
//! keeping construction in one place. Transactional coordination is
//! deliberately absent: uniqueness is enforced by database constraints
//! (surfaced as conflicts by the error layer) and request handling is
//! strictly per-call.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::repositories::{
    BookRepository, BookStore, FavoriteRepository, FavoriteStore, ReviewRepository, ReviewStore,
    UserRepository, UserStore,
};

/// Repository hub trait for dependency injection.
pub trait Repositories: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get book repository
    fn books(&self) -> Arc<dyn BookRepository>;

    /// Get review repository
    fn reviews(&self) -> Arc<dyn ReviewRepository>;

    /// Get favorite repository
    fn favorites(&self) -> Arc<dyn FavoriteRepository>;
}

/// Concrete repository hub backed by a shared database connection.
pub struct Persistence {
    user_repo: Arc<UserStore>,
    book_repo: Arc<BookStore>,
    review_repo: Arc<ReviewStore>,
    favorite_repo: Arc<FavoriteStore>,
}

impl Persistence {
    /// Create repositories over the given connection.
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            book_repo: Arc::new(BookStore::new(db.clone())),
            review_repo: Arc::new(ReviewStore::new(db.clone())),
            favorite_repo: Arc::new(FavoriteStore::new(db)),
        }
    }
}

impl Repositories for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn books(&self) -> Arc<dyn BookRepository> {
        self.book_repo.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewRepository> {
        self.review_repo.clone()
    }

    fn favorites(&self) -> Arc<dyn FavoriteRepository> {
        self.favorite_repo.clone()
    }
}
