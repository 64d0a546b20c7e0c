//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod book_repository;
pub(crate) mod entities;
mod favorite_repository;
mod review_repository;
mod user_repository;

pub use book_repository::{BookRepository, BookStore};
pub use favorite_repository::{FavoriteRepository, FavoriteStore};
pub use review_repository::{ReviewRepository, ReviewStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use book_repository::MockBookRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use favorite_repository::MockFavoriteRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use review_repository::MockReviewRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
