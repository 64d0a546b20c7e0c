//! Infrastructure layer - External systems integration
//!
//! This module handles database connections, repositories and migrations.

pub mod db;
pub mod persistence;
pub mod repositories;

pub use db::{Database, Migrator};
pub use persistence::{Persistence, Repositories};
pub use repositories::{BookRepository, FavoriteRepository, ReviewRepository, UserRepository};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockBookRepository, MockFavoriteRepository, MockReviewRepository, MockUserRepository,
};
