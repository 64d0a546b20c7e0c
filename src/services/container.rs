//! Service container - centralized service construction and access.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, BookManager, BookService, FavoriteManager, FavoriteService,
    ReviewManager, ReviewService, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get book service
    fn books(&self) -> Arc<dyn BookService>;

    /// Get review service
    fn reviews(&self) -> Arc<dyn ReviewService>;

    /// Get favorite service
    fn favorites(&self) -> Arc<dyn FavoriteService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    book_service: Arc<dyn BookService>,
    review_service: Arc<dyn ReviewService>,
    favorite_service: Arc<dyn FavoriteService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        book_service: Arc<dyn BookService>,
        review_service: Arc<dyn ReviewService>,
        favorite_service: Arc<dyn FavoriteService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            book_service,
            review_service,
            favorite_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let repos = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(repos.clone(), config)),
            user_service: Arc::new(UserManager::new(repos.clone())),
            book_service: Arc::new(BookManager::new(repos.clone())),
            review_service: Arc::new(ReviewManager::new(repos.clone())),
            favorite_service: Arc::new(FavoriteManager::new(repos)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn books(&self) -> Arc<dyn BookService> {
        self.book_service.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewService> {
        self.review_service.clone()
    }

    fn favorites(&self) -> Arc<dyn FavoriteService> {
        self.favorite_service.clone()
    }
}
