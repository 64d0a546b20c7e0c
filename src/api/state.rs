//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AuthService, BookService, FavoriteService, ReviewService, ServiceContainer, Services,
    UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Book service
    pub book_service: Arc<dyn BookService>,
    /// Review service
    pub review_service: Arc<dyn ReviewService>,
    /// Favorite service
    pub favorite_service: Arc<dyn FavoriteService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from a database connection and config.
    ///
    /// This is the recommended way to create AppState as it wires every
    /// service through the shared repository hub.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let services = Services::from_connection(database.get_connection(), config);

        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            book_service: services.books(),
            review_service: services.reviews(),
            favorite_service: services.favorites(),
            database,
        }
    }

    /// Create application state with manually injected services (tests).
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        book_service: Arc<dyn BookService>,
        review_service: Arc<dyn ReviewService>,
        favorite_service: Arc<dyn FavoriteService>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            book_service,
            review_service,
            favorite_service,
            database,
        }
    }
}
