//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, book_handler, favorite_handler, review_handler, user_handler,
};
use crate::domain::{
    BookResponse, FavoriteReason, FavoriteResponse, Language, ReviewResponse, UserResponse,
    UserRole,
};
use crate::services::TokenResponse;
use crate::types::{MessageResponse, PaginationMeta};

/// OpenAPI documentation for the book-store API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookstore API",
        version = "0.1.0",
        description = "Book-store management API with JWT authentication and role-based permissions",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "API Support", email = "support@example.com")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::refresh,
        auth_handler::verify,
        // User endpoints
        user_handler::get_current_user,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::delete_user,
        // Book endpoints
        book_handler::list_books,
        book_handler::create_book,
        book_handler::get_book,
        book_handler::update_book,
        book_handler::delete_book,
        // Review endpoints
        review_handler::list_reviews,
        review_handler::create_review,
        review_handler::get_review,
        review_handler::update_review,
        review_handler::delete_review,
        // Favorite endpoints
        favorite_handler::list_favorites,
        favorite_handler::create_favorite,
        favorite_handler::get_favorite,
        favorite_handler::update_favorite,
        favorite_handler::delete_favorite,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            Language,
            FavoriteReason,
            UserResponse,
            BookResponse,
            ReviewResponse,
            FavoriteResponse,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::RefreshRequest,
            auth_handler::VerifyRequest,
            TokenResponse,
            // Request types
            user_handler::UpdateUserRequest,
            book_handler::CreateBookRequest,
            book_handler::UpdateBookRequest,
            review_handler::CreateReviewRequest,
            review_handler::UpdateReviewRequest,
            favorite_handler::CreateFavoriteRequest,
            favorite_handler::UpdateFavoriteRequest,
            // Shared types
            MessageResponse,
            PaginationMeta,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and token lifecycle"),
        (name = "Users", description = "User account management"),
        (name = "Books", description = "Book catalog management"),
        (name = "Reviews", description = "Book reviews"),
        (name = "Favorites", description = "User favorites")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
