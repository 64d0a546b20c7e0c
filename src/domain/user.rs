//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{ROLE_ADMIN, ROLE_AUTHOR, ROLE_OTHER, ROLE_REVIEWER};

use super::book::BookResponse;
use super::favorite::FavoriteResponse;
use super::review::ReviewResponse;
use super::{Book, Favorite, Review};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Author,
    Reviewer,
    Other,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => ROLE_ADMIN,
            UserRole::Author => ROLE_AUTHOR,
            UserRole::Reviewer => ROLE_REVIEWER,
            UserRole::Other => ROLE_OTHER,
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            ROLE_AUTHOR => UserRole::Author,
            ROLE_REVIEWER => UserRole::Reviewer,
            _ => UserRole::Other,
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Data for inserting a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Field changes for a user update; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

/// User with optionally expanded reverse relations
#[derive(Debug, Clone)]
pub struct UserDetail {
    pub user: User,
    pub books: Option<Vec<Book>>,
    pub reviews: Option<Vec<Review>>,
    pub favorites: Option<Vec<Favorite>>,
}

impl From<User> for UserDetail {
    fn from(user: User) -> Self {
        Self {
            user,
            books: None,
            reviews: None,
            favorites: None,
        }
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// Unique login name
    #[schema(example = "jdoe")]
    pub username: String,
    /// User email address
    #[schema(example = "user@example.com")]
    pub email: String,
    /// User role
    pub role: UserRole,
    /// Whether the account is active
    pub is_active: bool,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
    /// Books written by this user (present only when expanded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books: Option<Vec<BookResponse>>,
    /// Reviews written by this user (present only when expanded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<ReviewResponse>>,
    /// Favorites of this user (present only when expanded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorites: Option<Vec<FavoriteResponse>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
            books: None,
            reviews: None,
            favorites: None,
        }
    }
}

impl From<UserDetail> for UserResponse {
    fn from(detail: UserDetail) -> Self {
        let mut response = UserResponse::from(detail.user);
        response.books = detail
            .books
            .map(|books| books.into_iter().map(BookResponse::from).collect());
        response.reviews = detail
            .reviews
            .map(|reviews| reviews.into_iter().map(ReviewResponse::from).collect());
        response.favorites = detail
            .favorites
            .map(|favorites| favorites.into_iter().map(FavoriteResponse::from).collect());
        response
    }
}
