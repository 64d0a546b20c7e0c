//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod book;
pub mod favorite;
pub mod password;
pub mod principal;
pub mod review;
pub mod user;

pub use book::{Book, BookChanges, BookDetail, BookFilter, BookResponse, Language, NewBook};
pub use favorite::{
    Favorite, FavoriteChanges, FavoriteDetail, FavoriteFilter, FavoriteReason, FavoriteResponse,
    NewFavorite,
};
pub use password::Password;
pub use principal::{ensure_admin, ensure_owner, ensure_role, Principal};
pub use review::{NewReview, Review, ReviewChanges, ReviewDetail, ReviewFilter, ReviewResponse};
pub use user::{NewUser, User, UserChanges, UserDetail, UserResponse, UserRole};
