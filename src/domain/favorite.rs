//! Favorite domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::types::Expandable;

use super::book::BookResponse;
use super::user::UserResponse;
use super::{Book, User};

/// Why a book was added to a user's favorites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteReason {
    Recommended,
    Reading,
    Listing,
    Interesting,
    Purchasing,
    Gift,
    Collection,
    Other,
}

impl FavoriteReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FavoriteReason::Recommended => "recommended",
            FavoriteReason::Reading => "reading",
            FavoriteReason::Listing => "listing",
            FavoriteReason::Interesting => "interesting",
            FavoriteReason::Purchasing => "purchasing",
            FavoriteReason::Gift => "gift",
            FavoriteReason::Collection => "collection",
            FavoriteReason::Other => "other",
        }
    }
}

impl From<&str> for FavoriteReason {
    fn from(s: &str) -> Self {
        match s {
            "recommended" => FavoriteReason::Recommended,
            "reading" => FavoriteReason::Reading,
            "listing" => FavoriteReason::Listing,
            "interesting" => FavoriteReason::Interesting,
            "purchasing" => FavoriteReason::Purchasing,
            "gift" => FavoriteReason::Gift,
            "collection" => FavoriteReason::Collection,
            _ => FavoriteReason::Other,
        }
    }
}

impl std::fmt::Display for FavoriteReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for FavoriteReason {
    fn default() -> Self {
        FavoriteReason::Other
    }
}

/// Favorite domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub reason: FavoriteReason,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for inserting a new favorite (the owner is taken from the caller)
#[derive(Debug, Clone)]
pub struct NewFavorite {
    pub book_id: Uuid,
    pub reason: FavoriteReason,
    pub notes: Option<String>,
}

/// Field changes for a favorite update; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct FavoriteChanges {
    pub reason: Option<FavoriteReason>,
    pub notes: Option<String>,
}

/// Query-by-example filter for favorite listings.
///
/// The `user` filter is only honored for admins; everyone else is scoped
/// to their own favorites by the service layer.
#[derive(Debug, Clone, Default)]
pub struct FavoriteFilter {
    pub user: Option<Uuid>,
    pub book: Option<Uuid>,
    pub reason: Option<FavoriteReason>,
}

/// Favorite with optionally expanded relations
#[derive(Debug, Clone)]
pub struct FavoriteDetail {
    pub favorite: Favorite,
    pub book: Option<Book>,
    pub user: Option<User>,
}

impl From<Favorite> for FavoriteDetail {
    fn from(favorite: Favorite) -> Self {
        Self {
            favorite,
            book: None,
            user: None,
        }
    }
}

/// Favorite response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FavoriteResponse {
    pub id: Uuid,
    /// Owner reference: a bare UUID, or the full user when expanded
    #[schema(value_type = String)]
    pub user: Expandable<UserResponse>,
    /// Book reference: a bare UUID, or the full book when expanded
    #[schema(value_type = String)]
    pub book: Expandable<BookResponse>,
    pub reason: FavoriteReason,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Favorite> for FavoriteResponse {
    fn from(favorite: Favorite) -> Self {
        Self {
            id: favorite.id,
            user: Expandable::Reference(favorite.user_id),
            book: Expandable::Reference(favorite.book_id),
            reason: favorite.reason,
            notes: favorite.notes,
            created_at: favorite.created_at,
            updated_at: favorite.updated_at,
        }
    }
}

impl From<FavoriteDetail> for FavoriteResponse {
    fn from(detail: FavoriteDetail) -> Self {
        let book = detail.book;
        let user = detail.user;
        let mut response = FavoriteResponse::from(detail.favorite);
        if let Some(book) = book {
            response.book = Expandable::Expanded(BookResponse::from(book));
        }
        if let Some(user) = user {
            response.user = Expandable::Expanded(UserResponse::from(user));
        }
        response
    }
}
