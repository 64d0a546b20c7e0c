//! Review domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::types::Expandable;

use super::book::BookResponse;
use super::user::UserResponse;
use super::{Book, User};

/// Review domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub book_id: Uuid,
    pub reviewer_id: Uuid,
    pub title: String,
    pub content: String,
    /// Star rating in [1, 5]
    pub rating: i16,
    pub is_trusted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for inserting a new review (the reviewer is taken from the caller)
#[derive(Debug, Clone)]
pub struct NewReview {
    pub book_id: Uuid,
    pub title: String,
    pub content: String,
    pub rating: i16,
    pub is_trusted: bool,
}

/// Field changes for a review update; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct ReviewChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub rating: Option<i16>,
    pub is_trusted: Option<bool>,
}

/// Query-by-example filter for review listings
#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub book: Option<Uuid>,
    pub reviewer: Option<Uuid>,
    pub rating: Option<i16>,
    pub is_trusted: Option<bool>,
}

/// Review with optionally expanded relations
#[derive(Debug, Clone)]
pub struct ReviewDetail {
    pub review: Review,
    pub book: Option<Book>,
    pub reviewer: Option<User>,
}

impl From<Review> for ReviewDetail {
    fn from(review: Review) -> Self {
        Self {
            review,
            book: None,
            reviewer: None,
        }
    }
}

/// Review response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewResponse {
    pub id: Uuid,
    /// Book reference: a bare UUID, or the full book when expanded
    #[schema(value_type = String)]
    pub book: Expandable<BookResponse>,
    /// Reviewer reference: a bare UUID, or the full user when expanded
    #[schema(value_type = String)]
    pub reviewer: Expandable<UserResponse>,
    #[schema(example = "A must-read")]
    pub title: String,
    pub content: String,
    /// Star rating in [1, 5]
    #[schema(example = 5)]
    pub rating: i16,
    pub is_trusted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            book: Expandable::Reference(review.book_id),
            reviewer: Expandable::Reference(review.reviewer_id),
            title: review.title,
            content: review.content,
            rating: review.rating,
            is_trusted: review.is_trusted,
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}

impl From<ReviewDetail> for ReviewResponse {
    fn from(detail: ReviewDetail) -> Self {
        let book = detail.book;
        let reviewer = detail.reviewer;
        let mut response = ReviewResponse::from(detail.review);
        if let Some(book) = book {
            response.book = Expandable::Expanded(BookResponse::from(book));
        }
        if let Some(reviewer) = reviewer {
            response.reviewer = Expandable::Expanded(UserResponse::from(reviewer));
        }
        response
    }
}
