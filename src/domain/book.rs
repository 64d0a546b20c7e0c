//! Book domain entity and related types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::types::Expandable;

use super::review::ReviewResponse;
use super::user::UserResponse;
use super::{Review, User};

/// Languages a book can be published in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Spanish,
    French,
    German,
    Italian,
    Portuguese,
    Russian,
    Chinese,
    Japanese,
    Arabic,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Spanish => "spanish",
            Language::French => "french",
            Language::German => "german",
            Language::Italian => "italian",
            Language::Portuguese => "portuguese",
            Language::Russian => "russian",
            Language::Chinese => "chinese",
            Language::Japanese => "japanese",
            Language::Arabic => "arabic",
        }
    }
}

impl From<&str> for Language {
    fn from(s: &str) -> Self {
        match s {
            "spanish" => Language::Spanish,
            "french" => Language::French,
            "german" => Language::German,
            "italian" => Language::Italian,
            "portuguese" => Language::Portuguese,
            "russian" => Language::Russian,
            "chinese" => Language::Chinese,
            "japanese" => Language::Japanese,
            "arabic" => Language::Arabic,
            _ => Language::English,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Book domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub author_id: Uuid,
    pub description: String,
    pub content: String,
    pub language: Language,
    pub pages: Option<i32>,
    pub publication_date: NaiveDate,
    pub publisher: Option<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for inserting a new book (the author is taken from the caller)
#[derive(Debug, Clone)]
pub struct NewBook {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub language: Language,
    pub pages: Option<i32>,
    pub publication_date: NaiveDate,
    pub publisher: Option<String>,
    pub is_available: bool,
}

/// Field changes for a book update; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct BookChanges {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub language: Option<Language>,
    pub pages: Option<i32>,
    pub publication_date: Option<NaiveDate>,
    pub publisher: Option<String>,
    pub is_available: Option<bool>,
}

/// Query-by-example filter for book listings
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    /// Case-insensitive substring search over title, description and content
    pub search: Option<String>,
    pub title: Option<String>,
    pub author: Option<Uuid>,
    pub language: Option<Language>,
    pub publisher: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub is_available: Option<bool>,
}

/// Book with optionally expanded relations
#[derive(Debug, Clone)]
pub struct BookDetail {
    pub book: Book,
    pub author: Option<User>,
    pub reviews: Option<Vec<Review>>,
}

impl From<Book> for BookDetail {
    fn from(book: Book) -> Self {
        Self {
            book,
            author: None,
            reviews: None,
        }
    }
}

/// Book response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookResponse {
    pub id: Uuid,
    /// URL-friendly unique identifier
    #[schema(example = "the-name-of-the-wind")]
    pub slug: String,
    #[schema(example = "The Name of the Wind")]
    pub title: String,
    /// Author reference: a bare UUID, or the full user when expanded
    #[schema(value_type = String)]
    pub author: Expandable<UserResponse>,
    pub description: String,
    pub content: String,
    pub language: Language,
    pub pages: Option<i32>,
    pub publication_date: NaiveDate,
    pub publisher: Option<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Reviews of this book (present only when expanded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<ReviewResponse>>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            slug: book.slug,
            title: book.title,
            author: Expandable::Reference(book.author_id),
            description: book.description,
            content: book.content,
            language: book.language,
            pages: book.pages,
            publication_date: book.publication_date,
            publisher: book.publisher,
            is_available: book.is_available,
            created_at: book.created_at,
            updated_at: book.updated_at,
            reviews: None,
        }
    }
}

impl From<BookDetail> for BookResponse {
    fn from(detail: BookDetail) -> Self {
        let author = detail.author;
        let reviews = detail.reviews;
        let mut response = BookResponse::from(detail.book);
        if let Some(author) = author {
            response.author = Expandable::Expanded(UserResponse::from(author));
        }
        response.reviews =
            reviews.map(|reviews| reviews.into_iter().map(ReviewResponse::from).collect());
        response
    }
}
