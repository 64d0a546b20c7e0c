//! Book handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{BookChanges, BookFilter, BookResponse, Language, NewBook, Principal};
use crate::errors::AppResult;
use crate::types::{Expand, ExpandQuery, NoContent, Paginated, PaginationParams};

/// Relations a book endpoint may expand
const BOOK_EXPANDS: &[&str] = &["author", "reviews"];

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"));

fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if SLUG_RE.is_match(slug) {
        Ok(())
    } else {
        Err(ValidationError::new("slug"))
    }
}

/// Book creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookRequest {
    /// URL-friendly unique identifier
    #[validate(
        length(min = 1, max = 250, message = "Slug must be 1-250 characters"),
        custom(function = validate_slug, message = "Slug must be lowercase letters, digits and hyphens")
    )]
    #[schema(example = "the-name-of-the-wind")]
    pub slug: String,
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[schema(example = "The Name of the Wind")]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub language: Language,
    /// Number of pages
    #[validate(range(min = 1, message = "Pages must be positive"))]
    #[schema(example = 662)]
    pub pages: Option<i32>,
    pub publication_date: NaiveDate,
    #[validate(length(max = 200, message = "Publisher must be at most 200 characters"))]
    pub publisher: Option<String>,
    /// Defaults to true when omitted
    pub is_available: Option<bool>,
}

impl From<CreateBookRequest> for NewBook {
    fn from(payload: CreateBookRequest) -> Self {
        NewBook {
            slug: payload.slug,
            title: payload.title,
            description: payload.description,
            content: payload.content,
            language: payload.language,
            pages: payload.pages,
            publication_date: payload.publication_date,
            publisher: payload.publisher,
            is_available: payload.is_available.unwrap_or(true),
        }
    }
}

/// Book update request; omitted fields are left untouched
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBookRequest {
    #[validate(
        length(min = 1, max = 250, message = "Slug must be 1-250 characters"),
        custom(function = validate_slug, message = "Slug must be lowercase letters, digits and hyphens")
    )]
    pub slug: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: Option<String>,
    pub language: Option<Language>,
    #[validate(range(min = 1, message = "Pages must be positive"))]
    pub pages: Option<i32>,
    pub publication_date: Option<NaiveDate>,
    #[validate(length(max = 200, message = "Publisher must be at most 200 characters"))]
    pub publisher: Option<String>,
    pub is_available: Option<bool>,
}

impl From<UpdateBookRequest> for BookChanges {
    fn from(payload: UpdateBookRequest) -> Self {
        BookChanges {
            slug: payload.slug,
            title: payload.title,
            description: payload.description,
            content: payload.content,
            language: payload.language,
            pages: payload.pages,
            publication_date: payload.publication_date,
            publisher: payload.publisher,
            is_available: payload.is_available,
        }
    }
}

/// Book list filters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookFilterQuery {
    /// Case-insensitive substring search over title, description and content
    pub search: Option<String>,
    /// Exact title match
    pub title: Option<String>,
    /// Filter by author id
    pub author: Option<Uuid>,
    /// Filter by language
    pub language: Option<Language>,
    /// Exact publisher match
    pub publisher: Option<String>,
    /// Filter by publication date
    pub publication_date: Option<NaiveDate>,
    /// Filter by availability
    pub is_available: Option<bool>,
}

impl From<BookFilterQuery> for BookFilter {
    fn from(query: BookFilterQuery) -> Self {
        BookFilter {
            search: query.search,
            title: query.title,
            author: query.author,
            language: query.language,
            publisher: query.publisher,
            publication_date: query.publication_date,
            is_available: query.is_available,
        }
    }
}

/// Create book routes
pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/:slug",
            get(get_book)
                .put(update_book)
                .patch(update_book)
                .delete(delete_book),
        )
}

/// List books
#[utoipa::path(
    get,
    path = "/books",
    tag = "Books",
    security(("bearer_auth" = [])),
    params(BookFilterQuery, PaginationParams, ExpandQuery),
    responses(
        (status = 200, description = "Paginated list of books"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(filter): Query<BookFilterQuery>,
    Query(page): Query<PaginationParams>,
    Query(expand): Query<ExpandQuery>,
) -> AppResult<Json<Paginated<BookResponse>>> {
    let expand = Expand::parse(&expand, BOOK_EXPANDS);
    let filter = BookFilter::from(filter);

    let (books, total) = state.book_service.list_books(&filter, &page, &expand).await?;
    let data = books.into_iter().map(BookResponse::from).collect();

    Ok(Json(Paginated::new(data, &page, total)))
}

/// Create a book (author role required; the caller becomes the author)
#[utoipa::path(
    post,
    path = "/books",
    tag = "Books",
    security(("bearer_auth" = [])),
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created", body = BookResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Author role required"),
        (status = 409, description = "Slug already taken")
    )
)]
pub async fn create_book(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateBookRequest>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    let book = state
        .book_service
        .create_book(&principal, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(BookResponse::from(book))))
}

/// Get a book by slug
#[utoipa::path(
    get,
    path = "/books/{slug}",
    tag = "Books",
    security(("bearer_auth" = [])),
    params(
        ("slug" = String, Path, description = "Book slug"),
        ExpandQuery
    ),
    responses(
        (status = 200, description = "Book details", body = BookResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(expand): Query<ExpandQuery>,
) -> AppResult<Json<BookResponse>> {
    let expand = Expand::parse(&expand, BOOK_EXPANDS);
    let detail = state.book_service.get_book(&slug, &expand).await?;

    Ok(Json(BookResponse::from(detail)))
}

/// Update a book (its author or admin)
#[utoipa::path(
    put,
    path = "/books/{slug}",
    tag = "Books",
    security(("bearer_auth" = [])),
    params(
        ("slug" = String, Path, description = "Book slug")
    ),
    request_body = UpdateBookRequest,
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Not the book's author"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Slug already taken")
    )
)]
pub async fn update_book(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateBookRequest>,
) -> AppResult<Json<BookResponse>> {
    let book = state
        .book_service
        .update_book(&principal, &slug, payload.into())
        .await?;

    Ok(Json(BookResponse::from(book)))
}

/// Delete a book (its author or admin)
#[utoipa::path(
    delete,
    path = "/books/{slug}",
    tag = "Books",
    security(("bearer_auth" = [])),
    params(
        ("slug" = String, Path, description = "Book slug")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Not the book's author"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<NoContent> {
    state.book_service.delete_book(&principal, &slug).await?;

    Ok(NoContent)
}
