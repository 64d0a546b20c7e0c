//! Review handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{NewReview, Principal, ReviewChanges, ReviewFilter, ReviewResponse};
use crate::errors::AppResult;
use crate::types::{Expand, ExpandQuery, NoContent, Paginated, PaginationParams};

/// Relations a review endpoint may expand
const REVIEW_EXPANDS: &[&str] = &["book", "reviewer"];

/// Review creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReviewRequest {
    /// The reviewed book
    pub book: Uuid,
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[schema(example = "A must-read")]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    /// Star rating in [1, 5]
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    #[schema(example = 5)]
    pub rating: i16,
    /// Defaults to false when omitted
    pub is_trusted: Option<bool>,
}

impl From<CreateReviewRequest> for NewReview {
    fn from(payload: CreateReviewRequest) -> Self {
        NewReview {
            book_id: payload.book,
            title: payload.title,
            content: payload.content,
            rating: payload.rating,
            is_trusted: payload.is_trusted.unwrap_or(false),
        }
    }
}

/// Review update request; omitted fields are left untouched
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReviewRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i16>,
    pub is_trusted: Option<bool>,
}

impl From<UpdateReviewRequest> for ReviewChanges {
    fn from(payload: UpdateReviewRequest) -> Self {
        ReviewChanges {
            title: payload.title,
            content: payload.content,
            rating: payload.rating,
            is_trusted: payload.is_trusted,
        }
    }
}

/// Review list filters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewFilterQuery {
    /// Filter by book id
    pub book: Option<Uuid>,
    /// Filter by reviewer id
    pub reviewer: Option<Uuid>,
    /// Filter by rating
    pub rating: Option<i16>,
    /// Filter by trusted flag
    pub is_trusted: Option<bool>,
}

impl From<ReviewFilterQuery> for ReviewFilter {
    fn from(query: ReviewFilterQuery) -> Self {
        ReviewFilter {
            book: query.book,
            reviewer: query.reviewer,
            rating: query.rating,
            is_trusted: query.is_trusted,
        }
    }
}

/// Create review routes
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reviews).post(create_review))
        .route(
            "/:id",
            get(get_review)
                .put(update_review)
                .patch(update_review)
                .delete(delete_review),
        )
}

/// List reviews
#[utoipa::path(
    get,
    path = "/reviews",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    params(ReviewFilterQuery, PaginationParams, ExpandQuery),
    responses(
        (status = 200, description = "Paginated list of reviews"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(filter): Query<ReviewFilterQuery>,
    Query(page): Query<PaginationParams>,
    Query(expand): Query<ExpandQuery>,
) -> AppResult<Json<Paginated<ReviewResponse>>> {
    let expand = Expand::parse(&expand, REVIEW_EXPANDS);
    let filter = ReviewFilter::from(filter);

    let (reviews, total) = state
        .review_service
        .list_reviews(&filter, &page, &expand)
        .await?;
    let data = reviews.into_iter().map(ReviewResponse::from).collect();

    Ok(Json(Paginated::new(data, &page, total)))
}

/// Create a review (reviewer role required; the caller becomes the reviewer)
#[utoipa::path(
    post,
    path = "/reviews",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ReviewResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Reviewer role required"),
        (status = 409, description = "Book already reviewed by this user")
    )
)]
pub async fn create_review(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<ReviewResponse>)> {
    let review = state
        .review_service
        .create_review(&principal, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(ReviewResponse::from(review))))
}

/// Get a review by id
#[utoipa::path(
    get,
    path = "/reviews/{id}",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Review ID"),
        ExpandQuery
    ),
    responses(
        (status = 200, description = "Review details", body = ReviewResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(expand): Query<ExpandQuery>,
) -> AppResult<Json<ReviewResponse>> {
    let expand = Expand::parse(&expand, REVIEW_EXPANDS);
    let detail = state.review_service.get_review(id, &expand).await?;

    Ok(Json(ReviewResponse::from(detail)))
}

/// Update a review (its creator or admin)
#[utoipa::path(
    put,
    path = "/reviews/{id}",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ReviewResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Not the review's creator"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn update_review(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateReviewRequest>,
) -> AppResult<Json<ReviewResponse>> {
    let review = state
        .review_service
        .update_review(&principal, id, payload.into())
        .await?;

    Ok(Json(ReviewResponse::from(review)))
}

/// Delete a review (its creator or admin)
#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Not the review's creator"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn delete_review(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.review_service.delete_review(&principal, id).await?;

    Ok(NoContent)
}
