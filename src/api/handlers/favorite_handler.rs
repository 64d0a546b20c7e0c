//! Favorite handlers.

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
use crate::domain::{
    FavoriteChanges, FavoriteFilter, FavoriteReason, FavoriteResponse, NewFavorite, Principal,
};
use crate::errors::AppResult;
use crate::types::{Expand, ExpandQuery, NoContent, Paginated, PaginationParams};

/// Relations a favorite endpoint may expand
const FAVORITE_EXPANDS: &[&str] = &["book", "user"];

/// Favorite creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFavoriteRequest {
    /// The favorited book
    pub book: Uuid,
    /// Defaults to `other` when omitted
    pub reason: Option<FavoriteReason>,
    #[validate(length(min = 1, message = "Notes cannot be empty"))]
    pub notes: Option<String>,
}

impl From<CreateFavoriteRequest> for NewFavorite {
    fn from(payload: CreateFavoriteRequest) -> Self {
        NewFavorite {
            book_id: payload.book,
            reason: payload.reason.unwrap_or_default(),
            notes: payload.notes,
        }
    }
}

/// Favorite update request; omitted fields are left untouched
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateFavoriteRequest {
    pub reason: Option<FavoriteReason>,
    #[validate(length(min = 1, message = "Notes cannot be empty"))]
    pub notes: Option<String>,
}

impl From<UpdateFavoriteRequest> for FavoriteChanges {
    fn from(payload: UpdateFavoriteRequest) -> Self {
        FavoriteChanges {
            reason: payload.reason,
            notes: payload.notes,
        }
    }
}

/// Favorite list filters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FavoriteFilterQuery {
    /// Filter by owner id (admin only; ignored otherwise)
    pub user: Option<Uuid>,
    /// Filter by book id
    pub book: Option<Uuid>,
    /// Filter by reason
    pub reason: Option<FavoriteReason>,
}

impl From<FavoriteFilterQuery> for FavoriteFilter {
    fn from(query: FavoriteFilterQuery) -> Self {
        FavoriteFilter {
            user: query.user,
            book: query.book,
            reason: query.reason,
        }
    }
}

/// Create favorite routes
pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_favorites).post(create_favorite))
        .route(
            "/:id",
            get(get_favorite)
                .put(update_favorite)
                .patch(update_favorite)
                .delete(delete_favorite),
        )
}

/// List favorites (own favorites; admins see all)
#[utoipa::path(
    get,
    path = "/favorites",
    tag = "Favorites",
    security(("bearer_auth" = [])),
    params(FavoriteFilterQuery, PaginationParams, ExpandQuery),
    responses(
        (status = 200, description = "Paginated list of favorites"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_favorites(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(filter): Query<FavoriteFilterQuery>,
    Query(page): Query<PaginationParams>,
    Query(expand): Query<ExpandQuery>,
) -> AppResult<Json<Paginated<FavoriteResponse>>> {
    let expand = Expand::parse(&expand, FAVORITE_EXPANDS);
    let filter = FavoriteFilter::from(filter);

    let (favorites, total) = state
        .favorite_service
        .list_favorites(&principal, &filter, &page, &expand)
        .await?;
    let data = favorites.into_iter().map(FavoriteResponse::from).collect();

    Ok(Json(Paginated::new(data, &page, total)))
}

/// Favorite a book (owned by the caller)
#[utoipa::path(
    post,
    path = "/favorites",
    tag = "Favorites",
    security(("bearer_auth" = [])),
    request_body = CreateFavoriteRequest,
    responses(
        (status = 201, description = "Favorite created", body = FavoriteResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Book already favorited")
    )
)]
pub async fn create_favorite(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateFavoriteRequest>,
) -> AppResult<(StatusCode, Json<FavoriteResponse>)> {
    let favorite = state
        .favorite_service
        .create_favorite(&principal, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(FavoriteResponse::from(favorite))))
}

/// Get a favorite by id (owner or admin)
#[utoipa::path(
    get,
    path = "/favorites/{id}",
    tag = "Favorites",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Favorite ID"),
        ExpandQuery
    ),
    responses(
        (status = 200, description = "Favorite details", body = FavoriteResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Favorite not found")
    )
)]
pub async fn get_favorite(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(expand): Query<ExpandQuery>,
) -> AppResult<Json<FavoriteResponse>> {
    let expand = Expand::parse(&expand, FAVORITE_EXPANDS);
    let detail = state
        .favorite_service
        .get_favorite(&principal, id, &expand)
        .await?;

    Ok(Json(FavoriteResponse::from(detail)))
}

/// Update a favorite (owner or admin)
#[utoipa::path(
    put,
    path = "/favorites/{id}",
    tag = "Favorites",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Favorite ID")
    ),
    request_body = UpdateFavoriteRequest,
    responses(
        (status = 200, description = "Favorite updated", body = FavoriteResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Not the favorite's owner"),
        (status = 404, description = "Favorite not found")
    )
)]
pub async fn update_favorite(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateFavoriteRequest>,
) -> AppResult<Json<FavoriteResponse>> {
    let favorite = state
        .favorite_service
        .update_favorite(&principal, id, payload.into())
        .await?;

    Ok(Json(FavoriteResponse::from(favorite)))
}

/// Delete a favorite (owner or admin)
#[utoipa::path(
    delete,
    path = "/favorites/{id}",
    tag = "Favorites",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Favorite ID")
    ),
    responses(
        (status = 204, description = "Favorite deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Not the favorite's owner"),
        (status = 404, description = "Favorite not found")
    )
)]
pub async fn delete_favorite(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state
        .favorite_service
        .delete_favorite(&principal, id)
        .await?;

    Ok(NoContent)
}
