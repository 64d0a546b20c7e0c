//! User handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Principal, UserResponse, UserRole};
use crate::errors::AppResult;
use crate::services::UserUpdate;
use crate::types::{Expand, ExpandQuery, NoContent, Paginated, PaginationParams};

/// Relations a user endpoint may expand
const USER_EXPANDS: &[&str] = &["books", "reviews", "favorites"];

/// User update request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    /// New login name
    #[validate(length(min = 3, max = 200, message = "Username must be 3-200 characters"))]
    #[schema(example = "jdoe")]
    pub username: Option<String>,
    /// New email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: Option<String>,
    /// New password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    /// New role (admin only)
    #[schema(example = "reviewer")]
    pub role: Option<UserRole>,
    /// Account activation flag (admin only)
    pub is_active: Option<bool>,
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(payload: UpdateUserRequest) -> Self {
        UserUpdate {
            username: payload.username,
            email: payload.email,
            password: payload.password,
            role: payload.role,
            is_active: payload.is_active,
        }
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/me", get(get_current_user))
        .route(
            "/:id",
            get(get_user)
                .put(update_user)
                .patch(update_user)
                .delete(delete_user),
        )
}

/// Get current authenticated user
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(ExpandQuery),
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_current_user(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(expand): Query<ExpandQuery>,
) -> AppResult<Json<UserResponse>> {
    let expand = Expand::parse(&expand, USER_EXPANDS);
    let detail = state.user_service.get_profile(&principal, &expand).await?;

    Ok(Json(UserResponse::from(detail)))
}

/// List users
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated list of users"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    let (users, total) = state.user_service.list_users(&page).await?;
    let data = users.into_iter().map(UserResponse::from).collect();

    Ok(Json(Paginated::new(data, &page, total)))
}

/// Get user by ID (own profile or admin)
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID"),
        ExpandQuery
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Can only view own profile unless admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(expand): Query<ExpandQuery>,
) -> AppResult<Json<UserResponse>> {
    let expand = Expand::parse(&expand, USER_EXPANDS);
    let detail = state.user_service.get_user(&principal, id, &expand).await?;

    Ok(Json(UserResponse::from(detail)))
}

/// Update user (own profile; role and activation changes admin only)
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Can only update own profile unless admin"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username or email already taken")
    )
)]
pub async fn update_user(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .user_service
        .update_user(&principal, id, payload.into())
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// Delete user (own account or admin)
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted successfully"),
        (status = 400, description = "Admins cannot delete their own account"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.user_service.delete_user(&principal, id).await?;

    Ok(NoContent)
}
