//! User service - account management use cases.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    ensure_admin, ensure_owner, Password, Principal, User, UserChanges, UserDetail, UserRole,
};
use crate::errors::{AppError, AppResult};
use crate::infra::Repositories;
use crate::types::{Expand, PaginationParams};

/// Requested changes to a user account.
///
/// Role and activation changes are admin-only; the password is hashed by
/// the service before it reaches the repository.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// List users, oldest account first
    async fn list_users(&self, page: &PaginationParams) -> AppResult<(Vec<User>, u64)>;

    /// Get a user profile (self or admin), with optional expansion
    async fn get_user(
        &self,
        principal: &Principal,
        id: Uuid,
        expand: &Expand,
    ) -> AppResult<UserDetail>;

    /// Get the caller's own profile, with optional expansion
    async fn get_profile(&self, principal: &Principal, expand: &Expand) -> AppResult<UserDetail>;

    /// Update a user (self or admin; role/activation changes admin-only)
    async fn update_user(
        &self,
        principal: &Principal,
        id: Uuid,
        update: UserUpdate,
    ) -> AppResult<User>;

    /// Delete a user account (self or admin)
    async fn delete_user(&self, principal: &Principal, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserService.
pub struct UserManager<R: Repositories> {
    repos: Arc<R>,
}

impl<R: Repositories> UserManager<R> {
    /// Create new user service instance
    pub fn new(repos: Arc<R>) -> Self {
        Self { repos }
    }

    /// Attach expanded reverse relations to a user.
    async fn expand_user(&self, user: User, expand: &Expand) -> AppResult<UserDetail> {
        let mut detail = UserDetail::from(user);
        let id = detail.user.id;

        if expand.wants("books") {
            detail.books = Some(self.repos.books().list_by_authors(vec![id]).await?);
        }
        if expand.wants("reviews") {
            detail.reviews = Some(self.repos.reviews().list_by_reviewers(vec![id]).await?);
        }
        if expand.wants("favorites") {
            detail.favorites = Some(self.repos.favorites().list_by_users(vec![id]).await?);
        }

        Ok(detail)
    }

    /// Reject username/email values already used by another account.
    async fn ensure_identity_free(
        &self,
        id: Uuid,
        username: Option<&str>,
        email: Option<&str>,
    ) -> AppResult<()> {
        for identifier in [username, email].into_iter().flatten() {
            if let Some(existing) = self.repos.users().find_by_identifier(identifier).await? {
                if existing.id != id {
                    return Err(AppError::conflict("User"));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<R: Repositories> UserService for UserManager<R> {
    async fn list_users(&self, page: &PaginationParams) -> AppResult<(Vec<User>, u64)> {
        self.repos.users().list(page).await
    }

    async fn get_user(
        &self,
        principal: &Principal,
        id: Uuid,
        expand: &Expand,
    ) -> AppResult<UserDetail> {
        ensure_owner(principal, id)?;

        let user = self
            .repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.expand_user(user, expand).await
    }

    async fn get_profile(&self, principal: &Principal, expand: &Expand) -> AppResult<UserDetail> {
        let user = self
            .repos
            .users()
            .find_by_id(principal.id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.expand_user(user, expand).await
    }

    async fn update_user(
        &self,
        principal: &Principal,
        id: Uuid,
        update: UserUpdate,
    ) -> AppResult<User> {
        ensure_owner(principal, id)?;

        // Role and activation changes stay admin-only even for self-updates
        if update.role.is_some() || update.is_active.is_some() {
            ensure_admin(principal)?;
        }

        self.ensure_identity_free(id, update.username.as_deref(), update.email.as_deref())
            .await?;

        let password_hash = match update.password {
            Some(password) => Some(Password::new(&password)?.into_string()),
            None => None,
        };

        self.repos
            .users()
            .update(
                id,
                UserChanges {
                    username: update.username,
                    email: update.email,
                    password_hash,
                    role: update.role,
                    is_active: update.is_active,
                },
            )
            .await
    }

    async fn delete_user(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        ensure_owner(principal, id)?;

        // An admin removing their own account would orphan administration
        if principal.is_admin() && principal.id == id {
            return Err(AppError::validation("Cannot delete your own account"));
        }

        self.repos.users().delete(id).await
    }
}
