//! Favorite service - user favorites use cases.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    ensure_owner, Book, Favorite, FavoriteChanges, FavoriteDetail, FavoriteFilter, NewFavorite,
    Principal, User,
};
use crate::errors::{AppError, AppResult};
use crate::infra::Repositories;
use crate::types::{Expand, PaginationParams};

/// Favorite service trait for dependency injection.
#[async_trait]
pub trait FavoriteService: Send + Sync {
    /// List favorites. Non-admins only ever see their own; admins see all
    /// and may filter by user.
    async fn list_favorites(
        &self,
        principal: &Principal,
        filter: &FavoriteFilter,
        page: &PaginationParams,
        expand: &Expand,
    ) -> AppResult<(Vec<FavoriteDetail>, u64)>;

    /// Get a favorite by id (owner or admin)
    async fn get_favorite(
        &self,
        principal: &Principal,
        id: Uuid,
        expand: &Expand,
    ) -> AppResult<FavoriteDetail>;

    /// Create a favorite owned by the caller
    async fn create_favorite(
        &self,
        principal: &Principal,
        new: NewFavorite,
    ) -> AppResult<Favorite>;

    /// Update a favorite (owner or admin)
    async fn update_favorite(
        &self,
        principal: &Principal,
        id: Uuid,
        changes: FavoriteChanges,
    ) -> AppResult<Favorite>;

    /// Delete a favorite (owner or admin)
    async fn delete_favorite(&self, principal: &Principal, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of FavoriteService.
pub struct FavoriteManager<R: Repositories> {
    repos: Arc<R>,
}

impl<R: Repositories> FavoriteManager<R> {
    /// Create new favorite service instance
    pub fn new(repos: Arc<R>) -> Self {
        Self { repos }
    }

    /// Attach expanded relations to a page of favorites.
    async fn expand_favorites(
        &self,
        favorites: Vec<Favorite>,
        expand: &Expand,
    ) -> AppResult<Vec<FavoriteDetail>> {
        let books: Option<HashMap<Uuid, Book>> = if expand.wants("book") {
            let ids: Vec<Uuid> = favorites.iter().map(|favorite| favorite.book_id).collect();
            let found = self.repos.books().find_by_ids(ids).await?;
            Some(found.into_iter().map(|book| (book.id, book)).collect())
        } else {
            None
        };

        let users: Option<HashMap<Uuid, User>> = if expand.wants("user") {
            let ids: Vec<Uuid> = favorites.iter().map(|favorite| favorite.user_id).collect();
            let found = self.repos.users().find_by_ids(ids).await?;
            Some(found.into_iter().map(|user| (user.id, user)).collect())
        } else {
            None
        };

        Ok(favorites
            .into_iter()
            .map(|favorite| FavoriteDetail {
                book: books
                    .as_ref()
                    .and_then(|map| map.get(&favorite.book_id).cloned()),
                user: users
                    .as_ref()
                    .and_then(|map| map.get(&favorite.user_id).cloned()),
                favorite,
            })
            .collect())
    }
}

#[async_trait]
impl<R: Repositories> FavoriteService for FavoriteManager<R> {
    async fn list_favorites(
        &self,
        principal: &Principal,
        filter: &FavoriteFilter,
        page: &PaginationParams,
        expand: &Expand,
    ) -> AppResult<(Vec<FavoriteDetail>, u64)> {
        let mut filter = filter.clone();
        if !principal.is_admin() {
            // Everyone else is scoped to their own favorites
            filter.user = Some(principal.id);
        }

        let (favorites, total) = self.repos.favorites().list(&filter, page).await?;
        let details = self.expand_favorites(favorites, expand).await?;
        Ok((details, total))
    }

    async fn get_favorite(
        &self,
        principal: &Principal,
        id: Uuid,
        expand: &Expand,
    ) -> AppResult<FavoriteDetail> {
        let favorite = self
            .repos
            .favorites()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;

        // Hide foreign favorites entirely rather than acknowledging them
        if !principal.is_admin() && favorite.user_id != principal.id {
            return Err(AppError::NotFound);
        }

        let mut details = self.expand_favorites(vec![favorite], expand).await?;
        Ok(details.remove(0))
    }

    async fn create_favorite(
        &self,
        principal: &Principal,
        new: NewFavorite,
    ) -> AppResult<Favorite> {
        // The favorited book must exist; a bad reference is a client error
        if self.repos.books().find_by_id(new.book_id).await?.is_none() {
            return Err(AppError::validation("book does not exist"));
        }

        if self
            .repos
            .favorites()
            .exists_for(principal.id, new.book_id)
            .await?
        {
            return Err(AppError::conflict("Favorite"));
        }

        self.repos.favorites().create(new, principal.id).await
    }

    async fn update_favorite(
        &self,
        principal: &Principal,
        id: Uuid,
        changes: FavoriteChanges,
    ) -> AppResult<Favorite> {
        let favorite = self
            .repos
            .favorites()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;

        ensure_owner(principal, favorite.user_id)?;

        self.repos.favorites().update(id, changes).await
    }

    async fn delete_favorite(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        let favorite = self
            .repos
            .favorites()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;

        ensure_owner(principal, favorite.user_id)?;

        self.repos.favorites().delete(id).await
    }
}
