//! Favorite repository - data access for user favorites.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::{Favorite, FavoriteChanges, FavoriteFilter, NewFavorite};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

use super::entities::favorite::{self, Entity as FavoriteEntity};

/// Favorite repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Find favorite by primary key
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Favorite>>;

    /// List favorites matching the filter, newest first
    async fn list(
        &self,
        filter: &FavoriteFilter,
        page: &PaginationParams,
    ) -> AppResult<(Vec<Favorite>, u64)>;

    /// All favorites of the given users (for expansion)
    async fn list_by_users(&self, user_ids: Vec<Uuid>) -> AppResult<Vec<Favorite>>;

    /// Whether the user has already favorited the book
    async fn exists_for(&self, user_id: Uuid, book_id: Uuid) -> AppResult<bool>;

    /// Insert a new favorite owned by `user_id`
    async fn create(&self, new: NewFavorite, user_id: Uuid) -> AppResult<Favorite>;

    /// Apply field changes to a favorite
    async fn update(&self, id: Uuid, changes: FavoriteChanges) -> AppResult<Favorite>;

    /// Delete a favorite
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// SeaORM-backed implementation of [`FavoriteRepository`].
pub struct FavoriteStore {
    db: DatabaseConnection,
}

impl FavoriteStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn conditions(filter: &FavoriteFilter) -> Condition {
        let mut cond = Condition::all();

        if let Some(user) = filter.user {
            cond = cond.add(favorite::Column::UserId.eq(user));
        }
        if let Some(book) = filter.book {
            cond = cond.add(favorite::Column::BookId.eq(book));
        }
        if let Some(reason) = filter.reason {
            cond = cond.add(favorite::Column::Reason.eq(reason.as_str()));
        }

        cond
    }
}

#[async_trait]
impl FavoriteRepository for FavoriteStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Favorite>> {
        let model = FavoriteEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Favorite::from))
    }

    async fn list(
        &self,
        filter: &FavoriteFilter,
        page: &PaginationParams,
    ) -> AppResult<(Vec<Favorite>, u64)> {
        let paginator = FavoriteEntity::find()
            .filter(Self::conditions(filter))
            .order_by_desc(favorite::Column::CreatedAt)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.zero_indexed_page()).await?;

        Ok((models.into_iter().map(Favorite::from).collect(), total))
    }

    async fn list_by_users(&self, user_ids: Vec<Uuid>) -> AppResult<Vec<Favorite>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = FavoriteEntity::find()
            .filter(favorite::Column::UserId.is_in(user_ids))
            .order_by_desc(favorite::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Favorite::from).collect())
    }

    async fn exists_for(&self, user_id: Uuid, book_id: Uuid) -> AppResult<bool> {
        let count = FavoriteEntity::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .filter(favorite::Column::BookId.eq(book_id))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn create(&self, new: NewFavorite, user_id: Uuid) -> AppResult<Favorite> {
        let now = chrono::Utc::now();
        let active = favorite::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            book_id: Set(new.book_id),
            reason: Set(new.reason.to_string()),
            notes: Set(new.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active.insert(&self.db).await?;
        Ok(Favorite::from(model))
    }

    async fn update(&self, id: Uuid, changes: FavoriteChanges) -> AppResult<Favorite> {
        let model = FavoriteEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: favorite::ActiveModel = model.into();

        if let Some(reason) = changes.reason {
            active.reason = Set(reason.to_string());
        }
        if let Some(notes) = changes.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Favorite::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = FavoriteEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
