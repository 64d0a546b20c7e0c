//! Review repository - data access for book reviews.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::{NewReview, Review, ReviewChanges, ReviewFilter};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

use super::entities::review::{self, Entity as ReviewEntity};

/// Review repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Find review by primary key
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Review>>;

    /// List reviews matching the filter, newest first
    async fn list(
        &self,
        filter: &ReviewFilter,
        page: &PaginationParams,
    ) -> AppResult<(Vec<Review>, u64)>;

    /// All reviews of the given books (for expansion)
    async fn list_by_books(&self, book_ids: Vec<Uuid>) -> AppResult<Vec<Review>>;

    /// All reviews written by the given users (for expansion)
    async fn list_by_reviewers(&self, reviewer_ids: Vec<Uuid>) -> AppResult<Vec<Review>>;

    /// Whether the reviewer has already reviewed the book
    async fn exists_for(&self, book_id: Uuid, reviewer_id: Uuid) -> AppResult<bool>;

    /// Insert a new review written by `reviewer_id`
    async fn create(&self, new: NewReview, reviewer_id: Uuid) -> AppResult<Review>;

    /// Apply field changes to a review
    async fn update(&self, id: Uuid, changes: ReviewChanges) -> AppResult<Review>;

    /// Delete a review
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// SeaORM-backed implementation of [`ReviewRepository`].
pub struct ReviewStore {
    db: DatabaseConnection,
}

impl ReviewStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn conditions(filter: &ReviewFilter) -> Condition {
        let mut cond = Condition::all();

        if let Some(book) = filter.book {
            cond = cond.add(review::Column::BookId.eq(book));
        }
        if let Some(reviewer) = filter.reviewer {
            cond = cond.add(review::Column::ReviewerId.eq(reviewer));
        }
        if let Some(rating) = filter.rating {
            cond = cond.add(review::Column::Rating.eq(rating));
        }
        if let Some(is_trusted) = filter.is_trusted {
            cond = cond.add(review::Column::IsTrusted.eq(is_trusted));
        }

        cond
    }
}

#[async_trait]
impl ReviewRepository for ReviewStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Review>> {
        let model = ReviewEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Review::from))
    }

    async fn list(
        &self,
        filter: &ReviewFilter,
        page: &PaginationParams,
    ) -> AppResult<(Vec<Review>, u64)> {
        let paginator = ReviewEntity::find()
            .filter(Self::conditions(filter))
            .order_by_desc(review::Column::CreatedAt)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.zero_indexed_page()).await?;

        Ok((models.into_iter().map(Review::from).collect(), total))
    }

    async fn list_by_books(&self, book_ids: Vec<Uuid>) -> AppResult<Vec<Review>> {
        if book_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = ReviewEntity::find()
            .filter(review::Column::BookId.is_in(book_ids))
            .order_by_desc(review::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Review::from).collect())
    }

    async fn list_by_reviewers(&self, reviewer_ids: Vec<Uuid>) -> AppResult<Vec<Review>> {
        if reviewer_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = ReviewEntity::find()
            .filter(review::Column::ReviewerId.is_in(reviewer_ids))
            .order_by_desc(review::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Review::from).collect())
    }

    async fn exists_for(&self, book_id: Uuid, reviewer_id: Uuid) -> AppResult<bool> {
        let count = ReviewEntity::find()
            .filter(review::Column::BookId.eq(book_id))
            .filter(review::Column::ReviewerId.eq(reviewer_id))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn create(&self, new: NewReview, reviewer_id: Uuid) -> AppResult<Review> {
        let now = chrono::Utc::now();
        let active = review::ActiveModel {
            id: Set(Uuid::new_v4()),
            book_id: Set(new.book_id),
            reviewer_id: Set(reviewer_id),
            title: Set(new.title),
            content: Set(new.content),
            rating: Set(new.rating),
            is_trusted: Set(new.is_trusted),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active.insert(&self.db).await?;
        Ok(Review::from(model))
    }

    async fn update(&self, id: Uuid, changes: ReviewChanges) -> AppResult<Review> {
        let model = ReviewEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: review::ActiveModel = model.into();

        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(rating) = changes.rating {
            active.rating = Set(rating);
        }
        if let Some(is_trusted) = changes.is_trusted {
            active.is_trusted = Set(is_trusted);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Review::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = ReviewEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
