//! Review service - book review use cases.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    ensure_owner, ensure_role, Book, NewReview, Principal, Review, ReviewChanges, ReviewDetail,
    ReviewFilter, User, UserRole,
};
use crate::errors::{AppError, AppResult};
use crate::infra::Repositories;
use crate::types::{Expand, PaginationParams};

/// Review service trait for dependency injection.
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// List reviews matching the filter, with optional expansion
    async fn list_reviews(
        &self,
        filter: &ReviewFilter,
        page: &PaginationParams,
        expand: &Expand,
    ) -> AppResult<(Vec<ReviewDetail>, u64)>;

    /// Get a review by id, with optional expansion
    async fn get_review(&self, id: Uuid, expand: &Expand) -> AppResult<ReviewDetail>;

    /// Create a review; the caller must hold the reviewer role and becomes
    /// the review's author regardless of payload content
    async fn create_review(&self, principal: &Principal, new: NewReview) -> AppResult<Review>;

    /// Update a review (its creator or admin)
    async fn update_review(
        &self,
        principal: &Principal,
        id: Uuid,
        changes: ReviewChanges,
    ) -> AppResult<Review>;

    /// Delete a review (its creator or admin)
    async fn delete_review(&self, principal: &Principal, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of ReviewService.
pub struct ReviewManager<R: Repositories> {
    repos: Arc<R>,
}

impl<R: Repositories> ReviewManager<R> {
    /// Create new review service instance
    pub fn new(repos: Arc<R>) -> Self {
        Self { repos }
    }

    /// Attach expanded relations to a page of reviews.
    async fn expand_reviews(
        &self,
        reviews: Vec<Review>,
        expand: &Expand,
    ) -> AppResult<Vec<ReviewDetail>> {
        let books: Option<HashMap<Uuid, Book>> = if expand.wants("book") {
            let ids: Vec<Uuid> = reviews.iter().map(|review| review.book_id).collect();
            let found = self.repos.books().find_by_ids(ids).await?;
            Some(found.into_iter().map(|book| (book.id, book)).collect())
        } else {
            None
        };

        let reviewers: Option<HashMap<Uuid, User>> = if expand.wants("reviewer") {
            let ids: Vec<Uuid> = reviews.iter().map(|review| review.reviewer_id).collect();
            let found = self.repos.users().find_by_ids(ids).await?;
            Some(found.into_iter().map(|user| (user.id, user)).collect())
        } else {
            None
        };

        Ok(reviews
            .into_iter()
            .map(|review| ReviewDetail {
                book: books
                    .as_ref()
                    .and_then(|map| map.get(&review.book_id).cloned()),
                reviewer: reviewers
                    .as_ref()
                    .and_then(|map| map.get(&review.reviewer_id).cloned()),
                review,
            })
            .collect())
    }
}

#[async_trait]
impl<R: Repositories> ReviewService for ReviewManager<R> {
    async fn list_reviews(
        &self,
        filter: &ReviewFilter,
        page: &PaginationParams,
        expand: &Expand,
    ) -> AppResult<(Vec<ReviewDetail>, u64)> {
        let (reviews, total) = self.repos.reviews().list(filter, page).await?;
        let details = self.expand_reviews(reviews, expand).await?;
        Ok((details, total))
    }

    async fn get_review(&self, id: Uuid, expand: &Expand) -> AppResult<ReviewDetail> {
        let review = self
            .repos
            .reviews()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut details = self.expand_reviews(vec![review], expand).await?;
        Ok(details.remove(0))
    }

    async fn create_review(&self, principal: &Principal, new: NewReview) -> AppResult<Review> {
        ensure_role(principal, UserRole::Reviewer)?;

        // The reviewed book must exist; a bad reference is a client error
        if self.repos.books().find_by_id(new.book_id).await?.is_none() {
            return Err(AppError::validation("book does not exist"));
        }

        if self
            .repos
            .reviews()
            .exists_for(new.book_id, principal.id)
            .await?
        {
            return Err(AppError::conflict("Review"));
        }

        self.repos.reviews().create(new, principal.id).await
    }

    async fn update_review(
        &self,
        principal: &Principal,
        id: Uuid,
        changes: ReviewChanges,
    ) -> AppResult<Review> {
        let review = self
            .repos
            .reviews()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;

        ensure_owner(principal, review.reviewer_id)?;

        self.repos.reviews().update(id, changes).await
    }

    async fn delete_review(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        let review = self
            .repos
            .reviews()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;

        ensure_owner(principal, review.reviewer_id)?;

        self.repos.reviews().delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockBookRepository, MockReviewRepository};
    use crate::services::testing::{principal, sample_book, sample_review, ReposWith};
    use mockall::predicate::eq;

    fn draft(book_id: Uuid) -> NewReview {
        NewReview {
            book_id,
            title: "Great Book".into(),
            content: "This is an excellent book.".into(),
            rating: 5,
            is_trusted: false,
        }
    }

    #[tokio::test]
    async fn only_reviewers_may_create_reviews() {
        let service = ReviewManager::new(Arc::new(ReposWith::new()));

        for role in [UserRole::Author, UserRole::Other] {
            let caller = principal(role);
            let result = service.create_review(&caller, draft(Uuid::new_v4())).await;
            assert!(matches!(result, Err(AppError::Forbidden)));
        }
    }

    #[tokio::test]
    async fn review_of_missing_book_is_rejected() {
        let caller = principal(UserRole::Reviewer);

        let mut books = MockBookRepository::new();
        books.expect_find_by_id().returning(|_| Ok(None));

        let service = ReviewManager::new(Arc::new(ReposWith::with_books(books)));
        let result = service.create_review(&caller, draft(Uuid::new_v4())).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn second_review_of_same_book_is_a_conflict() {
        let caller = principal(UserRole::Reviewer);
        let caller_id = caller.id;
        let book_id = Uuid::new_v4();

        let mut books = MockBookRepository::new();
        books
            .expect_find_by_id()
            .with(eq(book_id))
            .returning(move |id| Ok(Some(sample_book(id, Uuid::new_v4()))));

        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_exists_for()
            .with(eq(book_id), eq(caller_id))
            .returning(|_, _| Ok(true));

        let service =
            ReviewManager::new(Arc::new(ReposWith::with_books(books).and_reviews(reviews)));
        let result = service.create_review(&caller, draft(book_id)).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn reviewer_creates_review_owned_by_themselves() {
        let caller = principal(UserRole::Reviewer);
        let caller_id = caller.id;
        let book_id = Uuid::new_v4();

        let mut books = MockBookRepository::new();
        books
            .expect_find_by_id()
            .returning(move |id| Ok(Some(sample_book(id, Uuid::new_v4()))));

        let mut reviews = MockReviewRepository::new();
        reviews.expect_exists_for().returning(|_, _| Ok(false));
        reviews
            .expect_create()
            .withf(move |_, reviewer_id| *reviewer_id == caller_id)
            .returning(|new, reviewer_id| {
                let mut review = sample_review(Uuid::new_v4(), new.book_id, reviewer_id);
                review.rating = new.rating;
                Ok(review)
            });

        let service =
            ReviewManager::new(Arc::new(ReposWith::with_books(books).and_reviews(reviews)));
        let review = service.create_review(&caller, draft(book_id)).await.unwrap();

        assert_eq!(review.reviewer_id, caller.id);
        assert_eq!(review.rating, 5);
    }

    #[tokio::test]
    async fn non_owner_cannot_update_review() {
        let caller = principal(UserRole::Reviewer);
        let review_id = Uuid::new_v4();

        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_find_by_id()
            .with(eq(review_id))
            .returning(|id| Ok(Some(sample_review(id, Uuid::new_v4(), Uuid::new_v4()))));

        let service = ReviewManager::new(Arc::new(ReposWith::with_reviews(reviews)));
        let result = service
            .update_review(&caller, review_id, ReviewChanges::default())
            .await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn owner_may_delete_own_review() {
        let caller = principal(UserRole::Reviewer);
        let caller_id = caller.id;
        let review_id = Uuid::new_v4();

        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_find_by_id()
            .returning(move |id| Ok(Some(sample_review(id, Uuid::new_v4(), caller_id))));
        reviews
            .expect_delete()
            .with(eq(review_id))
            .returning(|_| Ok(()));

        let service = ReviewManager::new(Arc::new(ReposWith::with_reviews(reviews)));
        assert!(service.delete_review(&caller, review_id).await.is_ok());
    }
}
