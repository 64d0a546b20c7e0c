//! Authorization rule-set tests against the real services.
//!
//! These run every ownership and role rule through the actual service
//! implementations, backed by in-memory repositories.

mod common;

use axum::http::StatusCode;
use serde_json::Value;
use uuid::Uuid;

use bookstore_api::domain::{
    BookChanges, BookFilter, BookResponse, FavoriteFilter, ReviewChanges, UserRole,
};
use bookstore_api::errors::AppError;
use bookstore_api::services::{
    BookManager, BookService, FavoriteManager, FavoriteService, ReviewManager, ReviewService,
    UserManager, UserService, UserUpdate,
};
use bookstore_api::types::{Expand, PaginationParams};

use common::*;

// =============================================================================
// Books
// =============================================================================

#[tokio::test]
async fn author_can_create_book_but_other_roles_cannot() {
    let repos = MemoryRepos::new();
    let service = BookManager::new(repos.clone());

    let author = seed_user(&repos, UserRole::Author).await;
    let book = service.create_book(&author, book_draft("by-author")).await;
    assert!(book.is_ok());

    for role in [UserRole::Reviewer, UserRole::Other] {
        let caller = seed_user(&repos, role).await;
        let err = service
            .create_book(&caller, book_draft("by-someone-else"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn created_book_is_owned_by_the_caller() {
    let repos = MemoryRepos::new();
    let service = BookManager::new(repos.clone());
    let author = seed_user(&repos, UserRole::Author).await;

    let book = service
        .create_book(&author, book_draft("owned-book"))
        .await
        .unwrap();

    assert_eq!(book.author_id, author.id);
    assert_eq!(book.slug, "owned-book");
}

#[tokio::test]
async fn only_the_author_or_admin_may_mutate_a_book() {
    let repos = MemoryRepos::new();
    let service = BookManager::new(repos.clone());

    let owner = seed_user(&repos, UserRole::Author).await;
    let other_author = seed_user(&repos, UserRole::Author).await;
    let admin = seed_user(&repos, UserRole::Admin).await;

    service
        .create_book(&owner, book_draft("contested-book"))
        .await
        .unwrap();

    // Another author is rejected even though the role matches
    let err = service
        .update_book(
            &other_author,
            "contested-book",
            BookChanges {
                title: Some("Hijacked".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    let err = service
        .delete_book(&other_author, "contested-book")
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    // The owner may update
    let updated = service
        .update_book(
            &owner,
            "contested-book",
            BookChanges {
                title: Some("Updated Title".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Updated Title");

    // An admin may delete without owning it
    service.delete_book(&admin, "contested-book").await.unwrap();
}

#[tokio::test]
async fn deleted_book_is_not_reachable_by_slug() {
    let repos = MemoryRepos::new();
    let service = BookManager::new(repos.clone());
    let author = seed_user(&repos, UserRole::Author).await;

    service
        .create_book(&author, book_draft("short-lived"))
        .await
        .unwrap();
    service.delete_book(&author, "short-lived").await.unwrap();

    let err = service
        .get_book("short-lived", &Expand::none())
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_slug_is_rejected_with_conflict() {
    let repos = MemoryRepos::new();
    let service = BookManager::new(repos.clone());
    let author = seed_user(&repos, UserRole::Author).await;

    service
        .create_book(&author, book_draft("unique-slug"))
        .await
        .unwrap();

    let err = service
        .create_book(&author, book_draft("unique-slug"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn expansion_inlines_the_author_and_plain_reads_return_the_id() {
    let repos = MemoryRepos::new();
    let service = BookManager::new(repos.clone());
    let author = seed_user(&repos, UserRole::Author).await;

    service
        .create_book(&author, book_draft("expandable"))
        .await
        .unwrap();

    // Expanded: the author field is a full object
    let detail = service
        .get_book("expandable", &Expand::from_fields(&["author"]))
        .await
        .unwrap();
    assert!(detail.author.is_some());

    let json = serde_json::to_value(BookResponse::from(detail)).unwrap();
    assert!(json["author"].is_object());
    assert_eq!(json["author"]["id"], Value::String(author.id.to_string()));

    // Not expanded: the author field is the bare id
    let detail = service.get_book("expandable", &Expand::none()).await.unwrap();
    assert!(detail.author.is_none());

    let json = serde_json::to_value(BookResponse::from(detail)).unwrap();
    assert_eq!(json["author"], Value::String(author.id.to_string()));
    assert!(json.get("reviews").is_none());
}

#[tokio::test]
async fn book_list_paginates_and_reports_totals() {
    let repos = MemoryRepos::new();
    let service = BookManager::new(repos.clone());
    let author = seed_user(&repos, UserRole::Author).await;

    for i in 0..3 {
        service
            .create_book(&author, book_draft(&format!("book-{}", i)))
            .await
            .unwrap();
    }

    let page = PaginationParams {
        page: 1,
        per_page: 2,
    };
    let (books, total) = service
        .list_books(&BookFilter::default(), &page, &Expand::none())
        .await
        .unwrap();

    assert_eq!(books.len(), 2);
    assert_eq!(total, 3);
}

// =============================================================================
// Reviews
// =============================================================================

#[tokio::test]
async fn only_reviewers_may_create_reviews() {
    let repos = MemoryRepos::new();
    let books = BookManager::new(repos.clone());
    let reviews = ReviewManager::new(repos.clone());

    let author = seed_user(&repos, UserRole::Author).await;
    let book = books
        .create_book(&author, book_draft("reviewed-book"))
        .await
        .unwrap();

    // The book's author cannot review it
    let err = reviews
        .create_review(&author, review_draft(book.id))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    let reviewer = seed_user(&repos, UserRole::Reviewer).await;
    let review = reviews
        .create_review(&reviewer, review_draft(book.id))
        .await
        .unwrap();
    assert_eq!(review.reviewer_id, reviewer.id);
}

#[tokio::test]
async fn review_of_a_nonexistent_book_is_a_bad_request() {
    let repos = MemoryRepos::new();
    let reviews = ReviewManager::new(repos.clone());
    let reviewer = seed_user(&repos, UserRole::Reviewer).await;

    let err = reviews
        .create_review(&reviewer, review_draft(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn one_review_per_reviewer_per_book() {
    let repos = MemoryRepos::new();
    let books = BookManager::new(repos.clone());
    let reviews = ReviewManager::new(repos.clone());

    let author = seed_user(&repos, UserRole::Author).await;
    let reviewer = seed_user(&repos, UserRole::Reviewer).await;
    let book = books
        .create_book(&author, book_draft("once-only"))
        .await
        .unwrap();

    reviews
        .create_review(&reviewer, review_draft(book.id))
        .await
        .unwrap();

    let err = reviews
        .create_review(&reviewer, review_draft(book.id))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn only_the_creator_or_admin_may_mutate_a_review() {
    let repos = MemoryRepos::new();
    let books = BookManager::new(repos.clone());
    let reviews = ReviewManager::new(repos.clone());

    let author = seed_user(&repos, UserRole::Author).await;
    let reviewer = seed_user(&repos, UserRole::Reviewer).await;
    let other_reviewer = seed_user(&repos, UserRole::Reviewer).await;
    let admin = seed_user(&repos, UserRole::Admin).await;

    let book = books
        .create_book(&author, book_draft("review-target"))
        .await
        .unwrap();
    let review = reviews
        .create_review(&reviewer, review_draft(book.id))
        .await
        .unwrap();

    // A different reviewer cannot touch it
    let err = reviews
        .update_review(
            &other_reviewer,
            review.id,
            ReviewChanges {
                title: Some("Hacked".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    let err = reviews
        .delete_review(&other_reviewer, review.id)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    // The creator may update their own review
    let updated = reviews
        .update_review(
            &reviewer,
            review.id,
            ReviewChanges {
                rating: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.rating, 3);

    // Admin may delete anyone's review
    reviews.delete_review(&admin, review.id).await.unwrap();

    let err = reviews
        .get_review(review.id, &Expand::none())
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Favorites
// =============================================================================

#[tokio::test]
async fn favorites_are_scoped_to_their_owner() {
    let repos = MemoryRepos::new();
    let books = BookManager::new(repos.clone());
    let favorites = FavoriteManager::new(repos.clone());

    let author = seed_user(&repos, UserRole::Author).await;
    let owner = seed_user(&repos, UserRole::Other).await;
    let stranger = seed_user(&repos, UserRole::Other).await;
    let admin = seed_user(&repos, UserRole::Admin).await;

    let book = books
        .create_book(&author, book_draft("favorited"))
        .await
        .unwrap();
    let favorite = favorites
        .create_favorite(&owner, favorite_draft(book.id))
        .await
        .unwrap();

    // The stranger's list does not contain the owner's favorite
    let (listed, total) = favorites
        .list_favorites(
            &stranger,
            &FavoriteFilter::default(),
            &PaginationParams::default(),
            &Expand::none(),
        )
        .await
        .unwrap();
    assert!(listed.is_empty());
    assert_eq!(total, 0);

    // The admin sees it
    let (listed, total) = favorites
        .list_favorites(
            &admin,
            &FavoriteFilter::default(),
            &PaginationParams::default(),
            &Expand::none(),
        )
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(total, 1);

    // Direct retrieval by a stranger reads as missing
    let err = favorites
        .get_favorite(&stranger, favorite.id, &Expand::none())
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);

    // A stranger cannot delete it either
    let err = favorites
        .delete_favorite(&stranger, favorite.id)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    // The owner can
    favorites.delete_favorite(&owner, favorite.id).await.unwrap();
}

#[tokio::test]
async fn one_favorite_per_user_per_book() {
    let repos = MemoryRepos::new();
    let books = BookManager::new(repos.clone());
    let favorites = FavoriteManager::new(repos.clone());

    let author = seed_user(&repos, UserRole::Author).await;
    let owner = seed_user(&repos, UserRole::Reviewer).await;
    let book = books
        .create_book(&author, book_draft("favorite-once"))
        .await
        .unwrap();

    favorites
        .create_favorite(&owner, favorite_draft(book.id))
        .await
        .unwrap();

    let err = favorites
        .create_favorite(&owner, favorite_draft(book.id))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn user_profiles_are_private_to_owner_and_admin() {
    let repos = MemoryRepos::new();
    let users = UserManager::new(repos.clone());

    let target = seed_user(&repos, UserRole::Author).await;
    let stranger = seed_user(&repos, UserRole::Reviewer).await;
    let admin = seed_user(&repos, UserRole::Admin).await;

    let err = users
        .get_user(&stranger, target.id, &Expand::none())
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    assert!(users.get_user(&target, target.id, &Expand::none()).await.is_ok());
    assert!(users.get_user(&admin, target.id, &Expand::none()).await.is_ok());
}

#[tokio::test]
async fn user_expansion_includes_reverse_relations() {
    let repos = MemoryRepos::new();
    let users = UserManager::new(repos.clone());
    let books = BookManager::new(repos.clone());

    let author = seed_user(&repos, UserRole::Author).await;
    books
        .create_book(&author, book_draft("authored"))
        .await
        .unwrap();

    let detail = users
        .get_user(&author, author.id, &Expand::from_fields(&["books"]))
        .await
        .unwrap();

    let authored = detail.books.expect("books should be expanded");
    assert_eq!(authored.len(), 1);
    assert_eq!(authored[0].slug, "authored");
    assert!(detail.reviews.is_none());
}

#[tokio::test]
async fn role_escalation_requires_admin() {
    let repos = MemoryRepos::new();
    let users = UserManager::new(repos.clone());

    let target = seed_user(&repos, UserRole::Other).await;
    let admin = seed_user(&repos, UserRole::Admin).await;

    // Users cannot promote themselves
    let err = users
        .update_user(
            &target,
            target.id,
            UserUpdate {
                role: Some(UserRole::Author),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    // Admins can
    let updated = users
        .update_user(
            &admin,
            target.id,
            UserUpdate {
                role: Some(UserRole::Author),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.role, UserRole::Author);
}
