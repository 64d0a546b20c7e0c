//! User repository - data access for user accounts.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::{NewUser, User, UserChanges};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

use super::entities::user::{self, Entity as UserEntity};

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by primary key
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find all users with the given ids
    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>>;

    /// Find user by username or email
    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>>;

    /// Check whether a username or email is already taken
    async fn identity_taken(&self, username: &str, email: &str) -> AppResult<bool>;

    /// List users ordered by signup date
    async fn list(&self, page: &PaginationParams) -> AppResult<(Vec<User>, u64)>;

    /// Insert a new user
    async fn create(&self, new: NewUser) -> AppResult<User>;

    /// Apply field changes to a user
    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User>;

    /// Delete a user (dependent books, reviews and favorites cascade)
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// SeaORM-backed implementation of [`UserRepository`].
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let model = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(User::from))
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = UserEntity::find()
            .filter(user::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>> {
        let model = UserEntity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(identifier))
                    .add(user::Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await?;

        Ok(model.map(User::from))
    }

    async fn identity_taken(&self, username: &str, email: &str) -> AppResult<bool> {
        let count = UserEntity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(username))
                    .add(user::Column::Email.eq(email)),
            )
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn list(&self, page: &PaginationParams) -> AppResult<(Vec<User>, u64)> {
        let paginator = UserEntity::find()
            .order_by_asc(user::Column::CreatedAt)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.zero_indexed_page()).await?;

        Ok((models.into_iter().map(User::from).collect(), total))
    }

    async fn create(&self, new: NewUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(new.username),
            email: Set(new.email),
            password_hash: Set(new.password_hash),
            role: Set(new.role.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active.insert(&self.db).await?;
        Ok(User::from(model))
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        let model = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: user::ActiveModel = model.into();

        if let Some(username) = changes.username {
            active.username = Set(username);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(password_hash) = changes.password_hash {
            active.password_hash = Set(password_hash);
        }
        if let Some(role) = changes.role {
            active.role = Set(role.to_string());
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(User::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
