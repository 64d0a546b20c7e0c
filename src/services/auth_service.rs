//! Authentication service - registration, login and JWT lifecycle.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{
    Config, SECONDS_PER_HOUR, TOKEN_KIND_ACCESS, TOKEN_KIND_REFRESH, TOKEN_TYPE_BEARER,
};
use crate::domain::{NewUser, Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::Repositories;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub role: String,
    /// Token kind: "access" or "refresh"
    pub kind: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn is_access(&self) -> bool {
        self.kind == TOKEN_KIND_ACCESS
    }

    pub fn is_refresh(&self) -> bool {
        self.kind == TOKEN_KIND_REFRESH
    }
}

/// Token pair returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Short-lived JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Long-lived JWT refresh token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub refresh_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Access token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user. The admin role cannot be requested here.
    async fn register(
        &self,
        username: String,
        email: String,
        password: String,
        role: Option<UserRole>,
    ) -> AppResult<User>;

    /// Login with username or email and return a token pair
    async fn login(&self, identifier: String, password: String) -> AppResult<TokenResponse>;

    /// Exchange a refresh token for a new token pair
    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenResponse>;

    /// Verify an access token and extract claims (used by middleware)
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Verify a token of either kind (used by the verify endpoint)
    fn inspect_token(&self, token: &str) -> AppResult<Claims>;
}

fn encode_token(user: &User, kind: &str, lifetime: Duration, config: &Config) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        role: user.role.to_string(),
        kind: kind.to_string(),
        exp: (now + lifetime).timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(token)
}

/// Generate an access/refresh token pair for a user (shared helper)
fn generate_token_pair(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let access_token = encode_token(
        user,
        TOKEN_KIND_ACCESS,
        Duration::hours(config.jwt_expiration_hours),
        config,
    )?;
    let refresh_token = encode_token(
        user,
        TOKEN_KIND_REFRESH,
        Duration::days(config.jwt_refresh_expiration_days),
        config,
    )?;

    Ok(TokenResponse {
        access_token,
        refresh_token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

/// Decode and validate a token's signature and expiry (shared helper)
fn decode_token(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService.
pub struct Authenticator<R: Repositories> {
    repos: Arc<R>,
    config: Config,
}

impl<R: Repositories> Authenticator<R> {
    /// Create new auth service instance
    pub fn new(repos: Arc<R>, config: Config) -> Self {
        Self { repos, config }
    }
}

#[async_trait]
impl<R: Repositories> AuthService for Authenticator<R> {
    async fn register(
        &self,
        username: String,
        email: String,
        password: String,
        role: Option<UserRole>,
    ) -> AppResult<User> {
        let role = role.unwrap_or(UserRole::Other);
        if role == UserRole::Admin {
            return Err(AppError::validation(
                "The admin role cannot be requested at registration",
            ));
        }

        // Input shape is validated by the handler's ValidatedJson extractor
        if self.repos.users().identity_taken(&username, &email).await? {
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&password)?.into_string();
        self.repos
            .users()
            .create(NewUser {
                username,
                email,
                password_hash,
                role,
            })
            .await
    }

    async fn login(&self, identifier: String, password: String) -> AppResult<TokenResponse> {
        let user_result = self.repos.users().find_by_identifier(&identifier).await?;

        // SECURITY: Perform password verification even if the user doesn't
        // exist to prevent timing attacks that could enumerate accounts.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

        let (password_hash, account_usable) = match &user_result {
            Some(user) => (user.password_hash.as_str(), user.is_active),
            None => (dummy_hash, false),
        };

        let stored_password = Password::from_hash(password_hash.to_string());
        let password_valid = stored_password.verify(&password);

        if !account_usable || !password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // Safe to unwrap since account_usable implies the user exists
        generate_token_pair(user_result.as_ref().unwrap(), &self.config)
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenResponse> {
        let claims = decode_token(refresh_token, &self.config)?;
        if !claims.is_refresh() {
            return Err(AppError::Unauthorized);
        }

        // The account must still exist and be active
        let user = self
            .repos
            .users()
            .find_by_id(claims.sub)
            .await?
            .filter(|user| user.is_active)
            .ok_or(AppError::Unauthorized)?;

        generate_token_pair(&user, &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let claims = decode_token(token, &self.config)?;
        if !claims.is_access() {
            return Err(AppError::Unauthorized);
        }
        Ok(claims)
    }

    fn inspect_token(&self, token: &str) -> AppResult<Claims> {
        decode_token(token, &self.config)
    }
}
