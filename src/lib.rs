//! Bookstore API - book-store management backend
//!
//! A REST API for managing users, books, reviews and favorites over a
//! relational database, with JWT authentication and role-based
//! authorization (admin, author, reviewer, other).
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and the authorization rule set
//! - **services**: Application use cases and business logic
//! - **infra**: Infrastructure concerns (database, repositories, migrations)
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses, field expansion)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Create an administrator account
//! cargo run -- create-admin --username root --email root@example.com --password changeme123
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, Principal, User, UserRole};
pub use errors::{AppError, AppResult};
