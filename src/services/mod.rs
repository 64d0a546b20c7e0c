//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion, and they enforce the authorization rule set
//! (role membership, ownership, admin bypass) before touching data.

mod auth_service;
pub mod container;
mod book_service;
mod favorite_service;
mod review_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use book_service::{BookManager, BookService};
pub use favorite_service::{FavoriteManager, FavoriteService};
pub use review_service::{ReviewManager, ReviewService};
pub use user_service::{UserManager, UserService, UserUpdate};
