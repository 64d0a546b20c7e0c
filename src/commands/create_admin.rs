//! Create-admin command - provisions an administrator account.
//!
//! Admin accounts cannot be created through the public registration
//! endpoint; this command is the only way to mint one.

use crate::cli::args::CreateAdminArgs;
use crate::config::Config;
use crate::domain::{NewUser, Password, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Persistence, Repositories};

/// Execute the create-admin command
pub async fn execute(args: CreateAdminArgs, config: Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    let repos = Persistence::new(db.get_connection());

    if repos
        .users()
        .identity_taken(&args.username, &args.email)
        .await?
    {
        return Err(AppError::conflict("User"));
    }

    let password_hash = Password::new(&args.password)?.into_string();
    let admin = repos
        .users()
        .create(NewUser {
            username: args.username,
            email: args.email,
            password_hash,
            role: UserRole::Admin,
        })
        .await?;

    tracing::info!("Admin account created: {} ({})", admin.username, admin.id);
    println!("Created admin account {} ({})", admin.username, admin.id);

    Ok(())
}
