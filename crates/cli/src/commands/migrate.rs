//! Database migration command.
//!
//! Runs the storefront migrations from `crates/storefront/migrations/`.
//! The session table is owned by tower-sessions and migrated by the
//! storefront binary at startup.

use super::CommandError;

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration
/// fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
