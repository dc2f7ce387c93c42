//! User repository for accounts, skin profiles, and password reset tokens.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;

use beaulytics_core::{Email, UserId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::User;

/// Columns selected for a full user row.
const USER_COLUMNS: &str =
    "id, email, full_name, avatar_url, skin_profile, skin_tags, created_at, updated_at";

/// Reset tokens are valid for one hour.
const RESET_TOKEN_TTL_HOURS: i64 = 1;

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    /// Get a user by email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    /// Create a user with an email and password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_password(
        &self,
        email: &Email,
        full_name: Option<&str>,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO users (email, full_name) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .bind(full_name)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| conflict_on_unique(e, "email already exists"))?;

        sqlx::query("INSERT INTO user_passwords (user_id, password_hash) VALUES ($1, $2)")
            .bind(user.id)
            .bind(password_hash)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(user)
    }

    /// Create a user from an OAuth identity (no password row).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_oauth(
        &self,
        email: &Email,
        full_name: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<User, RepositoryError> {
        let sql = format!(
            "INSERT INTO users (email, full_name, avatar_url) VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .bind(full_name)
            .bind(avatar_url)
            .fetch_one(self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "email already exists"))?;

        Ok(user)
    }

    /// Get a user's password hash by email.
    ///
    /// Returns `None` if the user doesn't exist or has no password set
    /// (OAuth-only accounts).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let sql = format!(
            "SELECT {}, p.password_hash FROM users u \
             JOIN user_passwords p ON p.user_id = u.id \
             WHERE u.email = $1",
            USER_COLUMNS
                .split(", ")
                .map(|c| format!("u.{c}"))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let row = sqlx::query_as::<_, UserWithHash>(&sql)
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(|r| (r.user, r.password_hash)))
    }

    /// Set (or replace) a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn set_password(
        &self,
        user_id: UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO user_passwords (user_id, password_hash) VALUES ($1, $2) \
             ON CONFLICT (user_id) DO UPDATE SET password_hash = EXCLUDED.password_hash",
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Update a user's display profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        full_name: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET full_name = $1, avatar_url = $2, updated_at = now() WHERE id = $3",
        )
        .bind(full_name)
        .bind(avatar_url)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Store the questionnaire result: raw payload plus cleaned tags.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn save_skin_profile(
        &self,
        user_id: UserId,
        profile: &serde_json::Value,
        tags: &[String],
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET skin_profile = $1, skin_tags = $2, updated_at = now() WHERE id = $3",
        )
        .bind(profile)
        .bind(tags)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    // =========================================================================
    // Password Reset Tokens
    // =========================================================================

    /// Mint a single-use password reset token for an email, if registered.
    ///
    /// Returns `None` (not an error) when the email is unknown so callers
    /// can answer identically either way and avoid account enumeration.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_reset_token(
        &self,
        email: &Email,
        token: &str,
    ) -> Result<Option<DateTime<Utc>>, RepositoryError> {
        let Some(user) = self.get_by_email(email).await? else {
            return Ok(None);
        };

        let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);

        sqlx::query(
            "INSERT INTO password_reset_tokens (user_id, token, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(user.id)
        .bind(token)
        .bind(expires_at)
        .execute(self.pool)
        .await?;

        Ok(Some(expires_at))
    }

    /// Redeem a reset token, marking it used.
    ///
    /// Returns the owning user ID, or `None` when the token is unknown,
    /// expired, or already used.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn consume_reset_token(
        &self,
        token: &str,
    ) -> Result<Option<UserId>, RepositoryError> {
        let row: Option<(UserId,)> = sqlx::query_as(
            "UPDATE password_reset_tokens SET used_at = now() \
             WHERE token = $1 AND used_at IS NULL AND expires_at > now() \
             RETURNING user_id",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(user_id,)| user_id))
    }
}

/// Join row for [`UserRepository::get_password_hash`].
#[derive(sqlx::FromRow)]
struct UserWithHash {
    #[sqlx(flatten)]
    user: User,
    password_hash: String,
}
