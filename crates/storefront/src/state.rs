//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::ai::{AiError, GroqClient};
use crate::config::StorefrontConfig;
use crate::services::payments::{PaymentError, StripeClient};

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("groq client: {0}")]
    Groq(#[from] AiError),
    #[error("stripe client: {0}")]
    Stripe(#[from] PaymentError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    groq: Option<GroqClient>,
    stripe: Option<StripeClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Integration clients are built only when their configuration block is
    /// present; routes check for them per request and fail closed otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured client fails to build (e.g. a key
    /// with invalid header characters).
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, StateError> {
        let groq = config.groq.as_ref().map(GroqClient::new).transpose()?;
        let stripe = config.stripe.as_ref().map(StripeClient::new).transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                groq,
                stripe,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The Groq client, when the AI integration is configured.
    #[must_use]
    pub fn groq(&self) -> Option<&GroqClient> {
        self.inner.groq.as_ref()
    }

    /// The Stripe client, when checkout is configured.
    #[must_use]
    pub fn stripe(&self) -> Option<&StripeClient> {
        self.inner.stripe.as_ref()
    }
}
