//! Stripe Checkout Sessions client.
//!
//! Checkout is a redirect flow: the cart's lines become Stripe line items,
//! Stripe hosts the payment page, and the shopper comes back to our
//! success or cancel URL.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::StripeConfig;

/// Stripe API base URL.
const BASE_URL: &str = "https://api.stripe.com/v1";

/// Errors that can occur when interacting with the Stripe API.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response.
    #[error("parse error: {0}")]
    Parse(String),

    /// A line item's amount doesn't convert to a whole cent count.
    #[error("invalid amount: {0}")]
    InvalidAmount(Decimal),
}

/// One checkout line derived from a cart line.
#[derive(Debug, Clone)]
pub struct CheckoutLineItem {
    pub name: String,
    pub image: Option<String>,
    /// Unit price in the store currency.
    pub unit_price: Decimal,
    pub quantity: i64,
}

/// A created Stripe Checkout Session.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Session id (`cs_...`).
    pub id: String,
    /// Hosted payment page to redirect the shopper to.
    pub url: Option<String>,
}

/// Stripe error response envelope.
#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

/// Stripe Checkout API client.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
}

impl StripeClient {
    /// Create a new Stripe client.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Parse` if the secret key contains invalid
    /// header characters, or `PaymentError::Http` if the HTTP client fails
    /// to build.
    pub fn new(config: &StripeConfig) -> Result<Self, PaymentError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.secret_key.expose_secret());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value)
                .map_err(|e| PaymentError::Parse(format!("invalid secret key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    /// Create a Checkout Session in payment mode.
    ///
    /// # Errors
    ///
    /// Returns an error if any amount doesn't convert to cents, the request
    /// fails, or Stripe rejects it.
    #[instrument(skip(self, line_items), fields(lines = line_items.len()))]
    pub async fn create_checkout_session(
        &self,
        line_items: &[CheckoutLineItem],
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = format!("{BASE_URL}/checkout/sessions");
        let params = checkout_session_params(line_items, success_url, cancel_url)?;

        let response = self.client.post(&url).form(&params).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<StripeErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error.message)
                .unwrap_or(body);
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<CheckoutSession>()
            .await
            .map_err(|e| PaymentError::Parse(e.to_string()))
    }
}

/// Build the form-encoded parameter list for a session create call.
///
/// Stripe's nested-array encoding wants explicit indices, so this stays a
/// plain key/value list rather than a serde struct.
fn checkout_session_params(
    line_items: &[CheckoutLineItem],
    success_url: &str,
    cancel_url: &str,
) -> Result<Vec<(String, String)>, PaymentError> {
    let mut params = vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), success_url.to_string()),
        ("cancel_url".to_string(), cancel_url.to_string()),
    ];

    for (i, item) in line_items.iter().enumerate() {
        let cents = to_cents(item.unit_price)?;
        params.push((
            format!("line_items[{i}][price_data][currency]"),
            "usd".to_string(),
        ));
        params.push((
            format!("line_items[{i}][price_data][product_data][name]"),
            item.name.clone(),
        ));
        if let Some(image) = &item.image {
            params.push((
                format!("line_items[{i}][price_data][product_data][images][0]"),
                image.clone(),
            ));
        }
        params.push((
            format!("line_items[{i}][price_data][unit_amount]"),
            cents.to_string(),
        ));
        params.push((format!("line_items[{i}][quantity]"), item.quantity.to_string()));
    }

    Ok(params)
}

/// Convert a decimal price to whole cents, rounding half-up like the
/// storefront displays prices.
fn to_cents(price: Decimal) -> Result<i64, PaymentError> {
    (price * Decimal::from(100))
        .round()
        .to_i64()
        .ok_or(PaymentError::InvalidAmount(price))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, price: Decimal, quantity: i64) -> CheckoutLineItem {
        CheckoutLineItem {
            name: name.to_string(),
            image: None,
            unit_price: price,
            quantity,
        }
    }

    #[test]
    fn test_to_cents() {
        assert_eq!(to_cents(Decimal::new(1999, 2)).expect("cents"), 1999);
        assert_eq!(to_cents(Decimal::new(10, 0)).expect("cents"), 1000);
        // Rounds sub-cent amounts instead of failing
        assert_eq!(to_cents(Decimal::new(12345, 3)).expect("cents"), 1235);
    }

    #[test]
    fn test_checkout_session_params_layout() {
        let items = vec![
            item("Cleanser", Decimal::new(1250, 2), 2),
            CheckoutLineItem {
                image: Some("https://cdn.example.com/toner.jpg".to_string()),
                ..item("Toner", Decimal::new(900, 2), 1)
            },
        ];

        let params = checkout_session_params(&items, "https://shop/success", "https://shop/cancel")
            .expect("params");

        let find = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(find("mode"), Some("payment"));
        assert_eq!(find("success_url"), Some("https://shop/success"));
        assert_eq!(
            find("line_items[0][price_data][product_data][name]"),
            Some("Cleanser")
        );
        assert_eq!(find("line_items[0][price_data][unit_amount]"), Some("1250"));
        assert_eq!(find("line_items[0][quantity]"), Some("2"));
        assert_eq!(
            find("line_items[1][price_data][product_data][images][0]"),
            Some("https://cdn.example.com/toner.jpg")
        );
        // No image key for the item without an image
        assert_eq!(
            params
                .iter()
                .filter(|(k, _)| k.contains("[images]"))
                .count(),
            1
        );
    }
}
