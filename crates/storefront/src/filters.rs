//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Format a decimal amount as a display price.
///
/// Usage in templates: `{{ product.price|format_price }}`
#[askama::filter_fn]
pub fn format_price(amount: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("${amount:.2}"))
}

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the content hash for main.css.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

#[cfg(test)]
mod tests {
    use askama::Template;
    use rust_decimal::Decimal;

    use crate::filters;

    #[derive(Template)]
    #[template(source = "{{ price|format_price }}", ext = "txt")]
    struct PriceTemplate {
        price: Decimal,
    }

    #[test]
    fn test_format_price() {
        let rendered = PriceTemplate {
            price: Decimal::new(1999, 2),
        }
        .render()
        .expect("render");
        assert_eq!(rendered, "$19.99");

        let rendered = PriceTemplate {
            price: Decimal::new(12, 0),
        }
        .render()
        .expect("render");
        assert_eq!(rendered, "$12.00");
    }
}
