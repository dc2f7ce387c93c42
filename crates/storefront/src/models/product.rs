//! Product catalog models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use beaulytics_core::ProductId;

/// A catalog product row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    /// Unit price in the store currency.
    pub price: Decimal,
    pub image: Option<String>,
    pub category: Option<String>,
    /// Pack size, e.g. "100 ml".
    pub size: Option<String>,
    /// INCI-style ingredient names.
    pub ingredients: Vec<String>,
    /// Concern tags this product targets, e.g. "Acne".
    pub concerns: Vec<String>,
    /// Denormalized average review rating (0..5).
    pub rating: Option<Decimal>,
    /// Denormalized review count.
    pub review_count: i32,
    /// Denormalized outbound click count.
    pub click_count: i32,
    /// Outbound marketplace links.
    pub shopee_url: Option<String>,
    pub tokopedia_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Case-insensitive substring match over name, category, ingredients,
    /// and concern tags. Drives the AI search-directive recommendations.
    #[must_use]
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.to_lowercase();
        if needle.is_empty() {
            return false;
        }

        self.name.to_lowercase().contains(&needle)
            || self
                .category
                .as_ref()
                .is_some_and(|c| c.to_lowercase().contains(&needle))
            || self
                .ingredients
                .iter()
                .any(|i| i.to_lowercase().contains(&needle))
            || self
                .concerns
                .iter()
                .any(|c| c.to_lowercase().contains(&needle))
    }
}

/// Outbound marketplace platform for click tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "click_platform", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ClickPlatform {
    Shopee,
    Tokopedia,
    Other,
}

impl std::fmt::Display for ClickPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shopee => write!(f, "shopee"),
            Self::Tokopedia => write!(f, "tokopedia"),
            Self::Other => write!(f, "other"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, category: Option<&str>, ingredients: &[&str], concerns: &[&str]) -> Product {
        Product {
            id: ProductId::generate(),
            name: name.to_string(),
            description: None,
            price: Decimal::new(1999, 2),
            image: None,
            category: category.map(String::from),
            size: None,
            ingredients: ingredients.iter().map(|s| (*s).to_string()).collect(),
            concerns: concerns.iter().map(|s| (*s).to_string()).collect(),
            rating: None,
            review_count: 0,
            click_count: 0,
            shopee_url: None,
            tokopedia_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_matches_keyword_on_name() {
        let p = product("Gentle Foam Cleanser", None, &[], &[]);
        assert!(p.matches_keyword("cleanser"));
        assert!(p.matches_keyword("FOAM"));
        assert!(!p.matches_keyword("toner"));
    }

    #[test]
    fn test_matches_keyword_on_ingredients() {
        let p = product("Clear Serum", Some("Serum"), &["Salicylic Acid", "Niacinamide"], &[]);
        assert!(p.matches_keyword("salicylic acid"));
        assert!(p.matches_keyword("niacinamide"));
    }

    #[test]
    fn test_matches_keyword_on_concerns() {
        let p = product("Spot Gel", None, &[], &["Acne", "Pores"]);
        assert!(p.matches_keyword("acne"));
    }

    #[test]
    fn test_empty_keyword_never_matches() {
        let p = product("Anything", Some("Toner"), &["Water"], &["Acne"]);
        assert!(!p.matches_keyword(""));
    }
}
