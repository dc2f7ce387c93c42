//! Product comparison route handler.
//!
//! The comparison set comes in as `?ids=<uuid>,<uuid>,...`; the page pings
//! `POST /api/compare-log` from a small script so signed-in comparisons
//! land in the log table.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use beaulytics_core::ProductId;

use crate::analysis::{IngredientBadge, analyze_ingredients};
use crate::db::ProductRepository;
use crate::error::Result;
use crate::filters;
use crate::models::Product;
use crate::state::AppState;

/// Most products comparable at once.
const MAX_COMPARE: usize = 4;

/// Compare page query parameters.
#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    /// Comma-separated product IDs.
    pub ids: Option<String>,
}

/// One comparison column.
pub struct CompareColumn {
    pub product: Product,
    pub badges: Vec<IngredientBadge>,
}

/// Compare page template.
#[derive(Template, WebTemplate)]
#[template(path = "compare/show.html")]
pub struct CompareTemplate {
    pub columns: Vec<CompareColumn>,
    /// JSON array of the compared IDs, consumed by the logging script.
    pub ids_json: String,
}

/// Parse the `ids` query value, dropping anything that isn't a UUID.
fn parse_ids(raw: Option<&str>) -> Vec<ProductId> {
    raw.unwrap_or_default()
        .split(',')
        .filter_map(|part| part.trim().parse::<ProductId>().ok())
        .take(MAX_COMPARE)
        .collect()
}

/// Display the comparison page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<CompareQuery>,
) -> Result<CompareTemplate> {
    let ids = parse_ids(query.ids.as_deref());

    let mut products = if ids.is_empty() {
        Vec::new()
    } else {
        ProductRepository::new(state.pool()).get_many(&ids).await?
    };

    // Preserve the order the shopper picked
    products.sort_by_key(|p| ids.iter().position(|id| *id == p.id));

    let ids_json = serde_json::to_string(&products.iter().map(|p| p.id).collect::<Vec<_>>())
        .unwrap_or_else(|_| "[]".to_string());

    let columns = products
        .into_iter()
        .map(|product| {
            let badges = analyze_ingredients(&product.ingredients, None);
            CompareColumn { product, badges }
        })
        .collect();

    Ok(CompareTemplate { columns, ids_json })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids_filters_garbage() {
        let a = ProductId::generate();
        let b = ProductId::generate();
        let raw = format!("{a}, not-a-uuid,, {b}");

        assert_eq!(parse_ids(Some(&raw)), vec![a, b]);
    }

    #[test]
    fn test_parse_ids_caps_at_max() {
        let raw = (0..10)
            .map(|_| ProductId::generate().to_string())
            .collect::<Vec<_>>()
            .join(",");

        assert_eq!(parse_ids(Some(&raw)).len(), MAX_COMPARE);
    }

    #[test]
    fn test_parse_ids_empty() {
        assert!(parse_ids(None).is_empty());
        assert!(parse_ids(Some("")).is_empty());
    }
}
