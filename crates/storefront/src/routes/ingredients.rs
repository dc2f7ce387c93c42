//! Ingredient encyclopedia route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use crate::db::IngredientRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::Ingredient;
use crate::models::ingredient::SafetyBucket;
use crate::state::AppState;

/// Encyclopedia index template.
#[derive(Template, WebTemplate)]
#[template(path = "ingredients/index.html")]
pub struct IngredientsIndexTemplate {
    pub entries: Vec<IngredientCardView>,
}

/// Encyclopedia entry template.
#[derive(Template, WebTemplate)]
#[template(path = "ingredients/show.html")]
pub struct IngredientShowTemplate {
    pub ingredient: Ingredient,
    pub safety_class: &'static str,
}

/// Card data for the index grid.
pub struct IngredientCardView {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub safety_level: Option<String>,
    pub safety_class: &'static str,
}

/// CSS class for a safety bucket.
const fn safety_class(bucket: SafetyBucket) -> &'static str {
    match bucket {
        SafetyBucket::Safe => "safety-safe",
        SafetyBucket::Caution => "safety-caution",
        SafetyBucket::Unknown => "safety-unknown",
    }
}

impl From<&Ingredient> for IngredientCardView {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            name: ingredient.name.clone(),
            slug: ingredient.slug.clone(),
            description: ingredient.description.clone(),
            safety_level: ingredient.safety_level.clone(),
            safety_class: safety_class(ingredient.safety_bucket()),
        }
    }
}

/// Display the encyclopedia index.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<IngredientsIndexTemplate> {
    let entries = IngredientRepository::new(state.pool()).list().await?;

    Ok(IngredientsIndexTemplate {
        entries: entries.iter().map(IngredientCardView::from).collect(),
    })
}

/// Display one encyclopedia entry.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<IngredientShowTemplate> {
    let ingredient = IngredientRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("ingredient {slug}")))?;

    let safety_class = safety_class(ingredient.safety_bucket());

    Ok(IngredientShowTemplate {
        ingredient,
        safety_class,
    })
}
