//! Catalog seeding command.
//!
//! Loads products and ingredient encyclopedia entries from a YAML fixture.
//! Existing rows are matched by product name / ingredient slug and skipped,
//! so re-running the seed is safe.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use super::CommandError;

/// The fixture file shape.
#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default)]
    products: Vec<ProductSeed>,
    #[serde(default)]
    ingredients: Vec<IngredientSeed>,
}

#[derive(Debug, Deserialize)]
struct ProductSeed {
    name: String,
    #[serde(default)]
    description: Option<String>,
    price: Decimal,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    ingredients: Vec<String>,
    #[serde(default)]
    concerns: Vec<String>,
    #[serde(default)]
    shopee_url: Option<String>,
    #[serde(default)]
    tokopedia_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IngredientSeed {
    name: String,
    slug: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    benefits: Vec<String>,
    #[serde(default)]
    safety_level: Option<String>,
}

/// Seed the database from a fixture file.
///
/// # Errors
///
/// Returns `CommandError` if the fixture is unreadable or a write fails.
pub async fn run(file: &Path) -> Result<(), CommandError> {
    let raw = std::fs::read_to_string(file)?;
    let fixture: Fixture = serde_yaml::from_str(&raw)?;

    let pool = super::connect().await?;

    let mut inserted_products = 0u32;
    for product in &fixture.products {
        if seed_product(&pool, product).await? {
            inserted_products += 1;
        }
    }

    let mut inserted_ingredients = 0u32;
    for ingredient in &fixture.ingredients {
        if seed_ingredient(&pool, ingredient).await? {
            inserted_ingredients += 1;
        }
    }

    tracing::info!(
        "Seed complete: {inserted_products}/{} products, {inserted_ingredients}/{} ingredients",
        fixture.products.len(),
        fixture.ingredients.len()
    );

    Ok(())
}

/// Insert one product unless a row with the same name exists.
async fn seed_product(pool: &PgPool, product: &ProductSeed) -> Result<bool, CommandError> {
    let exists: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM products WHERE name = $1")
        .bind(&product.name)
        .fetch_optional(pool)
        .await?;

    if exists.is_some() {
        tracing::debug!("Skipping existing product: {}", product.name);
        return Ok(false);
    }

    sqlx::query(
        "INSERT INTO products \
             (name, description, price, image, category, size, ingredients, concerns, \
              shopee_url, tokopedia_url) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price)
    .bind(&product.image)
    .bind(&product.category)
    .bind(&product.size)
    .bind(&product.ingredients)
    .bind(&product.concerns)
    .bind(&product.shopee_url)
    .bind(&product.tokopedia_url)
    .execute(pool)
    .await?;

    Ok(true)
}

/// Insert one encyclopedia entry unless the slug exists.
async fn seed_ingredient(pool: &PgPool, ingredient: &IngredientSeed) -> Result<bool, CommandError> {
    let result = sqlx::query(
        "INSERT INTO ingredients (name, slug, description, benefits, safety_level) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (slug) DO NOTHING",
    )
    .bind(&ingredient.name)
    .bind(&ingredient.slug)
    .bind(&ingredient.description)
    .bind(&ingredient.benefits)
    .bind(&ingredient.safety_level)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
