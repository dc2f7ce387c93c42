//! Product catalog route handlers: listing, detail, and review submission.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use beaulytics_core::ProductId;

use crate::analysis::{IngredientBadge, analyze_ingredients};
use crate::db::{
    CatalogFilter, CatalogSort, ProductRepository, ReviewRepository, UserRepository,
};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{OptionalUser, RequireUser};
use crate::models::{Product, ReviewWithAuthor, review};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Product card data for grid templates.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub category: Option<String>,
    pub rating: Option<Decimal>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            category: product.category.clone(),
            rating: product.rating,
        }
    }
}

/// Review display data for the product page.
pub struct ReviewView {
    pub rating: i16,
    pub comment: Option<String>,
    pub author: String,
    pub date: String,
}

impl From<&ReviewWithAuthor> for ReviewView {
    fn from(review: &ReviewWithAuthor) -> Self {
        Self {
            rating: review.rating,
            comment: review.comment.clone(),
            author: review
                .author
                .clone()
                .unwrap_or_else(|| "Anonymous".to_string()),
            date: review.created_at.format("%b %e, %Y").to_string(),
        }
    }
}

// =============================================================================
// Query & Form Types
// =============================================================================

/// Catalog listing query parameters.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
    pub q: Option<String>,
    pub sort: Option<String>,
}

/// Review submission form data.
#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    pub rating: i16,
    pub comment: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductCardView>,
    pub categories: Vec<String>,
    pub active_category: Option<String>,
    pub active_sort: String,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: Product,
    pub badges: Vec<IngredientBadge>,
    pub reviews: Vec<ReviewView>,
    pub logged_in: bool,
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the product listing page with filters.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<ProductsIndexTemplate> {
    let repo = ProductRepository::new(state.pool());

    let filter = CatalogFilter {
        category: query.category.clone().filter(|c| !c.is_empty()),
        min_price: query.min,
        max_price: query.max,
        query: query.q.clone().filter(|q| !q.is_empty()),
        sort: CatalogSort::parse(query.sort.as_deref()),
    };

    let products = repo.list(&filter).await?;
    let categories = repo.categories().await?;

    Ok(ProductsIndexTemplate {
        products: products.iter().map(ProductCardView::from).collect(),
        categories,
        active_category: filter.category,
        active_sort: query.sort.unwrap_or_else(|| "new".to_string()),
    })
}

/// Message query for redirect-back errors.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Display a product detail page with badges and reviews.
///
/// Ingredient badges are personalized when the viewer has a stored skin
/// profile.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Query(query): Query<MessageQuery>,
    OptionalUser(user): OptionalUser,
) -> Result<ProductShowTemplate> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    // Personalize badges when the viewer has completed the questionnaire
    let profile = match &user {
        Some(current) => UserRepository::new(state.pool())
            .get_by_id(current.id)
            .await?
            .and_then(|u| u.profile()),
        None => None,
    };

    let badges = analyze_ingredients(&product.ingredients, profile.as_ref());

    let reviews = ReviewRepository::new(state.pool())
        .list_for_product(product.id)
        .await?;

    Ok(ProductShowTemplate {
        product,
        badges,
        reviews: reviews.iter().map(ReviewView::from).collect(),
        logged_in: user.is_some(),
        error: query.error,
    })
}

/// Handle a review submission, then recompute the product's rating summary.
#[instrument(skip(state, form))]
pub async fn submit_review(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    RequireUser(user): RequireUser,
    Form(form): Form<ReviewForm>,
) -> Response {
    let comment = form.comment.as_deref().unwrap_or("").trim();

    // Schema validation happens before anything touches the database
    if let Err(message) = review::validate_submission(form.rating, comment) {
        return Redirect::to(&format!(
            "/products/{id}?error={}",
            urlencoding::encode(&message)
        ))
        .into_response();
    }

    let comment = (!comment.is_empty()).then_some(comment);

    let result = async {
        ReviewRepository::new(state.pool())
            .upsert(user.id, id, form.rating, comment)
            .await?;
        ProductRepository::new(state.pool())
            .refresh_rating_summary(id)
            .await
    }
    .await;

    match result {
        Ok(()) => Redirect::to(&format!("/products/{id}")).into_response(),
        Err(e) => {
            tracing::error!("Failed to save review: {e}");
            Redirect::to(&format!("/products/{id}?error=review_failed")).into_response()
        }
    }
}
