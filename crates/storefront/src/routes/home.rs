//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::db::ProductRepository;
use crate::error::Result;
use crate::filters;
use crate::routes::products::ProductCardView;
use crate::state::AppState;

/// Number of products featured on the home page.
const FEATURED_COUNT: i64 = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub featured: Vec<ProductCardView>,
}

/// Display the home page with the top-rated products.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<HomeTemplate> {
    let products = ProductRepository::new(state.pool())
        .featured(FEATURED_COUNT)
        .await?;

    Ok(HomeTemplate {
        featured: products.iter().map(ProductCardView::from).collect(),
    })
}
