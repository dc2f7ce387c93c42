//! Product repository for catalog queries.

use rust_decimal::Decimal;
use sqlx::PgPool;

use beaulytics_core::ProductId;

use super::RepositoryError;
use crate::models::Product;

/// Columns selected for a full product row.
const PRODUCT_COLUMNS: &str = "id, name, description, price, image, category, size, \
     ingredients, concerns, rating, review_count, click_count, \
     shopee_url, tokopedia_url, created_at";

/// Upper bound on the product list fetched for AI keyword matching.
const AI_SEARCH_FETCH_LIMIT: i64 = 50;

/// Sort order for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Rating,
}

impl CatalogSort {
    /// Parse the `?sort=` query value; unknown values fall back to newest.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("price_asc") => Self::PriceAsc,
            Some("price_desc") => Self::PriceDesc,
            Some("rating") => Self::Rating,
            _ => Self::Newest,
        }
    }

    const fn order_clause(self) -> &'static str {
        match self {
            Self::Newest => "created_at DESC",
            Self::PriceAsc => "price ASC",
            Self::PriceDesc => "price DESC",
            Self::Rating => "rating DESC NULLS LAST",
        }
    }
}

/// Catalog listing filter.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Case-insensitive substring match on the product name.
    pub query: Option<String>,
    pub sort: CatalogSort,
}

/// Repository for product catalog operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products matching a catalog filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &CatalogFilter) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE ($1::text IS NULL OR category = $1) \
               AND ($2::numeric IS NULL OR price >= $2) \
               AND ($3::numeric IS NULL OR price <= $3) \
               AND ($4::text IS NULL OR name ILIKE '%' || $4 || '%') \
             ORDER BY {}",
            filter.sort.order_clause()
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(filter.category.as_deref())
            .bind(filter.min_price)
            .bind(filter.max_price)
            .bind(filter.query.as_deref())
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(product)
    }

    /// Get several products by ID, preserving no particular order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let uuids: Vec<uuid::Uuid> = ids.iter().map(|id| id.as_uuid()).collect();
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)");
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(&uuids)
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// The highest-rated products for the home page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn featured(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             ORDER BY rating DESC NULLS LAST, review_count DESC LIMIT $1"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// Distinct category names for the filter bar.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self) -> Result<Vec<String>, RepositoryError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT category FROM products WHERE category IS NOT NULL ORDER BY category",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(|(category,)| category).collect())
    }

    /// A bounded product list for AI search-directive matching.
    ///
    /// The keyword filter itself happens in memory over this bounded set
    /// ([`Product::matches_keyword`]), mirroring the bounded-fetch contract
    /// of the recommendation flow.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search_pool(&self) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC LIMIT $1"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(AI_SEARCH_FETCH_LIMIT)
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// Recompute the denormalized rating summary from the reviews table.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn refresh_rating_summary(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE products SET \
                 rating = (SELECT ROUND(AVG(rating)::numeric, 2) FROM reviews WHERE product_id = $1), \
                 review_count = (SELECT COUNT(*)::int FROM reviews WHERE product_id = $1) \
             WHERE id = $1",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parse() {
        assert_eq!(CatalogSort::parse(Some("price_asc")), CatalogSort::PriceAsc);
        assert_eq!(CatalogSort::parse(Some("price_desc")), CatalogSort::PriceDesc);
        assert_eq!(CatalogSort::parse(Some("rating")), CatalogSort::Rating);
        assert_eq!(CatalogSort::parse(Some("new")), CatalogSort::Newest);
        assert_eq!(CatalogSort::parse(Some("bogus")), CatalogSort::Newest);
        assert_eq!(CatalogSort::parse(None), CatalogSort::Newest);
    }

    #[test]
    fn test_order_clause_is_fixed_vocabulary() {
        // The ORDER BY fragment is interpolated into SQL, so it must come
        // from this closed set and never from user input.
        for sort in [
            CatalogSort::Newest,
            CatalogSort::PriceAsc,
            CatalogSort::PriceDesc,
            CatalogSort::Rating,
        ] {
            assert!(!sort.order_clause().is_empty());
            assert!(!sort.order_clause().contains('$'));
        }
    }
}
