//! Review models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use beaulytics_core::{ProductId, ReviewId, UserId};

/// Inclusive rating bounds enforced before persistence (the table carries
/// a matching CHECK constraint).
pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

/// Maximum accepted comment length.
pub const MAX_COMMENT_LENGTH: usize = 2000;

/// A product review row. One review per user per product.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A review joined with the reviewer's display name for the product page.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewWithAuthor {
    pub rating: i16,
    pub comment: Option<String>,
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validate a submitted rating/comment pair.
///
/// # Errors
///
/// Returns a human-readable message if the rating is outside 1–5 or the
/// comment exceeds [`MAX_COMMENT_LENGTH`].
pub fn validate_submission(rating: i16, comment: &str) -> Result<(), String> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}"
        ));
    }
    if comment.len() > MAX_COMMENT_LENGTH {
        return Err(format!(
            "comment must be at most {MAX_COMMENT_LENGTH} characters"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(validate_submission(1, "").is_ok());
        assert!(validate_submission(5, "great").is_ok());
        assert!(validate_submission(0, "").is_err());
        assert!(validate_submission(6, "").is_err());
        assert!(validate_submission(-3, "").is_err());
    }

    #[test]
    fn test_comment_length() {
        let long = "x".repeat(MAX_COMMENT_LENGTH + 1);
        assert!(validate_submission(4, &long).is_err());

        let max = "x".repeat(MAX_COMMENT_LENGTH);
        assert!(validate_submission(4, &max).is_ok());
    }
}
