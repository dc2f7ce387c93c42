//! Ingredient encyclopedia models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use beaulytics_core::IngredientId;

/// An ingredient encyclopedia entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub benefits: Vec<String>,
    /// Free-text safety classification, e.g. "low", "moderate", "high".
    pub safety_level: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Ingredient {
    /// Coarse safety bucket for display styling.
    #[must_use]
    pub fn safety_bucket(&self) -> SafetyBucket {
        let Some(level) = &self.safety_level else {
            return SafetyBucket::Unknown;
        };
        let level = level.to_lowercase();
        if level.contains("low") || level.contains("safe") {
            SafetyBucket::Safe
        } else if level.contains("high") || level.contains("hazard") {
            SafetyBucket::Caution
        } else {
            SafetyBucket::Unknown
        }
    }
}

/// Display bucket for an ingredient's safety level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyBucket {
    Safe,
    Caution,
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(safety: Option<&str>) -> Ingredient {
        Ingredient {
            id: IngredientId::generate(),
            name: "Niacinamide".to_string(),
            slug: "niacinamide".to_string(),
            description: None,
            benefits: Vec::new(),
            safety_level: safety.map(String::from),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_safety_bucket() {
        assert_eq!(ingredient(Some("Low risk")).safety_bucket(), SafetyBucket::Safe);
        assert_eq!(ingredient(Some("high")).safety_bucket(), SafetyBucket::Caution);
        assert_eq!(ingredient(Some("moderate")).safety_bucket(), SafetyBucket::Unknown);
        assert_eq!(ingredient(None).safety_bucket(), SafetyBucket::Unknown);
    }
}
