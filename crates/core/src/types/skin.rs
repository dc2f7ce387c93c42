//! Skin profile types.
//!
//! A user's skin profile is stored as a free-text tag list produced by the
//! questionnaire analysis (e.g. `["Combination Skin", "Acne Prone"]`).
//! [`SkinProfile::from_tags`] distills those tags into a typed skin type
//! and concern set for use in ingredient-badge personalization.

use serde::{Deserialize, Serialize};

/// Self-reported skin type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SkinType {
    #[default]
    Normal,
    Oily,
    Dry,
    Combination,
    Sensitive,
}

impl std::fmt::Display for SkinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Normal => "Normal",
            Self::Oily => "Oily",
            Self::Dry => "Dry",
            Self::Combination => "Combination",
            Self::Sensitive => "Sensitive",
        };
        write!(f, "{s}")
    }
}

/// A skin concern extracted from profile tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Concern {
    Acne,
    Aging,
    Dullness,
    Pores,
}

impl std::fmt::Display for Concern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Acne => "Acne",
            Self::Aging => "Aging",
            Self::Dullness => "Dullness",
            Self::Pores => "Pores",
        };
        write!(f, "{s}")
    }
}

/// A user's distilled skin profile: skin type plus concern tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SkinProfile {
    pub skin_type: SkinType,
    pub concerns: Vec<Concern>,
}

impl SkinProfile {
    /// Distill a profile from free-text tags.
    ///
    /// Skin-type matching is priority ordered: a "sensitive" tag wins over
    /// "oily"/"dry"/"combination"; anything unmatched is `Normal`. Concerns
    /// accumulate independently.
    #[must_use]
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> Self {
        let lower: Vec<String> = tags.iter().map(|t| t.as_ref().to_lowercase()).collect();
        let any = |needle: &str| lower.iter().any(|t| t.contains(needle));

        let skin_type = if any("sensitive") {
            SkinType::Sensitive
        } else if any("oily") {
            SkinType::Oily
        } else if any("dry") {
            SkinType::Dry
        } else if any("combination") {
            SkinType::Combination
        } else {
            SkinType::Normal
        };

        let mut concerns = Vec::new();
        if any("acne") {
            concerns.push(Concern::Acne);
        }
        if any("aging") || any("wrinkle") {
            concerns.push(Concern::Aging);
        }
        if any("dull") {
            concerns.push(Concern::Dullness);
        }
        if any("pore") {
            concerns.push(Concern::Pores);
        }

        Self {
            skin_type,
            concerns,
        }
    }

    /// Whether the profile carries a given concern.
    #[must_use]
    pub fn has_concern(&self, concern: Concern) -> bool {
        self.concerns.contains(&concern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tags_empty_is_normal() {
        let profile = SkinProfile::from_tags::<&str>(&[]);
        assert_eq!(profile.skin_type, SkinType::Normal);
        assert!(profile.concerns.is_empty());
    }

    #[test]
    fn test_sensitive_wins_over_oily() {
        let profile = SkinProfile::from_tags(&["Oily Skin", "Mild Sensitive"]);
        assert_eq!(profile.skin_type, SkinType::Sensitive);
    }

    #[test]
    fn test_combination_skin() {
        let profile = SkinProfile::from_tags(&["Combination Skin"]);
        assert_eq!(profile.skin_type, SkinType::Combination);
    }

    #[test]
    fn test_concerns_accumulate() {
        let profile = SkinProfile::from_tags(&[
            "Acne Prone",
            "Early Aging",
            "Dull Tone",
            "Oversized Pores",
        ]);
        assert!(profile.has_concern(Concern::Acne));
        assert!(profile.has_concern(Concern::Aging));
        assert!(profile.has_concern(Concern::Dullness));
        assert!(profile.has_concern(Concern::Pores));
    }

    #[test]
    fn test_wrinkle_maps_to_aging() {
        let profile = SkinProfile::from_tags(&["Fine Wrinkles"]);
        assert!(profile.has_concern(Concern::Aging));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let profile = SkinProfile::from_tags(&["HIGHLY SENSITIVE SKIN"]);
        assert_eq!(profile.skin_type, SkinType::Sensitive);
    }
}
