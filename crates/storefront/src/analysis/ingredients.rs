//! Ingredient keyword analyzer.
//!
//! Classifies an ingredient list into labeled badges by case-insensitive
//! substring matching against fixed keyword tables, optionally personalized
//! with the user's skin profile.

use serde::{Deserialize, Serialize};

use beaulytics_core::{Concern, SkinProfile, SkinType};

/// Fatty alcohols are emollients, not drying agents, so they never trigger
/// the alcohol flag.
const FATTY_ALCOHOL_EXCEPTIONS: &[&str] =
    &["cetyl", "stearyl", "cetearyl", "behenyl", "panthenol"];

/// Highlight actives: (badge label, match keywords).
const HIGHLIGHTS: &[(&str, &[&str])] = &[
    ("Niacinamide", &["niacinamide"]),
    ("Salicylic Acid", &["salicylic acid", "bha"]),
    ("Hyaluronic Acid", &["hyaluronic", "sodium hyaluronate"]),
    ("Ceramide", &["ceramide"]),
    ("Retinol", &["retinol", "retinoid"]),
    ("Centella", &["centella"]),
];

/// Badge classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientStatus {
    Positive,
    Negative,
    Neutral,
    Highlight,
}

/// A labeled classification attached to an ingredient list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientBadge {
    pub label: String,
    pub status: IngredientStatus,
}

impl IngredientBadge {
    fn new(label: impl Into<String>, status: IngredientStatus) -> Self {
        Self {
            label: label.into(),
            status,
        }
    }

    /// CSS class for rendering this badge.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self.status {
            IngredientStatus::Positive => "badge badge-positive",
            IngredientStatus::Negative => "badge badge-negative",
            IngredientStatus::Neutral => "badge badge-neutral",
            IngredientStatus::Highlight => "badge badge-highlight",
        }
    }
}

/// Analyze an ingredient list into badges.
///
/// Matching is case-insensitive substring matching. Highlight badges come
/// first, then negative flags, then the "free of" positives for axes that
/// never matched. When a profile is given, negative labels carry
/// profile-specific wording and acne/dry-skin-specific warnings are added.
#[must_use]
pub fn analyze_ingredients(
    ingredients: &[String],
    profile: Option<&SkinProfile>,
) -> Vec<IngredientBadge> {
    if ingredients.is_empty() {
        return Vec::new();
    }

    let lower: Vec<String> = ingredients.iter().map(|i| i.to_lowercase()).collect();

    let has_alcohol = lower.iter().any(|i| {
        i.contains("alcohol") && !FATTY_ALCOHOL_EXCEPTIONS.iter().any(|ex| i.contains(ex))
    });
    let has_fragrance = lower
        .iter()
        .any(|i| i.contains("fragrance") || i.contains("parfum"));
    let has_sulfate = lower.iter().any(|i| i.contains("sulfate"));

    let mut badges = Vec::new();

    for (label, keywords) in HIGHLIGHTS {
        if lower
            .iter()
            .any(|i| keywords.iter().any(|kw| i.contains(kw)))
        {
            badges.push(IngredientBadge::new(*label, IngredientStatus::Highlight));
        }
    }

    let sensitive = profile.is_some_and(|p| p.skin_type == SkinType::Sensitive);

    if has_alcohol {
        let label = if sensitive {
            "Contains Alcohol (risk of irritation for sensitive skin)"
        } else {
            "Contains Alcohol"
        };
        badges.push(IngredientBadge::new(label, IngredientStatus::Negative));
    }
    if has_fragrance {
        let label = if sensitive {
            "Contains Fragrance (potential allergen for sensitive skin)"
        } else {
            "Contains Fragrance"
        };
        badges.push(IngredientBadge::new(label, IngredientStatus::Negative));
    }
    if has_sulfate {
        let label = if sensitive {
            "Contains Sulfates (can be drying and irritating)"
        } else {
            "Contains Sulfates"
        };
        badges.push(IngredientBadge::new(label, IngredientStatus::Negative));
    }

    if let Some(profile) = profile {
        badges.extend(profile_warnings(&lower, profile));
    }

    if !has_alcohol {
        badges.push(IngredientBadge::new(
            "Alcohol Free",
            IngredientStatus::Positive,
        ));
    }
    if !has_fragrance {
        badges.push(IngredientBadge::new(
            "Fragrance Free",
            IngredientStatus::Positive,
        ));
    }

    badges
}

/// Concern-specific warnings for an already-lowercased ingredient list.
fn profile_warnings(lower: &[String], profile: &SkinProfile) -> Vec<IngredientBadge> {
    let any = |keywords: &[&str]| {
        lower
            .iter()
            .any(|i| keywords.iter().any(|kw| i.contains(kw)))
    };

    let mut warnings = Vec::new();

    if profile.has_concern(Concern::Acne) {
        if any(&["coconut oil", "cocos nucifera"]) {
            warnings.push(IngredientBadge::new(
                "Contains Coconut Oil (highly comedogenic)",
                IngredientStatus::Negative,
            ));
        }
        if any(&["cocoa butter"]) {
            warnings.push(IngredientBadge::new(
                "Contains Cocoa Butter (comedogenic)",
                IngredientStatus::Negative,
            ));
        }
        if any(&["lanolin"]) {
            warnings.push(IngredientBadge::new(
                "Contains Lanolin (can clog pores)",
                IngredientStatus::Negative,
            ));
        }
    }

    if profile.skin_type == SkinType::Dry {
        if any(&["alcohol denat"]) {
            warnings.push(IngredientBadge::new(
                "Contains Alcohol Denat (drying)",
                IngredientStatus::Negative,
            ));
        }
        if any(&["clay", "kaolin"]) {
            warnings.push(IngredientBadge::new(
                "Contains Clay (can be too drying)",
                IngredientStatus::Negative,
            ));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn labels(badges: &[IngredientBadge], status: IngredientStatus) -> Vec<&str> {
        badges
            .iter()
            .filter(|b| b.status == status)
            .map(|b| b.label.as_str())
            .collect()
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(analyze_ingredients(&[], None).is_empty());
    }

    #[test]
    fn test_clean_list_gets_free_of_positives() {
        let badges = analyze_ingredients(&strings(&["Water", "Glycerin", "Niacinamide"]), None);

        let positives = labels(&badges, IngredientStatus::Positive);
        assert!(positives.contains(&"Alcohol Free"));
        assert!(positives.contains(&"Fragrance Free"));
        assert!(labels(&badges, IngredientStatus::Negative).is_empty());
    }

    #[test]
    fn test_alcohol_denat_flags_alcohol() {
        let badges = analyze_ingredients(&strings(&["Alcohol Denat", "Water"]), None);

        assert!(labels(&badges, IngredientStatus::Negative).contains(&"Contains Alcohol"));
        assert!(!labels(&badges, IngredientStatus::Positive).contains(&"Alcohol Free"));
    }

    #[test]
    fn test_fatty_alcohols_are_exempt() {
        for fatty in [
            "Cetyl Alcohol",
            "Stearyl Alcohol",
            "Cetearyl Alcohol",
            "Behenyl Alcohol",
            "Panthenol Alcohol Complex",
        ] {
            let badges = analyze_ingredients(&strings(&[fatty]), None);
            assert!(
                labels(&badges, IngredientStatus::Negative).is_empty(),
                "{fatty} must not trigger the alcohol flag"
            );
            assert!(labels(&badges, IngredientStatus::Positive).contains(&"Alcohol Free"));
        }
    }

    #[test]
    fn test_fragrance_and_parfum_flag() {
        for name in ["Fragrance", "Parfum"] {
            let badges = analyze_ingredients(&strings(&[name]), None);
            assert!(labels(&badges, IngredientStatus::Negative).contains(&"Contains Fragrance"));
            assert!(!labels(&badges, IngredientStatus::Positive).contains(&"Fragrance Free"));
        }
    }

    #[test]
    fn test_sulfate_flag() {
        let badges = analyze_ingredients(&strings(&["Sodium Laureth Sulfate"]), None);
        assert!(labels(&badges, IngredientStatus::Negative).contains(&"Contains Sulfates"));
    }

    #[test]
    fn test_highlights_deduplicate() {
        let badges = analyze_ingredients(
            &strings(&["Niacinamide", "Niacinamide 5%", "Salicylic Acid", "BHA Complex"]),
            None,
        );

        let highlights = labels(&badges, IngredientStatus::Highlight);
        assert_eq!(
            highlights
                .iter()
                .filter(|l| **l == "Niacinamide")
                .count(),
            1
        );
        assert_eq!(
            highlights
                .iter()
                .filter(|l| **l == "Salicylic Acid")
                .count(),
            1
        );
    }

    #[test]
    fn test_retinoid_highlights_as_retinol() {
        let badges = analyze_ingredients(&strings(&["Granactive Retinoid"]), None);
        assert!(labels(&badges, IngredientStatus::Highlight).contains(&"Retinol"));
    }

    #[test]
    fn test_sensitive_profile_personalizes_labels() {
        let profile = SkinProfile::from_tags(&["Highly Sensitive Skin"]);
        let badges = analyze_ingredients(&strings(&["Alcohol Denat", "Parfum"]), Some(&profile));

        let negatives = labels(&badges, IngredientStatus::Negative);
        assert!(negatives
            .iter()
            .any(|l| l.contains("sensitive skin") && l.contains("Alcohol")));
        assert!(negatives
            .iter()
            .any(|l| l.contains("allergen") && l.contains("Fragrance")));
    }

    #[test]
    fn test_acne_profile_flags_comedogenic_oils() {
        let profile = SkinProfile::from_tags(&["Acne Prone"]);
        let badges = analyze_ingredients(
            &strings(&["Cocos Nucifera Oil", "Cocoa Butter", "Lanolin"]),
            Some(&profile),
        );

        let negatives = labels(&badges, IngredientStatus::Negative);
        assert!(negatives.iter().any(|l| l.contains("Coconut Oil")));
        assert!(negatives.iter().any(|l| l.contains("Cocoa Butter")));
        assert!(negatives.iter().any(|l| l.contains("Lanolin")));
    }

    #[test]
    fn test_dry_profile_flags_clay() {
        let profile = SkinProfile::from_tags(&["Dry Skin"]);
        let badges = analyze_ingredients(&strings(&["Kaolin"]), Some(&profile));

        assert!(labels(&badges, IngredientStatus::Negative)
            .iter()
            .any(|l| l.contains("Clay")));
    }

    #[test]
    fn test_no_profile_no_concern_warnings() {
        let badges = analyze_ingredients(&strings(&["Coconut Oil", "Kaolin"]), None);
        assert!(labels(&badges, IngredientStatus::Negative).is_empty());
    }
}
