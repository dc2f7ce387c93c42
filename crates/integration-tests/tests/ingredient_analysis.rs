//! Ingredient analyzer properties: negative axes, "free of" positives,
//! fatty-alcohol exceptions, and profile personalization.

use beaulytics_core::SkinProfile;
use beaulytics_storefront::analysis::{IngredientStatus, analyze_ingredients};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn labels_with(
    badges: &[beaulytics_storefront::analysis::IngredientBadge],
    status: IngredientStatus,
) -> Vec<String> {
    badges
        .iter()
        .filter(|b| b.status == status)
        .map(|b| b.label.clone())
        .collect()
}

#[test]
fn clean_lists_earn_free_of_badges_and_no_negatives() {
    let clean_lists: &[&[&str]] = &[
        &["Water", "Glycerin", "Niacinamide"],
        &["Centella Asiatica Extract", "Panthenol"],
        &["Squalane"],
    ];

    for list in clean_lists {
        let badges = analyze_ingredients(&strings(list), None);
        let positives = labels_with(&badges, IngredientStatus::Positive);

        assert!(positives.contains(&"Alcohol Free".to_string()), "{list:?}");
        assert!(positives.contains(&"Fragrance Free".to_string()), "{list:?}");
        assert!(
            labels_with(&badges, IngredientStatus::Negative).is_empty(),
            "{list:?}"
        );
    }
}

#[test]
fn alcohol_denat_triggers_the_alcohol_flag() {
    let badges = analyze_ingredients(&strings(&["Water", "Alcohol Denat"]), None);
    let negatives = labels_with(&badges, IngredientStatus::Negative);

    assert!(negatives.iter().any(|l| l.contains("Alcohol")));
    assert!(!labels_with(&badges, IngredientStatus::Positive).contains(&"Alcohol Free".to_string()));
}

#[test]
fn fatty_alcohols_do_not_trigger_the_alcohol_flag() {
    for fatty in [
        "Cetyl Alcohol",
        "Stearyl Alcohol",
        "Cetearyl Alcohol",
        "Behenyl Alcohol",
    ] {
        let badges = analyze_ingredients(&strings(&["Water", fatty]), None);

        assert!(
            labels_with(&badges, IngredientStatus::Negative).is_empty(),
            "{fatty} should be exempt"
        );
        assert!(
            labels_with(&badges, IngredientStatus::Positive)
                .contains(&"Alcohol Free".to_string()),
            "{fatty} should still earn Alcohol Free"
        );
    }
}

#[test]
fn fragrance_sulfate_axes_flag_independently() {
    let badges = analyze_ingredients(
        &strings(&["Parfum", "Sodium Lauryl Sulfate"]),
        None,
    );
    let negatives = labels_with(&badges, IngredientStatus::Negative);

    assert!(negatives.iter().any(|l| l.contains("Fragrance")));
    assert!(negatives.iter().any(|l| l.contains("Sulfates")));
    // Alcohol axis stayed clean
    assert!(labels_with(&badges, IngredientStatus::Positive)
        .contains(&"Alcohol Free".to_string()));
}

#[test]
fn known_actives_show_as_highlights() {
    let badges = analyze_ingredients(
        &strings(&[
            "Niacinamide",
            "Salicylic Acid",
            "Sodium Hyaluronate",
            "Ceramide NP",
            "Retinol",
            "Centella Asiatica Extract",
        ]),
        None,
    );

    let highlights = labels_with(&badges, IngredientStatus::Highlight);
    for expected in [
        "Niacinamide",
        "Salicylic Acid",
        "Hyaluronic Acid",
        "Ceramide",
        "Retinol",
        "Centella",
    ] {
        assert!(
            highlights.contains(&expected.to_string()),
            "missing highlight {expected}"
        );
    }
}

#[test]
fn acne_profile_adds_comedogenic_warnings() {
    let profile = SkinProfile::from_tags(&["Oily Skin", "Acne Prone"]);
    let badges = analyze_ingredients(
        &strings(&["Cocos Nucifera (Coconut) Oil", "Lanolin"]),
        Some(&profile),
    );
    let negatives = labels_with(&badges, IngredientStatus::Negative);

    assert!(negatives.iter().any(|l| l.contains("Coconut Oil")));
    assert!(negatives.iter().any(|l| l.contains("Lanolin")));
}

#[test]
fn sensitive_profile_personalizes_negative_labels() {
    let profile = SkinProfile::from_tags(&["Highly Sensitive Skin"]);
    let badges = analyze_ingredients(&strings(&["Fragrance"]), Some(&profile));
    let negatives = labels_with(&badges, IngredientStatus::Negative);

    assert!(negatives.iter().any(|l| l.contains("sensitive skin")));
}

#[test]
fn empty_input_produces_no_badges() {
    assert!(analyze_ingredients(&[], None).is_empty());
}
