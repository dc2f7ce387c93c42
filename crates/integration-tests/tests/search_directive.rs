//! AI search-directive handling and review submission bounds.

use beaulytics_integration_tests::product;
use beaulytics_storefront::models::review::validate_submission;
use beaulytics_storefront::services::skin_ai::{extract_search_directive, recommend_from};

#[test]
fn directive_is_stripped_from_the_displayed_reply() {
    let reply = "Your skin sounds congested. Try a BHA exfoliant twice a week.\n\
                 [SEARCH: salicylic acid]";

    let (keyword, stripped) = extract_search_directive(reply).expect("directive");

    assert_eq!(keyword, "salicylic acid");
    assert!(!stripped.contains("[SEARCH"));
    assert!(stripped.contains("BHA exfoliant"));
}

#[test]
fn replies_without_a_directive_pass_through() {
    assert!(extract_search_directive("Let's talk about your routine first.").is_none());
}

#[test]
fn directive_matching_is_case_insensitive_and_trimmed() {
    let (keyword, _) = extract_search_directive("ok! [Search:   Sunscreen  ]").expect("directive");
    assert_eq!(keyword, "sunscreen");
}

#[test]
fn recommendations_match_name_category_ingredients_and_concerns() {
    let pool = vec![
        product("Gentle Foam Cleanser", Some("Cleanser"), &["Water"], &[]),
        product("Glow Serum", Some("Serum"), &["Niacinamide"], &["Dullness"]),
        product("Spot Gel", None, &["Salicylic Acid"], &["Acne"]),
        product("Barrier Cream", Some("Moisturizer"), &["Ceramide NP"], &[]),
    ];

    assert_eq!(recommend_from(&pool, "cleanser").len(), 1);
    assert_eq!(recommend_from(&pool, "niacinamide").len(), 1);
    assert_eq!(recommend_from(&pool, "acne").len(), 1);
    assert_eq!(recommend_from(&pool, "serum").len(), 1);
    assert!(recommend_from(&pool, "sunscreen").is_empty());
}

#[test]
fn recommendations_cap_at_three() {
    let pool: Vec<_> = (0..6)
        .map(|i| product(&format!("Acne Fix {i}"), None, &[], &["Acne"]))
        .collect();

    assert_eq!(recommend_from(&pool, "acne").len(), 3);
}

#[test]
fn review_ratings_outside_bounds_are_rejected_before_persistence() {
    for bad in [-1i16, 0, 6, 100] {
        assert!(
            validate_submission(bad, "fine product").is_err(),
            "rating {bad} must be rejected"
        );
    }
    for good in 1i16..=5 {
        assert!(validate_submission(good, "fine product").is_ok());
    }
}
