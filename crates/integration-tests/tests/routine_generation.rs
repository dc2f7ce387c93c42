//! Routine generation properties: the morning/night split and the fixed
//! layering order.

use beaulytics_integration_tests::cart_line;
use beaulytics_storefront::analysis::generate_routine;

#[test]
fn six_product_cart_splits_into_morning_and_night() {
    let lines = vec![
        cart_line("Gentle Cleanser", Some("Cleanser"), &["Water", "Glycerin"]),
        cart_line("Hydrating Toner", Some("Toner"), &["Water", "Sodium Hyaluronate"]),
        cart_line("Vitamin C Serum", Some("Serum"), &["Ascorbic Acid"]),
        cart_line("Retinol Serum", Some("Serum"), &["Retinol", "Squalane"]),
        cart_line("Barrier Moisturizer", Some("Moisturizer"), &["Ceramide NP"]),
        cart_line("Daily SPF 50", Some("Sunscreen"), &["Zinc Oxide"]),
    ];

    let routine = generate_routine(&lines);

    let morning: Vec<&str> = routine
        .morning
        .iter()
        .map(|s| s.product.name.as_str())
        .collect();
    let night: Vec<&str> = routine
        .night
        .iter()
        .map(|s| s.product.name.as_str())
        .collect();

    // Morning excludes the retinol serum, night excludes the sunscreen,
    // and both follow Cleanser -> Toner -> Serum -> Moisturizer (-> Sunscreen).
    assert_eq!(
        morning,
        vec![
            "Gentle Cleanser",
            "Hydrating Toner",
            "Vitamin C Serum",
            "Barrier Moisturizer",
            "Daily SPF 50",
        ]
    );
    assert_eq!(
        night,
        vec![
            "Gentle Cleanser",
            "Hydrating Toner",
            "Vitamin C Serum",
            "Retinol Serum",
            "Barrier Moisturizer",
        ]
    );
}

#[test]
fn retinol_never_reaches_the_morning_list() {
    let lines = vec![
        cart_line("Retinol Cream", Some("Moisturizer"), &["Retinol"]),
        cart_line("Retinoid Ampoule", Some("Serum"), &["Granactive RETINOL Complex"]),
    ];

    let routine = generate_routine(&lines);

    assert!(routine.morning.is_empty());
    assert_eq!(routine.night.len(), 2);
}

#[test]
fn sunscreen_never_reaches_the_night_list() {
    let lines = vec![cart_line("Daily SPF 50", Some("Sunscreen"), &["Zinc Oxide"])];

    let routine = generate_routine(&lines);

    assert_eq!(routine.morning.len(), 1);
    assert!(routine.night.is_empty());
}

#[test]
fn duplicate_cart_lines_collapse_to_one_step() {
    let toner = cart_line("Toner", Some("Toner"), &[]);
    let mut duplicate = toner.clone();
    duplicate.qty = 3;

    let routine = generate_routine(&[toner, duplicate]);

    assert_eq!(routine.morning.len(), 1);
    assert_eq!(routine.night.len(), 1);
}

#[test]
fn unknown_categories_sort_after_known_steps() {
    let lines = vec![
        cart_line("Mystery Ampoule", None, &[]),
        cart_line("Sheet Mask", Some("Mask"), &[]),
        cart_line("Cleanser", Some("Cleanser"), &[]),
        cart_line("Moisturizer", Some("Moisturizer"), &[]),
    ];

    let routine = generate_routine(&lines);

    let morning: Vec<&str> = routine
        .morning
        .iter()
        .map(|s| s.product.name.as_str())
        .collect();

    // Known steps first, unrecognized categories trail in insertion order
    assert_eq!(
        morning,
        vec!["Cleanser", "Moisturizer", "Mystery Ampoule", "Sheet Mask"]
    );

    // Products without a category get the treatment label
    let mystery = routine
        .morning
        .iter()
        .find(|s| s.product.name == "Mystery Ampoule")
        .expect("step");
    assert_eq!(mystery.label, "Treat");
}
