//! Routine generation: split cart products into ordered morning and night
//! application steps.
//!
//! Rules:
//! - Retinol-containing products never appear in the morning routine.
//! - Sunscreen never appears in the night routine.
//! - Steps sort by the fixed layering order Cleanser → Toner → Serum →
//!   Moisturizer → Sunscreen; unknown categories sort last.

use serde::Serialize;

use beaulytics_core::ProductId;

use crate::models::CartLine;

/// Fixed layering order; index doubles as the step sort key.
const LAYERING_ORDER: &[&str] = &["Cleanser", "Toner", "Serum", "Moisturizer", "Sunscreen"];

/// Sort key for categories outside the layering table.
const UNKNOWN_STEP: usize = 99;

/// Step label for products without a recognized category.
const TREATMENT_LABEL: &str = "Treat";

/// A product as it appears inside a routine step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutineProduct {
    pub id: ProductId,
    pub name: String,
    pub category: Option<String>,
    pub image: Option<String>,
}

/// One ordered application step.
#[derive(Debug, Clone, Serialize)]
pub struct RoutineStep {
    /// Layering index (position in the fixed order, 99 for unknown).
    pub step: usize,
    /// Display label, the category name or "Treat".
    pub label: String,
    pub product: RoutineProduct,
}

/// An ordered morning/night routine.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Routine {
    pub morning: Vec<RoutineStep>,
    pub night: Vec<RoutineStep>,
}

fn layering_index(category: Option<&str>) -> usize {
    category
        .and_then(|c| LAYERING_ORDER.iter().position(|step| *step == c))
        .unwrap_or(UNKNOWN_STEP)
}

fn contains_ingredient(line: &CartLine, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    line.ingredients
        .iter()
        .any(|i| i.to_lowercase().contains(&needle))
}

/// Generate a morning/night routine from cart lines.
///
/// Duplicate products (same product ID) collapse to a single step.
#[must_use]
pub fn generate_routine(lines: &[CartLine]) -> Routine {
    let mut seen = Vec::new();
    let mut routine = Routine::default();

    for line in lines {
        if seen.contains(&line.product_id) {
            continue;
        }
        seen.push(line.product_id);

        let step = layering_index(line.category.as_deref());
        let label = line
            .category
            .clone()
            .unwrap_or_else(|| TREATMENT_LABEL.to_string());
        let product = RoutineProduct {
            id: line.product_id,
            name: line.name.clone(),
            category: line.category.clone(),
            image: line.image.clone(),
        };

        // Retinol is a night-only active
        if !contains_ingredient(line, "retinol") {
            routine.morning.push(RoutineStep {
                step,
                label: label.clone(),
                product: product.clone(),
            });
        }

        // Sunscreen has no place after sunset
        if line.category.as_deref() != Some("Sunscreen") {
            routine.night.push(RoutineStep {
                step,
                label,
                product,
            });
        }
    }

    routine.morning.sort_by_key(|s| s.step);
    routine.night.sort_by_key(|s| s.step);

    routine
}

#[cfg(test)]
mod tests {
    use super::*;
    use beaulytics_core::CartItemId;
    use rust_decimal::Decimal;

    fn line(name: &str, category: Option<&str>, ingredients: &[&str]) -> CartLine {
        CartLine {
            item_id: CartItemId::generate(),
            product_id: ProductId::generate(),
            name: name.to_string(),
            price: Decimal::new(999, 2),
            image: None,
            category: category.map(String::from),
            ingredients: ingredients.iter().map(|s| (*s).to_string()).collect(),
            qty: 1,
        }
    }

    fn names(steps: &[RoutineStep]) -> Vec<&str> {
        steps.iter().map(|s| s.product.name.as_str()).collect()
    }

    #[test]
    fn test_retinol_excluded_from_morning() {
        let routine = generate_routine(&[line("Night Serum", Some("Serum"), &["Retinol", "Squalane"])]);

        assert!(routine.morning.is_empty());
        assert_eq!(names(&routine.night), vec!["Night Serum"]);
    }

    #[test]
    fn test_sunscreen_excluded_from_night() {
        let routine = generate_routine(&[line("Daily SPF 50", Some("Sunscreen"), &["Zinc Oxide"])]);

        assert_eq!(names(&routine.morning), vec!["Daily SPF 50"]);
        assert!(routine.night.is_empty());
    }

    #[test]
    fn test_layering_order() {
        let routine = generate_routine(&[
            line("Moisturizer", Some("Moisturizer"), &[]),
            line("Cleanser", Some("Cleanser"), &[]),
            line("Toner", Some("Toner"), &[]),
        ]);

        assert_eq!(names(&routine.morning), vec!["Cleanser", "Toner", "Moisturizer"]);
        assert_eq!(names(&routine.night), vec!["Cleanser", "Toner", "Moisturizer"]);
    }

    #[test]
    fn test_unknown_category_sorts_last_with_treat_label() {
        let routine = generate_routine(&[
            line("Mystery Ampoule", None, &[]),
            line("Cleanser", Some("Cleanser"), &[]),
        ]);

        assert_eq!(names(&routine.morning), vec!["Cleanser", "Mystery Ampoule"]);
        let last = routine.morning.last().expect("step");
        assert_eq!(last.label, "Treat");
        assert_eq!(last.step, UNKNOWN_STEP);
    }

    #[test]
    fn test_duplicates_collapse() {
        let toner = line("Toner", Some("Toner"), &[]);
        let duplicate = CartLine {
            item_id: CartItemId::generate(),
            qty: 4,
            ..toner.clone()
        };

        let routine = generate_routine(&[toner, duplicate]);
        assert_eq!(routine.morning.len(), 1);
        assert_eq!(routine.night.len(), 1);
    }

    #[test]
    fn test_full_cart_scenario() {
        // Cleanser, Toner, Vitamin C Serum, Retinol Serum, Moisturizer, Sunscreen
        let routine = generate_routine(&[
            line("Gentle Cleanser", Some("Cleanser"), &["Water", "Glycerin"]),
            line("Hydrating Toner", Some("Toner"), &["Water", "Panthenol"]),
            line("Vitamin C Serum", Some("Serum"), &["Ascorbic Acid"]),
            line("Retinol Serum", Some("Serum"), &["Retinol"]),
            line("Barrier Moisturizer", Some("Moisturizer"), &["Ceramide NP"]),
            line("Daily SPF 50", Some("Sunscreen"), &["Zinc Oxide"]),
        ]);

        assert_eq!(
            names(&routine.morning),
            vec![
                "Gentle Cleanser",
                "Hydrating Toner",
                "Vitamin C Serum",
                "Barrier Moisturizer",
                "Daily SPF 50",
            ]
        );
        assert_eq!(
            names(&routine.night),
            vec![
                "Gentle Cleanser",
                "Hydrating Toner",
                "Vitamin C Serum",
                "Retinol Serum",
                "Barrier Moisturizer",
            ]
        );
    }
}
