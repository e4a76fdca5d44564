//! Merges the ingredients of a set of meals into one shopping list.
//!
//! Quantities are free text, so merging is best effort: amounts that share a
//! known unit are summed, everything else is listed as written.

use std::cmp::Ordering;
use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::meals::schema::Meal;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryItem {
    pub item: String,
    pub quantity: String,
    pub original_quantities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuantity {
    pub amount: f64,
    /// Canonical unit for measured amounts, the lowercased text otherwise.
    pub unit: String,
    pub measurable: bool,
    pub original: String,
}

/// Synonym to canonical singular unit. Size words map to themselves and are
/// never summed.
const UNIT_SYNONYMS: &[(&str, &str)] = &[
    ("tbsp", "tablespoon"),
    ("tablespoons", "tablespoon"),
    ("tsp", "teaspoon"),
    ("teaspoons", "teaspoon"),
    ("cups", "cup"),
    ("c", "cup"),
    ("lbs", "lb"),
    ("pounds", "lb"),
    ("pound", "lb"),
    ("oz", "ounce"),
    ("ounces", "ounce"),
    ("cloves", "clove"),
    ("cans", "can"),
    ("medium", "medium"),
    ("large", "large"),
    ("small", "small"),
    ("whole", "whole"),
    ("sliced", "sliced"),
    ("cooked", "cooked"),
];

const MEASURABLE_UNITS: &[&str] = &["cup", "tablespoon", "teaspoon", "lb", "ounce", "clove", "can"];

const COMMON_FRACTIONS: &[(&str, f64)] = &[
    ("1/4", 0.25),
    ("1/3", 0.333),
    ("1/2", 0.5),
    ("2/3", 0.667),
    ("3/4", 0.75),
    ("1/8", 0.125),
    ("3/8", 0.375),
    ("5/8", 0.625),
    ("7/8", 0.875),
];
const FRACTION_TOLERANCE: f64 = 0.01;

lazy_static! {
    // The unit must not start with a digit so "12" is never split into 1 + "2".
    static ref QUANTITY_RE: Regex =
        Regex::new(r"^(\d+(?:/\d+)?(?:\.\d+)?)\s*([^\d\s./].*)$").unwrap();
}

pub fn canonical_unit(unit: &str) -> &str {
    UNIT_SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == unit)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(unit)
}

fn parse_amount(text: &str) -> Option<f64> {
    match text.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().ok()?;
            let den: f64 = den.parse().ok()?;
            (den != 0.0).then(|| num / den)
        }
        None => text.parse().ok(),
    }
}

/// Reads a leading amount and unit. Text without a usable amount becomes a
/// descriptor with an implied amount of 1; an empty string yields nothing.
pub fn parse_quantity(quantity: &str) -> Option<ParsedQuantity> {
    let normalized = quantity.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    let measured = QUANTITY_RE.captures(&normalized).and_then(|caps| {
        let amount = parse_amount(&caps[1])?;
        let unit = canonical_unit(caps[2].trim()).to_string();
        Some((amount, unit))
    });

    Some(match measured {
        Some((amount, unit)) => ParsedQuantity {
            amount,
            measurable: MEASURABLE_UNITS.contains(&unit.as_str()),
            unit,
            original: quantity.to_string(),
        },
        None => ParsedQuantity {
            amount: 1.0,
            unit: normalized,
            measurable: false,
            original: quantity.to_string(),
        },
    })
}

/// Whole numbers as integers, common fractions as `a/b`, anything else with
/// two decimals.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        return format!("{}", amount);
    }
    COMMON_FRACTIONS
        .iter()
        .find(|(_, value)| (amount - value).abs() < FRACTION_TOLERANCE)
        .map(|(fraction, _)| fraction.to_string())
        .unwrap_or_else(|| format!("{:.2}", amount))
}

pub fn combine_quantities(quantities: &[ParsedQuantity]) -> String {
    match quantities {
        [] => return String::new(),
        [single] => return single.original.clone(),
        _ => {}
    }

    let mut totals: Vec<(&str, f64)> = Vec::new();
    let mut descriptors: Vec<&str> = Vec::new();
    for qty in quantities {
        if !qty.measurable {
            descriptors.push(&qty.original);
            continue;
        }
        match totals.iter_mut().find(|(unit, _)| *unit == qty.unit) {
            Some((_, total)) => *total += qty.amount,
            None => totals.push((qty.unit.as_str(), qty.amount)),
        }
    }

    let mut parts: Vec<String> = totals
        .into_iter()
        .map(|(unit, total)| {
            let plural = if total == 1.0 { "" } else { "s" };
            format!("{} {}{}", format_amount(total), unit, plural)
        })
        .collect();
    if !descriptors.is_empty() {
        parts.push(descriptors.join(", "));
    }
    parts.join(" + ")
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Primary sort key: lowercase with diacritics stripped, so "Éclair" files
/// under "e".
fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Accent and case insensitive first, then accents, then case.
fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

pub fn create_grocery_list(meals: &[Meal]) -> Vec<GroceryItem> {
    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();

    for ingredient in meals.iter().flat_map(|m| &m.ingredients) {
        let key = ingredient.item.trim().to_lowercase();
        grouped
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(ingredient.quantity.clone());
    }

    let mut items: Vec<GroceryItem> = order
        .into_iter()
        .map(|key| {
            let originals = grouped.remove(&key).unwrap_or_default();
            let parsed: Vec<ParsedQuantity> =
                originals.iter().filter_map(|q| parse_quantity(q)).collect();
            GroceryItem {
                item: capitalize(&key),
                quantity: combine_quantities(&parsed),
                original_quantities: originals,
            }
        })
        .collect();

    items.sort_by(|a, b| compare_names(&a.item, &b.item));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meals::schema::{Day, Ingredient};

    fn meal_with(id: &str, ingredients: &[(&str, &str)]) -> Meal {
        Meal {
            id: id.into(),
            day: Day::Mon,
            name: format!("Recipe {}", id),
            description: "Test recipe".into(),
            prep_minutes: 10.0,
            cook_minutes: 20.0,
            ingredients: ingredients
                .iter()
                .map(|(item, quantity)| Ingredient {
                    item: item.to_string(),
                    quantity: quantity.to_string(),
                })
                .collect(),
            steps: vec!["Cook".into()],
            tags: None,
        }
    }

    fn find<'a>(list: &'a [GroceryItem], name: &str) -> &'a GroceryItem {
        list.iter()
            .find(|i| i.item == name)
            .unwrap_or_else(|| panic!("{} missing from {:?}", name, list))
    }

    fn weeknight_meals() -> Vec<Meal> {
        vec![
            meal_with(
                "1",
                &[
                    ("Olive oil", "2 tbsp"),
                    ("Garlic", "3 cloves"),
                    ("Mixed vegetables", "2 cups"),
                ],
            ),
            meal_with(
                "2",
                &[
                    ("Chicken breast", "1 lb"),
                    ("Olive oil", "1 tbsp"),
                    ("Mixed vegetables", "1 cup"),
                ],
            ),
        ]
    }

    #[test]
    fn merges_and_sorts_items() {
        let list = create_grocery_list(&weeknight_meals());
        let names: Vec<&str> = list.iter().map(|i| i.item.as_str()).collect();
        assert_eq!(names, ["Chicken breast", "Garlic", "Mixed vegetables", "Olive oil"]);
    }

    #[test]
    fn sums_quantities_with_shared_unit() {
        let list = create_grocery_list(&weeknight_meals());

        let oil = find(&list, "Olive oil");
        assert_eq!(oil.quantity, "3 tablespoons");
        assert_eq!(oil.original_quantities, ["2 tbsp", "1 tbsp"]);

        let veg = find(&list, "Mixed vegetables");
        assert_eq!(veg.quantity, "3 cups");
        assert_eq!(veg.original_quantities, ["2 cups", "1 cup"]);
    }

    #[test]
    fn single_quantity_is_kept_verbatim() {
        let list = create_grocery_list(&weeknight_meals());
        let chicken = find(&list, "Chicken breast");
        assert_eq!(chicken.quantity, "1 lb");
        assert_eq!(chicken.original_quantities, ["1 lb"]);

        let odd = create_grocery_list(&[meal_with("1", &[("Rice", "2 Cups, rinsed")])]);
        assert_eq!(odd[0].quantity, "2 Cups, rinsed");
    }

    #[test]
    fn renders_common_fractions() {
        let list = create_grocery_list(&[
            meal_with("1", &[("Flour", "1/2 cup"), ("Sugar", "1/4 cup")]),
            meal_with("2", &[("Flour", "1/4 cup"), ("Sugar", "1/4 cup")]),
        ]);
        assert_eq!(find(&list, "Flour").quantity, "3/4 cups");
        assert_eq!(find(&list, "Sugar").quantity, "1/2 cups");
    }

    #[test]
    fn non_measurable_quantities_are_listed_not_summed() {
        let list = create_grocery_list(&[
            meal_with("1", &[("Lettuce", "1 head"), ("Avocado", "1 medium")]),
            meal_with("2", &[("Lettuce", "1 head"), ("Avocado", "1 medium")]),
        ]);
        assert_eq!(find(&list, "Lettuce").quantity, "1 head, 1 head");
        assert_eq!(find(&list, "Avocado").quantity, "1 medium, 1 medium");
    }

    #[test]
    fn size_words_are_never_summed() {
        let list = create_grocery_list(&[
            meal_with("1", &[("Tomatoes", "2 medium")]),
            meal_with("2", &[("Tomatoes", "2 medium")]),
        ]);
        assert_eq!(find(&list, "Tomatoes").quantity, "2 medium, 2 medium");
    }

    #[test]
    fn mixed_groups_are_joined_with_plus() {
        let list = create_grocery_list(&[
            meal_with("1", &[("Butter", "2 tbsp"), ("Butter", "to taste")]),
            meal_with("2", &[("Butter", "1 cup"), ("Butter", "1 tbsp")]),
        ]);
        assert_eq!(find(&list, "Butter").quantity, "3 tablespoons + 1 cup + to taste");
    }

    #[test]
    fn names_merge_case_insensitively() {
        let list = create_grocery_list(&[
            meal_with("1", &[("olive oil", "1 tbsp"), ("GARLIC", "2 cloves")]),
            meal_with("2", &[("Olive Oil", "2 tbsp"), ("garlic", "1 clove")]),
        ]);
        assert_eq!(list.len(), 2);
        assert_eq!(find(&list, "Olive oil").quantity, "3 tablespoons");
        assert_eq!(find(&list, "Garlic").quantity, "3 cloves");
    }

    #[test]
    fn empty_inputs_give_empty_list() {
        assert!(create_grocery_list(&[]).is_empty());
        assert!(create_grocery_list(&[meal_with("1", &[])]).is_empty());
    }

    #[test]
    fn accented_names_sort_with_their_base_letter() {
        let list = create_grocery_list(&[meal_with(
            "1",
            &[("Zucchini", "1"), ("Éclair", "2"), ("apple", "3"), ("eggs", "4")],
        )]);
        let names: Vec<&str> = list.iter().map(|i| i.item.as_str()).collect();
        assert_eq!(names, ["Apple", "Éclair", "Eggs", "Zucchini"]);
    }

    #[test]
    fn accent_and_case_break_ties_deterministically() {
        assert_eq!(compare_names("Creme", "Crème"), Ordering::Less);
        assert_eq!(compare_names("crème", "Crème"), Ordering::Greater);
        assert_eq!(compare_names("Crème", "Crème"), Ordering::Equal);
    }

    #[test]
    fn merging_is_idempotent() {
        let meals = weeknight_meals();
        assert_eq!(create_grocery_list(&meals), create_grocery_list(&meals));
    }

    #[test]
    fn odd_totals_fall_back_to_decimals() {
        let list = create_grocery_list(&[
            meal_with("1", &[("Milk", "1.5 cups")]),
            meal_with("2", &[("Milk", "0.2 cup")]),
        ]);
        assert_eq!(find(&list, "Milk").quantity, "1.70 cups");
    }

    #[test]
    fn a_total_of_one_stays_singular() {
        let list = create_grocery_list(&[
            meal_with("1", &[("Stock", "1/2 can")]),
            meal_with("2", &[("Stock", "1/2 can")]),
        ]);
        assert_eq!(find(&list, "Stock").quantity, "1 can");
    }

    #[test]
    fn large_whole_totals_are_printed_in_full() {
        assert_eq!(format_amount(3.0), "3");
        assert_eq!(format_amount(1e23), "100000000000000000000000");
    }

    #[test]
    fn parses_fractions_decimals_and_descriptors() {
        let half = parse_quantity("1/2 Cup").unwrap();
        assert_eq!((half.amount, half.unit.as_str(), half.measurable), (0.5, "cup", true));

        let ounces = parse_quantity("1.5 oz").unwrap();
        assert_eq!((ounces.amount, ounces.unit.as_str()), (1.5, "ounce"));

        let pinch = parse_quantity("A pinch").unwrap();
        assert_eq!((pinch.amount, pinch.unit.as_str(), pinch.measurable), (1.0, "a pinch", false));
        assert_eq!(pinch.original, "A pinch");

        let bare = parse_quantity("12").unwrap();
        assert!(!bare.measurable);
        assert_eq!(bare.unit, "12");

        assert!(!parse_quantity("1/0 cup").unwrap().measurable);
        assert_eq!(parse_quantity("   "), None);
    }

    #[test]
    fn empty_quantities_are_skipped_but_remembered() {
        let list = create_grocery_list(&[
            meal_with("1", &[("Salt", "")]),
            meal_with("2", &[("Salt", "1 tsp")]),
        ]);
        let salt = find(&list, "Salt");
        assert_eq!(salt.quantity, "1 tsp");
        assert_eq!(salt.original_quantities, ["", "1 tsp"]);
    }

    #[test]
    fn formats_amounts() {
        assert_eq!(format_amount(3.0), "3");
        assert_eq!(format_amount(0.75), "3/4");
        assert_eq!(format_amount(2.0 / 3.0), "2/3");
        assert_eq!(format_amount(1.5), "1.50");
    }
}
