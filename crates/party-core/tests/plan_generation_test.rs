//! Integration tests for template-fill generation across the whole option
//! space.
//!
//! Every combination of known option values (plus a few unknown and empty
//! ones) must produce six non-empty sections with fixed lengths.

use party_core::plan::{Category, generate_plan};
use party_core::selection::{Field, FormSelection};
use party_core::{Dictionary, Language};

// -----------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------

/// Option values for a field, including one unknown value and an empty one.
fn values_for(field: Field) -> Vec<String> {
    let mut values: Vec<String> = field.options().iter().map(|s| s.to_string()).collect();
    if field == Field::Theme {
        values.push("公主主题".to_string());
        values.push("Under the Sea".to_string());
    }
    values.push("unsupported".to_string());
    values.push(String::new());
    values
}

fn all_selections() -> Vec<FormSelection> {
    let mut selections = vec![FormSelection::default()];
    for field in Field::ALL {
        let mut next = Vec::new();
        for base in &selections {
            for value in values_for(field) {
                let mut sel = base.clone();
                sel.set(field, value);
                next.push(sel);
            }
        }
        selections = next;
    }
    selections
}

fn expected_len(category: Category) -> usize {
    match category {
        Category::Venue => 4,
        Category::Activities => 5,
        Category::Decorations => 4,
        Category::Catering => 4,
        Category::Music => 3,
        Category::Schedule => 6,
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[test]
fn every_selection_yields_six_fixed_length_sections() {
    let selections = all_selections();
    assert!(selections.len() > 1_000);

    for lang in Language::ALL {
        let dict = Dictionary::load(lang);
        for sel in &selections {
            let plan = generate_plan(sel, &dict);
            for (category, entries) in plan.sections() {
                assert_eq!(
                    entries.len(),
                    expected_len(category),
                    "{lang}/{category} for {sel:?}"
                );
                assert!(entries.iter().all(|e| !e.trim().is_empty()));
            }
        }
    }
}

#[test]
fn example_selection_is_stable_across_calls() {
    let sel = FormSelection {
        party_type: "child".into(),
        guest_count: "medium".into(),
        venue: "indoor".into(),
        budget: "medium".into(),
        theme: "公主主题".into(),
        atmosphere: "lively".into(),
    };
    let dict = Dictionary::load(Language::Zh);

    let first = generate_plan(&sel, &dict);
    let second = generate_plan(&sel, &dict);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn unsupported_budget_falls_back_to_lowest_price() {
    let sel = FormSelection {
        party_type: "birthday".into(),
        guest_count: "small".into(),
        venue: "indoor".into(),
        budget: "ultra".into(),
        theme: "space".into(),
        atmosphere: "lively".into(),
    };
    for lang in Language::ALL {
        let dict = Dictionary::load(lang);
        let plan = generate_plan(&sel, &dict);
        let lowest = dict.text("catering.price.low");
        assert!(
            plan.catering[0].contains(&lowest),
            "{lang}: {} should mention {lowest}",
            plan.catering[0]
        );
    }
}
