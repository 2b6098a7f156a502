// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Label Selectors

use std::collections::BTreeMap;

use cx_attach::domain::{matches, matches_any, Selector};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn label_key() -> impl Strategy<Value = String> {
    "[a-z]{1,6}(\\.[a-z]{2,4}/[a-z0-9]{1,8})?"
}

fn label_value() -> impl Strategy<Value = String> {
    "[a-z0-9]{0,6}"
}

fn labels() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(label_key(), label_value(), 0..6)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// A bare key matches exactly when the label is present
    #[test]
    fn prop_key_selector_tests_presence(labels in labels(), key in label_key()) {
        prop_assert_eq!(matches(&labels, &key), labels.contains_key(&key));
    }

    /// `key=value` matches exactly when the label carries that value
    #[test]
    fn prop_key_value_selector_tests_equality(
        labels in labels(),
        key in label_key(),
        value in label_value(),
    ) {
        let expected = labels.get(&key) == Some(&value);
        let expression = format!("{key}={value}");
        prop_assert_eq!(matches(&labels, &expression), expected);
    }

    /// Every existing label is selected by its own key and by its own pair
    #[test]
    fn prop_existing_labels_select_themselves(labels in labels()) {
        for (key, value) in &labels {
            let padded = format!(" {key} = {value} ");
            prop_assert!(matches(&labels, key));
            prop_assert!(matches(&labels, &padded));
        }
    }

    /// Selector lists are an OR of their members
    #[test]
    fn prop_matches_any_is_disjunction(
        labels in labels(),
        selectors in prop::collection::vec(label_key(), 0..5),
    ) {
        let expected = selectors.iter().any(|selector| matches(&labels, selector));
        prop_assert_eq!(matches_any(&labels, &selectors), expected);
    }

    /// Splitting happens on the first `=` only
    #[test]
    fn prop_value_keeps_later_equals(key in label_key(), value in "[a-z]{1,4}=[a-z]{1,4}") {
        let expression = format!("{key}={value}");
        let selector = Selector::parse(&expression);
        prop_assert_eq!(selector.key(), key.as_str());
        prop_assert_eq!(selector.value(), Some(value.as_str()));
    }
}

#[test]
fn test_empty_key_never_matches() {
    let labels = BTreeMap::from([(String::new(), "x".to_string())]);
    assert!(!matches(&labels, ""));
    assert!(!matches(&labels, "=x"));
    assert!(!matches_any::<&str>(&labels, &[]));
}
