// Copyright (c) 2025 - Cowboy AI, Inc.
//! Label Selector Value Object
//!
//! A selector is either a bare key (`eda.nokia.com/macvrf201`), which tests for
//! the presence of a label, or `key=value`, which also compares the value.
//! The expression is split on the first `=` only, so values may contain `=`.
//!
//! # Invariants
//!
//! - Key and value are whitespace-trimmed
//! - An empty key never matches
//! - No wildcard or regular-expression matching

use std::collections::BTreeMap;
use std::fmt;

/// Parsed label selector
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    key: String,
    value: Option<String>,
}

impl Selector {
    /// Parse a `key` or `key=value` expression
    pub fn parse(expression: &str) -> Self {
        match expression.split_once('=') {
            Some((key, value)) => Self {
                key: key.trim().to_string(),
                value: Some(value.trim().to_string()),
            },
            None => Self {
                key: expression.trim().to_string(),
                value: None,
            },
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Test this selector against a label set
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        if self.key.is_empty() {
            return false;
        }
        match (labels.get(&self.key), &self.value) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.key, value),
            None => write!(f, "{}", self.key),
        }
    }
}

/// Evaluate a single selector expression against labels
pub fn matches(labels: &BTreeMap<String, String>, selector: &str) -> bool {
    Selector::parse(selector).matches(labels)
}

/// OR across selectors: any single match admits the label set
pub fn matches_any<S: AsRef<str>>(labels: &BTreeMap<String, String>, selectors: &[S]) -> bool {
    selectors
        .iter()
        .any(|selector| matches(labels, selector.as_ref()))
}
