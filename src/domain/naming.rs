// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Naming Rules
//!
//! Kubernetes object names are DNS labels (RFC 1123): at most 63 characters of
//! lowercase alphanumerics and hyphens. Two derivations live here:
//!
//! - [`sim_name_for_interface`] turns an Interface resource name into a
//!   simulated-device name (lowercase, `_` → `-`, prefix cut at 63)
//! - [`slugify`] normalizes arbitrary text into a name fragment used to build
//!   idempotent SimLink/TopoLink names

/// Maximum length of a single DNS label
pub const MAX_NAME_LENGTH: usize = 63;

/// Fragment used when slugification leaves nothing behind
pub const EMPTY_SLUG: &str = "sim";

/// Derive a simulated-device name from an Interface resource name
///
/// Truncation is a plain prefix cut; no attempt is made to keep it unique.
pub fn sim_name_for_interface(interface_name: &str) -> String {
    interface_name
        .to_lowercase()
        .replace('_', "-")
        .chars()
        .take(MAX_NAME_LENGTH)
        .collect()
}

/// Lowercase, collapse every non-alphanumeric run into one `-`, trim hyphens
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }

    let trimmed = slug.trim_matches('-');
    if trimmed.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Name shared by the SimLink and TopoLink rendered for one attachment
pub fn link_name(fabric_node: &str, fabric_interface: &str, sim_node: &str) -> String {
    format!(
        "{}-{}-{}",
        slugify(fabric_node),
        slugify(fabric_interface),
        slugify(sim_node)
    )
}

/// `<node>-<interface>` interface resource reference
pub fn interface_resource(node: &str, interface: &str) -> String {
    format!("{}-{}", slugify(node), slugify(interface))
}
