// Copyright (c) 2025 - Cowboy AI, Inc.
//! Attachment Domain Primitives
//!
//! Small, pure building blocks shared by auto-generation and rendering.
//!
//! - [`Selector`] - `key` / `key=value` label selectors with OR evaluation
//! - [`IpPool`] - one-shot host allocator that skips the gateway
//! - [`naming`] - DNS-label device names and link slugs

pub mod ip_pool;
pub mod naming;
pub mod selector;

pub use ip_pool::IpPool;
pub use naming::{interface_resource, link_name, sim_name_for_interface, slugify, MAX_NAME_LENGTH};
pub use selector::{matches, matches_any, Selector};
