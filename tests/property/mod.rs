// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Each submodule covers one pure building block of auto-generation.

mod ip_pool;
mod rename_ordering;
mod selector_matching;
