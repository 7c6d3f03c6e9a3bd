//! URL handling module for Ripple-Scout
//!
//! This module provides URL normalization into dedup keys and host scoping.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_host, is_same_host};
pub use normalize::{normalize_parsed, normalize_url, NormalizedUrl};
