//! # Style Engine
//!
//! Selector matching, cascade resolution, and computed style values.

pub mod cascade;
pub mod computed;
pub mod matching;

pub use cascade::{StyleMap, collect_matching_rules, compute_styles, resolve_style};
pub use computed::*;
pub use matching::{
    matches_declaration, matches_selector, matches_simple, matching_declarations, query, query_all,
};
