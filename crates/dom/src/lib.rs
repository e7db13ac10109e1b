//! DOM crate: the document tree the markup parser builds.
//!
//! Arena-based tree with stable handles from the `arena` crate. The document
//! root also owns the id index, the loaded stylesheets and the hover/focus
//! registry, so every document is self-contained.

pub mod node;
pub mod tree;

pub use node::*;
pub use tree::{Dom, UiState};
