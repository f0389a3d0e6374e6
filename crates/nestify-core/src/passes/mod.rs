//! Optional passes over the built tree. Both only look at declarations.

/// Nested property blocks for shared prefixes.
pub mod grouping;
/// Hoisting of repeated values into variables.
pub mod variables;

pub use grouping::group_properties;
pub use variables::{Variable, extract_variables};
