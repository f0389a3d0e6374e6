//! Conversion options.
//!
//! Options can be built in code or deserialized from a JSON config file,
//! where keys are kebab-case and every key is optional:
//!
//! ```json
//! { "max-depth": 3, "variables": true, "var-threshold": 2 }
//! ```

use serde::Deserialize;

/// Knobs controlling one conversion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct ConvertOptions {
    /// Nest selectors under their anchors. When false every rule keeps its
    /// full selector at the root.
    pub nest: bool,
    /// Maximum nesting depth; deeper paths are collapsed into their last
    /// allowed level. `None` means unlimited.
    pub max_depth: Option<usize>,
    /// Hoist repeated declaration values into variables.
    pub variables: bool,
    /// How many occurrences make a value repeated.
    pub var_threshold: usize,
    /// Variable name prefix (`auto-var` gives `$auto-var-1`, ...).
    pub var_prefix: String,
    /// Group `prefix-*` declarations into nested property blocks.
    pub group_properties: bool,
    /// How many declarations a prefix needs before it is grouped.
    pub group_min: usize,
    /// Keep comments.
    pub comments: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            nest: true,
            max_depth: None,
            variables: false,
            var_threshold: 3,
            var_prefix: "auto-var".to_string(),
            group_properties: false,
            group_min: 2,
            comments: true,
        }
    }
}

impl ConvertOptions {
    /// The depth limit, never below one level.
    #[must_use]
    pub fn depth_limit(&self) -> Option<usize> {
        self.max_depth.map(|depth| depth.max(1))
    }

    /// The variable threshold, never below one occurrence.
    #[must_use]
    pub fn variable_threshold(&self) -> usize {
        self.var_threshold.max(1)
    }

    /// The grouping threshold; a group always needs two declarations.
    #[must_use]
    pub fn group_threshold(&self) -> usize {
        self.group_min.max(2)
    }
}
