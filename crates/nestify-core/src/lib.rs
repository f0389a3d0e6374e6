//! Selector nesting engine for the nestify converter.
//!
//! Turns a flat stylesheet into a tree of nested rule blocks and serializes
//! it as SCSS.
//!
//! # Pipeline
//!
//! 1. **Anchor registry** - collect every simple first segment ([`anchors`]).
//! 2. **Decomposition** - split each selector into segments ([`selector`]).
//! 3. **Resolution** - split segments at known anchors ([`resolve`]).
//! 4. **Tree building** - insert rules, routing conditional rules into
//!    conditional blocks ([`builder`]).
//! 5. **Linearization** - canonical child order ([`linearize`]).
//! 6. **Optional passes** - variable extraction and property grouping
//!    ([`passes`]).
//! 7. **Emission** - SCSS text ([`emit`]).
//!
//! # Example
//!
//! ```
//! use nestify_core::{ConvertOptions, convert};
//!
//! let css = ".card { color: red; } .card .title { font-weight: bold; }";
//! let conversion = convert(css, &ConvertOptions::default()).unwrap();
//! assert!(conversion.scss.contains("  .title {"));
//! ```

/// The anchor registry.
pub mod anchors;
/// Tree construction and conditional routing.
pub mod builder;
/// SCSS serialization.
pub mod emit;
/// Fatal conversion errors.
pub mod error;
/// Canonical child ordering.
pub mod linearize;
/// Conversion options.
pub mod options;
/// Variable extraction and property grouping.
pub mod passes;
/// Anchor-aware path resolution.
pub mod resolve;
/// Selector decomposition.
pub mod selector;
/// The nested rule tree.
pub mod tree;
/// Recoverable problems.
pub mod warning;

pub use anchors::AnchorSet;
pub use builder::TreeBuilder;
pub use emit::emit;
pub use error::NestError;
pub use options::ConvertOptions;
pub use passes::Variable;
pub use tree::{Entry, NestTree, Node, NodeId, NodeKind};
pub use warning::{Warning, WarningKind};

use nestify_css::{Stylesheet, parse_with_issues};

/// A transformed tree and what happened while building it.
#[derive(Debug, Clone)]
pub struct Transformed {
    /// The nested, linearized tree.
    pub tree: NestTree,
    /// Recoverable problems, in the order they were found.
    pub warnings: Vec<Warning>,
    /// Hoisted variables (empty unless variable extraction ran).
    pub variables: Vec<Variable>,
    /// Number of anchors found.
    pub anchors: usize,
    /// Number of property groups created.
    pub groups: usize,
}

/// The result of converting one stylesheet.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The SCSS text.
    pub scss: String,
    /// Parse issues and engine warnings, in that order.
    pub warnings: Vec<Warning>,
    /// Hoisted variables.
    pub variables: Vec<Variable>,
    /// Number of anchors found.
    pub anchors: usize,
}

/// Transform a parsed stylesheet into a nested tree.
///
/// # Errors
///
/// Returns [`NestError`] when a rule cannot be placed (e.g. it has an empty
/// selector).
pub fn transform(sheet: &Stylesheet, options: &ConvertOptions) -> Result<Transformed, NestError> {
    // STEP 1: Anchors are complete before the first insertion.
    let anchors = if options.nest {
        AnchorSet::collect(sheet)
    } else {
        AnchorSet::default()
    };

    // STEP 2: Build and order the tree.
    let (mut tree, warnings) = TreeBuilder::new(&anchors, options).build(sheet)?;
    linearize::linearize(&mut tree);

    // STEP 3: Optional passes.
    let variables = if options.variables {
        passes::extract_variables(&mut tree, options.variable_threshold(), &options.var_prefix)
    } else {
        Vec::new()
    };
    let groups = if options.group_properties {
        let groups = passes::group_properties(&mut tree, options.group_threshold());
        linearize::linearize(&mut tree);
        groups
    } else {
        0
    };

    Ok(Transformed {
        tree,
        warnings,
        variables,
        anchors: anchors.len(),
        groups,
    })
}

/// Parse, transform and serialize a stylesheet.
///
/// # Errors
///
/// Returns [`NestError`] when a rule cannot be placed. Parse problems are
/// not errors; they are returned as warnings.
pub fn convert(source: &str, options: &ConvertOptions) -> Result<Conversion, NestError> {
    let (sheet, issues) = parse_with_issues(source);
    let transformed = transform(&sheet, options)?;

    let mut warnings: Vec<Warning> = issues
        .into_iter()
        .map(|issue| Warning::new(WarningKind::ParseIssue, issue.to_string()))
        .collect();
    warnings.extend(transformed.warnings);

    Ok(Conversion {
        scss: emit(&transformed.tree),
        warnings,
        variables: transformed.variables,
        anchors: transformed.anchors,
    })
}
