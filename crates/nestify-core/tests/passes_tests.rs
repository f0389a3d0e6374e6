//! Tests for variable extraction and property grouping.

use nestify_core::passes::{extract_variables, group_properties};
use nestify_core::{ConvertOptions, Entry, NestTree, NodeId, NodeKind, Variable, convert, transform};
use nestify_css::{Declaration, parse_stylesheet};

/// Helper for options with variable extraction turned on
fn with_variables(threshold: usize) -> ConvertOptions {
    ConvertOptions {
        variables: true,
        var_threshold: threshold,
        ..ConvertOptions::default()
    }
}

/// Helper for options with property grouping turned on
fn with_groups(min: usize) -> ConvertOptions {
    ConvertOptions {
        group_properties: true,
        group_min: min,
        ..ConvertOptions::default()
    }
}

/// Helper to build a tree without running any pass
fn plain_tree(css: &str) -> NestTree {
    transform(&parse_stylesheet(css), &ConvertOptions::default())
        .expect("transform succeeds")
        .tree
}

/// Helper to list a node's declarations as `property: value`
fn decls(tree: &NestTree, id: NodeId) -> Vec<String> {
    tree.entries(id)
        .iter()
        .filter_map(|entry| match entry {
            Entry::Declaration(decl) => Some(decl.to_string()),
            Entry::Comment(_) | Entry::AtRule(_) => None,
        })
        .collect()
}

// ========== Variable extraction ==========

#[test]
fn test_repeated_value_is_hoisted() {
    let css = ".a { margin: 16px; } .b { padding: 16px; } .c { top: 16px; color: red; }";
    let conversion = convert(css, &with_variables(3)).expect("conversion succeeds");

    assert_eq!(
        conversion.variables,
        vec![Variable {
            name: "auto-var-1".to_string(),
            value: "16px".to_string(),
        }]
    );
    assert_eq!(
        conversion.scss,
        "$auto-var-1: 16px;\n\
         \n\
         .a {\n  margin: $auto-var-1;\n}\n\
         \n\
         .b {\n  padding: $auto-var-1;\n}\n\
         \n\
         .c {\n  top: $auto-var-1;\n  color: red;\n}\n"
    );
}

#[test]
fn test_values_below_threshold_are_left_alone() {
    let css = ".a { margin: 16px; } .b { padding: 16px; }";
    let conversion = convert(css, &with_variables(3)).expect("conversion succeeds");
    assert!(conversion.variables.is_empty());
    assert!(conversion.scss.contains("margin: 16px;"));
    assert!(!conversion.scss.contains('$'));
}

#[test]
fn test_lower_threshold() {
    let css = ".a { margin: 16px; } .b { padding: 16px; }";
    let conversion = convert(css, &with_variables(2)).expect("conversion succeeds");
    assert_eq!(conversion.variables.len(), 1);
    assert!(conversion.scss.contains("padding: $auto-var-1;"));
}

#[test]
fn test_names_follow_first_occurrence() {
    let css = ".a { color: red; margin: 0; } .b { color: red; margin: 0; }";
    let conversion = convert(css, &with_variables(2)).expect("conversion succeeds");
    let names: Vec<(&str, &str)> = conversion
        .variables
        .iter()
        .map(|variable| (variable.name.as_str(), variable.value.as_str()))
        .collect();
    assert_eq!(names, vec![("auto-var-1", "red"), ("auto-var-2", "0")]);
    assert!(conversion.scss.starts_with("$auto-var-1: red;\n$auto-var-2: 0;\n"));
}

#[test]
fn test_counter_restarts_per_run() {
    let css = ".a { color: red; } .b { color: red; } .c { color: red; }";
    let first = convert(css, &with_variables(3)).expect("conversion succeeds");
    let second = convert(css, &with_variables(3)).expect("conversion succeeds");
    assert_eq!(first.variables, second.variables);
    assert_eq!(first.variables[0].name, "auto-var-1");
}

#[test]
fn test_symbolic_values_are_not_extracted() {
    let css = ".a { color: var(--brand); } .b { color: var(--brand); } .c { color: var(--brand); }";
    let conversion = convert(css, &with_variables(2)).expect("conversion succeeds");
    assert!(conversion.variables.is_empty());
    assert!(conversion.scss.contains("color: var(--brand);"));
}

#[test]
fn test_custom_prefix() {
    let options = ConvertOptions {
        var_prefix: "v".to_string(),
        ..with_variables(2)
    };
    let conversion = convert(".a { top: 0; } .b { left: 0; }", &options).expect("conversion succeeds");
    assert_eq!(conversion.variables[0].name, "v-1");
    assert!(conversion.scss.contains("left: $v-1;"));
}

#[test]
fn test_conditional_occurrences_are_rewritten() {
    let css = ".a { width: 50%; }\n@media print { .a { width: 50%; } }";
    let conversion = convert(css, &with_variables(2)).expect("conversion succeeds");
    assert_eq!(
        conversion.scss,
        "$auto-var-1: 50%;\n\
         \n\
         .a {\n  width: $auto-var-1;\n  @media print {\n    width: $auto-var-1;\n  }\n}\n"
    );
}

#[test]
fn test_values_inside_carried_at_rules_are_counted() {
    let css = "@font-face { font-family: Brand; } .x { font-family: Brand; } .y { font-family: Brand; }";
    let conversion = convert(css, &with_variables(3)).expect("conversion succeeds");

    assert_eq!(conversion.variables.len(), 1);
    assert_eq!(conversion.variables[0].value, "Brand");
    assert!(
        conversion
            .scss
            .contains("@font-face {\n  font-family: $auto-var-1;\n}\n")
    );
    assert!(conversion.scss.contains(".y {\n  font-family: $auto-var-1;\n}\n"));
    assert!(!conversion.scss.contains("font-family: Brand;"));
}

#[test]
fn test_keyframe_values_are_rewritten() {
    let css = "@keyframes fade { from { opacity: 0.5; } to { opacity: 1; } }\n.a { opacity: 0.5; }";
    let conversion = convert(css, &with_variables(2)).expect("conversion succeeds");
    assert!(conversion.scss.contains("  from {\n    opacity: $auto-var-1;\n  }\n"));
    assert!(conversion.scss.contains(".a {\n  opacity: $auto-var-1;\n}\n"));
}

#[test]
fn test_variables_follow_the_preamble() {
    let css = "@charset \"utf-8\";\n@import \"base.css\";\n.a { margin: 16px; } .b { margin: 16px; }";
    let conversion = convert(css, &with_variables(2)).expect("conversion succeeds");
    assert!(conversion.scss.starts_with(
        "@charset \"utf-8\";\n@import \"base.css\";\n$auto-var-1: 16px;\n\n.a {\n"
    ));
}

#[test]
fn test_extract_on_a_built_tree() {
    let mut tree = plain_tree(".a { color: blue; } .b { color: blue; }");
    let variables = extract_variables(&mut tree, 2, "c");
    assert_eq!(variables.len(), 1);

    let hoisted = tree.entries(NodeId::ROOT);
    assert_eq!(
        hoisted,
        &[Entry::Declaration(Declaration::new("$c-1", "blue", false))]
    );
    assert_eq!(tree.declarations().len(), 3);
}

// ========== Property grouping ==========

#[test]
fn test_shared_prefix_is_grouped() {
    let css = ".a { border-top: 1px solid; color: red; border-left: 2px; }";
    let conversion = convert(css, &with_groups(2)).expect("conversion succeeds");
    assert_eq!(
        conversion.scss,
        ".a {\n  color: red;\n  border: {\n    top: 1px solid;\n    left: 2px;\n  }\n}\n"
    );
}

#[test]
fn test_group_node_shape() {
    let mut tree = plain_tree(".a { margin-top: 0; margin-bottom: 1px; color: red; }");
    let created = group_properties(&mut tree, 2);
    assert_eq!(created, 1);

    let a = tree.children(NodeId::ROOT)[0];
    assert_eq!(decls(&tree, a), vec!["color: red"]);

    let group = tree.children(a)[0];
    assert_eq!(
        tree.kind(group),
        Some(&NodeKind::PropertyGroup {
            prefix: "margin".to_string()
        })
    );
    assert_eq!(decls(&tree, group), vec!["top: 0", "bottom: 1px"]);
}

#[test]
fn test_single_member_is_not_grouped() {
    let css = ".a { border-top: 1px; padding-left: 2px; }";
    let conversion = convert(css, &with_groups(2)).expect("conversion succeeds");
    assert!(conversion.scss.contains("border-top: 1px;"));
    assert!(!conversion.scss.contains(": {"));
}

#[test]
fn test_group_min() {
    let css = ".a { border-top: 1px; border-left: 2px; }";
    let conversion = convert(css, &with_groups(3)).expect("conversion succeeds");
    assert!(!conversion.scss.contains("border: {"));

    let css = ".a { border-top: 1px; border-left: 2px; border-right: 0; }";
    let conversion = convert(css, &with_groups(3)).expect("conversion succeeds");
    assert!(conversion.scss.contains("border: {"));
}

#[test]
fn test_vendor_and_custom_properties_are_not_grouped() {
    let css = ".a { -webkit-box-shadow: none; -webkit-box-flex: 1; --main-a: 1; --main-b: 2; }";
    let conversion = convert(css, &with_groups(2)).expect("conversion succeeds");
    assert_eq!(
        conversion.scss,
        ".a {\n  -webkit-box-shadow: none;\n  -webkit-box-flex: 1;\n  --main-a: 1;\n  --main-b: 2;\n}\n"
    );
}

#[test]
fn test_grouping_inside_conditional_block() {
    let css = "@media print { .a { border-top: 1px; border-left: 2px; } }";
    let conversion = convert(css, &with_groups(2)).expect("conversion succeeds");
    assert_eq!(
        conversion.scss,
        ".a {\n  @media print {\n    border: {\n      top: 1px;\n      left: 2px;\n    }\n  }\n}\n"
    );
}

#[test]
fn test_groups_come_before_nested_rules() {
    let css = ".a .b { x: 1; } .a { font-size: 1px; font-weight: bold; }";
    let conversion = convert(css, &with_groups(2)).expect("conversion succeeds");
    assert_eq!(
        conversion.scss,
        ".a {\n  font: {\n    size: 1px;\n    weight: bold;\n  }\n  .b {\n    x: 1;\n  }\n}\n"
    );
}

#[test]
fn test_important_survives_grouping() {
    let css = ".a { margin-top: 0 !important; margin-left: 0; }";
    let conversion = convert(css, &with_groups(2)).expect("conversion succeeds");
    assert!(conversion.scss.contains("    top: 0 !important;\n"));
}

#[test]
fn test_group_count_is_reported() {
    let css = ".a { margin-top: 0; margin-left: 0; } .b { border-top: 0; border-left: 0; }";
    let transformed =
        transform(&parse_stylesheet(css), &with_groups(2)).expect("transform succeeds");
    assert_eq!(transformed.groups, 2);
}
