//! Property tests over small generated stylesheets.

use nestify_core::{ConvertOptions, NestTree, NodeId, NodeKind, transform};
use nestify_css::{Stylesheet, parse_stylesheet};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

const SELECTORS: &[&str] = &[
    ".card",
    ".card .title",
    ".card:hover",
    ".card .title:hover",
    ".nav > li",
    ".nav > li a",
    ".btn.primary",
    ".btn",
    "#main p",
    "h1, h2",
    ".card .title, .card:hover",
    ".list li a",
    "ul li",
];

const CONDITIONS: &[&str] = &["@media print", "@media (max-width: 600px)", "@supports (display: grid)"];

const PROPERTIES: &[&str] = &["color", "margin", "border-top", "padding-left", "width"];

const VALUES: &[&str] = &["red", "0", "1px solid", "16px", "50%"];

/// A small stylesheet built from a fixed vocabulary.
#[derive(Debug, Clone)]
struct SmallSheet(String);

fn pick(g: &mut Gen, pool: &'static [&'static str]) -> &'static str {
    g.choose(pool).copied().unwrap_or(pool[0])
}

impl Arbitrary for SmallSheet {
    fn arbitrary(g: &mut Gen) -> Self {
        let rules = usize::arbitrary(g) % 8 + 1;
        let mut css = String::new();
        for _ in 0..rules {
            let mut body = String::new();
            for _ in 0..usize::arbitrary(g) % 3 + 1 {
                body.push_str(&format!(
                    "{}: {}{}; ",
                    pick(g, PROPERTIES),
                    pick(g, VALUES),
                    if bool::arbitrary(g) { " !important" } else { "" }
                ));
            }
            let rule = format!("{} {{ {body}}}", pick(g, SELECTORS));
            if usize::arbitrary(g) % 4 == 0 {
                css.push_str(&format!("{} {{ {rule} }}\n", pick(g, CONDITIONS)));
            } else {
                css.push_str(&rule);
                css.push('\n');
            }
        }
        Self(css)
    }
}

/// Helper for a sorted list of every declaration in the source
fn source_declarations(sheet: &Stylesheet) -> Vec<String> {
    let mut found = Vec::new();
    sheet.walk_rules(&mut |rule, _| {
        found.extend(rule.declarations().map(ToString::to_string));
    });
    found.sort();
    found
}

/// Helper for a sorted list of every declaration in the tree
fn tree_declarations(tree: &NestTree) -> Vec<String> {
    let mut found: Vec<String> = tree.declarations().into_iter().map(ToString::to_string).collect();
    found.sort();
    found
}

/// Helper to transform with the given options
fn tree_of(css: &str, options: &ConvertOptions) -> NestTree {
    transform(&parse_stylesheet(css), options)
        .expect("generated selectors are never empty")
        .tree
}

/// Helper for the ordering band of a child
fn band(tree: &NestTree, id: NodeId) -> u8 {
    match tree.kind(id) {
        Some(NodeKind::PropertyGroup { .. }) => 0,
        Some(NodeKind::Conditional(_)) => 1,
        _ => 2,
    }
}

#[quickcheck]
fn prop_declarations_are_conserved(sheet: SmallSheet) -> bool {
    let parsed = parse_stylesheet(&sheet.0);
    let tree = tree_of(&sheet.0, &ConvertOptions::default());
    source_declarations(&parsed) == tree_declarations(&tree)
}

#[quickcheck]
fn prop_declarations_are_conserved_when_flat(sheet: SmallSheet) -> bool {
    let options = ConvertOptions {
        nest: false,
        ..ConvertOptions::default()
    };
    let parsed = parse_stylesheet(&sheet.0);
    source_declarations(&parsed) == tree_declarations(&tree_of(&sheet.0, &options))
}

#[quickcheck]
fn prop_repeating_rules_adds_no_nodes(sheet: SmallSheet) -> bool {
    let options = ConvertOptions::default();
    let once = tree_of(&sheet.0, &options);
    let twice = tree_of(&format!("{}{}", sheet.0, sheet.0), &options);
    once.len() == twice.len()
}

#[quickcheck]
fn prop_children_are_in_canonical_order(sheet: SmallSheet) -> bool {
    let options = ConvertOptions {
        group_properties: true,
        ..ConvertOptions::default()
    };
    let tree = tree_of(&sheet.0, &options);
    tree.preorder()
        .into_iter()
        .filter(|&id| id != NodeId::ROOT)
        .all(|id| {
            tree.children(id)
                .windows(2)
                .all(|pair| band(&tree, pair[0]) <= band(&tree, pair[1]))
        })
}

#[quickcheck]
fn prop_sibling_selectors_are_unique(sheet: SmallSheet) -> bool {
    let tree = tree_of(&sheet.0, &ConvertOptions::default());
    tree.preorder().into_iter().all(|id| {
        let children = tree.children(id);
        children.iter().enumerate().all(|(i, &a)| {
            children[i + 1..]
                .iter()
                .all(|&b| tree.kind(a) != tree.kind(b))
        })
    })
}
