//! The anchor registry.
//!
//! An anchor is a simple selector (one class, id or type selector, nothing
//! else) that may act as a nesting parent. Anchors are collected from the
//! first segment of every rule in the document before anything is nested,
//! so a rule can nest under an anchor whose own rule appears later.

use std::collections::HashSet;

use nestify_css::Stylesheet;

use crate::selector::decompose_lossy;

/// The set of anchors for one stylesheet. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct AnchorSet {
    /// Sorted longest first, ties broken lexicographically.
    ordered: Vec<String>,
    members: HashSet<String>,
}

impl AnchorSet {
    /// Scan every style rule (including rules inside conditional blocks) and
    /// collect the simple first segments.
    #[must_use]
    pub fn collect(sheet: &Stylesheet) -> Self {
        let mut candidates = Vec::new();
        sheet.walk_rules(&mut |rule, _| {
            for alternative in &rule.selectors {
                let (segments, _) = decompose_lossy(alternative);
                let Some(first) = segments.first() else {
                    continue;
                };
                let stem = strip_trailing_pseudo(first);
                if is_simple(stem) {
                    candidates.push(stem.to_string());
                }
            }
        });
        candidates.into_iter().collect()
    }

    /// Whether `selector` is a known anchor.
    #[must_use]
    pub fn contains(&self, selector: &str) -> bool {
        self.members.contains(selector)
    }

    /// Anchors from longest to shortest, so the first match is the most
    /// specific one.
    pub fn longest_first(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    /// Number of anchors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Whether there are no anchors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AnchorSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let members: HashSet<String> = iter.into_iter().map(Into::into).collect();
        let mut ordered: Vec<String> = members.iter().cloned().collect();
        ordered.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        Self { ordered, members }
    }
}

/// [§ 3.6 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
///
/// Strip everything from the first pseudo-class or pseudo-element marker of
/// a segment: `.btn:hover` and `.btn::before` both give `.btn`. A segment
/// that starts with `:` is returned unchanged.
#[must_use]
pub fn strip_trailing_pseudo(segment: &str) -> &str {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (index, c) in segment.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, ':') if depth == 0 && index > 0 => return &segment[..index],
            _ => {}
        }
    }
    segment
}

/// Whether `segment` is exactly one class, id or type selector.
///
/// `.card`, `#main` and `ul` are simple; `.a.b`, `a.b`, `*`, `[x]`,
/// `.a > .b` and `:root` are not.
#[must_use]
pub fn is_simple(segment: &str) -> bool {
    let (body, needs_letter) = if let Some(rest) = segment.strip_prefix('.') {
        (rest, false)
    } else if let Some(rest) = segment.strip_prefix('#') {
        (rest, false)
    } else {
        (segment, true)
    };

    let mut chars = body.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if needs_letter && !first.is_ascii_alphabetic() {
        return false;
    }

    let mut escaped = first == '\\';
    if !escaped && !is_name_char(first) {
        return false;
    }
    for c in chars {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if !is_name_char(c) {
            return false;
        }
    }
    !escaped
}

/// [§ 4.2 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}
