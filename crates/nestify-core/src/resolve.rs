//! Path resolution.
//!
//! Each segment of a decomposed selector is matched against the anchor set.
//! A segment that extends an anchor is split into the anchor and an
//! `&`-relative remainder, so `.card:hover` under anchor `.card` becomes the
//! two steps `.card`, `&:hover`.

use crate::anchors::AnchorSet;
use crate::selector::is_combinator;

/// The nesting steps for one selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Steps from the root; never empty for a non-empty selector.
    pub steps: Vec<String>,
    /// Whether the first step is a known anchor.
    pub anchored: bool,
}

/// Resolve one segment into one or two steps.
///
/// The longest anchor that is a literal prefix of `segment` wins, provided
/// the rest of the segment continues the compound: it must start with `.`,
/// `#` or `:` (so `.foo` does not match `.foobar`). That rest becomes an
/// `&` step. A rest starting with a combinator becomes a plain step of its
/// own, spaced like a decomposed segment (`> .b`). Returns the steps and whether an anchor matched.
#[must_use]
pub fn resolve_segment(segment: &str, anchors: &AnchorSet) -> (Vec<String>, bool) {
    for anchor in anchors.longest_first() {
        if segment == anchor {
            return (vec![segment.to_string()], true);
        }
        let Some(rest) = segment.strip_prefix(anchor) else {
            continue;
        };
        match rest.chars().next() {
            Some('.' | '#' | ':') => return (vec![anchor.to_string(), format!("&{rest}")], true),
            Some(c) if is_combinator(c) => {
                let target = rest[c.len_utf8()..].trim_start();
                return (vec![anchor.to_string(), format!("{c} {target}")], true);
            }
            _ => {}
        }
    }
    (vec![segment.to_string()], false)
}

/// Resolve every segment of a selector, in order.
#[must_use]
pub fn resolve_path(segments: &[String], anchors: &AnchorSet) -> ResolvedPath {
    let mut steps = Vec::with_capacity(segments.len());
    let mut anchored = false;

    for (index, segment) in segments.iter().enumerate() {
        let (resolved, matched) = resolve_segment(segment, anchors);
        if index == 0 {
            anchored = matched;
        }
        steps.extend(resolved);
    }

    ResolvedPath { steps, anchored }
}

/// Join steps back into one selector: an `&` step is glued to the step
/// before it, other steps are separated by a space. A leading `&` step is
/// kept as written.
///
/// ```text
/// [".card", "&:hover", ".title"]  =>  ".card:hover .title"
/// ["&.active", "span"]            =>  "&.active span"
/// ```
#[must_use]
pub fn join_steps(steps: &[String]) -> String {
    let mut joined = String::new();
    for step in steps {
        if joined.is_empty() {
            joined.push_str(step);
        } else if let Some(rest) = step.strip_prefix('&') {
            joined.push_str(rest);
        } else {
            joined.push(' ');
            joined.push_str(step);
        }
    }
    joined
}

/// Collapse a path deeper than `max_depth` so its tail becomes one step.
pub fn limit_depth(path: &mut ResolvedPath, max_depth: usize) {
    let max_depth = max_depth.max(1);
    if path.steps.len() > max_depth {
        let tail = path.steps.split_off(max_depth - 1);
        path.steps.push(join_steps(&tail));
    }
}

/// Merge the resolved alternatives of a selector list into one path.
///
/// The rule is placed once, at the longest common prefix of the
/// alternatives (each alternative keeps at least one step of its own). The
/// final step lists what is left of each alternative, separated by `", "`.
/// With no common prefix the whole list becomes a single root step.
#[must_use]
pub fn merge_alternatives(mut paths: Vec<ResolvedPath>) -> ResolvedPath {
    if paths.len() == 1 {
        return paths.swap_remove(0);
    }

    let shortest = paths.iter().map(|path| path.steps.len()).min().unwrap_or(0);
    let mut common = 0;
    while common + 1 < shortest
        && paths
            .iter()
            .all(|path| path.steps[common] == paths[0].steps[common])
    {
        common += 1;
    }

    let tails: Vec<String> = paths
        .iter()
        .map(|path| join_steps(&path.steps[common..]))
        .collect();

    let anchored = common > 0 && paths.iter().all(|path| path.anchored);
    let mut steps: Vec<String> = paths
        .into_iter()
        .next()
        .map(|path| path.steps[..common].to_vec())
        .unwrap_or_default();
    steps.push(tails.join(", "));

    ResolvedPath { steps, anchored }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_join_glues_ampersand_steps() {
        assert_eq!(join_steps(&steps(&[".card", "&:hover", ".title"])), ".card:hover .title");
        assert_eq!(join_steps(&steps(&["&.active", "span"])), "&.active span");
        assert_eq!(join_steps(&[]), "");
    }

    #[test]
    fn test_limit_depth_collapses_tail() {
        let mut path = ResolvedPath {
            steps: steps(&[".a", ".b", "&:hover", ".c"]),
            anchored: true,
        };
        limit_depth(&mut path, 2);
        assert_eq!(path.steps, steps(&[".a", ".b:hover .c"]));

        let mut path = ResolvedPath {
            steps: steps(&[".a", "&:hover"]),
            anchored: true,
        };
        limit_depth(&mut path, 0);
        assert_eq!(path.steps, steps(&[".a:hover"]));
    }
}
