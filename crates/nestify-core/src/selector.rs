//! Selector decomposition.
//!
//! [Selectors Level 4 § 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
//!
//! A complex selector is split into path segments at descendant combinators
//! (whitespace). Everything else stays inside the segment it belongs to:
//! pseudo-classes, attribute selectors, functional pseudo-classes and
//! escapes are atomic.
//!
//! The explicit combinators `>`, `+` and `~` are never split points. When a
//! combinator is written with whitespace around it, it introduces the next
//! segment, normalized to `"> .b"`. When it is written tight (`.a>.b`) it
//! stays inside the compound it joins.
//!
//! ```text
//! ".nav > li a:hover"  =>  [".nav", "> li", "a:hover"]
//! ".a>.b .c"           =>  [".a>.b", ".c"]
//! "input[type=\"a b\"]" =>  ["input[type=\"a b\"]"]
//! ```

use thiserror::Error;

/// Why a selector could not be decomposed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The selector has no content.
    #[error("selector is empty")]
    Empty,
    /// A `(` or `[` is never closed, or a `)` or `]` was never opened.
    #[error("unbalanced `{0}`")]
    Unbalanced(char),
    /// A quoted string runs to the end of the selector.
    #[error("unterminated string")]
    UnterminatedString,
    /// A combinator with nothing on one side.
    #[error("combinator `{0}` has nothing to combine")]
    DanglingCombinator(char),
    /// Two combinators in a row.
    #[error("combinators `{0}` and `{1}` in a row")]
    DoubleCombinator(char, char),
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
#[must_use]
pub const fn is_combinator(c: char) -> bool {
    matches!(c, '>' | '+' | '~')
}

/// Split `selector` into path segments.
///
/// # Errors
///
/// Returns a [`SelectorError`] when the selector is malformed. Callers that
/// must keep going should use [`decompose_lossy`].
pub fn decompose(selector: &str) -> Result<Vec<String>, SelectorError> {
    let chars: Vec<char> = selector.chars().collect();
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut open: Vec<char> = Vec::new();
    let mut quote: Option<char> = None;
    let mut pending: Option<char> = None;
    let mut saw_space = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Inside a string everything is literal until the closing quote.
        if let Some(q) = quote {
            current.push(c);
            if c == '\\' {
                if let Some(&next) = chars.get(i + 1) {
                    current.push(next);
                    i += 1;
                }
            } else if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        // Inside brackets or parentheses only nesting and quotes matter.
        if !open.is_empty() {
            current.push(c);
            match c {
                '\\' => {
                    if let Some(&next) = chars.get(i + 1) {
                        current.push(next);
                        i += 1;
                    }
                }
                '"' | '\'' => quote = Some(c),
                '(' => open.push(')'),
                '[' => open.push(']'),
                ')' | ']' => {
                    if open.pop() != Some(c) {
                        return Err(SelectorError::Unbalanced(c));
                    }
                }
                _ => {}
            }
            i += 1;
            continue;
        }

        match c {
            c if c.is_whitespace() => saw_space = true,

            c if is_combinator(c) => {
                if let Some(previous) = pending {
                    return Err(SelectorError::DoubleCombinator(previous, c));
                }
                let tight_after = chars.get(i + 1).is_some_and(|next| !next.is_whitespace());
                if !current.is_empty() && !saw_space && tight_after {
                    current.push(c);
                } else {
                    if current.is_empty() && segments.is_empty() {
                        return Err(SelectorError::DanglingCombinator(c));
                    }
                    flush(&mut segments, &mut current);
                    pending = Some(c);
                    saw_space = false;
                }
            }

            ')' | ']' => return Err(SelectorError::Unbalanced(c)),

            _ => {
                if saw_space {
                    flush(&mut segments, &mut current);
                    saw_space = false;
                }
                if let Some(combinator) = pending.take() {
                    current.push(combinator);
                    current.push(' ');
                }
                current.push(c);
                match c {
                    '\\' => {
                        if let Some(&next) = chars.get(i + 1) {
                            current.push(next);
                            i += 1;
                        }
                    }
                    '"' | '\'' => quote = Some(c),
                    '(' => open.push(')'),
                    '[' => open.push(']'),
                    _ => {}
                }
            }
        }
        i += 1;
    }

    if quote.is_some() {
        return Err(SelectorError::UnterminatedString);
    }
    if let Some(closer) = open.pop() {
        let opener = if closer == ')' { '(' } else { '[' };
        return Err(SelectorError::Unbalanced(opener));
    }
    if let Some(combinator) = pending {
        return Err(SelectorError::DanglingCombinator(combinator));
    }
    flush(&mut segments, &mut current);

    if segments.is_empty() {
        return Err(SelectorError::Empty);
    }
    Ok(segments)
}

/// Split `selector` into path segments, falling back to plain whitespace
/// splitting when it is malformed. The error, if any, is returned so the
/// caller can report it.
#[must_use]
pub fn decompose_lossy(selector: &str) -> (Vec<String>, Option<SelectorError>) {
    match decompose(selector) {
        Ok(segments) => (segments, None),
        Err(error) => (
            selector.split_whitespace().map(str::to_string).collect(),
            Some(error),
        ),
    }
}

fn flush(segments: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        segments.push(core::mem::take(current));
    }
}
