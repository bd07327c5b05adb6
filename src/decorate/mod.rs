//! Meta-decoration of pattern tokens.
//!
//! Regexp and structural patterns are re-read with their own grammar and
//! split into [`MetaToken`]s (group delimiters, quantifiers, holes, ...) plus
//! plain `Pattern` fragments for the text in between, so a decorated
//! sequence still covers the whole query. Decoration never fails: a pattern
//! its grammar rejects is passed through unchanged.

pub mod grammar;
pub mod path;
pub mod regexp;
pub mod structural;

use crate::query::token::{CharacterRange, MetaToken, Pattern, PatternKind, Sequence, Token};
use tracing::debug;

/// Replace every regexp/structural pattern in `sequence` with its decoration
pub fn decorate(sequence: &Sequence) -> Sequence {
    let members = sequence
        .members
        .iter()
        .flat_map(|token| match token {
            Token::Pattern(pattern) => decorate_pattern(pattern),
            other => vec![other.clone()],
        })
        .collect();

    Sequence {
        range: sequence.range,
        members,
    }
}

/// Decorate a single pattern according to its kind
pub fn decorate_pattern(pattern: &Pattern) -> Vec<Token> {
    match pattern.kind {
        PatternKind::Literal => vec![Token::Pattern(pattern.clone())],
        PatternKind::Structural => structural::decorate_structural(pattern),
        PatternKind::Regexp => match regexp::decorate_regexp(pattern) {
            Ok(tokens) => tokens,
            Err(err) => {
                debug!(pattern = %pattern.value, error = %err, "leaving pattern undecorated");
                vec![Token::Pattern(pattern.clone())]
            }
        },
    }
}

/// Interleave `meta` with `Pattern` fragments covering the rest of
/// `pattern`. Meta tokens overlapping an earlier one are dropped.
pub(crate) fn fill_gaps(pattern: &Pattern, mut meta: Vec<MetaToken>) -> Vec<Token> {
    // Stable: tokens at the same start keep traversal order
    meta.sort_by_key(|token| token.range().start);

    let base = pattern.range.start;
    let text = if pattern.negated {
        format!("-{}", pattern.value)
    } else {
        pattern.value.clone()
    };
    let fragment = |start: usize, end: usize| {
        Token::Pattern(Pattern {
            range: CharacterRange::new(start, end),
            kind: pattern.kind,
            value: text[start - base..end - base].to_string(),
            negated: false,
        })
    };

    let mut tokens = Vec::with_capacity(meta.len() * 2 + 1);
    let mut cursor = base;
    for token in meta {
        let range = token.range();
        if range.is_empty() || range.start < cursor || range.end > pattern.range.end {
            continue;
        }
        if range.start > cursor {
            tokens.push(fragment(cursor, range.start));
        }
        cursor = range.end;
        tokens.push(Token::Meta(token));
    }
    if cursor < pattern.range.end {
        tokens.push(fragment(cursor, pattern.range.end));
    }

    tokens
}
