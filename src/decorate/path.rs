//! Path splitting for path-like filter values (`repo:`, `file:`, ...)

use super::decorate_pattern;
use crate::query::token::{CharacterRange, Literal, MetaToken, PathMetaKind, Pattern, PatternKind, Token};

/// Split `literal` on unescaped `/`. Segments come back as regexp patterns,
/// separators as path meta tokens. `\X` pairs are never split.
pub fn split_path(literal: &Literal) -> Vec<Token> {
    let base = literal.range.start;
    let value = literal.value.as_str();
    let mut tokens = Vec::new();
    let mut segment_start = 0;
    let mut chars = value.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '/' => {
                if i > segment_start {
                    tokens.push(segment(value, base, segment_start, i));
                }
                tokens.push(Token::Meta(MetaToken::Path {
                    range: CharacterRange::new(base + i, base + i + 1),
                    kind: PathMetaKind::Separator,
                    value: "/".to_string(),
                }));
                segment_start = i + 1;
            }
            _ => {}
        }
    }
    if segment_start < value.len() {
        tokens.push(segment(value, base, segment_start, value.len()));
    }

    tokens
}

/// [`split_path`], then decorate each segment as a regexp
pub fn decorate_path(literal: &Literal) -> Vec<Token> {
    split_path(literal)
        .into_iter()
        .flat_map(|token| match token {
            Token::Pattern(pattern) => decorate_pattern(&pattern),
            other => vec![other],
        })
        .collect()
}

fn segment(value: &str, base: usize, start: usize, end: usize) -> Token {
    Token::Pattern(Pattern {
        range: CharacterRange::new(base + start, base + end),
        kind: PatternKind::Regexp,
        value: value[start..end].to_string(),
        negated: false,
    })
}
