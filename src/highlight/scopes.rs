//! Projection of decorated tokens onto highlight scopes.
//!
//! Output is a flat list of `(start offset, scope)` pairs with strictly
//! increasing offsets; each scope runs until the next pair's start.

use crate::decorate::path::decorate_path;
use crate::filters;
use crate::query::token::{CharacterRange, FilterValue, MetaToken, Sequence, Token};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopedToken {
    pub start: usize,
    pub scope: String,
}

impl ScopedToken {
    fn new(start: usize, scope: impl Into<String>) -> Self {
        Self {
            start,
            scope: scope.into(),
        }
    }
}

/// Project a (usually decorated) sequence onto scopes
pub fn project(sequence: &Sequence) -> Vec<ScopedToken> {
    let mut tokens = Vec::with_capacity(sequence.members.len());
    for token in &sequence.members {
        project_token(token, &mut tokens);
    }
    normalize(tokens)
}

/// Scope label of a meta token, e.g. `metaRegexpDelimited`
pub fn meta_scope(meta: &MetaToken) -> String {
    match meta {
        MetaToken::Path { kind, .. } => format!("metaPath{}", kind.as_str()),
        MetaToken::Regexp { kind, .. } => format!("metaRegexp{}", kind.as_str()),
        MetaToken::Structural { kind, .. } => format!("metaStructural{}", kind.as_str()),
    }
}

fn project_token(token: &Token, out: &mut Vec<ScopedToken>) {
    let start = token.range().start;
    match token {
        Token::Whitespace { .. } => out.push(ScopedToken::new(start, "whitespace")),
        Token::Comment(_) => out.push(ScopedToken::new(start, "comment")),
        Token::OpeningParen { .. } | Token::ClosingParen { .. } => {
            out.push(ScopedToken::new(start, "paren"))
        }
        Token::Keyword(_) => out.push(ScopedToken::new(start, "operator")),
        Token::Literal(_) | Token::Quoted(_) => out.push(ScopedToken::new(start, "identifier")),
        Token::Pattern(_) => out.push(ScopedToken::new(start, "pattern")),
        Token::Meta(meta) => out.push(ScopedToken::new(start, meta_scope(meta))),
        Token::Filter(filter) => {
            out.push(ScopedToken::new(filter.filter_type.range.start, "keyword"));
            match &filter.filter_value {
                Some(FilterValue::Literal(literal)) if filters::is_path_like(filter.field()) => {
                    for segment in decorate_path(literal) {
                        project_filter_segment(&segment, out);
                    }
                }
                Some(value) => out.push(ScopedToken::new(value.range().start, "identifier")),
                None => {}
            }
        }
    }
}

/// Segments of a split filter value read as identifiers, not patterns
fn project_filter_segment(token: &Token, out: &mut Vec<ScopedToken>) {
    match token {
        Token::Pattern(pattern) => out.push(ScopedToken::new(pattern.range.start, "identifier")),
        other => project_token(other, out),
    }
}

/// Sort by start; a later token replaces an earlier one at the same start
fn normalize(mut tokens: Vec<ScopedToken>) -> Vec<ScopedToken> {
    tokens.sort_by_key(|token| token.start);

    let mut normalized: Vec<ScopedToken> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match normalized.last_mut() {
            Some(last) if last.start == token.start => *last = token,
            _ => normalized.push(token),
        }
    }
    normalized
}

/// Expand scoped starts into `(range, scope)` runs over a query of `len` bytes
pub fn scoped_spans(tokens: &[ScopedToken], len: usize) -> Vec<(CharacterRange, &str)> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| token.start < len)
        .map(|(i, token)| {
            let end = tokens.get(i + 1).map_or(len, |next| next.start.min(len));
            (CharacterRange::new(token.start, end), token.scope.as_str())
        })
        .collect()
}
