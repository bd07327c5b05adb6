//! Query scanner
//!
//! Turns a raw query string into a [`Sequence`] of tokens whose ranges cover
//! every byte of the input. The interesting part is
//! [`scan_balanced_pattern`], which decides whether parenthesized text is a
//! literal pattern or a boolean group.

use crate::filters;
use crate::query::token::{
    CharacterRange, Comment, Filter, FilterValue, Keyword, KeywordKind, Literal, Pattern,
    PatternKind, Quoted, Sequence, Token,
};
use serde::Serialize;
use thiserror::Error;
use tracing::trace;

/// Expected-text for a balanced pattern that runs into a filter or operator
pub const NOT_PATTERN_LIKE: &str = "non-recognized filter or non-operator";

/// Expected-text for a pattern with an unclosed paren
pub const UNBALANCED: &str = "no unbalanced parentheses";

/// Deepest paren nesting accepted by the scanner and the parser
pub const MAX_NESTING: usize = 256;

/// Scanner failure at a byte offset
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("expected {expected} at offset {at}")]
pub struct ScanError {
    pub at: usize,
    pub expected: String,
}

impl ScanError {
    fn new(at: usize, expected: &str) -> Self {
        Self {
            at,
            expected: expected.to_string(),
        }
    }
}

/// Scanner settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Recognize `//` line comments
    pub interpret_comments: bool,
    /// Kind assigned to every scanned pattern
    pub pattern_kind: PatternKind,
}

/// Scan a query into tokens
pub fn scan(input: &str, options: &ScanOptions) -> Result<Sequence, ScanError> {
    let mut members = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let token = scan_token(input, pos, options)?;
        pos = token.range().end;
        members.push(token);
    }

    Ok(Sequence {
        range: CharacterRange::new(0, input.len()),
        members,
    })
}

fn scan_token(input: &str, start: usize, options: &ScanOptions) -> Result<Token, ScanError> {
    let rest = &input[start..];

    let whitespace = rest.len() - rest.trim_start().len();
    if whitespace > 0 {
        return Ok(Token::Whitespace {
            range: CharacterRange::new(start, start + whitespace),
        });
    }

    if options.interpret_comments && rest.starts_with("//") {
        let len = rest.find('\n').unwrap_or(rest.len());
        return Ok(Token::Comment(Comment {
            range: CharacterRange::new(start, start + len),
            value: rest[..len].to_string(),
        }));
    }

    if let Some(filter) = scan_filter(input, start) {
        return Ok(Token::Filter(filter));
    }

    if rest.starts_with('(') {
        return match scan_balanced_pattern(input, start, options.pattern_kind) {
            Ok(pattern) => Ok(Token::Pattern(pattern)),
            Err(err) => {
                trace!(at = err.at, expected = %err.expected, "treating paren at {} as a group", start);
                Ok(Token::OpeningParen {
                    range: CharacterRange::new(start, start + 1),
                })
            }
        };
    }

    if rest.starts_with(')') {
        return Ok(Token::ClosingParen {
            range: CharacterRange::new(start, start + 1),
        });
    }

    if let Some(keyword) = scan_keyword(input, start) {
        return Ok(Token::Keyword(keyword));
    }

    if rest.starts_with('"') {
        return scan_quoted(input, start).map(Token::Quoted);
    }

    Ok(Token::Pattern(scan_pattern(input, start, options.pattern_kind)))
}

/// Scan a depth-balanced run of pattern text starting at `start`.
///
/// The run ends at whitespace outside parens or at an unmatched `)`. When a
/// filter or a keyword shows up right after an opening paren or after
/// whitespace inside parens, the parens are grouping syntax rather than
/// text, and the scan fails at that offset.
pub fn scan_balanced_pattern(
    input: &str,
    start: usize,
    kind: PatternKind,
) -> Result<Pattern, ScanError> {
    if !is_pattern_like(input, start) {
        return Err(ScanError::new(start, NOT_PATTERN_LIKE));
    }

    let mut depth = 0usize;
    let mut pos = start;

    while let Some(c) = input[pos..].chars().next() {
        let next = pos + c.len_utf8();
        match c {
            c if c.is_whitespace() => {
                if depth == 0 {
                    break;
                }
                if !is_pattern_like(input, next) {
                    return Err(ScanError::new(next, NOT_PATTERN_LIKE));
                }
            }
            '(' => {
                if depth == MAX_NESTING {
                    return Err(ScanError::new(pos, "fewer nested parentheses"));
                }
                if !is_pattern_like(input, next) {
                    return Err(ScanError::new(next, NOT_PATTERN_LIKE));
                }
                depth += 1;
            }
            ')' => {
                if depth == 0 {
                    // Unmatched, may close an enclosing group
                    break;
                }
                depth -= 1;
            }
            '\\' => {
                // Escaped characters never end the run, "\ " included
                if let Some(escaped) = input[next..].chars().next() {
                    pos = next + escaped.len_utf8();
                    continue;
                }
            }
            _ => {}
        }
        pos = next;
    }

    if depth != 0 {
        return Err(ScanError::new(pos, UNBALANCED));
    }
    if pos == start {
        return Err(ScanError::new(start, "a pattern"));
    }

    Ok(Pattern {
        range: CharacterRange::new(start, pos),
        kind,
        value: input[start..pos].to_string(),
        negated: false,
    })
}

/// Fallback pattern scan used by [`scan`]; never fails.
fn scan_pattern(input: &str, start: usize, kind: PatternKind) -> Pattern {
    let rest = &input[start..];

    if let Some(after) = rest.strip_prefix('-')
        && after.starts_with(|c: char| !c.is_whitespace() && c != ')')
        && let Ok(mut pattern) = scan_balanced_pattern(input, start + 1, kind)
    {
        pattern.range.start = start;
        pattern.negated = true;
        return pattern;
    }

    match scan_balanced_pattern(input, start, kind) {
        Ok(pattern) => pattern,
        Err(err) => {
            trace!(at = err.at, expected = %err.expected, "balanced scan failed, splitting at parens");
            let end = run_end(input, start, |c| c.is_whitespace() || c == '(' || c == ')');
            Pattern {
                range: CharacterRange::new(start, end),
                kind,
                value: input[start..end].to_string(),
                negated: false,
            }
        }
    }
}

/// End of a run of characters up to `stop`, consuming `\X` escapes as pairs.
/// Always consumes at least one character when `start` is not at the end.
fn run_end(input: &str, start: usize, stop: impl Fn(char) -> bool) -> usize {
    let mut pos = start;
    while let Some(c) = input[pos..].chars().next() {
        if pos > start && stop(c) {
            break;
        }
        pos += c.len_utf8();
        if c == '\\'
            && let Some(escaped) = input[pos..].chars().next()
        {
            pos += escaped.len_utf8();
        }
    }
    pos
}

fn is_pattern_like(input: &str, at: usize) -> bool {
    scan_keyword(input, at).is_none() && scan_filter(input, at).is_none()
}

fn scan_keyword(input: &str, start: usize) -> Option<Keyword> {
    const KEYWORDS: [(&str, KeywordKind); 3] = [
        ("and", KeywordKind::And),
        ("or", KeywordKind::Or),
        ("not", KeywordKind::Not),
    ];

    let rest = input[start..].as_bytes();
    for (word, kind) in KEYWORDS {
        if rest.len() < word.len() || !rest[..word.len()].eq_ignore_ascii_case(word.as_bytes()) {
            continue;
        }
        let end = start + word.len();
        let whole_word = input[end..]
            .chars()
            .next()
            .is_none_or(|c| c.is_whitespace() || c == '(' || c == ')');
        if whole_word {
            return Some(Keyword {
                range: CharacterRange::new(start, end),
                kind,
                value: input[start..end].to_string(),
            });
        }
    }
    None
}

fn scan_quoted(input: &str, start: usize) -> Result<Quoted, ScanError> {
    let body = start + 1;
    let mut chars = input[body..].char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' => {
                return Ok(Quoted {
                    range: CharacterRange::new(start, body + i + 1),
                    quoted_value: input[body..body + i].to_string(),
                });
            }
            _ => {}
        }
    }

    Err(ScanError::new(input.len(), "closing quote"))
}

/// `-`? registered-field `:` value
fn scan_filter(input: &str, start: usize) -> Option<Filter> {
    let rest = &input[start..];
    let negated = rest.starts_with('-');
    let name_start = if negated { start + 1 } else { start };

    let name_len = input[name_start..]
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(input.len() - name_start);
    if name_len == 0 {
        return None;
    }
    let name_end = name_start + name_len;
    if !input[name_end..].starts_with(':') || !filters::is_filter_name(&input[name_start..name_end]) {
        return None;
    }

    let value_start = name_end + 1;
    let filter_value = scan_filter_value(input, value_start);
    let end = filter_value
        .as_ref()
        .map_or(value_start, |value| value.range().end);

    Some(Filter {
        range: CharacterRange::new(start, end),
        filter_type: Literal {
            range: CharacterRange::new(start, name_end),
            value: input[start..name_end].to_string(),
        },
        filter_value,
        negated,
    })
}

fn scan_filter_value(input: &str, start: usize) -> Option<FilterValue> {
    if input[start..].starts_with('"')
        && let Ok(quoted) = scan_quoted(input, start)
    {
        return Some(FilterValue::Quoted(quoted));
    }

    // Literal value: stops at whitespace or at a `)` closing an outer group
    let mut depth = 0usize;
    let mut pos = start;
    while let Some(c) = input[pos..].chars().next() {
        if c.is_whitespace() {
            break;
        }
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => break,
            ')' => depth -= 1,
            '\\' => {
                pos += 1;
                if let Some(escaped) = input[pos..].chars().next() {
                    pos += escaped.len_utf8();
                }
                continue;
            }
            _ => {}
        }
        pos += c.len_utf8();
    }

    (pos > start).then(|| {
        FilterValue::Literal(Literal {
            range: CharacterRange::new(start, pos),
            value: input[start..pos].to_string(),
        })
    })
}
