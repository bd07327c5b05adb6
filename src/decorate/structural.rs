//! Structural (comby-style) pattern decoration

use super::fill_gaps;
use crate::query::token::{CharacterRange, MetaToken, Pattern, StructuralMetaKind, Token};
use regex::Regex;
use std::sync::LazyLock;

/// `:[[name]]`, `:[name]`, `:[name]]` and `...`
static HOLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(:\[\[\w*\]\])|(:\[\w*\]\]?)|(\.\.\.)").unwrap());

/// Mark every hole in a structural pattern
pub fn decorate_structural(pattern: &Pattern) -> Vec<Token> {
    let offset = pattern.value_start();
    let value = pattern.value.as_str();

    let tokens = HOLE
        .find_iter(value)
        .map(|found| MetaToken::Structural {
            range: CharacterRange::new(found.start(), found.end()).shift(offset),
            kind: StructuralMetaKind::Hole,
            value: found.as_str().to_string(),
            hover: hole_hover(found.as_str(), value[found.end()..].chars().next()),
        })
        .collect();

    fill_gaps(pattern, tokens)
}

fn hole_hover(hole: &str, following: Option<char>) -> String {
    let name = hole
        .trim_start_matches(":[")
        .trim_start_matches('[')
        .trim_end_matches(']');
    let subject = if hole == "..." || name.is_empty() {
        "**Anonymous hole**".to_string()
    } else {
        format!("**Hole** `{}`", name)
    };

    match following {
        Some(c) => format!(
            "{}. Matches balanced text up to `{}`, the character following the hole.",
            subject,
            c.escape_default()
        ),
        None => format!("{}. Matches everything through the end of the input.", subject),
    }
}
