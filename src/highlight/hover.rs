//! Hover text for the token under a cursor column

use crate::filters::resolve_filter;
use crate::query::token::{CharacterRange, Sequence, Token};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hover {
    pub contents: String,
    pub range: CharacterRange,
}

/// Hover for the token containing the 1-based `column`, if it has any text
/// to show. A token covers columns `start + 1 ..= end`.
pub fn hover_at(sequence: &Sequence, column: usize) -> Option<Hover> {
    let token = sequence.members.iter().find(|token| {
        let range = token.range();
        range.start < column && column <= range.end
    })?;

    let contents = match token {
        Token::Meta(meta) => meta.hover()?.to_string(),
        Token::Filter(filter) => resolve_filter(&filter.filter_type.value)?
            .description()
            .to_string(),
        _ => return None,
    };

    Some(Hover {
        contents,
        range: token.range(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorate::decorate;
    use crate::filters::find_filter;
    use crate::query::scanner::{ScanOptions, scan};
    use crate::query::token::PatternKind;

    fn sequence(input: &str) -> Sequence {
        scan(input, &ScanOptions::default()).unwrap()
    }

    #[test]
    fn test_filter_description() {
        let hover = hover_at(&sequence("repo:foo"), 2).unwrap();
        let repo = find_filter("repo").unwrap();
        assert_eq!(hover.contents, repo.description);
        assert_eq!(hover.range, CharacterRange::new(0, 8));
    }

    #[test]
    fn test_negated_filter_description() {
        let hover = hover_at(&sequence("-repo:foo"), 3).unwrap();
        let repo = find_filter("repo").unwrap();
        assert_eq!(Some(hover.contents.as_str()), repo.negated_description);
    }

    #[test]
    fn test_column_bounds() {
        let seq = sequence("repo:foo bar");
        assert!(hover_at(&seq, 0).is_none());
        assert!(hover_at(&seq, 1).is_some());
        assert!(hover_at(&seq, 8).is_some());
        // whitespace and plain patterns have nothing to show
        assert!(hover_at(&seq, 9).is_none());
        assert!(hover_at(&seq, 11).is_none());
        assert!(hover_at(&seq, 40).is_none());
    }

    #[test]
    fn test_meta_hover() {
        let options = ScanOptions {
            pattern_kind: PatternKind::Regexp,
            ..ScanOptions::default()
        };
        let decorated = decorate(&scan("a+", &options).unwrap());
        let hover = hover_at(&decorated, 2).unwrap();
        assert!(hover.contents.contains("Quantifier"));
        assert_eq!(hover.range, CharacterRange::new(1, 2));
        assert!(hover_at(&decorated, 1).is_none());
    }

    #[test]
    fn test_structural_hole_hover() {
        let options = ScanOptions {
            pattern_kind: PatternKind::Structural,
            ..ScanOptions::default()
        };
        let decorated = decorate(&scan("foo(:[args])", &options).unwrap());

        let hover = hover_at(&decorated, 6).unwrap();
        assert_eq!(hover.range, CharacterRange::new(4, 11));
        assert!(hover.contents.contains("`args`"));
        assert!(hover.contents.contains("balanced text up to `)`"));

        // the plain fragments around the hole have no hover
        assert!(hover_at(&decorated, 2).is_none());
        assert!(hover_at(&decorated, 12).is_none());
    }
}
