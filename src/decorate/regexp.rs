//! Regexp pattern decoration

use super::fill_gaps;
use super::grammar::{self, Assertion, CharacterSet, GrammarError, Quantifier, RegexpVisitor};
use crate::query::token::{CharacterRange, MetaToken, Pattern, RegexpMetaKind, Token};

/// Split a regexp pattern into meta tokens and plain fragments
pub fn decorate_regexp(pattern: &Pattern) -> Result<Vec<Token>, GrammarError> {
    let mut collector = MetaCollector {
        value: &pattern.value,
        offset: pattern.value_start(),
        tokens: Vec::new(),
    };
    grammar::walk(&pattern.value, &mut collector)?;
    Ok(fill_gaps(pattern, collector.tokens))
}

struct MetaCollector<'a> {
    value: &'a str,
    /// Absolute offset of `value` in the query
    offset: usize,
    tokens: Vec<MetaToken>,
}

impl MetaCollector<'_> {
    fn push(&mut self, span: CharacterRange, kind: RegexpMetaKind, hover: String) {
        self.tokens.push(MetaToken::Regexp {
            range: span.shift(self.offset),
            kind,
            value: span.slice(self.value).to_string(),
            hover,
        });
    }
}

impl RegexpVisitor for MetaCollector<'_> {
    fn group(&mut self, open: CharacterRange, close: CharacterRange, capturing: bool) {
        let hover = if capturing {
            "**Capturing group**. Matches the grouped expression and remembers the match."
        } else {
            "**Non-capturing group**. Groups the expression without remembering the match."
        };
        self.push(open, RegexpMetaKind::Delimited, hover.to_string());
        self.push(close, RegexpMetaKind::Delimited, hover.to_string());
    }

    fn character_class(&mut self, open: CharacterRange, close: CharacterRange, negated: bool) {
        let hover = if negated {
            "**Negated character class**. Matches any character not listed between the brackets."
        } else {
            "**Character class**. Matches any one of the characters listed between the brackets."
        };
        self.push(open, RegexpMetaKind::CharacterClass, hover.to_string());
        self.push(close, RegexpMetaKind::CharacterClass, hover.to_string());
    }

    fn class_range(&mut self, dash: CharacterRange) {
        self.push(
            dash,
            RegexpMetaKind::CharacterClass,
            "**Character range**. Matches a character between the two bounds, inclusive."
                .to_string(),
        );
    }

    fn character_set(&mut self, span: CharacterRange, set: CharacterSet) {
        self.push(span, RegexpMetaKind::CharacterSet, character_set_hover(&set));
    }

    fn escaped_character(&mut self, span: CharacterRange, c: char) {
        self.push(
            span,
            RegexpMetaKind::EscapedCharacter,
            format!("**Escaped character**. Matches `{}` literally.", c.escape_default()),
        );
    }

    fn quantifier(&mut self, span: CharacterRange, quantifier: Quantifier, greedy: bool) {
        self.push(span, RegexpMetaKind::Quantifier, quantifier_hover(quantifier, greedy));
    }

    fn assertion(&mut self, span: CharacterRange, assertion: Assertion) {
        self.push(span, RegexpMetaKind::Assertion, assertion_hover(assertion).to_string());
    }

    fn alternation(&mut self, bar: CharacterRange) {
        self.push(
            bar,
            RegexpMetaKind::Alternative,
            "**Or**. Matches either the expression before or the expression after `|`."
                .to_string(),
        );
    }
}

fn character_set_hover(set: &CharacterSet) -> String {
    let (negated, description) = match set {
        CharacterSet::Any => return "**Dot**. Matches any character except a newline.".to_string(),
        CharacterSet::Digit { negated } => (*negated, "digit `0-9`".to_string()),
        CharacterSet::Space { negated } => (*negated, "whitespace character".to_string()),
        CharacterSet::Word { negated } => (
            *negated,
            "word character (letters, digits and underscore)".to_string(),
        ),
        CharacterSet::Unicode { name, negated } => {
            (*negated, format!("character in the Unicode class `{}`", name))
        }
        CharacterSet::Ascii { name, negated } => {
            (*negated, format!("character in the ASCII class `{}`", name))
        }
    };

    if negated {
        format!("**Negated character set**. Matches any character that is not a {}.", description)
    } else {
        format!("**Character set**. Matches any {}.", description)
    }
}

fn quantifier_hover(quantifier: Quantifier, greedy: bool) -> String {
    let times = match quantifier {
        Quantifier::ZeroOrOne => "zero or one times".to_string(),
        Quantifier::ZeroOrMore => "zero or more times".to_string(),
        Quantifier::OneOrMore => "one or more times".to_string(),
        Quantifier::Exactly(n) => format!("exactly {} times", n),
        Quantifier::AtLeast(n) => format!("{} or more times", n),
        Quantifier::Bounded(min, max) => format!("between {} and {} times", min, max),
    };
    let mode = if greedy {
        "as many times as possible (greedy)"
    } else {
        "as few times as possible (lazy)"
    };
    format!("**Quantifier**. Matches the preceding expression {}, {}.", times, mode)
}

fn assertion_hover(assertion: Assertion) -> &'static str {
    match assertion {
        Assertion::StartLine => "**Start anchor**. Matches the beginning of a line.",
        Assertion::EndLine => "**End anchor**. Matches the end of a line.",
        Assertion::StartText => "**Start of text**. Matches only at the beginning of the input.",
        Assertion::EndText => "**End of text**. Matches only at the end of the input.",
        Assertion::WordBoundary => "**Word boundary**. Matches between a word and a non-word character.",
        Assertion::NotWordBoundary => "**Non-word boundary**. Matches where `\\b` does not.",
        Assertion::Other => "**Assertion**. Matches a position without consuming characters.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::token::PatternKind;

    fn pattern(value: &str, start: usize) -> Pattern {
        Pattern {
            range: CharacterRange::new(start, start + value.len()),
            kind: PatternKind::Regexp,
            value: value.to_string(),
            negated: false,
        }
    }

    fn metas(tokens: &[Token]) -> Vec<(RegexpMetaKind, CharacterRange, &str)> {
        tokens
            .iter()
            .filter_map(|token| match token {
                Token::Meta(MetaToken::Regexp {
                    kind, range, value, ..
                }) => Some((*kind, *range, value.as_str())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_adjacent_groups_are_ordered() {
        let tokens = decorate_regexp(&pattern("(a)(b)", 0)).unwrap();
        let starts: Vec<usize> = metas(&tokens).iter().map(|(_, range, _)| range.start).collect();
        assert_eq!(starts, vec![0, 2, 3, 5]);
        assert!(starts.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_offsets_translate_to_query() {
        let tokens = decorate_regexp(&pattern("a+", 10)).unwrap();
        assert_eq!(
            tokens[0],
            Token::Pattern(Pattern {
                range: CharacterRange::new(10, 11),
                kind: PatternKind::Regexp,
                value: "a".to_string(),
                negated: false,
            })
        );
        assert_eq!(
            metas(&tokens),
            vec![(RegexpMetaKind::Quantifier, CharacterRange::new(11, 12), "+")]
        );
    }

    #[test]
    fn test_negated_pattern_offsets() {
        let negated = Pattern {
            range: CharacterRange::new(0, 4),
            kind: PatternKind::Regexp,
            value: "a.b".to_string(),
            negated: true,
        };
        let tokens = decorate_regexp(&negated).unwrap();
        assert_eq!(
            metas(&tokens),
            vec![(RegexpMetaKind::CharacterSet, CharacterRange::new(2, 3), ".")]
        );
        match &tokens[0] {
            Token::Pattern(fragment) => assert_eq!(fragment.value, "-a"),
            other => panic!("expected fragment, got {:?}", other),
        }
    }

    #[test]
    fn test_character_class_with_range() {
        let tokens = decorate_regexp(&pattern("[a-z]", 0)).unwrap();
        let kinds: Vec<(RegexpMetaKind, &str)> =
            metas(&tokens).iter().map(|(kind, _, value)| (*kind, *value)).collect();
        assert_eq!(
            kinds,
            vec![
                (RegexpMetaKind::CharacterClass, "["),
                (RegexpMetaKind::CharacterClass, "-"),
                (RegexpMetaKind::CharacterClass, "]")
            ]
        );
    }

    #[test]
    fn test_quantifier_hover_greedy_and_lazy() {
        let tokens = decorate_regexp(&pattern("a*b*?", 0)).unwrap();
        let hovers: Vec<&str> = tokens
            .iter()
            .filter_map(|token| match token {
                Token::Meta(meta) => meta.hover(),
                _ => None,
            })
            .collect();
        assert_eq!(hovers.len(), 2);
        assert!(hovers[0].contains("greedy"));
        assert!(hovers[1].contains("lazy"));
        assert_eq!(metas(&tokens)[1].2, "*?");
    }

    #[test]
    fn test_alternation_and_escapes() {
        let tokens = decorate_regexp(&pattern(r"a\.|b", 0)).unwrap();
        let kinds: Vec<RegexpMetaKind> = metas(&tokens).iter().map(|(kind, _, _)| *kind).collect();
        assert_eq!(
            kinds,
            vec![RegexpMetaKind::EscapedCharacter, RegexpMetaKind::Alternative]
        );
    }

    #[test]
    fn test_character_set_hovers() {
        assert!(character_set_hover(&CharacterSet::Digit { negated: false }).contains("digit"));
        assert!(
            character_set_hover(&CharacterSet::Space { negated: true }).starts_with("**Negated")
        );
    }
}
