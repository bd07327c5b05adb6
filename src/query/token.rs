//! Lexical tokens produced by the scanner and the decorator.
//!
//! All ranges are half-open byte offsets into the original query string.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Half-open `[start, end)` byte range into the query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CharacterRange {
    pub start: usize,
    pub end: usize,
}

impl CharacterRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Shift both ends by `offset` (used when translating sub-pattern spans)
    pub fn shift(&self, offset: usize) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }

    /// Slice the text covered by this range out of `input`
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start..self.end]
    }
}

/// How a pattern value is interpreted by the search backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    #[default]
    Literal,
    Regexp,
    Structural,
}

impl PatternKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PatternKind::Literal => "literal",
            PatternKind::Regexp => "regexp",
            PatternKind::Structural => "structural",
        }
    }
}

impl FromStr for PatternKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "literal" => Ok(PatternKind::Literal),
            "regexp" | "regex" => Ok(PatternKind::Regexp),
            "structural" => Ok(PatternKind::Structural),
            other => Err(format!("unknown pattern type: {}", other)),
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordKind {
    And,
    Or,
    Not,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Literal {
    pub range: CharacterRange,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quoted {
    pub range: CharacterRange,
    /// Text between the quotes, escapes left as written
    pub quoted_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub range: CharacterRange,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Keyword {
    pub range: CharacterRange,
    pub kind: KeywordKind,
    /// Keyword as written (case preserved)
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pattern {
    pub range: CharacterRange,
    pub kind: PatternKind,
    /// Pattern text without the negation prefix
    pub value: String,
    pub negated: bool,
}

impl Pattern {
    /// Absolute offset where `value` begins (after a leading `-`, if any)
    pub fn value_start(&self) -> usize {
        self.range.end - self.value.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FilterValue {
    Literal(Literal),
    Quoted(Quoted),
}

impl FilterValue {
    pub fn range(&self) -> CharacterRange {
        match self {
            FilterValue::Literal(literal) => literal.range,
            FilterValue::Quoted(quoted) => quoted.range,
        }
    }

    /// Value handed to the parser: literal text or the quoted inner text
    pub fn value(&self) -> &str {
        match self {
            FilterValue::Literal(literal) => &literal.value,
            FilterValue::Quoted(quoted) => &quoted.quoted_value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filter {
    pub range: CharacterRange,
    /// Field name as written, including a leading `-` when negated
    pub filter_type: Literal,
    pub filter_value: Option<FilterValue>,
    pub negated: bool,
}

impl Filter {
    /// Field name without the negation prefix
    pub fn field(&self) -> &str {
        self.filter_type
            .value
            .strip_prefix('-')
            .unwrap_or(&self.filter_type.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PathMetaKind {
    Separator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegexpMetaKind {
    Delimited,
    CharacterSet,
    CharacterClass,
    Quantifier,
    Assertion,
    Alternative,
    EscapedCharacter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StructuralMetaKind {
    Hole,
}

impl PathMetaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PathMetaKind::Separator => "Separator",
        }
    }
}

impl RegexpMetaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RegexpMetaKind::Delimited => "Delimited",
            RegexpMetaKind::CharacterSet => "CharacterSet",
            RegexpMetaKind::CharacterClass => "CharacterClass",
            RegexpMetaKind::Quantifier => "Quantifier",
            RegexpMetaKind::Assertion => "Assertion",
            RegexpMetaKind::Alternative => "Alternative",
            RegexpMetaKind::EscapedCharacter => "EscapedCharacter",
        }
    }
}

impl StructuralMetaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StructuralMetaKind::Hole => "Hole",
        }
    }
}

/// Decorative sub-token inside a pattern or filter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "meta", rename_all = "camelCase")]
pub enum MetaToken {
    Path {
        range: CharacterRange,
        kind: PathMetaKind,
        value: String,
    },
    Regexp {
        range: CharacterRange,
        kind: RegexpMetaKind,
        value: String,
        hover: String,
    },
    Structural {
        range: CharacterRange,
        kind: StructuralMetaKind,
        value: String,
        hover: String,
    },
}

impl MetaToken {
    pub fn range(&self) -> CharacterRange {
        match self {
            MetaToken::Path { range, .. }
            | MetaToken::Regexp { range, .. }
            | MetaToken::Structural { range, .. } => *range,
        }
    }

    pub fn hover(&self) -> Option<&str> {
        match self {
            MetaToken::Path { .. } => None,
            MetaToken::Regexp { hover, .. } | MetaToken::Structural { hover, .. } => Some(hover),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Token {
    Whitespace { range: CharacterRange },
    Comment(Comment),
    OpeningParen { range: CharacterRange },
    ClosingParen { range: CharacterRange },
    Keyword(Keyword),
    Literal(Literal),
    Quoted(Quoted),
    Pattern(Pattern),
    Filter(Filter),
    Meta(MetaToken),
}

impl Token {
    pub fn range(&self) -> CharacterRange {
        match self {
            Token::Whitespace { range }
            | Token::OpeningParen { range }
            | Token::ClosingParen { range } => *range,
            Token::Comment(comment) => comment.range,
            Token::Keyword(keyword) => keyword.range,
            Token::Literal(literal) => literal.range,
            Token::Quoted(quoted) => quoted.range,
            Token::Pattern(pattern) => pattern.range,
            Token::Filter(filter) => filter.range,
            Token::Meta(meta) => meta.range(),
        }
    }

    /// Short variant name, used by the CLI token table
    pub fn type_name(&self) -> &'static str {
        match self {
            Token::Whitespace { .. } => "whitespace",
            Token::Comment(_) => "comment",
            Token::OpeningParen { .. } => "openingParen",
            Token::ClosingParen { .. } => "closingParen",
            Token::Keyword(_) => "keyword",
            Token::Literal(_) => "literal",
            Token::Quoted(_) => "quoted",
            Token::Pattern(_) => "pattern",
            Token::Filter(_) => "filter",
            Token::Meta(MetaToken::Path { .. }) => "pathMeta",
            Token::Meta(MetaToken::Regexp { .. }) => "regexpMeta",
            Token::Meta(MetaToken::Structural { .. }) => "structuralMeta",
        }
    }
}

/// Ordered tokens covering a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sequence {
    pub range: CharacterRange,
    pub members: Vec<Token>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_shift_and_slice() {
        let range = CharacterRange::new(1, 3).shift(4);
        assert_eq!(range, CharacterRange::new(5, 7));
        assert_eq!(range.slice("repo:foo bar"), "fo");
        assert_eq!(range.len(), 2);
        assert!(!range.is_empty());
    }

    #[test]
    fn test_pattern_kind_from_str() {
        assert_eq!("regexp".parse::<PatternKind>(), Ok(PatternKind::Regexp));
        assert_eq!("Regex".parse::<PatternKind>(), Ok(PatternKind::Regexp));
        assert_eq!("STRUCTURAL".parse::<PatternKind>(), Ok(PatternKind::Structural));
        assert!("fuzzy".parse::<PatternKind>().is_err());
    }

    #[test]
    fn test_pattern_value_start() {
        let pattern = Pattern {
            range: CharacterRange::new(4, 8),
            kind: PatternKind::Literal,
            value: "foo".to_string(),
            negated: true,
        };
        assert_eq!(pattern.value_start(), 5);
    }

    #[test]
    fn test_filter_field_strips_negation() {
        let filter = Filter {
            range: CharacterRange::new(0, 9),
            filter_type: Literal {
                range: CharacterRange::new(0, 5),
                value: "-repo".to_string(),
            },
            filter_value: None,
            negated: true,
        };
        assert_eq!(filter.field(), "repo");
    }

    #[test]
    fn test_token_json_shape() {
        let token = Token::Whitespace {
            range: CharacterRange::new(0, 1),
        };
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["type"], "whitespace");
        assert_eq!(json["range"]["end"], 1);
    }
}
