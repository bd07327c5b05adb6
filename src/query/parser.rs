//! Query parser
//!
//! Grammar (whitespace and comments are dropped before parsing):
//!
//! ```text
//! query   = or
//! or      = and ("or" and)*
//! and     = leaves ("and" leaves)*
//! leaves  = (leaf | "(" or ")" | "not" leaf)*
//! leaf    = filter | pattern | quoted | literal
//! ```
//!
//! Operators are n-ary: `a or b or c` yields a single `or` node with three
//! operands, and a parenthesized group contributes its nodes to the enclosing
//! operand list instead of nesting.

use crate::query::scanner::MAX_NESTING;
use crate::query::token::{KeywordKind, PatternKind, Sequence, Token};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Message for NOT applied to something other than a single leaf
pub const NOT_EXPRESSION: &str =
    "NOT may only come before patterns or parameters like repo:foo, expressions are not supported";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperatorKind {
    And,
    Or,
}

impl OperatorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OperatorKind::And => "and",
            OperatorKind::Or => "or",
        }
    }
}

/// Parsed query node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Pattern {
        kind: PatternKind,
        value: String,
        quoted: bool,
        negated: bool,
    },
    Parameter {
        field: String,
        value: String,
        negated: bool,
    },
    Operator {
        kind: OperatorKind,
        operands: Vec<Node>,
    },
}

impl Node {
    fn literal(value: impl Into<String>) -> Self {
        Node::Pattern {
            kind: PatternKind::Literal,
            value: value.into(),
            quoted: false,
            negated: false,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Pattern {
                value,
                quoted,
                negated,
                ..
            } => {
                if *negated {
                    f.write_str("(not ")?;
                }
                if *quoted {
                    write!(f, "\"{}\"", value)?;
                } else {
                    f.write_str(value)?;
                }
                if *negated {
                    f.write_str(")")?;
                }
                Ok(())
            }
            Node::Parameter {
                field,
                value,
                negated,
            } => {
                if *negated {
                    f.write_str("-")?;
                }
                write!(f, "{}:{}", field, value)
            }
            Node::Operator { kind, operands } => {
                write!(f, "({}", kind.as_str())?;
                for operand in operands {
                    write!(f, " {}", operand)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Render a node list as space-separated S-expressions
pub fn to_sexpr(nodes: &[Node]) -> String {
    nodes
        .iter()
        .map(Node::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn expected(what: &str) -> Self {
        Self::new(format!("expected {}", what))
    }
}

/// Parse a scanned sequence into a list of nodes.
///
/// An empty (or all-whitespace) sequence parses to an empty list.
pub fn parse(sequence: &Sequence) -> Result<Vec<Node>, ParseError> {
    let tokens = sequence
        .members
        .iter()
        .filter(|token| !matches!(token, Token::Whitespace { .. } | Token::Comment(_)))
        .collect();

    let mut parser = QueryParser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let nodes = parser.parse_or()?;

    if parser.peek().is_some() {
        return Err(ParseError::expected("end of query"));
    }
    Ok(nodes)
}

struct QueryParser<'a> {
    tokens: Vec<&'a Token>,
    pos: usize,
    /// Open group count
    depth: usize,
}

impl<'a> QueryParser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn eat_keyword(&mut self, kind: KeywordKind) -> bool {
        match self.peek() {
            Some(Token::Keyword(keyword)) if keyword.kind == kind => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    fn parse_or(&mut self) -> Result<Vec<Node>, ParseError> {
        self.parse_operator(KeywordKind::Or, OperatorKind::Or, Self::parse_and)
    }

    fn parse_and(&mut self) -> Result<Vec<Node>, ParseError> {
        self.parse_operator(KeywordKind::And, OperatorKind::And, Self::parse_leaves)
    }

    /// `operand (keyword operand)*`, flattening every operand's nodes into
    /// one operator. Without the keyword the operand passes through as is.
    fn parse_operator(
        &mut self,
        keyword: KeywordKind,
        kind: OperatorKind,
        operand: fn(&mut Self) -> Result<Vec<Node>, ParseError>,
    ) -> Result<Vec<Node>, ParseError> {
        let mut operands = operand(self)?;
        let mut explicit = false;

        while self.eat_keyword(keyword) {
            explicit = true;
            operands.extend(operand(self)?);
        }

        if explicit {
            Ok(vec![Node::Operator { kind, operands }])
        } else {
            Ok(operands)
        }
    }

    fn parse_leaves(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::new();

        while let Some(token) = self.peek() {
            match token {
                Token::Keyword(keyword) if keyword.kind != KeywordKind::Not => break,
                Token::Keyword(keyword) => {
                    self.advance();
                    nodes.push(self.parse_not(&keyword.value)?);
                }
                Token::ClosingParen { .. } => {
                    if self.depth == 0 {
                        return Err(ParseError::new("no unbalanced parentheses"));
                    }
                    break;
                }
                Token::OpeningParen { .. } => {
                    self.advance();
                    nodes.extend(self.parse_group()?);
                }
                _ => {
                    nodes.push(leaf(token)?);
                    self.advance();
                }
            }
        }

        Ok(nodes)
    }

    /// After an opening paren
    fn parse_group(&mut self) -> Result<Vec<Node>, ParseError> {
        if matches!(self.peek(), Some(Token::ClosingParen { .. })) {
            self.advance();
            return Ok(vec![Node::literal("()")]);
        }
        if self.depth >= MAX_NESTING {
            return Err(ParseError::expected("fewer nested groups"));
        }

        self.depth += 1;
        let group = self.parse_or()?;
        self.depth -= 1;

        match self.peek() {
            Some(Token::ClosingParen { .. }) => {
                self.advance();
                Ok(group)
            }
            _ => Err(ParseError::expected("closing parenthesis")),
        }
    }

    /// After a NOT keyword written as `written`
    fn parse_not(&mut self, written: &str) -> Result<Node, ParseError> {
        match self.peek() {
            // Trailing NOT is searched for literally
            None => Ok(Node::literal(written)),
            Some(
                token @ (Token::Filter(_) | Token::Pattern(_) | Token::Quoted(_) | Token::Literal(_)),
            ) => {
                let node = leaf(token)?;
                self.advance();
                negate(node)
            }
            Some(_) => Err(ParseError::new(NOT_EXPRESSION)),
        }
    }
}

fn leaf(token: &Token) -> Result<Node, ParseError> {
    match token {
        Token::Pattern(pattern) => Ok(Node::Pattern {
            kind: pattern.kind,
            value: pattern.value.clone(),
            quoted: false,
            negated: pattern.negated,
        }),
        Token::Quoted(quoted) => Ok(Node::Pattern {
            kind: PatternKind::Literal,
            value: quoted.quoted_value.clone(),
            quoted: true,
            negated: false,
        }),
        Token::Literal(literal) => Ok(Node::literal(literal.value.clone())),
        Token::Filter(filter) => Ok(Node::Parameter {
            field: filter.field().to_string(),
            value: filter
                .filter_value
                .as_ref()
                .map(|value| value.value().to_string())
                .unwrap_or_default(),
            negated: filter.negated,
        }),
        other => Err(ParseError::expected(&format!(
            "a pattern or parameter, found {}",
            other.type_name()
        ))),
    }
}

fn negate(node: Node) -> Result<Node, ParseError> {
    match node {
        Node::Parameter {
            field,
            value,
            negated: true,
        } => Err(ParseError::new(format!(
            "no double negation: NOT before an already negated parameter -{}:{}",
            field, value
        ))),
        Node::Pattern {
            value,
            negated: true,
            ..
        } => Err(ParseError::new(format!(
            "no double negation: NOT before an already negated pattern -{}",
            value
        ))),
        Node::Parameter { field, value, .. } => Ok(Node::Parameter {
            field,
            value,
            negated: true,
        }),
        Node::Pattern {
            kind,
            value,
            quoted,
            ..
        } => Ok(Node::Pattern {
            kind,
            value,
            quoted,
            negated: true,
        }),
        Node::Operator { .. } => Err(ParseError::new(NOT_EXPRESSION)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::scanner::{ScanOptions, scan};

    fn parse_str(input: &str) -> Result<Vec<Node>, ParseError> {
        let sequence = scan(input, &ScanOptions::default()).unwrap();
        parse(&sequence)
    }

    fn sexpr(input: &str) -> String {
        to_sexpr(&parse_str(input).unwrap())
    }

    #[test]
    fn test_empty_query() {
        assert!(parse_str("").unwrap().is_empty());
        assert!(parse_str("   ").unwrap().is_empty());
    }

    #[test]
    fn test_implicit_concatenation() {
        assert_eq!(sexpr("a b c"), "a b c");
    }

    #[test]
    fn test_or_is_flat() {
        assert_eq!(sexpr("a or b or c"), "(or a b c)");
    }

    #[test]
    fn test_and_binds_tighter() {
        assert_eq!(sexpr("a and b or c"), "(or (and a b) c)");
        assert_eq!(sexpr("a or b and c"), "(or a (and b c))");
        assert_eq!(sexpr("a and b or c and d"), "(or (and a b) (and c d))");
    }

    #[test]
    fn test_concatenation_inside_operator() {
        assert_eq!(sexpr("a b or c"), "(or a b c)");
    }

    #[test]
    fn test_groups_flatten_into_operands() {
        assert_eq!(sexpr("(a and b) and c"), "(and (and a b) c)");
        assert_eq!(sexpr("(a or b)"), "(or a b)");
        assert_eq!(sexpr("repo:x (a or b)"), "repo:x (or a b)");
    }

    #[test]
    fn test_parenthesized_pattern_is_a_leaf() {
        assert_eq!(sexpr("(hello there)"), "(hello there)");
        assert_eq!(sexpr("()"), "()");
    }

    #[test]
    fn test_empty_group_inside_operator() {
        assert_eq!(sexpr("a or ()"), "(or a ())");
    }

    #[test]
    fn test_parameters() {
        let nodes = parse_str("-repo:foo lang:go").unwrap();
        assert_eq!(
            nodes[0],
            Node::Parameter {
                field: "repo".to_string(),
                value: "foo".to_string(),
                negated: true,
            }
        );
        assert_eq!(sexpr("-repo:foo lang:go"), "-repo:foo lang:go");
    }

    #[test]
    fn test_quoted_pattern() {
        let nodes = parse_str(r#""hello world""#).unwrap();
        assert_eq!(
            nodes[0],
            Node::Pattern {
                kind: PatternKind::Literal,
                value: "hello world".to_string(),
                quoted: true,
                negated: false,
            }
        );
    }

    #[test]
    fn test_not_negates_leaf() {
        assert_eq!(sexpr("not foo"), "(not foo)");
        assert_eq!(sexpr("NOT repo:foo"), "-repo:foo");
        assert_eq!(sexpr("a and not b"), "(and a (not b))");
    }

    #[test]
    fn test_trailing_not_is_literal() {
        assert_eq!(sexpr("foo NOT"), "foo NOT");
    }

    #[test]
    fn test_not_before_group_fails() {
        let err = parse_str("not (a or b)").unwrap_err();
        assert_eq!(err.message, NOT_EXPRESSION);
    }

    #[test]
    fn test_not_before_operator_fails() {
        let err = parse_str("a not or b").unwrap_err();
        assert_eq!(err.message, NOT_EXPRESSION);
    }

    #[test]
    fn test_double_negation() {
        let err = parse_str("NOT -repo:foo").unwrap_err();
        assert_eq!(
            err.message,
            "no double negation: NOT before an already negated parameter -repo:foo"
        );

        let err = parse_str("not -foo").unwrap_err();
        assert!(err.message.starts_with("no double negation"));
    }

    #[test]
    fn test_missing_closing_paren() {
        let err = parse_str("(a or b").unwrap_err();
        assert_eq!(err.message, "expected closing parenthesis");
    }

    #[test]
    fn test_stray_closing_paren() {
        let err = parse_str("a or b)").unwrap_err();
        assert_eq!(err.message, "no unbalanced parentheses");
    }

    #[test]
    fn test_deep_nesting_is_an_error() {
        let nested = |n: usize| format!("{}a or b{}", "(".repeat(n), ")".repeat(n));

        assert_eq!(sexpr(&nested(200)), "(or a b)");

        let err = parse_str(&nested(1000)).unwrap_err();
        assert_eq!(err.message, "expected fewer nested groups");
    }

    #[test]
    fn test_operator_with_empty_side() {
        assert_eq!(sexpr("or a"), "(or a)");
        assert_eq!(sexpr("a and"), "(and a)");
    }

    #[test]
    fn test_comments_are_ignored() {
        let options = ScanOptions {
            interpret_comments: true,
            ..ScanOptions::default()
        };
        let sequence = scan("// leading\nfoo // trailing\nbar", &options).unwrap();
        let nodes = parse(&sequence).unwrap();
        assert_eq!(to_sexpr(&nodes), "foo bar");
    }

    #[test]
    fn test_operator_json_shape() {
        let nodes = parse_str("a or b").unwrap();
        let json = serde_json::to_value(&nodes[0]).unwrap();
        assert_eq!(json["type"], "operator");
        assert_eq!(json["kind"], "OR");
        assert_eq!(json["operands"].as_array().unwrap().len(), 2);
    }
}
