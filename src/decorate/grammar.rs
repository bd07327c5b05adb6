//! Narrow seam over `regex-syntax`.
//!
//! [`walk`] parses a regular expression and reports the constructs the
//! decorator cares about through [`RegexpVisitor`]. Every span handed to the
//! visitor is a byte range relative to the start of the pattern text.

use crate::query::token::CharacterRange;
use regex_syntax::ast::{
    self, Ast, ClassPerlKind, ClassSetItem, ClassUnicodeKind, GroupKind, LiteralKind,
    RepetitionKind, RepetitionRange, visit,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("invalid regular expression: {0}")]
    Syntax(#[from] ast::Error),
}

/// A class of characters matched by a single construct
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharacterSet {
    /// `.`
    Any,
    Digit { negated: bool },
    Space { negated: bool },
    Word { negated: bool },
    /// `\pL`, `\p{Greek}`, ...
    Unicode { name: String, negated: bool },
    /// `[:alpha:]` inside a bracketed class
    Ascii { name: String, negated: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assertion {
    StartLine,
    EndLine,
    StartText,
    EndText,
    WordBoundary,
    NotWordBoundary,
    /// Word-start/word-end and friends
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    ZeroOrOne,
    ZeroOrMore,
    OneOrMore,
    Exactly(u32),
    AtLeast(u32),
    Bounded(u32, u32),
}

/// Callbacks for the constructs reported by [`walk`]. All default to no-ops.
pub trait RegexpVisitor {
    fn group(&mut self, _open: CharacterRange, _close: CharacterRange, _capturing: bool) {}

    fn character_class(&mut self, _open: CharacterRange, _close: CharacterRange, _negated: bool) {}

    /// The `-` of `a-z` inside a bracketed class
    fn class_range(&mut self, _dash: CharacterRange) {}

    fn character_set(&mut self, _span: CharacterRange, _set: CharacterSet) {}

    fn escaped_character(&mut self, _span: CharacterRange, _c: char) {}

    /// `span` covers the operator only (`+`, `{2,3}?`), not the repeated expression
    fn quantifier(&mut self, _span: CharacterRange, _quantifier: Quantifier, _greedy: bool) {}

    fn assertion(&mut self, _span: CharacterRange, _assertion: Assertion) {}

    /// One `|` separating two branches
    fn alternation(&mut self, _bar: CharacterRange) {}
}

/// Parse `pattern` and report its constructs to `visitor` in traversal order
pub fn walk<V: RegexpVisitor + ?Sized>(pattern: &str, visitor: &mut V) -> Result<(), GrammarError> {
    let ast = ast::parse::Parser::new().parse(pattern)?;
    let Ok(()) = visit(&ast, Adapter { pattern, visitor });
    Ok(())
}

fn range(span: &ast::Span) -> CharacterRange {
    CharacterRange::new(span.start.offset, span.end.offset)
}

fn is_escaped(kind: &LiteralKind) -> bool {
    !matches!(kind, LiteralKind::Verbatim)
}

fn perl_set(kind: &ClassPerlKind, negated: bool) -> CharacterSet {
    match kind {
        ClassPerlKind::Digit => CharacterSet::Digit { negated },
        ClassPerlKind::Space => CharacterSet::Space { negated },
        ClassPerlKind::Word => CharacterSet::Word { negated },
    }
}

fn unicode_set(class: &ast::ClassUnicode) -> CharacterSet {
    let name = match &class.kind {
        ClassUnicodeKind::OneLetter(letter) => letter.to_string(),
        ClassUnicodeKind::Named(name) => name.clone(),
        ClassUnicodeKind::NamedValue { name, value, .. } => format!("{}={}", name, value),
    };
    CharacterSet::Unicode {
        name,
        negated: class.negated,
    }
}

struct Adapter<'p, 'v, V: ?Sized> {
    pattern: &'p str,
    visitor: &'v mut V,
}

impl<V: RegexpVisitor + ?Sized> Adapter<'_, '_, V> {
    fn bracketed(&mut self, class: &ast::ClassBracketed) {
        let span = range(&class.span);
        let open_len = if class.negated { 2 } else { 1 };
        self.visitor.character_class(
            CharacterRange::new(span.start, span.start + open_len),
            CharacterRange::new(span.end - 1, span.end),
            class.negated,
        );
    }

    /// `|` bars between consecutive branches, skipping escaped ones
    fn bars(&mut self, alternation: &ast::Alternation) {
        for pair in alternation.asts.windows(2) {
            let from = pair[0].span().end.offset;
            let to = pair[1].span().start.offset;
            let mut escaped = false;
            for (i, c) in self.pattern[from..to].char_indices() {
                match c {
                    '\\' if !escaped => escaped = true,
                    '|' if !escaped => {
                        self.visitor
                            .alternation(CharacterRange::new(from + i, from + i + 1));
                    }
                    _ => escaped = false,
                }
            }
        }
    }
}

impl<V: RegexpVisitor + ?Sized> ast::Visitor for Adapter<'_, '_, V> {
    type Output = ();
    type Err = std::convert::Infallible;

    fn finish(self) -> Result<(), Self::Err> {
        Ok(())
    }

    fn visit_pre(&mut self, ast: &Ast) -> Result<(), Self::Err> {
        match ast {
            Ast::Group(group) => {
                let span = range(&group.span);
                let capturing = !matches!(group.kind, GroupKind::NonCapturing(_));
                self.visitor.group(
                    CharacterRange::new(span.start, span.start + 1),
                    CharacterRange::new(span.end - 1, span.end),
                    capturing,
                );
            }
            Ast::ClassBracketed(class) => self.bracketed(class),
            Ast::ClassPerl(class) => self
                .visitor
                .character_set(range(&class.span), perl_set(&class.kind, class.negated)),
            Ast::ClassUnicode(class) => self
                .visitor
                .character_set(range(&class.span), unicode_set(class)),
            Ast::Dot(span) => self.visitor.character_set(range(span), CharacterSet::Any),
            Ast::Literal(literal) if is_escaped(&literal.kind) => {
                self.visitor
                    .escaped_character(range(&literal.span), literal.c);
            }
            Ast::Assertion(assertion) => {
                let kind = match assertion.kind {
                    ast::AssertionKind::StartLine => Assertion::StartLine,
                    ast::AssertionKind::EndLine => Assertion::EndLine,
                    ast::AssertionKind::StartText => Assertion::StartText,
                    ast::AssertionKind::EndText => Assertion::EndText,
                    ast::AssertionKind::WordBoundary => Assertion::WordBoundary,
                    ast::AssertionKind::NotWordBoundary => Assertion::NotWordBoundary,
                    _ => Assertion::Other,
                };
                self.visitor.assertion(range(&assertion.span), kind);
            }
            Ast::Repetition(repetition) => {
                let quantifier = match &repetition.op.kind {
                    RepetitionKind::ZeroOrOne => Quantifier::ZeroOrOne,
                    RepetitionKind::ZeroOrMore => Quantifier::ZeroOrMore,
                    RepetitionKind::OneOrMore => Quantifier::OneOrMore,
                    RepetitionKind::Range(RepetitionRange::Exactly(n)) => Quantifier::Exactly(*n),
                    RepetitionKind::Range(RepetitionRange::AtLeast(n)) => Quantifier::AtLeast(*n),
                    RepetitionKind::Range(RepetitionRange::Bounded(min, max)) => {
                        Quantifier::Bounded(*min, *max)
                    }
                };
                self.visitor
                    .quantifier(range(&repetition.op.span), quantifier, repetition.greedy);
            }
            Ast::Alternation(alternation) => self.bars(alternation),
            _ => {}
        }
        Ok(())
    }

    fn visit_class_set_item_pre(&mut self, item: &ClassSetItem) -> Result<(), Self::Err> {
        match item {
            ClassSetItem::Range(class_range) => {
                let dash = class_range.start.span.end.offset;
                self.visitor
                    .class_range(CharacterRange::new(dash, dash + 1));
            }
            ClassSetItem::Literal(literal) if is_escaped(&literal.kind) => {
                self.visitor
                    .escaped_character(range(&literal.span), literal.c);
            }
            ClassSetItem::Perl(class) => self
                .visitor
                .character_set(range(&class.span), perl_set(&class.kind, class.negated)),
            ClassSetItem::Unicode(class) => self
                .visitor
                .character_set(range(&class.span), unicode_set(class)),
            ClassSetItem::Ascii(class) => self.visitor.character_set(
                range(&class.span),
                CharacterSet::Ascii {
                    name: format!("{:?}", class.kind).to_lowercase(),
                    negated: class.negated,
                },
            ),
            ClassSetItem::Bracketed(class) => self.bracketed(class),
            _ => {}
        }
        Ok(())
    }
}
