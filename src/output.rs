//! Terminal rendering for the CLI

use crate::highlight::{Hover, ScopedToken, scoped_spans};
use crate::query::parser::Node;
use crate::query::token::{Sequence, Token};
use std::io::{self, Write};
use termcolor::{Color, ColorSpec, WriteColor};

/// Color for a highlight scope
pub fn scope_color(scope: &str) -> ColorSpec {
    let mut spec = ColorSpec::new();
    match scope {
        "keyword" => {
            spec.set_fg(Some(Color::Blue)).set_bold(true);
        }
        "operator" => {
            spec.set_fg(Some(Color::Magenta)).set_bold(true);
        }
        "identifier" => {
            spec.set_fg(Some(Color::Green));
        }
        "paren" => {
            spec.set_fg(Some(Color::Yellow));
        }
        "comment" => {
            spec.set_dimmed(true).set_italic(true);
        }
        scope if scope.starts_with("metaRegexp") => {
            spec.set_fg(Some(Color::Cyan));
        }
        scope if scope.starts_with("metaStructural") => {
            spec.set_fg(Some(Color::Red)).set_bold(true);
        }
        scope if scope.starts_with("metaPath") => {
            spec.set_fg(Some(Color::Yellow)).set_bold(true);
        }
        _ => {}
    }
    spec
}

/// Print `input` colored by its projected scopes
pub fn print_highlighted<W: WriteColor>(
    out: &mut W,
    input: &str,
    tokens: &[ScopedToken],
) -> io::Result<()> {
    // Text before the first scope (none for a well-formed projection)
    let first = tokens.first().map_or(input.len(), |token| token.start.min(input.len()));
    write!(out, "{}", &input[..first])?;

    for (range, scope) in scoped_spans(tokens, input.len()) {
        out.set_color(&scope_color(scope))?;
        write!(out, "{}", range.slice(input))?;
        out.reset()?;
    }
    writeln!(out)
}

/// One row per token: range, type, text, and hover text when present
pub fn print_tokens<W: WriteColor>(out: &mut W, input: &str, sequence: &Sequence) -> io::Result<()> {
    for token in &sequence.members {
        let range = token.range();
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(out, "{:>4}..{:<4}", range.start, range.end)?;
        out.reset()?;

        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(out, " {:<15}", token.type_name())?;
        out.reset()?;

        write!(out, " {:?}", range.slice(input))?;
        if let Token::Meta(meta) = token
            && let Some(hover) = meta.hover()
        {
            out.set_color(ColorSpec::new().set_dimmed(true))?;
            write!(out, "  {}", hover)?;
            out.reset()?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// One S-expression per top-level node
pub fn print_nodes<W: Write>(out: &mut W, nodes: &[Node]) -> io::Result<()> {
    for node in nodes {
        writeln!(out, "{}", node)?;
    }
    Ok(())
}

/// `offset scope` pairs
pub fn print_scoped<W: Write>(out: &mut W, tokens: &[ScopedToken]) -> io::Result<()> {
    for token in tokens {
        writeln!(out, "{:>4} {}", token.start, token.scope)?;
    }
    Ok(())
}

pub fn print_hover<W: WriteColor>(out: &mut W, input: &str, hover: &Hover) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(out, "{}", hover.range.slice(input))?;
    out.reset()?;
    writeln!(out, " ({}..{})", hover.range.start, hover.range.end)?;
    writeln!(out, "{}", hover.contents)
}

/// Error message with a caret under byte offset `at` of `input`
pub fn print_error<W: WriteColor>(
    out: &mut W,
    input: &str,
    at: Option<usize>,
    message: &str,
) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(out, "error")?;
    out.reset()?;
    writeln!(out, ": {}", message)?;

    if let Some(at) = at {
        let column = input
            .char_indices()
            .take_while(|(i, _)| *i < at)
            .count();
        writeln!(out, "  {}", input)?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
        writeln!(out, "  {}^", " ".repeat(column))?;
        out.reset()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::project;
    use crate::query::scanner::{ScanOptions, scan};
    use crate::query::token::CharacterRange;
    use termcolor::NoColor;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut NoColor<Vec<u8>>) -> io::Result<()>,
    {
        let mut out = NoColor::new(Vec::new());
        f(&mut out).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_highlight_reproduces_input() {
        let input = "repo:foo (a or b)";
        let tokens = project(&scan(input, &ScanOptions::default()).unwrap());
        let text = render(|out| print_highlighted(out, input, &tokens));
        assert_eq!(text, format!("{}\n", input));
    }

    #[test]
    fn test_token_table() {
        let input = "lang:go x";
        let sequence = scan(input, &ScanOptions::default()).unwrap();
        let text = render(|out| print_tokens(out, input, &sequence));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("filter"));
        assert!(lines[0].contains("\"lang:go\""));
        assert!(lines[2].contains("pattern"));
    }

    #[test]
    fn test_hover_output() {
        let hover = Hover {
            contents: "Some text".to_string(),
            range: CharacterRange::new(0, 4),
        };
        let text = render(|out| print_hover(out, "repo:x", &hover));
        assert_eq!(text, "repo (0..4)\nSome text\n");
    }

    #[test]
    fn test_error_caret() {
        let text = render(|out| print_error(out, "é \"x", Some(3), "expected closing quote"));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "error: expected closing quote");
        assert_eq!(lines[2], "    ^");
    }

    #[test]
    fn test_scope_colors() {
        assert_eq!(scope_color("keyword").fg(), Some(&Color::Blue));
        assert_eq!(scope_color("metaRegexpQuantifier").fg(), Some(&Color::Cyan));
        assert!(scope_color("whitespace").is_none());
    }
}
