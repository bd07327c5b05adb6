pub mod parser;
pub mod scanner;
pub mod token;

pub use parser::{Node, OperatorKind, ParseError, parse, to_sexpr};
pub use scanner::{ScanError, ScanOptions, scan, scan_balanced_pattern};
pub use token::*;

use thiserror::Error;

/// Either stage of [`parse_search_query`] failing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Scan then parse
pub fn parse_search_query(input: &str, options: &ScanOptions) -> Result<Vec<Node>, QueryError> {
    let sequence = scan(input, options)?;
    Ok(parse(&sequence)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_query() {
        let nodes = parse_search_query("repo:foo a or b", &ScanOptions::default()).unwrap();
        assert_eq!(to_sexpr(&nodes), "(or repo:foo a b)");
    }

    #[test]
    fn test_scan_error_surfaces() {
        let err = parse_search_query("\"open", &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, QueryError::Scan(ScanError { at: 5, .. })));
    }

    #[test]
    fn test_parse_error_surfaces() {
        let err = parse_search_query("a)", &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, QueryError::Parse(_)));
        assert_eq!(err.to_string(), "parse error: no unbalanced parentheses");
    }
}
