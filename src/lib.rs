//! # querylens - search query front end
//!
//! Scans, parses and decorates search queries such as
//! `repo:^github\.com/gorilla/mux$ -file:_test\.go (Router or Route)`,
//! keeping every span aligned to byte offsets of the original string so the
//! results can drive syntax highlighting and hover tooltips.
//!
//! ## Architecture
//!
//! - [`query`] - Tokens, the scanner (with balanced-paren disambiguation)
//!   and the recursive-descent parser
//! - [`decorate`] - Re-reads regexp and structural patterns into meta tokens
//! - [`highlight`] - Projects tokens onto highlight scopes and resolves hovers
//! - [`filters`] - Registry of known `field:` filters
//! - [`config`] - Layered configuration (env > config file > defaults)
//! - [`output`] - Terminal rendering for the CLI
//! - `tui` - Interactive playground (feature `interactive`)
//!
//! ## Quick Start
//!
//! ```
//! use querylens::decorate::decorate;
//! use querylens::highlight::{hover_at, project};
//! use querylens::query::{parse, scan, PatternKind, ScanOptions};
//!
//! let options = ScanOptions {
//!     pattern_kind: PatternKind::Regexp,
//!     ..ScanOptions::default()
//! };
//! let sequence = scan("repo:foo (a|b)+ or bar", &options).unwrap();
//!
//! let nodes = parse(&sequence).unwrap();
//! assert_eq!(nodes[0].to_string(), "(or repo:foo (a|b)+ bar)");
//!
//! let decorated = decorate(&sequence);
//! let scopes = project(&decorated);
//! assert_eq!(scopes[0].scope, "keyword");
//! assert!(hover_at(&decorated, 2).is_some());
//! ```

pub mod config;
pub mod decorate;
pub mod filters;
pub mod highlight;
pub mod output;
pub mod query;
#[cfg(feature = "interactive")]
pub mod tui;
