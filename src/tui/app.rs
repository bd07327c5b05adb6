use crate::config::AppConfig;
use crate::decorate::decorate;
use crate::highlight::{Hover, ScopedToken, hover_at, project};
use crate::query::parser::{Node, ParseError, parse};
use crate::query::scanner::{ScanError, scan};
use crate::query::token::{CharacterRange, PatternKind, Sequence};

/// Result of running the pipeline on the current query
pub enum Outcome {
    Parsed(Vec<Node>),
    ParseFailed(ParseError),
    ScanFailed(ScanError),
}

/// Everything the panels show, recomputed after each edit
pub struct Analysis {
    pub outcome: Outcome,
    /// Decorated (or plain, when decoration is off) sequence; empty on scan failure
    pub sequence: Sequence,
    pub scoped: Vec<ScopedToken>,
}

impl Analysis {
    fn run(query: &str, config: &AppConfig) -> Self {
        let scanned = match scan(query, &config.scan_options()) {
            Ok(sequence) => sequence,
            Err(err) => {
                return Self {
                    outcome: Outcome::ScanFailed(err),
                    sequence: Sequence {
                        range: CharacterRange::new(0, 0),
                        members: Vec::new(),
                    },
                    scoped: Vec::new(),
                };
            }
        };

        let outcome = match parse(&scanned) {
            Ok(nodes) => Outcome::Parsed(nodes),
            Err(err) => Outcome::ParseFailed(err),
        };
        let sequence = if config.decorate {
            decorate(&scanned)
        } else {
            scanned
        };
        let scoped = project(&sequence);

        Self {
            outcome,
            sequence,
            scoped,
        }
    }
}

/// Application state
pub struct App {
    pub query: String,
    /// Byte offset of the cursor, always on a char boundary
    pub cursor: usize,
    pub config: AppConfig,
    pub analysis: Analysis,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let analysis = Analysis::run("", &config);
        Self {
            query: String::new(),
            cursor: 0,
            config,
            analysis,
        }
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.cursor = self.query.len();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.analysis = Analysis::run(&self.query, &self.config);
    }

    /// Hover for the character under the cursor
    pub fn hover(&self) -> Option<Hover> {
        hover_at(&self.analysis.sequence, self.cursor + 1)
    }

    /// Cursor position in characters, for placing the terminal cursor
    pub fn cursor_column(&self) -> usize {
        self.query[..self.cursor].chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        self.query.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        self.recompute();
    }

    pub fn backspace(&mut self) {
        if let Some(c) = self.query[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
            self.query.remove(self.cursor);
            self.recompute();
        }
    }

    pub fn move_left(&mut self) {
        if let Some(c) = self.query[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.query[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.query.len();
    }

    /// Delete the word before the cursor, along with whitespace after it
    pub fn delete_word(&mut self) {
        let before = &self.query[..self.cursor];
        let trimmed = before.trim_end();
        let start = trimmed
            .rfind(char::is_whitespace)
            .map_or(0, |i| i + trimmed[i..].chars().next().map_or(1, char::len_utf8));
        self.query.replace_range(start..self.cursor, "");
        self.cursor = start;
        self.recompute();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.cursor = 0;
        self.recompute();
    }

    /// literal -> regexp -> structural -> literal
    pub fn cycle_pattern_type(&mut self) {
        self.config.pattern_type = match self.config.pattern_type {
            PatternKind::Literal => PatternKind::Regexp,
            PatternKind::Regexp => PatternKind::Structural,
            PatternKind::Structural => PatternKind::Literal,
        };
        self.recompute();
    }

    pub fn toggle_comments(&mut self) {
        self.config.interpret_comments = !self.config.interpret_comments;
        self.recompute();
    }

    pub fn toggle_decorate(&mut self) {
        self.config.decorate = !self.config.decorate;
        self.recompute();
    }

    pub fn status_line(&self) -> String {
        format!(
            " pattern: {} | comments: {} | decorate: {} | Ctrl+T type, Ctrl+L comments, Ctrl+D decorate, Esc quit",
            self.config.pattern_type,
            on_off(self.config.interpret_comments),
            on_off(self.config.decorate),
        )
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}
