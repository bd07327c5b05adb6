//! Filter definitions known to the query language.
//!
//! The scanner only recognizes `field:value` pairs whose field resolves here,
//! so `http://example.com` stays a pattern. Hover text comes from the same
//! table.

/// Static description of a filter field
#[derive(Debug)]
pub struct FilterDefinition {
    /// Canonical field name
    pub name: &'static str,
    /// Alternative spellings (`r` for `repo`, ...)
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    /// Description shown for `-field:value`, when the filter can be negated
    pub negated_description: Option<&'static str>,
}

impl FilterDefinition {
    fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    }
}

/// A field name resolved against the registry
#[derive(Debug, Clone, Copy)]
pub struct ResolvedFilter {
    pub definition: &'static FilterDefinition,
    /// Whether the field was written with a `-` prefix
    pub negated: bool,
}

impl ResolvedFilter {
    /// Negation-aware description
    pub fn description(&self) -> &'static str {
        match (self.negated, self.definition.negated_description) {
            (true, Some(negated)) => negated,
            _ => self.definition.description,
        }
    }
}

pub static FILTERS: &[FilterDefinition] = &[
    FilterDefinition {
        name: "repo",
        aliases: &["r"],
        description: "Include only results from repositories matching the given search pattern.",
        negated_description: Some(
            "Exclude results from repositories matching the given search pattern.",
        ),
    },
    FilterDefinition {
        name: "repohasfile",
        aliases: &[],
        description: "Include only results from repositories that contain a matching file.",
        negated_description: Some(
            "Exclude results from repositories that contain a matching file.",
        ),
    },
    FilterDefinition {
        name: "repohascommitafter",
        aliases: &[],
        description: "Filter out stale repositories that don't contain commits past the specified time frame.",
        negated_description: None,
    },
    FilterDefinition {
        name: "file",
        aliases: &["f"],
        description: "Include only results from files matching the given search pattern.",
        negated_description: Some("Exclude results from files matching the given search pattern."),
    },
    FilterDefinition {
        name: "lang",
        aliases: &["l", "language"],
        description: "Include only results from the given language.",
        negated_description: Some("Exclude results from the given language."),
    },
    FilterDefinition {
        name: "case",
        aliases: &[],
        description: "Treat the search pattern as case-sensitive.",
        negated_description: None,
    },
    FilterDefinition {
        name: "type",
        aliases: &[],
        description: "Limit results to the specified type (file, path, repo, commit, diff, symbol).",
        negated_description: None,
    },
    FilterDefinition {
        name: "patterntype",
        aliases: &[],
        description: "The pattern type (literal, regexp, structural) in use.",
        negated_description: None,
    },
    FilterDefinition {
        name: "content",
        aliases: &[],
        description: "Explicitly set the search pattern, for when it clashes with other query syntax.",
        negated_description: Some("Exclude results that match the given content pattern."),
    },
    FilterDefinition {
        name: "count",
        aliases: &[],
        description: "Number of results to fetch (integer).",
        negated_description: None,
    },
    FilterDefinition {
        name: "timeout",
        aliases: &[],
        description: "Duration before the search times out (e.g. 30s).",
        negated_description: None,
    },
    FilterDefinition {
        name: "fork",
        aliases: &[],
        description: "Include results from forked repositories (yes, no, only).",
        negated_description: None,
    },
    FilterDefinition {
        name: "archived",
        aliases: &[],
        description: "Include results from archived repositories (yes, no, only).",
        negated_description: None,
    },
    FilterDefinition {
        name: "visibility",
        aliases: &[],
        description: "Include results from repositories with the given visibility (any, private, public).",
        negated_description: None,
    },
    FilterDefinition {
        name: "repogroup",
        aliases: &["g"],
        description: "Include only results from repositories in the named group.",
        negated_description: None,
    },
    FilterDefinition {
        name: "rev",
        aliases: &["revision"],
        description: "Search a revision (branch, commit hash, or tag) instead of the default branch.",
        negated_description: None,
    },
    FilterDefinition {
        name: "message",
        aliases: &["msg", "m"],
        description: "Include only commits whose message matches the given pattern.",
        negated_description: Some("Exclude commits whose message matches the given pattern."),
    },
    FilterDefinition {
        name: "author",
        aliases: &[],
        description: "Include only commits authored by a matching user.",
        negated_description: Some("Exclude commits authored by a matching user."),
    },
    FilterDefinition {
        name: "committer",
        aliases: &["commiter"],
        description: "Include only commits committed by a matching user.",
        negated_description: Some("Exclude commits committed by a matching user."),
    },
    FilterDefinition {
        name: "before",
        aliases: &["until"],
        description: "Include only commits made before the given date.",
        negated_description: None,
    },
    FilterDefinition {
        name: "after",
        aliases: &["since"],
        description: "Include only commits made after the given date.",
        negated_description: None,
    },
    FilterDefinition {
        name: "index",
        aliases: &[],
        description: "Include results from indexed repositories (yes, no, only).",
        negated_description: None,
    },
    FilterDefinition {
        name: "stable",
        aliases: &[],
        description: "Force a stable result ordering.",
        negated_description: None,
    },
];

/// Fields whose values are paths or path-like regexps, split on `/` for
/// highlighting
pub const PATH_LIKE_FIELDS: &[&str] = &[
    "repo",
    "r",
    "file",
    "f",
    "repohasfile",
    "message",
    "msg",
    "m",
    "author",
    "commiter",
    "committer",
];

/// Look up a bare field name (no `-` prefix)
pub fn find_filter(name: &str) -> Option<&'static FilterDefinition> {
    FILTERS.iter().find(|definition| definition.matches(name))
}

/// Resolve a field as written, honoring a leading `-`
pub fn resolve_filter(field: &str) -> Option<ResolvedFilter> {
    let (name, negated) = match field.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (field, false),
    };
    find_filter(name).map(|definition| ResolvedFilter {
        definition,
        negated,
    })
}

/// Whether `name` (without `-`) is a registered filter field
pub fn is_filter_name(name: &str) -> bool {
    find_filter(name).is_some()
}

/// Whether the values of `field` should be split into path segments
pub fn is_path_like(field: &str) -> bool {
    let name = field.strip_prefix('-').unwrap_or(field);
    PATH_LIKE_FIELDS
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_alias() {
        let resolved = resolve_filter("r").unwrap();
        assert_eq!(resolved.definition.name, "repo");
        assert!(!resolved.negated);
    }

    #[test]
    fn test_resolve_case_insensitive() {
        assert_eq!(resolve_filter("REPO").unwrap().definition.name, "repo");
        assert_eq!(resolve_filter("Msg").unwrap().definition.name, "message");
    }

    #[test]
    fn test_negated_description() {
        let plain = resolve_filter("repo").unwrap();
        let negated = resolve_filter("-repo").unwrap();
        assert!(negated.negated);
        assert_ne!(plain.description(), negated.description());
        assert!(negated.description().starts_with("Exclude"));
    }

    #[test]
    fn test_negated_without_variant_falls_back() {
        let resolved = resolve_filter("-count").unwrap();
        assert!(resolved.negated);
        assert_eq!(resolved.description(), "Number of results to fetch (integer).");
    }

    #[test]
    fn test_unknown_filter() {
        assert!(resolve_filter("general").is_none());
        assert!(!is_filter_name("http"));
    }

    #[test]
    fn test_path_like_fields() {
        assert!(is_path_like("repo"));
        assert!(is_path_like("-file"));
        assert!(is_path_like("commiter"));
        assert!(!is_path_like("lang"));
    }

    #[test]
    fn test_names_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for definition in FILTERS {
            assert!(seen.insert(definition.name), "duplicate {}", definition.name);
            for alias in definition.aliases {
                assert!(seen.insert(*alias), "duplicate alias {}", alias);
            }
        }
    }
}
