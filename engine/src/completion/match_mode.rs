// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// How a typed query is matched against keyword / global / attribute candidates. The
/// predicate is deliberately separate from any strategy's applicability logic so the
/// mode can be swapped without touching the strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display,
         strum_macros::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum MatchMode {
    Disabled,
    #[default]
    Prefix,
    Substring,
    Fuzzy,
}

impl MatchMode {
    /// Does `candidate` match `query` under this mode? An empty query matches
    /// everything (except under [`MatchMode::Disabled`]).
    #[must_use]
    pub fn matches(&self, query: &str, candidate: &str) -> bool {
        match self {
            MatchMode::Disabled => false,
            MatchMode::Prefix => candidate.starts_with(query),
            MatchMode::Substring => candidate.contains(query),
            MatchMode::Fuzzy => is_subsequence(query, candidate),
        }
    }
}

/// Fuzzy matching: the query's characters must appear in order anywhere in the
/// candidate (`"lod" ~ "os.path.aLOaDko"`), case sensitive.
fn is_subsequence(query: &str, candidate: &str) -> bool {
    let mut candidate_chars = candidate.chars();
    query
        .chars()
        .all(|wanted| candidate_chars.any(|have| have == wanted))
}

/// The underscore-visibility filter applied to attribute / global candidates: private
/// and dunder names stay hidden until the user signals intent by typing the leading
/// underscore(s) themselves.
///
/// - query starts with `__` -> show everything
/// - query starts with `_` -> hide only dunder names
/// - otherwise -> hide every name starting with `_`
#[must_use]
pub fn passes_underscore_filter(query: &str, candidate: &str) -> bool {
    if query.starts_with("__") {
        true
    } else if query.starts_with('_') {
        !candidate.starts_with("__")
    } else {
        !candidate.starts_with('_')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_and_substring() {
        assert!(MatchMode::Prefix.matches("fo", "foo"));
        assert!(!MatchMode::Prefix.matches("oo", "foo"));
        assert!(MatchMode::Substring.matches("oo", "foo"));
        assert!(!MatchMode::Disabled.matches("", "foo"));
    }

    #[test]
    fn test_fuzzy_is_an_ordered_subsequence() {
        assert!(MatchMode::Fuzzy.matches("ooh", "out_of_hand"));
        assert!(MatchMode::Fuzzy.matches("", "anything"));
        assert!(!MatchMode::Fuzzy.matches("ho", "oh"));
        // Case sensitive.
        assert!(!MatchMode::Fuzzy.matches("A", "abc"));
    }

    #[test]
    fn test_underscore_filter_matrix() {
        let candidates = ["_hidden", "__dunder__", "visible"];

        let shown = |query: &str| {
            candidates
                .iter()
                .filter(|c| passes_underscore_filter(query, c))
                .copied()
                .collect::<Vec<_>>()
        };

        assert_eq!(shown(""), vec!["visible"]);
        assert_eq!(shown("_"), vec!["_hidden", "visible"]);
        assert_eq!(shown("__"), vec!["_hidden", "__dunder__", "visible"]);
    }
}
