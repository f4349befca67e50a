// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::Arc;

use crate::{CompletionStrategy, char_to_byte_index};

/// One completion session: the candidate list produced by a pipeline query plus a
/// cursor cycling through it. The session remembers which strategy produced the
/// candidates because that strategy's `locate` decides exactly which span of the line a
/// chosen candidate replaces.
#[derive(Default)]
#[allow(missing_debug_implementations)]
pub struct MatchesIterator {
    orig_cursor: usize,
    orig_line: String,
    matches: Vec<String>,
    index: Option<usize>,
    strategy: Option<Arc<dyn CompletionStrategy>>,
}

impl MatchesIterator {
    /// Begin a new session over a non-empty candidate list.
    ///
    /// # Panics
    ///
    /// Panics when `matches` is empty. Callers decide between "no candidates" and "a
    /// session" before constructing one.
    pub fn update(
        &mut self,
        cursor: usize,
        line: &str,
        matches: Vec<String>,
        strategy: Arc<dyn CompletionStrategy>,
    ) {
        assert!(!matches.is_empty(), "a completion session needs candidates");
        self.orig_cursor = cursor;
        self.orig_line = line.to_string();
        self.matches = matches;
        self.index = None;
        self.strategy = Some(strategy);
    }

    /// Whether a candidate is currently selected. Callers use this to decide whether
    /// Tab should cycle this session or start a fresh query.
    #[must_use]
    pub fn is_active(&self) -> bool { self.index.is_some() }

    #[must_use]
    pub fn matches(&self) -> &[String] { &self.matches }

    #[must_use]
    pub fn strategy(&self) -> Option<&Arc<dyn CompletionStrategy>> {
        self.strategy.as_ref()
    }

    /// Advance the selection cyclically and return the newly selected candidate.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> &str {
        let next = match self.index {
            None => 0,
            Some(index) => (index + 1) % self.matches.len(),
        };
        self.index = Some(next);
        &self.matches[next]
    }

    /// Retreat the selection cyclically and return the newly selected candidate.
    pub fn previous(&mut self) -> &str {
        let previous = match self.index {
            None => self.matches.len() - 1,
            Some(index) => (index + self.matches.len() - 1) % self.matches.len(),
        };
        self.index = Some(previous);
        &self.matches[previous]
    }

    /// The selected candidate.
    ///
    /// # Panics
    ///
    /// Panics when nothing is selected yet.
    #[must_use]
    pub fn current(&self) -> &str {
        let index = self.index.expect("no candidate selected");
        &self.matches[index]
    }

    /// Splice `candidate` into the span the owning strategy locates in the original
    /// line. Location is recomputed here, not captured at `update` time, because
    /// earlier substitutions may already have shifted the line.
    #[must_use]
    pub fn substitute(&self, candidate: &str) -> (usize, String) {
        let Some(strategy) = self.strategy.as_ref() else {
            return (self.orig_cursor, self.orig_line.clone());
        };
        let Some(part) = strategy.locate(self.orig_cursor, &self.orig_line) else {
            return (self.orig_cursor, self.orig_line.clone());
        };
        let start = char_to_byte_index(&self.orig_line, part.start);
        let stop = char_to_byte_index(&self.orig_line, part.stop);
        let mut line = String::with_capacity(
            self.orig_line.len() - (stop - start) + candidate.len(),
        );
        line.push_str(&self.orig_line[..start]);
        line.push_str(candidate);
        line.push_str(&self.orig_line[stop..]);
        let cursor = part.start + candidate.chars().count();
        (cursor, line)
    }

    /// Substitute the longest common prefix of every candidate. When that prefix is
    /// itself a full candidate and the only one, the session is cleared since there is
    /// nothing left to cycle through. Returns `None` when no session is loaded, or when
    /// the candidates share no prefix at all (routine under substring / fuzzy matching);
    /// substituting an empty prefix would erase the span the user typed.
    pub fn substitute_common_prefix(&mut self) -> Option<(usize, String)> {
        if self.matches.is_empty() {
            return None;
        }
        let prefix = common_prefix(&self.matches);
        if prefix.is_empty() {
            return None;
        }
        let substituted = self.substitute(&prefix);
        let survivors = self
            .matches
            .iter()
            .filter(|candidate| candidate.starts_with(&prefix))
            .count();
        if survivors == 1 && self.matches.contains(&prefix) {
            self.clear();
        }
        Some(substituted)
    }

    pub fn clear(&mut self) {
        self.matches.clear();
        self.index = None;
        self.strategy = None;
        self.orig_line.clear();
        self.orig_cursor = 0;
    }
}

/// Longest common prefix of a non-empty candidate list, on character boundaries.
fn common_prefix(candidates: &[String]) -> String {
    let mut prefix: Vec<char> = match candidates.first() {
        Some(first) => first.chars().collect(),
        None => return String::new(),
    };
    for candidate in &candidates[1..] {
        let shared = candidate
            .chars()
            .zip(prefix.iter())
            .take_while(|(a, b)| a == *b)
            .count();
        prefix.truncate(shared);
    }
    prefix.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GlobalCompletion;
    use pretty_assertions::assert_eq;

    fn session(candidates: &[&str], cursor: usize, line: &str) -> MatchesIterator {
        let mut iter = MatchesIterator::default();
        iter.update(
            cursor,
            line,
            candidates.iter().map(|c| (*c).to_string()).collect(),
            std::sync::Arc::new(GlobalCompletion),
        );
        iter
    }

    #[test]
    fn test_cycling_wraps_in_both_directions() {
        let mut iter = session(&["alpha", "beta", "gamma"], 0, "");
        assert!(!iter.is_active());
        assert_eq!(iter.next(), "alpha");
        assert!(iter.is_active());
        assert_eq!(iter.next(), "beta");
        assert_eq!(iter.next(), "gamma");
        assert_eq!(iter.next(), "alpha");
        assert_eq!(iter.previous(), "gamma");

        let mut iter = session(&["alpha", "beta"], 0, "");
        assert_eq!(iter.previous(), "beta");
    }

    #[test]
    #[should_panic(expected = "needs candidates")]
    fn test_update_with_no_candidates_panics() {
        let mut iter = MatchesIterator::default();
        iter.update(0, "", Vec::new(), std::sync::Arc::new(GlobalCompletion));
    }

    #[test]
    #[should_panic(expected = "no candidate selected")]
    fn test_current_before_selection_panics() {
        let iter = session(&["alpha"], 0, "");
        let _ = iter.current();
    }

    #[test]
    fn test_substitute_replaces_the_located_span() {
        let iter = session(&["printer", "printing"], 8, "x = prin + 1");
        let (cursor, line) = iter.substitute("printer");
        assert_eq!(line, "x = printer + 1");
        assert_eq!(cursor, 11);
    }

    #[test]
    fn test_common_prefix_substitution_keeps_session_open() {
        let mut iter = session(&["printer", "printing"], 4, "prin");
        let (cursor, line) = iter.substitute_common_prefix().unwrap();
        assert_eq!(line, "print");
        assert_eq!(cursor, 5);
        // Two candidates still share the prefix; the session survives for cycling.
        assert_eq!(iter.matches().len(), 2);
    }

    #[test]
    fn test_common_prefix_collapse_to_single_candidate_clears_session() {
        let mut iter = session(&["print"], 4, "prin");
        let (_, line) = iter.substitute_common_prefix().unwrap();
        assert_eq!(line, "print");
        assert!(iter.matches().is_empty());
        assert!(!iter.is_active());
    }

    #[test]
    fn test_no_shared_prefix_leaves_the_line_alone() {
        // Substring matches need not share a prefix with each other.
        let mut iter = session(&["grapefruit", "parapet"], 4, "rape");
        assert_eq!(iter.substitute_common_prefix(), None);
        // The session stays loaded so Tab can cycle the candidates instead.
        assert_eq!(iter.matches().len(), 2);
        assert!(iter.is_active());
    }
}
