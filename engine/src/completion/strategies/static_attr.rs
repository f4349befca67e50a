// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::BTreeSet;

use crate::{CompletionContext, CompletionStrategy, LinePart, line_parts};

/// Attribute completion backed by the optional static analyzer, for dotted expressions
/// the safe evaluator cannot handle (call results, multi-line targets). Applicable only
/// when [`CompletionContext::analyzer`] is present.
///
/// Analyzer output is gated by a first-letter check: when any proposed name does not
/// share the first typed letter (case-insensitively), the whole set is discarded as too
/// general. This is a compatibility heuristic, not a correctness rule.
#[derive(Debug, Default)]
pub struct StaticAttrCompletion;

impl CompletionStrategy for StaticAttrCompletion {
    fn name(&self) -> &'static str { "static_attr" }

    fn locate(&self, cursor: usize, line: &str) -> Option<LinePart> {
        line_parts::current_expression_attribute(cursor, line)
    }

    fn matches(
        &self,
        cursor: usize,
        line: &str,
        ctx: &CompletionContext,
    ) -> Option<BTreeSet<String>> {
        let analyzer = ctx.analyzer.as_ref()?;
        let part = self.locate(cursor, line)?;

        let mut source = ctx.source_so_far.clone();
        if !source.is_empty() {
            source.push('\n');
        }
        let cursor_in_source = source.chars().count() + cursor;
        source.push_str(line);

        let suggestions = analyzer.complete(&source, cursor_in_source);
        if suggestions.is_empty() {
            return Some(BTreeSet::new());
        }

        let first_letter = part.text.chars().next();
        if let Some(letter) = first_letter {
            let lower = letter.to_lowercase().to_string();
            let too_general = suggestions.iter().any(|suggestion| {
                !suggestion.name.to_lowercase().starts_with(&lower)
            });
            if too_general {
                return None;
            }
            Some(
                suggestions
                    .into_iter()
                    .filter(|suggestion| suggestion.name.starts_with(letter))
                    .map(|suggestion| suggestion.name)
                    .collect(),
            )
        } else {
            Some(suggestions.into_iter().map(|it| it.name).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{AnalyzerSuggestion, StaticAnalyzer};
    use pretty_assertions::assert_eq;

    struct CannedAnalyzer {
        names: Vec<&'static str>,
    }

    impl StaticAnalyzer for CannedAnalyzer {
        fn complete(&self, _source: &str, _cursor: usize) -> Vec<AnalyzerSuggestion> {
            self.names
                .iter()
                .map(|name| AnalyzerSuggestion {
                    name: (*name).to_string(),
                    typed_prefix: String::new(),
                })
                .collect()
        }
    }

    fn ctx_with(names: Vec<&'static str>) -> CompletionContext {
        CompletionContext {
            analyzer: Some(Arc::new(CannedAnalyzer { names })),
            ..CompletionContext::default()
        }
    }

    #[test]
    fn test_shared_first_letter_passes_case_sensitively() {
        let strategy = StaticAttrCompletion;
        let ctx = ctx_with(vec!["startswith", "strip", "Split"]);
        let line = "foo().s";
        let found = strategy
            .matches(line.chars().count(), line, &ctx)
            .unwrap();
        // `Split` shares the letter case-insensitively so the set survives, but the
        // final filter is case-sensitive.
        assert_eq!(
            found.into_iter().collect::<Vec<_>>(),
            vec!["startswith", "strip"]
        );
    }

    #[test]
    fn test_mixed_first_letters_rejected_as_too_general() {
        let strategy = StaticAttrCompletion;
        let ctx = ctx_with(vec!["strip", "upper"]);
        let line = "foo().s";
        assert_eq!(strategy.matches(line.chars().count(), line, &ctx), None);
    }

    #[test]
    fn test_nothing_typed_yet_returns_everything() {
        let strategy = StaticAttrCompletion;
        let ctx = ctx_with(vec!["strip", "upper"]);
        let line = "foo().";
        let found = strategy
            .matches(line.chars().count(), line, &ctx)
            .unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_no_analyzer_means_never_applicable() {
        let strategy = StaticAttrCompletion;
        let ctx = CompletionContext::default();
        assert_eq!(strategy.matches(7, "foo().s", &ctx), None);
    }
}
