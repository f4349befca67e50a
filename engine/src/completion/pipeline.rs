// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{panic::{AssertUnwindSafe, catch_unwind}, sync::Arc};

use crate::{AttrCompletion, CompletionContext, CompletionStrategy, DictKeyCompletion,
            FilenameCompletion, GlobalCompletion, ImportCompletion,
            MagicMethodCompletion, ParamNameCompletion, StaticAttrCompletion};

/// The strategies in priority order. Syntactic specialists come first so that, for
/// example, a partial path inside a string literal is never mistaken for a bare
/// identifier by the global strategy.
#[must_use]
pub fn default_strategies() -> Vec<Arc<dyn CompletionStrategy>> {
    vec![
        Arc::new(DictKeyCompletion),
        Arc::new(ImportCompletion),
        Arc::new(FilenameCompletion),
        Arc::new(MagicMethodCompletion),
        Arc::new(StaticAttrCompletion),
        Arc::new(AttrCompletion),
        Arc::new(ParamNameCompletion),
        Arc::new(GlobalCompletion),
    ]
}

/// Run the strategies in order and return the first applicable result, sorted, together
/// with the strategy that produced it (its `locate`/`format` are needed later when a
/// candidate is substituted into the line).
///
/// A panicking strategy is logged and skipped. One misbehaving strategy must never take
/// down the whole completion attempt.
#[must_use]
pub fn get_completer(
    strategies: &[Arc<dyn CompletionStrategy>],
    cursor: usize,
    line: &str,
    ctx: &CompletionContext,
) -> (Vec<String>, Option<Arc<dyn CompletionStrategy>>) {
    for strategy in strategies {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            strategy.matches(cursor, line, ctx)
        }));
        match outcome {
            Ok(Some(found)) => {
                let mut found: Vec<String> = found.into_iter().collect();
                found.sort();
                return (found, Some(strategy.clone()));
            }
            Ok(None) => {}
            Err(_) => {
                tracing::warn!(
                    strategy = strategy.name(),
                    "completion strategy panicked; skipping it"
                );
            }
        }
    }
    (Vec::new(), None)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::{LinePart, Value, lock_namespace};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_applicable_strategy_wins() {
        let ctx = CompletionContext::default();
        {
            let mut namespace = lock_namespace(&ctx.namespace);
            namespace.insert(
                "config".to_string(),
                Value::Dict(vec![(
                    Value::Str("user".to_string()),
                    Value::Str("ada".to_string()),
                )]),
            );
        }
        let strategies = default_strategies();
        let line = "config['u";
        let (found, owner) =
            get_completer(&strategies, line.chars().count(), line, &ctx);
        assert_eq!(found, vec!["'user']"]);
        assert_eq!(owner.unwrap().name(), "dict_key");
    }

    #[test]
    fn test_empty_result_from_specialist_suppresses_global() {
        // Inside a string literal that matches no files, the filename strategy is
        // applicable-but-empty, and that empty answer must win over global names.
        let ctx = CompletionContext {
            cwd: Some(std::env::temp_dir()),
            ..CompletionContext::default()
        };
        let strategies = default_strategies();
        let line = "open('no_such_prefix_zzz";
        let (found, owner) =
            get_completer(&strategies, line.chars().count(), line, &ctx);
        assert_eq!(found, Vec::<String>::new());
        assert_eq!(owner.unwrap().name(), "filename");
    }

    #[test]
    fn test_no_strategy_applicable() {
        let ctx = CompletionContext::default();
        let strategies = default_strategies();
        // Cursor on whitespace after a complete token, nothing to complete.
        let (found, owner) = get_completer(&strategies, 0, "", &ctx);
        // The global strategy is always applicable on an empty word, so it owns the
        // (large) result. Prove the fallthrough by removing it.
        assert!(owner.is_some());
        assert!(!found.is_empty());

        let specialists = &strategies[..strategies.len() - 1];
        let (found, owner) = get_completer(specialists, 0, "", &ctx);
        assert_eq!(found, Vec::<String>::new());
        assert!(owner.is_none());
    }

    struct PanickyStrategy;

    impl CompletionStrategy for PanickyStrategy {
        fn name(&self) -> &'static str { "panicky" }

        fn locate(&self, _cursor: usize, _line: &str) -> Option<LinePart> {
            panic!("locate should not even be reached")
        }

        fn matches(
            &self,
            _cursor: usize,
            _line: &str,
            _ctx: &CompletionContext,
        ) -> Option<BTreeSet<String>> {
            panic!("boom")
        }
    }

    #[test]
    fn test_panicking_strategy_is_isolated() {
        let ctx = CompletionContext::default();
        let strategies: Vec<Arc<dyn CompletionStrategy>> =
            vec![Arc::new(PanickyStrategy), Arc::new(GlobalCompletion)];
        let (found, owner) = get_completer(&strategies, 2, "pa", &ctx);
        assert!(found.contains(&"pass".to_string()));
        assert_eq!(owner.unwrap().name(), "global");
    }
}
