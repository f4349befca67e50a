// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::BTreeSet;

use crate::{CompletionContext, CompletionStrategy, LinePart, Value, line_parts,
            safe_eval};

/// Completion of keys inside a subscript `obj[`. The container expression is safely
/// evaluated (never calling user code); candidates are each key's repr with the closing
/// bracket appended, so accepting one closes the subscript.
#[derive(Debug, Default)]
pub struct DictKeyCompletion;

impl CompletionStrategy for DictKeyCompletion {
    fn name(&self) -> &'static str { "dict_key" }

    fn locate(&self, cursor: usize, line: &str) -> Option<LinePart> {
        line_parts::current_dict_key(cursor, line)
    }

    fn matches(
        &self,
        cursor: usize,
        line: &str,
        ctx: &CompletionContext,
    ) -> Option<BTreeSet<String>> {
        let part = self.locate(cursor, line)?;
        let target_text = line_parts::subscript_target(part.start - 1, line)?;
        let value = safe_eval(&target_text, &ctx.namespace, &ctx.builtins).ok()?;
        let Value::Dict(pairs) = value else {
            return None;
        };
        let found = pairs
            .iter()
            .map(|(key, _)| format!("{}]", key.repr()))
            .filter(|candidate| candidate.starts_with(&part.text))
            .collect();
        Some(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock_namespace;
    use pretty_assertions::assert_eq;

    fn ctx_with_dict() -> CompletionContext {
        let ctx = CompletionContext::default();
        lock_namespace(&ctx.namespace).insert(
            "d".to_string(),
            Value::Dict(vec![
                (Value::Str("key_one".into()), Value::Int(1)),
                (Value::Str("key_two".into()), Value::Int(2)),
                (Value::Int(7), Value::Int(3)),
            ]),
        );
        ctx
    }

    #[test]
    fn test_string_and_int_keys() {
        let strategy = DictKeyCompletion;

        let found = strategy.matches(5, "d['ke", &ctx_with_dict()).unwrap();
        let found: Vec<String> = found.into_iter().collect();
        assert_eq!(found, vec!["'key_one']", "'key_two']"]);

        let found = strategy.matches(3, "d[7", &ctx_with_dict()).unwrap();
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["7]"]);
    }

    #[test]
    fn test_empty_partial_lists_every_key() {
        let strategy = DictKeyCompletion;
        let found = strategy.matches(2, "d[", &ctx_with_dict()).unwrap();
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_not_applicable_outside_subscript_or_for_non_dict() {
        let strategy = DictKeyCompletion;
        assert_eq!(strategy.matches(5, "d 'ke", &ctx_with_dict()), None);

        let ctx = ctx_with_dict();
        lock_namespace(&ctx.namespace)
            .insert("xs".to_string(), Value::List(vec![Value::Int(1)]));
        assert_eq!(strategy.matches(3, "xs[", &ctx), None);
    }
}
