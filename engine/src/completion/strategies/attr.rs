// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::BTreeSet;

use crate::{CompletionContext, CompletionStrategy, LinePart, line_parts,
            passes_underscore_filter, safe_attr_names, safe_eval};

/// Runtime attribute completion: safely evaluate the expression left of the dot, then
/// enumerate its attributes without invoking anything. Candidates are the full dotted
/// spelling (`foo.bar`), since the located span covers the whole chain.
#[derive(Debug, Default)]
pub struct AttrCompletion;

impl CompletionStrategy for AttrCompletion {
    fn name(&self) -> &'static str { "attr" }

    fn locate(&self, cursor: usize, line: &str) -> Option<LinePart> {
        line_parts::current_dotted_attribute(cursor, line)
    }

    fn matches(
        &self,
        cursor: usize,
        line: &str,
        ctx: &CompletionContext,
    ) -> Option<BTreeSet<String>> {
        let part = self.locate(cursor, line)?;
        let last_dot = part.text.rfind('.')?;
        let target = &part.text[..last_dot];
        let partial = &part.text[last_dot + 1..];

        // Unknown name, unsafe expression: simply no matches here.
        let value = safe_eval(target, &ctx.namespace, &ctx.builtins).ok()?;

        let found = safe_attr_names(&value)
            .into_iter()
            .filter(|attr| {
                ctx.match_mode.matches(partial, attr)
                    && passes_underscore_filter(partial, attr)
            })
            .map(|attr| format!("{target}.{attr}"))
            .collect();
        Some(found)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::{Value, lock_namespace};
    use pretty_assertions::assert_eq;

    fn ctx_with_foo() -> CompletionContext {
        let ctx = CompletionContext::default();
        lock_namespace(&ctx.namespace).insert("foo".to_string(), Value::Object {
            class: "Thing".to_string(),
            attrs: [
                ("bar".to_string(), Value::Int(1)),
                ("baz".to_string(), Value::Int(2)),
                ("_hidden".to_string(), Value::Int(3)),
            ]
            .into_iter()
            .collect::<BTreeMap<_, _>>(),
        });
        ctx
    }

    #[test]
    fn test_attrs_of_runtime_object() {
        let strategy = AttrCompletion;
        let found = strategy.matches(5, "foo.b", &ctx_with_foo()).unwrap();
        let found: Vec<String> = found.into_iter().collect();
        assert_eq!(found, vec!["foo.bar", "foo.baz"]);
    }

    #[test]
    fn test_underscore_hidden_until_typed() {
        let strategy = AttrCompletion;

        let bare = strategy.matches(4, "foo.", &ctx_with_foo()).unwrap();
        assert!(!bare.iter().any(|m| m.contains("_hidden")));
        assert!(!bare.iter().any(|m| m.contains("__repr__")));

        let one = strategy.matches(5, "foo._", &ctx_with_foo()).unwrap();
        assert!(one.contains("foo._hidden"));
        assert!(!one.iter().any(|m| m.contains("__repr__")));

        let two = strategy.matches(6, "foo.__", &ctx_with_foo()).unwrap();
        assert!(two.contains("foo.__repr__"));
    }

    #[test]
    fn test_not_applicable_without_a_dot_or_known_name() {
        let strategy = AttrCompletion;
        assert_eq!(strategy.matches(3, "foo", &ctx_with_foo()), None);
        assert_eq!(strategy.matches(8, "nope.att", &ctx_with_foo()), None);
    }
}
