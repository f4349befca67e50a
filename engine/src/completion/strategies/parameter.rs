// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::BTreeSet;

use crate::{CompletionContext, CompletionStrategy, LinePart, Value, line_parts,
            safe_eval};

/// Offers `name=` keyword-argument candidates inside a call whose callee resolves to a
/// function with a known parameter list. Parameters already consumed positionally or
/// already spelled as keywords are not offered again.
#[derive(Debug, Default)]
pub struct ParamNameCompletion;

impl ParamNameCompletion {
    /// How much of the argument list before the cursor is already spoken for:
    /// the count of positional arguments and the set of keyword names used.
    fn consumed_arguments(args_text: &str) -> (usize, BTreeSet<String>) {
        let mut positional = 0;
        let mut keywords = BTreeSet::new();
        let mut depth = 0_i32;
        let mut current = String::new();
        let mut args: Vec<String> = Vec::new();
        for ch in args_text.chars() {
            match ch {
                '(' | '[' | '{' => {
                    depth += 1;
                    current.push(ch);
                }
                ')' | ']' | '}' => {
                    depth -= 1;
                    current.push(ch);
                }
                ',' if depth == 0 => {
                    args.push(current.clone());
                    current.clear();
                }
                _ => current.push(ch),
            }
        }
        args.push(current);
        // The last fragment is the argument being typed; only the completed ones count.
        let completed = args.len().saturating_sub(1);
        for arg in args.iter().take(completed) {
            let arg = arg.trim();
            if let Some(eq) = arg.find('=') {
                keywords.insert(arg[..eq].trim().to_string());
            } else if !arg.is_empty() {
                positional += 1;
            }
        }
        (positional, keywords)
    }
}

impl CompletionStrategy for ParamNameCompletion {
    fn name(&self) -> &'static str { "parameter" }

    fn locate(&self, cursor: usize, line: &str) -> Option<LinePart> {
        line_parts::current_callable(cursor, line)?;
        Some(line_parts::current_word_or_empty(cursor, line))
    }

    fn matches(
        &self,
        cursor: usize,
        line: &str,
        ctx: &CompletionContext,
    ) -> Option<BTreeSet<String>> {
        let (callee, open_paren) = line_parts::current_callable(cursor, line)?;
        let part = line_parts::current_word_or_empty(cursor, line);

        let value = safe_eval(&callee.text, &ctx.namespace, &ctx.builtins).ok()?;
        let Value::Func { params, .. } = value else {
            return None;
        };

        let args_text: String = line
            .chars()
            .skip(open_paren + 1)
            .take(cursor.saturating_sub(open_paren + 1))
            .collect();
        let (positional, keywords) = Self::consumed_arguments(&args_text);

        let found: BTreeSet<String> = params
            .iter()
            .skip(positional)
            .filter(|param| !keywords.contains(param.as_str()))
            .filter(|param| param.starts_with(&part.text))
            .map(|param| format!("{param}="))
            .collect();
        Some(found)
    }

    fn shown_before_tab(&self) -> bool { false }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock_namespace;
    use pretty_assertions::assert_eq;

    fn ctx_with_func(name: &str, params: &[&str]) -> CompletionContext {
        let ctx = CompletionContext::default();
        {
            let mut namespace = lock_namespace(&ctx.namespace);
            namespace.insert(
                name.to_string(),
                Value::Func {
                    name: name.to_string(),
                    params: params.iter().map(|p| (*p).to_string()).collect(),
                },
            );
        }
        ctx
    }

    #[test]
    fn test_offers_remaining_parameters_as_keywords() {
        let strategy = ParamNameCompletion;
        let ctx = ctx_with_func("plot", &["x", "y", "color", "label"]);
        let line = "plot(1, 2, c";
        let found = strategy
            .matches(line.chars().count(), line, &ctx)
            .unwrap();
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["color="]);
    }

    #[test]
    fn test_keyword_already_used_is_not_offered_again() {
        let strategy = ParamNameCompletion;
        let ctx = ctx_with_func("plot", &["x", "color", "label"]);
        let line = "plot(1, color=3, ";
        let found = strategy
            .matches(line.chars().count(), line, &ctx)
            .unwrap();
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["label="]);
    }

    #[test]
    fn test_unknown_callee_is_not_applicable() {
        let strategy = ParamNameCompletion;
        let ctx = CompletionContext::default();
        assert_eq!(strategy.matches(8, "mystery(", &ctx), None);
    }

    #[test]
    fn test_outside_any_call_is_not_applicable() {
        let strategy = ParamNameCompletion;
        let ctx = ctx_with_func("plot", &["x"]);
        assert_eq!(strategy.matches(4, "plot", &ctx), None);
    }
}
