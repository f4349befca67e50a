// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::BTreeSet;

use crate::{CompletionContext, CompletionStrategy, KEYWORDS, LinePart, line_parts,
            lock_namespace, passes_underscore_filter};

/// The catch-all strategy: bare identifiers complete against language keywords, the
/// live namespace, and the builtins table. Lowest priority; every syntactic specialist
/// runs first.
#[derive(Debug, Default)]
pub struct GlobalCompletion;

impl CompletionStrategy for GlobalCompletion {
    fn name(&self) -> &'static str { "global" }

    fn locate(&self, cursor: usize, line: &str) -> Option<LinePart> {
        Some(line_parts::current_word_or_empty(cursor, line))
    }

    fn matches(
        &self,
        cursor: usize,
        line: &str,
        ctx: &CompletionContext,
    ) -> Option<BTreeSet<String>> {
        let part = self.locate(cursor, line)?;
        // A dotted tail is attribute territory, never a global.
        if part.start > 0
            && line.chars().nth(part.start - 1) == Some('.')
        {
            return None;
        }

        let mut found = BTreeSet::new();
        for keyword in KEYWORDS {
            if ctx.match_mode.matches(&part.text, keyword) {
                found.insert((*keyword).to_string());
            }
        }
        for name in ctx.builtins.keys() {
            if ctx.match_mode.matches(&part.text, name)
                && passes_underscore_filter(&part.text, name)
            {
                found.insert(name.clone());
            }
        }
        let namespace = lock_namespace(&ctx.namespace);
        for name in namespace.keys() {
            if ctx.match_mode.matches(&part.text, name)
                && passes_underscore_filter(&part.text, name)
            {
                found.insert(name.clone());
            }
        }
        Some(found)
    }
}
