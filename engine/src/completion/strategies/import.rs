// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::BTreeSet;

use crate::{CompletionContext, CompletionStrategy, LinePart, line_parts};

/// Module-name completion on `import` / `from` lines, served from the incrementally
/// populated [`crate::ModuleIndex`]. The index may be mid-scan; whatever it knows right
/// now is what gets offered.
#[derive(Debug, Default)]
pub struct ImportCompletion;

impl CompletionStrategy for ImportCompletion {
    fn name(&self) -> &'static str { "import" }

    fn locate(&self, cursor: usize, line: &str) -> Option<LinePart> {
        line_parts::current_import_target(cursor, line)
    }

    fn matches(
        &self,
        cursor: usize,
        line: &str,
        ctx: &CompletionContext,
    ) -> Option<BTreeSet<String>> {
        let part = self.locate(cursor, line)?;
        let index = ctx.module_index.as_ref()?;

        // `from pkg import <name>` completes names directly under `pkg`; everywhere
        // else the dotted module path itself is being completed.
        let trimmed = line.trim_start();
        if trimmed.starts_with("from ")
            && let Some(import_at) = trimmed.find(" import ")
        {
            let parent = trimmed["from ".len()..import_at].trim();
            let found = index
                .submodules(parent)
                .into_iter()
                .filter(|name| name.starts_with(&part.text))
                .collect();
            return Some(found);
        }
        Some(index.complete(&part.text))
    }
}
