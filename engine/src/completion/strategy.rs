// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::BTreeSet, path::PathBuf, sync::Arc};

use crate::{Builtins, LinePart, MatchMode, ModuleIndex, Namespace, Tokenizer,
            default_builtins, new_namespace};

/// One pluggable algorithm proposing completions for a specific syntactic context.
///
/// The contract for [`CompletionStrategy::matches`]:
/// - `None` means "not applicable here" -- the pipeline moves on to the next strategy.
/// - `Some(empty)` means "applicable, but nothing matches" -- the pipeline stops, and
///   deliberately so: inside a string literal that matches no files, an empty filename
///   result must still suppress global-name completion.
pub trait CompletionStrategy: Send + Sync {
    /// Name used in log messages only.
    fn name(&self) -> &'static str;

    /// The span a candidate would replace, or `None` when the cursor is not on a span
    /// this strategy understands.
    fn locate(&self, cursor: usize, line: &str) -> Option<LinePart>;

    fn matches(
        &self,
        cursor: usize,
        line: &str,
        ctx: &CompletionContext,
    ) -> Option<BTreeSet<String>>;

    /// Presentation-only formatting of a candidate (e.g. drop a directory prefix).
    /// Never changes the substitution value.
    fn format(&self, candidate: &str) -> String { candidate.to_string() }

    /// Whether suggestions surface automatically as the user types, versus only after
    /// an explicit completion request (Tab).
    fn shown_before_tab(&self) -> bool { true }
}

/// A single suggestion from the optional static analyzer: the proposed name and the
/// textual prefix of it the user has already typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerSuggestion {
    pub name: String,
    pub typed_prefix: String,
}

/// Opaque static-analysis collaborator. When absent, the corresponding strategy is
/// never applicable.
pub trait StaticAnalyzer: Send + Sync {
    fn complete(&self, source: &str, cursor: usize) -> Vec<AnalyzerSuggestion>;
}

/// Everything a strategy may consult to answer a completion query. Built fresh per
/// query by the repl engine; cheap to construct (everything shared is behind an `Arc`).
#[allow(missing_debug_implementations)]
pub struct CompletionContext {
    /// Live interpreter namespace. Read-only use; may be mutated concurrently by a
    /// running task between reads.
    pub namespace: Namespace,
    pub builtins: Arc<Builtins>,
    pub match_mode: MatchMode,
    /// Best-effort importable-module index; may be partially populated.
    pub module_index: Option<Arc<ModuleIndex>>,
    pub analyzer: Option<Arc<dyn StaticAnalyzer>>,
    pub tokenizer: Option<Arc<dyn Tokenizer>>,
    /// The multi-line source accumulated so far in the current block (not including the
    /// line being edited).
    pub source_so_far: String,
    /// Directory filename completion resolves relative paths against. `None` means the
    /// process working directory.
    pub cwd: Option<PathBuf>,
    /// Whether the line being edited sits inside a class body (drives magic-method
    /// completion). Computed by the caller from the tokenizer collaborator.
    pub in_class_body: bool,
}

impl CompletionContext {
    #[must_use]
    pub fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            builtins: Arc::new(default_builtins()),
            match_mode: MatchMode::default(),
            module_index: None,
            analyzer: None,
            tokenizer: None,
            source_so_far: String::new(),
            cwd: None,
            in_class_body: false,
        }
    }
}

impl Default for CompletionContext {
    fn default() -> Self { Self::new(new_namespace()) }
}
