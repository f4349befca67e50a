// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{path::PathBuf, sync::Arc};

use crate::{Builtins, CodeRunner, CompletionContext, CompletionStrategy, Interpreter,
            LineBuffer, MatchMode, MatchesIterator, ModuleIndex, Namespace,
            PumpOutcome, RunnerError, StaticAnalyzer, TokenKind, Tokenizer,
            default_builtins, default_strategies, get_completer};

/// What became of a pushed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushResult {
    /// The accumulated buffer executed; a fresh statement starts next.
    Complete,
    /// The buffer is an open block; the next line continues it.
    MoreInput,
    /// The run was interrupted; the buffer is discarded.
    Interrupted,
}

/// Ties the pieces together for a front-end: the line being edited, the accumulated
/// multi-line source, the completion pipeline and its active session, and the code
/// runner. A front-end feeds keystrokes into [`ReplEngine::buffer_mut`], calls
/// [`ReplEngine::complete`] after edits, [`ReplEngine::tab`] on Tab, and
/// [`ReplEngine::push`] on Enter.
#[allow(missing_debug_implementations)]
pub struct ReplEngine {
    buffer: LineBuffer,
    source_so_far: String,
    matches_iter: MatchesIterator,
    strategies: Vec<Arc<dyn CompletionStrategy>>,
    runner: CodeRunner,
    namespace: Namespace,
    builtins: Arc<Builtins>,
    pub match_mode: MatchMode,
    pub module_index: Option<Arc<ModuleIndex>>,
    pub analyzer: Option<Arc<dyn StaticAnalyzer>>,
    pub tokenizer: Option<Arc<dyn Tokenizer>>,
    pub cwd: Option<PathBuf>,
    /// Supplies a line when running code blocks on input. `None` models end-of-input.
    input_provider: Option<Box<dyn FnMut() -> Option<String> + Send>>,
}

impl ReplEngine {
    /// The namespace is shared: the interpreter mutates it while running, completion
    /// strategies read it between runs.
    #[must_use]
    pub fn new(interpreter: Box<dyn Interpreter>, namespace: Namespace) -> Self {
        Self {
            buffer: LineBuffer::new(),
            source_so_far: String::new(),
            matches_iter: MatchesIterator::default(),
            strategies: default_strategies(),
            runner: CodeRunner::new(interpreter),
            namespace,
            builtins: Arc::new(default_builtins()),
            match_mode: MatchMode::default(),
            module_index: None,
            analyzer: None,
            tokenizer: None,
            cwd: None,
            input_provider: None,
        }
    }

    #[must_use]
    pub fn buffer(&self) -> &LineBuffer { &self.buffer }

    pub fn buffer_mut(&mut self) -> &mut LineBuffer { &mut self.buffer }

    #[must_use]
    pub fn matches(&self) -> &[String] { self.matches_iter.matches() }

    /// The strategy that produced the current candidate list, if a session is loaded.
    #[must_use]
    pub fn selected_strategy(&self) -> Option<&Arc<dyn CompletionStrategy>> {
        self.matches_iter.strategy()
    }

    pub fn set_refresh_callback(
        &mut self,
        callback: impl FnMut(&str) + Send + 'static,
    ) {
        self.runner.set_refresh_callback(callback);
    }

    pub fn set_input_provider(
        &mut self,
        provider: impl FnMut() -> Option<String> + Send + 'static,
    ) {
        self.input_provider = Some(Box::new(provider));
    }

    /// Re-query the pipeline for the current line and cursor. Returns whether a
    /// suggestion list should be shown. Called after every edit; an edit that moves
    /// off the completed span simply produces a new (or no) session.
    pub fn complete(&mut self, tab_requested: bool) -> bool {
        let cursor = self.buffer.cursor();
        let line = self.buffer.line().to_string();
        let ctx = self.context();
        let (matches, owner) = get_completer(&self.strategies, cursor, &line, &ctx);
        let Some(strategy) = owner else {
            self.matches_iter.clear();
            return false;
        };
        if matches.is_empty() {
            self.matches_iter.clear();
            return false;
        }
        if !tab_requested && !strategy.shown_before_tab() {
            self.matches_iter.clear();
            return false;
        }
        // A single candidate identical to what is already typed offers nothing.
        if let [only] = matches.as_slice()
            && let Some(part) = strategy.locate(cursor, &line)
            && *only == part.text
        {
            self.matches_iter.clear();
            return false;
        }
        self.matches_iter.update(cursor, &line, matches, strategy);
        true
    }

    /// Tab: start a session (expanding the common prefix first) or cycle an already
    /// active one. Returns whether the keypress did anything.
    pub fn tab(&mut self) -> bool {
        if !self.matches_iter.is_active() {
            if !self.complete(true) {
                return false;
            }
            if let Some((cursor, line)) = self.matches_iter.substitute_common_prefix()
                && line != self.buffer.line()
            {
                self.buffer.set(line, cursor);
                return true;
            }
            if self.matches_iter.matches().is_empty() {
                // The prefix was the only candidate; the session already closed.
                return true;
            }
        }
        let candidate = self.matches_iter.next().to_string();
        let (cursor, line) = self.matches_iter.substitute(&candidate);
        self.buffer.set(line, cursor);
        true
    }

    /// Append `line` to the accumulated buffer and pump it through the runner until
    /// it finishes or asks for more lines. The edit line resets either way.
    ///
    /// # Errors
    ///
    /// Propagates [`RunnerError`]; [`RunnerError::ExitRequested`] must reach the
    /// front-end so it can clean up and terminate.
    pub async fn push(&mut self, line: &str) -> Result<PushResult, RunnerError> {
        if !self.source_so_far.is_empty() {
            self.source_so_far.push('\n');
        }
        self.source_so_far.push_str(line);
        self.runner.load_code(self.source_so_far.clone());

        self.buffer.reset();
        self.matches_iter.clear();

        let mut resume: Option<String> = None;
        loop {
            let outcome = match self.runner.run_code(resume.take()).await {
                Ok(outcome) => outcome,
                Err(error) => {
                    self.source_so_far.clear();
                    return Err(error);
                }
            };
            match outcome {
                PumpOutcome::Suspended => {
                    if self.runner.awaiting_input() {
                        resume = self.input_provider.as_mut().and_then(|get| get());
                    }
                }
                PumpOutcome::Done => {
                    self.source_so_far.clear();
                    return Ok(PushResult::Complete);
                }
                PumpOutcome::Unfinished => return Ok(PushResult::MoreInput),
                PumpOutcome::Interrupted => {
                    self.source_so_far.clear();
                    return Ok(PushResult::Interrupted);
                }
            }
        }
    }

    /// Deliver an interrupt to the running (or next-running) code.
    pub fn interrupt(&self) { self.runner.interrupt(); }

    /// Handle for delivering interrupts from another task (e.g. a Ctrl-C listener).
    #[must_use]
    pub fn interrupt_handle(&self) -> crate::InterruptHandle {
        self.runner.interrupt_handle()
    }

    /// Snapshot of everything the strategies may consult, built fresh per query.
    #[must_use]
    pub fn context(&self) -> CompletionContext {
        CompletionContext {
            namespace: self.namespace.clone(),
            builtins: self.builtins.clone(),
            match_mode: self.match_mode,
            module_index: self.module_index.clone(),
            analyzer: self.analyzer.clone(),
            tokenizer: self.tokenizer.clone(),
            source_so_far: self.source_so_far.clone(),
            cwd: self.cwd.clone(),
            in_class_body: self.in_class_body(),
        }
    }

    /// Whether the line being edited sits inside a class body, decided from the
    /// accumulated block's indentation structure. Tracks a stack of open block
    /// headers; the innermost one whose body contains the current line decides.
    fn in_class_body(&self) -> bool {
        let mut open_blocks: Vec<(usize, bool)> = Vec::new();
        for line in self.source_so_far.lines() {
            let trimmed = line.trim_start();
            if trimmed.is_empty() {
                continue;
            }
            let indent = line.chars().count() - trimmed.chars().count();
            while let Some((block_indent, _)) = open_blocks.last() {
                if indent <= *block_indent {
                    open_blocks.pop();
                } else {
                    break;
                }
            }
            if trimmed.trim_end().ends_with(':') {
                open_blocks.push((indent, self.is_class_header(trimmed)));
            }
        }
        let current = self.buffer.line();
        let current_indent =
            current.chars().count() - current.trim_start().chars().count();
        while let Some((block_indent, _)) = open_blocks.last() {
            if current_indent <= *block_indent {
                open_blocks.pop();
            } else {
                break;
            }
        }
        open_blocks.last().is_some_and(|(_, is_class)| *is_class)
    }

    /// Prefer the tokenizer's verdict on whether a block header opens a class; fall
    /// back to a textual check.
    fn is_class_header(&self, trimmed: &str) -> bool {
        if let Some(tokenizer) = self.tokenizer.as_ref() {
            return tokenizer
                .tokenize(trimmed)
                .iter()
                .find(|token| {
                    !matches!(token.kind, TokenKind::Whitespace | TokenKind::Comment)
                })
                .is_some_and(|token| {
                    token.kind == TokenKind::Keyword && token.text == "class"
                });
        }
        trimmed.starts_with("class ") || trimmed.starts_with("class(")
    }
}
