// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # coil_engine
//!
//! The interactive front-end core for a dynamic-language interpreter: syntax-aware
//! completion and coroutine-style execution of user code, independent of any terminal
//! or rendering layer.
//!
//! The two load-bearing pieces are:
//!
//! 1. The completion pipeline ([`get_completer`]): an ordered list of
//!    [`CompletionStrategy`] implementations, each owning one syntactic context
//!    (dict keys, import lines, filenames inside string literals, magic methods,
//!    analyzer-backed attributes, runtime attributes via [`safe_eval`], call
//!    parameters, and finally bare global names). The first applicable strategy wins,
//!    even when its candidate set is empty.
//!
//! 2. The [`CodeRunner`]: runs one source buffer at a time on a blocking worker, with
//!    every console read or write made by the running code suspending the worker back
//!    to the controller. The controller pumps the run forward with
//!    [`CodeRunner::run_code`]; user code never observes that it was suspended.
//!
//! [`ReplEngine`] ties both together with line editing ([`LineBuffer`]) and a
//! completion session ([`MatchesIterator`]) for a front-end to drive. The interpreter,
//! tokenizer, and static analyzer are collaborator traits supplied by the embedder.

// Attach sources.
pub mod completion;
pub mod core;
pub mod repl;
pub mod runner;

// Re-export.
pub use completion::*;
pub use core::*;
pub use repl::*;
pub use runner::*;
