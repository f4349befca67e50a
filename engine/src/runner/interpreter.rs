// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use thiserror::Error;

use crate::RunnerIo;

/// What became of a source buffer once the interpreter finished with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunResult {
    /// The buffer executed to completion.
    Complete,
    /// The buffer is a valid but incomplete statement (an open block). The caller must
    /// collect more lines and run again.
    MoreInputNeeded,
}

/// Out-of-band conditions that abort a run instead of completing it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpreterSignal {
    /// The running code asked the process to terminate with this status code.
    #[error("exit requested with status {0}")]
    ExitRequested(i32),
    /// An external interrupt reached the running code at a suspension point.
    #[error("interrupted")]
    Interrupted,
}

/// A language interpreter the runner can drive. `run` executes one source buffer and
/// performs all of its console I/O through `io`, which is where the run transparently
/// suspends and resumes.
///
/// Implementations run on a blocking worker, so they are free to block on `io` calls.
pub trait Interpreter: Send {
    fn run(
        &mut self,
        source: &str,
        io: &mut RunnerIo,
    ) -> Result<RunResult, InterpreterSignal>;
}
