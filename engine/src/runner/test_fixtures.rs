// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Scripted [`Interpreter`] used by runner and repl tests. Each constructor names the
//! behavior it fakes; the script is consumed once per `run`.

use crate::{Interpreter, InterpreterSignal, RunResult, RunnerIo};

#[derive(Debug, Clone)]
enum FakeStep {
    Write(String),
    ReadThenEcho,
}

#[derive(Debug, Clone)]
pub struct FakeInterpreter {
    script: Vec<FakeStep>,
    result: Result<RunResult, InterpreterSignal>,
}

impl FakeInterpreter {
    /// Computes silently and completes.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            script: Vec::new(),
            result: Ok(RunResult::Complete),
        }
    }

    /// Writes each chunk of output in order, then completes.
    #[must_use]
    pub fn writes(chunks: &[&str]) -> Self {
        Self {
            script: chunks
                .iter()
                .map(|chunk| FakeStep::Write((*chunk).to_string()))
                .collect(),
            result: Ok(RunResult::Complete),
        }
    }

    /// Reads one line of input, writes it back out, then completes.
    #[must_use]
    pub fn reads_then_echoes() -> Self {
        Self {
            script: vec![FakeStep::ReadThenEcho],
            result: Ok(RunResult::Complete),
        }
    }

    /// Reports the buffer as a valid-but-incomplete statement.
    #[must_use]
    pub fn unfinished() -> Self {
        Self {
            script: Vec::new(),
            result: Ok(RunResult::MoreInputNeeded),
        }
    }

    /// Requests process termination with the given status code.
    #[must_use]
    pub fn exits(code: i32) -> Self {
        Self {
            script: Vec::new(),
            result: Err(InterpreterSignal::ExitRequested(code)),
        }
    }
}

impl Interpreter for FakeInterpreter {
    fn run(
        &mut self,
        _source: &str,
        io: &mut RunnerIo,
    ) -> Result<RunResult, InterpreterSignal> {
        for step in self.script.clone() {
            match step {
                FakeStep::Write(text) => io.write(&text)?,
                FakeStep::ReadThenEcho => {
                    if let Some(line) = io.read_line()? {
                        io.write(&line)?;
                    }
                }
            }
        }
        self.result.clone()
    }
}
