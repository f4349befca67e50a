// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use thiserror::Error;

/// Type alias for a [`Result`] whose error is a [`miette::Report`]. Used at the seams
/// where the engine hands errors to a front-end for display.
pub type CommonResult<T> = miette::Result<T>;

/// An expression could not be evaluated under the safe-evaluation rules (no calls, no
/// side effects). Completion strategies recover from this locally by treating it as "no
/// matches"; it never propagates out of the completion pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("cannot parse a safe expression from {0:?}")]
    Parse(String),

    #[error("name {0:?} is not defined")]
    NameNotDefined(String),

    #[error("subscript target of type `{0}` is not a safe container")]
    UnsafeSubscript(&'static str),

    #[error("operation is not allowed during safe evaluation: {0}")]
    Disallowed(&'static str),

    #[error("`{type_name}` value has no attribute {attr:?}")]
    AttributeNotFound {
        type_name: &'static str,
        attr: String,
    },

    #[error("sequence index out of range")]
    IndexOutOfRange,

    #[error("key not found in dict")]
    KeyNotFound,
}

/// Error returned from [`crate::CodeRunner::run_code`]. The
/// [`RunnerError::ExitRequested`] variant is the distinguished "process exit" signal
/// which the controller must not swallow: it performs final paint / cleanup and then
/// actually terminates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RunnerError {
    #[error("user code requested process exit with code {0}")]
    ExitRequested(i32),

    #[error("code runner task failed: {0}")]
    TaskFailed(String),
}
