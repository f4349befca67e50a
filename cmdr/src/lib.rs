// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Console front-end for the `coil_engine` REPL core. Ships a small expression
//! interpreter and tokenizer so every engine collaborator trait has a working
//! implementation, plus the clap / tracing plumbing around the read-eval loop.

// Attach sources.
pub mod calc_interpreter;
pub mod clap_config;
pub mod launcher;
pub mod log_support;
pub mod simple_tokenizer;

// Re-export.
pub use calc_interpreter::*;
pub use clap_config::*;
pub use log_support::*;
pub use simple_tokenizer::*;
