// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod code_runner;
pub mod interpreter;
pub mod io_bridge;
pub mod test_fixtures;

// Re-export.
pub use code_runner::*;
pub use interpreter::*;
pub use io_bridge::*;
pub use test_fixtures::*;
