// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod eval;
pub mod parser;

// Re-export.
pub use eval::*;
pub use parser::*;
