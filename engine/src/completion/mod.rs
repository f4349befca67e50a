// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod import_index;
pub mod line_parts;
pub mod match_mode;
pub mod matches_iterator;
pub mod pipeline;
pub mod safe_eval;
pub mod strategies;
pub mod strategy;

// Re-export.
pub use import_index::*;
pub use line_parts::*;
pub use match_mode::*;
pub use matches_iterator::*;
pub use pipeline::*;
pub use safe_eval::*;
pub use strategies::*;
pub use strategy::*;
