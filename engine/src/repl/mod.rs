// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod engine;
pub mod line_buffer;

// Re-export.
pub use engine::*;
pub use line_buffer::*;
