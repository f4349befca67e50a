// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod common;
pub mod error;
pub mod token;
pub mod value;

// Re-export.
pub use common::*;
pub use error::*;
pub use token::*;
pub use value::*;
