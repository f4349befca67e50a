// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod attr;
pub mod dict_key;
pub mod filename;
pub mod global;
pub mod import;
pub mod magic_method;
pub mod parameter;
pub mod static_attr;

// Re-export.
pub use attr::*;
pub use dict_key::*;
pub use filename::*;
pub use global::*;
pub use import::*;
pub use magic_method::*;
pub use parameter::*;
pub use static_attr::*;
