// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use smallvec::SmallVec;

/// Type alias for structs that are shared between tasks, where the lock does not need to
/// be held across `.await` points.
pub type StdMutex<T> = std::sync::Mutex<T>;

/// Stack allocated list, that can [`smallvec::SmallVec::spilled`] into the heap if it
/// gets larger than [`INLINE_VEC_SIZE`].
pub type InlineVec<T> = SmallVec<[T; INLINE_VEC_SIZE]>;
pub const INLINE_VEC_SIZE: usize = 8;

/// Simple macro to create a [`Result`] with an [`Ok`] variant. It is just syntactic sugar
/// that helps having to write `Ok(())`.
/// - If no arg is passed in then it will return `Ok(())`.
/// - If an arg is passed in then it will return `Ok($arg)`.
#[macro_export]
macro_rules! ok {
    // No args.
    () => {
        Ok(())
    };
    // With arg.
    ($value:expr) => {
        Ok($value)
    };
}

/// Convert a character offset into a byte offset for `line`. Offsets past the end of the
/// line clamp to `line.len()`.
#[must_use]
pub fn char_to_byte_index(line: &str, char_offset: usize) -> usize {
    line.char_indices()
        .map(|(byte_index, _)| byte_index)
        .chain(std::iter::once(line.len()))
        .nth(char_offset)
        .unwrap_or(line.len())
}

/// Number of characters in `line`. The cursor arithmetic in this crate is all performed
/// in character offsets, not byte offsets.
#[must_use]
pub fn char_len(line: &str) -> usize { line.chars().count() }
