// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{char_len, char_to_byte_index};

/// Bounded depth of each of the undo / redo stacks.
const SNAPSHOT_DEPTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    line: String,
    cursor: usize,
}

/// The line being edited plus a character-offset cursor and snapshot-based undo/redo.
/// All cursor arithmetic is in characters, never bytes; multi-byte input must not
/// corrupt the line.
#[derive(Debug, Default)]
pub struct LineBuffer {
    line: String,
    cursor: usize,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl LineBuffer {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn line(&self) -> &str { &self.line }

    /// Cursor position as a character offset.
    #[must_use]
    pub fn cursor(&self) -> usize { self.cursor }

    /// Replace the whole line and cursor, recording the previous state for undo.
    pub fn set(&mut self, line: impl Into<String>, cursor: usize) {
        self.snapshot();
        self.line = line.into();
        self.cursor = cursor.min(char_len(&self.line));
    }

    pub fn insert(&mut self, ch: char) {
        self.snapshot();
        let at = char_to_byte_index(&self.line, self.cursor);
        self.line.insert(at, ch);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        self.snapshot();
        let at = char_to_byte_index(&self.line, self.cursor);
        self.line.insert_str(at, text);
        self.cursor += char_len(text);
    }

    /// Delete the character left of the cursor, if any.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.snapshot();
        let start = char_to_byte_index(&self.line, self.cursor - 1);
        let stop = char_to_byte_index(&self.line, self.cursor);
        self.line.replace_range(start..stop, "");
        self.cursor -= 1;
    }

    /// Delete the character under the cursor, if any.
    pub fn delete(&mut self) {
        if self.cursor >= char_len(&self.line) {
            return;
        }
        self.snapshot();
        let start = char_to_byte_index(&self.line, self.cursor);
        let stop = char_to_byte_index(&self.line, self.cursor + 1);
        self.line.replace_range(start..stop, "");
    }

    pub fn move_left(&mut self) { self.cursor = self.cursor.saturating_sub(1); }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(char_len(&self.line));
    }

    pub fn move_home(&mut self) { self.cursor = 0; }

    pub fn move_end(&mut self) { self.cursor = char_len(&self.line); }

    /// Clear the line for the next prompt. Editing history does not carry across
    /// lines, so the snapshot stacks reset too.
    pub fn reset(&mut self) {
        self.line.clear();
        self.cursor = 0;
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo(&mut self) {
        if let Some(snapshot) = self.undo_stack.pop() {
            self.redo_stack.push(Snapshot {
                line: std::mem::replace(&mut self.line, snapshot.line),
                cursor: std::mem::replace(&mut self.cursor, snapshot.cursor),
            });
        }
    }

    pub fn redo(&mut self) {
        if let Some(snapshot) = self.redo_stack.pop() {
            self.undo_stack.push(Snapshot {
                line: std::mem::replace(&mut self.line, snapshot.line),
                cursor: std::mem::replace(&mut self.cursor, snapshot.cursor),
            });
        }
    }

    /// Record the current state on the undo stack. Any edit invalidates the redo
    /// stack.
    fn snapshot(&mut self) {
        if self.undo_stack.len() == SNAPSHOT_DEPTH {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(Snapshot {
            line: self.line.clone(),
            cursor: self.cursor,
        });
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_and_delete_are_char_based() {
        let mut buffer = LineBuffer::new();
        buffer.insert_str("héllo");
        assert_eq!(buffer.cursor(), 5);
        buffer.move_left();
        buffer.move_left();
        buffer.move_left();
        buffer.move_left();
        buffer.delete();
        assert_eq!(buffer.line(), "hllo");
        buffer.insert('é');
        assert_eq!(buffer.line(), "héllo");
        assert_eq!(buffer.cursor(), 2);
    }

    #[test]
    fn test_undo_redo_roundtrip() {
        let mut buffer = LineBuffer::new();
        buffer.insert_str("abc");
        buffer.insert_str("def");
        assert_eq!(buffer.line(), "abcdef");
        buffer.undo();
        assert_eq!(buffer.line(), "abc");
        buffer.undo();
        assert_eq!(buffer.line(), "");
        buffer.redo();
        assert_eq!(buffer.line(), "abc");
        buffer.redo();
        assert_eq!(buffer.line(), "abcdef");
        assert_eq!(buffer.cursor(), 6);
    }

    #[test]
    fn test_edit_invalidates_redo() {
        let mut buffer = LineBuffer::new();
        buffer.insert_str("abc");
        buffer.undo();
        buffer.insert_str("xyz");
        buffer.redo();
        assert_eq!(buffer.line(), "xyz");
    }

    #[test]
    fn test_snapshot_depth_is_bounded() {
        let mut buffer = LineBuffer::new();
        for _ in 0..(SNAPSHOT_DEPTH + 20) {
            buffer.insert('a');
        }
        for _ in 0..(SNAPSHOT_DEPTH + 20) {
            buffer.undo();
        }
        // The oldest 20 edits fell off the stack.
        assert_eq!(buffer.line().chars().count(), 20);
    }
}
