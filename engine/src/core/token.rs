// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Closed set of token kinds the engine cares about. The engine never tokenizes source
/// itself; it only asks an externally supplied [`Tokenizer`] for a token stream and then
/// pattern matches on this enum (class-body detection for magic-method completion,
/// import-clause detection). Anything the tokenizer cannot classify lands in
/// [`TokenKind::Other`], which every consumer must treat as "no special meaning".
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum TokenKind {
    Keyword,
    Name,
    Number,
    Str,
    Operator,
    Punctuation,
    Comment,
    Whitespace,
    Newline,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == word
    }
}

/// Opaque tokenizer collaborator. Implementations live outside the engine (the `coil`
/// binary ships a minimal one).
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, source: &str) -> Vec<Token>;
}

/// Keywords of the embedded language. Used by global completion and by the simple
/// import-line detection.
pub const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from",
    "global", "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass",
    "raise", "return", "try", "while", "with", "yield",
];

#[must_use]
pub fn is_keyword(word: &str) -> bool { KEYWORDS.contains(&word) }
