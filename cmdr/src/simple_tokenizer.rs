// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use coil_engine::{Token, TokenKind, Tokenizer, is_keyword};

/// Single-pass tokenizer covering just enough lexical structure for the engine's
/// class-body and import-line detection. No lookahead, no error states; anything
/// unrecognized becomes [`TokenKind::Other`].
#[derive(Debug, Default)]
pub struct SimpleTokenizer;

impl Tokenizer for SimpleTokenizer {
    fn tokenize(&self, source: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let chars: Vec<char> = source.chars().collect();
        let mut index = 0;
        while index < chars.len() {
            let ch = chars[index];
            let start = index;
            let kind = if ch == '\n' {
                index += 1;
                TokenKind::Newline
            } else if ch.is_whitespace() {
                while index < chars.len()
                    && chars[index].is_whitespace()
                    && chars[index] != '\n'
                {
                    index += 1;
                }
                TokenKind::Whitespace
            } else if ch == '#' {
                while index < chars.len() && chars[index] != '\n' {
                    index += 1;
                }
                TokenKind::Comment
            } else if ch == '\'' || ch == '"' {
                index += 1;
                while index < chars.len() && chars[index] != ch {
                    index += 1;
                }
                if index < chars.len() {
                    index += 1;
                }
                TokenKind::Str
            } else if ch.is_ascii_digit() {
                while index < chars.len()
                    && (chars[index].is_ascii_alphanumeric() || chars[index] == '.')
                {
                    index += 1;
                }
                TokenKind::Number
            } else if ch.is_alphanumeric() || ch == '_' {
                while index < chars.len()
                    && (chars[index].is_alphanumeric() || chars[index] == '_')
                {
                    index += 1;
                }
                let text: String = chars[start..index].iter().collect();
                let kind = if is_keyword(&text) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Name
                };
                tokens.push(Token::new(kind, text));
                continue;
            } else if matches!(ch, '(' | ')' | '[' | ']' | '{' | '}' | ',' | ':') {
                index += 1;
                TokenKind::Punctuation
            } else if matches!(
                ch,
                '+' | '-' | '*' | '/' | '%' | '=' | '<' | '>' | '!' | '.' | '&' | '|'
                    | '^' | '~' | '@'
            ) {
                while index < chars.len()
                    && matches!(
                        chars[index],
                        '+' | '-' | '*' | '/' | '%' | '=' | '<' | '>' | '!' | '.'
                            | '&' | '|' | '^' | '~' | '@'
                    )
                {
                    index += 1;
                }
                TokenKind::Operator
            } else {
                index += 1;
                TokenKind::Other
            };
            let text: String = chars[start..index].iter().collect();
            tokens.push(Token::new(kind, text));
        }
        tokens
    }
}
