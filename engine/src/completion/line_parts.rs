// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Pure functions that locate the sub-span of the current line relevant to a particular
//! kind of completion. All offsets are character offsets. Every locator returns [`None`]
//! when the cursor is not inside (or immediately after) a matching span; none of them
//! ever panic, even for an empty line or a cursor at offset 0.

use crate::InlineVec;

/// An immutable span within the current input line.
///
/// Invariant: `0 <= start <= stop <= char_len(line)`. Produced fresh per query, never
/// mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinePart {
    /// Character offset of the first character of the span.
    pub start: usize,
    /// Character offset one past the last character of the span.
    pub stop: usize,
    pub text: String,
}

impl LinePart {
    #[must_use]
    pub fn new(start: usize, stop: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        debug_assert!(start <= stop, "LinePart start must not exceed stop");
        Self { start, stop, text }
    }
}

fn is_word_char(ch: char) -> bool { ch.is_alphanumeric() || ch == '_' }

fn is_dotted_char(ch: char) -> bool { is_word_char(ch) || ch == '.' }

fn clamp_cursor(cursor: usize, chars: &[char]) -> usize { cursor.min(chars.len()) }

fn span_text(chars: &[char], start: usize, stop: usize) -> String {
    chars[start..stop].iter().collect()
}

/// Expand from `cursor` over characters satisfying `pred`: left to the span start, right
/// to the span end. Returns [`None`] when the character immediately left of the cursor
/// does not satisfy `pred` (the cursor must be inside or abut the span on its right).
fn expand(
    cursor: usize,
    chars: &[char],
    pred: impl Fn(char) -> bool,
) -> Option<(usize, usize)> {
    let cursor = clamp_cursor(cursor, chars);
    if cursor == 0 || !pred(chars[cursor - 1]) {
        return None;
    }
    let mut start = cursor;
    while start > 0 && pred(chars[start - 1]) {
        start -= 1;
    }
    let mut stop = cursor;
    while stop < chars.len() && pred(chars[stop]) {
        stop += 1;
    }
    Some((start, stop))
}

/// The bare identifier under or immediately left of the cursor.
#[must_use]
pub fn current_word(cursor: usize, line: &str) -> Option<LinePart> {
    let chars: InlineVec<char> = line.chars().collect();
    let (start, stop) = expand(cursor, &chars, is_word_char)?;
    Some(LinePart::new(start, stop, span_text(&chars, start, stop)))
}

/// Like [`current_word`], but when no word abuts the cursor it returns an empty span at
/// the cursor position. Used by parameter-name completion, where "nothing typed yet" is
/// a valid query.
#[must_use]
pub fn current_word_or_empty(cursor: usize, line: &str) -> LinePart {
    current_word(cursor, line).unwrap_or_else(|| {
        let cursor = cursor.min(line.chars().count());
        LinePart::new(cursor, cursor, "")
    })
}

/// The dotted attribute chain (`foo.bar.b`) under or immediately left of the cursor.
/// Must contain at least one dot and must not start with a digit (so `1.5` is a number,
/// not an attribute access). A trailing dot with nothing after it is a valid span:
/// `foo.` completes every visible attribute of `foo`.
#[must_use]
pub fn current_dotted_attribute(cursor: usize, line: &str) -> Option<LinePart> {
    let chars: InlineVec<char> = line.chars().collect();
    let (mut start, stop) = expand(cursor, &chars, is_dotted_char)?;
    while start < stop && chars[start] == '.' {
        start += 1;
    }
    if start >= stop {
        return None;
    }
    let first = chars[start];
    if first.is_ascii_digit() {
        return None;
    }
    let text = span_text(&chars, start, stop);
    if !text.contains('.') {
        return None;
    }
    Some(LinePart::new(start, stop, text))
}

/// The partial attribute name immediately right of a dot, for static-analysis
/// completion. Unlike [`current_dotted_attribute`] the expression left of the dot is
/// unconstrained (it may contain calls or subscripts the analyzer understands), so the
/// span covers only the partial name. Empty when the cursor sits right after the dot.
#[must_use]
pub fn current_expression_attribute(cursor: usize, line: &str) -> Option<LinePart> {
    let chars: InlineVec<char> = line.chars().collect();
    let cursor = clamp_cursor(cursor, &chars);
    if cursor == 0 {
        return None;
    }
    let mut start = cursor;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    if start == 0 || chars[start - 1] != '.' || start == 1 {
        return None;
    }
    let mut stop = cursor;
    while stop < chars.len() && is_word_char(chars[stop]) {
        stop += 1;
    }
    Some(LinePart::new(start, stop, span_text(&chars, start, stop)))
}

/// The contents of the string literal the cursor is inside of. The span covers the
/// contents only (quotes excluded). An unterminated string extends to the end of the
/// line. Unlike the word locators, a cursor immediately after the opening quote is a
/// match with empty text: `open("` should list the whole directory.
#[must_use]
pub fn current_string_literal(cursor: usize, line: &str) -> Option<LinePart> {
    let chars: InlineVec<char> = line.chars().collect();
    let cursor = clamp_cursor(cursor, &chars);

    let mut index = 0;
    while index < chars.len() {
        let ch = chars[index];
        if ch == '"' || ch == '\'' {
            let quote = ch;
            let content_start = index + 1;
            let mut stop = content_start;
            let mut escaped = false;
            let mut closed = false;
            while stop < chars.len() {
                let inner = chars[stop];
                if escaped {
                    escaped = false;
                } else if inner == '\\' {
                    escaped = true;
                } else if inner == quote {
                    closed = true;
                    break;
                }
                stop += 1;
            }
            if content_start <= cursor && cursor <= stop {
                return Some(LinePart::new(
                    content_start,
                    stop,
                    span_text(&chars, content_start, stop),
                ));
            }
            index = if closed { stop + 1 } else { chars.len() };
        } else {
            index += 1;
        }
    }
    None
}

/// The partial dict key inside `obj[`: everything between the opening bracket and the
/// cursor, which may be empty (`d[` completes every key). Applicable only when the
/// bracket is a subscript (preceded by a word character) and no closing bracket sits
/// between it and the cursor.
#[must_use]
pub fn current_dict_key(cursor: usize, line: &str) -> Option<LinePart> {
    let chars: InlineVec<char> = line.chars().collect();
    let cursor = clamp_cursor(cursor, &chars);

    let key_char = |ch: char| {
        is_dotted_char(ch)
            || matches!(ch, '(' | ')' | ',' | ' ' | '\'' | '"' | '-' | '+')
    };

    let mut index = cursor;
    while index > 0 && key_char(chars[index - 1]) {
        index -= 1;
    }
    if index == 0 || chars[index - 1] != '[' {
        return None;
    }
    let bracket = index - 1;
    if bracket == 0 || !is_word_char(chars[bracket - 1]) {
        return None;
    }
    Some(LinePart::new(index, cursor, span_text(&chars, index, cursor)))
}

/// The dotted expression whose subscript bracket opens at character offset `bracket`
/// (exclusive). Companion to [`current_dict_key`]: given the key span it locates the
/// container expression to hand to the safe evaluator.
#[must_use]
pub fn subscript_target(bracket: usize, line: &str) -> Option<String> {
    let chars: InlineVec<char> = line.chars().collect();
    if bracket > chars.len() {
        return None;
    }
    let mut start = bracket;
    while start > 0 && is_dotted_char(chars[start - 1]) {
        start -= 1;
    }
    if start == bracket {
        return None;
    }
    Some(span_text(&chars, start, bracket))
}

/// The module-name span on an `import` / `from` line. Returns an empty span at the
/// cursor when the cursor sits right after `import ` / `from ` with nothing typed yet.
/// Not applicable when the cursor is still inside the keyword itself.
#[must_use]
pub fn current_import_target(cursor: usize, line: &str) -> Option<LinePart> {
    let chars: InlineVec<char> = line.chars().collect();
    let cursor = clamp_cursor(cursor, &chars);

    let trimmed = line.trim_start();
    let lead_ws = line.chars().count() - trimmed.chars().count();
    let keyword_len = if trimmed.starts_with("import ") || trimmed == "import" {
        "import".len()
    } else if trimmed.starts_with("from ") || trimmed == "from" {
        "from".len()
    } else {
        return None;
    };
    // Cursor must be past the keyword and the space after it.
    if cursor <= lead_ws + keyword_len {
        return None;
    }

    let chars_ref = &chars;
    expand(cursor, chars_ref, is_dotted_char).map_or_else(
        || Some(LinePart::new(cursor, cursor, "")),
        |(start, stop)| Some(LinePart::new(start, stop, span_text(chars_ref, start, stop))),
    )
}

/// The method name in a `def name` method definition, used for magic-method completion
/// inside class bodies. The cursor must be inside or immediately after the name (or
/// right after `def ` when the name is still empty).
#[must_use]
pub fn current_method_definition_name(cursor: usize, line: &str) -> Option<LinePart> {
    let chars: InlineVec<char> = line.chars().collect();
    let cursor = clamp_cursor(cursor, &chars);

    let trimmed = line.trim_start();
    if !(trimmed.starts_with("def ") || trimmed == "def") {
        return None;
    }
    let lead_ws = line.chars().count() - trimmed.chars().count();
    let mut name_start = lead_ws + "def".len();
    while name_start < chars.len() && chars[name_start] == ' ' {
        name_start += 1;
    }
    let mut name_stop = name_start;
    while name_stop < chars.len() && is_word_char(chars[name_stop]) {
        name_stop += 1;
    }
    if cursor < name_start || cursor > name_stop {
        return None;
    }
    Some(LinePart::new(
        name_start,
        name_stop,
        span_text(&chars, name_start, name_stop),
    ))
}

/// The callee of the innermost unclosed call the cursor is inside of, together with the
/// character offset of its opening parenthesis. Used by parameter-name completion.
#[must_use]
pub fn current_callable(cursor: usize, line: &str) -> Option<(LinePart, usize)> {
    let chars: InlineVec<char> = line.chars().collect();
    let cursor = clamp_cursor(cursor, &chars);

    let mut paren_depth = 0_i32;
    let mut open_paren = None;
    for index in (0..cursor).rev() {
        match chars[index] {
            ')' => paren_depth += 1,
            '(' => {
                if paren_depth == 0 {
                    open_paren = Some(index);
                    break;
                }
                paren_depth -= 1;
            }
            _ => {}
        }
    }
    let open_paren = open_paren?;

    let mut start = open_paren;
    while start > 0 && is_dotted_char(chars[start - 1]) {
        start -= 1;
    }
    if start == open_paren || chars[start].is_ascii_digit() {
        return None;
    }
    Some((
        LinePart::new(start, open_paren, span_text(&chars, start, open_paren)),
        open_paren,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("", 0; "empty line")]
    #[test_case("foo bar", 0; "cursor at offset zero")]
    #[test_case("foo bar", 4; "cursor between words on a space")]
    #[test_case("  ", 1; "only whitespace")]
    fn test_word_locators_return_none_outside_spans(line: &str, cursor: usize) {
        assert_eq!(current_word(cursor, line), None);
        assert_eq!(current_dotted_attribute(cursor, line), None);
        assert_eq!(current_dict_key(cursor, line), None);
        assert_eq!(current_expression_attribute(cursor, line), None);
        assert_eq!(current_method_definition_name(cursor, line), None);
        assert_eq!(current_import_target(cursor, line), None);
        assert_eq!(current_string_literal(cursor, line), None);
    }

    #[test]
    fn test_current_word_mid_word_extends_both_ways() {
        let part = current_word(3, "print(value)").unwrap();
        assert_eq!(part, LinePart::new(0, 5, "print"));
        // Cursor in the middle of "value".
        let part = current_word(8, "print(value)").unwrap();
        assert_eq!(part, LinePart::new(6, 11, "value"));
    }

    #[test]
    fn test_current_word_picks_span_abutting_cursor_not_first_match() {
        // Both "foo" and "bar" are words; the locator must return the one at the
        // cursor, never the first textual match in the line.
        let part = current_word(7, "foo bar").unwrap();
        assert_eq!(part, LinePart::new(4, 7, "bar"));
    }

    #[test]
    fn test_current_dotted_attribute() {
        let part = current_dotted_attribute(5, "foo.b").unwrap();
        assert_eq!(part, LinePart::new(0, 5, "foo.b"));

        let part = current_dotted_attribute(4, "foo.").unwrap();
        assert_eq!(part, LinePart::new(0, 4, "foo."));

        // A plain word is not a dotted attribute.
        assert_eq!(current_dotted_attribute(3, "foo"), None);
        // A float literal is not a dotted attribute.
        assert_eq!(current_dotted_attribute(3, "1.5"), None);
    }

    #[test]
    fn test_current_string_literal() {
        let part = current_string_literal(9, "open(\"dat").unwrap();
        assert_eq!(part, LinePart::new(6, 9, "dat"));

        // Cursor right after the opening quote: empty span, still applicable.
        let part = current_string_literal(6, "open(\"").unwrap();
        assert_eq!(part, LinePart::new(6, 6, ""));

        // Closed string, cursor inside.
        let part = current_string_literal(8, "open('data')").unwrap();
        assert_eq!(part, LinePart::new(6, 10, "data"));

        // Cursor outside any string.
        assert_eq!(current_string_literal(4, "open('data')"), None);
    }

    #[test]
    fn test_current_dict_key() {
        let part = current_dict_key(7, "d['ke").unwrap();
        assert_eq!(part, LinePart::new(2, 5, "'ke"));

        let part = current_dict_key(2, "d[").unwrap();
        assert_eq!(part, LinePart::new(2, 2, ""));

        // Subscript already closed.
        assert_eq!(current_dict_key(8, "d['key']"), None);
        // Bare bracket is a list literal, not a subscript.
        assert_eq!(current_dict_key(1, "['"), None);
    }

    #[test]
    fn test_subscript_target() {
        assert_eq!(subscript_target(1, "d['ke"), Some("d".to_string()));
        assert_eq!(subscript_target(8, "foo.bars['"), Some("foo.bars".to_string()));
        assert_eq!(subscript_target(0, "['"), None);
    }

    #[test]
    fn test_current_import_target() {
        let part = current_import_target(9, "import os").unwrap();
        assert_eq!(part, LinePart::new(7, 9, "os"));

        let part = current_import_target(7, "import ").unwrap();
        assert_eq!(part, LinePart::new(7, 7, ""));

        let part = current_import_target(7, "from co").unwrap();
        assert_eq!(part, LinePart::new(5, 7, "co"));

        // Cursor inside the keyword itself.
        assert_eq!(current_import_target(3, "import os"), None);
        // Not an import line at all.
        assert_eq!(current_import_target(4, "x = 1"), None);
    }

    #[test]
    fn test_current_method_definition_name() {
        let part = current_method_definition_name(10, "    def __i").unwrap();
        assert_eq!(part, LinePart::new(8, 11, "__i"));

        let part = current_method_definition_name(8, "    def ").unwrap();
        assert_eq!(part, LinePart::new(8, 8, ""));

        assert_eq!(current_method_definition_name(5, "x = 1"), None);
    }

    #[test]
    fn test_current_expression_attribute() {
        let part = current_expression_attribute(10, "foo(1).ba").unwrap();
        assert_eq!(part, LinePart::new(7, 9, "ba"));

        let part = current_expression_attribute(7, "foo(1).").unwrap();
        assert_eq!(part, LinePart::new(7, 7, ""));

        assert_eq!(current_expression_attribute(3, "foo"), None);
    }

    #[test]
    fn test_current_callable() {
        let (callee, open_paren) = current_callable(10, "print(val").unwrap();
        assert_eq!(callee, LinePart::new(0, 5, "print"));
        assert_eq!(open_paren, 5);

        let (callee, _) = current_callable(12, "foo.bar(1, x").unwrap();
        assert_eq!(callee.text, "foo.bar");

        // Nested call: the innermost unclosed paren wins.
        let (callee, _) = current_callable(10, "outer(inn(").unwrap();
        assert_eq!(callee.text, "inn");

        assert_eq!(current_callable(3, "foo"), None);
    }

    #[test]
    fn test_locators_clamp_out_of_range_cursor() {
        assert_eq!(
            current_word(99, "foo").unwrap(),
            LinePart::new(0, 3, "foo")
        );
    }
}
