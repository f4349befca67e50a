// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::BTreeSet, path::PathBuf};

use crate::{CompletionContext, CompletionStrategy, LinePart, line_parts};

const PATH_SEP: char = '/';

/// Filename completion inside an open string literal. Candidates carry the directory
/// part exactly as the user typed it (that is the substitution value); [`Self::format`]
/// trims the display down to the trailing path component. Directories get a trailing
/// separator so completion can be chained.
#[derive(Debug, Default)]
pub struct FilenameCompletion;

impl CompletionStrategy for FilenameCompletion {
    fn name(&self) -> &'static str { "filename" }

    fn locate(&self, cursor: usize, line: &str) -> Option<LinePart> {
        line_parts::current_string_literal(cursor, line)
    }

    fn matches(
        &self,
        cursor: usize,
        line: &str,
        ctx: &CompletionContext,
    ) -> Option<BTreeSet<String>> {
        let part = self.locate(cursor, line)?;
        // Only the text left of the cursor counts as the typed path.
        let typed: String = part
            .text
            .chars()
            .take(cursor.saturating_sub(part.start))
            .collect();

        let (dir_part, base) = match typed.rfind(PATH_SEP) {
            Some(at) => (&typed[..=at], &typed[at + 1..]),
            None => ("", typed.as_str()),
        };

        let list_in = resolve_dir(dir_part, ctx);
        let Ok(entries) = std::fs::read_dir(&list_in) else {
            // Inside a string, but nothing to list: applicable with zero matches, which
            // still suppresses lower-priority strategies.
            return Some(BTreeSet::new());
        };

        let mut found = BTreeSet::new();
        for entry in entries.flatten() {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !name.starts_with(base) {
                continue;
            }
            let is_dir = entry.path().is_dir();
            let mut candidate = format!("{dir_part}{name}");
            if is_dir {
                candidate.push(PATH_SEP);
            }
            found.insert(candidate);
        }
        Some(found)
    }

    /// Display just the trailing path component (keeping a directory's trailing
    /// separator). The substitution value is untouched.
    fn format(&self, candidate: &str) -> String {
        let trimmed = candidate.trim_end_matches(PATH_SEP);
        let component = trimmed.rsplit(PATH_SEP).next().unwrap_or(trimmed);
        if candidate.ends_with(PATH_SEP) {
            format!("{component}{PATH_SEP}")
        } else {
            component.to_string()
        }
    }

    fn shown_before_tab(&self) -> bool { false }
}

fn resolve_dir(dir_part: &str, ctx: &CompletionContext) -> PathBuf {
    let expanded = expand_user(dir_part);
    let path = PathBuf::from(expanded.as_str());
    if path.is_absolute() {
        return path;
    }
    match &ctx.cwd {
        Some(cwd) => cwd.join(path),
        None if dir_part.is_empty() => PathBuf::from("."),
        None => path,
    }
}

fn expand_user(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return format!("{}/{rest}", home.to_string_lossy());
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fixture_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "coil_files_{tag}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("database")).unwrap();
        std::fs::write(dir.join("data.txt"), "").unwrap();
        std::fs::write(dir.join("other.log"), "").unwrap();
        dir
    }

    fn ctx_in(dir: &std::path::Path) -> CompletionContext {
        CompletionContext {
            cwd: Some(dir.to_path_buf()),
            ..CompletionContext::default()
        }
    }

    #[test]
    fn test_partial_path_inside_string_literal() {
        let dir = fixture_dir("partial");
        let strategy = FilenameCompletion;

        let line = "open(\"dat";
        let found = strategy.matches(9, line, &ctx_in(&dir)).unwrap();
        let found: Vec<String> = found.into_iter().collect();
        assert_eq!(found, vec!["data.txt", "database/"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_no_hits_is_empty_set_not_inapplicable() {
        let dir = fixture_dir("nohits");
        let strategy = FilenameCompletion;

        let found = strategy.matches(8, "open(\"zz", &ctx_in(&dir));
        assert_eq!(found, Some(BTreeSet::new()));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_outside_string_literal_is_inapplicable() {
        let dir = fixture_dir("outside");
        let strategy = FilenameCompletion;
        assert_eq!(strategy.matches(4, "open", &ctx_in(&dir)), None);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_format_trims_to_trailing_component() {
        let strategy = FilenameCompletion;
        assert_eq!(strategy.format("src/lib.rs"), "lib.rs");
        assert_eq!(strategy.format("src/bin/"), "bin/");
        assert_eq!(strategy.format("data.txt"), "data.txt");
    }
}
