// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::PathBuf;

use clap::{Args, Parser};
use coil_engine::MatchMode;

/// More info: <https://docs.rs/clap/latest/clap/_derive/_tutorial/chapter_2/index.html>
#[derive(Debug, Parser)]
#[command(bin_name = "coil")]
#[command(about = "🌀 Interactive console with syntax-aware completion")]
#[command(version)]
#[command(next_line_help = true)]
#[command(arg_required_else_help(false))]
pub struct CLIArg {
    #[arg(
        name = "scan paths",
        help = "Directories to scan (in the background) for importable module names"
    )]
    pub scan_paths: Vec<PathBuf>,

    #[arg(
        long,
        short = 'm',
        default_value = "prefix",
        help = "Candidate matching: prefix, substring, fuzzy, or disabled"
    )]
    pub match_mode: MatchMode,

    #[command(flatten)]
    pub global_options: GlobalOption,
}

#[derive(Debug, Args)]
pub struct GlobalOption {
    #[arg(
        global = true,
        long,
        short = 'l',
        help = "Log app output to a file named `coil_log.txt` for debugging."
    )]
    pub enable_logging: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_match_mode_parses_from_flag() {
        let cli_arg = CLIArg::parse_from(["coil", "--match-mode", "fuzzy"]);
        assert_eq!(cli_arg.match_mode, MatchMode::Fuzzy);
    }

    #[test]
    fn test_defaults() {
        let cli_arg = CLIArg::parse_from(["coil"]);
        assert_eq!(cli_arg.match_mode, MatchMode::Prefix);
        assert!(cli_arg.scan_paths.is_empty());
        assert!(!cli_arg.global_options.enable_logging);
    }
}
