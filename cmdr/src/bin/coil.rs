// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use clap::Parser;
use coil_cmdr::{CLIArg, launcher, try_initialize_logging};
use coil_engine::CommonResult;

#[tokio::main]
async fn main() -> CommonResult<()> {
    let cli_arg = CLIArg::parse();

    let _log_guard = if cli_arg.global_options.enable_logging {
        let guard = try_initialize_logging()?;
        // % is Display, ? is Debug.
        tracing::debug!(message = "Start logging...", cli_arg = ?cli_arg);
        Some(guard)
    } else {
        None
    };

    let exit_code = launcher::run(cli_arg).await?;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
