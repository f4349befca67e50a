// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use coil_engine::CommonResult;
use tracing_appender::non_blocking::WorkerGuard;

pub const LOG_FILE_NAME: &str = "coil_log.txt";

/// Install a file-backed tracing subscriber. The returned guard must stay alive for
/// the life of the process or buffered log lines are lost.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn try_initialize_logging() -> CommonResult<WorkerGuard> {
    let appender = tracing_appender::rolling::never(".", LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_max_level(tracing::level_filters::LevelFilter::DEBUG)
        .with_ansi(false)
        .try_init()
        .map_err(|error| miette::miette!("failed to init tracing: {error}"))?;
    Ok(guard)
}
