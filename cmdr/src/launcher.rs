// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::{BufRead, Write},
          sync::Arc};

use coil_engine::{CommonResult, CompletionStrategy, ModuleIndex, ModuleScanner,
                  PushResult, ReplEngine, RunnerError, new_namespace,
                  spawn_background_scan};
use miette::IntoDiagnostic;

use crate::{CLIArg, CalcInterpreter, SimpleTokenizer};

/// Run the read-eval loop until end-of-input or an exit request. Returns the process
/// exit code.
///
/// # Errors
///
/// I/O failures on the console propagate as diagnostics.
pub async fn run(cli_arg: CLIArg) -> CommonResult<i32> {
    let namespace = new_namespace();
    let mut engine = ReplEngine::new(
        Box::new(CalcInterpreter::new(namespace.clone())),
        namespace,
    );
    engine.tokenizer = Some(Arc::new(SimpleTokenizer));
    engine.match_mode = cli_arg.match_mode;
    engine.cwd = std::env::current_dir().ok();

    // Module discovery runs in the background; completion queries use whatever part
    // of the index exists at the time they run.
    let background_scan = if cli_arg.scan_paths.is_empty() {
        None
    } else {
        let index = Arc::new(ModuleIndex::new());
        engine.module_index = Some(index.clone());
        tracing::debug!(paths = cli_arg.scan_paths.len(), "starting module scan");
        Some(spawn_background_scan(ModuleScanner::new(
            index,
            cli_arg.scan_paths.clone(),
        )))
    };

    engine.set_refresh_callback(|text| {
        print!("{text}");
        let _ = std::io::stdout().flush();
    });
    engine.set_input_provider(|| {
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
        }
    });

    let interrupt_handle = engine.interrupt_handle();
    let signal_task = tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            interrupt_handle.interrupt();
        }
    });

    let mut continuing = false;
    let exit_code = loop {
        print!("{}", if continuing { "... " } else { ">>> " });
        std::io::stdout().flush().into_diagnostic()?;

        let mut line = String::new();
        let read = std::io::stdin()
            .lock()
            .read_line(&mut line)
            .into_diagnostic()?;
        if read == 0 {
            break 0;
        }
        let line = line.trim_end_matches(['\n', '\r']).to_string();

        if let Some(meta) = line.strip_prefix(':') {
            run_meta_command(&mut engine, meta);
            continue;
        }

        match engine.push(&line).await {
            Ok(PushResult::Complete) => continuing = false,
            Ok(PushResult::MoreInput) => continuing = true,
            Ok(PushResult::Interrupted) => {
                println!("KeyboardInterrupt");
                continuing = false;
            }
            Err(RunnerError::ExitRequested(code)) => break code,
            Err(error) => {
                tracing::error!(%error, "runner task failed");
                return Err(miette::miette!("{error}"));
            }
        }
    };

    signal_task.abort();
    if let Some(scan) = background_scan {
        scan.request_shutdown();
        scan.await_shutdown().await;
    }
    Ok(exit_code)
}

/// Colon-prefixed commands drive the parts of the engine a plain line-based console
/// cannot reach (there is no raw-mode Tab key here).
fn run_meta_command(engine: &mut ReplEngine, meta: &str) {
    let (command, rest) = match meta.split_once(' ') {
        Some((command, rest)) => (command, rest),
        None => (meta, ""),
    };
    match command {
        // `:c open("dat` lists what Tab would offer at the end of that line.
        "c" | "complete" => {
            let lines = completion_lines(engine, rest);
            if lines.is_empty() {
                println!("(no completions)");
            } else {
                for line in lines {
                    println!("{line}");
                }
            }
        }
        "mode" => match rest.parse() {
            Ok(mode) => engine.match_mode = mode,
            Err(_) => println!("unknown match mode: {rest}"),
        },
        "index" => match engine.module_index.as_ref() {
            Some(index) => println!(
                "{} modules indexed{}",
                index.len(),
                if index.scan_complete() { "" } else { " (scan running)" }
            ),
            None => println!("module scanning is off; pass scan paths at startup"),
        },
        _ => println!("unknown command: :{command}"),
    }
}

/// What Tab would offer at the end of `text`, one display line per candidate. Each
/// candidate goes through the producing strategy's `format`, so a filename candidate
/// shows its trailing path component rather than the full typed path.
fn completion_lines(engine: &mut ReplEngine, text: &str) -> Vec<String> {
    engine.buffer_mut().reset();
    engine.buffer_mut().insert_str(text);
    if !engine.complete(true) {
        engine.buffer_mut().reset();
        return Vec::new();
    }
    let strategy = engine.selected_strategy().cloned();
    let lines = engine
        .matches()
        .iter()
        .map(|candidate| match strategy.as_ref() {
            Some(strategy) => strategy.format(candidate),
            None => candidate.clone(),
        })
        .collect();
    engine.buffer_mut().reset();
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_complete_meta_formats_filename_candidates() {
        let dir = std::env::temp_dir().join(format!("coil_meta_{}", std::process::id()));
        std::fs::create_dir_all(dir.join("sub")).unwrap();
        std::fs::write(dir.join("sub").join("data.txt"), b"").unwrap();

        let namespace = new_namespace();
        let mut engine = ReplEngine::new(
            Box::new(CalcInterpreter::new(namespace.clone())),
            namespace,
        );
        engine.cwd = Some(dir.clone());

        // The candidate is "sub/data.txt"; the listing shows only "data.txt".
        let lines = completion_lines(&mut engine, "open('sub/da");
        assert_eq!(lines, vec!["data.txt".to_string()]);
        assert_eq!(engine.buffer().line(), "");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
