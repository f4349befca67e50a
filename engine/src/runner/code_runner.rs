// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::{Arc, atomic::{AtomicBool, Ordering}};

use tokio::{sync::mpsc, task::JoinHandle};

use crate::{Interpreter, InterpreterSignal, Resume, RunResult, RunnerError, RunnerIo,
            TaskEvent, ok};

/// What one `run_code` pump reported back to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpOutcome {
    /// The run suspended again (output was routed, or input is awaited). Keep pumping.
    Suspended,
    /// The buffer executed to completion.
    Done,
    /// The buffer is a valid but incomplete statement; collect more lines first.
    Unfinished,
    /// The run was torn down by an interrupt.
    Interrupted,
}

type TaskResult = (Box<dyn Interpreter>, Result<RunResult, InterpreterSignal>);

/// Cloneable handle for delivering interrupts from another task (e.g. a Ctrl-C signal
/// listener) without borrowing the runner.
#[derive(Debug, Clone)]
pub struct InterruptHandle {
    latch: Arc<AtomicBool>,
}

impl InterruptHandle {
    pub fn interrupt(&self) { self.latch.store(true, Ordering::SeqCst); }
}

struct InFlight {
    event_rx: mpsc::Receiver<TaskEvent>,
    resume_tx: mpsc::Sender<Resume>,
    join: JoinHandle<TaskResult>,
}

/// Runs one source buffer at a time against the interpreter on a blocking worker, with
/// the worker suspending back to the controller at every console read or write. The
/// controller drives the run by calling [`CodeRunner::run_code`] repeatedly; between
/// pumps the worker is parked on a channel, so controller and user code never execute
/// logic at the same time.
#[allow(missing_debug_implementations)]
pub struct CodeRunner {
    /// Present while idle; handed to the worker for the duration of a run.
    interpreter: Option<Box<dyn Interpreter>>,
    source: Option<String>,
    in_flight: Option<InFlight>,
    /// Set by [`CodeRunner::interrupt`]; consumed at the next suspension point (or at
    /// the next pump, whichever comes first). Never silently dropped.
    pending_interrupt: Arc<AtomicBool>,
    on_refresh: Option<Box<dyn FnMut(&str) + Send>>,
    /// True when the most recent suspension was a `WaitInput`, i.e. the next pump
    /// should carry a resumption value.
    awaiting_input: bool,
}

impl CodeRunner {
    #[must_use]
    pub fn new(interpreter: Box<dyn Interpreter>) -> Self {
        Self {
            interpreter: Some(interpreter),
            source: None,
            in_flight: None,
            pending_interrupt: Arc::new(AtomicBool::new(false)),
            on_refresh: None,
            awaiting_input: false,
        }
    }

    /// Register the callback invoked whenever the running code produces output and the
    /// display must be redrawn before the run continues.
    pub fn set_refresh_callback(
        &mut self,
        callback: impl FnMut(&str) + Send + 'static,
    ) {
        self.on_refresh = Some(Box::new(callback));
    }

    /// Stage a source buffer for the next run.
    ///
    /// # Panics
    ///
    /// Panics if a run is in flight. Loading over an active run is a programming
    /// error, not a recoverable condition.
    pub fn load_code(&mut self, source: impl Into<String>) {
        assert!(
            self.in_flight.is_none(),
            "load_code called while a run is in flight"
        );
        self.source = Some(source.into());
    }

    /// Whether a run is currently in flight (suspended between pumps).
    #[must_use]
    pub fn is_running(&self) -> bool { self.in_flight.is_some() }

    /// Whether the suspended task is blocked on a line of input, as opposed to a
    /// redraw.
    #[must_use]
    pub fn awaiting_input(&self) -> bool { self.awaiting_input }

    /// Signal an interrupt. Delivered inside the running code at its next suspension
    /// point; when the task is already suspended, the next pump delivers it in place
    /// of the resumption value.
    pub fn interrupt(&self) {
        self.pending_interrupt.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn interrupt_handle(&self) -> InterruptHandle {
        InterruptHandle {
            latch: self.pending_interrupt.clone(),
        }
    }

    /// The single pump operation. Starts the staged buffer when idle; otherwise
    /// delivers `resume` (or a pending interrupt) to the suspended task and continues
    /// it. Returns once the task either suspends again or finishes.
    ///
    /// # Errors
    ///
    /// [`RunnerError::ExitRequested`] when the code asked the process to terminate,
    /// [`RunnerError::TaskFailed`] when the worker panicked.
    ///
    /// # Panics
    ///
    /// Panics when called with no staged buffer and no run in flight.
    pub async fn run_code(
        &mut self,
        resume: Option<String>,
    ) -> Result<PumpOutcome, RunnerError> {
        if self.in_flight.is_none() {
            self.start_task();
        } else {
            let flight = self
                .in_flight
                .as_ref()
                .ok_or_else(|| RunnerError::TaskFailed("no run in flight".into()))?;
            let message = if self.pending_interrupt.swap(false, Ordering::SeqCst) {
                Resume::Interrupt
            } else {
                Resume::Value(resume)
            };
            // A send failure means the task already finished; the event channel
            // closing below reports its result.
            let _ = flight.resume_tx.send(message).await;
        }
        self.pump().await
    }

    fn start_task(&mut self) {
        let source = self
            .source
            .clone()
            .unwrap_or_else(|| panic!("run_code called with no staged buffer"));
        let mut interpreter = self
            .interpreter
            .take()
            .unwrap_or_else(|| panic!("interpreter lost by a failed run"));
        let (event_tx, event_rx) = mpsc::channel(1);
        let (resume_tx, resume_rx) = mpsc::channel(1);
        let pending_interrupt = self.pending_interrupt.clone();
        let join = tokio::task::spawn_blocking(move || {
            let mut io = RunnerIo {
                event_tx,
                resume_rx,
                pending_interrupt,
            };
            let result = interpreter.run(&source, &mut io);
            (interpreter, result)
        });
        self.in_flight = Some(InFlight {
            event_rx,
            resume_tx,
            join,
        });
    }

    /// Wait for the task to suspend or finish. Exactly one of these happens per pump.
    async fn pump(&mut self) -> Result<PumpOutcome, RunnerError> {
        let flight = self
            .in_flight
            .as_mut()
            .ok_or_else(|| RunnerError::TaskFailed("no run in flight".into()))?;
        self.awaiting_input = false;
        match flight.event_rx.recv().await {
            Some(TaskEvent::Refresh(text)) => {
                if let Some(callback) = self.on_refresh.as_mut() {
                    callback(&text);
                }
                ok!(PumpOutcome::Suspended)
            }
            Some(TaskEvent::WaitInput) => {
                self.awaiting_input = true;
                ok!(PumpOutcome::Suspended)
            }
            // Channel closed: the run finished and the worker is returning the
            // interpreter.
            None => self.finish_task().await,
        }
    }

    async fn finish_task(&mut self) -> Result<PumpOutcome, RunnerError> {
        let flight = self
            .in_flight
            .take()
            .ok_or_else(|| RunnerError::TaskFailed("no run in flight".into()))?;
        let (interpreter, result) = flight
            .join
            .await
            .map_err(|join_error| RunnerError::TaskFailed(join_error.to_string()))?;
        self.interpreter = Some(interpreter);
        match result {
            Ok(RunResult::Complete) => ok!(PumpOutcome::Done),
            Ok(RunResult::MoreInputNeeded) => ok!(PumpOutcome::Unfinished),
            Err(InterpreterSignal::Interrupted) => ok!(PumpOutcome::Interrupted),
            Err(InterpreterSignal::ExitRequested(code)) => {
                Err(RunnerError::ExitRequested(code))
            }
        }
    }
}
