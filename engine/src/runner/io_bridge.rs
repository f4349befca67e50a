// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::{Arc, atomic::{AtomicBool, Ordering}};

use tokio::sync::mpsc;

use crate::{InterpreterSignal, ok};

/// What a suspended task is asking its controller for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    /// Output was produced; the controller should redraw before the task continues.
    Refresh(String),
    /// The task is blocked on a line of input.
    WaitInput,
}

/// What the controller hands back to a suspended task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resume {
    /// The resumption value. `Some` carries the input line a `WaitInput` asked for;
    /// a plain continue after `Refresh` carries `None`.
    Value(Option<String>),
    /// Deliver an interrupt at this suspension point instead of resuming normally.
    Interrupt,
}

/// The task-side half of the suspend/resume protocol. Every console read or write made
/// by running code passes through here, blocking the worker until the controller pumps
/// the run forward again. User code never observes that it was suspended.
#[derive(Debug)]
pub struct RunnerIo {
    pub(crate) event_tx: mpsc::Sender<TaskEvent>,
    pub(crate) resume_rx: mpsc::Receiver<Resume>,
    pub(crate) pending_interrupt: Arc<AtomicBool>,
}

impl RunnerIo {
    /// Route output to the controller and suspend until it has redrawn. The write does
    /// not return to user code until the controller explicitly resumes the run.
    pub fn write(&mut self, text: &str) -> Result<(), InterpreterSignal> {
        self.check_interrupt()?;
        if self
            .event_tx
            .blocking_send(TaskEvent::Refresh(text.to_string()))
            .is_err()
        {
            // Controller went away; surface it as an interrupt.
            return Err(InterpreterSignal::Interrupted);
        }
        match self.resume_rx.blocking_recv() {
            Some(Resume::Value(_)) => Ok(()),
            Some(Resume::Interrupt) | None => Err(InterpreterSignal::Interrupted),
        }
    }

    /// Suspend awaiting a line of input. `Ok(None)` models end-of-input.
    pub fn read_line(&mut self) -> Result<Option<String>, InterpreterSignal> {
        self.check_interrupt()?;
        if self.event_tx.blocking_send(TaskEvent::WaitInput).is_err() {
            return Err(InterpreterSignal::Interrupted);
        }
        match self.resume_rx.blocking_recv() {
            Some(Resume::Value(value)) => Ok(value),
            Some(Resume::Interrupt) | None => Err(InterpreterSignal::Interrupted),
        }
    }

    /// An interrupt that landed while the task was computing (between suspension
    /// points) is raised at the very next suspension point.
    fn check_interrupt(&self) -> Result<(), InterpreterSignal> {
        if self.pending_interrupt.swap(false, Ordering::SeqCst) {
            return Err(InterpreterSignal::Interrupted);
        }
        ok!()
    }
}
