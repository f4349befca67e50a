// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use coil_engine::{Builtins, EvalError, Interpreter, InterpreterSignal, Namespace,
                  RunResult, RunnerIo, Value, default_builtins, lock_namespace,
                  safe_eval};

/// A deliberately small statement interpreter over the engine's [`Value`] model:
/// assignments, expression statements, `def` headers (recorded for parameter
/// completion, bodies are not executed), and the `print` / `input` / `exit` builtins
/// routed through [`RunnerIo`]. Enough language to exercise every engine contract from
/// a real console session.
pub struct CalcInterpreter {
    namespace: Namespace,
    builtins: Builtins,
}

impl CalcInterpreter {
    #[must_use]
    pub fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            builtins: default_builtins(),
        }
    }

    /// An open block wants more lines: the buffer ends with a block header, or the
    /// last line of a block is still indented (the user ends a block with an empty
    /// line).
    fn needs_more_input(source: &str) -> bool {
        // split keeps the trailing empty segment that `lines` drops; an empty final
        // line is exactly what closes an open block.
        let last = source.split('\n').next_back().unwrap_or("");
        if last.trim_end().ends_with(':') {
            return true;
        }
        !last.is_empty() && last.starts_with(char::is_whitespace)
    }

    fn run_statement(
        &mut self,
        statement: &str,
        io: &mut RunnerIo,
    ) -> Result<(), InterpreterSignal> {
        let trimmed = statement.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(());
        }

        if let Some(rest) = trimmed.strip_prefix("def ") {
            self.define_function(rest);
            return Ok(());
        }
        if trimmed.starts_with("class ") {
            self.define_class(trimmed);
            return Ok(());
        }
        if let Some(args) = call_arguments(trimmed, "exit") {
            let code = if args.trim().is_empty() {
                0
            } else {
                match self.eval(args.trim(), io)? {
                    Some(Value::Int(code)) => i32::try_from(code).unwrap_or(1),
                    _ => 0,
                }
            };
            return Err(InterpreterSignal::ExitRequested(code));
        }
        if let Some(args) = call_arguments(trimmed, "print") {
            return self.print_statement(args, io);
        }

        if let Some((target, expr)) = split_assignment(trimmed) {
            let value = if let Some(args) = call_arguments(expr, "input") {
                self.input_expression(args, io)?
            } else {
                match self.eval(expr, io)? {
                    Some(value) => value,
                    None => return Ok(()),
                }
            };
            let mut namespace = lock_namespace(&self.namespace);
            namespace.insert(target.to_string(), value);
            return Ok(());
        }

        // Bare expression statement: echo its repr, like an interactive prompt does.
        if let Some(value) = self.eval(trimmed, io)? {
            io.write(&format!("{}\n", value.repr()))?;
        }
        Ok(())
    }

    /// Evaluate with the engine's safe evaluator; evaluation errors are user-visible
    /// output, not runner faults.
    fn eval(
        &self,
        expr: &str,
        io: &mut RunnerIo,
    ) -> Result<Option<Value>, InterpreterSignal> {
        match safe_eval(expr, &self.namespace, &self.builtins) {
            Ok(value) => Ok(Some(value)),
            Err(error) => {
                io.write(&format_error(&error))?;
                Ok(None)
            }
        }
    }

    /// `def name(a, b):` records a callable for parameter completion. Bodies are
    /// skipped by the caller's indentation handling.
    fn define_function(&mut self, header: &str) {
        let Some(open) = header.find('(') else {
            return;
        };
        let name = header[..open].trim().to_string();
        let Some(close) = header.rfind(')') else {
            return;
        };
        let params = header[open + 1..close]
            .split(',')
            .map(str::trim)
            .filter(|param| !param.is_empty())
            .map(ToString::to_string)
            .collect();
        let mut namespace = lock_namespace(&self.namespace);
        namespace.insert(name.clone(), Value::Func { name, params });
    }

    /// `class Name:` records an empty object of that class.
    fn define_class(&mut self, header: &str) {
        let name: String = header["class ".len()..]
            .chars()
            .take_while(|ch| ch.is_alphanumeric() || *ch == '_')
            .collect();
        if name.is_empty() {
            return;
        }
        let mut namespace = lock_namespace(&self.namespace);
        namespace.insert(
            name.clone(),
            Value::Object {
                class: name,
                attrs: std::collections::BTreeMap::new(),
            },
        );
    }

    fn print_statement(
        &mut self,
        args: &str,
        io: &mut RunnerIo,
    ) -> Result<(), InterpreterSignal> {
        let mut pieces = Vec::new();
        for arg in split_top_level(args) {
            let arg = arg.trim();
            if arg.is_empty() {
                continue;
            }
            match self.eval(arg, io)? {
                // `print` renders strings bare, everything else as its repr.
                Some(Value::Str(text)) => pieces.push(text),
                Some(value) => pieces.push(value.repr()),
                None => return Ok(()),
            }
        }
        io.write(&format!("{}\n", pieces.join(" ")))
    }

    fn input_expression(
        &mut self,
        args: &str,
        io: &mut RunnerIo,
    ) -> Result<Value, InterpreterSignal> {
        let prompt = args.trim();
        if !prompt.is_empty()
            && let Some(Value::Str(text)) = self.eval(prompt, io)?
        {
            io.write(&text)?;
        }
        let line = io.read_line()?.unwrap_or_default();
        Ok(Value::Str(line))
    }
}

impl Interpreter for CalcInterpreter {
    fn run(
        &mut self,
        source: &str,
        io: &mut RunnerIo,
    ) -> Result<RunResult, InterpreterSignal> {
        if Self::needs_more_input(source) {
            return Ok(RunResult::MoreInputNeeded);
        }
        let mut lines = source.lines().peekable();
        while let Some(line) = lines.next() {
            self.run_statement(line, io)?;
            // Block bodies are recorded by their header, not executed.
            if line.trim_end().ends_with(':') {
                while lines
                    .peek()
                    .is_some_and(|next| next.starts_with(char::is_whitespace))
                {
                    let _ = lines.next();
                }
            }
        }
        Ok(RunResult::Complete)
    }
}

/// The argument text of a `name(...)` call statement, or `None`.
fn call_arguments<'a>(statement: &'a str, name: &str) -> Option<&'a str> {
    let rest = statement.strip_prefix(name)?;
    let rest = rest.trim_start();
    let inner = rest.strip_prefix('(')?;
    inner.strip_suffix(')')
}

/// `target = expr` where `=` is assignment, not `==` or a keyword argument.
fn split_assignment(statement: &str) -> Option<(&str, &str)> {
    let eq = statement.find('=')?;
    if statement[eq..].starts_with("==") {
        return None;
    }
    let target = statement[..eq].trim();
    let is_name = !target.is_empty()
        && target
            .chars()
            .all(|ch| ch.is_alphanumeric() || ch == '_')
        && !target.chars().next().is_some_and(|ch| ch.is_ascii_digit());
    if !is_name {
        return None;
    }
    Some((target, statement[eq + 1..].trim()))
}

/// Split on commas outside any nesting, for `print(a, b)` style argument lists.
fn split_top_level(args: &str) -> Vec<String> {
    let mut depth = 0_i32;
    let mut pieces = Vec::new();
    let mut current = String::new();
    for ch in args.chars() {
        match ch {
            '(' | '[' | '{' => {
                depth += 1;
                current.push(ch);
            }
            ')' | ']' | '}' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                pieces.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    pieces.push(current);
    pieces
}

fn format_error(error: &EvalError) -> String {
    format!("error: {error}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use coil_engine::{CodeRunner, PumpOutcome, new_namespace};
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    async fn run_to_done(source: &str, inputs: &[&str]) -> (Vec<String>, PumpOutcome) {
        let namespace = new_namespace();
        let mut runner =
            CodeRunner::new(Box::new(CalcInterpreter::new(namespace)));
        let output = Arc::new(Mutex::new(Vec::new()));
        let sink = output.clone();
        runner.set_refresh_callback(move |text| {
            sink.lock().unwrap().push(text.to_string());
        });
        runner.load_code(source);
        let mut inputs = inputs.iter();
        let mut resume = None;
        loop {
            match runner.run_code(resume.take()).await.unwrap() {
                PumpOutcome::Suspended => {
                    if runner.awaiting_input() {
                        resume = inputs.next().map(|s| (*s).to_string());
                    }
                }
                outcome => {
                    let collected = output.lock().unwrap().clone();
                    return (collected, outcome);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_assignment_and_echo() {
        let (output, outcome) = run_to_done("x = 2 + 3\nx", &[]).await;
        assert_eq!(outcome, PumpOutcome::Done);
        assert_eq!(output, vec!["5\n"]);
    }

    #[tokio::test]
    async fn test_print_renders_strings_bare() {
        let (output, _) = run_to_done("print('hi', 42)", &[]).await;
        assert_eq!(output, vec!["hi 42\n"]);
    }

    #[tokio::test]
    async fn test_input_suspends_and_binds() {
        let (output, outcome) =
            run_to_done("name = input('? ')\nprint(name)", &["ada"]).await;
        assert_eq!(outcome, PumpOutcome::Done);
        assert_eq!(output, vec!["? ", "ada\n"]);
    }

    #[tokio::test]
    async fn test_open_block_asks_for_more() {
        let (_, outcome) = run_to_done("def greet(who):", &[]).await;
        assert_eq!(outcome, PumpOutcome::Unfinished);
    }

    #[tokio::test]
    async fn test_blank_line_closes_an_open_block() {
        let (_, outcome) = run_to_done("def greet(who):\n    pass\n", &[]).await;
        assert_eq!(outcome, PumpOutcome::Done);
    }

    #[tokio::test]
    async fn test_def_records_params_for_completion() {
        let namespace = new_namespace();
        let mut interpreter = CalcInterpreter::new(namespace.clone());
        interpreter.define_function("greet(who, greeting):");
        let bound = lock_namespace(&namespace);
        let Some(Value::Func { params, .. }) = bound.get("greet") else {
            panic!("greet was not recorded");
        };
        assert_eq!(params, &vec!["who".to_string(), "greeting".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_name_is_output_not_fault() {
        let (output, outcome) = run_to_done("mystery", &[]).await;
        assert_eq!(outcome, PumpOutcome::Done);
        assert_eq!(output, vec!["error: name \"mystery\" is not defined\n"]);
    }
}
