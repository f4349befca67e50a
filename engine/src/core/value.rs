// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::{BTreeMap, HashMap},
          sync::{Arc, PoisonError}};

use crate::StdMutex;

/// The interpreter's mutable mapping from identifier to value. It is shared by reference
/// between the completion strategies (read-only use) and the running code (read-write
/// use). The engine treats it as externally owned: locks are held only for individual
/// reads, never across a suspension point, so a read that races a mutation may see a
/// torn intermediate state. That is fine per the completion contract (a less accurate
/// completion, never a crash).
pub type Namespace = Arc<StdMutex<HashMap<String, Value>>>;

/// Table of builtin names available as an explicit fallback for name lookup during safe
/// evaluation, and as candidates for global completion.
pub type Builtins = HashMap<String, Value>;

#[must_use]
pub fn new_namespace() -> Namespace { Arc::new(StdMutex::new(HashMap::new())) }

/// Lock the namespace, recovering from a poisoned lock. A panic on the runner task while
/// holding the lock must not take the completion pipeline down with it.
pub fn lock_namespace(
    namespace: &Namespace,
) -> std::sync::MutexGuard<'_, HashMap<String, Value>> {
    namespace.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A value in the embedded dynamic language. This is what the interpreter's namespace
/// contains, and what [`crate::safe_eval`] folds over.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    /// Insertion ordered; keys are unique.
    Dict(Vec<(Value, Value)>),
    /// An instance with plain data attributes. Attribute access on this never runs user
    /// code, which is what makes it safe to enumerate during completion.
    Object {
        class: String,
        attrs: BTreeMap<String, Value>,
    },
    /// A callable. Only its declared parameter names are visible to the engine (used by
    /// parameter-name completion); the body belongs to the interpreter.
    Func { name: String, params: Vec<String> },
}

impl Value {
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Dict(_) => "dict",
            Value::Object { .. } => "object",
            Value::Func { .. } => "function",
        }
    }

    /// Printable representation, in the host language's own notation (single quoted
    /// strings, `True` / `False` / `None`). Dict-key completion displays keys using
    /// this.
    #[must_use]
    pub fn repr(&self) -> String {
        match self {
            Value::None => "None".to_string(),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            Value::Int(value) => value.to_string(),
            Value::Float(value) => {
                if value.fract() == 0.0 && value.is_finite() {
                    format!("{value:.1}")
                } else {
                    value.to_string()
                }
            }
            Value::Str(text) => repr_str(text),
            Value::List(items) => format!("[{}]", repr_join(items)),
            Value::Tuple(items) => {
                if items.len() == 1 {
                    format!("({},)", items[0].repr())
                } else {
                    format!("({})", repr_join(items))
                }
            }
            Value::Dict(pairs) => {
                let inner = pairs
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key.repr(), value.repr()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{{{inner}}}")
            }
            Value::Object { class, .. } => format!("<{class} object>"),
            Value::Func { name, .. } => format!("<function {name}>"),
        }
    }

    /// Truthiness, in the host language's sense (empty containers and zero are falsy).
    #[must_use]
    pub fn truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(value) => *value,
            Value::Int(value) => *value != 0,
            Value::Float(value) => *value != 0.0,
            Value::Str(text) => !text.is_empty(),
            Value::List(items) | Value::Tuple(items) => !items.is_empty(),
            Value::Dict(pairs) => !pairs.is_empty(),
            Value::Object { .. } | Value::Func { .. } => true,
        }
    }
}

fn repr_join(items: &[Value]) -> String {
    items.iter().map(Value::repr).collect::<Vec<_>>().join(", ")
}

fn repr_str(text: &str) -> String {
    let mut acc = String::with_capacity(text.len() + 2);
    acc.push('\'');
    for ch in text.chars() {
        match ch {
            '\'' => acc.push_str("\\'"),
            '\\' => acc.push_str("\\\\"),
            '\n' => acc.push_str("\\n"),
            '\t' => acc.push_str("\\t"),
            _ => acc.push(ch),
        }
    }
    acc.push('\'');
    acc
}

/// The builtin functions every namespace can see without defining them. These exist so
/// that global completion has realistic candidates and safe evaluation has a name
/// fallback; calling them is the interpreter's job, not the engine's.
#[must_use]
pub fn default_builtins() -> Builtins {
    let entries: &[(&str, &[&str])] = &[
        ("abs", &["x"]),
        ("bool", &["x"]),
        ("dict", &[]),
        ("exit", &["code"]),
        ("float", &["x"]),
        ("input", &["prompt"]),
        ("int", &["x"]),
        ("len", &["obj"]),
        ("list", &["iterable"]),
        ("max", &["iterable"]),
        ("min", &["iterable"]),
        ("print", &["value"]),
        ("quit", &["code"]),
        ("range", &["start", "stop", "step"]),
        ("repr", &["obj"]),
        ("sorted", &["iterable"]),
        ("str", &["x"]),
        ("sum", &["iterable"]),
        ("tuple", &["iterable"]),
        ("type", &["obj"]),
    ];
    entries
        .iter()
        .map(|(name, params)| {
            ((*name).to_string(), Value::Func {
                name: (*name).to_string(),
                params: params.iter().map(|param| (*param).to_string()).collect(),
            })
        })
        .collect()
}
