// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Side-effect-free evaluation of the restricted expression AST against a live
//! namespace. Completion queries run while the user is typing, before anything is
//! committed for execution, so nothing here may run user code: no calls, no
//! `__getitem__`-style hooks on arbitrary objects, no descriptor / property execution.
//! Attribute access goes through [`safe_get_attribute`], which returns the raw
//! class-level entry instead of invoking it.

use std::collections::BTreeSet;

use super::parser::{Expr, parse_expr};
use crate::{Builtins, EvalError, Namespace, Value, lock_namespace};

/// Evaluate `expr_text` against `namespace`, falling back to `builtins` for name lookup
/// (and nowhere else).
///
/// # Errors
///
/// Returns [`EvalError`] when the text is not in the safe subset or when evaluation
/// fails (unknown name, unsafe subscript target, missing key, ...). Callers in the
/// completion pipeline treat any error as "no matches".
pub fn safe_eval(
    expr_text: &str,
    namespace: &Namespace,
    builtins: &Builtins,
) -> Result<Value, EvalError> {
    let expr = parse_expr(expr_text)?;
    eval_expr(&expr, namespace, builtins)
}

fn eval_expr(
    expr: &Expr,
    namespace: &Namespace,
    builtins: &Builtins,
) -> Result<Value, EvalError> {
    match expr {
        Expr::NoneLit => Ok(Value::None),
        Expr::Bool(value) => Ok(Value::Bool(*value)),
        Expr::Int(value) => Ok(Value::Int(*value)),
        Expr::Float(value) => Ok(Value::Float(*value)),
        Expr::Str(text) => Ok(Value::Str(text.clone())),
        Expr::Tuple(items) => Ok(Value::Tuple(eval_items(items, namespace, builtins)?)),
        Expr::List(items) => Ok(Value::List(eval_items(items, namespace, builtins)?)),
        Expr::Dict(pairs) => {
            let mut acc = Vec::with_capacity(pairs.len());
            for (key, value) in pairs {
                acc.push((
                    eval_expr(key, namespace, builtins)?,
                    eval_expr(value, namespace, builtins)?,
                ));
            }
            Ok(Value::Dict(acc))
        }
        Expr::Name(name) => {
            if let Some(value) = lock_namespace(namespace).get(name) {
                return Ok(value.clone());
            }
            builtins
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::NameNotDefined(name.clone()))
        }
        Expr::Attribute { target, attr } => {
            let target = eval_expr(target, namespace, builtins)?;
            safe_get_attribute(&target, attr)
        }
        Expr::Subscript { target, index } => {
            let target = eval_expr(target, namespace, builtins)?;
            let index = eval_expr(index, namespace, builtins)?;
            eval_subscript(&target, &index)
        }
        Expr::Add(lhs, rhs) => numeric_binop(
            &eval_expr(lhs, namespace, builtins)?,
            &eval_expr(rhs, namespace, builtins)?,
            false,
        ),
        Expr::Sub(lhs, rhs) => numeric_binop(
            &eval_expr(lhs, namespace, builtins)?,
            &eval_expr(rhs, namespace, builtins)?,
            true,
        ),
        Expr::Neg(inner) => match eval_expr(inner, namespace, builtins)? {
            Value::Int(value) => Ok(Value::Int(value.wrapping_neg())),
            Value::Float(value) => Ok(Value::Float(-value)),
            other => Err(EvalError::Disallowed(negation_reason(&other))),
        },
    }
}

fn negation_reason(_value: &Value) -> &'static str { "negation of a non-numeric value" }

fn eval_items(
    items: &[Expr],
    namespace: &Namespace,
    builtins: &Builtins,
) -> Result<Vec<Value>, EvalError> {
    items
        .iter()
        .map(|item| eval_expr(item, namespace, builtins))
        .collect()
}

fn numeric_binop(lhs: &Value, rhs: &Value, subtract: bool) -> Result<Value, EvalError> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(if subtract {
            a.wrapping_sub(*b)
        } else {
            a.wrapping_add(*b)
        })),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            let a = as_f64(lhs);
            let b = as_f64(rhs);
            Ok(Value::Float(if subtract { a - b } else { a + b }))
        }
        _ => Err(EvalError::Disallowed(
            "arithmetic folding on non-numeric values",
        )),
    }
}

fn as_f64(value: &Value) -> f64 {
    match value {
        Value::Int(v) => *v as f64,
        Value::Float(v) => *v,
        _ => unreachable!("caller checks numeric"),
    }
}

/// Subscript is restricted to the four builtin container types. Anything else fails
/// with [`EvalError::UnsafeSubscript`] rather than a lower-level fault: an arbitrary
/// object's subscript hook could run user code with side effects.
fn eval_subscript(target: &Value, index: &Value) -> Result<Value, EvalError> {
    match target {
        Value::List(items) | Value::Tuple(items) => {
            let at = sequence_index(index, items.len())?;
            Ok(items[at].clone())
        }
        Value::Str(text) => {
            let chars: Vec<char> = text.chars().collect();
            let at = sequence_index(index, chars.len())?;
            Ok(Value::Str(chars[at].to_string()))
        }
        Value::Dict(pairs) => pairs
            .iter()
            .find(|(key, _)| key == index)
            .map(|(_, value)| value.clone())
            .ok_or(EvalError::KeyNotFound),
        other => Err(EvalError::UnsafeSubscript(other.type_name())),
    }
}

/// Negative indices count from the end, like the host language.
fn sequence_index(index: &Value, len: usize) -> Result<usize, EvalError> {
    let Value::Int(raw) = index else {
        return Err(EvalError::Disallowed("non-integer sequence index"));
    };
    let len_i = len as i64;
    let effective = if *raw < 0 { raw + len_i } else { *raw };
    if effective < 0 || effective >= len_i {
        return Err(EvalError::IndexOutOfRange);
    }
    Ok(effective as usize)
}

const STR_METHODS: &[&str] = &[
    "capitalize", "casefold", "center", "count", "endswith", "find", "format", "index",
    "isalnum", "isalpha", "isdigit", "islower", "isupper", "join", "lower", "lstrip",
    "replace", "rfind", "rstrip", "split", "splitlines", "startswith", "strip",
    "title", "upper", "zfill",
];

const LIST_METHODS: &[&str] = &[
    "append", "clear", "copy", "count", "extend", "index", "insert", "pop", "remove",
    "reverse", "sort",
];

const TUPLE_METHODS: &[&str] = &["count", "index"];

const DICT_METHODS: &[&str] = &[
    "clear", "copy", "get", "items", "keys", "pop", "popitem", "setdefault", "update",
    "values",
];

const INT_METHODS: &[&str] = &["bit_length", "to_bytes"];

const FLOAT_METHODS: &[&str] = &["hex", "is_integer"];

const GENERIC_DUNDERS: &[&str] = &[
    "__class__", "__doc__", "__eq__", "__hash__", "__init__", "__ne__", "__repr__",
    "__str__",
];

fn type_methods(value: &Value) -> &'static [&'static str] {
    match value {
        Value::Str(_) => STR_METHODS,
        Value::List(_) => LIST_METHODS,
        Value::Tuple(_) => TUPLE_METHODS,
        Value::Dict(_) => DICT_METHODS,
        Value::Int(_) | Value::Bool(_) => INT_METHODS,
        Value::Float(_) => FLOAT_METHODS,
        _ => &[],
    }
}

/// Every attribute name visible on `value`, without invoking anything: instance
/// attributes, class-level method names, and the generic dunders. No visibility
/// filtering happens here; that is the caller's policy.
#[must_use]
pub fn safe_attr_names(value: &Value) -> BTreeSet<String> {
    let mut acc: BTreeSet<String> = GENERIC_DUNDERS
        .iter()
        .chain(type_methods(value).iter())
        .map(|name| (*name).to_string())
        .collect();
    match value {
        Value::Object { attrs, .. } => {
            acc.extend(attrs.keys().cloned());
        }
        Value::Func { .. } => {
            acc.insert("__call__".to_string());
            acc.insert("__name__".to_string());
        }
        _ => {}
    }
    acc
}

/// Side-effect-free attribute access. For method names this returns the raw class-level
/// entry as an uncalled [`Value::Func`] -- the moral equivalent of reading the
/// descriptor off the class without running it.
///
/// # Errors
///
/// Returns [`EvalError::AttributeNotFound`] when `value` has no such attribute.
pub fn safe_get_attribute(value: &Value, attr: &str) -> Result<Value, EvalError> {
    if let Value::Object { attrs, .. } = value
        && let Some(found) = attrs.get(attr)
    {
        return Ok(found.clone());
    }
    if let Value::Func { name, .. } = value
        && attr == "__name__"
    {
        return Ok(Value::Str(name.clone()));
    }
    if attr == "__class__" {
        return Ok(Value::Str(value.type_name().to_string()));
    }
    if attr == "__doc__" {
        return Ok(Value::None);
    }
    if type_methods(value).contains(&attr)
        || GENERIC_DUNDERS.contains(&attr)
        || (matches!(value, Value::Func { .. }) && attr == "__call__")
    {
        return Ok(Value::Func {
            name: format!("{}.{}", value.type_name(), attr),
            params: vec![],
        });
    }
    Err(EvalError::AttributeNotFound {
        type_name: value.type_name(),
        attr: attr.to_string(),
    })
}
