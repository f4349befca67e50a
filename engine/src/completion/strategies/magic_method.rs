// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::BTreeSet;

use crate::{CompletionContext, CompletionStrategy, LinePart, line_parts};

/// The double-underscore protocol methods offered when naming a method inside a class
/// body.
pub const MAGIC_METHODS: &[&str] = &[
    "__init__",
    "__new__",
    "__del__",
    "__repr__",
    "__str__",
    "__bytes__",
    "__format__",
    "__lt__",
    "__le__",
    "__eq__",
    "__ne__",
    "__gt__",
    "__ge__",
    "__hash__",
    "__bool__",
    "__getattr__",
    "__getattribute__",
    "__setattr__",
    "__delattr__",
    "__dir__",
    "__call__",
    "__len__",
    "__length_hint__",
    "__getitem__",
    "__setitem__",
    "__delitem__",
    "__iter__",
    "__next__",
    "__reversed__",
    "__contains__",
    "__add__",
    "__sub__",
    "__mul__",
    "__truediv__",
    "__floordiv__",
    "__mod__",
    "__divmod__",
    "__pow__",
    "__neg__",
    "__pos__",
    "__abs__",
    "__invert__",
    "__int__",
    "__float__",
    "__index__",
    "__round__",
    "__enter__",
    "__exit__",
    "__await__",
    "__aiter__",
    "__anext__",
    "__aenter__",
    "__aexit__",
];

/// Completes dunder method names on `def ` lines inside a class body. Applicable only
/// when the caller has determined the edit point is inside a class (see
/// [`CompletionContext::in_class_body`]).
#[derive(Debug, Default)]
pub struct MagicMethodCompletion;

impl CompletionStrategy for MagicMethodCompletion {
    fn name(&self) -> &'static str { "magic_method" }

    fn locate(&self, cursor: usize, line: &str) -> Option<LinePart> {
        line_parts::current_method_definition_name(cursor, line)
    }

    fn matches(
        &self,
        cursor: usize,
        line: &str,
        ctx: &CompletionContext,
    ) -> Option<BTreeSet<String>> {
        if !ctx.in_class_body {
            return None;
        }
        let part = self.locate(cursor, line)?;
        Some(
            MAGIC_METHODS
                .iter()
                .filter(|name| name.starts_with(&part.text))
                .map(|name| (*name).to_string())
                .collect(),
        )
    }
}
