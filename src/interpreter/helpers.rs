/*
 * ==========================================================================
 * AUTUMN - Reactive Grid Runtime
 * ==========================================================================
 *
 * Author:   Sam Wilcox
 *
 * License:
 * This file is part of the AUTUMN runtime project.
 *
 * AUTUMN is dual-licensed under the terms of:
 *   - The MIT license
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

//! Argument extraction shared by the builtin catalog.
//!
//! Every helper reports a `TypeMismatch` naming the builtin and the
//! 1-based argument position, e.g.
//! `map() argument 2 must be a list, instead got (3: N)`.

use std::rc::Rc;

use crate::error::{AutumnError, Result};
use crate::interpreter::calls::Callable;
use crate::interpreter::Interpreter;
use crate::object::{Class, Instance};
use crate::span::Span;
use crate::value::Value;

pub fn argument_error(name: &str, index: usize, expected: &str, got: &Value) -> AutumnError {
    AutumnError::type_mismatch(
        format!(
            "{}() argument {} must be {}, instead got {}",
            name,
            index + 1,
            expected,
            got
        ),
        Span::synthetic(),
    )
}

/// Runtime failure raised from inside a builtin.
pub fn builtin_error(name: &str, message: impl AsRef<str>) -> AutumnError {
    AutumnError::runtime_error(format!("{}() {}", name, message.as_ref()), Span::synthetic())
}

fn arg<'a>(name: &str, args: &'a [Value], index: usize) -> Result<&'a Value> {
    args.get(index)
        .ok_or_else(|| builtin_error(name, format!("is missing argument {}", index + 1)))
}

pub fn number(name: &str, args: &[Value], index: usize) -> Result<i64> {
    let value = arg(name, args, index)?;
    value
        .as_number()
        .ok_or_else(|| argument_error(name, index, "a number", value))
}

pub fn string<'a>(name: &str, args: &'a [Value], index: usize) -> Result<&'a str> {
    let value = arg(name, args, index)?;
    value
        .as_str()
        .ok_or_else(|| argument_error(name, index, "a string", value))
}

pub fn list<'a>(name: &str, args: &'a [Value], index: usize) -> Result<&'a [Value]> {
    let value = arg(name, args, index)?;
    value
        .as_list()
        .ok_or_else(|| argument_error(name, index, "a list", value))
}

pub fn instance<'a>(name: &str, args: &'a [Value], index: usize) -> Result<&'a Rc<Instance>> {
    let value = arg(name, args, index)?;
    value
        .as_instance()
        .ok_or_else(|| argument_error(name, index, "an object instance", value))
}

pub fn callable(name: &str, args: &[Value], index: usize) -> Result<Rc<dyn Callable>> {
    let value = arg(name, args, index)?;
    value
        .as_callable()
        .cloned()
        .ok_or_else(|| argument_error(name, index, "a callable", value))
}

/// `(x, y)` of a `Position` instance.
pub fn position(name: &str, args: &[Value], index: usize) -> Result<(i64, i64)> {
    let value = arg(name, args, index)?;
    position_xy(value).ok_or_else(|| argument_error(name, index, "a Position", value))
}

pub fn position_xy(value: &Value) -> Option<(i64, i64)> {
    let instance = value.as_instance()?;
    if instance.class_name() != "Position" {
        return None;
    }
    let x = instance.field("x")?.as_number()?;
    let y = instance.field("y")?.as_number()?;
    Some((x, y))
}

impl Interpreter {
    pub fn position_class(&self) -> Rc<Class> {
        self.classes.position.clone()
    }

    /// A fresh `Position{x, y}` value.
    pub fn make_position(&self, x: i64, y: i64) -> Result<Value> {
        let instance = Instance::new(self.position_class(), vec![Value::number(x), Value::number(y)])?;
        Ok(Value::instance(instance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn errors_name_the_builtin_and_position() {
        let args = vec![Value::number(3), Value::number(4)];
        let err = list("map", &args, 1).unwrap_err();
        assert_eq!(err.message, "map() argument 2 must be a list, instead got (4: N)");
        assert_eq!(err.code(), "E_TYPE");
    }

    #[test]
    fn positions_round_trip_through_instances() {
        let interp = Interpreter::new();
        let pos = interp.make_position(2, 5).unwrap();
        assert_eq!(position_xy(&pos), Some((2, 5)));
        assert_eq!(position_xy(&Value::number(2)), None);
    }
}
