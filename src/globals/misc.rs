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

use crate::error::{AutumnError, Result};
use crate::interpreter::calls::{Arity, NativeFn};
use crate::interpreter::environment::{Env, Environment};
use crate::interpreter::helpers;
use crate::interpreter::Interpreter;
use crate::span::Span;
use crate::value::Value;

pub fn natives() -> Vec<NativeFn> {
    vec![
        NativeFn::new("defined", Arity::exact(1), defined),
        NativeFn::new("prev", Arity::exact(1), prev),
        NativeFn::new("print", Arity::exact(1), print),
        NativeFn::new("renderAll", Arity::exact(0), render_all),
    ]
}

/// Whether a global named by the string argument exists.
fn defined(interp: &mut Interpreter, _: &Env, args: Vec<Value>) -> Result<Value> {
    let name = helpers::string("defined", &args, 0)?;
    Ok(Value::bool(interp.globals().borrow().has_local(name)))
}

/// `(prev x)`
///
/// The value `x` had before the current step. A bare variable is looked
/// up by name; any other value is matched by identity in the snapshot.
fn prev(interp: &mut Interpreter, _: &Env, args: Vec<Value>) -> Result<Value> {
    if let Some(name) = args[0].as_str() {
        return interp.lookup_prev(name);
    }

    let snapshot = interp.prev_environment().ok_or_else(|| {
        AutumnError::runtime_error("prev() used before the first step", Span::synthetic())
            .with_help("the previous environment only exists once `step` has run")
    })?;
    Environment::find_id(snapshot, args[0].id()).ok_or_else(|| {
        AutumnError::runtime_error(
            format!("prev() found no value with the identity of {}", args[0]),
            Span::synthetic(),
        )
    })
}

/// Logs its argument and returns it unchanged.
fn print(_: &mut Interpreter, _: &Env, args: Vec<Value>) -> Result<Value> {
    tracing::info!(target: "autumn::print", "{}", args[0]);
    Ok(args[0].clone())
}

/// Renders every global in definition order, caches the flat list in
/// `cacheRendered` and returns it.
fn render_all(interp: &mut Interpreter, env: &Env, _: Vec<Value>) -> Result<Value> {
    let globals = interp.globals().clone();
    let names = globals.borrow().definition_order();

    let mut all = Vec::new();
    for name in names {
        if let Some(value) = Environment::get(&globals, &name) {
            all.extend(interp.render_value(&value, env)?);
        }
    }

    let rendered = Value::list(all);
    Environment::assign(&globals, "cacheRendered", rendered.clone())?;
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prev_needs_a_step() {
        let mut interp = Interpreter::new();
        interp.start_source("(= x (initnext 1 (+ x 1)))", "", "", 0).unwrap();

        let err = interp.evaluate_to_string("(prev x)").unwrap_err();
        assert_eq!(err.code(), "E_RUNTIME");
        assert!(err.help.is_some());

        interp.step().unwrap();
        assert_eq!(interp.evaluate_to_string("(prev x)").unwrap(), "(1: N)");
        assert_eq!(interp.evaluate_to_string("x").unwrap(), "(2: N)");
    }

    #[test]
    fn defined_checks_globals() {
        let mut interp = Interpreter::new();
        interp.start_source("(= here 1)", "", "", 0).unwrap();
        assert_eq!(interp.evaluate_to_string("(defined \"here\")").unwrap(), "(true: Bool)");
        assert_eq!(interp.evaluate_to_string("(defined \"gone\")").unwrap(), "(false: Bool)");
    }

    #[test]
    fn render_all_caches_elements() {
        let mut interp = Interpreter::new();
        interp
            .start_source(r#"(object Dot (Cell 0 0 "red")) (= d (Dot (Position 1 1)))"#, "", "", 0)
            .unwrap();
        assert_eq!(interp.evaluate_to_string("(length ((renderAll)))").unwrap(), "(1: N)");
        assert_eq!(interp.evaluate_to_string("(length cacheRendered)").unwrap(), "(1: N)");
    }
}
