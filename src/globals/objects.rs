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

//! Object builtins. Every operation that "changes" an object returns a
//! duplicate with fresh identities; the input is left untouched.

use std::collections::HashSet;
use std::rc::Rc;

use crate::ast::Expr;
use crate::error::Result;
use crate::interpreter::calls::{Arity, NativeFn};
use crate::interpreter::environment::{Env, Environment};
use crate::interpreter::helpers::{self, argument_error, builtin_error};
use crate::interpreter::render::rendered_cell;
use crate::interpreter::Interpreter;
use crate::span::Span;
use crate::value::{Value, ValueId};

pub fn natives() -> Vec<NativeFn> {
    vec![
        NativeFn::new("addObj", Arity::exact(2), add_obj),
        NativeFn::new("removeObj", Arity::range(1, 2), remove_obj),
        NativeFn::new("updateObj", Arity::range(2, 3), update_obj),
        NativeFn::new("allObjs", Arity::exact(0), all_objs),
        NativeFn::new("rotate", Arity::exact(1), rotate),
        NativeFn::new("isWithinBounds", Arity::exact(1), is_within_bounds),
        NativeFn::new("isOutsideBounds", Arity::exact(1), is_outside_bounds),
    ]
}

/// `(addObj list obj)` or `(addObj list others)`
///
/// # Returns
/// A duplicate of `list` with `obj` appended, or with every element of
/// `others` appended when the second argument is a list.
fn add_obj(_: &mut Interpreter, _: &Env, args: Vec<Value>) -> Result<Value> {
    let items = helpers::list("addObj", &args, 0)?;
    let mut out: Vec<Value> = items.iter().map(Value::duplicate).collect();
    match args[1].as_list() {
        Some(extra) => out.extend(extra.iter().cloned()),
        None => out.push(args[1].clone()),
    }
    Ok(Value::list(out))
}

/// Removal by identity or by predicate.
///
/// # Forms
/// ```text
/// (removeObj obj)            ; unbinds the global holding obj, returns obj
/// (removeObj list pred)      ; drops elements where pred holds
/// (removeObj list obj)       ; drops the element with obj's identity
/// (removeObj list others)    ; drops every element sharing an identity with others
/// ```
fn remove_obj(interp: &mut Interpreter, env: &Env, args: Vec<Value>) -> Result<Value> {
    if args.len() == 1 {
        let globals = interp.globals().clone();
        if !Environment::remove_id_if_exist(&globals, args[0].id()) {
            tracing::debug!(id = args[0].id(), "removeObj found no binding");
        }
        return Ok(args[0].clone());
    }

    let items = helpers::list("removeObj", &args, 0)?;

    if let Some(pred) = args[1].as_callable() {
        let mut kept = Vec::new();
        for item in items {
            let drop = interp
                .invoke(pred, env, vec![item.clone()], Span::synthetic())?
                .is_truthy();
            if !drop {
                kept.push(item.clone());
            }
        }
        return Ok(Value::list(kept));
    }

    let ids: HashSet<ValueId> = match args[1].as_list() {
        Some(others) => others.iter().map(Value::id).collect(),
        None if args[1].as_instance().is_some() => std::iter::once(args[1].id()).collect(),
        None => {
            return Err(argument_error(
                "removeObj",
                1,
                "a function, an object or a list",
                &args[1],
            ))
        }
    };

    Ok(Value::list(
        items
            .iter()
            .filter(|item| !ids.contains(&item.id()))
            .cloned()
            .collect(),
    ))
}

/// Functional update.
///
/// # Forms
/// ```text
/// (updateObj list f)         ; map
/// (updateObj list f pred)    ; f applied where pred holds, others kept
/// (updateObj obj "field" v)  ; duplicate of obj with field set
/// (updateObj obj f)          ; (f obj)
/// ```
fn update_obj(interp: &mut Interpreter, env: &Env, args: Vec<Value>) -> Result<Value> {
    if let Some(items) = args[0].as_list() {
        let f = helpers::callable("updateObj", &args, 1)?;
        let pred = match args.get(2) {
            Some(_) => Some(helpers::callable("updateObj", &args, 2)?),
            None => None,
        };

        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let selected = match &pred {
                Some(pred) => interp
                    .invoke(pred, env, vec![item.clone()], Span::synthetic())?
                    .is_truthy(),
                None => true,
            };
            out.push(if selected {
                interp.invoke(&f, env, vec![item.clone()], Span::synthetic())?
            } else {
                item.clone()
            });
        }
        return Ok(Value::list(out));
    }

    if args.len() == 3 {
        let field = helpers::string("updateObj", &args, 1)?;
        let instance = helpers::instance("updateObj", &args, 0)?;
        if instance.class().field_type(field).is_none() {
            return Err(builtin_error(
                "updateObj",
                format!("{} has no field '{}'", instance.class_name(), field),
            ));
        }
        let updated = args[0].duplicate();
        if let Some(copy) = updated.as_instance() {
            copy.set(field, args[2].clone())?;
        }
        return Ok(updated);
    }

    let f = helpers::callable("updateObj", &args, 1)?;
    interp.invoke(&f, env, vec![args[0].clone()], Span::synthetic())
}

/// Every global object that can render, in definition order. Lists are
/// searched one element at a time.
fn all_objs(interp: &mut Interpreter, _: &Env, _: Vec<Value>) -> Result<Value> {
    fn collect(value: &Value, out: &mut Vec<Value>) {
        if let Some(items) = value.as_list() {
            items.iter().for_each(|item| collect(item, out));
        } else if let Some(instance) = value.as_instance() {
            if instance.class().method("render").is_some() {
                out.push(value.clone());
            }
        }
    }

    let globals = interp.globals().clone();
    let scope = globals.borrow();
    let mut out = Vec::new();
    for name in scope.definition_order() {
        if let Some(value) = scope.local(&name) {
            collect(&value, &mut out);
        }
    }
    Ok(Value::list(out))
}

/// Quarter turn about the origin: every cell `(x, y)` becomes `(-y, x)`.
/// Cell coordinates stay deferred.
fn rotate(interp: &mut Interpreter, _: &Env, args: Vec<Value>) -> Result<Value> {
    helpers::instance("rotate", &args, 0)?;
    let rotated = args[0].duplicate();
    let instance = match rotated.as_instance() {
        Some(instance) => instance,
        None => return Ok(rotated),
    };

    let elems = instance
        .field("elems")
        .ok_or_else(|| builtin_error("rotate", format!("{} has no cells", instance.class_name())))?;
    let cells = elems
        .as_list()
        .ok_or_else(|| builtin_error("rotate", "elems must be a list"))?;

    let cell_class = interp.classes().cell.clone();
    for cell in cells {
        let cell = cell
            .as_instance()
            .filter(|c| Rc::ptr_eq(c.class(), &cell_class))
            .ok_or_else(|| builtin_error("rotate", format!("expected a Cell, got {}", cell)))?;

        let x = cell.field("x").and_then(|v| v.as_deferred().cloned());
        let y = cell.field("y").and_then(|v| v.as_deferred().cloned());
        let (x, y) = match (x, y) {
            (Some(x), Some(y)) => (x, y),
            _ => return Err(builtin_error("rotate", "cell coordinates must be expressions")),
        };

        cell.set("x", Value::deferred(Expr::negate(y.expr.clone()), y.env.clone()))?;
        cell.set("y", Value::deferred(x.expr.clone(), x.env.clone()))?;
    }

    Ok(rotated)
}

/// Whether every rendered element of `obj` lies on the grid.
fn is_within_bounds(interp: &mut Interpreter, env: &Env, args: Vec<Value>) -> Result<Value> {
    helpers::instance("isWithinBounds", &args, 0)?;
    let size = interp.grid_size();
    let elems = interp.render_value(&args[0], env)?;
    for elem in &elems {
        let cell = rendered_cell(elem)?;
        if cell.x < 0 || cell.y < 0 || cell.x >= size || cell.y >= size {
            return Ok(Value::bool(false));
        }
    }
    Ok(Value::bool(true))
}

fn is_outside_bounds(interp: &mut Interpreter, env: &Env, args: Vec<Value>) -> Result<Value> {
    let within = is_within_bounds(interp, env, args)?;
    Ok(Value::bool(!within.is_truthy()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BOX: &str = r#"
        (object Dot (: color String) (Cell 0 0 color))
        (object Bar (list (Cell 0 0 "red") (Cell 1 0 "red")))
    "#;

    fn started() -> Interpreter {
        let mut interp = Interpreter::new();
        interp.start_source(BOX, "", "", 0).unwrap();
        interp
    }

    #[test]
    fn add_obj_duplicates_the_list() {
        let mut interp = started();
        interp.evaluate_to_string("(= dots (list (Dot \"red\" (Position 0 0))))").unwrap();
        interp
            .evaluate_to_string("(= more (addObj dots (Dot \"blue\" (Position 1 1))))")
            .unwrap();

        let globals = interp.globals().clone();
        let dots = Environment::get(&globals, "dots").unwrap();
        let more = Environment::get(&globals, "more").unwrap();
        let (dots, more) = (dots.as_list().unwrap(), more.as_list().unwrap());

        assert_eq!(more.len(), 2);
        assert_eq!(dots.len(), 1);
        assert!(dots[0].id() != more[0].id());
    }

    #[test]
    fn update_obj_sets_a_field_on_a_copy() {
        let mut interp = started();
        interp.evaluate_to_string("(= a (Dot \"red\" (Position 0 0)))").unwrap();
        interp
            .evaluate_to_string("(= b (updateObj a \"color\" \"blue\"))")
            .unwrap();
        assert_eq!(interp.evaluate_to_string("(.. a color)").unwrap(), "(red: S)");
        assert_eq!(interp.evaluate_to_string("(.. b color)").unwrap(), "(blue: S)");
    }

    #[test]
    fn remove_obj_by_predicate_and_identity() {
        let mut interp = started();
        interp
            .evaluate_to_string(
                "(= dots (list (Dot \"red\" (Position 0 0)) (Dot \"blue\" (Position 1 0))))",
            )
            .unwrap();
        assert_eq!(
            interp
                .evaluate_to_string("(length (removeObj dots (--> d (== (.. d color) \"red\"))))")
                .unwrap(),
            "(1: N)"
        );
        assert_eq!(
            interp
                .evaluate_to_string("(length (removeObj dots (head dots)))")
                .unwrap(),
            "(1: N)"
        );
    }

    #[test]
    fn rotate_turns_cells_a_quarter() {
        let mut interp = started();
        interp.evaluate_to_string("(= bar (rotate (Bar (Position 5 5))))").unwrap();
        let report = interp.render_all().unwrap();
        assert!(report.contains(r#"{"position": {"x": 5, "y": 5}, "color": "red"}"#));
        assert!(report.contains(r#"{"position": {"x": 5, "y": 6}, "color": "red"}"#));
    }

    #[test]
    fn bounds_follow_rendered_cells() {
        let mut interp = started();
        assert_eq!(
            interp
                .evaluate_to_string("(isWithinBounds (Bar (Position 14 0)))")
                .unwrap(),
            "(true: Bool)"
        );
        assert_eq!(
            interp
                .evaluate_to_string("(isOutsideBounds (Bar (Position 15 0)))")
                .unwrap(),
            "(true: Bool)"
        );
    }
}
