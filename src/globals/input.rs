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

use crate::error::Result;
use crate::interpreter::calls::{Arity, NativeFn};
use crate::interpreter::environment::Env;
use crate::interpreter::render::rendered_cell;
use crate::interpreter::Interpreter;
use crate::value::Value;

pub fn natives() -> Vec<NativeFn> {
    vec![
        NativeFn::new("clicked", Arity::range(0, 1), clicked),
        NativeFn::new("left", Arity::exact(0), left),
        NativeFn::new("right", Arity::exact(0), right),
        NativeFn::new("up", Arity::exact(0), up),
        NativeFn::new("down", Arity::exact(0), down),
    ]
}

/// `(clicked)` or `(clicked obj)`
///
/// False when no click is pending. Otherwise binds the global `click`
/// to the clicked `Position`, then answers whether a click happened at
/// all (no argument) or whether it landed on one of `obj`'s rendered
/// elements.
fn clicked(interp: &mut Interpreter, env: &Env, args: Vec<Value>) -> Result<Value> {
    let (x, y) = match interp.input().click {
        Some(click) => click,
        None => return Ok(Value::bool(false)),
    };

    let position = interp.make_position(x, y)?;
    interp.globals().borrow_mut().define("click", position);

    let target = match args.first() {
        Some(target) => target,
        None => return Ok(Value::bool(true)),
    };

    for elem in interp.render_value(target, env)? {
        let cell = rendered_cell(&elem)?;
        if (cell.x, cell.y) == (x, y) {
            return Ok(Value::bool(true));
        }
    }
    Ok(Value::bool(false))
}

fn left(interp: &mut Interpreter, _: &Env, _: Vec<Value>) -> Result<Value> {
    Ok(Value::bool(interp.input().left))
}

fn right(interp: &mut Interpreter, _: &Env, _: Vec<Value>) -> Result<Value> {
    Ok(Value::bool(interp.input().right))
}

fn up(interp: &mut Interpreter, _: &Env, _: Vec<Value>) -> Result<Value> {
    Ok(Value::bool(interp.input().up))
}

fn down(interp: &mut Interpreter, _: &Env, _: Vec<Value>) -> Result<Value> {
    Ok(Value::bool(interp.input().down))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clicked_binds_the_click_position() {
        let mut interp = Interpreter::new();
        interp
            .start_source(r#"(object Dot (Cell 0 0 "red")) (= d (Dot (Position 2 3)))"#, "", "", 0)
            .unwrap();

        assert_eq!(interp.evaluate_to_string("(& (clicked) true)").unwrap(), "(false: Bool)");

        interp.click(2, 3);
        assert_eq!(interp.evaluate_to_string("(clicked d)").unwrap(), "(true: Bool)");
        assert_eq!(interp.evaluate_to_string("(.. click y)").unwrap(), "(3: N)");

        interp.click(0, 0);
        assert_eq!(interp.evaluate_to_string("(clicked d)").unwrap(), "(false: Bool)");
    }

    #[test]
    fn arrows_read_pending_input() {
        let mut interp = Interpreter::new();
        interp.start(&[], "", "", 0).unwrap();
        interp.push_left();
        assert_eq!(interp.evaluate_to_string("(& (left) true)").unwrap(), "(true: Bool)");
        assert_eq!(interp.evaluate_to_string("(| (right) false)").unwrap(), "(false: Bool)");
    }
}
