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

//! Grid and randomness builtins.

use crate::error::Result;
use crate::interpreter::calls::{Arity, NativeFn};
use crate::interpreter::environment::Env;
use crate::interpreter::helpers::{self, builtin_error};
use crate::interpreter::Interpreter;
use crate::value::Value;

/// Upper bound on the length of any list these builtins generate.
const MAX_GENERATED: i64 = 1 << 24;

pub fn natives() -> Vec<NativeFn> {
    vec![
        NativeFn::new("adjPositions", Arity::exact(1), adj_positions),
        NativeFn::new("allPositions", Arity::range(1, 2), all_positions),
        NativeFn::new("randomPositions", Arity::exact(2), random_positions),
        NativeFn::new("isFreePos", Arity::exact(1), is_free_pos),
        NativeFn::new("uniformChoice", Arity::range(1, 2), uniform_choice),
    ]
}

/// The four orthogonal neighbours of `pos` that lie on the grid, in the
/// order left, right, up, down.
fn adj_positions(interp: &mut Interpreter, _: &Env, args: Vec<Value>) -> Result<Value> {
    let (x, y) = helpers::position("adjPositions", &args, 0)?;
    let size = interp.grid_size();

    let mut out = Vec::with_capacity(4);
    for (nx, ny) in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
        if (0..size).contains(&nx) && (0..size).contains(&ny) {
            out.push(interp.make_position(nx, ny)?);
        }
    }
    Ok(Value::list(out))
}

/// `(allPositions n)` or `(allPositions n m)`
///
/// Every `Position i j` with `i` in `0..n` (outer) and `j` in `0..m`
/// (inner). `m` defaults to `n`.
fn all_positions(interp: &mut Interpreter, _: &Env, args: Vec<Value>) -> Result<Value> {
    let n = helpers::number("allPositions", &args, 0)?;
    let m = match args.len() {
        2 => helpers::number("allPositions", &args, 1)?,
        _ => n,
    };

    let total = n
        .max(0)
        .checked_mul(m.max(0))
        .filter(|&total| total <= MAX_GENERATED)
        .ok_or_else(|| {
            builtin_error(
                "allPositions",
                format!("cannot produce {} x {} positions", n, m),
            )
        })?;

    let mut out = Vec::with_capacity(total as usize);
    for i in 0..n {
        for j in 0..m {
            out.push(interp.make_position(i, j)?);
        }
    }
    Ok(Value::list(out))
}

/// `(randomPositions size count)`
///
/// `count` positions with both coordinates drawn from `0..size` by the
/// seeded generator. Positions may repeat.
fn random_positions(interp: &mut Interpreter, _: &Env, args: Vec<Value>) -> Result<Value> {
    let size = helpers::number("randomPositions", &args, 0)?;
    let count = helpers::number("randomPositions", &args, 1)?;
    if size < 0 {
        return Err(builtin_error("randomPositions", "argument 1 must be non-negative"));
    }
    if count > MAX_GENERATED {
        return Err(builtin_error("randomPositions", format!("cannot produce {} positions", count)));
    }

    let mut out = Vec::new();
    for _ in 0..count {
        let x = interp.rng_mut().next_below(size as u64) as i64;
        let y = interp.rng_mut().next_below(size as u64) as i64;
        out.push(interp.make_position(x, y)?);
    }
    Ok(Value::list(out))
}

/// Free means not covered by any element of the last rendered frame.
fn is_free_pos(interp: &mut Interpreter, _: &Env, args: Vec<Value>) -> Result<Value> {
    let (x, y) = helpers::position("isFreePos", &args, 0)?;
    Ok(Value::bool(interp.globals().borrow().is_free(x, y)))
}

/// `(uniformChoice list)` picks one element; `(uniformChoice list n)`
/// picks `n`, with replacement.
fn uniform_choice(interp: &mut Interpreter, _: &Env, args: Vec<Value>) -> Result<Value> {
    let items = helpers::list("uniformChoice", &args, 0)?;
    if items.is_empty() {
        return Err(builtin_error("uniformChoice", "received an empty list"));
    }
    let len = items.len() as u64;

    if args.len() == 1 {
        let index = interp.rng_mut().next_below(len) as usize;
        return Ok(items[index].clone());
    }

    let n = helpers::number("uniformChoice", &args, 1)?;
    if n < 1 {
        return Err(builtin_error("uniformChoice", "argument 2 must be a positive integer"));
    }
    if n > MAX_GENERATED {
        return Err(builtin_error("uniformChoice", format!("cannot choose {} elements", n)));
    }
    let mut chosen = Vec::with_capacity(n as usize);
    for _ in 0..n {
        let index = interp.rng_mut().next_below(len) as usize;
        chosen.push(items[index].clone());
    }
    Ok(Value::list(chosen))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn started(seed: u64) -> Interpreter {
        let mut interp = Interpreter::new();
        interp.start(&[], "", "", seed).unwrap();
        interp
    }

    #[test]
    fn corner_has_two_neighbours() {
        let mut interp = started(0);
        assert_eq!(
            interp.evaluate_to_string("(length (adjPositions (Position 0 0)))").unwrap(),
            "(2: N)"
        );
        assert_eq!(
            interp.evaluate_to_string("(length (adjPositions (Position 3 3)))").unwrap(),
            "(4: N)"
        );
    }

    #[test]
    fn all_positions_is_outer_then_inner() {
        let mut interp = started(0);
        assert_eq!(
            interp
                .evaluate_to_string("(map (--> p (.. p y)) (allPositions 2 3))")
                .unwrap(),
            "([(0: N), (1: N), (2: N), (0: N), (1: N), (2: N)] :List<Number>)"
        );
    }

    #[test]
    fn oversized_requests_are_errors_not_panics() {
        let mut interp = started(0);
        let err = interp
            .evaluate_to_string("(allPositions 4000000000 4000000000)")
            .unwrap_err();
        assert_eq!(err.code(), "E_RUNTIME");

        let err = interp
            .evaluate_to_string("(uniformChoice (list 1) 9223372036854775807)")
            .unwrap_err();
        assert_eq!(err.code(), "E_RUNTIME");

        assert!(interp
            .evaluate_to_string("(randomPositions 16 9223372036854775807)")
            .is_err());
    }

    #[test]
    fn random_draws_repeat_for_a_seed() {
        let draw = |seed| {
            let mut interp = started(seed);
            interp
                .evaluate_to_string("(map (--> p (.. p x)) (randomPositions 16 8))")
                .unwrap()
        };
        assert_eq!(draw(7), draw(7));
    }

    #[test]
    fn uniform_choice_rejects_empty_and_non_positive() {
        let mut interp = started(0);
        assert!(interp.evaluate_to_string("(uniformChoice (list))").is_err());
        assert!(interp.evaluate_to_string("(uniformChoice (list 1 2) 0)").is_err());
        assert_eq!(
            interp
                .evaluate_to_string("(length (uniformChoice (list 1 2) 5))")
                .unwrap(),
            "(5: N)"
        );
    }
}
