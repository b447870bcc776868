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

//! List builtins: `map`, `filter`, `foldl`, `concat`, `length`, `head`,
//! `tail`, `at`, `range`, `any`, `isList`, `arrayEqual` and `sqrt`.

use rayon::prelude::*;

use crate::error::{AutumnError, Result};
use crate::interpreter::calls::{Arity, NativeFn, PureKernel};
use crate::interpreter::environment::Env;
use crate::interpreter::helpers::{self, builtin_error};
use crate::interpreter::Interpreter;
use crate::span::Span;
use crate::value::{Plain, Value};

pub fn natives() -> Vec<NativeFn> {
    vec![
        NativeFn::new("map", Arity::exact(2), map),
        NativeFn::new("filter", Arity::exact(2), filter),
        NativeFn::new("foldl", Arity::exact(3), foldl),
        NativeFn::new("concat", Arity::exact(1), concat),
        NativeFn::new("length", Arity::exact(1), length).with_kernel(length_kernel),
        NativeFn::new("head", Arity::exact(1), head).with_kernel(head_kernel),
        NativeFn::new("tail", Arity::exact(1), tail).with_kernel(tail_kernel),
        NativeFn::new("at", Arity::exact(2), at),
        NativeFn::new("range", Arity::exact(2), range),
        NativeFn::new("any", Arity::range(1, 2), any),
        NativeFn::new("isList", Arity::exact(1), is_list).with_kernel(is_list_kernel),
        NativeFn::new("arrayEqual", Arity::exact(2), array_equal),
        NativeFn::new("sqrt", Arity::exact(1), sqrt).with_kernel(sqrt_kernel),
    ]
}

/// `(map f list)`
///
/// Applies `f` to every element, preserving order.
///
/// Lists at least `parallel_map_threshold` long whose elements are all
/// plain data are mapped on the rayon pool when `f` has a pure kernel;
/// everything else runs on the calling thread.
///
/// # Autumn Example
/// ```text
/// (map (--> p (.. p x)) (allPositions 2))   ; [0, 0, 1, 1]
/// ```
fn map(interp: &mut Interpreter, env: &Env, args: Vec<Value>) -> Result<Value> {
    let f = helpers::callable("map", &args, 0)?;
    let items = helpers::list("map", &args, 1)?;

    let threshold = interp.config().parallel_map_threshold;
    if items.len() >= threshold {
        if let Some(kernel) = f.pure_kernel() {
            if let Some(plains) = items.iter().map(Value::to_plain).collect::<Option<Vec<_>>>() {
                let chunk = interp.config().parallel_chunk_size;
                return map_parallel(kernel, plains, chunk);
            }
        }
        tracing::trace!(len = items.len(), callee = f.name(), "map stays sequential");
    }

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(interp.invoke(&f, env, vec![item.clone()], Span::synthetic())?);
    }
    Ok(Value::list(out))
}

fn map_parallel(kernel: PureKernel, plains: Vec<Plain>, min_chunk: usize) -> Result<Value> {
    let workers = rayon::current_num_threads().max(1);
    let chunk = min_chunk.max(plains.len() / workers).max(1);
    tracing::debug!(len = plains.len(), chunk, workers, "parallel map");

    let mapped: std::result::Result<Vec<Vec<Plain>>, String> = plains
        .par_chunks(chunk)
        .map(|slice| {
            slice
                .iter()
                .cloned()
                .map(kernel)
                .collect::<std::result::Result<Vec<Plain>, String>>()
        })
        .collect();

    let mapped = mapped.map_err(|message| builtin_error("map", message))?;
    Ok(Value::list(
        mapped.into_iter().flatten().map(Value::from_plain).collect(),
    ))
}

/// `(filter pred list)`, keeping elements for which `pred` is truthy.
fn filter(interp: &mut Interpreter, env: &Env, args: Vec<Value>) -> Result<Value> {
    let pred = helpers::callable("filter", &args, 0)?;
    let items = helpers::list("filter", &args, 1)?;

    let mut kept = Vec::new();
    for item in items {
        if interp
            .invoke(&pred, env, vec![item.clone()], Span::synthetic())?
            .is_truthy()
        {
            kept.push(item.clone());
        }
    }
    Ok(Value::list(kept))
}

/// `(foldl f acc list)` calls `(f acc elem)` left to right.
fn foldl(interp: &mut Interpreter, env: &Env, args: Vec<Value>) -> Result<Value> {
    let f = helpers::callable("foldl", &args, 0)?;
    let items = helpers::list("foldl", &args, 2)?;

    let mut acc = args[1].clone();
    for item in items {
        acc = interp.invoke(&f, env, vec![acc, item.clone()], Span::synthetic())?;
    }
    Ok(acc)
}

/// `(concat (list l1 l2 ...))` flattens one level.
fn concat(_: &mut Interpreter, _: &Env, args: Vec<Value>) -> Result<Value> {
    let lists = helpers::list("concat", &args, 0)?;
    let mut out = Vec::new();
    for (i, inner) in lists.iter().enumerate() {
        let inner = inner.as_list().ok_or_else(|| {
            builtin_error("concat", format!("element {} must be a list, instead got {}", i + 1, inner))
        })?;
        out.extend(inner.iter().cloned());
    }
    Ok(Value::list(out))
}

fn length(_: &mut Interpreter, _: &Env, args: Vec<Value>) -> Result<Value> {
    let items = helpers::list("length", &args, 0)?;
    Ok(Value::number(items.len() as i64))
}

fn head(_: &mut Interpreter, _: &Env, args: Vec<Value>) -> Result<Value> {
    helpers::list("head", &args, 0)?
        .first()
        .cloned()
        .ok_or_else(|| builtin_error("head", "argument must not be an empty list"))
}

/// Last element, not the rest of the list.
fn tail(_: &mut Interpreter, _: &Env, args: Vec<Value>) -> Result<Value> {
    helpers::list("tail", &args, 0)?
        .last()
        .cloned()
        .ok_or_else(|| builtin_error("tail", "argument must not be an empty list"))
}

fn at(_: &mut Interpreter, _: &Env, args: Vec<Value>) -> Result<Value> {
    let items = helpers::list("at", &args, 0)?;
    let index = helpers::number("at", &args, 1)?;
    usize::try_from(index)
        .ok()
        .and_then(|i| items.get(i))
        .cloned()
        .ok_or_else(|| {
            builtin_error(
                "at",
                format!("index {} out of bounds for list of length {}", index, items.len()),
            )
        })
}

/// `(range a b)` is the half-open `[a, b)`.
fn range(_: &mut Interpreter, _: &Env, args: Vec<Value>) -> Result<Value> {
    let start = helpers::number("range", &args, 0)?;
    let end = helpers::number("range", &args, 1)?;
    Ok(Value::list((start..end).map(Value::number).collect()))
}

/// `(any list)` or `(any pred list)`.
fn any(interp: &mut Interpreter, env: &Env, args: Vec<Value>) -> Result<Value> {
    if args.len() == 1 {
        let items = helpers::list("any", &args, 0)?;
        return Ok(Value::bool(items.iter().any(Value::is_truthy)));
    }

    let pred = helpers::callable("any", &args, 0)?;
    let items = helpers::list("any", &args, 1)?;
    for item in items {
        if interp
            .invoke(&pred, env, vec![item.clone()], Span::synthetic())?
            .is_truthy()
        {
            return Ok(Value::bool(true));
        }
    }
    Ok(Value::bool(false))
}

fn is_list(_: &mut Interpreter, _: &Env, args: Vec<Value>) -> Result<Value> {
    Ok(Value::bool(args[0].is_list()))
}

/// Element-wise `==`, as a list of booleans.
fn array_equal(_: &mut Interpreter, _: &Env, args: Vec<Value>) -> Result<Value> {
    let left = helpers::list("arrayEqual", &args, 0)?;
    let right = helpers::list("arrayEqual", &args, 1)?;
    if left.len() != right.len() {
        return Err(builtin_error("arrayEqual", "lists must have the same length"));
    }
    Ok(Value::list(
        left.iter()
            .zip(right)
            .map(|(a, b)| Value::bool(a.is_equal(b)))
            .collect(),
    ))
}

fn sqrt(_: &mut Interpreter, _: &Env, args: Vec<Value>) -> Result<Value> {
    let n = helpers::number("sqrt", &args, 0)?;
    integer_sqrt(n)
        .map(Value::number)
        .map_err(|message| AutumnError::runtime_error(message, Span::synthetic()))
}

fn integer_sqrt(n: i64) -> std::result::Result<i64, String> {
    if n < 0 {
        return Err("sqrt() argument must be non-negative".to_string());
    }
    // Float estimate, then corrected to the exact floor.
    let mut root = (n as f64).sqrt() as i64;
    while root.checked_mul(root).map_or(true, |sq| sq > n) {
        root -= 1;
    }
    while (root + 1).checked_mul(root + 1).map_or(false, |sq| sq <= n) {
        root += 1;
    }
    Ok(root)
}

/* ----------------------------- */
/* PURE KERNELS                  */
/* ----------------------------- */

fn sqrt_kernel(plain: Plain) -> std::result::Result<Plain, String> {
    match plain {
        Plain::Number(n) => integer_sqrt(n).map(Plain::Number),
        other => Err(format!("sqrt() argument must be a number, instead got {:?}", other)),
    }
}

fn is_list_kernel(plain: Plain) -> std::result::Result<Plain, String> {
    Ok(Plain::Bool(matches!(plain, Plain::List(_))))
}

fn length_kernel(plain: Plain) -> std::result::Result<Plain, String> {
    match plain {
        Plain::List(items) => Ok(Plain::Number(items.len() as i64)),
        other => Err(format!("length() argument must be a list, instead got {:?}", other)),
    }
}

fn head_kernel(plain: Plain) -> std::result::Result<Plain, String> {
    match plain {
        Plain::List(items) => items
            .into_iter()
            .next()
            .ok_or_else(|| "head() argument must not be an empty list".to_string()),
        other => Err(format!("head() argument must be a list, instead got {:?}", other)),
    }
}

fn tail_kernel(plain: Plain) -> std::result::Result<Plain, String> {
    match plain {
        Plain::List(items) => items
            .into_iter()
            .last()
            .ok_or_else(|| "tail() argument must not be an empty list".to_string()),
        other => Err(format!("tail() argument must be a list, instead got {:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use pretty_assertions::assert_eq;

    fn run(interp: &mut Interpreter, source: &str) -> Result<Value> {
        let globals = interp.globals().clone();
        let expr = crate::parser::parse_expression(source)?;
        interp.evaluate(&expr, &globals)
    }

    fn started(config: EngineConfig) -> Interpreter {
        let mut interp = Interpreter::with_config(config);
        interp.start(&[], "", "", 0).unwrap();
        interp
    }

    #[test]
    fn map_filter_and_fold() {
        let mut interp = started(EngineConfig::default());
        assert_eq!(
            run(&mut interp, "(map (--> x (* x x)) (range 0 4))").unwrap().to_string(),
            "([(0: N), (1: N), (4: N), (9: N)] :List<Number>)"
        );
        assert_eq!(
            run(&mut interp, "(filter (--> x (> x 1)) (range 0 4))").unwrap().to_string(),
            "([(2: N), (3: N)] :List<Number>)"
        );
        assert_eq!(
            run(&mut interp, "(foldl (--> (acc x) (+ acc x)) 0 (range 1 5))")
                .unwrap()
                .as_number(),
            Some(10)
        );
    }

    #[test]
    fn head_and_tail_are_first_and_last() {
        let mut interp = started(EngineConfig::default());
        assert_eq!(run(&mut interp, "(head (list 1 2 3))").unwrap().as_number(), Some(1));
        assert_eq!(run(&mut interp, "(tail (list 1 2 3))").unwrap().as_number(), Some(3));
        assert!(run(&mut interp, "(head (list))").is_err());
        assert!(run(&mut interp, "(at (list 1) 1)").is_err());
    }

    #[test]
    fn integer_sqrt_is_exact_near_the_top() {
        assert_eq!(integer_sqrt(i64::MAX), Ok(3_037_000_499));
        assert_eq!(integer_sqrt(3_037_000_499 * 3_037_000_499), Ok(3_037_000_499));
        assert_eq!(integer_sqrt(3_037_000_499 * 3_037_000_499 - 1), Ok(3_037_000_498));
        assert_eq!(integer_sqrt(15), Ok(3));
        assert_eq!(integer_sqrt(0), Ok(0));
        assert!(integer_sqrt(-1).is_err());
    }

    #[test]
    fn arity_is_checked_before_the_body() {
        let mut interp = started(EngineConfig::default());
        let err = run(&mut interp, "(length (list 1) (list 2))").unwrap_err();
        assert_eq!(err.code(), "E_ARITY");
        assert_eq!(err.message, "length() expects 1 argument(s), got 2");
    }

    #[test]
    fn parallel_map_matches_sequential_order() {
        let config = EngineConfig {
            parallel_map_threshold: 64,
            parallel_chunk_size: 8,
            ..EngineConfig::default()
        };
        let mut interp = started(config);
        let mapped = run(&mut interp, "(map sqrt (range 0 200))").unwrap();
        let expected: Vec<i64> = (0..200).map(|n| (n as f64).sqrt() as i64).collect();
        let got: Vec<i64> = mapped
            .as_list()
            .unwrap()
            .iter()
            .map(|v| v.as_number().unwrap())
            .collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn parallel_kernel_errors_surface() {
        let config = EngineConfig {
            parallel_map_threshold: 4,
            ..EngineConfig::default()
        };
        let mut interp = started(config);
        let err = run(&mut interp, "(map sqrt (list 1 4 -9 16))").unwrap_err();
        assert!(err.message.contains("non-negative"));
    }

    #[test]
    fn array_equal_compares_elementwise() {
        let mut interp = started(EngineConfig::default());
        assert_eq!(
            run(&mut interp, "(arrayEqual (list 1 2) (list 1 3))").unwrap().to_string(),
            "([(true: Bool), (false: Bool)] :List<Bool>)"
        );
        assert!(run(&mut interp, "(arrayEqual (list 1) (list))").is_err());
    }
}
