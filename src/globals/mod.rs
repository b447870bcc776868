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

//! The builtin catalog bound into every fresh global scope.

mod grid;
mod input;
mod list;
mod misc;
mod objects;

use std::rc::Rc;

use crate::interpreter::calls::{Callable, NativeFn};
use crate::interpreter::environment::Env;
use crate::value::Value;

/// Defines every builtin function in `globals`.
pub fn install(globals: &Env) {
    let natives: Vec<NativeFn> = list::natives()
        .into_iter()
        .chain(objects::natives())
        .chain(grid::natives())
        .chain(input::natives())
        .chain(misc::natives())
        .collect();

    tracing::trace!(count = natives.len(), "installing builtins");
    let mut scope = globals.borrow_mut();
    for native in natives {
        let name = native.name().to_string();
        scope.define(&name, Value::callable(Rc::new(native)));
    }
}
