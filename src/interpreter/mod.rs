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

//! Interpreter entry point and host-facing engine API.
//!
//! All evaluation logic lives in the submodules:
//!
//!  - `expressions.rs` → expression evaluation (`evaluate`)
//!  - `statements.rs`  → top-level statements (`execute`)
//!  - `calls.rs`       → the `Callable` contract, calls and cell capture
//!  - `classes.rs`     → builtin classes and `object` class synthesis
//!  - `reactive.rs`    → `start`, `step` and init/next bookkeeping
//!  - `render.rs`      → render report generation
//!  - `input.rs`       → one-shot click / arrow key state
//!  - `environment.rs` → scope chain
//!  - `helpers.rs`     → argument extraction for builtins

pub mod calls;
pub mod classes;
pub mod environment;
pub mod expressions;
pub mod helpers;
pub mod input;
pub mod reactive;
pub mod render;
pub mod statements;

use std::collections::HashMap;

use crate::ast::NodeId;
use crate::config::EngineConfig;
use crate::error::{AutumnError, Result};
use crate::parser::parse_expression;
use crate::random::MinStdRng;
use crate::span::Span;

use classes::BuiltinClasses;
use environment::{Env, Environment};
use input::InputState;
use reactive::ReactiveState;

/// A single Autumn engine instance.
///
/// The active scope is always passed explicitly to `evaluate`; the
/// interpreter itself only owns the global scope, the previous-step
/// snapshot and the reactive bookkeeping.
pub struct Interpreter {
    config: EngineConfig,
    globals: Env,
    prev: Option<Env>,
    locals: HashMap<NodeId, usize>,
    rng: MinStdRng,
    input: InputState,
    reactive: ReactiveState,
    classes: BuiltinClasses,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            globals: Environment::new_global(),
            prev: None,
            locals: HashMap::new(),
            rng: MinStdRng::new(0),
            input: InputState::default(),
            reactive: ReactiveState::default(),
            classes: BuiltinClasses::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn globals(&self) -> &Env {
        &self.globals
    }

    /// Snapshot taken at the start of the current step, if any step ran.
    pub fn prev_environment(&self) -> Option<&Env> {
        self.prev.as_ref()
    }

    pub fn classes(&self) -> &BuiltinClasses {
        &self.classes
    }

    pub fn rng_mut(&mut self) -> &mut MinStdRng {
        &mut self.rng
    }

    /// Records the lexical distance of a variable reference.
    pub fn resolve(&mut self, node: NodeId, depth: usize) {
        self.locals.insert(node, depth);
    }

    /// Parses and evaluates one expression against the global scope and
    /// returns the value's canonical string.
    pub fn evaluate_to_string(&mut self, source: &str) -> Result<String> {
        let expr = parse_expression(source)?;
        let globals = self.globals.clone();
        let value = self.evaluate(&expr, &globals)?;
        Ok(value.to_string())
    }

    /// `background` as bound by the program, unquoted.
    pub fn background(&self) -> String {
        Environment::get(&self.globals, "background")
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| self.config.default_background.clone())
    }

    pub fn frame_rate(&self) -> i64 {
        Environment::get(&self.globals, "FRAME_RATE")
            .and_then(|v| v.as_number())
            .unwrap_or(self.config.default_frame_rate)
    }

    pub fn grid_size(&self) -> i64 {
        Environment::get(&self.globals, "GRID_SIZE")
            .and_then(|v| v.as_number())
            .unwrap_or(self.config.default_grid_size)
    }

    /// JSON dump of the global scope chain.
    pub fn environment_json(&self) -> serde_json::Value {
        Environment::chain_json(&self.globals)
    }

    /// Looks a variable up in the previous-step snapshot.
    pub fn lookup_prev(&self, name: &str) -> Result<crate::value::Value> {
        let prev = self.prev.as_ref().ok_or_else(|| {
            AutumnError::runtime_error(
                format!("prev({}) used before the first step", name),
                Span::synthetic(),
            )
            .with_help("the previous environment only exists once `step` has run")
        })?;

        Environment::get(prev, name).ok_or_else(|| AutumnError::undefined_variable(name, Span::synthetic()))
    }

    /// Clears every binding and all reactive state; the seed is kept.
    fn reset_state(&mut self) {
        self.globals.borrow_mut().reset();
        self.globals = Environment::new_global();
        if let Some(prev) = self.prev.take() {
            prev.borrow_mut().reset();
        }
        self.locals.clear();
        self.input = InputState::default();
        self.reactive = ReactiveState::default();
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Interpreter {
    /// Global lambdas close over the global scope; clearing it breaks the
    /// resulting reference cycles.
    fn drop(&mut self) {
        self.globals.borrow_mut().reset();
        if let Some(prev) = &self.prev {
            prev.borrow_mut().reset();
        }
    }
}
