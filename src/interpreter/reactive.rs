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

//! Program start-up and the per-step reactive update.
//!
//! ```text
//! new ──start──▶ started ──step──▶ started ──step──▶ ...
//! ```
//!
//! `start` runs the builtins, the stdlib and the program, then binds
//! every `initnext` initial value. Each `step`:
//!
//! 1. snapshots the scope chain as the previous environment
//! 2. clears the per-variable "updated" flags
//! 3. re-evaluates the trigger condition, if any
//! 4. runs the `on` clauses whose condition holds
//! 5. advances every `initnext` binding not assigned in this step
//! 6. clears one-shot input

use std::collections::{BTreeSet, HashMap};
use std::fs;

use crate::ast::{Expr, ExprRef, Stmt};
use crate::error::{AutumnError, Result};
use crate::interpreter::environment::Environment;
use crate::interpreter::Interpreter;
use crate::parser::{parse_expression, parse_program};
use crate::span::Span;
use crate::types::AutumnType;
use crate::value::{Value, ValueKind};

/// Autumn source run before the program when no stdlib is supplied.
pub const PRELUDE: &str = include_str!("../prelude.sexp");

const TRIGGER_FLAG: &str = "SpecialConditionTriggered";

#[derive(Debug, Clone)]
pub struct OnClause {
    pub condition: ExprRef,
    pub body: ExprRef,
}

/// Bookkeeping for `initnext` bindings, `on` clauses and coverage.
#[derive(Debug, Default)]
pub struct ReactiveState {
    pub(crate) init_order: Vec<String>,
    pub(crate) inits: HashMap<String, ExprRef>,
    pub(crate) nexts: HashMap<String, ExprRef>,
    pub(crate) on_clauses: Vec<OnClause>,
    pub(crate) covered: BTreeSet<usize>,
    pub(crate) trigger: Option<ExprRef>,
    pub(crate) steps: u64,
}

impl ReactiveState {
    pub fn register(&mut self, name: &str, init: ExprRef, next: ExprRef) {
        if !self.init_order.iter().any(|n| n == name) {
            self.init_order.push(name.to_string());
        }
        self.inits.insert(name.to_string(), init);
        self.nexts.insert(name.to_string(), next);
    }

    pub fn push_on_clause(&mut self, condition: ExprRef, body: ExprRef) {
        self.on_clauses.push(OnClause { condition, body });
    }
}

impl Interpreter {
    /// Starts (or restarts) the engine.
    ///
    /// An empty `stdlib` falls back to `stdlib_path` and then to the
    /// embedded prelude; an empty `trigger` disables the trigger flag
    /// update.
    #[tracing::instrument(level = "debug", skip(self, program, stdlib, trigger))]
    pub fn start(&mut self, program: &[Stmt], stdlib: &str, trigger: &str, seed: u64) -> Result<()> {
        self.reset_state();
        self.rng.reseed(seed);

        let globals = self.globals.clone();
        globals
            .borrow_mut()
            .define("GRID_SIZE", Value::number(self.config.default_grid_size));
        crate::globals::install(&globals);
        self.register_builtin_types();

        self.load_stdlib(stdlib)?;

        Environment::assign(&globals, TRIGGER_FLAG, Value::bool(false))?;
        if !trigger.trim().is_empty() {
            let expr = parse_expression(trigger)
                .map_err(|e| e.with_context("Failed to parse triggering condition"))?;
            self.reactive.trigger = Some(expr);
        }

        self.execute_all(program, &globals)?;
        self.initialize()?;
        self.render_all()?;

        tracing::debug!(
            bindings = self.reactive.init_order.len(),
            on_clauses = self.reactive.on_clauses.len(),
            "engine started"
        );
        Ok(())
    }

    /// Parses `program` and starts the engine with it.
    pub fn start_source(&mut self, program: &str, stdlib: &str, trigger: &str, seed: u64) -> Result<()> {
        let program = parse_program(program)?;
        self.start(&program, stdlib, trigger, seed)
    }

    /// Restarts with new code, keeping the current seed.
    pub fn reload_code(&mut self, program: &[Stmt], stdlib: &str, trigger: &str) -> Result<()> {
        let seed = self.rng.seed();
        self.start(program, stdlib, trigger, seed)
    }

    /// Runs one statement against a started engine. An `initnext`
    /// assignment also binds its initial value right away.
    pub fn execute_incremental(&mut self, stmt: &Stmt) -> Result<()> {
        let globals = self.globals.clone();

        if let Stmt::Expression(expr) = stmt {
            if let Expr::Assign { name, value, .. } = &**expr {
                if let Expr::InitNext { init, .. } = &**value {
                    self.evaluate(expr, &globals)?;
                    let initial = self
                        .evaluate(init, &globals)
                        .map_err(|e| e.with_context(format!("initializing {}", name.lexeme)))?;
                    globals.borrow_mut().define(&name.lexeme, initial);
                    return Ok(());
                }
            }
        }

        self.execute(stmt, &globals)
    }

    /// Advances the world by one tick.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn step(&mut self) -> Result<()> {
        let globals = self.globals.clone();

        self.prev = Some(Environment::snapshot_chain(&globals));
        for scope in Environment::chain(&globals) {
            scope.borrow_mut().reset_update_states();
        }

        if let Some(trigger) = self.reactive.trigger.clone() {
            let fired = self
                .evaluate(&trigger, &globals)
                .map_err(|e| e.with_context(format!("trigger {}", trigger)))?
                .is_truthy();
            Environment::assign(&globals, TRIGGER_FLAG, Value::bool(fired))?;
        }

        for index in 0..self.reactive.on_clauses.len() {
            let clause = self.reactive.on_clauses[index].clone();
            let context = || format!("(on {} {})", clause.condition, clause.body);

            let holds = self
                .on_condition_holds(&clause.condition)
                .map_err(|e| e.with_context(context()))?;
            if holds {
                self.reactive.covered.insert(index);
                self.evaluate(&clause.body, &globals)
                    .map_err(|e| e.with_context(context()))?;
            }
        }

        for name in self.reactive.init_order.clone() {
            let next = match self.reactive.nexts.get(&name) {
                Some(next) => next.clone(),
                None => continue,
            };
            if Environment::is_updated(&globals, &name) || !globals.borrow().has_local(&name) {
                continue;
            }

            let value = self
                .evaluate(&next, &globals)
                .map_err(|e| e.with_context(format!("next value of {}: {}", name, next)))?;
            Environment::assign(&globals, &name, value)
                .map_err(|e| e.with_context(format!("next value of {}", name)))?;
        }

        self.input.reset();
        self.reactive.steps += 1;
        tracing::debug!(
            step = self.reactive.steps,
            covered = self.reactive.covered.len(),
            "step finished"
        );
        Ok(())
    }

    pub fn on_clause_count(&self) -> usize {
        self.reactive.on_clauses.len()
    }

    pub fn covered_on_clause_count(&self) -> usize {
        self.reactive.covered.len()
    }

    pub fn step_count(&self) -> u64 {
        self.reactive.steps
    }

    /// Last value of the trigger flag; `false` before `start`.
    pub fn trigger_state(&self) -> bool {
        Environment::get(&self.globals, TRIGGER_FLAG)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    fn on_condition_holds(&mut self, condition: &ExprRef) -> Result<bool> {
        let globals = self.globals.clone();
        let value = self.evaluate(condition, &globals)?;

        match value.kind() {
            ValueKind::Bool(b) => Ok(*b),
            ValueKind::Callable(callable) => {
                let callable = callable.clone();
                let produced = self.invoke(&callable, &globals, Vec::new(), condition.span())?;
                Ok(produced.is_truthy())
            }
            _ => Err(AutumnError::type_mismatch(
                format!("On condition must be a boolean expression, got {}", value),
                condition.span(),
            )),
        }
    }

    /// Binds every registered initial value, in declaration order.
    fn initialize(&mut self) -> Result<()> {
        let globals = self.globals.clone();

        for name in self.reactive.init_order.clone() {
            let init = match self.reactive.inits.get(&name) {
                Some(init) => init.clone(),
                None => continue,
            };

            let value = self.evaluate(&init, &globals).map_err(|e| {
                if self.config.verbose {
                    tracing::warn!(name = %name, error = %e, "initializer failed");
                }
                e.with_context(format!("Init failed: {}", name))
            })?;
            tracing::trace!(name = %name, value = %value, "initialized");
            globals.borrow_mut().define(&name, value);
        }
        Ok(())
    }

    fn register_builtin_types(&mut self) {
        let classes = self.classes.clone();
        let mut globals = self.globals.borrow_mut();
        globals.define_type("Bool", AutumnType::Bool);
        globals.define_type("String", AutumnType::String);
        globals.define_type("Number", AutumnType::Number);
        globals.define_type("Int", AutumnType::Number);
        globals.define_type("Position", AutumnType::Class(classes.position));
        globals.define_type("Cell", AutumnType::Class(classes.cell));
        globals.define_type("RenderedElem", AutumnType::Class(classes.rendered_elem));
    }

    fn load_stdlib(&mut self, source: &str) -> Result<()> {
        let (origin, text) = if !source.trim().is_empty() {
            ("override".to_string(), source.to_string())
        } else if let Some(path) = &self.config.stdlib_path {
            let text = fs::read_to_string(path).map_err(|err| {
                AutumnError::runtime_error(
                    format!("cannot read stdlib {}: {}", path.display(), err),
                    Span::synthetic(),
                )
            })?;
            (path.display().to_string(), text)
        } else {
            ("prelude".to_string(), PRELUDE.to_string())
        };

        let globals = self.globals.clone();
        let result = parse_program(&text).and_then(|stmts| self.execute_all(&stmts, &globals));

        match result {
            Ok(()) => {
                tracing::debug!(origin = %origin, "stdlib loaded");
                Ok(())
            }
            Err(err) => {
                if self.config.verbose {
                    tracing::warn!(origin = %origin, error = %err, "stdlib failed to load");
                }
                Err(err.with_context(format!("loading stdlib from {}", origin)))
            }
        }
    }
}
