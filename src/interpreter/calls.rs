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

use std::fmt;
use std::rc::Rc;

use crate::ast::{collect_variables, Expr, ExprRef, LambdaDecl};
use crate::error::{AutumnError, Result};
use crate::interpreter::environment::{capture_scope, Env, Environment, ScopeKind};
use crate::interpreter::Interpreter;
use crate::object::{Class, Instance};
use crate::span::Span;
use crate::types::AutumnType;
use crate::value::{DeferredExpr, Plain, Value, ValueKind};

/// Side-effect free element function that can run off the main thread.
pub type PureKernel = fn(Plain) -> std::result::Result<Plain, String>;

/// Accepted argument counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    pub const fn exact(n: usize) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    pub const fn range(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{}", max),
            Some(max) => write!(f, "{} to {}", self.min, max),
            None => write!(f, "at least {}", self.min),
        }
    }
}

/// Uniform contract for everything that can be invoked: builtins, user
/// lambdas, generated initializers and bound methods.
///
/// `env` is the caller's active scope; implementations that need a
/// fresh frame create it as a child of `env` (or of their closure).
pub trait Callable {
    fn name(&self) -> &str;

    fn arity(&self) -> Arity;

    fn call(&self, interp: &mut Interpreter, env: &Env, args: Vec<Value>) -> Result<Value>;

    /// Thread-safe form of the callable, if it has one.
    fn pure_kernel(&self) -> Option<PureKernel> {
        None
    }
}

pub type NativeBody = fn(&mut Interpreter, &Env, Vec<Value>) -> Result<Value>;

/// Builtin implemented in Rust.
pub struct NativeFn {
    pub name: &'static str,
    pub arity: Arity,
    pub body: NativeBody,
    pub kernel: Option<PureKernel>,
}

impl NativeFn {
    pub fn new(name: &'static str, arity: Arity, body: NativeBody) -> Self {
        Self {
            name,
            arity,
            body,
            kernel: None,
        }
    }

    pub fn with_kernel(mut self, kernel: PureKernel) -> Self {
        self.kernel = Some(kernel);
        self
    }
}

impl Callable for NativeFn {
    fn name(&self) -> &str {
        self.name
    }

    fn arity(&self) -> Arity {
        self.arity
    }

    fn call(&self, interp: &mut Interpreter, env: &Env, args: Vec<Value>) -> Result<Value> {
        (self.body)(interp, env, args)
    }

    fn pure_kernel(&self) -> Option<PureKernel> {
        self.kernel
    }
}

/// A `(--> params body)` value.
///
/// With a closure the call frame hangs off the defining scope; without
/// one (generated initializers and `render`) it hangs off the caller.
pub struct Lambda {
    pub decl: Rc<LambdaDecl>,
    pub closure: Option<Env>,
    pub frame: ScopeKind,
}

impl Callable for Lambda {
    fn name(&self) -> &str {
        "lambda"
    }

    fn arity(&self) -> Arity {
        Arity::exact(self.decl.params.len())
    }

    fn call(&self, interp: &mut Interpreter, env: &Env, args: Vec<Value>) -> Result<Value> {
        let parent = self.closure.clone().unwrap_or_else(|| env.clone());
        let scope = Environment::child(&parent, self.frame);
        {
            let mut scope = scope.borrow_mut();
            for (param, arg) in self.decl.params.iter().zip(args) {
                scope.define(&param.lexeme, arg);
            }
        }

        interp
            .evaluate(&self.decl.body, &scope)
            .map_err(|e| e.with_context(self.decl.to_string()))
    }
}

/// A class method bound to its receiver.
pub struct Method {
    pub receiver: Value,
    pub callable: Rc<dyn Callable>,
}

impl Callable for Method {
    fn name(&self) -> &str {
        self.callable.name()
    }

    fn arity(&self) -> Arity {
        self.callable.arity()
    }

    /// Runs the method in an `Instance` scope holding the receiver's
    /// fields.
    fn call(&self, interp: &mut Interpreter, env: &Env, args: Vec<Value>) -> Result<Value> {
        let scope = Environment::child(env, ScopeKind::Instance);
        if let Some(instance) = self.receiver.as_instance() {
            let mut scope = scope.borrow_mut();
            for (name, value) in instance.field_values() {
                scope.define(&name, value);
            }
        }
        self.callable.call(interp, &scope, args)
    }
}

impl Interpreter {
    /// Checks arity, then calls.
    pub fn invoke(
        &mut self,
        callable: &Rc<dyn Callable>,
        env: &Env,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Value> {
        let arity = callable.arity();
        if !arity.accepts(args.len()) {
            return Err(AutumnError::arity_error(
                callable.name(),
                arity,
                args.len(),
                span,
            ));
        }
        callable.call(self, env, args).map_err(|e| e.at(span))
    }

    /// Calls any callable value with already evaluated arguments: a
    /// function, a class (construction) or a deferred expression.
    pub fn call_value(&mut self, callee: &Value, env: &Env, args: Vec<Value>, span: Span) -> Result<Value> {
        match callee.kind() {
            ValueKind::Callable(callable) => self.invoke(callable, env, args, span),
            ValueKind::Deferred(deferred) => self.force(deferred, env),
            ValueKind::Type(AutumnType::Class(class)) => self.construct(class, env, args, span),
            _ => Err(AutumnError::runtime_error(
                format!("Can only call functions and classes, got {}", callee),
                span,
            )),
        }
    }

    /// Evaluates a `Call` node.
    pub(crate) fn eval_call(
        &mut self,
        callee: &ExprRef,
        arguments: &[ExprRef],
        span: Span,
        env: &Env,
    ) -> Result<Value> {
        let callee_value = self.evaluate(callee, env)?;

        match callee_value.kind() {
            ValueKind::Type(AutumnType::Class(class)) if class.name == "Cell" => {
                self.construct_cell(class, arguments, env, span)
            }
            ValueKind::Callable(callable) if callable.name() == "prev" => {
                let args = match arguments {
                    [single] => match &**single {
                        Expr::Variable { name, .. } => vec![Value::string(&name.lexeme)],
                        _ => self.evaluate_all(arguments, env)?,
                    },
                    _ => self.evaluate_all(arguments, env)?,
                };
                self.invoke(callable, env, args, span)
            }
            ValueKind::Deferred(deferred) => self.force(deferred, env),
            _ => {
                let args = self.evaluate_all(arguments, env)?;
                self.call_value(&callee_value, env, args, span)
            }
        }
    }

    pub(crate) fn evaluate_all(&mut self, exprs: &[ExprRef], env: &Env) -> Result<Vec<Value>> {
        exprs.iter().map(|e| self.evaluate(e, env)).collect()
    }

    /// Builds an instance from evaluated constructor arguments.
    pub fn construct(&mut self, class: &Rc<Class>, env: &Env, args: Vec<Value>, span: Span) -> Result<Value> {
        let fields = match &class.initializer {
            Some(init) => {
                let produced = self.invoke(init, env, args, span)?;
                match produced.as_list() {
                    Some(items) => items.to_vec(),
                    None => {
                        return Err(AutumnError::runtime_error(
                            format!("Initializer of {} must produce a field list", class.name),
                            span,
                        ));
                    }
                }
            }
            None => args,
        };

        let instance = Instance::new(class.clone(), fields)
            .map_err(|e| e.at(span).with_context(format!("constructing {}", class.name)))?;
        Ok(Value::instance(instance))
    }

    /// `Cell` arguments are never evaluated for good: each becomes a
    /// deferred expression over a scope captured from the names it
    /// mentions. Arguments that already reduce to a number in that
    /// scope are frozen as literals.
    fn construct_cell(
        &mut self,
        class: &Rc<Class>,
        arguments: &[ExprRef],
        env: &Env,
        span: Span,
    ) -> Result<Value> {
        let mut names = std::collections::BTreeSet::new();
        for arg in arguments {
            names.extend(collect_variables(arg));
        }
        let captured = capture_scope(env, &names);

        let mut fields = Vec::with_capacity(arguments.len());
        for arg in arguments {
            let expr = match self.evaluate(arg, &captured) {
                Ok(value) => match value.as_number() {
                    Some(n) => Expr::number(n),
                    None => arg.clone(),
                },
                Err(_) => arg.clone(),
            };
            fields.push(Value::deferred(expr, captured.clone()));
        }

        let instance = Instance::new(class.clone(), fields).map_err(|e| e.at(span))?;
        Ok(Value::instance(instance))
    }

    /// Evaluates a deferred expression in its captured scope, temporarily
    /// parented to the current scope so unresolved names fall through.
    pub fn force(&mut self, deferred: &Rc<DeferredExpr>, env: &Env) -> Result<Value> {
        if Environment::chain_contains(env, &deferred.env) {
            return self.evaluate(&deferred.expr, &deferred.env);
        }

        let previous = deferred.env.borrow_mut().set_enclosing(Some(env.clone()));
        let result = self.evaluate(&deferred.expr, &deferred.env);
        deferred.env.borrow_mut().set_enclosing(previous);

        result.map_err(|e| e.with_context(deferred.expr.to_string()))
    }

    /// Forces deferred values; anything else is returned as is.
    pub fn resolve_value(&mut self, value: Value, env: &Env) -> Result<Value> {
        match value.as_deferred() {
            Some(deferred) => {
                let deferred = deferred.clone();
                self.force(&deferred, env)
            }
            None => Ok(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_bounds() {
        assert!(Arity::exact(2).accepts(2));
        assert!(!Arity::exact(2).accepts(1));
        assert!(Arity::range(1, 2).accepts(1));
        assert!(!Arity::range(1, 2).accepts(3));
        assert_eq!(Arity::range(1, 2).to_string(), "1 to 2");
        assert_eq!(Arity::exact(0).to_string(), "0");
    }
}
