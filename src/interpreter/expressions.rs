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

use std::rc::Rc;

use crate::ast::{Expr, Literal};
use crate::error::{AutumnError, Result};
use crate::interpreter::calls::Lambda;
use crate::interpreter::environment::{Env, Environment, ScopeKind};
use crate::interpreter::Interpreter;
use crate::lexer::token::{Token, TokenKind};
use crate::types::AutumnType;
use crate::value::{Value, ValueKind};

impl Interpreter {
    /// Evaluates an expression in `env`.
    ///
    /// This is the single dispatch point for every expression form:
    ///
    /// - literals, variables and type names
    /// - unary, binary and logical operators
    /// - calls (functions, classes, deferred cells)
    /// - field access and in-place field update
    /// - `if`, `let`, lambdas and list literals
    /// - assignment, including `initnext` registration
    pub fn evaluate(&mut self, expr: &Expr, env: &Env) -> Result<Value> {
        match expr {
            /* ----------------------------- */
            /* LITERALS                      */
            /* ----------------------------- */
            Expr::Literal { value, .. } => Ok(match value {
                Literal::Number(n) => Value::number(*n),
                Literal::Str(s) => Value::string(s),
                Literal::Bool(b) => Value::bool(*b),
                Literal::Nil => Value::null(),
            }),

            /* ----------------------------- */
            /* NAMES                         */
            /* ----------------------------- */
            Expr::Variable { id, name } => {
                if let Some(ty) = Environment::get_type_value(env, &name.lexeme) {
                    return Ok(Value::type_value(ty));
                }

                let found = match self.locals.get(id) {
                    Some(distance) => Environment::get_at(env, *distance, &name.lexeme),
                    None => Environment::get(env, &name.lexeme),
                };
                found.ok_or_else(|| AutumnError::undefined_variable(&name.lexeme, name.span))
            }

            Expr::TypeVariable { .. } | Expr::ListType { .. } => {
                Ok(Value::type_value(self.type_of(expr, env)?))
            }

            Expr::TypeDecl { name, type_expr } => {
                let ty = self.type_of(type_expr, env)?;
                env.borrow_mut().assign_type(&name.lexeme, ty.clone());
                Ok(Value::type_value(ty))
            }

            /* ----------------------------- */
            /* OPERATORS                     */
            /* ----------------------------- */
            Expr::Unary { operator, right } => {
                let right = self.evaluate(right, env)?;
                unary(operator, &right)
            }

            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left, env)?;
                let right = self.evaluate(right, env)?;
                binary(operator, &left, &right)
            }

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left, env)?;
                let left = self.implicit_call(left, env)?;

                let short_circuit = match operator.kind {
                    TokenKind::Or => left.is_truthy(),
                    _ => !left.is_truthy(),
                };
                if short_circuit {
                    return Ok(Value::bool(left.is_truthy()));
                }

                let right = self.evaluate(right, env)?;
                let right = self.implicit_call(right, env)?;
                Ok(Value::bool(right.is_truthy()))
            }

            /* ----------------------------- */
            /* CALLS & OBJECTS               */
            /* ----------------------------- */
            Expr::Call {
                callee,
                arguments,
                span,
            } => self.eval_call(callee, arguments, *span, env),

            Expr::Get { object, name } => {
                let object = self.evaluate(object, env)?;
                self.get_property(&object, name)
            }

            Expr::Set {
                object,
                name,
                value,
            } => {
                let object = self.evaluate(object, env)?;
                let value = self.evaluate(value, env)?;
                match object.as_instance() {
                    Some(instance) => {
                        instance
                            .set(&name.lexeme, value.clone())
                            .map_err(|e| e.at(name.span))?;
                        Ok(value)
                    }
                    None => Err(AutumnError::runtime_error(
                        format!("Only instances have fields, cannot set '{}' on {}", name.lexeme, object),
                        name.span,
                    )),
                }
            }

            Expr::Lambda(decl) => Ok(Value::callable(Rc::new(Lambda {
                decl: decl.clone(),
                closure: Some(env.clone()),
                frame: ScopeKind::Local,
            }))),

            Expr::ListVar { items, .. } => Ok(Value::list(self.evaluate_all(items, env)?)),

            /* ----------------------------- */
            /* CONTROL FLOW                  */
            /* ----------------------------- */
            Expr::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                let test = self
                    .evaluate(condition, env)
                    .and_then(|test| self.implicit_call(test, env))
                    .map_err(|e| e.with_context(format!("condition {}", condition)))?;

                let (label, branch) = if test.is_truthy() {
                    ("then", then_branch)
                } else {
                    ("else", else_branch)
                };
                self.evaluate(branch, env)
                    .map_err(|e| e.with_context(format!("{} branch of {}", label, expr)))
            }

            Expr::Let { body, .. } => {
                let scope = Environment::child(env, ScopeKind::Local);
                let mut last = Value::null();
                for item in body {
                    last = self.evaluate(item, &scope)?;
                }
                Ok(last)
            }

            /* ----------------------------- */
            /* ASSIGNMENT                    */
            /* ----------------------------- */
            Expr::Assign { name, value, .. } => {
                if let Expr::InitNext { init, next, .. } = &**value {
                    self.reactive
                        .register(&name.lexeme, init.clone(), next.clone());
                    return Ok(Value::null());
                }

                let value = self.evaluate(value, env)?;

                if let Some(declared) = Environment::assigned_type(env, &name.lexeme) {
                    if !declared.is_list() && !declared.accepts(&value.ty()) {
                        return Err(AutumnError::type_mismatch(
                            format!(
                                "Cannot assign value of type '{}' to '{}' declared as '{}'",
                                value.ty(),
                                name.lexeme,
                                declared
                            ),
                            name.span,
                        ));
                    }
                }

                Environment::assign(env, &name.lexeme, value.clone()).map_err(|e| e.at(name.span))?;
                Ok(value)
            }

            Expr::InitNext { span, .. } => Err(AutumnError::runtime_error(
                "initnext may only appear on the right-hand side of an assignment",
                *span,
            )),
        }
    }

    /// Zero-argument callables and deferred values used as conditions
    /// are invoked to obtain the value actually tested.
    pub(crate) fn implicit_call(&mut self, value: Value, env: &Env) -> Result<Value> {
        match value.kind() {
            ValueKind::Callable(callable) if callable.arity().accepts(0) => {
                let callable = callable.clone();
                self.invoke(&callable, env, Vec::new(), crate::span::Span::synthetic())
            }
            ValueKind::Deferred(_) => self.resolve_value(value, env),
            _ => Ok(value),
        }
    }

    /// Field value or bound method.
    pub fn get_property(&mut self, object: &Value, name: &Token) -> Result<Value> {
        let instance = object.as_instance().ok_or_else(|| {
            AutumnError::runtime_error(
                format!("Only instances have properties, cannot read '{}' from {}", name.lexeme, object),
                name.span,
            )
        })?;

        if let Some(value) = instance.field(&name.lexeme) {
            return Ok(value);
        }

        match instance.class().method(&name.lexeme) {
            Some(method) => Ok(Value::callable(Rc::new(crate::interpreter::calls::Method {
                receiver: object.clone(),
                callable: method.clone(),
            }))),
            None => Err(AutumnError::undefined_property(
                &name.lexeme,
                instance.class_name(),
                name.span,
            )),
        }
    }

    /// Resolves a type expression (`Number`, `Light`, `(List Cell)`).
    pub(crate) fn type_of(&mut self, expr: &Expr, env: &Env) -> Result<AutumnType> {
        match expr {
            Expr::TypeVariable { name } | Expr::Variable { name, .. } => {
                Environment::get_type_value(env, &name.lexeme).ok_or_else(|| {
                    AutumnError::undefined_variable(&name.lexeme, name.span)
                        .with_help("types must be built in or declared with `object` before use")
                })
            }
            Expr::ListType { element, .. } => Ok(AutumnType::list_of(self.type_of(element, env)?)),
            other => Err(AutumnError::parse_error(
                format!("Invalid type expression: {}", other),
                other.span(),
            )),
        }
    }
}

fn unary(operator: &Token, right: &Value) -> Result<Value> {
    match (operator.kind, right.kind()) {
        (TokenKind::Minus, ValueKind::Number(n)) => n
            .checked_neg()
            .map(Value::number)
            .ok_or_else(|| AutumnError::runtime_error("Integer overflow in negation", operator.span)),
        (TokenKind::Plus, ValueKind::Number(n)) => Ok(Value::number(*n)),
        (TokenKind::Bang, ValueKind::Bool(b)) => Ok(Value::bool(!b)),
        (TokenKind::Bang, _) => Err(AutumnError::type_mismatch(
            format!("Unary ! must be applied to a boolean, instead got {}", right),
            operator.span,
        )),
        _ => Err(AutumnError::type_mismatch(
            format!(
                "Unary {} must be applied to a number, instead got {}",
                operator.lexeme, right
            ),
            operator.span,
        )),
    }
}

fn binary(operator: &Token, left: &Value, right: &Value) -> Result<Value> {
    match operator.kind {
        TokenKind::EqualEqual => return Ok(Value::bool(left.is_equal(right))),
        TokenKind::BangEqual => return Ok(Value::bool(!left.is_equal(right))),
        _ => {}
    }

    let (a, b) = match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return Err(AutumnError::type_mismatch(
                format!(
                    "Binary {} must be applied to two numbers, instead got {} and {}",
                    operator.lexeme, left, right
                ),
                operator.span,
            ));
        }
    };

    let overflow = || {
        AutumnError::runtime_error(
            format!("Integer overflow in ({} {} {})", operator.lexeme, a, b),
            operator.span,
        )
    };

    let value = match operator.kind {
        TokenKind::Plus => Value::number(a.checked_add(b).ok_or_else(overflow)?),
        TokenKind::Minus => Value::number(a.checked_sub(b).ok_or_else(overflow)?),
        TokenKind::Star => Value::number(a.checked_mul(b).ok_or_else(overflow)?),
        TokenKind::Slash => {
            if b == 0 {
                return Err(AutumnError::runtime_error("Division by zero", operator.span));
            }
            Value::number(a.checked_div(b).ok_or_else(overflow)?)
        }
        TokenKind::Percent => {
            if b == 0 {
                return Err(AutumnError::runtime_error("Modulo by zero", operator.span));
            }
            Value::number(a.checked_rem(b).ok_or_else(overflow)?)
        }
        TokenKind::Greater => Value::bool(a > b),
        TokenKind::GreaterEqual => Value::bool(a >= b),
        TokenKind::Less => Value::bool(a < b),
        TokenKind::LessEqual => Value::bool(a <= b),
        _ => {
            return Err(AutumnError::runtime_error(
                format!("Unknown binary operator '{}'", operator.lexeme),
                operator.span,
            ));
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::parser::parse_expression;
    use pretty_assertions::assert_eq;

    fn eval(source: &str) -> Result<Value> {
        let mut interp = Interpreter::new();
        let globals = interp.globals.clone();
        let expr = parse_expression(source)?;
        interp.evaluate(&expr, &globals)
    }

    #[test]
    fn arithmetic_truncates_like_integer_division() {
        assert_eq!(eval("(/ 7 2)").unwrap().as_number(), Some(3));
        assert_eq!(eval("(/ -7 2)").unwrap().as_number(), Some(-3));
        assert_eq!(eval("(% -7 2)").unwrap().as_number(), Some(-1));
        assert_eq!(eval("(- 3)").unwrap().as_number(), Some(-3));
    }

    #[test]
    fn division_and_modulo_by_zero_raise() {
        let err = eval("(/ 1 0)").unwrap_err();
        assert_eq!(err.kind, ErrorKind::RuntimeError);
        assert_eq!(err.message, "Division by zero");

        assert_eq!(eval("(% 1 0)").unwrap_err().message, "Modulo by zero");
    }

    #[test]
    fn overflow_raises() {
        let err = eval("(+ 9223372036854775807 1)").unwrap_err();
        assert_eq!(err.kind, ErrorKind::RuntimeError);
    }

    #[test]
    fn mismatched_operands_describe_both_sides() {
        let err = eval(r#"(+ 1 "a")"#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert_eq!(
            err.message,
            "Binary + must be applied to two numbers, instead got (1: N) and (a: S)"
        );
    }

    #[test]
    fn equality_is_value_level() {
        assert_eq!(eval("(== 1 true)").unwrap().as_bool(), Some(true));
        assert_eq!(eval(r#"(!= "a" "a")"#).unwrap().as_bool(), Some(false));
    }

    #[test]
    fn logical_operators_short_circuit() {
        assert_eq!(eval("(or true (/ 1 0))").unwrap().as_bool(), Some(true));
        assert_eq!(eval("(and false (/ 1 0))").unwrap().as_bool(), Some(false));
        assert!(eval("(and true (/ 1 0))").is_err());
    }

    #[test]
    fn let_returns_last_value_and_scopes_locals() {
        let mut interp = Interpreter::new();
        let globals = interp.globals.clone();
        let expr = parse_expression("(let (= tmp 2) (+ tmp 1))").unwrap();
        assert_eq!(interp.evaluate(&expr, &globals).unwrap().as_number(), Some(3));
    }

    #[test]
    fn if_errors_carry_branch_context() {
        let err = eval("(if true then (/ 1 0) else 0)").unwrap_err();
        assert_eq!(err.context.len(), 1);
        assert!(err.context[0].starts_with("then branch of (if true"));
    }

    #[test]
    fn undefined_variables_are_reported() {
        let err = eval("nowhere").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UndefinedVariable);
        assert_eq!(err.message, "Undefined variable 'nowhere'");
    }

    #[test]
    fn declared_types_guard_assignment() {
        let mut interp = Interpreter::new();
        interp.start(&[], "", "", 0).unwrap();
        let globals = interp.globals.clone();
        for source in ["(: score Number)", "(= score 1)"] {
            let expr = parse_expression(source).unwrap();
            interp.evaluate(&expr, &globals).unwrap();
        }
        let expr = parse_expression("(= score true)").unwrap();
        let err = interp.evaluate(&expr, &globals).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
    }
}
