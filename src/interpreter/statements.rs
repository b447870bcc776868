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

use crate::ast::{Expr, Stmt};
use crate::error::{AutumnError, Result};
use crate::interpreter::classes::make_object_class;
use crate::interpreter::environment::Env;
use crate::interpreter::Interpreter;
use crate::types::AutumnType;

impl Interpreter {
    /// Executes one top-level statement in `env`.
    ///
    /// - `object` declarations register a class as a type
    /// - `on` clauses are queued for every later step
    /// - expression statements are evaluated for effect
    pub fn execute(&mut self, stmt: &Stmt, env: &Env) -> Result<()> {
        match stmt {
            Stmt::Object { name, fields, cell } => {
                let mut declared = Vec::with_capacity(fields.len());
                for field in fields {
                    match &**field {
                        Expr::TypeDecl { name, type_expr } => {
                            declared.push((name.lexeme.clone(), self.type_of(type_expr, env)?));
                        }
                        other => {
                            return Err(AutumnError::parse_error(
                                format!("object fields must be type declarations, got {}", other),
                                other.span(),
                            ));
                        }
                    }
                }

                let class = make_object_class(&name.lexeme, declared, cell.clone(), &self.classes)
                    .map_err(|e| e.with_context(format!("object {}", name.lexeme)))?;
                tracing::debug!(object = %name.lexeme, "declared object class");
                env.borrow_mut()
                    .define_type(&name.lexeme, AutumnType::Class(Rc::new(class)));
                Ok(())
            }

            Stmt::OnClause { condition, body } => {
                self.reactive.push_on_clause(condition.clone(), body.clone());
                Ok(())
            }

            Stmt::Expression(expr) => {
                self.evaluate(expr, env)
                    .map_err(|e| e.with_context(expr.to_string()))?;
                Ok(())
            }
        }
    }

    pub fn execute_all(&mut self, stmts: &[Stmt], env: &Env) -> Result<()> {
        stmts.iter().try_for_each(|stmt| self.execute(stmt, env))
    }
}
