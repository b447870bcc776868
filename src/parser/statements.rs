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

use crate::ast::expr::Expr;
use crate::ast::stmt::Stmt;
use crate::error::{AutumnError, Result};
use crate::parser::helpers::{expect_len, items, name_token, render};
use crate::parser::parser::{Parser, Sexp};

impl Parser {
    /// Parses one top-level form.
    ///
    /// `object` and `on` are only recognised at the head of a
    /// top-level form; everything else is an expression statement.
    pub fn parse_statement(&self, sexp: &Sexp) -> Result<Stmt> {
        match sexp.head().map(|t| t.lexeme.as_str()) {
            Some("object") => self.parse_object(sexp),
            Some("on") => {
                expect_len(sexp, 3, "on")?;
                let children = items(sexp);
                Ok(Stmt::OnClause {
                    condition: self.parse_expr(&children[1])?,
                    body: self.parse_expr(&children[2])?,
                })
            }
            _ => Ok(Stmt::Expression(self.parse_expr(sexp)?)),
        }
    }

    /// `(object Name (: field T)... cellExpr)`
    fn parse_object(&self, sexp: &Sexp) -> Result<Stmt> {
        let children = items(sexp);
        let name = match children.get(1) {
            Some(name) => name_token(name, "Object name")?,
            None => {
                return Err(AutumnError::parse_error(
                    "Object declaration needs a name",
                    sexp.span(),
                ));
            }
        };

        let mut fields = Vec::new();
        let mut cell = None;

        for child in &children[2..] {
            let expr = self.parse_expr(child).map_err(|e| {
                e.with_context(format!("object {}", name.lexeme))
            })?;

            if matches!(&*expr, Expr::TypeDecl { .. }) {
                fields.push(expr);
            } else if cell.is_some() {
                return Err(AutumnError::parse_error(
                    format!(
                        "Object {} has more than one cell expression: {}",
                        name.lexeme,
                        render(child)
                    ),
                    child.span(),
                ));
            } else {
                cell = Some(expr);
            }
        }

        let cell = cell.ok_or_else(|| {
            AutumnError::parse_error(
                format!("Object {} is missing its Cell expression", name.lexeme),
                sexp.span(),
            )
        })?;

        Ok(Stmt::Object { name, fields, cell })
    }
}
