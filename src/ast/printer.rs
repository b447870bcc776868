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

//! S-expression printing for AST nodes.
//!
//! The printed form re-parses to an equivalent tree and is what error
//! context frames and deferred cell values show to users.

use std::fmt;

use crate::ast::expr::{Expr, LambdaDecl, Literal};
use crate::ast::stmt::Stmt;

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Str(s) => write!(f, "{:?}", s),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Nil => write!(f, "nil"),
        }
    }
}

impl fmt::Display for LambdaDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&str> = self.params.iter().map(|p| p.lexeme.as_str()).collect();
        write!(f, "(--> ({}) {})", params.join(" "), self.body)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal { value, .. } => write!(f, "{}", value),
            Expr::Unary { operator, right } => write!(f, "({} {})", operator, right),
            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => write!(f, "({} {} {})", operator, left, right),
            Expr::Variable { name, .. } | Expr::TypeVariable { name } => write!(f, "{}", name),
            Expr::Assign { name, value, .. } => write!(f, "(= {} {})", name, value),
            Expr::Call {
                callee, arguments, ..
            } => {
                write!(f, "({}", callee)?;
                for arg in arguments {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
            Expr::Get { object, name } => write!(f, "(.. {} {})", object, name),
            Expr::Set {
                object,
                name,
                value,
            } => write!(f, "(= (.. {} {}) {})", object, name, value),
            Expr::Lambda(decl) => write!(f, "{}", decl),
            Expr::TypeDecl { name, type_expr } => write!(f, "(: {} {})", name, type_expr),
            Expr::ListType { element, .. } => write!(f, "(List {})", element),
            Expr::ListVar { items, .. } => {
                write!(f, "(list")?;
                for item in items {
                    write!(f, " {}", item)?;
                }
                write!(f, ")")
            }
            Expr::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => write!(
                f,
                "(if {} then {} else {})",
                condition, then_branch, else_branch
            ),
            Expr::Let { body, .. } => {
                write!(f, "(let")?;
                for expr in body {
                    write!(f, " {}", expr)?;
                }
                write!(f, ")")
            }
            Expr::InitNext { init, next, .. } => write!(f, "(initnext {} {})", init, next),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Object { name, fields, cell } => {
                write!(f, "(object {}", name)?;
                for field in fields {
                    write!(f, " {}", field)?;
                }
                write!(f, " {})", cell)
            }
            Stmt::OnClause { condition, body } => write!(f, "(on {} {})", condition, body),
            Stmt::Expression(expr) => write!(f, "{}", expr),
        }
    }
}
