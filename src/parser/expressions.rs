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

use crate::ast::expr::{Expr, ExprRef, LambdaDecl, Literal, NodeId};
use crate::error::{AutumnError, Result};
use crate::lexer::token::{Token, TokenKind};
use crate::parser::helpers::{expect_len, items, name_token, render};
use crate::parser::parser::{Parser, Sexp};

impl Parser {
    /// Builds an expression from one S-expression.
    ///
    /// Dispatch is on the head atom:
    ///
    /// ```text
    /// (: name T)            TypeDecl
    /// (let e1 e2 ...)       Let
    /// (if c then a else b)  If
    /// (+ a b)               Binary        (also - * / % == != > >= < <=)
    /// (and a b)             Logical
    /// (- a)                 Unary         (also + !)
    /// (initnext i n)        InitNext
    /// (= target v)          Assign / Set
    /// (.. obj field)        Get
    /// (--> params body)     Lambda        (also fn)
    /// (list a b ...)        ListVar
    /// (f a b ...)           Call
    /// ((.. obj m) a ...)    Call on a method
    /// ```
    pub fn parse_expr(&self, sexp: &Sexp) -> Result<ExprRef> {
        match sexp {
            Sexp::Atom(token) => self.parse_atom(token),
            Sexp::List { items, span } => {
                let head = match items.first() {
                    Some(head) => head,
                    None => {
                        return Err(AutumnError::parse_error("Empty expression '()'", *span));
                    }
                };

                match head {
                    Sexp::Atom(token) => self.parse_form(token, sexp),
                    Sexp::List { .. } => {
                        let callee = self.parse_expr(head)?;
                        if !matches!(&*callee, Expr::Variable { .. } | Expr::Get { .. }) {
                            return Err(AutumnError::parse_error(
                                format!("Invalid expression: {}", render(head)),
                                head.span(),
                            ));
                        }
                        Ok(Rc::new(Expr::Call {
                            callee,
                            arguments: self.parse_all(&items[1..])?,
                            span: *span,
                        }))
                    }
                }
            }
        }
    }

    fn parse_atom(&self, token: &Token) -> Result<ExprRef> {
        let value = match token.kind {
            TokenKind::Number => Literal::Number(token.lexeme.parse::<i64>().map_err(|_| {
                AutumnError::parse_error(
                    format!("Number literal '{}' is out of range", token.lexeme),
                    token.span,
                )
            })?),
            TokenKind::String => Literal::Str(token.lexeme.clone()),
            TokenKind::True => Literal::Bool(true),
            TokenKind::False => Literal::Bool(false),
            TokenKind::Nil => Literal::Nil,
            TokenKind::Identifier => return Ok(Expr::variable(token.clone())),
            _ => {
                return Err(AutumnError::parse_error(
                    format!("Invalid expression: '{}'", token.lexeme),
                    token.span,
                ));
            }
        };

        Ok(Rc::new(Expr::Literal {
            value,
            span: token.span,
        }))
    }

    fn parse_form(&self, head: &Token, sexp: &Sexp) -> Result<ExprRef> {
        let children = items(sexp);
        let span = sexp.span();

        match head.kind {
            TokenKind::Colon => self.parse_type_decl(sexp),

            TokenKind::Let => Ok(Rc::new(Expr::Let {
                body: self.parse_all(&children[1..])?,
                span,
            })),

            TokenKind::If => self.parse_if(sexp),

            kind if kind.is_binary_operator() && children.len() == 3 => {
                Ok(Rc::new(Expr::Binary {
                    left: self.parse_expr(&children[1])?,
                    operator: head.clone(),
                    right: self.parse_expr(&children[2])?,
                }))
            }

            kind if kind.is_logical_operator() && children.len() == 3 => {
                Ok(Rc::new(Expr::Logical {
                    left: self.parse_expr(&children[1])?,
                    operator: head.clone(),
                    right: self.parse_expr(&children[2])?,
                }))
            }

            kind if kind.is_unary_operator() && children.len() == 2 => Ok(Rc::new(Expr::Unary {
                operator: head.clone(),
                right: self.parse_expr(&children[1])?,
            })),

            TokenKind::InitNext => {
                expect_len(sexp, 3, "initnext")?;
                Ok(Rc::new(Expr::InitNext {
                    init: self.parse_expr(&children[1])?,
                    next: self.parse_expr(&children[2])?,
                    span,
                }))
            }

            TokenKind::Equal => self.parse_assign(sexp),

            TokenKind::DotDot => {
                expect_len(sexp, 3, "..")?;
                Ok(Rc::new(Expr::Get {
                    object: self.parse_expr(&children[1])?,
                    name: field_token(&children[2])?,
                }))
            }

            TokenKind::Fn | TokenKind::MapTo => self.parse_lambda(sexp),

            TokenKind::Number
            | TokenKind::String
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Nil
                if children.len() == 1 =>
            {
                self.parse_atom(head)
            }

            TokenKind::Identifier if head.lexeme == "list" => Ok(Rc::new(Expr::ListVar {
                items: self.parse_all(&children[1..])?,
                span,
            })),

            // `(name)` is a reference, not a call; zero-argument
            // builtins are invoked where a condition needs a value.
            TokenKind::Identifier if children.len() == 1 => Ok(Expr::variable(head.clone())),

            TokenKind::Identifier => Ok(Rc::new(Expr::Call {
                callee: Expr::variable(head.clone()),
                arguments: self.parse_all(&children[1..])?,
                span,
            })),

            _ => Err(AutumnError::parse_error(
                format!("Invalid expression: {}", render(sexp)),
                span,
            )),
        }
    }

    fn parse_all(&self, sexps: &[Sexp]) -> Result<Vec<ExprRef>> {
        sexps.iter().map(|s| self.parse_expr(s)).collect()
    }

    fn parse_if(&self, sexp: &Sexp) -> Result<ExprRef> {
        expect_len(sexp, 6, "if")?;
        let children = items(sexp);

        for (index, keyword, word) in [(2, TokenKind::Then, "then"), (4, TokenKind::Else, "else")] {
            if children[index].as_atom().map(|t| t.kind) != Some(keyword) {
                return Err(AutumnError::parse_error(
                    format!("Expected '{}' in {}", word, render(sexp)),
                    children[index].span(),
                ));
            }
        }

        Ok(Rc::new(Expr::If {
            condition: self.parse_expr(&children[1])?,
            then_branch: self.parse_expr(&children[3])?,
            else_branch: self.parse_expr(&children[5])?,
            span: sexp.span(),
        }))
    }

    fn parse_assign(&self, sexp: &Sexp) -> Result<ExprRef> {
        expect_len(sexp, 3, "=")?;
        let children = items(sexp);
        let target = self.parse_expr(&children[1])?;
        let value = self.parse_expr(&children[2])?;

        match &*target {
            Expr::Variable { name, .. } => Ok(Rc::new(Expr::Assign {
                id: NodeId::fresh(),
                name: name.clone(),
                value,
            })),
            Expr::Get { object, name } => Ok(Rc::new(Expr::Set {
                object: object.clone(),
                name: name.clone(),
                value,
            })),
            _ => Err(AutumnError::parse_error(
                format!(
                    "Left hand side must be a variable or a field, instead got {}",
                    render(&children[1])
                ),
                children[1].span(),
            )),
        }
    }

    fn parse_lambda(&self, sexp: &Sexp) -> Result<ExprRef> {
        let children = items(sexp);
        if children.len() < 3 {
            return Err(AutumnError::parse_error(
                format!("Function must have a body, instead got: {}", render(sexp)),
                sexp.span(),
            ));
        }
        expect_len(sexp, 3, "-->")?;

        let params = match &children[1] {
            atom @ Sexp::Atom(_) => vec![name_token(atom, "Function parameter")?],
            Sexp::List { items, .. } => items
                .iter()
                .map(|p| name_token(p, "Function parameter"))
                .collect::<Result<Vec<_>>>()?,
        };

        Ok(Rc::new(Expr::Lambda(Rc::new(LambdaDecl {
            params,
            body: self.parse_expr(&children[2])?,
            span: sexp.span(),
        }))))
    }

    pub(crate) fn parse_type_decl(&self, sexp: &Sexp) -> Result<ExprRef> {
        expect_len(sexp, 3, ":")?;
        let children = items(sexp);
        Ok(Rc::new(Expr::TypeDecl {
            name: name_token(&children[1], "Field/Var name")?,
            type_expr: self.parse_type_expr(&children[2])?,
        }))
    }

    /// `Name` or `(List T)`.
    fn parse_type_expr(&self, sexp: &Sexp) -> Result<ExprRef> {
        match sexp {
            Sexp::Atom(token) => match token.lexeme.as_str() {
                "updateObj" => Err(AutumnError::parse_error(
                    "updateObj is not a type",
                    token.span,
                )),
                "Union" => Err(AutumnError::parse_error(
                    "Type unions are not supported",
                    token.span,
                )),
                _ => Ok(Rc::new(Expr::TypeVariable {
                    name: name_token(sexp, "Type")?,
                })),
            },
            Sexp::List { items, span } => match items.first().and_then(Sexp::as_atom) {
                Some(head) if head.lexeme == "List" => {
                    expect_len(sexp, 2, "List")?;
                    Ok(Rc::new(Expr::ListType {
                        element: self.parse_type_expr(&items[1])?,
                        span: *span,
                    }))
                }
                _ => Err(AutumnError::parse_error(
                    format!("Invalid type expression: {}", render(sexp)),
                    *span,
                )),
            },
        }
    }
}

/// Field names after `..` may be any atom; they are looked up, never
/// evaluated.
fn field_token(sexp: &Sexp) -> Result<Token> {
    match sexp {
        Sexp::Atom(token) if token.kind != TokenKind::String => Ok(Token::new(
            TokenKind::Identifier,
            token.lexeme.clone(),
            token.span,
        )),
        other => Err(AutumnError::parse_error(
            format!("Field name must be an identifier, instead got {}", render(other)),
            other.span(),
        )),
    }
}
