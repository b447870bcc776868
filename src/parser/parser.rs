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

use crate::error::{AutumnError, Result};
use crate::lexer::token::{Token, TokenKind};
use crate::span::Span;

/// One node of the S-expression tree the reader builds from tokens.
///
/// ```text
/// (= x 1)  →  List [ Atom(=), Atom(x), Atom(1) ]
/// ```
#[derive(Debug, Clone)]
pub enum Sexp {
    Atom(Token),
    List { items: Vec<Sexp>, span: Span },
}

impl Sexp {
    pub fn span(&self) -> Span {
        match self {
            Sexp::Atom(token) => token.span,
            Sexp::List { span, .. } => *span,
        }
    }

    pub fn as_atom(&self) -> Option<&Token> {
        match self {
            Sexp::Atom(token) => Some(token),
            Sexp::List { .. } => None,
        }
    }

    /// Head atom of a non-empty list.
    pub fn head(&self) -> Option<&Token> {
        match self {
            Sexp::List { items, .. } => items.first().and_then(Sexp::as_atom),
            Sexp::Atom(_) => None,
        }
    }
}

/// Token cursor shared by the reader and the AST builders.
///
/// # Pipeline
/// ```text
/// tokens → read_all() → [Sexp] → parse_statement / parse_expr → AST
/// ```
pub struct Parser {
    pub tokens: Vec<Token>,
    pub current: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        let span = tokens.last().map(|t| t.span).unwrap_or_default();
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            tokens.push(Token::new(TokenKind::Eof, "", span));
        }
        Self { tokens, current: 0 }
    }

    /// Reads every top-level form until `Eof`.
    pub fn read_all(&mut self) -> Result<Vec<Sexp>> {
        let mut forms = Vec::new();
        while !self.is_at_end() {
            forms.push(self.read()?);
        }
        Ok(forms)
    }

    /// Reads exactly one form at the cursor.
    pub fn read(&mut self) -> Result<Sexp> {
        let token = self.advance();

        match token.kind {
            TokenKind::LeftParen => {
                let mut items = Vec::new();
                loop {
                    if self.is_at_end() {
                        return Err(AutumnError::parse_error(
                            "Unbalanced parentheses: missing ')'",
                            token.span,
                        ));
                    }
                    if self.check(TokenKind::RightParen) {
                        self.advance();
                        break;
                    }
                    items.push(self.read()?);
                }
                Ok(Sexp::List {
                    items,
                    span: token.span,
                })
            }
            TokenKind::RightParen => Err(AutumnError::parse_error(
                "Unbalanced parentheses: unexpected ')'",
                token.span,
            )),
            TokenKind::Eof => Err(AutumnError::parse_error(
                "Unexpected end of input",
                token.span,
            )),
            _ => Ok(Sexp::Atom(token)),
        }
    }
}
