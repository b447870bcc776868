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
use crate::parser::parser::{Parser, Sexp};

impl Parser {
    /// Advances one token forward.
    pub fn advance(&mut self) -> Token {
        let token = self.tokens[self.current].clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.tokens[self.current].kind == kind
    }

    /// Returns true if the cursor sits on `Eof`.
    pub fn is_at_end(&self) -> bool {
        self.tokens[self.current].kind == TokenKind::Eof
    }
}

/// Children of a list form; atoms have none.
pub fn items(sexp: &Sexp) -> &[Sexp] {
    match sexp {
        Sexp::List { items, .. } => items,
        Sexp::Atom(_) => &[],
    }
}

/// Requires a form of exactly `count` children.
pub fn expect_len(sexp: &Sexp, count: usize, form: &str) -> Result<()> {
    let got = items(sexp).len();
    if got != count {
        return Err(AutumnError::parse_error(
            format!(
                "'{}' expects {} parts, got {}: {}",
                form,
                count,
                got,
                render(sexp)
            ),
            sexp.span(),
        ));
    }
    Ok(())
}

/// Accepts an atom usable as a variable, field or parameter name.
///
/// Keyword atoms that carry no meaning outside a list head (`on`,
/// `object`) already classify as identifiers; literal and structural
/// atoms are rejected.
pub fn name_token(sexp: &Sexp, what: &str) -> Result<Token> {
    match sexp {
        Sexp::Atom(token) if token.kind == TokenKind::Identifier => Ok(token.clone()),
        other => Err(AutumnError::parse_error(
            format!("{} must be an identifier, instead got {}", what, render(other)),
            other.span(),
        )),
    }
}

/// Source-like rendering of a form for error messages.
pub fn render(sexp: &Sexp) -> String {
    match sexp {
        Sexp::Atom(token) if token.kind == TokenKind::String => format!("{:?}", token.lexeme),
        Sexp::Atom(token) => token.lexeme.clone(),
        Sexp::List { items, .. } => {
            let parts: Vec<String> = items.iter().map(render).collect();
            format!("({})", parts.join(" "))
        }
    }
}
