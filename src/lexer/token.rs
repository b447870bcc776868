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

use crate::span::Span;

/// Represents the **category of a lexical token** in Autumn source.
///
/// The S-expression surface has only three structural token shapes
/// (parentheses, string literals and atoms); atoms are further
/// classified into literals, operators, keywords and identifiers by
/// `keywords::classify_atom`.
///
/// # Pipeline Role
/// ```text
/// Source → Lexer → Token → Reader (Sexp) → Parser → AST
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    LeftParen,
    RightParen,

    /// Integer literal, optionally signed: `42`, `-5`.
    Number,

    /// Double-quoted string literal. The lexeme holds the unescaped
    /// contents without the surrounding quotes.
    String,

    Identifier,

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Comparison
    EqualEqual,
    BangEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    Bang,
    And,
    Or,

    // Structural operators
    Equal,
    DotDot,
    MapTo,
    Colon,

    // Keywords
    If,
    Then,
    Else,
    Let,
    InitNext,
    Fn,
    True,
    False,
    Nil,

    Eof,
}

impl TokenKind {
    pub fn is_binary_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::EqualEqual
                | TokenKind::BangEqual
                | TokenKind::Greater
                | TokenKind::GreaterEqual
                | TokenKind::Less
                | TokenKind::LessEqual
        )
    }

    pub fn is_unary_operator(self) -> bool {
        matches!(self, TokenKind::Minus | TokenKind::Plus | TokenKind::Bang)
    }

    pub fn is_logical_operator(self) -> bool {
        matches!(self, TokenKind::And | TokenKind::Or)
    }
}

/// Represents a **single lexical token** produced by the lexer.
///
/// ```text
/// initnext →  { kind: InitNext,   lexeme: "initnext" }
/// light    →  { kind: Identifier, lexeme: "light"    }
/// -5       →  { kind: Number,     lexeme: "-5"       }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// Identifier token for nodes the runtime builds itself.
    pub fn synthetic(lexeme: impl Into<String>) -> Self {
        Self::new(TokenKind::Identifier, lexeme, Span::synthetic())
    }
}

impl fmt::Display for Token {
    /// Prints only the lexeme, which is what users wrote.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lexeme)
    }
}
