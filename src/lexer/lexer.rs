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
use crate::lexer::keywords::classify_atom;
use crate::lexer::token::{Token, TokenKind};
use crate::span::Span;

const ESCAPES: [(char, char); 11] = [
    ('\'', '\''),
    ('"', '"'),
    ('?', '?'),
    ('\\', '\\'),
    ('a', '\u{07}'),
    ('b', '\u{08}'),
    ('f', '\u{0C}'),
    ('n', '\n'),
    ('r', '\r'),
    ('t', '\t'),
    ('v', '\u{0B}'),
];

pub struct Lexer {
    chars: Vec<char>,
    current: usize,
    line: usize,
    line_start: usize,
    pub tokens: Vec<Token>,
}

impl Lexer {
    /// Creates a lexer positioned at the first character of `source`.
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            current: 0,
            line: 1,
            line_start: 0,
            tokens: Vec::new(),
        }
    }

    /// Scans the whole input, appending a terminating `Eof` token.
    ///
    /// The first malformed token aborts the scan; the returned error
    /// carries the exact location for the diagnostic printer.
    pub fn scan_tokens(&mut self) -> Result<()> {
        while !self.is_at_end() {
            self.scan_token()?;
        }

        let span = self.span_at(self.current);
        self.tokens.push(Token::new(TokenKind::Eof, "", span));
        Ok(())
    }

    fn scan_token(&mut self) -> Result<()> {
        let start = self.current;
        let c = self.advance();

        match c {
            '(' => self.push(TokenKind::LeftParen, "(", start),
            ')' => self.push(TokenKind::RightParen, ")", start),
            '"' => self.string(start)?,
            ';' => {
                while !self.is_at_end() && self.peek() != '\n' {
                    self.current += 1;
                }
            }
            '\n' => self.newline(),
            c if c.is_whitespace() => {}
            c if is_forbidden(c) => {
                return Err(AutumnError::unexpected_character(c, self.span_at(start)));
            }
            _ => self.atom(start),
        }

        Ok(())
    }

    fn atom(&mut self, start: usize) {
        while !self.is_at_end() && is_atom_char(self.peek()) {
            self.current += 1;
        }
        let text: String = self.chars[start..self.current].iter().collect();
        let kind = classify_atom(&text);
        self.push(kind, text, start);
    }

    fn string(&mut self, start: usize) -> Result<()> {
        let mut value = String::new();

        loop {
            if self.is_at_end() {
                return Err(AutumnError::unterminated_literal(
                    "Unterminated string literal",
                    self.span_at(start),
                ));
            }

            match self.advance() {
                '"' => break,
                '\n' => {
                    return Err(AutumnError::unterminated_literal(
                        "Unexpected newline in string literal",
                        self.span_at(start),
                    ));
                }
                '\\' => {
                    if self.is_at_end() {
                        return Err(AutumnError::unterminated_literal(
                            "Unfinished escape sequence at the end of the string",
                            self.span_at(start),
                        ));
                    }
                    let escaped = self.advance();
                    match ESCAPES.iter().find(|(key, _)| *key == escaped) {
                        Some((_, resolved)) => value.push(*resolved),
                        None => {
                            return Err(AutumnError::unexpected_character(
                                escaped,
                                self.span_at(self.current - 1),
                            )
                            .with_help("valid escapes are \\' \\\" \\? \\\\ \\a \\b \\f \\n \\r \\t \\v"));
                        }
                    }
                }
                other => value.push(other),
            }
        }

        self.push(TokenKind::String, value, start);
        Ok(())
    }

    fn push(&mut self, kind: TokenKind, lexeme: impl Into<String>, start: usize) {
        let span = self.span_at(start);
        self.tokens.push(Token::new(kind, lexeme, span));
    }

    fn newline(&mut self) {
        self.line += 1;
        self.line_start = self.current;
    }

    fn span_at(&self, offset: usize) -> Span {
        Span::new(self.line, offset.saturating_sub(self.line_start))
    }

    fn advance(&mut self) -> char {
        let c = self.chars[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> char {
        self.chars[self.current]
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }
}

fn is_atom_char(c: char) -> bool {
    !c.is_whitespace() && c != '(' && c != ')' && c != '"' && c != ';' && !is_forbidden(c)
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '[' | ']' | '{' | '}' | '`' | ',') || (c.is_control() && !c.is_whitespace())
}
