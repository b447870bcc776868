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

use thiserror::Error;

use crate::span::Span;

/// Convenience alias used by every fallible runtime operation.
pub type Result<T> = std::result::Result<T, AutumnError>;

/// Category of a runtime or front-end failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    LexUnexpectedCharacter,
    UnterminatedLiteral,
    ParseError,
    UndefinedVariable,
    UndefinedProperty,
    TypeMismatch,
    ArityError,
    RuntimeError,
}

impl ErrorKind {
    /// Stable error code printed in diagnostics.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::LexUnexpectedCharacter => "E_LEX",
            ErrorKind::UnterminatedLiteral => "E_LITERAL",
            ErrorKind::ParseError => "E_PARSE",
            ErrorKind::UndefinedVariable => "E_UNDEFINED",
            ErrorKind::UndefinedProperty => "E_PROPERTY",
            ErrorKind::TypeMismatch => "E_TYPE",
            ErrorKind::ArityError => "E_ARITY",
            ErrorKind::RuntimeError => "E_RUNTIME",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error raised anywhere between lexing and rendering.
///
/// `context` collects the rendered sub-expressions an error unwound
/// through, innermost first, so the final message reads as a causal
/// chain from the failing node outward.
#[derive(Debug, Clone, Error)]
#[error("{}", describe(.message, .context))]
pub struct AutumnError {
    pub kind: ErrorKind,

    /// Human-readable error message
    pub message: String,

    /// Primary source location
    pub span: Span,

    /// Optional note / help text
    pub help: Option<String>,

    pub context: Vec<String>,
}

impl AutumnError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            help: None,
            context: Vec::new(),
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn unexpected_character(ch: char, span: Span) -> Self {
        Self::new(
            ErrorKind::LexUnexpectedCharacter,
            format!("unexpected character '{}'", ch.escape_default()),
            span,
        )
    }

    pub fn unterminated_literal(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::UnterminatedLiteral, message, span)
    }

    pub fn parse_error(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::ParseError, message, span)
    }

    pub fn undefined_variable(name: &str, span: Span) -> Self {
        Self::new(
            ErrorKind::UndefinedVariable,
            format!("Undefined variable '{}'", name),
            span,
        )
    }

    pub fn undefined_property(name: &str, class: &str, span: Span) -> Self {
        Self::new(
            ErrorKind::UndefinedProperty,
            format!("Undefined property '{}' for class {}", name, class),
            span,
        )
    }

    /// Type error (invalid operation / operand types)
    pub fn type_mismatch(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::TypeMismatch, message, span)
    }

    pub fn arity_error(name: &str, expected: impl fmt::Display, got: usize, span: Span) -> Self {
        Self::new(
            ErrorKind::ArityError,
            format!("{}() expects {} argument(s), got {}", name, expected, got),
            span,
        )
    }

    /// Runtime error (during evaluation)
    pub fn runtime_error(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::RuntimeError, message, span)
    }

    /// Attach a help message to the error (builder-style).
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Records one more enclosing frame the error travelled through.
    pub fn with_context(mut self, frame: impl Into<String>) -> Self {
        self.context.push(frame.into());
        self
    }

    /// Fills in a location if the error was raised without one.
    pub fn at(mut self, span: Span) -> Self {
        if self.span.is_synthetic() {
            self.span = span;
        }
        self
    }
}

fn describe(message: &str, context: &[String]) -> String {
    let mut out = message.to_string();
    for frame in context {
        out.push_str("\n  in ");
        out.push_str(frame);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn context_frames_print_innermost_first() {
        let err = AutumnError::runtime_error("Division by zero", Span::new(3, 4))
            .with_context("(/ x 0)")
            .with_context("(= y (/ x 0))");

        assert_eq!(err.code(), "E_RUNTIME");
        assert_eq!(
            err.to_string(),
            "Division by zero\n  in (/ x 0)\n  in (= y (/ x 0))"
        );
    }

    #[test]
    fn at_only_replaces_synthetic_spans() {
        let located = AutumnError::runtime_error("boom", Span::new(2, 0)).at(Span::new(9, 9));
        assert_eq!(located.span, Span::new(2, 0));

        let generated = AutumnError::runtime_error("boom", Span::synthetic()).at(Span::new(9, 9));
        assert_eq!(generated.span, Span::new(9, 9));
    }
}
