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

use std::fmt::Write as _;

use crate::error::AutumnError;
use crate::span::Span;

/// Renders compiler-style diagnostics for Autumn errors.
///
/// The printer:
/// - Formats errors with source/line/column information
/// - Displays the offending source line
/// - Highlights the error position using a caret (`^`)
/// - Lists the expression context the error unwound through
/// - Optionally shows a follow-up hint
pub struct DiagnosticPrinter {
    /// Full source text the error spans point into.
    source: String,

    /// Display name of the source (`program.sexp`, `<trigger>`, ...).
    source_name: String,
}

impl DiagnosticPrinter {
    pub fn new(source_name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            source: source.into(),
        }
    }

    /// Builds the diagnostic text for `error`.
    ///
    /// # Output Example
    /// ```text
    /// error[E_TYPE]: Binary + must be applied to two numbers, instead got (1: N) and (true: Bool)
    ///   --> program.sexp:3:4
    ///    |
    ///  3 |   (= x (+ 1 true))
    ///    |        ^
    ///    = in (= x (+ 1 true))
    /// ```
    pub fn render(&self, error: &AutumnError) -> String {
        let mut out = String::new();
        let Span { line, column } = error.span;

        let _ = writeln!(out, "error[{}]: {}", error.code(), error.message);

        if error.span.is_synthetic() {
            let _ = writeln!(out, "  --> {}", self.source_name);
        } else {
            let lines: Vec<&str> = self.source.lines().collect();
            let src_line = lines.get(line.saturating_sub(1)).copied().unwrap_or("");

            let _ = writeln!(out, "  --> {}:{}:{}", self.source_name, line, column + 1);
            let _ = writeln!(out, "   |");
            let _ = writeln!(out, "{:>3} | {}", line, src_line);
            let _ = writeln!(out, "   | {}^", " ".repeat(column));
        }

        for frame in &error.context {
            let _ = writeln!(out, "   = in {}", frame);
        }

        if let Some(help) = &error.help {
            let _ = writeln!(out, "\nhelp: {}", help);
        }

        out
    }

    /// Prints the rendered diagnostic to stderr.
    pub fn print(&self, error: &AutumnError) {
        eprint!("{}", self.render(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_caret_under_the_failing_column() {
        let source = "(program\n  (= x (+ 1 true)))";
        let err = AutumnError::type_mismatch("bad operands", Span::new(2, 7))
            .with_help("both operands must be numbers");

        let printer = DiagnosticPrinter::new("demo.sexp", source);
        assert_eq!(
            printer.render(&err),
            "error[E_TYPE]: bad operands\n  --> demo.sexp:2:8\n   |\n  2 |   (= x (+ 1 true)))\n   |        ^\n\nhelp: both operands must be numbers\n"
        );
    }

    #[test]
    fn synthetic_spans_skip_the_source_excerpt() {
        let err = AutumnError::runtime_error("boom", Span::synthetic()).with_context("(render)");
        let printer = DiagnosticPrinter::new("<render>", "");
        assert_eq!(printer.render(&err), "error[E_RUNTIME]: boom\n  --> <render>\n   = in (render)\n");
    }
}
