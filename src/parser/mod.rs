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

/// Token cursor and the S-expression reader.
pub mod parser;

/// Shared helpers over tokens and forms:
/// - cursor movement
/// - arity checks
/// - name validation
pub mod helpers;

/// Expression forms, type expressions and lambdas.
pub mod expressions;

/// `object`, `on` and expression statements.
pub mod statements;

use crate::ast::{ExprRef, Stmt};
use crate::error::{AutumnError, Result};
use crate::lexer::tokenize;
use crate::span::Span;
use parser::{Parser, Sexp};

/// Parses a whole program.
///
/// A source made of a single `(program ...)` form yields its children
/// as statements; otherwise every top-level form is a statement.
pub fn parse_program(source: &str) -> Result<Vec<Stmt>> {
    let mut parser = Parser::new(tokenize(source)?);
    let forms = parser.read_all()?;

    let statements: &[Sexp] = match forms.as_slice() {
        [single] if single.head().map(|t| t.lexeme.as_str()) == Some("program") => {
            &helpers::items(single)[1..]
        }
        all => all,
    };

    statements
        .iter()
        .map(|form| parser.parse_statement(form))
        .collect()
}

/// Parses exactly one expression.
pub fn parse_expression(source: &str) -> Result<ExprRef> {
    let mut parser = Parser::new(tokenize(source)?);
    let forms = parser.read_all()?;

    match forms.as_slice() {
        [single] => parser.parse_expr(single),
        [] => Err(AutumnError::parse_error("Expected an expression", Span::new(1, 0))),
        [_, second, ..] => Err(AutumnError::parse_error(
            "Expected a single expression",
            second.span(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn program_wrapper_is_optional() {
        let wrapped = parse_program("(program (= x 1) (= y 2))").expect("parses");
        let bare = parse_program("(= x 1) (= y 2)").expect("parses");
        assert_eq!(wrapped.len(), 2);
        assert_eq!(bare.len(), 2);
        assert_eq!(wrapped[0].to_string(), bare[0].to_string());
    }

    #[test]
    fn object_collects_fields_and_cell() {
        let stmts = parse_program(
            r#"(object Light (: on Bool) (Cell 0 0 (if on then "yellow" else "white")))"#,
        )
        .expect("parses");

        match &stmts[0] {
            Stmt::Object { name, fields, cell } => {
                assert_eq!(name.lexeme, "Light");
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].to_string(), "(: on Bool)");
                assert_eq!(
                    cell.to_string(),
                    r#"(Cell 0 0 (if on then "yellow" else "white"))"#
                );
            }
            other => panic!("expected an object, got {}", other),
        }
    }

    #[test]
    fn object_without_cell_is_rejected() {
        let err = parse_program("(object Empty (: x Number))").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParseError);
        assert!(err.message.contains("Cell"));
    }

    #[test]
    fn on_clause_and_initnext() {
        let stmts = parse_program(
            "(= n (initnext 5 (+ (prev n) 1)))\n(on (clicked) (= n 0))",
        )
        .expect("parses");

        assert_eq!(stmts[0].to_string(), "(= n (initnext 5 (+ (prev n) 1)))");
        match &stmts[1] {
            Stmt::OnClause { condition, body } => {
                assert!(matches!(&**condition, Expr::Variable { .. }));
                assert_eq!(body.to_string(), "(= n 0)");
            }
            other => panic!("expected an on-clause, got {}", other),
        }
    }

    #[test]
    fn field_assignment_becomes_set() {
        let expr = parse_expression("(= (.. light on) true)").expect("parses");
        assert!(matches!(&*expr, Expr::Set { .. }));
    }

    #[test]
    fn lambda_parameter_shapes() {
        for (source, arity) in [
            ("(--> x (+ x 1))", 1),
            ("(--> (a b) (+ a b))", 2),
            ("(fn () 1)", 0),
        ] {
            match &*parse_expression(source).expect("parses") {
                Expr::Lambda(decl) => assert_eq!(decl.params.len(), arity, "{}", source),
                other => panic!("expected a lambda, got {}", other),
            }
        }
    }

    #[test]
    fn list_types_nest() {
        let expr = parse_expression("(: cells (List (List Cell)))").expect("parses");
        assert_eq!(expr.to_string(), "(: cells (List (List Cell)))");
    }

    #[test]
    fn malformed_forms_report_locations() {
        let err = parse_expression("(if x then 1)").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParseError);

        let err = parse_program("(= x 1))").unwrap_err();
        assert!(err.message.contains("unexpected ')'"));
        assert_eq!(err.span, Span::new(1, 7));

        let err = parse_expression("(= 3 4)").unwrap_err();
        assert!(err.message.contains("Left hand side"));
    }
}
