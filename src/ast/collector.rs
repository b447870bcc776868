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

use std::collections::BTreeSet;

use crate::ast::expr::Expr;

/// Collects every name an expression may look up at evaluation time.
///
/// Field names of `Get` nodes are included as well; a cell expression
/// such as `(.. origin x)` may be captured where `x` is also a local.
/// For lambdas only the body is walked; references to the parameters
/// inside it are still reported.
pub fn collect_variables(expr: &Expr) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    walk(expr, &mut names);
    names
}

fn walk(expr: &Expr, names: &mut BTreeSet<String>) {
    match expr {
        Expr::Literal { .. } => {}
        Expr::Variable { name, .. } | Expr::TypeVariable { name } => {
            names.insert(name.lexeme.clone());
        }
        Expr::Unary { right, .. } => walk(right, names),
        Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
            walk(left, names);
            walk(right, names);
        }
        Expr::Assign { value, .. } => walk(value, names),
        Expr::Set { object, value, .. } => {
            walk(object, names);
            walk(value, names);
        }
        Expr::Call {
            callee, arguments, ..
        } => {
            walk(callee, names);
            for arg in arguments {
                walk(arg, names);
            }
        }
        Expr::Get { object, name } => {
            walk(object, names);
            names.insert(name.lexeme.clone());
        }
        Expr::Lambda(decl) => walk(&decl.body, names),
        Expr::TypeDecl { name, type_expr } => {
            names.insert(name.lexeme.clone());
            walk(type_expr, names);
        }
        Expr::ListType { element, .. } => walk(element, names),
        Expr::ListVar { items, .. } | Expr::Let { body: items, .. } => {
            for item in items {
                walk(item, names);
            }
        }
        Expr::If {
            condition,
            then_branch,
            else_branch,
            ..
        } => {
            walk(condition, names);
            walk(then_branch, names);
            walk(else_branch, names);
        }
        Expr::InitNext { init, next, .. } => {
            walk(init, names);
            walk(next, names);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;

    #[test]
    fn collects_names_from_every_branch() {
        let expr = parse_expression("(if on then (map (--> c (+ c offset)) cells) else (.. origin x))")
            .expect("parses");
        let names: Vec<String> = collect_variables(&expr).into_iter().collect();
        assert_eq!(names, vec!["c", "cells", "map", "offset", "on", "origin", "x"]);
    }

    #[test]
    fn literals_contribute_nothing() {
        let expr = parse_expression("(+ 1 2)").expect("parses");
        assert!(collect_variables(&expr).is_empty());
    }
}
