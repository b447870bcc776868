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

use crate::ast::{Expr, ExprRef, LambdaDecl};
use crate::error::{AutumnError, Result};
use crate::interpreter::calls::Lambda;
use crate::interpreter::environment::ScopeKind;
use crate::lexer::token::Token;
use crate::object::Class;
use crate::parser::parse_expression;
use crate::span::Span;
use crate::types::AutumnType;

/// Body of the `render` method every `object` class gets. `origin` and
/// `elems` come from the receiver's fields.
const RENDER_METHOD: &str = "(--> () (map (--> e (RenderedElem \
     (Position (+ (.. origin x) ((.. e x))) (+ (.. origin y) ((.. e y)))) \
     ((.. e color)))) elems))";

/// The classes every program can use without declaring them.
#[derive(Debug, Clone)]
pub struct BuiltinClasses {
    pub position: Rc<Class>,
    pub cell: Rc<Class>,
    pub rendered_elem: Rc<Class>,
}

impl BuiltinClasses {
    pub fn new() -> Self {
        let position = Rc::new(Class::new(
            "Position",
            vec![
                ("x".to_string(), AutumnType::Number),
                ("y".to_string(), AutumnType::Number),
            ],
        ));

        // Cell fields stay unevaluated until render time.
        let cell = Rc::new(Class::new(
            "Cell",
            vec![
                ("x".to_string(), AutumnType::Expr),
                ("y".to_string(), AutumnType::Expr),
                ("color".to_string(), AutumnType::Expr),
            ],
        ));

        let rendered_elem = Rc::new(Class::new(
            "RenderedElem",
            vec![
                ("position".to_string(), AutumnType::Class(position.clone())),
                ("color".to_string(), AutumnType::String),
            ],
        ));

        Self {
            position,
            cell,
            rendered_elem,
        }
    }
}

impl Default for BuiltinClasses {
    fn default() -> Self {
        Self::new()
    }
}

/// Synthesizes the class for an `object` declaration.
///
/// The constructor takes the declared fields plus an `origin`
/// position and appends two computed fields:
///
/// - `origin`, the position passed in
/// - `elems`, the cell expression's result, wrapped in a list when it
///   is a single cell
///
/// A `render` method maps each cell to a `RenderedElem` offset by
/// `origin`.
pub fn make_object_class(
    name: &str,
    fields: Vec<(String, AutumnType)>,
    cell: ExprRef,
    builtins: &BuiltinClasses,
) -> Result<Class> {
    let ident = |name: &str| Token::synthetic(name);
    let var = |name: &str| Expr::variable(ident(name));

    let mut params: Vec<Token> = fields.iter().map(|(field, _)| ident(field)).collect();
    params.push(ident("origin"));

    let mut produced: Vec<ExprRef> = fields.iter().map(|(field, _)| var(field)).collect();
    produced.push(var("origin"));
    produced.push(normalize_cells(cell));

    let initializer = Lambda {
        decl: Rc::new(LambdaDecl {
            params,
            body: Rc::new(Expr::ListVar {
                items: produced,
                span: Span::synthetic(),
            }),
            span: Span::synthetic(),
        }),
        closure: None,
        frame: ScopeKind::Instance,
    };

    let render = match &*parse_expression(RENDER_METHOD)? {
        Expr::Lambda(decl) => Lambda {
            decl: decl.clone(),
            closure: None,
            frame: ScopeKind::Local,
        },
        other => {
            return Err(AutumnError::runtime_error(
                format!("render method for {} is not a lambda: {}", name, other),
                Span::synthetic(),
            ));
        }
    };

    let mut all_fields = fields;
    all_fields.push((
        "origin".to_string(),
        AutumnType::Class(builtins.position.clone()),
    ));
    all_fields.push((
        "elems".to_string(),
        AutumnType::list_of(AutumnType::Class(builtins.cell.clone())),
    ));

    Ok(Class::new(name, all_fields)
        .with_initializer(Rc::new(initializer))
        .with_method("render", Rc::new(render)))
}

/// `((--> allCells (if (isList allCells) then allCells else (list allCells))) cell)`
fn normalize_cells(cell: ExprRef) -> ExprRef {
    let all = || Expr::variable(Token::synthetic("allCells"));

    let body = Rc::new(Expr::If {
        condition: Expr::call(Expr::variable(Token::synthetic("isList")), vec![all()]),
        then_branch: all(),
        else_branch: Rc::new(Expr::ListVar {
            items: vec![all()],
            span: Span::synthetic(),
        }),
        span: Span::synthetic(),
    });

    let wrap = Rc::new(Expr::Lambda(Rc::new(LambdaDecl {
        params: vec![Token::synthetic("allCells")],
        body,
        span: Span::synthetic(),
    })));

    Expr::call(wrap, vec![cell])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn object_classes_append_origin_and_elems() {
        let builtins = BuiltinClasses::new();
        let cell = parse_expression("(Cell 0 0 \"red\")").unwrap();
        let class = make_object_class(
            "Light",
            vec![("on".to_string(), AutumnType::Bool)],
            cell,
            &builtins,
        )
        .unwrap();

        assert_eq!(class.field_names, vec!["on", "origin", "elems"]);
        assert_eq!(class.field_type("elems").unwrap().to_string(), "List<Cell>");
        assert!(class.method("render").is_some());
        assert_eq!(class.initializer.as_ref().unwrap().arity().min, 2);
    }

    #[test]
    fn rendered_elem_holds_a_position() {
        let builtins = BuiltinClasses::new();
        assert_eq!(
            builtins.rendered_elem.field_type("position").unwrap().to_string(),
            "Position"
        );
    }
}
