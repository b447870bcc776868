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

use crate::ast::expr::ExprRef;
use crate::lexer::token::Token;

/// Top-level Autumn statements.
#[derive(Debug, Clone)]
pub enum Stmt {
    /* ----------------------------- */
    /* DECLARATIONS                  */
    /* ----------------------------- */

    /// `(object Name (: field Type)... cellExpr)`
    ///
    /// `fields` holds the `TypeDecl` nodes in declaration order.
    Object {
        name: Token,
        fields: Vec<ExprRef>,
        cell: ExprRef,
    },

    /* ----------------------------- */
    /* REACTIVE                      */
    /* ----------------------------- */

    /// `(on condition body)`
    OnClause {
        condition: ExprRef,
        body: ExprRef,
    },

    /* ----------------------------- */
    /* EXPRESSIONS                   */
    /* ----------------------------- */
    Expression(ExprRef),
}
