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
use std::sync::atomic::{AtomicU64, Ordering};

use crate::lexer::token::{Token, TokenKind};
use crate::span::Span;

/// Shared handle to an expression node. Deferred cell values and lambdas
/// keep these alive past the statement that produced them.
pub type ExprRef = Rc<Expr>;

static NEXT_NODE: AtomicU64 = AtomicU64::new(1);

/// Identity of a variable-referencing node, used to key precomputed
/// scope distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub fn fresh() -> Self {
        NodeId(NEXT_NODE.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(i64),
    Str(String),
    Bool(bool),
    Nil,
}

/// Parameter list and body of an `fn` / `-->` form.
#[derive(Debug)]
pub struct LambdaDecl {
    pub params: Vec<Token>,
    pub body: ExprRef,
    pub span: Span,
}

#[derive(Debug)]
pub enum Expr {
    Literal {
        value: Literal,
        span: Span,
    },

    Unary {
        operator: Token,
        right: ExprRef,
    },

    Binary {
        left: ExprRef,
        operator: Token,
        right: ExprRef,
    },

    /// `and` / `or`, short-circuiting.
    Logical {
        left: ExprRef,
        operator: Token,
        right: ExprRef,
    },

    Variable {
        id: NodeId,
        name: Token,
    },

    Assign {
        id: NodeId,
        name: Token,
        value: ExprRef,
    },

    Call {
        callee: ExprRef,
        arguments: Vec<ExprRef>,
        span: Span,
    },

    /// `(.. object name)`
    Get {
        object: ExprRef,
        name: Token,
    },

    /// `(= (.. object name) value)`
    Set {
        object: ExprRef,
        name: Token,
        value: ExprRef,
    },

    Lambda(Rc<LambdaDecl>),

    /// A bare type name in type position, e.g. `Number` or `Light`.
    TypeVariable {
        name: Token,
    },

    /// `(: name Type)`
    TypeDecl {
        name: Token,
        type_expr: ExprRef,
    },

    /// `(List T)` in type position.
    ListType {
        element: ExprRef,
        span: Span,
    },

    /// `(list a b c)`
    ListVar {
        items: Vec<ExprRef>,
        span: Span,
    },

    If {
        condition: ExprRef,
        then_branch: ExprRef,
        else_branch: ExprRef,
        span: Span,
    },

    Let {
        body: Vec<ExprRef>,
        span: Span,
    },

    InitNext {
        init: ExprRef,
        next: ExprRef,
        span: Span,
    },
}

impl Expr {
    pub fn number(n: i64) -> ExprRef {
        Rc::new(Expr::Literal {
            value: Literal::Number(n),
            span: Span::synthetic(),
        })
    }

    pub fn variable(name: Token) -> ExprRef {
        Rc::new(Expr::Variable {
            id: NodeId::fresh(),
            name,
        })
    }

    pub fn call(callee: ExprRef, arguments: Vec<ExprRef>) -> ExprRef {
        Rc::new(Expr::Call {
            callee,
            arguments,
            span: Span::synthetic(),
        })
    }

    /// `(- expr)`
    pub fn negate(right: ExprRef) -> ExprRef {
        Rc::new(Expr::Unary {
            operator: Token::new(TokenKind::Minus, "-", Span::synthetic()),
            right,
        })
    }

    /// Best-effort source location of the node.
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal { span, .. }
            | Expr::Call { span, .. }
            | Expr::ListType { span, .. }
            | Expr::ListVar { span, .. }
            | Expr::If { span, .. }
            | Expr::Let { span, .. }
            | Expr::InitNext { span, .. } => *span,
            Expr::Unary { operator, .. }
            | Expr::Binary { operator, .. }
            | Expr::Logical { operator, .. } => operator.span,
            Expr::Variable { name, .. }
            | Expr::Assign { name, .. }
            | Expr::Get { name, .. }
            | Expr::Set { name, .. }
            | Expr::TypeVariable { name }
            | Expr::TypeDecl { name, .. } => name.span,
            Expr::Lambda(decl) => decl.span,
        }
    }
}
