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

pub mod collector;
pub mod expr;
pub mod printer;
pub mod stmt;

pub use collector::collect_variables;
pub use expr::{Expr, ExprRef, LambdaDecl, Literal, NodeId};
pub use stmt::Stmt;
