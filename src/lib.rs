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

//! Runtime for the Autumn reactive grid language.
//!
//! A program declares object classes, reactive `initnext` bindings and
//! `on` clauses. The host starts the engine, feeds it input and steps
//! it; after every step the world renders to a grid of colored cells.
//!
//! ```text
//! source → lexer → parser → Interpreter::start → step / click / render_all
//! ```

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod globals;
pub mod interpreter;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod random;
pub mod span;
pub mod types;
pub mod value;

use std::sync::Once;

pub use config::EngineConfig;
pub use diagnostics::DiagnosticPrinter;
pub use error::{AutumnError, Result};
pub use interpreter::render::RenderFrame;
pub use interpreter::Interpreter;
pub use parser::{parse_expression, parse_program};
pub use value::Value;

static TRACING_INIT: Once = Once::new();

/// Installs a `fmt` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set, and only the first call has
/// any effect. Enable with `RUST_LOG=autumn=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .try_init();
        }
    });
}
