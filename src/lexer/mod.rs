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

/// Atom classification (operators, keywords, literals).
pub mod keywords;

/// Character scanner producing parenthesis / string / atom tokens.
pub mod lexer;

/// Token and token-kind definitions.
pub mod token;

use crate::error::Result;
use token::Token;

/// Tokenizes a complete source string.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut scanner = lexer::Lexer::new(source);
    scanner.scan_tokens()?;
    Ok(scanner.tokens)
}
