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

use crate::lexer::token::TokenKind;

/// Classifies a bare atom (anything between whitespace and parentheses).
///
/// `program`, `object` and `on` only have meaning at the head of a
/// top-level form, so they classify as identifiers; a field may be
/// named `on`.
///
/// # Examples
/// ```text
/// 42        -> Number
/// -5        -> Number
/// -->       -> MapTo
/// initnext  -> InitNext
/// Light     -> Identifier
/// ```
pub fn classify_atom(atom: &str) -> TokenKind {
    if is_integer(atom) {
        return TokenKind::Number;
    }

    match atom {
        "+" => TokenKind::Plus,
        "-" => TokenKind::Minus,
        "*" => TokenKind::Star,
        "/" => TokenKind::Slash,
        "%" => TokenKind::Percent,
        "==" => TokenKind::EqualEqual,
        "!=" => TokenKind::BangEqual,
        ">" => TokenKind::Greater,
        ">=" => TokenKind::GreaterEqual,
        "<" => TokenKind::Less,
        "<=" => TokenKind::LessEqual,
        "!" => TokenKind::Bang,
        "&" | "and" => TokenKind::And,
        "|" | "or" => TokenKind::Or,
        "=" => TokenKind::Equal,
        ".." => TokenKind::DotDot,
        "-->" => TokenKind::MapTo,
        ":" => TokenKind::Colon,
        "if" => TokenKind::If,
        "then" => TokenKind::Then,
        "else" => TokenKind::Else,
        "let" => TokenKind::Let,
        "initnext" => TokenKind::InitNext,
        "fn" | "fun" => TokenKind::Fn,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "nil" => TokenKind::Nil,
        _ => TokenKind::Identifier,
    }
}

/// Whether `word` can be used as a variable, field or parameter name.
pub fn is_identifier(word: &str) -> bool {
    classify_atom(word) == TokenKind::Identifier && is_identifier_shape(word)
}

fn is_identifier_shape(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '\'' || c == '?')
}

fn is_integer(atom: &str) -> bool {
    let digits = atom
        .strip_prefix('-')
        .or_else(|| atom.strip_prefix('+'))
        .unwrap_or(atom);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_integers_are_numbers() {
        assert_eq!(classify_atom("42"), TokenKind::Number);
        assert_eq!(classify_atom("-5"), TokenKind::Number);
        assert_eq!(classify_atom("-"), TokenKind::Minus);
        assert_eq!(classify_atom("--"), TokenKind::Identifier);
    }

    #[test]
    fn keywords_and_operators() {
        assert_eq!(classify_atom("initnext"), TokenKind::InitNext);
        assert_eq!(classify_atom("-->"), TokenKind::MapTo);
        assert_eq!(classify_atom(".."), TokenKind::DotDot);
        assert_eq!(classify_atom("fun"), TokenKind::Fn);
        assert_eq!(classify_atom("Light"), TokenKind::Identifier);
        assert_eq!(classify_atom("on"), TokenKind::Identifier);
    }

    #[test]
    fn identifier_shapes() {
        assert!(is_identifier("moveLeft"));
        assert!(is_identifier("GRID_SIZE"));
        assert!(!is_identifier("if"));
        assert!(!is_identifier("3d"));
        assert!(!is_identifier("a.b"));
    }
}
