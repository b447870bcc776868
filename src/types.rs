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

//! Autumn's runtime type descriptors.
//!
//! Types compare by their printed form, so `List<Number>` built in two
//! places is the same type. `Unknown` is a wildcard: it is never equal
//! to anything under [`AutumnType::same`], yet it is accepted wherever
//! [`AutumnType::accepts`] checks field and list compatibility.

use std::fmt;
use std::rc::Rc;

use crate::object::Class;

#[derive(Debug, Clone)]
pub enum AutumnType {
    Number,
    String,
    Bool,
    Unknown,
    List(Box<AutumnType>),
    /// Type of a type value, e.g. the value bound to `Number`.
    Meta(Box<AutumnType>),
    /// Marker for deferred expressions (Cell coordinates and colors).
    Expr,
    Func,
    Class(Rc<Class>),
}

impl AutumnType {
    pub fn list_of(element: AutumnType) -> Self {
        AutumnType::List(Box::new(element))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, AutumnType::Unknown)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, AutumnType::List(_))
    }

    /// `Unknown` or `List<Unknown>`.
    pub fn is_wildcard(&self) -> bool {
        match self {
            AutumnType::Unknown => true,
            AutumnType::List(inner) => inner.is_unknown(),
            _ => false,
        }
    }

    /// Strict equality on printed form; `Unknown` never matches.
    pub fn same(&self, other: &AutumnType) -> bool {
        if self.is_unknown() || other.is_unknown() {
            return false;
        }
        self.to_string() == other.to_string()
    }

    /// Compatibility used by instance construction and field `set`.
    pub fn accepts(&self, other: &AutumnType) -> bool {
        self.is_wildcard() || other.is_wildcard() || self.to_string() == other.to_string()
    }
}

impl fmt::Display for AutumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutumnType::Number => write!(f, "Number"),
            AutumnType::String => write!(f, "String"),
            AutumnType::Bool => write!(f, "Bool"),
            AutumnType::Unknown => write!(f, "Unknown"),
            AutumnType::List(inner) => write!(f, "List<{}>", inner),
            AutumnType::Meta(inner) => write!(f, "Meta<{}>", inner),
            AutumnType::Expr => write!(f, "Expr"),
            AutumnType::Func => write!(f, "Func"),
            AutumnType::Class(class) => write!(f, "{}", class.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_is_never_strictly_equal() {
        assert!(!AutumnType::Unknown.same(&AutumnType::Unknown));
        assert!(AutumnType::Number.same(&AutumnType::Number));
        assert!(AutumnType::list_of(AutumnType::Bool).same(&AutumnType::list_of(AutumnType::Bool)));
    }

    #[test]
    fn wildcards_are_accepted_both_ways() {
        let any_list = AutumnType::list_of(AutumnType::Unknown);
        let numbers = AutumnType::list_of(AutumnType::Number);

        assert!(any_list.accepts(&numbers));
        assert!(numbers.accepts(&any_list));
        assert!(AutumnType::Unknown.accepts(&AutumnType::String));
        assert!(!AutumnType::Number.accepts(&AutumnType::String));
    }

    #[test]
    fn printed_forms() {
        let nested = AutumnType::list_of(AutumnType::list_of(AutumnType::Number));
        assert_eq!(nested.to_string(), "List<List<Number>>");
        assert_eq!(AutumnType::Meta(Box::new(AutumnType::Bool)).to_string(), "Meta<Bool>");
    }
}
