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

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::ast::expr::ExprRef;
use crate::interpreter::calls::Callable;
use crate::interpreter::environment::Env;
use crate::object::Instance;
use crate::types::AutumnType;

/// Identity of a runtime value, independent of structural equality.
pub type ValueId = u64;

static NEXT_VALUE_ID: AtomicU64 = AtomicU64::new(1);

fn fresh_id() -> ValueId {
    NEXT_VALUE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Autumn runtime value.
///
/// Three duplication contracts exist:
///
/// | operation      | identity  | structure                      |
/// |----------------|-----------|--------------------------------|
/// | `clone()`      | preserved | shared (same instance `Rc`)    |
/// | `duplicate()`  | new ids   | independent deep copy          |
/// | `snapshot()`   | preserved | independent deep copy          |
///
/// `snapshot` is what the previous-step environment is built from, so
/// `prev` can still find an object by identity while later in-place
/// field updates stay invisible to it.
#[derive(Clone)]
pub struct Value {
    id: ValueId,
    kind: ValueKind,
}

#[derive(Clone)]
pub enum ValueKind {
    Number(i64),
    /// Stored without surrounding quotes.
    String(Rc<str>),
    Bool(bool),
    List(ListValue),
    Null,
    Callable(Rc<dyn Callable>),
    Instance(Rc<Instance>),
    Deferred(Rc<DeferredExpr>),
    /// A type used as a value: `Number`, `Position`, `Light`...
    Type(AutumnType),
}

/// Immutable list payload with its inferred element type.
#[derive(Clone)]
pub struct ListValue {
    items: Rc<Vec<Value>>,
    elem: AutumnType,
}

impl ListValue {
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn element_type(&self) -> &AutumnType {
        &self.elem
    }
}

/// Unevaluated expression paired with the scope it must be forced in.
pub struct DeferredExpr {
    pub expr: ExprRef,
    pub env: Env,
}

/// Thread-safe mirror of plain data, used to hand list elements to
/// worker threads.
#[derive(Debug, Clone, PartialEq)]
pub enum Plain {
    Number(i64),
    Str(String),
    Bool(bool),
    Null,
    List(Vec<Plain>),
}

impl Value {
    fn from_kind(kind: ValueKind) -> Self {
        Self {
            id: fresh_id(),
            kind,
        }
    }

    pub fn number(n: i64) -> Self {
        Self::from_kind(ValueKind::Number(n))
    }

    pub fn string(s: impl AsRef<str>) -> Self {
        Self::from_kind(ValueKind::String(Rc::from(s.as_ref())))
    }

    pub fn bool(b: bool) -> Self {
        Self::from_kind(ValueKind::Bool(b))
    }

    pub fn null() -> Self {
        Self::from_kind(ValueKind::Null)
    }

    /// Builds a list, inferring its element type from the items.
    pub fn list(items: Vec<Value>) -> Self {
        let elem = infer_element_type(&items);
        Self::from_kind(ValueKind::List(ListValue {
            items: Rc::new(items),
            elem,
        }))
    }

    pub fn callable(callable: Rc<dyn Callable>) -> Self {
        Self::from_kind(ValueKind::Callable(callable))
    }

    pub fn instance(instance: Instance) -> Self {
        Self::from_kind(ValueKind::Instance(Rc::new(instance)))
    }

    pub fn deferred(expr: ExprRef, env: Env) -> Self {
        Self::from_kind(ValueKind::Deferred(Rc::new(DeferredExpr { expr, env })))
    }

    pub fn type_value(ty: AutumnType) -> Self {
        Self::from_kind(ValueKind::Type(ty))
    }

    pub fn id(&self) -> ValueId {
        self.id
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    /// Same payload under a different identity.
    pub fn with_id(mut self, id: ValueId) -> Self {
        self.id = id;
        self
    }

    pub fn ty(&self) -> AutumnType {
        match &self.kind {
            ValueKind::Number(_) => AutumnType::Number,
            ValueKind::String(_) => AutumnType::String,
            ValueKind::Bool(_) => AutumnType::Bool,
            ValueKind::List(list) => AutumnType::list_of(list.elem.clone()),
            ValueKind::Null => AutumnType::Unknown,
            ValueKind::Callable(_) => AutumnType::Func,
            ValueKind::Instance(inst) => AutumnType::Class(inst.class().clone()),
            ValueKind::Deferred(_) => AutumnType::Expr,
            ValueKind::Type(ty) => AutumnType::Meta(Box::new(ty.clone())),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match &self.kind {
            ValueKind::Bool(b) => *b,
            ValueKind::List(list) => !list.items.is_empty(),
            ValueKind::Null => false,
            _ => true,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self.kind {
            ValueKind::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.kind {
            ValueKind::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match &self.kind {
            ValueKind::List(list) => Some(&list.items),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Rc<Instance>> {
        match &self.kind {
            ValueKind::Instance(inst) => Some(inst),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Rc<dyn Callable>> {
        match &self.kind {
            ValueKind::Callable(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_deferred(&self) -> Option<&Rc<DeferredExpr>> {
        match &self.kind {
            ValueKind::Deferred(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&AutumnType> {
        match &self.kind {
            ValueKind::Type(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self.kind, ValueKind::List(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind, ValueKind::Null)
    }

    /// Value-level equality used by `==`, `!=` and the list builtins.
    pub fn is_equal(&self, other: &Value) -> bool {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => a == b,
            (ValueKind::Number(n), ValueKind::Bool(b)) | (ValueKind::Bool(b), ValueKind::Number(n)) => {
                *n == i64::from(*b)
            }
            (ValueKind::Bool(a), ValueKind::Bool(b)) => a == b,
            (ValueKind::String(a), ValueKind::String(b)) => a == b,
            (ValueKind::List(_), ValueKind::List(_)) => self.to_string() == other.to_string(),
            (ValueKind::Null, ValueKind::Null) => true,
            (ValueKind::Instance(a), ValueKind::Instance(b)) => a.is_equal(b),
            (ValueKind::Callable(a), ValueKind::Callable(b)) => {
                std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
            }
            (ValueKind::Deferred(a), ValueKind::Deferred(b)) => Rc::ptr_eq(&a.expr, &b.expr),
            (ValueKind::Type(a), ValueKind::Type(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }

    /// Structurally independent copy with fresh identities throughout.
    pub fn duplicate(&self) -> Value {
        let kind = match &self.kind {
            ValueKind::List(list) => ValueKind::List(ListValue {
                items: Rc::new(list.items.iter().map(Value::duplicate).collect()),
                elem: list.elem.clone(),
            }),
            ValueKind::Instance(inst) => ValueKind::Instance(Rc::new(inst.map_fields(Value::duplicate))),
            other => other.clone(),
        };
        Value::from_kind(kind)
    }

    /// Structurally independent copy that keeps every identity.
    pub fn snapshot(&self) -> Value {
        let kind = match &self.kind {
            ValueKind::List(list) => ValueKind::List(ListValue {
                items: Rc::new(list.items.iter().map(Value::snapshot).collect()),
                elem: list.elem.clone(),
            }),
            ValueKind::Instance(inst) => ValueKind::Instance(Rc::new(inst.map_fields(Value::snapshot))),
            other => other.clone(),
        };
        Value { id: self.id, kind }
    }

    /// Converts plain data (numbers, strings, bools, null and lists of
    /// those) into a `Send` form. Anything else yields `None`.
    pub fn to_plain(&self) -> Option<Plain> {
        match &self.kind {
            ValueKind::Number(n) => Some(Plain::Number(*n)),
            ValueKind::String(s) => Some(Plain::Str(s.to_string())),
            ValueKind::Bool(b) => Some(Plain::Bool(*b)),
            ValueKind::Null => Some(Plain::Null),
            ValueKind::List(list) => list
                .items
                .iter()
                .map(Value::to_plain)
                .collect::<Option<Vec<_>>>()
                .map(Plain::List),
            _ => None,
        }
    }

    pub fn from_plain(plain: Plain) -> Value {
        match plain {
            Plain::Number(n) => Value::number(n),
            Plain::Str(s) => Value::string(s),
            Plain::Bool(b) => Value::bool(b),
            Plain::Null => Value::null(),
            Plain::List(items) => Value::list(items.into_iter().map(Value::from_plain).collect()),
        }
    }
}

/// Homogeneous ⇒ `T`; empty or mixed ⇒ `Unknown`. `Unknown`-typed
/// elements (nulls, untyped lists) do not vote.
pub fn infer_element_type(items: &[Value]) -> AutumnType {
    let mut inferred: Option<AutumnType> = None;

    for item in items {
        let ty = item.ty();
        if ty.is_unknown() {
            continue;
        }
        match &inferred {
            None => inferred = Some(ty),
            Some(seen) if seen.to_string() == ty.to_string() => {}
            Some(_) => return AutumnType::Unknown,
        }
    }

    inferred.unwrap_or(AutumnType::Unknown)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValueKind::Number(n) => write!(f, "({}: N)", n),
            ValueKind::String(s) => write!(f, "({}: S)", s),
            ValueKind::Bool(b) => write!(f, "({}: Bool)", b),
            ValueKind::List(list) => {
                write!(f, "([")?;
                for (i, item) in list.items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "] :{})", self.ty())
            }
            ValueKind::Null => write!(f, "null"),
            ValueKind::Callable(c) => write!(f, "<native fn: {}>", c.name()),
            ValueKind::Instance(inst) => write!(f, "{}", inst),
            ValueKind::Deferred(d) => write!(f, "Expr({})", d.expr),
            ValueKind::Type(ty) => write!(f, "{}", ty),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn list_type_inference() {
        let numbers = Value::list(vec![Value::number(1), Value::number(2)]);
        assert_eq!(numbers.ty().to_string(), "List<Number>");

        let empty = Value::list(Vec::new());
        assert_eq!(empty.ty().to_string(), "List<Unknown>");

        let mixed = Value::list(vec![Value::number(1), Value::string("a")]);
        assert_eq!(mixed.ty().to_string(), "List<Unknown>");

        let with_null = Value::list(vec![Value::null(), Value::bool(true)]);
        assert_eq!(with_null.ty().to_string(), "List<Bool>");
    }

    #[test]
    fn canonical_strings() {
        assert_eq!(Value::number(-3).to_string(), "(-3: N)");
        assert_eq!(Value::string("red").to_string(), "(red: S)");
        assert_eq!(Value::bool(true).to_string(), "(true: Bool)");
        assert_eq!(Value::null().to_string(), "null");
        assert_eq!(
            Value::list(vec![Value::number(1), Value::number(2)]).to_string(),
            "([(1: N), (2: N)] :List<Number>)"
        );
    }

    #[test]
    fn numbers_compare_with_bools_as_zero_or_one() {
        assert!(Value::number(1).is_equal(&Value::bool(true)));
        assert!(Value::bool(false).is_equal(&Value::number(0)));
        assert!(!Value::number(2).is_equal(&Value::bool(true)));
        assert!(!Value::string("1").is_equal(&Value::number(1)));
    }

    #[test]
    fn truthiness() {
        assert!(Value::number(0).is_truthy());
        assert!(Value::string("").is_truthy());
        assert!(!Value::null().is_truthy());
        assert!(!Value::list(Vec::new()).is_truthy());
        assert!(Value::list(vec![Value::null()]).is_truthy());
    }

    #[test]
    fn duplicate_gets_fresh_ids_and_snapshot_keeps_them() {
        let list = Value::list(vec![Value::number(4)]);

        let copy = list.duplicate();
        assert_ne!(copy.id(), list.id());
        assert_ne!(copy.as_list().unwrap()[0].id(), list.as_list().unwrap()[0].id());

        let snap = list.snapshot();
        assert_eq!(snap.id(), list.id());
        assert_eq!(snap.as_list().unwrap()[0].id(), list.as_list().unwrap()[0].id());

        let shared = list.clone();
        assert_eq!(shared.id(), list.id());
    }

    #[test]
    fn plain_conversion_rejects_non_data() {
        let nested = Value::list(vec![Value::list(vec![Value::number(1)]), Value::string("x")]);
        let plain = nested.to_plain().expect("plain data");
        assert_eq!(
            plain,
            Plain::List(vec![Plain::List(vec![Plain::Number(1)]), Plain::Str("x".into())])
        );
        assert!(Value::type_value(AutumnType::Number).to_plain().is_none());
    }
}
