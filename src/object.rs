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

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{AutumnError, Result};
use crate::interpreter::calls::Callable;
use crate::span::Span;
use crate::types::AutumnType;
use crate::value::Value;

/// A nominal Autumn class: built-in components (`Position`, `Cell`,
/// `RenderedElem`) and every user `object` declaration.
pub struct Class {
    pub name: String,
    pub field_names: Vec<String>,
    pub field_types: Vec<AutumnType>,

    /// Maps constructor arguments to the field-value list. Absent means
    /// arguments map 1:1 onto fields.
    pub initializer: Option<Rc<dyn Callable>>,

    pub methods: HashMap<String, Rc<dyn Callable>>,
}

impl Class {
    pub fn new(name: impl Into<String>, fields: Vec<(String, AutumnType)>) -> Self {
        let (field_names, field_types) = fields.into_iter().unzip();
        Self {
            name: name.into(),
            field_names,
            field_types,
            initializer: None,
            methods: HashMap::new(),
        }
    }

    pub fn with_initializer(mut self, initializer: Rc<dyn Callable>) -> Self {
        self.initializer = Some(initializer);
        self
    }

    pub fn with_method(mut self, name: impl Into<String>, method: Rc<dyn Callable>) -> Self {
        self.methods.insert(name.into(), method);
        self
    }

    pub fn field_type(&self, name: &str) -> Option<&AutumnType> {
        self.field_names
            .iter()
            .position(|f| f == name)
            .map(|i| &self.field_types[i])
    }

    pub fn method(&self, name: &str) -> Option<&Rc<dyn Callable>> {
        self.methods.get(name)
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {} {{", self.name)?;
        for (name, ty) in self.field_names.iter().zip(&self.field_types) {
            write!(f, "{}: {}, ", name, ty)?;
        }
        write!(f, "}}")
    }
}

/// Object instance. Field updates through `set` happen in place and
/// are seen by every alias of the same `Rc<Instance>`.
pub struct Instance {
    class: Rc<Class>,
    fields: RefCell<HashMap<String, Value>>,
}

impl Instance {
    /// Validates field count and per-field type compatibility.
    pub fn new(class: Rc<Class>, values: Vec<Value>) -> Result<Self> {
        if values.len() != class.field_names.len() {
            return Err(AutumnError::arity_error(
                &class.name,
                class.field_names.len(),
                values.len(),
                Span::synthetic(),
            ));
        }

        let mut fields = HashMap::with_capacity(values.len());
        for ((name, expected), value) in class.field_names.iter().zip(&class.field_types).zip(values) {
            let actual = value.ty();
            if !expected.accepts(&actual) {
                return Err(AutumnError::type_mismatch(
                    format!(
                        "Field type mismatch in {}: {} with type {} vs {}",
                        class.name, name, actual, expected
                    ),
                    Span::synthetic(),
                ));
            }
            fields.insert(name.clone(), value);
        }

        Ok(Self {
            class,
            fields: RefCell::new(fields),
        })
    }

    pub fn class(&self) -> &Rc<Class> {
        &self.class
    }

    pub fn class_name(&self) -> &str {
        &self.class.name
    }

    pub fn field(&self, name: &str) -> Option<Value> {
        self.fields.borrow().get(name).cloned()
    }

    /// Field values in declaration order.
    pub fn field_values(&self) -> Vec<(String, Value)> {
        let fields = self.fields.borrow();
        self.class
            .field_names
            .iter()
            .filter_map(|name| fields.get(name).map(|v| (name.clone(), v.clone())))
            .collect()
    }

    pub fn set(&self, name: &str, value: Value) -> Result<()> {
        let expected = self.class.field_type(name).ok_or_else(|| {
            AutumnError::undefined_property(name, &self.class.name, Span::synthetic())
        })?;

        let actual = value.ty();
        if !expected.accepts(&actual) {
            return Err(AutumnError::type_mismatch(
                format!(
                    "Cannot set field '{}' of {} to a value of type {}, expected {}",
                    name, self.class.name, actual, expected
                ),
                Span::synthetic(),
            ));
        }

        self.fields.borrow_mut().insert(name.to_string(), value);
        Ok(())
    }

    /// Same class, every field passed through `f`.
    pub fn map_fields(&self, f: impl Fn(&Value) -> Value) -> Instance {
        let fields = self
            .fields
            .borrow()
            .iter()
            .map(|(name, value)| (name.clone(), f(value)))
            .collect();
        Instance {
            class: self.class.clone(),
            fields: RefCell::new(fields),
        }
    }

    pub fn is_equal(&self, other: &Instance) -> bool {
        if self.class.name != other.class.name {
            return false;
        }
        let mine = self.fields.borrow();
        let theirs = other.fields.borrow();
        mine.len() == theirs.len()
            && mine
                .iter()
                .all(|(name, value)| theirs.get(name).map_or(false, |v| value.is_equal(v)))
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.class.name)?;
        let fields = self.field_values();
        if fields.is_empty() {
            write!(f, "None")?;
        }
        for (i, (name, value)) in fields.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn position_class() -> Rc<Class> {
        Rc::new(Class::new(
            "Position",
            vec![
                ("x".to_string(), AutumnType::Number),
                ("y".to_string(), AutumnType::Number),
            ],
        ))
    }

    #[test]
    fn construction_validates_count_and_types() {
        let class = position_class();

        let err = Instance::new(class.clone(), vec![Value::number(1)]).err().unwrap();
        assert_eq!(err.kind, ErrorKind::ArityError);

        let err = Instance::new(class.clone(), vec![Value::number(1), Value::string("y")])
            .err()
            .unwrap();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);

        let pos = Instance::new(class, vec![Value::number(1), Value::number(2)]).unwrap();
        assert_eq!(pos.to_string(), "Position{x: (1: N),y: (2: N)}");
    }

    #[test]
    fn set_is_visible_through_aliases() {
        let pos = Value::instance(
            Instance::new(position_class(), vec![Value::number(0), Value::number(0)]).unwrap(),
        );
        let alias = pos.clone();
        let copy = pos.duplicate();

        pos.as_instance().unwrap().set("x", Value::number(7)).unwrap();

        assert_eq!(alias.as_instance().unwrap().field("x").unwrap().as_number(), Some(7));
        assert_eq!(copy.as_instance().unwrap().field("x").unwrap().as_number(), Some(0));
    }

    #[test]
    fn set_rejects_unknown_fields_and_wrong_types() {
        let pos = Instance::new(position_class(), vec![Value::number(0), Value::number(0)]).unwrap();
        assert_eq!(
            pos.set("z", Value::number(1)).unwrap_err().kind,
            ErrorKind::UndefinedProperty
        );
        assert_eq!(
            pos.set("x", Value::bool(true)).unwrap_err().kind,
            ErrorKind::TypeMismatch
        );
    }
}
