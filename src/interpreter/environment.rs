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
use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::Rc;

use serde_json::{json, Map};

use crate::error::{AutumnError, Result};
use crate::span::Span;
use crate::types::AutumnType;
use crate::value::{Value, ValueId};

/// Shared handle to one scope. Child scopes and the previous-step
/// snapshot hold these, so a parent lives as long as its longest holder.
pub type Env = Rc<RefCell<Environment>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Local,
    /// Activation record of a method or constructor; cell capture skips
    /// the nearest one.
    Instance,
}

/// One scope in the chain.
pub struct Environment {
    kind: ScopeKind,
    values: HashMap<String, Value>,
    definition_order: Vec<String>,
    updated: HashMap<String, bool>,
    type_values: HashMap<String, AutumnType>,
    assigned_types: HashMap<String, AutumnType>,
    occupied: HashSet<(i64, i64)>,
    enclosing: Option<Env>,
}

impl Environment {
    pub fn new(kind: ScopeKind, enclosing: Option<Env>) -> Self {
        Self {
            kind,
            values: HashMap::new(),
            definition_order: Vec::new(),
            updated: HashMap::new(),
            type_values: HashMap::new(),
            assigned_types: HashMap::new(),
            occupied: HashSet::new(),
            enclosing,
        }
    }

    pub fn new_global() -> Env {
        Rc::new(RefCell::new(Environment::new(ScopeKind::Global, None)))
    }

    pub fn child(parent: &Env, kind: ScopeKind) -> Env {
        Rc::new(RefCell::new(Environment::new(kind, Some(parent.clone()))))
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn enclosing(&self) -> Option<Env> {
        self.enclosing.clone()
    }

    pub fn set_enclosing(&mut self, enclosing: Option<Env>) -> Option<Env> {
        std::mem::replace(&mut self.enclosing, enclosing)
    }

    /* ----------------------------- */
    /* LOCAL BINDINGS                */
    /* ----------------------------- */

    pub fn define(&mut self, name: &str, value: Value) {
        if self.values.insert(name.to_string(), value).is_none() {
            self.definition_order.push(name.to_string());
        }
        self.updated.insert(name.to_string(), false);
    }

    pub fn define_type(&mut self, name: &str, ty: AutumnType) {
        self.type_values.insert(name.to_string(), ty);
    }

    /// Records an explicitly declared type, e.g. from `(: x Number)`.
    pub fn assign_type(&mut self, name: &str, ty: AutumnType) {
        self.assigned_types.insert(name.to_string(), ty);
    }

    pub fn local(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }

    pub fn has_local(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn values(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Names in definition order, without repeats.
    pub fn definition_order(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.definition_order
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect()
    }

    pub fn reset_update_states(&mut self) {
        for flag in self.updated.values_mut() {
            *flag = false;
        }
    }

    pub fn reset(&mut self) {
        self.values.clear();
        self.definition_order.clear();
        self.updated.clear();
        self.type_values.clear();
        self.assigned_types.clear();
        self.occupied.clear();
    }

    /* ----------------------------- */
    /* OCCUPIED GRID POSITIONS       */
    /* ----------------------------- */

    pub fn clear_occupied(&mut self) {
        self.occupied.clear();
    }

    pub fn occupy(&mut self, x: i64, y: i64) {
        self.occupied.insert((x, y));
    }

    pub fn is_free(&self, x: i64, y: i64) -> bool {
        !self.occupied.contains(&(x, y))
    }

    /* ----------------------------- */
    /* CHAIN WALKS                   */
    /* ----------------------------- */

    /// Scopes from `env` outward, innermost first.
    pub fn chain(env: &Env) -> Vec<Env> {
        let mut scopes = vec![env.clone()];
        let mut next = env.borrow().enclosing();
        while let Some(scope) = next {
            next = scope.borrow().enclosing();
            scopes.push(scope);
        }
        scopes
    }

    pub fn chain_contains(env: &Env, target: &Env) -> bool {
        Environment::chain(env).iter().any(|s| Rc::ptr_eq(s, target))
    }

    pub fn outermost(env: &Env) -> Env {
        let mut current = env.clone();
        loop {
            let parent = current.borrow().enclosing();
            match parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    pub fn get(env: &Env, name: &str) -> Option<Value> {
        Environment::chain(env)
            .iter()
            .find_map(|scope| scope.borrow().local(name))
    }

    /// Looks `name` up exactly `distance` scopes out.
    pub fn get_at(env: &Env, distance: usize, name: &str) -> Option<Value> {
        Environment::chain(env)
            .get(distance)
            .and_then(|scope| scope.borrow().local(name))
    }

    pub fn get_type_value(env: &Env, name: &str) -> Option<AutumnType> {
        Environment::chain(env)
            .iter()
            .find_map(|scope| scope.borrow().type_values.get(name).cloned())
    }

    pub fn assigned_type(env: &Env, name: &str) -> Option<AutumnType> {
        Environment::chain(env)
            .iter()
            .find_map(|scope| scope.borrow().assigned_types.get(name).cloned())
    }

    pub fn is_updated(env: &Env, name: &str) -> bool {
        Environment::chain(env)
            .iter()
            .find_map(|scope| scope.borrow().updated.get(name).copied())
            .unwrap_or(false)
    }

    /// Rebinds the nearest existing binding of `name`, keeping the old
    /// identity and marking it updated. An unbound name is defined in
    /// the outermost scope.
    ///
    /// Rebinding to a value of a different type fails unless the new
    /// value is a list.
    pub fn assign(env: &Env, name: &str, value: Value) -> Result<()> {
        for scope in Environment::chain(env) {
            let mut scope = scope.borrow_mut();
            let old = match scope.values.get(name) {
                Some(old) => old,
                None => continue,
            };

            let (old_type, new_type) = (old.ty(), value.ty());
            if old_type.to_string() != new_type.to_string() && !value.is_list() {
                return Err(AutumnError::type_mismatch(
                    format!(
                        "Cannot assign value of type '{}' to variable of type '{}' for variable '{}'.",
                        new_type, old_type, name
                    ),
                    Span::synthetic(),
                ));
            }

            let id = old.id();
            scope.values.insert(name.to_string(), value.with_id(id));
            scope.updated.insert(name.to_string(), true);
            return Ok(());
        }

        Environment::outermost(env).borrow_mut().define(name, value);
        Ok(())
    }

    pub fn find_id(env: &Env, id: ValueId) -> Option<Value> {
        Environment::chain(env).iter().find_map(|scope| {
            scope
                .borrow()
                .values
                .values()
                .find(|v| v.id() == id)
                .cloned()
        })
    }

    /// Removes the first binding holding identity `id`, searching outward.
    pub fn remove_id_if_exist(env: &Env, id: ValueId) -> bool {
        for scope in Environment::chain(env) {
            let mut scope = scope.borrow_mut();
            let key = scope
                .values
                .iter()
                .find(|(_, v)| v.id() == id)
                .map(|(k, _)| k.clone());
            if let Some(key) = key {
                scope.values.remove(&key);
                scope.definition_order.retain(|n| *n != key);
                return true;
            }
        }
        false
    }

    /* ----------------------------- */
    /* COPIES                        */
    /* ----------------------------- */

    /// New scope sharing this scope's values, re-parented.
    pub fn copy(&self, new_enclosing: Option<Env>) -> Env {
        self.copy_with(new_enclosing, Value::clone)
    }

    /// New scope holding id-preserving deep copies of this scope's
    /// values, re-parented.
    pub fn snapshot(&self, new_enclosing: Option<Env>) -> Env {
        self.copy_with(new_enclosing, Value::snapshot)
    }

    fn copy_with(&self, new_enclosing: Option<Env>, f: impl Fn(&Value) -> Value) -> Env {
        let mut scope = Environment::new(self.kind, new_enclosing);
        scope.values = self.values.iter().map(|(k, v)| (k.clone(), f(v))).collect();
        scope.definition_order = self.definition_order.clone();
        scope.updated = self.updated.clone();
        scope.type_values = self.type_values.clone();
        scope.assigned_types = self.assigned_types.clone();
        scope.occupied = self.occupied.clone();
        Rc::new(RefCell::new(scope))
    }

    /// Snapshots every scope from `env` outward into a parallel chain.
    pub fn snapshot_chain(env: &Env) -> Env {
        let scopes = Environment::chain(env);
        let mut parent: Option<Env> = None;
        for scope in scopes.iter().rev() {
            parent = Some(scope.borrow().snapshot(parent));
        }
        // `chain` always yields at least `env` itself.
        parent.unwrap_or_else(Environment::new_global)
    }

    /// Merges all of `from`'s bindings into this scope.
    pub fn copy_all(&mut self, from: &Environment) {
        for (key, value) in &from.values {
            self.values.insert(key.clone(), value.clone());
        }
        self.type_values
            .extend(from.type_values.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.updated
            .extend(from.updated.iter().map(|(k, v)| (k.clone(), *v)));
        self.assigned_types
            .extend(from.assigned_types.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.definition_order
            .extend(from.definition_order.iter().cloned());
    }

    /// Merges the bindings named in `keys`, plus every type value.
    pub fn selective_copy(&mut self, from: &Environment, keys: &BTreeSet<String>) {
        for (key, value) in &from.values {
            if keys.contains(key) {
                self.values.insert(key.clone(), value.clone());
            }
        }
        self.type_values
            .extend(from.type_values.iter().map(|(k, v)| (k.clone(), v.clone())));
        for (key, flag) in &from.updated {
            if keys.contains(key) {
                self.updated.insert(key.clone(), *flag);
            }
        }
        for (key, ty) in &from.assigned_types {
            if keys.contains(key) {
                self.assigned_types.insert(key.clone(), ty.clone());
            }
        }
        for key in &from.definition_order {
            if keys.contains(key) && !self.definition_order.contains(key) {
                self.definition_order.push(key.clone());
            }
        }
    }

    /// JSON dump of the chain, outermost scope first, each inner scope
    /// nested under `childScope`.
    pub fn chain_json(env: &Env) -> serde_json::Value {
        let mut nested: Option<serde_json::Value> = None;

        for scope in Environment::chain(env) {
            let scope = scope.borrow();
            let vars: Map<String, serde_json::Value> = scope
                .values
                .iter()
                .map(|(k, v)| (k.clone(), json!(v.to_string())))
                .collect();
            let types: Map<String, serde_json::Value> = scope
                .type_values
                .iter()
                .map(|(k, t)| (k.clone(), json!(t.to_string())))
                .collect();

            let mut object = json!({ "varValues": vars, "typeValues": types });
            if let Some(child) = nested.take() {
                object["childScope"] = child;
            }
            nested = Some(object);
        }

        nested.unwrap_or_else(|| json!({}))
    }
}

/// Builds the isolated scope a `Cell` captures: a parentless scope that
/// holds only `names`, copied from every scope on the chain except the
/// nearest `Instance` activation record. Inner bindings win.
pub fn capture_scope(env: &Env, names: &BTreeSet<String>) -> Env {
    let scopes = Environment::chain(env);
    let skipped = scopes
        .iter()
        .position(|scope| scope.borrow().kind() == ScopeKind::Instance);

    let captured = Environment::new_global();
    {
        let mut target = captured.borrow_mut();
        for (index, scope) in scopes.iter().enumerate().rev() {
            if Some(index) == skipped {
                continue;
            }
            target.selective_copy(&scope.borrow(), names);
        }
    }
    captured
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn names(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn assign_rebinds_nearest_and_keeps_identity() {
        let global = Environment::new_global();
        global.borrow_mut().define("x", Value::number(1));
        let id = Environment::get(&global, "x").unwrap().id();

        let local = Environment::child(&global, ScopeKind::Local);
        Environment::assign(&local, "x", Value::number(2)).unwrap();

        let x = Environment::get(&global, "x").unwrap();
        assert_eq!(x.as_number(), Some(2));
        assert_eq!(x.id(), id);
        assert!(Environment::is_updated(&local, "x"));
        assert!(!local.borrow().has_local("x"));
    }

    #[test]
    fn assign_of_unbound_name_defines_globally() {
        let global = Environment::new_global();
        let local = Environment::child(&global, ScopeKind::Local);
        Environment::assign(&local, "fresh", Value::bool(true)).unwrap();
        assert!(global.borrow().has_local("fresh"));
    }

    #[test]
    fn assign_rejects_type_changes_except_lists() {
        let global = Environment::new_global();
        global.borrow_mut().define("n", Value::number(1));
        let err = Environment::assign(&global, "n", Value::string("one")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert_eq!(
            err.message,
            "Cannot assign value of type 'String' to variable of type 'Number' for variable 'n'."
        );

        global.borrow_mut().define("xs", Value::list(vec![Value::number(1)]));
        Environment::assign(&global, "xs", Value::list(vec![Value::string("a")])).unwrap();
    }

    #[test]
    fn null_does_not_launder_a_type_change() {
        let global = Environment::new_global();
        global.borrow_mut().define("n", Value::number(1));

        let err = Environment::assign(&global, "n", Value::null()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);

        let err = Environment::assign(&global, "n", Value::bool(true)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert_eq!(
            Environment::get(&global, "n").and_then(|v| v.as_number()),
            Some(1)
        );
    }

    #[test]
    fn get_at_walks_exact_distance() {
        let global = Environment::new_global();
        global.borrow_mut().define("v", Value::number(1));
        let local = Environment::child(&global, ScopeKind::Local);
        local.borrow_mut().define("v", Value::number(2));

        assert_eq!(Environment::get_at(&local, 0, "v").unwrap().as_number(), Some(2));
        assert_eq!(Environment::get_at(&local, 1, "v").unwrap().as_number(), Some(1));
        assert!(Environment::get_at(&local, 2, "v").is_none());
    }

    #[test]
    fn snapshot_chain_is_isolated_but_keeps_ids() {
        let global = Environment::new_global();
        global.borrow_mut().define("n", Value::number(3));
        let id = Environment::get(&global, "n").unwrap().id();

        let prev = Environment::snapshot_chain(&global);
        Environment::assign(&global, "n", Value::number(4)).unwrap();

        let old = Environment::get(&prev, "n").unwrap();
        assert_eq!(old.as_number(), Some(3));
        assert_eq!(old.id(), id);
        assert!(Environment::find_id(&prev, id).is_some());
    }

    #[test]
    fn capture_skips_nearest_instance_scope() {
        let global = Environment::new_global();
        global.borrow_mut().define("on", Value::bool(false));
        global.borrow_mut().define("unused", Value::number(0));
        let instance = Environment::child(&global, ScopeKind::Instance);
        instance.borrow_mut().define("on", Value::bool(true));
        let local = Environment::child(&instance, ScopeKind::Local);
        local.borrow_mut().define("offset", Value::number(2));

        let captured = capture_scope(&local, &names(&["on", "offset"]));
        let scope = captured.borrow();
        assert_eq!(scope.local("on").unwrap().as_bool(), Some(false));
        assert_eq!(scope.local("offset").unwrap().as_number(), Some(2));
        assert!(!scope.has_local("unused"));
        assert!(scope.enclosing().is_none());
    }

    #[test]
    fn remove_by_identity() {
        let global = Environment::new_global();
        global.borrow_mut().define("a", Value::number(1));
        let id = Environment::get(&global, "a").unwrap().id();

        assert!(Environment::remove_id_if_exist(&global, id));
        assert!(Environment::get(&global, "a").is_none());
        assert!(global.borrow().definition_order().is_empty());
    }

    #[test]
    fn json_nests_inner_scopes() {
        let global = Environment::new_global();
        global.borrow_mut().define("g", Value::number(1));
        let local = Environment::child(&global, ScopeKind::Local);
        local.borrow_mut().define("l", Value::bool(true));

        let dump = Environment::chain_json(&local);
        assert_eq!(dump["varValues"]["g"], "(1: N)");
        assert_eq!(dump["childScope"]["varValues"]["l"], "(true: Bool)");
    }
}
