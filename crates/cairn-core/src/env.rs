use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::CoreError;
use crate::value::Value;

/// A variable slot. Aliased variables share one slot, so a write through
/// either name is seen through both.
pub type SlotRef = Arc<RwLock<Value>>;

/// Name → slot table for variables. Values move or deep-copy in and out;
/// the only shared-reference construct is the explicit alias made by
/// [`Env::define_ref`].
#[derive(Default)]
pub struct Env {
    slots: HashMap<String, SlotRef>,
}

impl Env {
    pub fn new() -> Self {
        Env::default()
    }

    /// Binds a fresh slot holding `value`. Rebinding a name replaces its
    /// slot, detaching any aliases made from the old one.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.slots.insert(name.into(), Arc::new(RwLock::new(value)));
    }

    /// Binds a fresh slot holding a deep copy of `value`.
    pub fn define_copy(&mut self, name: impl Into<String>, value: &Value) {
        self.define(name, value.clone());
    }

    /// Binds `name` as an alias of `target`: both names share the target's
    /// slot from here on. Unbound target is a dynamic error.
    pub fn define_ref(&mut self, name: impl Into<String>, target: &str) -> Result<(), CoreError> {
        let slot = self
            .slots
            .get(target)
            .cloned()
            .ok_or_else(|| CoreError::message(format!("unbound variable: {}", target)))?;
        self.slots.insert(name.into(), slot);
        Ok(())
    }

    /// Replaces the value in `name`'s slot with a deep copy of `value`. The
    /// slot itself is kept, so aliases observe the new value. The stored
    /// type may change.
    pub fn assign(&mut self, name: &str, value: &Value) -> Result<(), CoreError> {
        let slot = self
            .slots
            .get(name)
            .ok_or_else(|| CoreError::message(format!("unbound variable: {}", name)))?;
        let mut guard = slot.write().unwrap_or_else(|e| e.into_inner());
        *guard = value.clone();
        Ok(())
    }

    /// A deep copy of the value in `name`'s slot.
    pub fn get(&self, name: &str) -> Result<Value, CoreError> {
        let slot = self
            .slots
            .get(name)
            .ok_or_else(|| CoreError::message(format!("unbound variable: {}", name)))?;
        let guard = slot.read().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone())
    }

    pub fn slot(&self, name: &str) -> Option<&SlotRef> {
        self.slots.get(name)
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Do two names share one slot?
    pub fn is_alias(&self, a: &str, b: &str) -> bool {
        match (self.slots.get(a), self.slots.get(b)) {
            (Some(x), Some(y)) => Arc::ptr_eq(x, y),
            _ => false,
        }
    }
}
