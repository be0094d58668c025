//! Form field validity state
//!
//! A field carries its value, a dirty flag and a set of named validity keys.
//! The validator only ever writes the [`OCCUPIED`] key; rendering code reads
//! [`FieldState::error_class`] and the keys to decide what to display.

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Validity key for "this name is not used by another roundtrip"
pub const OCCUPIED: &str = "occupied";

/// Field state shared between a view and the validator
pub type SharedField = Arc<RwLock<FieldState>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldState {
    value: String,
    dirty: bool,
    validity: BTreeMap<String, bool>,
    /// Last lookup diagnostic, kept until the next applied outcome
    diagnostic: Option<String>,
}

impl FieldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedField {
        Arc::new(RwLock::new(Self::new()))
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Record a user edit, returning the previous value
    pub fn set_value(&mut self, value: impl Into<String>) -> String {
        self.dirty = true;
        std::mem::replace(&mut self.value, value.into())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_validity(&mut self, key: &str, valid: bool) {
        self.validity.insert(key.to_string(), valid);
    }

    /// `None` until the key has been set once
    pub fn validity(&self, key: &str) -> Option<bool> {
        self.validity.get(key).copied()
    }

    /// Valid when no key is set to false
    pub fn is_valid(&self) -> bool {
        self.validity.values().all(|valid| *valid)
    }

    pub fn set_diagnostic(&mut self, diagnostic: Option<String>) {
        self.diagnostic = diagnostic;
    }

    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    /// CSS class for the field: `"error"` only once edited and invalid
    pub fn error_class(&self) -> &'static str {
        error_class(self.is_valid(), self.dirty)
    }
}

/// A named collection of fields
#[derive(Debug, Default)]
pub struct FormState {
    fields: BTreeMap<String, SharedField>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field, creating it pristine on first access
    pub fn field(&mut self, name: &str) -> SharedField {
        Arc::clone(
            self.fields
                .entry(name.to_string())
                .or_insert_with(FieldState::shared),
        )
    }

    pub fn is_valid(&self) -> bool {
        self.fields.values().all(|field| field.read().is_valid())
    }

    pub fn is_dirty(&self) -> bool {
        self.fields.values().any(|field| field.read().is_dirty())
    }

    pub fn error_class(&self) -> &'static str {
        error_class(self.is_valid(), self.is_dirty())
    }
}

fn error_class(valid: bool, dirty: bool) -> &'static str {
    if valid || !dirty {
        ""
    } else {
        "error"
    }
}
