//! Variable bindings visible to an evaluation.

use indexmap::IndexMap;

use crate::value::Value;

/// Name to value bindings
///
/// The evaluator only ever borrows a context immutably, so one context can
/// serve many evaluations, including concurrent ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    variables: IndexMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context holding a single binding
    pub fn of(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new().with(name, value)
    }

    /// Add a binding, builder style
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Add several bindings, builder style
    pub fn with_all<K, V>(mut self, bindings: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        for (name, value) in bindings {
            self.set(name, value);
        }
        self
    }

    /// Build a context from the top-level keys of a JSON object
    ///
    /// Returns `None` when `json` is not an object.
    pub fn from_json(json: serde_json::Value) -> Option<Self> {
        match json {
            serde_json::Value::Object(entries) => Some(Self::new().with_all(entries)),
            _ => None,
        }
    }

    /// Insert or replace a binding
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Remove a binding, returning its value
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.variables.shift_remove(name)
    }

    /// Bound names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
