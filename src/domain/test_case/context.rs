//! Contexts handed to test case hooks

use std::collections::HashMap;

use serde_json::Value;

use crate::domain::check::CheckRecorder;
use crate::domain::interaction::InteractionPort;
use crate::domain::namespace::ConfigNamespace;

/// State shared by every case of one sequence run.
///
/// Written by one case's hooks, observable by the cases after it. Execution
/// is serial, so no locking is involved.
#[derive(Debug, Clone, Default)]
pub struct SharedState {
    values: HashMap<String, Value>,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Missing or non-boolean values read as `false`
    pub fn flag(&self, key: &str) -> bool {
        self.values
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Flip a flag and return its new value
    pub fn toggle(&mut self, key: &str) -> bool {
        let next = !self.flag(key);
        self.values.insert(key.to_string(), Value::Bool(next));
        next
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Context for the case-level hooks (`enter`, `tear_down`)
pub struct CaseContext<'a> {
    pub ui: &'a mut InteractionPort,
    pub shared: &'a mut SharedState,
    pub config: &'a ConfigNamespace,
}

/// Context for the attempt-level hooks (`set_up`, `test`, `clean_up`)
pub struct TestContext<'a> {
    pub checks: &'a mut CheckRecorder,
    pub ui: &'a mut InteractionPort,
    pub shared: &'a mut SharedState,
    pub config: &'a ConfigNamespace,
    attempt: u32,
}

impl<'a> TestContext<'a> {
    pub fn new(
        checks: &'a mut CheckRecorder,
        ui: &'a mut InteractionPort,
        shared: &'a mut SharedState,
        config: &'a ConfigNamespace,
        attempt: u32,
    ) -> Self {
        Self {
            checks,
            ui,
            shared,
            config,
            attempt,
        }
    }

    /// One-based number of the running attempt
    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}
