//! Operand values accepted by checks and logged by tests

use serde::{Deserialize, Serialize};

/// A value handed to a check or recorded as a logged value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CheckValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CheckValue {
    /// Numeric view of the value; booleans and text are not numeric
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CheckValue::Integer(i) => Some(*i as f64),
            CheckValue::Float(f) => Some(*f),
            CheckValue::Bool(_) | CheckValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CheckValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CheckValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            CheckValue::Bool(_) => "boolean",
            CheckValue::Integer(_) => "integer",
            CheckValue::Float(_) => "float",
            CheckValue::Text(_) => "text",
        }
    }
}

impl std::fmt::Display for CheckValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckValue::Bool(b) => write!(f, "{}", b),
            CheckValue::Integer(i) => write!(f, "{}", i),
            CheckValue::Float(fl) => write!(f, "{}", fl),
            CheckValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for CheckValue {
    fn from(value: bool) -> Self {
        CheckValue::Bool(value)
    }
}

impl From<i32> for CheckValue {
    fn from(value: i32) -> Self {
        CheckValue::Integer(i64::from(value))
    }
}

impl From<i64> for CheckValue {
    fn from(value: i64) -> Self {
        CheckValue::Integer(value)
    }
}

impl From<u32> for CheckValue {
    fn from(value: u32) -> Self {
        CheckValue::Integer(i64::from(value))
    }
}

impl From<f32> for CheckValue {
    fn from(value: f32) -> Self {
        CheckValue::Float(f64::from(value))
    }
}

impl From<f64> for CheckValue {
    fn from(value: f64) -> Self {
        CheckValue::Float(value)
    }
}

impl From<&str> for CheckValue {
    fn from(value: &str) -> Self {
        CheckValue::Text(value.to_string())
    }
}

impl From<String> for CheckValue {
    fn from(value: String) -> Self {
        CheckValue::Text(value)
    }
}
