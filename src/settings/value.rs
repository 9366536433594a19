//! Typed leaf values and the observable cell that holds them

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// A setting value, either text or a whole number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Str(String),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::Int(_) => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Str(s) => serde_json::Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

/// Declared type of a leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Str,
    Int,
}

impl ValueKind {
    /// Convert a value into this kind.
    ///
    /// Integer leaves take integers or text that parses as one. Text leaves
    /// take text or integers, which are stored as their decimal form.
    pub fn convert(self, path: &str, value: Value) -> Result<Value, SettingsError> {
        match (self, value) {
            (ValueKind::Int, Value::Int(i)) => Ok(Value::Int(i)),
            (ValueKind::Int, Value::Str(s)) => s
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| SettingsError::invalid(path, format!("\"{}\" is not an integer", s))),
            (ValueKind::Str, Value::Str(s)) => Ok(Value::Str(s)),
            (ValueKind::Str, Value::Int(i)) => Ok(Value::Str(i.to_string())),
        }
    }

    /// Convert a value read from a settings document.
    ///
    /// `null` counts as absent and yields `None`.
    pub fn from_json(
        self,
        path: &str,
        value: &serde_json::Value,
    ) -> Result<Option<Value>, SettingsError> {
        let raw = match value {
            serde_json::Value::Null => return Ok(None),
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => {
                    return Err(SettingsError::invalid(
                        path,
                        format!("{} is not a whole number", n),
                    ))
                }
            },
            other => {
                return Err(SettingsError::invalid(
                    path,
                    format!("unsupported value {}", other),
                ))
            }
        };
        self.convert(path, raw).map(Some)
    }
}

/// Token returned by a subscription, used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub(crate) u64);

/// Change listener, called with the new value after every set
pub type Listener = Box<dyn FnMut(&Value) + Send>;

/// A single observable value cell
pub struct Leaf {
    value: Value,
    kind: ValueKind,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Leaf {
    pub fn new(kind: ValueKind, value: Value) -> Self {
        Self {
            value,
            kind,
            listeners: Vec::new(),
        }
    }

    pub fn str(value: &str) -> Self {
        Self::new(ValueKind::Str, Value::from(value))
    }

    pub fn int(value: i64) -> Self {
        Self::new(ValueKind::Int, Value::Int(value))
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Store an already-converted value and notify listeners in registration order
    pub(crate) fn store(&mut self, value: Value) {
        self.value = value;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.value);
        }
    }

    pub(crate) fn subscribe(&mut self, id: SubscriptionId, listener: Listener) {
        self.listeners.push((id, listener));
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Leaf")
            .field("value", &self.value)
            .field("kind", &self.kind)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
