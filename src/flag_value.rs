use log::warn;
use serde::Serialize;

use crate::util::f64_to_i64_safe;

/// FlagValue is the value a flag resolves to: either a primitive or an arbitrary JSON document.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Str(String),
    Int(i64),
    Float(f64),
    Json(serde_json::Value),
}

impl From<bool> for FlagValue {
    fn from(b: bool) -> FlagValue {
        FlagValue::Bool(b)
    }
}

impl From<String> for FlagValue {
    fn from(s: String) -> FlagValue {
        FlagValue::Str(s)
    }
}

impl From<&str> for FlagValue {
    fn from(s: &str) -> FlagValue {
        FlagValue::Str(s.to_string())
    }
}

impl From<f64> for FlagValue {
    fn from(f: f64) -> FlagValue {
        FlagValue::Float(f)
    }
}

impl From<i64> for FlagValue {
    fn from(i: i64) -> FlagValue {
        FlagValue::Int(i)
    }
}

impl From<serde_json::Value> for FlagValue {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value;
        match v {
            Value::Bool(b) => b.into(),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    i.into()
                } else if let Some(f) = n.as_f64() {
                    f.into()
                } else {
                    warn!("unrepresentable number {}, converting to string", n);
                    FlagValue::Json(format!("{}", n).into())
                }
            }
            Value::String(s) => s.into(),
            Value::Null | Value::Object(_) | Value::Array(_) => FlagValue::Json(v),
        }
    }
}

impl FlagValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FlagValue::Bool(b) => Some(*b),
            _ => {
                warn!("flag value is not bool but {:?}", self);
                None
            }
        }
    }

    pub fn as_string(&self) -> Option<String> {
        match self {
            FlagValue::Str(s) => Some(s.clone()),
            _ => {
                warn!("flag value is not str but {:?}", self);
                None
            }
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FlagValue::Float(f) => Some(*f),
            FlagValue::Int(i) => Some(*i as f64),
            _ => {
                warn!("flag value is not float but {:?}", self);
                None
            }
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FlagValue::Int(i) => Some(*i),
            FlagValue::Float(f) => f64_to_i64_safe(*f),
            _ => None,
        }
    }

    pub fn as_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            FlagValue::Bool(b) => Value::from(*b),
            FlagValue::Str(s) => Value::from(s.as_str()),
            FlagValue::Float(f) => Value::from(*f),
            FlagValue::Int(i) => Value::from(*i),
            FlagValue::Json(v) => v.clone(),
        }
    }

    /// True for JSON null, which the flag service uses for "no value".
    pub fn is_null(&self) -> bool {
        matches!(self, FlagValue::Json(serde_json::Value::Null))
    }

    /// Boolean coercion of the value.
    ///
    /// `false`, zero, NaN, the empty string and null are falsy. Every other value, including empty
    /// JSON objects and arrays, is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            FlagValue::Bool(b) => *b,
            FlagValue::Str(s) => !s.is_empty(),
            FlagValue::Int(i) => *i != 0,
            FlagValue::Float(f) => *f != 0.0 && !f.is_nan(),
            FlagValue::Json(v) => !v.is_null(),
        }
    }

    /// Short name of the value's type, as shown in flag summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            FlagValue::Bool(_) => "boolean",
            FlagValue::Str(_) => "string",
            FlagValue::Int(_) | FlagValue::Float(_) => "number",
            FlagValue::Json(_) => "json",
        }
    }
}
