//! The value type held at every node of a configuration tree.
//!
//! A [`Value`] is either a leaf (scalar, JSON-style array, or multi-entry
//! list) or a nested [`DotMap`]. Two list variants exist on purpose:
//!
//! - [`Array`](Value::Array) came from a JSON literal (`[1, 2, 3]`) and is
//!   rendered back as one.
//! - [`Lines`](Value::Lines) came from a newline-split value or from
//!   multi-value accumulation, and is rendered back as one `key: entry`
//!   line per element.
//!
//! [`Empty`](Value::Empty) is the placeholder seeded into a freshly created,
//! not-yet-populated branch. It is distinct from [`Null`](Value::Null): the
//! renderer and JSON equality skip it, while a real `null` survives both.

use std::fmt;

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::map::DotMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// A list parsed from a JSON array literal.
    Array(Vec<Value>),
    /// A multi-entry list: one source line per element.
    Lines(Vec<String>),
    /// A nested tree node.
    Map(DotMap),
    /// Placeholder for a freshly created, unassigned branch.
    Empty,
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_lines(&self) -> Option<&[String]> {
        match self {
            Value::Lines(lines) => Some(lines),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&DotMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut DotMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn is_empty_marker(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Convert a parsed JSON value into a tree value. Objects become nested
    /// maps, so a JSON object literal in a source file nests like a section.
    pub fn from_json(json: serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(entries) => {
                let mut map = DotMap::new();
                for (key, val) in entries {
                    map.insert(key, Value::from_json(val));
                }
                Value::Map(map)
            }
        }
    }

    /// Render as a JSON value. `Lines` becomes a plain array, `Empty`
    /// becomes `null` (placeholders are filtered earlier where it matters).
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null | Value::Empty => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Lines(lines) => serde_json::Value::Array(
                lines
                    .iter()
                    .map(|l| serde_json::Value::String(l.clone()))
                    .collect(),
            ),
            Value::Map(map) => map.to_json(),
        }
    }
}

/// Text-format rendering of a single value, as it appears after `key:`.
///
/// Floats always keep a fractional part so they re-coerce as floats.
/// Arrays and maps render as JSON, which coerces back to the same shape.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null | Value::Empty => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) if x.is_finite() && *x == x.trunc() => write!(f, "{x:.1}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Lines(lines) => write!(f, "{}", lines.join("\n")),
            Value::Map(map) => {
                // inline JSON form, with placeholder seeds left out
                let json = map.to_json_filtered();
                let text = serde_json::to_string(&json).unwrap_or_else(|_| format!("{json:?}"));
                write!(f, "{text}")
            }
            Value::Array(_) => {
                let json = self.to_json();
                let text = serde_json::to_string(&json).unwrap_or_else(|_| format!("{json:?}"));
                write!(f, "{text}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null | Value::Empty => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Lines(lines) => {
                let mut seq = serializer.serialize_seq(Some(lines.len()))?;
                for line in lines {
                    seq.serialize_element(line)?;
                }
                seq.end()
            }
            Value::Map(map) => map.serialize(serializer),
        }
    }
}

/// Equality against plain JSON structures, for interop with reference data
/// loaded via `serde_json`. `Lines` equals an array of the same strings;
/// `Empty` placeholders never match anything.
impl PartialEq<serde_json::Value> for Value {
    fn eq(&self, other: &serde_json::Value) -> bool {
        match (self, other) {
            (Value::Null, serde_json::Value::Null) => true,
            (Value::Bool(a), serde_json::Value::Bool(b)) => a == b,
            (Value::Integer(a), serde_json::Value::Number(n)) => n.as_i64() == Some(*a),
            (Value::Float(a), serde_json::Value::Number(n)) => n.as_f64() == Some(*a),
            (Value::String(a), serde_json::Value::String(b)) => a == b,
            (Value::Array(items), serde_json::Value::Array(other)) => {
                items.len() == other.len() && items.iter().zip(other).all(|(a, b)| a == b)
            }
            (Value::Lines(lines), serde_json::Value::Array(other)) => {
                lines.len() == other.len()
                    && lines
                        .iter()
                        .zip(other)
                        .all(|(a, b)| b.as_str() == Some(a.as_str()))
            }
            (Value::Map(map), json) => map == json,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Vec<String>> for Value {
    fn from(lines: Vec<String>) -> Self {
        Value::Lines(lines)
    }
}

impl From<DotMap> for Value {
    fn from(map: DotMap) -> Self {
        Value::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_json_splits_integer_and_float() {
        assert_eq!(Value::from_json(serde_json::json!(3)), Value::Integer(3));
        assert_eq!(Value::from_json(serde_json::json!(3.14)), Value::Float(3.14));
    }

    #[test]
    fn from_json_object_becomes_map() {
        let v = Value::from_json(serde_json::json!({"a": 1, "b": [true]}));
        let map = v.as_map().unwrap();
        assert_eq!(map.get("a").unwrap(), &Value::Integer(1));
        assert_eq!(
            map.get("b").unwrap(),
            &Value::Array(vec![Value::Bool(true)])
        );
    }

    #[test]
    fn display_keeps_float_fraction() {
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::Float(3.14).to_string(), "3.14");
        assert_eq!(Value::Integer(1).to_string(), "1");
    }

    #[test]
    fn display_null_and_empty_render_as_null() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Empty.to_string(), "null");
    }

    #[test]
    fn display_array_is_json() {
        let v = Value::Array(vec![Value::Integer(1), Value::Integer(2)]);
        assert_eq!(v.to_string(), "[1,2]");
    }

    #[test]
    fn json_equality_for_scalars() {
        assert_eq!(Value::Bool(true), serde_json::json!(true));
        assert_eq!(Value::Integer(5), serde_json::json!(5));
        assert_eq!(Value::Float(2.5), serde_json::json!(2.5));
        assert_eq!(Value::String("x".into()), serde_json::json!("x"));
        assert_ne!(Value::String("5".into()), serde_json::json!(5));
    }

    #[test]
    fn lines_equal_string_array() {
        let v = Value::Lines(vec!["a".into(), "b".into()]);
        assert_eq!(v, serde_json::json!(["a", "b"]));
        assert_ne!(v, serde_json::json!(["a"]));
    }

    #[test]
    fn empty_marker_never_equals_json() {
        assert_ne!(Value::Empty, serde_json::json!(null));
    }

    #[test]
    fn serializes_lines_as_json_array() {
        let v = Value::Lines(vec!["x".into(), "y".into()]);
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"["x","y"]"#);
    }

    #[test]
    fn serializes_empty_as_null() {
        assert_eq!(serde_json::to_string(&Value::Empty).unwrap(), "null");
    }
}
