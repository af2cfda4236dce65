//! Structured context values
//!
//! This module provides:
//! - `Value`: a tagged value stored under one context key
//! - `Context`: an ordered key/value map attached to entries, channels and loggers

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Value type for structured context fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    /// Any other serializable value, captured as JSON
    Json(serde_json::Value),
}

impl Value {
    /// Capture an arbitrary serializable value
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
        serde_json::to_value(value).map(Value::from)
    }

    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json_value).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json_value()))
                    .collect(),
            ),
            Value::Json(value) => value.clone(),
        }
    }

    /// Whether the value is a list, map or captured JSON structure
    pub fn is_composite(&self) -> bool {
        match self {
            Value::List(_) | Value::Map(_) => true,
            Value::Json(value) => value.is_array() || value.is_object(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Json(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Json(value) => value.as_i64(),
            _ => None,
        }
    }

    /// Render for chat destinations: scalars as text, structures as a
    /// pretty-printed JSON code block.
    pub fn to_markdown(&self) -> String {
        if self.is_composite() {
            let pretty = serde_json::to_string_pretty(&self.to_json_value())
                .unwrap_or_else(|_| self.to_string());
            format!("```\n{}\n```", pretty)
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "{}", s),
            Value::Json(serde_json::Value::String(s)) => write!(f, "{}", s),
            Value::List(_) | Value::Map(_) | Value::Json(_) => {
                write!(f, "{}", self.to_json_value())
            }
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(i: $t) -> Self {
                    Value::Int(i as i64)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        i64::try_from(u).map(Value::Int).unwrap_or(Value::Float(u as f64))
    }
}

impl From<usize> for Value {
    fn from(u: usize) -> Self {
        Value::from(u as u64)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f as f64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<Context> for Value {
    fn from(context: Context) -> Self {
        Value::Map(context.fields)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

/// Key/value data carried alongside a log message.
///
/// Keys are kept sorted, so rendering is stable. Merging overlays: a key
/// written later replaces the earlier value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    fields: BTreeMap<String, Value>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Add a field to the context
    #[must_use]
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Add a field to the context (mutable version)
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<Value>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.fields.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Overlay `other` onto this context; keys in `other` win.
    pub fn merge(&mut self, other: &Context) {
        for (key, value) in &other.fields {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    /// Copy of this context with `other` overlaid
    #[must_use]
    pub fn merged(&self, other: &Context) -> Context {
        let mut merged = self.clone();
        merged.merge(other);
        merged
    }

    /// Copy of this context without the given keys
    #[must_use]
    pub fn without<I, K>(&self, keys: I) -> Context
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut reduced = self.clone();
        for key in keys {
            reduced.fields.remove(key.as_ref());
        }
        reduced
    }

    /// Drop every field
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Get all fields
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if context has any fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Format fields as key=value pairs
    pub fn format_fields(&self) -> String {
        self.fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_fields())
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K, V> Extend<(K, V)> for Context
where
    K: Into<String>,
    V: Into<Value>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.fields.insert(k.into(), v.into());
        }
    }
}

impl<'a> IntoIterator for &'a Context {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl IntoIterator for Context {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl From<BTreeMap<String, Value>> for Context {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Self { fields }
    }
}

impl From<HashMap<String, Value>> for Context {
    fn from(fields: HashMap<String, Value>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_creation() {
        let ctx = Context::new();
        assert!(ctx.is_empty());
        assert_eq!(ctx.len(), 0);
    }

    #[test]
    fn test_context_with_fields() {
        let ctx = Context::new()
            .with("user_id", 123)
            .with("username", "john_doe")
            .with("active", true);

        assert_eq!(ctx.len(), 3);
        assert_eq!(ctx.get("user_id"), Some(&Value::Int(123)));
        assert_eq!(ctx.get("username").and_then(Value::as_str), Some("john_doe"));
    }

    #[test]
    fn test_context_format() {
        let ctx = Context::new().with("key1", "value1").with("key2", 42);

        assert_eq!(ctx.format_fields(), "key1=value1 key2=42");
    }

    #[test]
    fn test_merge_later_wins() {
        let mut base = Context::new().with("a", 1).with("b", "keep");
        base.merge(&Context::new().with("a", 2).with("c", 3.5));

        assert_eq!(base.get("a"), Some(&Value::Int(2)));
        assert_eq!(base.get("b").and_then(Value::as_str), Some("keep"));
        assert_eq!(base.get("c"), Some(&Value::Float(3.5)));
    }

    #[test]
    fn test_merged_and_without_leave_original_untouched() {
        let original = Context::new().with("a", 1).with("b", 2);

        let extended = original.merged(&Context::new().with("c", 3));
        let reduced = original.without(["a"]);

        assert_eq!(original.len(), 2);
        assert_eq!(extended.len(), 3);
        assert_eq!(reduced.len(), 1);
        assert!(!reduced.contains_key("a"));
    }

    #[test]
    fn test_display_scalars_and_composites() {
        assert_eq!(Value::from("plain").to_string(), "plain");
        assert_eq!(Value::from(7u8).to_string(), "7");
        assert_eq!(Value::from(false).to_string(), "false");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(vec![1, 2]).to_string(), "[1,2]");

        let nested = Value::from(Context::new().with("x", 1));
        assert_eq!(nested.to_string(), "{\"x\":1}");
    }

    #[test]
    fn test_markdown_fences_structures_only() {
        assert_eq!(Value::from("short").to_markdown(), "short");

        let rendered = Value::from(vec!["a", "b"]).to_markdown();
        assert!(rendered.starts_with("```\n"));
        assert!(rendered.ends_with("\n```"));
    }

    #[test]
    fn test_from_serialize_captures_structs() {
        #[derive(Serialize)]
        struct Order {
            id: u32,
            items: Vec<&'static str>,
        }

        let value = Value::from_serialize(&Order {
            id: 7,
            items: vec!["book"],
        })
        .unwrap();

        assert!(value.is_composite());
        assert_eq!(value.to_json_value()["id"], 7);
    }

    #[test]
    fn test_large_unsigned_falls_back_to_float() {
        assert_eq!(Value::from(5u64), Value::Int(5));
        assert!(matches!(Value::from(u64::MAX), Value::Float(_)));
    }

    #[test]
    fn test_context_serializes_as_plain_object() {
        let ctx = Context::new().with("env", "prod").with("attempt", 2);
        let json = serde_json::to_string(&ctx).unwrap();
        assert_eq!(json, "{\"attempt\":2,\"env\":\"prod\"}");
    }

    #[test]
    fn test_collect_from_pairs() {
        let ctx: Context = vec![("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(ctx.keys().cloned().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
