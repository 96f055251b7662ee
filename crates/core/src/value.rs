//! Typed attribute values and the flat attribute map.
//!
//! Rule conditions compare against these values. All numeric values use
//! `rust_decimal::Decimal` -- never `f64`. Absence of an attribute is
//! modeled by absence from the map, not by a null variant.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A typed scalar attribute value.
///
/// Deserialization is untagged: JSON booleans become `Bool`, numbers and
/// numeric strings become `Number`, everything else becomes `Text`.
/// Numbers serialize as strings so money never transits as a float.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Number(Decimal),
    Text(String),
}

impl AttrValue {
    /// Returns a human-readable type name for error messages and traces.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttrValue::Bool(_) => "bool",
            AttrValue::Number(_) => "number",
            AttrValue::Text(_) => "text",
        }
    }

    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            AttrValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<Decimal> for AttrValue {
    fn from(d: Decimal) -> Self {
        AttrValue::Number(d)
    }
}

impl From<i64> for AttrValue {
    fn from(i: i64) -> Self {
        AttrValue::Number(Decimal::from(i))
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

/// A flat map of attribute keys to typed values.
///
/// Keys are stable strings (`base_price`, `ram_capacity_gb`, `cpu.cores`).
/// Backed by a `BTreeMap` so iteration order is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttributeMap(pub BTreeMap<String, AttrValue>);

impl AttributeMap {
    pub fn new() -> Self {
        AttributeMap(BTreeMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: AttrValue) {
        self.0.insert(key.into(), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn value_equality() {
        assert_eq!(AttrValue::Number(dec("16")), AttrValue::Number(dec("16")));
        assert_ne!(AttrValue::Number(dec("16")), AttrValue::Number(dec("32")));
        assert_eq!(AttrValue::from("Dell"), AttrValue::Text("Dell".to_string()));
        assert_ne!(AttrValue::Bool(true), AttrValue::Bool(false));
    }

    #[test]
    fn no_cross_type_equality() {
        assert_ne!(AttrValue::Number(dec("1")), AttrValue::Bool(true));
        assert_ne!(AttrValue::Text("1".to_string()), AttrValue::Number(dec("1")));
    }

    #[test]
    fn type_names() {
        assert_eq!(AttrValue::Bool(true).type_name(), "bool");
        assert_eq!(AttrValue::Number(dec("1.5")).type_name(), "number");
        assert_eq!(AttrValue::from("x").type_name(), "text");
    }

    #[test]
    fn accessors() {
        assert_eq!(AttrValue::Number(dec("3.125")).as_number(), Some(dec("3.125")));
        assert_eq!(AttrValue::from("used").as_text(), Some("used"));
        assert_eq!(AttrValue::Bool(true).as_bool(), Some(true));
        assert_eq!(AttrValue::from("used").as_number(), None);
    }

    #[test]
    fn map_operations() {
        let mut attrs = AttributeMap::new();
        attrs.insert("ram_capacity_gb", AttrValue::from(16));
        assert!(attrs.contains("ram_capacity_gb"));
        assert_eq!(attrs.get("ram_capacity_gb"), Some(&AttrValue::Number(dec("16"))));
        assert_eq!(attrs.get("gpu.vram_gb"), None);
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn map_iteration_is_sorted() {
        let mut attrs = AttributeMap::new();
        attrs.insert("zeta", AttrValue::from(1));
        attrs.insert("alpha", AttrValue::from(2));
        let keys: Vec<_> = attrs.keys().cloned().collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }

    #[test]
    fn untagged_json_round_trip() {
        let json = serde_json::json!({"condition": "used", "refurbished": false, "ram": 16});
        let attrs: AttributeMap = serde_json::from_value(json).unwrap();
        assert_eq!(attrs.get("condition"), Some(&AttrValue::Text("used".to_string())));
        assert_eq!(attrs.get("refurbished"), Some(&AttrValue::Bool(false)));
        assert_eq!(attrs.get("ram"), Some(&AttrValue::Number(dec("16"))));
    }

    #[test]
    fn numbers_serialize_as_strings() {
        let v = AttrValue::Number(dec("450.00"));
        assert_eq!(serde_json::to_value(&v).unwrap(), serde_json::json!("450.00"));
    }
}
