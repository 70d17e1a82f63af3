//! Decoded value tree.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered name-to-value map produced for one record or group.
pub type FieldMap = IndexMap<String, Value>;

/// A decoded value: text, a nested map, or an ordered list of either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Decoded field text.
    Text(String),
    /// Repeated values of one name.
    List(Vec<Value>),
    /// Nested group.
    Map(FieldMap),
}

impl Value {
    /// Returns the text of a [`Value::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the entries of a [`Value::Map`].
    pub fn as_map(&self) -> Option<&FieldMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the items of a [`Value::List`].
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<FieldMap> for Value {
    fn from(map: FieldMap) -> Self {
        Value::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_in_insertion_order() {
        let mut inner = FieldMap::new();
        inner.insert("Z".into(), "1".into());
        inner.insert("A".into(), "2".into());

        let mut map = FieldMap::new();
        map.insert("GROUP".into(), inner.into());
        map.insert("ITEMS".into(), Value::List(vec!["x".into(), "y".into()]));

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"GROUP":{"Z":"1","A":"2"},"ITEMS":["x","y"]}"#);
    }

    #[test]
    fn test_accessors() {
        let value = Value::from("abc");
        assert_eq!(value.as_text(), Some("abc"));
        assert!(value.as_map().is_none());
        assert!(Value::List(Vec::new()).as_list().unwrap().is_empty());
    }
}
