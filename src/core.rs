//! # Core

use serde::{Deserialize, Serialize};

/// `Kind` allows serde to serialize/deserialize a string or an object.
///
/// Used for verification relationships, where an entry is either a reference
/// to a verification method by id or an embedded verification method.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Kind<T> {
    /// Simple string value
    String(String),

    /// Complex object value
    Object(T),
}

impl<T> Kind<T> {
    /// Returns `true` if the `Kind` is a string.
    pub const fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Returns `true` if the `Kind` is an object.
    pub const fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// The string value, if any.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Object(_) => None,
        }
    }

    /// The object value, if any.
    pub const fn as_object(&self) -> Option<&T> {
        match self {
            Self::String(_) => None,
            Self::Object(o) => Some(o),
        }
    }
}

impl<T> From<String> for Kind<T> {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

#[cfg(test)]
mod test {
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn mixed_list() {
        let list: Vec<Kind<Value>> = vec![
            Kind::from("did:mailio:0x01#master".to_string()),
            Kind::Object(json!({"type": "JsonWebKey2020"})),
        ];
        let ser = serde_json::to_value(&list).expect("should serialize");
        assert_eq!(ser, json!(["did:mailio:0x01#master", {"type": "JsonWebKey2020"}]));

        let de: Vec<Kind<Value>> = serde_json::from_value(ser).expect("should deserialize");
        assert!(de[0].is_string());
        assert_eq!(de[0].as_string(), Some("did:mailio:0x01#master"));
        assert!(de[1].is_object());
        assert_eq!(de[1].as_object(), Some(&json!({"type": "JsonWebKey2020"})));
    }
}
