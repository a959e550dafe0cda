//! Generic value tree exchanged with definition documents

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Number, Value as Json};
use std::collections::BTreeMap;

use crate::DocumentError;

/// An untyped document value
///
/// Maps are ordered by key so that written documents are deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Node>),
    Map(BTreeMap<String, Node>),
}

impl Node {
    /// Shape name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Map(_) => "map",
        }
    }

    /// Structural signature of a map node: its sorted, non-internal keys
    pub fn signature(&self) -> Option<String> {
        match self {
            Self::Map(map) => Some(signature_of(map.keys().map(String::as_str))),
            _ => None,
        }
    }

    /// Build a map node from `(key, value)` pairs
    pub fn map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Node)>,
        K: Into<String>,
    {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Parse a JSON document
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let value: Json =
            serde_json::from_str(json).map_err(|e| DocumentError::Json(e.to_string()))?;
        Ok(Self::from(value))
    }

    /// Write as JSON, tab-indented when `pretty`
    pub fn to_json(&self, pretty: bool) -> Result<String, DocumentError> {
        let value = Json::from(self.clone());
        if !pretty {
            return serde_json::to_string(&value).map_err(|e| DocumentError::Json(e.to_string()));
        }

        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"\t");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value
            .serialize(&mut ser)
            .map_err(|e| DocumentError::Json(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| DocumentError::Json(e.to_string()))
    }
}

/// Signature of a set of field names: sorted, de-duplicated, colon-joined,
/// with internal (`_`-prefixed) names dropped
pub fn signature_of<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    let mut names: Vec<&str> = fields.into_iter().filter(|f| !f.starts_with('_')).collect();
    names.sort_unstable();
    names.dedup();
    names.join(":")
}

impl From<Json> for Node {
    fn from(value: Json) -> Self {
        match value {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => Self::Number(n),
            Json::String(s) => Self::String(s),
            Json::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Json::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<Node> for Json {
    fn from(node: Node) -> Self {
        match node {
            Node::Null => Json::Null,
            Node::Bool(b) => Json::Bool(b),
            Node::Number(n) => Json::Number(n),
            Node::String(s) => Json::String(s),
            Node::Sequence(items) => Json::Array(items.into_iter().map(Json::from).collect()),
            Node::Map(map) => {
                Json::Object(map.into_iter().map(|(k, v)| (k, Json::from(v))).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_sorts_and_filters() {
        assert_eq!(signature_of(["type", "name", "_cache", "name"]), "name:type");
        assert_eq!(signature_of(Vec::<&str>::new()), "");

        let node = Node::map([("pk", Node::Null), ("name", Node::String("x".into()))]);
        assert_eq!(node.signature().as_deref(), Some("name:pk"));
        assert_eq!(Node::Bool(true).signature(), None);
    }

    #[test]
    fn json_conversion() {
        let node = Node::from_json(r#"{"b": [1, "two", null], "a": true}"#).unwrap();
        assert_eq!(
            node,
            Node::map([
                ("a", Node::Bool(true)),
                (
                    "b",
                    Node::Sequence(vec![
                        Node::Number(1.into()),
                        Node::String("two".into()),
                        Node::Null,
                    ])
                ),
            ])
        );
        assert_eq!(node.to_json(false).unwrap(), r#"{"a":true,"b":[1,"two",null]}"#);
    }

    #[test]
    fn pretty_json_uses_tabs() {
        let node = Node::map([("name", Node::String("shop".into()))]);
        assert_eq!(node.to_json(true).unwrap(), "{\n\t\"name\": \"shop\"\n}");
    }

    #[test]
    fn invalid_json() {
        assert!(matches!(Node::from_json("{"), Err(DocumentError::Json(_))));
    }
}
