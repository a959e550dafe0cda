//! Generic graph serializer / deserializer
//!
//! Values are rendered to [`Node`] trees through [`ToNode`] and rebuilt
//! through [`FromNode`]. A map node read without an expected type is
//! resolved through the [`TypeRegistry`] by its key set.

use crate::node::Node;
use crate::registry::{RegistryError, TypeDescriptor, TypeRegistry};
use crate::DocumentError;
use dalgen_core::{
    CustomQuery, Database, Enumerated, Field, FieldType, Key, KeyType, Parameter, QueryType, Table,
    TransformType,
};
use dalgen_naming::{Name, NameSource};
use serde_json::Number;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Rendering to a node
pub trait ToNode {
    fn to_node(&self, serializer: &Serializer) -> Node;
}

/// Rebuilding from a node
///
/// `context` turns raw identifier strings back into [`Name`]s.
pub trait FromNode: Sized {
    fn from_node(
        node: &Node,
        serializer: &Serializer,
        context: &dyn NameSource,
    ) -> Result<Self, DocumentError>;
}

/// A composite type that can be resolved by signature
pub trait SchemaType: ToNode + FromNode + 'static {
    const TYPE_NAME: &'static str;

    /// Field names the type declares in documents
    const FIELDS: &'static [&'static str];

    /// Written fields and their rendered values, a subset of [`Self::FIELDS`]
    fn field_nodes(&self, serializer: &Serializer) -> Vec<(&'static str, Node)>;

    fn into_object(self) -> SchemaObject;

    /// Take the value back out, or hand the object back if it is another type
    fn from_object(object: SchemaObject) -> Result<Self, SchemaObject>;
}

/// Any schema entity a document can contain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaObject {
    Database(Database),
    Table(Table),
    Field(Field),
    Key(Key),
    Parameter(Parameter),
    CustomQuery(CustomQuery),
}

impl SchemaObject {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Database(_) => Database::TYPE_NAME,
            Self::Table(_) => Table::TYPE_NAME,
            Self::Field(_) => Field::TYPE_NAME,
            Self::Key(_) => Key::TYPE_NAME,
            Self::Parameter(_) => Parameter::TYPE_NAME,
            Self::CustomQuery(_) => CustomQuery::TYPE_NAME,
        }
    }
}

impl ToNode for SchemaObject {
    fn to_node(&self, serializer: &Serializer) -> Node {
        match self {
            Self::Database(v) => v.to_node(serializer),
            Self::Table(v) => v.to_node(serializer),
            Self::Field(v) => v.to_node(serializer),
            Self::Key(v) => v.to_node(serializer),
            Self::Parameter(v) => v.to_node(serializer),
            Self::CustomQuery(v) => v.to_node(serializer),
        }
    }
}

/// Result of deserializing without an expected type
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Value>),
    Object(SchemaObject),
}

impl Value {
    /// The schema object, if this value is one
    pub fn into_object(self) -> Option<SchemaObject> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }
}

/// Walks object graphs to and from [`Node`] trees
#[derive(Debug, Clone)]
pub struct Serializer {
    registry: Arc<TypeRegistry>,
}

impl Serializer {
    /// Create a serializer over a fully built registry
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    /// Serializer for the schema entities
    pub fn for_schema() -> Result<Self, RegistryError> {
        Ok(Self::new(Arc::new(TypeRegistry::with_schema_types()?)))
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Render a value
    pub fn serialize<T: ToNode + ?Sized>(&self, value: &T) -> Node {
        value.to_node(self)
    }

    /// Rebuild a value of a known type
    pub fn deserialize_as<T: FromNode>(
        &self,
        node: &Node,
        context: &dyn NameSource,
    ) -> Result<T, DocumentError> {
        T::from_node(node, self, context)
    }

    /// Rebuild a value of unknown type
    ///
    /// Scalars pass through, sequences are rebuilt element-wise and maps are
    /// resolved through the registry.
    pub fn deserialize(
        &self,
        node: &Node,
        context: &dyn NameSource,
    ) -> Result<Value, DocumentError> {
        match node {
            Node::Null => Ok(Value::Null),
            Node::Bool(b) => Ok(Value::Bool(*b)),
            Node::Number(n) => Ok(Value::Number(n.clone())),
            Node::String(s) => Ok(Value::String(s.clone())),
            Node::Sequence(items) => items
                .iter()
                .map(|item| self.deserialize(item, context))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Sequence),
            Node::Map(_) => self
                .resolve(node)?
                .construct(node, self, context)
                .map(Value::Object),
        }
    }

    /// Resolve a map node through the registry and require type `T`
    pub fn deserialize_object<T: SchemaType>(
        &self,
        node: &Node,
        context: &dyn NameSource,
    ) -> Result<T, DocumentError> {
        let object = self.resolve(node)?.construct(node, self, context)?;
        T::from_object(object).map_err(|other| DocumentError::UnexpectedType {
            expected: T::TYPE_NAME,
            found: other.type_name(),
        })
    }

    /// Find the registered type matching a map node's key set
    pub fn resolve(&self, node: &Node) -> Result<&TypeDescriptor, DocumentError> {
        let signature = node
            .signature()
            .ok_or_else(|| DocumentError::shape("map", node))?;

        match self.registry.resolve(&signature) {
            Some(descriptor) => {
                tracing::debug!(%signature, type_name = descriptor.type_name, "resolved signature");
                Ok(descriptor)
            }
            None => Err(DocumentError::UnresolvedSignature { signature }),
        }
    }
}

/// Field access on a map node, for [`FromNode`] implementations
pub struct MapReader<'a> {
    type_name: &'static str,
    map: &'a BTreeMap<String, Node>,
    serializer: &'a Serializer,
    context: &'a dyn NameSource,
}

impl<'a> MapReader<'a> {
    /// Wrap `node`, which must be a map
    pub fn new(
        type_name: &'static str,
        node: &'a Node,
        serializer: &'a Serializer,
        context: &'a dyn NameSource,
    ) -> Result<Self, DocumentError> {
        match node {
            Node::Map(map) => Ok(Self {
                type_name,
                map,
                serializer,
                context,
            }),
            other => Err(DocumentError::shape("map", other).at(type_name.to_string())),
        }
    }

    /// A required field
    pub fn get(&self, field: &'static str) -> Result<&'a Node, DocumentError> {
        self.map.get(field).ok_or(DocumentError::MissingField {
            type_name: self.type_name,
            field,
        })
    }

    /// A field that may be absent or null
    pub fn optional(&self, field: &'static str) -> Option<&'a Node> {
        self.map.get(field).filter(|node| !node.is_null())
    }

    /// A required field of a known type
    pub fn value<T: FromNode>(&self, field: &'static str) -> Result<T, DocumentError> {
        T::from_node(self.get(field)?, self.serializer, self.context)
            .map_err(|e| e.at(self.location(field)))
    }

    /// A field of a known type, defaulted when absent or null
    pub fn value_or_default<T: FromNode + Default>(
        &self,
        field: &'static str,
    ) -> Result<T, DocumentError> {
        match self.optional(field) {
            Some(node) => T::from_node(node, self.serializer, self.context)
                .map_err(|e| e.at(self.location(field))),
            None => Ok(T::default()),
        }
    }

    /// A schema object resolved by signature, `None` when absent or null
    pub fn optional_object<T: SchemaType>(
        &self,
        field: &'static str,
    ) -> Result<Option<T>, DocumentError> {
        match self.optional(field) {
            Some(node) => self
                .serializer
                .deserialize_object(node, self.context)
                .map(Some)
                .map_err(|e| e.at(self.location(field))),
            None => Ok(None),
        }
    }

    /// A sequence of schema objects, each resolved by signature
    pub fn objects<T: SchemaType>(&self, field: &'static str) -> Result<Vec<T>, DocumentError> {
        match self.get(field)? {
            Node::Sequence(items) => items
                .iter()
                .map(|item| self.serializer.deserialize_object(item, self.context))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| e.at(self.location(field))),
            other => Err(DocumentError::shape("sequence", other).at(self.location(field))),
        }
    }

    fn location(&self, field: &str) -> String {
        format!("{}.{}", self.type_name, field)
    }
}

impl ToNode for str {
    fn to_node(&self, _serializer: &Serializer) -> Node {
        Node::String(self.to_string())
    }
}

impl ToNode for String {
    fn to_node(&self, _serializer: &Serializer) -> Node {
        Node::String(self.clone())
    }
}

impl FromNode for String {
    fn from_node(node: &Node, _: &Serializer, _: &dyn NameSource) -> Result<Self, DocumentError> {
        match node {
            Node::String(s) => Ok(s.clone()),
            other => Err(DocumentError::shape("string", other)),
        }
    }
}

impl ToNode for bool {
    fn to_node(&self, _serializer: &Serializer) -> Node {
        Node::Bool(*self)
    }
}

impl FromNode for bool {
    fn from_node(node: &Node, _: &Serializer, _: &dyn NameSource) -> Result<Self, DocumentError> {
        match node {
            Node::Bool(b) => Ok(*b),
            other => Err(DocumentError::shape("bool", other)),
        }
    }
}

impl ToNode for u32 {
    fn to_node(&self, _serializer: &Serializer) -> Node {
        Node::Number(Number::from(*self))
    }
}

/// Integral floats such as `4.0` are accepted
impl FromNode for u32 {
    fn from_node(node: &Node, _: &Serializer, _: &dyn NameSource) -> Result<Self, DocumentError> {
        let Node::Number(n) = node else {
            return Err(DocumentError::shape("unsigned integer", node));
        };

        let integral = n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                .map(|f| f as u64)
        });

        match integral {
            Some(v) => u32::try_from(v)
                .map_err(|_| DocumentError::mismatch("unsigned integer", "out of range number")),
            None if n.as_f64().is_some_and(|f| f < 0.0) => {
                Err(DocumentError::mismatch("unsigned integer", "negative number"))
            }
            None => Err(DocumentError::mismatch("unsigned integer", "non-integer number")),
        }
    }
}

/// Names are written as their raw identifier
impl ToNode for Name {
    fn to_node(&self, _serializer: &Serializer) -> Node {
        Node::String(self.raw().to_string())
    }
}

impl FromNode for Name {
    fn from_node(
        node: &Node,
        _: &Serializer,
        context: &dyn NameSource,
    ) -> Result<Self, DocumentError> {
        match node {
            Node::String(raw) => Ok(context.string_to_name(raw)?),
            other => Err(DocumentError::shape("string", other)),
        }
    }
}

impl<T: ToNode> ToNode for Option<T> {
    fn to_node(&self, serializer: &Serializer) -> Node {
        match self {
            Some(value) => value.to_node(serializer),
            None => Node::Null,
        }
    }
}

impl<T: FromNode> FromNode for Option<T> {
    fn from_node(
        node: &Node,
        serializer: &Serializer,
        context: &dyn NameSource,
    ) -> Result<Self, DocumentError> {
        match node {
            Node::Null => Ok(None),
            other => T::from_node(other, serializer, context).map(Some),
        }
    }
}

impl<T: ToNode> ToNode for [T] {
    fn to_node(&self, serializer: &Serializer) -> Node {
        Node::Sequence(self.iter().map(|item| item.to_node(serializer)).collect())
    }
}

impl<T: ToNode> ToNode for Vec<T> {
    fn to_node(&self, serializer: &Serializer) -> Node {
        self.as_slice().to_node(serializer)
    }
}

impl<T: FromNode> FromNode for Vec<T> {
    fn from_node(
        node: &Node,
        serializer: &Serializer,
        context: &dyn NameSource,
    ) -> Result<Self, DocumentError> {
        match node {
            Node::Sequence(items) => items
                .iter()
                .map(|item| T::from_node(item, serializer, context))
                .collect(),
            other => Err(DocumentError::shape("sequence", other)),
        }
    }
}

macro_rules! enumerated_node {
    ($($ty:ty),+) => {
        $(
            impl ToNode for $ty {
                fn to_node(&self, _serializer: &Serializer) -> Node {
                    Node::String(self.as_str().to_string())
                }
            }

            impl FromNode for $ty {
                fn from_node(
                    node: &Node,
                    _: &Serializer,
                    _: &dyn NameSource,
                ) -> Result<Self, DocumentError> {
                    match node {
                        Node::String(s) => Ok(<$ty as Enumerated>::parse(s)?),
                        other => Err(DocumentError::shape("string", other)),
                    }
                }
            }
        )+
    };
}

enumerated_node!(FieldType, KeyType, TransformType, QueryType);
