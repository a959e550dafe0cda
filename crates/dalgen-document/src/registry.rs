//! Structural type registry
//!
//! Documents carry no type tags. A map node is matched to a schema type by
//! its signature, the sorted set of keys it carries. Types are registered
//! once at startup; the registry is read-only afterwards and is shared by
//! reference between serializers.

use crate::node::{signature_of, Node};
use crate::serializer::{SchemaObject, SchemaType, Serializer};
use crate::DocumentError;
use dalgen_naming::NameSource;
use std::collections::HashMap;

/// Builds a schema object from a map node
pub type Construct = fn(&Node, &Serializer, &dyn NameSource) -> Result<SchemaObject, DocumentError>;

/// How to rebuild one schema type
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    /// Type name, unique per schema type
    pub type_name: &'static str,

    /// Declared document fields
    pub fields: &'static [&'static str],

    construct: Construct,
}

impl TypeDescriptor {
    /// Descriptor for a schema type
    pub fn of<T: SchemaType>() -> Self {
        Self {
            type_name: T::TYPE_NAME,
            fields: T::FIELDS,
            construct: construct::<T>,
        }
    }

    /// Signature derived from the declared fields
    pub fn signature(&self) -> String {
        signature_of(self.fields.iter().copied())
    }

    /// Build an instance from `node`
    pub fn construct(
        &self,
        node: &Node,
        serializer: &Serializer,
        context: &dyn NameSource,
    ) -> Result<SchemaObject, DocumentError> {
        (self.construct)(node, serializer, context)
    }
}

impl std::fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

fn construct<T: SchemaType>(
    node: &Node,
    serializer: &Serializer,
    context: &dyn NameSource,
) -> Result<SchemaObject, DocumentError> {
    T::from_node(node, serializer, context).map(T::into_object)
}

/// Registration failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Two different types claim the same signature
    #[error("Signature '{signature}' is taken by {existing}, cannot register {incoming}")]
    SignatureCollision {
        signature: String,
        existing: &'static str,
        incoming: &'static str,
    },
}

/// Signature to type lookup table
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    entries: HashMap<String, TypeDescriptor>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under the signature derived from its declared fields
    pub fn register<T: SchemaType>(&mut self) -> Result<(), RegistryError> {
        let descriptor = TypeDescriptor::of::<T>();
        let signature = descriptor.signature();
        self.insert(signature, descriptor)
    }

    /// Register `T` under an explicit signature
    ///
    /// Needed when the written form of a type differs from its declared
    /// field set, e.g. when optional fields are omitted on some branches.
    pub fn register_with_signature<T: SchemaType>(
        &mut self,
        signature: &str,
    ) -> Result<(), RegistryError> {
        let signature = signature_of(signature.split(':').filter(|s| !s.is_empty()));
        self.insert(signature, TypeDescriptor::of::<T>())
    }

    /// Insert a descriptor; re-registering the same type is a no-op, a
    /// different type on a taken signature is rejected
    fn insert(
        &mut self,
        signature: String,
        descriptor: TypeDescriptor,
    ) -> Result<(), RegistryError> {
        if let Some(existing) = self.entries.get(&signature) {
            if existing.type_name != descriptor.type_name {
                return Err(RegistryError::SignatureCollision {
                    signature,
                    existing: existing.type_name,
                    incoming: descriptor.type_name,
                });
            }
        }

        tracing::debug!(%signature, type_name = descriptor.type_name, "registered type");
        self.entries.insert(signature, descriptor);
        Ok(())
    }

    /// Exact signature lookup
    pub fn resolve(&self, signature: &str) -> Option<&TypeDescriptor> {
        self.entries.get(signature)
    }

    /// Lookup by a set of field names
    pub fn resolve_fields<'a>(
        &self,
        fields: impl IntoIterator<Item = &'a str>,
    ) -> Option<&TypeDescriptor> {
        self.resolve(&signature_of(fields))
    }

    /// Registered signatures, sorted
    pub fn signatures(&self) -> Vec<&str> {
        let mut signatures: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        signatures.sort_unstable();
        signatures
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
