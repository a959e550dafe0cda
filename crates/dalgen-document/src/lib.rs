//! dalgen definition documents
//!
//! Persists and reconstructs the schema object graph as JSON. Documents
//! carry no type tags: every object is a plain map and its type is inferred
//! from the set of keys it carries (its signature).
//!
//! ## Architecture
//!
//! - **Node**: generic value tree, the in-memory form of a JSON document
//! - **TypeRegistry**: signature to type lookup, built once at startup
//! - **Serializer**: walks entities to and from nodes
//! - **Document**: definition file I/O on top of the serializer
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dalgen_document::Document;
//!
//! let document = Document::for_schema()?;
//! let database = document.load(Path::new("shop.json"), &naming)?;
//! document.save(Path::new("shop.json"), &database, true)?;
//! ```

pub mod document;
pub mod entities;
pub mod node;
pub mod registry;
pub mod serializer;

pub use document::Document;
pub use entities::KEY_WITHOUT_REFERENCE;
pub use node::{signature_of, Node};
pub use registry::{RegistryError, TypeDescriptor, TypeRegistry};
pub use serializer::{FromNode, MapReader, SchemaObject, SchemaType, Serializer, ToNode, Value};

use dalgen_core::EnumDecodeError;
use dalgen_naming::NamingError;

/// Errors raised while reading or writing documents
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// No registered type carries exactly this key set
    #[error("No registered type matches signature '{signature}'")]
    UnresolvedSignature { signature: String },

    /// A node has the wrong shape, e.g. a scalar where a map was required
    #[error("Expected {expected} at {path}, found {found}")]
    ShapeMismatch {
        expected: &'static str,
        found: &'static str,
        path: String,
    },

    #[error("Missing field '{field}' for {type_name}")]
    MissingField {
        type_name: &'static str,
        field: &'static str,
    },

    /// A node resolved to a different type than the one required
    #[error("Expected a {expected}, found a {found}")]
    UnexpectedType {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Enum(#[from] EnumDecodeError),

    #[error(transparent)]
    Naming(#[from] NamingError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("IO error on {path}: {message}")]
    Io { path: String, message: String },
}

/// Path used for shape errors not yet attributed to a field
const ROOT_PATH: &str = "$";

impl DocumentError {
    /// Shape mismatch for `node`
    pub fn shape(expected: &'static str, node: &Node) -> Self {
        Self::mismatch(expected, node.kind())
    }

    /// Shape mismatch with a free-form description of what was found
    pub fn mismatch(expected: &'static str, found: &'static str) -> Self {
        Self::ShapeMismatch {
            expected,
            found,
            path: ROOT_PATH.to_string(),
        }
    }

    /// Attribute an unattributed shape mismatch to `location`
    pub fn at(self, location: String) -> Self {
        match self {
            Self::ShapeMismatch {
                expected,
                found,
                path,
            } if path == ROOT_PATH => Self::ShapeMismatch {
                expected,
                found,
                path: location,
            },
            other => other,
        }
    }

    /// True for the errors that mean "this document does not describe a
    /// schema"
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedSignature { .. }
                | Self::ShapeMismatch { .. }
                | Self::MissingField { .. }
                | Self::UnexpectedType { .. }
        )
    }
}
