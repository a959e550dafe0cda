//! dalgen core
//!
//! Schema data model (databases, tables, fields, keys, custom queries), the
//! enumerations persisted in definition documents, the schema-import builder
//! used by adaptors, and project configuration.
//!
//! Enumeration spellings are part of the definition file format. Never
//! rename them.

pub mod config;
pub mod import;
pub mod schema;
pub mod types;

pub use config::{Config, ConfigError, DictionaryConfig, DocumentConfig};
pub use import::{ColumnSpec, ImportError, ImportSpec, KeySpec, SchemaBuilder, TableSpec};
pub use schema::{CustomQuery, DataError, Database, Field, Key, Parameter, Table};
pub use types::{EnumDecodeError, Enumerated, FieldType, KeyType, QueryType, TransformType};

pub use dalgen_naming::{Name, NameSource, Naming, NamingError};
