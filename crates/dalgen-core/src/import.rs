//! Building schema entities from raw catalog data
//!
//! Adaptors read identifiers and type names as plain strings, either from a
//! live database catalog or from a hand-written definition file. The
//! [`SchemaBuilder`] turns those strings into the typed model, naming every
//! identifier through a [`NameSource`] and decoding every type string through
//! the enumeration tables.

use crate::schema::{DataError, Database, Field, Key, Table};
use crate::types::{EnumDecodeError, Enumerated, FieldType, KeyType};
use dalgen_naming::{NameSource, NamingError};
use serde::{Deserialize, Serialize};

/// Raw description of a whole database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSpec {
    /// Database name
    pub database: String,

    /// Table descriptions
    #[serde(default)]
    pub tables: Vec<TableSpec>,
}

impl ImportSpec {
    /// Parse an import spec from TOML
    pub fn from_toml(toml: &str) -> Result<Self, ImportError> {
        toml::from_str(toml).map_err(|e| ImportError::Parse(e.to_string()))
    }
}

/// Raw description of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    pub name: String,

    #[serde(default)]
    pub columns: Vec<ColumnSpec>,

    #[serde(default)]
    pub keys: Vec<KeySpec>,
}

/// Raw description of a column as a catalog reports it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,

    /// Catalog type name (`varchar`, `bigint`, ...)
    pub data_type: String,

    #[serde(default)]
    pub size: u32,

    #[serde(default)]
    pub scale: u32,

    #[serde(default = "default_nullable")]
    pub nullable: bool,

    #[serde(default)]
    pub auto_increment: bool,

    #[serde(default)]
    pub default: Option<String>,
}

fn default_nullable() -> bool {
    true
}

/// Raw description of a key or constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeySpec {
    pub name: String,

    /// Catalog key kind (`primary key`, `index`, `foreign key`, ...)
    pub key_type: String,

    #[serde(default)]
    pub fields: Vec<String>,

    /// Referenced table, for foreign keys and lookups
    #[serde(default)]
    pub primary_table: Option<String>,

    #[serde(default)]
    pub primary_fields: Vec<String>,
}

/// Failures while importing a schema
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Naming(#[from] NamingError),

    #[error(transparent)]
    Enum(#[from] EnumDecodeError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Builds schema entities from raw strings
pub struct SchemaBuilder<'a, N: NameSource + ?Sized> {
    naming: &'a N,
}

impl<'a, N: NameSource + ?Sized> SchemaBuilder<'a, N> {
    pub fn new(naming: &'a N) -> Self {
        Self { naming }
    }

    /// Build a field from a column description
    pub fn field(&self, spec: &ColumnSpec) -> Result<Field, ImportError> {
        let mut field = Field::new(
            self.naming.string_to_name(&spec.name)?,
            FieldType::parse(&spec.data_type)?,
        )
        .with_size(spec.size, spec.scale)
        .with_auto_increment(spec.auto_increment)
        .with_required(!spec.nullable);
        field.default = spec.default.clone();
        Ok(field)
    }

    /// Build a key owned by `table`
    ///
    /// Every covered field must exist in the table. Reference keys record the
    /// owning table as their `referenced_table`.
    pub fn key(&self, table: &Table, spec: &KeySpec) -> Result<Key, ImportError> {
        for field in &spec.fields {
            table.find_field(field)?;
        }

        let key_type = KeyType::parse(&spec.key_type)?;
        let mut key = Key::new(self.naming.string_to_name(&spec.name)?, key_type)
            .with_fields(spec.fields.iter().cloned());

        if key_type.is_reference() {
            key = key
                .with_primary(
                    spec.primary_table.clone().unwrap_or_default(),
                    spec.primary_fields.iter().cloned(),
                )
                .with_referenced_table(table.name.raw());
        }

        Ok(key)
    }

    /// Build a table with its fields and keys
    pub fn table(&self, spec: &TableSpec) -> Result<Table, ImportError> {
        let mut table = Table::new(self.naming.string_to_name(&spec.name)?);

        for column in &spec.columns {
            table.fields.push(self.field(column)?);
        }

        for key_spec in &spec.keys {
            let key = self.key(&table, key_spec)?;
            if key.key_type == KeyType::PrimaryKey {
                if table.pk.is_some() {
                    return Err(DataError::DuplicatePrimaryKey {
                        table: spec.name.clone(),
                    }
                    .into());
                }
                table.pk = Some(key);
            } else {
                table.keys.push(key);
            }
        }

        tracing::debug!(
            table = %spec.name,
            fields = table.fields.len(),
            keys = table.keys.len(),
            "imported table"
        );
        Ok(table)
    }

    /// Build a whole database
    pub fn database(&self, spec: &ImportSpec) -> Result<Database, ImportError> {
        let mut database = Database::new(self.naming.string_to_name(&spec.database)?);
        for table in &spec.tables {
            database.tables.push(self.table(table)?);
        }
        Ok(database)
    }
}
