//! Schema data model
//!
//! A [`Database`] owns its [`Table`]s, a table owns its [`Field`]s, [`Key`]s
//! and [`CustomQuery`]s. Keys refer to other tables and fields by raw name
//! only; references are resolved by lookup.

use crate::types::{Enumerated, FieldType, KeyType, QueryType, TransformType};
use dalgen_naming::Name;
use std::fmt;

/// A column of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: Name,
    pub field_type: FieldType,
    pub size: u32,
    pub scale: u32,
    pub auto_increment: bool,
    pub default: Option<String>,
    pub required: bool,
}

impl Field {
    /// Create a nullable field with no size
    pub fn new(name: Name, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            size: 0,
            scale: 0,
            auto_increment: false,
            default: None,
            required: false,
        }
    }

    /// Set size and scale
    pub fn with_size(mut self, size: u32, scale: u32) -> Self {
        self.size = size;
        self.scale = scale;
        self
    }

    /// Mark as auto increment
    pub fn with_auto_increment(mut self, auto_increment: bool) -> Self {
        self.auto_increment = auto_increment;
        self
    }

    /// Set the default value expression
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Mark as NOT NULL
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({},{}) ", self.name, self.field_type, self.size, self.scale)?;
        if self.auto_increment {
            write!(f, "AUTOINC ")?;
        }
        if let Some(default) = &self.default {
            write!(f, "DEFAULT {} ", default)?;
        }
        write!(f, "{}", if self.required { "NOT NULL" } else { "NULL" })
    }
}

/// A primary key, index, unique constraint or reference to another table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub name: Name,

    /// Raw names of the fields covered by the key
    pub fields: Vec<String>,

    pub key_type: KeyType,

    /// Raw name of the table holding the referenced primary key
    pub primary_table: String,

    /// Raw names of the referenced fields in `primary_table`
    pub primary_fields: Vec<String>,

    pub referenced_table: String,
}

impl Key {
    pub fn new(name: Name, key_type: KeyType) -> Self {
        Self {
            name,
            fields: Vec::new(),
            key_type,
            primary_table: String::new(),
            primary_fields: Vec::new(),
            referenced_table: String::new(),
        }
    }

    /// Set the covered fields
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Point the key at `primary_fields` of `primary_table`
    ///
    /// Only foreign keys and lookups carry a reference; other key types
    /// are returned unchanged.
    pub fn with_primary<I, S>(mut self, primary_table: impl Into<String>, primary_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !self.key_type.is_reference() {
            return self;
        }
        self.primary_table = primary_table.into();
        self.primary_fields = primary_fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_referenced_table(mut self, referenced_table: impl Into<String>) -> Self {
        self.referenced_table = referenced_table.into();
        self
    }

    /// The table this key depends on, for foreign keys and lookups
    pub fn dependency(&self) -> Option<&str> {
        if self.key_type.is_reference() && !self.primary_table.is_empty() {
            Some(&self.primary_table)
        } else {
            None
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.key_type.as_str(), self.fields.join(","))?;
        if let Some(primary) = self.dependency() {
            write!(f, " -> {}({})", primary, self.primary_fields.join(","))?;
        }
        Ok(())
    }
}

/// A typed parameter of a custom query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: Name,
    pub param_type: FieldType,
}

impl Parameter {
    pub fn new(name: Name, param_type: FieldType) -> Self {
        Self { name, param_type }
    }
}

/// A hand-written query attached to a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomQuery {
    pub name: Name,
    pub parameters: Vec<Parameter>,
    pub return_type: FieldType,
    pub transform: TransformType,
    pub query_type: QueryType,
    pub query: String,
}

impl CustomQuery {
    pub fn new(name: Name, query_type: QueryType, query: impl Into<String>) -> Self {
        Self {
            name,
            parameters: Vec::new(),
            return_type: FieldType::Undefined,
            transform: TransformType::Undefined,
            query_type,
            query: query.into(),
        }
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_return_type(mut self, return_type: FieldType) -> Self {
        self.return_type = return_type;
        self
    }

    pub fn with_transform(mut self, transform: TransformType) -> Self {
        self.transform = transform;
        self
    }
}

impl fmt::Display for CustomQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A table and everything it owns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: Name,
    pub fields: Vec<Field>,
    pub pk: Option<Key>,
    pub keys: Vec<Key>,
    pub custom_queries: Vec<CustomQuery>,
}

impl Table {
    /// Create an empty table
    pub fn new(name: Name) -> Self {
        Self {
            name,
            fields: Vec::new(),
            pk: None,
            keys: Vec::new(),
            custom_queries: Vec::new(),
        }
    }

    /// Find a field by raw name, ignoring case
    pub fn find_field(&self, name: &str) -> Result<&Field, DataError> {
        self.fields
            .iter()
            .find(|f| f.name.raw().eq_ignore_ascii_case(name))
            .ok_or_else(|| DataError::FieldNotFound {
                table: self.name.raw().to_string(),
                field: name.to_string(),
            })
    }

    /// Raw names of the tables this table references, in key order
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().filter_map(Key::dependency)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The root of a schema definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    pub name: Name,
    pub tables: Vec<Table>,
}

impl Database {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            tables: Vec::new(),
        }
    }

    /// Find a table by exact raw name
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name.raw() == name)
    }

    /// Tables ordered so that referenced tables come before the tables
    /// referencing them
    ///
    /// Declaration order is kept where no reference forces a change. Self
    /// references, references to unknown tables and cycles are ignored.
    pub fn ordered_tables(&self) -> Vec<&Table> {
        let mut ordered = Vec::with_capacity(self.tables.len());
        let mut placed = vec![false; self.tables.len()];
        let mut visiting = vec![false; self.tables.len()];

        for index in 0..self.tables.len() {
            self.place(index, &mut ordered, &mut placed, &mut visiting);
        }

        ordered
    }

    fn place<'a>(
        &'a self,
        index: usize,
        ordered: &mut Vec<&'a Table>,
        placed: &mut [bool],
        visiting: &mut [bool],
    ) {
        if placed[index] || visiting[index] {
            return;
        }
        visiting[index] = true;

        let table = &self.tables[index];
        for dependency in table.dependencies() {
            if dependency == table.name.raw() {
                continue;
            }
            // Duplicate names resolve to the first declaration
            if let Some(parent) = self.tables.iter().position(|t| t.name.raw() == dependency) {
                self.place(parent, ordered, placed, visiting);
            }
        }

        visiting[index] = false;
        placed[index] = true;
        ordered.push(table);
    }
}

/// Lookup failures on the schema model
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
    #[error("Could not find field '{field}' in table '{table}'")]
    FieldNotFound { table: String, field: String },

    #[error("Table '{table}' declares more than one primary key")]
    DuplicatePrimaryKey { table: String },
}
