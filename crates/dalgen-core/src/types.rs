//! Enumerations persisted in definition documents
//!
//! Each enumeration has one canonical spelling per variant (used when
//! writing) and a lenient, case-insensitive parser that also accepts the
//! aliases database catalogs report (`varchar`, `bigint`, `primary key`, ...).

use std::fmt;
use std::str::FromStr;

/// An unrecognized enumeration string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} '{value}'")]
pub struct EnumDecodeError {
    /// Enumeration being decoded (e.g. "field type")
    pub kind: &'static str,

    /// The rejected input
    pub value: String,
}

impl EnumDecodeError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// An enumeration with a declared string table
pub trait Enumerated: Sized + Copy + 'static {
    /// Human readable enumeration name, used in errors
    const KIND: &'static str;

    /// Canonical spelling
    fn as_str(&self) -> &'static str;

    /// Decode from any accepted spelling
    fn parse(value: &str) -> Result<Self, EnumDecodeError>;
}

/// Logical type of a field or query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldType {
    #[default]
    Undefined,
    Integer,
    String,
    Float,
    Decimal,
    Datetime,
    Boolean,

    /// A single generated entity
    Item,

    /// A list of generated entities
    ListOfItem,
}

impl Enumerated for FieldType {
    const KIND: &'static str = "field type";

    fn as_str(&self) -> &'static str {
        match self {
            Self::Undefined => "None",
            Self::Integer => "Integer",
            Self::String => "String",
            Self::Float => "Float",
            Self::Decimal => "Decimal",
            Self::Datetime => "Datetime",
            Self::Boolean => "Boolean",
            Self::Item => "__Item__",
            Self::ListOfItem => "[__Item__]",
        }
    }

    fn parse(value: &str) -> Result<Self, EnumDecodeError> {
        match value.to_lowercase().as_str() {
            "integer" | "int" | "bigint" | "tinyint" => Ok(Self::Integer),
            "string" | "varchar" | "char" | "text" => Ok(Self::String),
            "float" | "real" => Ok(Self::Float),
            "datetime" | "date" => Ok(Self::Datetime),
            "boolean" | "bool" => Ok(Self::Boolean),
            "decimal" | "money" => Ok(Self::Decimal),
            "__item__" => Ok(Self::Item),
            "[__item__]" => Ok(Self::ListOfItem),
            "none" => Ok(Self::Undefined),
            _ => Err(EnumDecodeError::new(Self::KIND, value)),
        }
    }
}

/// Kind of a table key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyType {
    #[default]
    Undefined,
    PrimaryKey,
    Index,
    Unique,
    ForeignKey,
    Lookup,
}

impl KeyType {
    /// Keys that point at another table through `primary_table`
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::ForeignKey | Self::Lookup)
    }
}

impl Enumerated for KeyType {
    const KIND: &'static str = "key type";

    fn as_str(&self) -> &'static str {
        match self {
            Self::Undefined => "Undefined",
            Self::PrimaryKey => "PrimaryKey",
            Self::Index => "Index",
            Self::Unique => "Unique",
            Self::ForeignKey => "ForeignKey",
            Self::Lookup => "Lookup",
        }
    }

    fn parse(value: &str) -> Result<Self, EnumDecodeError> {
        match value.to_lowercase().as_str() {
            "undefined" => Ok(Self::Undefined),
            "primarykey" | "primary key" => Ok(Self::PrimaryKey),
            "index" => Ok(Self::Index),
            "unique" => Ok(Self::Unique),
            "foreignkey" | "foreign key" => Ok(Self::ForeignKey),
            "lookup" => Ok(Self::Lookup),
            _ => Err(EnumDecodeError::new(Self::KIND, value)),
        }
    }
}

/// Post-processing applied to a custom query result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransformType {
    #[default]
    Undefined,
    Map,
    IntToBool,
}

impl Enumerated for TransformType {
    const KIND: &'static str = "transform type";

    fn as_str(&self) -> &'static str {
        match self {
            Self::Undefined => "Undefined",
            Self::Map => "Map",
            Self::IntToBool => "IntToBool",
        }
    }

    fn parse(value: &str) -> Result<Self, EnumDecodeError> {
        match value.to_lowercase().as_str() {
            "undefined" | "none" => Ok(Self::Undefined),
            "map" => Ok(Self::Map),
            "inttobool" => Ok(Self::IntToBool),
            _ => Err(EnumDecodeError::new(Self::KIND, value)),
        }
    }
}

/// How a custom query is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueryType {
    #[default]
    Undefined,
    FetchScalar,
    FetchOne,
    FetchAll,
    Execute,
}

impl Enumerated for QueryType {
    const KIND: &'static str = "query type";

    fn as_str(&self) -> &'static str {
        match self {
            Self::Undefined => "Undefined",
            Self::FetchScalar => "FetchScalar",
            Self::FetchOne => "FetchOne",
            Self::FetchAll => "FetchAll",
            Self::Execute => "Execute",
        }
    }

    fn parse(value: &str) -> Result<Self, EnumDecodeError> {
        match value.to_lowercase().as_str() {
            "undefined" => Ok(Self::Undefined),
            "fetchscalar" => Ok(Self::FetchScalar),
            "fetchone" => Ok(Self::FetchOne),
            "fetchall" => Ok(Self::FetchAll),
            "execute" => Ok(Self::Execute),
            _ => Err(EnumDecodeError::new(Self::KIND, value)),
        }
    }
}

macro_rules! string_table {
    ($($ty:ty),+) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl FromStr for $ty {
                type Err = EnumDecodeError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    <$ty as Enumerated>::parse(s)
                }
            }
        )+
    };
}

string_table!(FieldType, KeyType, TransformType, QueryType);
