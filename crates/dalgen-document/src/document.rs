//! Definition file I/O

use crate::node::Node;
use crate::serializer::Serializer;
use crate::DocumentError;
use dalgen_core::Database;
use dalgen_naming::NameSource;
use std::path::Path;

/// Reads and writes definition documents
#[derive(Debug, Clone)]
pub struct Document {
    serializer: Serializer,
}

impl Document {
    pub fn new(serializer: Serializer) -> Self {
        Self { serializer }
    }

    /// Document handler over the schema registry
    pub fn for_schema() -> Result<Self, DocumentError> {
        Ok(Self::new(Serializer::for_schema()?))
    }

    pub fn serializer(&self) -> &Serializer {
        &self.serializer
    }

    /// Parse a definition; the root must resolve to a [`Database`]
    pub fn from_json(
        &self,
        json: &str,
        context: &dyn NameSource,
    ) -> Result<Database, DocumentError> {
        let node = Node::from_json(json)?;
        self.serializer.deserialize_object(&node, context)
    }

    /// Load a definition file
    pub fn load(&self, path: &Path, context: &dyn NameSource) -> Result<Database, DocumentError> {
        let json = std::fs::read_to_string(path).map_err(|e| DocumentError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let database = self.from_json(&json, context)?;
        tracing::info!(
            path = %path.display(),
            database = %database.name,
            tables = database.tables.len(),
            "loaded definition"
        );
        Ok(database)
    }

    /// Render a definition as JSON
    pub fn to_json(&self, database: &Database, pretty: bool) -> Result<String, DocumentError> {
        self.serializer.serialize(database).to_json(pretty)
    }

    /// Write a definition file
    ///
    /// The document is rendered completely before the file is touched.
    pub fn save(
        &self,
        path: &Path,
        database: &Database,
        pretty: bool,
    ) -> Result<(), DocumentError> {
        let json = self.to_json(database, pretty)?;
        std::fs::write(path, json).map_err(|e| DocumentError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        tracing::info!(path = %path.display(), database = %database.name, "saved definition");
        Ok(())
    }
}
