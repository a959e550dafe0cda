//! Document form of the schema entities
//!
//! Field names here are the definition file format and must match
//! existing documents exactly.

use crate::node::Node;
use crate::registry::{RegistryError, TypeRegistry};
use crate::serializer::{FromNode, MapReader, SchemaObject, SchemaType, Serializer, ToNode};
use crate::DocumentError;
use dalgen_core::{CustomQuery, Database, Field, Key, Parameter, Table};
use dalgen_naming::NameSource;

/// Written form of a key that carries no reference fields
pub const KEY_WITHOUT_REFERENCE: &str = "fields:key_type:name:referenced_table";

/// Declares a schema entity: its field list, how each field is written, and
/// the map rendering built from them
macro_rules! schema_type {
    ($ty:ident, [$($field:literal),+ $(,)?], |$value:ident, $s:ident| $entries:expr) => {
        impl SchemaType for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);
            const FIELDS: &'static [&'static str] = &[$($field),+];

            fn field_nodes(&self, $s: &Serializer) -> Vec<(&'static str, Node)> {
                let $value = self;
                $entries
            }

            fn into_object(self) -> SchemaObject {
                SchemaObject::$ty(self)
            }

            fn from_object(object: SchemaObject) -> Result<Self, SchemaObject> {
                match object {
                    SchemaObject::$ty(value) => Ok(value),
                    other => Err(other),
                }
            }
        }

        impl ToNode for $ty {
            fn to_node(&self, serializer: &Serializer) -> Node {
                let entries = self.field_nodes(serializer);
                debug_assert!(
                    entries.iter().all(|(field, _)| Self::FIELDS.contains(field)),
                    "{} wrote a field outside its declared list",
                    Self::TYPE_NAME,
                );
                Node::map(entries)
            }
        }
    };
}

schema_type!(Database, ["name", "tables"], |v, s| vec![
    ("name", v.name.to_node(s)),
    ("tables", v.tables.to_node(s)),
]);

schema_type!(
    Table,
    ["name", "fields", "pk", "keys", "custom_queries"],
    |v, s| vec![
        ("name", v.name.to_node(s)),
        ("fields", v.fields.to_node(s)),
        ("pk", v.pk.to_node(s)),
        ("keys", v.keys.to_node(s)),
        ("custom_queries", v.custom_queries.to_node(s)),
    ]
);

schema_type!(
    Field,
    ["name", "type", "size", "scale", "auto_increment", "default", "required"],
    |v, s| vec![
        ("name", v.name.to_node(s)),
        ("type", v.field_type.to_node(s)),
        ("size", v.size.to_node(s)),
        ("scale", v.scale.to_node(s)),
        ("auto_increment", v.auto_increment.to_node(s)),
        ("default", v.default.to_node(s)),
        ("required", v.required.to_node(s)),
    ]
);

// Reference fields are only written for foreign keys and lookups
schema_type!(
    Key,
    ["name", "fields", "key_type", "primary_table", "primary_fields", "referenced_table"],
    |v, s| {
        let mut entries = vec![
            ("name", v.name.to_node(s)),
            ("fields", v.fields.to_node(s)),
            ("key_type", v.key_type.to_node(s)),
        ];
        if v.key_type.is_reference() {
            entries.push(("primary_table", v.primary_table.to_node(s)));
            entries.push(("primary_fields", v.primary_fields.to_node(s)));
        }
        entries.push(("referenced_table", v.referenced_table.to_node(s)));
        entries
    }
);

schema_type!(Parameter, ["name", "type"], |v, s| vec![
    ("name", v.name.to_node(s)),
    ("type", v.param_type.to_node(s)),
]);

schema_type!(
    CustomQuery,
    ["name", "parameters", "return_type", "transform", "query_type", "query"],
    |v, s| vec![
        ("name", v.name.to_node(s)),
        ("parameters", v.parameters.to_node(s)),
        ("return_type", v.return_type.to_node(s)),
        ("transform", v.transform.to_node(s)),
        ("query_type", v.query_type.to_node(s)),
        ("query", v.query.to_node(s)),
    ]
);

impl TypeRegistry {
    /// Registry holding every schema entity
    pub fn with_schema_types() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register::<Database>()?;
        registry.register::<Table>()?;
        registry.register::<Field>()?;
        registry.register::<Key>()?;
        registry.register_with_signature::<Key>(KEY_WITHOUT_REFERENCE)?;
        registry.register::<Parameter>()?;
        registry.register::<CustomQuery>()?;
        Ok(registry)
    }
}

impl FromNode for Database {
    fn from_node(
        node: &Node,
        s: &Serializer,
        context: &dyn NameSource,
    ) -> Result<Self, DocumentError> {
        let r = MapReader::new(Self::TYPE_NAME, node, s, context)?;
        Ok(Self {
            name: r.value("name")?,
            tables: r.objects("tables")?,
        })
    }
}

impl FromNode for Table {
    fn from_node(
        node: &Node,
        s: &Serializer,
        context: &dyn NameSource,
    ) -> Result<Self, DocumentError> {
        let r = MapReader::new(Self::TYPE_NAME, node, s, context)?;
        Ok(Self {
            name: r.value("name")?,
            fields: r.objects("fields")?,
            pk: r.optional_object("pk")?,
            keys: r.objects("keys")?,
            custom_queries: r.objects("custom_queries")?,
        })
    }
}

impl FromNode for Field {
    fn from_node(
        node: &Node,
        s: &Serializer,
        context: &dyn NameSource,
    ) -> Result<Self, DocumentError> {
        let r = MapReader::new(Self::TYPE_NAME, node, s, context)?;
        Ok(Self {
            name: r.value("name")?,
            field_type: r.value("type")?,
            size: r.value("size")?,
            scale: r.value("scale")?,
            auto_increment: r.value("auto_increment")?,
            default: default_value(r.get("default")?)?,
            required: r.value("required")?,
        })
    }
}

/// Defaults are kept as text; numeric and boolean literals are accepted
fn default_value(node: &Node) -> Result<Option<String>, DocumentError> {
    match node {
        Node::Null => Ok(None),
        Node::String(s) => Ok(Some(s.clone())),
        Node::Number(n) => Ok(Some(n.to_string())),
        Node::Bool(b) => Ok(Some(b.to_string())),
        other => Err(DocumentError::shape("scalar", other).at("Field.default".to_string())),
    }
}

/// Reference fields read for other key types are dropped, as they are never written
impl FromNode for Key {
    fn from_node(
        node: &Node,
        s: &Serializer,
        context: &dyn NameSource,
    ) -> Result<Self, DocumentError> {
        let r = MapReader::new(Self::TYPE_NAME, node, s, context)?;
        let key = Self::new(r.value("name")?, r.value("key_type")?)
            .with_fields(r.value::<Vec<String>>("fields")?)
            .with_primary(
                r.value_or_default::<String>("primary_table")?,
                r.value_or_default::<Vec<String>>("primary_fields")?,
            )
            .with_referenced_table(r.value_or_default::<String>("referenced_table")?);
        Ok(key)
    }
}

impl FromNode for Parameter {
    fn from_node(
        node: &Node,
        s: &Serializer,
        context: &dyn NameSource,
    ) -> Result<Self, DocumentError> {
        let r = MapReader::new(Self::TYPE_NAME, node, s, context)?;
        Ok(Self {
            name: r.value("name")?,
            param_type: r.value("type")?,
        })
    }
}

impl FromNode for CustomQuery {
    fn from_node(
        node: &Node,
        s: &Serializer,
        context: &dyn NameSource,
    ) -> Result<Self, DocumentError> {
        let r = MapReader::new(Self::TYPE_NAME, node, s, context)?;
        Ok(Self {
            name: r.value("name")?,
            parameters: r.objects("parameters")?,
            return_type: r.value("return_type")?,
            transform: r.value("transform")?,
            query_type: r.value("query_type")?,
            query: r.value("query")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeDescriptor;
    use dalgen_core::{FieldType, KeyType, QueryType};
    use dalgen_naming::{Name, NamingError};

    struct Underscores;

    impl NameSource for Underscores {
        fn string_to_name(&self, raw: &str) -> Result<Name, NamingError> {
            let tokens = raw.split('_').map(str::to_lowercase).collect();
            Name::new(raw, tokens).ok_or_else(|| NamingError::Unsegmentable {
                identifier: raw.to_string(),
                run: raw.to_string(),
            })
        }
    }

    fn name(raw: &str) -> Name {
        Underscores.string_to_name(raw).unwrap()
    }

    fn written_fields<T: SchemaType>(s: &Serializer, value: &T) -> Vec<String> {
        match s.serialize(value) {
            Node::Map(map) => map.keys().cloned().collect(),
            other => panic!("expected a map, got {}", other.kind()),
        }
    }

    fn declared_fields<T: SchemaType>() -> Vec<String> {
        let mut fields: Vec<String> = T::FIELDS.iter().map(|f| f.to_string()).collect();
        fields.sort();
        fields
    }

    #[test]
    fn every_entity_writes_its_declared_fields() {
        let s = Serializer::for_schema().unwrap();
        let fk = Key::new(name("fk_customer"), KeyType::ForeignKey)
            .with_fields(["customer_id"])
            .with_primary("customer", ["id"]);

        assert_eq!(
            written_fields(&s, &Database::new(name("shop"))),
            declared_fields::<Database>()
        );
        assert_eq!(
            written_fields(&s, &Table::new(name("order"))),
            declared_fields::<Table>()
        );
        assert_eq!(
            written_fields(&s, &Field::new(name("id"), FieldType::Integer)),
            declared_fields::<Field>()
        );
        assert_eq!(written_fields(&s, &fk), declared_fields::<Key>());
        assert_eq!(
            written_fields(&s, &Parameter::new(name("status"), FieldType::String)),
            declared_fields::<Parameter>()
        );
        let query = CustomQuery::new(name("by_status"), QueryType::FetchAll, "select 1");
        assert_eq!(written_fields(&s, &query), declared_fields::<CustomQuery>());

        let field = Field::new(name("id"), FieldType::Integer);
        assert_eq!(
            s.serialize(&field).signature().unwrap(),
            TypeDescriptor::of::<Field>().signature()
        );
    }

    #[test]
    fn key_writes_reference_fields_only_for_references() {
        let s = Serializer::for_schema().unwrap();

        let index = Key::new(name("ix_status"), KeyType::Index).with_fields(["status"]);
        assert_eq!(s.serialize(&index).signature().unwrap(), KEY_WITHOUT_REFERENCE);

        let fk = Key::new(name("fk_customer"), KeyType::ForeignKey)
            .with_fields(["customer_id"])
            .with_primary("customer", ["id"]);
        assert_eq!(s.serialize(&fk).signature().unwrap(), TypeDescriptor::of::<Key>().signature());
    }

    #[test]
    fn non_reference_key_ignores_primary_on_read_and_write() {
        let s = Serializer::for_schema().unwrap();
        let index = Key::new(name("ix_customer"), KeyType::Index)
            .with_fields(["customer_id"])
            .with_primary("customer", ["id"]);
        assert!(index.primary_table.is_empty());

        let node = s.serialize(&index);
        let back: Key = s.deserialize_object(&node, &Underscores).unwrap();
        assert_eq!(back, index);

        let node = Node::from_json(
            r#"{"name": "ix_customer", "fields": ["customer_id"], "key_type": "Index",
                "primary_table": "customer", "primary_fields": ["id"], "referenced_table": ""}"#,
        )
        .unwrap();
        let key: Key = s.deserialize_object(&node, &Underscores).unwrap();
        assert_eq!(key, index);
    }

    #[test]
    fn numeric_default_is_kept_as_text() {
        let s = Serializer::for_schema().unwrap();
        let node = Node::from_json(
            r#"{"name": "qty", "type": "int", "size": 4, "scale": 0,
                "auto_increment": false, "default": 1, "required": true}"#,
        )
        .unwrap();

        let field: Field = s.deserialize_object(&node, &Underscores).unwrap();
        assert_eq!(field.default.as_deref(), Some("1"));
        assert_eq!(field.field_type, FieldType::Integer);
    }

    #[test]
    fn key_without_reference_fields_defaults_them() {
        let s = Serializer::for_schema().unwrap();
        let node = Node::from_json(
            r#"{"name": "pk_order", "fields": ["id"], "key_type": "PrimaryKey",
                "referenced_table": ""}"#,
        )
        .unwrap();

        let key: Key = s.deserialize_object(&node, &Underscores).unwrap();
        assert_eq!(key.key_type, KeyType::PrimaryKey);
        assert!(key.primary_table.is_empty());
        assert!(key.primary_fields.is_empty());
    }

    #[test]
    fn schema_registry_contents() {
        let registry = TypeRegistry::with_schema_types().unwrap();
        assert_eq!(registry.len(), 7);
        assert_eq!(registry.resolve(KEY_WITHOUT_REFERENCE).unwrap().type_name, "Key");
    }
}
