//! Round-trip and failure tests for definition documents

use dalgen_core::{
    CustomQuery, Database, Field, FieldType, Key, KeyType, Parameter, QueryType, Table,
    TransformType,
};
use dalgen_document::{Document, DocumentError, Node, SchemaObject, Serializer, Value};
use dalgen_naming::{Naming, WordSet};
use pretty_assertions::assert_eq;

fn naming() -> Naming {
    Naming::new(
        WordSet::from_words([
            "shop", "customer", "order", "line", "id", "name", "status", "pk", "fk", "ix", "by",
            "get", "count", "active", "email", "total",
        ]),
        WordSet::from_words(["orderline"]),
    )
}

fn shop(naming: &Naming) -> Database {
    let n = |raw: &str| naming.string_to_name(raw).unwrap();

    let mut customer = Table::new(n("customer"));
    customer.fields = vec![
        Field::new(n("id"), FieldType::Integer)
            .with_size(11, 0)
            .with_auto_increment(true)
            .with_required(true),
        Field::new(n("customername"), FieldType::String).with_size(100, 0),
        Field::new(n("Email"), FieldType::String).with_size(255, 0).with_default("''"),
        Field::new(n("active"), FieldType::Boolean).with_required(true),
    ];
    customer.pk = Some(Key::new(n("pk_customer"), KeyType::PrimaryKey).with_fields(["id"]));
    customer.keys = vec![Key::new(n("ix_customer_email"), KeyType::Unique).with_fields(["Email"])];
    customer.custom_queries = vec![CustomQuery::new(
        n("count_active"),
        QueryType::FetchScalar,
        "select count(*) from customer where active = 1",
    )
    .with_return_type(FieldType::Integer)];

    let mut order = Table::new(n("orderline"));
    order.fields = vec![
        Field::new(n("id"), FieldType::Integer).with_required(true),
        Field::new(n("customer_id"), FieldType::Integer).with_required(true),
        Field::new(n("total"), FieldType::Decimal).with_size(10, 2),
        Field::new(n("status"), FieldType::Undefined),
    ];
    order.pk = Some(Key::new(n("pk_orderline"), KeyType::PrimaryKey).with_fields(["id"]));
    order.keys = vec![
        Key::new(n("fk_orderline_customer"), KeyType::ForeignKey)
            .with_fields(["customer_id"])
            .with_primary("customer", ["id"])
            .with_referenced_table("orderline"),
        Key::new(n("ix_status"), KeyType::Index).with_fields(["status"]),
    ];
    order.custom_queries = vec![CustomQuery::new(
        n("get_by_customer"),
        QueryType::FetchAll,
        "select * from orderline where customer_id = ?",
    )
    .with_parameter(Parameter::new(n("customer_id"), FieldType::Integer))
    .with_return_type(FieldType::ListOfItem)
    .with_transform(TransformType::Map)];

    let mut db = Database::new(n("shop"));
    db.tables = vec![order, customer];
    db
}

#[test]
fn database_round_trip() {
    let naming = naming();
    let document = Document::for_schema().unwrap();
    let db = shop(&naming);

    let json = document.to_json(&db, true).unwrap();
    let loaded = document.from_json(&json, &naming).unwrap();

    assert_eq!(loaded, db);
    assert_eq!(loaded.tables[0].name.pascal(), "Orderline");
    assert_eq!(loaded.tables[1].fields[1].name.camel(), "customerName");
}

#[test]
fn compact_and_pretty_documents_agree() {
    let naming = naming();
    let document = Document::for_schema().unwrap();
    let db = shop(&naming);

    let compact = document.to_json(&db, false).unwrap();
    let pretty = document.to_json(&db, true).unwrap();
    assert!(!compact.contains('\n'));
    assert!(pretty.contains("\n\t"));
    assert_eq!(Node::from_json(&compact).unwrap(), Node::from_json(&pretty).unwrap());
}

#[test]
fn written_field_names_and_spellings() {
    let naming = naming();
    let serializer = Serializer::for_schema().unwrap();
    let db = shop(&naming);

    let node = serializer.serialize(&db.tables[0]);
    let Node::Map(table) = &node else {
        panic!("table must render as a map");
    };
    assert_eq!(
        table.keys().map(String::as_str).collect::<Vec<_>>(),
        ["custom_queries", "fields", "keys", "name", "pk"]
    );

    let Node::Sequence(keys) = &table["keys"] else {
        panic!("keys must render as a sequence");
    };
    assert_eq!(
        keys[0].signature().unwrap(),
        "fields:key_type:name:primary_fields:primary_table:referenced_table"
    );
    assert_eq!(keys[1].signature().unwrap(), "fields:key_type:name:referenced_table");

    let json = node.to_json(false).unwrap();
    assert!(json.contains(r#""key_type":"ForeignKey""#));
    assert!(json.contains(r#""type":"None""#));
    assert!(json.contains(r#""return_type":"[__Item__]""#));
    assert!(json.contains(r#""transform":"Map""#));
    assert!(json.contains(r#""query_type":"FetchAll""#));
}

#[test]
fn untyped_deserialize_resolves_by_signature() {
    let naming = naming();
    let serializer = Serializer::for_schema().unwrap();
    let db = shop(&naming);

    let fields = serializer.serialize(&db.tables[1].fields);
    let value = serializer.deserialize(&fields, &naming).unwrap();

    let Value::Sequence(items) = value else {
        panic!("expected a sequence");
    };
    assert_eq!(items.len(), 4);
    assert_eq!(items[0], Value::Object(SchemaObject::Field(db.tables[1].fields[0].clone())));
    let object = items[3].clone().into_object().unwrap();
    assert_eq!(object.type_name(), "Field");

    let scalar = serializer.deserialize(&Node::String("x".into()), &naming).unwrap();
    assert_eq!(scalar, Value::String("x".into()));
}

#[test]
fn unknown_signature_fails() {
    let naming = naming();
    let document = Document::for_schema().unwrap();

    let err = document
        .from_json(r#"{"name": "shop", "tables": [], "owner": "id"}"#, &naming)
        .unwrap_err();
    match err {
        DocumentError::UnresolvedSignature { signature } => {
            assert_eq!(signature, "name:owner:tables");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn partial_signature_is_not_guessed() {
    let naming = naming();
    let serializer = Serializer::for_schema().unwrap();
    let node = Node::from_json(r#"{"name": "id", "type": "int", "size": 4}"#).unwrap();

    let err = serializer.deserialize(&node, &naming).unwrap_err();
    assert!(matches!(err, DocumentError::UnresolvedSignature { .. }));
}

#[test]
fn wrong_root_type_fails() {
    let naming = naming();
    let document = Document::for_schema().unwrap();

    let err = document.from_json(r#"{"name": "id", "type": "Integer"}"#, &naming).unwrap_err();
    match err {
        DocumentError::UnexpectedType { expected, found } => {
            assert_eq!(expected, "Database");
            assert_eq!(found, "Parameter");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn bogus_field_type_fails() {
    let naming = naming();
    let serializer = Serializer::for_schema().unwrap();
    let node = Node::from_json(
        r#"{"name": "id", "type": "bogus", "size": 0, "scale": 0,
            "auto_increment": false, "default": null, "required": false}"#,
    )
    .unwrap();

    let err = serializer.deserialize(&node, &naming).unwrap_err();
    match err {
        DocumentError::Enum(e) => {
            assert_eq!(e.kind, "field type");
            assert_eq!(e.value, "bogus");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn scalar_where_map_required_fails() {
    let naming = naming();
    let document = Document::for_schema().unwrap();

    let err = document.from_json(r#"{"name": "shop", "tables": [42]}"#, &naming).unwrap_err();
    match err {
        DocumentError::ShapeMismatch { expected, found, path } => {
            assert_eq!(expected, "map");
            assert_eq!(found, "number");
            assert_eq!(path, "Database.tables");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn wrong_scalar_type_reports_field() {
    let naming = naming();
    let serializer = Serializer::for_schema().unwrap();
    let node = Node::from_json(
        r#"{"name": "id", "type": "Integer", "size": "eleven", "scale": 0,
            "auto_increment": false, "default": null, "required": false}"#,
    )
    .unwrap();

    let err = serializer.deserialize(&node, &naming).unwrap_err();
    assert_eq!(err.to_string(), "Expected unsigned integer at Field.size, found string");
}

#[test]
fn integral_float_sizes_are_accepted() {
    let naming = naming();
    let serializer = Serializer::for_schema().unwrap();
    let field = |size: &str| {
        Node::from_json(&format!(
            r#"{{"name": "id", "type": "Integer", "size": {size}, "scale": 0,
                "auto_increment": false, "default": null, "required": false}}"#
        ))
        .unwrap()
    };

    let parsed: Field = serializer.deserialize_object(&field("4.0"), &naming).unwrap();
    assert_eq!(parsed.size, 4);

    let err = serializer.deserialize_object::<Field>(&field("4.5"), &naming).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Expected unsigned integer at Field.size, found non-integer number"
    );

    let err = serializer.deserialize_object::<Field>(&field("-1"), &naming).unwrap_err();
    assert_eq!(err.to_string(), "Expected unsigned integer at Field.size, found negative number");

    let err = serializer.deserialize_object::<Field>(&field("5000000000"), &naming).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Expected unsigned integer at Field.size, found out of range number"
    );
}

#[test]
fn unsegmentable_name_fails_load() {
    let naming = naming();
    let document = Document::for_schema().unwrap();

    let err = document.from_json(r#"{"name": "qqq", "tables": []}"#, &naming).unwrap_err();
    assert!(matches!(err, DocumentError::Naming(_)));
}

#[test]
fn save_and_load_file() {
    let naming = naming();
    let document = Document::for_schema().unwrap();
    let db = shop(&naming);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shop.json");
    document.save(&path, &db, true).unwrap();

    let loaded = document.load(&path, &naming).unwrap();
    assert_eq!(loaded, db);

    let ordered: Vec<_> = loaded.ordered_tables().iter().map(|t| t.name.raw()).collect();
    assert_eq!(ordered, ["customer", "orderline"]);
}

#[test]
fn load_missing_file_fails() {
    let naming = naming();
    let document = Document::for_schema().unwrap();

    let err = document
        .load(std::path::Path::new("/no/such/definition.json"), &naming)
        .unwrap_err();
    assert!(matches!(err, DocumentError::Io { .. }));
}
