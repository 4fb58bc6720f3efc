//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Dmx.
//! The Dmx project belongs to the Dunimd project team.

use dmx::compiler::compile_data_model;
use dmx::dsl::{DmDataModelDsl, DmFieldPairDsl};
use dmx::model::DmIndexKind;
use dmx::tree::{DmNode, DmNodeKind, DmTree};
use dmx::{DmCardinality, DmConfig, DmStorageKind, DmStorageType};
use serde_json::{json, Value};

fn node(id: &str, mut properties: Value) -> DmNode {
    properties["uuid"] = json!(id);
    DmNode::new(id, DmNodeKind::DataObject, properties)
}

fn reference(uuid: &str, name: &str, target: &str, target_property: &str, cardinality: Value) -> Value {
    json!({
        "uuid": uuid, "name": name,
        "type": { "type": "Reference", "target": target, "targetProperty": target_property, "cardinality": cardinality }
    })
}

fn warehouse() -> DmTree {
    let mut tree = DmTree::default();
    tree.add_root_child(node("a-orders", json!({
        "name": "OrderDO", "tableName": "orders",
        "properties": [
            { "uuid": "o-id", "name": "id", "type": { "type": "Long" }, "primaryKey": true },
            reference("o-customer", "customer", "z-customers", "c-id", json!("ManyToOne")),
            reference("o-code", "customerCode", "z-customers", "c-code", Value::Null),
            reference("o-parent", "parent", "a-orders", "o-id", json!("ManyToOne")),
            reference("o-ghost", "ghost", "z-customers", "missing", Value::Null),
            { "uuid": "o-created", "name": "createdAt", "type": { "type": "DateTime", "defaultValue": "" } }
        ],
        "indexes": [
            { "uuid": "ix", "name": "byCustomer", "type": "Unique", "method": "BTREE", "properties": ["o-customer", "o-unknown"] }
        ]
    })))
    .unwrap();
    tree.add_root_child(node("z-customers", json!({
        "name": "CustomerDO",
        "properties": [
            { "uuid": "c-id", "name": "id", "type": { "type": "Integer" }, "primaryKey": true },
            { "uuid": "c-code", "name": "code", "type": { "type": "String", "length": 32 } }
        ]
    })))
    .unwrap();
    tree
}

fn compile() -> DmDataModelDsl {
    compile_data_model(&warehouse(), &DmConfig::default()).unwrap()
}

#[test]
fn test_reference_columns_take_the_target_kind() {
    let dsl = compile();
    let orders = dsl.data_object("OrderDO").unwrap();

    assert_eq!(orders.table_name.as_deref(), Some("orders"));
    assert_eq!(orders.property("customer").unwrap().storage.kind(), DmStorageKind::Integer);
    assert_eq!(orders.property("customerCode").unwrap().storage.kind(), DmStorageKind::String);
    assert_eq!(orders.property("parent").unwrap().storage.kind(), DmStorageKind::Long);
    assert!(orders.property("ghost").is_none());
    assert_eq!(
        orders.property("createdAt").unwrap().storage,
        DmStorageType::DateTime { default_value: None }
    );
}

#[test]
fn test_primary_keys_are_not_null_and_indexed() {
    let dsl = compile();
    let orders = dsl.data_object("OrderDO").unwrap();

    let id = orders.property("id").unwrap();
    assert_eq!(id.primary_key, Some(true));
    assert_eq!(id.not_null, Some(true));

    assert_eq!(orders.indexes.len(), 2);
    assert_eq!(orders.indexes[0].base.name, "byCustomer");
    assert_eq!(orders.indexes[0].kind, DmIndexKind::Unique);
    assert_eq!(orders.indexes[0].properties, vec!["customer"]);
    assert_eq!(orders.indexes[1].kind, DmIndexKind::Primary);
    assert_eq!(orders.indexes[1].properties, vec!["id"]);
}

#[test]
fn test_references_group_by_target_and_skip_self() {
    let dsl = compile();

    assert_eq!(dsl.references.len(), 1);
    let summary = &dsl.references[0];
    assert_eq!(summary.source, "OrderDO");
    assert_eq!(summary.targets.len(), 1);

    let target = &summary.targets[0];
    assert_eq!(target.target, "CustomerDO");
    assert_eq!(target.cardinality, Some(DmCardinality::ManyToOne));
    let pair = |source: &str, target: &str| DmFieldPairDsl {
        source_field: source.to_string(),
        target_field: target.to_string(),
    };
    assert_eq!(target.mapper, vec![pair("customer", "id"), pair("customerCode", "code")]);
}

#[test]
fn test_objects_without_keys_get_no_primary_index() {
    let mut tree = DmTree::default();
    tree.add_root_child(node("log", json!({
        "name": "LogDO",
        "properties": [{ "uuid": "l-line", "name": "line", "type": { "type": "Text" } }]
    })))
    .unwrap();

    let dsl = compile_data_model(&tree, &DmConfig::default()).unwrap();
    let log = dsl.data_object("LogDO").unwrap();
    assert!(log.indexes.is_empty());
    assert!(dsl.references.is_empty());
}
