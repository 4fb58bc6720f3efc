//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Dmx.
//! The Dmx project belongs to the Dunimd project team.

use dmx::compiler::compile_object_mapper;
use dmx::dsl::{DmFieldPairDsl, DmObjectKind, DmObjectRefDsl};
use dmx::lookup::DmObjectStore;
use dmx::tree::{DmNode, DmNodeKind, DmTree};
use dmx::DmConfig;
use serde_json::{json, Value};

fn node(id: &str, kind: DmNodeKind, mut properties: Value) -> DmNode {
    properties["uuid"] = json!(id);
    DmNode::new(id, kind, properties)
}

fn side(id: &str) -> Value {
    json!({ "referenceId": id })
}

fn store() -> DmObjectStore {
    let mut domain = DmTree::default();
    domain.add_root_child(node("agg", DmNodeKind::Aggregation, json!({ "name": "Sales" }))).unwrap();
    domain
        .add_child("agg", node("order", DmNodeKind::Entity, json!({
            "name": "Order", "id": "o-id", "isAggregationRoot": true,
            "properties": [
                { "uuid": "o-id", "name": "id", "type": { "type": "base", "name": "Long" } },
                { "uuid": "o-total", "name": "total", "type": { "type": "base", "name": "Double" } }
            ]
        })))
        .unwrap();
    domain
        .add_child("agg", node("status", DmNodeKind::Enum, json!({ "name": "Status" })))
        .unwrap();

    let mut data = DmTree::default();
    data.add_root_child(node("order-do", DmNodeKind::DataObject, json!({
        "name": "OrderDO",
        "properties": [
            { "uuid": "d-id", "name": "id", "type": { "type": "Long" } },
            { "uuid": "d-total", "name": "amount", "type": { "type": "Double" } }
        ]
    })))
    .unwrap();

    DmObjectStore::from_trees(&[&domain, &data]).unwrap()
}

fn mappers() -> DmTree {
    let mut tree = DmTree::default();
    tree.add_root_child(node("m-order", DmNodeKind::MapperObject, json!({
        "name": "OrderToOrderDO",
        "source": side("order"),
        "target": side("order-do"),
        "mappers": [
            { "uuid": "f1", "source": "o-id", "target": "d-id" },
            { "uuid": "f2", "source": "o-total", "target": "d-total" },
            { "uuid": "f3", "source": "o-gone", "target": "d-id" },
            { "uuid": "f4", "source": "o-id" }
        ]
    })))
    .unwrap();
    tree.add_root_child(node("m-enum", DmNodeKind::MapperObject, json!({
        "name": "StatusToOrderDO", "source": side("status"), "target": side("order-do")
    })))
    .unwrap();
    tree.add_root_child(node("m-lost", DmNodeKind::MapperObject, json!({
        "name": "Lost", "source": side("nowhere"), "target": side("order-do")
    })))
    .unwrap();
    tree
}

#[test]
fn test_sides_resolve_across_subtrees() {
    let store = store();
    let dsl = compile_object_mapper(&mappers(), &store, &DmConfig::default()).unwrap();

    assert_eq!(dsl.mappers.len(), 1);
    let mapper = &dsl.mappers[0];
    assert_eq!(mapper.base.name, "OrderToOrderDO");
    assert_eq!(
        mapper.source,
        DmObjectRefDsl { name: "Order".to_string(), parent: Some("Sales".to_string()), kind: DmObjectKind::Entity }
    );
    assert_eq!(
        mapper.target,
        DmObjectRefDsl { name: "OrderDO".to_string(), parent: None, kind: DmObjectKind::DataObject }
    );
}

#[test]
fn test_field_pairs_are_named_and_unresolved_pairs_dropped() {
    let store = store();
    let dsl = compile_object_mapper(&mappers(), &store, &DmConfig::default()).unwrap();

    let pair = |source: &str, target: &str| DmFieldPairDsl {
        source_field: source.to_string(),
        target_field: target.to_string(),
    };
    assert_eq!(dsl.mappers[0].mapper, vec![pair("id", "id"), pair("total", "amount")]);
}

#[test]
fn test_compiled_sides_serialize_their_kind() {
    let store = store();
    let dsl = compile_object_mapper(&mappers(), &store, &DmConfig::default()).unwrap();
    let value = serde_json::to_value(&dsl).unwrap();
    assert_eq!(value["mappers"][0]["source"]["type"], "Entity");
    assert_eq!(value["mappers"][0]["mapper"][1]["targetField"], "amount");
}
