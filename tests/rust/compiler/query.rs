//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Dmx.
//! The Dmx project belongs to the Dunimd project team.

use dmx::compiler::compile_query_model;
use dmx::dsl::DmSourceDsl;
use dmx::tree::{DmNode, DmNodeKind, DmTree};
use dmx::{DmConfig, DmError};
use serde_json::{json, Value};

fn node(id: &str, kind: DmNodeKind, mut properties: Value) -> DmNode {
    properties["uuid"] = json!(id);
    DmNode::new(id, kind, properties)
}

fn reference(id: &str, name: &str) -> Value {
    json!({ "type": "reference", "referenceId": id, "name": name })
}

fn catalogue() -> DmTree {
    let mut tree = DmTree::default();
    tree.add_root_child(node("a-rule", DmNodeKind::Rule, json!({
        "name": "OnlyActive", "aggregator": { "referenceId": "q-find" }
    })))
    .unwrap();
    tree.add_root_child(node("dto", DmNodeKind::Dto, json!({
        "name": "OrderDTO",
        "properties": [{ "uuid": "dto-total", "name": "total", "type": { "type": "base", "name": "Double" } }]
    })))
    .unwrap();
    tree.add_root_child(node("q-find", DmNodeKind::Query, json!({
        "name": "FindOrders", "pagination": true,
        "properties": [{ "uuid": "qp", "name": "sample", "type": reference("dto", "Old") }],
        "result": { "type": "container", "name": "List", "params": { "item": reference("dto", "Old") } }
    })))
    .unwrap();
    tree.add_root_child(node("q-count", DmNodeKind::Query, json!({
        "name": "CountOrders",
        "source": {
            "http": { "enabled": false }, "rpc": { "enabled": true },
            "event": { "enabled": false, "value": "" },
            "schedule": { "enabled": true, "value": "0 * * * *" }
        }
    })))
    .unwrap();
    tree
}

#[test]
fn test_queries_render_types_and_collect_rules() {
    let dsl = compile_query_model(&catalogue(), &DmConfig::default()).unwrap();

    let find = dsl.query("FindOrders").unwrap();
    assert!(find.pagination);
    assert_eq!(find.properties[0].ty, "OrderDTO");
    assert_eq!(find.result.ty, "List<OrderDTO>");
    assert_eq!(find.rules.len(), 1);
    assert_eq!(find.rules[0].base.name, "OnlyActive");
    assert_eq!(find.source, vec![DmSourceDsl::Http, DmSourceDsl::Rpc]);

    let count = dsl.query("CountOrders").unwrap();
    assert!(!count.pagination);
    assert_eq!(count.result.ty, "void");
    assert_eq!(
        count.source,
        vec![DmSourceDsl::Rpc, DmSourceDsl::Schedule { value: "0 * * * *".to_string() }]
    );
}

#[test]
fn test_dtos_compile_as_classes() {
    let dsl = compile_query_model(&catalogue(), &DmConfig::default()).unwrap();
    assert_eq!(dsl.dtos.len(), 1);
    let dto = &dsl.dtos[0].class;
    assert_eq!(dto.base.name, "OrderDTO");
    assert_eq!(dto.properties[0].ty, "Double");
}

#[test]
fn test_configured_void_return_is_used() {
    let config = DmConfig::default().with_void_return("Unit");
    let dsl = compile_query_model(&catalogue(), &config).unwrap();
    assert_eq!(dsl.query("CountOrders").unwrap().result.ty, "Unit");
}

#[test]
fn test_foreign_kinds_depend_on_strictness() {
    let mut tree = catalogue();
    tree.add_root_child(node("agg", DmNodeKind::Aggregation, json!({ "name": "Sales" }))).unwrap();

    let lenient = compile_query_model(&tree, &DmConfig::default()).unwrap();
    assert_eq!(lenient.queries.len(), 2);

    let err = compile_query_model(&tree, &DmConfig::default().with_strict(true)).unwrap_err();
    assert!(matches!(err, DmError::Schema { .. }));
}
