//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Dmx.
//! The Dmx project belongs to the Dunimd project team.

use dmx::compiler::compile_domain_model;
use dmx::dsl::{DmDomainModelDsl, DmSourceDsl};
use dmx::model::DmEnumCode;
use dmx::tree::{DmNode, DmNodeKind, DmTree};
use dmx::{DmConfig, DmError};
use proptest::prelude::*;
use serde_json::{json, Value};

fn node(id: &str, kind: DmNodeKind, mut properties: Value) -> DmNode {
    properties["uuid"] = json!(id);
    DmNode::new(id, kind, properties)
}

fn long(uuid: &str, name: &str) -> Value {
    json!({ "uuid": uuid, "name": name, "type": { "type": "base", "name": "Long" } })
}

fn members() -> Vec<DmNode> {
    vec![
        node("a-check", DmNodeKind::Rule, json!({
            "name": "CheckStock",
            "aggregator": { "referenceId": "z-place" }
        })),
        node("addr", DmNodeKind::ValueObject, json!({ "name": "Address" })),
        node("line", DmNodeKind::Entity, json!({
            "name": "Line", "id": "line-id",
            "properties": [long("line-id", "id")]
        })),
        node("order", DmNodeKind::Entity, json!({
            "name": "Order", "id": "order-id", "isAggregationRoot": true,
            "properties": [
                long("order-id", "id"),
                { "uuid": "order-lines", "name": "lines",
                  "type": { "type": "container", "name": "List",
                            "params": { "item": { "type": "reference", "referenceId": "line", "name": "OldLine" } } } }
            ],
            "methods": [
                { "uuid": "m1", "name": "cancel",
                  "parameters": [{ "uuid": "m1-p", "name": "reason", "type": { "type": "base", "name": "String" } }] },
                { "uuid": "m2", "name": "cancel", "parameters": [] }
            ]
        })),
        node("status", DmNodeKind::Enum, json!({
            "name": "Status", "baseType": "number",
            "members": [
                { "uuid": "s1", "name": "Open", "code": "1" },
                { "uuid": "s2", "name": "Closed", "code": 2 }
            ]
        })),
        node("z-place", DmNodeKind::Command, json!({
            "name": "PlaceOrder", "eventSendable": true,
            "aggregation": { "referenceId": "agg" },
            "source": {
                "http": { "enabled": true }, "rpc": { "enabled": false },
                "event": { "enabled": true, "value": "Checkout" },
                "schedule": { "enabled": false, "value": "" }
            },
            "properties": [
                { "uuid": "cp", "name": "address", "type": { "type": "reference", "referenceId": "addr", "name": "Stale" } }
            ]
        })),
    ]
}

fn sales(members: Vec<DmNode>) -> DmTree {
    let mut tree = DmTree::default();
    tree.add_root_child(node("agg", DmNodeKind::Aggregation, json!({
        "name": "Sales",
        "meta": [{ "key": "owner", "value": "checkout" }, { "key": "", "value": "x" }]
    })))
    .unwrap();
    for member in members {
        tree.add_child("agg", member).unwrap();
    }
    tree
}

fn compile(tree: &DmTree) -> DmDomainModelDsl {
    compile_domain_model(tree, &DmConfig::default()).unwrap()
}

#[test]
fn test_rule_visited_before_its_command_still_attaches() {
    let dsl = compile(&sales(members()));
    let aggregate = dsl.aggregate("Sales").unwrap();

    assert_eq!(aggregate.commands.len(), 1);
    let command = &aggregate.commands[0];
    assert_eq!(command.rules.len(), 1);
    assert_eq!(command.rules[0].base.name, "CheckStock");
    assert_eq!(command.event.base.name, "PlaceOrderEvent");
    assert_eq!(command.result.ty, "void");
    assert_eq!(
        command.source,
        vec![DmSourceDsl::Http, DmSourceDsl::Event { value: "Checkout".to_string() }]
    );
}

#[test]
fn test_aggregate_members_are_grouped() {
    let dsl = compile(&sales(members()));
    let aggregate = dsl.aggregate("Sales").unwrap();

    let root = aggregate.root.as_ref().unwrap();
    assert_eq!(root.class.base.name, "Order");
    assert_eq!(root.id.as_ref().unwrap().ty, "Long");
    assert_eq!(root.class.properties.len(), 1);
    assert_eq!(root.class.properties[0].ty, "List<Line>");

    assert_eq!(aggregate.entities.len(), 1);
    assert_eq!(aggregate.entities[0].class.base.name, "Line");
    assert_eq!(aggregate.value_objects[0].class.base.name, "Address");
    assert_eq!(aggregate.commands[0].properties[0].ty, "Address");

    let meta = aggregate.base.meta.as_ref().unwrap();
    assert_eq!(meta.len(), 1);
    assert_eq!(meta["owner"], "checkout");
}

#[test]
fn test_same_named_methods_merge_into_overloads() {
    let dsl = compile(&sales(members()));
    let root = dsl.aggregates[0].root.as_ref().unwrap();

    assert_eq!(root.class.methods.len(), 1);
    let signatures = root.class.methods[0].signature.as_slice();
    assert_eq!(signatures.len(), 2);
    assert_eq!(signatures[0].parameters[0].ty, "String");
    assert!(signatures[1].parameters.is_empty());
    assert_eq!(signatures[1].result.ty, "void");
}

#[test]
fn test_identical_overloads_are_ambiguous() {
    let mut tree = DmTree::default();
    tree.add_root_child(node("agg", DmNodeKind::Aggregation, json!({ "name": "Sales" }))).unwrap();
    tree.add_child("agg", node("vo", DmNodeKind::ValueObject, json!({
        "name": "Money",
        "methods": [
            { "uuid": "m1", "name": "add", "parameters": [long("p1", "cents")] },
            { "uuid": "m2", "name": "add", "parameters": [long("p2", "amount")] }
        ]
    })))
    .unwrap();

    let err = compile_domain_model(&tree, &DmConfig::default()).unwrap_err();
    assert_eq!(err, DmError::ambiguous_overload("add"));
}

#[test]
fn test_numeric_enum_codes_are_numbers() {
    let dsl = compile(&sales(members()));
    let codes: Vec<&DmEnumCode> = dsl.aggregates[0].enums[0].members.iter().map(|m| &m.code).collect();
    assert_eq!(
        codes,
        vec![&DmEnumCode::Number(1i64.into()), &DmEnumCode::Number(2i64.into())]
    );
}

#[test]
fn test_identifier_mismatch_fails_the_compile() {
    let mut tree = sales(members());
    tree.add_child("agg", DmNode::new("vo-2", DmNodeKind::ValueObject, json!({ "uuid": "vo-3", "name": "Copy" })))
        .unwrap();

    let err = compile_domain_model(&tree, &DmConfig::default()).unwrap_err();
    assert!(err.is_structural());
    assert_eq!(err, DmError::identifier_mismatch("vo-2", "vo-3"));
}

#[test]
fn test_dangling_links_are_skipped() {
    let mut tree = sales(Vec::new());
    tree.add_child("agg", node("c", DmNodeKind::Command, json!({
        "name": "Orphan", "aggregation": { "referenceId": "nowhere" }
    })))
    .unwrap();
    tree.add_child("agg", node("r", DmNodeKind::Rule, json!({
        "name": "Lost", "aggregator": { "referenceId": "nothing" }
    })))
    .unwrap();
    tree.add_root_child(node("stray", DmNodeKind::Entity, json!({ "name": "Stray" }))).unwrap();

    let dsl = compile(&tree);
    let aggregate = &dsl.aggregates[0];
    assert!(aggregate.commands.is_empty());
    assert!(aggregate.entities.is_empty());
    assert!(aggregate.root.is_none());
}

#[test]
fn test_compiled_json_uses_wire_names() {
    let dsl = compile(&sales(members()));
    let value = serde_json::to_value(&dsl).unwrap();
    let aggregate = &value["aggregates"][0];

    assert_eq!(aggregate["root"]["id"]["type"], "Long");
    assert_eq!(aggregate["commands"][0]["eventSendable"], true);
    assert_eq!(aggregate["commands"][0]["return"]["type"], "void");
    assert_eq!(aggregate["valueObjects"][0]["name"], "Address");
}

proptest! {
    #[test]
    fn test_compilation_ignores_insertion_order(order in Just(members()).prop_shuffle()) {
        let expected = compile(&sales(members()));
        prop_assert_eq!(compile(&sales(order)), expected);
    }
}
