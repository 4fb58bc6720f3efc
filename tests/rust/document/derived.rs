//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Dmx.
//! The Dmx project belongs to the Dunimd project team.

use dmx::tree::{DmNode, DmNodeKind, DmTree};
use dmx::{recompute, DmDerivedView, DmDocumentCompiler, DmDocumentSnapshot, DmRelationship};
use serde_json::{json, Value};

fn node(id: &str, kind: DmNodeKind, mut properties: Value) -> DmNode {
    properties["uuid"] = json!(id);
    DmNode::new(id, kind, properties)
}

fn reference(id: &str) -> Value {
    json!({ "type": "reference", "referenceId": id, "name": id })
}

fn domain() -> DmTree {
    let mut tree = DmTree::default();
    tree.add_root_child(node("agg", DmNodeKind::Aggregation, json!({ "name": "Sales" }))).unwrap();
    tree.add_child("agg", node("order", DmNodeKind::Entity, json!({
        "name": "Order", "id": "o-id", "isAggregationRoot": true,
        "properties": [
            { "uuid": "o-id", "name": "id", "type": { "type": "base", "name": "Long" } },
            { "uuid": "o-lines", "name": "lines",
              "type": { "type": "container", "name": "List", "params": { "item": reference("line") } } }
        ],
        "methods": [
            { "uuid": "o-pay", "name": "pay", "parameters": [{ "uuid": "o-pay-p", "name": "amount", "type": reference("money") }] }
        ]
    })))
    .unwrap();
    tree.add_child("agg", node("line", DmNodeKind::Entity, json!({ "name": "Line" }))).unwrap();
    tree.add_child("agg", node("money", DmNodeKind::ValueObject, json!({ "name": "Money" }))).unwrap();
    tree.add_child("agg", node("cmd", DmNodeKind::Command, json!({
        "name": "Pay", "aggregation": { "referenceId": "agg" },
        "properties": [{ "uuid": "c-amount", "name": "amount", "type": reference("money") }]
    })))
    .unwrap();
    tree.add_child("agg", node("rule", DmNodeKind::Rule, json!({
        "name": "Positive", "aggregator": { "referenceId": "cmd" }
    })))
    .unwrap();
    tree
}

fn query() -> DmTree {
    let mut tree = DmTree::default();
    tree.add_root_child(node("dto", DmNodeKind::Dto, json!({ "name": "OrderDTO" }))).unwrap();
    tree.add_root_child(node("q", DmNodeKind::Query, json!({
        "name": "FindOrder",
        "properties": [{ "uuid": "q-filter", "name": "filter", "type": reference("dto") }],
        "result": reference("order")
    })))
    .unwrap();
    tree
}

fn data() -> DmTree {
    let mut tree = DmTree::default();
    tree.add_root_child(node("cust-do", DmNodeKind::DataObject, json!({
        "name": "CustomerDO",
        "properties": [{ "uuid": "c-id", "name": "id", "type": { "type": "Long" } }]
    })))
    .unwrap();
    tree.add_root_child(node("order-do", DmNodeKind::DataObject, json!({
        "name": "OrderDO",
        "properties": [
            { "uuid": "d-cust", "name": "customer", "type": { "type": "Reference", "target": "cust-do", "targetProperty": "c-id" } },
            { "uuid": "d-ghost", "name": "ghost", "type": { "type": "Reference", "target": "ghost-do", "targetProperty": "x" } }
        ]
    })))
    .unwrap();
    tree
}

fn view() -> DmDerivedView {
    recompute(&[&domain(), &query(), &data()]).unwrap()
}

#[test]
fn test_class_relations_split_by_position() {
    let view = view();
    let order = view.object("order").unwrap();
    assert_eq!(order.kind, "entity");
    assert_eq!(order.associations, vec!["line"]);
    assert_eq!(order.dependencies, vec!["money"]);
    assert!(!order.has_references_error);
    assert!(view.object("__ROOT__").is_none());
}

#[test]
fn test_aggregation_links_collect_members() {
    let view = view();
    let aggregation = view.object("agg").unwrap();
    assert_eq!(aggregation.aggregations, vec!["cmd", "line", "money", "order", "rule"]);

    let command = view.object("cmd").unwrap();
    assert_eq!(command.associations, vec!["money"]);
    assert_eq!(command.aggregations, vec!["rule"]);
}

#[test]
fn test_references_resolve_across_subtrees() {
    let view = view();
    let query = view.object("q").unwrap();
    assert_eq!(query.associations, vec!["dto"]);
    assert_eq!(query.dependencies, vec!["order"]);
    assert!(!query.has_references_error);
}

#[test]
fn test_unresolved_references_are_flagged() {
    let view = view();
    let orders = view.object("order-do").unwrap();
    assert_eq!(orders.associations, vec!["cust-do"]);
    assert!(orders.has_references_error);
    assert_eq!(view.reference_errors(), vec!["order-do"]);
}

#[test]
fn test_edges_and_reverse_dependencies() {
    let view = view();
    let edge = |id: &str| view.edges.iter().find(|e| e.id == id).unwrap();

    assert_eq!(edge("order->line").relationship, DmRelationship::Association);
    assert_eq!(edge("order->money").relationship, DmRelationship::Dependency);
    assert_eq!(edge("cmd->rule").relationship, DmRelationship::Aggregation);
    assert_eq!(edge("q->order").source, "q");
    assert!(view.edges.iter().all(|e| e.source != e.target));
    assert!(view.edges.iter().all(|e| e.target != "ghost-do"));

    assert_eq!(view.objects_dependent_on("money"), vec!["cmd", "order"]);
}

#[test]
fn test_document_compiler_derives_the_same_view() {
    let snapshot = DmDocumentSnapshot::from_value(
        json!({ "domain": domain(), "query": query(), "dataObject": data() }),
        "__ROOT__",
    )
    .unwrap();
    let derived = DmDocumentCompiler::default().derive(&snapshot).unwrap();
    assert_eq!(derived, view());

    let value = serde_json::to_value(&derived).unwrap();
    assert_eq!(value["objects"]["order-do"]["hasReferencesError"], true);
    assert!(value["edges"].as_array().unwrap().iter().any(|e| e["type"] == "aggregation"));
}
