//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Dmx.
//! The Dmx project belongs to the Dunimd project team.

use dmx::{traverse, DmError, DmNode, DmNodeKind, DmPostTraverse, DmTree, DmTreeHandler, Result};
use proptest::prelude::*;
use serde_json::json;

/// Records visit order and resolves `ref` properties after the walk.
#[derive(Default)]
struct Indexer {
    seen: Vec<String>,
    resolved: Vec<(String, bool)>,
}

impl DmTreeHandler for Indexer {
    fn handle(&mut self, node: &DmNode, _tree: &DmTree, post: &mut DmPostTraverse<Self>) -> Result<()> {
        self.seen.push(node.id.clone());
        if let Some(target) = node.properties.get("ref").and_then(|v| v.as_str()) {
            let id = node.id.clone();
            let target = target.to_string();
            post.add(move |indexer: &mut Indexer| {
                let found = indexer.seen.contains(&target);
                indexer.resolved.push((id, found));
                Ok(())
            });
        }
        Ok(())
    }
}

fn node(id: &str, extra: serde_json::Value) -> DmNode {
    let mut properties = json!({ "uuid": id });
    if let (Some(bag), Some(extra)) = (properties.as_object_mut(), extra.as_object()) {
        bag.extend(extra.clone());
    }
    DmNode::new(id, DmNodeKind::Rule, properties)
}

#[test]
fn test_forward_references_resolve_after_walk() {
    let mut tree = DmTree::default();
    tree.add_root_child(node("a", json!({ "ref": "z" }))).unwrap();
    tree.add_root_child(node("z", json!({ "ref": "missing" }))).unwrap();

    let mut indexer = Indexer::default();
    traverse(&mut indexer, &tree).unwrap();

    assert_eq!(indexer.seen, vec!["__ROOT__", "a", "z"]);
    assert_eq!(
        indexer.resolved,
        vec![("a".to_string(), true), ("z".to_string(), false)]
    );
}

#[test]
fn test_identifier_mismatch_aborts_the_walk() {
    let mut tree = DmTree::default();
    tree.add_root_child(node("a", json!({ "ref": "b" }))).unwrap();
    tree.add_root_child(DmNode::new("b", DmNodeKind::Rule, json!({ "uuid": "not-b" })))
        .unwrap();

    let mut indexer = Indexer::default();
    let err = traverse(&mut indexer, &tree).unwrap_err();

    assert_eq!(
        err,
        DmError::IdentifierMismatch {
            id: "b".to_string(),
            uuid: "not-b".to_string(),
        }
    );
    assert!(err.is_structural());
    assert!(indexer.resolved.is_empty());
}

#[test]
fn test_empty_uuid_is_not_a_mismatch() {
    let mut tree = DmTree::default();
    tree.add_root_child(DmNode::new("a", DmNodeKind::Rule, json!({ "uuid": "" })))
        .unwrap();
    let mut indexer = Indexer::default();
    assert!(traverse(&mut indexer, &tree).is_ok());
}

#[test]
fn test_snapshot_children_accept_list_and_map() {
    let tree = DmTree::from_json(
        r#"{
            "__ROOT__": { "id": "__ROOT__", "children": { "b": 1, "a": 1 }, "properties": { "__node_name__": "__ROOT__" } },
            "a": { "id": "a", "parent": "__ROOT__", "children": ["a2", "a1"], "properties": {} },
            "a1": { "id": "a1", "parent": "a", "children": null, "properties": {} },
            "a2": { "id": "a2", "parent": "a", "properties": {} },
            "b": { "id": "b", "parent": "__ROOT__", "properties": {} }
        }"#,
    )
    .unwrap();

    let mut indexer = Indexer::default();
    traverse(&mut indexer, &tree).unwrap();
    assert_eq!(indexer.seen, vec!["__ROOT__", "a", "a1", "a2", "b"]);
}

#[test]
fn test_snapshot_loads_from_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("domain.yaml");
    std::fs::write(
        &path,
        "__ROOT__:\n  id: __ROOT__\n  children: [x]\n  properties: { __node_name__: __ROOT__ }\n\
         x:\n  id: x\n  parent: __ROOT__\n  properties: { __node_name__: aggregation, uuid: x, name: Sales }\n",
    )
    .unwrap();

    let tree = DmTree::from_file(&path).unwrap();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.get("x").unwrap().kind, DmNodeKind::Aggregation);
    assert_eq!(tree.get("x").unwrap().name(), Some("Sales"));

    let other = dir.path().join("domain.txt");
    std::fs::write(&other, "").unwrap();
    assert!(matches!(DmTree::from_file(&other), Err(DmError::Validation { .. })));
}

proptest! {
    #[test]
    fn test_visit_order_ignores_insertion_order(ids in proptest::sample::subsequence(
        vec!["k", "c", "x", "a", "m", "b"], 1..6
    ).prop_shuffle()) {
        let mut shuffled = DmTree::default();
        for id in &ids {
            shuffled.add_root_child(node(id, json!({}))).unwrap();
        }
        let mut sorted_ids = ids.clone();
        sorted_ids.sort();
        let mut sorted = DmTree::default();
        for id in &sorted_ids {
            sorted.add_root_child(node(id, json!({}))).unwrap();
        }

        let mut left = Indexer::default();
        let mut right = Indexer::default();
        traverse(&mut left, &shuffled).unwrap();
        traverse(&mut right, &sorted).unwrap();
        prop_assert_eq!(left.seen, right.seen);
    }
}
