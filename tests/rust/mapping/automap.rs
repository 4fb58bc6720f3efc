//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Dmx.
//! The Dmx project belongs to the Dunimd project team.

use std::collections::BTreeMap;

use dmx::model::{DmDataProperty, DmProperty};
use dmx::{auto_map, is_compatible, DmAutoMapConfig, DmStorageKind, DmTypeExpr};
use proptest::prelude::*;

fn resolve(id: &str) -> Option<DmTypeExpr> {
    (id == "status").then(|| DmTypeExpr::base("String"))
}

fn sources() -> Vec<DmProperty> {
    vec![
        DmProperty::new("s-foo", "foo", DmTypeExpr::base("Char")),
        DmProperty::new("s-bar", "bar", DmTypeExpr::base("String")),
        DmProperty::new("s-enum", "enum", DmTypeExpr::reference("status", "Status")),
    ]
}

fn targets() -> Vec<DmDataProperty> {
    vec![
        DmDataProperty::new("t-foooo", "foooo", DmStorageKind::Integer.into()),
        DmDataProperty::new("t-baz", "baz", DmStorageKind::LongText.into()),
        DmDataProperty::new("t-barrr", "barrr", DmStorageKind::Integer.into()),
        DmDataProperty::new("t-enumm", "enumm", DmStorageKind::String.into()),
    ]
}

fn assert_all_compatible(mapping: &BTreeMap<String, String>, sources: &[DmProperty], targets: &[DmDataProperty]) {
    for (source, target) in mapping {
        let source = sources.iter().find(|p| &p.base.uuid == source).unwrap();
        let target = targets.iter().find(|p| &p.base.uuid == target).unwrap();
        assert!(is_compatible(source.ty.as_ref().unwrap(), &target.ty, resolve));
    }
}

#[test]
fn test_best_compatible_candidate_wins() {
    let (sources, targets) = (sources(), targets());
    let mapping = auto_map(&sources, &targets, resolve, &DmAutoMapConfig::default());

    assert_eq!(mapping.get("s-bar").map(String::as_str), Some("t-baz"));
    assert_eq!(mapping.get("s-enum").map(String::as_str), Some("t-enumm"));
    assert_eq!(mapping.get("s-foo"), None);
    assert_all_compatible(&mapping, &sources, &targets);
}

#[test]
fn test_inputs_are_untouched() {
    let (sources, targets) = (sources(), targets());
    let before = (sources.clone(), targets.clone());
    let _ = auto_map(&sources, &targets, resolve, &DmAutoMapConfig::default());
    assert_eq!((sources, targets), before);
}

#[test]
fn test_unnamed_sources_and_targets_are_ignored() {
    let sources = vec![DmProperty::new("s", "", DmTypeExpr::base("String"))];
    let targets = vec![DmDataProperty::new("t", "", DmStorageKind::String.into())];
    assert!(auto_map(&sources, &targets, resolve, &DmAutoMapConfig::default()).is_empty());
}

proptest! {
    #[test]
    fn test_mappings_never_break_compatibility(threshold in 0.0f64..1.0, case_insensitive in any::<bool>()) {
        let (sources, targets) = (sources(), targets());
        let config = DmAutoMapConfig { threshold, case_insensitive };
        let mapping = auto_map(&sources, &targets, resolve, &config);
        assert_all_compatible(&mapping, &sources, &targets);
    }
}
