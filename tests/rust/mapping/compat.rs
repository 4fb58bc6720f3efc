//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Dmx.
//! The Dmx project belongs to the Dunimd project team.

use dmx::compat::{compatible_storage, enum_storage_type};
use dmx::lookup::{DmObjectLookup, DmObjectStore};
use dmx::model::{DmDataProperty, DmEnum, DmEnumBase};
use dmx::{compatible_targets, is_compatible, project_to_storage, DmStorageKind, DmStorageType, DmTypeExpr};

fn unresolved(_: &str) -> Option<DmTypeExpr> {
    None
}

fn column(uuid: &str, kind: DmStorageKind) -> DmDataProperty {
    DmDataProperty::new(uuid, uuid, kind.into())
}

#[test]
fn test_exact_compatibility_pairs() {
    let integer = DmTypeExpr::base("Integer");
    let list = DmTypeExpr::list(DmTypeExpr::base("Integer"));
    let reference = DmTypeExpr::reference("r", "Ref");

    assert!(is_compatible(&integer, &DmStorageKind::Integer.into(), unresolved));
    assert!(!is_compatible(&integer, &DmStorageKind::String.into(), unresolved));
    assert!(!is_compatible(&reference, &DmStorageKind::String.into(), unresolved));
    assert!(is_compatible(&reference, &DmStorageKind::String.into(), |_| Some(DmTypeExpr::base("String"))));
    assert!(is_compatible(&list, &DmStorageKind::Json.into(), unresolved));
    assert!(!is_compatible(&list, &DmStorageKind::String.into(), unresolved));
}

#[test]
fn test_every_listed_kind_is_compatible() {
    for base in ["String", "Char", "Integer", "Long", "Short", "Byte", "Float", "Double", "BigDecimal", "Boolean", "Date"] {
        let ty = DmTypeExpr::base(base);
        assert!(!compatible_storage(base).is_empty(), "{} has no storage", base);
        for kind in compatible_storage(base) {
            assert!(is_compatible(&ty, &DmStorageType::of_kind(*kind), unresolved));
        }
        assert!(!is_compatible(&ty, &DmStorageType::Json, unresolved));
    }
}

#[test]
fn test_compatible_targets_keep_declaration_order() {
    let targets = vec![
        column("a", DmStorageKind::Integer),
        column("b", DmStorageKind::LongText),
        column("c", DmStorageKind::String),
        column("d", DmStorageKind::Json),
    ];

    let text: Vec<&str> = compatible_targets(&DmTypeExpr::base("String"), &targets, unresolved)
        .into_iter()
        .map(|p| p.base.uuid.as_str())
        .collect();
    assert_eq!(text, vec!["b", "c"]);

    let set = DmTypeExpr::set(DmTypeExpr::base("String"));
    let json: Vec<&str> = compatible_targets(&set, &targets, unresolved)
        .into_iter()
        .map(|p| p.base.uuid.as_str())
        .collect();
    assert_eq!(json, vec!["d"]);
}

#[test]
fn test_enums_store_by_their_base() {
    let store = DmObjectStore::new()
        .with_enum(DmEnum::new("n", "Level", DmEnumBase::Number), None)
        .with_enum(DmEnum::new("s", "Colour", DmEnumBase::String), None);

    let level = DmTypeExpr::reference("n", "Level");
    let colour = DmTypeExpr::reference("s", "Colour");
    assert_eq!(
        project_to_storage(Some(&level), Some(&store)).map(|t| t.kind()),
        Some(DmStorageKind::Integer)
    );
    assert_eq!(
        project_to_storage(Some(&colour), Some(&store)).map(|t| t.kind()),
        Some(DmStorageKind::String)
    );
    assert_eq!(project_to_storage(Some(&DmTypeExpr::reference("x", "X")), Some(&store)), None);

    assert_eq!(store.reference_storage("n"), Some(DmTypeExpr::base("Integer")));
    assert_eq!(
        enum_storage_type(&DmEnum::new("s", "Colour", DmEnumBase::String)),
        DmTypeExpr::base("String")
    );
    assert!(is_compatible(&level, &DmStorageKind::Long.into(), |id| store.reference_storage(id)));
    assert!(!is_compatible(&colour, &DmStorageKind::Long.into(), |id| store.reference_storage(id)));
}
