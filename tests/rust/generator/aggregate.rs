//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Dmx.
//! The Dmx project belongs to the Dunimd project team.

use std::collections::HashSet;

use dmx::generator::{generate_aggregate, DmDtoSynthesizer, DmGeneration};
use dmx::ident::{DmSequentialIds, DmUuidGenerator};
use dmx::lookup::DmObjectStore;
use dmx::model::{
    DmDataObject, DmEntity, DmEnum, DmEnumBase, DmNameModel, DmObjectReferenceSource, DmProperty, DmValueObject,
};
use dmx::{DmError, DmStorageKind, DmTypeExpr};

fn order() -> DmEntity {
    let mut root = DmEntity::new("order", "Order")
        .with_id_property(DmProperty::new("o-id", "id", DmTypeExpr::base("Long")))
        .with_property(DmProperty::new("o-created", "createdAt", DmTypeExpr::base("Date")))
        .with_property(DmProperty::new("o-status", "status", DmTypeExpr::reference("status", "Status")))
        .as_aggregation_root();
    root.class.base = DmNameModel::new("order", "Order").with_title("Order");
    root
}

fn store() -> DmObjectStore {
    DmObjectStore::new().with_enum(DmEnum::new("status", "Status", DmEnumBase::Number), None)
}

fn generate(root: &DmEntity, store: &DmObjectStore) -> DmGeneration {
    generate_aggregate(root, store, &DmSequentialIds::new("gen")).unwrap()
}

#[test]
fn test_schema_is_derived_from_the_root() {
    let generation = generate(&order(), &store());
    let data_object = &generation.data_object;
    assert_eq!(data_object.base.name, "OrderDO");

    let column = |name: &str| data_object.properties.iter().find(|p| p.base.name == name).unwrap();
    let id = column("id");
    assert_eq!(id.primary_key, Some(true));
    assert_eq!(id.not_null, Some(true));
    assert!(matches!(
        column("createdAt").ty.kind(),
        DmStorageKind::DateTime | DmStorageKind::Date | DmStorageKind::Timestamp
    ));
    assert_eq!(column("status").ty.kind(), DmStorageKind::Integer);
    assert_eq!(column("status").primary_key, None);

    assert_eq!(generation.mapper.mappers.len(), 3);
    assert_eq!(generation.mapper.base.name, "OrderToOrderDO");
    assert_eq!(generation.mapper.source.as_ref().unwrap().source, Some(DmObjectReferenceSource::Domain));
    for pair in &generation.mapper.mappers {
        let source = order()
            .class
            .properties
            .iter()
            .find(|p| Some(&p.base.uuid) == pair.source.as_ref())
            .map(|p| p.base.name.clone())
            .unwrap();
        let target = data_object.property(pair.target.as_deref().unwrap()).unwrap();
        assert_eq!(source, target.base.name);
    }
}

#[test]
fn test_dto_side_carries_primitive_enums() {
    let generation = generate(&order(), &store());

    assert_eq!(generation.dtos.len(), 1);
    let dto = &generation.dtos[0];
    assert_eq!(dto.class.name(), "OrderDTO");
    assert_eq!(dto.class.base.title.as_deref(), Some("Order data transfer object"));
    let status = dto.class.properties.iter().find(|p| p.base.name == "status").unwrap();
    assert_eq!(status.ty, Some(DmTypeExpr::base("Integer")));

    assert_eq!(generation.dto_mapper.base.name, "OrderDTOToOrderDO");
    assert_eq!(generation.dto_mapper.mappers.len(), 3);
    assert_eq!(
        generation.dto_mapper.source.as_ref().unwrap().source,
        Some(DmObjectReferenceSource::Struct)
    );
}

#[test]
fn test_queries_point_at_the_root_dto() {
    let generation = generate(&order(), &store());
    let dto_uuid = generation.dtos[0].class.uuid();

    let detail = &generation.query.detail_query;
    assert_eq!(detail.base.name, "OrderQuery");
    assert_eq!(detail.properties.len(), 1);
    assert_eq!(detail.properties[0].base.name, "id");
    assert_ne!(detail.properties[0].base.uuid, "o-id");
    assert_eq!(detail.result.as_ref().and_then(|t| t.reference_id()), Some(dto_uuid));

    let page = &generation.query.page_query;
    assert_eq!(page.base.name, "OrderPageQuery");
    assert!(page.pagination);
    assert!(page.properties.is_empty());
    assert_eq!(page.result.as_ref().and_then(|t| t.reference_id()), Some(dto_uuid));
}

#[test]
fn test_shared_value_object_gets_one_dto() {
    let address = DmValueObject::new("addr", "Address")
        .with_property(DmProperty::new("a-street", "street", DmTypeExpr::base("String")));
    let line = DmEntity::new("line", "Line")
        .with_id_property(DmProperty::new("l-id", "id", DmTypeExpr::base("Long")))
        .with_property(DmProperty::new("l-ship", "shipTo", DmTypeExpr::reference("addr", "Address")));
    let root = order()
        .with_property(DmProperty::new("o-bill", "billTo", DmTypeExpr::reference("addr", "Address")))
        .with_property(DmProperty::new(
            "o-lines",
            "lines",
            DmTypeExpr::list(DmTypeExpr::reference("line", "Line")),
        ));
    let store = store().with_value_object(address, None).with_entity(line, None);

    let generation = generate(&root, &store);
    let names: Vec<&str> = generation.dtos.iter().map(|d| d.class.name()).collect();
    assert_eq!(names, vec!["OrderDTO", "AddressDTO", "LineDTO"]);

    let address_uuid = generation.dtos[1].class.uuid();
    let bill = generation.dtos[0].class.properties.iter().find(|p| p.base.name == "billTo").unwrap();
    let ship = generation.dtos[2].class.properties.iter().find(|p| p.base.name == "shipTo").unwrap();
    assert_eq!(bill.ty.as_ref().and_then(|t| t.reference_id()), Some(address_uuid));
    assert_eq!(ship.ty.as_ref().and_then(|t| t.reference_id()), Some(address_uuid));

    let lines = generation.dtos[0].class.properties.iter().find(|p| p.base.name == "lines").unwrap();
    assert_eq!(
        lines.ty,
        Some(DmTypeExpr::list(DmTypeExpr::reference(generation.dtos[2].class.uuid(), "LineDTO")))
    );
    assert!(generation.data_object.properties.iter().all(|p| p.base.name != "lines"));
}

#[test]
fn test_generated_uuids_are_fresh() {
    let generation = generate_aggregate(&order(), &store(), &DmUuidGenerator::new()).unwrap();

    let mut uuids = vec![
        generation.query.detail_query.base.uuid.clone(),
        generation.query.page_query.base.uuid.clone(),
        generation.data_object.base.uuid.clone(),
        generation.mapper.base.uuid.clone(),
        generation.dto_mapper.base.uuid.clone(),
    ];
    uuids.extend(generation.dtos.iter().map(|d| d.class.uuid().to_string()));
    uuids.extend(generation.data_object.properties.iter().map(|p| p.base.uuid.clone()));
    uuids.extend(generation.mapper.mappers.iter().map(|m| m.uuid.clone()));

    let distinct: HashSet<&String> = uuids.iter().collect();
    assert_eq!(distinct.len(), uuids.len());
    assert!(uuids.iter().all(|u| !["order", "o-id", "o-created", "o-status"].contains(&u.as_str())));
}

#[test]
fn test_unsupported_references_abort_the_run() {
    let root = order().with_property(DmProperty::new("o-row", "row", DmTypeExpr::reference("row", "Row")));
    let store = store().with_data_object(DmDataObject::new("row", "Row"));
    let err = generate_aggregate(&root, &store, &DmSequentialIds::default()).unwrap_err();
    assert!(matches!(err, DmError::UnsupportedReference { ref id, .. } if id == "row"));
}

#[test]
fn test_roots_need_an_identifier() {
    let root = DmEntity::new("bare", "Bare").as_aggregation_root();
    let err = generate_aggregate(&root, &store(), &DmSequentialIds::default()).unwrap_err();
    assert!(matches!(err, DmError::Validation { .. }));
}

#[test]
fn test_synthesizer_memo_is_per_instance() {
    let address = DmValueObject::new("addr", "Address");
    let store = DmObjectStore::new();
    let ids = DmSequentialIds::new("s");

    let mut first = DmDtoSynthesizer::new(&store, &ids);
    let a = first.synthesize(&address.class).unwrap();
    let b = first.synthesize(&address.class).unwrap();
    assert_eq!(a, b);

    let mut second = DmDtoSynthesizer::new(&store, &ids);
    let c = second.synthesize(&address.class).unwrap();
    assert_ne!(a.reference_id(), c.reference_id());
}
