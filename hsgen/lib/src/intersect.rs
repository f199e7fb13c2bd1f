//! Shared definition across portals.
//!
//! Matching is by name only. An object, property, enum or association
//! survives when every portal has an entry with the same key; the surviving
//! entry is the first portal's version, even if later portals define it
//! differently.

use tracing::debug;

use crate::associations::AssociationTypes;
use crate::model::{CodeDefinition, Object};
use crate::portal::PortalModel;

/// Intersects the models of all portals.
///
/// No portals yields an empty model; a single portal is returned unchanged.
pub fn intersect(models: &[PortalModel]) -> PortalModel {
    let Some((first, rest)) = models.split_first() else {
        return PortalModel::default();
    };

    if rest.is_empty() {
        return first.clone();
    }

    let shared = PortalModel {
        code: intersect_code(&first.code, rest),
        association_types: intersect_associations(&first.association_types, rest),
    };

    debug!(
        portals = models.len(),
        objects = shared.code.objects.len(),
        enums = shared.code.enums.len(),
        associations = shared.association_types.len(),
        "Computed shared definition"
    );

    shared
}

fn intersect_code(first: &CodeDefinition, rest: &[PortalModel]) -> CodeDefinition {
    let objects = first
        .objects
        .iter()
        .filter_map(|object| intersect_object(object, rest))
        .collect();

    let enums = first
        .enums
        .iter()
        .filter(|e| rest.iter().all(|m| m.code.enum_named(&e.name).is_some()))
        .cloned()
        .collect();

    let object_name_to_type = first
        .object_name_to_type
        .iter()
        .filter(|(name, _)| {
            rest.iter()
                .all(|m| m.code.object_name_to_type.contains_key(*name))
        })
        .map(|(name, data)| (name.clone(), data.clone()))
        .collect();

    let object_ids = first
        .object_ids
        .iter()
        .filter(|(name, _)| rest.iter().all(|m| m.code.object_ids.contains_key(*name)))
        .map(|(name, id)| (name.clone(), id.clone()))
        .collect();

    CodeDefinition {
        object_name_to_type,
        enums,
        objects,
        object_ids,
    }
}

/// Keeps `object` when every other portal has it, trimmed to the common properties.
fn intersect_object(object: &Object, rest: &[PortalModel]) -> Option<Object> {
    let others: Vec<&Object> = rest
        .iter()
        .map(|m| m.code.object(&object.internal_name))
        .collect::<Option<_>>()?;

    let properties = object
        .properties
        .iter()
        .filter(|p| others.iter().all(|o| o.property(&p.name).is_some()))
        .cloned()
        .collect();

    Some(Object {
        properties,
        ..object.clone()
    })
}

fn intersect_associations(first: &AssociationTypes, rest: &[PortalModel]) -> AssociationTypes {
    let mut shared = AssociationTypes::new();

    // Only kept associations create levels, so pairs and from-objects left
    // without any association do not appear in the result.
    for (from, to, key, association) in first.entries() {
        if rest
            .iter()
            .all(|m| m.association_types.contains(from, to, key))
        {
            shared.insert_at(from, to, key, association.clone());
        }
    }

    shared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hubspot::{Association, Property, PropertyOption, Schema};
    use crate::model::SchemaMapper;

    fn prop(name: &str) -> Property {
        Property {
            name: name.to_string(),
            label: name.to_string(),
            kind: "string".to_string(),
            ..Default::default()
        }
    }

    fn picklist(name: &str, label: &str) -> Property {
        Property {
            name: name.to_string(),
            label: label.to_string(),
            kind: "enumeration".to_string(),
            options: vec![PropertyOption {
                label: "Open".to_string(),
                value: "open".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn schema(name: &str, id: &str, properties: Vec<Property>) -> Schema {
        Schema {
            name: name.to_string(),
            object_type_id: id.to_string(),
            properties,
            ..Default::default()
        }
    }

    fn assoc(type_id: i64) -> Association {
        Association {
            type_id,
            category: "HUBSPOT_DEFINED".to_string(),
            ..Default::default()
        }
    }

    fn model(schemas: &[Schema], associations: AssociationTypes) -> PortalModel {
        PortalModel::from_schemas(&SchemaMapper::new(), schemas, associations)
    }

    fn portal_a() -> PortalModel {
        let mut associations = AssociationTypes::new();
        associations.insert("deal", "contact", assoc(3));
        associations.insert("contact", "deal", assoc(4));
        model(
            &[
                schema(
                    "deal",
                    "0-3",
                    vec![prop("amount"), prop("dealname"), picklist("stage", "Stage")],
                ),
                schema("contact", "0-1", vec![prop("email")]),
            ],
            associations,
        )
    }

    fn portal_b() -> PortalModel {
        let mut associations = AssociationTypes::new();
        associations.insert("deal", "ticket", assoc(27));
        associations.insert("deal", "contact", assoc(3));
        model(
            &[
                schema("ticket", "0-5", vec![prop("subject")]),
                schema(
                    "deal",
                    "0-3",
                    vec![prop("dealname"), prop("custom_score"), picklist("stage", "Stage")],
                ),
            ],
            associations,
        )
    }

    #[test]
    fn no_portals_is_empty() {
        assert_eq!(intersect(&[]), PortalModel::default());
    }

    #[test]
    fn single_portal_is_identity() {
        let a = portal_a();
        assert_eq!(intersect(std::slice::from_ref(&a)), a);
    }

    #[test]
    fn identical_portals_are_idempotent() {
        let a = portal_a();
        let shared = intersect(&[a.clone(), a.clone(), a.clone()]);
        assert_eq!(shared, a);
    }

    #[test]
    fn empty_association_levels_are_dropped() {
        let mut associations = AssociationTypes::new();
        associations.ensure_from("ticket");
        associations.insert("deal", "contact", assoc(3));
        let a = model(&[schema("deal", "0-3", vec![])], associations.clone());
        associations.insert("deal", "company", assoc(5));
        let b = model(&[schema("deal", "0-3", vec![])], associations);

        let shared = intersect(&[a, b]);

        assert!(!shared.association_types.has_from("ticket"));
        assert!(shared.association_types.pair("deal", "company").is_none());
        assert_eq!(
            serde_json::to_value(&shared.association_types).unwrap()["deal"]
                .as_object()
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn shared_objects_and_properties() {
        let shared = intersect(&[portal_a(), portal_b()]);

        let names: Vec<&str> = shared
            .code
            .objects
            .iter()
            .map(|o| o.internal_name.as_str())
            .collect();
        assert_eq!(names, ["deal"]);

        let props: Vec<&str> = shared.code.objects[0]
            .properties
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(props, ["dealname", "stage"]);

        assert_eq!(
            shared.code.object_name_to_type.keys().collect::<Vec<_>>(),
            ["deal"]
        );
        assert_eq!(shared.code.object_ids.keys().collect::<Vec<_>>(), ["Deal"]);
    }

    #[test]
    fn shared_enums_by_name() {
        let shared = intersect(&[portal_a(), portal_b()]);
        let enums: Vec<&str> = shared.code.enums.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(enums, ["DealStageEnum"]);
    }

    #[test]
    fn shared_associations_by_full_path() {
        let shared = intersect(&[portal_a(), portal_b()]);

        assert!(shared.association_types.contains("deal", "contact", "deal_to_contact"));
        assert!(shared.association_types.pair("deal", "ticket").is_none());
        assert!(!shared.association_types.has_from("contact"));
        assert_eq!(shared.association_types.len(), 1);
    }

    #[test]
    fn first_portal_wins_on_divergent_types() {
        let a = model(&[schema("deal", "0-3", vec![prop("amount")])], AssociationTypes::new());
        let mut amount = prop("amount");
        amount.kind = "number".to_string();
        let b = model(&[schema("deal", "0-3", vec![amount])], AssociationTypes::new());

        let shared = intersect(&[a, b]);
        assert_eq!(shared.code.objects[0].properties[0].ts_type, "string");
    }

    #[test]
    fn shared_is_subset_of_every_portal() {
        let (a, b) = (portal_a(), portal_b());
        let shared = intersect(&[a.clone(), b.clone()]);

        for portal in [&a, &b] {
            for object in &shared.code.objects {
                let theirs = portal.code.object(&object.internal_name).unwrap();
                for p in &object.properties {
                    assert!(theirs.property(&p.name).is_some());
                }
            }
            for (from, to, key, _) in shared.association_types.entries() {
                assert!(portal.association_types.contains(from, to, key));
            }
        }
    }
}
