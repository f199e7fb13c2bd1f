//! Mapping from fetched schemas to generation-ready records.
//!
//! [`SchemaMapper`] turns one portal's [`Schema`] list into a
//! [`CodeDefinition`]: interface names per object type, one [`Object`] per
//! schema with TypeScript property types, and the enums derived from
//! picklist properties. The mapping is pure and keeps the input order.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::hubspot::{Property as SchemaProperty, PropertyOption, Schema};
use crate::sanitize::{
    label_to_enum_name, prepend_underscore_to_enum, sanitize_label, schema_name_to_interface_name,
};

/// CRM property types that map to a different TypeScript type.
///
/// Types not listed here are emitted verbatim (`string`, `number`, ...).
pub const TYPE_CONVERSIONS: [(&str, &str); 6] = [
    ("date", "string"),
    ("datetime", "string"),
    ("bool", "boolean"),
    ("object_coordinates", "string"),
    ("json", "string"),
    ("phone_number", "string"),
];

const ENUMERATION: &str = "enumeration";

/// Returns the TypeScript type for a non-enumeration CRM property type.
///
/// ## Examples
///
/// ```
/// use hsgen_lib::model::convert_property_type;
///
/// assert_eq!(convert_property_type("datetime"), "string");
/// assert_eq!(convert_property_type("bool"), "boolean");
/// assert_eq!(convert_property_type("number"), "number");
/// ```
pub fn convert_property_type(kind: &str) -> &str {
    TYPE_CONVERSIONS
        .iter()
        .find(|(from, _)| *from == kind)
        .map(|(_, to)| *to)
        .unwrap_or(kind)
}

/// Per-object-type naming data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaData {
    pub object_id: String,
    pub interface_name: String,
    pub description: String,
}

/// One member of a generated enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    /// Wire value with `"` already escaped for a double-quoted string literal.
    pub value: String,
}

/// A TypeScript enum generated from a picklist property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDefinition {
    /// Full type name, ending in `Enum`.
    pub name: String,
    pub members: Vec<EnumMember>,
}

impl EnumDefinition {
    /// Builds the members from picklist options.
    ///
    /// Members whose sanitized names collide keep the first position and the
    /// last value.
    fn from_options(name: String, options: &[PropertyOption]) -> Self {
        let mut members: Vec<EnumMember> = Vec::with_capacity(options.len());

        for option in options {
            let mut label = sanitize_label(&option.label);
            if label.is_empty() {
                label = "_".to_string();
            }
            let member_name = prepend_underscore_to_enum(&label);
            let value = option.value.replace('"', "\\\"");

            match members.iter_mut().find(|m| m.name == member_name) {
                Some(existing) => existing.value = value,
                None => members.push(EnumMember {
                    name: member_name,
                    value,
                }),
            }
        }

        Self { name, members }
    }
}

/// A property of a generated interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    /// TypeScript type: a primitive or a generated enum name.
    pub ts_type: String,
    /// Property description, emitted as a doc comment when non-empty.
    pub comment: String,
}

/// A generated interface for one object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    /// Object type id (`0-3`, `2-1234`).
    pub id: String,
    /// Lowercase schema name; the key used in every lookup table.
    pub internal_name: String,
    pub interface_name: String,
    pub properties: Vec<Property>,
}

impl Object {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Everything the emitter needs to know about one portal's object types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeDefinition {
    /// Lowercase schema name -> naming data.
    pub object_name_to_type: BTreeMap<String, SchemaData>,
    pub enums: Vec<EnumDefinition>,
    pub objects: Vec<Object>,
    /// Interface name -> object type id.
    pub object_ids: BTreeMap<String, String>,
}

impl CodeDefinition {
    pub fn object(&self, internal_name: &str) -> Option<&Object> {
        self.objects.iter().find(|o| o.internal_name == internal_name)
    }

    pub fn enum_named(&self, name: &str) -> Option<&EnumDefinition> {
        self.enums.iter().find(|e| e.name == name)
    }
}

/// Converts schemas into a [`CodeDefinition`].
///
/// ## Examples
///
/// ```
/// use hsgen_lib::hubspot::Schema;
/// use hsgen_lib::model::SchemaMapper;
///
/// let schemas = vec![Schema {
///     name: "line_item".to_string(),
///     object_type_id: "0-8".to_string(),
///     ..Default::default()
/// }];
///
/// let code = SchemaMapper::new().interface_suffix("Props").map(&schemas);
/// assert_eq!(code.object_name_to_type["line_item"].interface_name, "LineItemProps");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaMapper {
    interface_suffix: String,
}

impl SchemaMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `suffix` to every generated interface name.
    pub fn interface_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.interface_suffix = suffix.into();
        self
    }

    pub fn interface_name(&self, schema_name: &str) -> String {
        format!(
            "{}{}",
            schema_name_to_interface_name(schema_name),
            self.interface_suffix
        )
    }

    /// Maps every schema, in order.
    pub fn map(&self, schemas: &[Schema]) -> CodeDefinition {
        let mut code = CodeDefinition {
            object_name_to_type: self.map_schema_data(schemas),
            ..Default::default()
        };

        // Enum names are unique per portal; a later property deriving the
        // same name reuses the first enum even if its options differ.
        let mut created_enums: HashSet<String> = HashSet::new();

        for schema in schemas {
            let internal_name = schema.name.to_lowercase();
            let interface_name = code
                .object_name_to_type
                .get(&internal_name)
                .map(|data| data.interface_name.clone())
                .unwrap_or_else(|| self.interface_name(&schema.name));

            let properties = schema
                .properties
                .iter()
                .map(|prop| {
                    let ts_type =
                        map_property_type(prop, &interface_name, &mut created_enums, &mut code.enums);
                    Property {
                        name: prop.name.clone(),
                        ts_type,
                        comment: prop.description.clone(),
                    }
                })
                .collect();

            code.object_ids
                .insert(interface_name.clone(), schema.object_type_id.clone());
            code.objects.push(Object {
                id: schema.object_type_id.clone(),
                internal_name,
                interface_name,
                properties,
            });
        }

        code
    }

    fn map_schema_data(&self, schemas: &[Schema]) -> BTreeMap<String, SchemaData> {
        schemas
            .iter()
            .map(|schema| {
                (
                    schema.name.to_lowercase(),
                    SchemaData {
                        object_id: schema.object_type_id.clone(),
                        interface_name: self.interface_name(&schema.name),
                        description: schema.description.clone(),
                    },
                )
            })
            .collect()
    }
}

/// Resolves the TypeScript type of one property, creating its enum on first use.
fn map_property_type(
    prop: &SchemaProperty,
    interface_name: &str,
    created_enums: &mut HashSet<String>,
    enums: &mut Vec<EnumDefinition>,
) -> String {
    if prop.kind != ENUMERATION {
        return convert_property_type(&prop.kind).to_string();
    }

    if prop.options.is_empty() {
        return "string".to_string();
    }

    let enum_name = format!(
        "{}{}Enum",
        interface_name,
        label_to_enum_name(&prop.label)
    );

    if created_enums.insert(enum_name.clone()) {
        enums.push(EnumDefinition::from_options(enum_name.clone(), &prop.options));
    }

    enum_name
}
