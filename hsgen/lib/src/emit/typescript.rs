//! TypeScript declarations for the pieces of a [`PortalModel`](crate::portal::PortalModel).
//!
//! Every function returns a self-contained block of source text ending in a
//! newline. Ordering follows the model: enums and interfaces in fetch order,
//! keyed tables in key order.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::associations::AssociationTypes;
use crate::model::{CodeDefinition, EnumDefinition, Object};

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("IDENTIFIER pattern is valid")
});

/// Object key: bare when it is a valid identifier, quoted otherwise.
pub fn ts_key(name: &str) -> String {
    if IDENTIFIER.is_match(name) {
        name.to_string()
    } else {
        format!("{name:?}")
    }
}

/// Double-quoted string literal.
pub fn ts_string(value: &str) -> String {
    format!("{value:?}")
}

/// A `/** ... */` comment line, or nothing for an empty text.
fn doc_comment(text: &str, indent: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    let text = text.replace("*/", "*\\/").replace(['\r', '\n'], " ");
    format!("{indent}/** {text} */\n")
}

pub fn enum_block(e: &EnumDefinition) -> String {
    let mut code = format!("export enum {} {{\n", e.name);
    for member in &e.members {
        code.push_str(&format!("  {} = \"{}\",\n", member.name, member.value));
    }
    code.push_str("}\n");
    code
}

pub fn enums(code: &CodeDefinition) -> String {
    code.enums
        .iter()
        .map(enum_block)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn interface_block(object: &Object) -> String {
    let mut code = format!("export interface {} {{\n", object.interface_name);
    for prop in &object.properties {
        code.push_str(&doc_comment(&prop.comment, "  "));
        code.push_str(&format!("  {}: {};\n", ts_key(&prop.name), prop.ts_type));
    }
    code.push_str("}\n");
    code
}

pub fn interfaces(code: &CodeDefinition) -> String {
    code.objects
        .iter()
        .map(interface_block)
        .collect::<Vec<_>>()
        .join("\n")
}

/// `ObjectTypes` (object name -> interface) and the `TypeKeys` union.
pub fn object_types(code: &CodeDefinition) -> String {
    let mut out = String::from("export interface ObjectTypes {\n");
    for (name, data) in &code.object_name_to_type {
        out.push_str(&format!("  {}: {};\n", ts_key(name), data.interface_name));
    }
    out.push_str("}\n\n");
    out.push_str("export type TypeKeys = keyof ObjectTypes;\n");
    out
}

/// `TypeToObjectIDList`: object name -> object type id.
pub fn type_to_object_id_list(code: &CodeDefinition) -> String {
    let mut out = String::from("export const TypeToObjectIDList = {\n");
    for (name, data) in &code.object_name_to_type {
        out.push_str(&format!(
            "  {}: {},\n",
            ts_key(name),
            ts_string(&data.object_id)
        ));
    }
    out.push_str("} as const;\n\n");
    out.push_str("export type TypeToObjectIDList = typeof TypeToObjectIDList;\n");
    out
}

/// `AssociationsConfig` plus its companion types.
///
/// Every object of the model gets a from-entry, even without associations;
/// pairs without associations are left out.
pub fn associations_config(code: &CodeDefinition, associations: &AssociationTypes) -> String {
    let from_names: BTreeSet<&str> = code
        .object_name_to_type
        .keys()
        .map(String::as_str)
        .chain(associations.iter().map(|(from, _)| from.as_str()))
        .collect();

    let mut out = String::from("export const AssociationsConfig = {\n");
    for from in from_names {
        out.push_str(&format!("  {}: {{\n", ts_key(from)));

        let targets = associations.iter().find(|(f, _)| f.as_str() == from);
        for (to, map) in targets.into_iter().flat_map(|(_, targets)| targets) {
            if map.is_empty() {
                continue;
            }
            out.push_str(&format!("    {}: {{\n", ts_key(to)));
            for (key, assoc) in map {
                out.push_str(&format!("      {}: {{\n", ts_key(key)));
                out.push_str(&format!("        ID: {},\n", assoc.type_id));
                out.push_str(&format!(
                    "        Category: AssociationSpecAssociationCategoryEnum.{},\n",
                    assoc.category_member()
                ));
                out.push_str("      },\n");
            }
            out.push_str("    },\n");
        }

        out.push_str("  },\n");
    }
    out.push_str("} as const;\n\n");
    out.push_str("export type AssociationsConfig = typeof AssociationsConfig;\n");
    out.push_str(
        "export type AssociationKeys<\n  F extends keyof AssociationsConfig,\n  T extends keyof AssociationsConfig[F],\n> = keyof AssociationsConfig[F][T];\n",
    );
    out
}

/// The `public api = { ... }` block closing the client class.
pub fn client_api(code: &CodeDefinition) -> String {
    let mut out = String::from("\n  public api = {\n");
    for (name, data) in &code.object_name_to_type {
        let literal = ts_string(name);
        out.push_str(&doc_comment(&data.description, "    "));
        out.push_str(&format!("    {}: {{\n", ts_key(name)));
        out.push_str(&format!(
            "      get: this.getObjectTypeFunction({literal}),\n"
        ));
        out.push_str(&format!(
            "      create: this.createObjectTypeFunction({literal}),\n"
        ));
        out.push_str(&format!(
            "      update: this.updateObjectTypeFunction({literal}),\n"
        ));
        out.push_str(&format!(
            "      getAssociations: this.getAssociationsObjectTypeFunction({literal}),\n"
        ));
        out.push_str(&format!(
            "      associate: this.associateObjectTypeFunction({literal}),\n"
        ));
        out.push_str("    },\n");
    }
    out.push_str("  };\n}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hubspot::Association;
    use crate::model::{EnumMember, Property, SchemaData};

    fn code() -> CodeDefinition {
        let mut code = CodeDefinition::default();
        code.object_name_to_type.insert(
            "deal".to_string(),
            SchemaData {
                object_id: "0-3".to_string(),
                interface_name: "Deal".to_string(),
                description: "Deals */ pipeline".to_string(),
            },
        );
        code.object_name_to_type.insert(
            "contact".to_string(),
            SchemaData {
                object_id: "0-1".to_string(),
                interface_name: "Contact".to_string(),
                description: String::new(),
            },
        );
        code.objects.push(Object {
            id: "0-3".to_string(),
            internal_name: "deal".to_string(),
            interface_name: "Deal".to_string(),
            properties: vec![
                Property {
                    name: "amount".to_string(),
                    ts_type: "number".to_string(),
                    comment: "The total amount".to_string(),
                },
                Property {
                    name: "2nd-owner".to_string(),
                    ts_type: "string".to_string(),
                    comment: String::new(),
                },
            ],
        });
        code
    }

    #[test]
    fn keys_are_quoted_only_when_needed() {
        assert_eq!(ts_key("line_item"), "line_item");
        assert_eq!(ts_key("2nd-owner"), "\"2nd-owner\"");
    }

    #[test]
    fn enum_block_lists_members() {
        let e = EnumDefinition {
            name: "DealStageEnum".to_string(),
            members: vec![
                EnumMember {
                    name: "closed_won".to_string(),
                    value: "closedwon".to_string(),
                },
                EnumMember {
                    name: "_1st".to_string(),
                    value: "say \\\"hi\\\"".to_string(),
                },
            ],
        };

        assert_eq!(
            enum_block(&e),
            "export enum DealStageEnum {\n  closed_won = \"closedwon\",\n  _1st = \"say \\\"hi\\\"\",\n}\n"
        );
    }

    #[test]
    fn interface_includes_comments() {
        let text = interface_block(&code().objects[0]);
        assert_eq!(
            text,
            "export interface Deal {\n  /** The total amount */\n  amount: number;\n  \"2nd-owner\": string;\n}\n"
        );
    }

    #[test]
    fn object_tables_are_sorted_by_name() {
        let code = code();
        let types = object_types(&code);
        assert!(types.find("contact: Contact;").unwrap() < types.find("deal: Deal;").unwrap());

        let ids = type_to_object_id_list(&code);
        assert!(ids.contains("  deal: \"0-3\",\n"));
        assert!(ids.contains("} as const;"));
    }

    #[test]
    fn associations_config_skips_empty_pairs() {
        // Snapshots written by older runs may still hold empty pairs.
        let mut associations: AssociationTypes =
            serde_json::from_value(serde_json::json!({"contact": {"deal": {}}})).unwrap();
        associations.insert(
            "deal",
            "contact",
            Association {
                type_id: 3,
                category: "HUBSPOT_DEFINED".to_string(),
                ..Default::default()
            },
        );
        associations.insert(
            "deal",
            "contact",
            Association {
                type_id: 17,
                label: "Champion".to_string(),
                category: "USER_DEFINED".to_string(),
                ..Default::default()
            },
        );

        let text = associations_config(&code(), &associations);
        assert!(text.contains(
            "  deal: {\n    contact: {\n      deal_to_contact: {\n        ID: 3,\n        Category: AssociationSpecAssociationCategoryEnum.HubspotDefined,\n      },\n"
        ));
        assert!(text.contains("Category: AssociationSpecAssociationCategoryEnum.UserDefined"));
        assert!(text.contains("  contact: {\n  },\n"));
        assert!(text.contains("export type AssociationKeys<"));
    }

    #[test]
    fn client_api_escapes_description() {
        let text = client_api(&code());
        assert!(text.contains("    /** Deals *\\/ pipeline */\n    deal: {\n"));
        assert!(text.contains("      get: this.getObjectTypeFunction(\"deal\"),\n"));
        assert!(text.contains("      associate: this.associateObjectTypeFunction(\"contact\"),\n"));
        assert!(text.ends_with("  };\n}\n"));
    }
}
