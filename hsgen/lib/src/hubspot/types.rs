//! Wire types for the HubSpot CRM schema and association APIs.
//!
//! Only the fields the generator reads are modelled; everything else in the
//! responses is ignored. The same types are used for the on-disk snapshot, so
//! they serialize back to the shape they were read from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

/// HubSpot sends `null` for several optional strings; treat it as empty.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response of `GET /crm-object-schemas/v3/schemas`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaResponse {
    #[serde(default)]
    pub results: Vec<Schema>,
}

/// Singular and plural display labels of an object type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectLabels {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub singular: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub plural: String,
}

/// One CRM object type, built-in or custom.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    /// API identifier such as `0-3` (deals) or `2-1234567` (custom objects).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub object_type_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fully_qualified_name: String,
    #[serde(default)]
    pub labels: ObjectLabels,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A property of a [`Schema`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub label: String,
    /// Declared CRM type (`string`, `number`, `enumeration`, `datetime`, ...).
    #[serde(rename = "type", default, deserialize_with = "null_as_empty")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub field_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub group_name: String,
    #[serde(default)]
    pub options: Vec<PropertyOption>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub hubspot_defined: bool,
}

/// A picklist option of an enumeration [`Property`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyOption {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub label: String,
    /// The wire value stored on records.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub value: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub hidden: bool,
}

/// Who defined an association type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum AssociationCategory {
    #[strum(serialize = "HUBSPOT_DEFINED", to_string = "HubspotDefined")]
    HubspotDefined,
    #[strum(serialize = "USER_DEFINED", to_string = "UserDefined")]
    UserDefined,
    #[strum(serialize = "INTEGRATOR_DEFINED", to_string = "IntegratorDefined")]
    IntegratorDefined,
}

/// One association label between two object types.
///
/// `sanitized_label` is not part of the API response; it is filled in when the
/// association is stored under its generated key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    #[serde(rename = "typeId")]
    pub type_id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub label: String,
    /// Wire category, e.g. `HUBSPOT_DEFINED`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sanitized_label: String,
}

impl Association {
    /// Parsed category, or `None` for categories this crate does not know.
    pub fn parsed_category(&self) -> Option<AssociationCategory> {
        self.category.parse().ok()
    }

    /// Name of the `AssociationSpecAssociationCategoryEnum` member for this association.
    ///
    /// Unknown wire categories are passed through verbatim.
    pub fn category_member(&self) -> String {
        self.parsed_category()
            .map(|c| c.to_string())
            .unwrap_or_else(|| self.category.clone())
    }
}

/// Response of `GET /crm/v4/associations/{from}/{to}/labels`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssociationLabelResponse {
    #[serde(default)]
    pub results: Vec<Association>,
}
