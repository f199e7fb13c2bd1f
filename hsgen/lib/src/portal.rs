//! Per-portal records: what is configured, what is fetched, what is generated from it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::associations::AssociationTypes;
use crate::hubspot::Schema;
use crate::model::{CodeDefinition, SchemaMapper};

/// One configured tenant.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct PortalConfig {
    pub name: String,
    pub token: String,
}

impl PortalConfig {
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: token.into(),
        }
    }
}

impl fmt::Debug for PortalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortalConfig")
            .field("name", &self.name)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// The generation-ready view of a portal (or of the intersection of several).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalModel {
    pub code: CodeDefinition,
    pub association_types: AssociationTypes,
}

impl PortalModel {
    pub fn from_schemas(
        mapper: &SchemaMapper,
        schemas: &[Schema],
        association_types: AssociationTypes,
    ) -> Self {
        Self {
            code: mapper.map(schemas),
            association_types,
        }
    }
}

/// A loaded portal: its name, the raw schemas and the mapped model.
#[derive(Debug, Clone)]
pub struct PortalDefinition {
    pub name: String,
    pub schemas: Vec<Schema>,
    pub model: PortalModel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_token() {
        let config = PortalConfig::new("acme", "pat-secret");
        let debug = format!("{config:?}");
        assert!(debug.contains("acme"));
        assert!(!debug.contains("pat-secret"));
    }

    #[test]
    fn model_from_schemas_maps_every_schema() {
        let schemas = vec![
            Schema {
                name: "deal".to_string(),
                object_type_id: "0-3".to_string(),
                ..Default::default()
            },
            Schema {
                name: "contact".to_string(),
                object_type_id: "0-1".to_string(),
                ..Default::default()
            },
        ];

        let model =
            PortalModel::from_schemas(&SchemaMapper::new(), &schemas, AssociationTypes::new());
        assert_eq!(model.code.objects.len(), 2);
        assert_eq!(model.code.object_ids["Contact"], "0-1");
        assert!(model.association_types.is_empty());
    }
}
