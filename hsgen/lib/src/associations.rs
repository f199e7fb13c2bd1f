//! Association type table: `from object -> to object -> association key -> association`.
//!
//! Keys are generated from the object names and the sanitized label:
//!
//! - unlabeled: `{from}_to_{to}`
//! - labeled: `{from}_to_{to}_{sanitized_label}`
//!
//! When a key is already taken within its `(from, to)` pair, `2` is appended
//! once. A third association with the same base key lands on the `2` key
//! again and replaces the second one, so key assignment depends on the order
//! the API returned the labels in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::hubspot::{Association, HubspotClient, Schema};
use crate::sanitize::sanitize_label;

/// Associations keyed by generated key, for one `(from, to)` pair.
pub type AssociationMap = BTreeMap<String, Association>;

/// Three-level association table for one portal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssociationTypes(BTreeMap<String, BTreeMap<String, AssociationMap>>);

/// Builds the generated key for an association between `from` and `to`.
///
/// ## Examples
///
/// ```
/// use hsgen_lib::associations::association_key;
///
/// assert_eq!(association_key("deal", "contact", ""), "deal_to_contact");
/// assert_eq!(
///     association_key("deal", "contact", "Decision Maker"),
///     "deal_to_contact_decision_maker"
/// );
/// ```
pub fn association_key(from: &str, to: &str, label: &str) -> String {
    if label.is_empty() {
        format!("{from}_to_{to}")
    } else {
        format!("{from}_to_{to}_{}", sanitize_label(label))
    }
}

impl AssociationTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes sure `from` has an entry, even if no association is ever added.
    pub fn ensure_from(&mut self, from: &str) {
        self.0.entry(from.to_string()).or_default();
    }

    /// Stores `association` under its generated key and returns that key.
    ///
    /// Labeled associations get their `sanitized_label` filled in.
    pub fn insert(&mut self, from: &str, to: &str, mut association: Association) -> String {
        let base = association_key(from, to, &association.label);
        if !association.label.is_empty() {
            association.sanitized_label = sanitize_label(&association.label);
        }

        let pair = self
            .0
            .entry(from.to_string())
            .or_default()
            .entry(to.to_string())
            .or_default();

        let key = if pair.contains_key(&base) {
            format!("{base}2")
        } else {
            base
        };

        pair.insert(key.clone(), association);
        key
    }

    /// Looks up one association by its full path.
    pub fn get(&self, from: &str, to: &str, key: &str) -> Option<&Association> {
        self.0.get(from)?.get(to)?.get(key)
    }

    pub fn contains(&self, from: &str, to: &str, key: &str) -> bool {
        self.get(from, to, key).is_some()
    }

    /// Associations for one pair, if the pair exists.
    pub fn pair(&self, from: &str, to: &str) -> Option<&AssociationMap> {
        self.0.get(from)?.get(to)
    }

    /// Iterates from-objects with their per-target maps, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, AssociationMap>)> {
        self.0.iter()
    }

    /// Iterates every stored association as `(from, to, key, association)`.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &str, &Association)> {
        self.0.iter().flat_map(|(from, targets)| {
            targets.iter().flat_map(move |(to, map)| {
                map.iter()
                    .map(move |(key, assoc)| (from.as_str(), to.as_str(), key.as_str(), assoc))
            })
        })
    }

    /// Stores `association` under an already-generated key, replacing any
    /// previous entry at that path.
    pub fn insert_at(&mut self, from: &str, to: &str, key: &str, association: Association) {
        self.0
            .entry(from.to_string())
            .or_default()
            .entry(to.to_string())
            .or_default()
            .insert(key.to_string(), association);
    }

    pub fn has_from(&self, from: &str) -> bool {
        self.0.contains_key(from)
    }

    /// Number of stored associations across all pairs.
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fetches association labels for every ordered pair of distinct schemas.
///
/// Requests run one after another: `n * (n - 1)` calls for `n` schemas.
/// Every from-object gets an entry; a `(from, to)` pair only gets one when
/// the API returned at least one label for it. Pairs whose schemas share a
/// name are skipped. The first failing request aborts the whole fetch.
pub async fn fetch_association_types(
    client: &HubspotClient,
    schemas: &[Schema],
) -> Result<AssociationTypes> {
    info!(schemas = schemas.len(), "Getting association types");

    let mut types = AssociationTypes::new();

    for (i, schema) in schemas.iter().enumerate() {
        let from = schema.name.to_lowercase();
        debug!(
            object = %from,
            "Getting association types for schema {}/{}",
            i + 1,
            schemas.len()
        );
        types.ensure_from(&from);

        for other in schemas {
            if schema.name == other.name {
                continue;
            }

            let labels = client
                .get_association_labels(&schema.object_type_id, &other.object_type_id)
                .await?;
            if labels.is_empty() {
                continue;
            }

            let to = other.name.to_lowercase();
            for label in labels {
                types.insert(&from, &to, label);
            }
        }
    }

    info!(associations = types.len(), "Association types retrieved");
    Ok(types)
}
