//! HubSpot CRM API access.
//!
//! - [`client`] - authenticated GET calls for schemas and association labels
//! - [`types`] - serde types for the responses (also used for snapshots)

pub mod client;
pub mod types;

pub use client::{DEFAULT_BASE_URL, DEFAULT_OBJECT_TYPES, HubspotClient, HubspotClientBuilder};
pub use types::{
    Association, AssociationCategory, ObjectLabels, Property, PropertyOption, Schema,
    SchemaResponse,
};
