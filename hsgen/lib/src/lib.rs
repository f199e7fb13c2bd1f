//! hsgen - typed TypeScript bindings for HubSpot CRM portals
//!
//! Fetches object schemas and association labels for one or more portals,
//! maps them into interfaces, picklist enums and lookup tables, and writes a
//! typed client on top of `@hubspot/api-client`.
//!
//! ## Pipeline
//!
//! 1. [`hubspot::HubspotClient`] lists custom schemas plus the built-in object
//!    types, then [`associations::fetch_association_types`] asks for the
//!    labels between every ordered pair of object types.
//! 2. [`model::SchemaMapper`] turns the schemas into a [`model::CodeDefinition`].
//! 3. With several portals, [`intersect::intersect`] keeps what all of them share.
//! 4. [`emit::Emitter`] renders and writes the TypeScript files.
//!
//! [`pipeline`] wires these together; [`cache`] lets a run reuse fetched data.

pub mod associations;
pub mod cache;
pub mod config;
pub mod emit;
pub mod error;
pub mod hubspot;
pub mod intersect;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod portal;
pub mod sanitize;

pub use config::{GeneratorConfig, GeneratorOptions};
pub use emit::{Emitter, Snippets};
pub use error::{HsgenError, Result};
pub use pipeline::{generate_multi, generate_single, load_portal, load_portals};
pub use portal::{PortalConfig, PortalDefinition, PortalModel};
