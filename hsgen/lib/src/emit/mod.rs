//! Renders portal models into TypeScript files.
//!
//! Two layouts are produced:
//!
//! - **single**: one file holding imports, association config, enums,
//!   interfaces, the object tables and the client class.
//! - **multi**: `shared.ts` (types common to every portal), one
//!   `<portal>.ts` per portal (its object ids and association config) and
//!   `client.ts` (a client that picks the portal tables at construction).

pub mod snippets;
pub mod typescript;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::info;

pub use snippets::Snippets;

use crate::error::{HsgenError, Result};
use crate::output::write_atomic;
use crate::portal::PortalModel;
use crate::sanitize::{prepend_underscore_to_enum, sanitize_label};

pub const CLIENT_FILE: &str = "client.ts";
pub const SHARED_FILE: &str = "shared.ts";

/// TypeScript identifier used for a portal's module import in `client.ts`.
///
/// ## Examples
///
/// ```
/// use hsgen_lib::emit::portal_identifier;
///
/// assert_eq!(portal_identifier("EU Production"), "eu_production");
/// assert_eq!(portal_identifier("2024-sandbox"), "_2024sandbox");
/// ```
pub fn portal_identifier(portal: &str) -> String {
    let label = sanitize_label(portal);
    if label.is_empty() {
        return "_".to_string();
    }
    prepend_underscore_to_enum(&label)
}

/// File name of a portal's module.
pub fn portal_file_name(portal: &str) -> String {
    format!("{portal}.ts")
}

/// File stems the multi layout writes itself.
const RESERVED_STEMS: [&str; 2] = ["shared", "client"];

/// Checks that portal names are usable as file stems and import bindings.
///
/// Rejects blank names, names holding a path separator or `..`, the stems
/// of `shared.ts` and `client.ts` (in any case), repeated names and names
/// that map to the same [`portal_identifier`].
pub fn validate_portal_names<'n>(names: impl IntoIterator<Item = &'n str>) -> Result<()> {
    let mut identifiers: BTreeMap<String, &str> = BTreeMap::new();

    for name in names {
        if name.trim().is_empty() {
            return Err(HsgenError::Config("portal names must not be empty".to_string()));
        }
        if name.contains(['/', '\\', '\0']) || name.contains("..") {
            return Err(HsgenError::Config(format!(
                "portal name {name:?} must not contain path separators or `..`"
            )));
        }
        if RESERVED_STEMS.iter().any(|s| s.eq_ignore_ascii_case(name)) {
            return Err(HsgenError::Config(format!(
                "portal name {name:?} clashes with {}",
                portal_file_name(&name.to_ascii_lowercase())
            )));
        }
        if let Some(previous) = identifiers.insert(portal_identifier(name), name) {
            return Err(HsgenError::Config(if previous == name {
                format!("portal name {name:?} is listed twice")
            } else {
                format!("portal names {previous:?} and {name:?} map to the same identifier")
            }));
        }
    }

    Ok(())
}

fn sections(parts: Vec<String>) -> String {
    parts
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders models using a snippet table.
#[derive(Debug, Clone, Copy)]
pub struct Emitter<'a> {
    snippets: &'a Snippets,
}

impl Default for Emitter<'static> {
    fn default() -> Self {
        Self::new(Snippets::builtin())
    }
}

impl<'a> Emitter<'a> {
    pub fn new(snippets: &'a Snippets) -> Self {
        Self { snippets }
    }

    /// The combined single-portal file.
    pub fn render_single(&self, model: &PortalModel) -> Result<String> {
        let code = &model.code;
        let client = format!(
            "{}{}{}",
            self.snippets.get(snippets::CLIENT_SINGLE)?,
            self.snippets.get(snippets::FUNCTION_BUILDERS)?,
            typescript::client_api(code)
        );

        Ok(sections(vec![
            self.snippets.get(snippets::BANNER)?.to_string(),
            self.snippets.get(snippets::IMPORTS)?.to_string(),
            typescript::associations_config(code, &model.association_types),
            typescript::enums(code),
            typescript::interfaces(code),
            typescript::object_types(code),
            typescript::type_to_object_id_list(code),
            client,
        ]))
    }

    /// `shared.ts`: the types every portal has in common.
    pub fn render_shared(&self, shared: &PortalModel) -> Result<String> {
        let code = &shared.code;
        let imports = format!(
            "{}export {{ AssociationSpecAssociationCategoryEnum }};\n",
            self.snippets.get(snippets::CATEGORY_IMPORT)?
        );

        Ok(sections(vec![
            self.snippets.get(snippets::BANNER)?.to_string(),
            imports,
            typescript::enums(code),
            typescript::interfaces(code),
            typescript::object_types(code),
            typescript::associations_config(code, &shared.association_types),
        ]))
    }

    /// `<portal>.ts`: one portal's object ids and association config.
    pub fn render_portal(&self, portal: &str, model: &PortalModel) -> Result<String> {
        let code = &model.code;
        Ok(sections(vec![
            self.snippets.get(snippets::BANNER)?.to_string(),
            format!("// Portal: {portal}\n"),
            self.snippets.get(snippets::CATEGORY_IMPORT)?.to_string(),
            typescript::type_to_object_id_list(code),
            typescript::associations_config(code, &model.association_types),
        ]))
    }

    /// `client.ts`: the multi-portal client over the shared types.
    pub fn render_client(&self, portals: &[&str], shared: &PortalModel) -> Result<String> {
        validate_portal_names(portals.iter().copied())?;

        let mut imports = String::new();
        let mut entries = String::new();
        for portal in portals {
            let ident = portal_identifier(portal);
            imports.push_str(&format!(
                "import * as {ident} from {};\n",
                typescript::ts_string(&format!("./{portal}"))
            ));
            entries.push_str(&format!("  {}: {ident},\n", typescript::ts_key(portal)));
        }

        let header = self.snippets.render(
            snippets::CLIENT_MULTI,
            &[("portal_imports", &imports), ("portal_entries", &entries)],
        )?;

        Ok(sections(vec![
            self.snippets.get(snippets::BANNER)?.to_string(),
            format!(
                "{header}{}{}",
                self.snippets.get(snippets::FUNCTION_BUILDERS)?,
                typescript::client_api(&shared.code)
            ),
        ]))
    }

    /// Writes the single-portal file to `path`.
    pub fn write_single(&self, path: &Path, model: &PortalModel) -> Result<PathBuf> {
        write_atomic(path, &self.render_single(model)?)?;
        info!(path = %path.display(), "Wrote generated client");
        Ok(path.to_path_buf())
    }

    /// Writes `shared.ts`, one file per portal and `client.ts` into `outfolder`.
    ///
    /// Returns the written paths in write order. Existing files are replaced;
    /// a failure part way leaves the files written so far in place. Portal
    /// names are checked with [`validate_portal_names`] before anything is
    /// written.
    pub fn write_all(
        &self,
        outfolder: &Path,
        portals: &[(&str, &PortalModel)],
        shared: &PortalModel,
    ) -> Result<Vec<PathBuf>> {
        validate_portal_names(portals.iter().map(|(name, _)| *name))?;

        let mut written = Vec::with_capacity(portals.len() + 2);

        let shared_path = outfolder.join(SHARED_FILE);
        write_atomic(&shared_path, &self.render_shared(shared)?)?;
        written.push(shared_path);

        for (name, model) in portals {
            let path = outfolder.join(portal_file_name(name));
            write_atomic(&path, &self.render_portal(name, model)?)?;
            written.push(path);
        }

        let names: Vec<&str> = portals.iter().map(|(name, _)| *name).collect();
        let client_path = outfolder.join(CLIENT_FILE);
        write_atomic(&client_path, &self.render_client(&names, shared)?)?;
        written.push(client_path);

        info!(
            outfolder = %outfolder.display(),
            files = written.len(),
            "Wrote generated files"
        );
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::associations::AssociationTypes;
    use crate::error::HsgenError;
    use crate::hubspot::{Association, Property, PropertyOption, Schema};
    use crate::model::SchemaMapper;
    use tempfile::TempDir;

    fn model() -> PortalModel {
        let schemas = vec![Schema {
            name: "deal".to_string(),
            object_type_id: "0-3".to_string(),
            description: "Deals".to_string(),
            properties: vec![
                Property {
                    name: "dealstage".to_string(),
                    label: "Deal Stage".to_string(),
                    kind: "enumeration".to_string(),
                    options: vec![PropertyOption {
                        label: "Closed Won".to_string(),
                        value: "closedwon".to_string(),
                        ..Default::default()
                    }],
                    ..Default::default()
                },
                Property {
                    name: "closedate".to_string(),
                    kind: "datetime".to_string(),
                    description: "When the deal closed".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }];

        let mut associations = AssociationTypes::new();
        associations.insert(
            "deal",
            "contact",
            Association {
                type_id: 3,
                category: "HUBSPOT_DEFINED".to_string(),
                ..Default::default()
            },
        );

        PortalModel::from_schemas(&SchemaMapper::new(), &schemas, associations)
    }

    #[test]
    fn portal_identifiers() {
        assert_eq!(portal_identifier("acme"), "acme");
        assert_eq!(portal_identifier("!!!"), "_");
    }

    #[test]
    fn portal_names_must_be_usable_file_stems() {
        assert!(validate_portal_names(["acme", "eu-prod", "sandbox"]).is_ok());

        for names in [
            vec!["shared"],
            vec!["acme", "Client"],
            vec!["../escape"],
            vec!["nested/acme"],
            vec!["nested\\acme"],
            vec![".."],
            vec![" "],
            vec!["acme", "acme"],
            vec!["eu-prod", "euprod"],
        ] {
            let err = validate_portal_names(names.iter().copied()).unwrap_err();
            assert!(matches!(err, HsgenError::Config(_)), "{names:?} was accepted");
        }
    }

    #[test]
    fn single_file_contains_every_section_in_order() {
        let text = Emitter::default().render_single(&model()).unwrap();

        let order = [
            "DO NOT EDIT",
            "import * as hubspot",
            "export const AssociationsConfig",
            "export enum DealDealStageEnum {\n  closed_won = \"closedwon\",\n}",
            "export interface Deal {\n  dealstage: DealDealStageEnum;\n  /** When the deal closed */\n  closedate: string;\n}",
            "export interface ObjectTypes {\n  deal: Deal;\n}",
            "export const TypeToObjectIDList = {\n  deal: \"0-3\",\n}",
            "export class HubspotClient {",
            "private getObjectTypeFunction",
            "public api = {\n    /** Deals */\n    deal: {",
        ];

        let mut last = 0;
        for needle in order {
            let pos = text[last..]
                .find(needle)
                .unwrap_or_else(|| panic!("missing or out of order: {needle}"));
            last += pos;
        }
        assert!(text.ends_with("  };\n}\n"));
    }

    #[test]
    fn shared_file_reexports_category_enum() {
        let text = Emitter::default().render_shared(&model()).unwrap();
        assert!(text.contains("export { AssociationSpecAssociationCategoryEnum };"));
        assert!(text.contains("export type TypeKeys = keyof ObjectTypes;"));
        assert!(!text.contains("TypeToObjectIDList"));
    }

    #[test]
    fn portal_file_holds_tables_only() {
        let text = Emitter::default().render_portal("acme", &model()).unwrap();
        assert!(text.contains("// Portal: acme"));
        assert!(text.contains("export const TypeToObjectIDList"));
        assert!(text.contains("export const AssociationsConfig"));
        assert!(!text.contains("export interface"));
    }

    #[test]
    fn client_file_imports_every_portal() {
        let text = Emitter::default()
            .render_client(&["acme", "eu-prod"], &model())
            .unwrap();

        assert!(text.contains("import * as acme from \"./acme\";\n"));
        assert!(text.contains("import * as euprod from \"./eu-prod\";\n"));
        assert!(text.contains("  acme: acme,\n  \"eu-prod\": euprod,\n} as const;"));
        assert!(text.contains("constructor(portal: PortalName, token?: string)"));
        assert!(!text.contains("{{"));
    }

    #[test]
    fn client_file_rejects_clashing_identifiers() {
        let err = Emitter::default()
            .render_client(&["eu-prod", "euprod"], &model())
            .unwrap_err();
        assert!(err.to_string().contains("same identifier"));
    }

    #[test]
    fn missing_snippet_fails_rendering() {
        let snippets = Snippets::from_entries([(snippets::BANNER, "// x")]);
        let err = Emitter::new(&snippets).render_single(&model()).unwrap_err();
        assert!(matches!(err, HsgenError::MissingSnippet(_)));
    }

    #[test]
    fn injected_snippets_are_used() {
        let snippets = Snippets::from_entries([
            (snippets::BANNER, "// custom banner\n"),
            (snippets::CATEGORY_IMPORT, "import { X } from \"y\";\n"),
        ]);
        let text = Emitter::new(&snippets)
            .render_portal("acme", &model())
            .unwrap();
        assert!(text.starts_with("// custom banner\n"));
    }

    #[test]
    fn write_all_creates_outfolder_and_files() {
        let dir = TempDir::new().unwrap();
        let outfolder = dir.path().join("generated");
        let model = model();

        let written = Emitter::default()
            .write_all(&outfolder, &[("acme", &model), ("beta", &model)], &model)
            .unwrap();

        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["shared.ts", "acme.ts", "beta.ts", "client.ts"]);
        for path in &written {
            assert!(path.exists());
        }
    }

    #[test]
    fn write_all_refuses_reserved_names_before_writing() {
        let dir = TempDir::new().unwrap();
        let model = model();

        let err = Emitter::default()
            .write_all(dir.path(), &[("shared", &model), ("acme", &model)], &model)
            .unwrap_err();

        assert!(err.to_string().contains("shared.ts"));
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn write_single_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hubspot.ts");
        std::fs::write(&path, "stale").unwrap();

        Emitter::default().write_single(&path, &model()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("export class HubspotClient"));
    }
}
