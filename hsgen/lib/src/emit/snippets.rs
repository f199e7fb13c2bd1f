//! Static TypeScript fragments used by the emitter.
//!
//! The fragments are compiled into the binary and collected into a
//! read-only table once per process. The emitter receives the table by
//! reference, so tests can hand it a table of their own.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::{HsgenError, Result};

pub const BANNER: &str = "banner";
pub const IMPORTS: &str = "imports";
pub const CATEGORY_IMPORT: &str = "category_import";
pub const CLIENT_SINGLE: &str = "client_single";
pub const CLIENT_MULTI: &str = "client_multi";
pub const FUNCTION_BUILDERS: &str = "function_builders";

static BUILTIN: Lazy<Snippets> = Lazy::new(|| {
    Snippets::from_entries([
        (BANNER, include_str!("../../snippets/banner.ts")),
        (IMPORTS, include_str!("../../snippets/imports.ts")),
        (CATEGORY_IMPORT, include_str!("../../snippets/category_import.ts")),
        (CLIENT_SINGLE, include_str!("../../snippets/client_single.ts")),
        (CLIENT_MULTI, include_str!("../../snippets/client_multi.ts")),
        (FUNCTION_BUILDERS, include_str!("../../snippets/function_builders.ts")),
    ])
});

/// Snippet name -> snippet text.
#[derive(Debug, Clone, Default)]
pub struct Snippets {
    entries: HashMap<String, String>,
}

impl Snippets {
    /// The table built from the bundled snippet files.
    pub fn builtin() -> &'static Snippets {
        &BUILTIN
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Result<&str> {
        self.entries
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| HsgenError::MissingSnippet(name.to_string()))
    }

    /// Returns the snippet with every `{{key}}` replaced by its value.
    ///
    /// Placeholders without a matching key are left as they are.
    ///
    /// ## Examples
    ///
    /// ```
    /// use hsgen_lib::emit::Snippets;
    ///
    /// let snippets = Snippets::from_entries([("greet", "hello {{name}}")]);
    /// assert_eq!(snippets.render("greet", &[("name", "acme")]).unwrap(), "hello acme");
    /// ```
    pub fn render(&self, name: &str, vars: &[(&str, &str)]) -> Result<String> {
        let mut text = self.get(name)?.to_string();
        for (key, value) in vars {
            text = text.replace(&format!("{{{{{key}}}}}"), value);
        }
        Ok(text)
    }
}
