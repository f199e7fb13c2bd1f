//! Error types for the hsgen library.

use std::path::PathBuf;

/// Errors that can occur while fetching portal schemas or generating code.
///
/// Transport, decode and file-system failures all abort the run that
/// produced them; nothing in the pipeline retries.
#[derive(Debug, thiserror::Error)]
pub enum HsgenError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The HubSpot API answered with a non-success status.
    #[error("HubSpot API returned {status} for {url}: {message}")]
    HttpStatus {
        url: String,
        status: u16,
        message: String,
    },

    /// A response body or snapshot file was not valid JSON for the expected shape.
    #[error("Failed to parse JSON from {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration (config file contents, options).
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The configured API base URL could not be parsed.
    #[error("Invalid base URL '{0}'")]
    InvalidUrl(String),

    /// The emitter asked for a snippet that is not in the snippet table.
    #[error("Unknown snippet '{0}'")]
    MissingSnippet(String),

    /// A failure while loading one portal, tagged with the portal name.
    #[error("[{portal}] {source}")]
    Portal {
        portal: String,
        #[source]
        source: Box<HsgenError>,
    },
}

impl HsgenError {
    /// Wraps an error with the name of the portal it occurred in.
    pub fn in_portal(self, portal: impl Into<String>) -> Self {
        HsgenError::Portal {
            portal: portal.into(),
            source: Box::new(self),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HsgenError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience Result type for hsgen operations.
pub type Result<T> = std::result::Result<T, HsgenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portal_context_prefixes_message() {
        let err = HsgenError::Config("bad".to_string()).in_portal("acme");
        assert_eq!(err.to_string(), "[acme] Invalid configuration: bad");
        assert!(matches!(err, HsgenError::Portal { ref portal, .. } if portal == "acme"));
    }

    #[test]
    fn io_error_names_the_path() {
        let err = HsgenError::io(
            "out/shared.ts",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("out/shared.ts"));
    }
}
