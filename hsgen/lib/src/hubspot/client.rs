//! Authenticated HTTP client for the HubSpot schema and association APIs.

use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{Span, debug, info, instrument};
use url::Url;

use super::types::{Association, AssociationLabelResponse, Schema, SchemaResponse};
use crate::error::{HsgenError, Result};

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://api.hubapi.com";

/// Built-in object types whose schemas are requested one by one.
///
/// The custom schema list endpoint only returns tenant-defined objects, so
/// every standard object type has to be asked for explicitly.
pub const DEFAULT_OBJECT_TYPES: [&str; 24] = [
    "call",
    "cart",
    "communication",
    "company",
    "contact",
    "deal",
    "discount",
    "email",
    "engagement",
    "fee",
    "feedback_submission",
    "goal_target",
    "line_item",
    "marketing_event",
    "meeting_event",
    "note",
    "order",
    "postal_mail",
    "product",
    "quote",
    "quote_template",
    "task",
    "tax",
    "ticket",
];

/// Builder for configuring a [`HubspotClient`].
pub struct HubspotClientBuilder {
    token: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl HubspotClientBuilder {
    fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    /// Overrides the API host (used to point tests at a mock server).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets a per-request timeout. Without one, only the transport's own
    /// limits apply.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the [`HubspotClient`].
    ///
    /// ## Errors
    ///
    /// Returns [`HsgenError::InvalidUrl`] if the base URL does not parse and
    /// [`HsgenError::Http`] if the underlying HTTP client cannot be constructed.
    pub fn build(self) -> Result<HubspotClient> {
        Url::parse(&self.base_url).map_err(|_| HsgenError::InvalidUrl(self.base_url.clone()))?;

        let mut builder =
            reqwest::Client::builder().user_agent(concat!("hsgen/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(HubspotClient {
            client,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            token: self.token,
        })
    }
}

impl fmt::Debug for HubspotClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubspotClientBuilder")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Client for one portal; every request carries the portal's bearer token.
///
/// ## Examples
///
/// ```rust,no_run
/// use hsgen_lib::hubspot::HubspotClient;
///
/// # async fn example() -> hsgen_lib::Result<()> {
/// let client = HubspotClient::new("pat-na1-xxxx")?;
/// let schemas = client.get_all_schemas().await?;
/// println!("{} object types", schemas.len());
/// # Ok(())
/// # }
/// ```
pub struct HubspotClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl fmt::Debug for HubspotClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubspotClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HubspotClient {
    /// Creates a builder for a client authenticated with `token`.
    pub fn builder(token: impl Into<String>) -> HubspotClientBuilder {
        HubspotClientBuilder::new(token)
    }

    /// Creates a client against the production API with default settings.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::builder(token).build()
    }

    /// Returns the API host this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[instrument(
        name = "hubspot_request",
        skip(self),
        fields(
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
        )
    )]
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        Span::current().record("http.url", url.as_str());

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        Span::current().record("http.status_code", status.as_u16());

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(HsgenError::HttpStatus {
                url,
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| HsgenError::Json {
            context: url,
            source,
        })
    }

    /// Lists the tenant's custom object schemas.
    pub async fn get_custom_schemas(&self) -> Result<Vec<Schema>> {
        let response: SchemaResponse = self.get_json("/crm-object-schemas/v3/schemas").await?;
        debug!(count = response.results.len(), "Custom schemas retrieved");
        Ok(response.results)
    }

    /// Fetches the schema of a single object type.
    pub async fn get_schema(&self, object_type: &str) -> Result<Schema> {
        self.get_json(&format!("/crm-object-schemas/v3/schemas/{object_type}"))
            .await
    }

    /// Fetches every entry of [`DEFAULT_OBJECT_TYPES`], in order.
    ///
    /// The first failing request aborts the whole call.
    pub async fn get_default_schemas(&self) -> Result<Vec<Schema>> {
        let total = DEFAULT_OBJECT_TYPES.len();
        let mut schemas = Vec::with_capacity(total);

        for (i, object_type) in DEFAULT_OBJECT_TYPES.iter().copied().enumerate() {
            debug!(object_type, "Getting schema {}/{}", i + 1, total);
            schemas.push(self.get_schema(object_type).await?);
        }

        Ok(schemas)
    }

    /// Custom schemas followed by the built-in ones.
    pub async fn get_all_schemas(&self) -> Result<Vec<Schema>> {
        let mut schemas = self.get_custom_schemas().await?;
        info!(count = schemas.len(), "Getting {} default schemas", DEFAULT_OBJECT_TYPES.len());
        schemas.extend(self.get_default_schemas().await?);
        Ok(schemas)
    }

    /// Lists the association labels defined from one object type to another.
    pub async fn get_association_labels(
        &self,
        from_object_type_id: &str,
        to_object_type_id: &str,
    ) -> Result<Vec<Association>> {
        let response: AssociationLabelResponse = self
            .get_json(&format!(
                "/crm/v4/associations/{from_object_type_id}/{to_object_type_id}/labels"
            ))
            .await?;
        Ok(response.results)
    }
}
