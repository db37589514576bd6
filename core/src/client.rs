//! Stateless request builder and response parser for the feature API.
//!
//! # Design
//! `FeatureClient` holds only the endpoint URL and carries no mutable state
//! between calls. Fetching a page is split into `build_page_request`, which
//! produces an `HttpRequest`, and `parse_envelope`, which consumes an
//! `HttpResponse`. Executing the round-trip is the `Transport`'s job, keeping
//! this half deterministic and free of I/O.

use tracing::debug;

use crate::error::RemoteQueryError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{Envelope, WireEnvelope};

/// Feature endpoint of the Nagareyama city open-data API.
pub const DEFAULT_ENDPOINT: &str = "http://nagareyama.ecom-plat.jp/map/api/feature/8";

/// Environment variable overriding the endpoint in `FeatureClient::from_env`.
pub const ENDPOINT_ENV: &str = "OPENDATA_ENDPOINT";

/// Synchronous, stateless client for the feature API.
#[derive(Debug, Clone)]
pub struct FeatureClient {
    endpoint: String,
}

impl Default for FeatureClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl FeatureClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    /// Endpoint from `OPENDATA_ENDPOINT`, or the default one when unset.
    pub fn from_env() -> Self {
        match std::env::var(ENDPOINT_ENV) {
            Ok(endpoint) if !endpoint.trim().is_empty() => Self::new(endpoint.trim()),
            _ => Self::default(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request the first `page_size` records of `layer`.
    pub fn build_page_request(&self, layer: &str, page_size: u64) -> Result<HttpRequest, RemoteQueryError> {
        validate_layer(layer)?;
        let url = format!("{}?layers={layer}&pagenum={page_size}", self.endpoint);
        debug!(%url, "built page request");
        Ok(HttpRequest {
            url,
            headers: vec![("accept".to_string(), "application/json".to_string())],
        })
    }

    pub fn parse_envelope(&self, response: HttpResponse) -> Result<Envelope, RemoteQueryError> {
        check_status(&response, 200)?;
        let wire: WireEnvelope = serde_json::from_str(&response.text())
            .map_err(|e| RemoteQueryError::Deserialization(e.to_string()))?;
        Envelope::from_wire(wire)
    }
}

/// Layer ids go into the query string verbatim, so only URL-safe ids pass.
pub(crate) fn validate_layer(layer: &str) -> Result<(), RemoteQueryError> {
    let valid = !layer.is_empty()
        && layer
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(RemoteQueryError::InvalidCollection(layer.to_string()))
    }
}

/// Map non-success status codes to the appropriate `RemoteQueryError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), RemoteQueryError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(RemoteQueryError::NotFound);
    }
    Err(RemoteQueryError::HttpError {
        status: response.status,
        body: response.text(),
    })
}
