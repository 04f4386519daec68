// # HTTP Analytics Transport
//
// This crate provides an HTTP JSON transport for AdKit analytics
// events.
//
// ## Purpose
//
// Posts each event record to a configurable collection endpoint as a
// JSON document. Authentication is an optional bearer token.
//
// ## Delivery Semantics
//
// Delivery is best-effort, matching the tracker's contract: any
// transport error is returned to the tracker, which logs it and drops
// the record. There is no retry and no buffering in this crate.

use adkit_core::CollaboratorRegistry;
use adkit_core::config::TransportConfig;
use adkit_core::taxonomy::EventRecord;
use adkit_core::traits::{AnalyticsTransport, AnalyticsTransportFactory};
use adkit_core::{Error, Result};

use std::sync::Arc;
use std::time::Duration;

/// Default request timeout for event delivery
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP JSON analytics transport
pub struct HttpAnalyticsTransport {
    /// Endpoint URL to post records to
    endpoint: String,

    /// Optional bearer token sent with each request
    api_key: Option<String>,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpAnalyticsTransport {
    /// Create a new HTTP transport
    ///
    /// # Parameters
    ///
    /// - `endpoint`: URL to post records to
    /// - `api_key`: optional bearer token
    pub fn new(endpoint: String, api_key: Option<String>) -> Self {
        Self {
            endpoint,
            api_key,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait::async_trait]
impl AnalyticsTransport for HttpAnalyticsTransport {
    async fn send(&self, record: &EventRecord) -> Result<()> {
        let mut request = self.client.post(&self.endpoint).json(record);

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::network(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::tracking(format!(
                "Endpoint rejected record: {}",
                response.status()
            )));
        }

        tracing::debug!(event_type = %record.event_type, "event record delivered");
        Ok(())
    }

    fn transport_name(&self) -> &'static str {
        "http"
    }
}

/// Factory for creating HTTP analytics transports
pub struct HttpTransportFactory;

impl AnalyticsTransportFactory for HttpTransportFactory {
    fn create(&self, config: &TransportConfig) -> Result<Arc<dyn AnalyticsTransport>> {
        match config {
            TransportConfig::Http { endpoint, api_key } => Ok(Arc::new(
                HttpAnalyticsTransport::new(endpoint.clone(), api_key.clone()),
            )),
            _ => Err(Error::config("Invalid config for HTTP transport")),
        }
    }
}

/// Register the HTTP transport with a registry
pub fn register(registry: &CollaboratorRegistry) {
    registry.register_transport("http", Box::new(HttpTransportFactory));
}
