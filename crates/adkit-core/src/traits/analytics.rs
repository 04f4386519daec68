// # Analytics Transport Trait
//
// Defines the interface for delivering analytics event records to the
// external analytics collaborator. Delivery is best-effort: the tracker
// logs failures and moves on, and callers never observe them.
//
// ## Implementations
//
// - HTTP JSON: `adkit-analytics-http` crate
// - Future: batching transports, platform-native pipelines

use async_trait::async_trait;

use crate::taxonomy::EventRecord;

/// Trait for analytics transport implementations
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// ## Allowed Capabilities
/// - Perform I/O to their own analytics endpoint only
/// - Return success or failure (the tracker logs failures and drops
///   the record; there is no retry)
///
/// ## Forbidden Capabilities
/// - Spawn tasks or threads
/// - Mutate or filter the record (records are forwarded unchanged,
///   including event types and keys outside the known taxonomy)
/// - Block indefinitely without the possibility of cancellation
#[async_trait]
pub trait AnalyticsTransport: Send + Sync {
    /// Deliver one event record
    ///
    /// # Returns
    ///
    /// - `Ok(())`: the record was handed off
    /// - `Err(Error)`: delivery failed; the tracker logs and drops it
    async fn send(&self, record: &EventRecord) -> Result<(), crate::Error>;

    /// Get the transport name (for logging/debugging)
    fn transport_name(&self) -> &'static str;
}

/// Helper trait for constructing analytics transports from configuration
pub trait AnalyticsTransportFactory: Send + Sync {
    /// Create an AnalyticsTransport instance from configuration
    fn create(
        &self,
        config: &crate::config::TransportConfig,
    ) -> Result<std::sync::Arc<dyn AnalyticsTransport>, crate::Error>;
}
