// # Ad Server Trait
//
// Defines the interface for fetching ad payloads from the ad-serving
// collaborator. The wire protocol behind an implementation is opaque to
// the core; the core consumes this purely as a capability.
//
// ## Implementations
//
// - Canned (in-process queue): `adkit_core::server::CannedAdServer`
// - Future: networked servers, mediation adapters
//
// ## Usage
//
// ```rust,ignore
// use adkit_core::{AdServer, AdSize, AdType};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let server = /* AdServer implementation */;
//
//     let ad = server.fetch_ad(AdSize::Banner, AdType::Regular).await?;
//     println!("served {}", ad.id);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::ad::{Ad, AdSize, AdType};

/// Trait for ad server implementations
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// ## Allowed Capabilities
/// - Perform I/O to their own backend only
/// - Return a payload, or an error for the engine to surface
///
/// ## Forbidden Capabilities
/// - Spawn tasks or threads (violates teardown determinism: an ad
///   unit cancels a load by dropping the `fetch_ad` future)
/// - Implement retry or reload scheduling (owned by the ad unit)
/// - Notify observers directly (owned by the ad unit)
/// - Cache unit state between requests
///
/// Implementations are **suppliers**, not **decision-makers**: one
/// request in, one payload or error out, cancellation-safe throughout.
#[async_trait]
pub trait AdServer: Send + Sync {
    /// Fetch the next ad for the given slot
    ///
    /// # Cancellation
    ///
    /// The caller may drop this future at any point (for example, when
    /// the owning unit is torn down mid-load). Implementations must be
    /// cancellation-safe and must not leave detached work behind.
    ///
    /// # Returns
    ///
    /// - `Ok(Ad)`: a freshly served payload for this size and type
    /// - `Err(Error::NoFill)`: no ad is available for this request
    /// - `Err(Error)`: the request failed
    async fn fetch_ad(&self, size: AdSize, ad_type: AdType) -> Result<Ad, crate::Error>;

    /// Check whether this server can fill the given slot
    ///
    /// Some servers may serve only a subset of sizes or types.
    fn supports(&self, _size: AdSize, _ad_type: AdType) -> bool {
        true
    }

    /// Get the server name (for logging/debugging)
    fn server_name(&self) -> &'static str;
}

/// Helper trait for constructing ad servers from configuration
pub trait AdServerFactory: Send + Sync {
    /// Create an AdServer instance from configuration
    ///
    /// Returns an `Arc` rather than a `Box`: ad units clone the server
    /// handle into each in-flight load future.
    fn create(
        &self,
        config: &crate::config::AdServerConfig,
    ) -> Result<std::sync::Arc<dyn AdServer>, crate::Error>;
}
