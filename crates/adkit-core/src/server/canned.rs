// # Canned Ad Server
//
// In-process implementation of AdServer backed by a queue of pre-staged
// payloads.
//
// ## Purpose
//
// Serves ads without any network dependency. Useful for testing, demos,
// and deployments that preload creatives out-of-band.
//
// ## Fill Behavior
//
// - Each fetch pops the oldest staged ad matching the requested slot
// - An empty queue (or no matching ad) is a no-fill, not an error state
// - Staged ads are handed out exactly once

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use async_trait::async_trait;

use crate::ad::{Ad, AdId, AdSize, AdType};
use crate::error::Error;
use crate::traits::ad_server::AdServer;

/// Queue-backed ad server
///
/// # Example
///
/// ```rust,no_run
/// use adkit_core::server::CannedAdServer;
/// use adkit_core::traits::ad_server::AdServer;
/// use adkit_core::{AdSize, AdType};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let server = CannedAdServer::new();
///
///     let staged = server
///         .stage(AdSize::Banner, AdType::Regular, serde_json::json!({ "markup": "<div/>" }))
///         .await;
///
///     let ad = server.fetch_ad(AdSize::Banner, AdType::Regular).await?;
///     assert_eq!(ad.id, staged);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CannedAdServer {
    queue: Arc<RwLock<VecDeque<Ad>>>,
    next_id: Arc<AtomicU64>,
}

impl CannedAdServer {
    /// Create a new server with an empty queue
    pub fn new() -> Self {
        Self {
            queue: Arc::new(RwLock::new(VecDeque::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Stage a payload to be served by a later fetch
    ///
    /// Returns the id the staged ad will be served under.
    pub async fn stage(&self, size: AdSize, ad_type: AdType, creative: serde_json::Value) -> AdId {
        let id = AdId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let ad = Ad::new(id, size, ad_type, creative);
        self.queue.write().await.push_back(ad);
        id
    }

    /// Number of staged ads not yet served
    pub async fn staged_count(&self) -> usize {
        self.queue.read().await.len()
    }

    /// Drop all staged ads
    pub async fn clear(&self) {
        self.queue.write().await.clear();
    }
}

impl Default for CannedAdServer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AdServer for CannedAdServer {
    async fn fetch_ad(&self, size: AdSize, ad_type: AdType) -> Result<Ad, Error> {
        let mut queue = self.queue.write().await;

        let position = queue
            .iter()
            .position(|ad| ad.size == size && ad.ad_type == ad_type);

        position
            .and_then(|index| queue.remove(index))
            .ok_or(Error::NoFill)
    }

    fn server_name(&self) -> &'static str {
        "canned"
    }
}
