//! Test doubles and common utilities for lifecycle contract tests
//!
//! These doubles verify the engine's contracts (call counts, delivered
//! notifications) without implementing real serving or analytics.

// Each contract test binary uses a different subset of these doubles.
#![allow(dead_code)]

use adkit_core::ad::{Ad, AdId, AdSize, AdType};
use adkit_core::config::AdUnitConfig;
use adkit_core::error::{Error, Result};
use adkit_core::taxonomy::EventRecord;
use adkit_core::traits::{
    AdServer, AnalyticsTransport, DisplayObserver, LoadObserver, UpdateObserver,
    VideoPlaybackObserver,
};
use adkit_core::unit::{AdUnitHandle, UnitId, UnitPhase};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use tokio_stream::StreamExt;

/// An ad server whose fetches block until released by the test
///
/// Counts every fetch dispatched to it, which is what the idempotency
/// and teardown contracts assert on.
pub struct GatedAdServer {
    fetch_count: Arc<AtomicUsize>,
    gate: Arc<Notify>,
    next_id: AtomicU64,
}

impl GatedAdServer {
    pub fn new() -> Self {
        Self {
            fetch_count: Arc::new(AtomicUsize::new(0)),
            gate: Arc::new(Notify::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of fetches dispatched so far
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    /// Allow one pending fetch to complete
    pub fn release_one(&self) {
        self.gate.notify_one();
    }
}

#[async_trait::async_trait]
impl AdServer for GatedAdServer {
    async fn fetch_ad(&self, size: AdSize, ad_type: AdType) -> Result<Ad> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;

        let id = AdId(self.next_id.fetch_add(1, Ordering::SeqCst));
        Ok(Ad::new(id, size, ad_type, serde_json::json!({})))
    }

    fn server_name(&self) -> &'static str {
        "gated"
    }
}

/// An ad server that delays each fill by a fixed duration
pub struct SlowAdServer {
    delay: Duration,
    fetch_count: Arc<AtomicUsize>,
    next_id: AtomicU64,
}

impl SlowAdServer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            fetch_count: Arc::new(AtomicUsize::new(0)),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AdServer for SlowAdServer {
    async fn fetch_ad(&self, size: AdSize, ad_type: AdType) -> Result<Ad> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;

        let id = AdId(self.next_id.fetch_add(1, Ordering::SeqCst));
        Ok(Ad::new(id, size, ad_type, serde_json::json!({})))
    }

    fn server_name(&self) -> &'static str {
        "slow"
    }
}

/// An ad server that never fills
pub struct NoFillAdServer;

#[async_trait::async_trait]
impl AdServer for NoFillAdServer {
    async fn fetch_ad(&self, _size: AdSize, _ad_type: AdType) -> Result<Ad> {
        Err(Error::NoFill)
    }

    fn server_name(&self) -> &'static str {
        "nofill"
    }
}

/// Display observer recording every notification it receives
#[derive(Default)]
pub struct RecordingDisplayObserver {
    displayed: AtomicUsize,
    hidden: AtomicUsize,
    clicked: AtomicUsize,
    rejected: AtomicUsize,
}

impl RecordingDisplayObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn displayed_count(&self) -> usize {
        self.displayed.load(Ordering::SeqCst)
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.load(Ordering::SeqCst)
    }

    pub fn clicked_count(&self) -> usize {
        self.clicked.load(Ordering::SeqCst)
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.load(Ordering::SeqCst)
    }
}

impl DisplayObserver for RecordingDisplayObserver {
    fn on_displayed(&self, _ad: &Ad, _unit: UnitId) {
        self.displayed.fetch_add(1, Ordering::SeqCst);
    }

    fn on_hidden(&self, _ad: &Ad, _unit: UnitId) {
        self.hidden.fetch_add(1, Ordering::SeqCst);
    }

    fn on_clicked(&self, _ad: &Ad, _unit: UnitId) {
        self.clicked.fetch_add(1, Ordering::SeqCst);
    }

    fn on_display_rejected(&self, _ad: &Ad, _error: &Error, _unit: UnitId) {
        self.rejected.fetch_add(1, Ordering::SeqCst);
    }
}

/// Load observer recording loaded ads and failures
#[derive(Default)]
pub struct RecordingLoadObserver {
    loaded: std::sync::Mutex<Vec<Ad>>,
    failures: std::sync::Mutex<Vec<String>>,
}

impl RecordingLoadObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn loaded_ads(&self) -> Vec<Ad> {
        self.loaded.lock().unwrap().clone()
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.lock().unwrap().len()
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().unwrap().clone()
    }
}

impl LoadObserver for RecordingLoadObserver {
    fn on_ad_loaded(&self, ad: &Ad) {
        self.loaded.lock().unwrap().push(ad.clone());
    }

    fn on_load_failed(&self, error: &Error) {
        self.failures.lock().unwrap().push(error.to_string());
    }
}

/// Video playback observer recording begin/end notifications
#[derive(Default)]
pub struct RecordingVideoObserver {
    began: AtomicUsize,
    ended: std::sync::Mutex<Vec<(f64, bool)>>,
}

impl RecordingVideoObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn began_count(&self) -> usize {
        self.began.load(Ordering::SeqCst)
    }

    pub fn ended_events(&self) -> Vec<(f64, bool)> {
        self.ended.lock().unwrap().clone()
    }
}

impl VideoPlaybackObserver for RecordingVideoObserver {
    fn on_playback_began(&self, _ad: &Ad) {
        self.began.fetch_add(1, Ordering::SeqCst);
    }

    fn on_playback_ended(&self, _ad: &Ad, percent_viewed: f64, fully_watched: bool) {
        self.ended.lock().unwrap().push((percent_viewed, fully_watched));
    }
}

/// Update observer with a switchable acceptance predicate
pub struct SwitchableUpdateObserver {
    accepting: AtomicBool,
    received: std::sync::Mutex<Vec<Ad>>,
}

impl SwitchableUpdateObserver {
    pub fn new(accepting: bool) -> Arc<Self> {
        Arc::new(Self {
            accepting: AtomicBool::new(accepting),
            received: std::sync::Mutex::new(Vec::new()),
        })
    }

    pub fn set_accepting(&self, accepting: bool) {
        self.accepting.store(accepting, Ordering::SeqCst);
    }

    pub fn received_ads(&self) -> Vec<Ad> {
        self.received.lock().unwrap().clone()
    }
}

impl UpdateObserver for SwitchableUpdateObserver {
    fn can_accept_update(&self) -> bool {
        self.accepting.load(Ordering::SeqCst)
    }

    fn on_ad_updated(&self, ad: &Ad) {
        self.received.lock().unwrap().push(ad.clone());
    }
}

/// Analytics transport recording every record handed to it
#[derive(Default)]
pub struct RecordingTransport {
    records: std::sync::Mutex<Vec<EventRecord>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn records(&self) -> Vec<EventRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AnalyticsTransport for RecordingTransport {
    async fn send(&self, record: &EventRecord) -> Result<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn transport_name(&self) -> &'static str {
        "recording"
    }
}

/// Analytics transport that always fails delivery
pub struct FailingTransport {
    attempts: AtomicUsize,
}

impl FailingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            attempts: AtomicUsize::new(0),
        })
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AnalyticsTransport for FailingTransport {
    async fn send(&self, _record: &EventRecord) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(Error::tracking("transport unavailable"))
    }

    fn transport_name(&self) -> &'static str {
        "failing"
    }
}

/// Helper to create a banner unit configuration
pub fn banner_config(autoload: bool) -> AdUnitConfig {
    AdUnitConfig::new(AdSize::Banner, AdType::Regular).with_autoload(autoload)
}

/// Wait until the unit publishes the given phase, with a timeout
pub async fn wait_for_phase(handle: &AdUnitHandle, phase: UnitPhase) {
    let mut snapshots = handle.snapshots();

    let reached = tokio::time::timeout(Duration::from_secs(2), async {
        while let Some(snapshot) = snapshots.next().await {
            if snapshot.phase == phase {
                return true;
            }
        }
        false
    })
    .await;

    assert!(
        matches!(reached, Ok(true)),
        "unit did not reach {phase:?} within 2s (currently {:?})",
        handle.phase()
    );
}

/// Give the driver task a moment to drain already-queued commands
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
