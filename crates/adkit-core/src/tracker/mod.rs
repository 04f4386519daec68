//! Analytics event tracker
//!
//! The [`EventTracker`] forwards event records to the external
//! analytics transport, best-effort. Its [`EventTrackerHandle`] never
//! blocks the caller, never errors, and never rejects an identifier:
//! unknown event types and unknown keys are forward-compatible by
//! contract and are passed through unchanged.
//!
//! ## Event Flow
//!
//! 1. Caller invokes `track(event_type, parameters)`
//! 2. The record is queued on a bounded channel (dropped with a warning
//!    when the channel is full)
//! 3. The tracker task logs taxonomy advisories at debug level
//! 4. The record is handed to the transport; delivery failure is logged
//!    and the record is dropped, never surfaced to the caller

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::config::TrackerConfig;
use crate::error::Result;
use crate::taxonomy::{self, EventRecord, ParamValue};
use crate::traits::AnalyticsTransport;

/// Pump task forwarding queued records to the transport
///
/// ## Lifecycle
///
/// 1. Create with [`EventTracker::new()`]
/// 2. Spawn [`EventTracker::run()`]
/// 3. The task exits when every handle has been dropped
pub struct EventTracker {
    /// Transport for delivering records
    transport: Arc<dyn AnalyticsTransport>,

    /// Queued records from handles
    event_rx: mpsc::Receiver<EventRecord>,
}

impl EventTracker {
    /// Create a new tracker and its caller-facing handle
    ///
    /// Fails with a configuration error when the event channel capacity
    /// is zero.
    pub fn new(
        transport: Arc<dyn AnalyticsTransport>,
        config: &TrackerConfig,
    ) -> Result<(Self, EventTrackerHandle)> {
        config.validate()?;

        let (event_tx, event_rx) = mpsc::channel(config.event_channel_capacity);

        let tracker = Self {
            transport,
            event_rx,
        };

        Ok((tracker, EventTrackerHandle { event_tx }))
    }

    /// Run the tracker until every handle has been dropped
    pub async fn run(self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Test-only helper to run the tracker with a controlled shutdown signal
    ///
    /// **TESTING ONLY**: contract tests need deterministic termination
    /// while handles are still alive. Production code should use
    /// [`EventTracker::run`].
    pub async fn run_with_shutdown(
        self,
        shutdown_rx: Option<oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.run_internal(shutdown_rx).await
    }

    async fn run_internal(mut self, shutdown_rx: Option<oneshot::Receiver<()>>) -> Result<()> {
        info!(
            transport = self.transport.transport_name(),
            "event tracker started"
        );

        if let Some(mut rx) = shutdown_rx {
            loop {
                tokio::select! {
                    record = self.event_rx.recv() => match record {
                        Some(record) => self.forward(record).await,
                        None => break,
                    },

                    _ = &mut rx => {
                        info!("shutdown signal received");
                        break;
                    }
                }
            }
        } else {
            while let Some(record) = self.event_rx.recv().await {
                self.forward(record).await;
            }
        }

        info!("event tracker stopped");
        Ok(())
    }

    /// Deliver one record, best-effort
    async fn forward(&self, record: EventRecord) {
        for note in taxonomy::advisory_notes(&record) {
            debug!(event_type = %record.event_type, "{note}");
        }

        if let Err(error) = self.transport.send(&record).await {
            // Tracking is best-effort: log and drop, never surface.
            warn!(
                transport = self.transport.transport_name(),
                event_type = %record.event_type,
                %error,
                "event delivery failed, dropping record"
            );
        }
    }
}

/// Caller-facing handle for tracking events
///
/// Cheap to clone. Tracking never blocks, never errors, and forwards
/// the identifier and parameters unchanged.
#[derive(Clone)]
pub struct EventTrackerHandle {
    event_tx: mpsc::Sender<EventRecord>,
}

impl EventTrackerHandle {
    /// Track an event
    ///
    /// `event_type` may be any string; the known-taxonomy constants in
    /// [`crate::taxonomy`] are recommendations, not a whitelist.
    /// `parameters` is an open mapping with no required keys.
    pub fn track(
        &self,
        event_type: impl Into<String>,
        parameters: HashMap<String, ParamValue>,
    ) {
        self.track_record(EventRecord::new(event_type, parameters));
    }

    /// Track a pre-built event record
    pub fn track_record(&self, record: EventRecord) {
        // Best-effort: a full queue or stopped tracker drops the record.
        if let Err(err) = self.event_tx.try_send(record) {
            let record = match err {
                mpsc::error::TrySendError::Full(record) => {
                    warn!("event channel full, dropping record");
                    record
                }
                mpsc::error::TrySendError::Closed(record) => {
                    warn!("event tracker stopped, dropping record");
                    record
                }
            };
            debug!(event_type = %record.event_type, "dropped event record");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NullTransport;

    #[async_trait]
    impl AnalyticsTransport for NullTransport {
        async fn send(&self, _record: &EventRecord) -> Result<()> {
            Ok(())
        }

        fn transport_name(&self) -> &'static str {
            "null"
        }
    }

    #[tokio::test]
    async fn test_track_after_tracker_stopped_is_silent() {
        let (tracker, handle) =
            EventTracker::new(Arc::new(NullTransport), &TrackerConfig::default()).unwrap();
        drop(tracker);

        // Must not panic or error.
        handle.track("custom.unlisted.event", HashMap::new());
    }

    #[tokio::test]
    async fn test_zero_capacity_is_a_config_error() {
        let config = TrackerConfig {
            event_channel_capacity: 0,
        };

        let err = EventTracker::new(Arc::new(NullTransport), &config)
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }
}
