//! Core traits for the AdKit system
//!
//! This module defines the abstract interfaces the core depends on.
//!
//! - [`AdServer`]: fetch ad payloads from the (opaque) ad-serving collaborator
//! - [`AnalyticsTransport`]: best-effort delivery of analytics event records
//! - Observer traits: callback capabilities exposed by the core to callers

pub mod ad_server;
pub mod analytics;
pub mod observers;

pub use ad_server::{AdServer, AdServerFactory};
pub use analytics::{AnalyticsTransport, AnalyticsTransportFactory};
pub use observers::{DisplayObserver, LoadObserver, UpdateObserver, VideoPlaybackObserver};
