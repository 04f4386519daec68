// # adkit-core
//
// Core library for the AdKit ad lifecycle and analytics event system.
//
// ## Architecture Overview
//
// This library provides the client-side core of an ad SDK:
// - **AdServer**: Trait for fetching ad payloads from the (opaque) ad-serving collaborator
// - **AnalyticsTransport**: Trait for best-effort delivery of analytics events
// - **AdUnit**: Lifecycle engine for one loadable/showable ad slot
// - **LifecycleNotifier / UpdateSlot**: Observer fan-out for display, load, video, and update events
// - **EventTracker**: Taxonomy-aware, best-effort analytics event pump
// - **CollaboratorRegistry**: Plugin-based registry for collaborator factories
//
// ## Design Principles
//
// 1. **Separation of Concerns**: The wire protocols behind ad serving and
//    analytics live in collaborator crates, never in the core
// 2. **Single-Context Affinity**: Each ad unit serializes every state
//    transition and every notification onto one driver task
// 3. **Non-Owning Observers**: Observers are weak references; the core
//    never controls a callback target's lifetime
// 4. **Best-Effort Analytics**: Tracking never blocks and never fails the
//    caller; the taxonomy is advisory and append-only
// 5. **Library-First**: Everything here is usable embedded, no daemon

pub mod ad;
pub mod config;
pub mod error;
pub mod notify;
pub mod registry;
pub mod server;
pub mod taxonomy;
pub mod tracker;
pub mod traits;
pub mod unit;

// Re-export core types for convenience
pub use ad::{Ad, AdId, AdSize, AdType};
pub use config::{AdServerConfig, AdUnitConfig, SdkConfig, TrackerConfig, TransportConfig};
pub use error::{Error, Result};
pub use notify::{LifecycleNotifier, UpdateSlot};
pub use registry::CollaboratorRegistry;
pub use server::CannedAdServer;
pub use taxonomy::{EventRecord, ParamKind, ParamValue};
pub use tracker::{EventTracker, EventTrackerHandle};
pub use traits::{
    AdServer, AnalyticsTransport, DisplayObserver, LoadObserver, UpdateObserver,
    VideoPlaybackObserver,
};
pub use unit::{AdUnit, AdUnitHandle, UnitId, UnitPhase, UnitSnapshot};
