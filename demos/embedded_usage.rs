//! Minimal embedding example for adkit-core
//!
//! This example demonstrates using adkit-core as a library in a custom
//! application: a canned ad server, one banner unit with observers, and
//! a tracker delivering events to a custom transport. All lifecycles
//! are fully managed by the application.

#![allow(dead_code)]

use adkit_core::config::{AdUnitConfig, TrackerConfig};
use adkit_core::taxonomy::{self, ParamValue};
use adkit_core::traits::{AnalyticsTransport, DisplayObserver, LoadObserver};
use adkit_core::{
    Ad, AdSize, AdType, AdUnit, CannedAdServer, EventTracker, Result,
    unit::{UnitId, UnitPhase},
};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tokio_stream::StreamExt;

/// Transport that prints records instead of posting them
struct StdoutTransport;

#[async_trait::async_trait]
impl AnalyticsTransport for StdoutTransport {
    async fn send(&self, record: &adkit_core::taxonomy::EventRecord) -> Result<()> {
        println!("[Analytics] {} {:?}", record.event_type, record.parameters);
        Ok(())
    }

    fn transport_name(&self) -> &'static str {
        "stdout"
    }
}

/// Observer that prints lifecycle transitions and keeps the last load
#[derive(Default)]
struct PrintingObserver {
    last_loaded: std::sync::Mutex<Option<Ad>>,
}

impl DisplayObserver for PrintingObserver {
    fn on_displayed(&self, ad: &Ad, unit: UnitId) {
        println!("[Display] {} displayed in {}", ad.id, unit);
    }

    fn on_hidden(&self, ad: &Ad, unit: UnitId) {
        println!("[Display] {} hidden in {}", ad.id, unit);
    }

    fn on_clicked(&self, ad: &Ad, unit: UnitId) {
        println!("[Display] {} clicked in {}", ad.id, unit);
    }
}

impl LoadObserver for PrintingObserver {
    fn on_ad_loaded(&self, ad: &Ad) {
        println!("[Load] {} loaded", ad.id);
        *self.last_loaded.lock().unwrap() = Some(ad.clone());
    }

    fn on_load_failed(&self, error: &adkit_core::Error) {
        println!("[Load] failed: {}", error);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== Embedded adkit-core Example ===\n");

    // Stage a creative on the in-process server
    println!("1. Staging a banner creative...");
    let server = Arc::new(CannedAdServer::new());
    server
        .stage(
            AdSize::Banner,
            AdType::Regular,
            serde_json::json!({ "markup": "<div>hello</div>" }),
        )
        .await;

    // Create the ad unit; the application drives loading explicitly
    println!("2. Creating ad unit...");
    let config = AdUnitConfig::new(AdSize::Banner, AdType::Regular).with_autoload(false);
    let (unit, handle) = AdUnit::new(config, server.clone())?;
    let unit_task = tokio::spawn(unit.run());

    // Register observers (the application keeps ownership)
    let observer = Arc::new(PrintingObserver::default());
    let observer_weak = Arc::downgrade(&observer);
    let display_weak: Weak<dyn DisplayObserver> = observer_weak.clone();
    let load_weak: Weak<dyn LoadObserver> = observer_weak;
    handle.set_display_observer(Some(display_weak))?;
    handle.set_load_observer(Some(load_weak))?;

    // Start the tracker
    println!("3. Starting event tracker...");
    let (tracker, events) = EventTracker::new(Arc::new(StdoutTransport), &TrackerConfig::default())?;
    let tracker_task = tokio::spawn(tracker.run());

    // Load and wait for readiness
    println!("4. Loading an ad...");
    handle.request_load()?;
    let mut snapshots = handle.snapshots();
    while let Some(snapshot) = snapshots.next().await {
        if snapshot.phase == UnitPhase::Ready {
            break;
        }
    }

    // Render, click, hide; observers report each step
    println!("5. Driving a display cycle...");
    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
    let loaded = observer.last_loaded.lock().unwrap().clone();
    if let Some(ad) = loaded {
        handle.render(&ad)?;
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        handle.click()?;
        handle.hide()?;
    }

    let mut parameters = HashMap::new();
    parameters.insert(
        taxonomy::PARAM_CONTENT_ID.to_string(),
        ParamValue::from("banner-demo"),
    );
    events.track(taxonomy::EVENT_USER_VIEWED_CONTENT, parameters);

    tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;

    // Tear everything down by dropping the handles
    println!("6. Shutting down...");
    drop(handle);
    drop(events);

    let _ = tokio::time::timeout(tokio::time::Duration::from_millis(500), unit_task).await;
    let _ = tokio::time::timeout(tokio::time::Duration::from_millis(500), tracker_task).await;

    println!("\n=== Embedding Successful ===");
    println!("Key Points:");
    println!("- Unit and tracker lifecycles are fully controlled by the application");
    println!("- Observers are non-owning; dropping them unsubscribes");
    println!("- Tracking is best-effort and never blocks");

    Ok(())
}
