//! Lifecycle notification contract tests
//!
//! Verifies that a full load/render/hide cycle delivers exactly one
//! notification per transition, in order, and that readiness queries
//! track the published phase.

mod common;

use adkit_core::ad::{AdSize, AdType};
use adkit_core::server::CannedAdServer;
use adkit_core::traits::{DisplayObserver, LoadObserver};
use adkit_core::unit::{AdUnit, UnitPhase};
use common::*;
use std::sync::{Arc, Weak};

#[tokio::test]
async fn test_full_cycle_delivers_one_notification_per_transition() {
    let server = Arc::new(CannedAdServer::new());
    server
        .stage(AdSize::Banner, AdType::Regular, serde_json::json!({"n": 1}))
        .await;

    let (unit, handle) = AdUnit::new(banner_config(false), server).unwrap();
    tokio::spawn(unit.run());

    let display = RecordingDisplayObserver::new();
    let load = RecordingLoadObserver::new();
    let display_weak: Weak<dyn DisplayObserver> = { let w = Arc::downgrade(&display); w };
    let load_weak: Weak<dyn LoadObserver> = { let w = Arc::downgrade(&load); w };
    handle.set_display_observer(Some(display_weak)).unwrap();
    handle.set_load_observer(Some(load_weak)).unwrap();

    assert!(!handle.is_ready_for_display());

    handle.request_load().unwrap();
    wait_for_phase(&handle, UnitPhase::Ready).await;

    assert!(handle.is_ready_for_display());
    assert_eq!(load.loaded_count(), 1);
    assert_eq!(display.displayed_count(), 0);

    let ad = load.loaded_ads().remove(0);
    handle.render(&ad).unwrap();
    wait_for_phase(&handle, UnitPhase::Displaying).await;

    assert!(!handle.is_ready_for_display());
    assert_eq!(display.displayed_count(), 1);
    assert_eq!(display.hidden_count(), 0);

    handle.click().unwrap();
    settle().await;
    assert_eq!(display.clicked_count(), 1);

    handle.hide().unwrap();
    wait_for_phase(&handle, UnitPhase::Hidden).await;

    assert_eq!(display.displayed_count(), 1);
    assert_eq!(display.hidden_count(), 1);
    assert_eq!(load.loaded_count(), 1);
}

#[tokio::test]
async fn test_click_outside_displaying_is_ignored() {
    let server = Arc::new(CannedAdServer::new());
    let (unit, handle) = AdUnit::new(banner_config(false), server).unwrap();
    tokio::spawn(unit.run());

    let display = RecordingDisplayObserver::new();
    let display_weak: Weak<dyn DisplayObserver> = { let w = Arc::downgrade(&display); w };
    handle.set_display_observer(Some(display_weak)).unwrap();

    handle.click().unwrap();
    settle().await;

    assert_eq!(display.clicked_count(), 0);
}

#[tokio::test]
async fn test_observer_panic_does_not_corrupt_the_unit() {
    struct PanickingLoadObserver;

    impl LoadObserver for PanickingLoadObserver {
        fn on_ad_loaded(&self, _ad: &adkit_core::ad::Ad) {
            panic!("observer bug");
        }

        fn on_load_failed(&self, _error: &adkit_core::error::Error) {}
    }

    let server = Arc::new(CannedAdServer::new());
    server
        .stage(AdSize::Banner, AdType::Regular, serde_json::json!({}))
        .await;

    let (unit, handle) = AdUnit::new(banner_config(false), server).unwrap();
    tokio::spawn(unit.run());

    let observer = Arc::new(PanickingLoadObserver);
    let weak: Weak<dyn LoadObserver> = { let w = Arc::downgrade(&observer); w };
    handle.set_load_observer(Some(weak)).unwrap();

    handle.request_load().unwrap();
    wait_for_phase(&handle, UnitPhase::Ready).await;

    // The panic was contained; the completed transition stands.
    assert!(handle.is_ready_for_display());
    assert!(handle.current_ad_id().is_some());
}

#[tokio::test]
async fn test_dropped_observer_stops_receiving_without_blocking_lifecycle() {
    let server = Arc::new(CannedAdServer::new());
    server
        .stage(AdSize::Banner, AdType::Regular, serde_json::json!({}))
        .await;

    let (unit, handle) = AdUnit::new(banner_config(false), server).unwrap();
    tokio::spawn(unit.run());

    let load = RecordingLoadObserver::new();
    let load_weak: Weak<dyn LoadObserver> = { let w = Arc::downgrade(&load); w };
    handle.set_load_observer(Some(load_weak)).unwrap();
    settle().await;

    // Registration is non-owning: dropping the observer is enough to
    // unsubscribe, and the load itself still completes.
    drop(load);

    handle.request_load().unwrap();
    wait_for_phase(&handle, UnitPhase::Ready).await;
    assert!(handle.is_ready_for_display());
}
