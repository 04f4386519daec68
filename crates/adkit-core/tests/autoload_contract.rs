//! Autoload contract tests
//!
//! With autoload enabled a unit primes its first load at startup and
//! requests exactly one reload after each hide. With autoload disabled
//! it never loads on its own.

mod common;

use adkit_core::traits::LoadObserver;
use adkit_core::unit::{AdUnit, UnitPhase};
use common::*;
use std::sync::{Arc, Weak};

#[tokio::test]
async fn test_autoload_primes_first_load_at_startup() {
    let server = Arc::new(GatedAdServer::new());
    let (unit, handle) = AdUnit::new(banner_config(true), server.clone()).unwrap();
    tokio::spawn(unit.run());

    wait_for_phase(&handle, UnitPhase::Loading).await;
    assert_eq!(server.fetch_count(), 1);
}

#[tokio::test]
async fn test_disabled_autoload_never_loads_on_its_own() {
    let server = Arc::new(GatedAdServer::new());
    let (unit, handle) = AdUnit::new(banner_config(false), server.clone()).unwrap();
    tokio::spawn(unit.run());

    settle().await;
    assert_eq!(handle.phase(), UnitPhase::Empty);
    assert_eq!(server.fetch_count(), 0);
}

#[tokio::test]
async fn test_hide_triggers_exactly_one_reload() {
    let server = Arc::new(GatedAdServer::new());
    let (unit, handle) = AdUnit::new(banner_config(true), server.clone()).unwrap();
    tokio::spawn(unit.run());

    let load = RecordingLoadObserver::new();
    let load_weak: Weak<dyn LoadObserver> = { let w = Arc::downgrade(&load); w };
    handle.set_load_observer(Some(load_weak)).unwrap();

    server.release_one();
    wait_for_phase(&handle, UnitPhase::Ready).await;
    assert_eq!(server.fetch_count(), 1);

    let ad = load.loaded_ads().remove(0);
    handle.render(&ad).unwrap();
    wait_for_phase(&handle, UnitPhase::Displaying).await;

    handle.hide().unwrap();
    wait_for_phase(&handle, UnitPhase::Loading).await;
    settle().await;

    // One reload for the hide, nothing more.
    assert_eq!(server.fetch_count(), 2);
}

#[tokio::test]
async fn test_hide_without_autoload_parks_the_unit_in_hidden() {
    let server = Arc::new(GatedAdServer::new());
    let (unit, handle) = AdUnit::new(banner_config(false), server.clone()).unwrap();
    tokio::spawn(unit.run());

    let load = RecordingLoadObserver::new();
    let load_weak: Weak<dyn LoadObserver> = { let w = Arc::downgrade(&load); w };
    handle.set_load_observer(Some(load_weak)).unwrap();

    handle.request_load().unwrap();
    server.release_one();
    wait_for_phase(&handle, UnitPhase::Ready).await;

    let ad = load.loaded_ads().remove(0);
    handle.render(&ad).unwrap();
    handle.hide().unwrap();
    settle().await;

    assert_eq!(handle.phase(), UnitPhase::Hidden);
    assert_eq!(server.fetch_count(), 1);

    // The parked unit can still be reloaded explicitly.
    handle.request_load().unwrap();
    wait_for_phase(&handle, UnitPhase::Loading).await;
    assert_eq!(server.fetch_count(), 2);
}
