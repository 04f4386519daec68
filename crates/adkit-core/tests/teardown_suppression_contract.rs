//! Teardown suppression contract tests
//!
//! Tearing a unit down cancels any in-flight load and suppresses every
//! further notification. Handles outliving the unit fail fast.

mod common;

use adkit_core::error::Error;
use adkit_core::traits::LoadObserver;
use adkit_core::unit::{AdUnit, UnitPhase};
use common::*;
use std::sync::{Arc, Weak};
use tokio::sync::oneshot;

#[tokio::test]
async fn test_teardown_mid_load_suppresses_all_notifications() {
    let server = Arc::new(GatedAdServer::new());
    let (unit, handle) = AdUnit::new(banner_config(false), server.clone()).unwrap();

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let driver = tokio::spawn(unit.run_with_shutdown(Some(shutdown_rx)));

    let load = RecordingLoadObserver::new();
    let load_weak: Weak<dyn LoadObserver> = { let w = Arc::downgrade(&load); w };
    handle.set_load_observer(Some(load_weak)).unwrap();

    handle.request_load().unwrap();
    wait_for_phase(&handle, UnitPhase::Loading).await;
    assert_eq!(server.fetch_count(), 1);

    shutdown_tx.send(()).ok();
    driver.await.unwrap().unwrap();

    // Releasing the gate now goes nowhere: the in-flight future was
    // dropped with the driver and its completion is never observed.
    server.release_one();
    settle().await;

    assert_eq!(load.loaded_count(), 0);
    assert!(load.failures().is_empty());
}

#[tokio::test]
async fn test_handle_calls_after_teardown_fail_with_unit_closed() {
    let server = Arc::new(GatedAdServer::new());
    let (unit, handle) = AdUnit::new(banner_config(false), server).unwrap();

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let driver = tokio::spawn(unit.run_with_shutdown(Some(shutdown_rx)));

    shutdown_tx.send(()).ok();
    driver.await.unwrap().unwrap();

    assert!(matches!(handle.request_load(), Err(Error::UnitClosed)));
    assert!(matches!(handle.hide(), Err(Error::UnitClosed)));
    assert!(!handle.is_ready_for_display());
}

#[tokio::test]
async fn test_dropping_every_handle_tears_the_unit_down() {
    let server = Arc::new(GatedAdServer::new());
    let (unit, handle) = AdUnit::new(banner_config(false), server.clone()).unwrap();
    let driver = tokio::spawn(unit.run());

    handle.request_load().unwrap();
    wait_for_phase(&handle, UnitPhase::Loading).await;

    drop(handle);
    driver.await.unwrap().unwrap();

    // The cancelled fetch never resolves into a state change.
    server.release_one();
    settle().await;
    assert_eq!(server.fetch_count(), 1);
}
