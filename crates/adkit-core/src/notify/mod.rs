//! Lifecycle notification fan-out
//!
//! The [`LifecycleNotifier`] delivers display/hide/click, load-result,
//! and video playback events to at most one registered observer per
//! category. The [`UpdateSlot`] is the single-slot registry for
//! push-style "ad updated" delivery.
//!
//! ## Contract
//!
//! - Delivery is fire-and-forget; no return value is observed.
//! - An absent or dropped observer means the event is dropped, never
//!   queued or retried.
//! - An observer panic during notification is caught and logged; the
//!   state transition that triggered the notification stands.
//!
//! Both types are owned by an ad unit's driver task, so every delivery
//! happens on the unit's single owning execution context.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Weak;
use tracing::{debug, error};

use crate::ad::Ad;
use crate::error::Error;
use crate::traits::{DisplayObserver, LoadObserver, UpdateObserver, VideoPlaybackObserver};
use crate::unit::UnitId;

/// Per-unit observer fan-out
///
/// One weak slot per event category. Observers are held as
/// `std::sync::Weak`: registration never extends an observer's
/// lifetime, and delivery upgrades the reference first.
#[derive(Default)]
pub struct LifecycleNotifier {
    display: Option<Weak<dyn DisplayObserver>>,
    load: Option<Weak<dyn LoadObserver>>,
    video: Option<Weak<dyn VideoPlaybackObserver>>,
}

impl LifecycleNotifier {
    /// Create a notifier with no observers registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the display observer slot
    pub fn set_display_observer(&mut self, observer: Option<Weak<dyn DisplayObserver>>) {
        self.display = observer;
    }

    /// Replace the load observer slot
    pub fn set_load_observer(&mut self, observer: Option<Weak<dyn LoadObserver>>) {
        self.load = observer;
    }

    /// Replace the video playback observer slot
    pub fn set_video_observer(&mut self, observer: Option<Weak<dyn VideoPlaybackObserver>>) {
        self.video = observer;
    }

    /// Fire "displayed"
    pub fn displayed(&self, ad: &Ad, unit: UnitId) {
        Self::dispatch("displayed", &self.display, |obs| obs.on_displayed(ad, unit));
    }

    /// Fire "hidden"
    pub fn hidden(&self, ad: &Ad, unit: UnitId) {
        Self::dispatch("hidden", &self.display, |obs| obs.on_hidden(ad, unit));
    }

    /// Fire "clicked"
    pub fn clicked(&self, ad: &Ad, unit: UnitId) {
        Self::dispatch("clicked", &self.display, |obs| obs.on_clicked(ad, unit));
    }

    /// Fire "display rejected"
    pub fn display_rejected(&self, ad: &Ad, error: &Error, unit: UnitId) {
        Self::dispatch("display_rejected", &self.display, |obs| {
            obs.on_display_rejected(ad, error, unit)
        });
    }

    /// Fire "ad loaded"
    pub fn ad_loaded(&self, ad: &Ad) {
        Self::dispatch("ad_loaded", &self.load, |obs| obs.on_ad_loaded(ad));
    }

    /// Fire "load failed"
    pub fn load_failed(&self, error: &Error) {
        Self::dispatch("load_failed", &self.load, |obs| obs.on_load_failed(error));
    }

    /// Fire "playback began"
    pub fn playback_began(&self, ad: &Ad) {
        Self::dispatch("playback_began", &self.video, |obs| {
            obs.on_playback_began(ad)
        });
    }

    /// Fire "playback ended"
    pub fn playback_ended(&self, ad: &Ad, percent_viewed: f64, fully_watched: bool) {
        Self::dispatch("playback_ended", &self.video, |obs| {
            obs.on_playback_ended(ad, percent_viewed, fully_watched)
        });
    }

    /// Upgrade-then-deliver with panic containment
    fn dispatch<T: ?Sized>(event: &str, slot: &Option<Weak<T>>, deliver: impl FnOnce(&T)) {
        let Some(weak) = slot else {
            // No observer registered for this category; drop the event.
            return;
        };

        let Some(observer) = weak.upgrade() else {
            debug!(event, "observer was dropped, skipping notification");
            return;
        };

        if panic::catch_unwind(AssertUnwindSafe(|| deliver(&observer))).is_err() {
            error!(event, "observer panicked during notification");
        }
    }
}

/// Single-slot registry for push-style ad updates
///
/// Only the most recent registration is retained. The acceptance
/// predicate is queried immediately before each delivery attempt.
#[derive(Default)]
pub struct UpdateSlot {
    observer: Option<Weak<dyn UpdateObserver>>,
}

impl UpdateSlot {
    /// Create an empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the registered observer
    pub fn set(&mut self, observer: Option<Weak<dyn UpdateObserver>>) {
        self.observer = observer;
    }

    /// Offer a freshly loaded ad for push delivery
    ///
    /// Returns `true` if the ad was pushed to an accepting observer.
    /// Returns `false` when the slot is empty, the observer is gone, or
    /// the predicate declined; the caller keeps the ad for pull-style
    /// retrieval and nothing is lost.
    pub fn offer(&self, ad: &Ad) -> bool {
        let Some(weak) = &self.observer else {
            return false;
        };

        let Some(observer) = weak.upgrade() else {
            debug!("update observer was dropped, converting to pull delivery");
            return false;
        };

        if !observer.can_accept_update() {
            debug!("update observer declined, converting to pull delivery");
            return false;
        }

        if panic::catch_unwind(AssertUnwindSafe(|| observer.on_ad_updated(ad))).is_err() {
            error!("update observer panicked during notification");
        }
        true
    }
}
