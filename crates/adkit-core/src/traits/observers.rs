// # Observer Traits
//
// Callback capabilities exposed by the core to callers, one trait per
// concern. Ad units hold observers as `std::sync::Weak` trait objects:
// the unit never owns an observer's lifetime, and a dropped observer is
// skipped at delivery time after a liveness check.
//
// All notifications are delivered on the unit's single driver task (the
// UI-owning execution context), in transition order, fire-and-forget.

use crate::ad::Ad;
use crate::error::Error;
use crate::unit::UnitId;

/// Listener for ad display lifecycle events
///
/// At most one display observer is registered per ad unit. An absent
/// observer means the event is silently dropped, never queued.
pub trait DisplayObserver: Send + Sync {
    /// The ad was displayed in the given unit.
    fn on_displayed(&self, ad: &Ad, unit: UnitId);

    /// The ad was hidden from the given unit.
    ///
    /// This occurs when the user dismisses an interstitial, or when a
    /// banner rotates out.
    fn on_hidden(&self, ad: &Ad, unit: UnitId);

    /// The ad was clicked in the given unit.
    ///
    /// May fire zero or more times while the ad is displayed; never
    /// changes the unit's state.
    fn on_clicked(&self, ad: &Ad, unit: UnitId);

    /// A render that passed the call-site check was rejected by the
    /// unit, because the unit moved on before the command arrived.
    ///
    /// Fires instead of `on_displayed` for that render; without it a
    /// caller whose `render` returned `Ok` would wait for a
    /// "displayed" that never comes. Default is a no-op.
    fn on_display_rejected(&self, _ad: &Ad, _error: &Error, _unit: UnitId) {}
}

/// Listener for ad load results
pub trait LoadObserver: Send + Sync {
    /// A load completed successfully; `ad` is now the unit's current payload.
    fn on_ad_loaded(&self, ad: &Ad);

    /// A load failed; the unit reverted to empty and is reloadable.
    fn on_load_failed(&self, error: &Error);
}

/// Listener for video playback events
///
/// Driven by the rendering layer for ad creatives that contain video.
pub trait VideoPlaybackObserver: Send + Sync {
    /// Video playback began for the displayed ad.
    fn on_playback_began(&self, ad: &Ad);

    /// Video playback ended for the displayed ad.
    ///
    /// `percent_viewed` is in `0.0..=100.0`; `fully_watched` is the
    /// server-side completion criterion for rewarded ads.
    fn on_playback_ended(&self, ad: &Ad, percent_viewed: f64, fully_watched: bool);
}

/// Listener for push-style "ad updated" delivery
///
/// Registered in a single-slot registry: only the most recent
/// registration is retained. The predicate is queried immediately
/// before each delivery attempt; answering `false` converts that
/// delivery to the pull path (`is_ready_for_display` / `render`), and
/// nothing is lost.
pub trait UpdateObserver: Send + Sync {
    /// Whether this observer can receive an updated ad right now.
    fn can_accept_update(&self) -> bool;

    /// Receive a freshly loaded ad.
    fn on_ad_updated(&self, ad: &Ad);
}
