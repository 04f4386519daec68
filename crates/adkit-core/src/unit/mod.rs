//! Ad unit lifecycle engine
//!
//! An [`AdUnit`] owns one loadable/showable ad slot:
//! - Fetching payloads from the [`AdServer`] collaborator
//! - Driving the lifecycle state machine
//! - Fanning out observer notifications via [`LifecycleNotifier`]
//! - Offering fresh ads to the [`UpdateSlot`]
//!
//! ## Architecture
//!
//! ```text
//! AdUnitHandle ── commands ──┐
//! (clone per caller)         ▼
//!                    ┌──────────────┐
//!                    │ AdUnit task  │◄── in-flight load ── AdServer
//!                    └──────────────┘
//!                       │        │
//!                       ▼        ▼
//!                  snapshots  observers
//!                  (watch)    (weak, per category)
//! ```
//!
//! ## Lifecycle
//!
//! `Empty → Loading → Ready → Displaying → Hidden`, with
//! `Hidden → Loading` and `Ready → Loading` as the reload edges and
//! `Loading → Empty` on failure. There is no terminal phase; the unit
//! is reusable until its driver task is torn down.
//!
//! ## Threading
//!
//! The driver task is the unit's single owning execution context: every
//! state transition and every observer notification happens on it, in
//! order. Handles marshal work onto it through a bounded command
//! channel and never block. At most one load is in flight at a time;
//! tearing the task down drops the in-flight future (cancelling the
//! request) and suppresses all further notifications.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::Weak;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, oneshot, watch};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};

use crate::ad::{Ad, AdId, AdSize, AdType};
use crate::config::AdUnitConfig;
use crate::error::{Error, Result};
use crate::notify::{LifecycleNotifier, UpdateSlot};
use crate::traits::{AdServer, DisplayObserver, LoadObserver, UpdateObserver, VideoPlaybackObserver};

/// Process-unique identifier of an ad unit
///
/// Handed to display observers as the non-owning reference to the unit
/// ("container") an event happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitId(u64);

static NEXT_UNIT_ID: AtomicU64 = AtomicU64::new(1);

impl UnitId {
    /// Allocate the next process-unique unit id
    pub fn next() -> Self {
        Self(NEXT_UNIT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unit-{}", self.0)
    }
}

/// Lifecycle phase of an ad unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitPhase {
    /// No ad loaded; a load may be requested
    Empty,
    /// A load is in flight
    Loading,
    /// An ad is loaded and ready to display
    Ready,
    /// The loaded ad is currently displayed
    Displaying,
    /// The ad was hidden; the unit may reload
    Hidden,
}

/// Published view of a unit's state
///
/// Read without blocking via [`AdUnitHandle::phase`] and friends, or
/// observed as a stream via [`AdUnitHandle::snapshots`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSnapshot {
    /// Current lifecycle phase
    pub phase: UnitPhase,
    /// Identifier of the currently held payload, if any
    pub current_ad: Option<AdId>,
}

type LoadFuture = Pin<Box<dyn Future<Output = Result<Ad>> + Send>>;

enum Command {
    Load,
    Render(Ad),
    Hide,
    Click,
    VideoBegan,
    VideoEnded {
        percent_viewed: f64,
        fully_watched: bool,
    },
    SetDisplayObserver(Option<Weak<dyn DisplayObserver>>),
    SetLoadObserver(Option<Weak<dyn LoadObserver>>),
    SetVideoObserver(Option<Weak<dyn VideoPlaybackObserver>>),
    SetUpdateObserver(Option<Weak<dyn UpdateObserver>>),
}

/// Driver for one ad slot
///
/// Created with [`AdUnit::new`], which also yields the cloneable
/// [`AdUnitHandle`] callers interact with. The caller spawns
/// [`AdUnit::run`] onto its runtime; dropping every handle (or firing
/// the test shutdown signal) tears the unit down.
pub struct AdUnit {
    id: UnitId,
    size: AdSize,
    ad_type: AdType,
    autoload: bool,
    ad_server: Arc<dyn AdServer>,
    notifier: LifecycleNotifier,
    update_slot: UpdateSlot,
    phase: UnitPhase,
    current_ad: Option<Ad>,
    cmd_rx: mpsc::Receiver<Command>,
    snapshot_tx: watch::Sender<UnitSnapshot>,
}

impl AdUnit {
    /// Create a new ad unit and its caller-facing handle
    ///
    /// # Parameters
    ///
    /// - `config`: unit configuration (size, type, autoload, capacity)
    /// - `ad_server`: ad-serving collaborator
    pub fn new(config: AdUnitConfig, ad_server: Arc<dyn AdServer>) -> Result<(Self, AdUnitHandle)> {
        config.validate()?;

        if !ad_server.supports(config.size, config.ad_type) {
            return Err(Error::invalid_size(format!(
                "server {} does not serve {} {} ads",
                ad_server.server_name(),
                config.size,
                config.ad_type
            )));
        }

        let (cmd_tx, cmd_rx) = mpsc::channel(config.command_channel_capacity);
        let (snapshot_tx, snapshot_rx) = watch::channel(UnitSnapshot {
            phase: UnitPhase::Empty,
            current_ad: None,
        });

        let id = UnitId::next();

        let unit = Self {
            id,
            size: config.size,
            ad_type: config.ad_type,
            autoload: config.autoload,
            ad_server,
            notifier: LifecycleNotifier::new(),
            update_slot: UpdateSlot::new(),
            phase: UnitPhase::Empty,
            current_ad: None,
            cmd_rx,
            snapshot_tx,
        };

        let handle = AdUnitHandle {
            id,
            size: config.size,
            ad_type: config.ad_type,
            cmd_tx,
            snapshot_rx,
        };

        Ok((unit, handle))
    }

    /// This unit's identifier
    pub fn id(&self) -> UnitId {
        self.id
    }

    /// Run the unit until every handle has been dropped
    pub async fn run(self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Test-only helper to run the unit with a controlled shutdown signal
    ///
    /// **TESTING ONLY**: contract tests need to tear a unit down while
    /// handles (and possibly a load) are still alive. Production code
    /// should use [`AdUnit::run`] and tear down by dropping handles.
    pub async fn run_with_shutdown(
        self,
        shutdown_rx: Option<oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.run_internal(shutdown_rx).await
    }

    async fn run_internal(mut self, shutdown_rx: Option<oneshot::Receiver<()>>) -> Result<()> {
        info!(unit = %self.id, size = %self.size, ad_type = %self.ad_type, "ad unit started");

        let mut inflight: Option<LoadFuture> = None;

        if self.autoload {
            self.begin_load(&mut inflight);
        }

        if let Some(mut rx) = shutdown_rx {
            loop {
                tokio::select! {
                    cmd = self.cmd_rx.recv() => match cmd {
                        Some(cmd) => self.handle_command(cmd, &mut inflight),
                        None => {
                            debug!(unit = %self.id, "all handles dropped");
                            break;
                        }
                    },

                    result = async { inflight.as_mut().unwrap().await }, if inflight.is_some() => {
                        inflight = None;
                        self.finish_load(result);
                    }

                    _ = &mut rx => {
                        info!(unit = %self.id, "shutdown signal received");
                        break;
                    }
                }
            }
        } else {
            loop {
                tokio::select! {
                    cmd = self.cmd_rx.recv() => match cmd {
                        Some(cmd) => self.handle_command(cmd, &mut inflight),
                        None => {
                            debug!(unit = %self.id, "all handles dropped");
                            break;
                        }
                    },

                    result = async { inflight.as_mut().unwrap().await }, if inflight.is_some() => {
                        inflight = None;
                        self.finish_load(result);
                    }
                }
            }
        }

        // Dropping `inflight` here cancels any request still in flight;
        // no load completion can be observed past this point.
        info!(unit = %self.id, "ad unit stopped");
        Ok(())
    }

    fn handle_command(&mut self, cmd: Command, inflight: &mut Option<LoadFuture>) {
        match cmd {
            Command::Load => self.begin_load(inflight),
            Command::Render(ad) => self.render(ad),
            Command::Hide => self.hide(inflight),
            Command::Click => self.click(),
            Command::VideoBegan => self.video_began(),
            Command::VideoEnded {
                percent_viewed,
                fully_watched,
            } => self.video_ended(percent_viewed, fully_watched),
            Command::SetDisplayObserver(observer) => self.notifier.set_display_observer(observer),
            Command::SetLoadObserver(observer) => self.notifier.set_load_observer(observer),
            Command::SetVideoObserver(observer) => self.notifier.set_video_observer(observer),
            Command::SetUpdateObserver(observer) => self.update_slot.set(observer),
        }
    }

    /// Start a load unless one is already in flight
    fn begin_load(&mut self, inflight: &mut Option<LoadFuture>) {
        if inflight.is_some() {
            debug!(unit = %self.id, "load already in flight, collapsing request");
            return;
        }

        if self.phase == UnitPhase::Displaying {
            warn!(unit = %self.id, "load requested while displaying, ignoring");
            return;
        }

        debug!(unit = %self.id, "requesting ad from {}", self.ad_server.server_name());

        let server = Arc::clone(&self.ad_server);
        let (size, ad_type) = (self.size, self.ad_type);
        *inflight = Some(Box::pin(async move { server.fetch_ad(size, ad_type).await }));

        self.set_phase(UnitPhase::Loading);
    }

    /// Apply a completed load result
    fn finish_load(&mut self, result: Result<Ad>) {
        match result {
            Ok(ad) => {
                info!(unit = %self.id, ad = %ad.id, "ad loaded");
                self.current_ad = Some(ad.clone());
                self.set_phase(UnitPhase::Ready);
                self.notifier.ad_loaded(&ad);
                if !self.update_slot.offer(&ad) {
                    debug!(unit = %self.id, ad = %ad.id, "ad held for pull-style retrieval");
                }
            }
            Err(error) => {
                warn!(unit = %self.id, %error, "ad load failed");
                self.current_ad = None;
                self.set_phase(UnitPhase::Empty);
                self.notifier.load_failed(&error);
            }
        }
    }

    fn render(&mut self, ad: Ad) {
        // The handle already rejected this render synchronously unless
        // the snapshot said it was valid; re-check against live state in
        // case the unit moved on in between.
        match self.validate_render(&ad) {
            Ok(()) => {
                self.set_phase(UnitPhase::Displaying);
                self.notifier.displayed(&ad, self.id);
            }
            Err(error) => {
                // The caller's render() already returned Ok; tell its
                // display observer no "displayed" is coming.
                warn!(unit = %self.id, %error, "render rejected");
                self.notifier.display_rejected(&ad, &error, self.id);
            }
        }
    }

    fn validate_render(&self, ad: &Ad) -> Result<()> {
        validate_render_against(self.phase, self.current_ad.as_ref().map(|a| a.id), self.size, self.ad_type, ad)
    }

    fn hide(&mut self, inflight: &mut Option<LoadFuture>) {
        if self.phase != UnitPhase::Displaying {
            debug!(unit = %self.id, phase = ?self.phase, "hide ignored, nothing displayed");
            return;
        }

        let Some(ad) = self.current_ad.clone() else {
            warn!(unit = %self.id, "displaying phase with no payload, resetting");
            self.set_phase(UnitPhase::Empty);
            return;
        };

        self.set_phase(UnitPhase::Hidden);
        self.notifier.hidden(&ad, self.id);

        if self.autoload {
            self.begin_load(inflight);
        }
    }

    fn click(&mut self) {
        if self.phase != UnitPhase::Displaying {
            debug!(unit = %self.id, phase = ?self.phase, "click ignored, nothing displayed");
            return;
        }

        let Some(ad) = self.current_ad.clone() else {
            return;
        };

        // Clicks never change state.
        self.notifier.clicked(&ad, self.id);
    }

    fn video_began(&mut self) {
        if self.phase != UnitPhase::Displaying {
            debug!(unit = %self.id, "playback event ignored, nothing displayed");
            return;
        }
        if let Some(ad) = self.current_ad.clone() {
            self.notifier.playback_began(&ad);
        }
    }

    fn video_ended(&mut self, percent_viewed: f64, fully_watched: bool) {
        if self.phase != UnitPhase::Displaying {
            debug!(unit = %self.id, "playback event ignored, nothing displayed");
            return;
        }
        if let Some(ad) = self.current_ad.clone() {
            self.notifier
                .playback_ended(&ad, percent_viewed, fully_watched);
        }
    }

    fn set_phase(&mut self, phase: UnitPhase) {
        debug!(unit = %self.id, from = ?self.phase, to = ?phase, "phase transition");
        self.phase = phase;

        // Receivers may all be gone during teardown; that's fine.
        let _ = self.snapshot_tx.send(UnitSnapshot {
            phase,
            current_ad: self.current_ad.as_ref().map(|ad| ad.id),
        });
    }
}

/// Shared render precondition check, used by both the handle (against
/// the published snapshot, failing fast at the call site) and the
/// driver (against live state).
fn validate_render_against(
    phase: UnitPhase,
    current_ad: Option<AdId>,
    size: AdSize,
    ad_type: AdType,
    ad: &Ad,
) -> Result<()> {
    if phase != UnitPhase::Ready {
        return Err(Error::invalid_ad(format!(
            "unit is {phase:?}, not ready to display"
        )));
    }

    if current_ad != Some(ad.id) {
        return Err(Error::invalid_ad(format!(
            "{} was not loaded by this unit",
            ad.id
        )));
    }

    if ad.size != size || ad.ad_type != ad_type {
        return Err(Error::invalid_ad(format!(
            "{} is a {} {} ad, unit displays {} {}",
            ad.id, ad.size, ad.ad_type, size, ad_type
        )));
    }

    Ok(())
}

/// Caller-facing handle to an ad unit
///
/// Cheap to clone; every method returns immediately. State-changing
/// calls are marshaled onto the unit's driver task; queries read the
/// latest published snapshot. Once the driver has stopped, every
/// state-changing call fails with [`Error::UnitClosed`]; nothing is
/// delivered to a torn-down unit's observers.
#[derive(Clone)]
pub struct AdUnitHandle {
    id: UnitId,
    size: AdSize,
    ad_type: AdType,
    cmd_tx: mpsc::Sender<Command>,
    snapshot_rx: watch::Receiver<UnitSnapshot>,
}

impl AdUnitHandle {
    /// The unit's identifier
    pub fn id(&self) -> UnitId {
        self.id
    }

    /// The size this unit loads
    pub fn size(&self) -> AdSize {
        self.size
    }

    /// The ad type this unit loads
    pub fn ad_type(&self) -> AdType {
        self.ad_type
    }

    /// Start loading a new advertisement
    ///
    /// Returns immediately; completion is delivered to the registered
    /// [`LoadObserver`]. Requests issued while a load is already in
    /// flight collapse into it (at most one load in flight per unit).
    pub fn request_load(&self) -> Result<()> {
        self.send(Command::Load)
    }

    /// Check if an ad is currently ready to display
    ///
    /// True iff the unit is in the `Ready` phase. Never blocks and
    /// never triggers a load.
    pub fn is_ready_for_display(&self) -> bool {
        !self.cmd_tx.is_closed() && self.snapshot_rx.borrow().phase == UnitPhase::Ready
    }

    /// The unit's current lifecycle phase
    pub fn phase(&self) -> UnitPhase {
        self.snapshot_rx.borrow().phase
    }

    /// Identifier of the currently held payload, if any
    pub fn current_ad_id(&self) -> Option<AdId> {
        self.snapshot_rx.borrow().current_ad
    }

    /// Observe unit snapshots as a stream
    ///
    /// Yields the current snapshot immediately, then one item per
    /// change. The stream ends when the unit is torn down.
    pub fn snapshots(&self) -> WatchStream<UnitSnapshot> {
        WatchStream::new(self.snapshot_rx.clone())
    }

    /// Render a previously loaded ad
    ///
    /// Fails fast with [`Error::InvalidAd`] if the unit is not ready,
    /// the payload is not the one this unit loaded, or the size/type
    /// does not match. Re-rendering while already displaying fails the
    /// same way and does not re-fire "displayed". On success the
    /// "displayed" notification fires from the driver task; if the unit
    /// moved on before the command arrived, the driver rejects the
    /// render and fires "display rejected" instead, so an `Ok` here is
    /// always answered by exactly one of the two.
    pub fn render(&self, ad: &Ad) -> Result<()> {
        let snapshot = self.snapshot_rx.borrow().clone();
        validate_render_against(snapshot.phase, snapshot.current_ad, self.size, self.ad_type, ad)?;
        self.send(Command::Render(ad.clone()))
    }

    /// Report that the displayed ad was hidden
    ///
    /// Fires the "hidden" notification; when autoload is enabled the
    /// unit immediately requests its next load.
    pub fn hide(&self) -> Result<()> {
        self.send(Command::Hide)
    }

    /// Report that the displayed ad was clicked
    pub fn click(&self) -> Result<()> {
        self.send(Command::Click)
    }

    /// Report that video playback began for the displayed ad
    pub fn video_began(&self) -> Result<()> {
        self.send(Command::VideoBegan)
    }

    /// Report that video playback ended for the displayed ad
    pub fn video_ended(&self, percent_viewed: f64, fully_watched: bool) -> Result<()> {
        self.send(Command::VideoEnded {
            percent_viewed,
            fully_watched,
        })
    }

    /// Register (or clear) the display observer
    pub fn set_display_observer(&self, observer: Option<Weak<dyn DisplayObserver>>) -> Result<()> {
        self.send(Command::SetDisplayObserver(observer))
    }

    /// Register (or clear) the load observer
    pub fn set_load_observer(&self, observer: Option<Weak<dyn LoadObserver>>) -> Result<()> {
        self.send(Command::SetLoadObserver(observer))
    }

    /// Register (or clear) the video playback observer
    pub fn set_video_observer(
        &self,
        observer: Option<Weak<dyn VideoPlaybackObserver>>,
    ) -> Result<()> {
        self.send(Command::SetVideoObserver(observer))
    }

    /// Register (or clear) the update observer
    ///
    /// Single slot: the most recent registration wins.
    pub fn set_update_observer(&self, observer: Option<Weak<dyn UpdateObserver>>) -> Result<()> {
        self.send(Command::SetUpdateObserver(observer))
    }

    fn send(&self, cmd: Command) -> Result<()> {
        self.cmd_tx.try_send(cmd).map_err(|err| match err {
            mpsc::error::TrySendError::Closed(_) => Error::UnitClosed,
            mpsc::error::TrySendError::Full(_) => {
                Error::other("unit command channel is full, command rejected")
            }
        })
    }
}
