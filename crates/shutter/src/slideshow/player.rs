//! Slideshow playback on a dedicated thread.
//!
//! A [`SlideshowPlayer`] walks a [`FrameSequence`] on a timer. All state the
//! playback thread shares with callers lives in one mutex with one condition
//! variable: pause, resume, stop and interval changes all wake the thread,
//! which re-checks the state before doing anything.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use shutter::slideshow::{FrameSequence, PlayerBuilder};
//!
//! let player = PlayerBuilder::new()
//!     .interval(Duration::from_secs(2))
//!     .build(FrameSequence::from_album(&album));
//!
//! player.on_frame_changed(|index| println!("showing frame {index}"));
//! player.start()?;
//! player.pause();
//! player.next();
//! player.stop();
//! player.join();
//! ```

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};
use shutter_core::logging::targets;
use shutter_core::{ConnectionId, Signal};

use super::controls::TransportControls;
use super::sequence::{Frame, FrameSequence};
use crate::config::SlideshowConfig;
use crate::error::{PlayerError, PlayerResult};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Lifecycle state of a player.
///
/// `Idle -> Running <-> Paused -> Stopped`. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerState {
    /// Created, never started.
    #[default]
    Idle,
    /// Advancing on the timer.
    Running,
    /// Thread parked; index kept.
    Paused,
    /// Finished. A new player is needed to play again.
    Stopped,
}

impl PlayerState {
    /// Returns `true` while the playback thread should keep going.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}

/// Configuration for creating a player.
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Name of the playback thread.
    pub name: String,
    /// Stack size of the playback thread in bytes. `None` uses the default.
    pub stack_size: Option<usize>,
    /// Time between frames.
    pub interval: Duration,
    /// Start in fullscreen mode.
    pub fullscreen: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::from(&SlideshowConfig::default())
    }
}

impl From<&SlideshowConfig> for PlayerConfig {
    fn from(config: &SlideshowConfig) -> Self {
        Self {
            name: "shutter-slideshow".to_string(),
            stack_size: None,
            interval: config.interval().max(MIN_INTERVAL),
            fullscreen: config.fullscreen_default,
        }
    }
}

/// Builder for [`SlideshowPlayer`].
#[derive(Debug, Default)]
pub struct PlayerBuilder {
    config: PlayerConfig,
}

impl PlayerBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the slideshow section of the gallery configuration.
    pub fn from_config(config: &SlideshowConfig) -> Self {
        Self {
            config: PlayerConfig::from(config),
        }
    }

    /// Set the playback thread name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set the playback thread stack size.
    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = Some(size);
        self
    }

    /// Set the time between frames. Clamped to at least one millisecond.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.config.interval = interval.max(MIN_INTERVAL);
        self
    }

    /// Start in fullscreen mode.
    pub fn fullscreen(mut self, fullscreen: bool) -> Self {
        self.config.fullscreen = fullscreen;
        self
    }

    /// Build an idle player over `sequence`.
    pub fn build(self, sequence: FrameSequence) -> SlideshowPlayer {
        SlideshowPlayer::with_config(sequence, self.config)
    }
}

/// Cross-thread state. Only ever touched under `Shared::transport`.
#[derive(Debug)]
struct Transport {
    state: PlayerState,
    index: usize,
    interval: Duration,
    fullscreen: bool,
    thread_alive: bool,
}

struct PlayerSignals {
    frame_changed: Signal<usize>,
    state_changed: Signal<PlayerState>,
    fullscreen_changed: Signal<bool>,
}

struct Shared {
    transport: Mutex<Transport>,
    wake: Condvar,
    signals: PlayerSignals,
}

/// The sleep before an advance was cut short by a pause or stop.
#[derive(Debug)]
struct PlaybackInterrupted;

/// Timed playback over a fixed frame sequence.
///
/// The first frame is current from construction; the first advance happens
/// one full interval after [`start`](Self::start). [`next`](Self::next) and
/// [`previous`](Self::previous) work in every state, including before start
/// and after stop.
///
/// Signals fire on the thread that caused the change: frame changes from the
/// timer fire on the playback thread.
pub struct SlideshowPlayer {
    config: PlayerConfig,
    sequence: FrameSequence,
    shared: Arc<Shared>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl SlideshowPlayer {
    /// Create an idle player with default settings.
    pub fn new(sequence: FrameSequence) -> Self {
        PlayerBuilder::new().build(sequence)
    }

    /// Create an idle player with custom settings.
    pub fn with_config(sequence: FrameSequence, config: PlayerConfig) -> Self {
        let transport = Transport {
            state: PlayerState::Idle,
            index: 0,
            interval: config.interval.max(MIN_INTERVAL),
            fullscreen: config.fullscreen,
            thread_alive: false,
        };
        Self {
            config,
            sequence,
            shared: Arc::new(Shared {
                transport: Mutex::new(transport),
                wake: Condvar::new(),
                signals: PlayerSignals {
                    frame_changed: Signal::new(),
                    state_changed: Signal::new(),
                    fullscreen_changed: Signal::new(),
                },
            }),
            handle: Mutex::new(None),
        }
    }

    /// Start or resume playback.
    ///
    /// From `Idle` this spawns the playback thread; from `Paused` it resumes
    /// in place; from `Running` it does nothing.
    pub fn start(&self) -> PlayerResult<()> {
        {
            let mut transport = self.shared.transport.lock();
            let state = transport.state;
            match state {
                PlayerState::Running => return Ok(()),
                PlayerState::Stopped => return Err(PlayerError::Stopped),
                PlayerState::Paused => {
                    drop(transport);
                    self.resume();
                    return Ok(());
                }
                PlayerState::Idle => {
                    if self.sequence.is_empty() {
                        return Err(PlayerError::EmptySequence);
                    }
                    transport.state = PlayerState::Running;
                    transport.thread_alive = true;
                }
            }
        }

        let mut builder = thread::Builder::new().name(self.config.name.clone());
        if let Some(stack_size) = self.config.stack_size {
            builder = builder.stack_size(stack_size);
        }
        let shared = self.shared.clone();
        let frame_count = self.sequence.len();
        match builder.spawn(move || playback_loop(&shared, frame_count)) {
            Ok(handle) => {
                *self.handle.lock() = Some(handle);
            }
            Err(source) => {
                let mut transport = self.shared.transport.lock();
                transport.thread_alive = false;
                if transport.state == PlayerState::Running {
                    transport.state = PlayerState::Idle;
                }
                return Err(PlayerError::Spawn(source));
            }
        }

        self.shared.signals.state_changed.emit(PlayerState::Running);
        Ok(())
    }

    /// Pause playback. Returns `false` if the player was not running.
    pub fn pause(&self) -> bool {
        self.transition(PlayerState::Running, PlayerState::Paused)
    }

    /// Resume paused playback. Returns `false` if the player was not paused.
    pub fn resume(&self) -> bool {
        self.transition(PlayerState::Paused, PlayerState::Running)
    }

    /// Pause if running, resume if paused.
    pub fn toggle_pause(&self) -> bool {
        match self.state() {
            PlayerState::Running => self.pause(),
            PlayerState::Paused => self.resume(),
            PlayerState::Idle | PlayerState::Stopped => false,
        }
    }

    /// Stop playback for good.
    ///
    /// Wakes the playback thread, which exits at its next check. Does not
    /// wait for it; use [`join`](Self::join) or
    /// [`wait_timeout`](Self::wait_timeout). Calling this again does nothing.
    pub fn stop(&self) {
        {
            let mut transport = self.shared.transport.lock();
            if transport.state == PlayerState::Stopped {
                return;
            }
            transport.state = PlayerState::Stopped;
            self.shared.wake.notify_all();
        }
        self.shared.signals.state_changed.emit(PlayerState::Stopped);
    }

    /// Wait for the playback thread to exit.
    ///
    /// Returns `true` if a thread was joined, `false` if there was none or
    /// it had already been joined.
    pub fn join(&self) -> bool {
        let handle = self.handle.lock().take();
        match handle {
            Some(handle) => handle.join().is_ok(),
            None => false,
        }
    }

    /// Wait up to `timeout` for the playback thread to exit.
    ///
    /// Returns `true` if no playback thread is running when this returns.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut transport = self.shared.transport.lock();
        while transport.thread_alive {
            if self.shared.wake.wait_until(&mut transport, deadline).timed_out() {
                break;
            }
        }
        !transport.thread_alive
    }

    /// Returns `true` while the playback thread is running.
    pub fn is_thread_alive(&self) -> bool {
        self.shared.transport.lock().thread_alive
    }

    /// Show the next frame, wrapping to the first. Returns the new index, or
    /// `None` for an empty sequence.
    pub fn next(&self) -> Option<usize> {
        self.step(1)
    }

    /// Show the previous frame, wrapping to the last. Returns the new index,
    /// or `None` for an empty sequence.
    pub fn previous(&self) -> Option<usize> {
        self.step(-1)
    }

    /// Index of the frame being shown.
    pub fn current_index(&self) -> usize {
        self.shared.transport.lock().index
    }

    /// The frame being shown.
    pub fn current_frame(&self) -> Option<Frame> {
        self.sequence.get(self.current_index()).cloned()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PlayerState {
        self.shared.transport.lock().state
    }

    /// The frames this player walks.
    pub fn sequence(&self) -> &FrameSequence {
        &self.sequence
    }

    /// Time between frames.
    pub fn interval(&self) -> Duration {
        self.shared.transport.lock().interval
    }

    /// Change the time between frames. A sleep in progress is re-timed from
    /// its start. Clamped to at least one millisecond.
    pub fn set_interval(&self, interval: Duration) {
        let mut transport = self.shared.transport.lock();
        transport.interval = interval.max(MIN_INTERVAL);
        self.shared.wake.notify_all();
    }

    /// Returns `true` in fullscreen mode.
    pub fn is_fullscreen(&self) -> bool {
        self.shared.transport.lock().fullscreen
    }

    /// Switch presentation mode. Playback continues uninterrupted.
    pub fn set_fullscreen(&self, fullscreen: bool) {
        {
            let mut transport = self.shared.transport.lock();
            if transport.fullscreen == fullscreen {
                return;
            }
            transport.fullscreen = fullscreen;
        }
        self.shared.signals.fullscreen_changed.emit(fullscreen);
    }

    /// Flip presentation mode. Returns the new mode.
    pub fn toggle_fullscreen(&self) -> bool {
        let fullscreen = !self.is_fullscreen();
        self.set_fullscreen(fullscreen);
        fullscreen
    }

    /// Which transport actions make sense in the current state.
    pub fn controls(&self) -> TransportControls {
        TransportControls::for_state(self.state())
    }

    /// Connect a callback to frame changes. Receives the new index.
    pub fn on_frame_changed<F>(&self, callback: F) -> ConnectionId
    where
        F: Fn(&usize) + Send + Sync + 'static,
    {
        self.shared.signals.frame_changed.connect(callback)
    }

    /// Disconnect a frame changed callback.
    pub fn disconnect_frame_changed(&self, id: ConnectionId) -> bool {
        self.shared.signals.frame_changed.disconnect(id)
    }

    /// Connect a callback to state changes.
    pub fn on_state_changed<F>(&self, callback: F) -> ConnectionId
    where
        F: Fn(&PlayerState) + Send + Sync + 'static,
    {
        self.shared.signals.state_changed.connect(callback)
    }

    /// Disconnect a state changed callback.
    pub fn disconnect_state_changed(&self, id: ConnectionId) -> bool {
        self.shared.signals.state_changed.disconnect(id)
    }

    /// Connect a callback to presentation mode changes.
    pub fn on_fullscreen_changed<F>(&self, callback: F) -> ConnectionId
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        self.shared.signals.fullscreen_changed.connect(callback)
    }

    /// Disconnect a fullscreen changed callback.
    pub fn disconnect_fullscreen_changed(&self, id: ConnectionId) -> bool {
        self.shared.signals.fullscreen_changed.disconnect(id)
    }

    fn transition(&self, from: PlayerState, to: PlayerState) -> bool {
        {
            let mut transport = self.shared.transport.lock();
            if transport.state != from {
                return false;
            }
            transport.state = to;
            self.shared.wake.notify_all();
        }
        self.shared.signals.state_changed.emit(to);
        true
    }

    fn step(&self, delta: isize) -> Option<usize> {
        let len = self.sequence.len();
        if len == 0 {
            return None;
        }
        let index = {
            let mut transport = self.shared.transport.lock();
            let index = (transport.index as isize + delta).rem_euclid(len as isize) as usize;
            transport.index = index;
            index
        };
        self.shared.signals.frame_changed.emit(index);
        Some(index)
    }
}

impl Drop for SlideshowPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn playback_loop(shared: &Shared, frame_count: usize) {
    tracing::debug!(target: targets::SLIDESHOW, frame_count, "playback thread started");
    let mut transport = shared.transport.lock();
    loop {
        while transport.state == PlayerState::Paused {
            shared.wake.wait(&mut transport);
        }
        if transport.state != PlayerState::Running {
            break;
        }

        match wait_interval(shared, &mut transport) {
            Ok(()) => {
                let index = (transport.index + 1) % frame_count;
                transport.index = index;
                MutexGuard::unlocked(&mut transport, || {
                    shared.signals.frame_changed.emit(index);
                });
            }
            Err(PlaybackInterrupted) => {
                tracing::trace!(
                    target: targets::SLIDESHOW,
                    state = ?transport.state,
                    "playback sleep interrupted"
                );
            }
        }
    }
    transport.thread_alive = false;
    shared.wake.notify_all();
    drop(transport);
    tracing::debug!(target: targets::SLIDESHOW, "playback thread exited");
}

/// Sleep one interval, measured from the call. Re-times the sleep when the
/// interval changes; fails as soon as the player leaves `Running`.
fn wait_interval(
    shared: &Shared,
    transport: &mut MutexGuard<'_, Transport>,
) -> Result<(), PlaybackInterrupted> {
    let started = Instant::now();
    loop {
        if transport.state != PlayerState::Running {
            return Err(PlaybackInterrupted);
        }
        let deadline = started + transport.interval;
        if Instant::now() >= deadline {
            return Ok(());
        }
        shared.wake.wait_until(transport, deadline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::RasterImage;
    use crate::model::{Album, Photo};

    fn sequence(count: usize) -> FrameSequence {
        let album = Album::new("Show");
        for i in 0..count {
            let photo = Photo::from_image(format!("/p/{i}.jpg"), Arc::new(RasterImage::blank(2, 2)));
            album.add_photo(photo).unwrap();
        }
        FrameSequence::from_album(&album)
    }

    #[test]
    fn test_initial_state() {
        let player = SlideshowPlayer::new(sequence(3));
        assert_eq!(player.state(), PlayerState::Idle);
        assert_eq!(player.current_index(), 0);
        assert_eq!(player.current_frame().map(|f| f.name().to_string()), Some("0.jpg".into()));
        assert_eq!(player.interval(), Duration::from_millis(3000));
        assert!(!player.is_fullscreen());
        assert!(!player.is_thread_alive());
    }

    #[test]
    fn test_step_wraps_both_ways() {
        let player = SlideshowPlayer::new(sequence(3));
        assert_eq!(player.previous(), Some(2));
        assert_eq!(player.next(), Some(0));
        assert_eq!(player.next(), Some(1));
        assert_eq!(SlideshowPlayer::new(sequence(0)).next(), None);
    }

    #[test]
    fn test_empty_sequence_cannot_start() {
        let player = SlideshowPlayer::new(sequence(0));
        assert!(matches!(player.start(), Err(PlayerError::EmptySequence)));
        assert_eq!(player.state(), PlayerState::Idle);
    }

    #[test]
    fn test_state_transitions() {
        let player = PlayerBuilder::new()
            .name("test-slideshow")
            .interval(Duration::from_secs(60))
            .build(sequence(2));

        let states = Arc::new(Mutex::new(Vec::new()));
        let states_clone = states.clone();
        player.on_state_changed(move |state| states_clone.lock().push(*state));

        assert!(!player.pause());
        player.start().unwrap();
        player.start().unwrap();
        assert!(player.pause());
        assert!(player.toggle_pause());
        assert!(player.pause());
        player.start().unwrap();
        assert_eq!(player.state(), PlayerState::Running);

        player.stop();
        player.stop();
        assert!(matches!(player.start(), Err(PlayerError::Stopped)));
        assert!(player.wait_timeout(Duration::from_secs(5)));
        assert!(player.join());
        assert!(!player.join());

        assert_eq!(
            *states.lock(),
            vec![
                PlayerState::Running,
                PlayerState::Paused,
                PlayerState::Running,
                PlayerState::Paused,
                PlayerState::Running,
                PlayerState::Stopped,
            ]
        );
    }

    #[test]
    fn test_advances_on_timer() {
        let player = PlayerBuilder::new()
            .interval(Duration::from_millis(10))
            .build(sequence(3));
        let (tx, rx) = std::sync::mpsc::channel();
        let tx = Mutex::new(tx);
        player.on_frame_changed(move |index| {
            let _ = tx.lock().send(*index);
        });

        player.start().unwrap();
        let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(first, 1);
        player.stop();
        assert!(player.wait_timeout(Duration::from_secs(5)));
    }

    #[test]
    fn test_fullscreen_toggle() {
        let player = PlayerBuilder::new().fullscreen(true).build(sequence(1));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let id = player.on_fullscreen_changed(move |on| seen_clone.lock().push(*on));

        assert!(player.is_fullscreen());
        assert!(!player.toggle_fullscreen());
        player.set_fullscreen(false);
        assert!(player.disconnect_fullscreen_changed(id));
        player.set_fullscreen(true);
        assert_eq!(*seen.lock(), vec![false]);
    }

    #[test]
    fn test_set_interval_clamps() {
        let player = SlideshowPlayer::new(sequence(1));
        player.set_interval(Duration::ZERO);
        assert_eq!(player.interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_from_config() {
        let config = SlideshowConfig {
            interval_ms: 250,
            fullscreen_default: true,
            ..SlideshowConfig::default()
        };
        let player = PlayerBuilder::from_config(&config).build(sequence(1));
        assert_eq!(player.interval(), Duration::from_millis(250));
        assert!(player.is_fullscreen());
    }
}
