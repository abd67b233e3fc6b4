//! Simulated player engine.

use bridge_traits::{
    error::Result, EngineError, EngineEvent, EngineSettings, MediaSource, NotificationStream,
    PlaybackParameters, PlaybackState, PlayerEngine, RepeatMode,
};
use parking_lot::Mutex;
use tracing::trace;

use crate::subscribers::Subscribers;

/// A control call received by [`SimulatedEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Configure(EngineSettings),
    SetMediaSource(MediaSource),
    Prepare,
    SetPlayWhenReady(bool),
    Stop,
    SeekTo(u64),
    SetRepeatMode(RepeatMode),
    SetVolume(f32),
    SetPlaybackParameters(PlaybackParameters),
}

struct EngineInner {
    play_when_ready: bool,
    state: PlaybackState,
    position_ms: u64,
    duration_ms: Option<u64>,
    volume: f32,
    repeat_mode: RepeatMode,
    parameters: PlaybackParameters,
    source: Option<MediaSource>,
    settings: Option<EngineSettings>,
    calls: Vec<EngineCall>,
}

/// `PlayerEngine` that plays nothing.
///
/// Control calls update an in-memory model and are recorded in order. Loading
/// never completes by itself: drive the engine with [`report_state`],
/// [`report_error`] and [`set_position`].
///
/// Like a real player, toggling `play_when_ready` while `Buffering` or `Ready`
/// reports a state change, and `stop` reports `Idle`.
///
/// [`report_state`]: SimulatedEngine::report_state
/// [`report_error`]: SimulatedEngine::report_error
/// [`set_position`]: SimulatedEngine::set_position
pub struct SimulatedEngine {
    inner: Mutex<EngineInner>,
    subscribers: Subscribers<EngineEvent>,
}

impl Default for SimulatedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedEngine {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(EngineInner {
                play_when_ready: false,
                state: PlaybackState::Idle,
                position_ms: 0,
                duration_ms: None,
                volume: 1.0,
                repeat_mode: RepeatMode::Off,
                parameters: PlaybackParameters::default(),
                source: None,
                settings: None,
                calls: Vec::new(),
            }),
            subscribers: Subscribers::new(),
        }
    }

    /// Every control call received so far, oldest first.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.inner.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    pub fn state(&self) -> PlaybackState {
        self.inner.lock().state
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.inner.lock().repeat_mode
    }

    pub fn playback_parameters(&self) -> PlaybackParameters {
        self.inner.lock().parameters
    }

    pub fn source(&self) -> Option<MediaSource> {
        self.inner.lock().source.clone()
    }

    pub fn settings(&self) -> Option<EngineSettings> {
        self.inner.lock().settings.clone()
    }

    /// Number of open event streams.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.count()
    }

    /// Move the playhead without recording a call, as playback would.
    pub fn set_position(&self, position_ms: u64) {
        self.inner.lock().position_ms = position_ms;
    }

    pub fn set_duration(&self, duration_ms: Option<u64>) {
        self.inner.lock().duration_ms = duration_ms;
    }

    /// Enter `state` and report it with the current `play_when_ready`.
    pub fn report_state(&self, state: PlaybackState) {
        let play_when_ready = {
            let mut inner = self.inner.lock();
            inner.state = state;
            inner.play_when_ready
        };
        trace!(?state, play_when_ready, "Simulated engine state");
        self.subscribers.broadcast(EngineEvent::StateChanged {
            play_when_ready,
            state,
        });
    }

    /// Report a playback failure. The engine falls back to `Idle` silently.
    pub fn report_error(&self, error: EngineError) {
        self.inner.lock().state = PlaybackState::Idle;
        self.subscribers.broadcast(EngineEvent::Error(error));
    }

    fn record(&self, call: EngineCall) {
        self.inner.lock().calls.push(call);
    }
}

impl PlayerEngine for SimulatedEngine {
    fn configure(&self, settings: &EngineSettings) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.settings = Some(settings.clone());
        inner.calls.push(EngineCall::Configure(settings.clone()));
        Ok(())
    }

    fn set_media_source(&self, source: MediaSource) {
        let mut inner = self.inner.lock();
        inner.source = Some(source.clone());
        inner.calls.push(EngineCall::SetMediaSource(source));
    }

    fn prepare(&self) {
        self.record(EngineCall::Prepare);
    }

    fn play_when_ready(&self) -> bool {
        self.inner.lock().play_when_ready
    }

    fn set_play_when_ready(&self, play_when_ready: bool) {
        let report = {
            let mut inner = self.inner.lock();
            inner.calls.push(EngineCall::SetPlayWhenReady(play_when_ready));
            let changed = inner.play_when_ready != play_when_ready;
            inner.play_when_ready = play_when_ready;
            let loaded = matches!(
                inner.state,
                PlaybackState::Buffering | PlaybackState::Ready
            );
            (changed && loaded).then_some(inner.state)
        };

        if let Some(state) = report {
            self.subscribers.broadcast(EngineEvent::StateChanged {
                play_when_ready,
                state,
            });
        }
    }

    fn stop(&self) {
        let (was_idle, play_when_ready) = {
            let mut inner = self.inner.lock();
            inner.calls.push(EngineCall::Stop);
            let was_idle = inner.state == PlaybackState::Idle;
            inner.state = PlaybackState::Idle;
            (was_idle, inner.play_when_ready)
        };

        if !was_idle {
            self.subscribers.broadcast(EngineEvent::StateChanged {
                play_when_ready,
                state: PlaybackState::Idle,
            });
        }
    }

    fn seek_to(&self, position_ms: u64) {
        let mut inner = self.inner.lock();
        inner.calls.push(EngineCall::SeekTo(position_ms));
        inner.position_ms = inner
            .duration_ms
            .map_or(position_ms, |duration| position_ms.min(duration));
    }

    fn current_position_ms(&self) -> u64 {
        self.inner.lock().position_ms
    }

    fn duration_ms(&self) -> Option<u64> {
        self.inner.lock().duration_ms
    }

    fn set_repeat_mode(&self, mode: RepeatMode) {
        let mut inner = self.inner.lock();
        inner.repeat_mode = mode;
        inner.calls.push(EngineCall::SetRepeatMode(mode));
    }

    fn volume(&self) -> f32 {
        self.inner.lock().volume
    }

    fn set_volume(&self, volume: f32) {
        let mut inner = self.inner.lock();
        inner.volume = volume.clamp(0.0, 1.0);
        inner.calls.push(EngineCall::SetVolume(volume));
    }

    fn set_playback_parameters(&self, parameters: PlaybackParameters) {
        let mut inner = self.inner.lock();
        inner.parameters = parameters;
        inner
            .calls
            .push(EngineCall::SetPlaybackParameters(parameters));
    }

    fn subscribe(&self) -> Result<Box<dyn NotificationStream<EngineEvent>>> {
        Ok(Box::new(self.subscribers.subscribe()))
    }
}
