//! Session controller scenarios driven through the headless host.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bridge_headless::{ChannelLifecycle, EngineCall, HeadlessSurface, SimulatedEngine};
use bridge_traits::{
    ClipWindow, ContentType, EngineError, EvictionPolicy, LifecyclePhase, MediaReference,
    MediaSource, PlaybackState, PlayerEngine, RepeatMode, ShutterColor,
};
use core_playback::{PlaybackError, SessionController, SessionOptions};
use core_runtime::config::{CoreConfig, CoreConfigBuilder};
use core_runtime::events::SessionEvent;

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<SessionEvent>>>);

impl Recorder {
    fn take(&self) -> Vec<SessionEvent> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

struct Harness {
    engine: Arc<SimulatedEngine>,
    surface: Arc<HeadlessSurface>,
    lifecycle: Arc<ChannelLifecycle>,
    events: Recorder,
    controller: SessionController,
    cache: tempfile::TempDir,
}

async fn harness_with(features: impl FnOnce(CoreConfigBuilder) -> CoreConfigBuilder) -> Harness {
    let engine = Arc::new(SimulatedEngine::new());
    let surface = Arc::new(HeadlessSurface::new());
    let lifecycle = Arc::new(ChannelLifecycle::new());
    let cache = tempfile::tempdir().unwrap();

    let builder = CoreConfig::builder()
        .cache_dir(cache.path())
        .engine(engine.clone())
        .surface(surface.clone())
        .lifecycle_observer(lifecycle.clone());
    let config = features(builder).build().unwrap();

    let events = Recorder::default();
    let sink = events.clone();
    let controller = SessionController::attach(config, SessionOptions::default(), move |event| {
        sink.0.lock().unwrap().push(event)
    })
    .await
    .unwrap();

    Harness {
        engine,
        surface,
        lifecycle,
        events,
        controller,
        cache,
    }
}

async fn harness() -> Harness {
    harness_with(|builder| builder).await
}

/// Let the notification pumps drain.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

fn loaded_references(calls: &[EngineCall]) -> Vec<String> {
    calls
        .iter()
        .filter_map(|call| match call {
            EngineCall::SetMediaSource(source) => Some(source.reference().to_string()),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Attach
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_attach_configures_host() {
    let h = harness().await;

    let settings = h.engine.settings().expect("engine configured");
    assert_eq!(settings.load_control.min_buffer_ms, 32_768);
    assert_eq!(settings.load_control.max_buffer_ms, 65_536);
    let cache = settings.data_source.cache.as_ref().expect("cache enabled");
    assert_eq!(cache.directory, h.cache.path().join("media"));
    assert_eq!(cache.max_bytes, 500 * 1024 * 1024);
    assert_eq!(cache.eviction_policy, EvictionPolicy::LeastRecentlyUsed);
    assert!(cache.directory.is_dir());
    assert!(settings.data_source.upstream.allow_cross_protocol_redirects);

    assert!(h.surface.is_bound());
    assert_eq!(h.surface.shutter_color(), Some(ShutterColor::Transparent));

    settle().await;
    assert_eq!(h.controller.live_subscriptions(), 3);
    assert_eq!(h.engine.subscriber_count(), 1);
    assert_eq!(h.lifecycle.subscriber_count(), 1);
    assert_eq!(h.surface.subscriber_count(), 1);
    assert_eq!(h.controller.lifecycle_phase(), LifecyclePhase::Active);
    assert_eq!(h.controller.playback_state(), PlaybackState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_attach_without_cache_uses_upstream_only() {
    let h = harness_with(|builder| builder.enable_cache(false)).await;

    let settings = h.engine.settings().unwrap();
    assert!(!settings.data_source.is_cached());
    assert!(!h.cache.path().join("media").exists());
}

#[tokio::test(start_paused = true)]
async fn test_attach_rejects_invalid_options() {
    let config = CoreConfig::builder()
        .cache_dir("/unused")
        .engine(Arc::new(SimulatedEngine::new()))
        .surface(Arc::new(HeadlessSurface::new()))
        .lifecycle_observer(Arc::new(ChannelLifecycle::new()))
        .enable_cache(false)
        .build()
        .unwrap();
    let options = SessionOptions {
        progress_interval_ms: 0,
        ..SessionOptions::default()
    };

    let result = SessionController::attach(config, options, |_event: SessionEvent| {}).await;
    assert!(matches!(result, Err(PlaybackError::InvalidOptions(_))));
}

// ============================================================================
// set_media
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_autoplay_scenario_event_order() {
    let h = harness().await;
    h.engine.clear_calls();

    h.controller.set_media("a.mp4", true).unwrap();

    let calls = h.engine.calls();
    assert_eq!(calls[0], EngineCall::SetPlayWhenReady(true));
    assert!(matches!(calls[1], EngineCall::SetMediaSource(_)));
    assert_eq!(calls[2], EngineCall::Prepare);
    assert_eq!(calls.len(), 3);
    assert_eq!(
        h.engine.source().unwrap().content_type(),
        ContentType::Progressive
    );

    h.engine.report_state(PlaybackState::Ready);
    settle().await;

    assert_eq!(
        h.events.take(),
        vec![
            SessionEvent::Buffering {
                is_buffering: false
            },
            SessionEvent::Start,
            SessionEvent::PlayerReady,
        ]
    );
    assert_eq!(h.controller.playback_state(), PlaybackState::Ready);
    assert!(!h.controller.session().is_preparing);
}

#[tokio::test(start_paused = true)]
async fn test_player_ready_fires_once_per_prepare() {
    let h = harness().await;
    h.controller.set_media("a.mp4", false).unwrap();

    h.engine.report_state(PlaybackState::Buffering);
    h.engine.report_state(PlaybackState::Ready);
    h.engine.report_state(PlaybackState::Buffering);
    h.engine.report_state(PlaybackState::Ready);
    settle().await;

    let events = h.events.take();
    let ready_count = events
        .iter()
        .filter(|event| **event == SessionEvent::PlayerReady)
        .count();
    assert_eq!(ready_count, 1);
    assert_eq!(
        events[..4],
        [
            SessionEvent::Buffering { is_buffering: true },
            SessionEvent::Buffering {
                is_buffering: false
            },
            SessionEvent::Stop,
            SessionEvent::PlayerReady,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_same_reference_resumes_and_new_reference_resets() {
    let h = harness().await;
    h.controller.set_media("a.mp4", false).unwrap();
    h.engine.clear_calls();

    h.controller.set_media("a.mp4", false).unwrap();
    let calls = h.engine.calls();
    assert_eq!(calls.last(), Some(&EngineCall::SeekTo(0)));

    h.engine.clear_calls();
    h.controller.set_media("b.mp4", true).unwrap();
    let calls = h.engine.calls();
    assert!(!calls
        .iter()
        .any(|call| matches!(call, EngineCall::SeekTo(_))));
    assert_eq!(loaded_references(&calls), vec!["b.mp4"]);

    let session = h.controller.session();
    assert_eq!(session.media_reference, Some(MediaReference::new("b.mp4")));
    assert_eq!(session.last_known_position_ms, 0);
    assert!(session.desired_autoplay);
    assert!(session.is_preparing);
}

#[tokio::test(start_paused = true)]
async fn test_unsupported_media_leaves_session_untouched() {
    let h = harness().await;
    h.engine.clear_calls();

    let result = h.controller.set_media("rtsp://camera.local/live", true);

    assert!(matches!(
        result,
        Err(PlaybackError::UnsupportedMediaType {
            content_type: ContentType::Rtsp,
            ..
        })
    ));
    assert!(h.engine.calls().is_empty());
    assert_eq!(h.controller.session().media_reference, None);
}

#[tokio::test(start_paused = true)]
async fn test_adaptive_content_types_reach_engine() {
    let h = harness().await;

    h.controller
        .set_media("https://cdn.example.com/v/master.m3u8?sig=1", false)
        .unwrap();
    assert_eq!(h.engine.source().unwrap().content_type(), ContentType::Hls);

    h.controller
        .set_media("https://cdn.example.com/v/Manifest.mpd", false)
        .unwrap();
    assert_eq!(h.engine.source().unwrap().content_type(), ContentType::Dash);
}

#[tokio::test(start_paused = true)]
async fn test_looping_applies_repeat_mode() {
    let h = harness_with(|builder| builder.loop_playback(true)).await;
    h.engine.clear_calls();

    h.controller.set_media("a.mp4", true).unwrap();
    assert_eq!(h.engine.calls()[0], EngineCall::SetRepeatMode(RepeatMode::All));

    h.engine.clear_calls();
    h.controller.clip(0, 1_000).unwrap();
    assert_eq!(h.engine.calls()[0], EngineCall::SetRepeatMode(RepeatMode::All));

    h.engine.clear_calls();
    h.controller.set_quality_variant("a_720.mp4").unwrap();
    assert_eq!(h.engine.calls()[0], EngineCall::SetRepeatMode(RepeatMode::All));
    assert_eq!(h.engine.repeat_mode(), RepeatMode::All);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_pause_then_resume_restores_position() {
    let h = harness().await;
    h.controller.set_media("a.mp4", true).unwrap();
    h.engine.report_state(PlaybackState::Ready);
    h.engine.set_duration(Some(100_000));
    h.engine.set_position(42_000);
    settle().await;

    h.lifecycle.set_phase(LifecyclePhase::Paused);
    settle().await;

    assert_eq!(h.controller.lifecycle_phase(), LifecyclePhase::Paused);
    assert!(!h.engine.play_when_ready());
    assert_eq!(h.controller.session().last_known_position_ms, 42_000);

    // The host may reset the playhead while in the background
    h.engine.set_position(0);
    h.engine.clear_calls();

    h.lifecycle.set_phase(LifecyclePhase::Active);
    settle().await;

    assert_eq!(
        h.engine.calls(),
        vec![
            EngineCall::SetPlayWhenReady(true),
            EngineCall::SeekTo(42_000)
        ]
    );
    assert_eq!(h.engine.current_position_ms(), 42_000);
    assert_eq!(h.controller.session().last_known_position_ms, 0);
    assert_eq!(h.controller.lifecycle_phase(), LifecyclePhase::Active);
}

#[tokio::test(start_paused = true)]
async fn test_saved_position_clamped_to_duration() {
    let h = harness().await;
    h.controller.set_media("a.mp4", true).unwrap();
    h.engine.set_duration(Some(90_000));
    h.engine.set_position(95_000);

    h.lifecycle.set_phase(LifecyclePhase::Paused);
    settle().await;

    assert_eq!(h.controller.session().last_known_position_ms, 90_000);
}

#[tokio::test(start_paused = true)]
async fn test_set_media_ignored_while_paused() {
    let h = harness().await;
    h.controller.set_media("a.mp4", false).unwrap();
    h.lifecycle.set_phase(LifecyclePhase::Paused);
    settle().await;

    let before = h.controller.session();
    h.engine.clear_calls();

    h.controller.set_media("b.mp4", true).unwrap();

    assert!(h.engine.calls().is_empty());
    assert_eq!(h.controller.session(), before);
}

#[tokio::test(start_paused = true)]
async fn test_resume_while_active_is_ignored() {
    let h = harness().await;
    h.engine.clear_calls();

    h.lifecycle.set_phase(LifecyclePhase::Active);
    settle().await;

    assert!(h.engine.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_host_destroy_tears_down_session() {
    let h = harness_with(|builder| builder.progress_updates(true)).await;
    h.controller.set_media("a.mp4", true).unwrap();
    h.engine.report_state(PlaybackState::Ready);
    h.engine.set_position(7_000);
    settle().await;
    assert!(h.controller.is_progress_scheduled());

    h.lifecycle.set_phase(LifecyclePhase::Destroyed);
    settle().await;

    assert_eq!(h.controller.lifecycle_phase(), LifecyclePhase::Destroyed);
    assert_eq!(h.controller.session().last_known_position_ms, 7_000);
    assert!(!h.controller.is_progress_scheduled());
    assert_eq!(h.controller.live_subscriptions(), 0);
    assert!(!h.surface.is_bound());
    assert_eq!(h.engine.subscriber_count(), 0);
    assert_eq!(h.lifecycle.subscriber_count(), 0);

    // Terminal: later phases change nothing
    h.lifecycle.set_phase(LifecyclePhase::Active);
    settle().await;
    assert_eq!(h.controller.lifecycle_phase(), LifecyclePhase::Destroyed);
}

// ============================================================================
// clip / quality variant
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_clip_requires_media() {
    let h = harness().await;
    assert!(matches!(
        h.controller.clip(0, 1_000),
        Err(PlaybackError::NoMediaLoaded)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_clip_rejects_inverted_window() {
    let h = harness().await;
    h.controller.set_media("a.mp4", false).unwrap();
    h.engine.clear_calls();

    assert!(matches!(
        h.controller.clip(5_000, 1_000),
        Err(PlaybackError::InvalidClipWindow {
            start_ms: 5_000,
            end_ms: 1_000
        })
    ));
    assert!(h.engine.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_clip_rejects_bounds_beyond_microsecond_range() {
    let h = harness().await;
    h.controller.set_media("a.mp4", false).unwrap();
    h.engine.clear_calls();

    assert!(matches!(
        h.controller.clip(1_000, u64::MAX),
        Err(PlaybackError::ClipWindowOutOfRange { start_ms: 1_000, .. })
    ));
    assert!(h.engine.calls().is_empty());
    assert_eq!(h.controller.session().current_source, h.engine.source());
}

#[tokio::test(start_paused = true)]
async fn test_clip_wraps_current_source() {
    let h = harness().await;
    h.controller.set_media("a.mp4", false).unwrap();
    h.engine.report_state(PlaybackState::Ready);
    settle().await;
    h.events.take();
    h.engine.clear_calls();

    h.controller.clip(2_000, 8_000).unwrap();

    let source = h.engine.source().unwrap();
    assert_eq!(source.clip_window(), ClipWindow::from_millis(2_000, 8_000));
    assert!(matches!(
        source,
        MediaSource::Clipped { ref inner, .. } if inner.reference().as_str() == "a.mp4"
    ));
    assert_eq!(h.engine.calls().last(), Some(&EngineCall::Prepare));

    h.engine.report_state(PlaybackState::Ready);
    settle().await;
    assert!(h.events.take().contains(&SessionEvent::PlayerReady));
}

#[tokio::test(start_paused = true)]
async fn test_quality_variant_keeps_position_and_reference() {
    let h = harness().await;
    h.controller.set_media("movie_1080.m3u8", true).unwrap();
    h.engine.report_state(PlaybackState::Ready);
    settle().await;
    h.events.take();
    h.engine.set_position(12_345);
    h.engine.clear_calls();

    h.controller.set_quality_variant("movie_480.m3u8").unwrap();

    let calls = h.engine.calls();
    assert_eq!(loaded_references(&calls), vec!["movie_480.m3u8"]);
    assert_eq!(
        calls[calls.len() - 2..],
        [EngineCall::Prepare, EngineCall::SeekTo(12_345)]
    );

    let session = h.controller.session();
    assert_eq!(
        session.media_reference,
        Some(MediaReference::new("movie_1080.m3u8"))
    );
    assert_eq!(
        session.current_source.unwrap().reference().as_str(),
        "movie_480.m3u8"
    );
    assert!(session.is_preparing);

    h.engine.report_state(PlaybackState::Buffering);
    h.engine.report_state(PlaybackState::Ready);
    h.engine.report_state(PlaybackState::Ready);
    settle().await;

    let ready_count = h
        .events
        .take()
        .iter()
        .filter(|event| **event == SessionEvent::PlayerReady)
        .count();
    assert_eq!(ready_count, 1);
    assert!(!h.controller.session().is_preparing);
}

#[tokio::test(start_paused = true)]
async fn test_quality_variant_requires_media() {
    let h = harness().await;
    assert!(matches!(
        h.controller.set_quality_variant("b.mp4"),
        Err(PlaybackError::NoMediaLoaded)
    ));
}

// ============================================================================
// Event relay
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_idle_ended_and_error_events() {
    let h = harness().await;

    h.engine.report_state(PlaybackState::Ended);
    h.engine.report_state(PlaybackState::Idle);
    h.engine.report_error(EngineError::new(2001, "Source error"));
    settle().await;

    assert_eq!(
        h.events.take(),
        vec![
            SessionEvent::Buffering {
                is_buffering: false
            },
            SessionEvent::Stop,
            SessionEvent::Buffering {
                is_buffering: false
            },
            SessionEvent::Error { cause: None },
            SessionEvent::Error {
                cause: Some(EngineError::new(2001, "Source error"))
            },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_controller_visibility_forwarded() {
    let h = harness().await;

    h.surface.set_controller_visible(true);
    h.surface.set_controller_visible(false);
    settle().await;

    assert_eq!(
        h.events.take(),
        vec![
            SessionEvent::ControllerVisibility { visible: true },
            SessionEvent::ControllerVisibility { visible: false },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_pause_while_ready_emits_stop() {
    let h = harness().await;
    h.controller.set_media("a.mp4", true).unwrap();
    h.engine.report_state(PlaybackState::Ready);
    settle().await;
    h.events.take();

    h.controller.pause();
    settle().await;

    assert!(!h.controller.is_playing());
    assert_eq!(
        h.events.take(),
        vec![
            SessionEvent::Buffering {
                is_buffering: false
            },
            SessionEvent::Stop,
        ]
    );
}

// ============================================================================
// Transport and extras
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_transport_passes_through() {
    let h = harness().await;
    h.engine.clear_calls();

    h.controller.play();
    h.controller.seek(3_000);
    h.controller.pause();
    h.controller.stop();

    assert_eq!(
        h.engine.calls(),
        vec![
            EngineCall::SetPlayWhenReady(true),
            EngineCall::SeekTo(3_000),
            EngineCall::SetPlayWhenReady(false),
            EngineCall::Stop,
        ]
    );
    assert_eq!(h.controller.position(), 3_000);
}

#[tokio::test(start_paused = true)]
async fn test_mute_toggling() {
    let h = harness().await;

    assert!(h.controller.toggle_mute());
    assert_eq!(h.engine.volume(), 0.0);
    assert!(!h.controller.toggle_mute());
    assert_eq!(h.engine.volume(), 1.0);

    h.controller.mute();
    assert_eq!(h.engine.volume(), 0.0);
    h.controller.unmute();
    assert_eq!(h.engine.volume(), 1.0);
}

#[tokio::test(start_paused = true)]
async fn test_set_speed() {
    let h = harness().await;

    h.controller.set_speed(1.5).unwrap();
    assert_eq!(h.engine.playback_parameters().speed, 1.5);
    assert_eq!(h.engine.playback_parameters().pitch, 1.0);

    assert!(matches!(
        h.controller.set_speed(0.0),
        Err(PlaybackError::InvalidSpeed(_))
    ));
    assert!(h.controller.set_speed(f32::NAN).is_err());
    assert_eq!(h.engine.playback_parameters().speed, 1.5);
}

#[tokio::test(start_paused = true)]
async fn test_engine_accessor_shares_engine() {
    let h = harness().await;
    let engine = h.controller.engine();
    engine.set_volume(0.5);
    assert_eq!(h.engine.volume(), 0.5);
}

// ============================================================================
// Destroy
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_destroy_is_idempotent_and_final() {
    let h = harness().await;
    h.controller.set_media("a.mp4", true).unwrap();

    h.controller.destroy();
    h.controller.destroy();
    settle().await;

    assert_eq!(h.controller.lifecycle_phase(), LifecyclePhase::Destroyed);
    assert_eq!(h.controller.live_subscriptions(), 0);
    assert!(!h.surface.is_bound());
    assert!(!h.engine.play_when_ready());
    assert_eq!(h.engine.subscriber_count(), 0);

    h.engine.clear_calls();
    assert!(h.controller.set_media("b.mp4", true).is_ok());
    assert!(h.engine.calls().is_empty());
    assert!(matches!(
        h.controller.clip(0, 10),
        Err(PlaybackError::SessionDestroyed)
    ));
    assert!(matches!(
        h.controller.set_speed(2.0),
        Err(PlaybackError::SessionDestroyed)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_drop_releases_subscriptions() {
    let h = harness().await;
    settle().await;
    assert_eq!(h.engine.subscriber_count(), 1);

    let Harness {
        engine,
        surface,
        lifecycle,
        controller,
        ..
    } = h;
    drop(controller);
    settle().await;

    assert_eq!(engine.subscriber_count(), 0);
    assert_eq!(lifecycle.subscriber_count(), 0);
    assert_eq!(surface.subscriber_count(), 0);
    assert!(!surface.is_bound());
}
