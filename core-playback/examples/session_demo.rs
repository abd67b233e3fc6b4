//! # Session Usage Example
//!
//! Drives a playback session against the headless host: load media, play,
//! go to the background and come back, then tear down.
//!
//! Run with: `cargo run --example session_demo --package core-playback`

use std::sync::Arc;
use std::time::Duration;

use bridge_headless::{ChannelLifecycle, HeadlessSurface, SimulatedEngine};
use bridge_traits::{LifecyclePhase, LogLevel, PlaybackState};
use core_playback::{Result, SessionController, SessionOptions};
use core_runtime::config::CoreConfig;
use core_runtime::events::EventBus;
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(
        LoggingConfig::default()
            .with_format(LogFormat::Compact)
            .with_level(LogLevel::Debug),
    )?;

    let cache_dir = std::env::temp_dir().join("playback-session-demo");
    let engine = Arc::new(SimulatedEngine::new());
    let surface = Arc::new(HeadlessSurface::new());
    let lifecycle = Arc::new(ChannelLifecycle::new());

    let config = CoreConfig::builder()
        .cache_dir(&cache_dir)
        .engine(engine.clone())
        .surface(surface.clone())
        .lifecycle_observer(lifecycle.clone())
        .progress_updates(true)
        .build()?;

    let bus = EventBus::default();
    let mut events = bus.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            println!("[{:?}] {}", event.severity(), event.description());
        }
    });

    let controller = SessionController::attach(config, SessionOptions::default(), bus).await?;
    println!("Session {} attached, cache in {}", controller.id(), cache_dir.display());

    // ========================================================================
    // Load and play
    // ========================================================================

    controller.set_media("https://cdn.example.com/video/master.m3u8", true)?;
    engine.set_duration(Some(120_000));
    engine.report_state(PlaybackState::Buffering);
    engine.report_state(PlaybackState::Ready);

    for position_ms in [500, 1_000, 1_500] {
        engine.set_position(position_ms);
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    // ========================================================================
    // Background and foreground
    // ========================================================================

    lifecycle.set_phase(LifecyclePhase::Paused);
    tokio::time::sleep(Duration::from_millis(50)).await;
    println!(
        "Suspended at {} ms",
        controller.session().last_known_position_ms
    );

    lifecycle.set_phase(LifecyclePhase::Active);
    tokio::time::sleep(Duration::from_millis(50)).await;
    println!("Resumed at {} ms", controller.position());

    // ========================================================================
    // Extras
    // ========================================================================

    controller.set_speed(1.5)?;
    controller.clip(10_000, 20_000)?;
    engine.report_state(PlaybackState::Ready);
    println!("Muted: {}", controller.toggle_mute());

    controller.destroy();
    tokio::time::sleep(Duration::from_millis(50)).await;
    println!(
        "Destroyed: {} live subscriptions, surface bound: {}",
        controller.live_subscriptions(),
        surface.is_bound()
    );

    drop(controller);
    printer.abort();
    Ok(())
}
