//! # Session Controller
//!
//! The application-facing handle of one playback session.
//!
//! ## Usage
//!
//! ```ignore
//! use core_playback::{SessionController, SessionOptions};
//! use core_runtime::config::CoreConfig;
//! use core_runtime::events::SessionEvent;
//!
//! let config = CoreConfig::builder()
//!     .cache_dir(cache_dir)
//!     .engine(engine)
//!     .surface(surface)
//!     .lifecycle_observer(lifecycle)
//!     .progress_updates(true)
//!     .build()?;
//!
//! let controller = SessionController::attach(config, SessionOptions::default(), |event| {
//!     println!("{}", event.description());
//! })
//! .await?;
//!
//! controller.set_media("https://cdn.example.com/v/master.m3u8", true)?;
//! ```

use std::ops::ControlFlow;
use std::sync::Arc;

use bridge_traits::{
    EngineSettings, LifecyclePhase, MediaReference, PlaybackParameters, PlaybackState,
    PlayerEngine, RepeatMode, ShutterColor,
};
use core_runtime::config::{CoreConfig, FeatureFlags};
use tracing::{debug, info, instrument};

use crate::cache::{CacheConfig, DataSourceFactory};
use crate::config::SessionOptions;
use crate::error::{PlaybackError, Result};
use crate::lifecycle::{LifecycleBinder, Transition};
use crate::media::{build_media_source, clip_media_source};
use crate::progress::ProgressTicker;
use crate::registration::Registration;
use crate::relay::{EventRelay, SessionListener};
use crate::session::{Session, SessionCore, SessionId};

/// Controls one playback session bound to a host engine, surface and
/// lifecycle.
///
/// Dropping the controller releases every subscription it holds.
pub struct SessionController {
    core: Arc<SessionCore>,
    data_sources: Arc<DataSourceFactory>,
    features: FeatureFlags,
}

impl SessionController {
    /// Attach a session with a data-source factory of its own, rooted at the
    /// configured cache directory.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn attach<L>(config: CoreConfig, options: SessionOptions, listener: L) -> Result<Self>
    where
        L: SessionListener + 'static,
    {
        let cache = CacheConfig::new(&config.cache_dir).with_max_size(config.cache_size_bytes());
        let factory = DataSourceFactory::new(cache, options.upstream())?;
        Self::attach_with_factory(config, options, Arc::new(factory), listener).await
    }

    /// Attach a session sharing `data_sources` with other sessions.
    pub async fn attach_with_factory<L>(
        config: CoreConfig,
        options: SessionOptions,
        data_sources: Arc<DataSourceFactory>,
        listener: L,
    ) -> Result<Self>
    where
        L: SessionListener + 'static,
    {
        config.validate()?;
        options.validate().map_err(PlaybackError::InvalidOptions)?;

        let features = config.features;
        if features.enable_cache {
            data_sources.initialize()?;
        }
        let data_source = data_sources.resolve(features.enable_cache)?;

        let engine = config.engine;
        let surface = config.surface;
        engine.configure(&EngineSettings {
            load_control: options.load_control,
            data_source,
        })?;

        let engine_events = engine.subscribe()?;
        let visibility = surface.subscribe_visibility()?;
        let phases = config.lifecycle_observer.subscribe_changes().await?;

        surface.set_shutter_color(ShutterColor::Transparent);
        surface.bind_player(Arc::clone(&engine));

        let listener: Arc<dyn SessionListener> = Arc::new(listener);
        let ticker = ProgressTicker::new(
            Arc::clone(&engine),
            Arc::clone(&listener),
            options.progress_first_delay(),
            options.progress_interval(),
        );
        let core = Arc::new(SessionCore::new(
            engine,
            surface,
            listener,
            ticker,
            features.progress_updates,
            features.loop_playback,
        ));

        let relay = Arc::new(EventRelay::new(Arc::clone(&core)));
        let engine_relay = Arc::clone(&relay);
        core.add_registration(Registration::spawn("engine", engine_events, move |event| {
            engine_relay.on_engine_event(event);
            ControlFlow::Continue(())
        }));
        core.add_registration(Registration::spawn("visibility", visibility, move |visible| {
            relay.on_controller_visibility(visible);
            ControlFlow::Continue(())
        }));

        let binder = LifecycleBinder::new(Arc::clone(&core));
        let lifecycle_core = Arc::clone(&core);
        core.add_registration(Registration::spawn("lifecycle", phases, move |phase| {
            handle_phase(&lifecycle_core, &binder, phase)
        }));

        info!(
            session = %core.id,
            cache = features.enable_cache,
            looping = features.loop_playback,
            progress = features.progress_updates,
            "Session attached"
        );

        Ok(Self {
            core,
            data_sources,
            features,
        })
    }

    pub fn id(&self) -> SessionId {
        self.core.id
    }

    /// Load `reference` and prepare it.
    ///
    /// Does nothing unless the host component is active. Loading the same
    /// reference again resumes at the recorded position.
    #[instrument(skip(self, reference), fields(session = %self.core.id))]
    pub fn set_media(&self, reference: impl Into<MediaReference>, autoplay: bool) -> Result<()> {
        let reference = reference.into();
        if self.core.phase() != LifecyclePhase::Active {
            debug!("set_media ignored: host component not active");
            return Ok(());
        }

        let data_source = self.data_sources.resolve(self.features.enable_cache)?;
        let source = build_media_source(&reference, data_source)?;

        let (resume_at, looping) = {
            let mut state = self.core.state.lock();
            let session = &mut state.session;
            let resume = session.media_reference.as_ref() == Some(&reference);
            if !resume {
                session.last_known_position_ms = 0;
            }
            session.media_reference = Some(reference);
            session.desired_autoplay = autoplay;
            session.is_preparing = true;
            session.current_source = Some(source.clone());
            (
                resume.then_some(session.last_known_position_ms),
                session.loop_enabled,
            )
        };

        let engine = &self.core.engine;
        if looping {
            engine.set_repeat_mode(RepeatMode::All);
        }
        engine.set_play_when_ready(autoplay);
        engine.set_media_source(source);
        engine.prepare();
        if let Some(position_ms) = resume_at {
            debug!(position_ms, "Resuming same media");
            engine.seek_to(position_ms);
        }
        Ok(())
    }

    /// Restrict the loaded media to `[start_ms, end_ms)` and prepare it again.
    #[instrument(skip(self), fields(session = %self.core.id))]
    pub fn clip(&self, start_ms: u64, end_ms: u64) -> Result<()> {
        self.ensure_alive()?;

        let (source, looping) = {
            let mut state = self.core.state.lock();
            let session = &mut state.session;
            let current = session
                .current_source
                .clone()
                .ok_or(PlaybackError::NoMediaLoaded)?;
            let clipped = clip_media_source(current, start_ms, end_ms)?;
            session.is_preparing = true;
            session.current_source = Some(clipped.clone());
            (clipped, session.loop_enabled)
        };

        let engine = &self.core.engine;
        if looping {
            engine.set_repeat_mode(RepeatMode::All);
        }
        engine.set_media_source(source);
        engine.prepare();
        Ok(())
    }

    /// Switch to another rendition of the loaded media, keeping the position.
    ///
    /// The session keeps its original media reference.
    #[instrument(skip(self, reference), fields(session = %self.core.id))]
    pub fn set_quality_variant(&self, reference: impl Into<MediaReference>) -> Result<()> {
        self.ensure_alive()?;
        let reference = reference.into();

        if self.core.state.lock().session.current_source.is_none() {
            return Err(PlaybackError::NoMediaLoaded);
        }

        let engine = &self.core.engine;
        let position_ms = engine.current_position_ms();
        let data_source = self.data_sources.resolve(self.features.enable_cache)?;
        let source = build_media_source(&reference, data_source)?;

        let looping = {
            let mut state = self.core.state.lock();
            state.session.is_preparing = true;
            state.session.current_source = Some(source.clone());
            state.session.loop_enabled
        };

        if looping {
            engine.set_repeat_mode(RepeatMode::All);
        }
        engine.set_media_source(source);
        engine.prepare();
        engine.seek_to(position_ms);
        debug!(position_ms, "Quality variant applied");
        Ok(())
    }

    pub fn play(&self) {
        self.core.engine.set_play_when_ready(true);
    }

    pub fn pause(&self) {
        self.core.engine.set_play_when_ready(false);
    }

    pub fn stop(&self) {
        self.core.engine.stop();
    }

    pub fn seek(&self, position_ms: u64) {
        self.core.engine.seek_to(position_ms);
    }

    /// Set the playback speed. `1.0` is normal speed.
    pub fn set_speed(&self, speed: f32) -> Result<()> {
        self.ensure_alive()?;
        if !speed.is_finite() || speed <= 0.0 {
            return Err(PlaybackError::InvalidSpeed(speed));
        }
        self.core
            .engine
            .set_playback_parameters(PlaybackParameters::with_speed(speed));
        Ok(())
    }

    /// Whether the engine plays as soon as it is ready.
    pub fn is_playing(&self) -> bool {
        self.core.engine.play_when_ready()
    }

    pub fn mute(&self) {
        self.core.engine.set_volume(0.0);
    }

    pub fn unmute(&self) {
        self.core.engine.set_volume(1.0);
    }

    /// Toggle between muted and full volume. Returns `true` if now muted.
    pub fn toggle_mute(&self) -> bool {
        if self.core.engine.volume() == 0.0 {
            self.unmute();
            false
        } else {
            self.mute();
            true
        }
    }

    pub fn position(&self) -> u64 {
        self.core.engine.current_position_ms()
    }

    /// Last state reported by the engine.
    pub fn playback_state(&self) -> PlaybackState {
        self.core.state.lock().playback_state
    }

    pub fn lifecycle_phase(&self) -> LifecyclePhase {
        self.core.phase()
    }

    /// Snapshot of the session model.
    pub fn session(&self) -> Session {
        self.core.state.lock().session.clone()
    }

    /// The underlying engine, for host-specific extensions.
    pub fn engine(&self) -> Arc<dyn PlayerEngine> {
        Arc::clone(&self.core.engine)
    }

    /// Returns `true` while a progress tick is pending.
    pub fn is_progress_scheduled(&self) -> bool {
        self.core.ticker.is_scheduled()
    }

    /// Number of notification subscriptions still running.
    pub fn live_subscriptions(&self) -> usize {
        self.core.live_registrations()
    }

    /// Run the destroy transition if the host has not, then release every
    /// subscription and unbind the surface. Idempotent.
    #[instrument(skip(self), fields(session = %self.core.id))]
    pub fn destroy(&self) {
        if self.core.is_torn_down() {
            return;
        }
        let binder = LifecycleBinder::new(Arc::clone(&self.core));
        if let Transition::Destroyed { position_ms } = binder.on_phase(LifecyclePhase::Destroyed) {
            debug!(position_ms, "Destroyed by controller");
        }
        self.core.teardown();
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.core.phase() == LifecyclePhase::Destroyed {
            return Err(PlaybackError::SessionDestroyed);
        }
        Ok(())
    }
}

fn handle_phase(core: &SessionCore, binder: &LifecycleBinder, phase: LifecyclePhase) -> ControlFlow<()> {
    match binder.on_phase(phase) {
        Transition::Suspended { position_ms } => {
            debug!(session = %core.id, position_ms, "Playback suspended");
            ControlFlow::Continue(())
        }
        Transition::Resumed { position_ms } => {
            debug!(session = %core.id, position_ms, "Playback resumed");
            ControlFlow::Continue(())
        }
        Transition::Destroyed { position_ms } => {
            debug!(session = %core.id, position_ms, "Host component destroyed");
            core.teardown();
            ControlFlow::Break(())
        }
        Transition::Ignored => ControlFlow::Continue(()),
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.core.teardown();
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("id", &self.core.id)
            .field("features", &self.features)
            .finish()
    }
}
