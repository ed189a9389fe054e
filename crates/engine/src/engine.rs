//! The loop controller.
//!
//! `Stopped -> Running` on [`Engine::start`]: input listening and
//! [`Game::on_start`] run once, followed by one composite + flush. Each
//! [`Engine::tick`] then composites, flushes, dispatches collision events,
//! calls [`Game::on_update`] and bumps the tick counter, in that order.
//! [`Engine::run`] repeats ticks until an exit is requested; the request is
//! checked at the top of each iteration, never mid-tick.

use std::fmt::Write as _;
use std::thread;

use anyhow::{bail, Result};
use tracing::{debug, info, warn};

use tui_retro_core::{
    Clock, CollisionPhase, FrameRenderer, FrameStats, InputSource, MonotonicTime, NoInput,
    OutputSurface, Registry, TimeSource,
};

use crate::config::{ConfigError, EngineConfig};
use crate::context::{Context, ExitHandle};
use crate::pacer::FramePacer;

/// Host callbacks.
pub trait Game {
    /// Called once, before the first tick.
    fn on_start(&mut self, _ctx: &Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Called at the end of every tick, after flush.
    fn on_update(&mut self, ctx: &Context<'_>) -> Result<()>;
}

impl<F> Game for F
where
    F: FnMut(&Context<'_>) -> Result<()>,
{
    fn on_update(&mut self, ctx: &Context<'_>) -> Result<()> {
        self(ctx)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

pub struct Engine<S: OutputSurface, T: TimeSource = MonotonicTime> {
    config: EngineConfig,
    registry: Registry,
    renderer: FrameRenderer,
    clock: Clock,
    time: T,
    surface: S,
    input: Box<dyn InputSource>,
    exit: ExitHandle,
    pacer: Option<FramePacer>,
    state: LoopState,
    title: String,
}

impl<S: OutputSurface> Engine<S, MonotonicTime> {
    pub fn new(config: EngineConfig, surface: S) -> Result<Self, ConfigError> {
        Self::with_time(config, surface, MonotonicTime::default())
    }
}

impl<S: OutputSurface, T: TimeSource> Engine<S, T> {
    /// Build an engine reading timestamps from `time`.
    pub fn with_time(config: EngineConfig, surface: S, time: T) -> Result<Self, ConfigError> {
        config.validate()?;
        let renderer =
            FrameRenderer::new(config.width, config.height, config.draw_order).with_collisions();
        let pacer = config.target_fps.and_then(FramePacer::new);
        Ok(Self {
            config,
            registry: Registry::new(),
            renderer,
            clock: Clock::new(),
            time,
            surface,
            input: Box::new(NoInput),
            exit: ExitHandle::new(),
            pacer,
            state: LoopState::Stopped,
            title: String::with_capacity(64),
        })
    }

    pub fn with_input(mut self, input: impl InputSource + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    /// Use an existing registry handle instead of a fresh one.
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn renderer(&self) -> &FrameRenderer {
        &self.renderer
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn exit_handle(&self) -> ExitHandle {
        self.exit.clone()
    }

    pub fn request_exit(&self) {
        self.exit.request();
    }

    /// Transition to `Running`.
    pub fn start<G: Game + ?Sized>(&mut self, game: &mut G) -> Result<()> {
        if self.state == LoopState::Running {
            warn!("engine already running");
            return Ok(());
        }
        info!(
            width = self.config.width,
            height = self.config.height,
            draw_order = self.config.draw_order.as_str(),
            "engine starting"
        );

        self.input.listen();
        let ctx = Context::new(
            &self.registry,
            &*self.input,
            &self.clock,
            &self.exit,
            self.renderer.overlay(),
            (self.config.width, self.config.height),
        );
        game.on_start(&ctx)?;

        let stats = self.renderer.render(&self.registry, &mut self.surface)?;
        debug!(writes = stats.writes, "initial frame flushed");
        self.dispatch_collisions();

        self.clock.start(self.time.now_micros());
        self.state = LoopState::Running;
        Ok(())
    }

    /// Run one tick.
    pub fn tick<G: Game + ?Sized>(&mut self, game: &mut G) -> Result<FrameStats> {
        if self.state != LoopState::Running {
            bail!("engine is not running");
        }

        let now = self.time.now_micros();
        let dt = self.clock.begin_tick(now);
        self.input.begin_tick(self.clock.tick());

        if self.config.fps_counter {
            self.title.clear();
            let fps = self.clock.fps(now);
            let _ = write!(self.title, "FPS: {fps:.0}, deltaTime: {dt:.4}");
            self.surface.set_title(&self.title);
        }

        let stats = self.renderer.render(&self.registry, &mut self.surface)?;
        self.dispatch_collisions();

        let ctx = Context::new(
            &self.registry,
            &*self.input,
            &self.clock,
            &self.exit,
            self.renderer.overlay(),
            (self.config.width, self.config.height),
        );
        game.on_update(&ctx)?;

        self.clock.end_tick();
        Ok(stats)
    }

    /// Start if needed, then tick until an exit is requested.
    pub fn run<G: Game + ?Sized>(&mut self, game: &mut G) -> Result<()> {
        if self.state == LoopState::Stopped {
            self.start(game)?;
        }
        let result = self.run_loop(game);
        self.state = LoopState::Stopped;
        match &result {
            Ok(()) => info!(ticks = self.clock.tick(), "engine stopped"),
            Err(err) => warn!(ticks = self.clock.tick(), %err, "engine stopped on error"),
        }
        result
    }

    fn run_loop<G: Game + ?Sized>(&mut self, game: &mut G) -> Result<()> {
        while !self.exit.is_requested() {
            let started = self.time.now_micros();
            self.tick(game)?;
            if let Some(pacer) = self.pacer {
                if let Some(wait) = pacer.remaining(started, self.time.now_micros()) {
                    thread::sleep(wait);
                }
            }
        }
        Ok(())
    }

    fn dispatch_collisions(&self) {
        let Some(tracker) = self.renderer.collisions() else {
            return;
        };
        for event in tracker.events() {
            for (this, other) in [(event.a, event.b), (event.b, event.a)] {
                let Some(hooks) = self.registry.events_of(this) else {
                    continue;
                };
                match event.phase {
                    CollisionPhase::Enter => hooks.on_collision_enter(this, other),
                    CollisionPhase::Stay => hooks.on_collision_stay(this, other),
                    CollisionPhase::Exit => hooks.on_collision_exit(this, other),
                }
            }
        }
    }
}
