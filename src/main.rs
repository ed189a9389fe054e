//! TUI Retro demo (default binary).
//!
//! A ball bounces around the grid breaking a row of bricks; move the paddle
//! with the arrow keys or A/D. Esc or Ctrl+C quits.
//!
//! Configuration comes from `RETRO_*` environment variables. Logs go to the
//! file named by `RETRO_LOG_PATH`, filtered by `RUST_LOG`; stdout belongs to
//! the grid.

use std::fmt::Write as _;
use std::fs::File;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use parking_lot::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tui_retro::core::{CollisionEvents, Entity, EntityId, Sprite};
use tui_retro::engine::{Context, Engine, EngineConfig, Game};
use tui_retro::input::KeyListener;
use tui_retro::term::TerminalSurface;
use tui_retro::types::{Axis, Key, Vector2};

const BRICK: &str = "[#]";
const BRICK_ROW: f32 = 2.0;
const BALL_SPEED: Vector2 = Vector2::new(14.0, 8.0);

fn main() -> Result<()> {
    init_logging()?;

    let config = fit_to_terminal(EngineConfig::from_env());
    config.validate()?;

    let mut term =
        TerminalSurface::new(config.width, config.height).square_mode(config.square_mode);
    term.enter()?;

    let result = run(config, &mut term);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging() -> Result<()> {
    let Ok(path) = std::env::var("RETRO_LOG_PATH") else {
        return Ok(());
    };
    let file = File::create(&path).with_context(|| format!("open log file {path}"))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

/// Shrink the grid to the visible terminal so nothing is drawn off-screen.
fn fit_to_terminal(mut config: EngineConfig) -> EngineConfig {
    let Ok((cols, rows)) = crossterm::terminal::size() else {
        return config;
    };
    let cols = if config.square_mode { cols / 2 } else { cols };
    if config.width > cols || config.height > rows {
        info!(
            width = config.width,
            height = config.height,
            cols,
            rows,
            "grid larger than terminal, shrinking"
        );
        config.width = config.width.min(cols).max(1);
        config.height = config.height.min(rows).max(1);
    }
    config
}

fn run(config: EngineConfig, term: &mut TerminalSurface) -> Result<()> {
    let engine = Engine::new(config, term)?;
    let exit = engine.exit_handle();
    let mut engine = engine.with_input(KeyListener::terminal().on_quit(move || exit.request()));

    let mut game = Breakout::default();
    engine.run(&mut game)
}

/// Collects everything the ball touched this tick.
#[derive(Default)]
struct Contacts(Mutex<Vec<EntityId>>);

impl CollisionEvents for Contacts {
    fn on_collision_enter(&self, _this: EntityId, other: EntityId) {
        self.0.lock().push(other);
    }
}

#[derive(Default)]
struct Breakout {
    width: f32,
    height: f32,
    ball: Option<Entity>,
    paddle: Option<Entity>,
    velocity: Vector2,
    contacts: Arc<Contacts>,
    score: u32,
    hud: String,
}

impl Breakout {
    fn spawn_bricks(&self, ctx: &Context<'_>) -> Result<()> {
        let sprite = Sprite::from_rows(&[BRICK])?.with_generated_mask(&[' ']);
        let template = Entity::new(sprite);
        let step = BRICK.len() as f32 + 1.0;
        let mut x = 1.0;
        while x + step < self.width {
            let brick = template.clone().at(Vector2::new(x, BRICK_ROW));
            ctx.registry().instantiate_named(&brick, "enemy");
            x += step;
        }
        Ok(())
    }

    fn serve(&mut self) {
        if let Some(ball) = &mut self.ball {
            ball.transform.position = Vector2::new(self.width / 2.0, self.height / 2.0);
        }
        self.velocity = BALL_SPEED;
    }
}

impl Game for Breakout {
    fn on_start(&mut self, ctx: &Context<'_>) -> Result<()> {
        let (w, h) = (f32::from(ctx.width()), f32::from(ctx.height()));
        self.width = w;
        self.height = h;

        self.spawn_bricks(ctx)?;

        let paddle = Entity::new(Sprite::from_rows(&["<===>"])?.with_generated_mask(&[' ']))
            .at(Vector2::new(w / 2.0 - 2.0, h - 2.0));
        self.paddle = Some(ctx.registry().instantiate_named(&paddle, "player"));

        let ball = Entity::new(Sprite::from_rows(&["O"])?.with_generated_mask(&[' ']))
            .with_events(self.contacts.clone());
        self.ball = Some(ctx.registry().instantiate_named(&ball, "ball"));
        self.serve();

        info!(width = w, height = h, "breakout started");
        Ok(())
    }

    fn on_update(&mut self, ctx: &Context<'_>) -> Result<()> {
        if ctx.is_key_down(Key::Esc) {
            ctx.exit();
            return Ok(());
        }
        let registry = ctx.registry();

        if let Some(paddle) = &mut self.paddle {
            let dx = ctx.axis(Axis::Horizontal) * 2.0;
            let max_x = self.width - paddle.sprite.width() as f32;
            paddle.transform.position.x = (paddle.transform.position.x + dx).clamp(0.0, max_x);
            registry.update(paddle)?;
        }

        let touched: Vec<EntityId> = std::mem::take(&mut *self.contacts.0.lock());
        for other in touched {
            let Some(hit) = registry.get_id(other)? else {
                continue;
            };
            match hit.name.as_str() {
                "enemy" => {
                    registry.destroy(&hit, 0.1)?;
                    self.score += 1;
                    self.velocity.y = -self.velocity.y;
                }
                "player" => self.velocity.y = -self.velocity.y.abs(),
                _ => {}
            }
        }

        if registry.find("enemy").is_none() {
            info!(score = self.score, "row cleared");
            self.spawn_bricks(ctx)?;
        }

        let dt = ctx.delta_time();
        let (w, h) = (self.width, self.height);
        let mut missed = false;
        if let Some(ball) = &mut self.ball {
            let pos = &mut ball.transform.position;
            *pos += self.velocity * dt;
            if pos.x < 0.0 || pos.x >= w - 1.0 {
                self.velocity.x = -self.velocity.x;
                pos.x = pos.x.clamp(0.0, w - 1.0);
            }
            if pos.y < 0.0 {
                self.velocity.y = self.velocity.y.abs();
                pos.y = 0.0;
            }
            missed = pos.y >= h;
        }
        if missed {
            self.serve();
        }
        if let Some(ball) = &self.ball {
            registry.update(ball)?;
        }

        self.hud.clear();
        write!(self.hud, "SCORE: {}", self.score)?;
        ctx.put_str(0, 0, &self.hud, true);
        Ok(())
    }
}
