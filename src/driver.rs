//! The fireworks effect
//!
//! Owns both particle pools, the render layers and the frame loop. The loop is
//! cooperative: every frame callback books the next one while running, and a
//! simulation step only happens once a full frame interval has elapsed.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::config::{EffectConfig, RenderMode};
use crate::consts::*;
use crate::palette::Palette;
use crate::platform::{FrameScheduler, FrameToken};
use crate::renderer::{Layers, Surface};
use crate::sim::{SmokePool, SparkPool, spawn_smoke, spawn_sparks};

/// Processed frames kept for the FPS estimate
const FPS_WINDOW: usize = 60;

/// Frame loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// Diagnostics snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stats {
    /// Sparks in flight
    pub active: usize,
    /// Sparks ready for reuse
    pub pooled: usize,
    /// Smoke puffs in flight
    pub smoke: usize,
    /// Measured simulation rate, once enough frames have been processed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
}

/// Fireworks effect bound to a set of surfaces and a frame scheduler
pub struct Hanabi<S, F> {
    config: EffectConfig,
    layers: Layers<S>,
    sparks: SparkPool,
    smoke: SmokePool,
    rng: Pcg32,
    scheduler: F,
    state: LoopState,
    /// Frame we are waiting on, if any
    pending: Option<FrameToken>,
    /// Timestamp of the last processed interval boundary (ms)
    last_time: f64,
    frame_interval: f64,
    /// Colour-intensity multiplier, bounces between INTENSITY_MIN and INTENSITY_MAX
    intensity: f64,
    intensity_dir: f64,
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    frames_processed: u64,
    fps: Option<f64>,
}

impl<S: Surface, F: FrameScheduler> Hanabi<S, F> {
    /// Build an effect. The glow surface is resized to a quarter of `primary`.
    pub fn new(primary: S, glow: S, trail: Option<S>, scheduler: F, config: EffectConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let frame_interval = config.frame_interval_ms();
        let layers = Layers::new(primary, glow, trail);

        log::info!(
            "Hanabi effect {}x{} @ {} Hz ({} mode, {} sparks, seed {})",
            layers.primary.width(),
            layers.primary.height(),
            config.effective_fps(),
            config.render_mode.as_str(),
            config.spark_capacity,
            seed
        );

        Self {
            sparks: SparkPool::new(config.spark_capacity),
            smoke: SmokePool::new(config.smoke_capacity),
            rng: Pcg32::seed_from_u64(seed),
            layers,
            scheduler,
            state: LoopState::Stopped,
            pending: None,
            last_time: 0.0,
            frame_interval,
            intensity: INTENSITY_MIN,
            intensity_dir: 1.0,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            frames_processed: 0,
            fps: None,
            config,
        }
    }

    /// Burst of sparks (and smoke) at (x, y). Defaults to the fire palette.
    ///
    /// Returns how many sparks were spawned; fewer than configured when the
    /// pool runs out.
    pub fn explode(&mut self, x: f64, y: f64, palette: Option<Palette>) -> usize {
        let palette = palette.unwrap_or_default();
        let origin = DVec2::new(x, y);
        let spawned = spawn_sparks(
            &mut self.sparks,
            &mut self.rng,
            origin,
            palette,
            self.config.sparks_per_burst,
            self.config.explosion_size,
        );
        spawn_smoke(
            &mut self.smoke,
            &mut self.rng,
            origin,
            self.config.smoke_per_burst,
            SMOKE_SPREAD,
        );
        log::debug!("{} burst at ({:.0}, {:.0}): {} sparks", palette, x, y, spawned);
        spawned
    }

    /// Burst with a uniformly chosen palette
    pub fn explode_random(&mut self, x: f64, y: f64) -> usize {
        let palette = Palette::random(&mut self.rng);
        self.explode(x, y, Some(palette))
    }

    /// Begin the frame loop. No-op while already running.
    pub fn start(&mut self) {
        if self.state == LoopState::Running {
            return;
        }
        self.state = LoopState::Running;
        self.last_time = self.scheduler.now_ms();
        self.book_frame();
        if self.state == LoopState::Running {
            log::info!("Hanabi started");
        }
    }

    /// Halt the frame loop. Any booked frame is cancelled, and one that fires
    /// anyway is ignored.
    pub fn stop(&mut self) {
        if let Some(token) = self.pending.take() {
            self.scheduler.cancel_frame(token);
        }
        if self.state == LoopState::Running {
            self.state = LoopState::Stopped;
            log::info!("Hanabi stopped");
        }
    }

    /// Stop and wipe every layer
    pub fn destroy(&mut self) {
        self.stop();
        self.sparks.clear();
        self.smoke.clear();
        self.layers.clear_all();
    }

    /// Frame callback. Returns true when a simulation step ran.
    pub fn on_frame(&mut self, token: FrameToken) -> bool {
        if self.state != LoopState::Running || self.pending != Some(token) {
            log::trace!("Ignoring stale frame {:?}", token);
            return false;
        }
        self.pending = None;

        let now = self.scheduler.now_ms();
        let elapsed = now - self.last_time;
        let stepped = elapsed >= self.frame_interval;
        if stepped {
            self.step();
            self.record_frame(now);
            if elapsed > MAX_CATCH_UP_MS {
                // Too far behind to replay every interval: resync
                self.last_time = now - elapsed % self.frame_interval;
            } else {
                self.last_time += self.frame_interval;
            }
        }

        self.book_frame();
        stepped
    }

    /// Book the next frame. A refused request stops the loop so a later
    /// `start()` can try again.
    fn book_frame(&mut self) {
        self.pending = self.scheduler.request_frame();
        if self.pending.is_none() {
            self.state = LoopState::Stopped;
            log::warn!("Frame request refused, Hanabi stopped");
        }
    }

    /// One simulation step followed by one render
    pub fn step(&mut self) {
        self.simulate();
        self.render();
    }

    fn simulate(&mut self) {
        self.intensity += self.intensity_dir * INTENSITY_STEP;
        if self.intensity > INTENSITY_MAX {
            self.intensity_dir = -1.0;
        } else if self.intensity < INTENSITY_MIN {
            self.intensity_dir = 1.0;
        }

        let (w, h) = self.layers.bounds();
        self.sparks.advance(w, h, &mut self.rng);
        self.smoke.advance(w, h, &mut self.rng);
    }

    fn render(&mut self) {
        self.layers.render(
            self.config.render_mode,
            &self.sparks,
            &self.smoke,
            self.intensity,
        );
    }

    fn record_frame(&mut self, now: f64) {
        self.frame_times[self.frame_index] = now;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        self.frames_processed += 1;

        if self.frames_processed >= FPS_WINDOW as u64 {
            let oldest = self.frame_times[self.frame_index];
            let elapsed = now - oldest;
            if elapsed > 0.0 {
                self.fps = Some((FPS_WINDOW - 1) as f64 * 1000.0 / elapsed);
            }
        }
    }

    pub fn stats(&self) -> Stats {
        Stats {
            active: self.sparks.active_count(),
            pooled: self.sparks.available_count(),
            smoke: self.smoke.active_count(),
            fps: self.fps,
        }
    }

    pub fn available_palettes() -> &'static [Palette] {
        &Palette::ALL
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// Switch how layers are composed. Every layer is wiped so the old mode
    /// leaves no stale glow or trail behind.
    pub fn set_render_mode(&mut self, mode: RenderMode) {
        if self.config.render_mode == mode {
            return;
        }
        log::info!("Render mode {} -> {}", self.config.render_mode, mode);
        self.config.render_mode = mode;
        self.layers.clear_all();
    }

    pub fn layers(&self) -> &Layers<S> {
        &self.layers
    }

    pub fn sparks(&self) -> &SparkPool {
        &self.sparks
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }
}
