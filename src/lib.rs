//! Hanabi - pooled fireworks and smoke effect for layered 2D canvases
//!
//! Core modules:
//! - `sim`: Particle pools, kinematics and explosion spawning
//! - `renderer`: Drawing-surface abstraction and layer composition
//! - `platform`: Frame scheduling (requestAnimationFrame on web, manual elsewhere)
//! - `driver`: The effect itself (start/stop state machine, fixed-rate stepping)
//! - `palette`: Colour tables and encoding
//! - `config`: Construction parameters

pub mod config;
pub mod driver;
pub mod error;
pub mod palette;
pub mod platform;
pub mod renderer;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod bindings;

pub use config::{EffectConfig, RenderMode};
pub use driver::{Hanabi, LoopState, Stats};
pub use error::{HanabiError, Result};
pub use palette::{Color, Hsl, Palette};

use glam::DVec2;

/// Effect tuning constants
pub mod consts {
    /// Sparks spawned per explosion
    pub const SPARKS_PER_BURST: usize = 200;
    /// Smoke puffs spawned per explosion
    pub const SMOKE_PER_BURST: usize = 8;
    /// Default spark pool capacity
    pub const SPARK_CAPACITY: usize = 2000;
    /// Default smoke pool capacity
    pub const SMOKE_CAPACITY: usize = 500;
    /// Default explosion radius scale (max initial spark speed, px/step)
    pub const EXPLOSION_SIZE: f64 = 10.0;

    /// Spark gravity (px/step²)
    pub const GRAVITY: f64 = 0.2;
    /// Spark drag per step
    pub const SPARK_DRAG: f64 = 0.9;
    /// Spark life lost per step
    pub const SPARK_DECAY: f64 = 0.01;
    /// Below this speed on both axes a spark is considered spent
    pub const MIN_SPARK_SPEED: f64 = 0.01;

    /// Smoke horizontal jitter amplitude
    pub const SMOKE_JITTER_X: f64 = 0.02;
    /// Smoke vertical jitter amplitude
    pub const SMOKE_JITTER_Y: f64 = 0.01;
    /// Upward bias subtracted from smoke vy each step
    pub const SMOKE_LIFT: f64 = 0.015;
    pub const SMOKE_DRAG_X: f64 = 0.95;
    pub const SMOKE_DRAG_Y: f64 = 0.92;
    /// Smoke size growth per step
    pub const SMOKE_GROWTH: f64 = 0.08;
    /// Smoke life lost per step
    pub const SMOKE_DECAY: f64 = 0.012;
    /// How far outside the canvas smoke may drift before recycling
    pub const SMOKE_MARGIN: f64 = 50.0;
    /// Peak smoke alpha
    pub const SMOKE_MAX_ALPHA: f64 = 0.25;
    /// Max initial smoke speed
    pub const SMOKE_SPREAD: f64 = 1.5;

    /// Default target frame rate (Hz)
    pub const DEFAULT_FPS: f64 = 30.0;
    pub const MIN_FPS: f64 = 1.0;
    pub const MAX_FPS: f64 = 60.0;
    /// Beyond this lag the loop resyncs instead of replaying missed intervals
    pub const MAX_CATCH_UP_MS: f64 = 1000.0;

    /// Glow layer is this many times smaller than the primary layer
    pub const GLOW_SCALE: u32 = 4;
    /// Alpha removed from the trail layer every step
    pub const TRAIL_FADE: f64 = 0.15;

    /// Colour-intensity multiplier bounds and step
    pub const INTENSITY_MIN: f64 = 0.8;
    pub const INTENSITY_MAX: f64 = 0.9;
    pub const INTENSITY_STEP: f64 = 0.01;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}

/// Clamp a requested frame rate into the supported range
#[inline]
pub fn clamp_fps(fps: f64) -> f64 {
    if fps.is_nan() {
        return consts::DEFAULT_FPS;
    }
    fps.clamp(consts::MIN_FPS, consts::MAX_FPS)
}
