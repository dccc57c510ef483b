//! Residual smoke puffs
//!
//! Smoke drifts with a little random jitter, barely rises, grows every step
//! and fades out faster than linearly near the end of its life.

use glam::DVec2;
use rand::Rng;

use super::pool::{Pool, PoolEntity};
use crate::consts::*;
use crate::palette::Color;

/// Pool of smoke puffs
pub type SmokePool = Pool<Smoke>;

/// Smoke grey
const SMOKE_RGB: (u8, u8, u8) = (180, 180, 180);

/// A single smoke puff
#[derive(Debug, Clone, PartialEq)]
pub struct Smoke {
    pub pos: DVec2,
    pub vel: DVec2,
    /// Side length in pixels, never shrinks while active
    pub size: f64,
    pub life: f64,
    pub max_life: f64,
    pub active: bool,
}

impl Default for Smoke {
    fn default() -> Self {
        Self {
            pos: DVec2::ZERO,
            vel: DVec2::ZERO,
            size: 1.0,
            life: 1.0,
            max_life: 1.0,
            active: false,
        }
    }
}

impl Smoke {
    /// Draw alpha: `f * sqrt(f)` taper on the remaining-life fraction, capped
    pub fn alpha(&self) -> f64 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        let f = (self.life / self.max_life).clamp(0.0, 1.0);
        (f * SMOKE_MAX_ALPHA * f.sqrt()).min(SMOKE_MAX_ALPHA)
    }

    pub fn color(&self) -> Color {
        let (r, g, b) = SMOKE_RGB;
        Color::rgba(r, g, b, self.alpha())
    }

    fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.vel.x += (rng.random::<f64>() - 0.5) * SMOKE_JITTER_X;
        self.vel.y += (rng.random::<f64>() - 0.5) * SMOKE_JITTER_Y;

        self.vel.y -= SMOKE_LIFT;
        self.vel.x *= SMOKE_DRAG_X;
        self.vel.y *= SMOKE_DRAG_Y;

        self.pos += self.vel;
        self.size += SMOKE_GROWTH;
        self.life -= SMOKE_DECAY;

        if self.life <= 0.0 {
            self.active = false;
        }
    }
}

impl PoolEntity for Smoke {
    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.active {
            self.update(rng);
        }
    }

    /// Smoke may wander past the sides and bottom by a margin and rise
    /// off the top freely
    fn is_out_of_bounds(&self, width: f64, height: f64) -> bool {
        self.pos.x < -SMOKE_MARGIN
            || self.pos.x > width + SMOKE_MARGIN
            || self.pos.y > height + SMOKE_MARGIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn live_smoke() -> Smoke {
        Smoke {
            pos: DVec2::new(100.0, 100.0),
            active: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_size_never_shrinks() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut s = live_smoke();
        let mut last = s.size;
        while s.active {
            s.step(&mut rng);
            assert!(s.size >= last);
            last = s.size;
        }
    }

    #[test]
    fn test_smoke_rises() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut s = live_smoke();
        for _ in 0..40 {
            s.step(&mut rng);
        }
        assert!(s.pos.y < 100.0, "smoke sank to {}", s.pos.y);
    }

    #[test]
    fn test_jitter_is_bounded() {
        let mut rng = Pcg32::seed_from_u64(13);
        for _ in 0..200 {
            let mut s = live_smoke();
            s.step(&mut rng);
            let max_vx = SMOKE_JITTER_X / 2.0 * SMOKE_DRAG_X;
            assert!(s.vel.x.abs() <= max_vx + 1e-12);
        }
    }

    #[test]
    fn test_lifetime() {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut s = live_smoke();
        let mut steps = 0;
        while s.active {
            s.step(&mut rng);
            steps += 1;
        }
        // 1.0 / 0.012 = 83.3
        assert_eq!(steps, 84);
    }

    #[test]
    fn test_alpha_taper() {
        let mut s = live_smoke();
        assert!((s.alpha() - 0.25).abs() < 1e-12);
        s.life = 0.25;
        // 0.25 * 0.25 * 0.5
        assert!((s.alpha() - 0.03125).abs() < 1e-12);
        s.life = 0.0;
        assert_eq!(s.alpha(), 0.0);
    }

    #[test]
    fn test_wide_bounds() {
        let mut s = live_smoke();
        s.pos = DVec2::new(-40.0, -500.0);
        assert!(!s.is_out_of_bounds(100.0, 100.0));
        s.pos = DVec2::new(-51.0, 50.0);
        assert!(s.is_out_of_bounds(100.0, 100.0));
        s.pos = DVec2::new(50.0, 151.0);
        assert!(s.is_out_of_bounds(100.0, 100.0));
    }
}
