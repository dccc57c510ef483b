//! Firework sparks
//!
//! Bright one-pixel embers: gravity pulls them down, heavy drag slows them,
//! and they burn out after a fixed number of steps.

use glam::DVec2;
use rand::Rng;

use super::pool::{Pool, PoolEntity};
use crate::consts::*;
use crate::palette::Hsl;

/// Pool of sparks
pub type SparkPool = Pool<Spark>;

/// A single spark
#[derive(Debug, Clone, PartialEq)]
pub struct Spark {
    pub pos: DVec2,
    pub vel: DVec2,
    pub color: Hsl,
    /// Remaining life, 0-1
    pub life: f64,
    pub max_life: f64,
    pub active: bool,
}

impl Default for Spark {
    fn default() -> Self {
        Self {
            pos: DVec2::ZERO,
            vel: DVec2::ZERO,
            color: Hsl::new(0.0, 0.0, 100.0),
            life: 1.0,
            max_life: 1.0,
            active: false,
        }
    }
}

impl Spark {
    /// Remaining life as a fraction, used directly as draw alpha
    #[inline]
    pub fn alpha(&self) -> f64 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    /// Integer cell the spark lands on
    #[inline]
    pub fn cell(&self) -> (i32, i32) {
        (self.pos.x.floor() as i32, self.pos.y.floor() as i32)
    }

    fn update(&mut self) {
        self.vel.y += GRAVITY;
        self.vel *= SPARK_DRAG;
        self.pos += self.vel;
        self.life -= SPARK_DECAY;

        let spent = self.vel.x.abs() < MIN_SPARK_SPEED && self.vel.y.abs() < MIN_SPARK_SPEED;
        if self.life <= 0.0 || spent {
            self.active = false;
        }
    }
}

impl PoolEntity for Spark {
    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn step<R: Rng + ?Sized>(&mut self, _rng: &mut R) {
        if self.active {
            self.update();
        }
    }

    fn is_out_of_bounds(&self, width: f64, height: f64) -> bool {
        self.pos.x < 0.0 || self.pos.x > width || self.pos.y < 0.0 || self.pos.y > height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn live_spark(vel: DVec2) -> Spark {
        Spark {
            pos: DVec2::new(100.0, 100.0),
            vel,
            active: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_kinematics_one_step() {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut s = live_spark(DVec2::new(1.0, -2.0));
        s.step(&mut rng);
        assert!((s.vel.x - 0.9).abs() < 1e-12);
        assert!((s.vel.y - (-2.0 + 0.2) * 0.9).abs() < 1e-12);
        assert!((s.pos.x - 100.9).abs() < 1e-12);
        assert!((s.life - 0.99).abs() < 1e-12);
        assert!(s.active);
    }

    #[test]
    fn test_life_runs_out_after_exactly_100_steps() {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut s = live_spark(DVec2::new(3.0, 0.0));
        for step in 1..100 {
            s.step(&mut rng);
            assert!(s.active, "died early at step {step}");
        }
        s.step(&mut rng);
        assert!(!s.active);
    }

    #[test]
    fn test_spent_spark_deactivates() {
        let mut rng = Pcg32::seed_from_u64(0);
        // Upward velocity that gravity exactly cancels
        let mut s = live_spark(DVec2::new(0.0, -0.2));
        s.step(&mut rng);
        assert!(!s.active);
    }

    #[test]
    fn test_inactive_spark_does_not_move() {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut s = Spark::default();
        s.vel = DVec2::new(5.0, 5.0);
        s.step(&mut rng);
        assert_eq!(s.pos, DVec2::ZERO);
    }

    #[test]
    fn test_bounds() {
        let mut s = Spark::default();
        s.pos = DVec2::new(10.0, 10.0);
        assert!(!s.is_out_of_bounds(20.0, 20.0));
        s.pos = DVec2::new(20.5, 10.0);
        assert!(s.is_out_of_bounds(20.0, 20.0));
        s.pos = DVec2::new(10.0, -0.1);
        assert!(s.is_out_of_bounds(20.0, 20.0));
    }

    #[test]
    fn test_alpha_and_cell() {
        let mut s = Spark::default();
        s.life = 0.25;
        s.pos = DVec2::new(3.7, -0.2);
        assert_eq!(s.alpha(), 0.25);
        assert_eq!(s.cell(), (3, -1));
    }
}
