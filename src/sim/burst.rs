//! Explosion spawning
//!
//! A burst fills the spark pool from a single origin. Initial velocities are
//! sampled uniformly over a disk so the burst reads as a filled sphere rather
//! than a dense core with a sparse rim.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::Rng;

use super::smoke::SmokePool;
use super::spark::SparkPool;
use crate::palette::Palette;
use crate::polar_to_cartesian;

/// Velocity uniformly distributed over a disk of the given radius
///
/// The radius is `sqrt(u) * max`, which gives uniform areal density.
pub fn sample_disk<R: Rng + ?Sized>(rng: &mut R, max_radius: f64) -> DVec2 {
    let radius = rng.random::<f64>().sqrt() * max_radius;
    let angle = rng.random::<f64>() * TAU;
    polar_to_cartesian(radius, angle)
}

/// Spawn up to `count` sparks at `origin`. Returns how many were actually spawned;
/// the rest are dropped once the pool is full.
pub fn spawn_sparks<R: Rng + ?Sized>(
    pool: &mut SparkPool,
    rng: &mut R,
    origin: DVec2,
    palette: Palette,
    count: usize,
    explosion_size: f64,
) -> usize {
    for spawned in 0..count {
        let Some(spark) = pool.acquire() else {
            return spawned;
        };
        spark.pos = origin;
        spark.vel = sample_disk(rng, explosion_size);
        spark.color = palette.sample(rng);
        spark.life = 1.0;
        spark.max_life = 1.0;
    }
    count
}

/// Spawn up to `count` smoke puffs drifting slowly out of `origin`
pub fn spawn_smoke<R: Rng + ?Sized>(
    pool: &mut SmokePool,
    rng: &mut R,
    origin: DVec2,
    count: usize,
    spread: f64,
) -> usize {
    for spawned in 0..count {
        let Some(smoke) = pool.acquire() else {
            return spawned;
        };
        smoke.pos = origin;
        smoke.vel = sample_disk(rng, spread);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_disk_sampling_has_uniform_area_density() {
        let mut rng = Pcg32::seed_from_u64(42);
        const N: usize = 100_000;
        const BINS: usize = 10;
        let radius = 10.0;
        let mut hist = [0usize; BINS];

        for _ in 0..N {
            let v = sample_disk(&mut rng, radius);
            // r^2 / R^2 is uniform on [0, 1) for uniform areal density
            let t = v.length_squared() / (radius * radius);
            assert!(t <= 1.0 + 1e-9);
            let bin = ((t * BINS as f64) as usize).min(BINS - 1);
            hist[bin] += 1;
        }

        let expected = N as f64 / BINS as f64;
        for (i, &count) in hist.iter().enumerate() {
            let dev = (count as f64 - expected).abs() / expected;
            assert!(dev < 0.05, "bin {i} has {count}, expected ~{expected}");
        }
    }

    #[test]
    fn test_spawn_sparks_fills_pool() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pool = SparkPool::new(2000);
        let origin = DVec2::new(100.0, 100.0);
        let n = spawn_sparks(&mut pool, &mut rng, origin, Palette::Fire, 200, 10.0);
        assert_eq!(n, 200);
        assert_eq!(pool.active_count(), 200);
        for s in pool.active() {
            assert_eq!(s.pos, origin);
            assert!(s.vel.length() <= 10.0 + 1e-9);
            assert_eq!(s.life, 1.0);
        }
    }

    #[test]
    fn test_spawn_sparks_drops_when_full() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pool = SparkPool::new(250);
        let origin = DVec2::new(100.0, 100.0);
        assert_eq!(spawn_sparks(&mut pool, &mut rng, origin, Palette::Blue, 200, 10.0), 200);
        assert_eq!(spawn_sparks(&mut pool, &mut rng, origin, Palette::Blue, 200, 10.0), 50);
        assert_eq!(pool.active_count(), 250);
        assert_eq!(spawn_sparks(&mut pool, &mut rng, origin, Palette::Blue, 200, 10.0), 0);
    }

    #[test]
    fn test_spawn_smoke() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pool = SmokePool::new(5);
        let n = spawn_smoke(&mut pool, &mut rng, DVec2::new(10.0, 10.0), 8, 1.5);
        assert_eq!(n, 5);
        assert!(pool.active().all(|s| s.vel.length() <= 1.5 + 1e-9));
    }
}
