//! Layer composition
//!
//! Three logical surfaces make up the look:
//! - primary: sharp one-pixel sparks plus smoke
//! - glow: a quarter-resolution copy of primary; the nearest-neighbour
//!   downscale drops most pixels, and the survivors read as sparkle once the
//!   host scales the layer back up
//! - trail (optional): persistent layer faded a little every step so sparks
//!   leave streaks

use super::{CompositeMode, Rect, Surface};
use crate::config::RenderMode;
use crate::consts::{GLOW_SCALE, TRAIL_FADE};
use crate::palette::Color;
use crate::sim::{SmokePool, Spark, SparkPool};

/// The set of surfaces one effect draws into
#[derive(Debug)]
pub struct Layers<S> {
    pub primary: S,
    pub glow: S,
    pub trail: Option<S>,
}

impl<S: Surface> Layers<S> {
    /// Take ownership of the surfaces and size the glow layer to a quarter of
    /// the primary one (the trail layer matches primary)
    pub fn new(primary: S, mut glow: S, mut trail: Option<S>) -> Self {
        let (w, h) = (primary.width(), primary.height());
        glow.resize(w / GLOW_SCALE, h / GLOW_SCALE);
        glow.set_smoothing(false);
        if let Some(trail) = trail.as_mut() {
            if (trail.width(), trail.height()) != (w, h) {
                trail.resize(w, h);
            }
        }
        Self {
            primary,
            glow,
            trail,
        }
    }

    /// Simulation bounds (the primary surface size)
    pub fn bounds(&self) -> (f64, f64) {
        (self.primary.width() as f64, self.primary.height() as f64)
    }

    /// Draw one frame
    pub fn render(&mut self, mode: RenderMode, sparks: &SparkPool, smoke: &SmokePool, intensity: f64) {
        self.primary.set_composite_mode(CompositeMode::Overwrite);
        self.glow.set_composite_mode(CompositeMode::Overwrite);
        self.primary.clear();
        self.glow.clear();

        if mode == RenderMode::Trails {
            self.fade_trail();
        }

        for puff in smoke.active() {
            let rect = Rect::centered(puff.pos.x, puff.pos.y, puff.size.ceil());
            self.primary.fill_region(rect, &puff.color());
        }

        for spark in sparks.active() {
            let color = spark_color(spark, intensity);
            let (x, y) = spark.cell();
            self.primary.fill_unit_cell(x, y, &color);

            match mode {
                RenderMode::DualDraw => {
                    let scale = GLOW_SCALE as f64;
                    let gx = (spark.pos.x / scale).floor() as i32;
                    let gy = (spark.pos.y / scale).floor() as i32;
                    self.glow.fill_unit_cell(gx, gy, &color);
                }
                RenderMode::Trails => {
                    if let Some(trail) = self.trail.as_mut() {
                        trail.fill_unit_cell(x, y, &color);
                    }
                }
                RenderMode::Glow => {}
            }
        }

        if mode != RenderMode::DualDraw {
            let (src, dst) = (self.primary.bounds(), self.glow.bounds());
            self.glow.set_smoothing(false);
            self.glow.copy_scaled(&self.primary, src, dst);
        }
    }

    /// Remove a fixed fraction of alpha from the whole trail layer
    fn fade_trail(&mut self) {
        if let Some(trail) = self.trail.as_mut() {
            let bounds = trail.bounds();
            trail.set_composite_mode(CompositeMode::SubtractAlpha);
            trail.fill_region(bounds, &Color::rgba(0, 0, 0, TRAIL_FADE));
            trail.set_composite_mode(CompositeMode::Overwrite);
        }
    }

    /// Clear every layer, trail included
    pub fn clear_all(&mut self) {
        self.primary.clear();
        self.glow.clear();
        if let Some(trail) = self.trail.as_mut() {
            trail.clear();
        }
    }
}

/// Spark fill colour: palette colour dimmed by the global intensity, alpha by remaining life
fn spark_color(spark: &Spark, intensity: f64) -> Color {
    spark.color.dimmed(intensity).with_alpha(spark.alpha())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Palette;
    use crate::renderer::PixelSurface;
    use crate::sim::spawn_sparks;
    use glam::DVec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn layers(trail: bool) -> Layers<PixelSurface> {
        Layers::new(
            PixelSurface::new(64, 48),
            PixelSurface::new(1, 1),
            trail.then(|| PixelSurface::new(64, 48)),
        )
    }

    fn one_spark_at(x: f64, y: f64) -> SparkPool {
        let mut pool = SparkPool::new(4);
        let s = pool.acquire().unwrap();
        s.pos = DVec2::new(x, y);
        s.color = Palette::Fire.colors()[0];
        pool
    }

    #[test]
    fn test_glow_is_quarter_size() {
        let l = layers(false);
        assert_eq!((l.glow.width(), l.glow.height()), (16, 12));
        assert!(l.trail.is_none());
    }

    #[test]
    fn test_glow_mode_draws_sharp_and_downscaled() {
        let mut l = layers(false);
        // (10.5, 6.2) floors to (10, 6), which the downscale samples for glow cell (2, 1)
        let sparks = one_spark_at(10.5, 6.2);
        l.render(RenderMode::Glow, &sparks, &SmokePool::new(0), 1.0);
        assert_eq!(l.primary.lit_pixels(), 1);
        assert!(l.primary.pixel(10, 6).unwrap().a > 0);
        assert!(l.glow.pixel(2, 1).unwrap().a > 0);
    }

    #[test]
    fn test_dual_draw_writes_glow_directly() {
        let mut l = layers(false);
        let sparks = one_spark_at(9.0, 5.0);
        l.render(RenderMode::DualDraw, &sparks, &SmokePool::new(0), 1.0);
        assert!(l.glow.pixel(2, 1).unwrap().a > 0);
        assert_eq!(l.glow.lit_pixels(), 1);
    }

    #[test]
    fn test_trail_persists_and_fades() {
        let mut l = layers(true);
        let sparks = one_spark_at(20.0, 20.0);
        l.render(RenderMode::Trails, &sparks, &SmokePool::new(0), 1.0);
        let first = l.trail.as_ref().unwrap().pixel(20, 20).unwrap().a;
        assert!(first > 0);

        // Nothing new drawn: the old streak only fades
        let empty = SparkPool::new(0);
        l.render(RenderMode::Trails, &empty, &SmokePool::new(0), 1.0);
        let second = l.trail.as_ref().unwrap().pixel(20, 20).unwrap().a;
        assert!(second < first && second > 0);
        // Primary is cleared every frame
        assert_eq!(l.primary.lit_pixels(), 0);
    }

    #[test]
    fn test_trails_without_trail_surface() {
        let mut l = layers(false);
        let sparks = one_spark_at(20.0, 20.0);
        l.render(RenderMode::Trails, &sparks, &SmokePool::new(0), 1.0);
        assert_eq!(l.primary.lit_pixels(), 1);
    }

    #[test]
    fn test_smoke_drawn_as_square() {
        let mut l = layers(false);
        let mut smoke = SmokePool::new(1);
        {
            let puff = smoke.acquire().unwrap();
            puff.pos = DVec2::new(30.5, 30.5);
            puff.size = 3.0;
        }
        l.render(RenderMode::Glow, &SparkPool::new(0), &smoke, 1.0);
        assert_eq!(l.primary.lit_pixels(), 9);
    }

    #[test]
    fn test_smoke_square_off_grid() {
        for centre in [30.2, 30.0, 30.8] {
            let mut l = layers(false);
            let mut smoke = SmokePool::new(1);
            {
                let puff = smoke.acquire().unwrap();
                puff.pos = DVec2::new(centre, centre);
                puff.size = 2.4;
            }
            l.render(RenderMode::Glow, &SparkPool::new(0), &smoke, 1.0);
            assert_eq!(l.primary.lit_pixels(), 9, "centre {}", centre);
        }
    }

    #[test]
    fn test_burst_renders() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut sparks = SparkPool::new(300);
        spawn_sparks(&mut sparks, &mut rng, DVec2::new(32.0, 24.0), Palette::Purple, 200, 10.0);
        let mut l = layers(true);
        l.render(RenderMode::Trails, &sparks, &SmokePool::new(0), 0.85);
        // All sparks share one origin cell before the first step
        assert_eq!(l.primary.lit_pixels(), 1);
        assert_eq!(l.trail.as_ref().unwrap().lit_pixels(), 1);
    }
}
