//! Software RGBA surface
//!
//! Straight-alpha RGBA8 buffer implementing the same primitives a 2D canvas
//! context offers. Used by the headless binary and by tests.

use bytemuck::{Pod, Zeroable};

use super::{CompositeMode, Rect, Surface};
use crate::palette::Color;

/// One RGBA8 pixel (straight alpha)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Rgba8 = Rgba8 { r: 0, g: 0, b: 0, a: 0 };

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

/// Blend `src` onto `dst` with the given composite mode
fn blend(dst: Rgba8, src: Rgba8, mode: CompositeMode) -> Rgba8 {
    let sa = src.a as f32 / 255.0;
    let da = dst.a as f32 / 255.0;
    match mode {
        CompositeMode::Overwrite => {
            let out_a = sa + da * (1.0 - sa);
            if out_a <= 0.0 {
                return Rgba8::TRANSPARENT;
            }
            let channel = |s: u8, d: u8| {
                ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a)
                    .round()
                    .clamp(0.0, 255.0) as u8
            };
            Rgba8 {
                r: channel(src.r, dst.r),
                g: channel(src.g, dst.g),
                b: channel(src.b, dst.b),
                a: (out_a * 255.0).round() as u8,
            }
        }
        CompositeMode::SubtractAlpha => Rgba8 {
            // Floor so repeated fades always reach zero
            a: (da * (1.0 - sa) * 255.0).floor() as u8,
            ..dst
        },
    }
}

/// Software drawing surface
#[derive(Debug, Clone)]
pub struct PixelSurface {
    pixels: Vec<Rgba8>,
    width: u32,
    height: u32,
    smoothing: bool,
    mode: CompositeMode,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![Rgba8::TRANSPARENT; (width as usize) * (height as usize)],
            width,
            height,
            smoothing: true,
            mode: CompositeMode::Overwrite,
        }
    }

    /// Raw RGBA bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba8> {
        self.index(x as i64, y as i64).map(|i| self.pixels[i])
    }

    /// Number of pixels with any coverage
    pub fn lit_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| p.a > 0).count()
    }

    pub fn composite_mode(&self) -> CompositeMode {
        self.mode
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Integer pixel span covered by a rect, clipped to the surface. Edges
    /// snap to the nearest pixel boundary so a rect keeps its size off-grid.
    fn span(&self, rect: Rect) -> (usize, usize, usize, usize) {
        let clip = |v: f64, max: u32| v.clamp(0.0, max as f64) as usize;
        (
            clip(rect.x.round(), self.width),
            clip(rect.y.round(), self.height),
            clip((rect.x + rect.w).round(), self.width),
            clip((rect.y + rect.h).round(), self.height),
        )
    }

    fn put(&mut self, idx: usize, src: Rgba8) {
        self.pixels[idx] = blend(self.pixels[idx], src, self.mode);
    }

    fn sample_nearest(&self, u: f64, v: f64) -> Option<Rgba8> {
        self.index(u.floor() as i64, v.floor() as i64)
            .map(|i| self.pixels[i])
    }

    /// Average of the source block centred on (u, v), weighted by alpha
    fn sample_box(&self, u: f64, v: f64, sw: f64, sh: f64) -> Option<Rgba8> {
        let x0 = (u - sw / 2.0).floor() as i64;
        let y0 = (v - sh / 2.0).floor() as i64;
        let x1 = ((u + sw / 2.0).ceil() as i64).max(x0 + 1);
        let y1 = ((v + sh / 2.0).ceil() as i64).max(y0 + 1);

        let (mut r, mut g, mut b, mut a) = (0.0f32, 0.0f32, 0.0f32, 0.0f32);
        let mut n = 0u32;
        for y in y0..y1 {
            for x in x0..x1 {
                if let Some(i) = self.index(x, y) {
                    let p = self.pixels[i];
                    let pa = p.a as f32;
                    r += p.r as f32 * pa;
                    g += p.g as f32 * pa;
                    b += p.b as f32 * pa;
                    a += pa;
                    n += 1;
                }
            }
        }
        if n == 0 {
            return None;
        }
        if a <= 0.0 {
            return Some(Rgba8::TRANSPARENT);
        }
        Some(Rgba8 {
            r: (r / a).round() as u8,
            g: (g / a).round() as u8,
            b: (b / a).round() as u8,
            a: (a / n as f32).round() as u8,
        })
    }
}

impl Surface for PixelSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels
            .resize((width as usize) * (height as usize), Rgba8::TRANSPARENT);
    }

    fn clear_region(&mut self, rect: Rect) {
        let (x0, y0, x1, y1) = self.span(rect);
        let w = self.width as usize;
        for y in y0..y1 {
            self.pixels[y * w + x0..y * w + x1].fill(Rgba8::TRANSPARENT);
        }
    }

    fn fill_unit_cell(&mut self, x: i32, y: i32, color: &Color) {
        if let Some(idx) = self.index(x as i64, y as i64) {
            self.put(idx, color.to_rgba8().into());
        }
    }

    fn fill_region(&mut self, rect: Rect, color: &Color) {
        let src: Rgba8 = color.to_rgba8().into();
        let (x0, y0, x1, y1) = self.span(rect);
        let w = self.width as usize;
        for y in y0..y1 {
            for x in x0..x1 {
                self.put(y * w + x, src);
            }
        }
    }

    fn copy_scaled(&mut self, source: &Self, src: Rect, dst: Rect) {
        if src.w <= 0.0 || src.h <= 0.0 || dst.w <= 0.0 || dst.h <= 0.0 {
            return;
        }
        let sx = src.w / dst.w;
        let sy = src.h / dst.h;
        let (x0, y0, x1, y1) = self.span(dst);
        let w = self.width as usize;

        for y in y0..y1 {
            let v = src.y + (y as f64 + 0.5 - dst.y) * sy;
            for x in x0..x1 {
                let u = src.x + (x as f64 + 0.5 - dst.x) * sx;
                let sample = if self.smoothing {
                    source.sample_box(u, v, sx, sy)
                } else {
                    source.sample_nearest(u, v)
                };
                if let Some(p) = sample {
                    self.put(y * w + x, p);
                }
            }
        }
    }

    fn set_smoothing(&mut self, enabled: bool) {
        self.smoothing = enabled;
    }

    fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = Color::rgba(255, 255, 255, 1.0);

    #[test]
    fn test_fill_unit_cell() {
        let mut s = PixelSurface::new(4, 4);
        s.fill_unit_cell(1, 2, &WHITE);
        assert_eq!(s.pixel(1, 2), Some(Rgba8::new(255, 255, 255, 255)));
        assert_eq!(s.lit_pixels(), 1);
        // Off-surface writes are ignored
        s.fill_unit_cell(-1, 0, &WHITE);
        s.fill_unit_cell(4, 0, &WHITE);
        assert_eq!(s.lit_pixels(), 1);
    }

    #[test]
    fn test_source_over_blend() {
        let mut s = PixelSurface::new(1, 1);
        s.fill_unit_cell(0, 0, &Color::rgba(255, 0, 0, 1.0));
        s.fill_unit_cell(0, 0, &Color::rgba(0, 0, 255, 0.5));
        let p = s.pixel(0, 0).unwrap();
        assert_eq!(p.a, 255);
        assert!(p.r > 100 && p.r < 160);
        assert!(p.b > 100 && p.b < 160);
    }

    #[test]
    fn test_subtract_alpha_fades_to_zero() {
        let mut s = PixelSurface::new(2, 2);
        s.fill_region(s.bounds(), &WHITE);
        s.set_composite_mode(CompositeMode::SubtractAlpha);
        let fade = Color::rgba(0, 0, 0, 0.15);
        s.fill_region(s.bounds(), &fade);
        let a = s.pixel(0, 0).unwrap().a;
        assert!(a < 255 && a > 200);
        for _ in 0..100 {
            s.fill_region(s.bounds(), &fade);
        }
        assert_eq!(s.lit_pixels(), 0);
    }

    #[test]
    fn test_clear_region() {
        let mut s = PixelSurface::new(4, 4);
        s.fill_region(s.bounds(), &WHITE);
        s.clear_region(Rect::new(0.0, 0.0, 2.0, 4.0));
        assert_eq!(s.lit_pixels(), 8);
        s.clear();
        assert_eq!(s.lit_pixels(), 0);
    }

    #[test]
    fn test_fill_region_off_grid_keeps_size() {
        let mut s = PixelSurface::new(8, 8);
        s.fill_region(Rect::new(0.7, 0.7, 3.0, 3.0), &WHITE);
        assert_eq!(s.lit_pixels(), 9);
        assert_eq!(s.pixel(0, 0).unwrap().a, 0);
        assert_eq!(s.pixel(1, 1).unwrap().a, 255);
        assert_eq!(s.pixel(4, 4).unwrap().a, 0);
    }

    #[test]
    fn test_nearest_downscale_loses_pixels() {
        let mut src = PixelSurface::new(8, 8);
        // Sampled by the 4x downscale (centre of block 0,0 is source 2,2)
        src.fill_unit_cell(2, 2, &WHITE);
        // Not sampled
        src.fill_unit_cell(5, 1, &WHITE);

        let mut glow = PixelSurface::new(2, 2);
        glow.set_smoothing(false);
        glow.copy_scaled(&src, src.bounds(), glow.bounds());
        assert_eq!(glow.pixel(0, 0).unwrap().a, 255);
        assert_eq!(glow.pixel(1, 0).unwrap().a, 0);
        assert_eq!(glow.lit_pixels(), 1);
    }

    #[test]
    fn test_smoothed_downscale_averages() {
        let mut src = PixelSurface::new(4, 4);
        src.fill_unit_cell(0, 0, &WHITE);
        let mut glow = PixelSurface::new(1, 1);
        glow.set_smoothing(true);
        glow.copy_scaled(&src, src.bounds(), glow.bounds());
        let p = glow.pixel(0, 0).unwrap();
        assert_eq!(p.r, 255);
        assert_eq!(p.a, 16);
    }

    #[test]
    fn test_resize_discards_contents() {
        let mut s = PixelSurface::new(4, 4);
        s.fill_region(s.bounds(), &WHITE);
        s.resize(2, 3);
        assert_eq!((s.width(), s.height()), (2, 3));
        assert_eq!(s.as_bytes().len(), 2 * 3 * 4);
        assert_eq!(s.lit_pixels(), 0);
    }
}
