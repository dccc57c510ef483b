//! Drawing surfaces and layer composition
//!
//! The effect never talks to a canvas directly. Everything goes through the
//! [`Surface`] trait, implemented by a software pixel buffer for headless use
//! and by a 2D canvas context on the web.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod layers;
pub mod pixels;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use layers::Layers;
pub use pixels::PixelSurface;

use crate::palette::Color;

/// How new pixels combine with what is already on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    /// Source drawn over destination (canvas `source-over`)
    #[default]
    Overwrite,
    /// Source alpha removed from destination (canvas `destination-out`)
    SubtractAlpha,
}

impl CompositeMode {
    /// Canvas `globalCompositeOperation` name
    pub fn as_str(&self) -> &'static str {
        match self {
            CompositeMode::Overwrite => "source-over",
            CompositeMode::SubtractAlpha => "destination-out",
        }
    }
}

/// Axis-aligned rectangle in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of `size` centred on (cx, cy)
    pub fn centered(cx: f64, cy: f64, size: f64) -> Self {
        Self::new(cx - size / 2.0, cy - size / 2.0, size, size)
    }
}

/// A 2D drawing target
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Change the backing resolution. Contents are discarded.
    fn resize(&mut self, width: u32, height: u32);

    /// Make a region fully transparent (ignores composite mode)
    fn clear_region(&mut self, rect: Rect);

    /// Fill the single pixel at (x, y)
    fn fill_unit_cell(&mut self, x: i32, y: i32, color: &Color);

    fn fill_region(&mut self, rect: Rect, color: &Color);

    /// Draw `src` of `source` into `dst` of this surface, scaling as needed
    fn copy_scaled(&mut self, source: &Self, src: Rect, dst: Rect)
    where
        Self: Sized;

    fn set_smoothing(&mut self, enabled: bool);

    fn set_composite_mode(&mut self, mode: CompositeMode);

    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width() as f64, self.height() as f64)
    }

    fn clear(&mut self) {
        let bounds = self.bounds();
        self.clear_region(bounds);
    }
}
