//! HTML canvas surface (2D context)

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{CompositeMode, Rect, Surface};
use crate::error::{HanabiError, Result};
use crate::palette::Color;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Wrap a canvas, failing if it cannot produce a 2D context
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| HanabiError::SurfaceUnavailable(format!("{:?}", e)))?
            .ok_or_else(|| HanabiError::SurfaceUnavailable("no 2d context".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| HanabiError::SurfaceUnavailable("not a 2d context".to_string()))?;
        // Keep particles sharp
        ctx.set_image_smoothing_enabled(false);
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        // Resizing resets context state
        self.ctx.set_image_smoothing_enabled(false);
    }

    fn clear_region(&mut self, rect: Rect) {
        self.ctx.clear_rect(rect.x, rect.y, rect.w, rect.h);
    }

    fn fill_unit_cell(&mut self, x: i32, y: i32, color: &Color) {
        self.ctx.set_fill_style_str(&color.to_string());
        self.ctx.fill_rect(x as f64, y as f64, 1.0, 1.0);
    }

    fn fill_region(&mut self, rect: Rect, color: &Color) {
        self.ctx.set_fill_style_str(&color.to_string());
        self.ctx.fill_rect(rect.x, rect.y, rect.w, rect.h);
    }

    fn copy_scaled(&mut self, source: &Self, src: Rect, dst: Rect) {
        let result = self
            .ctx
            .draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &source.canvas,
                src.x,
                src.y,
                src.w,
                src.h,
                dst.x,
                dst.y,
                dst.w,
                dst.h,
            );
        if let Err(e) = result {
            log::warn!("drawImage failed: {:?}", e);
        }
    }

    fn set_smoothing(&mut self, enabled: bool) {
        self.ctx.set_image_smoothing_enabled(enabled);
    }

    fn set_composite_mode(&mut self, mode: CompositeMode) {
        if let Err(e) = self.ctx.set_global_composite_operation(mode.as_str()) {
            log::warn!("globalCompositeOperation {} failed: {:?}", mode.as_str(), e);
        }
    }
}
