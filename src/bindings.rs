//! JavaScript API
//!
//! ```js
//! const fx = new Hanabi(canvas, glowCanvas, trailCanvas, 10, 30);
//! fx.start();
//! fx.explode(x, y, "blue");
//! fx.setRenderMode("glow");
//! fx.saveConfig();
//! ```
//!
//! The optional last constructor argument is a JSON config
//! (`{"render_mode": "dual_draw", "spark_capacity": 4000}`). Without it the
//! config saved in LocalStorage is used, falling back to defaults.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::config::{EffectConfig, RenderMode};
use crate::driver::Hanabi;
use crate::palette::Palette;
use crate::platform::RafScheduler;
use crate::renderer::CanvasSurface;

type WebEffect = Hanabi<CanvasSurface, RafScheduler>;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // Already initialised when several modules share the page
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Fireworks effect drawing into browser canvases
#[wasm_bindgen(js_name = Hanabi)]
pub struct WebHanabi {
    effect: Rc<RefCell<WebEffect>>,
}

#[wasm_bindgen(js_class = Hanabi)]
impl WebHanabi {
    /// Throws if any canvas cannot provide a 2D context or the config JSON is
    /// invalid. `explosion_size` and `fps` override the config.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        glow_canvas: HtmlCanvasElement,
        trail_canvas: Option<HtmlCanvasElement>,
        explosion_size: Option<f64>,
        fps: Option<f64>,
        config_json: Option<String>,
    ) -> Result<WebHanabi, JsError> {
        let mut config = match config_json {
            Some(json) => EffectConfig::from_json(&json)?,
            None => EffectConfig::load(),
        };
        if let Some(size) = explosion_size {
            config.explosion_size = size;
        }
        if let Some(fps) = fps {
            config.fps = fps;
        }

        let primary = CanvasSurface::new(canvas)?;
        let glow = CanvasSurface::new(glow_canvas)?;
        let trail = trail_canvas.map(CanvasSurface::new).transpose()?;
        let scheduler = RafScheduler::new()?;

        let effect = Rc::new(RefCell::new(Hanabi::new(
            primary, glow, trail, scheduler, config,
        )));

        let weak = Rc::downgrade(&effect);
        effect.borrow().scheduler().set_handler(move |token| {
            if let Some(effect) = weak.upgrade() {
                effect.borrow_mut().on_frame(token);
            }
        });

        Ok(Self { effect })
    }

    /// Burst at (x, y). Unknown palette names fall back to fire.
    pub fn explode(&self, x: f64, y: f64, palette: Option<String>) {
        let palette = palette.and_then(|name| match name.parse::<Palette>() {
            Ok(p) => Some(p),
            Err(e) => {
                log::warn!("{}, using fire", e);
                None
            }
        });
        self.effect.borrow_mut().explode(x, y, palette);
    }

    #[wasm_bindgen(js_name = explodeRandom)]
    pub fn explode_random(&self, x: f64, y: f64) {
        self.effect.borrow_mut().explode_random(x, y);
    }

    pub fn start(&self) {
        self.effect.borrow_mut().start();
    }

    pub fn stop(&self) {
        self.effect.borrow_mut().stop();
    }

    /// Stop and drop the frame callback
    pub fn destroy(&self) {
        let mut effect = self.effect.borrow_mut();
        effect.destroy();
        effect.scheduler().release();
    }

    /// Throws on an unknown mode name
    #[wasm_bindgen(js_name = setRenderMode)]
    pub fn set_render_mode(&self, mode: &str) -> Result<(), JsError> {
        let mode: RenderMode = mode.parse()?;
        self.effect.borrow_mut().set_render_mode(mode);
        Ok(())
    }

    /// Current config as a plain object
    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> Result<JsValue, JsError> {
        let json = self.effect.borrow().config().to_json()?;
        js_sys::JSON::parse(&json).map_err(|_| JsError::new("config is not valid JSON"))
    }

    /// Persist the current config to LocalStorage for the next page load
    #[wasm_bindgen(js_name = saveConfig)]
    pub fn save_config(&self) {
        self.effect.borrow().config().save();
    }

    /// `{ active, pooled, smoke, fps? }`
    #[wasm_bindgen(js_name = getStats)]
    pub fn get_stats(&self) -> Result<JsValue, JsError> {
        let json = serde_json::to_string(&self.effect.borrow().stats())?;
        js_sys::JSON::parse(&json).map_err(|_| JsError::new("stats are not valid JSON"))
    }

    #[wasm_bindgen(js_name = getAvailablePalettes)]
    pub fn get_available_palettes(&self) -> js_sys::Array {
        WebEffect::available_palettes()
            .iter()
            .map(|p| JsValue::from_str(p.as_str()))
            .collect()
    }
}
