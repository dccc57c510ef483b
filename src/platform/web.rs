//! `requestAnimationFrame` scheduler
//!
//! One JS closure is shared by every booked frame. The browser id of the
//! outstanding request doubles as the frame token.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::{FrameScheduler, FrameToken};
use crate::error::{HanabiError, Result};

type FrameClosure = Closure<dyn FnMut(f64)>;

pub struct RafScheduler {
    window: web_sys::Window,
    callback: Rc<RefCell<Option<FrameClosure>>>,
    /// Browser id of the request currently outstanding
    pending: Rc<Cell<Option<i32>>>,
}

impl RafScheduler {
    pub fn new() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| HanabiError::SurfaceUnavailable("no window".to_string()))?;
        Ok(Self {
            window,
            callback: Rc::new(RefCell::new(None)),
            pending: Rc::new(Cell::new(None)),
        })
    }

    /// Install the handler run for every fired frame
    pub fn set_handler(&self, mut handler: impl FnMut(FrameToken) + 'static) {
        let pending = self.pending.clone();
        let closure = Closure::<dyn FnMut(f64)>::new(move |_time: f64| {
            if let Some(id) = pending.take() {
                handler(FrameToken(id as u64));
            }
        });
        *self.callback.borrow_mut() = Some(closure);
    }

    /// Drop the JS closure so nothing can call back into the effect
    pub fn release(&self) {
        if let Some(id) = self.pending.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        self.callback.borrow_mut().take();
    }
}

impl FrameScheduler for RafScheduler {
    fn now_ms(&self) -> f64 {
        self.window
            .performance()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn request_frame(&mut self) -> Option<FrameToken> {
        let callback = self.callback.borrow();
        let Some(closure) = callback.as_ref() else {
            log::warn!("Frame requested with no handler installed");
            return None;
        };
        match self
            .window
            .request_animation_frame(closure.as_ref().unchecked_ref())
        {
            Ok(id) => {
                self.pending.set(Some(id));
                Some(FrameToken(id as u64))
            }
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if self.pending.get() == Some(token.0 as i32) {
            self.pending.set(None);
        }
        let _ = self.window.cancel_animation_frame(token.0 as i32);
    }
}
