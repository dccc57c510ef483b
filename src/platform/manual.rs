//! Manually driven frame scheduler
//!
//! Time only moves when told to, and booked frames only fire when the host
//! pops them. Clones share state so a test can keep a handle while the effect
//! owns another.

use std::cell::RefCell;
use std::rc::Rc;

use super::{FrameScheduler, FrameToken};

#[derive(Debug, Default)]
struct ManualState {
    now: f64,
    next_id: u64,
    pending: Vec<FrameToken>,
    requests: u64,
    cancels: u64,
    refusing: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.inner.borrow().now
    }

    pub fn set_now(&self, ms: f64) {
        self.inner.borrow_mut().now = ms;
    }

    pub fn advance(&self, ms: f64) {
        self.inner.borrow_mut().now += ms;
    }

    /// Frames booked and not yet fired or cancelled
    pub fn pending(&self) -> Vec<FrameToken> {
        self.inner.borrow().pending.clone()
    }

    /// Fire the oldest booked frame, returning its token for `on_frame`
    pub fn fire(&self) -> Option<FrameToken> {
        let mut state = self.inner.borrow_mut();
        if state.pending.is_empty() {
            None
        } else {
            Some(state.pending.remove(0))
        }
    }

    /// While set, frame requests are refused like a host with no frames to give
    pub fn set_refusing(&self, refusing: bool) {
        self.inner.borrow_mut().refusing = refusing;
    }

    pub fn request_count(&self) -> u64 {
        self.inner.borrow().requests
    }

    pub fn cancel_count(&self) -> u64 {
        self.inner.borrow().cancels
    }
}

impl FrameScheduler for ManualScheduler {
    fn now_ms(&self) -> f64 {
        self.now()
    }

    fn request_frame(&mut self) -> Option<FrameToken> {
        let mut state = self.inner.borrow_mut();
        state.requests += 1;
        if state.refusing {
            return None;
        }
        state.next_id += 1;
        let token = FrameToken(state.next_id);
        state.pending.push(token);
        Some(token)
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        let mut state = self.inner.borrow_mut();
        state.pending.retain(|t| *t != token);
        state.cancels += 1;
    }
}
