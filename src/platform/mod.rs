//! Platform abstraction layer
//!
//! Handles browser/native differences for frame scheduling and time:
//! - `requestAnimationFrame` + `performance.now()` on the web
//! - a manually driven scheduler for headless runs and tests

pub mod manual;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use manual::ManualScheduler;
#[cfg(target_arch = "wasm32")]
pub use web::RafScheduler;

/// Identifies one requested frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

/// Host-side per-frame callback scheduler
///
/// The scheduler only books callbacks. When a booked frame comes due the host
/// hands its token back to the effect's `on_frame`.
pub trait FrameScheduler {
    /// Monotonic wall clock in milliseconds
    fn now_ms(&self) -> f64;

    /// Book one callback for the next frame, or `None` if the host refused
    fn request_frame(&mut self) -> Option<FrameToken>;

    /// Withdraw a booked callback. Unknown or already-fired tokens are ignored.
    fn cancel_frame(&mut self, token: FrameToken);
}
