//! Hand tracking sources.
//!
//! The engine only sees [`HandTracker`]; whether positions come from real
//! Ultraleap hardware (`leap` feature) or the simulated motion source is
//! invisible to it.

mod sim;
pub use self::sim::SimTracker;

#[cfg(feature = "leap")]
mod leap;
#[cfg(feature = "leap")]
pub use self::leap::LeapTracker;

use anyhow::Result;

/// A detected hand's position in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPosition {
    pub x: f32,
    pub y: f32,
}

/// One tracking frame: at most one position per hand. A hand not detected
/// this frame is `None`; positions are never carried over.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HandFrame {
    pub left: Option<HandPosition>,
    pub right: Option<HandPosition>,
}

impl HandFrame {
    pub fn any_hand(&self) -> bool {
        self.left.is_some() || self.right.is_some()
    }
}

/// Anything that can deliver per-frame hand positions.
pub trait HandTracker: Send {
    /// Poll the next tracking frame. Errors are per-frame: the caller logs
    /// and skips, it does not tear the pipeline down.
    fn poll(&mut self) -> Result<HandFrame>;
}

/// Build the default tracker for this build's feature set.
#[cfg(feature = "leap")]
pub fn default_tracker(frame_width: u32, frame_height: u32) -> Result<Box<dyn HandTracker>> {
    Ok(Box::new(LeapTracker::connect(frame_width, frame_height)?))
}

#[cfg(not(feature = "leap"))]
pub fn default_tracker(frame_width: u32, frame_height: u32) -> Result<Box<dyn HandTracker>> {
    Ok(Box::new(SimTracker::new(frame_width, frame_height)))
}
