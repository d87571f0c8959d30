use super::{HandFrame, HandPosition, HandTracker};
use anyhow::Result;
use std::time::Instant;

/// Simulated hand motion, no hardware needed.
///
/// Both hands sweep the frame vertically on slow, incommensurate periods,
/// and each hand periodically leaves the frame so consumers exercise the
/// not-detected path too.
pub struct SimTracker {
    frame_width: f32,
    frame_height: f32,
    started: Instant,
}

// Sweep periods in seconds. Chosen so the two hands drift against each other.
const LEFT_PERIOD: f32 = 7.0;
const RIGHT_PERIOD: f32 = 5.0;
// Each hand disappears for one second out of every eight.
const PRESENCE_PERIOD: f32 = 8.0;

impl SimTracker {
    pub fn new(frame_width: u32, frame_height: u32) -> Self {
        Self {
            frame_width: frame_width as f32,
            frame_height: frame_height as f32,
            started: Instant::now(),
        }
    }

    fn sweep(&self, t: f32, period: f32) -> f32 {
        // 0..1 vertical position, smooth sinusoid.
        0.5 + 0.5 * (std::f32::consts::TAU * t / period).sin()
    }

    fn present(&self, t: f32, offset: f32) -> bool {
        (t + offset) % PRESENCE_PERIOD >= 1.0
    }
}

impl HandTracker for SimTracker {
    fn poll(&mut self) -> Result<HandFrame> {
        let t = self.started.elapsed().as_secs_f32();

        let left = self.present(t, 0.0).then(|| HandPosition {
            x: self.frame_width * 0.25,
            y: self.frame_height * self.sweep(t, LEFT_PERIOD),
        });
        let right = self.present(t, PRESENCE_PERIOD / 2.0).then(|| HandPosition {
            x: self.frame_width * 0.75,
            y: self.frame_height * self.sweep(t, RIGHT_PERIOD),
        });

        Ok(HandFrame { left, right })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_stay_inside_frame() {
        let mut tracker = SimTracker::new(640, 480);
        for _ in 0..100 {
            let frame = tracker.poll().unwrap();
            for hand in [frame.left, frame.right].into_iter().flatten() {
                assert!(hand.x >= 0.0 && hand.x <= 640.0);
                assert!(hand.y >= 0.0 && hand.y <= 480.0);
            }
        }
    }
}
