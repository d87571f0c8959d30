//! Hand coordinate → audio parameter mapping.
//!
//! The vertical coordinate of each detected hand is normalized by frame
//! height and interpolated into the configured range for whatever that hand
//! is assigned to control. Volume is inverted so a raised hand is louder.

use crate::config::{HandControl, ThereminConfig};
use crate::tracking::{HandFrame, HandPosition};

/// Frequency emitted when no hand is assigned to or controlling it.
pub const DEFAULT_FREQUENCY: f32 = 440.0;

/// Mapped audio parameters for one tracking frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioParams {
    pub frequency: f32,
    pub volume: f32,
}

/// Normalize a vertical pixel coordinate to [0, 1] by frame height.
/// Coordinates outside the frame clamp to the nearest edge, so mapped
/// parameters never leave their configured range.
fn normalized_y(position: &HandPosition, frame_height: u32) -> f32 {
    (position.y / frame_height as f32).clamp(0.0, 1.0)
}

fn frequency_from(norm_y: f32, range: (f32, f32)) -> f32 {
    let (min, max) = range;
    min + (max - min) * norm_y
}

fn volume_from(norm_y: f32, range: (f32, f32)) -> f32 {
    // Inverted: hand at the top of the frame (y = 0) is loudest.
    let (min, max) = range;
    max - (max - min) * norm_y
}

/// Map the hands detected this frame to frequency and volume.
///
/// Each hand applies only to the parameter it is assigned to; with both
/// hands absent the volume is forced to zero regardless of frequency.
pub fn map_hands(config: &ThereminConfig, hands: &HandFrame) -> AudioParams {
    let mut frequency = DEFAULT_FREQUENCY;
    let mut volume = 0.0;

    let assignments = [
        (hands.left, config.left_hand_controls),
        (hands.right, config.right_hand_controls),
    ];
    for (hand, controls) in assignments {
        let Some(position) = hand else { continue };
        let norm_y = normalized_y(&position, config.frame_height);
        match controls {
            HandControl::Frequency => frequency = frequency_from(norm_y, config.frequency_range),
            HandControl::Volume => volume = volume_from(norm_y, config.volume_range),
        }
    }

    if !hands.any_hand() {
        volume = 0.0;
    }

    AudioParams { frequency, volume }
}
