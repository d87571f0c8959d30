use super::{HandFrame, HandPosition, HandTracker};
use anyhow::{anyhow, Context, Result};
use leaprs::{Connection, ConnectionConfig, Event, HandType};

// Interaction box over the device, in millimetres. Palm positions are mapped
// from this box into frame pixel coordinates.
const X_RANGE_MM: (f32, f32) = (-250.0, 250.0);
const Y_RANGE_MM: (f32, f32) = (100.0, 450.0);

const POLL_TIMEOUT_MS: u32 = 100;

/// Hand tracking from an Ultraleap controller via LeapC.
///
/// Requires the `leap` feature and the LeapC shared library installed.
pub struct LeapTracker {
    connection: Connection,
    frame_width: f32,
    frame_height: f32,
}

impl LeapTracker {
    pub fn connect(frame_width: u32, frame_height: u32) -> Result<Self> {
        let mut connection = Connection::create(ConnectionConfig::default())
            .map_err(|e| anyhow!("creating LeapC connection: {e:?}"))?;
        connection
            .open()
            .map_err(|e| anyhow!("opening Ultraleap device: {e:?}"))
            .context("is the tracking service running?")?;
        Ok(Self {
            connection,
            frame_width: frame_width as f32,
            frame_height: frame_height as f32,
        })
    }

    fn to_frame_coords(&self, x_mm: f32, y_mm: f32) -> HandPosition {
        let nx = ((x_mm - X_RANGE_MM.0) / (X_RANGE_MM.1 - X_RANGE_MM.0)).clamp(0.0, 1.0);
        let ny = ((y_mm - Y_RANGE_MM.0) / (Y_RANGE_MM.1 - Y_RANGE_MM.0)).clamp(0.0, 1.0);
        HandPosition {
            x: nx * self.frame_width,
            // Image coordinates grow downward; a raised hand means small y.
            y: (1.0 - ny) * self.frame_height,
        }
    }
}

impl HandTracker for LeapTracker {
    fn poll(&mut self) -> Result<HandFrame> {
        let msg = self
            .connection
            .poll(POLL_TIMEOUT_MS)
            .map_err(|e| anyhow!("polling LeapC: {e:?}"))?;

        let mut hands = HandFrame::default();
        if let Event::Tracking(frame) = msg.event() {
            for hand in frame.hands() {
                let palm = hand.palm().position();
                let position = self.to_frame_coords(palm.x, palm.y);
                match hand.hand_type() {
                    HandType::Left => hands.left = Some(position),
                    HandType::Right => hands.right = Some(position),
                }
            }
        }
        Ok(hands)
    }
}
