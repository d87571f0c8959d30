//! Preview frames for the REST surface.
//!
//! There is no camera image in the delegated tracking backends, so the
//! `/api/frame` endpoint serves a rendered overlay of the current hand
//! positions: a dark frame with one marker per detected hand, JPEG-encoded
//! and wrapped in base64.

use crate::tracking::{HandFrame, HandPosition};
use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use std::io::Cursor;

const JPEG_QUALITY: u8 = 70;
const BACKGROUND: Rgb<u8> = Rgb([18, 18, 24]);
const LEFT_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const RIGHT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const MARKER_RADIUS: i32 = 6;

pub struct SnapshotRenderer {
    width: u32,
    height: u32,
    source_width: f32,
    source_height: f32,
}

impl SnapshotRenderer {
    /// `width`/`height` are the preview dimensions; `source_*` the tracking
    /// frame dimensions positions are expressed in.
    pub fn new(width: u32, height: u32, source_width: u32, source_height: u32) -> Self {
        Self {
            width,
            height,
            source_width: source_width as f32,
            source_height: source_height as f32,
        }
    }

    /// Render the current hand positions and return the frame as base64 JPEG.
    pub fn render(&self, hands: &HandFrame) -> Result<String> {
        let mut image = RgbImage::from_pixel(self.width, self.height, BACKGROUND);

        if let Some(position) = &hands.left {
            self.draw_marker(&mut image, position, LEFT_COLOR);
        }
        if let Some(position) = &hands.right {
            self.draw_marker(&mut image, position, RIGHT_COLOR);
        }

        let mut jpeg = Cursor::new(Vec::new());
        JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
            .encode_image(&image)
            .context("encoding preview frame")?;

        Ok(BASE64.encode(jpeg.into_inner()))
    }

    fn draw_marker(&self, image: &mut RgbImage, position: &HandPosition, color: Rgb<u8>) {
        let cx = (position.x / self.source_width * self.width as f32) as i32;
        let cy = (position.y / self.source_height * self.height as f32) as i32;

        for dy in -MARKER_RADIUS..=MARKER_RADIUS {
            for dx in -MARKER_RADIUS..=MARKER_RADIUS {
                if dx * dx + dy * dy > MARKER_RADIUS * MARKER_RADIUS {
                    continue;
                }
                let (x, y) = (cx + dx, cy + dy);
                if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
                    image.put_pixel(x as u32, y as u32, color);
                }
            }
        }
    }
}
