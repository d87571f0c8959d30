use crate::synth::Waveform;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What a hand is assigned to control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandControl {
    Frequency,
    Volume,
}

/// Run configuration. Loaded once at startup and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThereminConfig {
    // Tracking frame
    pub frame_width: u32,
    pub frame_height: u32,

    // Audio
    pub sample_rate: u32,
    pub buffer_size: u32,
    pub frequency_range: (f32, f32),
    pub volume_range: (f32, f32),
    /// Hard-clip bound applied to every output sample.
    pub clip_level: f32,

    // Control
    pub wave_type: Waveform,
    /// Rate constant reserved for parameter damping; read but not applied.
    pub smooth_factor: f32,
    pub left_hand_controls: HandControl,
    pub right_hand_controls: HandControl,

    // Processing loop
    pub poll_interval_ms: u64,

    // Preview snapshot served over the API
    pub preview_width: u32,
    pub preview_height: u32,

    // HTTP
    pub listen_addr: String,
}

impl Default for ThereminConfig {
    fn default() -> Self {
        Self {
            frame_width: 640,
            frame_height: 480,
            sample_rate: 44100,
            buffer_size: 256,
            frequency_range: (200.0, 1000.0),
            volume_range: (0.0, 1.0),
            clip_level: 0.9,
            wave_type: Waveform::Sine,
            smooth_factor: 0.1,
            left_hand_controls: HandControl::Volume,
            right_hand_controls: HandControl::Frequency,
            poll_interval_ms: 10,
            preview_width: 320,
            preview_height: 240,
            listen_addr: "127.0.0.1:5000".to_string(),
        }
    }
}

impl ThereminConfig {
    /// Load from a JSON file, falling back to defaults when the file does
    /// not exist. A file that exists but fails to parse is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)
            .with_context(|| format!("writing config {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_width == 0 || self.frame_height == 0 {
            bail!("frame dimensions must be non-zero");
        }
        if self.sample_rate == 0 {
            bail!("sample rate must be non-zero");
        }
        if self.buffer_size == 0 {
            bail!("buffer size must be non-zero");
        }
        if self.poll_interval_ms == 0 {
            bail!("poll interval must be non-zero");
        }
        let (f_min, f_max) = self.frequency_range;
        if !(f_min > 0.0 && f_min <= f_max) {
            bail!("frequency range must satisfy 0 < min <= max, got ({f_min}, {f_max})");
        }
        // The oscillator's phase wrap assumes the per-sample increment stays
        // under one cycle, and anything at or above Nyquist aliases anyway.
        if f_max >= self.sample_rate as f32 / 2.0 {
            bail!(
                "frequency range max {f_max} must stay below half the sample rate ({})",
                self.sample_rate
            );
        }
        let (v_min, v_max) = self.volume_range;
        if !(0.0..=1.0).contains(&v_min) || !(0.0..=1.0).contains(&v_max) || v_min > v_max {
            bail!("volume range must satisfy 0 <= min <= max <= 1, got ({v_min}, {v_max})");
        }
        if !(0.0..=1.0).contains(&self.clip_level) {
            bail!("clip level must be within [0, 1], got {}", self.clip_level);
        }
        Ok(())
    }
}
