pub mod api;
pub mod audio;
pub mod config;
pub mod engine;
pub mod mapping;
pub mod snapshot;
pub mod synth;
pub mod tracking;

pub use crate::config::ThereminConfig;
pub use crate::engine::{Theremin, ThereminStatus};
pub use crate::synth::Waveform;
