use super::waveform::Waveform;
use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};

/// Parameter block shared between the processing thread (writer) and the
/// audio callback (reader).
///
/// Frequency and volume are stored as `f32` bit patterns in `AtomicU32`s,
/// the waveform as its stable index. Relaxed ordering is enough: there is a
/// single writer, the fields are independent scalars, and the callback only
/// needs *some* recent value; staleness within one buffer is inaudible.
pub struct SharedParams {
    frequency_bits: AtomicU32,
    volume_bits: AtomicU32,
    waveform_index: AtomicU8,
}

impl SharedParams {
    pub fn new(frequency: f32, volume: f32, waveform: Waveform) -> Self {
        Self {
            frequency_bits: AtomicU32::new(frequency.to_bits()),
            volume_bits: AtomicU32::new(volume.to_bits()),
            waveform_index: AtomicU8::new(waveform.index()),
        }
    }

    pub fn frequency(&self) -> f32 {
        f32::from_bits(self.frequency_bits.load(Ordering::Relaxed))
    }

    pub fn set_frequency(&self, frequency: f32) {
        self.frequency_bits
            .store(frequency.to_bits(), Ordering::Relaxed);
    }

    pub fn volume(&self) -> f32 {
        f32::from_bits(self.volume_bits.load(Ordering::Relaxed))
    }

    pub fn set_volume(&self, volume: f32) {
        self.volume_bits.store(volume.to_bits(), Ordering::Relaxed);
    }

    pub fn waveform(&self) -> Waveform {
        Waveform::from_index(self.waveform_index.load(Ordering::Relaxed))
    }

    pub fn set_waveform(&self, waveform: Waveform) {
        self.waveform_index
            .store(waveform.index(), Ordering::Relaxed);
    }
}
