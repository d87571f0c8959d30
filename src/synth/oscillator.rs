use super::waveform::Waveform;
use std::f32::consts::TAU;

/// Volumes below this generate pure silence instead of a scaled waveform.
pub const SILENCE_THRESHOLD: f32 = 0.01;

/// Phase-continuous waveform generator.
///
/// The phase accumulator advances by `2π·f / sample_rate` per sample and
/// wraps modulo 2π, so consecutive buffers join without a discontinuity even
/// when frequency changes between buffers: a frequency change only alters
/// the increment, never the current phase.
pub struct Oscillator {
    sample_rate: f32,
    phase: f32,
}

impl Oscillator {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            phase: 0.0,
        }
    }

    /// Fill `output` with `waveform` at `frequency`, scaled by `volume` and
    /// hard-clipped to `±clip_level`.
    ///
    /// A volume under [`SILENCE_THRESHOLD`] writes zeros and leaves the
    /// phase untouched, so sound resumes where it left off.
    pub fn fill(
        &mut self,
        output: &mut [f32],
        waveform: Waveform,
        frequency: f32,
        volume: f32,
        clip_level: f32,
    ) {
        if volume < SILENCE_THRESHOLD || frequency <= 0.0 {
            output.fill(0.0);
            return;
        }

        let phase_increment = TAU * frequency / self.sample_rate;

        for sample in output.iter_mut() {
            let raw = waveform.evaluate(self.phase);
            *sample = (raw * volume).clamp(-clip_level, clip_level);

            self.phase += phase_increment;
            if self.phase >= TAU {
                self.phase -= TAU;
            }
        }
    }

    /// Current phase in radians, in [0, 2π). Exposed for diagnostics.
    pub fn phase(&self) -> f32 {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44100.0;

    fn filled(osc: &mut Oscillator, waveform: Waveform, frequency: f32, volume: f32) -> Vec<f32> {
        let mut buffer = vec![0.0; 256];
        osc.fill(&mut buffer, waveform, frequency, volume, 0.9);
        buffer
    }

    #[test]
    fn sine_joins_across_buffer_boundary() {
        let mut osc = Oscillator::new(SAMPLE_RATE);
        let a = filled(&mut osc, Waveform::Sine, 440.0, 1.0);
        let b = filled(&mut osc, Waveform::Sine, 440.0, 1.0);

        // Max per-sample step of a 440 Hz sine is bounded by its derivative.
        let bound = TAU * 440.0 / SAMPLE_RATE + 1e-4;
        let joined: Vec<f32> = a.iter().chain(b.iter()).copied().collect();
        for pair in joined.windows(2) {
            assert!((pair[1] - pair[0]).abs() <= bound);
        }
    }

    #[test]
    fn sine_joins_across_frequency_change() {
        let mut osc = Oscillator::new(SAMPLE_RATE);
        let a = filled(&mut osc, Waveform::Sine, 300.0, 1.0);
        let b = filled(&mut osc, Waveform::Sine, 900.0, 1.0);

        let bound = TAU * 900.0 / SAMPLE_RATE + 1e-4;
        let joined: Vec<f32> = a.iter().chain(b.iter()).copied().collect();
        for pair in joined.windows(2) {
            assert!(
                (pair[1] - pair[0]).abs() <= bound,
                "discontinuity at frequency change: {} -> {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn output_respects_clip_level() {
        for waveform in Waveform::ALL {
            let mut osc = Oscillator::new(SAMPLE_RATE);
            let buffer = filled(&mut osc, waveform, 440.0, 1.0);
            assert!(buffer.iter().all(|s| s.abs() <= 0.9), "{waveform} clipped past 0.9");
        }
    }

    #[test]
    fn waveform_switch_takes_effect_next_buffer() {
        let mut osc = Oscillator::new(SAMPLE_RATE);
        let _ = filled(&mut osc, Waveform::Sine, 440.0, 1.0);
        let square = filled(&mut osc, Waveform::Square, 440.0, 1.0);

        // A full-volume square hard-clips to exactly ±clip_level everywhere.
        assert!(square.iter().all(|s| (s.abs() - 0.9).abs() < 1e-6));
    }

    #[test]
    fn silence_below_threshold_and_phase_held() {
        let mut osc = Oscillator::new(SAMPLE_RATE);
        let _ = filled(&mut osc, Waveform::Sine, 440.0, 1.0);
        let phase_before = osc.phase();

        let quiet = filled(&mut osc, Waveform::Sine, 440.0, 0.005);
        assert!(quiet.iter().all(|s| *s == 0.0));
        assert_eq!(osc.phase(), phase_before);
    }

    #[test]
    fn phase_stays_wrapped() {
        let mut osc = Oscillator::new(SAMPLE_RATE);
        for _ in 0..200 {
            let _ = filled(&mut osc, Waveform::Sine, 997.0, 1.0);
        }
        assert!(osc.phase() >= 0.0 && osc.phase() < TAU);
    }
}
