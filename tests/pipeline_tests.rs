// End-to-end over the control path: tracked hands -> mapping -> shared
// parameter block -> oscillator output.

use rusttheremin::config::ThereminConfig;
use rusttheremin::mapping::{self, DEFAULT_FREQUENCY};
use rusttheremin::synth::{Oscillator, SharedParams, Waveform};
use rusttheremin::tracking::{HandFrame, HandPosition};
use std::f32::consts::TAU;

fn hands(left_y: Option<f32>, right_y: Option<f32>) -> HandFrame {
    HandFrame {
        left: left_y.map(|y| HandPosition { x: 160.0, y }),
        right: right_y.map(|y| HandPosition { x: 480.0, y }),
    }
}

#[test]
fn full_sweep_never_leaves_bounds() {
    let config = ThereminConfig::default();
    let params = SharedParams::new(DEFAULT_FREQUENCY, 0.0, config.wave_type);
    let mut oscillator = Oscillator::new(config.sample_rate as f32);
    let mut buffer = vec![0.0f32; config.buffer_size as usize];

    for step in 0..120 {
        // Drive both hands down the frame, past its edges.
        let y = -100.0 + step as f32 * 6.0;
        let mapped = mapping::map_hands(&config, &hands(Some(y), Some(y)));
        params.set_frequency(mapped.frequency);
        params.set_volume(mapped.volume);

        assert!(params.frequency() >= config.frequency_range.0);
        assert!(params.frequency() <= config.frequency_range.1);
        assert!(params.volume() >= config.volume_range.0);
        assert!(params.volume() <= config.volume_range.1);

        oscillator.fill(
            &mut buffer,
            params.waveform(),
            params.frequency(),
            params.volume(),
            config.clip_level,
        );
        assert!(buffer.iter().all(|s| s.abs() <= config.clip_level));
    }
}

#[test]
fn hands_leaving_frame_cut_volume() {
    let config = ThereminConfig::default();
    let mapped = mapping::map_hands(&config, &hands(Some(100.0), Some(200.0)));
    assert!(mapped.volume > 0.0);

    let mapped = mapping::map_hands(&config, &hands(None, None));
    assert_eq!(mapped.volume, 0.0);

    // Frequency hand alone: still silent, but frequency tracks the hand.
    let mapped = mapping::map_hands(&config, &hands(None, Some(200.0)));
    assert_eq!(mapped.volume, 0.0);
    assert!(mapped.frequency > config.frequency_range.0);
}

#[test]
fn frequency_change_through_params_stays_continuous() {
    let config = ThereminConfig::default();
    let sample_rate = config.sample_rate as f32;
    let params = SharedParams::new(300.0, 1.0, Waveform::Sine);
    let mut oscillator = Oscillator::new(sample_rate);

    let mut joined = Vec::new();
    let frequencies = [300.0, 450.0, 950.0, 210.0, 999.0];
    for frequency in frequencies {
        params.set_frequency(frequency);
        let mut buffer = vec![0.0f32; config.buffer_size as usize];
        oscillator.fill(
            &mut buffer,
            params.waveform(),
            params.frequency(),
            params.volume(),
            config.clip_level,
        );
        joined.extend(buffer);
    }

    let f_max = frequencies.iter().cloned().fold(0.0f32, f32::max);
    let bound = TAU * f_max / sample_rate + 1e-4;
    for pair in joined.windows(2) {
        assert!(
            (pair[1] - pair[0]).abs() <= bound,
            "jump {} -> {} exceeds bound {}",
            pair[0],
            pair[1],
            bound
        );
    }
}

#[test]
fn waveform_switch_applies_on_next_buffer() {
    let config = ThereminConfig::default();
    let params = SharedParams::new(440.0, 1.0, Waveform::Sine);
    let mut oscillator = Oscillator::new(config.sample_rate as f32);
    let mut buffer = vec![0.0f32; config.buffer_size as usize];

    oscillator.fill(&mut buffer, params.waveform(), 440.0, 1.0, config.clip_level);
    // A sine buffer passes through intermediate values.
    assert!(buffer.iter().any(|s| s.abs() < 0.5));

    params.set_waveform(Waveform::Square);
    oscillator.fill(&mut buffer, params.waveform(), 440.0, 1.0, config.clip_level);
    // A full-volume square saturates at the clip level from the first sample.
    assert!(buffer
        .iter()
        .all(|s| (s.abs() - config.clip_level).abs() < 1e-6));
}
