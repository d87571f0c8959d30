use crate::audio::AudioBackend;
use crate::config::ThereminConfig;
use crate::synth::{Oscillator, SharedParams};
use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream};
use std::sync::Arc;
use tracing::{error, info};

/// Pull-style cpal output stream.
///
/// The stream callback owns the oscillator (and with it the phase
/// accumulator); each invocation reads the shared parameter block and fills
/// one buffer. The stream is built lazily on the first `start` so that
/// constructing the backend cannot touch the device.
pub struct CpalBackend {
    params: Arc<SharedParams>,
    sample_rate: u32,
    buffer_size: u32,
    clip_level: f32,
    stream: Option<Stream>,
}

impl CpalBackend {
    pub fn new(params: Arc<SharedParams>, config: &ThereminConfig) -> Self {
        Self {
            params,
            sample_rate: config.sample_rate,
            buffer_size: config.buffer_size,
            clip_level: config.clip_level,
            stream: None,
        }
    }

    fn build_stream(&self) -> Result<Stream> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("no audio output device available"))?;
        info!(device = %device.name().unwrap_or_default(), "selected output device");

        let supported_config = device
            .default_output_config()
            .context("querying default output config")?;
        if supported_config.sample_format() != SampleFormat::F32 {
            return Err(anyhow!(
                "unsupported sample format: {:?}",
                supported_config.sample_format()
            ));
        }

        let mut stream_config: cpal::StreamConfig = supported_config.into();
        stream_config.sample_rate = cpal::SampleRate(self.sample_rate);
        stream_config.buffer_size = cpal::BufferSize::Fixed(self.buffer_size);

        let channels = stream_config.channels as usize;
        let params = Arc::clone(&self.params);
        let clip_level = self.clip_level;
        let mut oscillator = Oscillator::new(self.sample_rate as f32);
        let mut scratch: Vec<f32> = Vec::new();

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let frames = data.len() / channels;
                    scratch.resize(frames, 0.0);
                    oscillator.fill(
                        &mut scratch,
                        params.waveform(),
                        params.frequency(),
                        params.volume(),
                        clip_level,
                    );
                    for (frame, sample) in data.chunks_mut(channels).zip(scratch.iter()) {
                        frame.fill(*sample);
                    }
                },
                |err| error!(%err, "audio stream error"),
                None,
            )
            .context("building output stream")?;

        Ok(stream)
    }
}

impl AudioBackend for CpalBackend {
    fn start(&mut self) -> Result<()> {
        if self.stream.is_none() {
            self.stream = Some(self.build_stream()?);
        }
        if let Some(stream) = &self.stream {
            stream.play().context("starting audio stream")?;
        }
        info!("audio started");
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(stream) = &self.stream {
            stream.pause().context("pausing audio stream")?;
            info!("audio stopped");
        }
        Ok(())
    }
}
