//! Output device sink backed by cpal.

use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{
    SampleFormat, SampleRate, StreamConfig, SupportedStreamConfig, SupportedStreamConfigRange,
};

use super::{Mixer, PlaybackSink};
use crate::error::{AudioError, Result};
use crate::format::Format;
use crate::pcm::SampleBuffer;

/// Plays buffers on a system output device.
///
/// The device stream is opened once and runs until the sink is dropped.
/// Every `play` call adds a voice to the shared [`Mixer`]; the device
/// callback thread pulls mixed frames from it.
pub struct CpalSink {
    mixer: Arc<Mutex<Mixer>>,
    _stream: cpal::Stream,
}

impl CpalSink {
    /// Opens the named output device, falling back to the default device.
    pub fn open_device(name: Option<&str>, format: Format) -> Result<Self> {
        let host = cpal::default_host();

        let named = match name {
            Some(name) => host
                .output_devices()
                .map_err(AudioError::unavailable)?
                .find(|d| d.name().ok().as_deref() == Some(name)),
            None => None,
        };
        if let (Some(name), None) = (name, &named) {
            tracing::warn!("output device '{}' not found, using default", name);
        }

        let device = match named {
            Some(device) => device,
            None => host
                .default_output_device()
                .ok_or_else(|| AudioError::unavailable("no default output device"))?,
        };
        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());

        let config = pick_config(&device, format)?;
        let channels = config.channels as usize;
        let mixer = Arc::new(Mutex::new(Mixer::new(config.sample_rate.0)));

        let shared = Arc::clone(&mixer);
        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| match shared.lock() {
                    Ok(mut mixer) => mixer.fill(data, channels),
                    Err(_) => data.fill(0.0),
                },
                |err| tracing::warn!("audio output stream error: {}", err),
                None,
            )
            .map_err(AudioError::unavailable)?;
        stream.play().map_err(AudioError::unavailable)?;

        tracing::debug!(
            device = %device_name,
            sample_rate = config.sample_rate.0,
            channels = config.channels,
            "opened output device"
        );

        Ok(Self {
            mixer,
            _stream: stream,
        })
    }

    /// Lists the names of available output devices.
    pub fn list_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();
        let devices = host
            .output_devices()
            .map_err(AudioError::unavailable)?
            .filter_map(|d| d.name().ok())
            .collect();
        Ok(devices)
    }
}

impl PlaybackSink for CpalSink {
    fn play(&self, buffer: SampleBuffer) -> Result<()> {
        let mut mixer = self
            .mixer
            .lock()
            .map_err(|_| AudioError::unavailable("output mixer poisoned"))?;
        mixer.add(&buffer);
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.mixer.lock().map(|m| !m.is_idle()).unwrap_or(false)
    }
}

/// Picks an f32 stream config, preferring the payload's rate and channels.
///
/// Falls back to the device default when it is f32, then to any f32 range at
/// its highest rate; the mixer resamples to whatever rate is opened.
fn pick_config(device: &cpal::Device, format: Format) -> Result<StreamConfig> {
    let ranges: Vec<SupportedStreamConfigRange> = device
        .supported_output_configs()
        .map_err(AudioError::unavailable)?
        .collect();

    if let Some(config) = matching_range(&ranges, format) {
        return Ok(config.config());
    }

    let default = device
        .default_output_config()
        .map_err(AudioError::unavailable)?;
    if default.sample_format() == SampleFormat::F32 {
        return Ok(default.config());
    }

    match any_f32_range(&ranges, format) {
        Some(config) => Ok(config.config()),
        None => Err(AudioError::unavailable(format!(
            "no f32 output config (default is {:?})",
            default.sample_format()
        ))),
    }
}

/// An f32 range covering the payload rate, matching channels if possible.
fn matching_range(
    ranges: &[SupportedStreamConfigRange],
    format: Format,
) -> Option<SupportedStreamConfig> {
    let wanted = SampleRate(format.sample_rate);
    let covering: Vec<_> = ranges
        .iter()
        .filter(|c| c.sample_format() == SampleFormat::F32)
        .filter(|c| c.min_sample_rate() <= wanted && c.max_sample_rate() >= wanted)
        .collect();

    let exact = covering.iter().find(|c| c.channels() == format.channels);
    exact
        .or_else(|| covering.first())
        .map(|range| (*range).clone().with_sample_rate(wanted))
}

/// Any f32 range at its max rate, matching channels if possible.
fn any_f32_range(
    ranges: &[SupportedStreamConfigRange],
    format: Format,
) -> Option<SupportedStreamConfig> {
    let f32_ranges: Vec<_> = ranges
        .iter()
        .filter(|c| c.sample_format() == SampleFormat::F32)
        .collect();

    let exact = f32_ranges.iter().find(|c| c.channels() == format.channels);
    exact
        .or_else(|| f32_ranges.first())
        .map(|range| (*range).clone().with_max_sample_rate())
}
