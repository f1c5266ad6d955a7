use anyhow::anyhow;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use heart_core::{rms_level, SharedLevel};

// Speech-level RMS sits well below full scale.
const MIC_GAIN: f32 = 4.0;

/// Open the default input device and publish block loudness into `level`.
/// The returned stream must be kept alive.
pub fn start_microphone(level: SharedLevel) -> anyhow::Result<cpal::Stream> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| anyhow!("no input device"))?;
    let config = device.default_input_config()?;
    log::info!(
        "[audio] input {} @ {} Hz, {} ch",
        device.name().unwrap_or_else(|_| "unknown".into()),
        config.sample_rate().0,
        config.channels()
    );

    let err_fn = |err| log::error!("[audio] input stream error: {err}");

    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => build_stream_f32(&device, &config.into(), level, err_fn)?,
        cpal::SampleFormat::I16 => build_stream_i16(&device, &config.into(), level, err_fn)?,
        cpal::SampleFormat::U16 => build_stream_u16(&device, &config.into(), level, err_fn)?,
        other => return Err(anyhow!("unsupported sample format {other:?}")),
    };
    stream.play()?;
    Ok(stream)
}

fn build_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    level: SharedLevel,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    device.build_input_stream(
        config,
        move |data: &[f32], _| level.store(rms_level(data) * MIC_GAIN),
        err_fn,
        None,
    )
}

fn build_stream_i16(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    level: SharedLevel,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    let mut scratch: Vec<f32> = Vec::new();
    device.build_input_stream(
        config,
        move |data: &[i16], _| {
            scratch.clear();
            scratch.extend(data.iter().map(|s| *s as f32 / i16::MAX as f32));
            level.store(rms_level(&scratch) * MIC_GAIN);
        },
        err_fn,
        None,
    )
}

fn build_stream_u16(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    level: SharedLevel,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    let mut scratch: Vec<f32> = Vec::new();
    device.build_input_stream(
        config,
        move |data: &[u16], _| {
            scratch.clear();
            scratch.extend(data.iter().map(|s| (*s as f32 - 32768.0) / 32768.0));
            level.store(rms_level(&scratch) * MIC_GAIN);
        },
        err_fn,
        None,
    )
}
