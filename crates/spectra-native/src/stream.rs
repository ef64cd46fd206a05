// ---------------- Native audio streams (cpal) ----------------
//
// Either the default input device is captured, or a WAV file is played on
// the default output device. Both feed the same mono SampleTap.

use crate::audio::SampleTap;
use anyhow::{anyhow, Context};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use std::path::Path;

fn err_fn(err: cpal::StreamError) {
    log::error!("audio stream error: {err}");
}

/// Capture the default input device into `tap`.
pub fn start_capture(tap: SampleTap) -> anyhow::Result<cpal::Stream> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| anyhow!("no audio input device"))?;
    let config = device
        .default_input_config()
        .context("querying input config")?;
    log::info!(
        "capturing from {} ({} Hz, {} ch)",
        device.name().unwrap_or_else(|_| "unknown device".into()),
        config.sample_rate().0,
        config.channels()
    );
    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => build_capture::<f32>(&device, &config.into(), tap)?,
        cpal::SampleFormat::I16 => build_capture::<i16>(&device, &config.into(), tap)?,
        cpal::SampleFormat::U16 => build_capture::<u16>(&device, &config.into(), tap)?,
        other => return Err(anyhow!("unsupported input sample format {other:?}")),
    };
    stream.play()?;
    Ok(stream)
}

fn build_capture<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    tap: SampleTap,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = config.channels as usize;
    let mut converted: Vec<f32> = Vec::new();
    device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            converted.clear();
            converted.extend(data.iter().map(|&s| f32::from_sample(s)));
            tap.push_interleaved(&converted, channels);
        },
        err_fn,
        None,
    )
}

/// Decoded WAV contents, interleaved and normalized to `[-1, 1]`.
pub struct Clip {
    pub samples: Vec<f32>,
    pub channels: usize,
    pub sample_rate: u32,
}

impl Clip {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let mut reader =
            hound::WavReader::open(path).with_context(|| format!("opening {}", path.display()))?;
        let spec = reader.spec();
        let samples = match spec.sample_format {
            hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(Self {
            samples,
            channels: spec.channels.max(1) as usize,
            sample_rate: spec.sample_rate,
        })
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels
    }

    /// Mono-preserving channel lookup: extra output channels repeat the last source channel.
    fn sample(&self, frame: usize, channel: usize) -> f32 {
        let c = channel.min(self.channels - 1);
        self.samples
            .get(frame * self.channels + c)
            .copied()
            .unwrap_or(0.0)
    }
}

/// Play-head over a clip at the output device's rate (nearest-sample resampling).
pub struct Playback {
    clip: Clip,
    position: f64,
    step: f64,
}

impl Playback {
    pub fn new(clip: Clip, output_rate: u32) -> Self {
        let step = clip.sample_rate as f64 / output_rate.max(1) as f64;
        Self {
            clip,
            position: 0.0,
            step,
        }
    }

    pub fn finished(&self) -> bool {
        self.position as usize >= self.clip.frames()
    }

    /// Fill one interleaved output block; the mono mix of what was written goes to `tap`.
    pub fn fill(&mut self, out: &mut [f32], channels: usize, mono: &mut Vec<f32>) {
        let channels = channels.max(1);
        mono.clear();
        for frame in out.chunks_mut(channels) {
            let src = self.position as usize;
            let mut sum = 0.0;
            for (c, slot) in frame.iter_mut().enumerate() {
                let v = if src < self.clip.frames() {
                    self.clip.sample(src, c)
                } else {
                    0.0
                };
                *slot = v;
                sum += v;
            }
            mono.push(sum / frame.len() as f32);
            self.position += self.step;
        }
    }
}

/// Play `path` on the default output device, tapping what is heard.
pub fn start_playback(path: &Path, tap: SampleTap) -> anyhow::Result<cpal::Stream> {
    let clip = Clip::open(path)?;
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow!("no audio output device"))?;
    let config = device
        .default_output_config()
        .context("querying output config")?;
    if config.sample_rate().0 != clip.sample_rate {
        log::warn!(
            "{} is {} Hz, output runs at {} Hz; resampling",
            path.display(),
            clip.sample_rate,
            config.sample_rate().0
        );
    }
    log::info!(
        "playing {} ({:.1} s)",
        path.display(),
        clip.frames() as f32 / clip.sample_rate.max(1) as f32
    );
    let playback = Playback::new(clip, config.sample_rate().0);
    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => build_playback::<f32>(&device, &config.into(), playback, tap)?,
        cpal::SampleFormat::I16 => build_playback::<i16>(&device, &config.into(), playback, tap)?,
        cpal::SampleFormat::U16 => build_playback::<u16>(&device, &config.into(), playback, tap)?,
        other => return Err(anyhow!("unsupported output sample format {other:?}")),
    };
    stream.play()?;
    Ok(stream)
}

fn build_playback<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut playback: Playback,
    tap: SampleTap,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let mut block: Vec<f32> = Vec::new();
    let mut mono: Vec<f32> = Vec::new();
    let mut reported_end = false;
    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            block.resize(data.len(), 0.0);
            playback.fill(&mut block, channels, &mut mono);
            for (dst, &v) in data.iter_mut().zip(&block) {
                *dst = T::from_sample(v);
            }
            tap.push_interleaved(&mono, 1);
            if playback.finished() && !reported_end {
                reported_end = true;
                log::info!("playback finished");
            }
        },
        err_fn,
        None,
    )
}
