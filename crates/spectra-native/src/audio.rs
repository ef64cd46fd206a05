//! Frequency analysis of the live sample stream.
//!
//! The audio callback pushes mono samples into a [`SampleTap`]; once per
//! frame the renderer asks the [`SpectrumAnalyser`] for the byte spectrum
//! of the latest window. The analysis mirrors a browser analyser node:
//! Blackman window, magnitude FFT, exponential smoothing between frames,
//! decibel conversion and linear mapping of `[min_db, max_db]` onto bytes.

use crate::constants::{BLACKMAN_A0, BLACKMAN_A1, BLACKMAN_A2, FFT_SIZE, TAP_CAPACITY};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use spectra_core::{AnalyserSettings, AudioSource, GridParams};
use std::collections::VecDeque;
use std::f32::consts::PI;
use std::sync::{Arc, Mutex};

/// Shared ring of the most recent mono samples.
#[derive(Clone)]
pub struct SampleTap {
    samples: Arc<Mutex<VecDeque<f32>>>,
    capacity: usize,
}

impl SampleTap {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    /// Push interleaved frames, averaging the channels down to mono.
    pub fn push_interleaved(&self, data: &[f32], channels: usize) {
        let channels = channels.max(1);
        let Ok(mut ring) = self.samples.lock() else {
            return;
        };
        for frame in data.chunks(channels) {
            let mono = frame.iter().sum::<f32>() / frame.len() as f32;
            if ring.len() == self.capacity {
                ring.pop_front();
            }
            ring.push_back(mono);
        }
    }

    /// Copy the newest `out.len()` samples into `out`, zero-padding at the front.
    pub fn latest(&self, out: &mut [f32]) {
        out.fill(0.0);
        let Ok(ring) = self.samples.lock() else {
            return;
        };
        let n = ring.len().min(out.len());
        let dst = out.len() - n;
        for (slot, &s) in out[dst..].iter_mut().zip(ring.iter().skip(ring.len() - n)) {
            *slot = s;
        }
    }
}

/// Periodic Blackman window of length `size`.
pub fn blackman_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let x = 2.0 * PI * i as f32 / size as f32;
            BLACKMAN_A0 - BLACKMAN_A1 * x.cos() + BLACKMAN_A2 * (2.0 * x).cos()
        })
        .collect()
}

pub struct SpectrumAnalyser {
    tap: SampleTap,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    frame: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    bytes: Vec<u8>,
    settings: AnalyserSettings,
}

impl SpectrumAnalyser {
    pub fn new(tap: SampleTap) -> Self {
        Self::with_size(tap, FFT_SIZE)
    }

    pub fn with_size(tap: SampleTap, fft_size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        Self {
            tap,
            fft,
            window: blackman_window(fft_size),
            frame: vec![0.0; fft_size],
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
            smoothed: vec![0.0; fft_size / 2],
            bytes: vec![0; fft_size / 2],
            settings: GridParams::default().analyser_settings(),
        }
    }

    pub fn settings(&self) -> AnalyserSettings {
        self.settings
    }

    /// Analyse an explicit block; the newest `fft_size` samples are used.
    #[cfg(test)]
    pub fn process(&mut self, samples: &[f32]) -> &[u8] {
        self.frame.fill(0.0);
        let n = samples.len().min(self.frame.len());
        let dst = self.frame.len() - n;
        self.frame[dst..].copy_from_slice(&samples[samples.len() - n..]);
        self.transform();
        &self.bytes
    }

    fn transform(&mut self) {
        let size = self.frame.len();
        for ((c, &s), &w) in self.scratch.iter_mut().zip(&self.frame).zip(&self.window) {
            *c = Complex::new(s * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let tau = self.settings.smoothing;
        let min_db = self.settings.min_decibels;
        let range = self.settings.max_decibels - min_db;
        for (k, (smoothed, byte)) in self.smoothed.iter_mut().zip(&mut self.bytes).enumerate() {
            let magnitude = self.scratch[k].norm() / size as f32;
            *smoothed = tau * *smoothed + (1.0 - tau) * magnitude;
            let db = 20.0 * smoothed.log10();
            let scaled = 255.0 * (db - min_db) / range;
            // silence gives -inf, which clamps to 0
            *byte = scaled.clamp(0.0, 255.0) as u8;
        }
    }
}

impl AudioSource for SpectrumAnalyser {
    fn frequency_magnitudes(&mut self) -> &[u8] {
        self.tap.latest(&mut self.frame);
        self.transform();
        &self.bytes
    }

    fn set_smoothing(&mut self, smoothing: f32) {
        self.settings.smoothing = smoothing.clamp(0.0, 1.0);
    }

    fn set_decibel_range(&mut self, min_decibels: f32, max_decibels: f32) {
        if min_decibels >= max_decibels {
            log::warn!("ignoring empty decibel range {min_decibels}..{max_decibels}");
            return;
        }
        self.settings.min_decibels = min_decibels;
        self.settings.max_decibels = max_decibels;
    }
}

impl Default for SpectrumAnalyser {
    fn default() -> Self {
        Self::new(SampleTap::new(TAP_CAPACITY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(bin: usize, amplitude: f32) -> Vec<f32> {
        (0..FFT_SIZE)
            .map(|i| amplitude * (2.0 * PI * bin as f32 * i as f32 / FFT_SIZE as f32).sin())
            .collect()
    }

    #[test]
    fn blackman_window_shape() {
        let w = blackman_window(FFT_SIZE);
        assert!(w[0].abs() < 1e-6);
        assert!((w[FFT_SIZE / 2] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn silence_is_all_zero() {
        let mut analyser = SpectrumAnalyser::default();
        let bytes = analyser.process(&[0.0; FFT_SIZE]);
        assert_eq!(bytes.len(), FFT_SIZE / 2);
        assert!(bytes.iter().all(|&b| b == 0));
    }

    #[test]
    fn tone_peaks_at_its_bin() {
        let mut analyser = SpectrumAnalyser::default();
        let bytes = analyser.process(&tone(32, 1.0)).to_vec();
        assert_eq!(bytes[32], 255);
        assert_eq!(bytes[10], 0);
        assert_eq!(bytes[100], 0);
        let peak = bytes.iter().enumerate().max_by_key(|(_, b)| **b).unwrap().0;
        assert!((30..=34).contains(&peak));
    }

    #[test]
    fn smoothing_holds_then_decays() {
        let mut analyser = SpectrumAnalyser::default();
        analyser.process(&tone(32, 1.0));
        assert!(analyser.process(&[0.0; FFT_SIZE])[32] > 0);
        for _ in 0..40 {
            analyser.process(&[0.0; FFT_SIZE]);
        }
        assert_eq!(analyser.process(&[0.0; FFT_SIZE])[32], 0);
    }

    #[test]
    fn decibel_range_controls_scaling() {
        let mut analyser = SpectrumAnalyser::default();
        analyser.set_decibel_range(-100.0, 0.0);
        let b = analyser.process(&tone(32, 1.0))[32];
        assert!(b > 0 && b < 255, "byte {b}");

        analyser.set_decibel_range(-10.0, -20.0);
        assert_eq!(analyser.settings().max_decibels, 0.0);
    }

    #[test]
    fn apply_settings_forwards_everything() {
        let mut analyser = SpectrumAnalyser::default();
        analyser.apply_settings(AnalyserSettings {
            smoothing: 0.8,
            min_decibels: -90.0,
            max_decibels: -20.0,
        });
        assert_eq!(
            analyser.settings(),
            AnalyserSettings {
                smoothing: 0.8,
                min_decibels: -90.0,
                max_decibels: -20.0,
            }
        );
    }

    #[test]
    fn tap_keeps_newest_mono_samples() {
        let tap = SampleTap::new(4);
        tap.push_interleaved(&[1.0, 3.0, 2.0, 2.0, 5.0, 5.0], 2);
        let mut out = [9.0; 5];
        tap.latest(&mut out);
        assert_eq!(out, [0.0, 0.0, 2.0, 2.0, 5.0]);
        tap.push_interleaved(&[1.0, 1.0, 1.0], 1);
        let mut out = [0.0; 4];
        tap.latest(&mut out);
        assert_eq!(out, [5.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn analyser_reads_from_tap() {
        let tap = SampleTap::new(TAP_CAPACITY);
        let mut analyser = SpectrumAnalyser::new(tap.clone());
        tap.push_interleaved(&tone(16, 1.0), 1);
        let bytes = analyser.frequency_magnitudes();
        assert_eq!(bytes[16], 255);
    }
}
