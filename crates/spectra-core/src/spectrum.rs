//! Frequency buffer → perceptually weighted, polar-redistributed 2D field.
//!
//! The mapper runs once per frame on the analyser's byte spectrum:
//!
//! 1. every bin is averaged with its ±2 neighbours (clamped at the edges),
//! 2. the average is normalized and pushed through a two-regime response
//!    curve (linear gain near silence, fourth root above it),
//! 3. the result is scaled by the band weight of the bin's position and
//!    clamped to the byte range,
//! 4. the 1D buffer is wrapped into a square field with a polar remap so
//!    the grid shader sees angular continuity instead of row banding.

use crate::constants::*;
use std::f32::consts::PI;

/// Per-band gain applied after the response curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandWeights {
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
}

impl Default for BandWeights {
    fn default() -> Self {
        Self {
            bass: 1.4,
            mid: 1.2,
            high: 1.1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Band {
    Bass,
    Mid,
    High,
}

/// Band a bin belongs to, by its position fraction `index / (len - 1)`.
pub fn band_of(index: usize, len: usize) -> Band {
    let p = position_fraction(index, len);
    if p < BASS_EDGE {
        Band::Bass
    } else if p > HIGH_EDGE {
        Band::High
    } else {
        Band::Mid
    }
}

/// Effective weight for a bin, including the sub-bass and presence accents.
pub fn band_weight(index: usize, len: usize, weights: BandWeights) -> f32 {
    let p = position_fraction(index, len);
    match band_of(index, len) {
        Band::Bass if p < SUB_BASS_EDGE => weights.bass * SUB_BASS_BOOST,
        Band::Bass => weights.bass,
        Band::High if p > PRESENCE_EDGE => weights.high * PRESENCE_BOOST,
        Band::High => weights.high,
        Band::Mid => weights.mid,
    }
}

#[inline]
fn position_fraction(index: usize, len: usize) -> f32 {
    index as f32 / len.saturating_sub(1).max(1) as f32
}

/// Two-regime response: boost detail near silence, compress everything else.
#[inline]
pub fn response_curve(normalized: f32, response_intensity: f32) -> f32 {
    if normalized < QUIET_THRESHOLD {
        normalized * response_intensity
    } else {
        normalized.powf(RESPONSE_EXPONENT)
    }
}

/// Average each bin over its ±2 neighbourhood, dividing by the bins present.
pub fn neighbourhood_average(buffer: &[u8], out: &mut Vec<f32>) {
    out.clear();
    let n = buffer.len();
    out.extend((0..n).map(|i| {
        let lo = i.saturating_sub(NEIGHBOURHOOD_RADIUS);
        let hi = (i + NEIGHBOURHOOD_RADIUS).min(n - 1);
        let sum: u32 = buffer[lo..=hi].iter().map(|&v| v as u32).sum();
        sum as f32 / (hi - lo + 1) as f32
    }));
}

/// Side length of the square field for a buffer of `len` bins.
pub fn field_side(len: usize) -> usize {
    (len as f64).sqrt().ceil() as usize
}

/// Source bin for every field cell, row-major, for a buffer of `len` bins.
pub fn polar_remap_table(len: usize) -> Vec<usize> {
    let side = field_side(len);
    let mut table = Vec::with_capacity(side * side);
    if len == 0 {
        return table;
    }
    let center = side as f32 / 2.0;
    for y in 0..side {
        for x in 0..side {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let angle = dy.atan2(dx);
            let radius = (dx * dx + dy * dy).sqrt();
            let pos = ((angle + PI) / (2.0 * PI)) * len as f32 + radius;
            table.push(pos.floor() as usize % len);
        }
    }
    table
}

/// Bass intensity: mean normalized amplitude of the lowest decile of bins.
pub fn bass_intensity(buffer: &[u8]) -> f32 {
    if buffer.is_empty() {
        return 0.0;
    }
    let count = ((buffer.len() as f32 * BASS_DECILE).floor() as usize).clamp(1, buffer.len());
    let sum: u32 = buffer[..count].iter().map(|&v| v as u32).sum();
    sum as f32 / (count as f32 * 255.0)
}

/// Square scalar field sampled by the grid shader, values in \[0, 1\].
#[derive(Clone, Debug, Default)]
pub struct FrequencyField {
    side: usize,
    values: Vec<f32>,
}

impl FrequencyField {
    pub fn side(&self) -> usize {
        self.side
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.values[y * self.side + x]
    }

    /// Byte texels for an `R8Unorm` upload, reusing `out`.
    pub fn write_texels(&self, out: &mut Vec<u8>) {
        out.clear();
        out.extend(
            self.values
                .iter()
                .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8),
        );
    }
}

/// Per-frame mapper; owns reusable scratch so steady-state frames do not allocate.
#[derive(Debug, Default)]
pub struct SpectrumMapper {
    averaged: Vec<f32>,
    weighted: Vec<f32>,
    remap: Vec<usize>,
    remap_len: usize,
    field: FrequencyField,
}

impl SpectrumMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the field from this frame's buffer.
    pub fn map(
        &mut self,
        buffer: &[u8],
        weights: BandWeights,
        response_intensity: f32,
    ) -> &FrequencyField {
        let n = buffer.len();
        if self.remap_len != n {
            self.remap = polar_remap_table(n);
            self.remap_len = n;
            self.field.side = field_side(n);
            log::debug!("spectrum remap rebuilt for {n} bins (side {})", self.field.side);
        }

        neighbourhood_average(buffer, &mut self.averaged);
        self.weighted.clear();
        self.weighted
            .extend(self.averaged.iter().enumerate().map(|(i, &avg)| {
                let response = response_curve(avg / 255.0, response_intensity);
                (response * 255.0 * band_weight(i, n, weights)).clamp(0.0, 255.0)
            }));

        self.field.values.clear();
        let weighted = &self.weighted;
        self.field
            .values
            .extend(self.remap.iter().map(|&src| weighted[src] / 255.0));
        &self.field
    }

    /// Weighted 1D buffer from the last `map` call, in the byte range.
    pub fn weighted(&self) -> &[f32] {
        &self.weighted
    }

    pub fn field(&self) -> &FrequencyField {
        &self.field
    }

    pub fn remap(&self) -> &[usize] {
        &self.remap
    }
}
