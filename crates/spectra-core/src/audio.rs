//! Contract for the audio collaborator that feeds the visualizer.

use crate::params::AnalyserSettings;

/// Anything that can hand out a byte frequency spectrum once per frame.
///
/// The returned buffer holds `fft_size / 2` magnitudes in `0..=255` and is
/// only valid until the next call.
pub trait AudioSource {
    fn frequency_magnitudes(&mut self) -> &[u8];
    fn set_smoothing(&mut self, smoothing: f32);
    fn set_decibel_range(&mut self, min_decibels: f32, max_decibels: f32);

    fn apply_settings(&mut self, settings: AnalyserSettings) {
        self.set_smoothing(settings.smoothing);
        self.set_decibel_range(settings.min_decibels, settings.max_decibels);
    }
}
