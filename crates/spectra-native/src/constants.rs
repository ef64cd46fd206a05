// Host-side tuning: audio analysis, input and presentation

// Analyser frame length; yields FFT_SIZE / 2 frequency bins
pub const FFT_SIZE: usize = 256;
// Mono samples kept for analysis (several frames of history)
pub const TAP_CAPACITY: usize = FFT_SIZE * 8;

// Blackman window coefficients
pub const BLACKMAN_A0: f32 = 0.42;
pub const BLACKMAN_A1: f32 = 0.5;
pub const BLACKMAN_A2: f32 = 0.08;

// Two presses closer than this are a double click
pub const DOUBLE_CLICK_SEC: f32 = 0.3;
// Pixels per wheel "line" for devices reporting line deltas
pub const WHEEL_LINE_PX: f32 = 40.0;

// Longest frame step fed to the animation (keeps springs stable after stalls)
pub const MAX_FRAME_DT_SEC: f32 = 0.1;

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

pub const WINDOW_TITLE: &str = "Spectra";
