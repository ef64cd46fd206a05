// Shared visual tuning constants used by the engine and the native frontend.

// Spectrum mapping
pub const NEIGHBOURHOOD_RADIUS: usize = 2; // bins averaged on each side of a bin
pub const BASS_EDGE: f32 = 1.0 / 3.0; // position fraction below which a bin is bass
pub const HIGH_EDGE: f32 = 2.0 / 3.0; // position fraction above which a bin is high
pub const SUB_BASS_EDGE: f32 = 0.1;
pub const PRESENCE_EDGE: f32 = 0.9;
pub const SUB_BASS_BOOST: f32 = 1.3;
pub const PRESENCE_BOOST: f32 = 1.2;
pub const QUIET_THRESHOLD: f32 = 0.1; // below this the response is linear
pub const RESPONSE_EXPONENT: f32 = 0.25;
pub const BASS_DECILE: f32 = 0.1; // share of lowest bins feeding the particle pulse

// Grid animation
pub const BASE_GRID_SIZE: f32 = 4.0;
pub const LINE_SEGMENTS: usize = 100;
pub const LINE_DAMPENING: f32 = 0.75;
pub const LINE_STIFFNESS: f32 = 0.1;
pub const RETARGET_PERIOD_SEC: f32 = 5.0;
pub const RETARGET_STAGGER_SEC: f32 = 0.01; // per line index
pub const RETARGET_JITTER: f32 = 0.35; // fraction of the line spacing
pub const GRID_TILT_RADIANS: f32 = 1.0; // grid leans back so heights read as relief

// Camera
pub const CAMERA_DISTANCE: f32 = 6.0; // orbit radius at zoom 1 and square aspect
pub const CAMERA_FOVY_RADIANS: f32 = std::f32::consts::FRAC_PI_4;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 100.0;
pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 5.0;
pub const WHEEL_SENSITIVITY: f32 = 0.001; // zoom units per pixel of wheel delta
pub const DRAG_SENSITIVITY: f32 = 0.005; // radians per pixel of drag
pub const PITCH_LIMIT_RADIANS: f32 = std::f32::consts::FRAC_PI_3;
pub const AUTO_ROTATE_STEP: f32 = 0.002; // radians per frame
pub const AUTO_ROTATE_WOBBLE: f32 = 0.0015;
pub const AUTO_ROTATE_WOBBLE_RATE: f32 = 0.25; // radians of clock per wobble radian

// Particles
pub const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
