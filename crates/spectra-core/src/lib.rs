pub mod audio;
pub mod camera;
pub mod constants;
pub mod error;
pub mod grid;
pub mod params;
pub mod particles;
pub mod spectrum;
pub mod spring;
pub mod visualizer;

// Shaders bundled as string constants
pub static GRID_WGSL: &str = include_str!("../shaders/grid.wgsl");
pub static PARTICLES_WGSL: &str = include_str!("../shaders/particles.wgsl");

pub use audio::*;
pub use camera::*;
pub use constants::*;
pub use error::*;
pub use grid::*;
pub use params::*;
pub use particles::*;
pub use spectrum::*;
pub use spring::*;
pub use visualizer::*;
