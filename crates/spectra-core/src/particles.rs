//! Procedural particle cloud pulsed by the bass.
//!
//! Particles are generated all at once from a [`ParticleShape`] and never
//! edited afterwards; any change to the shape replaces the whole array.
//! Per-frame motion (sinusoidal drift and the bass pulse) happens in the
//! particle shader, mirrored by [`Particle::rendered_position`] for the host.

use crate::constants::WHITE;
use glam::{Vec2, Vec3};
use rand::prelude::*;
use std::f32::consts::TAU;

/// Parameters that define the generated cloud. Changing any of them regenerates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleShape {
    pub count: usize,
    pub size: f32,
    pub size_variation: f32,
    pub spread: f32,
    pub color_mix: f32,
    pub motion_radius: f32,
}

impl Default for ParticleShape {
    fn default() -> Self {
        Self {
            count: 5000,
            size: 7.0,
            size_variation: 5.0,
            spread: 10.0,
            color_mix: 1.0,
            motion_radius: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub base_position: Vec3,
    pub motion_offset: Vec2,
    pub size: f32,
    pub color: Vec3,
}

impl Particle {
    /// Position the particle shader draws at for a given clock and pulse.
    pub fn rendered_position(&self, time: f32, speed: f32, pulse: f32) -> Vec3 {
        let phase = time * speed;
        let off = self.motion_offset;
        let mut p = self.base_position;
        p.x += (phase + p.y).sin() * off.x;
        p.y += (phase + p.x).cos() * off.y;
        p.z += (phase * 0.5).sin() * (off.x + off.y) * 0.5;
        p * pulse
    }
}

/// Scale applied to both particle positions and point sizes.
#[inline]
pub fn pulse_factor(bass_intensity: f32, pulse_intensity: f32) -> f32 {
    1.0 + bass_intensity * pulse_intensity
}

/// Fully saturated, full-value color for a hue in \[0, 1).
pub fn hue_to_rgb(hue: f32) -> Vec3 {
    let h = hue.rem_euclid(1.0) * 6.0;
    let x = 1.0 - ((h % 2.0) - 1.0).abs();
    match h as u32 {
        0 => Vec3::new(1.0, x, 0.0),
        1 => Vec3::new(x, 1.0, 0.0),
        2 => Vec3::new(0.0, 1.0, x),
        3 => Vec3::new(0.0, x, 1.0),
        4 => Vec3::new(x, 0.0, 1.0),
        _ => Vec3::new(1.0, 0.0, x),
    }
}

/// Instance record uploaded to the GPU, one per particle.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub offset: [f32; 2],
    pub color: [f32; 3],
}

impl From<&Particle> for ParticleInstance {
    fn from(p: &Particle) -> Self {
        Self {
            position: p.base_position.to_array(),
            size: p.size,
            offset: p.motion_offset.to_array(),
            color: p.color.to_array(),
        }
    }
}

pub struct ParticleField {
    shape: ParticleShape,
    particles: Vec<Particle>,
    instances: Vec<ParticleInstance>,
    rng: StdRng,
    generation: u64,
}

impl ParticleField {
    pub fn new(shape: ParticleShape, seed: u64) -> Self {
        let mut field = Self {
            shape,
            particles: Vec::new(),
            instances: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            generation: 0,
        };
        field.regenerate(shape);
        field
    }

    /// Rebuild every particle from `shape`.
    pub fn regenerate(&mut self, shape: ParticleShape) {
        let half = shape.spread * 0.5;
        let rng = &mut self.rng;
        let particles: Vec<Particle> = (0..shape.count)
            .map(|_| {
                let base_position = Vec3::new(
                    rng.gen_range(-half..=half),
                    rng.gen_range(-half..=half),
                    rng.gen_range(-half..=half),
                );
                let r = shape.motion_radius * rng.gen::<f32>().sqrt();
                let theta = rng.gen::<f32>() * TAU;
                let motion_offset = Vec2::new(r * theta.cos(), r * theta.sin());
                let size = shape.size + (rng.gen::<f32>() - 0.5) * shape.size_variation;
                let hue = hue_to_rgb(rng.gen::<f32>());
                let color = Vec3::from(WHITE).lerp(hue, shape.color_mix.clamp(0.0, 1.0));
                Particle {
                    base_position,
                    motion_offset,
                    size,
                    color,
                }
            })
            .collect();
        self.instances = particles.iter().map(ParticleInstance::from).collect();
        self.particles = particles;
        self.shape = shape;
        self.generation += 1;
        log::info!(
            "particles regenerated: {} (spread {:.1}, size {:.1}±{:.1})",
            shape.count,
            shape.spread,
            shape.size,
            shape.size_variation * 0.5
        );
    }

    /// Regenerate only when the shape actually differs.
    pub fn set_shape(&mut self, shape: ParticleShape) -> bool {
        if shape == self.shape {
            return false;
        }
        self.regenerate(shape);
        true
    }

    pub fn shape(&self) -> ParticleShape {
        self.shape
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn instances(&self) -> &[ParticleInstance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Bumped on every regeneration so renderers know to re-upload.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
