//! The engine: one instance per surface, advanced once per frame.
//!
//! Frame order inside [`Visualizer::update`] is fixed: spectrum field and
//! bass intensity, then grid springs, then the camera. Drawing is the
//! renderer's job and reads the results through the accessors below.

use crate::camera::{Camera, OrbitCamera};
use crate::constants::BASE_GRID_SIZE;
use crate::error::EngineError;
use crate::grid::GridAnimator;
use crate::params::{AnalyserSettings, GridParams, ParamEffect, ParamKey, ParamUpdate};
use crate::particles::{pulse_factor, ParticleField};
use crate::spectrum::{bass_intensity, FrequencyField, SpectrumMapper};
use glam::Mat4;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    /// No audio attached; nothing advanced.
    Idle,
    Updated,
}

/// Grid size that fills a viewport of the given aspect without distortion.
pub fn grid_size_for_aspect(aspect: f32) -> f32 {
    BASE_GRID_SIZE * aspect.max(1.0)
}

pub struct Visualizer {
    params: GridParams,
    mapper: SpectrumMapper,
    grid: GridAnimator,
    particles: ParticleField,
    camera: OrbitCamera,
    viewport: Viewport,
    time: f32,
    bass_intensity: f32,
    analyser_dirty: bool,
}

impl Visualizer {
    pub fn new(params: GridParams, viewport: Viewport, seed: u64) -> Self {
        let grid = GridAnimator::new(
            params.grid_lines(),
            grid_size_for_aspect(viewport.aspect()),
            seed,
        );
        let particles = ParticleField::new(params.particle_shape(), seed.wrapping_add(1));
        let camera = OrbitCamera::new(params.zoom());
        log::info!(
            "visualizer ready: {}x{}, {} grid lines, {} particles",
            viewport.width,
            viewport.height,
            grid.lines().len(),
            particles.len()
        );
        Self {
            params,
            mapper: SpectrumMapper::new(),
            grid,
            particles,
            camera,
            viewport,
            time: 0.0,
            bass_intensity: 0.0,
            analyser_dirty: true,
        }
    }

    // ---------------- parameters ----------------

    pub fn params(&self) -> &GridParams {
        &self.params
    }

    pub fn set_param(&mut self, key: &str, value: f32) -> Result<ParamUpdate, EngineError> {
        let key = ParamKey::from_key(key).ok_or_else(|| EngineError::UnknownParam(key.into()))?;
        self.set(key, value)
    }

    /// Clamp, store and apply the write's effect before the next frame reads it.
    pub fn set(&mut self, key: ParamKey, value: f32) -> Result<ParamUpdate, EngineError> {
        let update = self.params.set(key, value)?;
        if update.changed() {
            self.apply_effect(update.effect);
        }
        Ok(update)
    }

    fn apply_effect(&mut self, effect: ParamEffect) {
        match effect {
            ParamEffect::Cosmetic => {}
            ParamEffect::Camera => self.camera.set_zoom(self.params.zoom()),
            ParamEffect::Analyser => self.analyser_dirty = true,
            ParamEffect::RebuildGrid => {
                self.grid.set_density(self.params.grid_lines());
            }
            ParamEffect::RegenerateParticles => {
                self.particles.set_shape(self.params.particle_shape());
            }
        }
    }

    pub fn export_params(&self) -> BTreeMap<String, f32> {
        self.params.export()
    }

    /// Replace every tunable with `entries` merged over the defaults.
    pub fn import_params<K, I>(&mut self, entries: I)
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, f32)>,
    {
        self.replace_params(GridParams::import(entries));
    }

    pub fn replace_params(&mut self, params: GridParams) {
        self.params = params;
        for effect in [
            ParamEffect::Camera,
            ParamEffect::Analyser,
            ParamEffect::RebuildGrid,
            ParamEffect::RegenerateParticles,
        ] {
            self.apply_effect(effect);
        }
    }

    /// Pending smoothing/decibel settings for the audio collaborator, once per change.
    pub fn take_analyser_settings(&mut self) -> Option<AnalyserSettings> {
        if !self.analyser_dirty {
            return None;
        }
        self.analyser_dirty = false;
        Some(self.params.analyser_settings())
    }

    // ---------------- viewport and input ----------------

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = Viewport { width, height };
        self.grid
            .set_grid_size(grid_size_for_aspect(self.viewport.aspect()));
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.camera.begin_drag(x, y);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.camera.drag_to(x, y);
    }

    pub fn pointer_up(&mut self) {
        self.camera.end_drag();
    }

    pub fn reset_view(&mut self) {
        self.camera.reset();
    }

    /// Wheel delta in pixels; the zoom parameter follows the camera.
    pub fn wheel(&mut self, delta_px: f32) {
        let zoom = self.camera.apply_wheel(delta_px);
        if let Err(e) = self.params.set(ParamKey::Zoom, zoom) {
            log::warn!("zoom not recorded: {e}");
        }
    }

    // ---------------- frame ----------------

    /// Advance one frame. Without a spectrum the frame is a no-op.
    pub fn update(&mut self, dt_sec: f32, spectrum: Option<&[u8]>) -> FrameStatus {
        let Some(buffer) = spectrum else {
            return FrameStatus::Idle;
        };
        let dt_sec = dt_sec.max(0.0);
        let speed = self.params.animation_speed();
        self.time += dt_sec * speed;

        self.mapper.map(
            buffer,
            self.params.band_weights(),
            self.params.response_intensity(),
        );
        self.bass_intensity = bass_intensity(buffer);

        self.grid.update(dt_sec);
        self.camera.advance(self.time, speed);
        FrameStatus::Updated
    }

    pub fn field(&self) -> &FrequencyField {
        self.mapper.field()
    }

    pub fn mapper(&self) -> &SpectrumMapper {
        &self.mapper
    }

    pub fn grid(&self) -> &GridAnimator {
        &self.grid
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn orbit(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera(&self) -> Camera {
        self.camera.camera(self.viewport.aspect())
    }

    pub fn view_proj(&self) -> Mat4 {
        let camera = self.camera();
        camera.projection_matrix() * camera.view_matrix()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Animation clock, already scaled by the animation speed.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn bass_intensity(&self) -> f32 {
        self.bass_intensity
    }

    pub fn pulse(&self) -> f32 {
        pulse_factor(
            self.bass_intensity,
            self.params.get(ParamKey::ParticlePulseIntensity),
        )
    }
}
