//! Spring-driven line grid.
//!
//! Each interior grid line owns a spring holding its offset along the fixed
//! axis. Springs are retargeted to a jittered position around their rest
//! offset on a slow cadence, staggered by line index, so the grid ripples
//! restlessly instead of pulsing in unison. Heights and colors are computed
//! in the grid shader; this module only produces the flat line geometry.

use crate::constants::*;
use crate::spring::Spring;
use glam::{Mat4, Vec3};
use rand::prelude::*;

/// Direction a line runs along. An `X` line spans x at a spring-held y.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridAxis {
    X,
    Y,
}

#[derive(Clone, Debug)]
pub struct GridLine {
    pub axis: GridAxis,
    pub spring: Spring,
    rest: f32,
    next_retarget_sec: f32,
}

impl GridLine {
    /// Offset the line returns to when it is not being jittered.
    pub fn rest(&self) -> f32 {
        self.rest
    }

    pub fn next_retarget_sec(&self) -> f32 {
        self.next_retarget_sec
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GridVertex {
    pub position: [f32; 3],
}

pub struct GridAnimator {
    lines: Vec<GridLine>,
    grid_lines: usize,
    grid_size: f32,
    elapsed_sec: f32,
    vertices: Vec<GridVertex>,
    rng: StdRng,
    generation: u64,
}

impl GridAnimator {
    pub fn new(grid_lines: usize, grid_size: f32, seed: u64) -> Self {
        let mut animator = Self {
            lines: Vec::new(),
            grid_lines: grid_lines.max(2),
            grid_size,
            elapsed_sec: 0.0,
            vertices: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            generation: 0,
        };
        animator.rebuild();
        animator
    }

    /// Replace the whole line set; springs start at rest with no momentum.
    fn rebuild(&mut self) {
        let n = self.grid_lines;
        let mut lines = Vec::with_capacity(2 * (n - 1));
        for axis in [GridAxis::X, GridAxis::Y] {
            for i in 1..n {
                let rest = -1.0 + 2.0 * i as f32 / n as f32;
                let mut spring = Spring::new(LINE_DAMPENING, LINE_STIFFNESS, rest);
                spring.snap();
                lines.push(GridLine {
                    axis,
                    spring,
                    rest,
                    next_retarget_sec: 0.0,
                });
            }
        }
        for (k, line) in lines.iter_mut().enumerate() {
            line.next_retarget_sec =
                self.elapsed_sec + RETARGET_PERIOD_SEC + k as f32 * RETARGET_STAGGER_SEC;
        }
        self.lines = lines;
        self.generation += 1;
        self.emit_vertices();
        log::debug!(
            "grid rebuilt: {} lines, size {:.2} (generation {})",
            self.lines.len(),
            self.grid_size,
            self.generation
        );
    }

    /// Change the number of grid divisions; rebuilds only on an actual change.
    pub fn set_density(&mut self, grid_lines: usize) -> bool {
        let grid_lines = grid_lines.max(2);
        if grid_lines == self.grid_lines {
            return false;
        }
        self.grid_lines = grid_lines;
        self.rebuild();
        true
    }

    /// Change the world-space grid size; rebuilds only on an actual change.
    pub fn set_grid_size(&mut self, grid_size: f32) -> bool {
        if (grid_size - self.grid_size).abs() <= f32::EPSILON {
            return false;
        }
        self.grid_size = grid_size;
        self.rebuild();
        true
    }

    /// Advance the retarget schedule, tick every spring once and re-emit geometry.
    pub fn update(&mut self, dt_sec: f32) {
        self.elapsed_sec += dt_sec.max(0.0);
        let spacing = 2.0 / self.grid_lines as f32;
        let now = self.elapsed_sec;
        for line in &mut self.lines {
            if now >= line.next_retarget_sec {
                let jitter = self.rng.gen_range(-1.0..=1.0) * RETARGET_JITTER * spacing;
                line.spring.set_target(line.rest + jitter);
                line.next_retarget_sec += RETARGET_PERIOD_SEC;
                if line.next_retarget_sec <= now {
                    line.next_retarget_sec = now + RETARGET_PERIOD_SEC;
                }
            }
            line.spring.tick(1.0);
        }
        self.emit_vertices();
    }

    fn emit_vertices(&mut self) {
        self.vertices.clear();
        self.vertices.reserve(self.lines.len() * LINE_SEGMENTS * 2);
        for line in &self.lines {
            let offset = line.spring.value();
            let point = |s: usize| {
                let t = -1.0 + 2.0 * s as f32 / LINE_SEGMENTS as f32;
                match line.axis {
                    GridAxis::X => GridVertex {
                        position: [t, offset, 0.0],
                    },
                    GridAxis::Y => GridVertex {
                        position: [offset, t, 0.0],
                    },
                }
            };
            for s in 0..LINE_SEGMENTS {
                self.vertices.push(point(s));
                self.vertices.push(point(s + 1));
            }
        }
    }

    pub fn half_extent(&self) -> f32 {
        self.grid_size * 0.5
    }

    /// Normalized grid space → world: spread x and y over the half extent
    /// (heights on z are already in world units), then tilt back.
    pub fn model_matrix(&self) -> Mat4 {
        let h = self.half_extent();
        Mat4::from_rotation_x(-GRID_TILT_RADIANS) * Mat4::from_scale(Vec3::new(h, h, 1.0))
    }

    /// Line-list vertices, two per segment.
    pub fn vertices(&self) -> &[GridVertex] {
        &self.vertices
    }

    pub fn lines(&self) -> &[GridLine] {
        &self.lines
    }

    pub fn grid_lines(&self) -> usize {
        self.grid_lines
    }

    pub fn grid_size(&self) -> f32 {
        self.grid_size
    }

    /// Bumped on every rebuild so renderers know when buffer sizes change.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
