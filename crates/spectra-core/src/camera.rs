//! Orbit camera: slow autonomous rotation, drag override and clamped zoom.
//!
//! The controller is the only owner of the orbit angles; nothing else in
//! the frame loop accumulates rotation.

use crate::constants::*;
use glam::{Mat4, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Drag {
    last_x: f32,
    last_y: f32,
}

#[derive(Clone, Debug)]
pub struct OrbitCamera {
    /// Pitch, radians, within ±[`PITCH_LIMIT_RADIANS`].
    pub rotation_x: f32,
    /// Yaw, radians, unbounded.
    pub rotation_y: f32,
    zoom: f32,
    pub auto_rotate: bool,
    drag: Option<Drag>,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl OrbitCamera {
    pub fn new(zoom: f32) -> Self {
        Self {
            rotation_x: 0.0,
            rotation_y: 0.0,
            zoom: clamp_zoom(zoom),
            auto_rotate: true,
            drag: None,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = clamp_zoom(zoom);
    }

    /// Apply a wheel delta in pixels; positive deltas (scrolling down) zoom out.
    pub fn apply_wheel(&mut self, delta_px: f32) -> f32 {
        self.set_zoom(self.zoom - delta_px * WHEEL_SENSITIVITY);
        self.zoom
    }

    pub fn begin_drag(&mut self, x: f32, y: f32) {
        self.auto_rotate = false;
        self.drag = Some(Drag {
            last_x: x,
            last_y: y,
        });
    }

    /// Pointer moved; rotates only while a drag is active.
    pub fn drag_to(&mut self, x: f32, y: f32) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let dx = x - drag.last_x;
        let dy = y - drag.last_y;
        drag.last_x = x;
        drag.last_y = y;
        self.rotation_y += dx * DRAG_SENSITIVITY;
        self.rotation_x = (self.rotation_x + dy * DRAG_SENSITIVITY)
            .clamp(-PITCH_LIMIT_RADIANS, PITCH_LIMIT_RADIANS);
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Reset gesture: back to the default view with auto-rotation on.
    pub fn reset(&mut self) {
        self.rotation_x = 0.0;
        self.rotation_y = 0.0;
        self.auto_rotate = true;
        self.drag = None;
    }

    /// Per-frame autonomous yaw, a base step plus a slow wobble on the clock.
    pub fn advance(&mut self, time: f32, animation_speed: f32) {
        if !self.auto_rotate {
            return;
        }
        let wobble = (time * AUTO_ROTATE_WOBBLE_RATE).sin() * AUTO_ROTATE_WOBBLE;
        self.rotation_y += (AUTO_ROTATE_STEP + wobble) * animation_speed;
    }

    /// Orbit radius; wider viewports back off so the wider grid stays in frame.
    pub fn radius(&self, aspect: f32) -> f32 {
        CAMERA_DISTANCE * aspect.max(1.0) / self.zoom
    }

    pub fn eye(&self, aspect: f32) -> Vec3 {
        let r = self.radius(aspect);
        let (sp, cp) = self.rotation_x.sin_cos();
        let (sy, cy) = self.rotation_y.sin_cos();
        Vec3::new(r * cp * sy, r * sp, r * cp * cy)
    }

    pub fn camera(&self, aspect: f32) -> Camera {
        Camera {
            eye: self.eye(aspect),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOVY_RADIANS,
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }
}

#[inline]
pub fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_nan() {
        return 1.0;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}
