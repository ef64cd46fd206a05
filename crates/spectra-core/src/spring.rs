//! Discrete-time damped spring used for every smooth transition in the scene.

use crate::constants::{LINE_DAMPENING, LINE_STIFFNESS};

/// Scalar spring that chases `target` one fixed step at a time.
///
/// `stiffness` and `dampening` must stay in `(0, 1]`; values outside that
/// range make the update unstable and are a caller bug.
#[derive(Clone, Debug, PartialEq)]
pub struct Spring {
    pub dampening: f32,
    pub stiffness: f32,
    value: f32,
    target: f32,
    velocity: f32,
}

impl Spring {
    pub fn new(dampening: f32, stiffness: f32, initial: f32) -> Self {
        debug_assert!(dampening > 0.0 && dampening <= 1.0, "dampening out of (0, 1]");
        debug_assert!(stiffness > 0.0 && stiffness <= 1.0, "stiffness out of (0, 1]");
        Self {
            dampening,
            stiffness,
            value: initial,
            target: initial,
            velocity: 0.0,
        }
    }

    /// Advance by one damped step and return the new value.
    pub fn tick(&mut self, dt: f32) -> f32 {
        let acceleration = (self.target - self.value) * self.stiffness;
        self.velocity += acceleration;
        self.velocity *= self.dampening;
        self.value += self.velocity * dt;
        self.value
    }

    /// Jump straight to the target and drop all momentum.
    pub fn snap(&mut self) -> f32 {
        self.value = self.target;
        self.velocity = 0.0;
        self.value
    }

    /// Move the target; velocity carries over so motion stays continuous.
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }
}

impl Default for Spring {
    fn default() -> Self {
        Self::new(LINE_DAMPENING, LINE_STIFFNESS, 0.0)
    }
}
