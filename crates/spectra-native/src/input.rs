use crate::constants::{DOUBLE_CLICK_SEC, WHEEL_LINE_PX};
use winit::event::MouseScrollDelta;

/// Left-button state and click timing for the orbit gestures.
#[derive(Default, Clone, Copy, Debug)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    pub down: bool,
    last_press_sec: Option<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Press {
    Single,
    Double,
}

impl PointerState {
    pub fn moved(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Record a press at `now_sec`; a second press within the window is a double click.
    pub fn press(&mut self, now_sec: f32) -> Press {
        self.down = true;
        match self.last_press_sec.take() {
            Some(prev) if now_sec - prev <= DOUBLE_CLICK_SEC => Press::Double,
            _ => {
                self.last_press_sec = Some(now_sec);
                Press::Single
            }
        }
    }

    pub fn release(&mut self) {
        self.down = false;
    }
}

/// Wheel delta in pixels, positive when scrolling down (zooming out).
#[inline]
pub fn wheel_delta_px(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * WHEEL_LINE_PX,
        MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
    }
}
