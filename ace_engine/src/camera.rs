/// FlyCamera - yaw/pitch camera driven by mouse and keyboard.
///
/// The camera owns no GPU state. The caller asks for `view_matrix()` after
/// `update()` reports movement and uploads it itself.

use crate::math::{Mat4, Vec3, ONE_DEG_IN_RAD};
use crate::platform::{InputState, KeyCode, MouseButton};

/// Pitch limit in degrees
pub const MAX_PITCH: f32 = 89.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    /// Degrees, positive turns left
    pub yaw: f32,
    /// Degrees, positive looks up, clamped to ±[`MAX_PITCH`]
    pub pitch: f32,
    /// Units per second
    pub speed: f32,
    /// Degrees per pixel of mouse motion
    pub sensitivity: f32,
    /// Units per pixel of middle-button drag
    pub pan_speed: f32,
}

impl FlyCamera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            speed: 5.0,
            sensitivity: 0.2,
            pan_speed: 0.01,
        }
    }

    /// `rotate_x(-pitch) * rotate_y(-yaw) * translate(-position)`
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::rotate_x(-self.pitch) * Mat4::rotate_y(-self.yaw) * Mat4::translate_vec(-self.position)
    }

    /// Horizontal forward direction (ignores pitch)
    pub fn forward(&self) -> Vec3 {
        let yaw_rad = self.yaw * ONE_DEG_IN_RAD;
        Vec3::new(-yaw_rad.sin(), 0.0, -yaw_rad.cos())
    }

    /// Horizontal right direction
    pub fn right(&self) -> Vec3 {
        let yaw_rad = self.yaw * ONE_DEG_IN_RAD;
        Vec3::new(yaw_rad.cos(), 0.0, -yaw_rad.sin())
    }

    /// Turn by a mouse delta in pixels (screen y grows downward)
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * self.sensitivity;
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Slide sideways and vertically by a mouse delta in pixels
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let right = self.right();
        self.position = self.position + right * (dx * self.pan_speed);
        self.position.y -= dy * self.pan_speed;
    }

    /// Move along the horizontal forward/right axes and world up
    pub fn translate_local(&mut self, forward: f32, right: f32, up: f32) {
        self.position = self.position + self.forward() * forward + self.right() * right;
        self.position.y += up;
    }

    /// Apply one frame of input. Returns `true` if the camera moved.
    ///
    /// Right button: look with the mouse, move with WASD, Q/E down/up.
    /// Middle button: pan.
    pub fn update(&mut self, input: &InputState, dt: f32) -> bool {
        let (dx, dy) = input.cursor_delta();
        let (dx, dy) = (dx as f32, dy as f32);
        let mouse_moved = dx != 0.0 || dy != 0.0;
        let mut moved = false;

        let right_button = input.is_mouse_down(MouseButton::Right);

        if right_button && mouse_moved {
            self.look(dx, dy);
            moved = true;
        }

        if input.is_mouse_down(MouseButton::Middle) && mouse_moved {
            self.pan(dx, dy);
            moved = true;
        }

        if right_button {
            let step = self.speed * dt;
            let axis = |positive: KeyCode, negative: KeyCode| {
                let mut value = 0.0;
                if input.is_key_down(positive) {
                    value += step;
                }
                if input.is_key_down(negative) {
                    value -= step;
                }
                value
            };

            let forward = axis(KeyCode::KeyW, KeyCode::KeyS);
            let right = axis(KeyCode::KeyD, KeyCode::KeyA);
            let up = axis(KeyCode::KeyE, KeyCode::KeyQ);

            let any_key = [KeyCode::KeyW, KeyCode::KeyS, KeyCode::KeyA, KeyCode::KeyD, KeyCode::KeyQ, KeyCode::KeyE]
                .into_iter()
                .any(|key| input.is_key_down(key));

            if any_key {
                self.translate_local(forward, right, up);
                moved = true;
            }
        }

        moved
    }
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 2.0))
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
