/// Keyboard and mouse state, updated from window events.
///
/// The engine feeds events in while pumping the event loop and calls
/// [`InputState::end_frame`] before each pump, so "pressed this frame"
/// queries compare against the state seen by the previous frame.

use rustc_hash::FxHashSet;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

#[derive(Debug, Default, Clone)]
pub struct InputState {
    keys_down: FxHashSet<KeyCode>,
    previous_keys_down: FxHashSet<KeyCode>,
    mouse_down: FxHashSet<MouseButton>,
    previous_mouse_down: FxHashSet<MouseButton>,
    cursor: Option<(f64, f64)>,
    frame_start_cursor: Option<(f64, f64)>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== EVENT FEED =====

    pub fn press_key(&mut self, key: KeyCode) {
        self.keys_down.insert(key);
    }

    pub fn release_key(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
    }

    pub fn press_mouse(&mut self, button: MouseButton) {
        self.mouse_down.insert(button);
    }

    pub fn release_mouse(&mut self, button: MouseButton) {
        self.mouse_down.remove(&button);
    }

    pub fn set_cursor_position(&mut self, x: f64, y: f64) {
        self.cursor = Some((x, y));
    }

    /// Drop every held key and button (focus lost)
    pub fn release_all(&mut self) {
        self.keys_down.clear();
        self.mouse_down.clear();
    }

    /// Snapshot the current state as "previous frame"
    pub fn end_frame(&mut self) {
        self.previous_keys_down.clone_from(&self.keys_down);
        self.previous_mouse_down.clone_from(&self.mouse_down);
        self.frame_start_cursor = self.cursor;
    }

    // ===== QUERIES =====

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Down now, up on the previous frame
    pub fn was_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key) && !self.previous_keys_down.contains(&key)
    }

    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_down.contains(&button)
    }

    pub fn was_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_down.contains(&button) && !self.previous_mouse_down.contains(&button)
    }

    /// Last known cursor position in window coordinates
    pub fn cursor_position(&self) -> Option<(f64, f64)> {
        self.cursor
    }

    /// Cursor movement since the previous frame.
    ///
    /// Zero until the cursor has been seen on two consecutive frames, so the
    /// first event never produces a jump.
    pub fn cursor_delta(&self) -> (f64, f64) {
        match (self.cursor, self.frame_start_cursor) {
            (Some((x, y)), Some((px, py))) => (x - px, y - py),
            _ => (0.0, 0.0),
        }
    }
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod tests;
