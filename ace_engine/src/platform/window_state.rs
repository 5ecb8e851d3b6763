/// Window and framebuffer dimensions tracked by the engine.
///
/// On high-DPI displays the framebuffer (pixels) and the window (screen
/// coordinates) differ; the viewport and projection must use the former.

#[derive(Debug, Clone, PartialEq)]
pub struct WindowState {
    pub window_width: u32,
    pub window_height: u32,
    pub framebuffer_width: u32,
    pub framebuffer_height: u32,
    pub title: String,
}

impl WindowState {
    pub fn new(width: u32, height: u32, title: impl Into<String>) -> Self {
        Self {
            window_width: width,
            window_height: height,
            framebuffer_width: width,
            framebuffer_height: height,
            title: title.into(),
        }
    }

    /// Framebuffer width / height. A zero-height (minimized) framebuffer
    /// reports 1.0 so projections stay finite.
    pub fn aspect_ratio(&self) -> f32 {
        if self.framebuffer_height == 0 {
            return 1.0;
        }
        self.framebuffer_width as f32 / self.framebuffer_height as f32
    }

    /// Record a new window size. Returns `true` if it changed.
    pub fn set_window_size(&mut self, width: u32, height: u32) -> bool {
        let changed = (self.window_width, self.window_height) != (width, height);
        self.window_width = width;
        self.window_height = height;
        changed
    }

    /// Record a new framebuffer size. Returns `true` if it changed.
    pub fn set_framebuffer_size(&mut self, width: u32, height: u32) -> bool {
        let changed = (self.framebuffer_width, self.framebuffer_height) != (width, height);
        self.framebuffer_width = width;
        self.framebuffer_height = height;
        changed
    }
}

impl Default for WindowState {
    fn default() -> Self {
        Self::new(640, 480, "Ace Engine")
    }
}

#[cfg(test)]
#[path = "window_state_tests.rs"]
mod tests;
