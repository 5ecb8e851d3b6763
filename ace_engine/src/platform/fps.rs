/// Frame timing helpers: the FPS title counter and a per-frame delta clock.
///
/// Both take the current time in seconds from the caller (usually
/// `elapsed_seconds()` on the engine) so they can be driven by tests.

/// Minimum interval between two title updates, in seconds
pub const FPS_UPDATE_INTERVAL: f64 = 0.25;

/// Counts frames and produces a new window title at most 4 times a second
#[derive(Debug, Clone)]
pub struct FpsCounter {
    base_title: String,
    /// Start of the current counting window, set by the first tick
    previous_seconds: Option<f64>,
    frame_count: u32,
}

impl FpsCounter {
    pub fn new(base_title: impl Into<String>) -> Self {
        Self {
            base_title: base_title.into(),
            previous_seconds: None,
            frame_count: 0,
        }
    }

    /// Call once per frame. The first call only starts the counting window.
    ///
    /// Returns the title to apply when more than [`FPS_UPDATE_INTERVAL`]
    /// seconds passed since the last update, `None` otherwise.
    pub fn tick(&mut self, now_seconds: f64) -> Option<String> {
        let previous = *self.previous_seconds.get_or_insert(now_seconds);
        let elapsed = now_seconds - previous;
        let mut title = None;

        if elapsed > FPS_UPDATE_INTERVAL {
            self.previous_seconds = Some(now_seconds);
            let fps = self.frame_count as f64 / elapsed;
            let ms_per_frame = if fps > 0.0 { 1000.0 / fps } else { 0.0 };
            title = Some(format!(
                "{} @ fps: {:.2} | ms/frame: {:.2}",
                self.base_title, fps, ms_per_frame
            ));
            self.frame_count = 0;
        }

        self.frame_count += 1;
        title
    }

    pub fn base_title(&self) -> &str {
        &self.base_title
    }
}

/// Seconds elapsed between consecutive frames
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    previous_seconds: f64,
}

impl FrameClock {
    pub fn new(now_seconds: f64) -> Self {
        Self { previous_seconds: now_seconds }
    }

    /// Advance to `now_seconds` and return the frame delta
    pub fn tick(&mut self, now_seconds: f64) -> f32 {
        let dt = now_seconds - self.previous_seconds;
        self.previous_seconds = now_seconds;
        dt.max(0.0) as f32
    }
}

#[cfg(test)]
#[path = "fps_tests.rs"]
mod tests;
