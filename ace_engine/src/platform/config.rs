/// Engine start-up configuration and lifecycle status.

use std::path::PathBuf;
use crate::log::{LogSeverity, GL_LOG_FILE};

/// Window and context parameters for `init`
///
/// There is no configuration file: exercises build this in code, usually
/// with `EngineConfig::default()` and a couple of overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Requested window width in screen coordinates (ignored in fullscreen)
    pub width: u32,

    /// Requested window height in screen coordinates (ignored in fullscreen)
    pub height: u32,

    /// Borderless fullscreen on the primary monitor
    pub fullscreen: bool,

    /// Base window title; the FPS counter appends its statistics to it
    pub title: String,

    /// Log file, truncated at start-up
    pub log_path: PathBuf,

    /// Multisample count requested for the default framebuffer (0 = off)
    pub msaa_samples: u8,

    /// Wait for vertical blank on swap
    pub vsync: bool,

    /// Minimum severity echoed to stdout (`None` = file and stderr only)
    pub console_log_level: Option<LogSeverity>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fullscreen: false,
            title: "Ace Engine".to_string(),
            log_path: PathBuf::from(GL_LOG_FILE),
            msaa_samples: 4,
            vsync: true,
            console_log_level: Some(LogSeverity::Info),
        }
    }
}

impl EngineConfig {
    /// Windowed configuration with the given size and title
    pub fn windowed(width: u32, height: u32, title: impl Into<String>) -> Self {
        Self {
            width,
            height,
            title: title.into(),
            ..Self::default()
        }
    }

    /// Same configuration in fullscreen
    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }
}

/// Engine lifecycle: `Uninitialized → Initialized → Shutdown`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Uninitialized,
    Initialized,
    Shutdown,
}

impl Default for EngineStatus {
    fn default() -> Self {
        EngineStatus::Uninitialized
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
