/*!
# Ace Engine

Core types for the Ace OpenGL exercises.

This crate is backend-agnostic: it holds the math the exercises teach, the
shader and texture wrappers, and the window/input state a backend fills in.
The OpenGL backend (`ace_engine_renderer_opengl`) implements
[`ace::graphics::GraphicsDevice`] and owns the window and context.

## Architecture

- **math**: column-major `Mat4`, `Vec3`, transform builders, frustum culling
- **graphics**: `GraphicsDevice` trait, `Shader`, `Texture`
- **platform**: `EngineConfig`, `WindowState`, `InputState`, FPS counter
- **camera**: `FlyCamera` driven by `InputState`
- **log**: `Logger` trait, colored console and flat-file loggers, `engine_*!` macros
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod math;
pub mod graphics;
pub mod platform;
pub mod camera;
pub mod screenshot;

// Main ace namespace module
pub mod ace {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton (logger)
    pub use crate::engine::Engine;

    // Logging sub-module (types only, macros live at the crate root)
    pub mod log {
        pub use crate::log::{
            format_plain, DefaultLogger, FileLogger, LogBridge, LogEntry, LogSeverity, Logger,
            GL_LOG_FILE,
        };
    }

    // Math sub-module
    pub mod math {
        pub use crate::math::*;
    }

    // Graphics sub-module
    pub mod graphics {
        pub use crate::graphics::*;
    }

    // Platform sub-module
    pub mod platform {
        pub use crate::platform::*;
    }

    pub use crate::camera::FlyCamera;
    pub use crate::screenshot;
}

// Re-export math library at crate root
pub use glam;
