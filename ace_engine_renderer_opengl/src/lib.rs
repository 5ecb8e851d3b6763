/*!
# Ace Engine - OpenGL Renderer Backend

OpenGL implementation of the Ace engine.

This crate provides the `GraphicsDevice` implementation on top of `glow`,
and the window/context bootstrap (`winit` + `glutin`) the exercises run in.
Contexts are OpenGL 4.1 core profile, which keeps macOS supported.
*/

// OpenGL implementation modules
mod opengl_device;
mod opengl_engine;
mod gl_debug;

// Main ace namespace module
pub mod ace {
    pub use crate::opengl_device::OpenGlDevice;
    pub use crate::opengl_engine::{OpenGlEngine, GL_VERSION_MAJOR, GL_VERSION_MINOR};

    // GL error checking and diagnostics
    pub mod debug {
        pub use crate::gl_debug::{
            check_and_clear_gl_errors, debug_severity, debug_type_name, get_gl_error_stats,
            gl_error_string, log_gl_params, print_gl_error_report, reset_gl_error_stats,
            GlErrorStats,
        };
    }
}

// Re-export the windowing and GL crates exercises need directly
pub use glow;
pub use winit;
