//! Error types for the Ace engine
//!
//! This module defines the error types used throughout the engine:
//! context bootstrap, shader and texture loading, and backend calls.

use std::fmt;

/// Result type for Ace engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ace engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (OpenGL call, surface, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (texture, buffer, shader, etc.)
    InvalidResource(String),

    /// Initialization failed (context library, window, function loader)
    InitializationFailed(String),

    /// A file could not be read or written
    Io(String),

    /// A shader stage did not compile (carries the info log)
    ShaderCompilation(String),

    /// A program did not link (carries the info log)
    ShaderLink(String),

    /// An image file could not be decoded or encoded
    ImageLoad(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::Io(msg) => write!(f, "I/O error: {}", msg),
            Error::ShaderCompilation(msg) => write!(f, "Shader compilation failed: {}", msg),
            Error::ShaderLink(msg) => write!(f, "Shader link failed: {}", msg),
            Error::ImageLoad(msg) => write!(f, "Image error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageLoad(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
