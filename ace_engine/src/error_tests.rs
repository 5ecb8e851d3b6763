//! Unit tests for error.rs
//!
//! Tests all Error variants and their implementations (Display, Debug, Clone, From).

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("glCreateProgram returned 0".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Backend error"));
    assert!(display.contains("glCreateProgram returned 0"));
}

#[test]
fn test_out_of_memory_display() {
    let err = Error::OutOfMemory;
    assert_eq!(format!("{}", err), "Out of GPU memory");
}

#[test]
fn test_initialization_failed_display() {
    let err = Error::InitializationFailed("could not create window".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Initialization failed"));
    assert!(display.contains("could not create window"));
}

#[test]
fn test_shader_errors_display() {
    let compile = Error::ShaderCompilation("0:3(1): error: syntax error".to_string());
    assert!(format!("{}", compile).starts_with("Shader compilation failed"));
    assert!(format!("{}", compile).contains("syntax error"));

    let link = Error::ShaderLink("undefined varying".to_string());
    assert!(format!("{}", link).starts_with("Shader link failed"));
}

#[test]
fn test_image_and_io_display() {
    let err = Error::ImageLoad("unsupported format".to_string());
    assert!(format!("{}", err).contains("unsupported format"));

    let err = Error::Io("shaders/missing.vert: not found".to_string());
    assert!(format!("{}", err).starts_with("I/O error"));
}

// ============================================================================
// CONVERSIONS
// ============================================================================

#[test]
fn test_from_io_error() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
    let err: Error = io.into();
    match err {
        Error::Io(msg) => assert!(msg.contains("no such file")),
        other => panic!("expected Io, got {:?}", other),
    }
}

#[test]
fn test_error_is_std_error() {
    let err = Error::OutOfMemory;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_clone() {
    let err1 = Error::InvalidResource("texture".to_string());
    let err2 = err1.clone();
    assert_eq!(format!("{}", err1), format!("{}", err2));
}

// ============================================================================
// RESULT TYPE TESTS
// ============================================================================

#[test]
fn test_error_propagation_with_question_mark() {
    fn inner() -> Result<i32> {
        Err(Error::OutOfMemory)
    }

    fn outer() -> Result<i32> {
        inner()?;
        Ok(42)
    }

    assert!(outer().is_err());
}
