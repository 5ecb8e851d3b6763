//! Unit tests for OpenGlEngine
//!
//! Covers config ranking and the behaviour of an engine that was never
//! initialized. No window or GPU required.

use super::*;

// ============================================================================
// CONFIG RANKING TESTS
// ============================================================================

#[test]
fn test_config_rank_prefers_srgb() {
    assert!(config_rank(true, 0, 4) > config_rank(false, 4, 4));
}

#[test]
fn test_config_rank_prefers_requested_samples() {
    assert!(config_rank(true, 4, 4) > config_rank(true, 2, 4));
    assert!(config_rank(true, 2, 4) > config_rank(true, 0, 4));
}

#[test]
fn test_config_rank_penalizes_oversampling() {
    // Anything that fits beats anything above the request
    assert!(config_rank(true, 0, 4) > config_rank(true, 8, 4));
    // Above the request, the closest count wins
    assert!(config_rank(true, 8, 4) > config_rank(true, 16, 4));
}

#[test]
fn test_config_rank_without_msaa() {
    assert!(config_rank(true, 0, 0) > config_rank(true, 4, 0));
}

// ============================================================================
// UNINITIALIZED ENGINE TESTS
// ============================================================================

#[test]
fn test_new_engine_is_uninitialized() {
    let engine = OpenGlEngine::new();
    assert_eq!(engine.status(), EngineStatus::Uninitialized);
    assert!(!engine.is_initialized());
    assert!(!engine.should_close());
    assert!(engine.window().is_none());
}

#[test]
fn test_device_requires_init() {
    let engine = OpenGlEngine::new();
    assert!(matches!(engine.device(), Err(Error::InitializationFailed(_))));
    assert!(engine.graphics_device().is_err());
}

#[test]
fn test_shutdown_is_noop_when_uninitialized() {
    let mut engine = OpenGlEngine::new();
    engine.shutdown();
    engine.shutdown();
    assert_eq!(engine.status(), EngineStatus::Uninitialized);
}

#[test]
fn test_loop_calls_without_context() {
    let mut engine = OpenGlEngine::new();
    engine.poll_events();
    assert!(engine.swap_buffers().is_err());
    assert!(engine.take_screenshot(Some("never_written")).is_err());
    assert!(!std::path::Path::new("never_written.png").exists());
}

#[test]
fn test_should_close_flag() {
    let mut engine = OpenGlEngine::new();
    engine.set_should_close(true);
    assert!(engine.should_close());
    engine.set_should_close(false);
    assert!(!engine.should_close());
}

#[test]
fn test_set_title_updates_window_state() {
    let mut engine = OpenGlEngine::new();
    engine.set_title("Exercise @ fps: 60.00 | ms/frame: 16.67");
    assert_eq!(engine.window_state().title, "Exercise @ fps: 60.00 | ms/frame: 16.67");
}

#[test]
fn test_default_window_state() {
    let engine = OpenGlEngine::default();
    assert_eq!(engine.window_state().framebuffer_width, 640);
    assert_eq!(engine.window_state().framebuffer_height, 480);
    assert!(engine.input().cursor_position().is_none());
}
