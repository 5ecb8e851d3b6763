use super::*;

#[test]
fn test_default_config() {
    let config = EngineConfig::default();
    assert_eq!(config.width, 640);
    assert_eq!(config.height, 480);
    assert!(!config.fullscreen);
    assert_eq!(config.title, "Ace Engine");
    assert_eq!(config.log_path, PathBuf::from("gl.log"));
    assert_eq!(config.msaa_samples, 4);
    assert!(config.vsync);
    assert_eq!(config.console_log_level, Some(LogSeverity::Info));
}

#[test]
fn test_windowed_overrides_size_and_title() {
    let config = EngineConfig::windowed(800, 600, "Exercise");
    assert_eq!((config.width, config.height), (800, 600));
    assert_eq!(config.title, "Exercise");
    assert_eq!(config.msaa_samples, 4);

    let fullscreen = config.clone().with_fullscreen(true);
    assert!(fullscreen.fullscreen);
    assert_eq!(fullscreen.title, config.title);
}

#[test]
fn test_status_starts_uninitialized() {
    assert_eq!(EngineStatus::default(), EngineStatus::Uninitialized);
    assert_ne!(EngineStatus::Initialized, EngineStatus::Shutdown);
}
