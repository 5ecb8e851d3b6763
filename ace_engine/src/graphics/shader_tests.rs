use super::*;
use crate::engine::Engine;
use crate::graphics::mock_device::MockDevice;
use crate::log::{LogEntry, LogSeverity, Logger};
use crate::math::Mat4;
use serial_test::serial;
use std::sync::{Arc, Mutex};

const VS: &str = "#version 410 core\n\
layout(location = 0) in vec3 vertex_position;\n\
uniform mat4 matrix;\n\
void main() { gl_Position = matrix * vec4(vertex_position, 1.0); }\n";

const FS: &str = "#version 410 core\n\
uniform vec4 colour;\n\
uniform float weights[2];\n\
out vec4 frag_colour;\n\
void main() { frag_colour = colour; }\n";

// ============================================================================
// Helpers
// ============================================================================

struct ShaderFiles {
    vertex: PathBuf,
    fragment: PathBuf,
}

impl ShaderFiles {
    fn new(name: &str, vertex: &str, fragment: &str) -> Self {
        let dir = std::env::temp_dir();
        let files = Self {
            vertex: dir.join(format!("ace_shader_{}_{}.vert", std::process::id(), name)),
            fragment: dir.join(format!("ace_shader_{}_{}.frag", std::process::id(), name)),
        };
        files.write(vertex, fragment);
        files
    }

    fn write(&self, vertex: &str, fragment: &str) {
        std::fs::write(&self.vertex, vertex).unwrap();
        std::fs::write(&self.fragment, fragment).unwrap();
    }
}

impl Drop for ShaderFiles {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.vertex);
        let _ = std::fs::remove_file(&self.fragment);
    }
}

fn mock_device() -> (Rc<MockDevice>, Rc<dyn GraphicsDevice>) {
    let mock = Rc::new(MockDevice::new());
    let device: Rc<dyn GraphicsDevice> = mock.clone();
    (mock, device)
}

struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn capture_logs() -> Arc<Mutex<Vec<LogEntry>>> {
    let entries = Arc::new(Mutex::new(Vec::new()));
    Engine::set_logger(CaptureLogger { entries: entries.clone() });
    entries
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_new_shader_is_empty() {
    let (mock, device) = mock_device();
    let shader = Shader::new(device);
    assert_eq!(shader.program(), None);
    assert_eq!(shader.program_id(), 0);
    assert!(!shader.is_in_use());
    assert_eq!(mock.live_object_count(), 0);
}

#[test]
fn test_load_from_files_success() {
    let files = ShaderFiles::new("load_ok", VS, FS);
    let (mock, device) = mock_device();

    let mut shader = Shader::new(device);
    shader.load_from_files(&files.vertex, &files.fragment).unwrap();

    let program = shader.program().expect("program after load");
    assert!(mock.program_link_status(program));
    assert_eq!(mock.attached_shader_count(program), 2);
    assert_eq!(mock.live_object_count(), 3);
    assert_eq!(shader.vertex_path(), files.vertex.as_path());
    assert_eq!(shader.fragment_path(), files.fragment.as_path());
}

#[test]
fn test_load_missing_file_fails() {
    let files = ShaderFiles::new("missing", VS, FS);
    let (mock, device) = mock_device();

    let mut shader = Shader::new(device);
    let result = shader.load_from_files(files.vertex.with_extension("nope"), &files.fragment);
    assert!(matches!(result, Err(Error::Io(_))));
    assert_eq!(shader.program(), None);
    assert_eq!(mock.call_count("create_shader"), 0);
}

#[test]
fn test_load_empty_file_fails() {
    let files = ShaderFiles::new("empty", VS, "");
    let (mock, device) = mock_device();

    let result = Shader::from_files(device, &files.vertex, &files.fragment);
    assert!(matches!(result, Err(Error::Io(_))));
    assert_eq!(mock.call_count("compile_shader"), 0);
}

#[test]
fn test_whitespace_only_source_reaches_compiler() {
    let files = ShaderFiles::new("blank", VS, "   \n");
    let (mock, device) = mock_device();

    let result = Shader::from_files(device, &files.vertex, &files.fragment);
    assert!(!matches!(result, Err(Error::Io(_))));
    assert_eq!(mock.call_count("compile_shader"), 2);
}

#[test]
fn test_compile_failure_returns_info_log() {
    let files = ShaderFiles::new("compile_err", VS, "COMPILE_ERROR");
    let (mock, device) = mock_device();

    let mut shader = Shader::new(device);
    match shader.load_from_files(&files.vertex, &files.fragment) {
        Err(Error::ShaderCompilation(log)) => assert!(log.contains("syntax error")),
        other => panic!("expected ShaderCompilation, got {:?}", other.err()),
    }
    // No program was created, the stages stay owned until drop
    assert_eq!(shader.program(), None);
    assert_eq!(mock.call_count("create_program"), 0);

    drop(shader);
    assert_eq!(mock.live_object_count(), 0);
}

#[test]
fn test_link_failure_returns_info_log() {
    let files = ShaderFiles::new("link_err", VS, "LINK_ERROR");
    let (mock, device) = mock_device();

    let mut shader = Shader::new(device);
    match shader.load_from_files(&files.vertex, &files.fragment) {
        Err(Error::ShaderLink(log)) => assert!(log.contains("LINK_ERROR")),
        other => panic!("expected ShaderLink, got {:?}", other.err()),
    }

    drop(shader);
    assert_eq!(mock.live_object_count(), 0);
}

#[test]
fn test_drop_releases_all_objects() {
    let files = ShaderFiles::new("drop", VS, FS);
    let (mock, device) = mock_device();

    {
        let _shader = Shader::from_files(device, &files.vertex, &files.fragment).unwrap();
        assert_eq!(mock.live_object_count(), 3);
    }

    assert_eq!(mock.live_object_count(), 0);
    assert_eq!(mock.call_count("delete_shader"), 2);
    assert_eq!(mock.call_count("delete_program"), 1);
}

// ============================================================================
// Reload
// ============================================================================

#[test]
fn test_reload_success_swaps_objects() {
    let files = ShaderFiles::new("reload_ok", VS, FS);
    let (mock, device) = mock_device();

    let mut shader = Shader::from_files(device, &files.vertex, &files.fragment).unwrap();
    let old_program = shader.program().unwrap();

    files.write(VS, &FS.replacen("uniform vec4 colour;", "uniform vec4 colour;\nuniform float extra;", 1));
    shader.reload().unwrap();

    let new_program = shader.program().unwrap();
    assert_ne!(old_program, new_program);
    assert!(mock.is_deleted(old_program.id()));
    assert!(!mock.is_deleted(new_program.id()));
    assert_eq!(mock.live_object_count(), 3);
    assert_eq!(mock.active_uniforms(new_program).len(), 4);
}

#[test]
fn test_reload_failure_keeps_previous_program() {
    let files = ShaderFiles::new("reload_err", VS, FS);
    let (mock, device) = mock_device();

    let mut shader = Shader::from_files(device, &files.vertex, &files.fragment).unwrap();
    shader.use_program();
    let old_program = shader.program().unwrap();

    files.write(VS, "COMPILE_ERROR");
    assert!(matches!(shader.reload(), Err(Error::ShaderCompilation(_))));

    // Same program, still bound, still usable
    assert_eq!(shader.program(), Some(old_program));
    assert!(shader.is_in_use());
    assert!(!mock.is_deleted(old_program.id()));

    // The failed attempt's objects were released
    assert_eq!(mock.live_object_count(), 3);
}

#[test]
fn test_reload_after_link_failure_releases_attempt() {
    let files = ShaderFiles::new("reload_link_err", VS, FS);
    let (mock, device) = mock_device();

    let mut shader = Shader::from_files(device, &files.vertex, &files.fragment).unwrap();
    let old_program = shader.program().unwrap();

    files.write(VS, "LINK_ERROR");
    assert!(matches!(shader.reload(), Err(Error::ShaderLink(_))));
    assert_eq!(shader.program(), Some(old_program));
    assert_eq!(mock.live_object_count(), 3);
}

#[test]
fn test_reload_recovers_failed_initial_load() {
    let files = ShaderFiles::new("recover", VS, "COMPILE_ERROR");
    let (mock, device) = mock_device();

    let mut shader = Shader::new(device);
    assert!(shader.load_from_files(&files.vertex, &files.fragment).is_err());

    files.write(VS, FS);
    shader.reload().unwrap();
    assert!(shader.program().is_some());
    assert_eq!(mock.live_object_count(), 3);
}

// ============================================================================
// Binding and uniforms
// ============================================================================

#[test]
fn test_use_program_and_is_in_use() {
    let files = ShaderFiles::new("use", VS, FS);
    let (mock, device) = mock_device();

    let a = Shader::from_files(device.clone(), &files.vertex, &files.fragment).unwrap();
    let b = Shader::from_files(device, &files.vertex, &files.fragment).unwrap();

    a.use_program();
    assert!(a.is_in_use());
    assert!(!b.is_in_use());

    b.use_program();
    assert!(!a.is_in_use());
    assert_eq!(mock.current_program.get(), b.program());
}

#[test]
fn test_set_uniform_uploads_when_in_use() {
    let files = ShaderFiles::new("uniform_ok", VS, FS);
    let (mock, device) = mock_device();

    let shader = Shader::from_files(device, &files.vertex, &files.fragment).unwrap();
    shader.use_program();
    shader.set_uniform("matrix", Mat4::translate(1.0, 0.0, 0.0));
    shader.set_uniform("colour", [1.0_f32, 0.5, 0.0, 1.0]);

    let uploads = mock.uniform_uploads.borrow();
    assert_eq!(uploads.len(), 2);
    assert_eq!(uploads[0].1, UniformValue::Mat4(Mat4::translate(1.0, 0.0, 0.0)));
    assert_eq!(uploads[1].1, UniformValue::Vec4([1.0, 0.5, 0.0, 1.0]));
}

#[test]
#[serial]
fn test_set_uniform_when_not_in_use_is_skipped() {
    let files = ShaderFiles::new("uniform_not_used", VS, FS);
    let (mock, device) = mock_device();
    let shader = Shader::from_files(device, &files.vertex, &files.fragment).unwrap();

    let logs = capture_logs();
    let locations_before = mock.call_count("uniform_location");
    shader.set_uniform("matrix", Mat4::IDENTITY);
    Engine::reset_logger();

    assert!(mock.uniform_uploads.borrow().is_empty());
    assert_eq!(mock.call_count("uniform_location"), locations_before);

    let logs = logs.lock().unwrap();
    assert!(logs.iter().any(|e| e.severity == LogSeverity::Error
        && e.message.contains("'matrix'")
        && e.message.contains("not in use")));
}

#[test]
#[serial]
fn test_missing_uniform_warns_and_skips() {
    let files = ShaderFiles::new("uniform_missing", VS, FS);
    let (mock, device) = mock_device();
    let shader = Shader::from_files(device, &files.vertex, &files.fragment).unwrap();
    shader.use_program();

    let logs = capture_logs();
    assert_eq!(shader.uniform_location("does_not_exist"), None);
    shader.set_uniform("does_not_exist", 1.0_f32);
    Engine::reset_logger();

    assert!(mock.uniform_uploads.borrow().is_empty());
    let warnings = logs
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.severity == LogSeverity::Warn && e.message.contains("does_not_exist"))
        .count();
    assert_eq!(warnings, 2);
}

// ============================================================================
// Validation and introspection
// ============================================================================

#[test]
fn test_validate() {
    let files = ShaderFiles::new("validate", VS, FS);
    let (_mock, device) = mock_device();

    let shader = Shader::from_files(device.clone(), &files.vertex, &files.fragment).unwrap();
    assert!(shader.validate());

    let empty = Shader::new(device);
    assert!(!empty.validate());
}

#[test]
#[serial]
fn test_print_all_lists_variables() {
    let files = ShaderFiles::new("print_all", VS, FS);
    let (_mock, device) = mock_device();
    let shader = Shader::from_files(device, &files.vertex, &files.fragment).unwrap();

    let logs = capture_logs();
    shader.print_all();
    Engine::reset_logger();

    let messages: Vec<String> = logs.lock().unwrap().iter().map(|e| e.message.clone()).collect();
    assert!(messages.iter().any(|m| m == "GL_LINK_STATUS = 1"));
    assert!(messages.iter().any(|m| m == "GL_ATTACHED_SHADERS = 2"));
    assert!(messages.iter().any(|m| m == "GL_ACTIVE_ATTRIBUTES = 1"));
    assert!(messages.iter().any(|m| m == "GL_ACTIVE_UNIFORMS = 3"));
    assert!(messages.iter().any(|m| m.contains("type:vec3 name:vertex_position location:0")));
    assert!(messages.iter().any(|m| m.contains("type:mat4 name:matrix location:0")));
    assert!(messages.iter().any(|m| m.contains("type:float name:weights[0]")));
    assert!(messages.iter().any(|m| m.contains("type:float name:weights[1]")));
    assert!(messages.iter().any(|m| m.starts_with("program info log for GL index")));
}
