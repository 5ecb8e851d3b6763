/// OpenGL error checking and context diagnostics
///
/// Two reporting paths exist. Contexts that expose `KHR_debug` (GL 4.3+)
/// get a debug message callback routed into the engine logger. Everywhere
/// else (macOS tops out at 4.1) errors are drained manually with
/// `glGetError` through [`check_and_clear_gl_errors`]. Both paths feed the
/// statistics printed by [`print_gl_error_report`].

use ace_engine::ace::log::LogSeverity;
use ace_engine::ace::Engine;
use ace_engine::{engine_info, engine_warn};
use colored::*;
use glow::HasContext;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

const LOG_SOURCE: &str = "ace::opengl";

/// Number of `glGetError` codes seen, keyed by symbolic name
static ERROR_COUNTS: Mutex<Option<FxHashMap<&'static str, u32>>> = Mutex::new(None);

/// Debug callback messages seen, by severity
static DEBUG_STATS: DebugStatsTracker = DebugStatsTracker::new();

// ===== STATISTICS =====

/// Snapshot of the error counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlErrorStats {
    /// `(error name, count)` sorted by name
    pub errors: Vec<(&'static str, u32)>,
    pub debug_high: u32,
    pub debug_medium: u32,
    pub debug_low: u32,
    pub debug_notification: u32,
}

impl GlErrorStats {
    /// Total `glGetError` codes drained
    pub fn total_errors(&self) -> u32 {
        self.errors.iter().map(|(_, count)| count).sum()
    }

    /// Total debug callback messages
    pub fn total_debug_messages(&self) -> u32 {
        self.debug_high + self.debug_medium + self.debug_low + self.debug_notification
    }
}

struct DebugStatsTracker {
    high: AtomicU32,
    medium: AtomicU32,
    low: AtomicU32,
    notification: AtomicU32,
}

impl DebugStatsTracker {
    const fn new() -> Self {
        Self {
            high: AtomicU32::new(0),
            medium: AtomicU32::new(0),
            low: AtomicU32::new(0),
            notification: AtomicU32::new(0),
        }
    }

    fn increment(&self, severity: u32) {
        let counter = match severity {
            glow::DEBUG_SEVERITY_HIGH => &self.high,
            glow::DEBUG_SEVERITY_MEDIUM => &self.medium,
            glow::DEBUG_SEVERITY_LOW => &self.low,
            _ => &self.notification,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn reset(&self) {
        self.high.store(0, Ordering::Relaxed);
        self.medium.store(0, Ordering::Relaxed);
        self.low.store(0, Ordering::Relaxed);
        self.notification.store(0, Ordering::Relaxed);
    }
}

fn record_error(name: &'static str) {
    if let Ok(mut guard) = ERROR_COUNTS.lock() {
        *guard.get_or_insert_with(FxHashMap::default).entry(name).or_insert(0) += 1;
    }
}

/// Current error statistics
pub fn get_gl_error_stats() -> GlErrorStats {
    let mut errors: Vec<(&'static str, u32)> = ERROR_COUNTS
        .lock()
        .ok()
        .and_then(|guard| guard.as_ref().map(|map| map.iter().map(|(k, v)| (*k, *v)).collect()))
        .unwrap_or_default();
    errors.sort_by(|a, b| a.0.cmp(b.0));

    GlErrorStats {
        errors,
        debug_high: DEBUG_STATS.high.load(Ordering::Relaxed),
        debug_medium: DEBUG_STATS.medium.load(Ordering::Relaxed),
        debug_low: DEBUG_STATS.low.load(Ordering::Relaxed),
        debug_notification: DEBUG_STATS.notification.load(Ordering::Relaxed),
    }
}

/// Clear all counters
pub fn reset_gl_error_stats() {
    if let Ok(mut guard) = ERROR_COUNTS.lock() {
        *guard = None;
    }
    DEBUG_STATS.reset();
}

/// Print the error statistics to stdout
pub fn print_gl_error_report() {
    let stats = get_gl_error_stats();

    if stats.total_errors() == 0 && stats.total_debug_messages() == 0 {
        println!("\n{}", "✓ No OpenGL errors".green().bold());
        return;
    }

    println!("\n{}", "=== OpenGL Error Report ===".bright_blue().bold());

    for (name, count) in &stats.errors {
        println!("  {} {}", format!("{}:", name).red().bold(), count);
    }
    if stats.debug_high > 0 {
        println!("  {} {}", "Debug (high):".red().bold(), stats.debug_high);
    }
    if stats.debug_medium > 0 {
        println!("  {} {}", "Debug (medium):".yellow().bold(), stats.debug_medium);
    }
    if stats.debug_low > 0 {
        println!("  {} {}", "Debug (low):".cyan(), stats.debug_low);
    }
    if stats.debug_notification > 0 {
        println!("  {} {}", "Debug (notification):".bright_black(), stats.debug_notification);
    }

    println!("{}\n", "===========================".bright_blue().bold());
}

// ===== ERROR NAMES =====

/// Symbolic name of a `glGetError` code
pub fn gl_error_string(error: u32) -> &'static str {
    match error {
        glow::NO_ERROR => "GL_NO_ERROR",
        glow::INVALID_ENUM => "GL_INVALID_ENUM",
        glow::INVALID_VALUE => "GL_INVALID_VALUE",
        glow::INVALID_OPERATION => "GL_INVALID_OPERATION",
        glow::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        glow::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        _ => "UNKNOWN_ERROR",
    }
}

/// Engine severity for a `KHR_debug` message severity
pub fn debug_severity(severity: u32) -> LogSeverity {
    match severity {
        glow::DEBUG_SEVERITY_HIGH => LogSeverity::Error,
        glow::DEBUG_SEVERITY_MEDIUM => LogSeverity::Warn,
        glow::DEBUG_SEVERITY_LOW => LogSeverity::Info,
        _ => LogSeverity::Debug,
    }
}

/// Readable name of a `KHR_debug` message type
pub fn debug_type_name(gltype: u32) -> &'static str {
    match gltype {
        glow::DEBUG_TYPE_ERROR => "Error",
        glow::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "Deprecated",
        glow::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "Undefined",
        glow::DEBUG_TYPE_PORTABILITY => "Portability",
        glow::DEBUG_TYPE_PERFORMANCE => "Performance",
        glow::DEBUG_TYPE_MARKER => "Marker",
        _ => "Other",
    }
}

// ===== ERROR CHECKING =====

/// Drain every pending `glGetError` code, logging each one.
///
/// `context` names the operation being checked. Returns `true` if at least
/// one error was pending.
pub fn check_and_clear_gl_errors(gl: &glow::Context, context: Option<&str>) -> bool {
    let mut has_error = false;

    loop {
        let error = unsafe { gl.get_error() };
        if error == glow::NO_ERROR {
            break;
        }
        has_error = true;

        let name = gl_error_string(error);
        record_error(name);

        let message = match context {
            Some(context) => format!("OpenGL Error in {}: {} (0x{:x})", context, name, error),
            None => format!("OpenGL Error: {} (0x{:x})", name, error),
        };
        Engine::log(LogSeverity::Error, LOG_SOURCE, message);
    }

    has_error
}

/// Install a debug message callback when the context supports `KHR_debug`.
///
/// Returns `false` when manual `glGetError` checking is the only option.
pub fn init_debug_output(gl: &mut glow::Context) -> bool {
    if !gl.supports_debug() {
        engine_info!(
            LOG_SOURCE,
            "OpenGL debug callback not available - using manual error checking"
        );
        return false;
    }

    unsafe {
        gl.enable(glow::DEBUG_OUTPUT);
        gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
        gl.debug_message_callback(|_source, gltype, id, severity, message| {
            DEBUG_STATS.increment(severity);
            Engine::log(
                debug_severity(severity),
                "ace::opengl::debug",
                format!("[{}] id {}: {}", debug_type_name(gltype), id, message),
            );
        });
    }

    engine_info!(LOG_SOURCE, "OpenGL debug output: ENABLED");
    true
}

// ===== CONTEXT PARAMETERS =====

/// Integer limits logged by [`log_gl_params`]
const INTEGER_PARAMS: [(u32, &str); 10] = [
    (glow::MAX_COMBINED_TEXTURE_IMAGE_UNITS, "GL_MAX_COMBINED_TEXTURE_IMAGE_UNITS"),
    (glow::MAX_CUBE_MAP_TEXTURE_SIZE, "GL_MAX_CUBE_MAP_TEXTURE_SIZE"),
    (glow::MAX_DRAW_BUFFERS, "GL_MAX_DRAW_BUFFERS"),
    (glow::MAX_FRAGMENT_UNIFORM_COMPONENTS, "GL_MAX_FRAGMENT_UNIFORM_COMPONENTS"),
    (glow::MAX_TEXTURE_IMAGE_UNITS, "GL_MAX_TEXTURE_IMAGE_UNITS"),
    (glow::MAX_TEXTURE_SIZE, "GL_MAX_TEXTURE_SIZE"),
    // Same enum value as the legacy GL_MAX_VARYING_FLOATS
    (glow::MAX_VARYING_COMPONENTS, "GL_MAX_VARYING_FLOATS"),
    (glow::MAX_VERTEX_ATTRIBS, "GL_MAX_VERTEX_ATTRIBS"),
    (glow::MAX_VERTEX_TEXTURE_IMAGE_UNITS, "GL_MAX_VERTEX_TEXTURE_IMAGE_UNITS"),
    (glow::MAX_VERTEX_UNIFORM_COMPONENTS, "GL_MAX_VERTEX_UNIFORM_COMPONENTS"),
];

/// Log the context limits into the engine log
pub fn log_gl_params(gl: &glow::Context) {
    engine_info!(LOG_SOURCE, "GL Context Params:");

    for (param, name) in INTEGER_PARAMS {
        let value = unsafe { gl.get_parameter_i32(param) };
        engine_info!(LOG_SOURCE, "{} {}", name, value);
    }

    let mut dims = [0i32; 2];
    unsafe { gl.get_parameter_i32_slice(glow::MAX_VIEWPORT_DIMS, &mut dims) };
    engine_info!(LOG_SOURCE, "GL_MAX_VIEWPORT_DIMS {} {}", dims[0], dims[1]);

    let stereo = unsafe { gl.get_parameter_i32(glow::STEREO) } != 0;
    engine_info!(LOG_SOURCE, "GL_STEREO {}", stereo as i32);
    engine_info!(LOG_SOURCE, "-----------------------------");

    // Some drivers flag STEREO as invalid on core profiles
    if check_and_clear_gl_errors(gl, Some("log_gl_params")) {
        engine_warn!(LOG_SOURCE, "Some context parameters could not be queried");
    }
}

#[cfg(test)]
#[path = "gl_debug_tests.rs"]
mod tests;
