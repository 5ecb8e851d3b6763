//! Per-frame plumbing shared by every exercise: frame timing and the FPS
//! title, the ESC/P/R keys, shader and asset paths, and an owned mesh.

use std::path::PathBuf;
use std::rc::Rc;

use ace_engine::ace::graphics::{
    BufferHandle, BufferUsage, GraphicsDevice, PrimitiveTopology, Shader, VertexArrayHandle,
    VertexAttribute,
};
use ace_engine::ace::platform::{FpsCounter, FrameClock, KeyCode};
use ace_engine::{engine_info, engine_warn};
use ace_engine_renderer_opengl::ace::OpenGlEngine;
use anyhow::Result;

const LOG_SOURCE: &str = "ace::Demo";

// ===== PATHS =====

/// `shaders/exercises/<exercise>/<file>` inside this crate
pub fn shader_path(exercise: &str, file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("shaders")
        .join("exercises")
        .join(exercise)
        .join(file)
}

/// `assets/<relative>` inside this crate
pub fn asset_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets").join(relative)
}

// ===== FRAME LOOP =====

/// Frame timing and the keys every exercise shares
pub struct FrameLoop {
    fps: FpsCounter,
    clock: FrameClock,
}

impl FrameLoop {
    pub fn new(engine: &OpenGlEngine) -> Self {
        Self {
            fps: FpsCounter::new(engine.window_state().title.clone()),
            clock: FrameClock::new(engine.elapsed_seconds()),
        }
    }

    /// Start a frame.
    ///
    /// Updates the FPS title, closes on ESC and saves a screenshot on P.
    /// Returns the frame delta in seconds, or `None` once the window must close.
    pub fn begin_frame(&mut self, engine: &mut OpenGlEngine) -> Option<f32> {
        if engine.should_close() {
            return None;
        }

        let now = engine.elapsed_seconds();
        if let Some(title) = self.fps.tick(now) {
            engine.set_title(&title);
        }
        let dt = self.clock.tick(now);

        if engine.input().is_key_down(KeyCode::Escape) {
            engine.set_should_close(true);
            return None;
        }

        if engine.input().was_key_pressed(KeyCode::KeyP) {
            if let Err(e) = engine.take_screenshot(None) {
                engine_warn!(LOG_SOURCE, "Screenshot failed: {}", e);
            }
        }

        Some(dt)
    }

    /// Present the frame and collect the next batch of events
    pub fn end_frame(&mut self, engine: &mut OpenGlEngine) -> Result<()> {
        engine.swap_buffers()?;
        engine.poll_events();
        Ok(())
    }
}

/// Reload `shaders` from disk when R went down this frame.
///
/// A shader that fails to reload keeps its previous program. Returns `true`
/// when a reload was attempted, so the caller can re-bind and re-upload.
pub fn reload_shaders_on_key(engine: &OpenGlEngine, shaders: &mut [&mut Shader]) -> bool {
    if !engine.input().was_key_pressed(KeyCode::KeyR) {
        return false;
    }

    println!("\n=== Reloading Shaders ===");
    engine_info!(LOG_SOURCE, "=== Reloading Shaders ===");

    for shader in shaders.iter_mut() {
        // The failure is already logged with the compiler output
        let _ = shader.reload();
    }
    true
}

/// Flip `flag` on a fresh press of `key`, returning the new value if it changed
pub fn toggle_on_key(engine: &OpenGlEngine, key: KeyCode, flag: &mut bool) -> Option<bool> {
    if engine.input().was_key_pressed(key) {
        *flag = !*flag;
        Some(*flag)
    } else {
        None
    }
}

pub fn on_off(flag: bool) -> &'static str {
    if flag { "ON" } else { "OFF" }
}

/// Advance an angle in degrees, wrapping once it passes a full turn
pub fn advance_angle(angle_deg: f32, degrees_per_second: f32, dt: f32) -> f32 {
    let angle = angle_deg + degrees_per_second * dt;
    if angle > 360.0 { angle - 360.0 } else { angle }
}

// ===== MESH =====

/// A vertex array plus the float buffers feeding it, released on drop
pub struct GpuMesh {
    device: Rc<dyn GraphicsDevice>,
    vertex_array: VertexArrayHandle,
    buffers: Vec<BufferHandle>,
    vertex_count: i32,
}

impl GpuMesh {
    pub fn new(device: Rc<dyn GraphicsDevice>, vertex_count: usize) -> Result<Self> {
        let vertex_array = device.create_vertex_array()?;
        Ok(Self {
            device,
            vertex_array,
            buffers: Vec::new(),
            vertex_count: vertex_count as i32,
        })
    }

    /// Upload `data` to a new buffer and feed it to `location`,
    /// `components` floats per vertex
    pub fn add_attribute(
        &mut self,
        location: u32,
        components: i32,
        data: &[f32],
        usage: BufferUsage,
    ) -> Result<BufferHandle> {
        let buffer = self.device.create_buffer(bytemuck::cast_slice(data), usage)?;
        self.buffers.push(buffer);

        self.device.bind_vertex_array(Some(self.vertex_array));
        self.device.vertex_attribute(buffer, VertexAttribute::packed(location, components));
        Ok(buffer)
    }

    /// Overwrite the start of `buffer` with `data`
    pub fn update(&self, buffer: BufferHandle, data: &[f32]) {
        self.device.update_buffer(buffer, 0, bytemuck::cast_slice(data));
    }

    pub fn draw(&self) {
        self.device.bind_vertex_array(Some(self.vertex_array));
        self.device.draw_arrays(PrimitiveTopology::Triangles, 0, self.vertex_count);
    }
}

impl Drop for GpuMesh {
    fn drop(&mut self) {
        self.device.delete_vertex_array(self.vertex_array);
        for buffer in self.buffers.drain(..) {
            self.device.delete_buffer(buffer);
        }
    }
}

#[cfg(test)]
#[path = "common_tests.rs"]
mod tests;
