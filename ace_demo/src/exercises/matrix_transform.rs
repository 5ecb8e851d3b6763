//! Exercise 3: a triangle that bounces, spins and pulses.
//!
//! The model matrix is `Translate · RotateZ · Scale`, uploaded to the
//! `matrix` uniform every frame.

use ace_engine::ace::graphics::{BufferUsage, ClearMask, Shader};
use ace_engine::ace::math::Mat4;
use ace_engine::{engine_error, engine_info};
use ace_engine_renderer_opengl::ace::OpenGlEngine;
use anyhow::{Context, Result};

use super::common::{advance_angle, reload_shaders_on_key, shader_path, FrameLoop, GpuMesh};
use super::vertex_colors::{COLOURS, POINTS};

const LOG_SOURCE: &str = "ace::Exercise3";

/// Degrees per second around Z
pub const ROTATION_SPEED: f32 = 50.0;

/// Animation state of the triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    /// X offset
    pub position: f32,
    /// Units per second, sign flips at the bounce
    pub speed: f32,
    pub rotation_deg: f32,
    /// Seconds fed to the scale pulse
    pub scale_time: f32,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            position: 0.0,
            speed: 1.0,
            rotation_deg: 0.0,
            scale_time: 0.0,
        }
    }
}

impl Animation {
    pub fn update(&mut self, dt: f32) {
        // Bounce once the triangle has overshot ±1
        if self.position.abs() > 1.0 {
            self.speed = -self.speed;
        }
        self.position += dt * self.speed;

        self.rotation_deg = advance_angle(self.rotation_deg, ROTATION_SPEED, dt);
        self.scale_time += dt;
    }

    /// Uniform scale, oscillating between 0.5 and 1.0
    pub fn scale_factor(&self) -> f32 {
        0.5 + 0.25 * (1.0 + (self.scale_time * 2.0).sin())
    }

    pub fn model_matrix(&self) -> Mat4 {
        let s = self.scale_factor();
        Mat4::translate(self.position, 0.0, 0.0)
            * Mat4::rotate_z(self.rotation_deg)
            * Mat4::scale(s, s, 1.0)
    }
}

pub fn run(engine: &mut OpenGlEngine) -> Result<()> {
    engine_info!(LOG_SOURCE, "Running Exercise 3 - Matrix Transformations");

    let device = engine.graphics_device()?;
    device.set_depth_test(true);

    let mut mesh = GpuMesh::new(device.clone(), 3)?;
    mesh.add_attribute(0, 3, &POINTS, BufferUsage::Static)?;
    mesh.add_attribute(1, 3, &COLOURS, BufferUsage::Static)?;

    engine_info!(LOG_SOURCE, "Loading shaders");
    let mut shader = Shader::from_files(
        device.clone(),
        shader_path("exercise3", "vertex.glsl"),
        shader_path("exercise3", "fragment.glsl"),
    )
    .context("Failed to load shader")?;

    shader.use_program();
    match shader.uniform_location("matrix") {
        Some(location) => {
            engine_info!(LOG_SOURCE, "Matrix uniform location: {}", location.0);
            println!("Matrix uniform location: {}", location.0);
        }
        None => engine_error!(LOG_SOURCE, "ERROR: Could not find 'matrix' uniform!"),
    }

    device.clear_color(0.0, 0.0, 0.0, 1.0);

    println!("\n=== Matrix Transformations Demo ===");
    println!("Triangle: Translate + Rotate + Scale");
    println!("Watch it move, spin, and pulse!");
    println!("Press ESC to exit");

    let mut animation = Animation::default();

    engine_info!(LOG_SOURCE, "Entering render loop");
    let mut frame = FrameLoop::new(engine);
    while let Some(dt) = frame.begin_frame(engine) {
        reload_shaders_on_key(engine, &mut [&mut shader]);
        animation.update(dt);

        device.clear(ClearMask::COLOR | ClearMask::DEPTH);
        shader.use_program();
        shader.set_uniform("matrix", animation.model_matrix());
        mesh.draw();

        frame.end_frame(engine)?;
    }

    engine_info!(LOG_SOURCE, "Exercise 3 completed");
    Ok(())
}

#[cfg(test)]
#[path = "matrix_transform_tests.rs"]
mod tests;
