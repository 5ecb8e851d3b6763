//! Exercise 5: a double-sided triangle lit with Phong or Blinn-Phong.

use ace_engine::ace::graphics::{BufferUsage, ClearMask, Shader};
use ace_engine::ace::math::Mat4;
use ace_engine::ace::platform::KeyCode;
use ace_engine::engine_info;
use ace_engine_renderer_opengl::ace::OpenGlEngine;
use anyhow::{Context, Result};

use super::common::{
    advance_angle, on_off, reload_shaders_on_key, shader_path, toggle_on_key, FrameLoop, GpuMesh,
};

const LOG_SOURCE: &str = "ace::Exercise5";

pub const ROTATION_SPEED: f32 = 30.0;
pub const SPECULAR_MIN: f32 = 1.0;
pub const SPECULAR_MAX: f32 = 1000.0;
pub const SPECULAR_INITIAL: f32 = 100.0;
/// Exponent change per second while UP or DOWN is held
pub const SPECULAR_RATE: f32 = 100.0;
/// Minimum seconds between two "Specular exponent" lines
pub const SPECULAR_PRINT_INTERVAL: f64 = 0.2;

/// Front face wound counter-clockwise, then the same corners reversed
#[rustfmt::skip]
pub const POINTS: [f32; 18] = [
     0.0,  0.5, 0.0,
     0.5, -0.5, 0.0,
    -0.5, -0.5, 0.0,
     0.0,  0.5, 0.0,
    -0.5, -0.5, 0.0,
     0.5, -0.5, 0.0,
];

#[rustfmt::skip]
pub const NORMALS: [f32; 18] = [
    0.0, 0.0,  1.0,
    0.0, 0.0,  1.0,
    0.0, 0.0,  1.0,
    0.0, 0.0, -1.0,
    0.0, 0.0, -1.0,
    0.0, 0.0, -1.0,
];

/// Apply one frame of UP/DOWN to the exponent, clamped to 1..1000.
///
/// `direction` is +1 for UP, -1 for DOWN, 0 for neither (or both).
pub fn adjust_specular(exponent: f32, direction: f32, dt: f32) -> f32 {
    (exponent + direction * SPECULAR_RATE * dt).clamp(SPECULAR_MIN, SPECULAR_MAX)
}

pub fn mode_name(use_blinn: bool) -> &'static str {
    if use_blinn { "BLINN-PHONG" } else { "PHONG" }
}

pub fn model_matrix(rotation_deg: f32) -> Mat4 {
    Mat4::translate(0.0, 0.0, -5.0) * Mat4::rotate_y(rotation_deg)
}

pub fn run(engine: &mut OpenGlEngine) -> Result<()> {
    engine_info!(LOG_SOURCE, "Running Exercise 5 - Phong vs Blinn-Phong (Double-Sided)");

    let device = engine.graphics_device()?;
    device.set_depth_test(true);
    device.set_culling(None);

    let mut mesh = GpuMesh::new(device.clone(), POINTS.len() / 3)?;
    mesh.add_attribute(0, 3, &POINTS, BufferUsage::Static)?;
    mesh.add_attribute(1, 3, &NORMALS, BufferUsage::Static)?;

    let mut shader = Shader::from_files(
        device.clone(),
        shader_path("exercise5", "vertex.glsl"),
        shader_path("exercise5", "fragment.glsl"),
    )
    .context("Failed to load shader")?;

    shader.use_program();
    println!("Uniform locations:");
    for name in ["model", "view", "proj", "specular_exponent", "use_blinn"] {
        match shader.uniform_location(name) {
            Some(location) => println!("  {}: {}", name, location.0),
            None => println!("  {}: -1", name),
        }
    }

    device.clear_color(0.1, 0.1, 0.1, 1.0);

    println!("\n=== Exercise 5 - Double-Sided Phong Lighting ===");
    println!("Both sides of the triangle carry their own normals");
    println!("\nControls:");
    println!("  B - Toggle Blinn-Phong / Phong");
    println!("  SPACE - Toggle rotation");
    println!("  UP/DOWN - Adjust specular exponent");
    println!("  ESC - Exit");

    let mut rotation_deg = 0.0;
    let mut rotating = true;
    let mut specular_exponent = SPECULAR_INITIAL;
    let mut use_blinn = false;
    let mut last_exponent_print = 0.0;

    println!("\nCurrent mode: PHONG (classic)");
    println!("Specular exponent: {}", specular_exponent as i32);

    let mut frame = FrameLoop::new(engine);
    while let Some(dt) = frame.begin_frame(engine) {
        reload_shaders_on_key(engine, &mut [&mut shader]);

        if let Some(blinn) = toggle_on_key(engine, KeyCode::KeyB, &mut use_blinn) {
            println!("\n=== Switched to {} ===", mode_name(blinn));
            if blinn {
                println!("Using half-way vector");
            } else {
                println!("Using reflection vector (classic Phong)");
            }
        }

        if let Some(enabled) = toggle_on_key(engine, KeyCode::Space, &mut rotating) {
            println!("Rotation: {}", on_off(enabled));
        }

        let input = engine.input();
        let mut direction = 0.0;
        if input.is_key_down(KeyCode::ArrowUp) {
            direction += 1.0;
        }
        if input.is_key_down(KeyCode::ArrowDown) {
            direction -= 1.0;
        }
        let exponent_held = input.is_key_down(KeyCode::ArrowUp) || input.is_key_down(KeyCode::ArrowDown);
        if exponent_held {
            specular_exponent = adjust_specular(specular_exponent, direction, dt);
            let now = engine.elapsed_seconds();
            if now - last_exponent_print > SPECULAR_PRINT_INTERVAL {
                println!("Specular exponent: {}", specular_exponent as i32);
                last_exponent_print = now;
            }
        }

        if rotating {
            rotation_deg = advance_angle(rotation_deg, ROTATION_SPEED, dt);
        }

        let proj = Mat4::perspective(67.0, engine.window_state().aspect_ratio(), 0.1, 100.0);

        device.clear(ClearMask::COLOR | ClearMask::DEPTH);
        shader.use_program();
        shader.set_uniform("model", model_matrix(rotation_deg));
        shader.set_uniform("view", Mat4::identity());
        shader.set_uniform("proj", proj);
        shader.set_uniform("specular_exponent", specular_exponent);
        shader.set_uniform("use_blinn", use_blinn);
        mesh.draw();

        frame.end_frame(engine)?;
    }

    engine_info!(LOG_SOURCE, "Exercise 5 completed");
    Ok(())
}

#[cfg(test)]
#[path = "phong_lighting_tests.rs"]
mod tests;
