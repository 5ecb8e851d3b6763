//! Exercise 6: a textured triangle rotating about Y.

use ace_engine::ace::graphics::{BufferUsage, ClearMask, Shader, Texture};
use ace_engine::ace::math::Mat4;
use ace_engine::ace::platform::KeyCode;
use ace_engine::engine_info;
use ace_engine_renderer_opengl::ace::OpenGlEngine;
use anyhow::{bail, Context, Result};

use super::common::{
    advance_angle, asset_path, on_off, reload_shaders_on_key, shader_path, toggle_on_key,
    FrameLoop, GpuMesh,
};
use super::phong_lighting::{model_matrix, ROTATION_SPEED};

const LOG_SOURCE: &str = "ace::Exercise6";

pub const TEXTURE_FILE: &str = "textures/test_texture.png";

/// Uniforms the shader must expose before anything is drawn
pub const REQUIRED_UNIFORMS: [&str; 4] = ["model", "view", "proj", "basic_texture"];

#[rustfmt::skip]
pub const POINTS: [f32; 9] = [
     0.0,  0.5, 0.0,
     0.5, -0.5, 0.0,
    -0.5, -0.5, 0.0,
];

#[rustfmt::skip]
pub const TEXCOORDS: [f32; 6] = [
    0.5, 1.0,
    1.0, 0.0,
    0.0, 0.0,
];

/// Names from `REQUIRED_UNIFORMS` for which `has_uniform` is false
pub fn missing_uniforms(has_uniform: impl Fn(&str) -> bool) -> Vec<&'static str> {
    REQUIRED_UNIFORMS
        .iter()
        .copied()
        .filter(|name| !has_uniform(*name))
        .collect()
}

pub fn run(engine: &mut OpenGlEngine) -> Result<()> {
    engine_info!(LOG_SOURCE, "Running Exercise 6 - Texture Mapping");

    let device = engine.graphics_device()?;
    device.set_depth_test(true);

    println!("\nVertex data:");
    for (point, uv) in POINTS.chunks(3).zip(TEXCOORDS.chunks(2)) {
        println!(
            "  ({}, {}, {}) -> UV ({}, {})",
            point[0], point[1], point[2], uv[0], uv[1]
        );
    }

    let mut mesh = GpuMesh::new(device.clone(), 3)?;
    mesh.add_attribute(0, 3, &POINTS, BufferUsage::Static)?;
    mesh.add_attribute(1, 2, &TEXCOORDS, BufferUsage::Static)?;

    let texture_path = asset_path(TEXTURE_FILE);
    let texture = Texture::from_file(device.clone(), &texture_path).with_context(|| {
        format!("Failed to load texture, make sure '{}' exists", texture_path.display())
    })?;

    let mut shader = Shader::from_files(
        device.clone(),
        shader_path("exercise6", "vertex.glsl"),
        shader_path("exercise6", "fragment.glsl"),
    )
    .context("Failed to load shader")?;

    shader.use_program();
    let missing = missing_uniforms(|name| shader.uniform_location(name).is_some());
    if !missing.is_empty() {
        bail!("One or more uniforms not found in shader: {}", missing.join(", "));
    }

    device.clear_color(0.2, 0.2, 0.2, 1.0);

    println!("\n=== Exercise 6 - Texture Mapping ===");
    println!("\nControls:");
    println!("  SPACE - Toggle rotation");
    println!("  P - Take screenshot");
    println!("  ESC - Exit");

    let mut rotation_deg = 0.0;
    let mut rotating = true;

    let mut frame = FrameLoop::new(engine);
    while let Some(dt) = frame.begin_frame(engine) {
        reload_shaders_on_key(engine, &mut [&mut shader]);

        if let Some(enabled) = toggle_on_key(engine, KeyCode::Space, &mut rotating) {
            println!("Rotation: {}", on_off(enabled));
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
        shader.set_uniform("basic_texture", 0);
        texture.bind(0);
        mesh.draw();

        frame.end_frame(engine)?;
    }

    engine_info!(LOG_SOURCE, "Exercise 6 completed");
    Ok(())
}

#[cfg(test)]
#[path = "texture_mapping_tests.rs"]
mod tests;
