//! Exercise 1: a square and a triangle, each drawn with its own program.
//! Both programs share the vertex shader; R reloads them from disk.

use ace_engine::ace::graphics::{BufferUsage, ClearMask, Shader};
use ace_engine::{engine_error, engine_info};
use ace_engine_renderer_opengl::ace::OpenGlEngine;
use anyhow::{Context, Result};

use super::common::{reload_shaders_on_key, shader_path, FrameLoop, GpuMesh};

const LOG_SOURCE: &str = "ace::Exercise1";

/// Two triangles forming a square centred on the origin
#[rustfmt::skip]
pub const SQUARE_POINTS: [f32; 18] = [
    -0.5,  0.5, 0.0,
     0.5,  0.5, 0.0,
    -0.5, -0.5, 0.0,
     0.5,  0.5, 0.0,
     0.5, -0.5, 0.0,
    -0.5, -0.5, 0.0,
];

#[rustfmt::skip]
pub const TRIANGLE_POINTS: [f32; 9] = [
    0.2,  0.5, 0.0,
    0.8,  0.5, 0.0,
    0.5, -0.5, 0.0,
];

fn load_checked(engine: &OpenGlEngine, fragment: &str, label: &str) -> Result<Shader> {
    let shader = Shader::from_files(
        engine.graphics_device()?,
        shader_path("exercise1", "test.vert"),
        shader_path("exercise1", fragment),
    )
    .with_context(|| format!("Failed to load {label} shader"))?;

    shader.print_all();
    if !shader.validate() {
        engine_error!(LOG_SOURCE, "{} shader validation failed", label);
    }
    Ok(shader)
}

pub fn run(engine: &mut OpenGlEngine) -> Result<()> {
    engine_info!(LOG_SOURCE, "Running Exercise 1");

    let device = engine.graphics_device()?;
    device.set_depth_test(true);
    engine_info!(LOG_SOURCE, "Depth testing enabled");

    engine_info!(LOG_SOURCE, "Creating VBOs and VAOs");
    let mut square = GpuMesh::new(device.clone(), SQUARE_POINTS.len() / 3)?;
    square.add_attribute(0, 3, &SQUARE_POINTS, BufferUsage::Static)?;
    let mut triangle = GpuMesh::new(device.clone(), TRIANGLE_POINTS.len() / 3)?;
    triangle.add_attribute(0, 3, &TRIANGLE_POINTS, BufferUsage::Static)?;

    let mut purple = load_checked(engine, "test.frag", "first")?;
    let mut orange = load_checked(engine, "test2.frag", "second")?;

    device.clear_color(0.6, 0.6, 0.8, 1.0);

    println!("\nControls:");
    println!("  R - Reload shaders");
    println!("  P - Take screenshot");
    println!("  ESC - Exit");

    engine_info!(LOG_SOURCE, "Entering render loop");
    let mut frame = FrameLoop::new(engine);
    while frame.begin_frame(engine).is_some() {
        reload_shaders_on_key(engine, &mut [&mut purple, &mut orange]);

        device.clear(ClearMask::COLOR | ClearMask::DEPTH);

        purple.use_program();
        square.draw();

        orange.use_program();
        triangle.draw();

        frame.end_frame(engine)?;
    }

    engine_info!(LOG_SOURCE, "Exercise 1 completed");
    Ok(())
}
