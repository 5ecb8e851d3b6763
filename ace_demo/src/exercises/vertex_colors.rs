//! Exercise 2: one triangle with a colour per vertex, back faces culled.

use ace_engine::ace::graphics::{BufferUsage, ClearMask, FrontFace, Shader};
use ace_engine::{engine_error, engine_info};
use ace_engine_renderer_opengl::ace::OpenGlEngine;
use anyhow::{Context, Result};

use super::common::{reload_shaders_on_key, shader_path, FrameLoop, GpuMesh};

const LOG_SOURCE: &str = "ace::Exercise2";

/// Listed clockwise, which is the front face in this exercise
#[rustfmt::skip]
pub const POINTS: [f32; 9] = [
     0.0,  0.5, 0.0,
     0.5, -0.5, 0.0,
    -0.5, -0.5, 0.0,
];

#[rustfmt::skip]
pub const COLOURS: [f32; 9] = [
    1.0, 0.0, 0.0,
    0.0, 1.0, 0.0,
    0.0, 0.0, 1.0,
];

pub fn run(engine: &mut OpenGlEngine) -> Result<()> {
    engine_info!(LOG_SOURCE, "Running Exercise 2 - Vertex Colors");

    let device = engine.graphics_device()?;
    device.set_depth_test(true);
    device.set_culling(Some(FrontFace::Clockwise));

    engine_info!(LOG_SOURCE, "Creating VBOs and VAO");
    let mut mesh = GpuMesh::new(device.clone(), 3)?;
    mesh.add_attribute(0, 3, &POINTS, BufferUsage::Static)?;
    mesh.add_attribute(1, 3, &COLOURS, BufferUsage::Static)?;

    let mut shader = Shader::from_files(
        device.clone(),
        shader_path("exercise2", "vertex.glsl"),
        shader_path("exercise2", "fragment.glsl"),
    )
    .context("Failed to load shader")?;
    shader.print_all();
    if !shader.validate() {
        engine_error!(LOG_SOURCE, "Shader validation failed");
    }

    device.clear_color(0.2, 0.2, 0.2, 1.0);

    engine_info!(LOG_SOURCE, "Entering render loop");
    let mut frame = FrameLoop::new(engine);
    while frame.begin_frame(engine).is_some() {
        reload_shaders_on_key(engine, &mut [&mut shader]);

        device.clear(ClearMask::COLOR | ClearMask::DEPTH);
        shader.use_program();
        mesh.draw();

        frame.end_frame(engine)?;
    }

    device.set_culling(None);
    engine_info!(LOG_SOURCE, "Exercise 2 completed");
    Ok(())
}
