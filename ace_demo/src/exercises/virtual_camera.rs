//! Exercise 4: fly through a field of triangles, optionally frustum-culled.
//!
//! Every triangle is drawn from the same two dynamic buffers, rewritten with
//! the triangle's world-space corners and flat colour before each draw call.

use ace_engine::ace::graphics::{BufferUsage, ClearMask, Shader};
use ace_engine::ace::math::{Frustum, Mat4, Vec3};
use ace_engine::ace::platform::KeyCode;
use ace_engine::ace::FlyCamera;
use ace_engine::engine_info;
use ace_engine_renderer_opengl::ace::OpenGlEngine;
use anyhow::{Context, Result};

use super::common::{on_off, reload_shaders_on_key, shader_path, toggle_on_key, FrameLoop, GpuMesh};

const LOG_SOURCE: &str = "ace::Exercise4";

/// Radius of the sphere bounding one scene triangle
pub const BOUNDING_RADIUS: f32 = 2.0;

/// Seconds between two statistics lines
pub const STATS_INTERVAL: f64 = 1.0;

pub const FOV_Y_DEG: f32 = 67.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 100.0;

/// Triangle template centred on the origin
#[rustfmt::skip]
pub const BASE_POINTS: [f32; 9] = [
     0.0,  1.0, 0.0,
     1.0, -1.0, 0.0,
    -1.0, -1.0, 0.0,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneTriangle {
    pub position: Vec3,
    pub colour: [f32; 3],
}

impl SceneTriangle {
    /// World-space corners followed by the per-vertex colours
    pub fn vertex_data(&self) -> ([f32; 9], [f32; 9]) {
        let mut points = BASE_POINTS;
        let mut colours = [0.0; 9];
        for vertex in 0..3 {
            for axis in 0..3 {
                points[vertex * 3 + axis] += self.position[axis];
                colours[vertex * 3 + axis] = self.colour[axis];
            }
        }
        (points, colours)
    }
}

/// One red triangle in front of the camera, then a grid running from
/// x = -15..15 and z = -10..-50 in steps of 5, tinted by position
pub fn build_scene() -> Vec<SceneTriangle> {
    let mut scene = vec![SceneTriangle {
        position: Vec3::new(0.0, 0.0, -5.0),
        colour: [1.0, 0.0, 0.0],
    }];

    for x in (-15..=15).step_by(5) {
        for z in (10..=50).step_by(5).map(|depth: i32| -depth) {
            let r = (x + 15) as f32 / 30.0;
            let b = (-z - 10) as f32 / 40.0;
            scene.push(SceneTriangle {
                position: Vec3::new(x as f32, 0.0, z as f32),
                colour: [r, 0.5, b],
            });
        }
    }
    scene
}

/// Triangles to draw this frame; all of them when `frustum` is `None`
pub fn visible_triangles<'a>(
    scene: &'a [SceneTriangle],
    frustum: Option<&'a Frustum>,
) -> impl Iterator<Item = &'a SceneTriangle> + 'a {
    scene.iter().filter(move |triangle| {
        frustum.map_or(true, |f| f.sphere_in_frustum(triangle.position, BOUNDING_RADIUS))
    })
}

pub fn stats_message(drawn: usize, total: usize, culling: bool) -> String {
    let percent = if total > 0 { drawn * 100 / total } else { 0 };
    format!(
        "Drawing {} / {} ({}%) - Culling: {}",
        drawn,
        total,
        percent,
        on_off(culling)
    )
}

pub fn run(engine: &mut OpenGlEngine) -> Result<()> {
    engine_info!(LOG_SOURCE, "Running Exercise 4 - Virtual Camera with Frustum Culling");

    let device = engine.graphics_device()?;
    device.set_depth_test(true);

    let scene = build_scene();
    println!("Created {} triangles in the scene", scene.len());

    let (points, colours) = scene[0].vertex_data();
    let mut mesh = GpuMesh::new(device.clone(), 3)?;
    let points_buffer = mesh.add_attribute(0, 3, &points, BufferUsage::Dynamic)?;
    let colours_buffer = mesh.add_attribute(1, 3, &colours, BufferUsage::Dynamic)?;

    let mut shader = Shader::from_files(
        device.clone(),
        shader_path("exercise4", "vertex.glsl"),
        shader_path("exercise4", "fragment.glsl"),
    )
    .context("Failed to load shader")?;

    shader.use_program();
    let view_found = shader.uniform_location("view").is_some();
    let proj_found = shader.uniform_location("proj").is_some();
    engine_info!(LOG_SOURCE, "view uniform: {}, proj uniform: {}", view_found, proj_found);

    device.clear_color(0.2, 0.2, 0.2, 1.0);

    let mut camera = FlyCamera::default();
    let mut culling = false;

    println!("\n=== CONTROLS ===");
    println!("RIGHT CLICK + DRAG - Look around");
    println!("RIGHT CLICK + WASD - Move");
    println!("RIGHT CLICK + Q/E - Up/Down");
    println!("MIDDLE CLICK + DRAG - Pan");
    println!("C - Toggle frustum culling (starts OFF)");
    println!("ESC - Exit");

    let mut last_stats = 0.0;
    let mut frame = FrameLoop::new(engine);
    while let Some(dt) = frame.begin_frame(engine) {
        reload_shaders_on_key(engine, &mut [&mut shader]);

        if let Some(enabled) = toggle_on_key(engine, KeyCode::KeyC, &mut culling) {
            println!("\nFrustum culling: {}", on_off(enabled));
        }

        camera.update(engine.input(), dt);

        // Aspect follows the framebuffer so resizes keep proportions
        let proj = Mat4::perspective(FOV_Y_DEG, engine.window_state().aspect_ratio(), NEAR, FAR);
        let view = camera.view_matrix();
        let frustum = Frustum::from_proj_view(&(proj * view));

        device.clear(ClearMask::COLOR | ClearMask::DEPTH);
        shader.use_program();
        shader.set_uniform("view", view);
        shader.set_uniform("proj", proj);

        let mut drawn = 0;
        for triangle in visible_triangles(&scene, culling.then_some(&frustum)) {
            let (points, colours) = triangle.vertex_data();
            mesh.update(points_buffer, &points);
            mesh.update(colours_buffer, &colours);
            mesh.draw();
            drawn += 1;
        }

        let now = engine.elapsed_seconds();
        if now - last_stats > STATS_INTERVAL {
            println!("{}", stats_message(drawn, scene.len(), culling));
            last_stats = now;
        }

        frame.end_frame(engine)?;
    }

    engine_info!(LOG_SOURCE, "Exercise 4 completed");
    Ok(())
}

#[cfg(test)]
#[path = "virtual_camera_tests.rs"]
mod tests;
