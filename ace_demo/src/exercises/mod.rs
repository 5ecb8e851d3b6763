//! Exercise registry.
//!
//! Entries are listed in no particular order; the menu shows them sorted by
//! name, and the names carry their number.

use ace_engine_renderer_opengl::ace::OpenGlEngine;
use anyhow::Result;

pub mod common;
pub mod hello_triangle;
pub mod matrix_transform;
pub mod phong_lighting;
pub mod texture_mapping;
pub mod vertex_colors;
pub mod virtual_camera;

/// Runs an exercise on an initialized engine until its window closes
pub type ExerciseFn = fn(&mut OpenGlEngine) -> Result<()>;

#[derive(Clone, Copy)]
pub struct Exercise {
    pub name: &'static str,
    pub run: ExerciseFn,
}

impl std::fmt::Debug for Exercise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exercise").field("name", &self.name).finish()
    }
}

static EXERCISES: &[Exercise] = &[
    Exercise { name: "4. Virtual Camera", run: virtual_camera::run },
    Exercise { name: "1. Hello Triangle", run: hello_triangle::run },
    Exercise { name: "6. Texture Mapping", run: texture_mapping::run },
    Exercise { name: "2. Vertex Colors", run: vertex_colors::run },
    Exercise { name: "5. Phong Lighting", run: phong_lighting::run },
    Exercise { name: "3. Matrix Translation", run: matrix_transform::run },
];

/// Every registered exercise, sorted by name
pub fn sorted_exercises() -> Vec<Exercise> {
    let mut exercises = EXERCISES.to_vec();
    exercises.sort_by(|a, b| a.name.cmp(b.name));
    exercises
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
