//! Math module - column-major 4x4 matrices, 3-vectors and frustum culling.
//!
//! Small, self-contained replacements for the matrix helpers the exercises
//! teach. `glam` remains available (re-exported at the crate root) and every
//! type converts losslessly to and from its `glam` counterpart.

mod frustum;
mod mat4;
mod vec3;

pub use frustum::{
    extract_frustum,
    Frustum, Plane,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
};
pub use mat4::{Mat4, ONE_DEG_IN_RAD};
pub use vec3::Vec3;
