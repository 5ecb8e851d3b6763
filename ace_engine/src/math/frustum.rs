/// Frustum - six clipping planes for visibility culling.
///
/// Each plane is a normal plus a signed distance:
/// - the normal points inward (toward the visible volume)
/// - a point P is on the visible side of a plane if `dot(normal, P) + distance >= 0`
///
/// The frustum is a plain value computed by the caller from its own
/// projection and view matrices; nothing in the engine stores one.

use super::mat4::Mat4;
use super::vec3::Vec3;

/// Frustum plane indices
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

/// One clipping plane: `dot(normal, p) + distance = 0`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Signed distance from the plane, positive on the inside
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p) + self.distance
    }

    /// Divide by the normal length. A zero-length normal is left as is.
    fn normalized(self) -> Self {
        let len = self.normal.length();
        if len > 0.0 {
            Self {
                normal: Vec3::new(self.normal.x / len, self.normal.y / len, self.normal.z / len),
                distance: self.distance / len,
            }
        } else {
            self
        }
    }
}

/// Six frustum planes: left, right, bottom, top, near, far
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract frustum planes from a combined `projection * view` matrix.
    ///
    /// Uses the Gribb & Hartmann method. Works for both perspective
    /// and orthographic projections.
    pub fn from_proj_view(pv: &Mat4) -> Self {
        let m = &pv.m;

        // Row i of a column-major matrix is (m[i], m[4+i], m[8+i], m[12+i])
        let combine = |row: usize, sign: f32| {
            Plane::new(
                Vec3::new(
                    m[3] + sign * m[row],
                    m[7] + sign * m[4 + row],
                    m[11] + sign * m[8 + row],
                ),
                m[15] + sign * m[12 + row],
            )
            .normalized()
        };

        Self {
            planes: [
                combine(0, 1.0),  // Left:   row3 + row0
                combine(0, -1.0), // Right:  row3 - row0
                combine(1, 1.0),  // Bottom: row3 + row1
                combine(1, -1.0), // Top:    row3 - row1
                combine(2, 1.0),  // Near:   row3 + row2
                combine(2, -1.0), // Far:    row3 - row2
            ],
        }
    }

    /// True if `p` lies on or inside every plane
    pub fn point_in_frustum(&self, p: Vec3) -> bool {
        self.planes.iter().all(|plane| plane.signed_distance(p) >= 0.0)
    }

    /// Conservative sphere test.
    ///
    /// Rejects only when the sphere is entirely behind at least one plane.
    /// Spheres near a frustum corner can be outside every face-pair yet pass;
    /// callers get a possible extra draw, never a missing one.
    pub fn sphere_in_frustum(&self, center: Vec3, radius: f32) -> bool {
        !self
            .planes
            .iter()
            .any(|plane| plane.signed_distance(center) < -radius)
    }
}

/// Free-function form of [`Frustum::from_proj_view`]
pub fn extract_frustum(pv: &Mat4) -> Frustum {
    Frustum::from_proj_view(pv)
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
