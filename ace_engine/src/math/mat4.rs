/// Column-major 4x4 matrix and the transform builders used by the exercises.
///
/// Storage follows the OpenGL convention: element (row, col) lives at
/// `m[col * 4 + row]`, so `m` can be handed to `glUniformMatrix4fv` without
/// transposing. All builders return a fresh matrix; composition order is left
/// to the caller (`translate * rotate * scale` applies scale first).

use std::fmt;
use std::ops::Mul;
use bytemuck::{Pod, Zeroable};
use super::vec3::Vec3;

/// Degrees to radians factor
pub const ONE_DEG_IN_RAD: f32 = (2.0 * std::f32::consts::PI) / 360.0;

/// 4x4 matrix of `f32`, column-major
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Mat4 {
    pub m: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Build from 16 column-major values
    pub fn from_cols_array(m: [f32; 16]) -> Self {
        Self { m }
    }

    /// Element at (row, col)
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.m[col * 4 + row]
    }

    /// Mutable element at (row, col)
    pub fn at_mut(&mut self, row: usize, col: usize) -> &mut f32 {
        &mut self.m[col * 4 + row]
    }

    /// Raw column-major storage
    pub fn as_slice(&self) -> &[f32; 16] {
        &self.m
    }

    pub fn translate(x: f32, y: f32, z: f32) -> Self {
        let mut result = Self::IDENTITY;
        result.m[12] = x;
        result.m[13] = y;
        result.m[14] = z;
        result
    }

    pub fn translate_vec(v: Vec3) -> Self {
        Self::translate(v.x, v.y, v.z)
    }

    /// Rotation about the X axis, angle in degrees
    pub fn rotate_x(deg: f32) -> Self {
        let (s, c) = (deg * ONE_DEG_IN_RAD).sin_cos();
        let mut result = Self::IDENTITY;
        result.m[5] = c;
        result.m[6] = s;
        result.m[9] = -s;
        result.m[10] = c;
        result
    }

    /// Rotation about the Y axis, angle in degrees
    pub fn rotate_y(deg: f32) -> Self {
        let (s, c) = (deg * ONE_DEG_IN_RAD).sin_cos();
        let mut result = Self::IDENTITY;
        result.m[0] = c;
        result.m[2] = -s;
        result.m[8] = s;
        result.m[10] = c;
        result
    }

    /// Rotation about the Z axis, angle in degrees
    pub fn rotate_z(deg: f32) -> Self {
        let (s, c) = (deg * ONE_DEG_IN_RAD).sin_cos();
        let mut result = Self::IDENTITY;
        result.m[0] = c;
        result.m[1] = s;
        result.m[4] = -s;
        result.m[5] = c;
        result
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        let mut result = Self::IDENTITY;
        result.m[0] = x;
        result.m[5] = y;
        result.m[10] = z;
        result
    }

    /// OpenGL perspective projection (clip z in [-w, w]).
    ///
    /// `far == near` is not guarded and yields non-finite entries.
    pub fn perspective(fovy_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        let fov_rad = fovy_deg * ONE_DEG_IN_RAD;
        let range = (fov_rad * 0.5).tan() * near;
        let sx = (2.0 * near) / (2.0 * range * aspect);
        let sy = near / range;
        let sz = -(far + near) / (far - near);
        let pz = -(2.0 * far * near) / (far - near);

        let mut result = Self::zeroed();
        result.m[0] = sx;
        result.m[5] = sy;
        result.m[10] = sz;
        result.m[11] = -1.0;
        result.m[14] = pz;
        result
    }

    /// Right-handed view matrix looking from `eye` toward `target`.
    ///
    /// If `eye - target` is parallel to `up` the basis collapses to zero
    /// vectors; no error is reported.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let forward = (eye - target).normalize();
        let right = up.cross(forward).normalize();
        let cam_up = forward.cross(right);

        let mut result = Self::IDENTITY;
        result.m[0] = right.x;
        result.m[4] = right.y;
        result.m[8] = right.z;

        result.m[1] = cam_up.x;
        result.m[5] = cam_up.y;
        result.m[9] = cam_up.z;

        result.m[2] = forward.x;
        result.m[6] = forward.y;
        result.m[10] = forward.z;

        result.m[12] = -right.dot(eye);
        result.m[13] = -cam_up.dot(eye);
        result.m[14] = -forward.dot(eye);
        result
    }

    /// Transform a point (w = 1) and return the homogeneous result
    pub fn transform_point4(&self, p: Vec3) -> [f32; 4] {
        let mut out = [0.0; 4];
        for (row, value) in out.iter_mut().enumerate() {
            *value = self.at(row, 0) * p.x
                + self.at(row, 1) * p.y
                + self.at(row, 2) * p.z
                + self.at(row, 3);
        }
        out
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut result = Mat4::zeroed();
        for col in 0..4 {
            for row in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.at(row, k) * rhs.at(k, col);
                }
                *result.at_mut(row, col) = sum;
            }
        }
        result
    }
}

impl Mul<&Mat4> for &Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: &Mat4) -> Mat4 {
        *self * *rhs
    }
}

/// Prints the matrix row by row, `[ a b c d ]` per line
impl fmt::Display for Mat4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..4 {
            write!(f, "[ ")?;
            for col in 0..4 {
                write!(f, "{:7.3} ", self.at(row, col))?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

impl From<glam::Mat4> for Mat4 {
    fn from(m: glam::Mat4) -> Self {
        Self { m: m.to_cols_array() }
    }
}

impl From<Mat4> for glam::Mat4 {
    fn from(m: Mat4) -> Self {
        glam::Mat4::from_cols_array(&m.m)
    }
}

#[cfg(test)]
#[path = "mat4_tests.rs"]
mod tests;
