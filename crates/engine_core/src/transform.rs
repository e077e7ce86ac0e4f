//! Transform component and utilities for spatial positioning.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create the model matrix for this transform.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Get the forward direction (negative Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Translate the transform by a delta.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Rotate around the world Y axis (yaw).
    pub fn rotate_y(&mut self, angle: f32) {
        self.rotation = Quat::from_rotation_y(angle) * self.rotation;
    }

    /// Rotate around the local Z axis (roll).
    pub fn rotate_z(&mut self, angle: f32) {
        self.rotation = self.rotation * Quat::from_rotation_z(angle);
    }

    /// Point the forward axis at `target`.
    ///
    /// Leaves the rotation untouched when the target coincides with the
    /// position. A target straight above or below swaps the up hint to +Z.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let to_target = target - self.position;
        if to_target.length_squared() < 1e-8 {
            return;
        }
        let up = if to_target.normalize().cross(up).length_squared() < 1e-6 {
            Vec3::Z
        } else {
            up
        };
        self.rotation = Quat::from_mat4(&Mat4::look_at_rh(self.position, target, up)).inverse();
    }
}

/// Linear blend between `a` and `b`. `t` is not clamped.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Raw transform data for GPU upload (instance data).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TransformRaw {
    pub model: [[f32; 4]; 4],
}

impl From<&Transform> for TransformRaw {
    fn from(transform: &Transform) -> Self {
        Self {
            model: transform.to_matrix().to_cols_array_2d(),
        }
    }
}

impl From<Transform> for TransformRaw {
    fn from(transform: Transform) -> Self {
        Self::from(&transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaw_turns_forward_axis() {
        let mut t = Transform::default();
        assert!((t.forward() - -Vec3::Z).length() < 1e-6);
        t.rotate_y(std::f32::consts::FRAC_PI_2);
        // Quarter turn left: -Z forward becomes -X.
        assert!((t.forward() - -Vec3::X).length() < 1e-5, "forward = {:?}", t.forward());
    }

    #[test]
    fn look_at_faces_target() {
        let mut t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let target = Vec3::new(10.0, 2.0, 3.0);
        t.look_at(target, Vec3::Y);
        let dir = (target - t.position).normalize();
        assert!((t.forward() - dir).length() < 1e-4, "forward = {:?}", t.forward());
    }

    #[test]
    fn look_at_straight_down_stays_finite() {
        let mut t = Transform::from_position(Vec3::new(0.0, 100.0, 0.0));
        t.look_at(Vec3::new(0.0, -100.0, 0.0), Vec3::Y);
        assert!(t.rotation.is_finite());
        assert!((t.forward() - -Vec3::Y).length() < 1e-4, "forward = {:?}", t.forward());
    }

    #[test]
    fn look_at_self_is_noop() {
        let mut t = Transform::from_position(Vec3::ONE);
        t.look_at(Vec3::ONE, Vec3::Y);
        assert_eq!(t.rotation, Quat::IDENTITY);
    }

    #[test]
    fn lerp_blends() {
        assert_eq!(lerp(0.0, 10.0, 0.25), 2.5);
        assert_eq!(lerp(4.0, 0.0, 0.0), 4.0);
    }
}
