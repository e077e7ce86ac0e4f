//! Lunar ground: the height function and the ground mesh built from it.
//!
//! **Single source of truth:** the mesh generator and the rover's hover logic
//! both sample the same [`HeightField`] with world-space `(x, z)`. Sampling one
//! with a flipped or swapped axis makes the rover clip into, or float above,
//! the rendered ground.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// A height field over the world XZ plane.
pub trait HeightField {
    /// Ground height at world `(x, z)`. Must be pure.
    fn height(&self, x: f32, z: f32) -> f32;
}

/// Smooth rolling lunar undulation: two broad sine terms plus one finer ripple.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LunarTerrain;

impl HeightField for LunarTerrain {
    #[inline]
    fn height(&self, x: f32, z: f32) -> f32 {
        ground_height(x, z)
    }
}

/// Flat ground at a fixed height. Handy for isolating vehicle behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlatTerrain(pub f32);

impl HeightField for FlatTerrain {
    #[inline]
    fn height(&self, _x: f32, _z: f32) -> f32 {
        self.0
    }
}

/// The lunar height function at world `(x, z)`.
#[inline]
pub fn ground_height(x: f32, z: f32) -> f32 {
    let broad = ((x * 0.04).sin() + (z * 0.04).cos()) * 2.0;
    let ripple = (x * 0.15).sin() * (z * 0.15).cos() * 0.8;
    broad + ripple
}

/// Vertex for the ground mesh.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct GroundVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Configuration for ground mesh generation.
#[derive(Debug, Clone)]
pub struct GroundConfig {
    /// Side length of the square ground plane in world units.
    pub size: f32,
    /// Quads per side.
    pub segments: u32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            size: 3000.0,
            segments: 200,
        }
    }
}

/// Generated ground mesh, centered on the world origin.
#[derive(Debug)]
pub struct GroundMesh {
    pub vertices: Vec<GroundVertex>,
    pub indices: Vec<u32>,
    pub config: GroundConfig,
}

impl GroundMesh {
    /// Build the ground grid, lifting each vertex to `field.height(x, z)`.
    pub fn generate(config: GroundConfig, field: &(impl HeightField + ?Sized)) -> Self {
        let segments = config.segments.max(1);
        let res = segments as usize + 1;
        let step = config.size / segments as f32;
        let half = config.size / 2.0;

        let mut vertices = Vec::with_capacity(res * res);
        for z in 0..res {
            for x in 0..res {
                let world_x = x as f32 * step - half;
                let world_z = z as f32 * step - half;
                vertices.push(GroundVertex {
                    position: [world_x, field.height(world_x, world_z), world_z],
                    normal: [0.0, 1.0, 0.0],
                    uv: [x as f32 / segments as f32, z as f32 / segments as f32],
                });
            }
        }
        Self::calculate_normals(&mut vertices, res);

        let mut indices = Vec::with_capacity((res - 1) * (res - 1) * 6);
        for z in 0..(res - 1) {
            for x in 0..(res - 1) {
                let top_left = (z * res + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * res + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.push(top_left);
                indices.push(bottom_left);
                indices.push(top_right);

                indices.push(top_right);
                indices.push(bottom_left);
                indices.push(bottom_right);
            }
        }

        log::debug!(
            "ground mesh: {} vertices, {} triangles",
            vertices.len(),
            indices.len() / 3
        );
        Self {
            vertices,
            indices,
            config,
        }
    }

    fn resolution(&self) -> usize {
        self.config.segments.max(1) as usize + 1
    }

    /// Height of the triangulated mesh at a world position (clamped to the plane).
    pub fn sample_height(&self, x: f32, z: f32) -> f32 {
        let res = self.resolution();
        let step = self.config.size / (res - 1) as f32;
        let half = self.config.size / 2.0;

        let gx = (x + half) / step;
        let gz = (z + half) / step;

        let x0 = (gx.floor().max(0.0) as usize).min(res - 2);
        let z0 = (gz.floor().max(0.0) as usize).min(res - 2);

        let fx = (gx - x0 as f32).clamp(0.0, 1.0);
        let fz = (gz - z0 as f32).clamp(0.0, 1.0);

        let h = |ix: usize, iz: usize| self.vertices[iz * res + ix].position[1];
        let h00 = h(x0, z0);
        let h10 = h(x0 + 1, z0);
        let h01 = h(x0, z0 + 1);
        let h11 = h(x0 + 1, z0 + 1);

        // Diagonal runs bottom-left to top-right, matching the index buffer.
        if fx + fz <= 1.0 {
            h00 + fx * (h10 - h00) + fz * (h01 - h00)
        } else {
            h11 + (1.0 - fx) * (h01 - h11) + (1.0 - fz) * (h10 - h11)
        }
    }

    /// Vertex data as bytes, ready for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    fn calculate_normals(vertices: &mut [GroundVertex], resolution: usize) {
        let mut normals: Vec<Vec3> = vec![Vec3::ZERO; vertices.len()];

        for z in 0..(resolution - 1) {
            for x in 0..(resolution - 1) {
                let i0 = z * resolution + x;
                let i1 = i0 + 1;
                let i2 = (z + 1) * resolution + x;
                let i3 = i2 + 1;

                let v0: Vec3 = vertices[i0].position.into();
                let v1: Vec3 = vertices[i1].position.into();
                let v2: Vec3 = vertices[i2].position.into();
                let v3: Vec3 = vertices[i3].position.into();

                let n1 = (v2 - v0).cross(v1 - v0).normalize_or_zero();
                normals[i0] += n1;
                normals[i2] += n1;
                normals[i1] += n1;

                let n2 = (v2 - v1).cross(v3 - v1).normalize_or_zero();
                normals[i1] += n2;
                normals[i2] += n2;
                normals[i3] += n2;
            }
        }

        for (i, vertex) in vertices.iter_mut().enumerate() {
            let n = normals[i].try_normalize().unwrap_or(Vec3::Y);
            vertex.normal = [n.x, n.y, n.z];
        }
    }
}
