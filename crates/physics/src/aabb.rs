//! Axis-aligned bounding boxes.

use engine_core::Vec3;

/// Axis-aligned box stored as min/max corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box of full `size` centered on `center`.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn half_extents(&self) -> Vec3 {
        self.size() * 0.5
    }

    /// Copy of this box moved by `delta`.
    pub fn translated(&self, delta: Vec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Overlap test. Touching faces count as intersecting.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Point containment, boundary inclusive.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.min.cmple(point).all() && self.max.cmpge(point).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_size_roundtrip_values() {
        let b = Aabb::from_center_size(Vec3::new(0.0, 1.5, 5.0), Vec3::new(3.5, 3.0, 7.0));
        assert_eq!(b.min, Vec3::new(-1.75, 0.0, 1.5));
        assert_eq!(b.max, Vec3::new(1.75, 3.0, 8.5));
        assert_eq!(b.center(), Vec3::new(0.0, 1.5, 5.0));
        assert_eq!(b.half_extents(), Vec3::new(1.75, 1.5, 3.5));
    }

    #[test]
    fn separated_on_one_axis_does_not_intersect() {
        let a = Aabb::from_center_size(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_center_size(Vec3::new(0.0, 0.0, 1.5), Vec3::ONE);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&b.translated(Vec3::new(0.0, 0.0, -0.5))));
    }

    #[test]
    fn touching_faces_intersect() {
        let a = Aabb::from_center_size(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_center_size(Vec3::X, Vec3::ONE);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn new_orders_corners() {
        let b = Aabb::new(Vec3::ONE, -Vec3::ONE);
        assert_eq!(b.min, -Vec3::ONE);
        assert!(b.contains_point(Vec3::ZERO));
        assert!(!b.contains_point(Vec3::splat(1.01)));
    }
}
