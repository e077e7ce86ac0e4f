//! Overlap queries against a collidable list.

use crate::{Aabb, Collidable};
use engine_core::Vec3;

/// Separation vectors shorter than this are not normalized.
pub const MIN_SEPARATION: f32 = 1e-4;

/// First collidable found overlapping a probe box.
#[derive(Debug, Clone, Copy)]
pub struct OverlapHit<'a> {
    /// Index into the collidable slice.
    pub index: usize,
    pub collidable: &'a Collidable,
}

/// Broad phase: is `collidable` close enough to `origin` to be worth an exact test?
///
/// A collidable without a reference point is always in range.
#[inline]
pub fn in_broad_phase(collidable: &Collidable, origin: Vec3, cutoff: f32) -> bool {
    match collidable.reference() {
        Some(reference) => origin.distance(reference) <= cutoff,
        None => true,
    }
}

/// Scan in slice order and return the first collidable whose box overlaps `probe`.
///
/// Collidables farther than `cutoff` from `origin` are skipped without an
/// exact test. Simultaneous overlaps resolve by slice order.
pub fn first_overlap<'a>(
    collidables: &'a [Collidable],
    origin: Vec3,
    probe: &Aabb,
    cutoff: f32,
) -> Option<OverlapHit<'a>> {
    collidables
        .iter()
        .enumerate()
        .filter(|(_, c)| in_broad_phase(c, origin, cutoff))
        .find(|(_, c)| probe.intersects(c.bounds()))
        .map(|(index, collidable)| OverlapHit { index, collidable })
}

/// Outcome of pushing a body away from a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PushOut {
    /// Displacement to apply.
    Offset(Vec3),
    /// Body and point coincide; no direction to push along.
    Degenerate,
}

/// Displacement of length `distance` moving `from` directly away from `away_from`.
pub fn push_out(from: Vec3, away_from: Vec3, distance: f32) -> PushOut {
    let separation = from - away_from;
    let length = separation.length();
    if !length.is_finite() || length < MIN_SEPARATION {
        return PushOut::Degenerate;
    }
    PushOut::Offset(separation / length * distance)
}
