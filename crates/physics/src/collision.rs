//! Static collidables and their builders.

use crate::Aabb;
use engine_core::Vec3;

/// Height of hand-placed blocker boxes. Tall enough that the rover can never hover over one.
pub const MANUAL_BOX_HEIGHT: f32 = 50.0;

/// Part boxes wider than this on X or Z are ground-sized and skipped.
pub const MAX_PART_EXTENT: f32 = 300.0;

/// Part boxes with a squared size below this are detail noise and skipped.
pub const MIN_PART_SIZE_SQ: f32 = 1.0;

/// How the interaction layer should follow a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Open in a new tab.
    External,
    /// Play the transition sequence, then redirect.
    Transition,
}

/// Link payload carried by a collidable. Has no effect on collision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    pub kind: LinkKind,
}

impl Link {
    pub fn new(url: impl Into<String>, kind: LinkKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }
}

/// An immutable box the rover can bump into.
#[derive(Debug, Clone, PartialEq)]
pub struct Collidable {
    bounds: Aabb,
    /// Point used for broad-phase distance and push-out direction.
    /// `None` means "always in range".
    reference: Option<Vec3>,
    link: Option<Link>,
}

impl Collidable {
    /// A box whose reference point is its own center.
    pub fn from_bounds(bounds: Aabb) -> Self {
        Self {
            bounds,
            reference: Some(bounds.center()),
            link: None,
        }
    }

    /// A box with no reference point. Never culled by the broad phase.
    pub fn unanchored(bounds: Aabb) -> Self {
        Self {
            bounds,
            reference: None,
            link: None,
        }
    }

    /// Blocker box resting on y = 0, `MANUAL_BOX_HEIGHT` tall.
    pub fn manual_box(x: f32, z: f32, width: f32, depth: f32) -> Self {
        let center = Vec3::new(x, MANUAL_BOX_HEIGHT * 0.5, z);
        Self::from_bounds(Aabb::from_center_size(
            center,
            Vec3::new(width, MANUAL_BOX_HEIGHT, depth),
        ))
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.link = Some(link);
        self
    }

    pub fn with_reference(mut self, reference: Vec3) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn reference(&self) -> Option<Vec3> {
        self.reference
    }

    pub fn link(&self) -> Option<&Link> {
        self.link.as_ref()
    }
}

/// One collidable per part box of a compound prop.
///
/// Ground-sized parts and tiny detail parts are dropped. Every emitted
/// collidable inherits the root's link.
pub fn compound_colliders(parts: &[Aabb], link: Option<&Link>) -> Vec<Collidable> {
    let colliders: Vec<Collidable> = parts
        .iter()
        .filter(|part| {
            let size = part.size();
            size.x <= MAX_PART_EXTENT
                && size.z <= MAX_PART_EXTENT
                && size.length_squared() >= MIN_PART_SIZE_SQ
        })
        .map(|part| {
            let collider = Collidable::from_bounds(*part);
            match link {
                Some(link) => collider.with_link(link.clone()),
                None => collider,
            }
        })
        .collect();
    log::debug!("compound colliders: {} of {} parts kept", colliders.len(), parts.len());
    colliders
}
