//! Box collision for Moonrover: AABBs, static collidables, and overlap queries.

pub mod aabb;
pub mod collision;
pub mod query;

pub use aabb::*;
pub use collision::*;
pub use query::*;
