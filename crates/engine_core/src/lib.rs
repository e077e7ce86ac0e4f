//! Core engine types and utilities for Moonrover.
//!
//! This crate provides the foundational types used across all simulation systems:
//! - Transform and blend helpers
//! - Fixed-step time management
//! - The `Tickable` capability and an ordered tick runner

pub mod tick;
pub mod time;
pub mod transform;

pub use tick::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use hecs::{Entity, World};
