//! Procedural generation for the lunar ground and the star shell.

pub mod starfield;
pub mod terrain;

pub use starfield::*;
pub use terrain::*;
