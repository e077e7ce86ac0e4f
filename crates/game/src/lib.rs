//! Moonrover simulation: the hover rover, exhaust dust, ship flybys, and the
//! orbit and surface scenes that compose them.

pub mod app;
pub mod config;
pub mod dust;
pub mod flyby;
pub mod orbit;
pub mod surface;
pub mod vehicle;
