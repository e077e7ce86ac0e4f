//! Per-frame update capability.
//!
//! Anything advanced once per frame implements [`Tickable`]. Scenes hand an
//! explicit, ordered slice of tickables to [`run_ordered`] instead of
//! discovering update hooks on scene nodes.

/// Something advanced once per frame.
pub trait Tickable {
    /// Advance by `dt` seconds. `elapsed` is seconds since the scene started.
    fn update(&mut self, dt: f32, elapsed: f32);

    /// Short label for trace logging.
    fn label(&self) -> &'static str {
        "tickable"
    }
}

/// Run every tickable once, in slice order.
pub fn run_ordered(tickables: &mut [&mut dyn Tickable], dt: f32, elapsed: f32) {
    for tickable in tickables.iter_mut() {
        log::trace!("tick {} dt={:.4} t={:.3}", tickable.label(), dt, elapsed);
        tickable.update(dt, elapsed);
    }
}
