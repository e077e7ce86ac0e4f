//! Time management for the frame loop.

use std::time::Duration;

/// Manages frame timing and delta time calculation.
///
/// Stepped by the caller (`advance`) so headless sessions are reproducible.
#[derive(Debug)]
pub struct Time {
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager.
    pub fn new() -> Self {
        Self {
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Step the clock by a fixed amount without consulting the wall clock.
    pub fn advance(&mut self, step: Duration) {
        self.delta = step;
        self.elapsed += step;
        self.frame_count += 1;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Fixed step length for a tick rate in Hz. Non-positive rates clamp to 1 Hz.
pub fn step_for_rate(hz: f64) -> Duration {
    Duration::from_secs_f64(1.0 / hz.max(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates_elapsed_and_frames() {
        let mut time = Time::new();
        let step = step_for_rate(10.0);
        for _ in 0..5 {
            time.advance(step);
        }
        assert_eq!(time.frame_count(), 5);
        assert!((time.elapsed_seconds() - 0.5).abs() < 1e-5);
        assert!((time.delta_seconds() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn zero_rate_clamps_to_one_hz() {
        assert_eq!(step_for_rate(0.0), Duration::from_secs(1));
    }
}
