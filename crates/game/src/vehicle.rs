//! The hover rover: steering, box collision, ground-follow hover, tilt, and exhaust dust.
//!
//! One [`Rover::update`] call is one tick. Order within a tick:
//! 1. keys → velocity / steer (per-tick blends, frame-rate dependent)
//! 2. yaw from steer, gated by a minimum speed
//! 3. body box refreshed at the current position
//! 4. probe box at the proposed position tested against collidables;
//!    first hit bounces and pushes out, otherwise the move is applied
//! 5. hover toward terrain height + bob
//! 6. cosmetic bank/pitch
//! 7. dust emit + advance

use engine_core::{lerp, Transform, Vec3};
use input::{DriveControls, KeyQuery};
use physics::{first_overlap, push_out, Aabb, Collidable, PushOut};
use procgen::{HeightField, LunarTerrain};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{DustConfig, VehicleConfig};
use crate::dust::DustPool;

/// What happened in the collision phase of a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionOutcome {
    /// No collidable list was supplied.
    Skipped,
    /// Nothing in range overlapped the probe box; the move was applied.
    Clear,
    /// Hit the collidable at `index`. The move was discarded and the velocity bounced.
    Hit { index: usize, push: PushOut },
}

/// Cosmetic body tilt, applied to the visual model only.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tilt {
    /// Roll about the forward axis (rad).
    pub bank: f32,
    /// Nose up/down (rad).
    pub pitch: f32,
}

/// The player's hover vehicle.
pub struct Rover {
    transform: Transform,
    /// Signed forward speed (units/s). Positive drives along [`Rover::heading`].
    velocity: f32,
    /// Yaw rate (rad/s). Positive turns left.
    steer: f32,
    /// Body box at the current position, refreshed every tick before the collision test.
    bounds: Aabb,
    tilt: Tilt,
    dust: DustPool,
    terrain: Box<dyn HeightField>,
    config: VehicleConfig,
    rng: StdRng,
    last_outcome: CollisionOutcome,
    warned_no_collidables: bool,
}

impl Rover {
    /// A rover on lunar terrain with an entropy-seeded dust RNG.
    pub fn new(config: VehicleConfig, dust: DustConfig) -> Self {
        Self::with_parts(config, dust, Box::new(LunarTerrain), StdRng::from_entropy())
    }

    /// A rover with an explicit terrain and RNG (tests, reproducible sessions).
    pub fn with_parts(
        config: VehicleConfig,
        dust: DustConfig,
        terrain: Box<dyn HeightField>,
        rng: StdRng,
    ) -> Self {
        let transform = Transform::from_position(config.spawn_position);
        let bounds = body_box(&config, transform.position);
        Self {
            transform,
            velocity: 0.0,
            steer: 0.0,
            bounds,
            tilt: Tilt::default(),
            dust: DustPool::new(dust),
            terrain,
            config,
            rng,
            last_outcome: CollisionOutcome::Skipped,
            warned_no_collidables: false,
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Drive direction: the hull's local +Z.
    pub fn heading(&self) -> Vec3 {
        self.transform.rotation * Vec3::Z
    }

    /// Body box as of the start of the last tick's collision phase.
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn steer(&self) -> f32 {
        self.steer
    }

    pub fn tilt(&self) -> Tilt {
        self.tilt
    }

    pub fn dust(&self) -> &DustPool {
        &self.dust
    }

    pub fn last_outcome(&self) -> CollisionOutcome {
        self.last_outcome
    }

    /// Advance one tick.
    ///
    /// `collidables: None` skips collision entirely.
    pub fn update(
        &mut self,
        dt: f32,
        elapsed: f32,
        input: &(impl KeyQuery + ?Sized),
        collidables: Option<&[Collidable]>,
    ) -> CollisionOutcome {
        let controls = DriveControls::read(input);
        self.apply_controls(controls);

        if self.velocity.abs() > self.config.min_steer_velocity {
            self.transform.rotate_y(self.steer * dt);
        }

        self.bounds = body_box(&self.config, self.transform.position);
        let outcome = self.resolve_motion(dt, collidables);
        self.last_outcome = outcome;

        self.hover(elapsed);
        self.update_tilt();

        let speed = self.velocity.abs();
        let speed_ratio = speed / self.config.speed;
        self.dust.emit(speed_ratio, speed, &mut self.rng);
        self.dust.advance(dt);

        outcome
    }

    fn apply_controls(&mut self, controls: DriveControls) {
        let cfg = &self.config;
        self.velocity = if controls.forward {
            cfg.speed
        } else if controls.reverse {
            -cfg.speed * cfg.reverse_factor
        } else {
            lerp(self.velocity, 0.0, cfg.release_damping)
        };

        self.steer = if controls.left {
            cfg.steer_speed
        } else if controls.right {
            -cfg.steer_speed
        } else {
            lerp(self.steer, 0.0, cfg.release_damping)
        };
    }

    fn resolve_motion(&mut self, dt: f32, collidables: Option<&[Collidable]>) -> CollisionOutcome {
        let displacement = self.heading() * (self.velocity * dt);

        let Some(collidables) = collidables else {
            if !self.warned_no_collidables {
                log::warn!("rover: no collidable list, collision disabled");
                self.warned_no_collidables = true;
            }
            self.transform.translate(displacement);
            return CollisionOutcome::Skipped;
        };

        let probe = self.bounds.translated(displacement);
        let origin = self.transform.position;
        match first_overlap(collidables, origin, &probe, self.config.broad_phase_radius) {
            Some(hit) => {
                self.velocity = -self.velocity * self.config.bounce;
                // Separation is measured from the pre-move position: the move was never applied.
                let away_from = hit.collidable.reference().unwrap_or_else(|| hit.collidable.bounds().center());
                let push = push_out(origin, away_from, self.config.push_out);
                match push {
                    PushOut::Offset(offset) => self.transform.translate(offset),
                    PushOut::Degenerate => {
                        log::debug!("rover: degenerate push-out against collidable {}", hit.index)
                    }
                }
                log::debug!(
                    "rover: hit collidable {} at {:?}, velocity now {:.2}",
                    hit.index,
                    origin,
                    self.velocity
                );
                CollisionOutcome::Hit {
                    index: hit.index,
                    push,
                }
            }
            None => {
                self.transform.translate(displacement);
                CollisionOutcome::Clear
            }
        }
    }

    fn hover(&mut self, elapsed: f32) {
        let cfg = &self.config;
        let p = self.transform.position;
        let ground = self.terrain.height(p.x, p.z);
        let bob = (elapsed * cfg.bob_frequency).sin() * cfg.bob_amplitude;
        let target = ground + cfg.hover_height + bob;
        self.transform.position.y = lerp(p.y, target, cfg.hover_smoothing);
    }

    fn update_tilt(&mut self) {
        let cfg = &self.config;
        let speed_ratio = self.velocity.abs() / cfg.speed;
        let bank_target = -self.steer * cfg.bank_factor * speed_ratio;
        let pitch_target = -self.velocity * cfg.pitch_factor;
        self.tilt.bank = lerp(self.tilt.bank, bank_target, cfg.tilt_smoothing);
        self.tilt.pitch = lerp(self.tilt.pitch, pitch_target, cfg.tilt_smoothing);
    }
}

/// Fixed body box, lifted off the ground-level origin.
fn body_box(config: &VehicleConfig, position: Vec3) -> Aabb {
    Aabb::from_center_size(position + Vec3::Y * config.body_lift, config.body_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use input::{ElementState, InputState, KeyCode};
    use procgen::FlatTerrain;

    fn rover_at(position: Vec3) -> Rover {
        let config = VehicleConfig {
            spawn_position: position,
            ..Default::default()
        };
        Rover::with_parts(
            config,
            DustConfig::default(),
            Box::new(FlatTerrain(0.0)),
            StdRng::seed_from_u64(5),
        )
    }

    fn holding(keys: &[KeyCode]) -> InputState {
        let mut input = InputState::new();
        for &k in keys {
            input.process_keyboard(k, ElementState::Pressed);
        }
        input
    }

    #[test]
    fn forward_key_drives_along_forward_axis() {
        let mut rover = rover_at(Vec3::ZERO);
        let outcome = rover.update(0.1, 0.0, &holding(&[KeyCode::KeyW]), Some(&[] as &[Collidable]));
        assert_eq!(outcome, CollisionOutcome::Clear);
        assert_eq!(rover.velocity(), 35.0);
        let p = rover.position();
        assert!((p.z - 3.5).abs() < 1e-5, "p = {:?}", p);
        assert!(p.x.abs() < 1e-6);
    }

    #[test]
    fn reverse_is_slower() {
        let mut rover = rover_at(Vec3::ZERO);
        rover.update(0.1, 0.0, &holding(&[KeyCode::ArrowDown]), None);
        assert!((rover.velocity() - -21.0).abs() < 1e-5);
        assert!(rover.position().z < 0.0);
    }

    #[test]
    fn released_keys_decay_without_overshoot() {
        let mut rover = rover_at(Vec3::ZERO);
        rover.update(0.016, 0.0, &holding(&[KeyCode::KeyW, KeyCode::KeyA]), None);
        let idle = InputState::new();
        let (mut v, mut s) = (rover.velocity(), rover.steer());
        assert!(v > 0.0 && s > 0.0);
        for _ in 0..200 {
            rover.update(0.016, 0.0, &idle, None);
            assert!(rover.velocity() >= 0.0 && rover.velocity() <= v);
            assert!(rover.steer() >= 0.0 && rover.steer() <= s);
            v = rover.velocity();
            s = rover.steer();
        }
        assert!(v < 1e-6 && s < 1e-6);
    }

    #[test]
    fn steering_needs_speed() {
        let mut rover = rover_at(Vec3::ZERO);
        rover.update(0.1, 0.0, &holding(&[KeyCode::KeyA]), None);
        assert_eq!(rover.transform().rotation, engine_core::Quat::IDENTITY);

        rover.update(0.1, 0.0, &holding(&[KeyCode::KeyW, KeyCode::KeyA]), None);
        // Left turn: heading swings from +Z toward +X.
        assert!(rover.heading().x > 0.0);
    }

    #[test]
    fn box_in_the_way_bounces_and_pushes_out() {
        let mut rover = rover_at(Vec3::ZERO);
        // Box ahead of the rover (heading is +Z).
        let wall = Collidable::from_bounds(Aabb::from_center_size(
            Vec3::new(0.0, 1.5, 6.0),
            Vec3::new(3.5, 3.0, 7.0),
        ));
        let list = [wall.clone()];
        let outcome = rover.update(0.1, 0.0, &holding(&[KeyCode::KeyW]), Some(&list[..]));
        assert!(matches!(outcome, CollisionOutcome::Hit { index: 0, push: PushOut::Offset(_) }));
        assert!((rover.velocity() - -28.0).abs() < 1e-4);
        let p = rover.position();
        assert!(!wall.bounds().contains_point(p), "p = {:?}", p);
        // Pushed back, away from the wall, not through it.
        assert!(p.z < 0.0);
    }

    #[test]
    fn scenario_box_at_plus_five() {
        // Rover at origin, box centered (0, 1.5, 5), forward held one 0.1 s tick at speed 35.
        let mut rover = rover_at(Vec3::ZERO);
        let target = Collidable::from_bounds(Aabb::from_center_size(
            Vec3::new(0.0, 1.5, 5.0),
            Vec3::new(3.5, 3.0, 7.0),
        ));
        let list = [target.clone()];
        let outcome = rover.update(0.1, 0.0, &holding(&[KeyCode::KeyW]), Some(&list[..]));
        let CollisionOutcome::Hit { push: PushOut::Offset(offset), .. } = outcome else {
            panic!("expected a hit with push-out, got {:?}", outcome);
        };
        assert!((offset.length() - 2.0).abs() < 1e-4);
        assert!(rover.velocity() < 0.0, "velocity sign flipped");
        let p = rover.position();
        assert!(!target.bounds().contains_point(p));
        // No forward penetration: the 3.5 unit move was discarded.
        assert!(p.z < 3.5 - 1e-3);
    }

    #[test]
    fn far_collidable_is_ignored() {
        let mut rover = rover_at(Vec3::ZERO);
        // Reference point far away, but box sits right in front: broad phase culls it.
        let odd = Collidable::from_bounds(Aabb::from_center_size(Vec3::new(0.0, 1.5, 5.0), Vec3::splat(4.0)))
            .with_reference(Vec3::new(1000.0, 0.0, 0.0));
        let list = [odd];
        let outcome = rover.update(0.1, 0.0, &holding(&[KeyCode::KeyW]), Some(&list[..]));
        assert_eq!(outcome, CollisionOutcome::Clear);
    }

    #[test]
    fn unanchored_box_pushes_away_from_its_center() {
        let mut rover = rover_at(Vec3::ZERO);
        let blocker = Collidable::unanchored(Aabb::from_center_size(
            Vec3::new(0.0, 1.5, 5.0),
            Vec3::new(3.5, 3.0, 7.0),
        ));
        let list = [blocker.clone()];
        let outcome = rover.update(0.1, 0.0, &holding(&[KeyCode::KeyW]), Some(&list[..]));
        let CollisionOutcome::Hit { index: 0, push: PushOut::Offset(offset) } = outcome else {
            panic!("expected a hit with push-out, got {:?}", outcome);
        };
        // Away from the box center (0, 1.5, 5), not from the world origin.
        assert!((offset.length() - 2.0).abs() < 1e-4);
        assert!(offset.z < 0.0 && offset.y < 0.0, "offset = {:?}", offset);
        let p = rover.position();
        assert!(p.is_finite());
        assert!(!blocker.bounds().contains_point(p), "p = {:?}", p);
    }

    #[test]
    fn coincident_reference_bounces_without_nan() {
        let mut rover = rover_at(Vec3::ZERO);
        let on_top = Collidable::from_bounds(Aabb::from_center_size(Vec3::ZERO, Vec3::splat(2.0)));
        let list = [on_top];
        let outcome = rover.update(0.1, 0.0, &holding(&[KeyCode::KeyW]), Some(&list[..]));
        assert!(matches!(outcome, CollisionOutcome::Hit { push: PushOut::Degenerate, .. }));
        assert!(rover.position().is_finite());
        assert!(rover.velocity() < 0.0);
    }

    #[test]
    fn hover_eases_toward_ground_plus_height() {
        let mut rover = rover_at(Vec3::ZERO);
        let idle = InputState::new();
        // elapsed = 0: bob is sin(0) = 0, target y = 0 + 3.5.
        rover.update(0.016, 0.0, &idle, None);
        assert!((rover.position().y - 3.5 * 0.15).abs() < 1e-5);
        for _ in 0..200 {
            rover.update(0.016, 0.0, &idle, None);
        }
        assert!((rover.position().y - 3.5).abs() < 1e-3);
    }

    #[test]
    fn hover_follows_lunar_terrain() {
        let config = VehicleConfig::default();
        let mut rover = Rover::with_parts(
            config,
            DustConfig::default(),
            Box::new(LunarTerrain),
            StdRng::seed_from_u64(1),
        );
        let idle = InputState::new();
        for _ in 0..300 {
            rover.update(0.016, 0.0, &idle, None);
        }
        let p = rover.position();
        let expected = procgen::ground_height(p.x, p.z) + 3.5;
        assert!((p.y - expected).abs() < 1e-3, "y = {}, expected {}", p.y, expected);
    }

    #[test]
    fn bounds_follow_position_with_lift() {
        let mut rover = rover_at(Vec3::new(4.0, 0.0, 4.0));
        rover.update(0.016, 0.0, &InputState::new(), None);
        let b = rover.bounds();
        assert_eq!(b.center(), Vec3::new(4.0, 1.5, 4.0));
        assert_eq!(b.size(), Vec3::new(3.5, 3.0, 7.0));
    }

    #[test]
    fn tilt_banks_into_turns() {
        let mut rover = rover_at(Vec3::ZERO);
        let turning = holding(&[KeyCode::KeyW, KeyCode::KeyA]);
        for _ in 0..50 {
            rover.update(0.016, 0.0, &turning, None);
        }
        let tilt = rover.tilt();
        // Left steer is positive, bank leans the opposite way.
        assert!((tilt.bank - -1.6 * 0.6).abs() < 0.01, "bank = {}", tilt.bank);
        assert!((tilt.pitch - -35.0 * 0.005).abs() < 0.01, "pitch = {}", tilt.pitch);
    }

    #[test]
    fn dust_emits_every_tick() {
        let mut rover = rover_at(Vec3::ZERO);
        let idle = InputState::new();
        rover.update(0.016, 0.0, &idle, None);
        assert_eq!(rover.dust().live_count(), 5);
        rover.update(0.016, 0.0, &idle, None);
        assert_eq!(rover.dust().live_count(), 10);
    }
}
