//! Rover exhaust dust: a fixed-size particle pool reused round-robin.
//!
//! Particles live in the rover's local space (the renderer draws the pool as
//! a child of the rover). Slots are never added or removed after creation;
//! a dead slot is parked far below the ground until the spawn cursor comes
//! back around to it.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

use crate::config::DustConfig;

/// Per-particle data the renderer uploads as a point list.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable, PartialEq)]
pub struct DustVertex {
    pub position: [f32; 3],
    /// 1.0 at spawn, fades to 0. Also drives alpha.
    pub life: f32,
    pub size: f32,
}

/// Fixed-capacity dust pool.
pub struct DustPool {
    vertices: Vec<DustVertex>,
    velocities: Vec<Vec3>,
    /// Next slot to overwrite.
    cursor: usize,
    config: DustConfig,
}

impl DustPool {
    /// Allocate every slot up front, all parked.
    pub fn new(config: DustConfig) -> Self {
        let capacity = config.capacity.max(1);
        let parked = DustVertex {
            position: [0.0, config.park_height, 0.0],
            life: 0.0,
            size: 1.0,
        };
        Self {
            vertices: vec![parked; capacity],
            velocities: vec![Vec3::ZERO; capacity],
            cursor: 0,
            config,
        }
    }

    pub fn capacity(&self) -> usize {
        self.vertices.len()
    }

    /// Slot the next spawn will overwrite.
    pub fn next_slot(&self) -> usize {
        self.cursor
    }

    pub fn vertices(&self) -> &[DustVertex] {
        &self.vertices
    }

    pub fn velocity(&self, slot: usize) -> Option<Vec3> {
        self.velocities.get(slot).copied()
    }

    /// Pool contents as bytes, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn live_count(&self) -> usize {
        self.vertices.iter().filter(|v| v.life > 0.0).count()
    }

    /// Spawn `spawn_per_tick` particles round-robin under the rover.
    ///
    /// `speed_ratio` is |velocity| / top speed; `speed` is |velocity|. Faster
    /// driving blasts dust outward harder and trails it further behind (-Z is
    /// the rover's rear).
    pub fn emit(&mut self, speed_ratio: f32, speed: f32, rng: &mut impl Rng) {
        let cfg = &self.config;
        for _ in 0..cfg.spawn_per_tick {
            let slot = self.cursor;
            let angle = rng.gen::<f32>() * std::f32::consts::TAU;
            let radius = rng.gen::<f32>() * cfg.spawn_radius;
            let lx = angle.cos() * radius;
            let lz = angle.sin() * radius;
            let trail = rng.gen::<f32>() * 2.0 * speed_ratio;

            self.vertices[slot] = DustVertex {
                position: [lx, cfg.emit_height, lz - trail],
                life: 1.0,
                size: cfg.base_size + rng.gen::<f32>(),
            };

            let blast = cfg.base_blast + speed_ratio * cfg.speed_blast;
            let inv_r = 1.0 / radius.max(0.1);
            self.velocities[slot] = Vec3::new(
                lx * inv_r * blast,
                rng.gen::<f32>() * 2.0,
                lz * inv_r * blast - speed * 0.5,
            );

            self.cursor = (self.cursor + 1) % self.vertices.len();
        }
    }

    /// Age every live particle by `dt` and park the dead ones.
    pub fn advance(&mut self, dt: f32) {
        let cfg = &self.config;
        for (vertex, velocity) in self.vertices.iter_mut().zip(&self.velocities) {
            if vertex.life > 0.0 {
                vertex.life -= dt * cfg.decay_rate;
                let p = Vec3::from(vertex.position) + *velocity * dt;
                vertex.position = p.to_array();
                vertex.size += dt * cfg.growth_rate;
            } else {
                vertex.position[1] = cfg.park_height;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool() -> DustPool {
        DustPool::new(DustConfig::default())
    }

    #[test]
    fn starts_fully_parked() {
        let p = pool();
        assert_eq!(p.capacity(), 200);
        assert_eq!(p.live_count(), 0);
        assert!(p.vertices().iter().all(|v| v.position[1] == -5000.0));
    }

    #[test]
    fn slots_are_reused_round_robin() {
        let mut p = pool();
        let mut rng = StdRng::seed_from_u64(1);
        let dt = 0.1;
        // 200 slots / 5 per tick = 40 ticks to come back around.
        for tick in 0..40 {
            assert_eq!(p.next_slot(), (tick * 5) % 200);
            p.emit(0.5, 10.0, &mut rng);
            p.advance(dt);
        }
        assert_eq!(p.next_slot(), 0);
        // Slot 0 spawned on tick 0 has long since died and been parked.
        assert!(p.vertices()[0].life <= 0.0);
        assert_eq!(p.vertices()[0].position[1], -5000.0);

        p.emit(0.5, 10.0, &mut rng);
        p.advance(dt);
        let slot0 = p.vertices()[0];
        assert!((slot0.life - 0.8).abs() < 1e-5, "slot 0 respawned, life = {}", slot0.life);
        assert_eq!(p.next_slot(), 5);
    }

    #[test]
    fn live_particles_move_fade_and_grow() {
        let mut p = pool();
        let mut rng = StdRng::seed_from_u64(9);
        p.emit(1.0, 35.0, &mut rng);
        let before = p.vertices()[0];
        let vel = p.velocity(0).expect("slot 0");
        p.advance(0.05);
        let after = p.vertices()[0];
        assert!((after.life - 0.9).abs() < 1e-6);
        assert!((after.size - (before.size + 0.75)).abs() < 1e-5);
        let moved = Vec3::from(after.position) - Vec3::from(before.position);
        assert!((moved - vel * 0.05).length() < 1e-5);
    }

    #[test]
    fn dead_particles_park() {
        let mut p = pool();
        let mut rng = StdRng::seed_from_u64(3);
        p.emit(0.0, 0.0, &mut rng);
        // life 1.0 at decay 2/s: gone after 0.5 s, parked on the following advance.
        p.advance(0.5);
        assert!(p.vertices()[0].life <= 0.0);
        p.advance(0.016);
        assert_eq!(p.live_count(), 0);
        assert!(p.vertices()[..5].iter().all(|v| v.position[1] == -5000.0));
    }

    #[test]
    fn spawn_velocity_points_outward() {
        let mut p = pool();
        let mut rng = StdRng::seed_from_u64(11);
        p.emit(0.0, 0.0, &mut rng);
        for slot in 0..5 {
            let pos = Vec3::from(p.vertices()[slot].position);
            let vel = p.velocity(slot).expect("slot");
            let radial = Vec3::new(pos.x, 0.0, pos.z);
            if radial.length() > 0.1 {
                assert!(radial.dot(Vec3::new(vel.x, 0.0, vel.z)) > 0.0);
            }
            assert!(vel.y >= 0.0 && vel.y < 2.0);
        }
    }

    #[test]
    fn byte_view_covers_pool() {
        let p = pool();
        assert_eq!(p.as_bytes().len(), 200 * std::mem::size_of::<DustVertex>());
        assert_eq!(std::mem::size_of::<DustVertex>(), 20);
    }
}
