//! Orbit view: the spinning planet, its emissive pulse clock, the star shell, and ship flybys.

use engine_core::{run_ordered, Tickable, Transform};
use procgen::{Starfield, ORBIT_STAR_COUNT, ORBIT_STAR_RADIUS};
use rand::rngs::StdRng;

use crate::config::FlybyConfig;
use crate::flyby::{FlybySpawner, ShipTemplate};

/// Planet spin per tick (rad), independent of dt.
const PLANET_SPIN_Y: f32 = 0.002;
const PLANET_SPIN_X: f32 = 0.0005;

/// The emissive pulse runs at a fifth of scene time.
const PULSE_RATE: f32 = 0.2;

/// Star shell yaw rate (rad/s).
const STAR_SPIN: f32 = 0.01;

/// Spinning planet plus the shader clock that animates its emissive pulse.
#[derive(Debug, Default)]
pub struct Planet {
    pub transform: Transform,
    /// Value handed to the pulse shader uniform.
    pub pulse_time: f32,
}

impl Tickable for Planet {
    fn update(&mut self, _dt: f32, elapsed: f32) {
        self.transform.rotate_y(PLANET_SPIN_Y);
        self.transform.rotation *= engine_core::Quat::from_rotation_x(PLANET_SPIN_X);
        self.pulse_time = elapsed * PULSE_RATE;
    }

    fn label(&self) -> &'static str {
        "planet"
    }
}

/// Slowly turning background stars.
#[derive(Debug)]
pub struct StarShell {
    pub field: Starfield,
    pub yaw: f32,
}

impl Tickable for StarShell {
    fn update(&mut self, dt: f32, _elapsed: f32) {
        self.yaw = (self.yaw + dt * STAR_SPIN) % std::f32::consts::TAU;
    }

    fn label(&self) -> &'static str {
        "stars"
    }
}

/// Everything animated in the orbit view.
pub struct OrbitScene {
    pub planet: Planet,
    pub stars: StarShell,
    pub flyby: FlybySpawner,
}

impl OrbitScene {
    pub fn new(templates: Vec<Option<ShipTemplate>>, config: FlybyConfig, star_seed: u64, rng: StdRng) -> Self {
        Self {
            planet: Planet::default(),
            stars: StarShell {
                field: Starfield::generate(ORBIT_STAR_COUNT, ORBIT_STAR_RADIUS, star_seed),
                yaw: 0.0,
            },
            flyby: FlybySpawner::new(templates, config, rng),
        }
    }

    /// Tick every animated part, planet first, flybys last.
    pub fn update(&mut self, dt: f32, elapsed: f32) {
        let mut tickables: [&mut dyn Tickable; 3] =
            [&mut self.planet, &mut self.stars, &mut self.flyby];
        run_ordered(&mut tickables, dt, elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn pulse_clock_tracks_scene_time() {
        let mut scene = OrbitScene::new(Vec::new(), FlybyConfig::default(), 1, StdRng::seed_from_u64(1));
        scene.update(0.016, 10.0);
        assert!((scene.planet.pulse_time - 2.0).abs() < 1e-6);
    }

    #[test]
    fn stars_and_planet_turn() {
        let mut scene = OrbitScene::new(Vec::new(), FlybyConfig::default(), 1, StdRng::seed_from_u64(1));
        for i in 0..10 {
            scene.update(0.5, i as f32 * 0.5);
        }
        assert!((scene.stars.yaw - 0.05).abs() < 1e-6);
        assert_ne!(scene.planet.transform.rotation, engine_core::Quat::IDENTITY);
    }

    #[test]
    fn flybys_run_inside_the_orbit_tick() {
        let templates = vec![Some(ShipTemplate::new("corvette"))];
        let mut scene = OrbitScene::new(templates, FlybyConfig::default(), 1, StdRng::seed_from_u64(2));
        scene.update(0.6, 0.6);
        assert_eq!(scene.flyby.active().len(), 1);
    }
}
