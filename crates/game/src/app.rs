//! Which view is live and the transitions between them.

use input::KeyQuery;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::config::GameConfig;
use crate::flyby::ShipTemplate;
use crate::orbit::OrbitScene;
use crate::surface::SurfaceScene;
use crate::vehicle::CollisionOutcome;

/// Flyby template slots. The last two never finish loading.
const SHIP_SLOTS: [Option<&str>; 6] = [
    Some("planet_ship_1"),
    Some("planet_ship_2"),
    Some("planet_ship_5"),
    Some("planet_ship_6"),
    None,
    None,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Orbit,
    Surface,
}

/// Owns both scenes. Only the active one ticks.
pub struct App {
    mode: ViewMode,
    orbit: OrbitScene,
    surface: Option<SurfaceScene>,
    config: GameConfig,
    rng: StdRng,
}

impl App {
    pub fn new(config: GameConfig) -> Self {
        let mut rng = match config.session.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let templates = SHIP_SLOTS
            .iter()
            .map(|slot| slot.map(ShipTemplate::new))
            .collect();
        let orbit = OrbitScene::new(
            templates,
            config.flyby.clone(),
            rng.next_u64(),
            StdRng::seed_from_u64(rng.next_u64()),
        );
        Self {
            mode: ViewMode::Orbit,
            orbit,
            surface: None,
            config,
            rng,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn orbit(&self) -> &OrbitScene {
        &self.orbit
    }

    pub fn orbit_mut(&mut self) -> &mut OrbitScene {
        &mut self.orbit
    }

    pub fn surface(&self) -> Option<&SurfaceScene> {
        self.surface.as_ref()
    }

    /// Planet clicked: build the surface scene and switch to it.
    pub fn land(&mut self) {
        if self.mode == ViewMode::Surface {
            return;
        }
        let star_seed = self.rng.next_u64();
        let rng = StdRng::seed_from_u64(self.rng.next_u64());
        self.surface = Some(SurfaceScene::build(&self.config, star_seed, rng));
        self.mode = ViewMode::Surface;
        log::info!("view: orbit -> surface");
    }

    /// Leave the surface and drop its scene.
    pub fn back(&mut self) {
        if self.mode == ViewMode::Orbit {
            return;
        }
        self.surface = None;
        self.mode = ViewMode::Orbit;
        log::info!("view: surface -> orbit");
    }

    /// Tick the active view. Returns the rover's collision outcome on the surface.
    pub fn tick(&mut self, dt: f32, elapsed: f32, input: &(impl KeyQuery + ?Sized)) -> Option<CollisionOutcome> {
        match (self.mode, self.surface.as_mut()) {
            (ViewMode::Surface, Some(surface)) => Some(surface.update(dt, elapsed, input)),
            _ => {
                self.orbit.update(dt, elapsed);
                None
            }
        }
    }
}
