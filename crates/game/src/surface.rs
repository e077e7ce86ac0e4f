//! Surface view: lunar ground, link props with their colliders, and the rover.
//!
//! Props live in a `hecs` world. Colliders are generated once at build time;
//! the rover gets the same immutable list every tick.

use engine_core::{Transform, Vec3};
use hecs::World;
use input::KeyQuery;
use physics::{compound_colliders, Aabb, Collidable, Link, LinkKind};
use procgen::{
    ground_height, GroundConfig, GroundMesh, LunarTerrain, Starfield, SURFACE_STAR_COUNT,
    SURFACE_STAR_RADIUS,
};
use rand::rngs::StdRng;

use crate::config::GameConfig;
use crate::vehicle::{CollisionOutcome, Rover};

pub const TEMPLE_URL: &str = "https://cursoc.vercel.app/";
pub const ALIEN_URL: &str = "https://link-tree-snows.vercel.app/";
pub const SIGN_URL: &str = "https://gameofskate.vercel.app/";

/// Named scene prop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prop {
    pub name: &'static str,
}

/// Temple part boxes relative to its base: (center, size). The first entry is
/// the courtyard slab, wide enough that collider generation drops it.
const TEMPLE_PARTS: [([f32; 3], [f32; 3]); 7] = [
    ([0.0, 0.5, 0.0], [320.0, 1.0, 320.0]),
    ([0.0, 10.0, -20.0], [44.0, 20.0, 4.0]),
    ([-20.0, 10.0, 0.0], [4.0, 20.0, 36.0]),
    ([20.0, 10.0, 0.0], [4.0, 20.0, 36.0]),
    ([-12.0, 9.0, 20.0], [3.0, 18.0, 3.0]),
    ([12.0, 9.0, 20.0], [3.0, 18.0, 3.0]),
    ([0.0, 0.2, 22.0], [0.4, 0.4, 0.4]),
];

/// Everything simulated in the surface view.
pub struct SurfaceScene {
    pub world: World,
    pub ground: GroundMesh,
    pub stars: Starfield,
    pub rover: Rover,
    collidables: Vec<Collidable>,
}

impl SurfaceScene {
    pub fn build(config: &GameConfig, star_seed: u64, rng: StdRng) -> Self {
        let mut world = World::new();
        let mut collidables = Vec::new();

        let temple_base = on_ground(-200.0, -200.0);
        let temple_link = Link::new(TEMPLE_URL, LinkKind::Transition);
        let parts: Vec<Aabb> = TEMPLE_PARTS
            .iter()
            .map(|(c, s)| Aabb::from_center_size(temple_base + Vec3::from(*c), Vec3::from(*s)))
            .collect();
        spawn_prop(
            &mut world,
            &mut collidables,
            "temple",
            temple_base,
            compound_colliders(&parts, Some(&temple_link)),
        );

        let alien_link = Link::new(ALIEN_URL, LinkKind::Transition);
        spawn_prop(
            &mut world,
            &mut collidables,
            "alien",
            on_ground(80.0, 80.0),
            vec![Collidable::manual_box(80.0, 80.0, 6.0, 6.0).with_link(alien_link)],
        );

        let sign_link = Link::new(SIGN_URL, LinkKind::Transition);
        spawn_prop(
            &mut world,
            &mut collidables,
            "sign",
            on_ground(-80.0, 80.0),
            vec![Collidable::manual_box(-80.0, 80.0, 25.0, 8.0).with_link(sign_link)],
        );

        log::info!("surface scene: {} props, {} colliders", world.len(), collidables.len());

        Self {
            world,
            ground: GroundMesh::generate(GroundConfig::default(), &LunarTerrain),
            stars: Starfield::generate(SURFACE_STAR_COUNT, SURFACE_STAR_RADIUS, star_seed),
            rover: Rover::with_parts(
                config.vehicle.clone(),
                config.dust.clone(),
                Box::new(LunarTerrain),
                rng,
            ),
            collidables,
        }
    }

    pub fn collidables(&self) -> &[Collidable] {
        &self.collidables
    }

    /// Advance the rover one tick against the scene's colliders.
    pub fn update(&mut self, dt: f32, elapsed: f32, input: &(impl KeyQuery + ?Sized)) -> CollisionOutcome {
        self.rover.update(dt, elapsed, input, Some(&self.collidables))
    }

    /// Link of the collider containing `point`, for the click handler.
    pub fn link_at(&self, point: Vec3) -> Option<Link> {
        self.world
            .query::<&Collidable>()
            .iter()
            .find_map(|(_, c)| c.link().filter(|_| c.bounds().contains_point(point)).cloned())
    }

    /// Names of props with a collider reference within `radius` of `point`.
    pub fn props_near(&self, point: Vec3, radius: f32) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .world
            .query::<(&Prop, &Collidable)>()
            .iter()
            .filter(|(_, (_, c))| c.reference().is_some_and(|r| r.distance(point) <= radius))
            .map(|(_, (prop, _))| prop.name)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

fn on_ground(x: f32, z: f32) -> Vec3 {
    Vec3::new(x, ground_height(x, z), z)
}

/// One entity per collider so link lookups can query colliders directly.
fn spawn_prop(
    world: &mut World,
    collidables: &mut Vec<Collidable>,
    name: &'static str,
    base: Vec3,
    colliders: Vec<Collidable>,
) {
    for collider in colliders {
        collidables.push(collider.clone());
        world.spawn((Prop { name }, Transform::from_position(base), collider));
    }
}
