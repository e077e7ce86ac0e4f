//! Background ship flybys for the orbit view.
//!
//! Strict single-active scheduling: at most one ship is in flight. When it
//! reaches the far edge it is removed, a randomized countdown is armed, and the
//! next template (round-robin over the loaded ones) launches when the
//! countdown runs out. Spawns and despawns are queued as [`FlybyEvent`]s so the
//! scene layer can attach and detach meshes.

use engine_core::{Tickable, Transform, TransformRaw, Vec3};
use rand::prelude::*;

use crate::config::FlybyConfig;

/// Step used when the host hands us a zero, negative or non-finite delta.
pub const FALLBACK_DT: f32 = 0.016;

/// Slowest allowed flight (progress/s). Keeps a zero or negative speed range from stalling the lane.
pub const MIN_SPEED: f32 = 0.01;

/// Undrained events kept. Older ones are dropped first.
pub const MAX_QUEUED_EVENTS: usize = 64;

/// A ship model the spawner may launch. Loaded asynchronously, so slots may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipTemplate {
    pub name: String,
}

impl ShipTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Which screen edge a ship enters from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
}

impl Edge {
    const ALL: [Edge; 4] = [
        Edge::LeftToRight,
        Edge::RightToLeft,
        Edge::TopToBottom,
        Edge::BottomToTop,
    ];
}

/// A ship in flight.
#[derive(Debug, Clone)]
pub struct FlybyActor {
    pub id: u64,
    /// Index into the spawner's template slots.
    pub template: usize,
    pub edge: Edge,
    pub start: Vec3,
    pub end: Vec3,
    /// 0 at `start`, 1 at `end`.
    pub progress: f32,
    /// Progress per second.
    pub speed: f32,
    /// Roll rate (rad/s). Zero for ordinary ships.
    pub roll_speed: f32,
    /// Roll accumulated since launch (rad).
    pub roll: f32,
    pub transform: Transform,
}

/// Spawn/despawn notifications for the scene layer.
#[derive(Debug, Clone, PartialEq)]
pub enum FlybyEvent {
    Spawned { id: u64, template: usize },
    Despawned { id: u64 },
}

/// Schedules one background ship at a time.
pub struct FlybySpawner {
    templates: Vec<Option<ShipTemplate>>,
    active: Vec<FlybyActor>,
    events: Vec<FlybyEvent>,
    /// Seconds since the spawner started.
    time: f32,
    /// Spawner time at which the next ship may launch.
    next_spawn: f32,
    /// Round-robin position over template slots.
    cursor: usize,
    next_id: u64,
    warned_empty: bool,
    config: FlybyConfig,
    rng: StdRng,
}

impl FlybySpawner {
    pub fn new(templates: Vec<Option<ShipTemplate>>, config: FlybyConfig, rng: StdRng) -> Self {
        Self {
            templates,
            active: Vec::with_capacity(1),
            events: Vec::new(),
            time: 0.0,
            next_spawn: config.first_spawn_delay,
            cursor: 0,
            next_id: 0,
            warned_empty: false,
            config,
            rng,
        }
    }

    /// Fill (or empty) a template slot once its model finishes loading.
    pub fn set_template(&mut self, slot: usize, template: Option<ShipTemplate>) {
        if slot >= self.templates.len() {
            self.templates.resize(slot + 1, None);
        }
        self.templates[slot] = template;
        if self.templates[slot].is_some() {
            self.warned_empty = false;
        }
    }

    /// Ships currently in flight (zero or one).
    pub fn active(&self) -> &[FlybyActor] {
        &self.active
    }

    /// Drain queued spawn/despawn events. Call once per tick; at most
    /// [`MAX_QUEUED_EVENTS`] are held between drains.
    pub fn take_events(&mut self) -> Vec<FlybyEvent> {
        std::mem::take(&mut self.events)
    }

    /// Instance matrices for the ships in flight, ready for upload.
    pub fn instances(&self) -> Vec<TransformRaw> {
        self.active.iter().map(|a| TransformRaw::from(&a.transform)).collect()
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Seconds until the next launch may happen (0 when due or a ship is flying).
    pub fn countdown(&self) -> f32 {
        if self.active.is_empty() {
            (self.next_spawn - self.time).max(0.0)
        } else {
            0.0
        }
    }

    /// Advance by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { FALLBACK_DT };
        self.time += dt;

        self.advance_active(dt);

        if self.active.is_empty() && self.time >= self.next_spawn {
            self.spawn_next();
        }
    }

    fn advance_active(&mut self, dt: f32) {
        let bob = (self.time * self.config.bob_frequency).sin() * self.config.bob_amplitude;
        let mut finished = Vec::new();

        for actor in &mut self.active {
            actor.progress += actor.speed * dt;
            if actor.progress >= 1.0 {
                finished.push(actor.id);
                continue;
            }
            place_on_path(actor);
            actor.transform.position.y += bob;
            if actor.roll_speed != 0.0 {
                // Applied on top of the fresh look-at orientation.
                actor.roll += actor.roll_speed * dt;
                actor.transform.rotate_z(actor.roll);
            }
        }

        if finished.is_empty() {
            return;
        }
        self.active.retain(|a| !finished.contains(&a.id));
        for id in finished {
            log::debug!("flyby {} left the screen", id);
            self.queue(FlybyEvent::Despawned { id });
        }
        let (lo, hi) = self.config.respawn_delay;
        self.next_spawn = self.time + sample_range(&mut self.rng, lo, hi);
    }

    fn spawn_next(&mut self) {
        let Some(template) = self.next_template() else {
            if !self.warned_empty {
                log::warn!("flyby: no ship templates loaded, nothing to launch");
                self.warned_empty = true;
            }
            return;
        };

        let cfg = &self.config;
        let edge = Edge::ALL[self.rng.gen_range(0..Edge::ALL.len())];
        let lateral = sample_range(&mut self.rng, -cfg.lateral_spread, cfg.lateral_spread);
        let depth = sample_range(&mut self.rng, cfg.depth.0, cfg.depth.1);
        let (start, end) = edge_path(edge, cfg.half_width, cfg.half_height, lateral, depth);
        let speed = sample_range(&mut self.rng, cfg.speed.0, cfg.speed.1).max(MIN_SPEED);
        let scale = sample_range(&mut self.rng, cfg.scale.0, cfg.scale.1);
        let roll_speed = if speed < cfg.majestic_speed { cfg.roll_speed } else { 0.0 };

        let id = self.next_id;
        self.next_id += 1;

        let mut actor = FlybyActor {
            id,
            template,
            edge,
            start,
            end,
            progress: 0.0,
            speed,
            roll_speed,
            roll: 0.0,
            transform: Transform {
                scale: Vec3::splat(scale),
                ..Transform::from_position(start)
            },
        };
        place_on_path(&mut actor);

        log::info!(
            "flyby {} launched: template {} {:?} speed {:.3}",
            id,
            template,
            edge,
            speed
        );
        self.queue(FlybyEvent::Spawned { id, template });
        self.active.push(actor);
    }

    fn queue(&mut self, event: FlybyEvent) {
        if self.events.len() >= MAX_QUEUED_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    /// Next loaded template slot at or after the cursor, wrapping once.
    fn next_template(&mut self) -> Option<usize> {
        let n = self.templates.len();
        let slot = (0..n)
            .map(|offset| (self.cursor + offset) % n)
            .find(|&slot| self.templates[slot].is_some())?;
        self.cursor = (slot + 1) % n;
        Some(slot)
    }
}

impl Tickable for FlybySpawner {
    fn update(&mut self, dt: f32, _elapsed: f32) {
        FlybySpawner::update(self, dt);
    }

    fn label(&self) -> &'static str {
        "flyby"
    }
}

/// Position on the straight path, facing the end point.
fn place_on_path(actor: &mut FlybyActor) {
    actor.transform.position = actor.start.lerp(actor.end, actor.progress);
    actor.transform.look_at(actor.end, Vec3::Y);
}

/// Start/end points for an edge, offset across the direction of travel by `lateral`.
fn edge_path(edge: Edge, half_width: f32, half_height: f32, lateral: f32, depth: f32) -> (Vec3, Vec3) {
    match edge {
        Edge::LeftToRight => (
            Vec3::new(-half_width, lateral, depth),
            Vec3::new(half_width, -lateral, depth),
        ),
        Edge::RightToLeft => (
            Vec3::new(half_width, lateral, depth),
            Vec3::new(-half_width, -lateral, depth),
        ),
        Edge::TopToBottom => (
            Vec3::new(lateral, half_height, depth),
            Vec3::new(-lateral, -half_height, depth),
        ),
        Edge::BottomToTop => (
            Vec3::new(lateral, -half_height, depth),
            Vec3::new(-lateral, half_height, depth),
        ),
    }
}

/// Uniform sample from `[lo, hi)`; returns `lo` for an empty range.
fn sample_range(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}
