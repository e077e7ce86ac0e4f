//! Moonrover - headless session runner for the lunar showcase simulation

use anyhow::{Context, Result};
use engine_core::{step_for_rate, Time};
use input::{parse_key_code, ElementState, InputState};
use std::path::PathBuf;

use game::app::App;
use game::config::{DriveStep, GameConfig};
use game::flyby::FlybyEvent;
use game::vehicle::CollisionOutcome;

/// Props within this distance of the rover are reported as nearby links.
const LINK_REPORT_RADIUS: f32 = 40.0;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            GameConfig::load_from(&path)
                .with_context(|| format!("loading session config {}", path.display()))?
        }
        None => GameConfig::load(),
    };

    if !(config.session.tick_rate.is_finite() && config.session.tick_rate > 0.0) {
        anyhow::bail!("session tick_rate must be positive, got {}", config.session.tick_rate);
    }

    log::info!(
        "moonrover: {} Hz, seed {:?}, {} drive steps",
        config.session.tick_rate,
        config.session.seed,
        config.session.drive.len()
    );

    let step = step_for_rate(config.session.tick_rate);
    let orbit_seconds = config.session.orbit_seconds;
    let drive = config.session.drive.clone();

    let mut app = App::new(config);
    let mut time = Time::new();
    let mut input = InputState::new();

    // Orbit until the planet is clicked.
    while time.elapsed_seconds() < orbit_seconds {
        time.advance(step);
        app.tick(time.delta_seconds(), time.elapsed_seconds(), &input);
        report_flybys(&mut app);
    }
    app.land();
    if let Some(surface) = app.surface() {
        log::info!("landed with {} collidables", surface.collidables().len());
    }

    for (i, drive_step) in drive.iter().enumerate() {
        hold_keys(&mut input, drive_step);
        log::info!("drive step {}: {:?} for {:.1}s", i, drive_step.keys, drive_step.seconds);

        let end = time.elapsed_seconds() + drive_step.seconds;
        let mut hits = 0;
        while time.elapsed_seconds() < end {
            time.advance(step);
            if let Some(CollisionOutcome::Hit { index, push }) =
                app.tick(time.delta_seconds(), time.elapsed_seconds(), &input)
            {
                hits += 1;
                log::debug!("collision with collidable {} ({:?})", index, push);
            }
        }
        report_rover(&app, hits);
    }

    app.back();
    log::info!(
        "session done: {} ticks, {:.1}s simulated, view {:?}",
        time.frame_count(),
        time.elapsed_seconds(),
        app.mode()
    );
    Ok(())
}

/// Replace the held key set with the step's keys.
fn hold_keys(input: &mut InputState, step: &DriveStep) {
    input.clear();
    for name in &step.keys {
        match parse_key_code(name) {
            Some(key) => input.process_keyboard(key, ElementState::Pressed),
            None => log::warn!("drive step: unknown key {:?}, ignored", name),
        }
    }
}

fn report_flybys(app: &mut App) {
    for event in app.orbit_mut().flyby.take_events() {
        match event {
            FlybyEvent::Spawned { id, template } => log::info!("flyby {} launched (slot {})", id, template),
            FlybyEvent::Despawned { id } => log::info!("flyby {} left the view", id),
        }
    }
}

fn report_rover(app: &App, hits: usize) {
    let Some(surface) = app.surface() else {
        return;
    };
    let rover = &surface.rover;
    let p = rover.position();
    let tilt = rover.tilt();
    log::info!(
        "rover at ({:.1}, {:.1}, {:.1}) v={:.1} steer={:.2} bank={:.3} pitch={:.3} hits={} dust={} ({} bytes)",
        p.x,
        p.y,
        p.z,
        rover.velocity(),
        rover.steer(),
        tilt.bank,
        tilt.pitch,
        hits,
        rover.dust().live_count(),
        rover.dust().as_bytes().len()
    );
    log::debug!("rover box {:?}, last collision {:?}", rover.bounds(), rover.last_outcome());
    for name in surface.props_near(p, LINK_REPORT_RADIUS) {
        log::info!("near {}", name);
    }
    if let Some(link) = surface.link_at(p) {
        log::info!("inside link {} ({:?})", link.url, link.kind);
    }
}
