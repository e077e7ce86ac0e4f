//! Session configuration (vehicle tuning, dust, flybys, scripted drive). Loaded from config.ron.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors loading a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config at {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Top-level settings. Every field has a default so a partial file works.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub vehicle: VehicleConfig,
    pub dust: DustConfig,
    pub flyby: FlybyConfig,
    pub session: SessionConfig,
}

/// Rover handling. Blend factors are per tick, not per second.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Forward speed while accelerating (units/s).
    pub speed: f32,
    /// Reverse speed as a fraction of `speed`.
    pub reverse_factor: f32,
    /// Steer rate while a turn key is held (rad/s).
    pub steer_speed: f32,
    /// Per-tick blend toward zero for released velocity and steer.
    pub release_damping: f32,
    /// Below this |velocity| steering has no effect.
    pub min_steer_velocity: f32,
    /// Full size of the collision box.
    pub body_size: Vec3,
    /// Box center height above the rover origin (origin sits at ground level).
    pub body_lift: f32,
    /// Collidables farther than this from the rover are not tested.
    pub broad_phase_radius: f32,
    /// Velocity is multiplied by `-bounce` on impact.
    pub bounce: f32,
    /// Distance the rover is shoved away from the collidable on impact.
    pub push_out: f32,
    pub hover_height: f32,
    pub bob_amplitude: f32,
    /// Bob angular frequency (rad/s of elapsed time).
    pub bob_frequency: f32,
    /// Per-tick blend of height toward the hover target.
    pub hover_smoothing: f32,
    /// Bank per unit of steer at full speed.
    pub bank_factor: f32,
    /// Pitch per unit of velocity.
    pub pitch_factor: f32,
    /// Per-tick blend of bank and pitch toward target.
    pub tilt_smoothing: f32,
    pub spawn_position: Vec3,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            speed: 35.0,
            reverse_factor: 0.6,
            steer_speed: 1.6,
            release_damping: 0.1,
            min_steer_velocity: 0.1,
            body_size: Vec3::new(3.5, 3.0, 7.0),
            body_lift: 1.5,
            broad_phase_radius: 300.0,
            bounce: 0.8,
            push_out: 2.0,
            hover_height: 3.5,
            bob_amplitude: 0.2,
            bob_frequency: 4.5,
            hover_smoothing: 0.15,
            bank_factor: 0.6,
            pitch_factor: 0.005,
            tilt_smoothing: 0.1,
            spawn_position: Vec3::new(0.0, 0.0, 10.0),
        }
    }
}

/// Exhaust dust pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DustConfig {
    /// Pool slots. Fixed for the life of the pool.
    pub capacity: usize,
    /// Particles spawned every tick.
    pub spawn_per_tick: usize,
    /// Life lost per second (life starts at 1).
    pub decay_rate: f32,
    /// Size gained per second.
    pub growth_rate: f32,
    /// Spawn disc radius around the rover (local space).
    pub spawn_radius: f32,
    /// Spawn height in local space (below the hovering hull).
    pub emit_height: f32,
    /// Y used to park dead particles out of view.
    pub park_height: f32,
    pub base_size: f32,
    /// Radial speed at standstill.
    pub base_blast: f32,
    /// Extra radial speed at full speed.
    pub speed_blast: f32,
}

impl Default for DustConfig {
    fn default() -> Self {
        Self {
            capacity: 200,
            spawn_per_tick: 5,
            decay_rate: 2.0,
            growth_rate: 15.0,
            spawn_radius: 3.5,
            emit_height: -3.5,
            park_height: -5000.0,
            base_size: 2.0,
            base_blast: 6.0,
            speed_blast: 5.0,
        }
    }
}

/// Background ship flybys in the orbit view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlybyConfig {
    /// Delay before the first ship (s).
    pub first_spawn_delay: f32,
    /// Countdown after a ship leaves, drawn from `[min, max)` (s).
    pub respawn_delay: (f32, f32),
    /// Progress per second, drawn from `[min, max)`.
    pub speed: (f32, f32),
    /// Uniform scale, drawn from `[min, max)`.
    pub scale: (f32, f32),
    /// Ships slower than this roll slowly along their path.
    pub majestic_speed: f32,
    /// Roll rate of majestic ships (rad/s).
    pub roll_speed: f32,
    /// X of the left/right screen edges.
    pub half_width: f32,
    /// Y of the top/bottom screen edges.
    pub half_height: f32,
    /// Random offset across the direction of travel.
    pub lateral_spread: f32,
    /// Z range of the flight lane.
    pub depth: (f32, f32),
    pub bob_amplitude: f32,
    pub bob_frequency: f32,
}

impl Default for FlybyConfig {
    fn default() -> Self {
        Self {
            first_spawn_delay: 0.5,
            respawn_delay: (3.0, 8.0),
            speed: (0.05, 0.10),
            scale: (2.0, 4.0),
            majestic_speed: 0.06,
            roll_speed: 0.15,
            half_width: 300.0,
            half_height: 160.0,
            lateral_spread: 80.0,
            depth: (-200.0, 40.0),
            bob_amplitude: 0.1,
            bob_frequency: 2.0,
        }
    }
}

/// One step of the scripted drive: hold `keys` for `seconds`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveStep {
    pub seconds: f32,
    pub keys: Vec<String>,
}

/// Headless session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub tick_rate: f64,
    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Time spent in orbit before landing (s).
    pub orbit_seconds: f32,
    pub drive: Vec<DriveStep>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let step = |seconds: f32, keys: &[&str]| DriveStep {
            seconds,
            keys: keys.iter().map(|k| k.to_string()).collect(),
        };
        Self {
            tick_rate: 60.0,
            seed: Some(7),
            orbit_seconds: 12.0,
            drive: vec![
                step(2.0, &["KeyW"]),
                step(1.5, &["KeyW", "KeyA"]),
                step(3.0, &["ArrowUp"]),
                step(1.0, &[]),
                step(2.0, &["KeyS", "KeyD"]),
                step(1.0, &[]),
            ],
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: GameConfig = ron::from_str("(vehicle: (speed: 20.0), dust: (capacity: 64))")
            .expect("partial config parses");
        assert_eq!(cfg.vehicle.speed, 20.0);
        assert_eq!(cfg.vehicle.steer_speed, 1.6);
        assert_eq!(cfg.dust.capacity, 64);
        assert_eq!(cfg.dust.spawn_per_tick, 5);
        assert_eq!(cfg.flyby.first_spawn_delay, 0.5);
    }

    #[test]
    fn defaults_roundtrip_through_ron() {
        let text = ron::ser::to_string_pretty(&GameConfig::default(), ron::ser::PrettyConfig::default())
            .expect("serializes");
        let back: GameConfig = ron::from_str(&text).expect("parses back");
        assert_eq!(back.vehicle.body_size, Vec3::new(3.5, 3.0, 7.0));
        assert_eq!(back.session.drive.len(), GameConfig::default().session.drive.len());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GameConfig::load_from(Path::new("/definitely/not/here/config.ron"))
            .expect_err("missing file");
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn bad_syntax_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("moonrover-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("config.ron");
        std::fs::write(&path, "(vehicle: (speed: )").expect("write");
        let err = GameConfig::load_from(&path).expect_err("bad syntax");
        assert!(matches!(err, ConfigError::Parse { .. }));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
