//! Tunable gameplay constants.
//!
//! Every section carries `#[serde(default)]`, so a config file only needs the
//! values it changes:
//!
//! ```toml
//! [hostile]
//! speed = 3.0
//!
//! [map]
//! solid_walls = true
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::entities::{WallTile, WeaponKind};
use crate::error::ConfigError;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "RIVALS_SHOOTER_CONFIG";
/// Config file looked up in the working directory when the variable is unset.
pub const DEFAULT_CONFIG_FILE: &str = "rivals_shooter.toml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self { width: 800.0, height: 600.0 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Fixed simulation steps per second.
    pub steps_per_second: u32,
    /// Upper bound on catch-up steps run by a single `advance` call.
    pub max_steps_per_advance: u32,
    pub spawn_interval_ms: u64,
    pub boss_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            steps_per_second: 60,
            max_steps_per_advance: 8,
            spawn_interval_ms: 800,
            boss_delay_ms: 20_000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub radius: f32,
    pub speed: f32,
    pub max_hp: f32,
    pub dash_distance: f32,
    /// Frames between dashes.
    pub dash_cooldown: u32,
    /// Damage taken per overlapping hostile per frame.
    pub contact_damage: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: 16.0,
            speed: 5.0,
            max_hp: 100.0,
            dash_distance: 120.0,
            dash_cooldown: 80,
            contact_damage: 0.6,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponConfig {
    /// Fire interval while the trigger is held.
    pub rate_ms: u64,
    pub speed: f32,
    pub damage: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponsConfig {
    pub rifle: WeaponConfig,
    pub pistol: WeaponConfig,
}

impl Default for WeaponsConfig {
    fn default() -> Self {
        Self {
            rifle: WeaponConfig { rate_ms: 90, speed: 11.0, damage: 12.0 },
            pistol: WeaponConfig { rate_ms: 250, speed: 9.0, damage: 25.0 },
        }
    }
}

impl WeaponsConfig {
    pub fn get(&self, kind: WeaponKind) -> &WeaponConfig {
        match kind {
            WeaponKind::Rifle => &self.rifle,
            WeaponKind::Pistol => &self.pistol,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub radius: f32,
    /// Total width of the random aim spread in radians (Arena only).
    pub jitter: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self { radius: 3.0, jitter: 0.1 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostileConfig {
    pub radius: f32,
    pub hp: f32,
    pub speed: f32,
    /// How far outside the screen edge new hostiles appear.
    pub spawn_offset: f32,
}

impl Default for HostileConfig {
    fn default() -> Self {
        Self { radius: 18.0, hp: 40.0, speed: 2.2, spawn_offset: 30.0 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    pub radius: f32,
    pub hp: f32,
    pub spawn_y: f32,
    /// Peak horizontal displacement per frame.
    pub sway_amplitude: f32,
    /// Game-time divisor of the sway sine, in milliseconds.
    pub sway_period_ms: f32,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            radius: 45.0,
            hp: 500.0,
            spawn_y: 100.0,
            sway_amplitude: 2.0,
            sway_period_ms: 500.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub fire_shake: f32,
    pub dash_shake: f32,
    pub hit_shake: f32,
    /// Per-frame multiplier applied to the shake magnitude.
    pub shake_decay: f32,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self { fire_shake: 6.0, dash_shake: 12.0, hit_shake: 5.0, shake_decay: 0.9 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Tile edge length in canvas pixels.
    pub tile: f32,
    /// Push the player out of wall tiles. Off by default: walls are scenery.
    pub solid_walls: bool,
    pub walls: Vec<WallTile>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile: 50.0,
            solid_walls: false,
            walls: vec![
                WallTile { x: 6, y: 4 },
                WallTile { x: 7, y: 4 },
                WallTile { x: 8, y: 4 },
                WallTile { x: 6, y: 5 },
            ],
        }
    }
}

/// Top-level game configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub canvas: CanvasConfig,
    pub timing: TimingConfig,
    pub player: PlayerConfig,
    pub weapons: WeaponsConfig,
    pub projectile: ProjectileConfig,
    pub hostile: HostileConfig,
    pub boss: BossConfig,
    pub effects: EffectsConfig,
    pub map: MapConfig,
}

impl GameConfig {
    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a config file. Missing fields fall back to their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&contents)
    }

    /// Like [`GameConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let config = Self::load(path)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Length of one simulation step.
    pub fn step_duration(&self) -> Duration {
        Duration::from_secs(1) / self.timing.steps_per_second.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_tuning() {
        let c = GameConfig::default();
        assert_eq!(c.canvas.width, 800.0);
        assert_eq!(c.weapons.rifle.rate_ms, 90);
        assert_eq!(c.weapons.pistol.damage, 25.0);
        assert_eq!(c.hostile.hp, 40.0);
        assert_eq!(c.map.walls.len(), 4);
        assert!(!c.map.solid_walls);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let c = GameConfig::from_toml("[hostile]\nspeed = 3.5\n").unwrap();
        assert_eq!(c.hostile.speed, 3.5);
        assert_eq!(c.hostile.radius, 18.0);
        assert_eq!(c.player, PlayerConfig::default());
    }

    #[test]
    fn walls_can_be_replaced() {
        let c = GameConfig::from_toml(
            "[map]\nsolid_walls = true\nwalls = [{ x = 1, y = 2 }]\n",
        )
        .unwrap();
        assert!(c.map.solid_walls);
        assert_eq!(c.map.walls, vec![WallTile { x: 1, y: 2 }]);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = GameConfig::from_toml("canvas = 12").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn serialized_config_reads_back() {
        let c = GameConfig::default();
        let text = c.to_toml().unwrap();
        assert_eq!(GameConfig::from_toml(&text).unwrap(), c);
    }

    #[test]
    fn config_file_round_trips_through_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"[timing]\nspawn_interval_ms = 400\n").unwrap();
        let c = GameConfig::load_or_default(file.path()).unwrap();
        assert_eq!(c.timing.spawn_interval_ms, 400);
        assert_eq!(c.timing.steps_per_second, 60);
    }

    #[test]
    fn step_is_one_sixtieth_of_a_second() {
        let step = GameConfig::default().step_duration();
        assert_eq!(step, Duration::from_nanos(16_666_666));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let c = GameConfig::load_or_default(dir.path().join("rivals_shooter.toml")).unwrap();
        assert_eq!(c, GameConfig::default());
    }
}
