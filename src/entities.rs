/// All game entity types — pure data, no logic.

use std::time::Duration;

/// Which of the two gameplay flavours a session runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// Boss, wall tiles, kill streak, aim jitter and screen shake.
    Arena,
    /// Bare pursuit shooter: projectiles follow the pointer angle exactly.
    Classic,
}

impl Variant {
    pub fn has_boss(self) -> bool {
        self == Variant::Arena
    }

    pub fn has_walls(self) -> bool {
        self == Variant::Arena
    }

    pub fn has_effects(self) -> bool {
        self == Variant::Arena
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WeaponKind {
    Rifle,
    Pistol,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub speed: f32,
    /// Facing angle in radians, measured from +x toward +y (screen down).
    pub angle: f32,
    pub hp: f32,
    pub max_hp: f32,
    /// Frames until the next dash is allowed.
    pub dash_cooldown: u32,
}

impl Player {
    /// Hit points as shown on the HUD (never negative).
    pub fn display_hp(&self) -> f32 {
        self.hp.max(0.0)
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    /// Heading in radians.
    pub angle: f32,
    /// Distance travelled per frame.
    pub speed: f32,
    pub r: f32,
    pub damage: f32,
}

impl Projectile {
    /// Per-frame displacement `(dx, dy)`.
    pub fn velocity(&self) -> (f32, f32) {
        (self.angle.cos() * self.speed, self.angle.sin() * self.speed)
    }
}

// ── Hostiles & boss ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Hostile {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub hp: f32,
    pub speed: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub hp: f32,
    pub phase: u32,
}

/// A static map cell, in tile units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WallTile {
    pub x: i32,
    pub y: i32,
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Everything the loop reads from the player's devices for one frame.
/// Pointer coordinates are already in canvas space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub dash: bool,
    pub fire: bool,
    pub pointer_x: f32,
    pub pointer_y: f32,
    /// One-shot weapon switch requested this frame.
    pub weapon_select: Option<WeaponKind>,
}

// ── Timers ────────────────────────────────────────────────────────────────────

/// Elapsed-time counters that replace free-running platform timers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timers {
    /// Time since the last fire-interval boundary.
    pub fire: Duration,
    /// Time since the last hostile spawn.
    pub spawn: Duration,
    /// Set once the boss has been spawned, so it never comes back.
    pub boss_spawned: bool,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub variant: Variant,
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub hostiles: Vec<Hostile>,
    /// Optional boss slot (Arena only).
    pub boss: Option<Boss>,
    pub walls: Vec<WallTile>,
    /// Wall tile edge length in canvas pixels.
    pub tile: f32,
    pub weapon: WeaponKind,
    pub score: u32,
    /// Consecutive kills (Arena only).
    pub streak: u32,
    /// The highest score seen so far (updated live during play).
    pub high_score: u32,
    /// Current screen-shake magnitude in canvas pixels.
    pub shake: f32,
    pub timers: Timers,
    pub status: GameStatus,
    pub frame: u64,
    /// Game time, advanced by one fixed step per `step` call.
    pub elapsed: Duration,
    pub width: f32,
    pub height: f32,
}

impl GameState {
    pub fn is_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }
}
