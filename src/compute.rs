/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a brand-new
/// `GameState`.  Side effects are limited to the injected RNG and logging.

use std::time::Duration;

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{
    Boss, GameState, GameStatus, Hostile, InputState, Player, Projectile, Timers, Variant,
    WallTile, WeaponKind,
};

// ── Circle geometry ───────────────────────────────────────────────────────────

/// Anything that collides as a circle.
pub trait Circle {
    fn center(&self) -> (f32, f32);
    fn radius(&self) -> f32;
}

impl Circle for Player {
    fn center(&self) -> (f32, f32) {
        (self.x, self.y)
    }
    fn radius(&self) -> f32 {
        self.r
    }
}

impl Circle for Projectile {
    fn center(&self) -> (f32, f32) {
        (self.x, self.y)
    }
    fn radius(&self) -> f32 {
        self.r
    }
}

impl Circle for Hostile {
    fn center(&self) -> (f32, f32) {
        (self.x, self.y)
    }
    fn radius(&self) -> f32 {
        self.r
    }
}

impl Circle for Boss {
    fn center(&self) -> (f32, f32) {
        (self.x, self.y)
    }
    fn radius(&self) -> f32 {
        self.r
    }
}

/// Two circles intersect iff their centres are strictly closer than the sum
/// of their radii.  Touching circles do not overlap.
pub fn overlap<A: Circle + ?Sized, B: Circle + ?Sized>(a: &A, b: &B) -> bool {
    let (ax, ay) = a.center();
    let (bx, by) = b.center();
    (ax - bx).hypot(ay - by) < a.radius() + b.radius()
}

/// One pursuit step: `speed` units from `(x, y)` toward `(tx, ty)`.
pub fn move_toward(x: f32, y: f32, tx: f32, ty: f32, speed: f32) -> (f32, f32) {
    let angle = (ty - y).atan2(tx - x);
    (x + angle.cos() * speed, y + angle.sin() * speed)
}

/// True once a point has left the play area.
fn out_of_bounds(x: f32, y: f32, width: f32, height: f32) -> bool {
    x < 0.0 || y < 0.0 || x > width || y > height
}

/// Push a circle out of an axis-aligned wall tile it overlaps.
fn push_out_of_wall(x: f32, y: f32, r: f32, wall: &WallTile, tile: f32) -> (f32, f32) {
    let left = wall.x as f32 * tile;
    let top = wall.y as f32 * tile;
    let (right, bottom) = (left + tile, top + tile);

    let nx = x.clamp(left, right);
    let ny = y.clamp(top, bottom);
    let (dx, dy) = (x - nx, y - ny);
    let dist = dx.hypot(dy);

    if dist >= r {
        return (x, y);
    }
    if dist > 0.0 {
        let push = r - dist;
        return (x + dx / dist * push, y + dy / dist * push);
    }

    // Centre inside the tile: leave through the nearest face.
    let exits = [
        (x - left + r, (-1.0, 0.0)),
        (right - x + r, (1.0, 0.0)),
        (y - top + r, (0.0, -1.0)),
        (bottom - y + r, (0.0, 1.0)),
    ];
    let (depth, (ux, uy)) = exits
        .iter()
        .copied()
        .fold(exits[0], |best, e| if e.0 < best.0 { e } else { best });
    (x + ux * depth, y + uy * depth)
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state for a variant, with the player centred.
pub fn init_state(variant: Variant, config: &GameConfig, high_score: u32) -> GameState {
    let width = config.canvas.width;
    let height = config.canvas.height;
    let walls = if variant.has_walls() {
        config.map.walls.clone()
    } else {
        Vec::new()
    };

    GameState {
        variant,
        player: Player {
            x: width / 2.0,
            y: height / 2.0,
            r: config.player.radius,
            speed: config.player.speed,
            angle: 0.0,
            hp: config.player.max_hp,
            max_hp: config.player.max_hp,
            dash_cooldown: 0,
        },
        projectiles: Vec::new(),
        hostiles: Vec::new(),
        boss: None,
        walls,
        tile: config.map.tile,
        weapon: WeaponKind::Rifle,
        score: 0,
        streak: 0,
        high_score,
        shake: 0.0,
        timers: Timers::default(),
        status: GameStatus::Playing,
        frame: 0,
        elapsed: Duration::ZERO,
        width,
        height,
    }
}

// ── Timer-driven spawns (pure apart from the RNG) ────────────────────────────

/// Fire one projectile from the player with the current weapon.
///
/// Arena aims along the facing angle with a small random spread; Classic
/// aims straight at the pointer.
pub fn player_shoot(
    state: &GameState,
    input: &InputState,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> GameState {
    if state.is_over() {
        return state.clone();
    }
    let weapon = config.weapons.get(state.weapon);
    let p = &state.player;

    let angle = match state.variant {
        Variant::Arena => p.angle + (rng.gen::<f32>() - 0.5) * config.projectile.jitter,
        Variant::Classic => (input.pointer_y - p.y).atan2(input.pointer_x - p.x),
    };

    let mut projectiles = state.projectiles.clone();
    projectiles.push(Projectile {
        x: p.x,
        y: p.y,
        angle,
        speed: weapon.speed,
        r: config.projectile.radius,
        damage: weapon.damage,
    });

    let shake = if state.variant.has_effects() {
        config.effects.fire_shake
    } else {
        state.shake
    };

    GameState {
        projectiles,
        shake,
        ..state.clone()
    }
}

/// Add a hostile just outside a uniformly chosen screen edge.
pub fn spawn_hostile(state: &GameState, config: &GameConfig, rng: &mut impl Rng) -> GameState {
    let h = &config.hostile;
    let (w, ht, off) = (state.width, state.height, h.spawn_offset);

    let (x, y) = match rng.gen_range(0..4) {
        0 => (rng.gen::<f32>() * w, -off),
        1 => (w + off, rng.gen::<f32>() * ht),
        2 => (rng.gen::<f32>() * w, ht + off),
        _ => (-off, rng.gen::<f32>() * ht),
    };

    let mut hostiles = state.hostiles.clone();
    hostiles.push(Hostile { x, y, r: h.radius, hp: h.hp, speed: h.speed });
    GameState {
        hostiles,
        ..state.clone()
    }
}

/// Occupy the boss slot.  Only ever happens once per game.
pub fn spawn_boss(state: &GameState, config: &GameConfig) -> GameState {
    let b = &config.boss;
    GameState {
        boss: Some(Boss {
            x: state.width / 2.0,
            y: b.spawn_y,
            r: b.radius,
            hp: b.hp,
            phase: 1,
        }),
        timers: Timers {
            boss_spawned: true,
            ..state.timers.clone()
        },
        ..state.clone()
    }
}

// ── Fixed step (timers + frame update) ───────────────────────────────────────

/// Advance the simulation by one fixed step: game time moves forward by
/// `config.step_duration()`, a requested weapon switch takes effect, the
/// fire/spawn/boss timers run, then [`tick`].
///
/// A finished game is returned unchanged.
pub fn step(
    state: &GameState,
    input: &InputState,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> GameState {
    if state.is_over() {
        return state.clone();
    }
    let dt = config.step_duration();
    let mut s = state.clone();
    s.elapsed += dt;
    if let Some(kind) = input.weapon_select {
        s.weapon = kind;
    }

    // Fire timer runs whether or not the trigger is held; it only emits
    // while it is.
    s.timers.fire += dt;
    loop {
        let rate = Duration::from_millis(config.weapons.get(s.weapon).rate_ms.max(1));
        if s.timers.fire < rate {
            break;
        }
        s.timers.fire -= rate;
        if input.fire {
            s = player_shoot(&s, input, config, rng);
        }
    }

    let spawn_every = Duration::from_millis(config.timing.spawn_interval_ms.max(1));
    s.timers.spawn += dt;
    while s.timers.spawn >= spawn_every {
        s.timers.spawn -= spawn_every;
        s = spawn_hostile(&s, config, rng);
    }

    let boss_due = s.elapsed >= Duration::from_millis(config.timing.boss_delay_ms);
    if s.variant.has_boss() && !s.timers.boss_spawned && boss_due {
        log::info!("boss spawned at {:?}", s.elapsed);
        s = spawn_boss(&s, config);
    }

    tick(&s, input, config)
}

// ── Per-frame update ─────────────────────────────────────────────────────────

/// Run one frame of gameplay.  Movement is per call, not scaled by time.
pub fn tick(state: &GameState, input: &InputState, config: &GameConfig) -> GameState {
    if state.is_over() {
        return state.clone();
    }
    let effects = state.variant.has_effects();
    let mut shake = state.shake * config.effects.shake_decay;
    let weapon = input.weapon_select.unwrap_or(state.weapon);

    // ── 1. Movement (diagonals are intentionally not normalised) ────────────
    let mut player = state.player.clone();
    if input.up {
        player.y -= player.speed;
    }
    if input.down {
        player.y += player.speed;
    }
    if input.left {
        player.x -= player.speed;
    }
    if input.right {
        player.x += player.speed;
    }

    // ── 2. Dash ──────────────────────────────────────────────────────────────
    if input.dash && player.dash_cooldown == 0 {
        player.x += player.angle.cos() * config.player.dash_distance;
        player.y += player.angle.sin() * config.player.dash_distance;
        player.dash_cooldown = config.player.dash_cooldown;
        if effects {
            shake = config.effects.dash_shake;
        }
    }
    player.dash_cooldown = player.dash_cooldown.saturating_sub(1);

    if config.map.solid_walls {
        for wall in &state.walls {
            let (x, y) = push_out_of_wall(player.x, player.y, player.r, wall, state.tile);
            player.x = x;
            player.y = y;
        }
    }

    // ── 3. Aim ───────────────────────────────────────────────────────────────
    player.angle = (input.pointer_y - player.y).atan2(input.pointer_x - player.x);

    // ── 4. Move projectiles, drop the ones that left the canvas ─────────────
    let projectiles: Vec<Projectile> = state
        .projectiles
        .iter()
        .filter_map(|p| {
            let (dx, dy) = p.velocity();
            let (x, y) = (p.x + dx, p.y + dy);
            if out_of_bounds(x, y, state.width, state.height) {
                None
            } else {
                Some(Projectile { x, y, ..p.clone() })
            }
        })
        .collect();

    // ── 5. Pursuit + contact damage ─────────────────────────────────────────
    let hostiles: Vec<Hostile> = state
        .hostiles
        .iter()
        .map(|h| {
            let (x, y) = move_toward(h.x, h.y, player.x, player.y, h.speed);
            Hostile { x, y, ..h.clone() }
        })
        .collect();

    let touching = hostiles.iter().filter(|h| overlap(*h, &player)).count();
    player.hp -= touching as f32 * config.player.contact_damage;

    // ── 6. Projectiles ↔ hostiles (tag spent projectiles, compact after) ────
    let mut spent = vec![false; projectiles.len()];
    let mut kills: u32 = 0;

    let hostiles: Vec<Hostile> = hostiles
        .into_iter()
        .filter_map(|mut h| {
            for (pi, p) in projectiles.iter().enumerate() {
                if spent[pi] || !overlap(&h, p) {
                    continue;
                }
                h.hp -= p.damage;
                spent[pi] = true;
                if effects {
                    shake = config.effects.hit_shake;
                }
                if h.hp <= 0.0 {
                    kills += 1;
                    return None;
                }
            }
            Some(h)
        })
        .collect();

    // ── 7. Boss ──────────────────────────────────────────────────────────────
    let boss = match &state.boss {
        Some(b) if state.variant.has_boss() => {
            let mut b = b.clone();
            let t = state.elapsed.as_secs_f32() * 1000.0;
            b.x += (t / config.boss.sway_period_ms).sin() * config.boss.sway_amplitude;
            for (pi, p) in projectiles.iter().enumerate() {
                if !spent[pi] && overlap(&b, p) {
                    b.hp -= p.damage;
                    spent[pi] = true;
                }
            }
            b.phase = if b.hp <= config.boss.hp / 2.0 { 2 } else { 1 };
            if b.hp <= 0.0 {
                log::info!("boss destroyed on frame {}", state.frame + 1);
                None
            } else {
                Some(b)
            }
        }
        _ => None,
    };

    let projectiles: Vec<Projectile> = projectiles
        .into_iter()
        .zip(spent)
        .filter_map(|(p, used)| if used { None } else { Some(p) })
        .collect();

    // ── 8. Keep the player fully on screen ───────────────────────────────────
    player.x = player.x.min(state.width - player.r).max(player.r);
    player.y = player.y.min(state.height - player.r).max(player.r);

    // ── 9. Score & status ───────────────────────────────────────────────────
    let score = state.score + kills;
    let streak = if effects { state.streak + kills } else { state.streak };
    let status = if player.hp <= 0.0 {
        log::info!("game over on frame {} with score {}", state.frame + 1, score);
        GameStatus::GameOver
    } else {
        GameStatus::Playing
    };

    GameState {
        player,
        projectiles,
        hostiles,
        boss,
        weapon,
        score,
        streak,
        high_score: state.high_score.max(score),
        shake,
        status,
        frame: state.frame + 1,
        ..state.clone()
    }
}
