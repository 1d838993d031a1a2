/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only projects canvas
/// geometry onto terminal cells and translates it into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use rand::Rng;
use rivals_shooter::config::GameConfig;
use rivals_shooter::entities::{Boss, GameState, Hostile, Projectile, Variant, WeaponKind};
use rivals_shooter::viewport::Viewport;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_WALL: Color = Color::Rgb { r: 0x02, g: 0x06, b: 0x17 }; // #020617
const C_PLAYER: Color = Color::Rgb { r: 0x38, g: 0xbd, b: 0xf8 }; // #38bdf8
const C_HOSTILE: Color = Color::Rgb { r: 0xef, g: 0x44, b: 0x44 }; // #ef4444
const C_BOSS: Color = Color::Rgb { r: 0xa8, g: 0x55, b: 0xf7 }; // #a855f7
const C_PROJECTILE: Color = Color::Rgb { r: 0xfb, g: 0xbf, b: 0x24 }; // #fbbf24
const C_HEALTH: Color = Color::Rgb { r: 0x22, g: 0xc5, b: 0x5e }; // #22c55e
const C_HEALTH_BACK: Color = Color::Rgb { r: 0x1f, g: 0x29, b: 0x37 };
const C_TEXT: Color = Color::Rgb { r: 0xe5, g: 0xe7, b: 0xeb }; // #e5e7eb
const C_SHADOW: Color = Color::Rgb { r: 0x1a, g: 0x1a, b: 0x1a };
const C_HINT: Color = Color::DarkGrey;

const SOLID: &str = "█";
const SHADE: &str = "░";

/// Gun length from the player's centre, in canvas pixels.
const BARREL: f32 = 28.0;
/// Health bar geometry in canvas pixels.
const BAR_X: f32 = 20.0;
const BAR_Y: f32 = 20.0;
const BAR_W: f32 = 200.0;
const BAR_H: f32 = 10.0;

/// A frame being drawn: where, and how far the screen is shaken.
struct Frame<'a, W: Write> {
    out: &'a mut W,
    vp: &'a Viewport,
    /// Shake offset in cells.
    dx: i32,
    dy: i32,
}

impl<W: Write> Frame<'_, W> {
    fn cell(&mut self, col: i32, row: i32, glyph: &str) -> std::io::Result<()> {
        let (col, row) = (col + self.dx, row + self.dy);
        if self.vp.contains(col, row) {
            self.out.queue(cursor::MoveTo(col as u16, row as u16))?;
            self.out.queue(Print(glyph))?;
        }
        Ok(())
    }

    /// Fill every cell whose centre lies inside the circle.  Circles smaller
    /// than a cell still light up the cell holding their centre.
    fn circle(&mut self, x: f32, y: f32, r: f32, color: Color) -> std::io::Result<()> {
        self.out.queue(style::SetForegroundColor(color))?;
        let (c0, r0) = self.vp.to_cell(x - r, y - r);
        let (c1, r1) = self.vp.to_cell(x + r, y + r);
        let mut drawn = false;
        for row in r0..=r1 {
            for col in c0..=c1 {
                if col < 0 || row < 0 {
                    continue;
                }
                let (cx, cy) = self.vp.to_canvas(col as u16, row as u16);
                if (cx - x).hypot(cy - y) <= r {
                    self.cell(col, row, SOLID)?;
                    drawn = true;
                }
            }
        }
        if !drawn {
            let (col, row) = self.vp.to_cell(x, y);
            self.cell(col, row, SOLID)?;
        }
        Ok(())
    }

    /// Flat ellipse under a circle, standing in for its drop shadow.
    fn shadow(&mut self, x: f32, y: f32, r: f32) -> std::io::Result<()> {
        let (ey, ry) = (y + r + 6.0, 6.0_f32.max(self.vp.cell_height() / 2.0));
        self.out.queue(style::SetForegroundColor(C_SHADOW))?;
        let (c0, r0) = self.vp.to_cell(x - r, ey - ry);
        let (c1, r1) = self.vp.to_cell(x + r, ey + ry);
        for row in r0..=r1 {
            for col in c0..=c1 {
                if col < 0 || row < 0 {
                    continue;
                }
                let (cx, cy) = self.vp.to_canvas(col as u16, row as u16);
                let (nx, ny) = ((cx - x) / r, (cy - ey) / ry);
                if nx * nx + ny * ny <= 1.0 {
                    self.cell(col, row, SHADE)?;
                }
            }
        }
        Ok(())
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) -> std::io::Result<()> {
        self.out.queue(style::SetForegroundColor(color))?;
        let (c0, r0) = self.vp.to_cell(x, y);
        let (c1, r1) = self.vp.to_cell(x + w - 0.01, y + h - 0.01);
        for row in r0..=r1 {
            for col in c0..=c1 {
                self.cell(col, row, SOLID)?;
            }
        }
        Ok(())
    }

    fn text(&mut self, x: f32, y: f32, msg: &str, color: Color) -> std::io::Result<()> {
        let (col, row) = self.vp.to_cell(x, y);
        let (col, row) = (col + self.dx, row + self.dy);
        if !self.vp.contains(col, row) {
            return Ok(());
        }
        self.out.queue(cursor::MoveTo(col as u16, row as u16))?;
        self.out.queue(style::SetForegroundColor(color))?;
        self.out.queue(Print(msg))?;
        Ok(())
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.  `rng` only drives the screen-shake jitter.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    vp: &Viewport,
    rng: &mut impl Rng,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (dx, dy) = if state.shake > 0.0 {
        let jx = (rng.gen::<f32>() - 0.5) * state.shake;
        let jy = (rng.gen::<f32>() - 0.5) * state.shake;
        (
            (jx / vp.cell_width()).round() as i32,
            (jy / vp.cell_height()).round() as i32,
        )
    } else {
        (0, 0)
    };
    let mut frame = Frame { out, vp, dx, dy };

    draw_map(&mut frame, state)?;
    draw_player(&mut frame, state)?;
    for p in &state.projectiles {
        draw_projectile(&mut frame, p)?;
    }
    for h in &state.hostiles {
        draw_hostile(&mut frame, h)?;
    }
    if let Some(boss) = &state.boss {
        draw_boss(&mut frame, boss)?;
    }
    draw_hud(&mut frame, state)?;

    let out = frame.out;
    draw_controls_hint(out, vp)?;
    if state.is_over() {
        draw_game_over(out, state, vp)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, vp.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Map ───────────────────────────────────────────────────────────────────────

fn draw_map<W: Write>(f: &mut Frame<'_, W>, state: &GameState) -> std::io::Result<()> {
    let tile = state.tile;
    for w in &state.walls {
        f.rect(w.x as f32 * tile, w.y as f32 * tile, tile, tile, C_WALL)?;
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(f: &mut Frame<'_, W>, state: &GameState) -> std::io::Result<()> {
    let p = &state.player;
    f.shadow(p.x, p.y, p.r)?;
    f.circle(p.x, p.y, p.r, C_PLAYER)?;

    // Barrel: the part of the gun that sticks out past the body.
    let step = f.vp.cell_width().min(f.vp.cell_height()) / 2.0;
    let mut d = p.r;
    while d <= BARREL {
        let (col, row) = f.vp.to_cell(p.x + p.angle.cos() * d, p.y + p.angle.sin() * d);
        f.cell(col, row, SOLID)?;
        d += step.max(1.0);
    }
    Ok(())
}

fn draw_projectile<W: Write>(f: &mut Frame<'_, W>, p: &Projectile) -> std::io::Result<()> {
    f.circle(p.x, p.y, p.r, C_PROJECTILE)
}

fn draw_hostile<W: Write>(f: &mut Frame<'_, W>, h: &Hostile) -> std::io::Result<()> {
    f.shadow(h.x, h.y, h.r)?;
    f.circle(h.x, h.y, h.r, C_HOSTILE)
}

fn draw_boss<W: Write>(f: &mut Frame<'_, W>, b: &Boss) -> std::io::Result<()> {
    f.shadow(b.x, b.y, b.r)?;
    f.circle(b.x, b.y, b.r, C_BOSS)
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(f: &mut Frame<'_, W>, state: &GameState) -> std::io::Result<()> {
    let p = &state.player;
    let ratio = (p.display_hp() / p.max_hp).clamp(0.0, 1.0);
    f.rect(BAR_X, BAR_Y, BAR_W, BAR_H, C_HEALTH_BACK)?;
    if ratio > 0.0 {
        f.rect(BAR_X, BAR_Y, BAR_W * ratio, BAR_H, C_HEALTH)?;
    }

    let weapon = match state.weapon {
        WeaponKind::Rifle => "Rifle",
        WeaponKind::Pistol => "Pistol",
    };
    f.text(BAR_X + BAR_W + 10.0, BAR_Y, &format!("HP {:.0}  {}", p.display_hp(), weapon), C_TEXT)?;
    f.text(20.0, 55.0, &format!("Score: {}", state.score), C_TEXT)?;
    let mut y = 75.0;
    if state.variant == Variant::Arena {
        f.text(20.0, y, &format!("Streak: {}", state.streak), C_TEXT)?;
        y += 20.0;
    }
    f.text(20.0, y, &format!("Best: {}", state.high_score), C_TEXT)?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, vp.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("WASD : Move   Mouse : Aim/Fire   SHIFT/SPACE : Dash   1/2 : Weapon   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, state: &GameState, vp: &Viewport) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>6}", state.score);
    let new_best = state.score >= state.high_score && state.score > 0;
    let best_line = if new_best {
        format!("★ NEW BEST: {:>6} ★", state.high_score)
    } else {
        format!("Best Score:  {:>6}", state.high_score)
    };

    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (&score_line, Color::Yellow),
        (&best_line, if new_best { Color::Yellow } else { Color::DarkGrey }),
        ("R - Play Again  Q - Quit", Color::White),
    ];

    let cx = vp.cols / 2;
    let start_row = (vp.rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}

// ── Mode select ───────────────────────────────────────────────────────────────

/// Mode select screen: a bordered panel with both modes, the weapon table
/// and the controls, centred in a terminal of `size` cells.
pub fn render_menu<W: Write>(
    out: &mut W,
    size: (u16, u16),
    config: &GameConfig,
    best: u32,
) -> std::io::Result<()> {
    const PANEL_W: u16 = 52;
    let (cols, rows) = size;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let rifle = &config.weapons.rifle;
    let pistol = &config.weapons.pistol;
    let boss_secs = config.timing.boss_delay_ms / 1000;
    let lines: Vec<(String, Color)> = vec![
        ("R I V A L S".to_string(), C_PLAYER),
        (format!("best {}", best), C_PROJECTILE),
        (String::new(), C_TEXT),
        ("[1] Arena    walls, streaks, boss".to_string(), C_BOSS),
        (format!("             boss arrives after {}s", boss_secs), C_HINT),
        ("[2] Classic  pursuit only, exact aim".to_string(), C_HEALTH),
        (String::new(), C_TEXT),
        ("weapon   every    speed   damage".to_string(), C_HINT),
        (
            format!("2 rifle  {:>4}ms   {:>5.1}   {:>6.0}", rifle.rate_ms, rifle.speed, rifle.damage),
            C_TEXT,
        ),
        (
            format!("1 pistol {:>4}ms   {:>5.1}   {:>6.0}", pistol.rate_ms, pistol.speed, pistol.damage),
            C_TEXT,
        ),
        (String::new(), C_TEXT),
        ("WASD move  mouse aim  hold click fire".to_string(), C_HINT),
        ("shift/space dash  q quit".to_string(), C_HINT),
    ];

    let panel_h = lines.len() as u16 + 2;
    let left = (cols / 2).saturating_sub(PANEL_W / 2);
    let top = (rows / 2).saturating_sub(panel_h / 2);
    let inner = PANEL_W.saturating_sub(2) as usize;

    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(cursor::MoveTo(left, top))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(inner))))?;
    for i in 0..lines.len() as u16 {
        out.queue(cursor::MoveTo(left, top + 1 + i))?;
        out.queue(Print(format!("│{}│", " ".repeat(inner))))?;
    }
    out.queue(cursor::MoveTo(left, top + panel_h - 1))?;
    out.queue(Print(format!("└{}┘", "─".repeat(inner))))?;

    for (i, (msg, color)) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(left + 3, top + 1 + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }

    out.queue(style::ResetColor)?;
    out.flush()
}
