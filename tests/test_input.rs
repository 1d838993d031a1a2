use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use rivals_shooter::entities::WeaponKind;
use rivals_shooter::input::{Command, InputTracker, HOLD_WINDOW};
use rivals_shooter::viewport::Viewport;

fn viewport() -> Viewport {
    Viewport::new(80, 24, 800.0, 600.0)
}

fn press(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn release(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release))
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE })
}

// ── Held keys ─────────────────────────────────────────────────────────────────

#[test]
fn key_held_within_window() {
    let mut t = InputTracker::new();
    t.handle(&press(KeyCode::Char('w')), 1, false);
    assert!(t.snapshot(1, &viewport()).up);
    assert!(t.snapshot(1 + HOLD_WINDOW, &viewport()).up);
    assert!(!t.snapshot(2 + HOLD_WINDOW, &viewport()).up);
}

#[test]
fn key_dropped_on_release() {
    let mut t = InputTracker::new();
    t.handle(&press(KeyCode::Char('d')), 1, false);
    t.handle(&release(KeyCode::Char('d')), 2, false);
    assert!(!t.snapshot(2, &viewport()).right);
}

#[test]
fn arrows_and_letters_combine() {
    let mut t = InputTracker::new();
    t.handle(&press(KeyCode::Left), 1, false);
    t.handle(&press(KeyCode::Char('s')), 1, false);
    let input = t.snapshot(1, &viewport());
    assert!(input.left && input.down);
    assert!(!input.up && !input.right);
}

#[test]
fn shifted_letter_also_dashes() {
    let mut t = InputTracker::new();
    t.handle(&Event::Key(KeyEvent::new(KeyCode::Char('W'), KeyModifiers::SHIFT)), 1, false);
    let input = t.snapshot(1, &viewport());
    assert!(input.up);
    assert!(input.dash);
}

#[test]
fn space_dashes() {
    let mut t = InputTracker::new();
    t.handle(&press(KeyCode::Char(' ')), 1, false);
    assert!(t.snapshot(1, &viewport()).dash);
}

#[test]
fn focus_lost_releases_everything() {
    let mut t = InputTracker::new();
    t.handle(&press(KeyCode::Char('a')), 1, false);
    t.handle(&mouse(MouseEventKind::Down(MouseButton::Left), 10, 10), 1, false);
    t.handle(&Event::FocusLost, 1, false);
    let input = t.snapshot(1, &viewport());
    assert!(!input.left);
    assert!(!input.fire);
}

// ── Weapon switch ─────────────────────────────────────────────────────────────

#[test]
fn weapon_switch_is_one_shot() {
    let mut t = InputTracker::new();
    t.handle(&press(KeyCode::Char('1')), 1, false);
    assert_eq!(t.snapshot(1, &viewport()).weapon_select, Some(WeaponKind::Pistol));
    assert_eq!(t.snapshot(2, &viewport()).weapon_select, None);

    t.handle(&press(KeyCode::Char('2')), 3, false);
    assert_eq!(t.snapshot(3, &viewport()).weapon_select, Some(WeaponKind::Rifle));
}

// ── Pointer ───────────────────────────────────────────────────────────────────

#[test]
fn pointer_defaults_to_canvas_centre() {
    let mut t = InputTracker::new();
    let input = t.snapshot(1, &viewport());
    assert_eq!((input.pointer_x, input.pointer_y), (400.0, 300.0));
}

#[test]
fn mouse_button_holds_fire_and_moves_pointer() {
    let mut t = InputTracker::new();
    t.handle(&mouse(MouseEventKind::Down(MouseButton::Left), 40, 12), 1, false);
    let input = t.snapshot(1, &viewport());
    assert!(input.fire);
    assert_eq!((input.pointer_x, input.pointer_y), (405.0, 312.5));

    t.handle(&mouse(MouseEventKind::Moved, 0, 0), 2, false);
    let input = t.snapshot(2, &viewport());
    assert!(input.fire);
    assert_eq!((input.pointer_x, input.pointer_y), (5.0, 12.5));

    t.handle(&mouse(MouseEventKind::Up(MouseButton::Left), 0, 0), 3, false);
    assert!(!t.snapshot(3, &viewport()).fire);
}

// ── Commands ──────────────────────────────────────────────────────────────────

#[test]
fn quit_keys() {
    let mut t = InputTracker::new();
    assert_eq!(t.handle(&press(KeyCode::Char('q')), 1, false), Command::Quit);
    assert_eq!(t.handle(&press(KeyCode::Esc), 1, false), Command::Quit);
    let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert_eq!(t.handle(&ctrl_c, 1, false), Command::Quit);
}

#[test]
fn restart_only_after_game_over() {
    let mut t = InputTracker::new();
    assert_eq!(t.handle(&press(KeyCode::Char('r')), 1, false), Command::Continue);
    assert_eq!(t.handle(&press(KeyCode::Char('r')), 2, true), Command::Restart);
}
