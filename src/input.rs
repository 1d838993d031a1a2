//! Terminal events → per-frame [`InputState`].
//!
//! Keys are tracked by the frame number of their last press/repeat event
//! rather than acted on one event at a time, so any combination of held keys
//! applies simultaneously.  This works on two classes of terminal:
//!
//! * **Keyboard-enhancement capable** (kitty protocol): proper
//!   `Press` / `Repeat` / `Release` events, keys are dropped on release.
//! * **Classic terminals**: only `Press` events.  Keys expire after
//!   `HOLD_WINDOW` frames of silence, which is shorter than the OS repeat
//!   interval, so a key stays live while it is generating repeats.

use std::collections::HashMap;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode, MouseButton,
    MouseEvent, MouseEventKind,
};

use crate::entities::{InputState, WeaponKind};
use crate::viewport::Viewport;

/// A key counts as held if its last press/repeat event arrived within this
/// many frames.
pub const HOLD_WINDOW: u64 = 4;

/// Canonical key used for every dash binding.
const DASH_KEY: KeyCode = KeyCode::Modifier(ModifierKeyCode::LeftShift);

/// What the front end should do after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Continue,
    Quit,
    /// Leave a finished game and return to the menu.
    Restart,
}

#[derive(Debug, Default)]
pub struct InputTracker {
    /// Each held key → the frame it was last seen.
    key_frame: HashMap<KeyCode, u64>,
    /// Last pointer cell, if the mouse has moved over the terminal yet.
    pointer: Option<(u16, u16)>,
    fire: bool,
    weapon_select: Option<WeaponKind>,
}

/// Fold aliases onto one key: letters to lowercase, both shifts and space
/// onto the dash key.
fn canonical(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(' ') => DASH_KEY,
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        KeyCode::Modifier(ModifierKeyCode::RightShift) => DASH_KEY,
        other => other,
    }
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one terminal event seen during `frame`.
    pub fn handle(&mut self, event: &Event, frame: u64, game_over: bool) -> Command {
        match event {
            Event::Key(key) => self.handle_key(key, frame, game_over),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse);
                Command::Continue
            }
            Event::FocusLost => {
                // Releases are lost while unfocused; drop everything held.
                self.key_frame.clear();
                self.fire = false;
                Command::Continue
            }
            _ => Command::Continue,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, frame: u64, game_over: bool) -> Command {
        let code = canonical(key.code);
        match key.kind {
            KeyEventKind::Press => {
                self.key_frame.insert(code, frame);
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.key_frame.insert(DASH_KEY, frame);
                }
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => return Command::Quit,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Command::Quit;
                    }
                    KeyCode::Char('r') if game_over => return Command::Restart,
                    KeyCode::Char('1') => self.weapon_select = Some(WeaponKind::Pistol),
                    KeyCode::Char('2') => self.weapon_select = Some(WeaponKind::Rifle),
                    _ => {}
                }
            }
            KeyEventKind::Repeat => {
                self.key_frame.insert(code, frame);
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.key_frame.insert(DASH_KEY, frame);
                }
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&code);
            }
        }
        Command::Continue
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.fire = true,
            MouseEventKind::Up(MouseButton::Left) => self.fire = false,
            _ => {}
        }
        self.pointer = Some((mouse.column, mouse.row));
    }

    fn is_held(&self, key: KeyCode, frame: u64) -> bool {
        self.key_frame
            .get(&key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    fn any_held(&self, keys: &[KeyCode], frame: u64) -> bool {
        keys.iter().any(|&k| self.is_held(k, frame))
    }

    /// Input for `frame`.  A pending weapon switch is handed out once.
    pub fn snapshot(&mut self, frame: u64, viewport: &Viewport) -> InputState {
        let (pointer_x, pointer_y) = match self.pointer {
            Some((col, row)) => viewport.to_canvas(col, row),
            None => (viewport.canvas_width / 2.0, viewport.canvas_height / 2.0),
        };

        InputState {
            up: self.any_held(&[KeyCode::Char('w'), KeyCode::Up], frame),
            down: self.any_held(&[KeyCode::Char('s'), KeyCode::Down], frame),
            left: self.any_held(&[KeyCode::Char('a'), KeyCode::Left], frame),
            right: self.any_held(&[KeyCode::Char('d'), KeyCode::Right], frame),
            dash: self.is_held(DASH_KEY, frame),
            fire: self.fire,
            pointer_x,
            pointer_y,
            weapon_select: self.weapon_select.take(),
        }
    }
}
