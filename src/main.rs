mod display;

use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use crossterm::{
    cursor,
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::ThreadRng;
use rand::thread_rng;

use rivals_shooter::config::{GameConfig, CONFIG_ENV, DEFAULT_CONFIG_FILE};
use rivals_shooter::entities::Variant;
use rivals_shooter::error::GameError;
use rivals_shooter::input::{Command, InputTracker};
use rivals_shooter::session::Session;
use rivals_shooter::store::{FileScoreStore, ScoreStore};
use rivals_shooter::viewport::Viewport;

/// Log output goes to a file: stderr would scribble over the game screen.
const LOG_FILE: &str = "rivals_shooter.log";

fn init_logging() {
    // Without a writable log file the game runs silently.
    if let Ok(file) = std::fs::File::create(LOG_FILE) {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }
}

fn load_config() -> Result<GameConfig, GameError> {
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    Ok(GameConfig::load_or_default(path)?)
}

// ── Terminal lifecycle ────────────────────────────────────────────────────────

/// Raw mode, alternate screen, mouse and focus reporting for as long as it
/// lives.  Dropping it hands the terminal back, on error paths too.
struct TerminalGuard {
    keyboard_enhanced: bool,
}

impl TerminalGuard {
    fn enter() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        out.execute(terminal::EnterAlternateScreen)?
            .execute(EnableMouseCapture)?
            .execute(EnableFocusChange)?
            .execute(cursor::Hide)?;
        // Release/repeat events need the kitty protocol; other terminals
        // refuse the flags and input falls back to the hold window.
        let keyboard_enhanced = out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
        Ok(Self { keyboard_enhanced })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = stdout();
        if self.keyboard_enhanced {
            let _ = out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = out.execute(cursor::Show);
        let _ = out.execute(DisableFocusChange);
        let _ = out.execute(DisableMouseCapture);
        let _ = out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Blocking terminal reads on their own thread, forwarded over a channel so
/// the game loop only ever polls.
fn spawn_event_reader() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(e) => {
                log::error!("terminal input failed: {}", e);
                break;
            }
        }
    });
    rx
}

// ── Mode select ───────────────────────────────────────────────────────────────

enum MenuChoice {
    Play(Variant),
    Exit,
}

fn menu_choice(code: KeyCode) -> Option<MenuChoice> {
    match code {
        KeyCode::Char('1') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(MenuChoice::Play(Variant::Arena))
        }
        KeyCode::Char('2') | KeyCode::Char('c') | KeyCode::Char('C') => {
            Some(MenuChoice::Play(Variant::Classic))
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(MenuChoice::Exit),
        _ => None,
    }
}

/// Draw the mode select and wait for a choice.  Redraws on resize.
fn choose_mode<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    best: u32,
) -> std::io::Result<MenuChoice> {
    display::render_menu(out, terminal::size()?, config, best)?;
    loop {
        let Ok(ev) = rx.recv() else {
            // Input thread is gone; nothing more can be chosen.
            return Ok(MenuChoice::Exit);
        };
        match ev {
            Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) => {
                if let Some(choice) = menu_choice(code) {
                    return Ok(choice);
                }
            }
            Event::Resize(cols, rows) => display::render_menu(out, (cols, rows), config, best)?,
            _ => {}
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Play one session until the player quits (`Ok(true)`) or asks to go back
/// to the mode select after a game over (`Ok(false)`).
///
/// Each frame drains pending events into the tracker, feeds the wall-clock
/// time since the previous frame to the session's fixed-step accumulator,
/// then renders.  A finished session ignores further time, so the last frame
/// stays on screen under the overlay.
fn play<W: Write, S: ScoreStore>(
    out: &mut W,
    session: &mut Session<S, ThreadRng>,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<bool> {
    let mut shake_rng = thread_rng();
    let mut tracker = InputTracker::new();
    let frame_budget = session.config().step_duration();
    let (canvas_w, canvas_h) = (session.config().canvas.width, session.config().canvas.height);
    let mut last = Instant::now();

    for frame in 1u64.. {
        let started = Instant::now();

        for ev in rx.try_iter() {
            match tracker.handle(&ev, frame, session.is_over()) {
                Command::Quit => return Ok(true),
                Command::Restart => return Ok(false),
                Command::Continue => {}
            }
        }

        let (cols, rows) = terminal::size()?;
        let viewport = Viewport::new(cols, rows, canvas_w, canvas_h);
        let input = tracker.snapshot(frame, &viewport);
        session.advance(started - last, &input);
        last = started;

        display::render(out, session.state(), &viewport, &mut shake_rng)?;

        if let Some(rest) = frame_budget.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }
    Ok(true)
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), GameError> {
    init_logging();
    let config = load_config()?;

    let _terminal = TerminalGuard::enter()?;
    let rx = spawn_event_reader();
    let mut out = BufWriter::new(stdout());
    run(&mut out, &rx, &config)
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
) -> Result<(), GameError> {
    let store = FileScoreStore::in_home();
    log::info!("best score file: {}", store.path().display());

    while let MenuChoice::Play(variant) = choose_mode(out, rx, config, store.load_or_zero())? {
        let mut session = Session::new(variant, config.clone(), store.clone(), thread_rng());
        if play(out, &mut session, rx)? {
            break;
        }
    }
    Ok(())
}
