mod display;

use std::fs::{self, OpenOptions};
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use flap_track::config::GameConfig;
use flap_track::controller::Controller;
use flap_track::entities::Input;
use flap_track::launcher::{DashboardLauncher, DASHBOARD_BIN};
use flap_track::session_log::{self, SessionLog, LOG_FILE_NAME};

use display::Viewport;

const TRACE_FILE_NAME: &str = "flap_track.log";

// ── Input mapping ─────────────────────────────────────────────────────────────

enum Command {
    Game(Input),
    Resize(u16, u16),
    Quit,
}

fn map_event(event: Event, view: &Viewport) -> Option<Command> {
    match event {
        Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            modifiers,
            ..
        }) => match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
            KeyCode::Char(' ') | KeyCode::Up => Some(Command::Game(Input::Primary)),
            KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::Game(Input::Secondary)),
            KeyCode::Enter => Some(Command::Game(Input::Confirm)),
            KeyCode::Char('g') | KeyCode::Char('G') => Some(Command::Game(Input::Tertiary)),
            _ => None,
        },
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) => {
            let (x, y) = view.to_world(column, row);
            Some(Command::Game(Input::Click { x, y }))
        }
        Event::Resize(cols, rows) => Some(Command::Resize(cols, rows)),
        _ => None,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.  Each frame: drain every queued input and
/// apply them in order, then one `update`, then render.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Controller,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    let mut rng = thread_rng();
    let frame = game.config().frame;
    let (cols, rows) = terminal::size()?;
    let mut view = Viewport::new(cols, rows, game.config());
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(event) = rx.try_recv() {
            match map_event(event, &view) {
                Some(Command::Game(input)) => game.handle_input(input),
                Some(Command::Resize(cols, rows)) => {
                    view = Viewport::new(cols, rows, game.config());
                }
                Some(Command::Quit) => return Ok(()),
                None => {}
            }
        }

        let dt = last_tick.elapsed();
        last_tick = Instant::now();
        if let Err(e) = game.update(dt, &mut rng) {
            error!(error = %e, "failed to write session record");
        }

        display::render(out, game, &view)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_tracing(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create data dir: {}", dir.display()))?;
    let path = dir.join(TRACE_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open trace log: {}", path.display()))?;

    // The terminal is in raw mode while playing, so traces go to a file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let data_dir = session_log::data_dir();
    init_tracing(&data_dir)?;

    let log = SessionLog::new(data_dir.join(LOG_FILE_NAME));
    let launcher = DashboardLauncher::beside_current_exe().unwrap_or_else(|e| {
        warn!(error = %e, "could not resolve executable dir, using PATH for dashboard");
        DashboardLauncher::new(DASHBOARD_BIN)
    });
    info!(log = %log.path().display(), dashboard = %launcher.program().display(), "starting");
    let mut game = Controller::new(GameConfig::default(), log, Box::new(launcher));

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = game_loop(&mut out, &mut game, &rx);

    // Always restore the terminal
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    let logged = game.quit().context("failed to log the unfinished session");
    if let Err(e) = &logged {
        error!(error = %e, "session lost on quit");
    }
    info!("exiting");
    result.and(logged.map(|_| ()))
}
