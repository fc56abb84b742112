/// Rendering layer.  All terminal I/O lives here.
///
/// Each function receives a mutable writer, the viewport mapping world
/// pixels onto terminal cells, and a read-only view of the controller.
/// No game logic is performed; this module only translates state into
/// terminal commands, using plain shapes and colours.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use flap_track::compute::bird_tilt;
use flap_track::config::GameConfig;
use flap_track::controller::Controller;
use flap_track::entities::{GameState, Obstacle, Rect};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_SKY: Color = Color::Rgb { r: 135, g: 206, b: 235 };
const C_CLOUD: Color = Color::White;
const C_PIPE: Color = Color::Rgb { r: 200, g: 162, b: 222 };
const C_PIPE_EDGE: Color = Color::Rgb { r: 80, g: 50, b: 100 };
const C_GRASS: Color = Color::Rgb { r: 84, g: 168, b: 55 };
const C_GRASS_LIGHT: Color = Color::Rgb { r: 110, g: 200, b: 70 };
const C_DIRT: Color = Color::Rgb { r: 139, g: 69, b: 19 };
const C_BIRD: Color = Color::Rgb { r: 230, g: 40, b: 40 };
const C_BIRD_EYE: Color = Color::Yellow;
const C_TEXT: Color = Color::Black;
const C_BUTTON_FG: Color = Color::White;
const C_BUTTON_BG: Color = Color::Black;
const C_NOTICE: Color = Color::DarkRed;
const C_HINT: Color = Color::DarkGrey;

/// Cloud anchors across the panorama, world pixels.
const CLOUDS: [(f64, f64); 5] = [
    (30.0, 60.0),
    (140.0, 110.0),
    (230.0, 40.0),
    (330.0, 90.0),
    (420.0, 150.0),
];

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps the fixed world onto the terminal.  The last terminal row is kept
/// for the controls hint.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    world_w: f64,
    world_h: f64,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, config: &GameConfig) -> Self {
        Viewport {
            cols: cols.max(1),
            rows: rows.saturating_sub(1).max(1),
            world_w: config.screen_width,
            world_h: config.screen_height,
        }
    }

    fn col(&self, x: f64) -> i32 {
        (x / self.world_w * self.cols as f64).floor() as i32
    }

    fn row(&self, y: f64) -> i32 {
        (y / self.world_h * self.rows as f64).floor() as i32
    }

    /// Centre of a terminal cell in world pixels.
    pub fn to_world(&self, col: u16, row: u16) -> (f64, f64) {
        (
            (col as f64 + 0.5) * self.world_w / self.cols as f64,
            (row as f64 + 0.5) * self.world_h / self.rows as f64,
        )
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, game: &Controller, view: &Viewport) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_background(out, game, view)?;
    if matches!(game.state(), GameState::Playing | GameState::GameOver) {
        for obstacle in game.obstacles() {
            draw_obstacle(out, obstacle, view)?;
        }
    }
    draw_ground(out, game, view)?;
    draw_bird(out, game, view)?;

    match game.state() {
        GameState::Menu => draw_menu(out, game, view)?,
        GameState::Playing => draw_score(out, game, view)?,
        GameState::GameOver => draw_game_over(out, game, view)?,
        GameState::Statistics => draw_statistics(out, game, view)?,
    }
    draw_controls_hint(out, game, view)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows))?;
    out.flush()?;
    Ok(())
}

// ── Primitives ────────────────────────────────────────────────────────────────

/// Fill every cell a world rectangle touches, clipped to the viewport.
fn fill_rect<W: Write>(
    out: &mut W,
    view: &Viewport,
    rect: &Rect,
    glyph: char,
    color: Color,
) -> std::io::Result<()> {
    if rect.w <= 0.0 || rect.h <= 0.0 {
        return Ok(());
    }
    let c0 = view.col(rect.left()).max(0);
    let c1 = view.col(rect.right()).min(view.cols as i32 - 1);
    let r0 = view.row(rect.top()).max(0);
    let r1 = view.row(rect.bottom()).min(view.rows as i32 - 1);
    if c0 > c1 || r0 > r1 {
        return Ok(());
    }
    let line = glyph.to_string().repeat((c1 - c0 + 1) as usize);
    out.queue(style::SetForegroundColor(color))?;
    for row in r0..=r1 {
        out.queue(cursor::MoveTo(c0 as u16, row as u16))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

/// Print `text` centred horizontally on world row `y`.
fn draw_centered<W: Write>(
    out: &mut W,
    view: &Viewport,
    y: f64,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let row = view.row(y);
    if row < 0 || row >= view.rows as i32 {
        return Ok(());
    }
    let col = (view.cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row as u16))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_button<W: Write>(
    out: &mut W,
    view: &Viewport,
    rect: &Rect,
    label: &str,
) -> std::io::Result<()> {
    let y = rect.y + rect.h / 2.0;
    out.queue(style::SetBackgroundColor(C_BUTTON_BG))?;
    draw_centered(out, view, y, &format!("[ {label} ]"), C_BUTTON_FG)?;
    out.queue(style::SetBackgroundColor(Color::Reset))?;
    Ok(())
}

// ── Scenery ───────────────────────────────────────────────────────────────────

fn draw_background<W: Write>(out: &mut W, game: &Controller, view: &Viewport) -> std::io::Result<()> {
    let config = game.config();
    let sky = Rect::new(0.0, 0.0, config.screen_width, config.sky_height());
    fill_rect(out, view, &sky, '█', C_SKY)?;

    let scroll = game.background();
    let span = scroll.period + config.screen_width;
    for (cx, cy) in CLOUDS {
        let x = (cx - scroll.offset).rem_euclid(span) - 20.0;
        let cloud = Rect::new(x, cy, 40.0, 12.0);
        fill_rect(out, view, &cloud, '▒', C_CLOUD)?;
    }
    Ok(())
}

fn draw_ground<W: Write>(out: &mut W, game: &Controller, view: &Viewport) -> std::io::Result<()> {
    let config = game.config();
    let top = view.row(config.sky_height()).max(0);
    if top >= view.rows as i32 {
        return Ok(());
    }

    // Grass strip: alternating tiles that slide with the ground offset.
    let scroll = game.ground();
    let half_tile = (scroll.period / 2.0).max(1.0);
    out.queue(cursor::MoveTo(0, top as u16))?;
    for col in 0..view.cols {
        let (x, _) = view.to_world(col, 0);
        let tile = ((x + scroll.offset) / half_tile).floor() as i64;
        let color = if tile % 2 == 0 { C_GRASS } else { C_GRASS_LIGHT };
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print('▀'))?;
    }

    let dirt = Rect::new(
        0.0,
        config.sky_height() + config.screen_height / view.rows as f64,
        config.screen_width,
        config.ground_height,
    );
    fill_rect(out, view, &dirt, '▒', C_DIRT)
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_obstacle<W: Write>(out: &mut W, obstacle: &Obstacle, view: &Viewport) -> std::io::Result<()> {
    let (top, bottom) = obstacle.regions();
    fill_rect(out, view, &top, '█', C_PIPE)?;
    fill_rect(out, view, &bottom, '█', C_PIPE)?;

    // Caps on the gap side of each barrier
    let cap_h = 8.0;
    let top_cap = Rect::new(top.x, (top.bottom() - cap_h).max(0.0), top.w, cap_h);
    fill_rect(out, view, &top_cap, '▓', C_PIPE_EDGE)?;
    if bottom.h > 0.0 {
        let bottom_cap = Rect::new(bottom.x, bottom.y, bottom.w, cap_h.min(bottom.h));
        fill_rect(out, view, &bottom_cap, '▓', C_PIPE_EDGE)?;
    }
    Ok(())
}

fn draw_bird<W: Write>(out: &mut W, game: &Controller, view: &Viewport) -> std::io::Result<()> {
    let bird = game.bird();
    let body = bird.bounds();
    fill_rect(out, view, &body, '█', C_BIRD)?;

    // The eye shows the tilt: up while rising, down while falling.
    let tilt = bird_tilt(bird);
    let eye = if tilt > 6.0 {
        '▲'
    } else if tilt < -6.0 {
        '▼'
    } else {
        '►'
    };
    let col = view.col(body.right()).min(view.cols as i32 - 1);
    let row = view.row(bird.y);
    if col >= 0 && row >= 0 && row < view.rows as i32 {
        out.queue(cursor::MoveTo(col as u16, row as u16))?;
        out.queue(style::SetForegroundColor(C_BIRD_EYE))?;
        out.queue(Print(eye))?;
    }
    Ok(())
}

// ── Screens ───────────────────────────────────────────────────────────────────

fn draw_menu<W: Write>(out: &mut W, game: &Controller, view: &Viewport) -> std::io::Result<()> {
    let h = game.config().screen_height;
    draw_centered(out, view, h / 3.0, "FLAP & TRACK", C_TEXT)?;
    draw_centered(out, view, h / 1.5, "Press SPACE to Play", C_TEXT)?;
    Ok(())
}

fn draw_score<W: Write>(out: &mut W, game: &Controller, view: &Viewport) -> std::io::Result<()> {
    draw_centered(out, view, 50.0, &game.score().to_string(), C_TEXT)
}

fn draw_game_over<W: Write>(out: &mut W, game: &Controller, view: &Viewport) -> std::io::Result<()> {
    let h = game.config().screen_height;
    draw_centered(out, view, h / 3.2, "GAME OVER", C_TEXT)?;
    draw_centered(out, view, h / 2.8, &format!("Score: {}", game.last_score()), C_TEXT)?;
    draw_centered(out, view, h / 2.0 + 40.0, "Press SPACE to Restart", C_TEXT)?;
    draw_button(out, view, &game.stats_button(), "STATISTICS")?;
    draw_centered(out, view, h / 2.0 + 125.0, "Press 'S' for Stats", C_TEXT)?;
    Ok(())
}

fn draw_statistics<W: Write>(out: &mut W, game: &Controller, view: &Viewport) -> std::io::Result<()> {
    let h = game.config().screen_height;
    let stats = game.stats();
    draw_centered(out, view, h / 4.0, "GAME STATISTICS", C_TEXT)?;
    draw_centered(
        out,
        view,
        h / 2.0 - 40.0,
        &format!("Games Played: {}", stats.total_games),
        C_TEXT,
    )?;
    draw_centered(
        out,
        view,
        h / 2.0,
        &format!("Highest Score: {}", stats.highest_score),
        C_TEXT,
    )?;
    draw_centered(
        out,
        view,
        h / 2.0 + 40.0,
        &format!("Average Score: {:.2}", stats.average_score),
        C_TEXT,
    )?;
    draw_button(out, view, &game.graphs_button(), "VIEW GRAPHS")?;
    draw_centered(out, view, h - 110.0, "Press 'G' for Graphs", C_TEXT)?;
    if let Some(notice) = game.notice() {
        draw_centered(out, view, h - 80.0, notice, C_NOTICE)?;
    }
    draw_centered(out, view, h - 50.0, "Press ENTER to Back", C_TEXT)?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, game: &Controller, view: &Viewport) -> std::io::Result<()> {
    let hint = match game.state() {
        GameState::Menu => "SPACE : Play   Q : Quit",
        GameState::Playing => "SPACE : Flap   Q : Quit",
        GameState::GameOver => "SPACE : Restart   S : Stats   Q : Quit",
        GameState::Statistics => "G : Graphs   ENTER : Back   Q : Quit",
    };
    out.queue(cursor::MoveTo(1, view.rows))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}
