/// All game entity types.  Plain data plus geometry accessors; the rules
/// that move them live in `compute`.

use std::time::Duration;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in world pixels.  `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Rect { x, y, w, h }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.w / 2.0
    }

    /// Overlap test, touching edges count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }
}

// ── Bird ──────────────────────────────────────────────────────────────────────

/// The player.  `x`/`y` are the centre of the sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bird {
    pub x: f64,
    pub y: f64,
    pub velocity: f64,
    pub width: f64,
    pub height: f64,
}

impl Bird {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Bird {
            x,
            y,
            velocity: 0.0,
            width,
            height,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.x - self.width / 2.0,
            self.y - self.height / 2.0,
            self.width,
            self.height,
        )
    }
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

/// One pipe pair.  The top barrier hangs from the ceiling, the bottom one
/// rises from `floor`; `gap` pixels separate them.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    /// Left edge.
    pub x: f64,
    pub top_height: f64,
    pub gap: f64,
    pub width: f64,
    /// Screen height the bottom barrier extends to.
    pub floor: f64,
    pub speed: f64,
    /// Set once the bird has cleared this pair and the point was awarded.
    pub passed: bool,
}

impl Obstacle {
    /// May be negative when a degenerate spawn range had to be widened.
    pub fn bottom_height(&self) -> f64 {
        self.floor - self.top_height - self.gap
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// `(top, bottom)` barrier rectangles, used for drawing and collision.
    pub fn regions(&self) -> (Rect, Rect) {
        let top = Rect::new(self.x, 0.0, self.width, self.top_height);
        let bottom = Rect::new(
            self.x,
            self.top_height + self.gap,
            self.width,
            self.bottom_height().max(0.0),
        );
        (top, bottom)
    }
}

// ── Scenery & timers ──────────────────────────────────────────────────────────

/// A scroll offset that wraps into `[0, period)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scroll {
    pub offset: f64,
    pub speed: f64,
    pub period: f64,
}

impl Scroll {
    pub fn new(speed: f64, period: f64) -> Self {
        Scroll {
            offset: 0.0,
            speed,
            period,
        }
    }
}

/// Fires every `interval` of accumulated time while running.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnTimer {
    pub interval: Duration,
    pub elapsed: Duration,
    pub running: bool,
}

impl SpawnTimer {
    pub fn new(interval: Duration) -> Self {
        SpawnTimer {
            interval,
            elapsed: Duration::ZERO,
            running: false,
        }
    }
}

// ── Game flow ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Menu,
    Playing,
    GameOver,
    Statistics,
}

/// One discrete player input, collected by the loop and fed to the
/// controller in arrival order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Input {
    /// Start, flap, restart.
    Primary,
    /// Open the statistics screen.
    Secondary,
    /// Leave the statistics screen.
    Confirm,
    /// Launch the dashboard.
    Tertiary,
    /// Left click, already mapped into world pixels.
    Click { x: f64, y: f64 },
}

// ── Persistence ───────────────────────────────────────────────────────────────

/// One row of the session log.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionRecord {
    /// Local time, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    /// Whole points when written by the game.  Hand-edited logs may carry
    /// any finite number, which is kept as read.
    pub score: f64,
    /// Rounded to two decimals.
    pub duration_seconds: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StatsSummary {
    pub total_games: usize,
    /// Best score, truncated toward zero.
    pub highest_score: i64,
    pub average_score: f64,
}
