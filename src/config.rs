/// Game constants.
///
/// All geometry is in world pixels on a fixed 288 x 512 playfield; the
/// display layer scales that onto the terminal.  Physics values are per
/// frame at `FPS`.
use std::time::Duration;

// ── World ─────────────────────────────────────────────────────────────────────

pub const SCREEN_WIDTH: f64 = 288.0;
pub const SCREEN_HEIGHT: f64 = 512.0;
pub const GROUND_HEIGHT: f64 = 80.0;
pub const FPS: u32 = 60;

// ── Obstacles ─────────────────────────────────────────────────────────────────

pub const PIPE_GAP: f64 = 110.0;
pub const PIPE_WIDTH: f64 = 52.0;
pub const PIPE_SCROLL_SPEED: f64 = 2.0;
pub const PIPE_SPAWN_INTERVAL: Duration = Duration::from_millis(1500);
/// Smallest allowed top barrier.
pub const MIN_TOP_HEIGHT: u32 = 100;
/// Smallest allowed bottom barrier.
pub const MIN_BOTTOM_HEIGHT: u32 = 100;
/// Added to `MIN_TOP_HEIGHT` when the gap leaves no valid range.
pub const SPAWN_FALLBACK_MARGIN: u32 = 50;

// ── Bird ──────────────────────────────────────────────────────────────────────

pub const BIRD_WIDTH: f64 = 34.0;
pub const BIRD_HEIGHT: f64 = 24.0;
pub const GRAVITY: f64 = 0.25;
pub const FLAP_IMPULSE: f64 = -5.5;
pub const MAX_FALL_SPEED: f64 = 8.0;

// ── Scenery ───────────────────────────────────────────────────────────────────

/// Background pans slower than the pipes for a parallax effect.
pub const BACKGROUND_SCROLL_SPEED: f64 = 0.5;
/// Panorama width minus the visible screen width.
pub const BACKGROUND_PERIOD: f64 = 288.0;
pub const GROUND_SCROLL_SPEED: f64 = PIPE_SCROLL_SPEED;
pub const GROUND_TILE_WIDTH: f64 = 24.0;

/// Per-frame bird physics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Physics {
    pub gravity: f64,
    /// Velocity set by a flap (negative is upward).
    pub impulse: f64,
    pub max_fall_speed: f64,
}

impl Default for Physics {
    fn default() -> Self {
        Physics {
            gravity: GRAVITY,
            impulse: FLAP_IMPULSE,
            max_fall_speed: MAX_FALL_SPEED,
        }
    }
}

/// Every tunable the controller reads.  `Default` is the shipped game;
/// tests build variants with struct update syntax.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub screen_width: f64,
    pub screen_height: f64,
    pub ground_height: f64,
    pub frame: Duration,

    pub pipe_gap: f64,
    pub pipe_width: f64,
    pub pipe_speed: f64,
    pub spawn_interval: Duration,
    pub min_top_height: u32,
    pub min_bottom_height: u32,
    pub spawn_fallback_margin: u32,

    pub bird_width: f64,
    pub bird_height: f64,
    pub physics: Physics,

    pub background_speed: f64,
    pub background_period: f64,
    pub ground_speed: f64,
    pub ground_period: f64,
}

impl GameConfig {
    /// Where a fresh bird starts: a quarter across, half way down.
    pub fn bird_start(&self) -> (f64, f64) {
        (
            (self.screen_width / 4.0).floor(),
            (self.screen_height / 2.0).floor(),
        )
    }

    /// Height of the playable sky above the ground strip.
    pub fn sky_height(&self) -> f64 {
        self.screen_height - self.ground_height
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            ground_height: GROUND_HEIGHT,
            frame: Duration::from_secs(1) / FPS,
            pipe_gap: PIPE_GAP,
            pipe_width: PIPE_WIDTH,
            pipe_speed: PIPE_SCROLL_SPEED,
            spawn_interval: PIPE_SPAWN_INTERVAL,
            min_top_height: MIN_TOP_HEIGHT,
            min_bottom_height: MIN_BOTTOM_HEIGHT,
            spawn_fallback_margin: SPAWN_FALLBACK_MARGIN,
            bird_width: BIRD_WIDTH,
            bird_height: BIRD_HEIGHT,
            physics: Physics::default(),
            background_speed: BACKGROUND_SCROLL_SPEED,
            background_period: BACKGROUND_PERIOD,
            ground_speed: GROUND_SCROLL_SPEED,
            ground_period: GROUND_TILE_WIDTH,
        }
    }
}
