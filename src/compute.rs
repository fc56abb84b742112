/// Pure game-logic functions.
///
/// Every function takes immutable references to entities (and, where
/// needed, an RNG handle) and returns new values.  Side effects are
/// limited to the injected RNG; the controller decides what to keep.

use std::time::Duration;

use rand::Rng;

use crate::config::{GameConfig, Physics};
use crate::entities::{Bird, Obstacle, Rect, Scroll, SpawnTimer};

// ── Bird ──────────────────────────────────────────────────────────────────────

/// Flap: velocity becomes the impulse constant whatever it was before.
pub fn flap(bird: &Bird, physics: &Physics) -> Bird {
    Bird {
        velocity: physics.impulse,
        ..*bird
    }
}

/// One frame of gravity.  Velocity is capped before it moves the bird.
pub fn advance_bird(bird: &Bird, physics: &Physics) -> Bird {
    let velocity = (bird.velocity + physics.gravity).min(physics.max_fall_speed);
    Bird {
        y: bird.y + velocity,
        velocity,
        ..*bird
    }
}

/// Sprite rotation in degrees (positive tilts the beak up).  Presentation
/// only, never stored.
pub fn bird_tilt(bird: &Bird) -> f64 {
    -bird.velocity * 3.0
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

/// Inclusive range a top barrier height is drawn from.  An inverted range
/// (gap too large for the screen) is widened by the fallback margin.
pub fn top_height_range(config: &GameConfig) -> (u32, u32) {
    let min_top = config.min_top_height;
    let max_top = config.screen_height.floor() as i64
        - config.pipe_gap.ceil() as i64
        - config.min_bottom_height as i64;
    if max_top < min_top as i64 {
        (min_top, min_top + config.spawn_fallback_margin)
    } else {
        (min_top, max_top as u32)
    }
}

/// New pipe pair parked at the right edge of the screen.
pub fn spawn_obstacle(config: &GameConfig, rng: &mut impl Rng) -> Obstacle {
    let (lo, hi) = top_height_range(config);
    let top_height = rng.gen_range(lo..=hi) as f64;
    Obstacle {
        x: config.screen_width,
        top_height,
        gap: config.pipe_gap,
        width: config.pipe_width,
        floor: config.screen_height,
        speed: config.pipe_speed,
        passed: false,
    }
}

pub fn advance_obstacle(obstacle: &Obstacle) -> Obstacle {
    Obstacle {
        x: obstacle.x - obstacle.speed,
        ..obstacle.clone()
    }
}

/// True once the whole pair is past the left edge.
pub fn has_exited(obstacle: &Obstacle) -> bool {
    obstacle.right() < 0.0
}

/// Move every pair left, score pairs whose centre is now strictly left of
/// `bird_left`, and drop the ones that left the screen.  Returns the
/// surviving pairs (spawn order kept) and the points earned this frame.
pub fn advance_obstacles(obstacles: &[Obstacle], bird_left: f64) -> (Vec<Obstacle>, u32) {
    let mut points = 0;
    let moved = obstacles
        .iter()
        .map(|o| {
            let mut o = advance_obstacle(o);
            if !o.passed && o.center_x() < bird_left {
                o.passed = true;
                points += 1;
            }
            o
        })
        .filter(|o| !has_exited(o))
        .collect();
    (moved, points)
}

// ── Collision ─────────────────────────────────────────────────────────────────

/// Does `body` hit a barrier, the ground line or the ceiling?
pub fn detect_collision(
    body: &Rect,
    obstacles: &[Obstacle],
    ground_height: f64,
    screen_height: f64,
) -> bool {
    let hits_pipe = obstacles.iter().any(|o| {
        let (top, bottom) = o.regions();
        body.intersects(&top) || body.intersects(&bottom)
    });
    hits_pipe || body.bottom() >= screen_height - ground_height || body.top() <= 0.0
}

// ── Scenery & timers ──────────────────────────────────────────────────────────

pub fn advance_scroll(scroll: &Scroll) -> Scroll {
    let offset = if scroll.period > 0.0 {
        (scroll.offset + scroll.speed).rem_euclid(scroll.period)
    } else {
        0.0
    };
    Scroll { offset, ..*scroll }
}

/// Accumulate `dt` and report whether the interval elapsed.  Fires at
/// most once per call; only the remainder past the last whole interval
/// carries over, so a stalled frame spawns one obstacle.  A stopped timer
/// never fires.
pub fn tick_timer(timer: &SpawnTimer, dt: Duration) -> (SpawnTimer, bool) {
    if !timer.running || timer.interval.is_zero() {
        return (*timer, false);
    }
    let elapsed = timer.elapsed + dt;
    if elapsed < timer.interval {
        return (SpawnTimer { elapsed, ..*timer }, false);
    }
    let carry = elapsed.as_nanos() % timer.interval.as_nanos();
    let elapsed = Duration::from_nanos(carry as u64);
    (SpawnTimer { elapsed, ..*timer }, true)
}
