/// The game state machine.
///
/// One `Controller` owns everything that changes during play: the bird,
/// the live pipes, score, timers and scroll offsets.  The loop feeds it
/// the frame's inputs through `handle_input`, then calls `update` once,
/// then renders from the read-only accessors.

use std::io;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::compute::{
    advance_bird, advance_obstacles, advance_scroll, detect_collision, flap, spawn_obstacle,
    tick_timer,
};
use crate::config::GameConfig;
use crate::entities::{
    Bird, GameState, Input, Obstacle, Rect, Scroll, SessionRecord, SpawnTimer, StatsSummary,
};
use crate::launcher::Launcher;
use crate::session_log::SessionLog;
use crate::stats;

/// Size of the clickable menu buttons, in world pixels.
const BUTTON_WIDTH: f64 = 120.0;
const BUTTON_HEIGHT: f64 = 20.0;

pub struct Controller {
    config: GameConfig,
    state: GameState,
    bird: Bird,
    obstacles: Vec<Obstacle>,
    score: u32,
    /// Score of the most recently finished session.
    last_score: u32,
    /// Play time of the session in progress; `None` outside a session.
    session: Option<Duration>,
    spawn_timer: SpawnTimer,
    background: Scroll,
    ground: Scroll,
    stats: StatsSummary,
    /// One-line message for the player, e.g. a failed dashboard launch.
    notice: Option<String>,
    log: SessionLog,
    launcher: Box<dyn Launcher>,
}

impl Controller {
    pub fn new(config: GameConfig, log: SessionLog, launcher: Box<dyn Launcher>) -> Self {
        let (bx, by) = config.bird_start();
        Controller {
            bird: Bird::new(bx, by, config.bird_width, config.bird_height),
            spawn_timer: SpawnTimer::new(config.spawn_interval),
            background: Scroll::new(config.background_speed, config.background_period),
            ground: Scroll::new(config.ground_speed, config.ground_period),
            config,
            state: GameState::Menu,
            obstacles: Vec::new(),
            score: 0,
            last_score: 0,
            session: None,
            stats: StatsSummary::default(),
            notice: None,
            log,
            launcher,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn last_score(&self) -> u32 {
        self.last_score
    }

    pub fn stats(&self) -> &StatsSummary {
        &self.stats
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn background(&self) -> &Scroll {
        &self.background
    }

    pub fn ground(&self) -> &Scroll {
        &self.ground
    }

    pub fn session_in_progress(&self) -> bool {
        self.session.is_some()
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    /// The STATISTICS button on the game-over screen.
    pub fn stats_button(&self) -> Rect {
        self.button_at(self.config.screen_height / 2.0 + 90.0)
    }

    /// The VIEW GRAPHS button on the statistics screen.
    pub fn graphs_button(&self) -> Rect {
        self.button_at(self.config.screen_height - 140.0)
    }

    fn button_at(&self, center_y: f64) -> Rect {
        Rect::new(
            self.config.screen_width / 2.0 - BUTTON_WIDTH / 2.0,
            center_y - BUTTON_HEIGHT / 2.0,
            BUTTON_WIDTH,
            BUTTON_HEIGHT,
        )
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    pub fn handle_input(&mut self, input: Input) {
        match (self.state, input) {
            (GameState::Menu, Input::Primary) | (GameState::GameOver, Input::Primary) => {
                self.start_session();
            }
            (GameState::Playing, Input::Primary) => {
                self.bird = flap(&self.bird, &self.config.physics);
            }
            (GameState::GameOver, Input::Secondary) => self.open_statistics(),
            (GameState::GameOver, Input::Click { x, y }) if self.stats_button().contains(x, y) => {
                self.open_statistics();
            }
            (GameState::Statistics, Input::Confirm) => {
                self.notice = None;
                self.transition(GameState::Menu);
            }
            (GameState::Statistics, Input::Tertiary) => self.launch_dashboard(),
            (GameState::Statistics, Input::Click { x, y })
                if self.graphs_button().contains(x, y) =>
            {
                self.launch_dashboard();
            }
            _ => {}
        }
    }

    fn start_session(&mut self) {
        let (bx, by) = self.config.bird_start();
        self.bird = Bird::new(bx, by, self.config.bird_width, self.config.bird_height);
        self.obstacles.clear();
        self.score = 0;
        self.session = Some(Duration::ZERO);
        self.spawn_timer = SpawnTimer {
            running: true,
            ..SpawnTimer::new(self.config.spawn_interval)
        };
        self.background.offset = 0.0;
        self.ground.offset = 0.0;
        self.notice = None;
        self.transition(GameState::Playing);
    }

    fn open_statistics(&mut self) {
        self.stats = stats::summarize(&self.log);
        self.transition(GameState::Statistics);
    }

    fn launch_dashboard(&mut self) {
        match self.launcher.launch() {
            Ok(()) => {
                let report = self.log.report_path();
                self.notice = Some(format!("Dashboard launched, report: {}", report.display()));
            }
            Err(e) => {
                warn!(error = %e, "failed to launch dashboard");
                self.notice = Some(format!("Could not launch dashboard: {e}"));
            }
        }
    }

    fn transition(&mut self, to: GameState) {
        if self.state != to {
            info!(from = ?self.state, to = ?to, "state change");
        }
        self.state = to;
    }

    // ── Per-frame update ──────────────────────────────────────────────────────

    /// Advance one frame.  Only PLAYING moves anything.  An error means the
    /// session record could not be written; the transition to GAME_OVER has
    /// already happened by then.
    pub fn update(&mut self, dt: Duration, rng: &mut impl Rng) -> io::Result<()> {
        if self.state != GameState::Playing {
            return Ok(());
        }
        if let Some(elapsed) = self.session.as_mut() {
            *elapsed += dt;
        }

        // ── 1. Spawn on the timer ────────────────────────────────────────────
        let (timer, fired) = tick_timer(&self.spawn_timer, dt);
        self.spawn_timer = timer;
        if fired {
            let obstacle = spawn_obstacle(&self.config, rng);
            debug!(top_height = obstacle.top_height, "obstacle spawned");
            self.obstacles.push(obstacle);
        }

        // ── 2. Bird physics ──────────────────────────────────────────────────
        self.bird = advance_bird(&self.bird, &self.config.physics);

        // ── 3. Pipes: move, score, purge ─────────────────────────────────────
        let (obstacles, points) = advance_obstacles(&self.obstacles, self.bird.bounds().left());
        self.obstacles = obstacles;
        if points > 0 {
            self.score += points;
            debug!(score = self.score, "obstacle cleared");
        }

        // ── 4. Scenery ───────────────────────────────────────────────────────
        self.background = advance_scroll(&self.background);
        self.ground = advance_scroll(&self.ground);

        // ── 5. Collision ─────────────────────────────────────────────────────
        if detect_collision(
            &self.bird.bounds(),
            &self.obstacles,
            self.config.ground_height,
            self.config.screen_height,
        ) {
            self.game_over()?;
        }
        Ok(())
    }

    fn game_over(&mut self) -> io::Result<()> {
        self.spawn_timer.running = false;
        self.last_score = self.score;
        self.transition(GameState::GameOver);
        let duration = self.session.take().unwrap_or_default();
        self.log.append(self.last_score, duration.as_secs_f64())?;
        Ok(())
    }

    // ── Shutdown ──────────────────────────────────────────────────────────────

    /// Called once when the player quits.  A session cut short while
    /// PLAYING is still logged.
    pub fn quit(&mut self) -> io::Result<Option<SessionRecord>> {
        if self.state != GameState::Playing {
            return Ok(None);
        }
        let Some(duration) = self.session.take() else {
            return Ok(None);
        };
        self.spawn_timer.running = false;
        info!(score = self.score, "quit during play");
        self.log
            .append(self.score, duration.as_secs_f64())
            .map(Some)
    }
}
