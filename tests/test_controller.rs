use std::cell::Cell;
use std::fs;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use flap_track::config::GameConfig;
use flap_track::controller::Controller;
use flap_track::entities::*;
use flap_track::launcher::Launcher;
use flap_track::session_log::SessionLog;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

const FRAME: Duration = Duration::from_millis(16);

/// Counts launches; optionally fails them.
struct FakeLauncher {
    launches: Rc<Cell<u32>>,
    fail: bool,
}

impl Launcher for FakeLauncher {
    fn launch(&mut self) -> io::Result<()> {
        self.launches.set(self.launches.get() + 1);
        if self.fail {
            Err(io::Error::new(io::ErrorKind::NotFound, "no dashboard"))
        } else {
            Ok(())
        }
    }
}

struct Harness {
    _dir: TempDir,
    game: Controller,
    launches: Rc<Cell<u32>>,
    rng: StdRng,
}

impl Harness {
    fn with(config: GameConfig, fail_launch: bool) -> Self {
        let dir = TempDir::new().unwrap();
        let log = SessionLog::new(dir.path().join("game_log.csv"));
        let launches = Rc::new(Cell::new(0));
        let launcher = FakeLauncher {
            launches: Rc::clone(&launches),
            fail: fail_launch,
        };
        Harness {
            _dir: dir,
            game: Controller::new(config, log, Box::new(launcher)),
            launches,
            rng: StdRng::seed_from_u64(7),
        }
    }

    fn new() -> Self {
        Self::with(GameConfig::default(), false)
    }

    /// Ground line above the bird's start: the first frame collides.
    fn doomed() -> Self {
        Self::with(
            GameConfig {
                ground_height: 300.0,
                ..GameConfig::default()
            },
            false,
        )
    }

    fn frame(&mut self) {
        self.game.update(FRAME, &mut self.rng).unwrap();
    }

    fn records(&self) -> Vec<SessionRecord> {
        self.game.log().read_records()
    }

    fn rows_on_disk(&self) -> usize {
        fs::read_to_string(self.game.log().path())
            .map(|t| t.lines().count().saturating_sub(1))
            .unwrap_or(0)
    }

    /// Drive MENU → PLAYING → GAME_OVER with a one-frame session.
    fn crash_once(&mut self) {
        self.game.handle_input(Input::Primary);
        self.frame();
        assert_eq!(self.game.state(), GameState::GameOver);
    }
}

// ── MENU ──────────────────────────────────────────────────────────────────────

#[test]
fn starts_in_menu_and_idles() {
    let mut h = Harness::new();
    assert_eq!(h.game.state(), GameState::Menu);
    let y = h.game.bird().y;
    for _ in 0..30 {
        h.frame();
    }
    assert_eq!(h.game.bird().y, y);
    assert!(h.game.obstacles().is_empty());
}

#[test]
fn menu_ignores_other_inputs() {
    let mut h = Harness::new();
    for input in [Input::Secondary, Input::Confirm, Input::Tertiary] {
        h.game.handle_input(input);
        assert_eq!(h.game.state(), GameState::Menu);
    }
    assert_eq!(h.launches.get(), 0);
}

#[test]
fn primary_starts_a_fresh_session() {
    let mut h = Harness::new();
    h.game.handle_input(Input::Primary);
    assert_eq!(h.game.state(), GameState::Playing);
    assert_eq!(h.game.score(), 0);
    assert!(h.game.obstacles().is_empty());
    assert!(h.game.session_in_progress());
    assert_eq!(h.game.bird().velocity, 0.0);
    assert_eq!((h.game.bird().x, h.game.bird().y), (72.0, 256.0));
}

// ── PLAYING ───────────────────────────────────────────────────────────────────

#[test]
fn primary_while_playing_flaps() {
    let mut h = Harness::new();
    h.game.handle_input(Input::Primary);
    h.frame();
    h.game.handle_input(Input::Primary);
    assert_eq!(h.game.bird().velocity, -5.5);
    assert_eq!(h.game.state(), GameState::Playing);
}

#[test]
fn inputs_before_update_apply_to_that_frame() {
    let mut h = Harness::new();
    h.game.handle_input(Input::Primary); // start
    h.game.handle_input(Input::Primary); // flap, same frame
    h.frame();
    assert_eq!(h.game.bird().velocity, -5.25);
    assert_eq!(h.game.bird().y, 256.0 - 5.25);
}

#[test]
fn obstacles_spawn_on_the_timer() {
    let mut h = Harness::new();
    h.game.handle_input(Input::Primary);
    // keep the bird airborne while time passes
    let mut spawned_at = None;
    for frame in 0..120 {
        if h.game.bird().y > 256.0 {
            h.game.handle_input(Input::Primary);
        }
        h.frame();
        if spawned_at.is_none() && !h.game.obstacles().is_empty() {
            spawned_at = Some(frame);
        }
    }
    // 1500 ms / 16 ms per frame → fires on the 94th frame (index 93)
    assert_eq!(spawned_at, Some(93));
    assert_eq!(h.game.obstacles().len(), 1);
    assert_eq!(h.game.state(), GameState::Playing);
}

#[test]
fn scenery_scrolls_only_while_playing() {
    let mut h = Harness::new();
    h.frame();
    assert_eq!(h.game.ground().offset, 0.0);
    h.game.handle_input(Input::Primary);
    h.frame();
    assert_eq!(h.game.ground().offset, 2.0);
    assert_eq!(h.game.background().offset, 0.5);
}

#[test]
fn score_counts_each_cleared_pipe_once() {
    // Gap always covers y 112..400; the bird, kept level by flapping,
    // stays inside it and clears every pipe.
    let config = GameConfig {
        pipe_gap: 300.0,
        spawn_interval: Duration::from_millis(800),
        ..GameConfig::default()
    };
    let mut h = Harness::with(config, false);
    h.game.handle_input(Input::Primary);

    for _ in 0..600 {
        if h.game.bird().y > 256.0 {
            h.game.handle_input(Input::Primary);
        }
        h.frame();
    }
    assert_eq!(h.game.state(), GameState::Playing);

    // 800 ms / 16 ms: a pipe spawns every 50 frames, first at index 49,
    // so 12 spawns by index 599.  Spawned at x 286 after its first frame,
    // its centre passes x 55 129 frames later and it leaves the screen
    // after 170: pipes 0..=8 scored, 0..=7 purged.
    let spawned = 12;
    let purged = spawned - h.game.obstacles().len() as u32;
    let passed_on_screen = h.game.obstacles().iter().filter(|o| o.passed).count() as u32;
    assert_eq!(purged, 8);
    assert_eq!(h.game.score(), purged + passed_on_screen);
    assert_eq!(h.game.score(), 9);
}

#[test]
fn stalled_frame_spawns_a_single_obstacle() {
    let mut h = Harness::new();
    h.game.handle_input(Input::Primary);
    h.game
        .update(Duration::from_secs(10), &mut h.rng)
        .unwrap();
    assert_eq!(h.game.obstacles().len(), 1);
}

// ── GAME_OVER ─────────────────────────────────────────────────────────────────

#[test]
fn collision_on_first_frame_logs_exactly_one_record() {
    let mut h = Harness::doomed();
    h.game.handle_input(Input::Primary);
    assert_eq!(h.game.state(), GameState::Playing);
    assert_eq!(h.game.score(), 0);

    h.frame();
    assert_eq!(h.game.state(), GameState::GameOver);
    assert!(!h.game.session_in_progress());

    let records = h.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].score, 0.0);
    assert_eq!(records[0].duration_seconds, 0.02); // one 16 ms frame
}

#[test]
fn game_over_freezes_the_world() {
    let mut h = Harness::doomed();
    h.crash_once();
    let bird = *h.game.bird();
    for _ in 0..200 {
        h.frame();
    }
    assert_eq!(*h.game.bird(), bird);
    assert!(h.game.obstacles().is_empty());
    assert_eq!(h.records().len(), 1);
}

#[test]
fn restart_from_game_over_does_not_log_twice() {
    let mut h = Harness::doomed();
    h.crash_once();
    h.game.handle_input(Input::Primary);
    assert_eq!(h.game.state(), GameState::Playing);
    assert_eq!(h.game.score(), 0);
    assert_eq!(h.rows_on_disk(), 1);

    h.frame(); // second crash, second session
    assert_eq!(h.rows_on_disk(), 2);
}

#[test]
fn last_score_survives_into_game_over() {
    let mut h = Harness::doomed();
    h.crash_once();
    assert_eq!(h.game.last_score(), 0);
    assert_eq!(f64::from(h.game.last_score()), h.records()[0].score);
}

// ── STATISTICS ────────────────────────────────────────────────────────────────

#[test]
fn secondary_opens_statistics_with_fresh_summary() {
    let mut h = Harness::doomed();
    h.crash_once();
    h.game.handle_input(Input::Primary);
    h.frame();
    h.game.handle_input(Input::Secondary);
    assert_eq!(h.game.state(), GameState::Statistics);
    assert_eq!(h.game.stats().total_games, 2);
    assert_eq!(h.game.stats().highest_score, 0);
}

#[test]
fn clicking_the_stats_button_opens_statistics() {
    let mut h = Harness::doomed();
    h.crash_once();

    h.game.handle_input(Input::Click { x: 5.0, y: 5.0 });
    assert_eq!(h.game.state(), GameState::GameOver);

    let button = h.game.stats_button();
    h.game.handle_input(Input::Click {
        x: button.center_x(),
        y: button.y + button.h / 2.0,
    });
    assert_eq!(h.game.state(), GameState::Statistics);
    assert_eq!(h.game.stats().total_games, 1);
}

#[test]
fn confirm_returns_to_menu() {
    let mut h = Harness::doomed();
    h.crash_once();
    h.game.handle_input(Input::Secondary);
    h.game.handle_input(Input::Confirm);
    assert_eq!(h.game.state(), GameState::Menu);
}

#[test]
fn tertiary_launches_dashboard_and_stays() {
    let mut h = Harness::doomed();
    h.crash_once();
    h.game.handle_input(Input::Secondary);
    h.game.handle_input(Input::Tertiary);
    assert_eq!(h.launches.get(), 1);
    assert_eq!(h.game.state(), GameState::Statistics);

    let button = h.game.graphs_button();
    h.game.handle_input(Input::Click {
        x: button.center_x(),
        y: button.y + 1.0,
    });
    assert_eq!(h.launches.get(), 2);
}

#[test]
fn launch_notice_points_at_the_report() {
    let mut h = Harness::doomed();
    h.crash_once();
    h.game.handle_input(Input::Secondary);
    h.game.handle_input(Input::Tertiary);
    let report = h.game.log().report_path();
    let notice = h.game.notice().unwrap();
    assert!(notice.contains("dashboard.txt"));
    assert!(notice.contains(&report.display().to_string()));
}

#[test]
fn failed_launch_is_reported_not_fatal() {
    let mut h = Harness::with(
        GameConfig {
            ground_height: 300.0,
            ..GameConfig::default()
        },
        true,
    );
    h.crash_once();
    h.game.handle_input(Input::Secondary);
    h.game.handle_input(Input::Tertiary);
    assert_eq!(h.launches.get(), 1);
    assert_eq!(h.game.state(), GameState::Statistics);
    assert!(h.game.notice().unwrap().contains("no dashboard"));

    h.game.handle_input(Input::Confirm);
    assert_eq!(h.game.notice(), None);
}

#[test]
fn tertiary_outside_statistics_does_nothing() {
    let mut h = Harness::doomed();
    h.crash_once();
    h.game.handle_input(Input::Tertiary);
    assert_eq!(h.launches.get(), 0);
}

// ── quit ──────────────────────────────────────────────────────────────────────

#[test]
fn quit_while_playing_logs_the_session() {
    let mut h = Harness::new();
    h.game.handle_input(Input::Primary);
    for _ in 0..10 {
        h.frame();
    }
    let record = h.game.quit().unwrap().expect("session should be logged");
    assert_eq!(record.score, 0.0);
    assert_eq!(record.duration_seconds, 0.16);
    assert_eq!(h.records().len(), 1);
}

#[test]
fn quit_outside_play_logs_nothing() {
    let mut h = Harness::new();
    assert_eq!(h.game.quit().unwrap(), None);

    let mut h = Harness::doomed();
    h.crash_once();
    assert_eq!(h.game.quit().unwrap(), None);
    assert_eq!(h.records().len(), 1);
}

#[test]
fn log_write_failure_surfaces_but_state_moves_on() {
    let dir = TempDir::new().unwrap();
    // a directory where the log file should be
    let log = SessionLog::new(dir.path());
    let launcher = FakeLauncher {
        launches: Rc::new(Cell::new(0)),
        fail: false,
    };
    let config = GameConfig {
        ground_height: 300.0,
        ..GameConfig::default()
    };
    let mut game = Controller::new(config, log, Box::new(launcher));
    game.handle_input(Input::Primary);
    assert!(game.update(FRAME, &mut StdRng::seed_from_u64(1)).is_err());
    assert_eq!(game.state(), GameState::GameOver);
}
