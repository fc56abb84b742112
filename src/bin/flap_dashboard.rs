//! Renders the session log as two charts: scores over time and the
//! distribution of game durations.  Prints to stdout and leaves a plain
//! copy in the data dir, so a launch from inside the game (stdout
//! discarded) still produces a readable report.

use std::fs;
use std::io::{stdout, Write};

use anyhow::{Context, Result};
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal, QueueableCommand,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use flap_track::charts::{duration_histogram, score_trend};
use flap_track::session_log::{self, SessionLog};

const CHART_HEIGHT: usize = 12;
const DEFAULT_WIDTH: usize = 60;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let log = SessionLog::new(session_log::default_log_path());
    let records = log.read_records();
    let mut out = stdout();

    if records.is_empty() {
        out.queue(Print("No data available to generate plots.\n"))?;
        out.flush()?;
        return Ok(());
    }

    // Leave room for the y-axis labels.
    let width = terminal::size()
        .map(|(cols, _)| (cols as usize).saturating_sub(12).clamp(20, 120))
        .unwrap_or(DEFAULT_WIDTH);
    let charts = [
        (score_trend(&records, width, CHART_HEIGHT), Color::Cyan),
        (duration_histogram(&records, width.saturating_sub(24).max(10)), Color::Red),
    ];

    let mut report = String::new();
    for (lines, color) in &charts {
        for (i, line) in lines.iter().enumerate() {
            let color = if i == 0 { Color::White } else { *color };
            out.queue(SetForegroundColor(color))?;
            out.queue(Print(line))?;
            out.queue(ResetColor)?;
            out.queue(Print("\n"))?;
            report.push_str(line);
            report.push('\n');
        }
        out.queue(Print("\n"))?;
        report.push('\n');
    }
    out.flush()?;

    let report_path = log.report_path();
    report_path
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|_| fs::write(&report_path, report))
        .with_context(|| format!("failed to write report: {}", report_path.display()))?;
    info!(sessions = records.len(), path = %report_path.display(), "dashboard written");
    Ok(())
}
