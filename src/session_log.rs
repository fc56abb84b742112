//! Append-only CSV log of finished sessions.
//!
//! ```text
//! timestamp,score,duration_seconds
//! 2025-01-01 12:00:00,7,23.45
//! ```
//!
//! The game only ever appends; the statistics screen and the dashboard
//! read whole-file snapshots.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use directories::ProjectDirs;
use tracing::{debug, info, warn};

use crate::entities::SessionRecord;

pub const HEADER: &str = "timestamp,score,duration_seconds";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const LOG_FILE_NAME: &str = "game_log.csv";
/// Plain-text copy of the dashboard charts, kept beside the log.
pub const REPORT_FILE_NAME: &str = "dashboard.txt";

/// Directory shared by the game and the dashboard for the session log,
/// the dashboard report and the trace log.
pub fn data_dir() -> PathBuf {
    ProjectDirs::from("", "", "flap-track")
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("data"))
}

pub fn default_log_path() -> PathBuf {
    data_dir().join(LOG_FILE_NAME)
}

#[derive(Clone, Debug)]
pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SessionLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the dashboard leaves its report for this log.
    pub fn report_path(&self) -> PathBuf {
        self.path.with_file_name(REPORT_FILE_NAME)
    }

    /// Append one session stamped with the current local time.
    pub fn append(&self, score: u32, duration_seconds: f64) -> io::Result<SessionRecord> {
        let record = SessionRecord {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            score: f64::from(score),
            duration_seconds: round_centis(duration_seconds),
        };
        self.append_record(&record)?;
        Ok(record)
    }

    /// Append `record` as one row, writing the header first if the file is
    /// new or empty.
    pub fn append_record(&self, record: &SessionRecord) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut row = String::new();
        if file.metadata()?.len() == 0 {
            row.push_str(HEADER);
            row.push('\n');
        }
        row.push_str(&format!(
            "{},{},{:.2}\n",
            record.timestamp, record.score, record.duration_seconds
        ));
        file.write_all(row.as_bytes())?;

        info!(
            score = record.score,
            duration = record.duration_seconds,
            path = %self.path.display(),
            "session logged"
        );
        Ok(())
    }

    /// Every well-formed record in file order.  A missing, empty or
    /// unreadable log is simply "no data yet".
    pub fn read_records(&self) -> Vec<SessionRecord> {
        match fs::read_to_string(&self.path) {
            Ok(text) => parse_log(&text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no session log yet");
                Vec::new()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read session log");
                Vec::new()
            }
        }
    }
}

/// Parse log text.  Columns are located by header name; rows whose score
/// or duration is missing or non-numeric are skipped.  Any finite number
/// is accepted for either field.
pub fn parse_log(text: &str) -> Vec<SessionRecord> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let columns = split_fields(header);
    let position = |name: &str| columns.iter().position(|c| c == name);
    let (Some(ts_col), Some(score_col), Some(duration_col)) = (
        position("timestamp"),
        position("score"),
        position("duration_seconds"),
    ) else {
        warn!(header, "session log header is missing required columns");
        return Vec::new();
    };

    let mut skipped = 0usize;
    let records: Vec<SessionRecord> = lines
        .filter_map(|line| {
            let fields = split_fields(line);
            let record = (|| {
                Some(SessionRecord {
                    timestamp: fields.get(ts_col)?.clone(),
                    score: parse_number(fields.get(score_col)?)?,
                    duration_seconds: parse_number(fields.get(duration_col)?)?,
                })
            })();
            if record.is_none() {
                skipped += 1;
            }
            record
        })
        .collect();

    if skipped > 0 {
        debug!(skipped, "dropped malformed session rows");
    }
    records
}

/// Split one CSV line into trimmed fields.  Double-quoted fields may hold
/// commas, and `""` inside quotes is a literal quote.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut field).trim().to_string()),
            _ => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}

fn parse_number(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn round_centis(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}
