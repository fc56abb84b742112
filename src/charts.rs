//! Text charts for the dashboard: score trend and duration histogram.
//!
//! Both return plain lines so the caller can colour them for a terminal or
//! write them to a report file unchanged.

use crate::entities::SessionRecord;

pub const SCORES_TITLE: &str = "Game Scores Trend Over Time";
pub const DURATIONS_TITLE: &str = "Distribution of Game Durations (Seconds)";
pub const HISTOGRAM_BINS: usize = 10;

const POINT: char = 'o';
const TRACE: char = '·';
const BAR: char = '█';

/// One histogram bucket, `[lo, hi)` except the last which includes `hi`.
#[derive(Clone, Debug, PartialEq)]
pub struct Bin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

/// Equal-width bins spanning the data.  A single distinct value gets a
/// one-unit span centred on it.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    };
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            lo: lo + width * i as f64,
            hi: lo + width * (i + 1) as f64,
            count: 0,
        })
        .collect();
    for v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Horizontal-bar histogram of session durations.
pub fn duration_histogram(records: &[SessionRecord], bar_width: usize) -> Vec<String> {
    let mut lines = vec![DURATIONS_TITLE.to_string()];
    let durations: Vec<f64> = records.iter().map(|r| r.duration_seconds).collect();
    let bins = histogram_bins(&durations, HISTOGRAM_BINS);
    if bins.is_empty() {
        lines.push("(no data)".to_string());
        return lines;
    }

    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    for bin in &bins {
        let mut len = bin.count * bar_width / max_count;
        if bin.count > 0 && len == 0 {
            len = 1;
        }
        lines.push(format!(
            "{:>8.2} - {:<8.2} │{} {}",
            bin.lo,
            bin.hi,
            BAR.to_string().repeat(len),
            bin.count
        ));
    }
    lines.push(format!("{:>19} └ Number of Games", ""));
    lines
}

/// Line chart of score per session in log order, `width` x `height`
/// plot cells plus axes.
pub fn score_trend(records: &[SessionRecord], width: usize, height: usize) -> Vec<String> {
    let mut lines = vec![SCORES_TITLE.to_string()];
    if records.is_empty() || width < 2 || height < 2 {
        lines.push("(no data)".to_string());
        return lines;
    }

    // y-axis always includes 0 and spans at least one point.
    let lo = records.iter().map(|r| r.score).fold(0.0, f64::min);
    let hi = records
        .iter()
        .map(|r| r.score)
        .fold(lo + 1.0, f64::max);
    let n = records.len();
    let col_of = |i: usize| if n == 1 { 0 } else { i * (width - 1) / (n - 1) };
    let row_of = |score: f64| {
        let r = ((score - lo) / (hi - lo) * (height - 1) as f64).round() as usize;
        height - 1 - r.min(height - 1)
    };

    let mut grid = vec![vec![' '; width]; height];
    for (i, pair) in records.windows(2).enumerate() {
        let (c0, c1) = (col_of(i), col_of(i + 1));
        let (s0, s1) = (pair[0].score, pair[1].score);
        for c in c0..=c1 {
            let t = if c1 == c0 {
                0.0
            } else {
                (c - c0) as f64 / (c1 - c0) as f64
            };
            grid[row_of(s0 + (s1 - s0) * t)][c] = TRACE;
        }
    }
    for (i, r) in records.iter().enumerate() {
        grid[row_of(r.score)][col_of(i)] = POINT;
    }

    let (top_label, bottom_label) = (hi.to_string(), lo.to_string());
    let label_w = top_label.len().max(bottom_label.len());
    for (row, cells) in grid.iter().enumerate() {
        let label = if row == 0 {
            top_label.clone()
        } else if row == height - 1 {
            bottom_label.clone()
        } else {
            String::new()
        };
        let cells: String = cells.iter().collect();
        lines.push(format!("{label:>label_w$} ┤{cells}"));
    }
    lines.push(format!("{:>label_w$} └{}", "", "─".repeat(width)));

    let first = &records[0].timestamp;
    if n == 1 {
        lines.push(format!("{:>label_w$}  {first}", ""));
        return lines;
    }
    let last = &records[n - 1].timestamp;
    let pad = (width + 1).saturating_sub(first.chars().count() + last.chars().count());
    lines.push(format!("{:>label_w$}  {first}{}{last}", "", " ".repeat(pad)));
    lines
}
