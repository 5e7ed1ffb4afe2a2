use serde::Serialize;
use std::fmt;

/// Bucket labels in ascending order.
pub const SCORE_RANGES: [&str; 10] = [
    "0-9", "10-19", "20-29", "30-39", "40-49", "50-59", "60-69", "70-79", "80-89", "90-100",
];

/// Maps a 0–100 score onto its decile bucket label.
///
/// Boundaries belong to the higher bucket: `90.0` is `"90-100"`, `89.99` is
/// `"80-89"`. Anything below 10 (including NaN) lands in `"0-9"`.
pub fn score_range(score: f64) -> &'static str {
    match score {
        s if s >= 90.0 => "90-100",
        s if s >= 80.0 => "80-89",
        s if s >= 70.0 => "70-79",
        s if s >= 60.0 => "60-69",
        s if s >= 50.0 => "50-59",
        s if s >= 40.0 => "40-49",
        s if s >= 30.0 => "30-39",
        s if s >= 20.0 => "20-29",
        s if s >= 10.0 => "10-19",
        _ => "0-9",
    }
}

/// Coarse display band for a score.
///
/// | Range  | Band      |
/// |--------|-----------|
/// | >= 80  | Excellent |
/// | >= 60  | Good      |
/// | >= 40  | Fair      |
/// | < 40   | Poor      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 80.0 => ScoreBand::Excellent,
            s if s >= 60.0 => ScoreBand::Good,
            s if s >= 40.0 => ScoreBand::Fair,
            _ => ScoreBand::Poor,
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScoreBand::Excellent => "excellent",
            ScoreBand::Good => "good",
            ScoreBand::Fair => "fair",
            ScoreBand::Poor => "poor",
        };
        f.write_str(label)
    }
}
