use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A score as submitted by a client. The score is a percentage, but it is
/// carried as text end to end and never validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewScore {
    pub name: String,
    pub score: String,
}

impl NewScore {
    /// Build a submission from a numeric percentage.
    pub fn from_percentage(name: impl Into<String>, percentage: f64) -> Self {
        Self {
            name: name.into(),
            score: format_percentage(percentage),
        }
    }
}

/// A persisted score, with its generated identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub id: u64,
    pub name: String,
    pub score: String,
}

impl Score {
    /// The numeric value of the score, if it parses.
    pub fn value(&self) -> Option<f64> {
        self.score.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
    }
}

/// The `{ "message": ... }` body returned by the score endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Render a percentage the way it is stored: the shortest decimal that
/// round-trips, with no trailing `.0` for whole numbers.
pub fn format_percentage(percentage: f64) -> String {
    format!("{percentage}")
}

/// Fetched scores, ready for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard(Vec<Score>);

impl Leaderboard {
    /// Order scores from best to worst. Scores that are not numbers go last;
    /// ties keep their submission order.
    pub fn ranked(mut scores: Vec<Score>) -> Self {
        scores.sort_by(|a, b| match (a.value(), b.value()) {
            (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        Self(scores)
    }

    pub fn entries(&self) -> &[Score] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
