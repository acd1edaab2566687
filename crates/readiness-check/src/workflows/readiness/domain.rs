use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MIN_SCORE: u8 = 0;
pub const MAX_SCORE: u8 = 4;
pub const NEUTRAL_SCORE: u8 = 2;

/// Four-bucket classification shared by per-enabler readiness and the overall average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadinessStatus {
    Critical,
    #[serde(rename = "At Risk")]
    AtRisk,
    Established,
    Leading,
}

impl ReadinessStatus {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Critical,
            Self::AtRisk,
            Self::Established,
            Self::Leading,
        ]
    }

    /// Thresholds are half-open on the low end: 25 is "At Risk", 50 is "Established".
    pub const fn classify(readiness: u8) -> Self {
        if readiness < 25 {
            Self::Critical
        } else if readiness < 50 {
            Self::AtRisk
        } else if readiness < 75 {
            Self::Established
        } else {
            Self::Leading
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::AtRisk => "At Risk",
            Self::Established => "Established",
            Self::Leading => "Leading",
        }
    }

    pub const fn range_label(self) -> &'static str {
        match self {
            Self::Critical => "0–24%",
            Self::AtRisk => "25–49%",
            Self::Established => "50–74%",
            Self::Leading => "75–100%",
        }
    }

    pub fn legend() -> String {
        Self::ordered()
            .iter()
            .map(|status| format!("{} {}", status.range_label(), status.label()))
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

/// Which statement of a pair the respondent leaned towards, read from the raw score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Right,
    Neutral,
}

impl Alignment {
    pub const fn from_raw(score: u8) -> Self {
        if score <= 1 {
            Self::Left
        } else if score >= 3 {
            Self::Right
        } else {
            Self::Neutral
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    AlwaysTrue,
    SometimesTrue,
    Neutral,
}

impl Intensity {
    pub const fn from_raw(score: u8) -> Self {
        match score {
            0 | 4 => Self::AlwaysTrue,
            1 | 3 => Self::SometimesTrue,
            _ => Self::Neutral,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AlwaysTrue => "Always true",
            Self::SometimesTrue => "Sometimes true",
            Self::Neutral => "Neutral / Don't know",
        }
    }
}

/// Flip the raw score (4 - s) and re-centre it around zero (- 2).
///
/// Negative values lean towards the left statement, positive towards the right.
pub const fn normalized(score: u8) -> i8 {
    let flipped = MAX_SCORE as i8 - score as i8;
    flipped - NEUTRAL_SCORE as i8
}

/// Raw slider answers keyed by enabler name, one cell per theme in catalog order.
///
/// Missing cells (absent enabler, short row, or `null`) mean "unanswered" and read as neutral.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawAnswers {
    cells: BTreeMap<String, Vec<Option<u8>>>,
}

impl RawAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, enabler: &str, question: usize, score: u8) {
        let row = self.cells.entry(enabler.to_string()).or_default();
        if row.len() <= question {
            row.resize(question + 1, None);
        }
        row[question] = Some(score);
    }

    pub fn get(&self, enabler: &str, question: usize) -> Option<u8> {
        self.cells
            .get(enabler)
            .and_then(|row| row.get(question))
            .copied()
            .flatten()
    }

    pub fn score_or_neutral(&self, enabler: &str, question: usize) -> u8 {
        self.get(enabler, question).unwrap_or(NEUTRAL_SCORE)
    }

    pub fn enablers(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub(crate) fn row(&self, enabler: &str) -> &[Option<u8>] {
        self.cells.get(enabler).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.cells.values().all(|row| row.iter().all(Option::is_none))
    }
}

impl FromIterator<(String, Vec<Option<u8>>)> for RawAnswers {
    fn from_iter<T: IntoIterator<Item = (String, Vec<Option<u8>>)>>(iter: T) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Caller contract violations; never coerced into a valid score.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreError {
    #[error("score {score} for '{enabler}' question {question} is outside 0..=4")]
    OutOfRange {
        enabler: String,
        question: usize,
        score: u8,
    },
    #[error("answers reference unknown enabler '{0}'")]
    UnknownEnabler(String),
    #[error("'{enabler}' has {expected} questions but an answer was given for question {question}")]
    UnknownQuestion {
        enabler: String,
        question: usize,
        expected: usize,
    },
}
