use super::catalog::{Enabler, ReadinessCatalog, ThemeQuestion};
use super::domain::{Alignment, Intensity, RawAnswers, ScoreError};
use super::scoring::validate_answers;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const NEUTRAL_SELECTION_TEXT: &str =
    "You indicated a neutral position between the two statements.";

/// Human-readable account of one answer, as printed in the report's response details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSummary {
    pub title: String,
    pub left: String,
    pub right: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Intensity>,
    pub selection_label: String,
    pub selection_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSummary {
    pub enabler_name: String,
    pub questions: Vec<QuestionSummary>,
}

#[derive(Debug, Clone)]
pub struct AnswerSummarizer {
    catalog: Arc<ReadinessCatalog>,
}

impl AnswerSummarizer {
    pub fn new(catalog: Arc<ReadinessCatalog>) -> Self {
        Self { catalog }
    }

    pub fn summarize(&self, answers: &RawAnswers) -> Result<Vec<AnswerSummary>, ScoreError> {
        validate_answers(&self.catalog, answers)?;

        Ok(self
            .catalog
            .enablers()
            .iter()
            .map(|enabler| summarize_enabler(enabler, answers))
            .collect())
    }
}

fn summarize_enabler(enabler: &Enabler, answers: &RawAnswers) -> AnswerSummary {
    let questions = enabler
        .themes
        .iter()
        .enumerate()
        .map(|(index, theme)| summarize_question(theme, answers.score_or_neutral(enabler.name, index)))
        .collect();

    AnswerSummary {
        enabler_name: enabler.name.to_string(),
        questions,
    }
}

pub(crate) fn summarize_question(theme: &ThemeQuestion, score: u8) -> QuestionSummary {
    let alignment = Alignment::from_raw(score);
    let intensity = Intensity::from_raw(score);

    let (selection_label, selection_text) = match alignment {
        Alignment::Left => (
            format!("Closer to the left-hand statement — {}", intensity.label()),
            theme.left.to_string(),
        ),
        Alignment::Right => (
            format!("Closer to the right-hand statement — {}", intensity.label()),
            theme.right.to_string(),
        ),
        Alignment::Neutral => (
            format!("Neutral between the two statements — {}", intensity.label()),
            NEUTRAL_SELECTION_TEXT.to_string(),
        ),
    };

    QuestionSummary {
        title: theme.title.to_string(),
        left: theme.left.to_string(),
        right: theme.right.to_string(),
        alignment: Some(alignment),
        intensity: Some(intensity),
        selection_label,
        selection_text,
    }
}
