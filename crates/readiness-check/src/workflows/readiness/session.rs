use super::catalog::ReadinessCatalog;
use super::domain::{RawAnswers, ScoreError, MAX_SCORE, NEUTRAL_SCORE};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Answering,
    Frozen,
}

/// One respondent's pass through the questionnaire.
///
/// Starts with every cell neutral, accepts one mutation at a time while answering,
/// becomes read-only once frozen for review and results.
#[derive(Debug, Clone)]
pub struct SurveySession {
    catalog: Arc<ReadinessCatalog>,
    answers: RawAnswers,
    phase: SessionPhase,
}

impl SurveySession {
    pub fn new(catalog: Arc<ReadinessCatalog>) -> Self {
        let answers = neutral_answers(&catalog);
        Self {
            catalog,
            answers,
            phase: SessionPhase::Answering,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn answers(&self) -> &RawAnswers {
        &self.answers
    }

    pub fn catalog(&self) -> &ReadinessCatalog {
        &self.catalog
    }

    pub fn set_score(
        &mut self,
        enabler: &str,
        question: usize,
        score: u8,
    ) -> Result<(), SessionError> {
        if self.phase == SessionPhase::Frozen {
            return Err(SessionError::Frozen);
        }

        let entry = self
            .catalog
            .enabler(enabler)
            .ok_or_else(|| ScoreError::UnknownEnabler(enabler.to_string()))?;
        if question >= entry.themes.len() {
            return Err(ScoreError::UnknownQuestion {
                enabler: enabler.to_string(),
                question,
                expected: entry.themes.len(),
            }
            .into());
        }
        if score > MAX_SCORE {
            return Err(ScoreError::OutOfRange {
                enabler: enabler.to_string(),
                question,
                score,
            }
            .into());
        }

        self.answers.set(enabler, question, score);
        Ok(())
    }

    /// Apply every explicit cell of a raw answer record, stopping at the first invalid one.
    pub fn apply(&mut self, answers: &RawAnswers) -> Result<(), SessionError> {
        let enablers: Vec<String> = answers.enablers().map(str::to_string).collect();
        for enabler in enablers {
            for (question, cell) in answers.row(&enabler).iter().enumerate() {
                if let Some(score) = cell {
                    self.set_score(&enabler, question, *score)?;
                }
            }
        }
        Ok(())
    }

    /// Move to review/results; the answers can no longer change.
    pub fn freeze(&mut self) -> &RawAnswers {
        self.phase = SessionPhase::Frozen;
        &self.answers
    }

    /// Discard every answer and start over.
    pub fn restart(&mut self) {
        self.answers = neutral_answers(&self.catalog);
        self.phase = SessionPhase::Answering;
    }
}

fn neutral_answers(catalog: &ReadinessCatalog) -> RawAnswers {
    catalog
        .enablers()
        .iter()
        .map(|enabler| {
            (
                enabler.name.to_string(),
                vec![Some(NEUTRAL_SCORE); enabler.themes.len()],
            )
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("answers are frozen; restart the session to change them")]
    Frozen,
    #[error(transparent)]
    Score(#[from] ScoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::readiness::scoring::ScoringEngine;

    fn session() -> SurveySession {
        SurveySession::new(Arc::new(ReadinessCatalog::standard()))
    }

    #[test]
    fn new_session_starts_neutral_and_answering() {
        let session = session();
        assert_eq!(session.phase(), SessionPhase::Answering);
        assert_eq!(session.answers().get("Clarity & Transparency", 2), Some(2));
    }

    #[test]
    fn frozen_session_rejects_mutation_until_restart() {
        let mut session = session();
        session
            .set_score("Clarity & Transparency", 0, 4)
            .expect("mutation allowed");
        let frozen = session.freeze().clone();
        assert_eq!(frozen.get("Clarity & Transparency", 0), Some(4));

        assert_eq!(
            session.set_score("Clarity & Transparency", 0, 0),
            Err(SessionError::Frozen)
        );

        session.restart();
        assert_eq!(session.phase(), SessionPhase::Answering);
        assert_eq!(session.answers().get("Clarity & Transparency", 0), Some(2));
    }

    #[test]
    fn invalid_cells_are_rejected() {
        let mut session = session();
        assert!(matches!(
            session.set_score("Clarity & Transparency", 0, 5),
            Err(SessionError::Score(ScoreError::OutOfRange { score: 5, .. }))
        ));
        assert!(matches!(
            session.set_score("Clarity & Transparency", 3, 1),
            Err(SessionError::Score(ScoreError::UnknownQuestion { .. }))
        ));
        assert!(matches!(
            session.set_score("Nope", 0, 1),
            Err(SessionError::Score(ScoreError::UnknownEnabler(_)))
        ));
    }

    #[test]
    fn session_answers_score_like_empty_record() {
        let catalog = Arc::new(ReadinessCatalog::standard());
        let engine = ScoringEngine::new(catalog.clone());
        let session = SurveySession::new(catalog);
        assert_eq!(
            engine.score(session.answers()).expect("scores"),
            engine.score(&RawAnswers::new()).expect("scores")
        );
    }

    #[test]
    fn apply_copies_explicit_cells() {
        let mut session = session();
        let mut answers = RawAnswers::new();
        answers.set("Human Oversight & Skills", 1, 1);
        session.apply(&answers).expect("applies");
        assert_eq!(session.answers().get("Human Oversight & Skills", 1), Some(1));
        assert_eq!(session.answers().get("Human Oversight & Skills", 0), Some(2));
    }
}
