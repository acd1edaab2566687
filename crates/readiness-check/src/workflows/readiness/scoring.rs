use super::catalog::{Enabler, ReadinessCatalog};
use super::domain::{normalized, RawAnswers, ReadinessStatus, ScoreError, MAX_SCORE};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Readiness of a single enabler, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessMetric {
    pub name: String,
    pub sum: i32,
    pub readiness: u8,
    pub status: ReadinessStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessScorecard {
    pub totals: Vec<ReadinessMetric>,
    pub avg: u8,
    pub overall_status: ReadinessStatus,
}

impl ReadinessScorecard {
    pub fn from_totals(totals: Vec<ReadinessMetric>) -> Self {
        let avg = overall_average(&totals);
        Self {
            totals,
            avg,
            overall_status: ReadinessStatus::classify(avg),
        }
    }
}

/// Stateless engine turning raw answers into per-enabler and overall readiness.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    catalog: Arc<ReadinessCatalog>,
}

impl ScoringEngine {
    pub fn new(catalog: Arc<ReadinessCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ReadinessCatalog {
        &self.catalog
    }

    pub fn score(&self, answers: &RawAnswers) -> Result<ReadinessScorecard, ScoreError> {
        validate_answers(&self.catalog, answers)?;

        let totals = self
            .catalog
            .enablers()
            .iter()
            .map(|enabler| score_enabler(enabler, answers))
            .collect();

        Ok(ReadinessScorecard::from_totals(totals))
    }
}

fn score_enabler(enabler: &Enabler, answers: &RawAnswers) -> ReadinessMetric {
    let sum: i32 = (0..enabler.themes.len())
        .map(|index| i32::from(normalized(answers.score_or_neutral(enabler.name, index))))
        .sum();
    let readiness = readiness_from_sum(sum, enabler.themes.len());

    ReadinessMetric {
        name: enabler.name.to_string(),
        sum,
        readiness,
        status: ReadinessStatus::classify(readiness),
    }
}

/// Rescale a normalized sum from `[-max_abs, +max_abs]` onto `0..=100`.
///
/// `max_abs = max(1, 2 * question_count)`. Rounding is half-up, done in integers so that
/// exact halves (e.g. 12.5 for two questions) never depend on float representation.
pub fn readiness_from_sum(sum: i32, question_count: usize) -> u8 {
    let max_abs = i64::try_from(question_count)
        .unwrap_or(i64::MAX / 4)
        .saturating_mul(2)
        .max(1);
    let shifted = (i64::from(sum) + max_abs).clamp(0, 2 * max_abs);
    let numerator = 100 * shifted;
    let denominator = 2 * max_abs;
    let readiness = (2 * numerator + denominator) / (2 * denominator);

    debug_assert!(
        (0..=100).contains(&readiness),
        "readiness {readiness} escaped 0..=100 for sum {sum}"
    );
    readiness.clamp(0, 100) as u8
}

/// Mean of the per-enabler readiness values, rounded half-up; an empty list averages to 0.
pub fn overall_average(totals: &[ReadinessMetric]) -> u8 {
    let count = i64::try_from(totals.len()).unwrap_or(i64::MAX).max(1);
    let total: i64 = totals.iter().map(|metric| i64::from(metric.readiness)).sum();
    let avg = (2 * total + count) / (2 * count);
    avg.clamp(0, 100) as u8
}

/// Reject answers that do not fit the catalog instead of silently coercing them.
pub(crate) fn validate_answers(
    catalog: &ReadinessCatalog,
    answers: &RawAnswers,
) -> Result<(), ScoreError> {
    for name in answers.enablers() {
        let enabler = catalog
            .enabler(name)
            .ok_or_else(|| ScoreError::UnknownEnabler(name.to_string()))?;

        for (question, cell) in answers.row(name).iter().enumerate() {
            let Some(score) = cell else {
                continue;
            };
            if question >= enabler.themes.len() {
                return Err(ScoreError::UnknownQuestion {
                    enabler: name.to_string(),
                    question,
                    expected: enabler.themes.len(),
                });
            }
            if *score > MAX_SCORE {
                return Err(ScoreError::OutOfRange {
                    enabler: name.to_string(),
                    question,
                    score: *score,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::readiness::catalog::ThemeQuestion;

    fn catalog_with(questions: usize) -> Arc<ReadinessCatalog> {
        let themes = (0..questions)
            .map(|_| ThemeQuestion {
                title: "Theme",
                left: "Left statement",
                right: "Right statement",
            })
            .collect();
        Arc::new(ReadinessCatalog::from_enablers(vec![Enabler {
            id: 1,
            name: "Enabler",
            themes,
        }]))
    }

    fn answers_for(scores: &[u8]) -> RawAnswers {
        let mut answers = RawAnswers::new();
        for (index, score) in scores.iter().enumerate() {
            answers.set("Enabler", index, *score);
        }
        answers
    }

    #[test]
    fn all_neutral_scores_fifty_and_established() {
        let engine = ScoringEngine::new(catalog_with(3));
        let card = engine.score(&answers_for(&[2, 2, 2])).expect("scores");
        assert_eq!(card.totals[0].sum, 0);
        assert_eq!(card.totals[0].readiness, 50);
        assert_eq!(card.totals[0].status, ReadinessStatus::Established);
    }

    #[test]
    fn all_fours_score_zero_and_all_zeros_score_hundred() {
        let engine = ScoringEngine::new(catalog_with(3));

        let low = engine.score(&answers_for(&[4, 4, 4])).expect("scores");
        assert_eq!(low.totals[0].sum, -6);
        assert_eq!(low.totals[0].readiness, 0);
        assert_eq!(low.totals[0].status, ReadinessStatus::Critical);

        let high = engine.score(&answers_for(&[0, 0, 0])).expect("scores");
        assert_eq!(high.totals[0].sum, 6);
        assert_eq!(high.totals[0].readiness, 100);
        assert_eq!(high.totals[0].status, ReadinessStatus::Leading);
    }

    #[test]
    fn opposite_poles_cancel_out() {
        let engine = ScoringEngine::new(catalog_with(2));
        let card = engine.score(&answers_for(&[0, 4])).expect("scores");
        assert_eq!(card.totals[0].sum, 0);
        assert_eq!(card.totals[0].readiness, 50);
        assert_eq!(card.totals[0].status, ReadinessStatus::Established);
        assert_eq!(card.avg, 50);
        assert_eq!(card.overall_status, ReadinessStatus::Established);
    }

    #[test]
    fn missing_answers_match_explicit_neutral() {
        let engine = ScoringEngine::new(catalog_with(3));
        let implicit = engine.score(&RawAnswers::new()).expect("scores");
        let explicit = engine.score(&answers_for(&[2, 2, 2])).expect("scores");
        assert_eq!(implicit, explicit);
    }

    #[test]
    fn scoring_is_idempotent() {
        let engine = ScoringEngine::new(Arc::new(ReadinessCatalog::standard()));
        let mut answers = RawAnswers::new();
        answers.set("Clarity & Transparency", 1, 3);
        answers.set("Strategic Vision & Value", 0, 0);
        let first = engine.score(&answers).expect("scores");
        let second = engine.score(&answers).expect("scores");
        assert_eq!(first, second);
        assert_eq!(first.totals.len(), 10);
    }

    #[test]
    fn half_values_round_up() {
        assert_eq!(readiness_from_sum(-3, 2), 13);
        assert_eq!(readiness_from_sum(3, 2), 88);
        assert_eq!(readiness_from_sum(0, 0), 50);
    }

    #[test]
    fn average_of_empty_catalog_is_zero() {
        assert_eq!(overall_average(&[]), 0);
        let card = ReadinessScorecard::from_totals(Vec::new());
        assert_eq!(card.overall_status, ReadinessStatus::Critical);
    }

    #[test]
    fn average_rounds_to_nearest() {
        let metric = |readiness: u8| ReadinessMetric {
            name: "x".to_string(),
            sum: 0,
            readiness,
            status: ReadinessStatus::classify(readiness),
        };
        assert_eq!(overall_average(&[metric(50), metric(51)]), 51);
        assert_eq!(overall_average(&[metric(50), metric(50), metric(51)]), 50);
    }

    #[test]
    fn out_of_range_scores_are_rejected() {
        let engine = ScoringEngine::new(catalog_with(3));
        let err = engine.score(&answers_for(&[2, 5])).expect_err("5 is invalid");
        assert_eq!(
            err,
            ScoreError::OutOfRange {
                enabler: "Enabler".to_string(),
                question: 1,
                score: 5,
            }
        );
    }

    #[test]
    fn unknown_enablers_and_surplus_questions_are_rejected() {
        let engine = ScoringEngine::new(catalog_with(2));

        let mut unknown = RawAnswers::new();
        unknown.set("Elsewhere", 0, 1);
        assert!(matches!(
            engine.score(&unknown),
            Err(ScoreError::UnknownEnabler(name)) if name == "Elsewhere"
        ));

        let surplus = answers_for(&[1, 1, 1]);
        assert!(matches!(
            engine.score(&surplus),
            Err(ScoreError::UnknownQuestion { question: 2, expected: 2, .. })
        ));
    }
}
