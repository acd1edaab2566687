use clap::Args;
use readiness_check::error::AppError;
use readiness_check::workflows::readiness::{
    AnswerSummarizer, Branding, RawAnswers, ReadinessCatalog, ReadinessScorecard, ReportFormat,
    ReportInput, ReportRenderer, RespondentInfo, ScoringEngine, SurveySession,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEFAULT_STEM: &str = "ai-readiness-report";

#[derive(Args, Debug, Default)]
pub(crate) struct ReportArgs {
    /// Raw answers as inline JSON or a path to a JSON file
    #[arg(long)]
    pub(crate) answers: String,
    /// Output format (pdf or svg)
    #[arg(long, value_parser = parse_format, default_value = "pdf")]
    pub(crate) format: ReportFormat,
    /// Destination file. Defaults to ai-readiness-report.<ext> in the working directory.
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Logo image placed in the report header
    #[arg(long)]
    pub(crate) logo: Option<PathBuf>,
    #[arg(long)]
    pub(crate) first_name: Option<String>,
    #[arg(long)]
    pub(crate) last_name: Option<String>,
    #[arg(long)]
    pub(crate) email: Option<String>,
    #[arg(long)]
    pub(crate) company: Option<String>,
}

fn parse_format(raw: &str) -> Result<ReportFormat, String> {
    raw.parse::<ReportFormat>().map_err(|err| err.to_string())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let raw = load_answers(&args.answers)?;
    let catalog = Arc::new(ReadinessCatalog::standard());

    let mut session = SurveySession::new(catalog.clone());
    session.apply(&raw)?;
    let answers = session.freeze();

    let scorecard = ScoringEngine::new(catalog.clone()).score(answers)?;
    let summaries = AnswerSummarizer::new(catalog).summarize(answers)?;

    let respondent = RespondentInfo {
        first_name: args.first_name.unwrap_or_default(),
        last_name: args.last_name.unwrap_or_default(),
        email: args.email.unwrap_or_default(),
        company: args.company.unwrap_or_default(),
    };
    let input = ReportInput {
        totals: scorecard.totals.clone(),
        avg: scorecard.avg,
        respondent: (respondent != RespondentInfo::default()).then_some(respondent),
        completed_at: Some(chrono::Utc::now()),
        answers: Some(summaries),
    };

    let renderer = ReportRenderer::new(Branding::from_logo_path(args.logo.as_deref()));
    let report = renderer.render(&input, args.format)?;
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(report.file_name(DEFAULT_STEM)));
    std::fs::write(&output, &report.bytes)?;

    print_scorecard(&scorecard);
    println!(
        "Wrote {} report ({} page(s), {} bytes) to {}",
        report.format,
        report.page_count,
        report.bytes.len(),
        output.display()
    );
    Ok(())
}

/// Inline JSON starts with `{`; anything else is read as a file path.
pub(crate) fn load_answers(source: &str) -> Result<RawAnswers, AppError> {
    let trimmed = source.trim_start();
    let payload = if trimmed.starts_with('{') {
        trimmed.to_string()
    } else {
        std::fs::read_to_string(Path::new(source))?
    };
    Ok(serde_json::from_str(&payload)?)
}

fn print_scorecard(scorecard: &ReadinessScorecard) {
    println!("AI Readiness Check");
    println!("==================");
    for metric in &scorecard.totals {
        println!(
            "{:<36} {:>3}%  {}",
            metric.name,
            metric.readiness,
            metric.status.label()
        );
    }
    println!(
        "\nOverall readiness: {}% ({})",
        scorecard.avg,
        scorecard.overall_status.label()
    );
}
