//! Report rendering: a shared page layout drawn by interchangeable backends.

mod branding;
pub(crate) mod layout;
mod pdf;
mod svg;
pub mod text;

pub use branding::{AssetError, BrandLogo, Branding};
pub use layout::{layout_report, Color, DrawCommand, PageLayout, ReportLayout, A4_HEIGHT, A4_WIDTH};
pub use pdf::PdfBackend;
pub use svg::SvgBackend;

use super::scoring::ReadinessMetric;
use super::summary::AnswerSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondentInfo {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company: String,
}

impl RespondentInfo {
    /// First and last name joined, skipping blank parts.
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.trim(), self.last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }
}

/// Everything a report shows; respondent, timestamp, and answers are optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportInput {
    pub totals: Vec<ReadinessMetric>,
    pub avg: u8,
    pub respondent: Option<RespondentInfo>,
    pub completed_at: Option<DateTime<Utc>>,
    pub answers: Option<Vec<AnswerSummary>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Pdf,
    Svg,
}

impl ReportFormat {
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Svg => "image/svg+xml",
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Svg => "svg",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = RenderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "svg" => Ok(Self::Svg),
            other => Err(RenderError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unsupported report format `{0}`")]
    UnknownFormat(String),
    #[error("failed to encode report: {0}")]
    Encode(String),
    #[error("failed to write report markup: {0}")]
    Format(#[from] fmt::Error),
}

/// Turns a finished layout into document bytes.
pub trait RenderBackend {
    fn render(&self, layout: &ReportLayout) -> Result<Vec<u8>, RenderError>;
}

#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub format: ReportFormat,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

impl RenderedReport {
    pub fn file_name(&self, stem: &str) -> String {
        format!("{stem}.{}", self.format.extension())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReportRenderer {
    branding: Branding,
}

impl ReportRenderer {
    pub fn new(branding: Branding) -> Self {
        Self { branding }
    }

    pub fn branding(&self) -> &Branding {
        &self.branding
    }

    pub fn layout(&self, input: &ReportInput) -> ReportLayout {
        layout_report(input, self.branding.logo().cloned())
    }

    pub fn render(
        &self,
        input: &ReportInput,
        format: ReportFormat,
    ) -> Result<RenderedReport, RenderError> {
        let layout = self.layout(input);
        let bytes = match format {
            ReportFormat::Pdf => PdfBackend.render(&layout)?,
            ReportFormat::Svg => SvgBackend.render(&layout)?,
        };
        Ok(RenderedReport {
            format,
            bytes,
            page_count: layout.page_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_skips_blank_parts() {
        let mut info = RespondentInfo {
            first_name: " Ada ".into(),
            last_name: "Lovelace".into(),
            ..RespondentInfo::default()
        };
        assert_eq!(info.full_name().as_deref(), Some("Ada Lovelace"));
        info.first_name.clear();
        assert_eq!(info.full_name().as_deref(), Some("Lovelace"));
        info.last_name = "  ".into();
        assert_eq!(info.full_name(), None);
    }

    #[test]
    fn parses_formats_case_insensitively() {
        assert_eq!("PDF".parse::<ReportFormat>().unwrap(), ReportFormat::Pdf);
        assert_eq!("svg".parse::<ReportFormat>().unwrap(), ReportFormat::Svg);
        assert!(matches!(
            "docx".parse::<ReportFormat>(),
            Err(RenderError::UnknownFormat(_))
        ));
        assert_eq!(ReportFormat::Svg.content_type(), "image/svg+xml");
    }
}
