//! Backend-independent page layout of a readiness report.
//!
//! Coordinates are points with the origin at the top-left corner of each page. Text
//! positions are baselines; rectangles and images are positioned by their top edge.

use super::branding::BrandLogo;
use super::text::{sanitize, wrap_text, FontFace};
use super::ReportInput;
use crate::workflows::readiness::domain::ReadinessStatus;
use crate::workflows::readiness::summary::AnswerSummary;
use std::sync::Arc;

pub const A4_WIDTH: f32 = 595.28;
pub const A4_HEIGHT: f32 = 841.89;

const MARGIN_X: f32 = 40.0;
const HEADER_HEIGHT: f32 = 80.0;
const CONTENT_TOP: f32 = 120.0;
const BOTTOM_MARGIN: f32 = 80.0;
const LOGO_SIZE: f32 = 52.0;

const COL_TOTAL: f32 = 260.0;
const COL_READINESS: f32 = 320.0;
const COL_STATUS: f32 = 420.0;

pub const REPORT_TITLE: &str = "LeadAI – AI Readiness Check";
pub const REPORT_SUBTITLE: &str = "ISO 42001 and EU AI Act aligned readiness diagnostic";
const FOOTER_TAGLINE: &str = "LeadAI | ISO 42001 and EU AI Act aligned readiness diagnostic";
const FOOTER_COPYRIGHT: &str = "LeadAI © 2025";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BRAND: Self = Self::rgb(0, 86, 255);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const INK: Self = Self::rgb(15, 23, 42);
    pub const MUTED: Self = Self::rgb(100, 116, 139);
    pub const RULE: Self = Self::rgb(226, 232, 240);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn for_status(status: ReadinessStatus) -> Self {
        match status {
            ReadinessStatus::Critical => Self::rgb(232, 30, 30),
            ReadinessStatus::AtRisk => Self::rgb(255, 192, 0),
            ReadinessStatus::Established => Self::rgb(0, 176, 80),
            ReadinessStatus::Leading => Self::BRAND,
        }
    }

    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Text {
        x: f32,
        y: f32,
        size: f32,
        font: FontFace,
        color: Color,
        text: String,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        thickness: f32,
        color: Color,
    },
    /// Draws the layout's logo.
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub commands: Vec<DrawCommand>,
}

impl PageLayout {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ReportLayout {
    pub width: f32,
    pub height: f32,
    pub pages: Vec<PageLayout>,
    pub logo: Option<Arc<BrandLogo>>,
}

impl ReportLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(PageLayout::texts)
    }
}

/// Lay out a report on A4 pages.
pub fn layout_report(input: &ReportInput, logo: Option<Arc<BrandLogo>>) -> ReportLayout {
    let mut flow = PageFlow::new(logo);

    details_section(&mut flow, input);
    overall_section(&mut flow, input);
    table_section(&mut flow, input);

    if let Some(answers) = input.answers.as_deref().filter(|a| !a.is_empty()) {
        flow.new_page();
        response_section(&mut flow, answers);
    }

    flow.finish()
}

fn details_section(flow: &mut PageFlow, input: &ReportInput) {
    let mut lines = Vec::new();
    if let Some(respondent) = &input.respondent {
        if let Some(company) = non_blank(&respondent.company) {
            lines.push(format!("Company: {company}"));
        }
        if let Some(name) = respondent.full_name() {
            lines.push(format!("Name: {name}"));
        }
        if let Some(email) = non_blank(&respondent.email) {
            lines.push(format!("Email: {email}"));
        }
    }
    if let Some(completed_at) = input.completed_at {
        lines.push(format!(
            "Date & time: {}",
            completed_at.format("%Y-%m-%d %H:%M UTC")
        ));
    }

    if lines.is_empty() {
        return;
    }

    let wrap_width = A4_WIDTH - 2.0 * MARGIN_X;
    flow.line(MARGIN_X, 12.0, FontFace::Bold, Color::INK, "Assessment details", 16.0);
    for line in lines {
        for wrapped in wrap_text(&line, FontFace::Regular, 10.0, wrap_width) {
            flow.line(MARGIN_X, 10.0, FontFace::Regular, Color::INK, &wrapped, 13.0);
        }
    }
    flow.advance(10.0);
}

fn overall_section(flow: &mut PageFlow, input: &ReportInput) {
    let status = ReadinessStatus::classify(input.avg);
    let color = Color::for_status(status);

    flow.line(MARGIN_X, 12.0, FontFace::Bold, Color::INK, "Overall AI Readiness", 26.0);
    flow.ensure(0.0);
    flow.text(MARGIN_X, 24.0, FontFace::Bold, color, &format!("{}%", input.avg));
    flow.text(
        MARGIN_X + 80.0,
        12.0,
        FontFace::Regular,
        color,
        &format!("({})", status.label()),
    );
    flow.advance(20.0);
    flow.line(
        MARGIN_X,
        9.0,
        FontFace::Regular,
        Color::MUTED,
        &ReadinessStatus::legend(),
        26.0,
    );
}

fn table_section(flow: &mut PageFlow, input: &ReportInput) {
    flow.ensure(20.0);
    for (x, heading) in [
        (MARGIN_X, "Enabler"),
        (COL_TOTAL, "Total"),
        (COL_READINESS, "Readiness %"),
        (COL_STATUS, "Status"),
    ] {
        flow.text(x, 10.0, FontFace::Bold, Color::INK, heading);
    }
    flow.advance(6.0);
    flow.rule();
    flow.advance(14.0);

    let name_width = COL_TOTAL - MARGIN_X - 10.0;
    for metric in &input.totals {
        let name_lines = wrap_text(&metric.name, FontFace::Regular, 9.0, name_width);
        flow.ensure(0.0);

        flow.text(COL_TOTAL, 9.0, FontFace::Regular, Color::INK, &metric.sum.to_string());
        flow.text(
            COL_READINESS,
            9.0,
            FontFace::Regular,
            Color::INK,
            &format!("{}%", metric.readiness),
        );
        flow.text(
            COL_STATUS,
            9.0,
            FontFace::Bold,
            Color::for_status(metric.status),
            metric.status.label(),
        );

        for (index, name) in name_lines.iter().enumerate() {
            if index > 0 {
                flow.advance(11.0);
                flow.ensure(0.0);
            }
            flow.text(MARGIN_X, 9.0, FontFace::Regular, Color::INK, name);
        }
        flow.advance(16.0);
    }
}

fn response_section(flow: &mut PageFlow, answers: &[AnswerSummary]) {
    let wrap_width = A4_WIDTH - 2.0 * MARGIN_X;

    flow.line(MARGIN_X, 12.0, FontFace::Bold, Color::INK, "Response details", 20.0);

    for group in answers {
        flow.ensure(40.0);
        flow.line(MARGIN_X, 11.0, FontFace::Bold, Color::BRAND, &group.enabler_name, 16.0);

        for question in &group.questions {
            let blocks = [
                (FontFace::Bold, format!("Question: {}", question.title)),
                (FontFace::Regular, format!("Left: {}", question.left)),
                (FontFace::Regular, format!("Right: {}", question.right)),
                (
                    FontFace::Regular,
                    format!("Your selection: {}", question.selection_label),
                ),
                (
                    FontFace::Regular,
                    format!("Explanation: {}", question.selection_text),
                ),
            ];

            for (font, block) in blocks {
                for line in wrap_text(&block, font, 9.0, wrap_width) {
                    flow.line(MARGIN_X, 9.0, font, Color::INK, &line, 12.0);
                }
            }
            flow.advance(8.0);
        }
        flow.advance(6.0);
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Cursor over the page being filled; starts new pages when content reaches the footer.
struct PageFlow {
    pages: Vec<PageLayout>,
    y: f32,
    logo: Option<Arc<BrandLogo>>,
}

impl PageFlow {
    fn new(logo: Option<Arc<BrandLogo>>) -> Self {
        let mut flow = Self {
            pages: Vec::new(),
            y: CONTENT_TOP,
            logo,
        };
        flow.new_page();
        flow
    }

    fn new_page(&mut self) {
        let mut page = PageLayout::default();
        page.commands.push(DrawCommand::Rect {
            x: 0.0,
            y: 0.0,
            width: A4_WIDTH,
            height: HEADER_HEIGHT,
            color: Color::BRAND,
        });

        let mut title_x = MARGIN_X;
        if self.logo.is_some() {
            page.commands.push(DrawCommand::Image {
                x: MARGIN_X,
                y: (HEADER_HEIGHT - LOGO_SIZE) / 2.0,
                width: LOGO_SIZE,
                height: LOGO_SIZE,
            });
            title_x += LOGO_SIZE + 12.0;
        }

        page.commands.push(text_command(
            title_x,
            40.0,
            18.0,
            FontFace::Bold,
            Color::WHITE,
            REPORT_TITLE,
        ));
        page.commands.push(text_command(
            title_x,
            58.0,
            9.0,
            FontFace::Regular,
            Color::WHITE,
            REPORT_SUBTITLE,
        ));

        self.pages.push(page);
        self.y = CONTENT_TOP;
    }

    /// Break to a new page unless `extra` points below the current baseline still fit.
    fn ensure(&mut self, extra: f32) {
        if self.y + extra > A4_HEIGHT - BOTTOM_MARGIN {
            self.new_page();
        }
    }

    fn advance(&mut self, dy: f32) {
        self.y += dy;
    }

    fn text(&mut self, x: f32, size: f32, font: FontFace, color: Color, text: &str) {
        let command = text_command(x, self.y, size, font, color, text);
        self.current().commands.push(command);
    }

    fn line(&mut self, x: f32, size: f32, font: FontFace, color: Color, text: &str, dy: f32) {
        self.ensure(0.0);
        self.text(x, size, font, color, text);
        self.advance(dy);
    }

    fn rule(&mut self) {
        let y = self.y;
        self.current().commands.push(DrawCommand::Line {
            x1: MARGIN_X,
            y1: y,
            x2: A4_WIDTH - MARGIN_X,
            y2: y,
            thickness: 0.5,
            color: Color::RULE,
        });
    }

    fn current(&mut self) -> &mut PageLayout {
        if self.pages.is_empty() {
            self.new_page();
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn finish(mut self) -> ReportLayout {
        for page in &mut self.pages {
            let rule_y = A4_HEIGHT - 60.0;
            page.commands.push(DrawCommand::Line {
                x1: MARGIN_X,
                y1: rule_y,
                x2: A4_WIDTH - MARGIN_X,
                y2: rule_y,
                thickness: 0.5,
                color: Color::RULE,
            });
            page.commands.push(text_command(
                MARGIN_X,
                A4_HEIGHT - 46.0,
                8.0,
                FontFace::Regular,
                Color::MUTED,
                FOOTER_TAGLINE,
            ));
            page.commands.push(text_command(
                MARGIN_X,
                A4_HEIGHT - 34.0,
                8.0,
                FontFace::Regular,
                Color::MUTED,
                FOOTER_COPYRIGHT,
            ));
        }

        ReportLayout {
            width: A4_WIDTH,
            height: A4_HEIGHT,
            pages: self.pages,
            logo: self.logo,
        }
    }
}

fn text_command(x: f32, y: f32, size: f32, font: FontFace, color: Color, text: &str) -> DrawCommand {
    DrawCommand::Text {
        x,
        y,
        size,
        font,
        color,
        text: sanitize(text),
    }
}
