use super::layout::{DrawCommand, ReportLayout};
use super::text::FontFace;
use super::{RenderBackend, RenderError};
use base64::Engine;
use std::fmt::Write;

const PAGE_GAP: f32 = 24.0;

/// Renders every page of a layout into one SVG, pages stacked top to bottom.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgBackend;

impl RenderBackend for SvgBackend {
    fn render(&self, layout: &ReportLayout) -> Result<Vec<u8>, RenderError> {
        let pages = layout.pages.len() as f32;
        let total_height = pages * layout.height + (pages - 1.0).max(0.0) * PAGE_GAP;
        let logo_href = layout.logo.as_ref().map(|logo| {
            format!(
                "data:{};base64,{}",
                logo.mime(),
                base64::engine::general_purpose::STANDARD.encode(logo.encoded())
            )
        });

        let mut svg = String::new();
        write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.2}" height="{h:.2}" viewBox="0 0 {w:.2} {h:.2}">"#,
            w = layout.width,
            h = total_height,
        )?;

        for (index, page) in layout.pages.iter().enumerate() {
            let offset = index as f32 * (layout.height + PAGE_GAP);
            write!(
                svg,
                r##"<g transform="translate(0 {offset:.2})"><rect width="{:.2}" height="{:.2}" fill="#ffffff" stroke="#e2e8f0"/>"##,
                layout.width, layout.height,
            )?;

            for command in &page.commands {
                match command {
                    DrawCommand::Text {
                        x,
                        y,
                        size,
                        font,
                        color,
                        text,
                    } => {
                        let weight = match font {
                            FontFace::Bold => "bold",
                            FontFace::Regular => "normal",
                        };
                        write!(
                            svg,
                            r#"<text x="{x:.2}" y="{y:.2}" font-family="Helvetica, Arial, sans-serif" font-size="{size}" font-weight="{weight}" fill="{}">{}</text>"#,
                            color.hex(),
                            escape_xml(text),
                        )?;
                    }
                    DrawCommand::Rect {
                        x,
                        y,
                        width,
                        height,
                        color,
                    } => {
                        write!(
                            svg,
                            r#"<rect x="{x:.2}" y="{y:.2}" width="{width:.2}" height="{height:.2}" fill="{}"/>"#,
                            color.hex(),
                        )?;
                    }
                    DrawCommand::Line {
                        x1,
                        y1,
                        x2,
                        y2,
                        thickness,
                        color,
                    } => {
                        write!(
                            svg,
                            r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{}" stroke-width="{thickness}"/>"#,
                            color.hex(),
                        )?;
                    }
                    DrawCommand::Image {
                        x,
                        y,
                        width,
                        height,
                    } => {
                        if let Some(href) = &logo_href {
                            write!(
                                svg,
                                r#"<image x="{x:.2}" y="{y:.2}" width="{width:.2}" height="{height:.2}" href="{href}"/>"#,
                            )?;
                        }
                    }
                }
            }
            svg.push_str("</g>");
        }

        svg.push_str("</svg>");
        Ok(svg.into_bytes())
    }
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
