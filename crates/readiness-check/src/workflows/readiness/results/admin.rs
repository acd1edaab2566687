use std::fmt::{self, Write};

use super::domain::{ResultPage, ResultView};
use crate::theme::ColorScheme;
use crate::workflows::readiness::report::Color;

pub const ADMIN_PATH: &str = "/aireadinesscheck/admin";

/// Render one page of results as a standalone HTML document.
pub fn render_admin_page(page: &ResultPage, scheme: ColorScheme) -> Result<String, fmt::Error> {
    let palette = scheme.palette();
    let mut html = String::new();

    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html lang=\"en\">")?;
    writeln!(html, "<head>")?;
    writeln!(html, "<meta charset=\"utf-8\">")?;
    writeln!(html, "<title>AI Readiness Check results</title>")?;
    writeln!(
        html,
        "<style>body{{background:{bg};color:{text};font-family:Helvetica,Arial,sans-serif;margin:2rem}}\
         table{{border-collapse:collapse;width:100%;background:{surface}}}\
         th,td{{border-bottom:1px solid {border};padding:.5rem;text-align:left}}\
         th{{color:{muted}}}a{{color:{accent}}}.pager{{margin-top:1rem;color:{muted}}}</style>",
        bg = palette.background,
        text = palette.text,
        surface = palette.surface,
        border = palette.border,
        muted = palette.muted,
        accent = palette.accent,
    )?;
    writeln!(html, "</head>")?;
    writeln!(html, "<body data-theme=\"{}\">", scheme_name(scheme))?;
    writeln!(html, "<h1>AI Readiness Check results</h1>")?;
    writeln!(html, "<p>{} results in total</p>", page.total_count)?;

    if page.results.is_empty() {
        writeln!(html, "<p>No results on this page.</p>")?;
    } else {
        writeln!(html, "<table>")?;
        writeln!(
            html,
            "<thead><tr><th>Created</th><th>Slug</th><th>Name</th><th>Company</th>\
             <th>Email</th><th>Average</th><th>Status</th><th>Report</th></tr></thead>"
        )?;
        writeln!(html, "<tbody>")?;
        for result in &page.results {
            write_row(&mut html, result)?;
        }
        writeln!(html, "</tbody>")?;
        writeln!(html, "</table>")?;
    }

    write_pager(&mut html, page)?;
    writeln!(html, "</body>")?;
    writeln!(html, "</html>")?;
    Ok(html)
}

fn write_row(html: &mut String, result: &ResultView) -> fmt::Result {
    let info = result.user_info.as_ref();
    let name = info.and_then(|i| i.full_name()).unwrap_or_default();
    let company = info.map(|i| i.company.as_str()).unwrap_or_default();
    let email = info.map(|i| i.email.as_str()).unwrap_or_default();
    let report = match &result.report_url {
        Some(url) => format!("<a href=\"{}\">Open PDF</a>", escape_html(url)),
        None => "-".to_string(),
    };

    writeln!(
        html,
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}%</td>\
         <td style=\"color:{}\">{}</td><td>{}</td></tr>",
        result.created_at.format("%Y-%m-%d %H:%M"),
        escape_html(result.slug.as_str()),
        escape_html(&name),
        escape_html(company),
        escape_html(email),
        result.avg,
        Color::for_status(result.status).hex(),
        result.status.label(),
        report,
    )
}

fn write_pager(html: &mut String, page: &ResultPage) -> fmt::Result {
    let page_size = u64::from(page.page_size.max(1));
    let last_page = page.total_count.div_ceil(page_size).max(1);

    write!(html, "<p class=\"pager\">")?;
    if page.page > 1 {
        write!(
            html,
            "<a href=\"{ADMIN_PATH}?page={}&amp;pageSize={}\">Previous</a> ",
            page.page - 1,
            page.page_size
        )?;
    }
    write!(html, "Page {} of {}", page.page, last_page)?;
    if u64::from(page.page) < last_page {
        write!(
            html,
            " <a href=\"{ADMIN_PATH}?page={}&amp;pageSize={}\">Next</a>",
            page.page + 1,
            page.page_size
        )?;
    }
    writeln!(html, "</p>")
}

fn scheme_name(scheme: ColorScheme) -> &'static str {
    match scheme {
        ColorScheme::Light => "light",
        ColorScheme::Dark => "dark",
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
