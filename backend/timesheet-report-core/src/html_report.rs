// src/html_report.rs
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::aggregation::RankedSummary;
use crate::error::ReportError;

/// Rows strictly below this many hours are highlighted.
pub const LOW_HOURS_THRESHOLD: f64 = 100.0;

const REPORT_TITLE: &str = "Employee Total Time Worked Hours";

const STYLESHEET: &str = "\
table {border-collapse: collapse; width: 60%; font-family: Arial; text-align: center; margin-right: auto; margin-left: auto;}
th, td{border: 1px solid #999; padding: 8px; text-align: center;}
.low {background-color: #eb0606ff;}";

pub fn is_low(total_hours: f64) -> bool {
    total_hours < LOW_HOURS_THRESHOLD
}

/// Renders the ranked table as a self-contained HTML document.
pub fn render_html(summary: &RankedSummary) -> String {
    let mut html = String::new();
    html.push_str("<html><head><meta charset='utf-8'>\n");
    html.push_str(&format!("<title>{}</title>\n", REPORT_TITLE));
    html.push_str(&format!("<style>\n{}\n</style></head><body>\n", STYLESHEET));
    html.push_str(&format!(
        "<h2 style='text-align: center;'>{}</h2>\n",
        REPORT_TITLE
    ));
    html.push_str("<table>\n");
    html.push_str("<tr><th>Rank</th><th>Name</th><th>Total Hours</th></tr>\n");

    for (rank, total) in summary.iter().enumerate().map(|(i, t)| (i + 1, t)) {
        let row_class = if is_low(total.total_hours) {
            " class='low'"
        } else {
            ""
        };
        html.push_str(&format!(
            "<tr{}><td>{}</td><td>{}</td><td>{:.2}</td></tr>\n",
            row_class,
            rank,
            escape_markup(&total.name),
            total.total_hours
        ));
    }

    html.push_str("</table>\n");
    html.push_str(&format!(
        "<p style='text-align: center;'>Rows in red worked less than {} hours.</p>\n",
        LOW_HOURS_THRESHOLD
    ));
    html.push_str("</body></html>\n");
    html
}

/// Writes the rendered table to `path`. The file handle is closed before returning.
pub fn write_html_report(summary: &RankedSummary, path: &Path) -> Result<(), ReportError> {
    write_html_document(&render_html(summary), path)
}

pub(crate) fn write_html_document(html: &str, path: &Path) -> Result<(), ReportError> {
    let file = File::create(path).map_err(|e| ReportError::render("HTML table", e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(html.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| ReportError::render("HTML table", e))?;
    info!("HTML table saved at {}", path.display());
    Ok(())
}

/// Escapes text for use in HTML/SVG content and attribute values.
pub fn escape_markup(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
