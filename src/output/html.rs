// HTML table output for enriched recommendations.
//
// Produces a self-contained fragment (style block + table) that a web page
// can embed as-is. All cell text is escaped; the only raw markup is the
// anchor built by LinkedPlace::title_markup, whose parts are escaped too.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use crate::catalog::REGION_COLUMN;
use crate::enrich::LinkedPlace;

const TABLE_STYLE: &str = "<style>
.custom-table { width: 100%; border-collapse: collapse; font-family: Arial, sans-serif; margin: 20px 0; }
.custom-table th, .custom-table td { padding: 12px; border: 1px solid #ddd; text-align: center; }
.custom-table th { background-color: #4CAF50; color: white; font-weight: bold; }
.custom-table tr:nth-child(even) { background-color: #f2f2f2; }
.custom-table tr:hover { background-color: #ddd; }
</style>
";

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render places as a `custom-table` with columns 검색어, title, category.
pub fn render_html_table(places: &[LinkedPlace]) -> String {
    let mut html = String::from(TABLE_STYLE);
    html.push_str("<table class=\"custom-table\">\n  <thead>\n    <tr>");
    for header in [REGION_COLUMN, "title", "category"] {
        let _ = write!(html, "<th>{}</th>", escape_html(header));
    }
    html.push_str("</tr>\n  </thead>\n  <tbody>\n");

    for place in places {
        let _ = writeln!(
            html,
            "    <tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&place.place.search_term),
            place.title_markup(),
            escape_html(&place.place.category),
        );
    }

    html.push_str("  </tbody>\n</table>\n");
    html
}

/// Write the rendered table to `path`, creating parent directories.
///
/// Returns the path written, for display.
pub fn write_html_table(places: &[LinkedPlace], path: &str) -> Result<String> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for {path}"))?;
        }
    }

    std::fs::write(path, render_html_table(places))
        .with_context(|| format!("Failed to write HTML table to {path}"))?;

    Ok(path.to_string())
}
