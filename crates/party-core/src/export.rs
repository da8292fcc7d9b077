//! Export renderer: a single self-contained HTML document for a plan.
//!
//! All styling is inline so the file renders the same when opened directly,
//! attached to an email, or pasted into another page.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use crate::i18n::Dictionary;
use crate::plan::{Plan, field_label};
use crate::score::{PlaceholderScore, ScoreCategory};
use crate::selection::{Field, FormSelection};

const ACCENT: &str = "#d9467a";

/// Escape text for inclusion in HTML element content or attribute values.
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

/// File name for an export made at `timestamp`.
pub fn export_file_name(timestamp: NaiveDateTime) -> String {
    format!("party-plan-{}.html", timestamp.format("%Y%m%d-%H%M%S"))
}

/// Render the plan, its score and the user's selections as an HTML
/// document into `html`.
pub fn render_html<W: fmt::Write>(
    html: &mut W,
    plan: &Plan,
    score: &PlaceholderScore,
    selection: &FormSelection,
    dict: &Dictionary,
    generated_at: NaiveDateTime,
) -> fmt::Result {
    let title = escape_html(&dict.text("export.title"));
    let time = generated_at.format("%Y-%m-%d %H:%M").to_string();

    write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"{lang}\"><head><meta charset=\"utf-8\"><title>{title}</title></head>\
<body style=\"margin:0;padding:32px;background:#fff7fa;font-family:'Helvetica Neue',Arial,sans-serif;color:#333;\">\
<div style=\"max-width:760px;margin:0 auto;background:#fff;border-radius:16px;padding:32px;box-shadow:0 4px 24px rgba(0,0,0,0.08);\">\
<h1 style=\"margin:0 0 8px;color:{ACCENT};font-size:28px;\">{title}</h1>\
<p style=\"margin:0 0 24px;color:#888;font-size:13px;\">{time}</p>",
        lang = dict.language(),
        time = escape_html(&dict.format("export.generatedAt", &[("time", time.as_str())])),
    )?;

    // Selection summary.
    write!(
        html,
        "<h2 style=\"font-size:18px;color:{ACCENT};border-bottom:2px solid #f3c1d3;padding-bottom:4px;\">{}</h2>\
<table style=\"width:100%;border-collapse:collapse;margin-bottom:24px;font-size:14px;\">",
        escape_html(&dict.text("export.selection")),
    )?;
    for field in Field::ALL {
        write!(
            html,
            "<tr><td style=\"padding:4px 8px;color:#888;width:30%;\">{}</td><td style=\"padding:4px 8px;\">{}</td></tr>",
            escape_html(&dict.text(&format!("fields.{}", field.key()))),
            escape_html(&field_label(dict, selection, field)),
        )?;
    }
    html.write_str("</table>")?;

    // Plan sections.
    for (category, entries) in plan.sections() {
        write!(
            html,
            "<h2 style=\"font-size:18px;color:{ACCENT};border-bottom:2px solid #f3c1d3;padding-bottom:4px;\">{}</h2>\
<ul style=\"margin:8px 0 20px;padding-left:20px;line-height:1.7;font-size:14px;\">",
            escape_html(&dict.text(&format!("categories.{}", category.key()))),
        )?;
        for entry in entries {
            write!(html, "<li>{}</li>", escape_html(entry))?;
        }
        html.write_str("</ul>")?;
    }

    // Score.
    write!(
        html,
        "<div style=\"background:#fdf0f5;border-radius:12px;padding:20px;margin-top:8px;\">\
<h2 style=\"margin:0 0 12px;font-size:18px;color:{ACCENT};\">{title} <span style=\"float:right;\">{total} · {level}</span></h2>\
<table style=\"width:100%;border-collapse:collapse;font-size:14px;\">",
        title = escape_html(&dict.text("score.title")),
        total = score.total,
        level = escape_html(&score.level_label),
    )?;
    for category in ScoreCategory::ALL {
        write!(
            html,
            "<tr><td style=\"padding:4px 8px;\">{}</td><td style=\"padding:4px 8px;text-align:right;\">{}/20</td></tr>",
            escape_html(&dict.text(&format!("score.categories.{}", category.key()))),
            score.categories.get(category),
        )?;
    }
    write!(
        html,
        "<tr><td style=\"padding:4px 8px;font-weight:bold;\">{}</td><td style=\"padding:4px 8px;text-align:right;font-weight:bold;\">{}/100</td></tr>\
</table><p style=\"margin:12px 0 0;color:#999;font-size:12px;\">{}</p></div>",
        escape_html(&dict.text("score.total")),
        score.total,
        escape_html(&dict.text("score.note")),
    )?;

    html.write_str("</div></body></html>\n")
}

/// Write `html` into `dir` under [`export_file_name`], creating `dir` if
/// needed. Returns the written path.
pub fn write_export(dir: &Path, html: &str, timestamp: NaiveDateTime) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;
    let path = dir.join(export_file_name(timestamp));
    std::fs::write(&path, html)
        .with_context(|| format!("failed to write export file {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = html.len(), "exported plan");
    Ok(path)
}
