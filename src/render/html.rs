//! HTML出力
//!
//! ボードと同じ表・指標を1ファイルにまとめる。ブラウザ側の自動再読込は
//! meta refresh で行う。

use super::{metric_cards, table_cells, TABLE_HEADERS};
use super::{STATUS_LOADING_COLUMN, STATUS_PREPARATION_COLUMN};
use crate::board::{Frame, FrameBody};
use crate::error::Result;
use shipboard_common::display::status_colors;
use shipboard_common::Slide;
use std::fmt::Write as _;
use std::path::Path;

const HEADER_STYLE: &str = "font-size: 2.5rem; font-weight: bold; color: #1E3A8A; \
    padding: 0.5rem 0; margin-bottom: 1rem; border-bottom: 3px solid #DBEAFE;";
const TH_STYLE: &str = "font-size: 1.8rem; font-weight: bold; padding: 1rem; \
    text-align: center; border: 1px solid #ddd;";
const TD_STYLE: &str = "font-size: 1.5rem; font-weight: bold; padding: 1rem; \
    text-align: center; border: 1px solid #ddd;";

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// フレームを1ページのHTMLにする
pub fn render_html(frame: &Frame) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta http-equiv=\"refresh\" content=\"1\">\n");
    html.push_str("<title>Shipment Status Board</title>\n</head>\n");
    html.push_str("<body style=\"font-family: sans-serif; margin: 1.5rem;\">\n");

    if let Some(error) = &frame.last_error {
        let message = if frame.loaded_at.is_some() {
            format!("Showing previously loaded data. Last refresh failed: {}", error)
        } else {
            format!("Could not display dashboard due to a previous error: {}", error)
        };
        banner(&mut html, "#f8d7da", "#721c24", &message);
    }
    if let Some(error) = &frame.filter_error {
        banner(&mut html, "#fff3cd", "#856404", error);
    }

    match &frame.body {
        FrameBody::NotLoaded => {
            if frame.last_error.is_none() {
                banner(&mut html, "#d1ecf1", "#0c5460", "Waiting for the first data load...");
            }
        }
        FrameBody::NoData => {
            banner(&mut html, "#fff3cd", "#856404", "No data available for the selected filters.");
        }
        FrameBody::Board(slide) => slide_html(&mut html, slide),
    }

    if let Some(loaded_at) = frame.loaded_at {
        let _ = writeln!(
            html,
            "<p style=\"color: #666;\">Data last loaded: {}</p>",
            loaded_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    html.push_str("</body>\n</html>\n");
    html
}

fn banner(html: &mut String, background: &str, color: &str, text: &str) {
    let _ = writeln!(
        html,
        "<div style=\"background-color: {}; color: {}; padding: 0.75rem 1rem; \
         border-radius: 0.25rem; margin-bottom: 1rem;\">{}</div>",
        background,
        color,
        escape(text)
    );
}

fn slide_html(html: &mut String, slide: &Slide) {
    let _ = writeln!(html, "<p style=\"{}\">{}</p>", HEADER_STYLE, escape(&slide.title));

    html.push_str("<table style=\"width: 100%; border-collapse: collapse; border: 1px solid #ddd;\">\n");
    html.push_str("<thead style=\"background-color: #F0F4FF; color: #1E3A8A;\"><tr>");
    for header in TABLE_HEADERS {
        let _ = write!(html, "<th style=\"{}\">{}</th>", TH_STYLE, escape(header));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for row in &slide.rows {
        html.push_str("<tr style=\"border-bottom: 1px solid #ddd;\">");
        for (column, cell) in table_cells(row).iter().enumerate() {
            let status = match column {
                STATUS_PREPARATION_COLUMN => Some(row.status_preparation.as_deref()),
                STATUS_LOADING_COLUMN => Some(row.status_loading.as_deref()),
                _ => None,
            };
            match status {
                Some(status) => {
                    let (background, color) = status_colors(status);
                    let _ = write!(
                        html,
                        "<td style=\"background-color: {}; color: {}; {}\">{}</td>",
                        background,
                        color,
                        TD_STYLE,
                        escape(cell)
                    );
                }
                None => {
                    let _ = write!(html, "<td style=\"{}\">{}</td>", TD_STYLE, escape(cell));
                }
            }
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody></table>\n");

    let _ = writeln!(html, "<p style=\"{}\">{}</p>", HEADER_STYLE, escape(&slide.metrics_title));
    html.push_str("<div style=\"display: grid; grid-template-columns: repeat(4, 1fr); gap: 1rem;\">\n");
    for (label, value) in metric_cards(&slide.metrics) {
        let _ = writeln!(
            html,
            "<div><div style=\"color: #666;\">{}</div><div style=\"font-size: 2.25rem;\">{}</div></div>",
            label, value
        );
    }
    html.push_str("</div>\n");
}

/// 一時ファイルに書いてから置き換える
pub fn write_html(frame: &Frame, path: &Path) -> Result<()> {
    let tmp = path.with_extension("html.tmp");
    std::fs::write(&tmp, render_html(frame))?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>A&B</b>"), "&lt;b&gt;A&amp;B&lt;/b&gt;");
        assert_eq!(escape("\"x\""), "&quot;x&quot;");
        assert_eq!(escape("plain"), "plain");
    }
}
