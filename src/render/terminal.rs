//! 端末ボード
//!
//! 書き込み先は `Write` を受け取る（テストではバッファに描く）。
//! 端末制御は画面消去のみで、raw モードには入らない。

use super::{metric_cards, table_cells, TABLE_HEADERS};
use crate::board::{Frame, FrameBody};
use crossterm::style::{
    self, Attribute, Color, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::{cursor, terminal, QueueableCommand};
use shipboard_common::{RouteCount, Slide, StatusKind};
use std::io::{self, Write};

const COLUMN_GAP: &str = "  ";

/// 1フレームを描く（clear=true なら先に画面を消す）
pub fn draw_frame<W: Write>(out: &mut W, frame: &Frame, clear: bool) -> io::Result<()> {
    if clear {
        out.queue(cursor::MoveTo(0, 0))?;
        out.queue(terminal::Clear(terminal::ClearType::All))?;
    }

    draw_banners(out, frame)?;

    match &frame.body {
        FrameBody::NotLoaded => {
            if frame.last_error.is_none() {
                line(out, "Waiting for the first data load...")?;
            }
        }
        FrameBody::NoData => {
            colored_line(out, Color::Yellow, "No data available for the selected filters.")?;
        }
        FrameBody::Board(slide) => draw_slide(out, slide)?,
    }

    out.queue(style::Print("\n"))?;
    let loaded = frame
        .loaded_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    out.queue(SetForegroundColor(Color::DarkGrey))?;
    out.queue(style::Print(format!(
        "Data last loaded: {}   (updated {})\n",
        loaded,
        frame.generated_at.format("%H:%M:%S")
    )))?;
    out.queue(ResetColor)?;
    out.flush()
}

fn draw_banners<W: Write>(out: &mut W, frame: &Frame) -> io::Result<()> {
    if let Some(error) = &frame.last_error {
        let message = if frame.loaded_at.is_some() {
            format!("Showing previously loaded data. Last refresh failed: {}", error)
        } else {
            format!("Could not display dashboard due to a previous error: {}", error)
        };
        colored_line(out, Color::Red, &message)?;
    }
    if let Some(error) = &frame.filter_error {
        colored_line(out, Color::Yellow, &format!("Filter: {}", error))?;
    }
    Ok(())
}

fn draw_slide<W: Write>(out: &mut W, slide: &Slide) -> io::Result<()> {
    let header = match slide.position {
        Some((index, len)) => format!("{}   [{}/{}]", slide.title, index + 1, len),
        None => slide.title.clone(),
    };
    bold_line(out, &header)?;
    out.queue(style::Print("\n"))?;

    let cells: Vec<[String; 10]> = slide.rows.iter().map(table_cells).collect();
    let mut widths: Vec<usize> = TABLE_HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    out.queue(SetAttribute(Attribute::Bold))?;
    for (header, width) in TABLE_HEADERS.iter().zip(&widths) {
        out.queue(style::Print(format!("{}{}", pad(header, *width), COLUMN_GAP)))?;
    }
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(style::Print("\n"))?;

    for (row, cells) in slide.rows.iter().zip(&cells) {
        let statuses = [row.status_preparation.as_deref(), row.status_loading.as_deref()];
        for (column, (cell, width)) in cells.iter().zip(&widths).enumerate() {
            let status = match column {
                super::STATUS_PREPARATION_COLUMN => Some(statuses[0]),
                super::STATUS_LOADING_COLUMN => Some(statuses[1]),
                _ => None,
            };
            match status.and_then(|s| status_color(StatusKind::of(s))) {
                Some((background, foreground)) => {
                    out.queue(SetBackgroundColor(background))?;
                    out.queue(SetForegroundColor(foreground))?;
                    out.queue(style::Print(pad(cell, *width)))?;
                    out.queue(ResetColor)?;
                    out.queue(style::Print(COLUMN_GAP))?;
                }
                None => {
                    out.queue(style::Print(format!("{}{}", pad(cell, *width), COLUMN_GAP)))?;
                }
            }
        }
        out.queue(style::Print("\n"))?;
    }

    out.queue(style::Print("\n"))?;
    bold_line(out, &slide.metrics_title)?;
    let cards = metric_cards(&slide.metrics);
    for chunk in cards.chunks(4) {
        let text: Vec<String> = chunk
            .iter()
            .map(|(label, value)| format!("{}: {}", label, value))
            .collect();
        line(out, &text.join("   "))?;
    }
    Ok(())
}

/// ルート別の出荷数
pub fn print_routes<W: Write>(out: &mut W, routes: &[RouteCount]) -> io::Result<()> {
    if routes.is_empty() {
        return line(out, "No shipments with a truck route.");
    }
    let width = routes
        .iter()
        .map(|r| r.route.chars().count())
        .max()
        .unwrap_or(0)
        .max("Truck Route".len());
    bold_line(out, &format!("{}  Shipments", pad("Truck Route", width)))?;
    for route in routes {
        line(out, &format!("{}  {:>9}", pad(&route.route, width), route.shipments))?;
    }
    out.flush()
}

fn status_color(kind: StatusKind) -> Option<(Color, Color)> {
    match kind {
        StatusKind::Finished => Some((Color::DarkGreen, Color::White)),
        StatusKind::Delayed => Some((Color::DarkRed, Color::White)),
        StatusKind::OnProcess => Some((Color::DarkYellow, Color::Black)),
        StatusKind::Other => None,
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

fn line<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    out.queue(style::Print(format!("{}\n", text)))?;
    Ok(())
}

fn bold_line<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    out.queue(SetAttribute(Attribute::Bold))?;
    out.queue(style::Print(text))?;
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(style::Print("\n"))?;
    Ok(())
}

fn colored_line<W: Write>(out: &mut W, color: Color, text: &str) -> io::Result<()> {
    out.queue(SetForegroundColor(color))?;
    out.queue(style::Print(text))?;
    out.queue(ResetColor)?;
    out.queue(style::Print("\n"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("abcdef", 4), "abcdef");
    }

    #[test]
    fn test_print_routes() {
        let routes = vec![
            RouteCount { route: "R1".to_string(), shipments: 3 },
            RouteCount { route: "R22".to_string(), shipments: 1 },
        ];
        let mut out = Vec::new();
        print_routes(&mut out, &routes).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("R1"));
        assert!(text.contains("        3"));
        assert!(text.contains("Shipments"));
    }

    #[test]
    fn test_print_routes_empty() {
        let mut out = Vec::new();
        print_routes(&mut out, &[]).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("No shipments"));
    }
}
