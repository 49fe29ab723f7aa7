//! 表示用の整形
//!
//! 欠損値はすべて "-" で表示する。

use crate::metrics::StatusKind;
use crate::types::{excel_serial_to_datetime, Cell, CellKey};
use chrono::{NaiveDateTime, NaiveTime};

pub const MISSING: &str = "-";

const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M:%S %p"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// 値をそのまま表示（整数値の浮動小数は整数で）
pub fn format_value(cell: &Cell) -> String {
    cell.as_text().unwrap_or_else(|| MISSING.to_string())
}

pub fn format_key(key: Option<&CellKey>) -> String {
    key.map(ToString::to_string).unwrap_or_else(|| MISSING.to_string())
}

/// 時刻を HH:MM で表示（解釈できなければ "-"）
pub fn format_time(cell: &Cell) -> String {
    parse_time(cell)
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

fn parse_time(cell: &Cell) -> Option<NaiveTime> {
    match cell {
        Cell::DateTime(value) => Some(value.time()),
        // 1未満は時刻のみのシリアル値
        Cell::Number(serial) => {
            let serial = if *serial >= 0.0 && *serial < 1.0 { *serial } else { serial.fract() };
            excel_serial_to_datetime(serial).map(|dt| dt.time())
        }
        Cell::Text(text) => {
            let text = text.trim();
            TIME_FORMATS
                .iter()
                .find_map(|f| NaiveTime::parse_from_str(text, f).ok())
                .or_else(|| {
                    DATETIME_FORMATS
                        .iter()
                        .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
                        .map(|dt| dt.time())
                })
        }
        _ => None,
    }
}

/// ステータスにアイコンを付ける（想定外の値はそのまま）
pub fn format_status(status: Option<&str>) -> String {
    let Some(status) = status.map(str::trim).filter(|s| !s.is_empty()) else {
        return MISSING.to_string();
    };
    match status {
        "On Process" => format!("⏳ {}", status),
        "Delay(F)" => format!("❗ {}", status),
        "Finished" => format!("✅ {}", status),
        _ => status.to_string(),
    }
}

/// ステータスセルの配色（背景, 文字）
pub fn status_colors(status: Option<&str>) -> (&'static str, &'static str) {
    match StatusKind::of(status) {
        StatusKind::Finished => ("#28a745", "white"),
        StatusKind::Delayed => ("#dc3545", "white"),
        StatusKind::OnProcess => ("#ffc107", "black"),
        StatusKind::Other => ("white", "black"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&Cell::Number(12.0)), "12");
        assert_eq!(format_value(&Cell::Text("D-01".to_string())), "D-01");
        assert_eq!(format_value(&Cell::Empty), "-");
        assert_eq!(format_key(None), "-");
        assert_eq!(format_key(Some(&CellKey::Number(4.0))), "4");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(&Cell::Text("16:25".to_string())), "16:25");
        assert_eq!(format_time(&Cell::Text("09:20:00 AM".to_string())), "09:20");
        assert_eq!(format_time(&Cell::Text("2025-01-15 07:05:00".to_string())), "07:05");
        assert_eq!(format_time(&Cell::Number(0.75)), "18:00");
        assert_eq!(format_time(&Cell::Number(45672.25)), "06:00");
        assert_eq!(format_time(&Cell::Text("later".to_string())), "-");
        assert_eq!(format_time(&Cell::Empty), "-");
    }

    #[test]
    fn test_format_status() {
        assert_eq!(format_status(Some("On Process")), "⏳ On Process");
        assert_eq!(format_status(Some("Delay(F)")), "❗ Delay(F)");
        assert_eq!(format_status(Some(" Finished ")), "✅ Finished");
        assert_eq!(format_status(Some("Hold")), "Hold");
        assert_eq!(format_status(Some("")), "-");
        assert_eq!(format_status(None), "-");
    }

    #[test]
    fn test_status_colors() {
        assert_eq!(status_colors(Some("Finished")), ("#28a745", "white"));
        assert_eq!(status_colors(Some("Delay(F)")), ("#dc3545", "white"));
        assert_eq!(status_colors(Some("On Process")), ("#ffc107", "black"));
        assert_eq!(status_colors(None), ("white", "black"));
    }
}
