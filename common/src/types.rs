//! 出荷行の型定義
//!
//! - Cell: シートから読み込んだセル値（加工しない）
//! - CellKey: 端末番号・出荷番号などの比較・整列用キー
//! - ShipmentRow: 検証済みの1行

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Excelのシリアル日付の起点（1900年うるう年バグ込み）
fn excel_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Excelのシリアル値を日時に変換
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let millis = (serial * 86_400_000.0).round() as i64;
    excel_epoch().checked_add_signed(TimeDelta::milliseconds(millis))
}

/// セル値
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Cell {
    /// 空セル・空白のみの文字列を欠損として扱う
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            Cell::Number(value) => value.is_nan(),
            _ => false,
        }
    }

    /// 欠損でなければ表示用の文字列を返す
    pub fn as_text(&self) -> Option<String> {
        if self.is_missing() {
            return None;
        }
        Some(self.to_string())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(text) => write!(f, "{}", text.trim()),
            Cell::Number(value) => write!(f, "{}", format_number(*value)),
            Cell::Bool(value) => write!(f, "{}", value),
            Cell::DateTime(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// 整数値の浮動小数は小数点なしで表示（"1.0" → "1"）
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// 端末番号・出荷番号のキー
///
/// 数値は文字列より前に、数値同士は数値順に並ぶ。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellKey {
    Number(f64),
    Text(String),
}

impl CellKey {
    /// セルからキーを作る（欠損なら None）
    pub fn from_cell(cell: &Cell) -> Option<Self> {
        match cell {
            Cell::Number(value) if !value.is_nan() => Some(CellKey::Number(*value)),
            Cell::Text(text) if !text.trim().is_empty() => Some(CellKey::Text(text.trim().to_string())),
            Cell::Bool(value) => Some(CellKey::Text(value.to_string())),
            Cell::DateTime(value) => Some(CellKey::Text(value.to_string())),
            _ => None,
        }
    }

    /// 利用者の入力（CLI引数・選択肢）からキーを作る
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => CellKey::Number(value),
            _ => CellKey::Text(trimmed.to_string()),
        }
    }

    /// 表示上同じ値なら一致とみなす（数値 1 と文字列 "1"）
    pub fn matches(&self, other: &CellKey) -> bool {
        self == other || self.to_string() == other.to_string()
    }
}

impl PartialEq for CellKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellKey {}

impl PartialOrd for CellKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellKey::Number(a), CellKey::Number(b)) => a.total_cmp(b),
            (CellKey::Number(_), CellKey::Text(_)) => Ordering::Less,
            (CellKey::Text(_), CellKey::Number(_)) => Ordering::Greater,
            (CellKey::Text(a), CellKey::Text(b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellKey::Number(value) => write!(f, "{}", format_number(*value)),
            CellKey::Text(text) => write!(f, "{}", text),
        }
    }
}

/// 出荷ボードの1行（読み込み後は不変）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentRow {
    pub terminal: Option<CellKey>,         // Ter.
    pub ship_no: Option<CellKey>,          // Ship no.
    pub dock_code: Cell,
    pub truck_route: Cell,
    pub preparation_start: Cell,
    pub preparation_end: Cell,
    pub loading_start: Cell,
    pub loading_end: Cell,
    pub status_preparation: Option<String>,
    pub status_loading: Option<String>,
    pub completion_time: Option<NaiveDateTime>,
}
