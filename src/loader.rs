//! Excel読み込み
//!
//! ダウンロードしたバイト列を calamine で開き、見出し行＋データ行の表にする。
//! 列ラベルの空白除去と必須列の検証は shipboard_common::schema に任せる。

use crate::error::{Result, ShipboardError};
use calamine::{Data, Range, Reader, Xlsx};
use shipboard_common::types::excel_serial_to_datetime;
use shipboard_common::{Cell, RawTable, ShipmentRow};
use std::io::Cursor;
use std::str::FromStr;
use tracing::debug;

/// 読み込むシート（名前、または0始まりの番号）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    Name(String),
    Index(usize),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

impl FromStr for SheetSelector {
    type Err = ShipboardError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ShipboardError::Config("sheet name must not be empty".into()));
        }
        match s.parse::<usize>() {
            Ok(index) => Ok(SheetSelector::Index(index)),
            Err(_) => Ok(SheetSelector::Name(s.to_string())),
        }
    }
}

impl std::fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetSelector::Name(name) => write!(f, "{}", name),
            SheetSelector::Index(index) => write!(f, "#{}", index),
        }
    }
}

/// ワークブックを読み、検証済みの行にする
pub fn parse_workbook(bytes: Vec<u8>, sheet: &SheetSelector) -> Result<Vec<ShipmentRow>> {
    let table = read_table(bytes, sheet)?.clean_headers();
    let rows = table.into_rows()?;
    debug!(sheet = %sheet, rows = rows.len(), "parsed worksheet");
    Ok(rows)
}

/// シートを生の表として読む（見出しは未加工）
pub fn read_table(bytes: Vec<u8>, sheet: &SheetSelector) -> Result<RawTable> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    let range = match sheet {
        SheetSelector::Name(name) => {
            if !workbook.sheet_names().iter().any(|n| n == name) {
                return Err(ShipboardError::Parse(format!(
                    "worksheet '{}' not found (available: {})",
                    name,
                    workbook.sheet_names().join(", ")
                )));
            }
            workbook.worksheet_range(name)?
        }
        SheetSelector::Index(index) => workbook.worksheet_range_at(*index).ok_or_else(|| {
            ShipboardError::Parse(format!("worksheet index {} out of range", index))
        })??,
    };

    Ok(range_to_table(&range))
}

fn range_to_table(range: &Range<Data>) -> RawTable {
    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|header| header.iter().map(header_label).collect())
        .unwrap_or_default();
    let rows = rows.map(|row| row.iter().map(convert_cell).collect()).collect();
    RawTable { headers, rows }
}

/// 見出しの文字列はそのまま（空白除去は RawTable::clean_headers で行う）
fn header_label(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => convert_cell(other).to_string(),
    }
}

/// calamine のセルを共通のセル型に（値の意味は変えない）
fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => excel_serial_to_datetime(dt.as_f64())
            .map(Cell::DateTime)
            .unwrap_or(Cell::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_selector_parse() {
        assert_eq!("0".parse::<SheetSelector>().unwrap(), SheetSelector::Index(0));
        assert_eq!(
            " Databaseshippingboard ".parse::<SheetSelector>().unwrap(),
            SheetSelector::Name("Databaseshippingboard".to_string())
        );
        assert!("  ".parse::<SheetSelector>().is_err());
    }

    #[test]
    fn test_convert_cell() {
        assert_eq!(convert_cell(&Data::Int(3)), Cell::Number(3.0));
        assert_eq!(convert_cell(&Data::String("x".into())), Cell::Text("x".into()));
        assert_eq!(convert_cell(&Data::Empty), Cell::Empty);
        assert_eq!(convert_cell(&Data::Bool(true)), Cell::Bool(true));
    }

    #[test]
    fn test_header_label_keeps_surrounding_spaces() {
        assert_eq!(header_label(&Data::String("  Ter. ".into())), "  Ter. ");
        assert_eq!(header_label(&Data::Float(2.0)), "2");
        assert_eq!(header_label(&Data::Empty), "");
    }

    #[test]
    fn test_invalid_bytes_are_parse_errors() {
        let err = read_table(b"not a workbook".to_vec(), &SheetSelector::default()).unwrap_err();
        assert!(matches!(err, ShipboardError::Parse(_)));
    }
}
