//! シートの列定義と検証
//!
//! ローダーが作った RawTable を列ラベルで解決し、ShipmentRow に変換する。
//! クリーニングは列ラベルの前後空白除去のみで、セル値には手を入れない。

use crate::error::ValidationError;
use crate::types::{excel_serial_to_datetime, Cell, CellKey, ShipmentRow};
use chrono::{NaiveDate, NaiveDateTime};

pub const COL_COMPLETION_TIME: &str = "Completion time";
pub const COL_TERMINAL: &str = "Ter.";
pub const COL_DOCK_CODE: &str = "Dock Code";
pub const COL_TRUCK_ROUTE: &str = "Truck Route";
pub const COL_STATUS_PREPARATION: &str = "Status Preparation";
pub const COL_STATUS_LOADING: &str = "Status Loading";
pub const COL_SHIP_NO: &str = "Ship no.";
pub const COL_PREPARATION_START: &str = "Preparation Start";
pub const COL_PREPARATION_END: &str = "Preparation End";
pub const COL_LOADING_START: &str = "Loading Start";
pub const COL_LOADING_END: &str = "Loading End";

/// 必須列（欠落時のメッセージもこの順で並べる）
pub const REQUIRED_COLUMNS: [&str; 11] = [
    COL_COMPLETION_TIME,
    COL_TERMINAL,
    COL_DOCK_CODE,
    COL_TRUCK_ROUTE,
    COL_STATUS_PREPARATION,
    COL_STATUS_LOADING,
    COL_SHIP_NO,
    COL_PREPARATION_START,
    COL_PREPARATION_END,
    COL_LOADING_START,
    COL_LOADING_END,
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// 見出し行＋データ行
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// 必須列の位置
struct ColumnIndex {
    completion_time: usize,
    terminal: usize,
    dock_code: usize,
    truck_route: usize,
    status_preparation: usize,
    status_loading: usize,
    ship_no: usize,
    preparation_start: usize,
    preparation_end: usize,
    loading_start: usize,
    loading_end: usize,
}

impl RawTable {
    /// 列ラベルの前後空白を除去
    pub fn clean_headers(mut self) -> Self {
        for header in &mut self.headers {
            *header = header.trim().to_string();
        }
        self
    }

    /// 必須列のうち見つからないもの
    pub fn missing_columns(&self) -> Vec<String> {
        REQUIRED_COLUMNS
            .iter()
            .filter(|name| !self.headers.iter().any(|h| h == *name))
            .map(|name| name.to_string())
            .collect()
    }

    fn column_index(&self) -> Result<ColumnIndex, ValidationError> {
        let missing = self.missing_columns();
        if !missing.is_empty() {
            return Err(ValidationError {
                missing,
                found: self.headers.clone(),
            });
        }

        let find = |name: &str| self.headers.iter().position(|h| h == name).unwrap_or(0);
        Ok(ColumnIndex {
            completion_time: find(COL_COMPLETION_TIME),
            terminal: find(COL_TERMINAL),
            dock_code: find(COL_DOCK_CODE),
            truck_route: find(COL_TRUCK_ROUTE),
            status_preparation: find(COL_STATUS_PREPARATION),
            status_loading: find(COL_STATUS_LOADING),
            ship_no: find(COL_SHIP_NO),
            preparation_start: find(COL_PREPARATION_START),
            preparation_end: find(COL_PREPARATION_END),
            loading_start: find(COL_LOADING_START),
            loading_end: find(COL_LOADING_END),
        })
    }

    /// 型付きの行に変換する
    ///
    /// 全セルが欠損の行は読み飛ばす。完了時刻は日時に変換できなければ欠損扱い。
    pub fn into_rows(self) -> Result<Vec<ShipmentRow>, ValidationError> {
        let index = self.column_index()?;

        let rows = self
            .rows
            .iter()
            .filter(|cells| !cells.iter().all(Cell::is_missing))
            .map(|cells| {
                let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
                ShipmentRow {
                    terminal: CellKey::from_cell(&cell(index.terminal)),
                    ship_no: CellKey::from_cell(&cell(index.ship_no)),
                    dock_code: cell(index.dock_code),
                    truck_route: cell(index.truck_route),
                    preparation_start: cell(index.preparation_start),
                    preparation_end: cell(index.preparation_end),
                    loading_start: cell(index.loading_start),
                    loading_end: cell(index.loading_end),
                    status_preparation: cell(index.status_preparation).as_text(),
                    status_loading: cell(index.status_loading).as_text(),
                    completion_time: parse_datetime(&cell(index.completion_time)),
                }
            })
            .collect();

        Ok(rows)
    }
}

/// 日時への変換（変換できない値は None）
pub fn parse_datetime(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::DateTime(value) => Some(*value),
        Cell::Number(serial) => excel_serial_to_datetime(*serial),
        Cell::Text(text) => parse_datetime_text(text.trim()),
        _ => None,
    }
}

fn parse_datetime_text(text: &str) -> Option<NaiveDateTime> {
    if text.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(text, format) {
            return Some(value);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}
