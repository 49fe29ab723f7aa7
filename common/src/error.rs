//! エラー型定義

use chrono::NaiveDate;
use thiserror::Error;

/// 必須列の欠落（読み込み時に一度だけ検証する）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("The following required columns are missing from the sheet: {}. Columns found: {}", .missing.join(", "), .found.join(", "))]
pub struct ValidationError {
    pub missing: Vec<String>,
    pub found: Vec<String>,
}

/// フィルタ条件のエラー（補正はしない）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("End date must be after start date ({start} > {end})")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

/// 表示設定の範囲外
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{name} must be between {min} and {max} (got {value})")]
    OutOfRange {
        name: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
}
