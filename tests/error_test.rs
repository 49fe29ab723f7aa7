//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use chrono::NaiveDate;
use shipboard::error::ShipboardError;
use shipboard::loader::{parse_workbook, SheetSelector};
use shipboard_common::{FilterError, SettingsError, ValidationError};

/// Excelでないバイト列
#[test]
fn test_parse_non_workbook() {
    let result = parse_workbook(b"<html>login page</html>".to_vec(), &SheetSelector::default());
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, ShipboardError::Parse(_)));
    assert!(err.to_string().starts_with("Failed to read workbook"));
}

/// 空のバイト列
#[test]
fn test_parse_empty_bytes() {
    let result = parse_workbook(Vec::new(), &SheetSelector::default());
    assert!(matches!(result, Err(ShipboardError::Parse(_))));
}

/// ShipboardErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let date = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
    let errors = vec![
        ShipboardError::Config("テスト設定エラー".to_string()),
        ShipboardError::MissingSettings(vec!["CLIENT_ID".to_string(), "TENANT_ID".to_string()]),
        ShipboardError::Auth("invalid_client".to_string()),
        ShipboardError::Download("Failed to download file. Status: 404, Response: itemNotFound".to_string()),
        ShipboardError::Parse("zip error".to_string()),
        ShipboardError::Validation(ValidationError {
            missing: vec!["Ter.".to_string()],
            found: vec!["Ship no.".to_string()],
        }),
        ShipboardError::Filter(FilterError::InvertedRange { start: date(20), end: date(10) }),
        ShipboardError::Settings(SettingsError::OutOfRange {
            name: "rows_per_page",
            value: 0,
            min: 1,
            max: 50,
        }),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

#[test]
fn test_missing_settings_lists_every_name() {
    let err = ShipboardError::MissingSettings(vec![
        "CLIENT_SECRET".to_string(),
        "TARGET_FILE_PATH".to_string(),
    ]);
    let message = err.to_string();
    assert!(message.contains("CLIENT_SECRET, TARGET_FILE_PATH"));
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: ShipboardError = io_error.into();
    assert!(matches!(err, ShipboardError::Io(_)));
}

#[test]
fn test_validation_error_conversion() {
    let err: ShipboardError = ValidationError {
        missing: vec!["Dock Code".to_string()],
        found: Vec::new(),
    }
    .into();
    assert!(err.to_string().contains("Dock Code"));
}
