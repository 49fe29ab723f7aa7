use chrono::NaiveDate;
use shipboard::config::Config;
use shipboard_common::schedule::{
    CAROUSEL_INTERVAL_RANGE, REFRESH_INTERVAL_RANGE, ROWS_PER_PAGE_RANGE,
};
use shipboard_common::{CellKey, FilterCriteria, ScheduleSettings, SettingsError};

/// サイドパネルの入力値
#[derive(Debug, Clone, PartialEq)]
pub struct BoardControls {
    pub refresh_interval: u64,
    pub carousel_enabled: bool,
    pub carousel_interval: u64,
    pub rows_per_page: u64,
    /// YYYY-MM-DD（空欄ならデータの範囲）
    pub start: String,
    pub end: String,
    pub terminal: Option<CellKey>,
    pub ship_no: Option<CellKey>,
}

impl BoardControls {
    pub fn from_config(config: &Config) -> Self {
        Self {
            refresh_interval: clamp(config.refresh_interval_seconds, REFRESH_INTERVAL_RANGE),
            carousel_enabled: false,
            carousel_interval: clamp(config.carousel_interval_seconds, CAROUSEL_INTERVAL_RANGE),
            rows_per_page: clamp(config.rows_per_page, ROWS_PER_PAGE_RANGE),
            start: String::new(),
            end: String::new(),
            terminal: None,
            ship_no: None,
        }
    }

    pub fn settings(&self) -> Result<ScheduleSettings, SettingsError> {
        ScheduleSettings::new(
            self.refresh_interval,
            self.carousel_enabled,
            self.carousel_interval,
            self.rows_per_page,
        )
    }

    /// 日付欄が読めなければ Err（入力途中の値は反映しない）
    pub fn criteria(&self) -> Result<FilterCriteria, String> {
        Ok(FilterCriteria {
            start: parse_date(&self.start)?,
            end: parse_date(&self.end)?,
            terminal: self.terminal.clone(),
            ship_no: self.ship_no.clone(),
        })
    }
}

fn clamp(value: u64, range: std::ops::RangeInclusive<u64>) -> u64 {
    value.clamp(*range.start(), *range.end())
}

fn parse_date(text: &str) -> Result<Option<NaiveDate>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| format!("Invalid date: {text} (expected YYYY-MM-DD)"))
}
