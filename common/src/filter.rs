//! フィルタ条件
//!
//! 完了日の範囲（両端含む）と、端末番号・出荷番号の単一値一致。
//! 日付を指定しない場合はデータ中の最小・最大の完了日を使う。

use crate::error::FilterError;
use crate::types::{CellKey, ShipmentRow};
use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// データに完了日がない場合の既定範囲（今日から遡る日数）
const DEFAULT_LOOKBACK_DAYS: u64 = 30;

/// 検証済みの日付範囲（start <= end）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, FilterError> {
        if start > end {
            return Err(FilterError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        let date = at.date();
        self.start <= date && date <= self.end
    }
}

/// 利用者が指定するフィルタ条件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub terminal: Option<CellKey>,
    pub ship_no: Option<CellKey>,
}

impl FilterCriteria {
    /// 明示された開始日・終了日だけで検証する
    pub fn validate(&self) -> Result<(), FilterError> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            DateRange::new(start, end)?;
        }
        Ok(())
    }

    /// 未指定の日付をデータの範囲で補って確定する
    pub fn resolve(&self, options: &FilterOptions) -> Result<ResolvedFilter, FilterError> {
        let start = self.start.unwrap_or(options.min_date);
        let end = self.end.unwrap_or(options.max_date);
        Ok(ResolvedFilter {
            range: DateRange::new(start, end)?,
            terminal: self.terminal.clone(),
            ship_no: self.ship_no.clone(),
        })
    }
}

/// 確定したフィルタ
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFilter {
    pub range: DateRange,
    pub terminal: Option<CellKey>,
    pub ship_no: Option<CellKey>,
}

impl ResolvedFilter {
    /// 完了時刻のない行は日付範囲に含まれない
    pub fn matches(&self, row: &ShipmentRow) -> bool {
        let in_range = row.completion_time.is_some_and(|t| self.range.contains(t));
        in_range
            && key_matches(self.terminal.as_ref(), row.terminal.as_ref())
            && key_matches(self.ship_no.as_ref(), row.ship_no.as_ref())
    }

    pub fn apply(&self, rows: &[ShipmentRow]) -> Vec<ShipmentRow> {
        rows.iter().filter(|row| self.matches(row)).cloned().collect()
    }
}

fn key_matches(wanted: Option<&CellKey>, actual: Option<&CellKey>) -> bool {
    match (wanted, actual) {
        (None, _) => true,
        (Some(wanted), Some(actual)) => wanted.matches(actual),
        (Some(_), None) => false,
    }
}

/// 選択肢と既定の日付範囲
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub terminals: Vec<CellKey>,
    pub ship_nos: Vec<CellKey>,
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
}

impl FilterOptions {
    pub fn from_rows(rows: &[ShipmentRow], today: NaiveDate) -> Self {
        let terminals: BTreeSet<CellKey> = rows.iter().filter_map(|r| r.terminal.clone()).collect();
        let ship_nos: BTreeSet<CellKey> = rows.iter().filter_map(|r| r.ship_no.clone()).collect();
        let dates = rows.iter().filter_map(|r| r.completion_time.map(|t| t.date()));

        let (min_date, max_date) = dates
            .fold(None, |acc: Option<(NaiveDate, NaiveDate)>, d| match acc {
                None => Some((d, d)),
                Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
            })
            .unwrap_or_else(|| {
                let start = today
                    .checked_sub_days(Days::new(DEFAULT_LOOKBACK_DAYS))
                    .unwrap_or(today);
                (start, today)
            });

        Self {
            terminals: terminals.into_iter().collect(),
            ship_nos: ship_nos.into_iter().collect(),
            min_date,
            max_date,
        }
    }
}
