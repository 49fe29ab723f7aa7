//! 更新・カルーセルのタイミング管理
//!
//! 期限はすべて壁時計の絶対時刻。次の期限は「発火した時点の now + 間隔」で
//! 再計算する（元の期限基準ではないため、tick が遅れると周期は延びる）。

use crate::error::SettingsError;
use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const REFRESH_INTERVAL_RANGE: RangeInclusive<u64> = 10..=3600;
pub const CAROUSEL_INTERVAL_RANGE: RangeInclusive<u64> = 5..=60;
pub const ROWS_PER_PAGE_RANGE: RangeInclusive<u64> = 1..=50;

pub const DEFAULT_REFRESH_INTERVAL: u64 = 60;
pub const DEFAULT_CAROUSEL_INTERVAL: u64 = 10;
pub const DEFAULT_ROWS_PER_PAGE: u64 = 7;

fn check_range(
    name: &'static str,
    value: u64,
    range: &RangeInclusive<u64>,
) -> Result<u64, SettingsError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(SettingsError::OutOfRange {
            name,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// 表示・更新の設定（範囲は生成時に検証済み）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSettings {
    refresh_interval_seconds: u64,
    carousel_enabled: bool,
    carousel_interval_seconds: u64,
    rows_per_page: u64,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            refresh_interval_seconds: DEFAULT_REFRESH_INTERVAL,
            carousel_enabled: false,
            carousel_interval_seconds: DEFAULT_CAROUSEL_INTERVAL,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

impl ScheduleSettings {
    pub fn new(
        refresh_interval_seconds: u64,
        carousel_enabled: bool,
        carousel_interval_seconds: u64,
        rows_per_page: u64,
    ) -> Result<Self, SettingsError> {
        Ok(Self {
            refresh_interval_seconds: check_range(
                "refresh_interval_seconds",
                refresh_interval_seconds,
                &REFRESH_INTERVAL_RANGE,
            )?,
            carousel_enabled,
            carousel_interval_seconds: check_range(
                "carousel_interval_seconds",
                carousel_interval_seconds,
                &CAROUSEL_INTERVAL_RANGE,
            )?,
            rows_per_page: check_range("rows_per_page", rows_per_page, &ROWS_PER_PAGE_RANGE)?,
        })
    }

    pub fn with_carousel_enabled(mut self, enabled: bool) -> Self {
        self.carousel_enabled = enabled;
        self
    }

    pub fn refresh_interval_seconds(&self) -> u64 {
        self.refresh_interval_seconds
    }

    pub fn carousel_enabled(&self) -> bool {
        self.carousel_enabled
    }

    pub fn carousel_interval_seconds(&self) -> u64 {
        self.carousel_interval_seconds
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page as usize
    }

    pub fn refresh_interval(&self) -> TimeDelta {
        TimeDelta::seconds(self.refresh_interval_seconds as i64)
    }

    pub fn carousel_interval(&self) -> TimeDelta {
        TimeDelta::seconds(self.carousel_interval_seconds as i64)
    }
}

/// タイマー状態（プロセス起動時に now で初期化、永続化しない）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleState {
    pub next_refresh_at: NaiveDateTime,
    pub next_carousel_at: NaiveDateTime,
    pub carousel_index: usize,
}

impl ScheduleState {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            next_refresh_at: now,
            next_carousel_at: now,
            carousel_index: 0,
        }
    }

    /// 起動直後：取得は即時、カルーセルは先頭を1間隔表示してから進める
    pub fn start(now: NaiveDateTime, settings: &ScheduleSettings) -> Self {
        Self {
            next_carousel_at: now + settings.carousel_interval(),
            ..Self::new(now)
        }
    }

    pub fn refresh_due(&self, now: NaiveDateTime) -> bool {
        now >= self.next_refresh_at
    }

    /// 取得の成否に関係なく now + 間隔
    pub fn mark_refreshed(&mut self, now: NaiveDateTime, settings: &ScheduleSettings) {
        self.next_refresh_at = now + settings.refresh_interval();
    }

    /// 並びの長さに合わせて位置を進める
    ///
    /// - 長さ0なら位置を0に戻して期限を張り直し、選択なし
    /// - 位置が範囲外（並びが縮んだ）なら期限を待たずに0へ
    /// - 有効かつ期限到来なら1つ進めて次の期限を now + 間隔に
    ///
    /// 無効時は位置を保持したまま選択なしを返す。期限は now + 間隔に張り直すので、
    /// 再度有効にした直後は同じ位置が表示される。
    pub fn step_carousel(
        &mut self,
        now: NaiveDateTime,
        len: usize,
        settings: &ScheduleSettings,
    ) -> Option<usize> {
        if len == 0 {
            self.carousel_index = 0;
            self.next_carousel_at = now + settings.carousel_interval();
            return None;
        }
        if self.carousel_index >= len {
            self.carousel_index = 0;
        }
        if !settings.carousel_enabled() {
            self.next_carousel_at = now + settings.carousel_interval();
            return None;
        }
        if now >= self.next_carousel_at {
            self.carousel_index = (self.carousel_index + 1) % len;
            self.next_carousel_at = now + settings.carousel_interval();
        }
        Some(self.carousel_index)
    }
}
