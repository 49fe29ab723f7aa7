//! ボードの状態と tick
//!
//! 状態はすべて ApplicationState に集約し、外部のタイマーが一定周期で
//! `tick(now, source)` を呼ぶ。tick 自体は待機しない。
//! 取得や読み込みの失敗は tick の外に出さず、スナップショットのエラーとして記録する。

mod frame;

pub use frame::{Frame, FrameBody};

use crate::source::SnapshotSource;
use chrono::NaiveDateTime;
use shipboard_common::{
    build_sequence, FilterCriteria, FilterError, FilterOptions, ResolvedFilter, ScheduleSettings,
    ScheduleState, ShipmentSnapshot, Slide,
};
use tracing::{debug, info, warn};

pub struct ApplicationState {
    snapshot: ShipmentSnapshot,
    schedule: ScheduleState,
    settings: ScheduleSettings,
    filter: FilterCriteria,
    /// 最後に確定できたフィルタ（確定に失敗したときはこれを使い続ける）
    applied_filter: Option<ResolvedFilter>,
    /// set_filter で却下した条件のエラー
    rejected_filter: Option<FilterError>,
    refresh_requested: bool,
}

impl ApplicationState {
    pub fn new(now: NaiveDateTime, settings: ScheduleSettings) -> Self {
        Self {
            snapshot: ShipmentSnapshot::new(),
            schedule: ScheduleState::start(now, &settings),
            settings,
            filter: FilterCriteria::default(),
            applied_filter: None,
            rejected_filter: None,
            refresh_requested: false,
        }
    }

    pub fn snapshot(&self) -> &ShipmentSnapshot {
        &self.snapshot
    }

    pub fn schedule(&self) -> &ScheduleState {
        &self.schedule
    }

    pub fn settings(&self) -> &ScheduleSettings {
        &self.settings
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    /// 設定変更（期限は次の発火時に新しい間隔で再計算される）
    pub fn set_settings(&mut self, settings: ScheduleSettings) {
        self.settings = settings;
    }

    /// 無効にしても位置は保持する
    pub fn set_carousel_enabled(&mut self, enabled: bool) {
        self.settings = self.settings.with_carousel_enabled(enabled);
    }

    /// フィルタ条件の変更
    ///
    /// 開始日 > 終了日 のときはエラーを報告し、直前の条件をそのまま使う。
    pub fn set_filter(&mut self, criteria: FilterCriteria) -> Result<(), FilterError> {
        if let Err(err) = criteria.validate() {
            warn!(error = %err, "filter rejected, keeping previous filter");
            self.rejected_filter = Some(err.clone());
            return Err(err);
        }
        self.rejected_filter = None;
        self.filter = criteria;
        Ok(())
    }

    /// 次の tick で期限に関係なく取得する（期限は動かさない）
    pub fn request_refresh(&mut self) {
        self.refresh_requested = true;
    }

    /// 1回分のスケジューリング判断
    pub async fn tick<S>(&mut self, now: NaiveDateTime, source: &mut S) -> Frame
    where
        S: SnapshotSource + ?Sized,
    {
        let scheduled = self.schedule.refresh_due(now);
        if scheduled || self.refresh_requested {
            self.refresh(now, source).await;
            self.refresh_requested = false;
            if scheduled {
                self.schedule.mark_refreshed(now, &self.settings);
                debug!(next_refresh_at = %self.schedule.next_refresh_at, "refresh scheduled");
            }
        }
        self.compose(now)
    }

    async fn refresh<S>(&mut self, now: NaiveDateTime, source: &mut S)
    where
        S: SnapshotSource + ?Sized,
    {
        info!(source = %source.describe(), "refreshing shipment data");
        match source.load_rows().await {
            Ok(rows) => {
                info!(rows = rows.len(), "shipment data loaded");
                self.snapshot.replace(rows, now);
            }
            Err(err) => {
                warn!(error = %err, "refresh failed, keeping previous data");
                self.snapshot.record_error(format!("An error occurred: {}", err));
            }
        }
    }

    fn compose(&mut self, now: NaiveDateTime) -> Frame {
        let rows = self.snapshot.rows();
        let options = FilterOptions::from_rows(rows, now.date());
        let mut frame = Frame {
            generated_at: now,
            loaded_at: self.snapshot.loaded_at(),
            last_error: self.snapshot.last_error().map(str::to_string),
            filter_error: self.rejected_filter.as_ref().map(ToString::to_string),
            options,
            body: FrameBody::NotLoaded,
        };

        if !self.snapshot.is_loaded() {
            return frame;
        }

        match self.filter.resolve(&frame.options) {
            Ok(resolved) => self.applied_filter = Some(resolved),
            Err(err) => {
                if frame.filter_error.is_none() {
                    frame.filter_error = Some(err.to_string());
                }
            }
        }

        let filtered = match &self.applied_filter {
            Some(filter) => filter.apply(rows),
            None => rows.to_vec(),
        };

        if filtered.is_empty() {
            self.schedule.step_carousel(now, 0, &self.settings);
            frame.body = FrameBody::NoData;
            return frame;
        }

        let rows_per_page = self.settings.rows_per_page();
        let sequence = build_sequence(&filtered, rows_per_page);
        let slide = match self.schedule.step_carousel(now, sequence.len(), &self.settings) {
            Some(index) => {
                debug!(index, len = sequence.len(), item = ?sequence[index], "carousel item");
                Slide::for_item(&filtered, &sequence[index], rows_per_page, (index, sequence.len()))
            }
            None => Slide::full(&filtered),
        };
        frame.body = FrameBody::Board(slide);
        frame
    }
}
