//! 最新スナップショット
//!
//! 取得成功時は丸ごと置き換え、失敗時はエラーだけを記録して行データは残す。

use crate::types::ShipmentRow;
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentSnapshot {
    rows: Vec<ShipmentRow>,
    loaded_at: Option<NaiveDateTime>,
    last_error: Option<String>,
}

impl ShipmentSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取得成功: 行・取得時刻を差し替え、エラーを消す
    pub fn replace(&mut self, rows: Vec<ShipmentRow>, loaded_at: NaiveDateTime) {
        self.rows = rows;
        self.loaded_at = Some(loaded_at);
        self.last_error = None;
    }

    /// 取得失敗: 前回の行データは保持する
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn rows(&self) -> &[ShipmentRow] {
        &self.rows
    }

    pub fn loaded_at(&self) -> Option<NaiveDateTime> {
        self.loaded_at
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// 一度でも取得に成功したか
    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }
}
