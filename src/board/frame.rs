//! 描画に渡す1フレーム分の状態

use chrono::NaiveDateTime;
use serde::Serialize;
use shipboard_common::{FilterOptions, Slide};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub generated_at: NaiveDateTime,
    pub loaded_at: Option<NaiveDateTime>,
    /// 直近の取得・読み込みエラー（古いデータを表示中であることを示す）
    pub last_error: Option<String>,
    pub filter_error: Option<String>,
    pub options: FilterOptions,
    pub body: FrameBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum FrameBody {
    /// まだ一度も読み込めていない
    NotLoaded,
    /// フィルタに一致する行がない
    NoData,
    Board(Slide),
}

impl Frame {
    pub fn slide(&self) -> Option<&Slide> {
        match &self.body {
            FrameBody::Board(slide) => Some(slide),
            _ => None,
        }
    }
}
