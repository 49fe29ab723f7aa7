//! ボード tick の統合テスト
//!
//! 取得元は差し替え用の FakeSource を使い、時刻は固定値で進める。

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use shipboard::board::{ApplicationState, FrameBody};
use shipboard::error::{Result, ShipboardError};
use shipboard::source::SnapshotSource;
use shipboard_common::{
    CarouselItem, CellKey, FilterCriteria, FilterError, ScheduleSettings, ShipmentRow,
    ValidationError,
};
use std::collections::VecDeque;

struct FakeSource {
    queued: VecDeque<Result<Vec<ShipmentRow>>>,
    fallback: Vec<ShipmentRow>,
    calls: usize,
}

impl FakeSource {
    fn always(rows: Vec<ShipmentRow>) -> Self {
        Self {
            queued: VecDeque::new(),
            fallback: rows,
            calls: 0,
        }
    }

    fn sequence(responses: Vec<Result<Vec<ShipmentRow>>>) -> Self {
        Self {
            queued: responses.into(),
            fallback: Vec::new(),
            calls: 0,
        }
    }
}

#[async_trait]
impl SnapshotSource for FakeSource {
    async fn load_rows(&mut self) -> Result<Vec<ShipmentRow>> {
        self.calls += 1;
        self.queued
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }

    fn describe(&self) -> String {
        "fake".to_string()
    }
}

fn at(sec: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 15)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
        + TimeDelta::seconds(sec)
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

fn row(terminal: f64, ship_no: &str, completion_day: u32) -> ShipmentRow {
    ShipmentRow {
        terminal: Some(CellKey::Number(terminal)),
        ship_no: Some(CellKey::Text(ship_no.to_string())),
        completion_time: Some(day(completion_day).and_hms_opt(10, 0, 0).unwrap()),
        status_preparation: Some("Finished".to_string()),
        status_loading: Some("On Process".to_string()),
        ..Default::default()
    }
}

/// 端末1に10行（S-1 が5行、S-2 が5行）
fn terminal_one_rows() -> Vec<ShipmentRow> {
    (0..10)
        .map(|i| row(1.0, if i < 5 { "S-1" } else { "S-2" }, 10 + (i % 3) as u32))
        .collect()
}

fn mixed_rows() -> Vec<ShipmentRow> {
    vec![
        row(1.0, "S-1", 10),
        row(1.0, "S-1", 11),
        row(2.0, "S-2", 12),
        row(3.0, "S-3", 15),
    ]
}

fn settings(carousel: bool) -> ScheduleSettings {
    ScheduleSettings::new(60, carousel, 10, 7).unwrap()
}

fn selected_item(frame: &shipboard::Frame) -> Option<CarouselItem> {
    frame.slide().and_then(|slide| slide.item.clone())
}

#[tokio::test]
async fn test_first_tick_loads_and_schedules_refresh() {
    let mut source = FakeSource::always(mixed_rows());
    let mut state = ApplicationState::new(at(0), settings(false));

    let frame = state.tick(at(0), &mut source).await;

    assert_eq!(source.calls, 1);
    assert_eq!(frame.loaded_at, Some(at(0)));
    assert_eq!(frame.last_error, None);
    assert_eq!(state.schedule().next_refresh_at, at(60));

    let slide = frame.slide().expect("board expected");
    assert_eq!(slide.title, "Shipment Details");
    assert_eq!(slide.rows.len(), 4);
    assert_eq!(slide.metrics.total, 4);
    assert_eq!(slide.metrics.prep_finished, 4);
    assert_eq!(slide.metrics.load_on_process, 4);
    assert_eq!(frame.options.min_date, day(10));
    assert_eq!(frame.options.max_date, day(15));
}

#[tokio::test]
async fn test_refresh_waits_for_deadline() {
    let mut source = FakeSource::always(mixed_rows());
    let mut state = ApplicationState::new(at(0), settings(false));

    state.tick(at(0), &mut source).await;
    state.tick(at(30), &mut source).await;
    state.tick(at(59), &mut source).await;
    assert_eq!(source.calls, 1);

    // 遅れて発火した場合も期限は発火時刻 + 間隔
    state.tick(at(63), &mut source).await;
    assert_eq!(source.calls, 2);
    assert_eq!(state.schedule().next_refresh_at, at(123));
}

/// 取得失敗: 行は前回のまま、エラーを記録、期限は進む
#[tokio::test]
async fn test_failed_refresh_keeps_previous_rows() {
    let mut source = FakeSource::sequence(vec![
        Ok(mixed_rows()),
        Err(ShipboardError::Download(
            "Failed to download file. Status: 503, Response: busy".to_string(),
        )),
    ]);
    let mut state = ApplicationState::new(at(0), settings(false));

    state.tick(at(0), &mut source).await;
    let frame = state.tick(at(60), &mut source).await;

    assert_eq!(state.snapshot().rows(), mixed_rows().as_slice());
    assert_eq!(frame.loaded_at, Some(at(0)));
    let error = frame.last_error.as_deref().expect("error recorded");
    assert!(error.contains("Status: 503"));
    assert_eq!(state.schedule().next_refresh_at, at(120));
    assert_eq!(frame.slide().map(|s| s.rows.len()), Some(4));
}

#[tokio::test]
async fn test_failure_before_first_load() {
    let mut source = FakeSource::sequence(vec![Err(ShipboardError::Auth("invalid_client".to_string()))]);
    let mut state = ApplicationState::new(at(0), settings(false));

    let frame = state.tick(at(0), &mut source).await;

    assert_eq!(frame.body, FrameBody::NotLoaded);
    assert!(frame.last_error.as_deref().unwrap().contains("invalid_client"));
    assert_eq!(state.schedule().next_refresh_at, at(60));
}

#[tokio::test]
async fn test_success_after_failure_clears_error() {
    let mut source = FakeSource::sequence(vec![
        Err(ShipboardError::Auth("invalid_client".to_string())),
        Ok(mixed_rows()),
    ]);
    let mut state = ApplicationState::new(at(0), settings(false));

    state.tick(at(0), &mut source).await;
    let frame = state.tick(at(60), &mut source).await;

    assert_eq!(frame.last_error, None);
    assert_eq!(frame.loaded_at, Some(at(60)));
}

#[tokio::test]
async fn test_missing_columns_are_reported() {
    let mut source = FakeSource::sequence(vec![Err(ShipboardError::Validation(ValidationError {
        missing: vec!["Ter.".to_string()],
        found: vec!["Ship no.".to_string()],
    }))]);
    let mut state = ApplicationState::new(at(0), settings(false));

    let frame = state.tick(at(0), &mut source).await;

    let error = frame.last_error.expect("validation error recorded");
    assert!(error.contains("missing"));
    assert!(error.contains("Ter."));
}

#[tokio::test]
async fn test_manual_refresh_does_not_move_deadline() {
    let mut source = FakeSource::always(mixed_rows());
    let mut state = ApplicationState::new(at(0), settings(false));

    state.tick(at(0), &mut source).await;
    state.request_refresh();
    let frame = state.tick(at(5), &mut source).await;

    assert_eq!(source.calls, 2);
    assert_eq!(frame.loaded_at, Some(at(5)));
    assert_eq!(state.schedule().next_refresh_at, at(60));

    // 要求は1回分だけ
    state.tick(at(6), &mut source).await;
    assert_eq!(source.calls, 2);
}

/// 端末ページ → 出荷番号の順に巡回する
#[tokio::test]
async fn test_carousel_walks_terminal_pages_then_shipments() {
    let mut source = FakeSource::always(terminal_one_rows());
    let mut state = ApplicationState::new(at(0), settings(true));

    let frame = state.tick(at(0), &mut source).await;
    let slide = frame.slide().unwrap();
    assert_eq!(
        slide.item,
        Some(CarouselItem::Terminal { terminal: CellKey::Number(1.0), page: 0 })
    );
    assert_eq!(slide.title, "Shipment Details for: Ter. 1 (Page 1/2)");
    assert_eq!(slide.rows.len(), 7);
    assert_eq!(slide.metrics.total, 10);
    assert_eq!(slide.position, Some((0, 4)));

    let frame = state.tick(at(10), &mut source).await;
    let slide = frame.slide().unwrap();
    assert_eq!(slide.title, "Shipment Details for: Ter. 1 (Page 2/2)");
    assert_eq!(slide.rows.len(), 3);
    assert_eq!(slide.rows, terminal_one_rows()[7..].to_vec());

    let frame = state.tick(at(20), &mut source).await;
    let slide = frame.slide().unwrap();
    assert_eq!(slide.title, "Shipment Details for: Ship no. S-1");
    assert_eq!(slide.rows.len(), 5);
    assert_eq!(slide.metrics_title, "Key Metrics for: Ship no. S-1");

    let frame = state.tick(at(30), &mut source).await;
    assert_eq!(
        selected_item(&frame),
        Some(CarouselItem::Shipment { ship_no: CellKey::Text("S-2".to_string()) })
    );

    let frame = state.tick(at(40), &mut source).await;
    assert_eq!(frame.slide().unwrap().position, Some((0, 4)));
}

#[tokio::test]
async fn test_same_now_does_not_double_advance() {
    let mut source = FakeSource::always(terminal_one_rows());
    let mut state = ApplicationState::new(at(0), settings(true));

    state.tick(at(0), &mut source).await;
    let first = state.tick(at(10), &mut source).await;
    let second = state.tick(at(10), &mut source).await;

    assert_eq!(selected_item(&first), selected_item(&second));
    assert_eq!(state.schedule().carousel_index, 1);
}

/// フィルタで0件 → データなし、位置は0に戻る
#[tokio::test]
async fn test_filter_to_zero_rows_resets_carousel() {
    let mut source = FakeSource::always(terminal_one_rows());
    let mut state = ApplicationState::new(at(0), settings(true));
    state.tick(at(0), &mut source).await;
    state.tick(at(10), &mut source).await;
    state.tick(at(20), &mut source).await;
    assert_eq!(state.schedule().carousel_index, 2);

    state
        .set_filter(FilterCriteria {
            terminal: Some(CellKey::Number(99.0)),
            ..Default::default()
        })
        .unwrap();
    let frame = state.tick(at(21), &mut source).await;

    assert_eq!(frame.body, FrameBody::NoData);
    assert_eq!(state.schedule().carousel_index, 0);
}

#[tokio::test]
async fn test_shrinking_sequence_resets_index() {
    let mut source = FakeSource::always(mixed_rows());
    let mut state = ApplicationState::new(at(0), settings(true));
    // 並び: Ter.1, Ter.2, Ter.3, S-1, S-2, S-3
    for sec in [0, 10, 20, 30, 40] {
        state.tick(at(sec), &mut source).await;
    }
    assert_eq!(state.schedule().carousel_index, 4);

    state
        .set_filter(FilterCriteria {
            terminal: Some(CellKey::Number(1.0)),
            ..Default::default()
        })
        .unwrap();
    // 並び: Ter.1, S-1 → 期限前でも即座に先頭へ
    let frame = state.tick(at(41), &mut source).await;

    assert_eq!(state.schedule().carousel_index, 0);
    assert_eq!(frame.slide().unwrap().position, Some((0, 2)));
}

/// 開始日 > 終了日 は却下し、直前のフィルタで表示を続ける
#[tokio::test]
async fn test_inverted_range_keeps_previous_filter() {
    let mut source = FakeSource::always(mixed_rows());
    let mut state = ApplicationState::new(at(0), settings(false));
    let previous = FilterCriteria {
        terminal: Some(CellKey::Number(1.0)),
        ..Default::default()
    };
    state.set_filter(previous.clone()).unwrap();
    state.tick(at(0), &mut source).await;

    let err = state
        .set_filter(FilterCriteria {
            start: Some(day(20)),
            end: Some(day(10)),
            ..Default::default()
        })
        .unwrap_err();
    assert_eq!(err, FilterError::InvertedRange { start: day(20), end: day(10) });
    assert_eq!(state.filter(), &previous);

    let frame = state.tick(at(1), &mut source).await;
    assert!(frame.filter_error.as_deref().unwrap().contains("End date must be after start date"));
    assert_eq!(frame.slide().unwrap().rows.len(), 2);

    // 正しい条件を入れ直せばエラーは消える
    state.set_filter(FilterCriteria::default()).unwrap();
    let frame = state.tick(at(2), &mut source).await;
    assert_eq!(frame.filter_error, None);
    assert_eq!(frame.slide().unwrap().rows.len(), 4);
}

/// 片側だけ指定した日付がデータ範囲と逆転した場合
#[tokio::test]
async fn test_range_inverted_against_data_falls_back() {
    let mut source = FakeSource::always(mixed_rows());
    let mut state = ApplicationState::new(at(0), settings(false));
    state
        .set_filter(FilterCriteria {
            start: Some(day(20)),
            ..Default::default()
        })
        .unwrap();

    let frame = state.tick(at(0), &mut source).await;

    assert!(frame.filter_error.is_some());
    // 確定済みのフィルタがまだないので全件
    assert_eq!(frame.slide().unwrap().rows.len(), 4);
}

#[tokio::test]
async fn test_date_range_filter() {
    let mut source = FakeSource::always(mixed_rows());
    let mut state = ApplicationState::new(at(0), settings(false));
    state
        .set_filter(FilterCriteria {
            start: Some(day(11)),
            end: Some(day(12)),
            ..Default::default()
        })
        .unwrap();

    let frame = state.tick(at(0), &mut source).await;

    let slide = frame.slide().unwrap();
    assert_eq!(slide.rows.len(), 2);
    assert_eq!(slide.metrics_title, "Key Metrics for Filtered Data");
}

/// 無効化 → 再有効化で位置が保たれる
#[tokio::test]
async fn test_disable_and_enable_carousel_keeps_position() {
    let mut source = FakeSource::always(terminal_one_rows());
    let mut state = ApplicationState::new(at(0), settings(true));
    state.tick(at(0), &mut source).await;
    let before = state.tick(at(10), &mut source).await;
    assert_eq!(state.schedule().carousel_index, 1);

    state.set_carousel_enabled(false);
    let frame = state.tick(at(25), &mut source).await;
    assert_eq!(selected_item(&frame), None);
    assert_eq!(frame.slide().unwrap().title, "Shipment Details");
    assert_eq!(state.schedule().carousel_index, 1);

    state.set_carousel_enabled(true);
    let after = state.tick(at(26), &mut source).await;
    assert_eq!(selected_item(&after), selected_item(&before));
}

#[tokio::test]
async fn test_index_stays_in_range_across_ticks() {
    let mut source = FakeSource::always(mixed_rows());
    let mut state = ApplicationState::new(at(0), settings(true));

    for sec in (0..200).step_by(3) {
        let frame = state.tick(at(sec), &mut source).await;
        let (index, len) = frame.slide().unwrap().position.unwrap();
        assert!(index < len);
        assert_eq!(state.schedule().carousel_index, index);
        assert_eq!(len, 6);
    }
}

/// 再取得とカルーセルが同じ tick で両方発火する
#[tokio::test]
async fn test_refresh_and_carousel_fire_in_same_tick() {
    let mut source = FakeSource::always(mixed_rows());
    let mut state = ApplicationState::new(at(0), ScheduleSettings::new(10, true, 10, 7).unwrap());

    state.tick(at(0), &mut source).await;
    state.tick(at(10), &mut source).await;

    assert_eq!(source.calls, 2);
    assert_eq!(state.schedule().carousel_index, 1);
    assert_eq!(state.schedule().next_refresh_at, at(20));
    assert_eq!(state.schedule().next_carousel_at, at(20));
}

/// 0件から戻ったら先頭の項目から表示する
#[tokio::test]
async fn test_carousel_restarts_at_first_item_after_empty_filter() {
    let mut source = FakeSource::always(mixed_rows());
    let mut state = ApplicationState::new(at(0), settings(true));
    state.tick(at(0), &mut source).await;
    state.tick(at(10), &mut source).await;

    state
        .set_filter(FilterCriteria {
            terminal: Some(CellKey::Number(99.0)),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(state.tick(at(30), &mut source).await.body, FrameBody::NoData);

    state.set_filter(FilterCriteria::default()).unwrap();
    let frame = state.tick(at(35), &mut source).await;
    assert_eq!(
        selected_item(&frame),
        Some(CarouselItem::Terminal { terminal: CellKey::Number(1.0), page: 0 })
    );
}
