//! カルーセル（端末ごとのページ → 出荷番号ごと の順に巡回）
//!
//! 並びはフィルタ結果から毎回作り直す。キャッシュしない。

use crate::metrics::StatusCounts;
use crate::types::{CellKey, ShipmentRow};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// カルーセルの1枚
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CarouselItem {
    /// 端末の1ページ（page は0始まり）
    Terminal { terminal: CellKey, page: usize },
    /// 出荷番号の全行
    Shipment { ship_no: CellKey },
}

/// ページ数（端数切り上げ）
pub fn page_count(rows: usize, rows_per_page: usize) -> usize {
    rows.div_ceil(rows_per_page.max(1))
}

/// 並びを組み立てる
///
/// 端末（昇順）× ページ（昇順）のあとに、出荷番号（昇順）を1件ずつ。
pub fn build_sequence(rows: &[ShipmentRow], rows_per_page: usize) -> Vec<CarouselItem> {
    let mut per_terminal: BTreeMap<&CellKey, usize> = BTreeMap::new();
    for terminal in rows.iter().filter_map(|r| r.terminal.as_ref()) {
        *per_terminal.entry(terminal).or_default() += 1;
    }
    let ship_nos: BTreeSet<&CellKey> = rows.iter().filter_map(|r| r.ship_no.as_ref()).collect();

    let mut items = Vec::new();
    for (terminal, count) in per_terminal {
        for page in 0..page_count(count, rows_per_page) {
            items.push(CarouselItem::Terminal {
                terminal: terminal.clone(),
                page,
            });
        }
    }
    items.extend(ship_nos.into_iter().map(|ship_no| CarouselItem::Shipment {
        ship_no: ship_no.clone(),
    }));
    items
}

/// 表示する1画面分
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub item: Option<CarouselItem>,
    /// (現在位置, 総数)
    pub position: Option<(usize, usize)>,
    pub title: String,
    pub rows: Vec<ShipmentRow>,
    pub metrics_title: String,
    pub metrics: StatusCounts,
}

impl Slide {
    /// フィルタ結果全体（カルーセル無効時）
    pub fn full(rows: &[ShipmentRow]) -> Self {
        Self {
            item: None,
            position: None,
            title: "Shipment Details".to_string(),
            rows: rows.to_vec(),
            metrics_title: "Key Metrics for Filtered Data".to_string(),
            metrics: StatusCounts::from_rows(rows),
        }
    }

    /// カルーセルの1枚を切り出す
    ///
    /// 指標はページ単位ではなく端末・出荷番号の全行で数える。
    pub fn for_item(
        rows: &[ShipmentRow],
        item: &CarouselItem,
        rows_per_page: usize,
        position: (usize, usize),
    ) -> Self {
        let rows_per_page = rows_per_page.max(1);
        match item {
            CarouselItem::Terminal { terminal, page } => {
                let subset: Vec<ShipmentRow> = rows
                    .iter()
                    .filter(|r| r.terminal.as_ref() == Some(terminal))
                    .cloned()
                    .collect();
                let total_pages = page_count(subset.len(), rows_per_page);
                let page_rows = subset
                    .iter()
                    .skip(page * rows_per_page)
                    .take(rows_per_page)
                    .cloned()
                    .collect();
                let indicator = if total_pages > 1 {
                    format!(" (Page {}/{})", page + 1, total_pages)
                } else {
                    String::new()
                };
                Self {
                    item: Some(item.clone()),
                    position: Some(position),
                    title: format!("Shipment Details for: Ter. {}{}", terminal, indicator),
                    rows: page_rows,
                    metrics_title: format!("Key Metrics for: Ter. {}", terminal),
                    metrics: StatusCounts::from_rows(&subset),
                }
            }
            CarouselItem::Shipment { ship_no } => {
                let subset: Vec<ShipmentRow> = rows
                    .iter()
                    .filter(|r| r.ship_no.as_ref() == Some(ship_no))
                    .cloned()
                    .collect();
                Self {
                    item: Some(item.clone()),
                    position: Some(position),
                    title: format!("Shipment Details for: Ship no. {}", ship_no),
                    metrics_title: format!("Key Metrics for: Ship no. {}", ship_no),
                    metrics: StatusCounts::from_rows(&subset),
                    rows: subset,
                }
            }
        }
    }
}
