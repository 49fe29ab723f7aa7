//! ステータス集計

use crate::types::ShipmentRow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// ステータス文字列の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusKind {
    OnProcess,
    Delayed,
    Finished,
    Other,
}

impl StatusKind {
    /// 部分一致で分類する（"Delay(F)" も遅延扱い）
    pub fn classify(status: &str) -> Self {
        let status = status.trim();
        if status.contains("Finished") {
            StatusKind::Finished
        } else if status.contains("Delay") {
            StatusKind::Delayed
        } else if status.contains("On Process") {
            StatusKind::OnProcess
        } else {
            StatusKind::Other
        }
    }

    pub fn of(status: Option<&str>) -> Self {
        status.map(Self::classify).unwrap_or(StatusKind::Other)
    }
}

/// 主要指標
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub total: usize,
    pub prep_on_process: usize,
    pub prep_delayed: usize,
    pub prep_finished: usize,
    pub load_on_process: usize,
    pub load_delayed: usize,
    pub load_finished: usize,
}

impl StatusCounts {
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a ShipmentRow>,
    {
        let mut counts = StatusCounts::default();
        for row in rows {
            counts.total += 1;
            match StatusKind::of(row.status_preparation.as_deref()) {
                StatusKind::OnProcess => counts.prep_on_process += 1,
                StatusKind::Delayed => counts.prep_delayed += 1,
                StatusKind::Finished => counts.prep_finished += 1,
                StatusKind::Other => {}
            }
            match StatusKind::of(row.status_loading.as_deref()) {
                StatusKind::OnProcess => counts.load_on_process += 1,
                StatusKind::Delayed => counts.load_delayed += 1,
                StatusKind::Finished => counts.load_finished += 1,
                StatusKind::Other => {}
            }
        }
        counts
    }
}

/// 便ルートごとの出荷件数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteCount {
    pub route: String,
    pub shipments: usize,
}

/// 便ルート別の出荷件数（件数の降順、同数はルート名の昇順）
///
/// ルートまたは出荷番号が欠損の行は数えない。
pub fn shipments_by_route(rows: &[ShipmentRow]) -> Vec<RouteCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for row in rows {
        let Some(route) = row.truck_route.as_text() else {
            continue;
        };
        if row.ship_no.is_none() {
            continue;
        }
        *counts.entry(route).or_default() += 1;
    }

    let mut summary: Vec<RouteCount> = counts
        .into_iter()
        .map(|(route, shipments)| RouteCount { route, shipments })
        .collect();
    // BTreeMap順（ルート昇順）を保ったまま安定ソート
    summary.sort_by(|a, b| b.shipments.cmp(&a.shipments));
    summary
}
