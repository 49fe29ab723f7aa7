//! フレームの描画
//!
//! - terminal: 端末ボード（crossterm）
//! - html: 1ファイルのHTML（ブラウザ・サイネージ用）
//!
//! 表の列と指標の並びはここで一度だけ決め、各出力で共有する。

pub mod html;
pub mod terminal;

use shipboard_common::display::{format_key, format_status, format_time, format_value};
use shipboard_common::{ShipmentRow, StatusCounts};

pub use html::{render_html, write_html};
pub use terminal::{draw_frame, print_routes};

pub const TABLE_HEADERS: [&str; 10] = [
    "Ter.",
    "Ship no.",
    "Dock Code",
    "Truck Route",
    "Preparation Start",
    "Preparation End",
    "Loading Start",
    "Loading End",
    "Status Preparation",
    "Status Loading",
];

/// ステータス列の位置（配色対象）
pub const STATUS_PREPARATION_COLUMN: usize = 8;
pub const STATUS_LOADING_COLUMN: usize = 9;

/// 1行分の表示文字列
pub fn table_cells(row: &ShipmentRow) -> [String; 10] {
    [
        format_key(row.terminal.as_ref()),
        format_key(row.ship_no.as_ref()),
        format_value(&row.dock_code),
        format_value(&row.truck_route),
        format_time(&row.preparation_start),
        format_time(&row.preparation_end),
        format_time(&row.loading_start),
        format_time(&row.loading_end),
        format_status(row.status_preparation.as_deref()),
        format_status(row.status_loading.as_deref()),
    ]
}

/// 指標のラベルと値
pub fn metric_cards(counts: &StatusCounts) -> [(&'static str, usize); 7] {
    [
        ("Total Shipments", counts.total),
        ("Prep On Process", counts.prep_on_process),
        ("Prep Delayed", counts.prep_delayed),
        ("Prep Finished", counts.prep_finished),
        ("Load On Process", counts.load_on_process),
        ("Load Delayed", counts.load_delayed),
        ("Load Finished", counts.load_finished),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipboard_common::{Cell, CellKey};

    #[test]
    fn test_table_cells_order() {
        let row = ShipmentRow {
            terminal: Some(CellKey::Number(2.0)),
            ship_no: Some(CellKey::Text("S-10".to_string())),
            dock_code: Cell::Text("D1".to_string()),
            truck_route: Cell::Text("R7".to_string()),
            preparation_start: Cell::Text("08:00".to_string()),
            status_preparation: Some("Finished".to_string()),
            ..Default::default()
        };
        let cells = table_cells(&row);
        assert_eq!(cells[0], "2");
        assert_eq!(cells[1], "S-10");
        assert_eq!(cells[4], "08:00");
        assert_eq!(cells[5], "-");
        assert_eq!(cells[STATUS_PREPARATION_COLUMN], "✅ Finished");
        assert_eq!(cells[STATUS_LOADING_COLUMN], "-");
    }

    #[test]
    fn test_metric_cards() {
        let counts = StatusCounts {
            total: 3,
            prep_delayed: 1,
            load_finished: 2,
            ..Default::default()
        };
        let cards = metric_cards(&counts);
        assert_eq!(cards[0], ("Total Shipments", 3));
        assert_eq!(cards[2], ("Prep Delayed", 1));
        assert_eq!(cards[6], ("Load Finished", 2));
    }
}
