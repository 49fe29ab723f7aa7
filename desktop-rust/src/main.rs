mod app;
mod io;
mod model;

use std::path::PathBuf;

use app::{configure_fonts, DesktopApp};

/// 引数にExcelファイルを渡すとローカルファイルを表示する
fn main() -> eframe::Result<()> {
    shipboard::logging::init(false);
    let file = std::env::args_os().nth(1).map(PathBuf::from);
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Shipment Status Board",
        options,
        Box::new(move |cc| {
            configure_fonts(&cc.egui_ctx);
            Box::new(DesktopApp::new(file))
        }),
    )
}
