use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use eframe::egui::{self, Color32, RichText};
use eframe::egui::{FontData, FontDefinitions, FontFamily};

use crate::io::{board_runtime, load_config, open_source};
use crate::model::BoardControls;
use shipboard::board::{ApplicationState, Frame, FrameBody};
use shipboard::config::Config;
use shipboard::render::{metric_cards, table_cells, TABLE_HEADERS};
use shipboard::render::{STATUS_LOADING_COLUMN, STATUS_PREPARATION_COLUMN};
use shipboard::source::SnapshotSource;
use shipboard_common::schedule::{
    CAROUSEL_INTERVAL_RANGE, REFRESH_INTERVAL_RANGE, ROWS_PER_PAGE_RANGE,
};
use shipboard_common::{CellKey, Slide, StatusKind};
use tracing::{error, info, warn};

const HEADER_COLOR: Color32 = Color32::from_rgb(0x1E, 0x3A, 0x8A);

pub struct DesktopApp {
    state: ApplicationState,
    source: Option<Box<dyn SnapshotSource>>,
    runtime: Option<tokio::runtime::Runtime>,
    controls: BoardControls,
    applied: BoardControls,
    frame: Option<Frame>,
    status: String,
    /// 設定・取得元の準備に失敗した（取得は行わず、中央に表示し続ける）
    setup_error: Option<String>,
}

impl DesktopApp {
    pub fn new(file: Option<PathBuf>) -> Self {
        Self::from_config(load_config(), file.as_deref())
    }

    fn from_config(config: anyhow::Result<Config>, file: Option<&Path>) -> Self {
        let mut setup_error = None;
        let config = match config {
            Ok(config) => config,
            Err(err) => {
                let message = format!("{err:#}");
                error!(error = %message, "failed to load config");
                setup_error = Some(message);
                Config::default()
            }
        };
        let controls = BoardControls::from_config(&config);
        let settings = controls.settings().unwrap_or_default();

        let source = match open_source(&config, file) {
            Ok(source) => Some(source),
            Err(err) => {
                let message = format!("{err:#}");
                error!(error = %message, "failed to open data source");
                setup_error.get_or_insert(message);
                None
            }
        };
        let runtime = match board_runtime() {
            Ok(runtime) => Some(runtime),
            Err(err) => {
                let message = format!("{err:#}");
                error!(error = %message, "failed to start runtime");
                setup_error.get_or_insert(message);
                None
            }
        };
        if let Some(source) = &source {
            info!(source = %source.describe(), "desktop board ready");
        }

        Self {
            state: ApplicationState::new(Local::now().naive_local(), settings),
            source,
            runtime,
            applied: controls.clone(),
            controls,
            frame: None,
            status: String::new(),
            setup_error,
        }
    }

    fn tick(&mut self) {
        let (Some(source), Some(runtime)) = (self.source.as_mut(), self.runtime.as_ref()) else {
            return;
        };
        let now = Local::now().naive_local();
        self.frame = Some(runtime.block_on(self.state.tick(now, source.as_mut())));
    }

    /// 変更があった入力だけを状態に反映する
    fn apply_controls(&mut self) {
        if self.controls == self.applied {
            return;
        }
        self.status.clear();
        match self.controls.settings() {
            Ok(settings) => self.state.set_settings(settings),
            Err(err) => {
                warn!(error = %err, "settings rejected");
                self.status = err.to_string();
            }
        }
        match self.controls.criteria() {
            // 逆転した範囲はフレームのフィルタエラーとして表示される
            Ok(criteria) => {
                let _ = self.state.set_filter(criteria);
            }
            Err(message) => {
                warn!(error = %message, "filter input rejected");
                self.status = message;
            }
        }
        self.applied = self.controls.clone();
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Settings");
        if ui.button("Load/Refresh Data").clicked() {
            self.state.request_refresh();
        }
        ui.separator();

        ui.label("Filters");
        ui.horizontal(|ui| {
            ui.label("Start");
            ui.text_edit_singleline(&mut self.controls.start);
        });
        ui.horizontal(|ui| {
            ui.label("End");
            ui.text_edit_singleline(&mut self.controls.end);
        });

        let (terminals, ship_nos) = match &self.frame {
            Some(frame) => (frame.options.terminals.clone(), frame.options.ship_nos.clone()),
            None => (Vec::new(), Vec::new()),
        };
        key_combo(ui, "Terminal", &mut self.controls.terminal, &terminals);
        key_combo(ui, "Ship no.", &mut self.controls.ship_no, &ship_nos);
        ui.separator();

        ui.label("Display");
        ui.horizontal(|ui| {
            ui.label("Refresh (s)");
            ui.add(egui::DragValue::new(&mut self.controls.refresh_interval).clamp_range(REFRESH_INTERVAL_RANGE));
        });
        ui.checkbox(&mut self.controls.carousel_enabled, "Carousel");
        ui.add_enabled_ui(self.controls.carousel_enabled, |ui| {
            ui.horizontal(|ui| {
                ui.label("Interval (s)");
                ui.add(egui::DragValue::new(&mut self.controls.carousel_interval).clamp_range(CAROUSEL_INTERVAL_RANGE));
            });
            ui.horizontal(|ui| {
                ui.label("Rows per page");
                ui.add(egui::DragValue::new(&mut self.controls.rows_per_page).clamp_range(ROWS_PER_PAGE_RANGE));
            });
        });

        if !self.status.is_empty() {
            ui.separator();
            ui.label(RichText::new(&self.status).color(Color32::from_rgb(220, 53, 69)));
        }
    }

    fn render_frame(&self, ui: &mut egui::Ui) {
        if let Some(error) = &self.setup_error {
            ui.label(
                RichText::new(format!("Could not start the board: {error}"))
                    .size(20.0)
                    .color(Color32::from_rgb(220, 53, 69)),
            );
            return;
        }
        let Some(frame) = &self.frame else {
            ui.label("Waiting for the first data load...");
            return;
        };

        if let Some(error) = &frame.last_error {
            let message = if frame.loaded_at.is_some() {
                format!("Showing previously loaded data. Last refresh failed: {error}")
            } else {
                format!("Could not display dashboard due to a previous error: {error}")
            };
            ui.label(RichText::new(message).color(Color32::from_rgb(220, 53, 69)));
        }
        if let Some(error) = &frame.filter_error {
            ui.label(RichText::new(error).color(Color32::from_rgb(246, 196, 69)));
        }

        match &frame.body {
            FrameBody::NotLoaded => {
                if frame.last_error.is_none() {
                    ui.label("Waiting for the first data load...");
                }
            }
            FrameBody::NoData => {
                ui.label("No data available for the selected filters.");
            }
            FrameBody::Board(slide) => render_slide(ui, slide),
        }

        if let Some(loaded_at) = frame.loaded_at {
            ui.add_space(12.0);
            ui.label(
                RichText::new(format!("Data last loaded: {}", loaded_at.format("%Y-%m-%d %H:%M:%S")))
                    .color(Color32::from_gray(150)),
            );
        }
    }
}

fn key_combo(ui: &mut egui::Ui, label: &str, selected: &mut Option<CellKey>, options: &[CellKey]) {
    let text = selected.as_ref().map(ToString::to_string).unwrap_or_else(|| "All".to_string());
    egui::ComboBox::from_label(label)
        .selected_text(text)
        .show_ui(ui, |ui| {
            ui.selectable_value(selected, None, "All");
            for option in options {
                ui.selectable_value(selected, Some(option.clone()), option.to_string());
            }
        });
}

fn render_slide(ui: &mut egui::Ui, slide: &Slide) {
    ui.label(RichText::new(&slide.title).size(28.0).strong().color(HEADER_COLOR));
    ui.separator();

    egui::ScrollArea::vertical().max_height(ui.available_height() * 0.7).show(ui, |ui| {
        egui::Grid::new("shipments")
            .striped(true)
            .spacing([16.0, 8.0])
            .show(ui, |ui| {
                for header in TABLE_HEADERS {
                    ui.label(RichText::new(header).strong().color(HEADER_COLOR));
                }
                ui.end_row();

                for row in &slide.rows {
                    for (column, cell) in table_cells(row).into_iter().enumerate() {
                        let status = match column {
                            STATUS_PREPARATION_COLUMN => Some(row.status_preparation.as_deref()),
                            STATUS_LOADING_COLUMN => Some(row.status_loading.as_deref()),
                            _ => None,
                        };
                        match status.and_then(|s| status_color(StatusKind::of(s))) {
                            Some((background, foreground)) => {
                                ui.label(RichText::new(cell).background_color(background).color(foreground));
                            }
                            None => {
                                ui.label(RichText::new(cell).strong());
                            }
                        }
                    }
                    ui.end_row();
                }
            });
    });

    ui.add_space(12.0);
    ui.label(RichText::new(&slide.metrics_title).size(22.0).strong().color(HEADER_COLOR));
    egui::Grid::new("metrics").spacing([32.0, 8.0]).show(ui, |ui| {
        for (i, (label, value)) in metric_cards(&slide.metrics).into_iter().enumerate() {
            ui.vertical(|ui| {
                ui.label(RichText::new(label).color(Color32::from_gray(150)));
                ui.label(RichText::new(value.to_string()).size(26.0));
            });
            if i % 4 == 3 {
                ui.end_row();
            }
        }
    });
}

fn status_color(kind: StatusKind) -> Option<(Color32, Color32)> {
    match kind {
        StatusKind::Finished => Some((Color32::from_rgb(0x28, 0xa7, 0x45), Color32::WHITE)),
        StatusKind::Delayed => Some((Color32::from_rgb(0xdc, 0x35, 0x45), Color32::WHITE)),
        StatusKind::OnProcess => Some((Color32::from_rgb(0xff, 0xc1, 0x07), Color32::BLACK)),
        StatusKind::Other => None,
    }
}

pub fn configure_fonts(ctx: &egui::Context) {
    let mut fonts = FontDefinitions::default();
    let candidates = [
        r"C:\Windows\Fonts\seguiemj.ttf",
        "/System/Library/Fonts/Apple Color Emoji.ttc",
        "/usr/share/fonts/truetype/noto/NotoColorEmoji.ttf",
        "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
    ];

    for path in candidates {
        if let Ok(data) = std::fs::read(path) {
            fonts.font_data.insert("fallback".to_string(), FontData::from_owned(data));
            fonts.families
                .entry(FontFamily::Proportional)
                .or_default()
                .push("fallback".to_string());
            ctx.set_fonts(fonts);
            return;
        }
    }
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_controls();
        self.tick();

        egui::SidePanel::left("controls").resizable(true).show(ctx, |ui| {
            self.render_controls(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_frame(ui);
            });
        });

        ctx.request_repaint_after(Duration::from_secs(1));
    }
}
