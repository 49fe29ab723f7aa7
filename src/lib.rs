//! shipboard - 出荷状況ボード
//!
//! OneDrive上のExcelを定期的に取得し、端末・出荷番号ごとに巡回表示する。

pub mod board;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod onedrive;
pub mod render;
pub mod source;

pub use board::{ApplicationState, Frame, FrameBody};
pub use error::{Result, ShipboardError};
