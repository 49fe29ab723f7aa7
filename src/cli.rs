use crate::config::Config;
use crate::error::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use shipboard_common::schedule::{
    CAROUSEL_INTERVAL_RANGE, REFRESH_INTERVAL_RANGE, ROWS_PER_PAGE_RANGE,
};
use shipboard_common::{CellKey, FilterCriteria, ScheduleSettings};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shipboard")]
#[command(about = "出荷状況ボード（OneDrive上のExcelを定期取得して巡回表示）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// ログをJSONで出力
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 端末ボードを常時表示（Ctrl-Cで終了）
    Watch {
        #[command(flatten)]
        board: BoardArgs,

        /// 毎秒書き換えるHTMLファイル
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// 1フレームだけ表示して終了
    Show {
        #[command(flatten)]
        board: BoardArgs,

        /// フレームをJSONで出力
        #[arg(long)]
        json: bool,

        /// HTMLファイルに書き出す
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Excelファイルをダウンロードして保存
    Fetch {
        /// 出力ファイル
        #[arg(short, long, default_value = "shipping_board.xlsx")]
        output: PathBuf,
    },

    /// トラックルート別の出荷数
    Routes {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// SharePointサイトを検索（接続確認用）
    Sites {
        /// 検索語
        #[arg(default_value = "*")]
        query: String,
    },

    /// 設定を表示
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 取得元（省略時は OneDrive）
#[derive(Args, Clone, Debug, Default)]
pub struct SourceArgs {
    /// ローカルのExcelファイルを使う
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// シート名または番号（省略時は設定値）
    #[arg(long)]
    pub sheet: Option<String>,
}

#[derive(Args, Clone, Debug, Default)]
pub struct BoardArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// 開始日 (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// 終了日 (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// 端末で絞り込む
    #[arg(long)]
    pub terminal: Option<String>,

    /// 出荷番号で絞り込む
    #[arg(long)]
    pub ship_no: Option<String>,

    /// 再取得の間隔（秒）
    #[arg(long, value_parser = clap::value_parser!(u64).range(REFRESH_INTERVAL_RANGE))]
    pub refresh_interval: Option<u64>,

    /// カルーセルを有効にする
    #[arg(long)]
    pub carousel: bool,

    /// カルーセルの切替間隔（秒）
    #[arg(long, value_parser = clap::value_parser!(u64).range(CAROUSEL_INTERVAL_RANGE))]
    pub carousel_interval: Option<u64>,

    /// 端末ページあたりの行数
    #[arg(long, value_parser = clap::value_parser!(u64).range(ROWS_PER_PAGE_RANGE))]
    pub rows_per_page: Option<u64>,
}

impl BoardArgs {
    /// 表示設定（引数 > 設定ファイル > 既定値）
    pub fn schedule_settings(&self, config: &Config) -> Result<ScheduleSettings> {
        Ok(ScheduleSettings::new(
            self.refresh_interval.unwrap_or(config.refresh_interval_seconds),
            self.carousel,
            self.carousel_interval.unwrap_or(config.carousel_interval_seconds),
            self.rows_per_page.unwrap_or(config.rows_per_page),
        )?)
    }

    /// 開始日 > 終了日 は起動時のエラー
    pub fn filter_criteria(&self) -> Result<FilterCriteria> {
        let criteria = FilterCriteria {
            start: self.start,
            end: self.end,
            terminal: self.terminal.as_deref().map(CellKey::parse),
            ship_no: self.ship_no.as_deref().map(CellKey::parse),
        };
        criteria.validate()?;
        Ok(criteria)
    }
}
