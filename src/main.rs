use chrono::{Local, NaiveDateTime};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use shipboard::board::ApplicationState;
use shipboard::cli::{BoardArgs, Cli, Commands};
use shipboard::config::Config;
use shipboard::error::Result;
use shipboard::source::{self, SnapshotSource};
use shipboard::{logging, render};
use shipboard_common::shipments_by_route;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// 引数から状態を作る（不正な日付範囲は起動時のエラー）
fn build_state(board: &BoardArgs, config: &Config) -> Result<ApplicationState> {
    let settings = board.schedule_settings(config)?;
    let mut state = ApplicationState::new(now(), settings);
    state.set_filter(board.filter_criteria()?)?;
    Ok(state)
}

async fn watch(board: BoardArgs, html: Option<PathBuf>, config: &Config) -> Result<()> {
    let mut state = build_state(&board, config)?;
    let mut source = source::from_config(config, board.source.file.as_deref(), board.source.sheet.as_deref())?;
    info!(
        source = %source.describe(),
        refresh_interval = state.settings().refresh_interval_seconds(),
        carousel = state.settings().carousel_enabled(),
        "starting board"
    );

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut stdout = io::stdout();

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let frame = state.tick(now(), source.as_mut()).await;
                render::draw_frame(&mut stdout, &frame, true)?;
                if let Some(path) = &html {
                    if let Err(e) = render::write_html(&frame, path) {
                        warn!(path = %path.display(), error = %e, "failed to write html");
                    }
                }
            }
            _ = &mut shutdown => {
                info!("shutting down");
                break;
            }
        }
    }
    Ok(())
}

async fn show(board: BoardArgs, json: bool, html: Option<PathBuf>, config: &Config) -> Result<()> {
    let mut state = build_state(&board, config)?;
    let mut source = source::from_config(config, board.source.file.as_deref(), board.source.sheet.as_deref())?;

    let bar = spinner(&format!("Loading {}", source.describe()));
    let frame = state.tick(now(), source.as_mut()).await;
    bar.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&frame)?);
    } else {
        render::draw_frame(&mut io::stdout(), &frame, false)?;
    }
    if let Some(path) = html {
        render::write_html(&frame, &path)?;
        println!("✔ HTMLを保存: {}", path.display());
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.log_json {
        logging::init_json(cli.verbose);
    } else {
        logging::init(cli.verbose);
    }
    let config = Config::load()?;

    match cli.command {
        Commands::Watch { board, html } => {
            watch(board, html, &config).await?;
        }

        Commands::Show { board, json, html } => {
            show(board, json, html, &config).await?;
        }

        Commands::Fetch { output } => {
            let mut workbook = source::remote_workbook(&config, None)?;
            let bar = spinner(&format!("Downloading {}", workbook.describe()));
            let bytes = workbook.fetch_bytes().await;
            bar.finish_and_clear();
            let bytes = bytes?;
            std::fs::write(&output, &bytes)?;
            println!("✔ {} bytes を保存: {}", bytes.len(), output.display());
        }

        Commands::Routes { source: args } => {
            let mut source = source::from_config(&config, args.file.as_deref(), args.sheet.as_deref())?;
            let bar = spinner(&format!("Loading {}", source.describe()));
            let rows = source.load_rows().await;
            bar.finish_and_clear();
            let rows = rows?;
            render::print_routes(&mut io::stdout(), &shipments_by_route(&rows))?;
        }

        Commands::Sites { query } => {
            let remote = config.remote_settings()?;
            let mut client = shipboard::onedrive::OneDriveClient::new(
                remote.credentials,
                remote.endpoints,
                remote.user_id,
            );
            let sites = client.search_sites(&query).await?;
            println!("{}", serde_json::to_string_pretty(&sites)?);
        }

        Commands::Config { show } => {
            if show {
                let path = Config::config_path()?;
                let set = |v: &Option<String>| if v.is_some() { "設定済み" } else { "未設定" };
                println!("設定: {}", path.display());
                println!("  CLIENT_ID: {}", set(&config.client_id));
                println!("  CLIENT_SECRET: {}", set(&config.client_secret));
                println!("  TENANT_ID: {}", set(&config.tenant_id));
                println!("  ONEDRIVE_USER_ID: {}", config.onedrive_user_id.as_deref().unwrap_or("未設定"));
                println!("  TARGET_FILE_PATH: {}", config.target_file_path.as_deref().unwrap_or("未設定"));
                println!("  EXCEL_SHEET_NAME: {}", config.excel_sheet_name.as_deref().unwrap_or("未設定"));
                println!("  再取得間隔: {}秒", config.refresh_interval_seconds);
                println!("  カルーセル間隔: {}秒", config.carousel_interval_seconds);
                println!("  ページ行数: {}", config.rows_per_page);
            }
        }
    }

    Ok(())
}
