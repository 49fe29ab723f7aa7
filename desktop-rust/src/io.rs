use anyhow::{Context, Result};
use std::path::Path;

use shipboard::config::Config;
use shipboard::source::{self, SnapshotSource};

pub fn load_config() -> Result<Config> {
    Config::load().context("load config")
}

/// 引数でファイルが渡されればローカル、なければ OneDrive
pub fn open_source(config: &Config, file: Option<&Path>) -> Result<Box<dyn SnapshotSource>> {
    let source = source::from_config(config, file, None).with_context(|| match file {
        Some(path) => format!("open {}", path.display()),
        None => "connect to OneDrive".to_string(),
    })?;
    Ok(source)
}

/// tick を回すための単一スレッドのランタイム
pub fn board_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build runtime")
}
