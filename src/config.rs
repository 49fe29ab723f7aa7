//! 設定
//!
//! `~/.config/shipboard/config.json` を読み、環境変数で上書きする。
//! 認証情報とファイル指定は必須で、欠けていれば起動時にまとめて報告する。

use crate::error::{Result, ShipboardError};
use crate::loader::SheetSelector;
use crate::onedrive::{ClientCredentials, GraphEndpoints};
use serde::{Deserialize, Serialize};
use shipboard_common::schedule::{
    DEFAULT_CAROUSEL_INTERVAL, DEFAULT_REFRESH_INTERVAL, DEFAULT_ROWS_PER_PAGE,
};
use std::path::{Path, PathBuf};

pub const ENV_CLIENT_ID: &str = "CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "CLIENT_SECRET";
pub const ENV_TENANT_ID: &str = "TENANT_ID";
pub const ENV_USER_ID: &str = "ONEDRIVE_USER_ID";
pub const ENV_FILE_PATH: &str = "TARGET_FILE_PATH";
pub const ENV_SHEET_NAME: &str = "EXCEL_SHEET_NAME";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub tenant_id: Option<String>,
    pub onedrive_user_id: Option<String>,
    pub target_file_path: Option<String>,
    pub excel_sheet_name: Option<String>,
    pub refresh_interval_seconds: u64,
    pub carousel_interval_seconds: u64,
    pub rows_per_page: u64,
    /// モックサーバー等に向けるときだけ指定
    pub authority_host: Option<String>,
    pub graph_base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

/// リモート取得に必要な設定一式
#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub credentials: ClientCredentials,
    pub user_id: String,
    pub file_path: String,
    pub sheet: SheetSelector,
    pub endpoints: GraphEndpoints,
}

impl Config {
    /// 設定ファイル（なければ既定値）＋環境変数
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ShipboardError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("shipboard").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            tenant_id: None,
            onedrive_user_id: None,
            target_file_path: None,
            excel_sheet_name: None,
            refresh_interval_seconds: DEFAULT_REFRESH_INTERVAL,
            carousel_interval_seconds: DEFAULT_CAROUSEL_INTERVAL,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            authority_host: None,
            graph_base_url: None,
        }
    }

    /// 環境変数を優先（空文字は未設定扱い）
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_CLIENT_ID) {
            self.client_id = Some(v);
        }
        if let Some(v) = get(ENV_CLIENT_SECRET) {
            self.client_secret = Some(v);
        }
        if let Some(v) = get(ENV_TENANT_ID) {
            self.tenant_id = Some(v);
        }
        if let Some(v) = get(ENV_USER_ID) {
            self.onedrive_user_id = Some(v);
        }
        if let Some(v) = get(ENV_FILE_PATH) {
            self.target_file_path = Some(v);
        }
        if let Some(v) = get(ENV_SHEET_NAME) {
            self.excel_sheet_name = Some(v);
        }
    }

    /// 必須項目を検証して取り出す（欠落はまとめて報告）
    pub fn remote_settings(&self) -> Result<RemoteSettings> {
        let required = [
            (ENV_CLIENT_ID, &self.client_id),
            (ENV_CLIENT_SECRET, &self.client_secret),
            (ENV_TENANT_ID, &self.tenant_id),
            (ENV_USER_ID, &self.onedrive_user_id),
            (ENV_FILE_PATH, &self.target_file_path),
            (ENV_SHEET_NAME, &self.excel_sheet_name),
        ];
        let missing: Vec<String> = required
            .iter()
            .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
            .map(|(name, _)| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ShipboardError::MissingSettings(missing));
        }

        let value = |v: &Option<String>| v.clone().unwrap_or_default();
        let mut endpoints = GraphEndpoints::default();
        if let Some(host) = &self.authority_host {
            endpoints.authority_host = host.trim_end_matches('/').to_string();
        }
        if let Some(base) = &self.graph_base_url {
            endpoints.graph_base = base.trim_end_matches('/').to_string();
        }

        Ok(RemoteSettings {
            credentials: ClientCredentials {
                client_id: value(&self.client_id),
                client_secret: value(&self.client_secret),
                tenant_id: value(&self.tenant_id),
            },
            user_id: value(&self.onedrive_user_id),
            file_path: value(&self.target_file_path),
            sheet: value(&self.excel_sheet_name).parse()?,
            endpoints,
        })
    }

    /// シート指定のみ（ローカルファイル読み込み用、未設定なら先頭シート）
    pub fn sheet_selector(&self) -> Result<SheetSelector> {
        match self.excel_sheet_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.parse(),
            _ => Ok(SheetSelector::default()),
        }
    }
}
