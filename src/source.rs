//! データ取得元
//!
//! - FileSource: ファイル本体（バイト列）を返す。OneDrive またはローカル。
//! - SnapshotSource: 検証済みの行を返す。ボードはこちらだけを見る。

use crate::config::Config;
use crate::error::Result;
use crate::loader::{parse_workbook, SheetSelector};
use crate::onedrive::OneDriveClient;
use async_trait::async_trait;
use shipboard_common::ShipmentRow;
use std::path::{Path, PathBuf};

#[async_trait]
pub trait FileSource: Send {
    async fn fetch(&mut self) -> Result<Vec<u8>>;

    fn describe(&self) -> String;
}

#[async_trait]
pub trait SnapshotSource: Send {
    async fn load_rows(&mut self) -> Result<Vec<ShipmentRow>>;

    fn describe(&self) -> String;
}

/// OneDrive上の固定パスのファイル
pub struct RemoteFile {
    client: OneDriveClient,
    path: String,
}

impl RemoteFile {
    pub fn new(client: OneDriveClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
        }
    }
}

#[async_trait]
impl FileSource for RemoteFile {
    async fn fetch(&mut self) -> Result<Vec<u8>> {
        self.client.download(&self.path).await
    }

    fn describe(&self) -> String {
        format!("OneDrive:{}", self.path)
    }
}

/// ローカルのファイル（オフライン確認用）
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FileSource for LocalFile {
    async fn fetch(&mut self) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(&self.path).await?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// ファイル取得＋シート読み込み
pub struct WorkbookSource<F> {
    files: F,
    sheet: SheetSelector,
}

impl<F: FileSource> WorkbookSource<F> {
    pub fn new(files: F, sheet: SheetSelector) -> Self {
        Self { files, sheet }
    }

    /// 読み込みを行わずに本体だけ取得する
    pub async fn fetch_bytes(&mut self) -> Result<Vec<u8>> {
        self.files.fetch().await
    }
}

#[async_trait]
impl<F: FileSource> SnapshotSource for WorkbookSource<F> {
    async fn load_rows(&mut self) -> Result<Vec<ShipmentRow>> {
        let bytes = self.files.fetch().await?;
        parse_workbook(bytes, &self.sheet)
    }

    fn describe(&self) -> String {
        format!("{} [{}]", self.files.describe(), self.sheet)
    }
}

/// OneDrive上のワークブック（必須設定が欠けていればここで失敗する）
pub fn remote_workbook(config: &Config, sheet: Option<&str>) -> Result<WorkbookSource<RemoteFile>> {
    let remote = config.remote_settings()?;
    let sheet = match sheet {
        Some(sheet) => sheet.parse()?,
        None => remote.sheet,
    };
    let client = OneDriveClient::new(remote.credentials, remote.endpoints, remote.user_id);
    Ok(WorkbookSource::new(RemoteFile::new(client, remote.file_path), sheet))
}

/// ローカル指定があればローカル、なければ OneDrive
pub fn from_config(
    config: &Config,
    file: Option<&Path>,
    sheet: Option<&str>,
) -> Result<Box<dyn SnapshotSource>> {
    match file {
        Some(path) => {
            let sheet = match sheet {
                Some(sheet) => sheet.parse()?,
                None => config.sheet_selector()?,
            };
            Ok(Box::new(WorkbookSource::new(LocalFile::new(path), sheet)))
        }
        None => Ok(Box::new(remote_workbook(config, sheet)?)),
    }
}
