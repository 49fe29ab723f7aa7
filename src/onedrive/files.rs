//! ファイル取得

use super::{ClientCredentials, GraphEndpoints, TokenProvider};
use crate::error::{Result, ShipboardError};
use reqwest::StatusCode;
use tracing::{debug, info, warn};

pub struct OneDriveClient {
    http: reqwest::Client,
    tokens: TokenProvider,
    endpoints: GraphEndpoints,
    user_id: String,
}

impl OneDriveClient {
    pub fn new(credentials: ClientCredentials, endpoints: GraphEndpoints, user_id: impl Into<String>) -> Self {
        let http = reqwest::Client::new();
        Self {
            tokens: TokenProvider::new(http.clone(), credentials, endpoints.clone()),
            http,
            endpoints,
            user_id: user_id.into(),
        }
    }

    /// ユーザーのOneDriveからファイル本体をダウンロード
    ///
    /// 401 のときだけトークンを取り直して1回やり直す。
    pub async fn download(&mut self, file_path: &str) -> Result<Vec<u8>> {
        let url = self.endpoints.content_url(&self.user_id, file_path);

        let mut response = self.get_content(&url).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("access token rejected, requesting a new one");
            self.tokens.invalidate();
            response = self.get_content(&url).await?;
        }

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ShipboardError::Download(format!(
                "Failed to download file. Status: {}, Response: {}",
                status.as_u16(),
                text
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ShipboardError::Download(format!("Failed to download file: {}", e)))?;
        info!(path = file_path, bytes = bytes.len(), "downloaded file");
        Ok(bytes.to_vec())
    }

    async fn get_content(&mut self, url: &str) -> Result<reqwest::Response> {
        let token = self.tokens.access_token().await?;
        debug!(url, "requesting file content");
        self.http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ShipboardError::Download(format!("Failed to download file: {}", e)))
    }

    /// SharePointサイトの検索（サイトID確認用）
    pub async fn search_sites(&mut self, query: &str) -> Result<serde_json::Value> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .get(self.endpoints.sites_search_url())
            .query(&[("search", query)])
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ShipboardError::Download(format!(
                "Failed to find site. Status: {}, Response: {}",
                status.as_u16(),
                text
            )));
        }
        Ok(response.json().await?)
    }
}
