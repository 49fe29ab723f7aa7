//! OneDrive（Microsoft Graph）クライアント
//!
//! - auth: クライアント資格情報フローでのトークン取得とキャッシュ
//! - files: ファイル本体のダウンロード、サイト検索

pub mod auth;
pub mod files;

pub use auth::{ClientCredentials, TokenProvider};
pub use files::OneDriveClient;

pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
pub const DEFAULT_GRAPH_BASE: &str = "https://graph.microsoft.com/v1.0";
pub const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// 接続先（末尾スラッシュなし）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEndpoints {
    pub authority_host: String,
    pub graph_base: String,
}

impl Default for GraphEndpoints {
    fn default() -> Self {
        Self {
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
            graph_base: DEFAULT_GRAPH_BASE.to_string(),
        }
    }
}

impl GraphEndpoints {
    pub fn token_url(&self, tenant_id: &str) -> String {
        format!("{}/{}/oauth2/v2.0/token", self.authority_host, tenant_id)
    }

    /// ユーザーのドライブ上のファイル本体
    pub fn content_url(&self, user_id: &str, file_path: &str) -> String {
        let path = if file_path.starts_with('/') {
            file_path.to_string()
        } else {
            format!("/{}", file_path)
        };
        format!("{}/users/{}/drive/root:{}:/content", self.graph_base, user_id, path)
    }

    pub fn sites_search_url(&self) -> String {
        format!("{}/sites", self.graph_base)
    }
}
