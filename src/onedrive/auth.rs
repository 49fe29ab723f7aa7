//! アクセストークン取得
//!
//! クライアント資格情報フロー。取得したトークンは有効期限の60秒前まで再利用する。

use super::{GraphEndpoints, GRAPH_SCOPE};
use crate::error::{Result, ShipboardError};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
}

// シークレットはログに出さない
impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
    error: Option<String>,
    error_description: Option<String>,
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.saturating_duration_since(now) > EXPIRY_MARGIN
    }
}

pub struct TokenProvider {
    http: reqwest::Client,
    credentials: ClientCredentials,
    endpoints: GraphEndpoints,
    cached: Option<CachedToken>,
}

impl TokenProvider {
    pub fn new(http: reqwest::Client, credentials: ClientCredentials, endpoints: GraphEndpoints) -> Self {
        Self {
            http,
            credentials,
            endpoints,
            cached: None,
        }
    }

    /// キャッシュを優先し、なければ取得する
    pub async fn access_token(&mut self) -> Result<String> {
        if let Some(cached) = &self.cached {
            if cached.is_fresh(Instant::now()) {
                debug!("using cached access token");
                return Ok(cached.access_token.clone());
            }
        }
        self.request_token().await
    }

    /// 401 を受けたときなどに破棄する
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    async fn request_token(&mut self) -> Result<String> {
        let url = self.endpoints.token_url(&self.credentials.tenant_id);
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("scope", GRAPH_SCOPE),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .http
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|e| ShipboardError::Auth(e.to_string()))?;
        let status = response.status();
        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| ShipboardError::Auth(format!("invalid token response (status {}): {}", status, e)))?;

        let Some(access_token) = body.access_token else {
            let description = body
                .error_description
                .or(body.error)
                .unwrap_or_else(|| "No error description provided.".to_string());
            return Err(ShipboardError::Auth(description));
        };

        info!(expires_in = ?body.expires_in, "acquired access token");
        self.cached = body.expires_in.map(|secs| CachedToken {
            access_token: access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(secs),
        });
        Ok(access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_token_freshness() {
        let now = Instant::now();
        let fresh = CachedToken {
            access_token: "t".to_string(),
            expires_at: now + Duration::from_secs(3599),
        };
        let stale = CachedToken {
            access_token: "t".to_string(),
            expires_at: now + Duration::from_secs(30),
        };
        assert!(fresh.is_fresh(now));
        assert!(!stale.is_fresh(now));
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let credentials = ClientCredentials {
            client_id: "id".to_string(),
            client_secret: "very-secret".to_string(),
            tenant_id: "tenant".to_string(),
        };
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("tenant"));
    }
}
