//! HTTPトランスポート
//!
//! 拡張機能クライアントはこのトレイト越しにHelix APIを呼び出す。
//! 実運用では `ReqwestTransport`、テストでは記録用のテストダブルを注入する。

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, RequestBuilder};
use std::str::FromStr;

use super::errors::HelixError;
use super::response::RateLimit;
use crate::config::HelixConfig;
use crate::util::mask_secret;

/// デコード前のHTTPレスポンス
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub rate_limit: RateLimit,
    pub body: String,
}

/// Helix API呼び出しの抽象
///
/// タイムアウト・キャンセルは実装側の責務。
#[async_trait]
pub trait HelixTransport: Send + Sync {
    async fn get(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<HttpResponse, HelixError>;

    async fn put_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, HelixError>;

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, HelixError>;
}

/// reqwestによる実装
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    client_id: String,
    access_token: String,
}

impl ReqwestTransport {
    /// 設定からトランスポートを作成
    ///
    /// # Errors
    /// HTTPクライアントのビルドに失敗した場合にエラーを返す
    pub fn new(config: &HelixConfig) -> Result<Self, HelixError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        log::debug!(
            "Helix transport created (base url: {}, client id: {}, token: {})",
            config.base_url,
            config.client_id,
            mask_secret(&config.access_token)
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            access_token: config.access_token.clone(),
        })
    }

    /// Bearerトークンだけを差し替えたコピーを返す
    ///
    /// 拡張機能PubSubの送信には署名済みJWTを使う。
    /// コネクションプールは共有される。
    pub fn with_bearer_token(&self, token: impl Into<String>) -> Self {
        Self {
            access_token: token.into(),
            ..self.clone()
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("Client-Id", &self.client_id)
            .bearer_auth(&self.access_token)
    }

    async fn execute(
        &self,
        method: &Method,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<HttpResponse, HelixError> {
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                log::error!("Helix request timed out: {} {}", method, path);
            } else {
                log::error!("Helix request failed: {} {}: {}", method, path, e);
            }
            HelixError::HttpError(e)
        })?;

        let status = response.status().as_u16();
        let rate_limit = parse_rate_limit(response.headers());
        let body = response.text().await?;

        log::debug!(
            "{} {} -> {} (ratelimit remaining: {:?})",
            method,
            path,
            status,
            rate_limit.remaining
        );

        Ok(HttpResponse {
            status,
            rate_limit,
            body,
        })
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("access_token", &mask_secret(&self.access_token))
            .finish()
    }
}

#[async_trait]
impl HelixTransport for ReqwestTransport {
    async fn get(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<HttpResponse, HelixError> {
        let builder = self.request(Method::GET, path).query(query);
        self.execute(&Method::GET, path, builder).await
    }

    async fn put_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, HelixError> {
        let builder = self.request(Method::PUT, path).json(body);
        self.execute(&Method::PUT, path, builder).await
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, HelixError> {
        let builder = self.request(Method::POST, path).json(body);
        self.execute(&Method::POST, path, builder).await
    }
}

fn header_value<T: FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

fn parse_rate_limit(headers: &HeaderMap) -> RateLimit {
    RateLimit {
        limit: header_value(headers, "ratelimit-limit"),
        remaining: header_value(headers, "ratelimit-remaining"),
        reset: header_value(headers, "ratelimit-reset"),
    }
}
