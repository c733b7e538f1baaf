//! テスト用トランスポート
//!
//! 呼び出しを記録し、登録済みのレスポンスを順番に返す。

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::client::HelixClient;
use super::errors::HelixError;
use super::response::RateLimit;
use super::transport::{HelixTransport, HttpResponse};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<serde_json::Value>,
}

#[derive(Default)]
pub(crate) struct RecordingTransport {
    calls: Mutex<Vec<RecordedCall>>,
    responses: Mutex<VecDeque<HttpResponse>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 次の呼び出しで返すレスポンスを登録（未登録なら204）
    pub fn respond(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(HttpResponse {
            status,
            rate_limit: RateLimit {
                limit: Some(800),
                remaining: Some(799),
                reset: Some(1_700_000_000),
            },
            body: body.to_string(),
        });
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn client(self: &Arc<Self>) -> HelixClient {
        HelixClient::new(self.clone())
    }

    fn record(
        &self,
        method: &'static str,
        path: &str,
        query: Vec<(&'static str, String)>,
        body: Option<serde_json::Value>,
    ) -> HttpResponse {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            query,
            body,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(HttpResponse {
                status: 204,
                ..Default::default()
            })
    }
}

#[async_trait]
impl HelixTransport for RecordingTransport {
    async fn get(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<HttpResponse, HelixError> {
        Ok(self.record("GET", path, query.to_vec(), None))
    }

    async fn put_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, HelixError> {
        Ok(self.record("PUT", path, Vec::new(), Some(body.clone())))
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, HelixError> {
        Ok(self.record("POST", path, Vec::new(), Some(body.clone())))
    }
}
