use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use super::errors::HelixError;
use super::extensions::{ExtensionConfigurations, ExtensionPubSub};
use super::response::{decode_data, hydrate_common, HelixResponse, ResponseCommon};
use super::transport::{HelixTransport, ReqwestTransport};
use crate::config::HelixConfig;

/// Helix APIクライアント（共有コンテキスト）
///
/// 状態はトランスポートへの参照のみ。Cloneしても同じトランスポートを共有する。
#[derive(Clone)]
pub struct HelixClient {
    transport: Arc<dyn HelixTransport>,
}

impl HelixClient {
    /// 任意のトランスポートからクライアントを作成
    pub fn new(transport: Arc<dyn HelixTransport>) -> Self {
        Self { transport }
    }

    /// 設定からreqwestトランスポート付きのクライアントを作成
    pub fn from_config(config: &HelixConfig) -> Result<Self, HelixError> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// 拡張機能設定（Configuration Service）クライアント
    pub fn configurations(&self) -> ExtensionConfigurations {
        ExtensionConfigurations::new(self.clone())
    }

    /// 拡張機能PubSubクライアント
    pub fn pubsub(&self) -> ExtensionPubSub {
        ExtensionPubSub::new(self.clone())
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<HelixResponse<T>, HelixError> {
        let raw = self.transport.get(path, query).await?;
        decode_data(&raw)
    }

    pub(crate) async fn put_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ResponseCommon, HelixError> {
        let body = serde_json::to_value(body)?;
        let raw = self.transport.put_json(path, &body).await?;
        Ok(hydrate_common(&raw))
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ResponseCommon, HelixError> {
        let body = serde_json::to_value(body)?;
        let raw = self.transport.post_json(path, &body).await?;
        Ok(hydrate_common(&raw))
    }
}

impl std::fmt::Debug for HelixClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelixClient").finish_non_exhaustive()
    }
}
