//! 拡張機能 Configuration Service
//!
//! 設定は global / developer / broadcaster の3セグメントに分かれて保存される。
//! https://dev.twitch.tv/docs/extensions/reference/#set-extension-configuration-segment

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::twitch::client::HelixClient;
use crate::twitch::errors::{HelixError, ValidationError};
use crate::twitch::response::{HelixResponse, ResponseCommon};

const CONFIGURATIONS_PATH: &str = "/extensions/configurations";
const REQUIRED_CONFIGURATION_PATH: &str = "/extensions/configurations/required_configuration";

/// 設定セグメント種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentType {
    Global,
    Developer,
    Broadcaster,
}

impl SegmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentType::Global => "global",
            SegmentType::Developer => "developer",
            SegmentType::Broadcaster => "broadcaster",
        }
    }

    /// broadcaster_id と組み合わせられるセグメントかどうか
    pub fn is_channel_scoped(&self) -> bool {
        match self {
            SegmentType::Developer | SegmentType::Broadcaster => true,
            SegmentType::Global => false,
        }
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SegmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(SegmentType::Global),
            "developer" => Ok(SegmentType::Developer),
            "broadcaster" => Ok(SegmentType::Broadcaster),
            other => Err(format!("unknown configuration segment: {}", other)),
        }
    }
}

/// セグメント書き込みリクエスト
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationWriteRequest {
    pub segment: SegmentType,
    #[serde(rename = "extension-id", alias = "extension_id")]
    pub extension_id: String,
    /// developer / broadcaster セグメントの場合のみ指定。空なら送信しない
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub broadcaster_id: String,
    pub version: String,
    pub content: String,
}

impl ConfigurationWriteRequest {
    /// broadcaster_id を指定する場合、セグメントは developer か broadcaster でなければならない
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.broadcaster_id.is_empty() && !self.segment.is_channel_scoped() {
            return Err(ValidationError::SegmentRequiresScopedType);
        }
        Ok(())
    }
}

/// 保存済みの設定セグメント（レスポンス専用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationSegment {
    pub segment: SegmentType,
    #[serde(default)]
    pub broadcaster_id: Option<String>,
    pub version: String,
    pub content: String,
}

/// セグメント取得クエリ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationReadQuery {
    pub extension_id: String,
    pub broadcaster_id: String,
    /// 空の場合はサーバー側のデフォルト範囲
    pub segments: Vec<SegmentType>,
}

impl ConfigurationReadQuery {
    /// クエリパラメータに変換（segment は値ごとに繰り返す）
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("extension_id", self.extension_id.clone())];
        if !self.broadcaster_id.is_empty() {
            query.push(("broadcaster_id", self.broadcaster_id.clone()));
        }
        query.extend(
            self.segments
                .iter()
                .map(|segment| ("segment", segment.as_str().to_string())),
        );
        query
    }
}

/// 必須設定バージョンの宣言
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredConfigurationRequest {
    pub extension_id: String,
    pub extension_version: String,
    pub required_configuration: String,
}

/// Configuration Service クライアント
#[derive(Debug, Clone)]
pub struct ExtensionConfigurations {
    client: HelixClient,
}

impl ExtensionConfigurations {
    pub fn new(client: HelixClient) -> Self {
        Self { client }
    }

    /// セグメントの内容とバージョンを置き換える（PUT）
    ///
    /// バリデーションに失敗した場合は通信せずにエラーを返す。
    pub async fn set_segment(
        &self,
        request: &ConfigurationWriteRequest,
    ) -> Result<ResponseCommon, HelixError> {
        if let Err(e) = request.validate() {
            log::warn!(
                "Rejected configuration write for extension {}: {} (segment: {}, broadcaster: {})",
                request.extension_id,
                e,
                request.segment,
                request.broadcaster_id
            );
            return Err(e.into());
        }

        log::info!(
            "Setting extension configuration segment: {} (extension: {}, version: {})",
            request.segment,
            request.extension_id,
            request.version
        );

        self.client.put_json(CONFIGURATIONS_PATH, request).await
    }

    /// 条件に合うセグメントを取得する
    ///
    /// 並び順はサーバーが返した順のまま。
    pub async fn get_segments(
        &self,
        query: &ConfigurationReadQuery,
    ) -> Result<HelixResponse<Vec<ConfigurationSegment>>, HelixError> {
        log::info!(
            "Fetching extension configuration segments (extension: {}, segments: {:?})",
            query.extension_id,
            query.segments
        );

        let response = self
            .client
            .get::<Vec<ConfigurationSegment>>(CONFIGURATIONS_PATH, &query.to_query())
            .await?;

        if let Some(segments) = &response.data {
            log::debug!("Received {} configuration segments", segments.len());
        }
        Ok(response)
    }

    /// 拡張機能の有効化に必要な設定バージョンを宣言する
    pub async fn set_required_configuration(
        &self,
        request: &RequiredConfigurationRequest,
    ) -> Result<ResponseCommon, HelixError> {
        log::info!(
            "Setting required configuration {:?} for extension {} v{}",
            request.required_configuration,
            request.extension_id,
            request.extension_version
        );

        self.client
            .put_json(REQUIRED_CONFIGURATION_PATH, request)
            .await
    }
}
