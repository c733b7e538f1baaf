//! 拡張機能 PubSub
//!
//! 権限ビルダーは拡張機能JWTの `pubsub_perms` クレームを作るための純粋なヘルパー。
//! 送信時の権限チェックはサーバー側で行われ、クライアントでは行わない。

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::twitch::client::HelixClient;
use crate::twitch::errors::HelixError;
use crate::twitch::response::ResponseCommon;

const PUBSUB_PATH: &str = "/extensions/pubsub";

/// ウィスパー送信先のプレフィックス
pub const WHISPER_PREFIX: &str = "whisper-";

/// PubSub送信先
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PubSubPublishTarget {
    /// 任意の送信先（`*`）
    Generic,
    Broadcast,
    Global,
    /// 特定の視聴者セッション（`whisper-<opaque id>`）
    Whisper(String),
}

impl PubSubPublishTarget {
    pub fn whisper(opaque_id: impl Into<String>) -> Self {
        PubSubPublishTarget::Whisper(opaque_id.into())
    }

    /// ワイヤー上の文字列表現
    pub fn as_wire(&self) -> String {
        match self {
            PubSubPublishTarget::Generic => "*".to_string(),
            PubSubPublishTarget::Broadcast => "broadcast".to_string(),
            PubSubPublishTarget::Global => "global".to_string(),
            PubSubPublishTarget::Whisper(id) => format!("{}{}", WHISPER_PREFIX, id),
        }
    }
}

impl fmt::Display for PubSubPublishTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_wire())
    }
}

impl FromStr for PubSubPublishTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "*" => Ok(PubSubPublishTarget::Generic),
            "broadcast" => Ok(PubSubPublishTarget::Broadcast),
            "global" => Ok(PubSubPublishTarget::Global),
            // opaque id は空でも受け付ける（whisper("") と対称）
            other => match other.strip_prefix(WHISPER_PREFIX) {
                Some(id) => Ok(PubSubPublishTarget::Whisper(id.to_string())),
                None => Err(format!("unknown pubsub target: {}", other)),
            },
        }
    }
}

impl Serialize for PubSubPublishTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_wire())
    }
}

impl<'de> Deserialize<'de> for PubSubPublishTarget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// 拡張機能JWTの `pubsub_perms` クレーム
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubSubPermissions {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub send: Vec<PubSubPublishTarget>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub listen: Vec<PubSubPublishTarget>,
}

impl PubSubPermissions {
    fn send_only(target: PubSubPublishTarget) -> Self {
        Self {
            send: vec![target],
            listen: Vec::new(),
        }
    }

    /// 1つの視聴者セッションへのウィスパー送信権限
    pub fn whisper(opaque_id: &str) -> Self {
        Self::send_only(PubSubPublishTarget::whisper(opaque_id))
    }

    /// チャンネル全体へのブロードキャスト送信権限
    pub fn broadcast() -> Self {
        Self::send_only(PubSubPublishTarget::Broadcast)
    }

    /// 全チャンネル向けグローバル送信権限
    pub fn global() -> Self {
        Self::send_only(PubSubPublishTarget::Global)
    }

    /// 任意の送信先への送信権限
    pub fn generic() -> Self {
        Self::send_only(PubSubPublishTarget::Generic)
    }
}

/// PubSubメッセージ送信リクエスト
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendPubSubMessageRequest {
    /// グローバル送信時は空。空なら送信しない
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub broadcaster_id: String,
    /// 送信するメッセージ（通常は呼び出し側でシリアライズ済みのJSON文字列）
    pub message: String,
    pub target: Vec<PubSubPublishTarget>,
    pub is_global_broadcast: bool,
}

impl SendPubSubMessageRequest {
    /// チャンネルの全視聴者へ送信
    pub fn broadcast(broadcaster_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            broadcaster_id: broadcaster_id.into(),
            message: message.into(),
            target: vec![PubSubPublishTarget::Broadcast],
            is_global_broadcast: false,
        }
    }

    /// 拡張機能がインストールされた全チャンネルへ送信
    pub fn global(message: impl Into<String>) -> Self {
        Self {
            broadcaster_id: String::new(),
            message: message.into(),
            target: vec![PubSubPublishTarget::Global],
            is_global_broadcast: true,
        }
    }

    /// 1つの視聴者セッションへ送信
    pub fn whisper(
        broadcaster_id: impl Into<String>,
        opaque_id: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            broadcaster_id: broadcaster_id.into(),
            message: message.into(),
            target: vec![PubSubPublishTarget::whisper(opaque_id)],
            is_global_broadcast: false,
        }
    }
}

/// PubSub送信クライアント
#[derive(Debug, Clone)]
pub struct ExtensionPubSub {
    client: HelixClient,
}

impl ExtensionPubSub {
    pub fn new(client: HelixClient) -> Self {
        Self { client }
    }

    /// メッセージをPubSubリレーへ送信する
    ///
    /// 権限はリクエストのJWTに基づきサーバー側で検証される。
    pub async fn send_message(
        &self,
        request: &SendPubSubMessageRequest,
    ) -> Result<ResponseCommon, HelixError> {
        log::info!(
            "Sending extension PubSub message (broadcaster: {}, targets: {:?}, global: {}, {} bytes)",
            request.broadcaster_id,
            request.target,
            request.is_global_broadcast,
            request.message.len()
        );

        self.client.post_json(PUBSUB_PATH, request).await
    }
}
