//! 拡張機能JWT
//!
//! EBS（拡張機能バックエンド）からHelixの拡張機能エンドポイントを呼ぶ際の
//! Bearerトークンを作成・検証する。署名は拡張機能シークレット（base64）によるHS256。
//!
//! ## 注意事項
//! - シークレットはログに出力しない
//! - 有効期限は短く保つ（既定3分）

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::pubsub::PubSubPermissions;
use crate::twitch::errors::HelixError;
use crate::util::mask_secret;

/// ttl未指定時の有効期限
pub const DEFAULT_JWT_TTL: Duration = Duration::from_secs(3 * 60);

pub const ENV_EXTENSION_OWNER_ID: &str = "TWITCH_EXTENSION_OWNER_ID";
pub const ENV_EXTENSION_SECRET: &str = "TWITCH_EXTENSION_SECRET";

/// グローバル送信時の channel_id
pub const ALL_CHANNELS: &str = "all";

/// JWTのロール
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionRole {
    Broadcaster,
    Moderator,
    Viewer,
    /// EBSからの呼び出し
    External,
}

/// 拡張機能JWTクレーム
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionClaims {
    pub exp: i64,
    /// 視聴者がIDを共有していないトークンには含まれない
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub role: ExtensionRole,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub channel_id: String,
    /// フロントエンド発行のトークンにのみ含まれる
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opaque_user_id: Option<String>,
    #[serde(default)]
    pub pubsub_perms: PubSubPermissions,
}

/// 拡張機能JWTの署名・検証
pub struct ExtensionSigner {
    owner_id: String,
    secret: Vec<u8>,
}

impl ExtensionSigner {
    /// # Errors
    /// シークレットがbase64として不正な場合にエラーを返す
    pub fn new(owner_id: impl Into<String>, base64_secret: &str) -> Result<Self, HelixError> {
        let secret = STANDARD.decode(base64_secret.trim())?;
        Ok(Self {
            owner_id: owner_id.into(),
            secret,
        })
    }

    /// 環境変数（.env含む）から作成
    pub fn from_env() -> Result<Self, HelixError> {
        dotenvy::dotenv().ok();
        let owner_id = std::env::var(ENV_EXTENSION_OWNER_ID)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(HelixError::MissingConfig(ENV_EXTENSION_OWNER_ID))?;
        let secret = std::env::var(ENV_EXTENSION_SECRET)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(HelixError::MissingConfig(ENV_EXTENSION_SECRET))?;
        Self::new(owner_id, &secret)
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// クレームを組み立てる（ttlがゼロなら既定値）
    ///
    /// broadcaster_id が空の場合は全チャンネル（`all`）宛て。
    pub fn claims(
        &self,
        broadcaster_id: &str,
        role: ExtensionRole,
        permissions: PubSubPermissions,
        ttl: Duration,
    ) -> ExtensionClaims {
        let ttl = if ttl.is_zero() { DEFAULT_JWT_TTL } else { ttl };
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let channel_id = if broadcaster_id.is_empty() {
            ALL_CHANNELS
        } else {
            broadcaster_id
        };
        ExtensionClaims {
            exp: Utc::now().timestamp().saturating_add(ttl_secs),
            user_id: Some(self.owner_id.clone()),
            role,
            channel_id: channel_id.to_string(),
            opaque_user_id: None,
            pubsub_perms: permissions,
        }
    }

    pub fn sign(&self, claims: &ExtensionClaims) -> Result<String, HelixError> {
        let token = encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(&self.secret),
        )?;
        log::debug!(
            "Signed extension JWT (role: {:?}, channel: {}, token: {})",
            claims.role,
            claims.channel_id,
            mask_secret(&token)
        );
        Ok(token)
    }

    /// 署名と有効期限を検証してクレームを返す
    pub fn verify(&self, token: &str) -> Result<ExtensionClaims, HelixError> {
        let data = decode::<ExtensionClaims>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(data.claims)
    }
}

impl std::fmt::Debug for ExtensionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionSigner")
            .field("owner_id", &self.owner_id)
            .field("secret", &"***")
            .finish()
    }
}
