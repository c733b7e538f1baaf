//! Helix 拡張機能エンドポイント
//!
//! - configuration: 設定セグメントの読み書き、必須設定バージョンの宣言
//! - pubsub: PubSub権限ビルダーとメッセージ送信
//! - jwt: EBS用の拡張機能JWT

pub mod configuration;
pub mod jwt;
pub mod pubsub;

pub use configuration::{
    ConfigurationReadQuery, ConfigurationSegment, ConfigurationWriteRequest,
    ExtensionConfigurations, RequiredConfigurationRequest, SegmentType,
};
pub use jwt::{ExtensionClaims, ExtensionRole, ExtensionSigner};
pub use pubsub::{ExtensionPubSub, PubSubPermissions, PubSubPublishTarget, SendPubSubMessageRequest};
