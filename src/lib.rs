//! Twitch Helix 拡張機能APIクライアント
//!
//! ```no_run
//! use helix_extensions::{ConfigurationReadQuery, HelixClient, HelixConfig, SegmentType};
//!
//! # async fn run() -> Result<(), helix_extensions::HelixError> {
//! let config = HelixConfig::from_env()?;
//! let client = HelixClient::from_config(&config)?;
//!
//! let response = client
//!     .configurations()
//!     .get_segments(&ConfigurationReadQuery {
//!         extension_id: "my-extension".to_string(),
//!         segments: vec![SegmentType::Global],
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("{:?}", response.data);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod twitch;
pub mod util; // doctestのためpubにする

pub use config::HelixConfig;
pub use twitch::extensions::{
    ConfigurationReadQuery, ConfigurationSegment, ConfigurationWriteRequest, ExtensionClaims,
    ExtensionConfigurations, ExtensionPubSub, ExtensionRole, ExtensionSigner, PubSubPermissions,
    PubSubPublishTarget, RequiredConfigurationRequest, SegmentType, SendPubSubMessageRequest,
};
pub use twitch::{
    HelixClient, HelixError, HelixResponse, HelixTransport, HttpResponse, RateLimit,
    ReqwestTransport, ResponseCommon, ValidationError,
};
