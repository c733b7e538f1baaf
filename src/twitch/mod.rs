//! Twitch Helix API クライアントモジュール
//!
//! 各操作は1回のリクエスト/レスポンスで完結し、クライアントは状態を持たない。
//! リトライ・キャッシュは行わない。

pub mod client;
pub mod errors;
pub mod extensions;
pub mod response;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::HelixClient;
pub use errors::{HelixError, ValidationError};
pub use response::{HelixResponse, RateLimit, ResponseCommon};
pub use transport::{HelixTransport, HttpResponse, ReqwestTransport};
