//! Helix共通レスポンス（エンベロープ）
//!
//! すべての操作は成功・失敗を問わず `ResponseCommon` を返す。
//! 非2xxの場合もエラーにはせず、エラー情報をエンベロープに格納する。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::errors::HelixError;
use super::transport::HttpResponse;

/// レート制限ヘッダー（Ratelimit-Limit / Ratelimit-Remaining / Ratelimit-Reset）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub limit: Option<u32>,
    pub remaining: Option<u32>,
    /// リセット時刻（UNIX timestamp）
    pub reset: Option<i64>,
}

/// 全操作共通のレスポンスメタデータ
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseCommon {
    pub status_code: u16,
    pub rate_limit: RateLimit,
    /// ページネーションカーソル（データを返すエンドポイントのみ）
    pub cursor: Option<String>,
    pub error: Option<String>,
    pub error_status: Option<u16>,
    pub error_message: Option<String>,
}

impl ResponseCommon {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// 非2xxの場合に `HelixError::ApiError` へ変換する
    pub fn error_for_status(&self) -> Result<(), HelixError> {
        if self.is_success() {
            return Ok(());
        }
        let message = self
            .error_message
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_default();
        Err(HelixError::ApiError {
            status: self.status_code,
            message,
        })
    }
}

/// データ付きレスポンス
#[derive(Debug, Clone, PartialEq)]
pub struct HelixResponse<T> {
    pub common: ResponseCommon,
    /// 非2xx・空ボディの場合は None
    pub data: Option<T>,
}

/// 2xxボディ: `{"data": ..., "pagination": {"cursor": ...}}`
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: Option<T>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    cursor: Option<String>,
}

/// 非2xxボディ: `{"error": "...", "status": 400, "message": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    message: Option<String>,
}

/// ステータス・ヘッダー・エラーボディからエンベロープを組み立てる
pub(crate) fn hydrate_common(raw: &HttpResponse) -> ResponseCommon {
    let mut common = ResponseCommon {
        status_code: raw.status,
        rate_limit: raw.rate_limit,
        ..Default::default()
    };

    if common.is_success() {
        return common;
    }

    match serde_json::from_str::<ErrorBody>(&raw.body) {
        Ok(body) => {
            common.error = body.error;
            common.error_status = body.status.or(Some(raw.status));
            common.error_message = body.message;
        }
        Err(_) => {
            // JSON以外のエラーボディはそのままメッセージに格納
            common.error_status = Some(raw.status);
            if !raw.body.trim().is_empty() {
                common.error_message = Some(raw.body.clone());
            }
        }
    }

    log::warn!(
        "Helix API returned status {}: {}",
        raw.status,
        common.error_message.as_deref().unwrap_or("<no message>")
    );
    common
}

/// データ付きレスポンスをデコードする
///
/// 2xxでボディが壊れている場合のみエラー（ParseError）を返す。
pub(crate) fn decode_data<T: DeserializeOwned>(
    raw: &HttpResponse,
) -> Result<HelixResponse<T>, HelixError> {
    let mut common = hydrate_common(raw);

    if !common.is_success() || raw.body.trim().is_empty() {
        return Ok(HelixResponse { common, data: None });
    }

    let envelope: DataEnvelope<T> = serde_json::from_str(&raw.body)?;
    common.cursor = envelope
        .pagination
        .and_then(|p| p.cursor)
        .filter(|c| !c.is_empty());

    Ok(HelixResponse {
        common,
        data: envelope.data,
    })
}
