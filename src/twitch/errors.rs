use thiserror::Error;

/// ネットワーク呼び出し前にクライアント側で検出されるエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// broadcaster_id 指定時は developer / broadcaster セグメントのみ許可
    #[error("developer or broadcaster extension configuration segment type must be provided")]
    SegmentRequiresScopedType,
}

#[derive(Error, Debug)]
pub enum HelixError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Extension secret is not valid base64: {0}")]
    InvalidSecret(#[from] base64::DecodeError),

    #[error("Extension JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Failed to read env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("Missing configuration: {0}")]
    MissingConfig(&'static str),
}

impl HelixError {
    /// 送信前のバリデーションエラーかどうか
    pub fn is_validation(&self) -> bool {
        matches!(self, HelixError::Validation(_))
    }

    /// トランスポート起因（通信失敗・レスポンス解析失敗）のエラーかどうか
    pub fn is_transport(&self) -> bool {
        matches!(self, HelixError::HttpError(_) | HelixError::ParseError(_))
    }
}

impl From<HelixError> for String {
    fn from(err: HelixError) -> String {
        err.to_string()
    }
}
