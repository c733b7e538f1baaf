// =============================================================================
// 共通設定・定数モジュール
// =============================================================================
// Helix APIクライアントで使用する設定値・定数を定義
//
// 設定の読み込み元:
// - 環境変数（.envファイルがあれば dotenvy で読み込む）
// - 任意の.envファイル（プロセス環境を汚さずに読む）
// - 呼び出し側が直接構築
// =============================================================================

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::twitch::errors::HelixError;

/// HTTPリクエストのデフォルトタイムアウト（秒）
///
/// タイムアウトの制御はトランスポートに委譲する。
/// Helix APIがハングした場合でも呼び出し元を長時間待たせないための値。
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// Helix APIのベースURL
pub const HELIX_BASE_URL: &str = "https://api.twitch.tv/helix";

/// User-Agentヘッダー
pub const USER_AGENT: &str = concat!("helix-extensions/", env!("CARGO_PKG_VERSION"));

/// 環境変数名
pub const ENV_CLIENT_ID: &str = "TWITCH_CLIENT_ID";
pub const ENV_ACCESS_TOKEN: &str = "TWITCH_ACCESS_TOKEN";
pub const ENV_BASE_URL: &str = "TWITCH_HELIX_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "TWITCH_HTTP_TIMEOUT_SECS";

/// HTTPリクエストのデフォルトタイムアウト（Duration）
pub fn http_timeout() -> Duration {
    Duration::from_secs(HTTP_TIMEOUT_SECS)
}

/// Helixクライアント設定
#[derive(Clone)]
pub struct HelixConfig {
    /// アプリケーション（拡張機能）のClient ID
    pub client_id: String,
    /// Bearerトークン（アプリ/ユーザートークン、または署名済み拡張機能JWT）
    pub access_token: String,
    /// APIのベースURL（末尾スラッシュなし）
    pub base_url: String,
    /// リクエストタイムアウト
    pub timeout: Duration,
    /// User-Agentヘッダー
    pub user_agent: String,
}

impl HelixConfig {
    /// 必須項目のみを指定して設定を作成（その他はデフォルト値）
    pub fn new(client_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            access_token: access_token.into(),
            base_url: HELIX_BASE_URL.to_string(),
            timeout: http_timeout(),
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// ベースURLを差し替える（テスト用サーバーやプロキシ向け）
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// タイムアウトを差し替える
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 環境変数から設定を読み込む
    ///
    /// カレントディレクトリに.envがあれば先に読み込む（既存の環境変数は上書きしない）。
    pub fn from_env() -> Result<Self, HelixError> {
        if dotenvy::dotenv().is_ok() {
            log::debug!("Loaded .env file for Helix configuration");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 指定した.envファイルから設定を読み込む
    ///
    /// プロセスの環境変数は変更しない。
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, HelixError> {
        let mut vars = HashMap::new();
        for item in dotenvy::from_path_iter(path.as_ref())? {
            let (key, value) = item?;
            vars.insert(key, value);
        }
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// 任意のキー参照関数から設定を組み立てる
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HelixError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let client_id = non_empty(ENV_CLIENT_ID).ok_or(HelixError::MissingConfig(ENV_CLIENT_ID))?;
        let access_token =
            non_empty(ENV_ACCESS_TOKEN).ok_or(HelixError::MissingConfig(ENV_ACCESS_TOKEN))?;

        let mut config = Self::new(client_id, access_token);

        if let Some(base_url) = non_empty(ENV_BASE_URL) {
            config = config.with_base_url(base_url);
        }

        if let Some(raw) = non_empty(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config = config.with_timeout(Duration::from_secs(secs)),
                _ => {
                    // 不正値はデフォルトのまま
                    log::warn!(
                        "Ignoring invalid {} value: {:?} (using {}s)",
                        ENV_TIMEOUT_SECS,
                        raw,
                        HTTP_TIMEOUT_SECS
                    );
                }
            }
        }

        log::info!(
            "Helix configuration loaded (client id: {}, base url: {})",
            config.client_id,
            config.base_url
        );
        Ok(config)
    }
}

impl std::fmt::Debug for HelixConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelixConfig")
            .field("client_id", &self.client_id)
            .field("access_token", &crate::util::mask_secret(&self.access_token))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_http_timeout_duration() {
        assert_eq!(http_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_new_uses_defaults() {
        let config = HelixConfig::new("cid", "token");
        assert_eq!(config.base_url, HELIX_BASE_URL);
        assert_eq!(config.timeout, http_timeout());
        assert!(config.user_agent.starts_with("helix-extensions/"));
    }

    #[test]
    fn test_with_base_url_trims_trailing_slash() {
        let config = HelixConfig::new("cid", "token").with_base_url("http://127.0.0.1:1234/");
        assert_eq!(config.base_url, "http://127.0.0.1:1234");
    }

    #[test]
    fn test_from_lookup_requires_client_id() {
        let result = HelixConfig::from_lookup(lookup_from(&[(ENV_ACCESS_TOKEN, "token")]));
        assert!(matches!(
            result,
            Err(HelixError::MissingConfig(ENV_CLIENT_ID))
        ));
    }

    #[test]
    fn test_from_lookup_treats_blank_token_as_missing() {
        let result = HelixConfig::from_lookup(lookup_from(&[
            (ENV_CLIENT_ID, "cid"),
            (ENV_ACCESS_TOKEN, "   "),
        ]));
        assert!(matches!(
            result,
            Err(HelixError::MissingConfig(ENV_ACCESS_TOKEN))
        ));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = HelixConfig::from_lookup(lookup_from(&[
            (ENV_CLIENT_ID, "cid"),
            (ENV_ACCESS_TOKEN, "token"),
            (ENV_BASE_URL, "http://localhost:8080/mock/"),
            (ENV_TIMEOUT_SECS, "3"),
        ]))
        .unwrap();

        assert_eq!(config.client_id, "cid");
        assert_eq!(config.access_token, "token");
        assert_eq!(config.base_url, "http://localhost:8080/mock");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_from_lookup_ignores_invalid_timeout() {
        for raw in ["abc", "0", "-5"] {
            let config = HelixConfig::from_lookup(lookup_from(&[
                (ENV_CLIENT_ID, "cid"),
                (ENV_ACCESS_TOKEN, "token"),
                (ENV_TIMEOUT_SECS, raw),
            ]))
            .unwrap();
            assert_eq!(config.timeout, http_timeout(), "timeout value {:?}", raw);
        }
    }

    #[test]
    fn test_from_env_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}=file-client", ENV_CLIENT_ID).unwrap();
        writeln!(file, "{}=file-token", ENV_ACCESS_TOKEN).unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "{}=http://127.0.0.1:9999", ENV_BASE_URL).unwrap();
        file.flush().unwrap();

        let config = HelixConfig::from_env_file(file.path()).unwrap();
        assert_eq!(config.client_id, "file-client");
        assert_eq!(config.access_token, "file-token");
        assert_eq!(config.base_url, "http://127.0.0.1:9999");
    }

    #[test]
    fn test_debug_masks_token() {
        let config = HelixConfig::new("cid", "abcd1234567890wxyz");
        let debug = format!("{:?}", config);
        assert!(debug.contains("abcd***wxyz"));
        assert!(!debug.contains("abcd1234567890wxyz"));
    }
}
