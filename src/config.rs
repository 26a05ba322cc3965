use crate::error::{BeetleError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// サーバーURLを上書きする環境変数
pub const SERVER_URL_ENV: &str = "BEETLE_SERVER_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 解析サーバーのベースURL（例: http://192.168.0.10:5000）
    pub server_url: Option<String>,
    /// リクエスト全体のタイムアウト
    pub timeout_seconds: u64,
    /// 接続確立までのタイムアウト
    pub connect_timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: None,
            timeout_seconds: 30,
            connect_timeout_seconds: 10,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_json::from_str(&content).map_err(|e| {
                BeetleError::Config(format!("{} を読み込めません: {}", config_path.display(), e))
            })
        } else {
            Ok(Self::default())
        }
    }

    /// 壊れた設定ファイルでも既定値で続行する（`config` サブコマンドで修復できるように）
    pub fn load_or_default() -> Result<Self> {
        Ok(Self::load_or_default_from(&Self::config_path()?))
    }

    pub fn load_or_default_from(config_path: &Path) -> Self {
        Self::load_from(config_path).unwrap_or_else(|e| {
            warn!("{}; 既定値を使用します", e);
            Self::default()
        })
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| BeetleError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("beetle-counter").join("config.json"))
    }

    /// サーバーURLを解決
    ///
    /// 優先順位: 引数（CLIフラグ） > 環境変数 > 設定ファイル
    pub fn resolve_server_url(&self, flag: Option<&str>) -> Result<String> {
        let env = std::env::var(SERVER_URL_ENV).ok();
        pick_server_url(flag, env.as_deref(), self.server_url.as_deref())
    }

    pub fn set_server_url(&mut self, url: String) -> Result<()> {
        validate_server_url(&url)?;
        self.server_url = Some(url);
        self.save()
    }

    pub fn set_timeout(&mut self, seconds: u64) -> Result<()> {
        if seconds == 0 {
            return Err(BeetleError::Config("タイムアウトは1秒以上にしてください".into()));
        }
        self.timeout_seconds = seconds;
        self.save()
    }

    pub fn set_connect_timeout(&mut self, seconds: u64) -> Result<()> {
        if seconds == 0 {
            return Err(BeetleError::Config("接続タイムアウトは1秒以上にしてください".into()));
        }
        self.connect_timeout_seconds = seconds;
        self.save()
    }
}

fn pick_server_url(flag: Option<&str>, env: Option<&str>, file: Option<&str>) -> Result<String> {
    let url = [flag, env, file]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .ok_or(BeetleError::MissingServerUrl)?;

    validate_server_url(url)?;
    Ok(url.to_string())
}

fn validate_server_url(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(BeetleError::Config(format!(
            "サーバーURLは http:// または https:// で始めてください: {}",
            url
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_finite_timeouts() {
        let config = Config::default();
        assert!(config.server_url.is_none());
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.connect_timeout_seconds, 10);
    }

    #[test]
    fn test_pick_server_url_priority() {
        let url = pick_server_url(Some("http://flag"), Some("http://env"), Some("http://file")).unwrap();
        assert_eq!(url, "http://flag");

        let url = pick_server_url(None, Some("http://env"), Some("http://file")).unwrap();
        assert_eq!(url, "http://env");

        let url = pick_server_url(None, None, Some("http://file")).unwrap();
        assert_eq!(url, "http://file");
    }

    #[test]
    fn test_pick_server_url_skips_blank() {
        let url = pick_server_url(Some("  "), Some(""), Some("https://file:8443")).unwrap();
        assert_eq!(url, "https://file:8443");
    }

    #[test]
    fn test_pick_server_url_missing() {
        let result = pick_server_url(None, None, None);
        assert!(matches!(result, Err(BeetleError::MissingServerUrl)));
    }

    #[test]
    fn test_pick_server_url_rejects_scheme() {
        let result = pick_server_url(Some("192.168.0.10:5000"), None, None);
        assert!(matches!(result, Err(BeetleError::Config(_))));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            server_url: Some("http://10.0.0.2:5000".into()),
            timeout_seconds: 45,
            connect_timeout_seconds: 5,
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("none.json")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_load_corrupt_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        match Config::load_from(&path) {
            Err(BeetleError::Config(msg)) => assert!(msg.contains("config.json")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_or_default_recovers_from_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let config = Config::load_or_default_from(&path);
        assert_eq!(config, Config::default());

        // 既定値から上書き保存すれば修復される
        let repaired = Config {
            server_url: Some("http://host:5000".into()),
            ..config
        };
        repaired.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), repaired);
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        // 0秒は保存前に弾かれる
        let mut config = Config::default();
        assert!(matches!(config.set_timeout(0), Err(BeetleError::Config(_))));
        assert!(matches!(config.set_connect_timeout(0), Err(BeetleError::Config(_))));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"server_url": "http://host"}"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.server_url.as_deref(), Some("http://host"));
        assert_eq!(loaded.timeout_seconds, 30);
    }
}
