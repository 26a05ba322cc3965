//! 画像ピッカーとの境界
//!
//! ピッカーが返すのは不透明な参照（`file://` URIまたはパス）。
//! アップロード前に PathResolver で読み取り可能なパスへ変換する。

use beetle_counter_common::UploadError;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// ユーザーが選択した画像への参照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalImageHandle(String);

impl LocalImageHandle {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn from_path(path: &Path) -> Self {
        Self(path.display().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocalImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PathBuf> for LocalImageHandle {
    fn from(path: PathBuf) -> Self {
        Self::from_path(&path)
    }
}

/// 参照 → 読み取り可能なパス
pub trait PathResolver: Send + Sync {
    fn resolve(&self, handle: &LocalImageHandle) -> Result<PathBuf, UploadError>;
}

/// `file://` URIと素のパスを扱う既定のリゾルバ
#[derive(Debug, Clone, Copy, Default)]
pub struct FileUriResolver;

impl PathResolver for FileUriResolver {
    fn resolve(&self, handle: &LocalImageHandle) -> Result<PathBuf, UploadError> {
        let reference = handle.as_str().trim();
        if reference.is_empty() {
            return Err(unreadable(reference, "empty image reference"));
        }

        if reference.starts_with("file:") {
            let url = Url::parse(reference).map_err(|e| unreadable(reference, &e.to_string()))?;
            return url
                .to_file_path()
                .map_err(|_| unreadable(reference, "not a local file URI"));
        }

        // Windowsのドライブ文字（C:\...）はスキームとみなさない
        if let Some((scheme, _)) = reference.split_once("://") {
            return Err(unreadable(
                reference,
                &format!("unsupported scheme: {}", scheme),
            ));
        }

        Ok(PathBuf::from(reference))
    }
}

fn unreadable(path: &str, reason: &str) -> UploadError {
    UploadError::UnreadableFile {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}
