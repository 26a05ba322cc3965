//! エラー型定義

use thiserror::Error;

/// アップロード1回分の失敗分類
///
/// 表示状態に載せるため `Clone` にしてある。元のエラー（reqwest等）は文字列化して保持する。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// 接続拒否・タイムアウト・DNSなど通信層の失敗
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// 2xx以外のステータス（本文は扱わない）
    #[error("Server error: HTTP {0}")]
    ServerError(u16),

    /// 2xxだが本文が期待するJSONでない
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// 送信前にファイルを開けなかった
    #[error("Unreadable file {path}: {reason}")]
    UnreadableFile { path: String, reason: String },
}

impl UploadError {
    /// 利用者向けの表示メッセージ（分類ごとに異なる）
    pub fn user_message(&self) -> String {
        match self {
            UploadError::NetworkFailure(_) => {
                "Could not reach the server. Check the connection and pick the image again.".to_string()
            }
            UploadError::ServerError(status) => {
                format!("The server rejected the image (HTTP {}). Try again later.", status)
            }
            UploadError::MalformedResponse(_) => {
                "The server sent a response that could not be read.".to_string()
            }
            UploadError::UnreadableFile { path, .. } => {
                format!("The selected image could not be opened: {}", path)
            }
        }
    }

    /// HTTPステータスコード（ServerErrorのみ）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            UploadError::ServerError(status) => Some(*status),
            _ => None,
        }
    }
}
