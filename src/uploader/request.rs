use beetle_counter_common::{UploadError, UPLOAD_CONTENT_TYPE, UPLOAD_FIELD_NAME};
use reqwest::multipart;
use std::path::Path;

/// 送信直前に組み立てるアップロード内容
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// 元ファイルのベース名
    pub file_name: String,
    pub content: Vec<u8>,
    pub mime_type: &'static str,
}

impl UploadRequest {
    /// ファイルを読み込んでリクエストを作る
    ///
    /// 画像の中身は検証しない。存在して読めることだけを確認する。
    pub async fn from_path(path: &Path) -> Result<Self, UploadError> {
        let content = tokio::fs::read(path)
            .await
            .map_err(|e| UploadError::UnreadableFile {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Ok(Self {
            file_name,
            content,
            mime_type: UPLOAD_CONTENT_TYPE,
        })
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// `file` パート1つだけのmultipartフォームに変換
    pub fn into_form(self) -> Result<multipart::Form, UploadError> {
        let part = multipart::Part::bytes(self.content)
            .file_name(self.file_name)
            .mime_str(self.mime_type)
            .map_err(|e| UploadError::NetworkFailure(format!("building multipart body: {}", e)))?;

        Ok(multipart::Form::new().part(UPLOAD_FIELD_NAME, part))
    }
}
