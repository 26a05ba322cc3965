//! アップロード結果の保存
//!
//! `upload --output` で書き出すJSON。

use crate::error::Result;
use crate::picker::LocalImageHandle;
use beetle_counter_common::UploadResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRecord {
    /// 元画像
    pub image: LocalImageHandle,
    pub processed_image_url: String,
    pub beetle_count: i64,
    pub uploaded_at: DateTime<Utc>,
}

impl UploadRecord {
    pub fn new(image: LocalImageHandle, result: &UploadResult) -> Self {
        Self {
            image,
            processed_image_url: result.processed_image_url.clone(),
            beetle_count: result.beetle_count,
            uploaded_at: Utc::now(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    #[cfg(test)]
    fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
