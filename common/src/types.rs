//! アップロード結果の型定義
//!
//! - UploadResponse: サーバーが返すJSON（ワイヤ形式）
//! - UploadResult: 画面表示用に絶対URL化した結果

use serde::{Deserialize, Serialize};

/// サーバー応答のJSON本文
///
/// 両フィールドとも必須。欠けていればデシリアライズ自体が失敗する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// 処理済み画像のパス（サーバー相対またはURL）
    pub processed_file_url: String,
    /// 検出された甲虫の数
    pub beetle_count: i64,
}

/// アップロード結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    /// ベースURLを前置した処理済み画像のURL
    pub processed_image_url: String,
    pub beetle_count: i64,
}

impl UploadResult {
    /// 応答本文とベースURLから結果を組み立てる
    pub fn from_response(response: UploadResponse, base_url: &str) -> Self {
        Self {
            processed_image_url: crate::protocol::processed_image_url(base_url, &response.processed_file_url),
            beetle_count: response.beetle_count,
        }
    }
}
