//! 画像アップロードモジュール
//!
//! 1回の呼び出しで「アップロード → 応答パース」を1サイクルだけ行う。
//! 呼び出し間で状態は共有しない（再試行・キュー・キャッシュなし）。

mod client;
mod request;

pub use client::{ClientOptions, UploadClient};
pub use request::UploadRequest;

use crate::picker::LocalImageHandle;
use async_trait::async_trait;
use beetle_counter_common::{UploadError, UploadResult};

/// セッションから見たアップロード処理
///
/// 本番は UploadClient、テストでは差し替え用の実装を使う。
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload_image(&self, handle: &LocalImageHandle) -> Result<UploadResult, UploadError>;
}

#[async_trait]
impl ImageUploader for UploadClient {
    async fn upload_image(&self, handle: &LocalImageHandle) -> Result<UploadResult, UploadError> {
        self.upload(handle).await
    }
}
