//! 解析サーバーへのHTTPクライアント
//!
//! `POST <base-url>/upload` に画像を送り、応答JSONから UploadResult を作る。
//! 失敗は1回だけ報告し、自動再試行はしない。

use super::request::UploadRequest;
use crate::config::Config;
use crate::error::{BeetleError, Result};
use crate::picker::{FileUriResolver, LocalImageHandle, PathResolver};
use beetle_counter_common::{check_status, parse_upload_response, upload_url, UploadError, UploadResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// タイムアウト設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    /// リクエスト全体（送信〜応答本文の受信）の上限
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&Config> for ClientOptions {
    fn from(config: &Config) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_seconds.max(1)),
            connect_timeout: Duration::from_secs(config.connect_timeout_seconds.max(1)),
        }
    }
}

#[derive(Clone)]
pub struct UploadClient {
    http: reqwest::Client,
    base_url: String,
    resolver: Arc<dyn PathResolver>,
}

impl std::fmt::Debug for UploadClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl UploadClient {
    pub fn new(base_url: impl Into<String>, options: &ClientOptions) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .connect_timeout(options.connect_timeout)
            .build()
            .map_err(|e| BeetleError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            resolver: Arc::new(FileUriResolver),
        })
    }

    /// 設定ファイル・環境変数・CLIフラグからクライアントを作る
    pub fn from_config(config: &Config, server_url: Option<&str>) -> Result<Self> {
        let base_url = config.resolve_server_url(server_url)?;
        Self::new(base_url, &ClientOptions::from(config))
    }

    /// ピッカー参照の解決方法を差し替える
    pub fn with_resolver(mut self, resolver: Arc<dyn PathResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self) -> String {
        upload_url(&self.base_url)
    }

    /// 参照を解決してファイルを読み込む
    pub async fn build_request(&self, handle: &LocalImageHandle) -> std::result::Result<UploadRequest, UploadError> {
        let path = self.resolver.resolve(handle)?;
        UploadRequest::from_path(&path).await
    }

    /// 1回分のアップロードと応答パース
    pub async fn upload(&self, handle: &LocalImageHandle) -> std::result::Result<UploadResult, UploadError> {
        let request = self.build_request(handle).await?;
        info!(
            "Uploading {} ({} bytes) to {}",
            request.file_name,
            request.len(),
            self.endpoint()
        );

        let outcome = self.send(request).await;
        match &outcome {
            Ok(result) => info!(
                "Upload finished: {} beetle(s), processed image {}",
                result.beetle_count, result.processed_image_url
            ),
            Err(e) => warn!("Upload of {} failed: {}", handle, e),
        }
        outcome
    }

    /// コールバック版。tokioタスク上で実行し、`on_complete` をちょうど1回呼ぶ
    ///
    /// tokioランタイム内から呼ぶこと。
    pub fn upload_with_callback<F>(&self, handle: LocalImageHandle, on_complete: F) -> JoinHandle<()>
    where
        F: FnOnce(std::result::Result<UploadResult, UploadError>) + Send + 'static,
    {
        let client = self.clone();
        tokio::spawn(async move {
            let outcome = client.upload(&handle).await;
            on_complete(outcome);
        })
    }

    async fn send(&self, request: UploadRequest) -> std::result::Result<UploadResult, UploadError> {
        let form = request.into_form()?;

        let response = self
            .http
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::NetworkFailure(describe_transport_error(&e)))?;

        let status = response.status().as_u16();
        if let Err(e) = check_status(status) {
            // 本文は表示しない
            debug!("Server responded with HTTP {}", status);
            return Err(e);
        }

        // 本文はバイト列のまま検証する（不正なUTF-8は MalformedResponse）
        let body = response
            .bytes()
            .await
            .map_err(|e| UploadError::NetworkFailure(describe_transport_error(&e)))?;

        parse_upload_response(&body, &self.base_url)
    }
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {}", e)
    } else if e.is_connect() {
        format!("could not connect: {}", e)
    } else {
        e.to_string()
    }
}
