//! アップロードセッション（表示状態の持ち主）
//!
//! 画面の状態（選択画像・処理済み画像URL・甲虫の数）はここが唯一の書き手。
//! - 画像を選ぶたびに世代番号を進め、実行中のアップロードはキャンセルする
//! - 完了結果は世代番号が最新のときだけ反映する（古い結果は捨てる）
//! - 状態は watch チャネルで購読者（表示側）へ流す

use crate::picker::LocalImageHandle;
use crate::uploader::ImageUploader;
use beetle_counter_common::{UploadError, UploadResult};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Idle -> Requesting -> {Success, Failed}
#[derive(Debug, Clone, Default, PartialEq)]
pub enum UploadPhase {
    #[default]
    Idle,
    Requesting,
    Success(UploadResult),
    Failed(UploadError),
}

impl UploadPhase {
    /// Requesting以外
    pub fn is_settled(&self) -> bool {
        !matches!(self, UploadPhase::Requesting)
    }
}

/// 表示状態
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayState {
    /// 最後に発行したアップロードの世代番号
    pub generation: u64,
    /// 選択中の元画像
    pub image: Option<LocalImageHandle>,
    pub phase: UploadPhase,
}

impl DisplayState {
    pub fn processed_image_url(&self) -> Option<&str> {
        match &self.phase {
            UploadPhase::Success(result) => Some(&result.processed_image_url),
            _ => None,
        }
    }

    pub fn beetle_count(&self) -> Option<i64> {
        match &self.phase {
            UploadPhase::Success(result) => Some(result.beetle_count),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&UploadError> {
        match &self.phase {
            UploadPhase::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// 新しい画像の選択を記録し、その世代番号を返す
    fn begin(&mut self, image: LocalImageHandle) -> u64 {
        self.generation += 1;
        self.image = Some(image);
        self.phase = UploadPhase::Requesting;
        self.generation
    }

    /// 完了結果を反映する
    ///
    /// `generation` が現在の世代と一致しなければ何もせず false を返す。
    pub fn apply(&mut self, generation: u64, outcome: Result<UploadResult, UploadError>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.phase = match outcome {
            Ok(result) => UploadPhase::Success(result),
            Err(e) => UploadPhase::Failed(e),
        };
        true
    }

    /// 実行中のアップロードを無効化する（選択画像は残す）
    fn invalidate(&mut self) {
        self.generation += 1;
        if self.phase == UploadPhase::Requesting {
            self.phase = UploadPhase::Idle;
        }
    }
}

pub struct UploadSession {
    uploader: Arc<dyn ImageUploader>,
    state: Arc<watch::Sender<DisplayState>>,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl UploadSession {
    pub fn new(uploader: Arc<dyn ImageUploader>) -> Self {
        let (state, _) = watch::channel(DisplayState::default());
        Self {
            uploader,
            state: Arc::new(state),
            in_flight: Mutex::new(None),
        }
    }

    /// 表示側の購読口
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> DisplayState {
        self.state.borrow().clone()
    }

    /// 画像を選択してアップロードを開始する
    ///
    /// 前のアップロードが実行中ならキャンセルする。tokioランタイム内から呼ぶこと。
    pub fn pick(&self, image: LocalImageHandle) -> u64 {
        let token = CancellationToken::new();
        let mut generation = 0;

        {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(previous) = in_flight.replace(token.clone()) {
                previous.cancel();
            }
            self.state.send_modify(|s| generation = s.begin(image.clone()));
        }
        debug!("Picked {} (generation {})", image, generation);

        let uploader = Arc::clone(&self.uploader);
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!("Upload of {} cancelled (generation {})", image, generation);
                    return;
                }
                outcome = uploader.upload_image(&image) => outcome,
            };

            state.send_if_modified(|s| {
                let applied = s.apply(generation, outcome);
                if !applied {
                    debug!(
                        "Discarding stale result for {} (generation {}, current {})",
                        image, generation, s.generation
                    );
                }
                applied
            });
        });

        generation
    }

    /// 実行中のアップロードをキャンセルする
    pub fn cancel(&self) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(token) = in_flight.take() {
            token.cancel();
        }
        self.state.send_modify(DisplayState::invalidate);
    }

    /// Requesting以外になるまで待つ
    pub async fn wait_settled(&self) -> DisplayState {
        let mut rx = self.state.subscribe();
        let settled = rx.wait_for(|s| s.phase.is_settled()).await.map(|s| s.clone());
        match settled {
            Ok(state) => state,
            Err(_) => self.state(),
        }
    }
}

impl Drop for UploadSession {
    fn drop(&mut self) {
        let in_flight = self.in_flight.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(token) = in_flight.take() {
            token.cancel();
        }
    }
}
