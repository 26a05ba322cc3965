//! 甲虫カウント画像解析クライアント
//!
//! 選択した画像を解析サーバーへアップロードし、処理済み画像のURLと甲虫の数を受け取る。

pub mod cli;
pub mod config;
pub mod error;
pub mod picker;
pub mod record;
pub mod session;
pub mod uploader;

pub use beetle_counter_common::{UploadError, UploadResult};
