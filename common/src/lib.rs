//! Beetle Counter Common Library
//!
//! CLIと各フロントエンドで共有される型とユーティリティ:
//! - アップロード応答の型とパーサー
//! - アップロードエラーの分類
//! - エンドポイント・multipartの取り決め

pub mod types;
pub mod error;
pub mod parser;
pub mod protocol;

pub use types::{UploadResponse, UploadResult};
pub use error::UploadError;
pub use parser::{check_status, parse_upload_response};
pub use protocol::{processed_image_url, upload_url, UPLOAD_CONTENT_TYPE, UPLOAD_FIELD_NAME, UPLOAD_PATH};
