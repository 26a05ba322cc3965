use beetle_counter_common::UploadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BeetleError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("サーバーURLが設定されていません。`beetle-counter config --set-server-url http://HOST:PORT` で設定してください")]
    MissingServerUrl,

    #[error("HTTPクライアント初期化エラー: {0}")]
    HttpClient(String),

    #[error("アップロードエラー: {0}")]
    Upload(#[from] UploadError),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BeetleError>;
