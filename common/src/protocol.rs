//! サーバーとのアップロード取り決め
//!
//! `POST <base-url>/upload` に multipart/form-data で1パートだけ送る。

/// アップロード先のパス
pub const UPLOAD_PATH: &str = "/upload";

/// multipartのフィールド名
pub const UPLOAD_FIELD_NAME: &str = "file";

/// パートのContent-Type（実際の判定はサーバー側）
pub const UPLOAD_CONTENT_TYPE: &str = "image/*";

/// ベースURLからアップロード先URLを作る
///
/// 末尾のスラッシュは1つに畳む。
///
/// # Examples
/// ```
/// use beetle_counter_common::upload_url;
///
/// assert_eq!(upload_url("http://host:5000/"), "http://host:5000/upload");
/// ```
pub fn upload_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), UPLOAD_PATH)
}

/// 処理済み画像の表示用URL
///
/// ベースURLと `processed_file_url` をそのまま連結する（重複スラッシュの正規化はしない）。
pub fn processed_image_url(base_url: &str, processed_file_url: &str) -> String {
    format!("{}{}", base_url, processed_file_url)
}
