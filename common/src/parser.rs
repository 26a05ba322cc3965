//! アップロード応答パーサー
//!
//! HTTPステータスと本文から UploadResult / UploadError を判定する。
//! 部分的な成功は作らない: 両フィールドが揃わなければ MalformedResponse。

use crate::error::UploadError;
use crate::types::{UploadResponse, UploadResult};

/// ステータスコードを判定
///
/// 2xx以外は本文に関係なく ServerError。
pub fn check_status(status: u16) -> std::result::Result<(), UploadError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(UploadError::ServerError(status))
    }
}

/// 2xx応答の本文をパース
///
/// # Arguments
/// * `body` - 応答本文（バイト列のまま。UTF-8として不正なら MalformedResponse）
/// * `base_url` - 処理済み画像URLに前置するベースURL
///
/// # Returns
/// * `Ok(UploadResult)` - `processed_file_url`（文字列）と `beetle_count`（整数）が揃っている
/// * `Err(UploadError::MalformedResponse)` - JSONでない、またはフィールド欠落・型違い
///
/// # Examples
/// ```
/// use beetle_counter_common::parse_upload_response;
///
/// let body = br#"{"processed_file_url": "/x.png", "beetle_count": 3}"#;
/// let result = parse_upload_response(body, "http://host").unwrap();
/// assert_eq!(result.processed_image_url, "http://host/x.png");
/// assert_eq!(result.beetle_count, 3);
/// ```
pub fn parse_upload_response(body: &[u8], base_url: &str) -> std::result::Result<UploadResult, UploadError> {
    let response: UploadResponse = serde_json::from_slice(body)
        .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;
    Ok(UploadResult::from_response(response, base_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // check_status テスト
    // =============================================

    #[test]
    fn test_check_status_success_range() {
        assert!(check_status(200).is_ok());
        assert!(check_status(201).is_ok());
        assert!(check_status(299).is_ok());
    }

    #[test]
    fn test_check_status_failures() {
        assert_eq!(check_status(404), Err(UploadError::ServerError(404)));
        assert_eq!(check_status(500), Err(UploadError::ServerError(500)));
        assert_eq!(check_status(302), Err(UploadError::ServerError(302)));
        assert_eq!(check_status(199), Err(UploadError::ServerError(199)));
    }

    // =============================================
    // parse_upload_response テスト
    // =============================================

    #[test]
    fn test_parse_valid_response() {
        let body = br#"{"processed_file_url": "/x.png", "beetle_count": 3}"#;
        let result = parse_upload_response(body, "http://host").unwrap();
        assert_eq!(result.processed_image_url, "http://host/x.png");
        assert_eq!(result.beetle_count, 3);
    }

    #[test]
    fn test_parse_with_surrounding_whitespace() {
        let body = b"\n  {\"processed_file_url\": \"/y.jpg\", \"beetle_count\": 0}\n";
        let result = parse_upload_response(body, "http://host:5000").unwrap();
        assert_eq!(result.processed_image_url, "http://host:5000/y.jpg");
        assert_eq!(result.beetle_count, 0);
    }

    #[test]
    fn test_parse_missing_beetle_count() {
        let body = br#"{"processed_file_url": "/x.png"}"#;
        let result = parse_upload_response(body, "http://host");
        assert!(matches!(result, Err(UploadError::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_missing_processed_file_url() {
        let body = br#"{"beetle_count": 5}"#;
        let result = parse_upload_response(body, "http://host");
        assert!(matches!(result, Err(UploadError::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_wrong_types() {
        // 文字列の数値は受け付けない
        let body = br#"{"processed_file_url": "/x.png", "beetle_count": "3"}"#;
        assert!(matches!(
            parse_upload_response(body, "http://host"),
            Err(UploadError::MalformedResponse(_))
        ));

        // 小数も整数扱いしない
        let body = br#"{"processed_file_url": "/x.png", "beetle_count": 3.5}"#;
        assert!(matches!(
            parse_upload_response(body, "http://host"),
            Err(UploadError::MalformedResponse(_))
        ));

        let body = br#"{"processed_file_url": null, "beetle_count": 3}"#;
        assert!(matches!(
            parse_upload_response(body, "http://host"),
            Err(UploadError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_invalid_utf8() {
        // 不正なバイトを置換文字に変えて成功扱いにしない
        let body = b"{\"processed_file_url\": \"/x\xFF\xFE.png\", \"beetle_count\": 3}";
        let result = parse_upload_response(body, "http://host");
        assert!(matches!(result, Err(UploadError::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_not_json() {
        let result = parse_upload_response(b"<html>ok</html>", "http://host");
        assert!(matches!(result, Err(UploadError::MalformedResponse(_))));

        let result = parse_upload_response(b"", "http://host");
        assert!(matches!(result, Err(UploadError::MalformedResponse(_))));
    }
}
