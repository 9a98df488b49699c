//! Header parsing utilities for upload requests.

use axum::http::HeaderMap;

use crate::error::ApiError;

/// Extension trait for convenient header parsing.
pub trait HeaderMapExt {
    /// Get a header value as a string, or return an error if missing.
    fn require_str(&self, name: &'static str) -> Result<&str, ApiError>;

    /// Get a header value as a string, returning None if missing or empty.
    fn get_str(&self, name: &str) -> Option<&str>;
}

impl HeaderMapExt for HeaderMap {
    fn require_str(&self, name: &'static str) -> Result<&str, ApiError> {
        self.get_str(name).ok_or(ApiError::MissingHeader(name))
    }

    fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

/// Content type without parameters (`image/png; q=1` -> `image/png`).
pub fn media_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get_str("Content-Type")
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue};

    fn make_headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            // HTTP header names are case-insensitive
            let header_name = HeaderName::try_from(*name).unwrap();
            headers.insert(header_name, HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    #[test]
    fn test_require_str_present() {
        let headers = make_headers(&[("file-name", "photo.png")]);
        assert_eq!(headers.require_str("File-Name").unwrap(), "photo.png");
    }

    #[test]
    fn test_require_str_missing() {
        let headers = HeaderMap::new();
        let err = headers.require_str("File-Name").unwrap_err();
        assert!(matches!(err, ApiError::MissingHeader("File-Name")));
    }

    #[test]
    fn test_get_str_blank_is_missing() {
        let headers = make_headers(&[("file-name", "   ")]);
        assert_eq!(headers.get_str("File-Name"), None);
    }

    #[test]
    fn test_media_type_strips_parameters() {
        let headers = make_headers(&[("content-type", "Image/PNG; charset=binary")]);
        assert_eq!(media_type(&headers).as_deref(), Some("image/png"));
        assert_eq!(media_type(&HeaderMap::new()), None);
    }
}
