//! DTOs for link shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::services::ShortLinkInfo;

/// Request to shorten a single URL.
///
/// A missing `originalUrl` deserializes as an empty string and is rejected
/// by validation, so the client sees a 400 rather than a body rejection.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    /// The URL to shorten. Hosts without a TLD (`localhost`) are accepted.
    #[serde(default)]
    #[validate(url(message = "Invalid URL format"))]
    pub original_url: String,
}

/// Created short link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub id: Uuid,
    pub short_url: String,
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<ShortLinkInfo> for ShortenResponse {
    fn from(info: ShortLinkInfo) -> Self {
        Self {
            id: info.id,
            short_url: info.short_url,
            short_code: info.short_code,
            original_url: info.original_url,
            created_at: info.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_camel_case() {
        let req: ShortenRequest =
            serde_json::from_str(r#"{"originalUrl": "https://example.com"}"#).unwrap();
        assert_eq!(req.original_url, "https://example.com");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_missing_url_fails_validation() {
        let req: ShortenRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_localhost_is_accepted() {
        let req = ShortenRequest {
            original_url: "http://localhost:8080/path".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_relative_url_is_rejected() {
        let req = ShortenRequest {
            original_url: "not a url".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
