use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

use crate::error::ApiError;

/// Header the session layer in front of this service sets for authenticated users.
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Authenticated principal of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    /// Trimmed, lower-cased e-mail.
    pub email: String,
}

/// Axum extractor for SessionUser from request headers
///
/// A missing or blank `x-user-email` header rejects the request with
/// `401 UNAUTHORIZED` before any other extractor or upstream call runs.
#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_email(&parts.headers)
            .map(|email| SessionUser { email })
            .ok_or_else(ApiError::unauthorized)
    }
}

fn extract_email(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_EMAIL_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_lowercase())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue};

    #[test]
    fn test_email_is_normalized() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(USER_EMAIL_HEADER),
            HeaderValue::from_static("  Owner@Example.COM "),
        );
        assert_eq!(extract_email(&headers).as_deref(), Some("owner@example.com"));
    }

    #[test]
    fn test_missing_or_blank_email() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_email(&headers), None);

        headers.insert(
            HeaderName::from_static(USER_EMAIL_HEADER),
            HeaderValue::from_static("   "),
        );
        assert_eq!(extract_email(&headers), None);
    }
}
