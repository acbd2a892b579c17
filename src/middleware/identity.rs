use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use std::convert::Infallible;

/// Header carrying the acting user's display name.
pub const NAME_HEADER: &str = "name";
/// Header carrying the acting user's role claim.
pub const ROLE_HEADER: &str = "user";

/// Identity claimed by the caller through request headers.
///
/// Nothing here is trusted: writes re-resolve the claim against the store
/// (see `service::identity`). Blank header values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActingIdentity {
    pub name: Option<String>,
    pub role: Option<String>,
}

impl ActingIdentity {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            role: Some(role.into()),
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            name: header_value(headers, NAME_HEADER),
            role: header_value(headers, ROLE_HEADER),
        }
    }
}

fn header_value(headers: &HeaderMap, key: &str) -> Option<String> {
    headers
        .get(key)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl<S> FromRequestParts<S> for ActingIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_and_trims_identity_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(NAME_HEADER, HeaderValue::from_static(" Alice "));
        headers.insert(ROLE_HEADER, HeaderValue::from_static("teacher"));
        assert_eq!(
            ActingIdentity::from_headers(&headers),
            ActingIdentity::new("Alice", "teacher")
        );
    }

    #[test]
    fn blank_headers_are_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(NAME_HEADER, HeaderValue::from_static("   "));
        let id = ActingIdentity::from_headers(&headers);
        assert_eq!(id.name, None);
        assert_eq!(id.role, None);
    }
}
