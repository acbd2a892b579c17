use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::SchoolError;

/// JSON body extractor for criteria and payloads.
///
/// Unlike `axum::Json` it does not require a content type, treats an empty
/// body as `{}` (so a bare search request means "no criteria"), and reports
/// malformed input as a `SchoolError::Validation`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = SchoolError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| {
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    SchoolError::PayloadTooLarge(rejection.body_text())
                } else {
                    SchoolError::validation(rejection.body_text())
                }
            })?;

        let raw: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes
        };

        serde_json::from_slice(raw)
            .map(JsonBody)
            .map_err(|e| SchoolError::validation(format!("Invalid request body: {e}")))
    }
}
