//! Mapping of internal error kinds to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::backends::BackendError;
use crate::counter::{CounterError, StoreError, VisitorRequest};

/// Request body that could not be decoded as a visitor request.
///
/// Never surfaces to the caller: the handler counts the request as a view.
#[derive(Debug, Error)]
#[error("malformed visitor request: {0}")]
pub struct MalformedInput(#[from] serde_json::Error);

/// Decode a `POST /visitor` body. An empty body is the default request.
pub fn decode_visitor_request(body: &[u8]) -> Result<VisitorRequest, MalformedInput> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(VisitorRequest::default());
    }
    Ok(serde_json::from_slice(body)?)
}

/// Errors a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Counter(#[from] CounterError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Counter(CounterError::Apply(StoreError::Unavailable(_) | StoreError::Throttled)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Counter(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Backend(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::error!(status = %status, error = %self, "Request failed");
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::Action;

    #[test]
    fn test_decode_variants() {
        assert_eq!(decode_visitor_request(b"").unwrap().action, Action::View);
        assert_eq!(decode_visitor_request(b"  \n").unwrap().action, Action::View);
        assert_eq!(
            decode_visitor_request(br#"{"action":"download"}"#).unwrap().action,
            Action::Download
        );
        assert!(decode_visitor_request(b"{not json").is_err());
        assert!(decode_visitor_request(br#"{"action":null}"#).is_err());
    }

    #[test]
    fn test_status_mapping() {
        let unavailable = ApiError::from(CounterError::Apply(StoreError::Throttled));
        assert_eq!(unavailable.status(), StatusCode::SERVICE_UNAVAILABLE);

        let read_back = ApiError::from(CounterError::ReadBack(StoreError::Unavailable("down".into())));
        assert_eq!(read_back.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let malformed = ApiError::from(CounterError::Apply(StoreError::Malformed("bad".into())));
        assert_eq!(malformed.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let backend = ApiError::from(BackendError::Unavailable("listing".into()));
        assert_eq!(backend.status(), StatusCode::BAD_GATEWAY);
    }
}
