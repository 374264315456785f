//! Pure response classification.
//!
//! Both entry points are pure functions of `(status, body)`. The typed
//! decode path turns a 200 with a JSON body into a value; the status-only
//! path answers "did it succeed". Every non-success outcome becomes a typed
//! [`ApiError`], derived from the server's error envelope when one decodes
//! and from the raw status otherwise. Nothing is recovered locally; errors
//! propagate unchanged to the client facade.

use bytes::Bytes;
use http::StatusCode;
use serde::de::DeserializeOwned;
use snafu::{ResultExt as _, Snafu};

use crate::error::{ApiError, ErrorEnvelope};

/// Failures of the typed decode path.
#[derive(Debug, Snafu)]
pub enum ClassifyError {
    /// The server rejected the request.
    #[snafu(display("{source}"))]
    Api {
        /// The classified server failure.
        source: ApiError,
    },
    /// A successful response did not decode into the expected shape.
    #[snafu(display("Failed to decode server response"))]
    Decode {
        /// The underlying deserialization error.
        source: serde_json::Error,
    },
}

/// Decodes a success body into `T`.
///
/// A 200 with a non-empty body decodes as JSON; a 200 with an empty body is
/// [`ApiError::NoData`]; any other status classifies via
/// [`classify_failure`].
///
/// # Errors
///
/// Returns [`ClassifyError::Api`] for non-success statuses and empty
/// bodies, [`ClassifyError::Decode`] when the JSON does not match `T`.
pub fn decode_body<T: DeserializeOwned>(
    status: StatusCode,
    body: &Bytes,
) -> Result<T, ClassifyError> {
    if status != StatusCode::OK {
        return Err(classify_failure(status, body)).context(ApiSnafu);
    }
    if body.is_empty() {
        return Err(ApiError::NoData).context(ApiSnafu);
    }
    serde_json::from_slice(body).context(DecodeSnafu)
}

/// The status-only path for "did it succeed" operations.
///
/// A 200 is success regardless of body; anything else is the status-mapped
/// typed error. There is no `false` outcome; a non-success status is
/// always an error.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-200 status.
pub fn expect_ok(status: StatusCode, body: &Bytes) -> Result<(), ApiError> {
    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(classify_failure(status, body))
    }
}

/// Maps a failed response to its [`ApiError`].
///
/// When the body decodes as the server's [`ErrorEnvelope`], its
/// [`real_code`](ErrorEnvelope::real_code) drives the mapping; an unmapped
/// code with a server message becomes [`ApiError::Custom`]. When the
/// envelope does not decode, the raw HTTP status maps directly.
#[must_use]
pub fn classify_failure(status: StatusCode, body: &Bytes) -> ApiError {
    let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(body) else {
        return ApiError::from_status(status);
    };

    let code = envelope.real_code(status);
    match ApiError::from_code(code) {
        ApiError::Unknown => match envelope.best_message() {
            Some(message) => ApiError::Custom {
                code,
                message: message.to_string(),
            },
            None => ApiError::Unknown,
        },
        mapped => mapped,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pong {
        ok: bool,
    }

    #[test]
    fn ok_with_json_decodes() {
        let body = Bytes::from_static(b"{\"ok\":true}");
        let pong: Pong = decode_body(StatusCode::OK, &body).unwrap();
        assert_eq!(pong, Pong { ok: true });
    }

    #[test]
    fn ok_with_empty_body_is_no_data() {
        let result = decode_body::<Pong>(StatusCode::OK, &Bytes::new());
        assert!(matches!(
            result,
            Err(ClassifyError::Api {
                source: ApiError::NoData
            })
        ));
    }

    #[test]
    fn ok_with_mismatched_json_is_a_decode_error() {
        let body = Bytes::from_static(b"{\"unexpected\":1}");
        let result = decode_body::<Pong>(StatusCode::OK, &body);
        assert!(matches!(result, Err(ClassifyError::Decode { .. })));
    }

    #[test]
    fn statuses_map_through_the_fixed_table() {
        assert_eq!(
            classify_failure(StatusCode::UNAUTHORIZED, &Bytes::new()),
            ApiError::InvalidCredentials
        );
        assert_eq!(
            classify_failure(StatusCode::NOT_FOUND, &Bytes::new()),
            ApiError::NotFound
        );
        assert_eq!(
            classify_failure(StatusCode::IM_A_TEAPOT, &Bytes::new()),
            ApiError::Unknown
        );
    }

    #[test]
    fn envelope_code_overrides_http_status() {
        let body = Bytes::from_static(b"{\"code\":400,\"status\":404}");
        assert_eq!(
            classify_failure(StatusCode::NOT_FOUND, &body),
            ApiError::BadRequest
        );
    }

    #[test]
    fn zero_code_falls_back_to_envelope_status() {
        let body = Bytes::from_static(b"{\"code\":0,\"status\":404}");
        assert_eq!(
            classify_failure(StatusCode::INTERNAL_SERVER_ERROR, &body),
            ApiError::NotFound
        );
    }

    #[test]
    fn unmapped_code_with_message_becomes_custom() {
        let body = Bytes::from_static(b"{\"code\":422,\"message\":\"email already taken\"}");
        assert_eq!(
            classify_failure(StatusCode::BAD_REQUEST, &body),
            ApiError::Custom {
                code: 422,
                message: "email already taken".to_string()
            }
        );
    }

    #[test]
    fn expect_ok_never_returns_a_false_success() {
        assert!(expect_ok(StatusCode::OK, &Bytes::new()).is_ok());
        assert_eq!(
            expect_ok(StatusCode::INTERNAL_SERVER_ERROR, &Bytes::new()),
            Err(ApiError::ServerError)
        );
    }
}
