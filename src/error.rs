//! Error types and the [`Error`] trait.
//!
//! All errors in this crate implement the [`Error`] trait, which extends
//! [`std::error::Error`] with connectivity classification so the client
//! facade can translate transport-level outages into a uniform
//! "no connection" failure without knowing the concrete transport type.

use std::convert::Infallible;

use http::StatusCode;
use serde::Deserialize;
use snafu::{AsErrorSource, Snafu};

use crate::platform::MaybeSendSync;

/// Errors that may occur in the crate.
pub trait Error: std::error::Error + AsErrorSource + MaybeSendSync + 'static {
    /// If true, the failure was a connectivity problem (no network, DNS
    /// failure, refused connection, timeout) rather than a server verdict.
    fn is_connectivity(&self) -> bool;
}

impl Error for Infallible {
    fn is_connectivity(&self) -> bool {
        false
    }
}

/// The closed set of failures the server can hand back.
///
/// Every HTTP status the server plausibly returns maps to exactly one
/// variant; unmapped statuses fall to [`ApiError::Unknown`]. The display
/// strings are user-facing and shown verbatim by calling UI.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum ApiError {
    /// The server replied with success but an empty body.
    #[snafu(display("The server returned an empty response"))]
    NoData,
    /// A status code with no dedicated mapping.
    #[snafu(display("Something went wrong, please try again"))]
    Unknown,
    /// The request was malformed, or could not be constructed at all (400).
    #[snafu(display("The request could not be processed"))]
    BadRequest,
    /// The supplied credentials were rejected (401).
    #[snafu(display("Wrong login or password"))]
    InvalidCredentials,
    /// The requested resource does not exist (404).
    #[snafu(display("Nothing was found for this request"))]
    NotFound,
    /// The request body was too large, usually oversized photos (413).
    #[snafu(display("The attached photos are too large to upload"))]
    PayloadTooLarge,
    /// The server failed internally (500).
    #[snafu(display("The server is having trouble, please try again later"))]
    ServerError,
    /// An operation on the main user was attempted with no known user id.
    #[snafu(display("No user id is available for this action"))]
    InvalidUserId,
    /// A server-described failure outside the fixed status table.
    #[snafu(display("{message}"))]
    Custom {
        /// The effective status code resolved from the error envelope.
        code: u16,
        /// The server-provided message, shown to the user verbatim.
        message: String,
    },
}

impl ApiError {
    /// Maps a raw HTTP status to its taxonomy variant.
    #[must_use]
    pub fn from_status(status: StatusCode) -> Self {
        Self::from_code(status.as_u16())
    }

    /// Maps an effective status code (see [`ErrorEnvelope::real_code`]) to
    /// its taxonomy variant.
    #[must_use]
    pub fn from_code(code: u16) -> Self {
        match code {
            400 => Self::BadRequest,
            401 => Self::InvalidCredentials,
            404 => Self::NotFound,
            413 => Self::PayloadTooLarge,
            500 => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

impl Error for ApiError {
    fn is_connectivity(&self) -> bool {
        false
    }
}

/// The structured error body the server attaches to non-success responses.
///
/// All fields are optional on the wire; [`ErrorEnvelope::real_code`] resolves
/// them to one effective status code.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorEnvelope {
    /// Per-field validation failures, when present.
    #[serde(default)]
    pub errors: Vec<EnvelopeDetail>,
    /// A top-level human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// An application-level error code; `0` means "unset".
    #[serde(default)]
    pub code: Option<u16>,
    /// An echo of the HTTP status; `0` means "unset".
    #[serde(default)]
    pub status: Option<u16>,
    /// A server-side error category label.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// One entry of the envelope's `errors` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvelopeDetail {
    /// The offending field, when the failure is a validation error.
    #[serde(default)]
    pub field: Option<String>,
    /// The failure description.
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorEnvelope {
    /// Resolves the envelope to one effective status code.
    ///
    /// Priority: a non-zero `code`, else a non-zero `status`, else the raw
    /// HTTP status of the response. This is the single rule every error
    /// classification goes through.
    #[must_use]
    pub fn real_code(&self, http_status: StatusCode) -> u16 {
        match (self.code, self.status) {
            (Some(code), _) if code != 0 => code,
            (_, Some(status)) if status != 0 => status,
            _ => http_status.as_u16(),
        }
    }

    /// The best human-readable message the envelope carries, if any.
    #[must_use]
    pub fn best_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or_else(|| self.errors.iter().find_map(|e| e.message.as_deref()))
    }
}

/// Errors surfaced by [`GroundsClient`](crate::GroundsClient) methods.
///
/// The facade only ever re-maps, never swallows: a rejected credential on a
/// flagged operation becomes [`ClientError::ForceLogout`] after the session
/// is cleared, and a connectivity failure becomes
/// [`ClientError::NoConnection`]. Everything else propagates unchanged.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ClientError<ReqErr: Error + 'static, RespErr: Error + 'static> {
    /// The server rejected the request.
    #[snafu(display("{source}"))]
    Api {
        /// The classified server failure.
        source: ApiError,
    },
    /// The session was cleared after the server rejected stored credentials.
    #[snafu(display("Your session has expired, please log in again"))]
    ForceLogout,
    /// The request never reached the server.
    #[snafu(display("No internet connection"))]
    NoConnection,
    /// The HTTP request failed below the API layer.
    #[snafu(display("Failed to make HTTP request"))]
    Request {
        /// The underlying transport error.
        source: ReqErr,
    },
    /// The response body could not be read.
    #[snafu(display("Failed to read response body"))]
    ResponseBodyRead {
        /// The underlying error when reading the response body.
        source: RespErr,
    },
    /// A successful response did not decode into the expected shape.
    #[snafu(display("Failed to decode server response"))]
    Decode {
        /// The underlying deserialization error.
        source: serde_json::Error,
    },
}

impl<ReqErr: Error, RespErr: Error> From<ApiError> for ClientError<ReqErr, RespErr> {
    fn from(source: ApiError) -> Self {
        Self::Api { source }
    }
}

impl<ReqErr: Error, RespErr: Error> Error for ClientError<ReqErr, RespErr> {
    fn is_connectivity(&self) -> bool {
        match self {
            Self::NoConnection => true,
            Self::Request { source } => source.is_connectivity(),
            Self::ResponseBodyRead { source } => source.is_connectivity(),
            Self::Api { .. } | Self::ForceLogout | Self::Decode { .. } => false,
        }
    }
}
