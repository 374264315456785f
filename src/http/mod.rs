//! HTTP client and response abstractions.
//!
//! This module defines traits that decouple the crate from any specific
//! HTTP implementation. Users provide their own [`HttpClient`] (e.g. backed
//! by `reqwest`, `hyper`, or a WASM-compatible client) and the crate
//! operates against these traits. The transport executes exactly one
//! attempt per request: retries and timeouts beyond the transport's own are
//! deliberately absent, and cancellation is cooperative (dropping the
//! calling future abandons the in-flight request without surfacing an
//! error).

#[cfg(all(not(target_arch = "wasm32"), feature = "http-client-reqwest-0_12"))]
mod reqwest_0_12;

#[cfg(all(not(target_arch = "wasm32"), feature = "http-client-reqwest-0_12"))]
pub use reqwest_0_12::default_client;

use bytes::Bytes;
use http::{Request, StatusCode};

use crate::platform::{MaybeSend, MaybeSendSync};

/// Defines the common interface for HTTP requests.
pub trait HttpClient: MaybeSendSync {
    /// The error type returned by the client for a failed request.
    type Error: crate::Error;

    /// The associated response type returned by this HTTP client.
    type Response: HttpResponse;

    /// Executes an HTTP request and returns an owned response.
    ///
    /// The request body is provided as [`Bytes`]; implementations must not
    /// retry internally.
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + MaybeSend;
}

/// Defines the common interface for HTTP responses.
pub trait HttpResponse: MaybeSendSync {
    /// The error type when getting the response body.
    type Error: crate::Error;

    /// Returns the HTTP status code of the response.
    fn status(&self) -> StatusCode;

    /// Consumes the response and asynchronously returns its body as
    /// [`Bytes`].
    fn body(self) -> impl Future<Output = Result<Bytes, Self::Error>> + MaybeSend;
}
