use std::sync::LazyLock;
use std::time::Duration;

use super::{HttpClient, HttpResponse};

use bytes::Bytes;
use http::{Request, StatusCode};

/// The fixed per-request timeout, applied to both connection establishment
/// and the full response.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Builds a [`reqwest::Client`] configured the way this API expects:
/// both the connect timeout and the total request timeout set to 15 s.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn default_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(REQUEST_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()
}

impl HttpClient for reqwest::Client {
    type Response = reqwest::Response;
    type Error = reqwest::Error;

    /// Executes an `http::Request` by converting it into a
    /// `reqwest::Request` and sending it.
    async fn execute(&self, request: Request<Bytes>) -> Result<Self::Response, Self::Error> {
        let (parts, body) = request.into_parts();
        let reqwest_request = self
            .request(parts.method, parts.uri.to_string())
            .headers(parts.headers)
            .body(body)
            .build()?;

        reqwest::Client::execute(self, reqwest_request).await
    }
}

impl HttpClient for LazyLock<reqwest::Client> {
    type Response = reqwest::Response;
    type Error = reqwest::Error;

    async fn execute(&self, request: Request<Bytes>) -> Result<Self::Response, Self::Error> {
        let (parts, body) = request.into_parts();
        let reqwest_request = self
            .request(parts.method, parts.uri.to_string())
            .headers(parts.headers)
            .body(body)
            .build()?;

        reqwest::Client::execute(self, reqwest_request).await
    }
}

impl HttpResponse for reqwest::Response {
    type Error = reqwest::Error;

    fn status(&self) -> StatusCode {
        self.status()
    }

    async fn body(self) -> Result<Bytes, Self::Error> {
        self.bytes().await
    }
}

impl crate::Error for reqwest::Error {
    fn is_connectivity(&self) -> bool {
        self.is_connect() || self.is_timeout()
    }
}
