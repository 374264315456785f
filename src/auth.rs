//! Basic-Auth credentials.
//!
//! The session store owns the one live [`Credentials`] value; the client
//! borrows it per-request to derive the `Authorization` header and never
//! persists it itself.

use base64::prelude::*;
use http::HeaderValue;
use http::header::InvalidHeaderValue;
use secrecy::{ExposeSecret as _, SecretString};

/// A login + password pair.
///
/// The password is held in a [`SecretString`] so it is zeroized on drop and
/// redacted from debug output.
#[derive(Debug, Clone)]
pub struct Credentials {
    login: String,
    password: SecretString,
}

impl Credentials {
    /// Creates credentials from a login and password.
    pub fn new(login: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }

    /// The login these credentials belong to.
    #[must_use]
    pub fn login(&self) -> &str {
        &self.login
    }

    /// Derives the `Authorization: Basic base64(login:password)` header.
    ///
    /// The header value is marked sensitive so transports know not to log it.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoded value is not a valid header value.
    pub fn basic_header(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        let raw = format!("{}:{}", self.login, self.password.expose_secret());
        let mut value = HeaderValue::from_str(&format!("Basic {}", BASE64_STANDARD.encode(raw)))?;
        value.set_sensitive(true);
        Ok(value)
    }
}
