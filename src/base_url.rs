//! A validated API base URL.
//!
//! [`BaseUrl`] is a newtype over [`Uri`] that guarantees the URL has been
//! validated. It can be constructed from common string and URI types via
//! [`IntoBaseUrl`].

use std::convert::Infallible;

use http::{Uri, uri::InvalidUri};
use serde::{Deserialize, Serialize};

/// A validated API base URL.
///
/// This is a newtype over [`Uri`] which can be constructed from common
/// string and URI types via [`IntoBaseUrl`]. Once constructed, it can be
/// freely cloned and shared between clients without re-validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(Uri);

impl Serialize for BaseUrl {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for BaseUrl {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.into_base_url().map_err(serde::de::Error::custom)
    }
}

impl BaseUrl {
    /// Returns the inner [`Uri`].
    #[must_use]
    pub fn as_uri(&self) -> &Uri {
        &self.0
    }

    /// Appends an operation path to the base URL.
    ///
    /// The path is expected to start with `/`; a trailing slash on the base
    /// is collapsed so `https://host/api/` + `/users/1` yields
    /// `https://host/api/users/1`.
    ///
    /// # Errors
    ///
    /// Returns an error if the combined string is not a valid URI, which the
    /// client treats as a non-retryable bad request.
    pub fn join(&self, path: &str) -> Result<Uri, InvalidUri> {
        let base = self.0.to_string();
        format!("{}{path}", base.trim_end_matches('/')).parse()
    }
}

/// Conversion trait for types that can be turned into a [`BaseUrl`].
pub trait IntoBaseUrl {
    /// The error type returned if the conversion fails.
    type Error;

    /// Attempts to convert this value into a [`BaseUrl`].
    fn into_base_url(self) -> Result<BaseUrl, Self::Error>;
}

impl IntoBaseUrl for BaseUrl {
    type Error = Infallible;

    fn into_base_url(self) -> Result<BaseUrl, Self::Error> {
        Ok(self)
    }
}

impl IntoBaseUrl for Uri {
    type Error = Infallible;

    fn into_base_url(self) -> Result<BaseUrl, Self::Error> {
        Ok(BaseUrl(self))
    }
}

impl IntoBaseUrl for &str {
    type Error = InvalidUri;

    fn into_base_url(self) -> Result<BaseUrl, Self::Error> {
        self.parse::<Uri>().map(BaseUrl)
    }
}

impl IntoBaseUrl for String {
    type Error = InvalidUri;

    fn into_base_url(self) -> Result<BaseUrl, Self::Error> {
        self.parse::<Uri>().map(BaseUrl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_path_onto_base() {
        let base = "https://api.example.com".into_base_url().unwrap();
        let uri = base.join("/users/7/friends").unwrap();
        assert_eq!(uri.to_string(), "https://api.example.com/users/7/friends");
    }

    #[test]
    fn collapses_trailing_slash() {
        let base = "https://api.example.com/v1/".into_base_url().unwrap();
        let uri = base.join("/areas/3").unwrap();
        assert_eq!(uri.to_string(), "https://api.example.com/v1/areas/3");
    }

    #[test]
    fn rejects_unbuildable_url() {
        let base = "https://api.example.com".into_base_url().unwrap();
        assert!(base.join("/users/find/bad path").is_err());
    }
}
