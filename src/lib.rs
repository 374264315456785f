//! Implements a typed client for the workout-grounds social fitness API.
//!
//! The API surface is a closed set of operations (accounts, friends,
//! grounds, events, dialogs, journals) described by the [`Operation`]
//! enum. Every operation maps deterministically to a wire-level request
//! shape via [`Operation::descriptor`], and [`GroundsClient`] composes
//! that mapping with credential injection, transport, and response
//! classification into one async method per domain action.

#![forbid(unsafe_code)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]

pub mod auth;
mod base_url;
pub mod client;
pub mod encoding;
mod error;
pub mod forms;
pub mod http;
pub mod models;
pub mod operation;
pub mod platform;
pub mod prelude;
pub mod response;
pub mod session;

pub use auth::Credentials;
pub use base_url::{BaseUrl, IntoBaseUrl};
pub use client::{GroundsClient, SocialUpdates};
pub use error::{ApiError, ClientError, EnvelopeDetail, Error, ErrorEnvelope};
pub use operation::{Operation, RequestDescriptor};
pub use session::{MemoryStore, SessionStore};

/// Re-export of parts of the `secrecy` crate.
pub mod secrecy {
    pub use ::secrecy::{ExposeSecret, SecretString};
}

pub use bytes::Bytes;
