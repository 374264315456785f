//! Imports for syntax extensions.

pub use crate::IntoBaseUrl as _;
pub use crate::error::Error as _;
pub use crate::http::{HttpClient as _, HttpResponse as _};
