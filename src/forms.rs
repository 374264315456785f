//! Form payloads submitted by edit screens.
//!
//! These are plain value records: a screen constructs one from an empty
//! template or from an existing server object, mutates it while the user
//! edits, submits it once through the client, and discards it. Each form
//! flattens to ordered `(key, value)` parameters for the body encoders;
//! park and event forms additionally carry pending photo attachments.

use bytes::Bytes;

use crate::encoding::Params;
use crate::models::{Event, Park, User};

/// A pending media attachment: raw bytes plus the metadata the multipart
/// encoder needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// The multipart form field key, e.g. `photo`.
    pub field: String,
    /// The filename reported to the server.
    pub filename: String,
    /// The MIME type of the payload, e.g. `image/jpeg`.
    pub mime: String,
    /// The raw file contents.
    pub data: Bytes,
}

impl MediaFile {
    /// A JPEG attachment under the conventional `photo` field key.
    #[must_use]
    pub fn jpeg(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            field: "photo".into(),
            filename: filename.into(),
            mime: "image/jpeg".into(),
            data: data.into(),
        }
    }
}

/// Data entered on the registration screen.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    /// The display name for the new account.
    pub name: String,
    /// The sign-in email.
    pub email: String,
    /// The chosen password, submitted once and discarded with the form.
    pub password: String,
    /// An optional home country.
    pub country: Option<String>,
}

impl RegistrationForm {
    pub(crate) fn params(&self) -> Params {
        let mut params = vec![
            ("name".to_string(), self.name.clone()),
            ("email".to_string(), self.email.clone()),
            ("password".to_string(), self.password.clone()),
        ];
        if let Some(country) = &self.country {
            params.push(("country".to_string(), country.clone()));
        }
        params
    }
}

/// Data entered on the profile edit screen.
#[derive(Debug, Clone, Default)]
pub struct EditUserForm {
    /// The display name.
    pub name: String,
    /// The contact email.
    pub email: Option<String>,
    /// Free-form profile text.
    pub about: Option<String>,
    /// The home country.
    pub country: Option<String>,
}

impl EditUserForm {
    /// Pre-fills the form from a previously fetched profile.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            about: user.about.clone(),
            country: user.country.clone(),
        }
    }

    pub(crate) fn params(&self) -> Params {
        let mut params = vec![("name".to_string(), self.name.clone())];
        if let Some(email) = &self.email {
            params.push(("email".to_string(), email.clone()));
        }
        if let Some(about) = &self.about {
            params.push(("about".to_string(), about.clone()));
        }
        if let Some(country) = &self.country {
            params.push(("country".to_string(), country.clone()));
        }
        params
    }
}

/// Data entered on the ground create/edit screen.
#[derive(Debug, Clone, Default)]
pub struct ParkForm {
    /// The ground's name.
    pub name: String,
    /// A street address, when known.
    pub address: Option<String>,
    /// Latitude of the ground.
    pub latitude: f64,
    /// Longitude of the ground.
    pub longitude: f64,
    /// Free-form description.
    pub description: Option<String>,
    /// Photos to upload alongside the form fields.
    pub photos: Vec<MediaFile>,
}

impl ParkForm {
    /// Pre-fills the form from a previously fetched ground.
    ///
    /// Existing server-side photos are not carried over; `photos` holds only
    /// new attachments pending upload.
    #[must_use]
    pub fn from_park(park: &Park) -> Self {
        Self {
            name: park.name.clone(),
            address: park.address.clone(),
            latitude: park.latitude,
            longitude: park.longitude,
            description: park.description.clone(),
            photos: Vec::new(),
        }
    }

    pub(crate) fn params(&self) -> Params {
        let mut params = vec![
            ("name".to_string(), self.name.clone()),
            ("latitude".to_string(), self.latitude.to_string()),
            ("longitude".to_string(), self.longitude.to_string()),
        ];
        if let Some(address) = &self.address {
            params.push(("address".to_string(), address.clone()));
        }
        if let Some(description) = &self.description {
            params.push(("description".to_string(), description.clone()));
        }
        params
    }
}

/// Data entered on the event create/edit screen.
#[derive(Debug, Clone, Default)]
pub struct EventForm {
    /// The event title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// The ground the event takes place at, when tied to one.
    pub park_id: Option<u64>,
    /// The start timestamp, in the server's own string format.
    pub starts_at: String,
    /// Photos to upload alongside the form fields.
    pub photos: Vec<MediaFile>,
}

impl EventForm {
    /// Pre-fills the form from a previously fetched event.
    #[must_use]
    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            park_id: event.park_id,
            starts_at: event.starts_at.clone(),
            photos: Vec::new(),
        }
    }

    pub(crate) fn params(&self) -> Params {
        let mut params = vec![
            ("title".to_string(), self.title.clone()),
            ("starts_at".to_string(), self.starts_at.clone()),
        ];
        if let Some(park_id) = self.park_id {
            params.push(("area_id".to_string(), park_id.to_string()));
        }
        if let Some(description) = &self.description {
            params.push(("description".to_string(), description.clone()));
        }
        params
    }
}
