//! Data transfer objects mirroring the server's JSON contract.
//!
//! Optional and list-valued fields default when absent so older server
//! payloads keep decoding.

use serde::{Deserialize, Serialize};

/// A user profile snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned user id.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Contact email, visible only on the own profile.
    #[serde(default)]
    pub email: Option<String>,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Free-form profile text.
    #[serde(default)]
    pub about: Option<String>,
    /// Home country.
    #[serde(default)]
    pub country: Option<String>,
    /// Ids of grounds the user trains at.
    #[serde(default)]
    pub park_ids: Vec<u64>,
    /// Ids of the user's journals.
    #[serde(default)]
    pub journal_ids: Vec<u64>,
}

/// A photo attached to a ground or event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Server-assigned photo id.
    pub id: u64,
    /// Download URL.
    pub url: String,
}

/// A workout ground ("area" on the wire).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Park {
    /// Server-assigned ground id.
    pub id: u64,
    /// The ground's name.
    pub name: String,
    /// Street address, when known.
    #[serde(default)]
    pub address: Option<String>,
    /// Latitude of the ground.
    pub latitude: f64,
    /// Longitude of the ground.
    pub longitude: f64,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Attached photos.
    #[serde(default)]
    pub photos: Vec<Photo>,
    /// Ids of users who train at this ground.
    #[serde(default)]
    pub trainer_ids: Vec<u64>,
}

/// A training event ("training" on the wire).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Server-assigned event id.
    pub id: u64,
    /// Event title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// The ground the event takes place at, when tied to one.
    #[serde(default)]
    pub park_id: Option<u64>,
    /// Start timestamp in the server's own string format.
    pub starts_at: String,
    /// Ids of users who marked themselves as going.
    #[serde(default)]
    pub participant_ids: Vec<u64>,
    /// Attached photos.
    #[serde(default)]
    pub photos: Vec<Photo>,
}

/// A comment on a ground or event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Server-assigned comment id.
    pub id: u64,
    /// The author's user id.
    pub user_id: u64,
    /// The comment text.
    pub text: String,
    /// Creation timestamp, when the server includes it.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// An incoming friend request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendRequest {
    /// Server-assigned request id.
    pub id: u64,
    /// The requesting user's id.
    pub sender_id: u64,
    /// Creation timestamp, when the server includes it.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A chat message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Server-assigned message id.
    pub id: u64,
    /// The author's user id.
    pub sender_id: u64,
    /// The message text.
    pub text: String,
    /// Creation timestamp, when the server includes it.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A conversation between two users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialog {
    /// Server-assigned dialog id.
    pub id: u64,
    /// Ids of the participating users.
    #[serde(default)]
    pub participant_ids: Vec<u64>,
    /// The most recent message, for list previews.
    #[serde(default)]
    pub last_message: Option<Message>,
}

/// A workout journal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    /// Server-assigned journal id.
    pub id: u64,
    /// The journal title.
    pub title: String,
    /// Whether the journal is closed to other users.
    #[serde(default)]
    pub closed: bool,
}

/// One entry of a journal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Server-assigned entry id.
    pub id: u64,
    /// The entry text.
    pub text: String,
    /// Creation timestamp, when the server includes it.
    #[serde(default)]
    pub created_at: Option<String>,
}
