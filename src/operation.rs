//! The closed set of API operations and their wire-level request shapes.
//!
//! [`Operation`] enumerates every action the platform supports. The mapping
//! from an operation to `(path, method, headers, body)` plus its auth policy
//! lives in one place, [`Operation::descriptor`], so the tables cannot drift
//! apart. The mapping is total and pure: every case resolves to a non-empty
//! path and performs no I/O.
//!
//! Method table: pure reads are GET, removals are DELETE, mutations are
//! POST, except the two journal edit operations, which the server expects
//! as PUT. Reads and deletes never carry a body. Only photo-carrying
//! operations (ground and event create/edit) emit a Content-Type header
//! here; the Authorization header is injected later by the client.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, Method};

use crate::encoding::{self, Params};
use crate::forms::{EditUserForm, EventForm, MediaFile, ParkForm, RegistrationForm};

/// One supported API action and exactly the parameters it needs.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Create a new account.
    Register(RegistrationForm),
    /// Sign in with the stored Basic credentials.
    Login,
    /// Request a password reset email.
    ResetPassword {
        /// The account email.
        email: String,
    },
    /// Change the password of the signed-in user.
    ChangePassword {
        /// The current password, re-checked by the server.
        current: String,
        /// The new password.
        new: String,
    },
    /// Fetch a user profile.
    GetUser {
        /// The profile owner.
        user_id: u64,
    },
    /// Update a user profile.
    EditUser {
        /// The profile owner.
        user_id: u64,
        /// The edited fields.
        form: EditUserForm,
    },
    /// Delete an account.
    DeleteUser {
        /// The account owner.
        user_id: u64,
    },
    /// Search users by display name.
    FindUsers {
        /// The raw query string, interpolated into the path verbatim.
        query: String,
    },
    /// Fetch a user's friends.
    GetFriends {
        /// The list owner.
        user_id: u64,
    },
    /// Fetch a user's incoming friend requests.
    GetFriendRequests {
        /// The list owner.
        user_id: u64,
    },
    /// Ask another user for friendship.
    SendFriendRequest {
        /// The user to befriend.
        user_id: u64,
    },
    /// Accept or decline an incoming friend request.
    RespondToFriendRequest {
        /// The requesting user.
        user_id: u64,
        /// Whether the request is accepted.
        accept: bool,
    },
    /// Remove a user from the friend list.
    DeleteFriend {
        /// The list owner.
        user_id: u64,
        /// The friend to remove.
        friend_id: u64,
    },
    /// Fetch a user's blacklist.
    GetBlacklist {
        /// The list owner.
        user_id: u64,
    },
    /// Add a user to the blacklist.
    AddToBlacklist {
        /// The list owner.
        user_id: u64,
        /// The user to blacklist.
        target_id: u64,
    },
    /// Remove a user from the blacklist.
    RemoveFromBlacklist {
        /// The list owner.
        user_id: u64,
        /// The user to unblock.
        target_id: u64,
    },
    /// Fetch all workout grounds.
    GetParks,
    /// Fetch one workout ground.
    GetPark {
        /// The ground id.
        park_id: u64,
    },
    /// Create a workout ground, photos included.
    CreatePark(ParkForm),
    /// Update a workout ground, photos included.
    EditPark {
        /// The ground id.
        park_id: u64,
        /// The edited fields and pending photos.
        form: ParkForm,
    },
    /// Delete a workout ground.
    DeletePark {
        /// The ground id.
        park_id: u64,
    },
    /// Fetch the comments of a ground.
    GetParkComments {
        /// The ground id.
        park_id: u64,
    },
    /// Comment on a ground.
    AddParkComment {
        /// The ground id.
        park_id: u64,
        /// The comment text.
        text: String,
    },
    /// Edit an own comment on a ground.
    EditParkComment {
        /// The ground id.
        park_id: u64,
        /// The comment id.
        comment_id: u64,
        /// The new text.
        text: String,
    },
    /// Delete an own comment on a ground.
    DeleteParkComment {
        /// The ground id.
        park_id: u64,
        /// The comment id.
        comment_id: u64,
    },
    /// Mark or unmark a ground as a place the user trains at.
    SetTrainHere {
        /// The ground id.
        park_id: u64,
        /// The new train-here state.
        train_here: bool,
    },
    /// Fetch all events.
    GetEvents,
    /// Fetch one event.
    GetEvent {
        /// The event id.
        event_id: u64,
    },
    /// Create an event, photos included.
    CreateEvent(EventForm),
    /// Update an event, photos included.
    EditEvent {
        /// The event id.
        event_id: u64,
        /// The edited fields and pending photos.
        form: EventForm,
    },
    /// Delete an event.
    DeleteEvent {
        /// The event id.
        event_id: u64,
    },
    /// Fetch the comments of an event.
    GetEventComments {
        /// The event id.
        event_id: u64,
    },
    /// Comment on an event.
    AddEventComment {
        /// The event id.
        event_id: u64,
        /// The comment text.
        text: String,
    },
    /// Edit an own comment on an event.
    EditEventComment {
        /// The event id.
        event_id: u64,
        /// The comment id.
        comment_id: u64,
        /// The new text.
        text: String,
    },
    /// Delete an own comment on an event.
    DeleteEventComment {
        /// The event id.
        event_id: u64,
        /// The comment id.
        comment_id: u64,
    },
    /// Mark or unmark the user as going to an event.
    SetGoToEvent {
        /// The event id.
        event_id: u64,
        /// The new going state.
        going: bool,
    },
    /// Fetch a user's dialogs.
    GetDialogs {
        /// The list owner.
        user_id: u64,
    },
    /// Open a dialog with another user.
    CreateDialog {
        /// The dialog owner.
        user_id: u64,
        /// The other participant.
        participant_id: u64,
    },
    /// Delete a dialog.
    DeleteDialog {
        /// The dialog id.
        dialog_id: u64,
    },
    /// Fetch the messages of a dialog.
    GetMessages {
        /// The dialog id.
        dialog_id: u64,
    },
    /// Send a message in a dialog.
    SendMessage {
        /// The dialog id.
        dialog_id: u64,
        /// The message text.
        text: String,
    },
    /// Fetch a user's journals.
    GetJournals {
        /// The journal owner.
        user_id: u64,
    },
    /// Create a journal.
    CreateJournal {
        /// The journal owner.
        user_id: u64,
        /// The journal title.
        title: String,
    },
    /// Update a journal's settings.
    EditJournalSettings {
        /// The journal owner.
        user_id: u64,
        /// The journal id.
        journal_id: u64,
        /// The new title.
        title: String,
        /// Whether the journal is closed to other users.
        closed: bool,
    },
    /// Delete a journal.
    DeleteJournal {
        /// The journal owner.
        user_id: u64,
        /// The journal id.
        journal_id: u64,
    },
    /// Fetch the entries of a journal.
    GetJournalEntries {
        /// The journal owner.
        user_id: u64,
        /// The journal id.
        journal_id: u64,
    },
    /// Append an entry to a journal.
    AddJournalEntry {
        /// The journal owner.
        user_id: u64,
        /// The journal id.
        journal_id: u64,
        /// The entry text.
        text: String,
    },
    /// Edit a journal entry.
    EditJournalEntry {
        /// The journal owner.
        user_id: u64,
        /// The journal id.
        journal_id: u64,
        /// The entry id.
        entry_id: u64,
        /// The new text.
        text: String,
    },
    /// Delete a journal entry.
    DeleteJournalEntry {
        /// The journal owner.
        user_id: u64,
        /// The journal id.
        journal_id: u64,
        /// The entry id.
        entry_id: u64,
    },
    /// Delete an uploaded photo.
    DeletePhoto {
        /// The photo id.
        photo_id: u64,
    },
}

/// The wire-level shape of one request, plus its auth policy.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// The path relative to the base URL, always non-empty and `/`-rooted.
    pub path: String,
    /// The HTTP method.
    pub method: Method,
    /// Extra headers from the descriptor layer (only the multipart
    /// Content-Type today; Authorization is injected by the client).
    pub headers: HeaderMap,
    /// The request body, `None` for every read and delete.
    pub body: Option<Bytes>,
    /// Whether the client must attach Basic credentials.
    pub needs_auth: bool,
    /// Whether a 401 on this request clears the session and surfaces as a
    /// forced logout. False for operations where a 401 means the user typed
    /// a wrong password, not that the session died.
    pub force_logout_on_401: bool,
}

impl RequestDescriptor {
    fn get(path: String) -> Self {
        Self {
            path,
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
            needs_auth: true,
            force_logout_on_401: true,
        }
    }

    fn delete(path: String) -> Self {
        Self {
            method: Method::DELETE,
            ..Self::get(path)
        }
    }

    fn form(method: Method, path: String, params: &Params) -> Self {
        Self {
            method,
            body: Some(encoding::url_encode(params)),
            ..Self::get(path)
        }
    }

    fn post_form(path: String, params: &Params) -> Self {
        Self::form(Method::POST, path, params)
    }

    fn put_form(path: String, params: &Params) -> Self {
        Self::form(Method::PUT, path, params)
    }

    fn post_multipart(path: String, params: &Params, files: &[MediaFile]) -> Self {
        // The boundary is the fixed encoding::MULTIPART_BOUNDARY.
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("multipart/form-data; boundary=FFF"),
        );
        Self {
            method: Method::POST,
            headers,
            body: Some(encoding::multipart(params, files)),
            ..Self::get(path)
        }
    }

    fn public(mut self) -> Self {
        self.needs_auth = false;
        self.force_logout_on_401 = false;
        self
    }

    fn no_force_logout(mut self) -> Self {
        self.force_logout_on_401 = false;
        self
    }
}

fn flag_param(key: &str, value: bool) -> Params {
    vec![(key.to_string(), value.to_string())]
}

fn text_param(text: &str) -> Params {
    vec![("text".to_string(), text.to_string())]
}

impl Operation {
    /// Resolves this operation to its request shape.
    ///
    /// Pure and total: every case yields a descriptor, and building it never
    /// touches the network.
    #[must_use]
    pub fn descriptor(&self) -> RequestDescriptor {
        use RequestDescriptor as D;

        match self {
            Self::Register(form) => {
                D::post_form("/auth/register".into(), &form.params()).public()
            }
            Self::Login => D::post_form("/auth/login".into(), &Params::new()).no_force_logout(),
            Self::ResetPassword { email } => D::post_form(
                "/auth/password/reset".into(),
                &vec![("email".to_string(), email.clone())],
            )
            .public(),
            Self::ChangePassword { current, new } => D::post_form(
                "/auth/password/change".into(),
                &vec![
                    ("current_password".to_string(), current.clone()),
                    ("new_password".to_string(), new.clone()),
                ],
            )
            .no_force_logout(),

            Self::GetUser { user_id } => D::get(format!("/users/{user_id}")),
            Self::EditUser { user_id, form } => {
                D::post_form(format!("/users/{user_id}"), &form.params())
            }
            Self::DeleteUser { user_id } => D::delete(format!("/users/{user_id}")),
            // The query is interpolated verbatim for wire compatibility with
            // the deployed server; names containing `&`, `#`, or spaces make
            // the URL unbuildable and fail as a bad request.
            Self::FindUsers { query } => D::get(format!("/users/find/{query}")),

            Self::GetFriends { user_id } => D::get(format!("/users/{user_id}/friends")),
            Self::GetFriendRequests { user_id } => {
                D::get(format!("/users/{user_id}/friendrequests"))
            }
            Self::SendFriendRequest { user_id } => {
                D::post_form(format!("/users/{user_id}/friends"), &Params::new())
            }
            Self::RespondToFriendRequest { user_id, accept } => D::post_form(
                format!("/users/{user_id}/friends/respond"),
                &flag_param("accept", *accept),
            ),
            Self::DeleteFriend { user_id, friend_id } => {
                D::delete(format!("/users/{user_id}/friends/{friend_id}"))
            }

            Self::GetBlacklist { user_id } => D::get(format!("/users/{user_id}/blacklist")),
            Self::AddToBlacklist { user_id, target_id } => D::post_form(
                format!("/users/{user_id}/blacklist/{target_id}"),
                &Params::new(),
            ),
            Self::RemoveFromBlacklist { user_id, target_id } => {
                D::delete(format!("/users/{user_id}/blacklist/{target_id}"))
            }

            Self::GetParks => D::get("/areas".into()),
            Self::GetPark { park_id } => D::get(format!("/areas/{park_id}")),
            Self::CreatePark(form) => {
                D::post_multipart("/areas".into(), &form.params(), &form.photos)
            }
            Self::EditPark { park_id, form } => {
                D::post_multipart(format!("/areas/{park_id}"), &form.params(), &form.photos)
            }
            Self::DeletePark { park_id } => D::delete(format!("/areas/{park_id}")),
            Self::GetParkComments { park_id } => D::get(format!("/areas/{park_id}/comments")),
            Self::AddParkComment { park_id, text } => {
                D::post_form(format!("/areas/{park_id}/comments"), &text_param(text))
            }
            Self::EditParkComment {
                park_id,
                comment_id,
                text,
            } => D::post_form(
                format!("/areas/{park_id}/comments/{comment_id}"),
                &text_param(text),
            ),
            Self::DeleteParkComment { park_id, comment_id } => {
                D::delete(format!("/areas/{park_id}/comments/{comment_id}"))
            }
            Self::SetTrainHere { park_id, train_here } => D::post_form(
                format!("/areas/{park_id}/train"),
                &flag_param("train_here", *train_here),
            ),

            Self::GetEvents => D::get("/trainings".into()),
            Self::GetEvent { event_id } => D::get(format!("/trainings/{event_id}")),
            Self::CreateEvent(form) => {
                D::post_multipart("/trainings".into(), &form.params(), &form.photos)
            }
            Self::EditEvent { event_id, form } => D::post_multipart(
                format!("/trainings/{event_id}"),
                &form.params(),
                &form.photos,
            ),
            Self::DeleteEvent { event_id } => D::delete(format!("/trainings/{event_id}")),
            Self::GetEventComments { event_id } => {
                D::get(format!("/trainings/{event_id}/comments"))
            }
            Self::AddEventComment { event_id, text } => {
                D::post_form(format!("/trainings/{event_id}/comments"), &text_param(text))
            }
            Self::EditEventComment {
                event_id,
                comment_id,
                text,
            } => D::post_form(
                format!("/trainings/{event_id}/comments/{comment_id}"),
                &text_param(text),
            ),
            Self::DeleteEventComment { event_id, comment_id } => {
                D::delete(format!("/trainings/{event_id}/comments/{comment_id}"))
            }
            Self::SetGoToEvent { event_id, going } => D::post_form(
                format!("/trainings/{event_id}/go"),
                &flag_param("go", *going),
            ),

            Self::GetDialogs { user_id } => D::get(format!("/users/{user_id}/dialogs")),
            Self::CreateDialog {
                user_id,
                participant_id,
            } => D::post_form(
                format!("/users/{user_id}/dialogs"),
                &vec![("participant_id".to_string(), participant_id.to_string())],
            ),
            Self::DeleteDialog { dialog_id } => D::delete(format!("/dialogs/{dialog_id}")),
            Self::GetMessages { dialog_id } => D::get(format!("/dialogs/{dialog_id}/messages")),
            Self::SendMessage { dialog_id, text } => {
                D::post_form(format!("/dialogs/{dialog_id}/messages"), &text_param(text))
            }

            Self::GetJournals { user_id } => D::get(format!("/users/{user_id}/journals")),
            Self::CreateJournal { user_id, title } => D::post_form(
                format!("/users/{user_id}/journals"),
                &vec![("title".to_string(), title.clone())],
            ),
            Self::EditJournalSettings {
                user_id,
                journal_id,
                title,
                closed,
            } => D::put_form(
                format!("/users/{user_id}/journals/{journal_id}"),
                &vec![
                    ("title".to_string(), title.clone()),
                    ("closed".to_string(), closed.to_string()),
                ],
            ),
            Self::DeleteJournal { user_id, journal_id } => {
                D::delete(format!("/users/{user_id}/journals/{journal_id}"))
            }
            Self::GetJournalEntries { user_id, journal_id } => {
                D::get(format!("/users/{user_id}/journals/{journal_id}/messages"))
            }
            Self::AddJournalEntry {
                user_id,
                journal_id,
                text,
            } => D::post_form(
                format!("/users/{user_id}/journals/{journal_id}/messages"),
                &text_param(text),
            ),
            Self::EditJournalEntry {
                user_id,
                journal_id,
                entry_id,
                text,
            } => D::put_form(
                format!("/users/{user_id}/journals/{journal_id}/messages/{entry_id}"),
                &text_param(text),
            ),
            Self::DeleteJournalEntry {
                user_id,
                journal_id,
                entry_id,
            } => D::delete(format!(
                "/users/{user_id}/journals/{journal_id}/messages/{entry_id}"
            )),

            Self::DeletePhoto { photo_id } => D::delete(format!("/photos/{photo_id}")),
        }
    }
}
