//! The client facade: one async method per domain action.
//!
//! [`GroundsClient`] composes the request descriptor, credential injection,
//! the transport, and the response classifier, and layers two policies on
//! top:
//!
//! - **Forced logout**: a 401 on an operation flagged
//!   [`force_logout_on_401`](crate::RequestDescriptor::force_logout_on_401)
//!   clears the whole session and surfaces as
//!   [`ClientError::ForceLogout`], so every screen can react the same way.
//! - **No-connection translation**: transport-level connectivity failures
//!   surface as [`ClientError::NoConnection`].
//!
//! Several reads deliberately write the session store on success (which
//! lists and flags each method touches is documented on the method); other
//! screens branch on those cached flags without re-fetching. Cancellation
//! is cooperative: dropping a method's future abandons the in-flight
//! request and is never reported as an error.

use bon::Builder;
use bytes::Bytes;
use http::{Request, StatusCode};
use serde::de::DeserializeOwned;
use snafu::ResultExt as _;
use tracing::{debug, warn};

use crate::auth::Credentials;
use crate::base_url::{BaseUrl, IntoBaseUrl};
use crate::error::{ApiError, ClientError, Error as _, ResponseBodyReadSnafu};
use crate::forms::{EditUserForm, EventForm, ParkForm, RegistrationForm};
use crate::http::{HttpClient, HttpResponse};
use crate::models::{
    Comment, Dialog, Event, FriendRequest, Journal, JournalEntry, Message, Park, User,
};
use crate::operation::{Operation, RequestDescriptor};
use crate::response::{self, ClassifyError};
use crate::session::SessionStore;

/// Shorthand for the result type of every client method.
pub type ClientResult<T, C> = Result<
    T,
    ClientError<
        <C as HttpClient>::Error,
        <<C as HttpClient>::Response as HttpResponse>::Error,
    >,
>;

/// The result of the four-way social composite fetch.
#[derive(Debug, Clone)]
pub struct SocialUpdates {
    /// The fetched profile.
    pub user: User,
    /// The user's friends.
    pub friends: Vec<User>,
    /// Incoming friend requests.
    pub friend_requests: Vec<FriendRequest>,
    /// Blacklisted users.
    pub blacklist: Vec<User>,
}

/// The typed API client.
///
/// Generic over the HTTP transport and the session store so both can be
/// faked in tests. Construct it with [`GroundsClient::builder`].
#[derive(Debug, Builder)]
#[builder(state_mod(name = "builder"))]
pub struct GroundsClient<C: HttpClient, S: SessionStore> {
    /// The API base URL.
    #[builder(setters(name = "base_url_value"))]
    base_url: BaseUrl,

    /// The HTTP transport.
    http_client: C,

    /// The credential/session store.
    store: S,
}

impl<C: HttpClient, S: SessionStore, St: builder::State> GroundsClientBuilder<C, S, St> {
    /// Sets the API base URL.
    ///
    /// Accepts any type that implements [`IntoBaseUrl`], including `&str`,
    /// [`String`], [`Uri`](http::Uri), and [`BaseUrl`].
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed as a valid URI.
    pub fn base_url<U: IntoBaseUrl>(
        self,
        url: U,
    ) -> Result<GroundsClientBuilder<C, S, builder::SetBaseUrl<St>>, U::Error>
    where
        St::BaseUrl: builder::IsUnset,
    {
        Ok(self.base_url_value(url.into_base_url()?))
    }
}

impl<C: HttpClient, S: SessionStore> GroundsClient<C, S> {
    /// The session store this client reads and writes.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn main_user_id(&self) -> Option<u64> {
        self.store.user().map(|user| user.id)
    }

    fn require_main_user_id(&self) -> Result<u64, ApiError> {
        self.main_user_id().ok_or(ApiError::InvalidUserId)
    }

    /// Builds the wire request for a descriptor, injecting Basic credentials
    /// when the operation requires them.
    ///
    /// An unbuildable URL or missing credentials fail as a bad request
    /// before any network call.
    fn build_request(&self, descriptor: &RequestDescriptor) -> Result<Request<Bytes>, ApiError> {
        let uri = self
            .base_url
            .join(&descriptor.path)
            .map_err(|_| ApiError::BadRequest)?;

        let (mut parts, ()) = Request::new(()).into_parts();
        parts.method = descriptor.method.clone();
        parts.uri = uri;
        parts.headers = descriptor.headers.clone();

        if descriptor.needs_auth {
            let credentials = self.store.credentials().ok_or(ApiError::BadRequest)?;
            let header = credentials
                .basic_header()
                .map_err(|_| ApiError::BadRequest)?;
            parts.headers.insert(http::header::AUTHORIZATION, header);
        }

        let body = descriptor.body.clone().unwrap_or_default();
        Ok(Request::from_parts(parts, body))
    }

    async fn send(&self, descriptor: &RequestDescriptor) -> ClientResult<(StatusCode, Bytes), C> {
        let request = self.build_request(descriptor)?;
        debug!(method = %descriptor.method, path = %descriptor.path, "issuing API request");

        let response = match self.http_client.execute(request).await {
            Ok(response) => response,
            Err(source) if source.is_connectivity() => {
                warn!(path = %descriptor.path, "request failed: no connection");
                return Err(ClientError::NoConnection);
            }
            Err(source) => return Err(ClientError::Request { source }),
        };

        let status = response.status();
        let body = response.body().await.context(ResponseBodyReadSnafu)?;
        debug!(status = status.as_u16(), path = %descriptor.path, "API request completed");
        Ok((status, body))
    }

    /// Applies the forced-logout policy while lifting classifier errors into
    /// [`ClientError`].
    fn reclassify(
        &self,
        error: ClassifyError,
        force_logout: bool,
    ) -> ClientError<C::Error, <C::Response as HttpResponse>::Error> {
        match error {
            ClassifyError::Api {
                source: ApiError::InvalidCredentials,
            } if force_logout => {
                warn!("stored credentials rejected, clearing session");
                self.store.trigger_logout();
                ClientError::ForceLogout
            }
            ClassifyError::Api { source } => ClientError::Api { source },
            ClassifyError::Decode { source } => ClientError::Decode { source },
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, operation: &Operation) -> ClientResult<T, C> {
        let descriptor = operation.descriptor();
        let (status, body) = self.send(&descriptor).await?;
        response::decode_body(status, &body)
            .map_err(|error| self.reclassify(error, descriptor.force_logout_on_401))
    }

    async fn submit(&self, operation: &Operation) -> ClientResult<bool, C> {
        let descriptor = operation.descriptor();
        let (status, body) = self.send(&descriptor).await?;
        response::expect_ok(status, &body).map_err(|source| {
            self.reclassify(
                ClassifyError::Api { source },
                descriptor.force_logout_on_401,
            )
        })?;
        Ok(true)
    }

    // -- Accounts --

    /// Creates a new account.
    pub async fn register(&self, form: RegistrationForm) -> ClientResult<bool, C> {
        self.submit(&Operation::Register(form)).await
    }

    /// Signs in with the given credentials.
    ///
    /// Stores the credentials, then authenticates. On success the returned
    /// snapshot is persisted and the derived flags recomputed; a 401 here
    /// means the password was wrong and is surfaced as
    /// [`ApiError::InvalidCredentials`], never as a forced logout.
    pub async fn login(&self, credentials: Credentials) -> ClientResult<User, C> {
        self.store.set_credentials(credentials);
        let user = self.fetch::<User>(&Operation::Login).await?;
        self.store.set_user(user.clone());
        self.store.set_needs_update(false);
        Ok(user)
    }

    /// Signs out locally by clearing the whole session. No server call.
    pub fn logout(&self) {
        self.store.trigger_logout();
    }

    /// Requests a password reset email. Works without a session.
    pub async fn reset_password(&self, email: &str) -> ClientResult<bool, C> {
        self.submit(&Operation::ResetPassword {
            email: email.to_string(),
        })
        .await
    }

    /// Changes the signed-in user's password.
    pub async fn change_password(&self, current: &str, new: &str) -> ClientResult<bool, C> {
        self.submit(&Operation::ChangePassword {
            current: current.to_string(),
            new: new.to_string(),
        })
        .await
    }

    // -- Users --

    /// Fetches a user profile.
    ///
    /// When the profile is the signed-in user's own, the snapshot is
    /// persisted and the `needs_update` flag cleared.
    pub async fn user(&self, user_id: u64) -> ClientResult<User, C> {
        let user = self.fetch::<User>(&Operation::GetUser { user_id }).await?;
        if self.main_user_id() == Some(user_id) {
            self.store.set_user(user.clone());
            self.store.set_needs_update(false);
        }
        Ok(user)
    }

    /// Fetches the signed-in user's own profile.
    ///
    /// # Errors
    ///
    /// Fails with [`ApiError::InvalidUserId`] when no snapshot is cached.
    pub async fn main_user(&self) -> ClientResult<User, C> {
        let user_id = self.require_main_user_id()?;
        self.user(user_id).await
    }

    /// Updates a user profile; the own snapshot is refreshed on success.
    pub async fn edit_user(&self, user_id: u64, form: EditUserForm) -> ClientResult<User, C> {
        let user = self
            .fetch::<User>(&Operation::EditUser { user_id, form })
            .await?;
        if self.main_user_id() == Some(user_id) {
            self.store.set_user(user.clone());
        }
        Ok(user)
    }

    /// Deletes an account. Deleting the own account also clears the session.
    pub async fn delete_user(&self, user_id: u64) -> ClientResult<bool, C> {
        let deleted = self.submit(&Operation::DeleteUser { user_id }).await?;
        if self.main_user_id() == Some(user_id) {
            self.store.trigger_logout();
        }
        Ok(deleted)
    }

    /// Searches users by display name.
    ///
    /// The query is interpolated into the path verbatim for wire
    /// compatibility; names containing `&`, `#`, or spaces make the URL
    /// unbuildable and fail as [`ApiError::BadRequest`].
    pub async fn find_users(&self, query: &str) -> ClientResult<Vec<User>, C> {
        self.fetch(&Operation::FindUsers {
            query: query.to_string(),
        })
        .await
    }

    // -- Friends --

    /// Fetches a user's friends.
    ///
    /// When fetching the signed-in user's own list, the resulting id list
    /// (and thus `has_friends`) is persisted.
    pub async fn friends(&self, user_id: u64) -> ClientResult<Vec<User>, C> {
        let friends = self
            .fetch::<Vec<User>>(&Operation::GetFriends { user_id })
            .await?;
        if self.main_user_id() == Some(user_id) {
            self.store
                .set_friend_ids(friends.iter().map(|user| user.id).collect());
        }
        Ok(friends)
    }

    /// Fetches a user's incoming friend requests, persisting the own list.
    pub async fn friend_requests(&self, user_id: u64) -> ClientResult<Vec<FriendRequest>, C> {
        let requests = self
            .fetch::<Vec<FriendRequest>>(&Operation::GetFriendRequests { user_id })
            .await?;
        if self.main_user_id() == Some(user_id) {
            self.store.set_friend_requests(requests.clone());
        }
        Ok(requests)
    }

    /// Asks another user for friendship.
    pub async fn send_friend_request(&self, user_id: u64) -> ClientResult<bool, C> {
        self.submit(&Operation::SendFriendRequest { user_id }).await
    }

    /// Accepts or declines an incoming friend request.
    ///
    /// On success the affected caches are re-fetched before returning:
    /// accepting re-reads the friend list and then the request list,
    /// declining re-reads only the request list.
    pub async fn respond_to_friend_request(
        &self,
        user_id: u64,
        accept: bool,
    ) -> ClientResult<bool, C> {
        let responded = self
            .submit(&Operation::RespondToFriendRequest { user_id, accept })
            .await?;
        let main_id = self.require_main_user_id()?;
        if accept {
            self.friends(main_id).await?;
        }
        self.friend_requests(main_id).await?;
        Ok(responded)
    }

    /// Removes a friend from the signed-in user's list and updates the
    /// cached id list.
    pub async fn delete_friend(&self, friend_id: u64) -> ClientResult<bool, C> {
        let user_id = self.require_main_user_id()?;
        let deleted = self
            .submit(&Operation::DeleteFriend { user_id, friend_id })
            .await?;
        let mut ids = self.store.friend_ids();
        ids.retain(|id| *id != friend_id);
        self.store.set_friend_ids(ids);
        Ok(deleted)
    }

    // -- Blacklist --

    /// Fetches a user's blacklist, persisting the own id list.
    pub async fn blacklist(&self, user_id: u64) -> ClientResult<Vec<User>, C> {
        let blocked = self
            .fetch::<Vec<User>>(&Operation::GetBlacklist { user_id })
            .await?;
        if self.main_user_id() == Some(user_id) {
            self.store
                .set_blacklist(blocked.iter().map(|user| user.id).collect());
        }
        Ok(blocked)
    }

    /// Adds a user to the signed-in user's blacklist.
    pub async fn add_to_blacklist(&self, target_id: u64) -> ClientResult<bool, C> {
        let user_id = self.require_main_user_id()?;
        let added = self
            .submit(&Operation::AddToBlacklist { user_id, target_id })
            .await?;
        let mut ids = self.store.blacklist();
        if !ids.contains(&target_id) {
            ids.push(target_id);
        }
        self.store.set_blacklist(ids);
        Ok(added)
    }

    /// Removes a user from the signed-in user's blacklist.
    pub async fn remove_from_blacklist(&self, target_id: u64) -> ClientResult<bool, C> {
        let user_id = self.require_main_user_id()?;
        let removed = self
            .submit(&Operation::RemoveFromBlacklist { user_id, target_id })
            .await?;
        let mut ids = self.store.blacklist();
        ids.retain(|id| *id != target_id);
        self.store.set_blacklist(ids);
        Ok(removed)
    }

    // -- Grounds --

    /// Fetches all workout grounds.
    pub async fn parks(&self) -> ClientResult<Vec<Park>, C> {
        self.fetch(&Operation::GetParks).await
    }

    /// Fetches one workout ground.
    pub async fn park(&self, park_id: u64) -> ClientResult<Park, C> {
        self.fetch(&Operation::GetPark { park_id }).await
    }

    /// Creates a workout ground, uploading any pending photos.
    pub async fn create_park(&self, form: ParkForm) -> ClientResult<Park, C> {
        self.fetch(&Operation::CreatePark(form)).await
    }

    /// Updates a workout ground, uploading any pending photos.
    pub async fn edit_park(&self, park_id: u64, form: ParkForm) -> ClientResult<Park, C> {
        self.fetch(&Operation::EditPark { park_id, form }).await
    }

    /// Deletes a workout ground.
    pub async fn delete_park(&self, park_id: u64) -> ClientResult<bool, C> {
        self.submit(&Operation::DeletePark { park_id }).await
    }

    /// Fetches the comments of a ground.
    pub async fn park_comments(&self, park_id: u64) -> ClientResult<Vec<Comment>, C> {
        self.fetch(&Operation::GetParkComments { park_id }).await
    }

    /// Comments on a ground.
    pub async fn add_park_comment(&self, park_id: u64, text: &str) -> ClientResult<bool, C> {
        self.submit(&Operation::AddParkComment {
            park_id,
            text: text.to_string(),
        })
        .await
    }

    /// Edits an own comment on a ground.
    pub async fn edit_park_comment(
        &self,
        park_id: u64,
        comment_id: u64,
        text: &str,
    ) -> ClientResult<bool, C> {
        self.submit(&Operation::EditParkComment {
            park_id,
            comment_id,
            text: text.to_string(),
        })
        .await
    }

    /// Deletes an own comment on a ground.
    pub async fn delete_park_comment(
        &self,
        park_id: u64,
        comment_id: u64,
    ) -> ClientResult<bool, C> {
        self.submit(&Operation::DeleteParkComment {
            park_id,
            comment_id,
        })
        .await
    }

    /// Marks or unmarks a ground as a place the signed-in user trains at.
    ///
    /// On success the cached snapshot's ground list and the `has_parks`
    /// flag are updated to match.
    pub async fn set_train_here(&self, park_id: u64, train_here: bool) -> ClientResult<bool, C> {
        let changed = self
            .submit(&Operation::SetTrainHere {
                park_id,
                train_here,
            })
            .await?;
        if let Some(mut user) = self.store.user() {
            if train_here {
                if !user.park_ids.contains(&park_id) {
                    user.park_ids.push(park_id);
                }
            } else {
                user.park_ids.retain(|id| *id != park_id);
            }
            self.store.set_user(user);
        }
        Ok(changed)
    }

    // -- Events --

    /// Fetches all events.
    pub async fn events(&self) -> ClientResult<Vec<Event>, C> {
        self.fetch(&Operation::GetEvents).await
    }

    /// Fetches one event.
    pub async fn event(&self, event_id: u64) -> ClientResult<Event, C> {
        self.fetch(&Operation::GetEvent { event_id }).await
    }

    /// Creates an event, uploading any pending photos.
    pub async fn create_event(&self, form: EventForm) -> ClientResult<Event, C> {
        self.fetch(&Operation::CreateEvent(form)).await
    }

    /// Updates an event, uploading any pending photos.
    pub async fn edit_event(&self, event_id: u64, form: EventForm) -> ClientResult<Event, C> {
        self.fetch(&Operation::EditEvent { event_id, form }).await
    }

    /// Deletes an event.
    pub async fn delete_event(&self, event_id: u64) -> ClientResult<bool, C> {
        self.submit(&Operation::DeleteEvent { event_id }).await
    }

    /// Fetches the comments of an event.
    pub async fn event_comments(&self, event_id: u64) -> ClientResult<Vec<Comment>, C> {
        self.fetch(&Operation::GetEventComments { event_id }).await
    }

    /// Comments on an event.
    pub async fn add_event_comment(&self, event_id: u64, text: &str) -> ClientResult<bool, C> {
        self.submit(&Operation::AddEventComment {
            event_id,
            text: text.to_string(),
        })
        .await
    }

    /// Edits an own comment on an event.
    pub async fn edit_event_comment(
        &self,
        event_id: u64,
        comment_id: u64,
        text: &str,
    ) -> ClientResult<bool, C> {
        self.submit(&Operation::EditEventComment {
            event_id,
            comment_id,
            text: text.to_string(),
        })
        .await
    }

    /// Deletes an own comment on an event.
    pub async fn delete_event_comment(
        &self,
        event_id: u64,
        comment_id: u64,
    ) -> ClientResult<bool, C> {
        self.submit(&Operation::DeleteEventComment {
            event_id,
            comment_id,
        })
        .await
    }

    /// Marks or unmarks the signed-in user as going to an event.
    ///
    /// On success the `has_parks` flag is updated: going to an event counts
    /// as having something to show on the "my grounds" screen.
    pub async fn set_go_to_event(&self, event_id: u64, going: bool) -> ClientResult<bool, C> {
        let changed = self
            .submit(&Operation::SetGoToEvent { event_id, going })
            .await?;
        let trains_somewhere = self
            .store
            .user()
            .is_some_and(|user| !user.park_ids.is_empty());
        self.store.set_has_parks(going || trains_somewhere);
        Ok(changed)
    }

    // -- Dialogs --

    /// Fetches a user's dialogs.
    pub async fn dialogs(&self, user_id: u64) -> ClientResult<Vec<Dialog>, C> {
        self.fetch(&Operation::GetDialogs { user_id }).await
    }

    /// Opens a dialog between the signed-in user and another participant.
    pub async fn create_dialog(&self, participant_id: u64) -> ClientResult<Dialog, C> {
        let user_id = self.require_main_user_id()?;
        self.fetch(&Operation::CreateDialog {
            user_id,
            participant_id,
        })
        .await
    }

    /// Deletes a dialog.
    pub async fn delete_dialog(&self, dialog_id: u64) -> ClientResult<bool, C> {
        self.submit(&Operation::DeleteDialog { dialog_id }).await
    }

    /// Fetches the messages of a dialog.
    pub async fn messages(&self, dialog_id: u64) -> ClientResult<Vec<Message>, C> {
        self.fetch(&Operation::GetMessages { dialog_id }).await
    }

    /// Sends a message, returning the server's echo of it.
    pub async fn send_message(&self, dialog_id: u64, text: &str) -> ClientResult<Message, C> {
        self.fetch(&Operation::SendMessage {
            dialog_id,
            text: text.to_string(),
        })
        .await
    }

    // -- Journals --

    /// Fetches a user's journals.
    ///
    /// When fetching the own list, the `has_journals` flag is updated.
    pub async fn journals(&self, user_id: u64) -> ClientResult<Vec<Journal>, C> {
        let journals = self
            .fetch::<Vec<Journal>>(&Operation::GetJournals { user_id })
            .await?;
        if self.main_user_id() == Some(user_id) {
            self.store.set_has_journals(!journals.is_empty());
        }
        Ok(journals)
    }

    /// Creates a journal for the signed-in user.
    pub async fn create_journal(&self, title: &str) -> ClientResult<Journal, C> {
        let user_id = self.require_main_user_id()?;
        let journal = self
            .fetch::<Journal>(&Operation::CreateJournal {
                user_id,
                title: title.to_string(),
            })
            .await?;
        self.store.set_has_journals(true);
        Ok(journal)
    }

    /// Updates a journal's settings.
    pub async fn edit_journal_settings(
        &self,
        journal_id: u64,
        title: &str,
        closed: bool,
    ) -> ClientResult<bool, C> {
        let user_id = self.require_main_user_id()?;
        self.submit(&Operation::EditJournalSettings {
            user_id,
            journal_id,
            title: title.to_string(),
            closed,
        })
        .await
    }

    /// Deletes a journal.
    pub async fn delete_journal(&self, journal_id: u64) -> ClientResult<bool, C> {
        let user_id = self.require_main_user_id()?;
        self.submit(&Operation::DeleteJournal {
            user_id,
            journal_id,
        })
        .await
    }

    /// Fetches the entries of a journal.
    pub async fn journal_entries(
        &self,
        user_id: u64,
        journal_id: u64,
    ) -> ClientResult<Vec<JournalEntry>, C> {
        self.fetch(&Operation::GetJournalEntries {
            user_id,
            journal_id,
        })
        .await
    }

    /// Appends an entry to one of the signed-in user's journals.
    pub async fn add_journal_entry(&self, journal_id: u64, text: &str) -> ClientResult<bool, C> {
        let user_id = self.require_main_user_id()?;
        self.submit(&Operation::AddJournalEntry {
            user_id,
            journal_id,
            text: text.to_string(),
        })
        .await
    }

    /// Edits a journal entry.
    pub async fn edit_journal_entry(
        &self,
        journal_id: u64,
        entry_id: u64,
        text: &str,
    ) -> ClientResult<bool, C> {
        let user_id = self.require_main_user_id()?;
        self.submit(&Operation::EditJournalEntry {
            user_id,
            journal_id,
            entry_id,
            text: text.to_string(),
        })
        .await
    }

    /// Deletes a journal entry.
    pub async fn delete_journal_entry(
        &self,
        journal_id: u64,
        entry_id: u64,
    ) -> ClientResult<bool, C> {
        let user_id = self.require_main_user_id()?;
        self.submit(&Operation::DeleteJournalEntry {
            user_id,
            journal_id,
            entry_id,
        })
        .await
    }

    // -- Photos --

    /// Deletes an uploaded photo.
    pub async fn delete_photo(&self, photo_id: u64) -> ClientResult<bool, C> {
        self.submit(&Operation::DeletePhoto { photo_id }).await
    }

    // -- Composites --

    /// Fetches profile, friends, friend requests, and blacklist for a user
    /// concurrently.
    ///
    /// The four reads are joined, not raced: all must succeed or the first
    /// failure fails the whole composite and every partial result is
    /// discarded. Only after all four succeed, and only for the signed-in
    /// user, are the snapshot, cached lists, and derived flags written.
    pub async fn social_updates(&self, user_id: u64) -> ClientResult<SocialUpdates, C> {
        let get_user = Operation::GetUser { user_id };
        let get_friends = Operation::GetFriends { user_id };
        let get_friend_requests = Operation::GetFriendRequests { user_id };
        let get_blacklist = Operation::GetBlacklist { user_id };
        let (user, friends, friend_requests, blacklist) = tokio::try_join!(
            self.fetch::<User>(&get_user),
            self.fetch::<Vec<User>>(&get_friends),
            self.fetch::<Vec<FriendRequest>>(&get_friend_requests),
            self.fetch::<Vec<User>>(&get_blacklist),
        )?;

        if self.main_user_id() == Some(user_id) {
            self.store.set_user(user.clone());
            self.store
                .set_friend_ids(friends.iter().map(|user| user.id).collect());
            self.store.set_friend_requests(friend_requests.clone());
            self.store
                .set_blacklist(blacklist.iter().map(|user| user.id).collect());
            self.store.set_needs_update(false);
        }

        Ok(SocialUpdates {
            user,
            friends,
            friend_requests,
            blacklist,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use snafu::Snafu;

    use super::*;
    use crate::session::MemoryStore;

    #[derive(Debug, Snafu)]
    enum MockError {
        #[snafu(display("connection refused"))]
        Offline,
        #[snafu(display("no scripted response for {path}"))]
        Unscripted { path: String },
    }

    impl crate::Error for MockError {
        fn is_connectivity(&self) -> bool {
            matches!(self, MockError::Offline)
        }
    }

    #[derive(Debug, Clone)]
    struct RecordedRequest {
        method: http::Method,
        path: String,
        authorized: bool,
    }

    /// Routes scripted responses by path so concurrent requests stay
    /// deterministic, and records every request it sees.
    #[derive(Debug, Default)]
    struct MockHttpClient {
        script: Mutex<Vec<(String, Result<(u16, String), MockOffline>)>>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    #[derive(Debug, Clone, Copy)]
    struct MockOffline;

    impl MockHttpClient {
        fn new() -> Self {
            Self::default()
        }

        fn expect(&self, path: &str, status: u16, body: &str) {
            self.script
                .lock()
                .unwrap()
                .push((path.to_string(), Ok((status, body.to_string()))));
        }

        fn expect_offline(&self, path: &str) {
            self.script
                .lock()
                .unwrap()
                .push((path.to_string(), Err(MockOffline)));
        }

        fn recorded(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn recorded_paths(&self) -> Vec<String> {
            self.recorded().into_iter().map(|r| r.path).collect()
        }
    }

    struct MockResponse {
        status: StatusCode,
        body: Bytes,
    }

    impl HttpResponse for MockResponse {
        type Error = MockError;

        fn status(&self) -> StatusCode {
            self.status
        }

        async fn body(self) -> Result<Bytes, MockError> {
            Ok(self.body)
        }
    }

    impl HttpClient for MockHttpClient {
        type Error = MockError;
        type Response = MockResponse;

        async fn execute(&self, request: Request<Bytes>) -> Result<MockResponse, MockError> {
            let path = request.uri().path().to_string();
            self.requests.lock().unwrap().push(RecordedRequest {
                method: request.method().clone(),
                path: path.clone(),
                authorized: request.headers().contains_key(http::header::AUTHORIZATION),
            });

            let entry = {
                let mut script = self.script.lock().unwrap();
                let position = script.iter().position(|(p, _)| *p == path);
                position.map(|at| script.remove(at).1)
            };
            match entry {
                Some(Ok((status, body))) => Ok(MockResponse {
                    status: StatusCode::from_u16(status).unwrap(),
                    body: Bytes::from(body),
                }),
                Some(Err(MockOffline)) => Err(MockError::Offline),
                None => Err(MockError::Unscripted { path }),
            }
        }
    }

    fn test_client(
        mock: MockHttpClient,
        store: MemoryStore,
    ) -> GroundsClient<MockHttpClient, MemoryStore> {
        GroundsClient::builder()
            .base_url("https://grounds.test")
            .unwrap()
            .http_client(mock)
            .store(store)
            .build()
    }

    fn signed_in(store: &MemoryStore, id: u64) {
        store.set_credentials(Credentials::new("alice", "hunter2"));
        store.set_user(User {
            id,
            name: "alice".into(),
            ..User::default()
        });
    }

    fn user_json(id: u64) -> String {
        format!(r#"{{"id":{id},"name":"alice","park_ids":[3]}}"#)
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_any_network_call() {
        let client = test_client(MockHttpClient::new(), MemoryStore::new());

        let error = client.user(5).await.unwrap_err();

        assert!(matches!(
            error,
            ClientError::Api {
                source: ApiError::BadRequest
            }
        ));
        assert!(client.http_client.recorded_paths().is_empty());
    }

    #[tokio::test]
    async fn unbuildable_find_users_url_is_a_bad_request() {
        let store = MemoryStore::new();
        signed_in(&store, 1);
        let client = test_client(MockHttpClient::new(), store);

        let error = client.find_users("Jo hn").await.unwrap_err();

        assert!(matches!(
            error,
            ClientError::Api {
                source: ApiError::BadRequest
            }
        ));
        assert!(client.http_client.recorded_paths().is_empty());
    }

    #[tokio::test]
    async fn requests_carry_basic_credentials_when_required() {
        let store = MemoryStore::new();
        signed_in(&store, 1);
        let mock = MockHttpClient::new();
        mock.expect("/users/1", 200, &user_json(1));
        let client = test_client(mock, store);

        client.user(1).await.unwrap();

        let recorded = client.http_client.recorded();
        assert_eq!(recorded.len(), 1);
        assert!(recorded[0].authorized);
        assert_eq!(recorded[0].method, http::Method::GET);
    }

    #[tokio::test]
    async fn registration_is_unauthenticated() {
        let mock = MockHttpClient::new();
        mock.expect("/auth/register", 200, "");
        let client = test_client(mock, MemoryStore::new());

        let created = client.register(RegistrationForm::default()).await.unwrap();

        assert!(created);
        let recorded = client.http_client.recorded();
        assert!(!recorded[0].authorized);
        assert_eq!(recorded[0].method, http::Method::POST);
    }

    #[tokio::test]
    async fn login_persists_snapshot_and_flags() {
        let mock = MockHttpClient::new();
        mock.expect("/auth/login", 200, &user_json(1));
        let client = test_client(mock, MemoryStore::new());

        let user = client
            .login(Credentials::new("alice", "hunter2"))
            .await
            .unwrap();

        assert_eq!(user.id, 1);
        assert!(client.store().has_parks());
        assert!(!client.store().needs_update());
        assert!(client.store().is_authorized());
    }

    #[tokio::test]
    async fn login_failure_is_not_a_forced_logout() {
        let mock = MockHttpClient::new();
        mock.expect("/auth/login", 401, "{}");
        let client = test_client(mock, MemoryStore::new());

        let error = client
            .login(Credentials::new("alice", "wrong"))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            ClientError::Api {
                source: ApiError::InvalidCredentials
            }
        ));
        assert!(client.store().user().is_none());
    }

    #[tokio::test]
    async fn rejected_credentials_clear_the_session() {
        let store = MemoryStore::new();
        signed_in(&store, 1);
        let mock = MockHttpClient::new();
        mock.expect("/users/5", 401, "{}");
        let client = test_client(mock, store);

        let error = client.user(5).await.unwrap_err();

        assert!(matches!(error, ClientError::ForceLogout));
        assert!(!client.store().is_authorized());
        assert!(client.store().user().is_none());
    }

    #[tokio::test]
    async fn connectivity_failures_surface_as_no_connection() {
        let store = MemoryStore::new();
        signed_in(&store, 1);
        let mock = MockHttpClient::new();
        mock.expect_offline("/areas");
        let client = test_client(mock, store);

        let error = client.parks().await.unwrap_err();

        assert!(matches!(error, ClientError::NoConnection));
    }

    #[tokio::test]
    async fn unknown_statuses_stay_unknown() {
        let store = MemoryStore::new();
        signed_in(&store, 1);
        let mock = MockHttpClient::new();
        mock.expect("/areas/7", 418, "");
        let client = test_client(mock, store);

        let error = client.park(7).await.unwrap_err();

        assert!(matches!(
            error,
            ClientError::Api {
                source: ApiError::Unknown
            }
        ));
    }

    #[tokio::test]
    async fn fetching_own_friends_persists_the_id_list() {
        let store = MemoryStore::new();
        signed_in(&store, 1);
        let mock = MockHttpClient::new();
        mock.expect("/users/1/friends", 200, r#"[{"id":2,"name":"bob"}]"#);
        let client = test_client(mock, store);

        client.friends(1).await.unwrap();

        assert_eq!(client.store().friend_ids(), vec![2]);
        assert!(client.store().has_friends());
    }

    #[tokio::test]
    async fn fetching_other_users_friends_leaves_the_cache_alone() {
        let store = MemoryStore::new();
        signed_in(&store, 1);
        let mock = MockHttpClient::new();
        mock.expect("/users/9/friends", 200, r#"[{"id":2,"name":"bob"}]"#);
        let client = test_client(mock, store);

        client.friends(9).await.unwrap();

        assert!(client.store().friend_ids().is_empty());
        assert!(!client.store().has_friends());
    }

    #[tokio::test]
    async fn accepting_a_friend_request_refreshes_both_lists() {
        let store = MemoryStore::new();
        signed_in(&store, 1);
        let mock = MockHttpClient::new();
        mock.expect("/users/9/friends/respond", 200, "");
        mock.expect("/users/1/friends", 200, r#"[{"id":9,"name":"bob"}]"#);
        mock.expect("/users/1/friendrequests", 200, "[]");
        let client = test_client(mock, store);

        let responded = client.respond_to_friend_request(9, true).await.unwrap();

        assert!(responded);
        assert_eq!(
            client.http_client.recorded_paths(),
            [
                "/users/9/friends/respond",
                "/users/1/friends",
                "/users/1/friendrequests"
            ]
        );
        assert_eq!(client.store().friend_ids(), vec![9]);
    }

    #[tokio::test]
    async fn declining_a_friend_request_refreshes_only_the_requests() {
        let store = MemoryStore::new();
        signed_in(&store, 1);
        let mock = MockHttpClient::new();
        mock.expect("/users/9/friends/respond", 200, "");
        mock.expect("/users/1/friendrequests", 200, "[]");
        let client = test_client(mock, store);

        let responded = client.respond_to_friend_request(9, false).await.unwrap();

        assert!(responded);
        assert_eq!(
            client.http_client.recorded_paths(),
            ["/users/9/friends/respond", "/users/1/friendrequests"]
        );
    }

    #[tokio::test]
    async fn train_here_updates_the_cached_snapshot() {
        let store = MemoryStore::new();
        signed_in(&store, 1);
        let mock = MockHttpClient::new();
        mock.expect("/areas/3/train", 200, "");
        mock.expect("/areas/3/train", 200, "");
        let client = test_client(mock, store);

        client.set_train_here(3, true).await.unwrap();
        assert!(client.store().has_parks());
        assert_eq!(client.store().user().unwrap().park_ids, vec![3]);

        client.set_train_here(3, false).await.unwrap();
        assert!(!client.store().has_parks());
        assert!(client.store().user().unwrap().park_ids.is_empty());
    }

    #[tokio::test]
    async fn going_to_an_event_sets_has_parks() {
        let store = MemoryStore::new();
        signed_in(&store, 1);
        let mock = MockHttpClient::new();
        mock.expect("/trainings/4/go", 200, "");
        let client = test_client(mock, store);

        client.set_go_to_event(4, true).await.unwrap();

        assert!(client.store().has_parks());
    }

    #[tokio::test]
    async fn social_updates_writes_the_store_only_on_full_success() {
        let store = MemoryStore::new();
        signed_in(&store, 1);
        store.set_needs_update(true);
        let mock = MockHttpClient::new();
        mock.expect("/users/1", 200, &user_json(1));
        mock.expect("/users/1/friends", 200, r#"[{"id":2,"name":"bob"}]"#);
        mock.expect("/users/1/friendrequests", 500, "{}");
        mock.expect("/users/1/blacklist", 200, "[]");
        let client = test_client(mock, store);

        let error = client.social_updates(1).await.unwrap_err();

        assert!(matches!(
            error,
            ClientError::Api {
                source: ApiError::ServerError
            }
        ));
        assert!(client.store().friend_ids().is_empty());
        assert!(client.store().needs_update());
    }

    #[tokio::test]
    async fn social_updates_persists_everything_on_success() {
        let store = MemoryStore::new();
        signed_in(&store, 1);
        store.set_needs_update(true);
        let mock = MockHttpClient::new();
        mock.expect("/users/1", 200, &user_json(1));
        mock.expect("/users/1/friends", 200, r#"[{"id":2,"name":"bob"}]"#);
        mock.expect(
            "/users/1/friendrequests",
            200,
            r#"[{"id":11,"sender_id":7}]"#,
        );
        mock.expect("/users/1/blacklist", 200, r#"[{"id":6,"name":"eve"}]"#);
        let client = test_client(mock, store);

        let updates = client.social_updates(1).await.unwrap();

        assert_eq!(updates.friends.len(), 1);
        assert_eq!(client.store().friend_ids(), vec![2]);
        assert_eq!(client.store().blacklist(), vec![6]);
        assert_eq!(client.store().friend_requests().len(), 1);
        assert!(client.store().has_parks());
        assert!(!client.store().needs_update());
    }

    #[tokio::test]
    async fn own_journals_update_the_has_journals_flag() {
        let store = MemoryStore::new();
        signed_in(&store, 1);
        let mock = MockHttpClient::new();
        mock.expect(
            "/users/1/journals",
            200,
            r#"[{"id":6,"title":"Pull-ups"}]"#,
        );
        let client = test_client(mock, store);

        client.journals(1).await.unwrap();

        assert!(client.store().has_journals());
    }

    #[tokio::test]
    async fn main_user_operations_need_a_cached_snapshot() {
        let store = MemoryStore::new();
        store.set_credentials(Credentials::new("alice", "hunter2"));
        let client = test_client(MockHttpClient::new(), store);

        let error = client.create_journal("Pull-ups").await.unwrap_err();

        assert!(matches!(
            error,
            ClientError::Api {
                source: ApiError::InvalidUserId
            }
        ));
        assert!(client.http_client.recorded_paths().is_empty());
    }
}
