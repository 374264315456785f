//! Credential and session state storage.
//!
//! [`SessionStore`] abstracts the process-wide session state the client
//! reads and writes: stored credentials, the last-known user snapshot,
//! cached friend/request/blacklist lists, and the derived flags screens
//! branch on without re-fetching. The store is an injected dependency so
//! the client facade can be exercised against a fake; [`MemoryStore`] is
//! the default implementation.
//!
//! Concurrent request chains may race on the store. Writes are
//! last-write-wins; this is an accepted weak consistency, not a
//! serializability guarantee.

use std::sync::{Arc, RwLock};

use crate::auth::Credentials;
use crate::models::{FriendRequest, User};
use crate::platform::MaybeSendSync;

/// Read/write access to session state.
///
/// The derived flags (`has_parks`, `has_friends`, `has_journals`,
/// `needs_update`) cache facts about the last-known snapshot; the client
/// updates them on the exact operations documented on its methods, and
/// [`SessionStore::trigger_logout`] clears everything at once.
pub trait SessionStore: MaybeSendSync {
    /// The stored credentials, if the user is signed in.
    fn credentials(&self) -> Option<Credentials>;
    /// Replaces the stored credentials.
    fn set_credentials(&self, credentials: Credentials);

    /// The last-known snapshot of the signed-in user.
    fn user(&self) -> Option<User>;
    /// Replaces the user snapshot and recomputes the flags derived from it.
    fn set_user(&self, user: User);

    /// Cached ids of the signed-in user's friends.
    fn friend_ids(&self) -> Vec<u64>;
    /// Replaces the cached friend id list and the `has_friends` flag.
    fn set_friend_ids(&self, ids: Vec<u64>);

    /// Cached incoming friend requests.
    fn friend_requests(&self) -> Vec<FriendRequest>;
    /// Replaces the cached friend request list.
    fn set_friend_requests(&self, requests: Vec<FriendRequest>);

    /// Cached ids of blacklisted users.
    fn blacklist(&self) -> Vec<u64>;
    /// Replaces the cached blacklist.
    fn set_blacklist(&self, ids: Vec<u64>);

    /// Whether credentials are currently stored.
    fn is_authorized(&self) -> bool {
        self.credentials().is_some()
    }

    /// Whether the user has grounds (or an event) to show on the "my
    /// grounds" screen.
    fn has_parks(&self) -> bool;
    /// Overrides the `has_parks` flag.
    fn set_has_parks(&self, value: bool);

    /// Whether the user has any friends.
    fn has_friends(&self) -> bool;
    /// Overrides the `has_friends` flag.
    fn set_has_friends(&self, value: bool);

    /// Whether the user has any journals.
    fn has_journals(&self) -> bool;
    /// Overrides the `has_journals` flag.
    fn set_has_journals(&self, value: bool);

    /// Whether the profile snapshot is stale and should be re-fetched.
    fn needs_update(&self) -> bool;
    /// Overrides the `needs_update` flag.
    fn set_needs_update(&self, value: bool);

    /// Clears credentials, snapshot, cached lists, and all derived flags in
    /// one step.
    fn trigger_logout(&self);
}

impl<S: SessionStore> SessionStore for Arc<S> {
    fn credentials(&self) -> Option<Credentials> {
        self.as_ref().credentials()
    }
    fn set_credentials(&self, credentials: Credentials) {
        self.as_ref().set_credentials(credentials);
    }
    fn user(&self) -> Option<User> {
        self.as_ref().user()
    }
    fn set_user(&self, user: User) {
        self.as_ref().set_user(user);
    }
    fn friend_ids(&self) -> Vec<u64> {
        self.as_ref().friend_ids()
    }
    fn set_friend_ids(&self, ids: Vec<u64>) {
        self.as_ref().set_friend_ids(ids);
    }
    fn friend_requests(&self) -> Vec<FriendRequest> {
        self.as_ref().friend_requests()
    }
    fn set_friend_requests(&self, requests: Vec<FriendRequest>) {
        self.as_ref().set_friend_requests(requests);
    }
    fn blacklist(&self) -> Vec<u64> {
        self.as_ref().blacklist()
    }
    fn set_blacklist(&self, ids: Vec<u64>) {
        self.as_ref().set_blacklist(ids);
    }
    fn has_parks(&self) -> bool {
        self.as_ref().has_parks()
    }
    fn set_has_parks(&self, value: bool) {
        self.as_ref().set_has_parks(value);
    }
    fn has_friends(&self) -> bool {
        self.as_ref().has_friends()
    }
    fn set_has_friends(&self, value: bool) {
        self.as_ref().set_has_friends(value);
    }
    fn has_journals(&self) -> bool {
        self.as_ref().has_journals()
    }
    fn set_has_journals(&self, value: bool) {
        self.as_ref().set_has_journals(value);
    }
    fn needs_update(&self) -> bool {
        self.as_ref().needs_update()
    }
    fn set_needs_update(&self, value: bool) {
        self.as_ref().set_needs_update(value);
    }
    fn trigger_logout(&self) {
        self.as_ref().trigger_logout();
    }
}

#[derive(Debug, Default)]
struct SessionState {
    credentials: Option<Credentials>,
    user: Option<User>,
    friend_ids: Vec<u64>,
    friend_requests: Vec<FriendRequest>,
    blacklist: Vec<u64>,
    has_parks: bool,
    has_friends: bool,
    has_journals: bool,
    needs_update: bool,
}

/// An in-memory [`SessionStore`].
///
/// Suitable for tests and for apps that keep sessions ephemeral. Backed by
/// a single [`RwLock`]; `trigger_logout` resets the whole state under one
/// write lock so a concurrent reader never observes a half-cleared session.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<SessionState>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&SessionState) -> T) -> T {
        // Lock poisoning only happens if a writer panicked; recover the data.
        let state = self.state.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&state)
    }

    fn write<T>(&self, f: impl FnOnce(&mut SessionState) -> T) -> T {
        let mut state = self.state.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut state)
    }
}

impl SessionStore for MemoryStore {
    fn credentials(&self) -> Option<Credentials> {
        self.read(|s| s.credentials.clone())
    }

    fn set_credentials(&self, credentials: Credentials) {
        self.write(|s| s.credentials = Some(credentials));
    }

    fn user(&self) -> Option<User> {
        self.read(|s| s.user.clone())
    }

    fn set_user(&self, user: User) {
        self.write(|s| {
            s.has_parks = !user.park_ids.is_empty();
            s.has_journals = !user.journal_ids.is_empty();
            s.user = Some(user);
        });
    }

    fn friend_ids(&self) -> Vec<u64> {
        self.read(|s| s.friend_ids.clone())
    }

    fn set_friend_ids(&self, ids: Vec<u64>) {
        self.write(|s| {
            s.has_friends = !ids.is_empty();
            s.friend_ids = ids;
        });
    }

    fn friend_requests(&self) -> Vec<FriendRequest> {
        self.read(|s| s.friend_requests.clone())
    }

    fn set_friend_requests(&self, requests: Vec<FriendRequest>) {
        self.write(|s| s.friend_requests = requests);
    }

    fn blacklist(&self) -> Vec<u64> {
        self.read(|s| s.blacklist.clone())
    }

    fn set_blacklist(&self, ids: Vec<u64>) {
        self.write(|s| s.blacklist = ids);
    }

    fn has_parks(&self) -> bool {
        self.read(|s| s.has_parks)
    }

    fn set_has_parks(&self, value: bool) {
        self.write(|s| s.has_parks = value);
    }

    fn has_friends(&self) -> bool {
        self.read(|s| s.has_friends)
    }

    fn set_has_friends(&self, value: bool) {
        self.write(|s| s.has_friends = value);
    }

    fn has_journals(&self) -> bool {
        self.read(|s| s.has_journals)
    }

    fn set_has_journals(&self, value: bool) {
        self.write(|s| s.has_journals = value);
    }

    fn needs_update(&self) -> bool {
        self.read(|s| s.needs_update)
    }

    fn set_needs_update(&self, value: bool) {
        self.write(|s| s.needs_update = value);
    }

    fn trigger_logout(&self) {
        self.write(|s| *s = SessionState::default());
    }
}
