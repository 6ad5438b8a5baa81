//! Session store.
//!
//! Holds the authenticated identity and bearer token. Two states:
//! anonymous (no person) and authenticated; login and logout are the only
//! transitions. There is no timer-based logout - the backend's 401 is the
//! expiry signal, wired through `StoreContext::handle_api_error`.
//!
//! Other stores react to session changes by subscribing to
//! [`SessionEvent`]s rather than being called directly; the cart must not
//! survive a session end, and the subscription keeps the two stores
//! decoupled.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::warn;

use huellitas_core::UserId;

use crate::api::TokenCell;
use crate::models::user::Person;
use crate::storage::{JsonStore, Snapshot, StorageError};

/// Session lifecycle events, published to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A user authenticated via `set_auth`.
    LoggedIn,
    /// The session ended; dependent state must not outlive it.
    LoggedOut,
}

/// Persisted session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub person: Option<Person>,
    pub token: Option<String>,
}

impl Snapshot for SessionSnapshot {
    const VERSION: u32 = 1;

    fn migrate(_state: serde_json::Value, version: u32) -> Result<Self, StorageError> {
        Err(StorageError::UnsupportedVersion {
            found: version,
            latest: Self::VERSION,
        })
    }
}

/// The session store.
pub struct SessionStore {
    person: Option<Person>,
    token: Option<SecretString>,
    token_cell: TokenCell,
    listeners: Vec<Box<dyn Fn(&SessionEvent)>>,
    storage: Option<JsonStore<SessionSnapshot>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create an empty, in-memory-only session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            person: None,
            token: None,
            token_cell: TokenCell::default(),
            listeners: Vec::new(),
            storage: None,
        }
    }

    /// Create a session backed by a snapshot file, restoring persisted
    /// state and republishing the token for the API client.
    ///
    /// An unreadable snapshot is discarded with a warning and the session
    /// starts anonymous.
    #[must_use]
    pub fn with_storage(storage: JsonStore<SessionSnapshot>) -> Self {
        let snapshot = match storage.load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, path = %storage.path().display(), "discarding unreadable session snapshot");
                None
            }
        };

        let mut session = Self::new();
        session.storage = Some(storage);

        if let Some(snapshot) = snapshot {
            session.person = snapshot.person;
            session.token = snapshot.token.map(SecretString::from);
            if let Some(token) = &session.token {
                session.token_cell.set(token.clone());
            }
        }

        session
    }

    /// Handle to the shared token cell, for constructing the API client.
    #[must_use]
    pub fn token_cell(&self) -> TokenCell {
        self.token_cell.clone()
    }

    /// Register a listener for session events.
    pub fn subscribe(&mut self, listener: impl Fn(&SessionEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The authenticated person, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&Person> {
        self.person.as_ref()
    }

    /// The account id of the authenticated person, if any.
    #[must_use]
    pub fn current_user_id(&self) -> Option<UserId> {
        self.person.as_ref().map(Person::user_id)
    }

    /// Whether a user is logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.person.is_some()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Replace the identity and token (login).
    pub fn set_auth(&mut self, person: Person, token: SecretString) {
        self.token_cell.set(token.clone());
        self.person = Some(person);
        self.token = Some(token);
        self.persist();
        self.emit(&SessionEvent::LoggedIn);
    }

    /// End the session, clearing identity and token.
    ///
    /// Subscribers receive [`SessionEvent::LoggedOut`]; the cart clears
    /// itself on receipt.
    pub fn logout(&mut self) {
        self.person = None;
        self.token = None;
        self.token_cell.clear();
        self.persist();
        self.emit(&SessionEvent::LoggedOut);
    }

    fn emit(&self, event: &SessionEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    fn persist(&self) {
        if let Some(storage) = &self.storage {
            let snapshot = SessionSnapshot {
                person: self.person.clone(),
                token: self
                    .token
                    .as_ref()
                    .map(|t| t.expose_secret().to_owned()),
            };
            if let Err(e) = storage.save(&snapshot) {
                warn!(error = %e, path = %storage.path().display(), "failed to persist session snapshot");
            }
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("person", &self.person)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("listeners", &self.listeners.len())
            .field("persisted", &self.storage.is_some())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use huellitas_core::{Email, PersonId, RecordStatus};

    use crate::models::user::Account;

    fn person(user_id: i32) -> Person {
        Person {
            id: PersonId::new(100 + user_id),
            given_name: "Ana".to_owned(),
            paternal_surname: "Torres".to_owned(),
            maternal_surname: "Rojas".to_owned(),
            email: Email::parse("ana@example.com").unwrap(),
            account: Account {
                id: UserId::new(user_id),
                username: "atorres".to_owned(),
                status: RecordStatus::Active,
            },
        }
    }

    #[test]
    fn test_starts_anonymous() {
        let session = SessionStore::new();
        assert!(!session.is_authenticated());
        assert!(session.current_user().is_none());
        assert!(session.token_cell().get().is_none());
    }

    #[test]
    fn test_set_auth_transitions_to_authenticated() {
        let mut session = SessionStore::new();
        session.set_auth(person(7), SecretString::from("tok-123"));

        assert!(session.is_authenticated());
        assert_eq!(session.current_user_id(), Some(UserId::new(7)));
        assert_eq!(
            session.token_cell().get().unwrap().expose_secret(),
            "tok-123"
        );
    }

    #[test]
    fn test_logout_clears_identity_and_token() {
        let mut session = SessionStore::new();
        session.set_auth(person(7), SecretString::from("tok-123"));

        session.logout();

        assert!(!session.is_authenticated());
        assert!(session.current_user().is_none());
        assert!(session.token_cell().get().is_none());
    }

    #[test]
    fn test_events_reach_subscribers() {
        let mut session = SessionStore::new();
        let logouts = Rc::new(Cell::new(0));
        let logins = Rc::new(Cell::new(0));

        let seen_logouts = Rc::clone(&logouts);
        let seen_logins = Rc::clone(&logins);
        session.subscribe(move |event| match event {
            SessionEvent::LoggedIn => seen_logins.set(seen_logins.get() + 1),
            SessionEvent::LoggedOut => seen_logouts.set(seen_logouts.get() + 1),
        });

        session.set_auth(person(7), SecretString::from("tok-123"));
        session.logout();
        session.logout();

        assert_eq!(logins.get(), 1);
        assert_eq!(logouts.get(), 2);
    }

    #[test]
    fn test_session_survives_restart_via_storage() {
        let dir = tempfile::tempdir().unwrap();
        let storage: JsonStore<SessionSnapshot> =
            JsonStore::in_dir(dir.path(), "session.json");

        let mut session = SessionStore::with_storage(storage.clone());
        session.set_auth(person(7), SecretString::from("tok-123"));
        drop(session);

        let restored = SessionStore::with_storage(storage);
        assert!(restored.is_authenticated());
        assert_eq!(restored.current_user_id(), Some(UserId::new(7)));
        assert_eq!(
            restored.token_cell().get().unwrap().expose_secret(),
            "tok-123"
        );
    }

    #[test]
    fn test_logged_out_session_restores_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let storage: JsonStore<SessionSnapshot> =
            JsonStore::in_dir(dir.path(), "session.json");

        let mut session = SessionStore::with_storage(storage.clone());
        session.set_auth(person(7), SecretString::from("tok-123"));
        session.logout();
        drop(session);

        let restored = SessionStore::with_storage(storage);
        assert!(!restored.is_authenticated());
        assert!(restored.token_cell().get().is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut session = SessionStore::new();
        session.set_auth(person(7), SecretString::from("tok-123"));

        let debug = format!("{session:?}");
        assert!(!debug.contains("tok-123"));
        assert!(debug.contains("REDACTED"));
    }
}
