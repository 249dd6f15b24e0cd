//! The authenticated session, and the local file that lets it survive a restart

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The authenticated user, as the server describes it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    username: String,
    email: String,
}

impl UserIdentity {
    pub fn new<S: ToString, T: ToString>(username: S, email: T) -> Self {
        Self { username: username.to_string(), email: email.to_string() }
    }

    pub fn username(&self) -> &str { &self.username }
    pub fn email(&self) -> &str    { &self.email }
}

/// The authenticated principal: a bearer credential and who it belongs to.
///
/// A `Session` is created by [`Client::login`](crate::client::Client::login) (or registration),
/// and is explicitly injected into every [`Client`](crate::client::Client); nothing in this
/// crate reads credentials from ambient global state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// The opaque bearer credential, attached to every authenticated request.
    /// Some server versions call this field `access_token`.
    #[serde(alias = "access_token")]
    token: String,
    user: UserIdentity,
}

impl Session {
    pub fn new<S: ToString>(token: S, user: UserIdentity) -> Self {
        Self { token: token.to_string(), user }
    }

    pub fn bearer_token(&self) -> &str   { &self.token }
    pub fn user(&self) -> &UserIdentity  { &self.user }
    pub fn username(&self) -> &str       { self.user.username() }
}

/// Which top-level view an application should show on startup
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartupView {
    /// Nobody is logged in: show the landing/login view
    Landing,
    /// A session was restored: go straight to the calendar
    Calendar,
}

/// Holds the current [`Session`] and persists it in a local backing file,
/// so that a restart does not require logging in again.
#[derive(Debug, PartialEq)]
pub struct SessionStore {
    backing_file: PathBuf,
    session: Option<Session>,
}

impl SessionStore {
    /// The default path to the session file
    pub fn session_file() -> PathBuf {
        PathBuf::from(String::from("~/.config/corkboard/session.json"))
    }

    /// Restore a store from the content of a valid backing file if it exists.
    /// Returns an error otherwise (a caller usually falls back to [`SessionStore::new`])
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let session = match std::fs::File::open(path) {
            Err(err) => {
                return Err(Error::Storage(format!("unable to open {:?}: {}", path, err)));
            }
            Ok(file) => serde_json::from_reader(file)
                .map_err(|err| Error::Storage(format!("invalid session file {:?}: {}", path, err)))?,
        };

        Ok(Self {
            backing_file: PathBuf::from(path),
            session: Some(session),
        })
    }

    /// Initialize a store with no session
    pub fn new(path: &Path) -> Self {
        Self {
            backing_file: PathBuf::from(path),
            session: None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// The view an application should open with, given what this store holds
    pub fn startup_view(&self) -> StartupView {
        match &self.session {
            None => StartupView::Landing,
            Some(_) => StartupView::Calendar,
        }
    }

    /// Adopt a freshly authenticated session and persist it
    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
        self.save_to_file();
    }

    /// Log out: reset the in-memory state and delete the backing file
    pub fn clear(&mut self) {
        self.session = None;
        if self.backing_file.exists() {
            if let Err(err) = std::fs::remove_file(&self.backing_file) {
                log::warn!("Unable to remove session file {:?}: {}", self.backing_file, err);
            }
        }
    }

    /// Store the current session to the backing file
    fn save_to_file(&mut self) {
        let path = &self.backing_file;
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let session = match &self.session {
            None => return,
            Some(s) => s,
        };

        let file = match std::fs::File::create(path) {
            Err(err) => {
                log::warn!("Unable to save session file {:?}: {}", path, err);
                return;
            }
            Ok(f) => f,
        };

        if let Err(err) = serde_json::to_writer(file, session) {
            log::warn!("Unable to serialize session: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some_session() -> Session {
        Session::new("tok-123", UserIdentity::new("john", "john@example.com"))
    }

    #[test]
    fn serde_session_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut store = SessionStore::new(&path);
        assert_eq!(store.startup_view(), StartupView::Landing);

        store.set_session(some_session());
        assert_eq!(store.startup_view(), StartupView::Calendar);

        let restored = SessionStore::from_file(&path).unwrap();
        assert_eq!(store, restored);
        assert_eq!(restored.session().unwrap().username(), "john");
    }

    #[test]
    fn logging_out_lands_back_on_the_landing_view() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut store = SessionStore::new(&path);
        store.set_session(some_session());
        store.clear();

        // the "page reload": a fresh store can no longer restore anything
        assert!(SessionStore::from_file(&path).is_err());
        assert_eq!(SessionStore::new(&path).startup_view(), StartupView::Landing);
    }

    #[test]
    fn accepts_the_legacy_token_field_name() {
        let session: Session = serde_json::from_value(serde_json::json!({
            "access_token": "tok-456",
            "user": {"username": "ada", "email": "ada@example.com"}
        }))
        .unwrap();
        assert_eq!(session.bearer_token(), "tok-456");
    }
}
