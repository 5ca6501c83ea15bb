use super::Session;
use crate::errors::AuthError;
use directories::ProjectDirs;
use std::cell::{Cell, RefCell};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Storage key holding the serialized [`Session`].
pub const SESSION_KEY: &str = "currentUser";

/// Where the session record is kept between runs.
///
/// `load` never fails: a missing or malformed record is "no session".
pub trait SessionStore {
    fn load(&self) -> Option<Session>;
    fn save(&self, session: &Session) -> Result<(), AuthError>;
    fn clear(&self) -> Result<(), AuthError>;
}

fn decode(raw: &str) -> Option<Session> {
    match serde_json::from_str::<Session>(raw) {
        Ok(session) if !session.username.is_empty() => Some(session),
        Ok(_) => {
            debug!("discarding stored session with empty username");
            None
        }
        Err(err) => {
            debug!(error = %err, "discarding malformed stored session");
            None
        }
    }
}

fn encode(session: &Session) -> Result<String, AuthError> {
    serde_json::to_string(session).map_err(|err| AuthError::Storage(err.to_string()))
}

/// File-backed key-value storage. Each key is a `<key>.json` file in one directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage in the platform data directory for StealthMate.
    pub fn default_location() -> Result<Self, AuthError> {
        let dirs = ProjectDirs::from("", "", "stealthmate").ok_or(AuthError::NoStorageDir)?;
        Ok(Self::new(dirs.data_dir()))
    }

    /// Storage in `dir`, or the platform default when `None`.
    pub fn from_dir(dir: Option<&Path>) -> Result<Self, AuthError> {
        match dir {
            Some(dir) => Ok(Self::new(dir)),
            None => Self::default_location(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path(key)).ok()
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<(), AuthError> {
        fs::create_dir_all(&self.dir).map_err(|err| AuthError::Storage(err.to_string()))?;
        fs::write(self.path(key), value).map_err(|err| AuthError::Storage(err.to_string()))
    }

    pub fn remove_item(&self, key: &str) -> Result<(), AuthError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::Storage(err.to_string())),
        }
    }
}

impl SessionStore for LocalStorage {
    fn load(&self) -> Option<Session> {
        self.get_item(SESSION_KEY).as_deref().and_then(decode)
    }

    fn save(&self, session: &Session) -> Result<(), AuthError> {
        self.set_item(SESSION_KEY, &encode(session)?)
    }

    fn clear(&self) -> Result<(), AuthError> {
        self.remove_item(SESSION_KEY)
    }
}

/// In-process store. Holds the raw serialized record so tests can plant garbage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    raw: RefCell<Option<String>>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `raw` under the session key.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: RefCell::new(Some(raw.into())),
            writes: Cell::new(0),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }

    /// Number of `save` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Option<Session> {
        self.raw.borrow().as_deref().and_then(decode)
    }

    fn save(&self, session: &Session) -> Result<(), AuthError> {
        let encoded = encode(session)?;
        *self.raw.borrow_mut() = Some(encoded);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        self.raw.borrow_mut().take();
        Ok(())
    }
}

impl<T: SessionStore + ?Sized> SessionStore for &T {
    fn load(&self) -> Option<Session> {
        (**self).load()
    }

    fn save(&self, session: &Session) -> Result<(), AuthError> {
        (**self).save(session)
    }

    fn clear(&self) -> Result<(), AuthError> {
        (**self).clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Session {
        Session {
            username: "alice".into(),
            api_key: "abc".into(),
            tier: 0,
        }
    }

    #[test]
    fn local_storage_round_trips_under_current_user_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStorage::new(dir.path().join("nested"));

        assert_eq!(store.load(), None);
        store.save(&alice()).unwrap();

        assert!(dir.path().join("nested").join("currentUser.json").exists());
        assert_eq!(store.load(), Some(alice()));

        store.clear().unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn local_storage_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStorage::new(dir.path());

        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.get_item(SESSION_KEY), None);
    }

    #[test]
    fn local_storage_ignores_corrupt_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStorage::new(dir.path());

        store.set_item(SESSION_KEY, "{not json").unwrap();
        assert_eq!(store.load(), None);

        store
            .set_item(SESSION_KEY, r#"{"username":"","apiKey":"x","tier":0}"#)
            .unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn memory_store_counts_writes() {
        let store = MemoryStore::new();
        store.save(&alice()).unwrap();
        assert_eq!(store.writes(), 1);
        assert_eq!(store.load(), Some(alice()));

        store.clear().unwrap();
        assert_eq!(store.raw(), None);
        assert_eq!(store.writes(), 1);
    }
}
