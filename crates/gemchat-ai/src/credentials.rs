//! API key handling.
//!
//! The key lives in memory; when "remember" is on it is mirrored into a
//! [`KeyStore`] under a fixed entry name and read back on the next start.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use gemchat_common::PlatformError;
use tracing::{info, warn};

/// Durable string key-value storage.
pub trait KeyStore: Send + Sync {
    fn load(&self, name: &str) -> Option<String>;
    fn store(&self, name: &str, value: &str) -> Result<(), PlatformError>;
    fn remove(&self, name: &str) -> Result<(), PlatformError>;
}

/// One file per entry, readable only by the owner on unix.
pub struct FileKeyStore {
    dir: PathBuf,
}

impl FileKeyStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the platform data directory.
    pub fn open_default() -> Result<Self, PlatformError> {
        Ok(Self::new(gemchat_common::paths::key_store_dir()?))
    }

    fn entry_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

fn pe(e: &dyn fmt::Display) -> PlatformError {
    PlatformError::StorageError(e.to_string())
}

impl KeyStore for FileKeyStore {
    fn load(&self, name: &str) -> Option<String> {
        let path = self.entry_path(name);
        match std::fs::read_to_string(&path) {
            Ok(s) => {
                let value = s.trim();
                (!value.is_empty()).then(|| value.to_string())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read stored key");
                None
            }
        }
    }

    fn store(&self, name: &str, value: &str) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| pe(&e))?;
        let path = self.entry_path(name);

        // Write with restricted permissions on Unix
        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;
            let mut opts = std::fs::OpenOptions::new();
            opts.write(true).create(true).truncate(true).mode(0o600);
            let mut f = opts.open(&path).map_err(|e| pe(&e))?;
            f.write_all(value.as_bytes()).map_err(|e| pe(&e))?;
        }
        #[cfg(not(unix))]
        {
            std::fs::write(&path, value).map_err(|e| pe(&e))?;
        }
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), PlatformError> {
        match std::fs::remove_file(self.entry_path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(pe(&e)),
        }
    }
}

/// In-process store. Clones share the same entries.
#[derive(Clone, Default)]
pub struct MemoryKeyStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.load(name)
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyStore for MemoryKeyStore {
    fn load(&self, name: &str) -> Option<String> {
        self.entries().get(name).cloned()
    }

    fn store(&self, name: &str, value: &str) -> Result<(), PlatformError> {
        self.entries().insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), PlatformError> {
        self.entries().remove(name);
        Ok(())
    }
}

/// The API key plus its "remember" mirror.
pub struct Credentials {
    key: String,
    remember: bool,
    entry: String,
    store: Box<dyn KeyStore>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &if self.key.is_empty() { "" } else { "[REDACTED]" })
            .field("remember", &self.remember)
            .field("entry", &self.entry)
            .finish()
    }
}

impl Credentials {
    /// Read the stored key once, if remembering is enabled.
    pub fn load(store: Box<dyn KeyStore>, entry: impl Into<String>, remember: bool) -> Self {
        let entry = entry.into();
        let key = if remember {
            store.load(&entry).unwrap_or_default()
        } else {
            String::new()
        };
        if !key.is_empty() {
            info!(entry = %entry, "loaded stored API key");
        }
        Self {
            key,
            remember,
            entry,
            store,
        }
    }

    /// Use a key for this process only, without touching the store.
    pub fn use_transient(&mut self, key: &str) {
        self.key = key.trim().to_string();
    }

    /// Replace the key; mirrored to the store while remembering. An empty
    /// key removes the stored entry.
    pub fn set_key(&mut self, key: &str) -> Result<(), PlatformError> {
        self.key = key.trim().to_string();
        if !self.remember {
            return Ok(());
        }
        if self.key.is_empty() {
            self.store.remove(&self.entry)
        } else {
            self.store.store(&self.entry, &self.key)
        }
    }

    pub fn clear(&mut self) -> Result<(), PlatformError> {
        self.set_key("")
    }

    /// Turning remembering off removes the stored key; turning it on stores
    /// the current key right away.
    pub fn set_remember(&mut self, remember: bool) -> Result<(), PlatformError> {
        self.remember = remember;
        if !remember {
            self.store.remove(&self.entry)
        } else if !self.key.is_empty() {
            self.store.store(&self.entry, &self.key)
        } else {
            Ok(())
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_configured(&self) -> bool {
        !self.key.is_empty()
    }

    pub fn remembers(&self) -> bool {
        self.remember
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRY: &str = "gemini_api_key";

    fn memory(remember: bool) -> (Credentials, MemoryKeyStore) {
        let store = MemoryKeyStore::new();
        let creds = Credentials::load(Box::new(store.clone()), ENTRY, remember);
        (creds, store)
    }

    #[test]
    fn load_reads_stored_key_once() {
        let store = MemoryKeyStore::new();
        store.store(ENTRY, "stored-key").unwrap();

        let creds = Credentials::load(Box::new(store.clone()), ENTRY, true);
        assert_eq!(creds.key(), "stored-key");
        assert!(creds.is_configured());
    }

    #[test]
    fn load_ignores_store_when_not_remembering() {
        let store = MemoryKeyStore::new();
        store.store(ENTRY, "stored-key").unwrap();

        let creds = Credentials::load(Box::new(store.clone()), ENTRY, false);
        assert!(!creds.is_configured());
        assert_eq!(store.get(ENTRY).as_deref(), Some("stored-key"));
    }

    #[test]
    fn set_key_mirrors_while_remembering() {
        let (mut creds, store) = memory(true);
        creds.set_key("  abc123 ").unwrap();
        assert_eq!(creds.key(), "abc123");
        assert_eq!(store.get(ENTRY).as_deref(), Some("abc123"));
    }

    #[test]
    fn set_key_stays_in_memory_when_not_remembering() {
        let (mut creds, store) = memory(false);
        creds.set_key("abc123").unwrap();
        assert_eq!(creds.key(), "abc123");
        assert!(store.get(ENTRY).is_none());
    }

    #[test]
    fn remember_off_removes_persisted_key() {
        let (mut creds, store) = memory(true);
        creds.set_key("abc123").unwrap();

        creds.set_remember(false).unwrap();
        assert!(store.get(ENTRY).is_none());
        assert_eq!(creds.key(), "abc123");
        assert!(!creds.remembers());
    }

    #[test]
    fn remember_on_persists_current_key_immediately() {
        let (mut creds, store) = memory(false);
        creds.set_key("abc123").unwrap();
        assert!(store.get(ENTRY).is_none());

        creds.set_remember(true).unwrap();
        assert_eq!(store.get(ENTRY).as_deref(), Some("abc123"));
    }

    #[test]
    fn remember_on_with_empty_key_stores_nothing() {
        let (mut creds, store) = memory(false);
        creds.set_remember(true).unwrap();
        assert!(store.get(ENTRY).is_none());
    }

    #[test]
    fn clear_removes_everywhere() {
        let (mut creds, store) = memory(true);
        creds.set_key("abc123").unwrap();
        creds.clear().unwrap();
        assert!(!creds.is_configured());
        assert!(store.get(ENTRY).is_none());
    }

    #[test]
    fn transient_key_is_not_persisted() {
        let (mut creds, store) = memory(true);
        creds.use_transient("from-env");
        assert_eq!(creds.key(), "from-env");
        assert!(store.get(ENTRY).is_none());
    }

    #[test]
    fn debug_redacts_key() {
        let (mut creds, _store) = memory(false);
        creds.set_key("super-secret").unwrap();
        let out = format!("{creds:?}");
        assert!(!out.contains("super-secret"));
        assert!(out.contains("[REDACTED]"));
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyStore::new(dir.path().join("keys"));

        assert!(store.load(ENTRY).is_none());
        store.store(ENTRY, "file-key").unwrap();
        assert_eq!(store.load(ENTRY).as_deref(), Some("file-key"));

        store.remove(ENTRY).unwrap();
        assert!(store.load(ENTRY).is_none());
        // Removing a missing entry is fine.
        store.remove(ENTRY).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn file_store_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyStore::new(dir.path());
        store.store(ENTRY, "file-key").unwrap();

        let mode = std::fs::metadata(dir.path().join(ENTRY))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn credentials_survive_restart_with_file_store() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut creds = Credentials::load(Box::new(FileKeyStore::new(dir.path())), ENTRY, true);
            creds.set_key("persisted").unwrap();
        }
        let creds = Credentials::load(Box::new(FileKeyStore::new(dir.path())), ENTRY, true);
        assert_eq!(creds.key(), "persisted");
    }
}
